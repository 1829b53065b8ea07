use crate::{CardCommand, CardUpdate, handlers};
use tokio::sync::mpsc;

/// Async worker task that processes card commands and sends updates
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<CardCommand>,
    update_tx: mpsc::UnboundedSender<CardUpdate>,
) {
    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut command_rx, &update_tx).await;
    }
    log::debug!("Command channel closed, worker exiting");
}

async fn process_command(
    cmd: CardCommand,
    command_rx: &mut mpsc::UnboundedReceiver<CardCommand>,
    update_tx: &mpsc::UnboundedSender<CardUpdate>,
) {
    match cmd {
        CardCommand::DecodeImage { ticket, bytes } => {
            // Decodes are independent; don't hold up the queue
            let update_tx = update_tx.clone();
            tokio::spawn(async move {
                handlers::handle_decode_image(ticket, bytes, &update_tx).await;
            });
        }
        CardCommand::LoadCsv { input_path } => {
            handlers::handle_load_csv(input_path, update_tx).await;
        }
        CardCommand::LoadOptions { path } => {
            handlers::handle_load_options(path, update_tx).await;
        }
        CardCommand::Export {
            mut plan,
            output_path,
        } => {
            // Collapse queued exports to the same file, keeping only the most recent
            while let Ok(next_cmd) = command_rx.try_recv() {
                match next_cmd {
                    CardCommand::Export {
                        plan: new_plan,
                        output_path: new_output_path,
                    } if new_output_path == output_path => {
                        log::debug!("Discarding queued export, using newer request");
                        plan = new_plan;
                    }
                    other => {
                        Box::pin(process_command(other, command_rx, update_tx)).await;
                    }
                }
            }

            handlers::handle_export(plan, output_path, update_tx).await;
        }
    }
}
