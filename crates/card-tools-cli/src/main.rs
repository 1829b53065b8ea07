mod logger;

use anyhow::Result;
use card_layout::{
    CardProject, Color, DecodeTarget, ExportOptions, LayoutStatistics, Orientation, PaperSize,
    RenderedCard, Side,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use logger::CliLogger;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cardt", about = "Card grid designer CLI", version)]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a sheet of cards to PDF
    Export {
        #[command(flatten)]
        design: DesignArgs,

        /// Output PDF file or directory (defaults to the sanitized project name)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,
    },

    /// Print the grid layout and which slots hold cards
    Layout {
        #[command(flatten)]
        design: DesignArgs,
    },
}

#[derive(Args)]
struct DesignArgs {
    /// Project name (also names the PDF)
    #[arg(short, long, default_value = "default")]
    name: String,

    /// Grid columns
    #[arg(long, default_value = "3")]
    columns: usize,

    /// Grid rows
    #[arg(long, default_value = "3")]
    rows: usize,

    /// Number of cards (defaults to the CSV row count, or a full grid)
    #[arg(long)]
    count: Option<usize>,

    /// CSV with one row per card; the first row is a header
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Add a front text region with this label (repeatable)
    #[arg(long = "front-label")]
    front_labels: Vec<String>,

    /// Add a back text region with this label (repeatable)
    #[arg(long = "back-label")]
    back_labels: Vec<String>,

    /// Add a front image region showing this image on every card (repeatable)
    #[arg(long = "image")]
    images: Vec<PathBuf>,

    /// Background image for the front of every card
    #[arg(long)]
    background_image: Option<PathBuf>,

    /// Card background color (#rrggbb)
    #[arg(long, default_value = "#ffffff")]
    background: Color,

    /// Card border color (#rrggbb)
    #[arg(long, default_value = "#000000")]
    border_color: Color,

    /// Card border width in design units (0 for none)
    #[arg(long, default_value = "2")]
    border_width: f32,

    /// Watermark printed in the bottom-right corner of every card
    #[arg(long)]
    watermark: Option<String>,

    /// Export options JSON (paper, orientation, margin, file name)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Paper size (overrides the config file)
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Paper orientation (overrides the config file)
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    /// Page margin in mm (overrides the config file)
    #[arg(long)]
    margin: Option<f32>,

    /// Match the design canvas to the card's physical aspect
    #[arg(long)]
    fit_canvas: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
        }
    }
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

async fn export_options(design: &DesignArgs) -> Result<ExportOptions> {
    let mut options = match &design.config {
        Some(path) => ExportOptions::load(path).await?,
        None => ExportOptions::default(),
    };
    if let Some(paper) = design.paper {
        options.paper_size = paper.into();
    }
    if let Some(orientation) = design.orientation {
        options.orientation = orientation.into();
    }
    if let Some(margin) = design.margin {
        options.margin_mm = margin;
    }
    options.validate()?;
    Ok(options)
}

async fn build_project(design: &DesignArgs, options: &ExportOptions) -> Result<CardProject> {
    let mut project = CardProject::new();
    project.set_name(design.name.clone());
    project.set_grid(design.columns, design.rows)?;

    let rows = match &design.csv {
        Some(path) => Some(card_layout::load_text_rows_from_csv(path).await?),
        None => None,
    };

    let count = match (design.count, &rows) {
        (Some(count), _) => count,
        (None, Some(rows)) => rows.len().clamp(1, project.config().max_slots()),
        (None, None) => project.config().max_slots(),
    };
    project.set_actual_card_count(count)?;

    if design.fit_canvas {
        project.fit_canvas_to_page(options)?;
    }

    let mut front_labels = design.front_labels.clone();
    let mut back_labels = design.back_labels.clone();
    if front_labels.is_empty() && back_labels.is_empty() {
        // Without labels, CSV columns map to one front region and the rest on the back
        let columns = rows
            .as_ref()
            .and_then(|rows| rows.iter().map(Vec::len).max())
            .unwrap_or(0);
        if columns > 0 {
            front_labels.push("Front".to_string());
            back_labels.extend((1..columns).map(|i| format!("Back {i}")));
        }
    }
    for (side, labels) in [(Side::Front, front_labels), (Side::Back, back_labels)] {
        for label in labels {
            let index = project.add_text_region(side);
            project.edit_template(|template| {
                template
                    .text_region_mut(side, index)
                    .map(|region| region.label = label)
            })?;
        }
    }

    for path in &design.images {
        let index = project.add_image_region(Side::Front);
        let bytes = tokio::fs::read(path).await?;
        project
            .load_image(
                DecodeTarget::TemplateImage {
                    side: Side::Front,
                    index,
                },
                bytes,
            )
            .await?;
    }

    if let Some(path) = &design.background_image {
        let bytes = tokio::fs::read(path).await?;
        project
            .load_image(DecodeTarget::Background { side: Side::Front }, bytes)
            .await?;
    }

    let watermark = design.watermark.clone().unwrap_or_default();
    project.edit_template(|template| {
        for side in Side::BOTH {
            let card_side = template.side_mut(side);
            card_side.background_color = design.background;
            card_side.border_color = design.border_color;
            card_side.border_width = design.border_width;
        }
        template.front.watermark = watermark.clone();
        template.back.watermark = watermark;
    });

    if let Some(rows) = &rows {
        let filled = project.apply_text_rows(rows);
        log::info!("Filled {} card(s) from CSV", filled);
    }

    Ok(project)
}

fn print_statistics(stats: &LayoutStatistics) {
    println!("Layout Statistics:");
    println!("  Grid slots: {}", stats.max_slots);
    println!("  Cards: {}", stats.card_count);
    println!("  Unused slots: {}", stats.unused_slots);
    println!(
        "  Front regions: {} text, {} image",
        stats.front_text_regions, stats.front_image_regions
    );
    println!(
        "  Back regions: {} text, {} image",
        stats.back_text_regions, stats.back_image_regions
    );
    println!("  Pages: {}", stats.page_count);
}

fn print_layout(project: &CardProject, side: Side) {
    let columns = project.config().grid().columns();
    println!("{} side:", side);
    for row in project.render_page(side).chunks(columns) {
        let cells: Vec<String> = row
            .iter()
            .map(|slot| match slot {
                RenderedCard::Card(card) => {
                    let title = card
                        .texts
                        .first()
                        .map(|text| text.text.as_str())
                        .unwrap_or("");
                    format!("[{:>2} {:<12.12}]", card.slot + 1, title)
                }
                RenderedCard::Unused { .. } => format!("[{:^15}]", "-"),
            })
            .collect();
        println!("  {}", cells.join(" "));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    CliLogger::new(level).init()?;

    match cli.command {
        Commands::Export {
            design,
            output,
            stats_only,
        } => {
            let options = export_options(&design).await?;
            let project = build_project(&design, &options).await?;
            print_statistics(&project.statistics());

            if stats_only {
                return Ok(());
            }

            let plan = project.plan_document(&options)?;
            let output = match output {
                Some(path) if path.is_dir() => path.join(&plan.file_name),
                Some(path) => path,
                None => PathBuf::from(&plan.file_name),
            };
            card_pdf::generate_pdf(&plan, &output).await?;
            println!(
                "Generated {} card(s) on {} page(s) → {}",
                plan.card_count(),
                plan.pages.len(),
                output.display()
            );
        }

        Commands::Layout { design } => {
            let options = export_options(&design).await?;
            let project = build_project(&design, &options).await?;
            let (width, height) = options.card_size_mm(project.config().grid());
            println!(
                "{} × {} grid, cards {:.1} × {:.1} mm",
                project.config().grid().columns(),
                project.config().grid().rows(),
                width,
                height
            );
            print_layout(&project, Side::Front);
            if project.has_back_page() {
                print_layout(&project, Side::Back);
            }
            print_statistics(&project.statistics());
        }
    }

    Ok(())
}
