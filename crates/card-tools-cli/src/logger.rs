use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};
use std::io::Write;

/// Writes timestamped records to stderr, keeping stdout for command output
pub struct CliLogger {
    level: LevelFilter,
}

impl CliLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl log::Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let mut stderr = std::io::stderr().lock();
            let _ = if record.level() <= Level::Warn {
                writeln!(
                    stderr,
                    "{} {:<5} {}",
                    Local::now().format("%H:%M:%S"),
                    record.level(),
                    record.args()
                )
            } else {
                writeln!(
                    stderr,
                    "{} {:<5} [{}] {}",
                    Local::now().format("%H:%M:%S"),
                    record.level(),
                    record.target(),
                    record.args()
                )
            };
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
