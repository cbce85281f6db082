use chrono::Local;
use log::{LevelFilter, Metadata, Record};
use std::io::Write;

/// Timestamped logger writing to stderr, so stdout stays free for statistics
pub struct CliLogger {
    level: LevelFilter,
}

impl CliLogger {
    /// Level for a repeated `-v` count: warnings by default, then info, debug, trace
    pub fn from_verbosity(verbose: u8) -> Self {
        let level = match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
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
            let _ = writeln!(
                stderr,
                "{} {:<5} {}: {}",
                Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log};

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(CliLogger::from_verbosity(0).level, LevelFilter::Warn);
        assert_eq!(CliLogger::from_verbosity(2).level, LevelFilter::Debug);
        assert_eq!(CliLogger::from_verbosity(9).level, LevelFilter::Trace);

        let logger = CliLogger::from_verbosity(1);
        let info = Metadata::builder().level(Level::Info).build();
        let debug = Metadata::builder().level(Level::Debug).build();
        assert!(logger.enabled(&info));
        assert!(!logger.enabled(&debug));
    }
}
