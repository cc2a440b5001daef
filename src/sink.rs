use log::{Level, LevelFilter, Log, Record};
use std::fmt;
use syslog::{BasicLogger, Facility, Formatter3164};

/// Where the cleaner reports what it does.
///
/// The sink is handed to the operations that log, so nothing in the crate
/// depends on a process-wide logger.
pub struct Sink {
    logger: Box<dyn Log>,
    level: LevelFilter,
}

impl Sink {
    pub fn new(logger: Box<dyn Log>, level: LevelFilter) -> Self {
        Sink { logger, level }
    }

    /// Log to stdout through env_logger. `RUST_LOG` overrides `level`.
    pub fn stdout(level: LevelFilter) -> Self {
        let env = env_logger::Env::default()
            .default_filter_or(level.to_string().to_lowercase());
        let logger = env_logger::Builder::from_env(env)
            .target(env_logger::Target::Stdout)
            .build();
        let level = logger.filter();
        Sink::new(Box::new(logger), level)
    }

    /// Log to the local syslog daemon, under the user facility.
    pub fn syslog(process: &str, level: LevelFilter) -> anyhow::Result<Self> {
        let formatter = Formatter3164 {
            facility: Facility::LOG_USER,
            hostname: None,
            process: process.to_string(),
            pid: std::process::id(),
        };
        let logger = syslog::unix(formatter)
            .map_err(|e| anyhow::anyhow!("unable to attach syslog: {}", e))?;
        Ok(Sink::new(Box::new(BasicLogger::new(logger)), level))
    }

    pub fn log(&self, level: Level, args: fmt::Arguments) {
        if level > self.level {
            return;
        }
        self.logger.log(
            &Record::builder()
                .args(args)
                .level(level)
                .target(env!("CARGO_PKG_NAME"))
                .module_path_static(Some(module_path!()))
                .build(),
        );
    }

    pub fn info(&self, args: fmt::Arguments) {
        self.log(Level::Info, args);
    }

    pub fn error(&self, args: fmt::Arguments) {
        self.log(Level::Error, args);
    }

    pub fn debug(&self, args: fmt::Arguments) {
        self.log(Level::Debug, args);
    }

    pub fn flush(&self) {
        self.logger.flush();
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink").field("level", &self.level).finish()
    }
}
