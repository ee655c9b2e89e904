use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Where log output goes and how much of it
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingOptions<'a> {
    /// Console shows INFO and above instead of WARN and above
    pub verbose: bool,
    /// Console shows DEBUG and above
    pub debug: bool,
    /// Detailed log file, appended to at INFO and above
    pub log_file: Option<&'a Path>,
}

impl LoggingOptions<'_> {
    fn console_level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::DEBUG
        } else if self.verbose {
            LevelFilter::INFO
        } else {
            LevelFilter::WARN
        }
    }
}

/// Install the global subscriber: a brief console layer (RUST_LOG overrides
/// its level) and an optional detailed file layer.
pub fn init_logging(options: LoggingOptions<'_>) -> Result<()> {
    let console_filter = EnvFilter::builder()
        .with_default_directive(options.console_level().into())
        .from_env_lossy();
    let console = fmt::layer()
        .without_time()
        .with_target(true)
        .with_writer(std::io::stdout)
        .with_filter(console_filter);

    let file = match options.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::INFO),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .context("Failed to install the log subscriber")?;

    Ok(())
}
