//! Logging setup on top of `tracing-subscriber`.
//!
//! Console output is always on and honours `RUST_LOG` (default `info`).
//! When a log directory is given, the same events also go to a rolling
//! file; `tracing-appender` prunes the oldest files itself.

use std::path::PathBuf;

use clap_derive::ValueEnum;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE_PREFIX: &str = "rgb-lightbulb";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RotationPeriod {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

impl RotationPeriod {
    fn rotation(self) -> Rotation {
        match self {
            RotationPeriod::Minutely => Rotation::MINUTELY,
            RotationPeriod::Hourly => Rotation::HOURLY,
            RotationPeriod::Daily => Rotation::DAILY,
            RotationPeriod::Never => Rotation::NEVER,
        }
    }
}

/// Where and how often log files are written.
#[derive(Debug, Clone)]
pub struct LogFiles {
    pub dir: PathBuf,
    pub rotation: RotationPeriod,
    /// 0 keeps every file.
    pub keep: usize,
}

impl LogFiles {
    fn appender(&self) -> Result<RollingFileAppender, InitError> {
        let mut builder = RollingFileAppender::builder()
            .rotation(self.rotation.rotation())
            .filename_prefix(LOG_FILE_PREFIX)
            .filename_suffix("log");
        if self.keep > 0 {
            builder = builder.max_log_files(self.keep);
        }
        builder.build(&self.dir)
    }
}

/// Keeps the non-blocking file writer alive; dropping it flushes the logs.
pub struct LogGuard {
    _guard: Option<WorkerGuard>,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber.
pub fn setup_logging(files: Option<LogFiles>) -> Result<LogGuard, InitError> {
    let Some(files) = files else {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(Layer::default().with_writer(std::io::stdout))
            .init();
        return Ok(LogGuard { _guard: None });
    };

    let (writer, guard) = tracing_appender::non_blocking(files.appender()?);
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            Layer::default()
                .with_writer(writer)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true),
        )
        .with(Layer::default().with_writer(std::io::stdout))
        .init();

    Ok(LogGuard {
        _guard: Some(guard),
    })
}
