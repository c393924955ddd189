use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use clap_derive::Parser;
use rgb_lightbulb::logging::{LogFiles, RotationPeriod, setup_logging};
use rgb_lightbulb::settings::{DriverSettings, Settings};
use rgb_lightbulb::start_accessory;

#[derive(Parser, Debug)]
pub struct Params {
    /// Settings file path (if not set, it will use default settings)
    #[clap(long)]
    settings: Option<PathBuf>,
    /// Port of the control server, overrides the settings file
    #[clap(long)]
    port: Option<u16>,
    /// Only log colors instead of driving the light hardware
    #[clap(long)]
    dry_run: bool,
    /// Directory for rotated log files (if not set, logs only go to stdout)
    #[clap(long)]
    log_dir: Option<PathBuf>,
    #[clap(long, value_enum, default_value = "daily")]
    log_rotation: RotationPeriod,
    /// Number of rotated log files to keep (0 = unlimited)
    #[clap(long, default_value = "7")]
    max_log_files: usize,
}

impl Params {
    fn log_files(&self) -> Option<LogFiles> {
        self.log_dir.as_ref().map(|dir| LogFiles {
            dir: dir.clone(),
            rotation: self.log_rotation,
            keep: self.max_log_files,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let params = Params::parse();
    let _log_guard = setup_logging(params.log_files()).context("Failed to set up logging")?;

    let mut settings = Settings::load(params.settings.as_deref())?;
    if let Some(port) = params.port {
        settings.port = port;
    }
    if params.dry_run {
        settings.driver = DriverSettings::DryRun;
    }

    start_accessory(settings).await
}
