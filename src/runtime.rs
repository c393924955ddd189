use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

use crate::accessories::{LightState, LightbulbAccessory};
use crate::drivers;
use crate::metrics::init_metrics;
use crate::settings::Settings;
use crate::web::{self, AppState, state::ControlStats};

/// Starts the lightbulb accessory and serves it until SIGINT or SIGTERM.
pub async fn start_accessory(settings: Settings) -> Result<()> {
    let driver = drivers::from_settings(&settings.driver)
        .await
        .context("Failed to set up the light driver")?;
    let state = LightState::new(driver).with_render_timeout(settings.render_timeout());
    let light = LightbulbAccessory::new(settings.name.clone(), state);

    let metrics_handle = init_metrics().context("Failed to install Prometheus recorder")?;
    web::start_control_server(
        settings.port,
        AppState {
            light,
            stats: ControlStats::new(),
            metrics_handle,
        },
    )
    .await
    .with_context(|| format!("Failed to bind control server on port {}", settings.port))?;

    info!("Accessory {} is ready", settings.name);

    let ctrl_c = signal::ctrl_c();

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())?
            .recv()
            .await;
        Ok::<(), std::io::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<std::io::Result<()>>();

    tokio::select! {
        res = ctrl_c => res.context("Failed to listen for Ctrl+C")?,
        res = terminate => res.context("Failed to listen for SIGTERM")?,
    }
    info!("signal received, shutting down");
    Ok(())
}
