//! Three-channel PWM driver on top of the Linux sysfs PWM interface.
//!
//! Each color channel is one PWM output of the same chip, e.g.
//! `/sys/class/pwm/pwmchip0/pwm{0,1,2}`. Duty cycles are scaled so that a
//! channel value of 255 keeps the output high for the whole period.

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use rgb::RGB8;
use tokio::fs;
use tracing::{debug, info};

use super::LightDriver;
use crate::error::HardwareError;

// udev may still be fixing ownership of a freshly exported channel.
const EXPORT_SETTLE_ATTEMPTS: u32 = 10;
const EXPORT_SETTLE_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub struct PwmDriver {
    chip: PathBuf,
    channels: [u32; 3],
    period_ns: u32,
}

impl PwmDriver {
    /// Exports the red, green and blue channels if needed and enables them
    /// with every duty cycle at zero.
    pub async fn open(
        chip: impl AsRef<Path>,
        channels: [u32; 3],
        period_ns: u32,
    ) -> Result<Self, HardwareError> {
        let driver = Self {
            chip: chip.as_ref().to_path_buf(),
            channels,
            period_ns,
        };
        if !fs::try_exists(&driver.chip).await? {
            return Err(HardwareError::Disconnected(format!(
                "PWM chip {} not found",
                driver.chip.display()
            )));
        }

        for channel in channels {
            let dir = driver.channel_dir(channel);
            if fs::try_exists(&dir).await? {
                write_attribute(&dir.join("duty_cycle"), 0).await?;
            } else {
                info!("Exporting PWM channel {channel} on {}", driver.chip.display());
                write_attribute(&driver.chip.join("export"), channel).await?;
                write_exported_attribute(&dir.join("duty_cycle"), 0).await?;
            }
            write_attribute(&dir.join("period"), period_ns).await?;
            write_attribute(&dir.join("enable"), 1).await?;
        }
        Ok(driver)
    }

    fn channel_dir(&self, channel: u32) -> PathBuf {
        self.chip.join(format!("pwm{channel}"))
    }

    fn duty_cycle(&self, value: u8) -> u64 {
        u64::from(self.period_ns) * u64::from(value) / 255
    }
}

#[async_trait]
impl LightDriver for PwmDriver {
    async fn display(&mut self, rgb: RGB8) -> Result<(), HardwareError> {
        for (channel, value) in self.channels.into_iter().zip([rgb.r, rgb.g, rgb.b]) {
            let duty = self.duty_cycle(value);
            debug!("PWM channel {channel}: duty cycle {duty}ns");
            write_attribute(&self.channel_dir(channel).join("duty_cycle"), duty).await?;
        }
        Ok(())
    }
}

async fn write_attribute(path: &Path, value: impl ToString) -> Result<(), HardwareError> {
    fs::write(path, value.to_string())
        .await
        .map_err(|e| attribute_error(path, e))
}

/// Like [`write_attribute`], but waits a bounded time for the attribute of a
/// just exported channel to appear and become writable.
async fn write_exported_attribute(path: &Path, value: u64) -> Result<(), HardwareError> {
    let mut attempt = 1;
    loop {
        match fs::write(path, value.to_string()).await {
            Ok(()) => return Ok(()),
            Err(e)
                if attempt < EXPORT_SETTLE_ATTEMPTS
                    && matches!(e.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) =>
            {
                debug!("{} not ready yet (attempt {attempt}): {e}", path.display());
                attempt += 1;
                tokio::time::sleep(EXPORT_SETTLE_DELAY).await;
            }
            Err(e) => return Err(attribute_error(path, e)),
        }
    }
}

fn attribute_error(path: &Path, e: io::Error) -> HardwareError {
    match e.kind() {
        ErrorKind::NotFound => HardwareError::Disconnected(format!("{} missing", path.display())),
        _ => HardwareError::Io(e),
    }
}
