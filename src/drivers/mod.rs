mod dry_run;
mod pwm;
mod strip;

pub use dry_run::DryRunDriver;
pub use pwm::PwmDriver;
pub use strip::{PixelOrder, StripDriver};

use anyhow::{Context, Result};
use async_trait::async_trait;
use rgb::RGB8;
use tracing::info;

use crate::error::HardwareError;
use crate::settings::DriverSettings;

/// Hardware sink that turns an RGB triple into light.
///
/// Implementations must be idempotent: displaying the same color twice
/// leaves the hardware in the same state as displaying it once.
#[async_trait]
pub trait LightDriver: Send + Sync {
    async fn display(&mut self, rgb: RGB8) -> Result<(), HardwareError>;
}

#[async_trait]
impl<D: LightDriver + ?Sized> LightDriver for Box<D> {
    async fn display(&mut self, rgb: RGB8) -> Result<(), HardwareError> {
        (**self).display(rgb).await
    }
}

/// Builds the driver selected in the settings file.
pub async fn from_settings(settings: &DriverSettings) -> Result<Box<dyn LightDriver>> {
    match settings {
        DriverSettings::DryRun => {
            info!("Using dry-run light driver, no hardware will be driven");
            Ok(Box::new(DryRunDriver::default()))
        }
        DriverSettings::Pwm {
            chip,
            channels,
            period_ns,
        } => {
            let driver = PwmDriver::open(chip, *channels, *period_ns)
                .await
                .with_context(|| format!("Failed to open PWM chip {chip}"))?;
            info!("Using PWM light driver on {chip} channels {channels:?}");
            Ok(Box::new(driver))
        }
        DriverSettings::Strip {
            device,
            led_count,
            pixel_order,
        } => {
            info!("Using LED strip driver on {device} ({led_count} pixels, {pixel_order:?})");
            Ok(Box::new(StripDriver::new(device, *led_count, *pixel_order)))
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::RwLock;

    /// In-memory driver recording every color it is asked to display.
    #[derive(Clone, Default)]
    pub struct FakeLightDriver {
        pub display_calls: Arc<RwLock<Vec<RGB8>>>,
        pub should_fail: Arc<AtomicBool>,
        pub delay: Option<Duration>,
    }

    #[allow(dead_code)]
    impl FakeLightDriver {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn slow(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Default::default()
            }
        }

        pub fn set_failing(&self, failing: bool) {
            self.should_fail.store(failing, Ordering::Relaxed);
        }

        pub async fn calls(&self) -> Vec<RGB8> {
            self.display_calls.read().await.clone()
        }
    }

    #[async_trait]
    impl LightDriver for FakeLightDriver {
        async fn display(&mut self, rgb: RGB8) -> Result<(), HardwareError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.should_fail.load(Ordering::Relaxed) {
                return Err(HardwareError::Disconnected("Fake error".to_string()));
            }
            self.display_calls.write().await.push(rgb);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_boxed_driver_forwards_to_inner() {
        let fake = FakeLightDriver::new();
        let mut boxed: Box<dyn LightDriver> = Box::new(fake.clone());
        boxed.display(RGB8::new(1, 2, 3)).await.unwrap();
        assert_eq!(fake.calls().await, vec![RGB8::new(1, 2, 3)]);
    }

    #[tokio::test]
    async fn test_from_settings_builds_dry_run() {
        let mut driver = from_settings(&DriverSettings::DryRun).await.unwrap();
        assert!(driver.display(RGB8::new(255, 0, 0)).await.is_ok());
    }

    #[tokio::test]
    async fn test_from_settings_builds_pwm() {
        let chip = tempfile::TempDir::new().unwrap();
        for channel in 0..3 {
            std::fs::create_dir(chip.path().join(format!("pwm{channel}"))).unwrap();
        }
        let settings = DriverSettings::Pwm {
            chip: chip.path().display().to_string(),
            channels: [0, 1, 2],
            period_ns: 255_000,
        };

        let mut driver = from_settings(&settings).await.unwrap();
        driver.display(RGB8::new(0, 255, 0)).await.unwrap();

        let duty = std::fs::read_to_string(chip.path().join("pwm1/duty_cycle")).unwrap();
        assert_eq!(duty, "255000");
    }

    #[tokio::test]
    async fn test_from_settings_reports_missing_pwm_chip() {
        let settings = DriverSettings::Pwm {
            chip: "/nonexistent/pwmchip7".to_string(),
            channels: [0, 1, 2],
            period_ns: 1_000,
        };

        let err = from_settings(&settings).await.err().unwrap();
        assert_eq!(err.to_string(), "Failed to open PWM chip /nonexistent/pwmchip7");
        assert!(err.downcast_ref::<HardwareError>().is_some());
    }

    #[tokio::test]
    async fn test_from_settings_builds_strip() {
        let device = tempfile::NamedTempFile::new().unwrap();
        let settings = DriverSettings::Strip {
            device: device.path().display().to_string(),
            led_count: 4,
            pixel_order: PixelOrder::Rgb,
        };

        let mut driver = from_settings(&settings).await.unwrap();
        driver.display(RGB8::new(1, 2, 3)).await.unwrap();

        let frame = std::fs::read(device.path()).unwrap();
        assert_eq!(frame, [1u8, 2, 3].repeat(4));
    }
}
