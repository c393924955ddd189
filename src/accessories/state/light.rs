use std::ops::RangeInclusive;
use std::time::Duration;

use rgb::RGB8;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::color::{BLACK, hsv_to_rgb};
use crate::drivers::LightDriver;
use crate::error::{HardwareError, LightError};

pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(2);

const PERCENT: RangeInclusive<f64> = 0.0..=100.0;

/// Logical state of one light and the driver it renders to.
///
/// Hue, saturation and brightness are remembered while the light is off
/// and rendered as soon as it is switched on. While on, every setter
/// renders the color computed from the three current values.
#[derive(Debug)]
pub struct LightState<D: LightDriver> {
    power: bool,
    hue: f64,
    saturation: f64,
    brightness: f64,
    rendered_rgb: RGB8,
    hardware_synced: bool,
    render_timeout: Duration,
    driver: D,
}

/// Point-in-time copy of a [`LightState`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LightSnapshot {
    pub power: bool,
    pub hue: f64,
    pub saturation: f64,
    pub brightness: f64,
    pub rendered_rgb: [u8; 3],
    pub hardware_synced: bool,
}

impl<D: LightDriver> LightState<D> {
    pub fn new(driver: D) -> Self {
        Self {
            power: false,
            hue: 0.0,
            saturation: 100.0,
            brightness: 100.0,
            rendered_rgb: BLACK,
            hardware_synced: true,
            render_timeout: DEFAULT_RENDER_TIMEOUT,
            driver,
        }
    }

    pub fn with_render_timeout(mut self, render_timeout: Duration) -> Self {
        self.render_timeout = render_timeout;
        self
    }

    pub async fn set_power(&mut self, on: bool) -> Result<(), LightError> {
        self.power = on;
        if on {
            self.render_if_powered().await
        } else {
            info!("Light switched off");
            self.render(BLACK).await
        }
    }

    pub async fn set_hue(&mut self, value: f64) -> Result<(), LightError> {
        if !(0.0..360.0).contains(&value) {
            return Err(LightError::InvalidArgument {
                characteristic: "hue",
                value,
                expected: "0 <= hue < 360",
            });
        }
        self.hue = value;
        self.render_if_powered().await
    }

    pub async fn set_saturation(&mut self, value: f64) -> Result<(), LightError> {
        check_percent("saturation", value)?;
        self.saturation = value;
        self.render_if_powered().await
    }

    pub async fn set_brightness(&mut self, value: f64) -> Result<(), LightError> {
        check_percent("brightness", value)?;
        self.brightness = value;
        self.render_if_powered().await
    }

    pub fn power(&self) -> bool {
        self.power
    }

    pub fn hue(&self) -> f64 {
        self.hue
    }

    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    pub fn rendered_rgb(&self) -> RGB8 {
        self.rendered_rgb
    }

    /// Whether the last color handed to the driver was accepted.
    pub fn hardware_synced(&self) -> bool {
        self.hardware_synced
    }

    pub fn snapshot(&self) -> LightSnapshot {
        LightSnapshot {
            power: self.power,
            hue: self.hue,
            saturation: self.saturation,
            brightness: self.brightness,
            rendered_rgb: [self.rendered_rgb.r, self.rendered_rgb.g, self.rendered_rgb.b],
            hardware_synced: self.hardware_synced,
        }
    }

    async fn render_if_powered(&mut self) -> Result<(), LightError> {
        if !self.power {
            debug!(
                hue = self.hue,
                saturation = self.saturation,
                brightness = self.brightness,
                "Light is off, setpoint stored"
            );
            return Ok(());
        }
        let rgb = hsv_to_rgb(self.hue, self.saturation, self.brightness);
        info!(
            hue = self.hue,
            saturation = self.saturation,
            brightness = self.brightness,
            "Rendering color ({}, {}, {})",
            rgb.r,
            rgb.g,
            rgb.b
        );
        self.render(rgb).await
    }

    async fn render(&mut self, rgb: RGB8) -> Result<(), LightError> {
        self.rendered_rgb = rgb;
        let result = match tokio::time::timeout(self.render_timeout, self.driver.display(rgb)).await
        {
            Ok(result) => result,
            Err(_) => Err(HardwareError::Timeout(self.render_timeout)),
        };
        self.hardware_synced = result.is_ok();
        result.map_err(|e| {
            error!("Failed to display ({}, {}, {}): {e}", rgb.r, rgb.g, rgb.b);
            LightError::from(e)
        })
    }
}

fn check_percent(characteristic: &'static str, value: f64) -> Result<(), LightError> {
    if PERCENT.contains(&value) {
        Ok(())
    } else {
        Err(LightError::InvalidArgument {
            characteristic,
            value,
            expected: "0 <= value <= 100",
        })
    }
}
