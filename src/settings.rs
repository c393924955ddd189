use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::drivers::PixelOrder;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub name: String,
    pub port: u16,
    pub render_timeout_ms: u64,
    pub driver: DriverSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            name: String::from("Simple Led Strip"),
            port: 51826,
            render_timeout_ms: 2000,
            driver: DriverSettings::default(),
        }
    }
}

impl Settings {
    /// Reads settings from a JSON file. Without a path, or when the file
    /// cannot be read, the defaults are used; a file that does not parse is
    /// an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Settings::default());
        };
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Invalid settings file {}", path.display())),
            Err(e) => {
                warn!("Failed to read settings file {}: {e}, using default settings", path.display());
                Ok(Settings::default())
            }
        }
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }
}

/// Which hardware sink renders the light.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DriverSettings {
    #[default]
    DryRun,
    Pwm {
        #[serde(default = "default_pwm_chip")]
        chip: String,
        /// Red, green and blue channel numbers on the chip.
        channels: [u32; 3],
        #[serde(default = "default_pwm_period")]
        period_ns: u32,
    },
    Strip {
        device: String,
        #[serde(default = "default_led_count")]
        led_count: usize,
        #[serde(default)]
        pixel_order: PixelOrder,
    },
}

fn default_pwm_chip() -> String {
    String::from("/sys/class/pwm/pwmchip0")
}

// 1 kHz
fn default_pwm_period() -> u32 {
    1_000_000
}

fn default_led_count() -> usize {
    50
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.port, 51826);
        assert_eq!(settings.render_timeout(), Duration::from_secs(2));
        assert_eq!(settings.driver, DriverSettings::DryRun);
    }

    #[test]
    fn test_partial_settings_keep_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"name": "Desk"}"#).unwrap();
        assert_eq!(settings.name, "Desk");
        assert_eq!(settings.port, 51826);
    }

    #[test]
    fn test_decode_pwm_driver() {
        let settings: Settings = serde_json::from_str(
            r#"{"driver": {"kind": "pwm", "channels": [17, 22, 24]}}"#,
        )
        .unwrap();
        assert_eq!(
            settings.driver,
            DriverSettings::Pwm {
                chip: "/sys/class/pwm/pwmchip0".to_string(),
                channels: [17, 22, 24],
                period_ns: 1_000_000,
            }
        );
    }

    #[test]
    fn test_decode_strip_driver() {
        let settings: Settings = serde_json::from_str(
            r#"{"driver": {"kind": "strip", "device": "/dev/ledstrip0", "pixel_order": "rgb"}}"#,
        )
        .unwrap();
        assert_eq!(
            settings.driver,
            DriverSettings::Strip {
                device: "/dev/ledstrip0".to_string(),
                led_count: 50,
                pixel_order: PixelOrder::Rgb,
            }
        );
    }

    #[test]
    fn test_load_without_path_uses_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.name, "Simple Led Strip");
        assert_eq!(settings.driver, DriverSettings::DryRun);
    }

    #[test]
    fn test_load_falls_back_on_unreadable_file() {
        let settings = Settings::load(Some(Path::new("/nonexistent/lightbulb.json"))).unwrap();
        assert_eq!(settings.port, 51826);
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(Settings::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_load_rejects_unknown_driver_kind() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"port": 9000, "driver": {{"kind": "pwn", "channels": [0, 1, 2]}}}}"#
        )
        .unwrap();

        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().starts_with("Invalid settings file"));
    }

    #[test]
    fn test_load_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"port": 8080, "render_timeout_ms": 500}}"#).unwrap();
        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.render_timeout(), Duration::from_millis(500));
    }
}
