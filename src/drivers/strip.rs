use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rgb::RGB8;
use serde::{Deserialize, Serialize};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::LightDriver;
use crate::error::HardwareError;

/// Byte order of a pixel on the wire. Most WS2812 strips expect GRB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelOrder {
    Rgb,
    #[default]
    Grb,
}

impl PixelOrder {
    fn encode(self, pixel: RGB8) -> [u8; 3] {
        match self {
            PixelOrder::Rgb => [pixel.r, pixel.g, pixel.b],
            PixelOrder::Grb => [pixel.g, pixel.r, pixel.b],
        }
    }
}

/// Addressable LED strip fed through a frame device.
///
/// Every pixel of the strip is set to the same color, the whole frame is
/// written to the device and then latched with [`StripDriver::show`].
#[derive(Debug)]
pub struct StripDriver {
    device: PathBuf,
    order: PixelOrder,
    pixels: Vec<RGB8>,
}

impl StripDriver {
    pub fn new(device: impl AsRef<Path>, led_count: usize, order: PixelOrder) -> Self {
        Self {
            device: device.as_ref().to_path_buf(),
            order,
            pixels: vec![RGB8::default(); led_count],
        }
    }

    pub fn pixels(&self) -> &[RGB8] {
        &self.pixels
    }

    fn fill(&mut self, rgb: RGB8) {
        self.pixels.fill(rgb);
    }

    fn frame(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|pixel| self.order.encode(*pixel))
            .collect()
    }

    async fn write_pixels(&self) -> Result<File, HardwareError> {
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.device)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => HardwareError::Disconnected(format!(
                    "LED strip device {} not found",
                    self.device.display()
                )),
                _ => HardwareError::Io(e),
            })?;
        file.write_all(&self.frame()).await?;
        Ok(file)
    }

    /// Pushes the written frame out to the LEDs.
    async fn show(&self, mut file: File) -> Result<(), HardwareError> {
        file.flush().await?;
        debug!(
            "Showed {} pixels on {}",
            self.pixels.len(),
            self.device.display()
        );
        Ok(())
    }
}

#[async_trait]
impl LightDriver for StripDriver {
    async fn display(&mut self, rgb: RGB8) -> Result<(), HardwareError> {
        self.fill(rgb);
        let file = self.write_pixels().await?;
        self.show(file).await
    }
}
