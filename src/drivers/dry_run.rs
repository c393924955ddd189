use async_trait::async_trait;
use rgb::RGB8;
use tracing::info;

use super::LightDriver;
use crate::error::HardwareError;

/// Driver used when no light hardware is attached; it only logs.
#[derive(Debug, Default)]
pub struct DryRunDriver {
    frames: u64,
}

impl DryRunDriver {
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[async_trait]
impl LightDriver for DryRunDriver {
    async fn display(&mut self, rgb: RGB8) -> Result<(), HardwareError> {
        self.frames += 1;
        info!(
            frame = self.frames,
            "Dry run display: #{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_frames() {
        let mut driver = DryRunDriver::default();
        driver.display(RGB8::new(0, 0, 0)).await.unwrap();
        driver.display(RGB8::new(10, 20, 30)).await.unwrap();
        assert_eq!(driver.frames(), 2);
    }
}
