use std::time::Duration;

use thiserror::Error;

/// Failure reported by a [`LightDriver`](crate::drivers::LightDriver).
#[derive(Error, Debug)]
pub enum HardwareError {
    #[error("Light hardware is disconnected: {0}")]
    Disconnected(String),
    #[error("Light hardware I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Light hardware did not respond within {0:?}")]
    Timeout(Duration),
}

#[derive(Error, Debug)]
pub enum LightError {
    #[error("Invalid {characteristic} value {value}: expected {expected}")]
    InvalidArgument {
        characteristic: &'static str,
        value: f64,
        expected: &'static str,
    },
    #[error(transparent)]
    Hardware(#[from] HardwareError),
}

impl LightError {
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, LightError::InvalidArgument { .. })
    }
}
