//! Counters shared between the control handlers and the status endpoint.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;

use crate::error::LightError;

#[derive(Debug)]
struct ControlStatsInner {
    start_time: Instant,
    writes: u64,
    rejected_writes: u64,
    render_failures: u64,
    last_error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ControlStats {
    inner: Arc<RwLock<ControlStatsInner>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlSummary {
    pub uptime_seconds: u64,
    pub writes: u64,
    pub rejected_writes: u64,
    pub render_failures: u64,
    pub last_error: Option<String>,
}

impl Default for ControlStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlStats {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(ControlStatsInner {
                start_time: Instant::now(),
                writes: 0,
                rejected_writes: 0,
                render_failures: 0,
                last_error: None,
            })),
        }
    }

    pub fn start_time(&self) -> Instant {
        self.inner.read().start_time
    }

    pub fn record(&self, result: &Result<(), LightError>) {
        let mut inner = self.inner.write();
        inner.writes += 1;
        match result {
            Ok(()) => {}
            Err(e @ LightError::InvalidArgument { .. }) => {
                inner.rejected_writes += 1;
                inner.last_error = Some(e.to_string());
            }
            Err(e @ LightError::Hardware(_)) => {
                inner.render_failures += 1;
                inner.last_error = Some(e.to_string());
            }
        }
    }

    pub fn summary(&self) -> ControlSummary {
        let inner = self.inner.read();
        ControlSummary {
            uptime_seconds: inner.start_time.elapsed().as_secs(),
            writes: inner.writes,
            rejected_writes: inner.rejected_writes,
            render_failures: inner.render_failures,
            last_error: inner.last_error.clone(),
        }
    }
}
