use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::accessories::characteristic::Characteristic;
use crate::accessories::state::light::{LightSnapshot, LightState};
use crate::drivers::LightDriver;
use crate::error::LightError;
use crate::metrics::Metrics;

/// A lightbulb accessory exposing On, Hue, Saturation and Brightness.
///
/// Writes to the same light are serialized by one async mutex, so a
/// read-modify-render sequence never interleaves with another write.
/// Separate accessories never wait on each other.
pub struct LightbulbAccessory<D: LightDriver> {
    name: String,
    state: Arc<Mutex<LightState<D>>>,
    program_mode: Arc<AtomicU8>,
    // Copy of the state's flag, readable while a render holds the lock.
    hardware_synced: Arc<AtomicBool>,
}

impl<D: LightDriver> Clone for LightbulbAccessory<D> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            state: self.state.clone(),
            program_mode: self.program_mode.clone(),
            hardware_synced: self.hardware_synced.clone(),
        }
    }
}

impl<D: LightDriver> LightbulbAccessory<D> {
    pub fn new(name: impl Into<String>, state: LightState<D>) -> Self {
        let name = name.into();
        info!("Created lightbulb accessory {name}");
        Metrics::set_power(state.power());
        Self {
            name,
            hardware_synced: Arc::new(AtomicBool::new(state.hardware_synced())),
            state: Arc::new(Mutex::new(state)),
            program_mode: Arc::new(AtomicU8::new(0)),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub async fn apply(&self, write: Characteristic) -> Result<(), LightError> {
        let mut state = self.state.lock().await;
        self.apply_locked(&mut state, write).await
    }

    /// Applies a burst of writes in order without releasing the light in
    /// between. A failed write does not stop the following ones.
    pub async fn apply_all(&self, writes: &[Characteristic]) -> Vec<Result<(), LightError>> {
        let mut state = self.state.lock().await;
        let mut results = Vec::with_capacity(writes.len());
        for write in writes {
            results.push(self.apply_locked(&mut state, *write).await);
        }
        results
    }

    pub async fn snapshot(&self) -> LightSnapshot {
        self.state.lock().await.snapshot()
    }

    pub fn program_mode(&self) -> u8 {
        self.program_mode.load(Ordering::Acquire)
    }

    /// Whether the last rendered color reached the hardware. Never waits
    /// for a render in progress.
    pub fn hardware_synced(&self) -> bool {
        self.hardware_synced.load(Ordering::Acquire)
    }

    async fn apply_locked(
        &self,
        state: &mut LightState<D>,
        write: Characteristic,
    ) -> Result<(), LightError> {
        Metrics::inc_writes(write.name());
        debug!("Lightbulb {}: {write:?}", self.name);

        let result = match write {
            Characteristic::On(on) => state.set_power(on).await,
            Characteristic::Hue(value) => state.set_hue(value).await,
            Characteristic::Saturation(value) => state.set_saturation(value).await,
            Characteristic::Brightness(value) => state.set_brightness(value).await,
            Characteristic::ProgramMode(mode) => {
                info!("Lightbulb {}: program mode set to {mode}, ignored", self.name);
                self.program_mode.store(mode, Ordering::Release);
                Ok(())
            }
        };

        match &result {
            Err(e @ LightError::InvalidArgument { .. }) => {
                warn!("Lightbulb {}: rejected {}: {e}", self.name, write.name());
                Metrics::inc_invalid_writes(write.name());
            }
            Err(LightError::Hardware(_)) => Metrics::inc_render_failures(),
            Ok(()) => {}
        }
        self.hardware_synced
            .store(state.hardware_synced(), Ordering::Release);
        Metrics::set_power(state.power());
        result
    }
}
