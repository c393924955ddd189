mod characteristic;
mod lightbulb;
mod state;

pub use characteristic::Characteristic;
pub use lightbulb::LightbulbAccessory;
pub use state::light::{DEFAULT_RENDER_TIMEOUT, LightSnapshot, LightState};
