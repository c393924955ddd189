pub mod accessories;
pub mod color;
pub mod drivers;
pub mod error;
pub mod logging;
pub mod metrics;
mod runtime;
pub mod settings;
pub mod web;

pub use runtime::start_accessory;
