use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};

/// A write to one characteristic of the lightbulb service.
///
/// Encoded as `{"characteristic": "Hue", "value": 120}`. `On` also accepts
/// the integer form `0`/`1` some controllers send.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "characteristic", content = "value")]
pub enum Characteristic {
    #[serde(deserialize_with = "deserialize_power")]
    On(bool),
    Hue(f64),
    Saturation(f64),
    Brightness(f64),
    /// Accepted for compatibility, has no effect on the light.
    ProgramMode(u8),
}

impl Characteristic {
    pub fn name(&self) -> &'static str {
        match self {
            Characteristic::On(_) => "On",
            Characteristic::Hue(_) => "Hue",
            Characteristic::Saturation(_) => "Saturation",
            Characteristic::Brightness(_) => "Brightness",
            Characteristic::ProgramMode(_) => "ProgramMode",
        }
    }
}

fn deserialize_power<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PowerValue {
        Bool(bool),
        Int(u64),
    }

    match PowerValue::deserialize(deserializer)? {
        PowerValue::Bool(on) => Ok(on),
        PowerValue::Int(0) => Ok(false),
        PowerValue::Int(1) => Ok(true),
        PowerValue::Int(other) => Err(de::Error::invalid_value(
            Unexpected::Unsigned(other),
            &"a boolean, 0 or 1",
        )),
    }
}
