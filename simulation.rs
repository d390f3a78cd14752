use std::collections::HashMap;

use serde::Deserialize;

pub const AIR_TEMPERATURE: &str = "air_temperature";
pub const AIR_PRESSURE: &str = "air_pressure";
pub const HUMIDITY: &str = "humidity";

/// Supplies stand-in readings while a sensor runs in testing mode.
pub trait SimulationSource {
    fn simulated_float(&self, key: &str) -> Option<f32>;
}

/// Fixed simulated readings keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SimulatedValues {
    values: HashMap<String, f32>,
}

impl SimulatedValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: f32) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: f32) {
        self.values.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SimulationSource for SimulatedValues {
    fn simulated_float(&self, key: &str) -> Option<f32> {
        self.values.get(key).copied()
    }
}
