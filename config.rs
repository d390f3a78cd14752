//! Barometer configuration.
//!
//! Read from a TOML file (`config/barometer.toml` unless another path is
//! given). A missing file means defaults. `APOGEE_BARO_TESTING` overrides the
//! `[testing] enabled` flag.

use std::{env, fs, io, path::Path};

use log::warn;
use serde::Deserialize;

use crate::bme280::ADDR_BME280;
use crate::error::{Error, Result};
use crate::simulation::SimulatedValues;

pub const DEFAULT_PATH: &str = "config/barometer.toml";
pub const TESTING_ENV: &str = "APOGEE_BARO_TESTING";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `/dev/i2c-N`
    pub bus: u8,
    pub address: u16,
    /// Answer from `simulated` instead of the sensor.
    pub testing: bool,
    pub simulated: SimulatedValues,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bus: 1,
            address: ADDR_BME280,
            testing: false,
            simulated: SimulatedValues::default(),
        }
    }
}

#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    sensor: RawSensor,
    #[serde(default)]
    testing: RawTesting,
}

#[derive(Deserialize)]
struct RawSensor {
    #[serde(default = "default_bus")]
    bus: u8,
    #[serde(default = "default_address")]
    address: u16,
}

impl Default for RawSensor {
    fn default() -> Self {
        RawSensor {
            bus: default_bus(),
            address: default_address(),
        }
    }
}

#[derive(Deserialize, Default)]
struct RawTesting {
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    values: SimulatedValues,
}

fn default_bus() -> u8 {
    1
}

fn default_address() -> u16 {
    ADDR_BME280
}

impl Config {
    /// Loads `path`, then applies the environment override.
    pub fn load(path: &Path) -> Result<Config> {
        let mut config = Config::from_file(path)?;
        config.apply_testing_override(env::var(TESTING_ENV).ok().as_deref())?;
        if config.testing && config.simulated.is_empty() {
            warn!("testing mode enabled but no simulated values configured");
        }
        Ok(config)
    }

    /// File only, no environment. A missing file gives defaults.
    pub fn from_file(path: &Path) -> Result<Config> {
        match fs::read_to_string(path) {
            Ok(text) => Config::from_toml(&text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn from_toml(text: &str) -> Result<Config> {
        let raw: RawConfig = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        Ok(Config {
            bus: raw.sensor.bus,
            address: raw.sensor.address,
            testing: raw.testing.enabled,
            simulated: raw.testing.values,
        })
    }

    fn apply_testing_override(&mut self, value: Option<&str>) -> Result<()> {
        let value = match value {
            Some(v) => v.trim(),
            None => return Ok(()),
        };
        self.testing = match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                return Err(Error::Config(format!(
                    "{} must be a boolean, got {:?}",
                    TESTING_ENV, value
                )))
            }
        };
        Ok(())
    }
}
