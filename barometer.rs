//! Flight-computer facing barometer.
//!
//! Wraps the BME280 driver behind three scalar accessors. In testing mode the
//! accessors answer from a [`SimulationSource`] instead and the bus is left
//! alone.

use std::ops::RangeInclusive;

use log::{info, warn};

use crate::bme280::{Bme280, ADDR_BME280};
use crate::bus::RegisterBus;
use crate::error::{Error, Result};
use crate::simulation::{SimulatedValues, SimulationSource, AIR_PRESSURE, AIR_TEMPERATURE, HUMIDITY};

/// °C
pub const TEMPERATURE_RANGE: RangeInclusive<f32> = -40.0..=85.0;
/// Pa
pub const PRESSURE_RANGE: RangeInclusive<f32> = 30000.0..=110000.0;
/// %RH
pub const HUMIDITY_RANGE: RangeInclusive<f32> = 0.0..=100.0;

pub struct VirtualBarometer<B, S = SimulatedValues> {
    sensor: Option<Bme280<B>>,
    simulation: Option<S>,
    address: u16,
}

impl<B: RegisterBus, S: SimulationSource> VirtualBarometer<B, S> {
    pub const MANUFACTURER: &'static str = "Sparkfun";
    pub const NAME: &'static str = "BME280";

    /// Live barometer on `bus`. Call `connect` before reading.
    pub fn new(bus: B) -> Self {
        VirtualBarometer {
            sensor: Some(Bme280::new(bus)),
            simulation: None,
            address: ADDR_BME280,
        }
    }

    /// Testing-mode barometer with no hardware behind it.
    pub fn simulated(source: S) -> Self {
        VirtualBarometer {
            sensor: None,
            simulation: Some(source),
            address: ADDR_BME280,
        }
    }

    pub fn manufacturer(&self) -> &'static str {
        Self::MANUFACTURER
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Address used by the next `connect`, 0x76 unless changed.
    pub fn set_address(&mut self, address: u16) {
        self.address = address;
    }

    pub fn is_testing(&self) -> bool {
        self.simulation.is_some()
    }

    /// `Some` switches to testing mode, `None` back to the live sensor.
    pub fn set_simulation(&mut self, source: Option<S>) {
        self.simulation = source;
    }

    pub fn connect(&mut self) -> Result<()> {
        if self.is_testing() {
            info!("{} {}: testing mode, skipping I2C setup", Self::MANUFACTURER, Self::NAME);
            return Ok(());
        }
        let sensor = self.sensor.as_mut().ok_or(Error::NotConnected)?;
        info!("Starting I2C communication.");
        sensor.set_address(self.address);
        sensor.begin()
    }

    /// Temperature in °C, nominally -40..=85.
    pub fn temperature(&mut self) -> Result<f32> {
        if let Some(value) = self.simulated_reading(AIR_TEMPERATURE)? {
            return Ok(value);
        }
        let value = self.sensor()?.read_temp_c()?;
        Ok(check_range("temperature", value, &TEMPERATURE_RANGE))
    }

    /// Pressure in Pa, nominally 30000..=110000.
    pub fn pressure(&mut self) -> Result<f32> {
        if let Some(value) = self.simulated_reading(AIR_PRESSURE)? {
            return Ok(value);
        }
        let value = self.sensor()?.read_float_pressure()?;
        Ok(check_range("pressure", value, &PRESSURE_RANGE))
    }

    /// Relative humidity in percent, 0..=100.
    pub fn humidity(&mut self) -> Result<f32> {
        if let Some(value) = self.simulated_reading(HUMIDITY)? {
            return Ok(value);
        }
        let value = self.sensor()?.read_float_humidity()?;
        Ok(check_range("humidity", value, &HUMIDITY_RANGE))
    }

    /// `Ok(None)` when not testing.
    fn simulated_reading(&self, key: &str) -> Result<Option<f32>> {
        match &self.simulation {
            Some(source) => source
                .simulated_float(key)
                .map(Some)
                .ok_or_else(|| Error::MissingSimulatedValue(key.to_string())),
            None => Ok(None),
        }
    }

    fn sensor(&mut self) -> Result<&mut Bme280<B>> {
        self.sensor.as_mut().ok_or(Error::NotConnected)
    }
}

fn check_range(what: &str, value: f32, range: &RangeInclusive<f32>) -> f32 {
    if !range.contains(&value) {
        warn!(
            "{} reading {} outside {}..={}",
            what,
            value,
            range.start(),
            range.end()
        );
    }
    value
}
