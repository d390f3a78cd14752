//! BME280 barometer for the apogee-detection flight computer.
//!
//! [`VirtualBarometer`] is what flight code talks to. It reads a BME280 over
//! I2C, or in testing mode answers from simulated values.

pub mod barometer;
pub mod bme280;
pub mod bus;
pub mod config;
pub mod error;
pub mod simulation;
pub mod structs;

pub use barometer::VirtualBarometer;
pub use bme280::Bme280;
pub use bus::RegisterBus;
pub use config::Config;
pub use error::{Error, Result};
pub use simulation::{SimulatedValues, SimulationSource};
pub use structs::Sample;
