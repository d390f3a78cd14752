use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;
use rppal::i2c::I2c;

use apogee_baro::config::{self, Config};
use apogee_baro::{SimulatedValues, VirtualBarometer};

fn build_barometer(config: &Config) -> Result<VirtualBarometer<I2c, SimulatedValues>> {
    if config.testing {
        return Ok(VirtualBarometer::simulated(config.simulated.clone()));
    }
    let i2c = I2c::with_bus(config.bus)
        .with_context(|| format!("opening /dev/i2c-{}", config.bus))?;
    let mut baro = VirtualBarometer::new(i2c);
    baro.set_address(config.address);
    Ok(baro)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_PATH));
    let config = Config::load(&path).with_context(|| format!("loading {}", path.display()))?;
    info!(
        "bus {} address 0x{:02X} testing {}",
        config.bus, config.address, config.testing
    );

    let mut baro = build_barometer(&config)?;
    info!("{} {}", baro.manufacturer(), baro.name());
    baro.connect().context("connecting to barometer")?;

    let t = baro.temperature()?;
    println!("Temperature: {:.2} C", t);
    let h = baro.humidity()?;
    println!("Humidity: {:.2} %", h);
    let p = baro.pressure()?;
    println!("Pressure: {:.2} Pa", p);

    Ok(())
}
