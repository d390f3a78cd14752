use log::debug;

use crate::bus::RegisterBus;
use crate::error::{Error, Result};
use crate::structs::{CalibParams, EnvData, Sample};

// BME280 I2C default slave address (SDO to GND).
pub const ADDR_BME280: u16 = 0x76;
// SDO to VDDIO.
pub const ADDR_BME280_ALT: u16 = 0x77;

pub const CHIP_ID_BME280: u8 = 0x60;

// BME280 register addresses.
// cf. https://trac.switch-science.com/wiki/BME280
const REG_CHIP_ID: u8 = 0xD0;
const REG_CTRL_HUM: u8 = 0xF2;
const REG_CTRL_MEAS: u8 = 0xF4;
const REG_CONFIG: u8 = 0xF5;
const REG_CALIB_00: u8 = 0x88;
const REG_CALIB_26: u8 = 0xE1;
const REG_CALIB_00_LEN: usize = 26;
const REG_CALIB_26_LEN: usize = 7;
const REG_ADC_VALUE: u8 = 0xF7;
const REG_ADC_VALUE_LEN: usize = 8;

pub const MODE_SLEEP: u8 = 0;
pub const MODE_NORMAL: u8 = 3;

/// Register-level measurement settings, written by `begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Temperature oversampling code (1 = x1)
    pub osrs_t: u8,
    /// Pressure oversampling code
    pub osrs_p: u8,
    /// Humidity oversampling code
    pub osrs_h: u8,
    pub mode: u8,
    /// Standby code (0 = 0.5 ms, 5 = 1000 ms)
    pub t_sb: u8,
    /// IIR filter code (0 = off)
    pub filter: u8,
    pub spi3w_en: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            osrs_t: 1,
            osrs_p: 1,
            osrs_h: 1,
            mode: MODE_NORMAL,
            t_sb: 0,
            filter: 0,
            spi3w_en: 0,
        }
    }
}

impl Settings {
    fn ctrl_hum(&self) -> u8 {
        self.osrs_h & 0x07
    }

    fn ctrl_meas(&self, mode: u8) -> u8 {
        ((self.osrs_t & 0x07) << 5) | ((self.osrs_p & 0x07) << 2) | (mode & 0x03)
    }

    fn config(&self) -> u8 {
        ((self.t_sb & 0x07) << 5) | ((self.filter & 0x07) << 2) | (self.spi3w_en & 0x01)
    }
}

/// BME280 temperature, pressure and humidity sensor.
pub struct Bme280<B> {
    bus: B,
    address: u16,
    settings: Settings,
    calib: Option<CalibParams>,
}

impl<B: RegisterBus> Bme280<B> {
    pub fn new(bus: B) -> Self {
        Self::with_settings(bus, Settings::default())
    }

    pub fn with_settings(bus: B, settings: Settings) -> Self {
        Bme280 {
            bus,
            address: ADDR_BME280,
            settings,
            calib: None,
        }
    }

    /// Takes effect on the next `begin`.
    pub fn set_address(&mut self, address: u16) {
        self.address = address;
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_connected(&self) -> bool {
        self.calib.is_some()
    }

    pub fn calibration(&self) -> Option<&CalibParams> {
        self.calib.as_ref()
    }

    /// Selects the device, checks its id, loads the trimming words and
    /// starts measuring with the configured settings.
    pub fn begin(&mut self) -> Result<()> {
        self.calib = None;
        self.bus.set_address(self.address).map_err(Error::bus)?;

        let id = self.bus.read_register(REG_CHIP_ID).map_err(Error::bus)?;
        if id != CHIP_ID_BME280 {
            return Err(Error::UnexpectedChipId {
                address: self.address,
                found: id,
            });
        }

        let calib = self.read_calib()?;
        debug!("bme280 calibration: {:?}", calib);

        // config is only honoured in sleep mode, ctrl_hum only after a ctrl_meas write
        let settings = self.settings;
        self.write(REG_CTRL_MEAS, settings.ctrl_meas(MODE_SLEEP))?;
        self.write(REG_CONFIG, settings.config())?;
        self.write(REG_CTRL_HUM, settings.ctrl_hum())?;
        self.write(REG_CTRL_MEAS, settings.ctrl_meas(settings.mode))?;

        self.calib = Some(calib);
        Ok(())
    }

    /// One burst read, compensated in full.
    pub fn read_sample(&mut self) -> Result<Sample> {
        let (calib, raw) = self.read_raw()?;
        let (temperature, t_fine) = compute_temperature(calib.temperature, raw.temperature);
        Ok(Sample {
            temperature,
            pressure: compute_pressure(calib.pressure, raw.pressure, t_fine),
            humidity: compute_humidity(calib.humidity, raw.humidity, t_fine),
        })
    }

    pub fn read_temp_c(&mut self) -> Result<f32> {
        let (calib, raw) = self.read_raw()?;
        Ok(compute_temperature(calib.temperature, raw.temperature).0)
    }

    pub fn read_temp_f(&mut self) -> Result<f32> {
        Ok(self.read_temp_c()? * 9.0 / 5.0 + 32.0)
    }

    /// Pascals.
    pub fn read_float_pressure(&mut self) -> Result<f32> {
        let (calib, raw) = self.read_raw()?;
        let (_, t_fine) = compute_temperature(calib.temperature, raw.temperature);
        Ok(compute_pressure(calib.pressure, raw.pressure, t_fine))
    }

    /// Percent relative humidity.
    pub fn read_float_humidity(&mut self) -> Result<f32> {
        let (calib, raw) = self.read_raw()?;
        let (_, t_fine) = compute_temperature(calib.temperature, raw.temperature);
        Ok(compute_humidity(calib.humidity, raw.humidity, t_fine))
    }

    pub fn release(self) -> B {
        self.bus
    }

    fn write(&mut self, register: u8, value: u8) -> Result<()> {
        self.bus.write_register(register, value).map_err(Error::bus)
    }

    fn read_calib(&mut self) -> Result<CalibParams> {
        // 0x88 - 0xA1
        let mut calib00 = [0u8; REG_CALIB_00_LEN];
        self.bus
            .read_registers(REG_CALIB_00, &mut calib00)
            .map_err(Error::bus)?;
        // 0xE1 - 0xE7
        let mut calib26 = [0u8; REG_CALIB_26_LEN];
        self.bus
            .read_registers(REG_CALIB_26, &mut calib26)
            .map_err(Error::bus)?;
        Ok(CalibParams::from_registers(&calib00, &calib26))
    }

    fn read_raw(&mut self) -> Result<(CalibParams, EnvData)> {
        let calib = self.calib.ok_or(Error::NotConnected)?;
        // 0xF7 - 0xFE
        let mut data = [0u8; REG_ADC_VALUE_LEN];
        self.bus
            .read_registers(REG_ADC_VALUE, &mut data)
            .map_err(Error::bus)?;
        let raw = EnvData::from_burst(&data);
        debug!("bme280 raw: {:?}", raw);
        Ok((calib, raw))
    }
}

/// Returns °C and the `t_fine` carry used by the other two compensations.
pub fn compute_temperature(calib_params: [i32; 3], raw_value: u32) -> (f32, i32) {
    let raw = raw_value as f64;
    let t1 = calib_params[0] as f64;
    let v1 = (raw / 16384.0 - t1 / 1024.0) * calib_params[1] as f64;
    let v2 = (raw / 131072.0 - t1 / 8192.0)
        * (raw / 131072.0 - t1 / 8192.0)
        * calib_params[2] as f64;
    (((v1 + v2) / 5120.0) as f32, (v1 + v2) as i32)
}

/// Returns Pa, or 0 when the trimming words would divide by zero.
pub fn compute_pressure(calib_params: [i32; 9], raw_value: u32, t_fine: i32) -> f32 {
    let p = calib_params.map(f64::from);
    let mut v1 = t_fine as f64 / 2.0 - 64000.0;
    let mut v2 = v1 * v1 * p[5] / 32768.0;
    v2 += v1 * p[4] * 2.0;
    v2 = v2 / 4.0 + p[3] * 65536.0;
    v1 = (p[2] * v1 * v1 / 524288.0 + p[1] * v1) / 524288.0;
    v1 = (1.0 + v1 / 32768.0) * p[0];
    if v1 == 0.0 {
        return 0.0;
    }
    let mut pressure = 1048576.0 - raw_value as f64;
    pressure = (pressure - v2 / 4096.0) * 6250.0 / v1;
    v1 = p[8] * pressure * pressure / 2147483648.0;
    v2 = pressure * p[7] / 32768.0;
    (pressure + (v1 + v2 + p[6]) / 16.0) as f32
}

/// Returns %RH clamped to 0..=100.
pub fn compute_humidity(calib_params: [i32; 6], raw_value: u32, t_fine: i32) -> f32 {
    let c = calib_params.map(f64::from);
    let mut h = t_fine as f64 - 76800.0;
    h = (raw_value as f64 - (c[3] * 64.0 + c[4] / 16384.0 * h))
        * (c[1] / 65536.0 * (1.0 + c[5] / 67108864.0 * h * (1.0 + c[2] / 67108864.0 * h)));
    h *= 1.0 - c[0] * h / 524288.0;
    h.max(0.0).min(100.0) as f32
}

/// International barometric formula, metres above the `sea_level_pa` reference.
pub fn altitude_meters(pressure_pa: f32, sea_level_pa: f32) -> f32 {
    44330.0 * (1.0 - (pressure_pa / sea_level_pa).powf(1.0 / 5.255))
}
