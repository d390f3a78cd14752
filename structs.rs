// Compensation words read from 0x88..0xA1 and 0xE1..0xE7, already sign-extended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibParams {
    pub temperature: [i32; 3],
    pub pressure: [i32; 9],
    pub humidity: [i32; 6],
}

// Raw ADC values from one 0xF7..0xFE burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvData {
    pub temperature: u32,
    pub pressure: u32,
    pub humidity: u32,
}

/// One compensated measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// °C
    pub temperature: f32,
    /// Pa
    pub pressure: f32,
    /// %RH
    pub humidity: f32,
}

fn le_u16(lo: u8, hi: u8) -> i32 {
    u16::from_le_bytes([lo, hi]) as i32
}

fn le_i16(lo: u8, hi: u8) -> i32 {
    i16::from_le_bytes([lo, hi]) as i32
}

impl CalibParams {
    /// `calib00` holds 0x88..=0xA1 (0xA0 unused), `calib26` holds 0xE1..=0xE7.
    pub fn from_registers(calib00: &[u8; 26], calib26: &[u8; 7]) -> Self {
        let c = calib00;
        let temperature = [
            le_u16(c[0], c[1]),
            le_i16(c[2], c[3]),
            le_i16(c[4], c[5]),
        ];

        let mut pressure = [0i32; 9];
        pressure[0] = le_u16(c[6], c[7]);
        for n in 1..9 {
            pressure[n] = le_i16(c[6 + 2 * n], c[7 + 2 * n]);
        }

        let h = calib26;
        // H4 and H5 are 12-bit signed values sharing the nibbles of 0xE5
        let humidity = [
            c[25] as i32,
            le_i16(h[0], h[1]),
            h[2] as i32,
            ((h[3] as i8 as i32) << 4) | (h[4] & 0x0F) as i32,
            ((h[5] as i8 as i32) << 4) | (h[4] >> 4) as i32,
            h[6] as i8 as i32,
        ];

        CalibParams {
            temperature,
            pressure,
            humidity,
        }
    }
}

impl EnvData {
    pub fn from_burst(data: &[u8; 8]) -> Self {
        let d = data.map(u32::from);
        EnvData {
            pressure: (d[0] << 12) | (d[1] << 4) | (d[2] >> 4),
            temperature: (d[3] << 12) | (d[4] << 4) | (d[5] >> 4),
            humidity: (d[6] << 8) | d[7],
        }
    }
}
