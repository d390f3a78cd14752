use thiserror::Error;

/// Errors raised by the barometer driver and its adapter.
#[derive(Error, Debug)]
pub enum Error {
    /// The underlying I2C transaction failed
    #[error("bus error: {0}")]
    Bus(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Something answered at the address, but it is not a BME280
    #[error("unexpected chip id 0x{found:02X} at address 0x{address:02X}")]
    UnexpectedChipId { address: u16, found: u8 },

    /// A live reading was requested before `begin`/`connect`
    #[error("sensor not connected")]
    NotConnected,

    /// Testing mode is on but no value was supplied for the key
    #[error("no simulated value for \"{0}\"")]
    MissingSimulatedValue(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn bus<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Bus(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
