use rppal::i2c::I2c;

/// Register-level access to a device on an I2C bus.
pub trait RegisterBus {
    type Error: std::error::Error + Send + Sync + 'static;

    fn set_address(&mut self, address: u16) -> Result<(), Self::Error>;

    fn read_register(&mut self, register: u8) -> Result<u8, Self::Error>;

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;

    /// Reads `buf.len()` consecutive registers starting at `start`.
    ///
    /// The default issues one transaction per register, so the device may
    /// update the registers between bytes. Buses that can do a multi-byte
    /// read in a single transaction should override it.
    fn read_registers(&mut self, start: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        for (n, byte) in buf.iter_mut().enumerate() {
            *byte = self.read_register(start.wrapping_add(n as u8))?;
        }
        Ok(())
    }
}

impl RegisterBus for I2c {
    type Error = rppal::i2c::Error;

    fn set_address(&mut self, address: u16) -> Result<(), Self::Error> {
        self.set_slave_address(address)
    }

    fn read_register(&mut self, register: u8) -> Result<u8, Self::Error> {
        self.smbus_read_byte(register)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.smbus_write_byte(register, value)
    }

    // Register pointer write plus repeated-start read: one transaction, so the
    // BME280 keeps the data registers locked for the whole burst.
    fn read_registers(&mut self, start: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.write_read(&[start], buf)
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::RegisterBus;
    use std::cell::Cell;
    use std::rc::Rc;

    const DATA_START: u8 = 0xF7;

    /// In-memory register file. Transaction count is shared so a test can
    /// keep watching it after the bus has been moved into a driver.
    ///
    /// `pending` is a conversion the device finishes right after the next
    /// read that touches the data registers (0xF7 and up). Block reads are a
    /// single transaction.
    pub struct MockBus {
        pub registers: [u8; 256],
        pub address: Option<u16>,
        pub writes: Vec<(u8, u8)>,
        pub transactions: Rc<Cell<usize>>,
        pub fail: bool,
        pub pending: Option<(u8, Vec<u8>)>,
    }

    impl MockBus {
        pub fn new() -> Self {
            MockBus {
                registers: [0; 256],
                address: None,
                writes: Vec::new(),
                transactions: Rc::new(Cell::new(0)),
                fail: false,
                pending: None,
            }
        }

        pub fn load(&mut self, start: u8, bytes: &[u8]) {
            let start = start as usize;
            self.registers[start..start + bytes.len()].copy_from_slice(bytes);
        }

        fn convert(&mut self, register: u8) {
            if register < DATA_START {
                return;
            }
            if let Some((start, bytes)) = self.pending.take() {
                self.load(start, &bytes);
            }
        }

        fn touch(&self) -> Result<(), std::io::Error> {
            self.transactions.set(self.transactions.get() + 1);
            if self.fail {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "nack"));
            }
            Ok(())
        }
    }

    impl RegisterBus for MockBus {
        type Error = std::io::Error;

        fn set_address(&mut self, address: u16) -> Result<(), Self::Error> {
            self.touch()?;
            self.address = Some(address);
            Ok(())
        }

        fn read_register(&mut self, register: u8) -> Result<u8, Self::Error> {
            self.touch()?;
            let value = self.registers[register as usize];
            self.convert(register);
            Ok(value)
        }

        fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
            self.touch()?;
            self.writes.push((register, value));
            self.registers[register as usize] = value;
            Ok(())
        }

        fn read_registers(&mut self, start: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
            self.touch()?;
            let from = start as usize;
            buf.copy_from_slice(&self.registers[from..from + buf.len()]);
            self.convert(start);
            Ok(())
        }
    }

    /// Register file that only implements the required methods.
    struct ByteBus(MockBus);

    impl RegisterBus for ByteBus {
        type Error = std::io::Error;

        fn set_address(&mut self, address: u16) -> Result<(), Self::Error> {
            self.0.set_address(address)
        }

        fn read_register(&mut self, register: u8) -> Result<u8, Self::Error> {
            self.0.read_register(register)
        }

        fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
            self.0.write_register(register, value)
        }
    }

    #[test]
    fn default_block_read_walks_consecutive_registers() {
        let mut bus = ByteBus(MockBus::new());
        bus.0.load(0xF7, &[1, 2, 3, 4]);
        let mut buf = [0u8; 4];
        bus.read_registers(0xF7, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
        assert_eq!(bus.0.transactions.get(), 4);
    }

    #[test]
    fn default_block_read_can_straddle_a_conversion() {
        let mut bus = ByteBus(MockBus::new());
        bus.0.load(0xF7, &[1, 2, 3, 4]);
        bus.0.pending = Some((0xF8, vec![9, 9]));
        let mut buf = [0u8; 4];
        bus.read_registers(0xF7, &mut buf).unwrap();
        assert_eq!(buf, [1, 9, 9, 4]);
    }

    #[test]
    fn burst_read_is_one_transaction() {
        let mut bus = MockBus::new();
        bus.load(0xF7, &[1, 2, 3, 4]);
        bus.pending = Some((0xF8, vec![9, 9]));
        let mut buf = [0u8; 4];
        bus.read_registers(0xF7, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
        assert_eq!(bus.transactions.get(), 1);
        assert_eq!(bus.registers[0xF8], 9);
    }
}
