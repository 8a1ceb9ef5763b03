//! SPI interface implementation built on top of `embedded-hal` `SpiDevice`.

use embedded_hal::spi::{Operation, SpiDevice};

use super::Bmi270Interface;
use crate::registers::REG_CHIP_ID;

/// SPI-based interface implementation for the BMI270 driver.
///
/// Reads are answered with one dummy byte before the register payload.
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiInterface<SPI> {
    /// Creates a new interface from the provided SPI device abstraction.
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Builds the command byte used to address registers over SPI.
    fn command_byte(register: u8, is_read: bool) -> u8 {
        let mut command = register & 0x7F;
        if is_read {
            command |= 0x80;
        }
        command
    }

    /// Provides mutable access to the wrapped SPI device.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the interface and returns the owned SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Bmi270Interface for SpiInterface<SPI>
where
    SPI: SpiDevice,
{
    type Error = SPI::Error;

    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        self.write_many(register, core::slice::from_ref(&value))
    }

    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.read_many(register, &mut value)?;
        Ok(value[0])
    }

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }

        let command = [Self::command_byte(register, true)];
        let mut dummy = [0u8; 1];
        let mut operations = [
            Operation::Write(&command),
            Operation::Read(&mut dummy),
            Operation::Read(buf),
        ];
        self.spi.transaction(&mut operations)
    }

    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error> {
        if data.is_empty() {
            return Ok(());
        }

        let command = [Self::command_byte(register, false)];
        let mut operations = [Operation::Write(&command), Operation::Write(data)];
        self.spi.transaction(&mut operations)
    }

    /// A rising CSB edge after power-up switches the device from I2C to SPI.
    fn activate(&mut self) -> core::result::Result<(), Self::Error> {
        self.read_register(REG_CHIP_ID).map(|_| ())
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use core::convert::Infallible;
    use embedded_hal::spi::{ErrorType, Operation, SpiDevice};

    pub(crate) struct MockDevice<'a> {
        expectations: &'a [TransactionExpectation<'a>],
        index: usize,
    }

    impl<'a> MockDevice<'a> {
        pub(crate) fn new(expectations: &'a [TransactionExpectation<'a>]) -> Self {
            Self { expectations, index: 0 }
        }
    }

    impl<'a> Drop for MockDevice<'a> {
        fn drop(&mut self) {
            assert_eq!(
                self.index,
                self.expectations.len(),
                "not all SPI expectations consumed"
            );
        }
    }

    impl<'a> ErrorType for MockDevice<'a> {
        type Error = Infallible;
    }

    fn expect_command(operation: &Operation<'_, u8>, command: u8) {
        match operation {
            Operation::Write(data) => {
                assert_eq!(data.len(), 1, "command length mismatch");
                assert_eq!(data[0], command, "command byte mismatch");
            }
            _ => panic!("first operation must be write"),
        }
    }

    impl<'a> SpiDevice for MockDevice<'a> {
        fn transaction<'b>(
            &mut self,
            operations: &mut [Operation<'b, u8>],
        ) -> Result<(), Self::Error> {
            let expected = self
                .expectations
                .get(self.index)
                .expect("unexpected SPI transaction");
            self.index += 1;

            match *expected {
                TransactionExpectation::Read { command, response } => {
                    assert_eq!(operations.len(), 3, "expected write+dummy+read operations");
                    expect_command(&operations[0], command);

                    match &mut operations[1] {
                        Operation::Read(dummy) => {
                            assert_eq!(dummy.len(), 1, "dummy byte length mismatch");
                            dummy[0] = 0xFF;
                        }
                        _ => panic!("second operation must be dummy read"),
                    }

                    match &mut operations[2] {
                        Operation::Read(buf) => {
                            assert_eq!(buf.len(), response.len(), "response length mismatch");
                            buf.copy_from_slice(response);
                        }
                        _ => panic!("third operation must be read"),
                    }
                }
                TransactionExpectation::Write { command, payload } => {
                    assert_eq!(operations.len(), 2, "expected write+write operations");
                    expect_command(&operations[0], command);

                    match &operations[1] {
                        Operation::Write(data) => {
                            assert_eq!(*data, payload, "payload mismatch");
                        }
                        _ => panic!("second operation must be write"),
                    }
                }
            }

            Ok(())
        }
    }

    #[derive(Clone, Copy)]
    pub(crate) enum TransactionExpectation<'a> {
        Read { command: u8, response: &'a [u8] },
        Write { command: u8, payload: &'a [u8] },
    }
}

#[cfg(test)]
mod tests {
    use super::SpiInterface;
    use super::mock::{MockDevice, TransactionExpectation};
    use crate::interface::Bmi270Interface;

    #[test]
    fn read_many_sets_read_bit_and_skips_dummy_byte() {
        let expectations = [TransactionExpectation::Read {
            command: 0x8C,
            response: &[0xAA, 0x55],
        }];
        let mut interface = SpiInterface::new(MockDevice::new(&expectations));

        let mut buffer = [0u8; 2];
        interface.read_many(0x0C, &mut buffer).unwrap();
        assert_eq!(buffer, [0xAA, 0x55]);
    }

    #[test]
    fn write_many_clears_read_bit() {
        let expectations = [TransactionExpectation::Write {
            command: 0x5E,
            payload: &[0x12, 0x34, 0x56],
        }];
        let mut interface = SpiInterface::new(MockDevice::new(&expectations));

        interface.write_many(0x5E, &[0x12, 0x34, 0x56]).unwrap();
    }

    #[test]
    fn write_register_reuses_write_many() {
        let expectations = [TransactionExpectation::Write {
            command: 0x7E,
            payload: &[0xB6],
        }];
        let mut interface = SpiInterface::new(MockDevice::new(&expectations));

        interface.write_register(0x7E, 0xB6).unwrap();
    }

    #[test]
    fn activate_performs_dummy_chip_id_read() {
        let expectations = [TransactionExpectation::Read {
            command: 0x80,
            response: &[0x24],
        }];
        let mut interface = SpiInterface::new(MockDevice::new(&expectations));

        interface.activate().unwrap();
    }

    #[test]
    fn empty_transfers_are_skipped() {
        let expectations: [TransactionExpectation; 0] = [];
        let mut interface = SpiInterface::new(MockDevice::new(&expectations));

        interface.read_many(0x0C, &mut []).unwrap();
        interface.write_many(0x5E, &[]).unwrap();
    }
}
