//! I2C interface implementation built on top of `embedded-hal` `I2c`.

use embedded_hal::i2c::{I2c, Operation};

use super::{Bmi270Interface, I2C_ADDRESS_PRIMARY, I2C_ADDRESS_SECONDARY};

/// I2C-based interface implementation for the BMI270 driver.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Creates a new interface talking to the device at `address`.
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Creates an interface for a device with SDO tied low (`0x68`).
    pub const fn primary(i2c: I2C) -> Self {
        Self::new(i2c, I2C_ADDRESS_PRIMARY)
    }

    /// Creates an interface for a device with SDO tied high (`0x69`).
    pub const fn secondary(i2c: I2C) -> Self {
        Self::new(i2c, I2C_ADDRESS_SECONDARY)
    }

    /// Returns the 7-bit device address in use.
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Provides mutable access to the wrapped I2C bus.
    pub fn i2c_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Consumes the interface and returns the owned I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Bmi270Interface for I2cInterface<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        self.i2c.write(self.address, &[register, value])
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

        self.i2c.write_read(self.address, &[register], buf)
    }

    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error> {
        if data.is_empty() {
            return Ok(());
        }

        // Adjacent writes in one transaction go out without a repeated start.
        let command = [register];
        let mut operations = [Operation::Write(&command), Operation::Write(data)];
        self.i2c.transaction(self.address, &mut operations)
    }
}

#[cfg(test)]
mod tests {
    use super::I2cInterface;
    use crate::interface::Bmi270Interface;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x68;

    #[test]
    fn read_many_uses_write_read() {
        let expectations = [I2cTransaction::write_read(ADDR, vec![0x0C], vec![0x01, 0x02])];
        let mut interface = I2cInterface::primary(I2cMock::new(&expectations));

        let mut buffer = [0u8; 2];
        interface.read_many(0x0C, &mut buffer).unwrap();
        assert_eq!(buffer, [0x01, 0x02]);

        interface.release().done();
    }

    #[test]
    fn write_register_sends_address_then_value() {
        let expectations = [I2cTransaction::write(0x69, vec![0x41, 0x03])];
        let mut interface = I2cInterface::secondary(I2cMock::new(&expectations));

        interface.write_register(0x41, 0x03).unwrap();

        interface.release().done();
    }

    #[test]
    fn write_many_bursts_in_one_transaction() {
        let expectations = [
            I2cTransaction::transaction_start(ADDR),
            I2cTransaction::write(ADDR, vec![0x5E]),
            I2cTransaction::write(ADDR, vec![0xC8, 0x2E, 0x00]),
            I2cTransaction::transaction_end(ADDR),
        ];
        let mut interface = I2cInterface::primary(I2cMock::new(&expectations));

        interface.write_many(0x5E, &[0xC8, 0x2E, 0x00]).unwrap();

        interface.release().done();
    }

    #[test]
    fn read_register_propagates_nack() {
        let expectations =
            [I2cTransaction::write_read(ADDR, vec![0x00], vec![0x00]).with_error(ErrorKind::Other)];
        let mut interface = I2cInterface::primary(I2cMock::new(&expectations));

        assert_eq!(interface.read_register(0x00), Err(ErrorKind::Other));

        interface.release().done();
    }

    #[test]
    fn empty_transfers_touch_nothing() {
        let mut interface = I2cInterface::primary(I2cMock::new(&[]));

        interface.read_many(0x0C, &mut []).unwrap();
        interface.write_many(0x5E, &[]).unwrap();

        interface.release().done();
    }
}
