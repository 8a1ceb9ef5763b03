//! Bus interface abstraction for the BMI270 driver.

pub mod i2c;
pub mod spi;

/// I2C address with the SDO pin tied to GND.
pub const I2C_ADDRESS_PRIMARY: u8 = 0x68;
/// I2C address with the SDO pin tied to VDDIO.
pub const I2C_ADDRESS_SECONDARY: u8 = 0x69;

/// Abstraction over the low-level bus access required by the driver.
///
/// Every method is a single blocking transaction.
pub trait Bmi270Interface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Writes a single register.
    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error>;

    /// Reads a single register.
    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error>;

    /// Reads multiple consecutive registers into the provided buffer.
    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;

    /// Writes multiple bytes starting at `register` in one burst.
    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error>;

    /// Performs whatever the bus needs before the first real access.
    fn activate(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }
}
