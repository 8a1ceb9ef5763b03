//! Error handling primitives for the BMI270 driver.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// Any error reported by the underlying bus interface (NACK, timeout, ...).
    Interface(E),
    /// A setting value outside its legal enumeration.
    ///
    /// Raised before any bus transaction when writing, and when a register
    /// read back holds an encoding the driver does not know.
    InvalidValue,
    /// The provided configuration or configuration file is invalid.
    InvalidConfig,
    /// `CHIP_ID` did not report a BMI270.
    DeviceIdMismatch,
    /// The device did not acknowledge the configuration file upload.
    InitFailed,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}
