//! Register map definitions for the BMI270 IMU.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{
    AccelBandwidth, AccelFilterPerformance, AccelRange, GyroFilterPerformance,
    GyroNoisePerformance,
};

/// Register address of `CHIP_ID`.
pub const REG_CHIP_ID: u8 = 0x00;
/// Register address of `ERR_REG`.
pub const REG_ERR_REG: u8 = 0x02;
/// Register address of `STATUS`.
pub const REG_STATUS: u8 = 0x03;
/// Register address of `DATA_8` (`ACC_X_LSB`).
pub const REG_ACC_X_LSB: u8 = 0x0C;
/// Register address of `DATA_14` (`GYR_X_LSB`).
pub const REG_GYR_X_LSB: u8 = 0x12;
/// Register address of `SENSORTIME_0`.
pub const REG_SENSORTIME_0: u8 = 0x18;
/// Register address of `INTERNAL_STATUS`.
pub const REG_INTERNAL_STATUS: u8 = 0x21;
/// Register address of `TEMPERATURE_0`.
pub const REG_TEMPERATURE_0: u8 = 0x22;
/// Register address of `ACC_CONF`.
pub const REG_ACC_CONF: u8 = 0x40;
/// Register address of `ACC_RANGE`.
pub const REG_ACC_RANGE: u8 = 0x41;
/// Register address of `GYR_CONF`.
pub const REG_GYR_CONF: u8 = 0x42;
/// Register address of `GYR_RANGE`.
pub const REG_GYR_RANGE: u8 = 0x43;
/// Register address of `INIT_CTRL`.
pub const REG_INIT_CTRL: u8 = 0x59;
/// Register address of `INIT_ADDR_0`.
pub const REG_INIT_ADDR_0: u8 = 0x5B;
/// Register address of `INIT_ADDR_1`.
pub const REG_INIT_ADDR_1: u8 = 0x5C;
/// Register address of `INIT_DATA`.
pub const REG_INIT_DATA: u8 = 0x5E;
/// Register address of `PWR_CONF`.
pub const REG_PWR_CONF: u8 = 0x7C;
/// Register address of `PWR_CTRL`.
pub const REG_PWR_CTRL: u8 = 0x7D;
/// Register address of `CMD`.
pub const REG_CMD: u8 = 0x7E;

/// Value reported by `CHIP_ID` for a BMI270.
pub const EXPECTED_CHIP_ID: u8 = 0x24;
/// Soft reset command value written to the `CMD` register.
pub const SOFT_RESET_COMMAND: u8 = 0xB6;
/// `INIT_CTRL` value that starts a configuration upload.
pub const INIT_CTRL_PREPARE: u8 = 0x00;
/// `INIT_CTRL` value that completes a configuration upload.
pub const INIT_CTRL_COMPLETE: u8 = 0x01;

/// Access permissions encoded for each register.
///
/// `CMD` is the only write-only register and is written directly, so it has
/// no [`Register`] view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Read-only register.
    ReadOnly,
    /// Read/write register.
    ReadWrite,
}

/// Minimal metadata exposed by every register value type.
pub trait Register: From<u8> + Into<u8> + Copy {
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
    /// Access permission classification.
    const ACCESS: RegisterAccess;
    /// Power-on reset value defined by the datasheet.
    const RESET_VALUE: u8;
}

macro_rules! byte_register {
    ($name:ident, $address:expr, $access:expr, $reset:expr) => {
        impl From<u8> for $name {
            fn from(value: u8) -> Self {
                Self::from_bytes([value])
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value.into_bytes()[0]
            }
        }

        impl Register for $name {
            const ADDRESS: u8 = $address;
            const ACCESS: RegisterAccess = $access;
            const RESET_VALUE: u8 = $reset;
        }
    };
}

/// Bitfield representation of the `ERR_REG` register (address `0x02`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrReg {
    // Chip not operable (bit 0).
    pub fatal_err: bool,
    // Internal error code (bits 4:1).
    pub internal_err: B4,
    #[skip]
    __: B1,
    // FIFO overfilled while streaming (bit 6).
    pub fifo_err: bool,
    // Auxiliary interface / I2C master error (bit 7).
    pub aux_err: bool,
}

byte_register!(ErrReg, REG_ERR_REG, RegisterAccess::ReadOnly, 0x00);

/// Bitfield representation of the `STATUS` register (address `0x03`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    #[skip]
    __: B2,
    // Auxiliary interface operation in progress (bit 2).
    pub aux_busy: bool,
    #[skip]
    __: B1,
    // Command decoder ready (bit 4).
    pub cmd_rdy: bool,
    // Auxiliary data ready (bit 5).
    pub drdy_aux: bool,
    // Gyroscope data ready (bit 6).
    pub drdy_gyr: bool,
    // Accelerometer data ready (bit 7).
    pub drdy_acc: bool,
}

byte_register!(Status, REG_STATUS, RegisterAccess::ReadOnly, 0x10);

/// Bitfield representation of the `INTERNAL_STATUS` register (address `0x21`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternalStatus {
    // Initialization message, see `InitMessage` (bits 3:0).
    pub message: B4,
    #[skip]
    __: B1,
    // Incorrect axes remapping (bit 5).
    pub axes_remap_error: bool,
    // ODR below 50 Hz while a feature requires it (bit 6).
    pub odr_50hz_error: bool,
    #[skip]
    __: B1,
}

byte_register!(InternalStatus, REG_INTERNAL_STATUS, RegisterAccess::ReadOnly, 0x00);

/// Bitfield representation of the `ACC_CONF` register (address `0x40`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccConf {
    // Output data rate encoding (bits 3:0).
    pub odr: B4,
    // Bandwidth / averaging (bits 6:4).
    pub bandwidth: AccelBandwidth,
    // Filter mode (bit 7).
    pub filter_perf: AccelFilterPerformance,
}

byte_register!(AccConf, REG_ACC_CONF, RegisterAccess::ReadWrite, 0xA8);

/// Bitfield representation of the `ACC_RANGE` register (address `0x41`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccRange {
    // Full-scale range (bits 1:0).
    pub range: AccelRange,
    #[skip]
    __: B6,
}

byte_register!(AccRange, REG_ACC_RANGE, RegisterAccess::ReadWrite, 0x02);

/// Bitfield representation of the `GYR_CONF` register (address `0x42`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GyrConf {
    // Output data rate encoding (bits 3:0).
    pub odr: B4,
    // Filter oversampling (bits 5:4).
    pub bandwidth: B2,
    // Noise mode (bit 6).
    pub noise_perf: GyroNoisePerformance,
    // Filter mode (bit 7).
    pub filter_perf: GyroFilterPerformance,
}

byte_register!(GyrConf, REG_GYR_CONF, RegisterAccess::ReadWrite, 0xA9);

/// Bitfield representation of the `GYR_RANGE` register (address `0x43`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GyrRange {
    // Full-scale range (bits 2:0).
    pub range: B3,
    // OIS data path range, ±250 °/s when clear (bit 3).
    pub ois_range: bool,
    #[skip]
    __: B4,
}

byte_register!(GyrRange, REG_GYR_RANGE, RegisterAccess::ReadWrite, 0x00);

/// Bitfield representation of the `PWR_CONF` register (address `0x7C`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwrConf {
    // Advanced power save (bit 0).
    pub adv_power_save: bool,
    // FIFO read disabled in low power mode (bit 1).
    pub fifo_self_wake_up: bool,
    // Fast power up (bit 2).
    pub fup_en: bool,
    #[skip]
    __: B5,
}

byte_register!(PwrConf, REG_PWR_CONF, RegisterAccess::ReadWrite, 0x03);

/// Bitfield representation of the `PWR_CTRL` register (address `0x7D`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwrCtrl {
    // Auxiliary sensor enable (bit 0).
    pub aux_en: bool,
    // Gyroscope enable (bit 1).
    pub gyr_en: bool,
    // Accelerometer enable (bit 2).
    pub acc_en: bool,
    // Temperature sensor enable (bit 3).
    pub temp_en: bool,
    #[skip]
    __: B4,
}

byte_register!(PwrCtrl, REG_PWR_CTRL, RegisterAccess::ReadWrite, 0x00);

/// Splits a configuration file byte offset into `INIT_ADDR_0` / `INIT_ADDR_1` values.
///
/// The device addresses the feature engine in 16-bit words; the low nibble of
/// the word index goes to `INIT_ADDR_0[3:0]` and the remaining bits to `INIT_ADDR_1`.
pub fn split_init_address(byte_offset: usize) -> [u8; 2] {
    let word = byte_offset / 2;
    [(word & 0x0F) as u8, ((word >> 4) & 0xFF) as u8]
}
