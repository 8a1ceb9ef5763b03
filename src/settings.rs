//! Named settings backed by register bit-fields.
//!
//! Each [`SettingId`] resolves to a [`SettingDescriptor`] holding the register
//! address, the in-register mask and the legal raw encodings. The descriptor is
//! all the driver needs to validate a value and merge it into a register with
//! a read-modify-write.
//!
//! ```rust
//! use bmi270::settings::SettingId;
//!
//! let gyro_range = SettingId::GyroRange.descriptor();
//! assert_eq!(gyro_range.register, 0x43);
//! assert!(gyro_range.is_legal(0b100));
//! assert!(!gyro_range.is_legal(0b101));
//! assert_eq!(gyro_range.merge(0b1111_1000, 0b011), 0b1111_1011);
//! ```

use crate::params::{
    AccelBandwidth, AccelFilterPerformance, AccelOperationMode, AccelOutputDataRate, AccelRange,
    AdvancedPowerSave, GyroBandwidth, GyroFilterPerformance, GyroNoisePerformance,
    GyroOperationMode, GyroOutputDataRate, GyroRange, InvalidEncoding, TemperatureSensor,
};
use crate::registers::{
    REG_ACC_CONF, REG_ACC_RANGE, REG_GYR_CONF, REG_GYR_RANGE, REG_PWR_CONF, REG_PWR_CTRL,
};

/// Every user-facing setting the driver knows how to program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingId {
    /// `ACC_CONF.ACC_ODR`.
    AccelOutputDataRate,
    /// `ACC_CONF.ACC_BWP`.
    AccelBandwidth,
    /// `ACC_CONF.ACC_FILTER_PERF`.
    AccelFilterPerformance,
    /// `ACC_RANGE.ACC_RANGE`.
    AccelRange,
    /// `PWR_CTRL.ACC_EN`.
    AccelOperationMode,
    /// `GYR_CONF.GYR_ODR`.
    GyroOutputDataRate,
    /// `GYR_CONF.GYR_BWP`.
    GyroBandwidth,
    /// `GYR_CONF.GYR_NOISE_PERF`.
    GyroNoisePerformance,
    /// `GYR_CONF.GYR_FILTER_PERF`.
    GyroFilterPerformance,
    /// `GYR_RANGE.GYR_RANGE`.
    GyroRange,
    /// `PWR_CTRL.GYR_EN`.
    GyroOperationMode,
    /// `PWR_CTRL.TEMP_EN`.
    TemperatureSensor,
    /// `PWR_CONF.ADV_POWER_SAVE`.
    AdvancedPowerSave,
}

impl SettingId {
    /// Every setting, grouped by register.
    pub const ALL: [SettingId; 13] = [
        Self::AccelOutputDataRate,
        Self::AccelBandwidth,
        Self::AccelFilterPerformance,
        Self::AccelRange,
        Self::AccelOperationMode,
        Self::GyroOutputDataRate,
        Self::GyroBandwidth,
        Self::GyroNoisePerformance,
        Self::GyroFilterPerformance,
        Self::GyroRange,
        Self::GyroOperationMode,
        Self::TemperatureSensor,
        Self::AdvancedPowerSave,
    ];

    /// Returns the register location and legal encodings of this setting.
    pub const fn descriptor(self) -> SettingDescriptor {
        match self {
            Self::AccelOutputDataRate => {
                SettingDescriptor::new(REG_ACC_CONF, 0x0F, 0, AccelOutputDataRate::ENCODINGS)
            }
            Self::AccelBandwidth => {
                SettingDescriptor::new(REG_ACC_CONF, 0x70, 4, AccelBandwidth::ENCODINGS)
            }
            Self::AccelFilterPerformance => {
                SettingDescriptor::new(REG_ACC_CONF, 0x80, 7, AccelFilterPerformance::ENCODINGS)
            }
            Self::AccelRange => {
                SettingDescriptor::new(REG_ACC_RANGE, 0x03, 0, AccelRange::ENCODINGS)
            }
            Self::AccelOperationMode => {
                SettingDescriptor::new(REG_PWR_CTRL, 0x04, 2, AccelOperationMode::ENCODINGS)
            }
            Self::GyroOutputDataRate => {
                SettingDescriptor::new(REG_GYR_CONF, 0x0F, 0, GyroOutputDataRate::ENCODINGS)
            }
            Self::GyroBandwidth => {
                SettingDescriptor::new(REG_GYR_CONF, 0x30, 4, GyroBandwidth::ENCODINGS)
            }
            Self::GyroNoisePerformance => {
                SettingDescriptor::new(REG_GYR_CONF, 0x40, 6, GyroNoisePerformance::ENCODINGS)
            }
            Self::GyroFilterPerformance => {
                SettingDescriptor::new(REG_GYR_CONF, 0x80, 7, GyroFilterPerformance::ENCODINGS)
            }
            Self::GyroRange => {
                SettingDescriptor::new(REG_GYR_RANGE, 0x07, 0, GyroRange::ENCODINGS)
            }
            Self::GyroOperationMode => {
                SettingDescriptor::new(REG_PWR_CTRL, 0x02, 1, GyroOperationMode::ENCODINGS)
            }
            Self::TemperatureSensor => {
                SettingDescriptor::new(REG_PWR_CTRL, 0x08, 3, TemperatureSensor::ENCODINGS)
            }
            Self::AdvancedPowerSave => {
                SettingDescriptor::new(REG_PWR_CONF, 0x01, 0, AdvancedPowerSave::ENCODINGS)
            }
        }
    }
}

/// Register location and legal encodings of a single setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingDescriptor {
    /// Register holding the field.
    pub register: u8,
    /// Field mask, already shifted into register position.
    pub mask: u8,
    /// Bit position of the field's least significant bit.
    pub shift: u8,
    /// Raw (unshifted) encodings the field accepts.
    pub legal: &'static [u8],
}

impl SettingDescriptor {
    const fn new(register: u8, mask: u8, shift: u8, legal: &'static [u8]) -> Self {
        Self {
            register,
            mask,
            shift,
            legal,
        }
    }

    /// Returns `true` when `value` is one of the field's legal encodings.
    pub fn is_legal(&self, value: u8) -> bool {
        self.legal.contains(&value)
    }

    /// Replaces the field inside `current` with `value`, leaving other bits intact.
    pub fn merge(&self, current: u8, value: u8) -> u8 {
        (current & !self.mask) | ((value << self.shift) & self.mask)
    }

    /// Extracts the raw field value from a full register value.
    pub fn extract(&self, register_value: u8) -> u8 {
        (register_value & self.mask) >> self.shift
    }
}

/// A typed setting value that knows which field it belongs to.
///
/// Implemented by the enums in [`params`](crate::params); used by
/// [`Bmi270::set`](crate::Bmi270::set) and [`Bmi270::get`](crate::Bmi270::get).
pub trait Setting: Copy + Into<u8> + TryFrom<u8, Error = InvalidEncoding> {
    /// The setting this type encodes.
    const ID: SettingId;
}

impl Setting for AccelOutputDataRate {
    const ID: SettingId = SettingId::AccelOutputDataRate;
}

impl Setting for AccelBandwidth {
    const ID: SettingId = SettingId::AccelBandwidth;
}

impl Setting for AccelFilterPerformance {
    const ID: SettingId = SettingId::AccelFilterPerformance;
}

impl Setting for AccelRange {
    const ID: SettingId = SettingId::AccelRange;
}

impl Setting for AccelOperationMode {
    const ID: SettingId = SettingId::AccelOperationMode;
}

impl Setting for GyroOutputDataRate {
    const ID: SettingId = SettingId::GyroOutputDataRate;
}

impl Setting for GyroBandwidth {
    const ID: SettingId = SettingId::GyroBandwidth;
}

impl Setting for GyroNoisePerformance {
    const ID: SettingId = SettingId::GyroNoisePerformance;
}

impl Setting for GyroFilterPerformance {
    const ID: SettingId = SettingId::GyroFilterPerformance;
}

impl Setting for GyroRange {
    const ID: SettingId = SettingId::GyroRange;
}

impl Setting for GyroOperationMode {
    const ID: SettingId = SettingId::GyroOperationMode;
}

impl Setting for TemperatureSensor {
    const ID: SettingId = SettingId::TemperatureSensor;
}

impl Setting for AdvancedPowerSave {
    const ID: SettingId = SettingId::AdvancedPowerSave;
}
