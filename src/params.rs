//! Strongly typed parameter enumerations for the BMI270 driver.
//!
//! These enums map directly to datasheet field encodings and are used across
//! [`Config`](crate::config::Config), the [settings](crate::settings) table and
//! the high-level driver APIs. Every enum converts into its raw encoding with
//! `u8::from` and back with `TryFrom<u8>`, which rejects encodings the hardware
//! field does not define.
//!
//! # Examples
//!
//! ```rust
//! use bmi270::params::{AccelRange, GyroRange};
//!
//! assert_eq!(u8::from(AccelRange::G8), 0b10);
//! assert_eq!(GyroRange::try_from(0b100), Ok(GyroRange::Dps125));
//! assert!(GyroRange::try_from(0b101).is_err());
//! ```

use modular_bitfield::prelude::Specifier;

/// Standard gravity used to convert g to m/s².
pub const STANDARD_GRAVITY: f32 = 9.806_65;

/// Raw encoding rejected by a field's legal enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidEncoding(pub u8);

macro_rules! encoded_enum {
    ($name:ident { $($variant:ident),+ $(,)? }) => {
        impl $name {
            /// Every legal value, in encoding order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];
            /// Raw encodings accepted by the hardware field.
            pub const ENCODINGS: &'static [u8] = &[$(Self::$variant as u8),+];
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = InvalidEncoding;

            fn try_from(raw: u8) -> core::result::Result<Self, Self::Error> {
                $(
                    if raw == Self::$variant as u8 {
                        return Ok(Self::$variant);
                    }
                )+
                Err(InvalidEncoding(raw))
            }
        }
    };
}

/// Accelerometer full-scale range (`ACC_RANGE[1:0]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum AccelRange {
    /// ±2 g.
    G2 = 0b00,
    /// ±4 g.
    G4 = 0b01,
    /// ±8 g.
    G8 = 0b10,
    /// ±16 g.
    G16 = 0b11,
}

encoded_enum!(AccelRange { G2, G4, G8, G16 });

impl AccelRange {
    /// Returns the sensitivity in LSB per g.
    pub const fn lsb_per_g(self) -> f32 {
        match self {
            Self::G2 => 16_384.0,
            Self::G4 => 8_192.0,
            Self::G8 => 4_096.0,
            Self::G16 => 2_048.0,
        }
    }

    /// Returns the full-scale value in g.
    pub const fn g(self) -> u8 {
        match self {
            Self::G2 => 2,
            Self::G4 => 4,
            Self::G8 => 8,
            Self::G16 => 16,
        }
    }
}

/// Gyroscope full-scale range (`GYR_RANGE[2:0]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum GyroRange {
    /// ±2000 °/s.
    Dps2000 = 0b000,
    /// ±1000 °/s.
    Dps1000 = 0b001,
    /// ±500 °/s.
    Dps500 = 0b010,
    /// ±250 °/s.
    Dps250 = 0b011,
    /// ±125 °/s.
    Dps125 = 0b100,
}

encoded_enum!(GyroRange { Dps2000, Dps1000, Dps500, Dps250, Dps125 });

impl GyroRange {
    /// Returns the sensitivity in LSB per °/s.
    pub const fn lsb_per_dps(self) -> f32 {
        match self {
            Self::Dps2000 => 16.4,
            Self::Dps1000 => 32.8,
            Self::Dps500 => 65.6,
            Self::Dps250 => 131.2,
            Self::Dps125 => 262.4,
        }
    }

    /// Returns the full-scale value in °/s.
    pub const fn dps(self) -> u16 {
        match self {
            Self::Dps2000 => 2_000,
            Self::Dps1000 => 1_000,
            Self::Dps500 => 500,
            Self::Dps250 => 250,
            Self::Dps125 => 125,
        }
    }
}

/// Accelerometer enable bit (`PWR_CTRL.ACC_EN`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AccelOperationMode {
    /// Accelerometer disabled.
    Disabled = 0,
    /// Accelerometer enabled.
    Enabled = 1,
}

encoded_enum!(AccelOperationMode { Disabled, Enabled });

/// Gyroscope enable bit (`PWR_CTRL.GYR_EN`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum GyroOperationMode {
    /// Gyroscope disabled.
    Disabled = 0,
    /// Gyroscope enabled.
    Enabled = 1,
}

encoded_enum!(GyroOperationMode { Disabled, Enabled });

/// Temperature sensor enable bit (`PWR_CTRL.TEMP_EN`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TemperatureSensor {
    /// Temperature sensor disabled.
    Disabled = 0,
    /// Temperature sensor enabled.
    Enabled = 1,
}

encoded_enum!(TemperatureSensor { Disabled, Enabled });

/// Advanced power save bit (`PWR_CONF.ADV_POWER_SAVE`).
///
/// Must be disabled while uploading the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AdvancedPowerSave {
    /// Advanced power save disabled.
    Disabled = 0,
    /// Advanced power save enabled (reset default).
    Enabled = 1,
}

encoded_enum!(AdvancedPowerSave { Disabled, Enabled });

/// Accelerometer output data rate (`ACC_CONF[3:0]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AccelOutputDataRate {
    /// 25/32 Hz.
    Hz0_78 = 0x01,
    /// 25/16 Hz.
    Hz1_56 = 0x02,
    /// 25/8 Hz.
    Hz3_12 = 0x03,
    /// 25/4 Hz.
    Hz6_25 = 0x04,
    /// 25/2 Hz.
    Hz12_5 = 0x05,
    /// 25 Hz.
    Hz25 = 0x06,
    /// 50 Hz.
    Hz50 = 0x07,
    /// 100 Hz.
    Hz100 = 0x08,
    /// 200 Hz.
    Hz200 = 0x09,
    /// 400 Hz.
    Hz400 = 0x0A,
    /// 800 Hz.
    Hz800 = 0x0B,
    /// 1600 Hz.
    Hz1600 = 0x0C,
}

encoded_enum!(AccelOutputDataRate {
    Hz0_78, Hz1_56, Hz3_12, Hz6_25, Hz12_5, Hz25, Hz50, Hz100, Hz200, Hz400, Hz800, Hz1600,
});

impl AccelOutputDataRate {
    /// Returns the ODR in hertz.
    pub const fn hz(self) -> f32 {
        // Encoding n selects 100 Hz * 2^(n - 8).
        match self {
            Self::Hz0_78 => 0.781_25,
            Self::Hz1_56 => 1.562_5,
            Self::Hz3_12 => 3.125,
            Self::Hz6_25 => 6.25,
            Self::Hz12_5 => 12.5,
            Self::Hz25 => 25.0,
            Self::Hz50 => 50.0,
            Self::Hz100 => 100.0,
            Self::Hz200 => 200.0,
            Self::Hz400 => 400.0,
            Self::Hz800 => 800.0,
            Self::Hz1600 => 1_600.0,
        }
    }
}

/// Accelerometer bandwidth / averaging selection (`ACC_CONF[6:4]`).
///
/// In performance mode this selects the filter oversampling; in power
/// optimized mode it selects the number of averaged samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum AccelBandwidth {
    /// OSR4 / no averaging.
    Osr4Avg1 = 0b000,
    /// OSR2 / average of 2 samples.
    Osr2Avg2 = 0b001,
    /// Normal / average of 4 samples.
    NormalAvg4 = 0b010,
    /// CIC / average of 8 samples.
    CicAvg8 = 0b011,
    /// Average of 16 samples.
    ResAvg16 = 0b100,
    /// Average of 32 samples.
    ResAvg32 = 0b101,
    /// Average of 64 samples.
    ResAvg64 = 0b110,
    /// Average of 128 samples.
    ResAvg128 = 0b111,
}

encoded_enum!(AccelBandwidth {
    Osr4Avg1, Osr2Avg2, NormalAvg4, CicAvg8, ResAvg16, ResAvg32, ResAvg64, ResAvg128,
});

/// Accelerometer filter mode (`ACC_CONF.ACC_FILTER_PERF`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum AccelFilterPerformance {
    /// Power optimized (averaging) mode.
    PowerOptimized = 0,
    /// Performance (continuous filtering) mode.
    Performance = 1,
}

encoded_enum!(AccelFilterPerformance { PowerOptimized, Performance });

/// Gyroscope output data rate (`GYR_CONF[3:0]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum GyroOutputDataRate {
    /// 25 Hz.
    Hz25 = 0x06,
    /// 50 Hz.
    Hz50 = 0x07,
    /// 100 Hz.
    Hz100 = 0x08,
    /// 200 Hz.
    Hz200 = 0x09,
    /// 400 Hz.
    Hz400 = 0x0A,
    /// 800 Hz.
    Hz800 = 0x0B,
    /// 1600 Hz.
    Hz1600 = 0x0C,
    /// 3200 Hz.
    Hz3200 = 0x0D,
}

encoded_enum!(GyroOutputDataRate { Hz25, Hz50, Hz100, Hz200, Hz400, Hz800, Hz1600, Hz3200 });

impl GyroOutputDataRate {
    /// Returns the ODR in hertz.
    pub const fn hz(self) -> u32 {
        match self {
            Self::Hz25 => 25,
            Self::Hz50 => 50,
            Self::Hz100 => 100,
            Self::Hz200 => 200,
            Self::Hz400 => 400,
            Self::Hz800 => 800,
            Self::Hz1600 => 1_600,
            Self::Hz3200 => 3_200,
        }
    }
}

/// Gyroscope filter oversampling (`GYR_CONF[5:4]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum GyroBandwidth {
    /// 4x oversampling.
    Osr4 = 0b00,
    /// 2x oversampling.
    Osr2 = 0b01,
    /// Normal mode.
    Normal = 0b10,
}

encoded_enum!(GyroBandwidth { Osr4, Osr2, Normal });

/// Gyroscope noise mode (`GYR_CONF.GYR_NOISE_PERF`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum GyroNoisePerformance {
    /// Power optimized.
    PowerOptimized = 0,
    /// Performance optimized.
    Performance = 1,
}

encoded_enum!(GyroNoisePerformance { PowerOptimized, Performance });

/// Gyroscope filter mode (`GYR_CONF.GYR_FILTER_PERF`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum GyroFilterPerformance {
    /// Power optimized.
    PowerOptimized = 0,
    /// Performance optimized.
    Performance = 1,
}

encoded_enum!(GyroFilterPerformance { PowerOptimized, Performance });

/// Message field of `INTERNAL_STATUS[3:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum InitMessage {
    /// ASIC is not initialized.
    NotInit = 0x00,
    /// ASIC initialized.
    InitOk = 0x01,
    /// Initialization error.
    InitErr = 0x02,
    /// Invalid driver.
    DrvErr = 0x03,
    /// Sensor stopped.
    SnsStop = 0x04,
    /// Internal error while accessing NVM.
    NvmError = 0x05,
    /// Internal error while accessing NVM and initialization error.
    StartUpError = 0x06,
    /// Compatibility error.
    CompatError = 0x07,
}

encoded_enum!(InitMessage {
    NotInit, InitOk, InitErr, DrvErr, SnsStop, NvmError, StartUpError, CompatError,
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gyro_range_rejects_unused_encodings() {
        for raw in 0b101..=0b111 {
            assert_eq!(GyroRange::try_from(raw), Err(InvalidEncoding(raw)));
        }
    }

    #[test]
    fn encodings_follow_declaration_order() {
        assert_eq!(AccelRange::ENCODINGS, &[0, 1, 2, 3]);
        assert_eq!(GyroBandwidth::ENCODINGS, &[0, 1, 2]);
        assert_eq!(GyroOutputDataRate::ENCODINGS.first(), Some(&0x06));
        assert_eq!(AccelOutputDataRate::ENCODINGS.last(), Some(&0x0C));
    }

    #[test]
    fn odr_zero_is_not_a_rate() {
        assert!(AccelOutputDataRate::try_from(0).is_err());
        assert!(GyroOutputDataRate::try_from(0x05).is_err());
        assert!(GyroOutputDataRate::try_from(0x0E).is_err());
    }

    #[test]
    fn scale_factors_halve_with_range() {
        assert_eq!(AccelRange::G2.lsb_per_g(), 2.0 * AccelRange::G4.lsb_per_g());
        assert_eq!(GyroRange::Dps125.lsb_per_dps(), 2.0 * GyroRange::Dps250.lsb_per_dps());
    }
}
