//! Decoding and scaling of accelerometer, gyroscope and temperature data.

use crate::params::{AccelRange, GyroRange, STANDARD_GRAVITY};

/// `TEMPERATURE` value reported while no valid sample is available.
pub const TEMPERATURE_INVALID: i16 = i16::MIN;

/// One accelerometer and one gyroscope sample read in a single burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawMotion {
    /// Accelerometer X, Y, Z in LSB.
    pub accel: [i16; 3],
    /// Gyroscope X, Y, Z in LSB.
    pub gyro: [i16; 3],
}

impl RawMotion {
    /// Splits the 12-byte `DATA_8..DATA_19` burst.
    pub fn from_bytes(raw: &[u8; 12]) -> Self {
        let mut accel = [0u8; 6];
        let mut gyro = [0u8; 6];
        accel.copy_from_slice(&raw[..6]);
        gyro.copy_from_slice(&raw[6..]);
        Self {
            accel: decode_axes(&accel),
            gyro: decode_axes(&gyro),
        }
    }
}

/// Decodes three little-endian two's complement axis values.
pub fn decode_axes(raw: &[u8; 6]) -> [i16; 3] {
    [
        i16::from_le_bytes([raw[0], raw[1]]),
        i16::from_le_bytes([raw[2], raw[3]]),
        i16::from_le_bytes([raw[4], raw[5]]),
    ]
}

/// Converts raw accelerometer counts to m/s².
pub fn accel_to_mps2(raw: [i16; 3], range: AccelRange) -> [f32; 3] {
    let lsb = range.lsb_per_g();
    raw.map(|axis| axis as f32 / lsb * STANDARD_GRAVITY)
}

/// Converts raw gyroscope counts to °/s.
pub fn gyro_to_dps(raw: [i16; 3], range: GyroRange) -> [f32; 3] {
    let lsb = range.lsb_per_dps();
    raw.map(|axis| axis as f32 / lsb)
}

/// Converts a raw `TEMPERATURE` value to °C (1/512 K per LSB, 0 at 23 °C).
pub fn temperature_celsius(raw: i16) -> Option<f32> {
    if raw == TEMPERATURE_INVALID {
        return None;
    }

    Some(raw as f32 / 512.0 + 23.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_burst_splits_accel_then_gyro() {
        let raw = [
            0x01, 0x00, 0xFF, 0xFF, 0x00, 0x40, // accel
            0x10, 0x00, 0x00, 0x80, 0xFF, 0x7F, // gyro
        ];
        let motion = RawMotion::from_bytes(&raw);
        assert_eq!(motion.accel, [1, -1, 16_384]);
        assert_eq!(motion.gyro, [16, i16::MIN, i16::MAX]);
    }

    #[test]
    fn one_g_at_every_range() {
        for &range in AccelRange::ALL {
            let one_g = range.lsb_per_g() as i16;
            let scaled = accel_to_mps2([0, 0, one_g], range);
            assert_eq!(scaled, [0.0, 0.0, STANDARD_GRAVITY]);
        }
    }

    #[test]
    fn gyro_scaling_uses_range_sensitivity() {
        let scaled = gyro_to_dps([164, -164, 0], GyroRange::Dps2000);
        assert!((scaled[0] - 10.0).abs() < 1e-4);
        assert!((scaled[1] + 10.0).abs() < 1e-4);
        assert_eq!(scaled[2], 0.0);
    }

    #[test]
    fn temperature_conversion_and_invalid_marker() {
        assert_eq!(temperature_celsius(0), Some(23.0));
        assert_eq!(temperature_celsius(512), Some(24.0));
        assert_eq!(temperature_celsius(-1024), Some(21.0));
        assert_eq!(temperature_celsius(TEMPERATURE_INVALID), None);
    }
}
