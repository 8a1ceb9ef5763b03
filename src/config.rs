//! Configuration primitives for the BMI270 driver.

use crate::params::{
    AccelBandwidth, AccelFilterPerformance, AccelOperationMode, AccelOutputDataRate, AccelRange,
    AdvancedPowerSave, GyroBandwidth, GyroFilterPerformance, GyroNoisePerformance,
    GyroOperationMode, GyroOutputDataRate, GyroRange, TemperatureSensor,
};
use crate::settings::SettingId;

/// User-facing configuration for the BMI270 sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Accelerometer output data rate.
    pub accel_odr: AccelOutputDataRate,
    /// Accelerometer bandwidth / averaging.
    pub accel_bandwidth: AccelBandwidth,
    /// Accelerometer filter mode.
    pub accel_filter_perf: AccelFilterPerformance,
    /// Accelerometer full-scale range.
    pub accel_range: AccelRange,
    /// Accelerometer enable.
    pub accel_mode: AccelOperationMode,
    /// Gyroscope output data rate.
    pub gyro_odr: GyroOutputDataRate,
    /// Gyroscope filter oversampling.
    pub gyro_bandwidth: GyroBandwidth,
    /// Gyroscope noise mode.
    pub gyro_noise_perf: GyroNoisePerformance,
    /// Gyroscope filter mode.
    pub gyro_filter_perf: GyroFilterPerformance,
    /// Gyroscope full-scale range.
    pub gyro_range: GyroRange,
    /// Gyroscope enable.
    pub gyro_mode: GyroOperationMode,
    /// Temperature sensor enable.
    pub temperature: TemperatureSensor,
    /// Advanced power save.
    pub advanced_power_save: AdvancedPowerSave,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Register state right after power-on or a soft reset.
    pub const fn power_on() -> Self {
        Self {
            accel_odr: AccelOutputDataRate::Hz100,
            accel_bandwidth: AccelBandwidth::NormalAvg4,
            accel_filter_perf: AccelFilterPerformance::Performance,
            accel_range: AccelRange::G8,
            accel_mode: AccelOperationMode::Disabled,
            gyro_odr: GyroOutputDataRate::Hz200,
            gyro_bandwidth: GyroBandwidth::Normal,
            gyro_noise_perf: GyroNoisePerformance::PowerOptimized,
            gyro_filter_perf: GyroFilterPerformance::Performance,
            gyro_range: GyroRange::Dps2000,
            gyro_mode: GyroOperationMode::Disabled,
            temperature: TemperatureSensor::Disabled,
            advanced_power_save: AdvancedPowerSave::Enabled,
        }
    }

    /// Checks whether this configuration is valid according to datasheet rules.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if matches!(self.accel_filter_perf, AccelFilterPerformance::Performance)
            && self.accel_odr.hz() < AccelOutputDataRate::Hz12_5.hz()
        {
            return Err(ConfigError::AccelOdrTooLowForPerformance);
        }

        Ok(())
    }

    /// Mirrors a raw setting write into the cached configuration.
    ///
    /// Encodings outside the setting's enumeration leave the field untouched.
    pub(crate) fn record(&mut self, id: SettingId, raw: u8) {
        match id {
            SettingId::AccelOutputDataRate => {
                if let Ok(value) = AccelOutputDataRate::try_from(raw) {
                    self.accel_odr = value;
                }
            }
            SettingId::AccelBandwidth => {
                if let Ok(value) = AccelBandwidth::try_from(raw) {
                    self.accel_bandwidth = value;
                }
            }
            SettingId::AccelFilterPerformance => {
                if let Ok(value) = AccelFilterPerformance::try_from(raw) {
                    self.accel_filter_perf = value;
                }
            }
            SettingId::AccelRange => {
                if let Ok(value) = AccelRange::try_from(raw) {
                    self.accel_range = value;
                }
            }
            SettingId::AccelOperationMode => {
                if let Ok(value) = AccelOperationMode::try_from(raw) {
                    self.accel_mode = value;
                }
            }
            SettingId::GyroOutputDataRate => {
                if let Ok(value) = GyroOutputDataRate::try_from(raw) {
                    self.gyro_odr = value;
                }
            }
            SettingId::GyroBandwidth => {
                if let Ok(value) = GyroBandwidth::try_from(raw) {
                    self.gyro_bandwidth = value;
                }
            }
            SettingId::GyroNoisePerformance => {
                if let Ok(value) = GyroNoisePerformance::try_from(raw) {
                    self.gyro_noise_perf = value;
                }
            }
            SettingId::GyroFilterPerformance => {
                if let Ok(value) = GyroFilterPerformance::try_from(raw) {
                    self.gyro_filter_perf = value;
                }
            }
            SettingId::GyroRange => {
                if let Ok(value) = GyroRange::try_from(raw) {
                    self.gyro_range = value;
                }
            }
            SettingId::GyroOperationMode => {
                if let Ok(value) = GyroOperationMode::try_from(raw) {
                    self.gyro_mode = value;
                }
            }
            SettingId::TemperatureSensor => {
                if let Ok(value) = TemperatureSensor::try_from(raw) {
                    self.temperature = value;
                }
            }
            SettingId::AdvancedPowerSave => {
                if let Ok(value) = AdvancedPowerSave::try_from(raw) {
                    self.advanced_power_save = value;
                }
            }
        }
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the accelerometer output data rate.
    pub fn accel_odr(mut self, odr: AccelOutputDataRate) -> Self {
        self.config.accel_odr = odr;
        self
    }

    /// Overrides the accelerometer bandwidth / averaging.
    pub fn accel_bandwidth(mut self, bandwidth: AccelBandwidth) -> Self {
        self.config.accel_bandwidth = bandwidth;
        self
    }

    /// Overrides the accelerometer filter mode.
    pub fn accel_filter_perf(mut self, perf: AccelFilterPerformance) -> Self {
        self.config.accel_filter_perf = perf;
        self
    }

    /// Overrides the accelerometer range.
    pub fn accel_range(mut self, range: AccelRange) -> Self {
        self.config.accel_range = range;
        self
    }

    /// Enables or disables the accelerometer.
    pub fn accel_mode(mut self, mode: AccelOperationMode) -> Self {
        self.config.accel_mode = mode;
        self
    }

    /// Overrides the gyroscope output data rate.
    pub fn gyro_odr(mut self, odr: GyroOutputDataRate) -> Self {
        self.config.gyro_odr = odr;
        self
    }

    /// Overrides the gyroscope filter oversampling.
    pub fn gyro_bandwidth(mut self, bandwidth: GyroBandwidth) -> Self {
        self.config.gyro_bandwidth = bandwidth;
        self
    }

    /// Overrides the gyroscope noise mode.
    pub fn gyro_noise_perf(mut self, perf: GyroNoisePerformance) -> Self {
        self.config.gyro_noise_perf = perf;
        self
    }

    /// Overrides the gyroscope filter mode.
    pub fn gyro_filter_perf(mut self, perf: GyroFilterPerformance) -> Self {
        self.config.gyro_filter_perf = perf;
        self
    }

    /// Overrides the gyroscope range.
    pub fn gyro_range(mut self, range: GyroRange) -> Self {
        self.config.gyro_range = range;
        self
    }

    /// Enables or disables the gyroscope.
    pub fn gyro_mode(mut self, mode: GyroOperationMode) -> Self {
        self.config.gyro_mode = mode;
        self
    }

    /// Enables or disables the temperature sensor.
    pub fn temperature(mut self, temperature: TemperatureSensor) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Enables or disables advanced power save.
    pub fn advanced_power_save(mut self, setting: AdvancedPowerSave) -> Self {
        self.config.advanced_power_save = setting;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    /// Both sensors and the temperature sensor on, ±2 g and ±250 °/s.
    fn default() -> Self {
        Self {
            accel_range: AccelRange::G2,
            accel_mode: AccelOperationMode::Enabled,
            gyro_range: GyroRange::Dps250,
            gyro_mode: GyroOperationMode::Enabled,
            temperature: TemperatureSensor::Enabled,
            advanced_power_save: AdvancedPowerSave::Disabled,
            ..Self::power_on()
        }
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Performance mode needs an accelerometer ODR of at least 12.5 Hz.
    AccelOdrTooLowForPerformance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
        assert_eq!(Config::power_on().validate(), Ok(()));
    }

    #[test]
    fn low_odr_requires_power_optimized_filter() {
        let config = Config::new().accel_odr(AccelOutputDataRate::Hz6_25).build();
        assert_eq!(config.validate(), Err(ConfigError::AccelOdrTooLowForPerformance));

        let config = Config::new()
            .accel_odr(AccelOutputDataRate::Hz6_25)
            .accel_filter_perf(AccelFilterPerformance::PowerOptimized)
            .build();
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn record_tracks_legal_values_only() {
        let mut config = Config::default();
        config.record(SettingId::GyroRange, 0b100);
        assert_eq!(config.gyro_range, GyroRange::Dps125);

        config.record(SettingId::GyroRange, 0b111);
        assert_eq!(config.gyro_range, GyroRange::Dps125);

        config.record(SettingId::AccelOperationMode, 0);
        assert_eq!(config.accel_mode, AccelOperationMode::Disabled);
    }
}
