//! High-level BMI270 device driver implementation.

use crate::config::Config;
use crate::data::{self, RawMotion};
use crate::error::{Error, Result};
use crate::interface::Bmi270Interface;
use crate::interface::i2c::I2cInterface;
use crate::interface::spi::SpiInterface;
use crate::params::{
    AccelOperationMode, AccelRange, AdvancedPowerSave, GyroOperationMode, GyroRange, InitMessage,
    TemperatureSensor,
};
use crate::registers::{
    AccConf, AccRange, ErrReg, GyrConf, GyrRange, InternalStatus, PwrConf, PwrCtrl, Register,
    RegisterAccess, Status, EXPECTED_CHIP_ID, INIT_CTRL_COMPLETE, INIT_CTRL_PREPARE,
    REG_ACC_X_LSB, REG_CHIP_ID, REG_CMD, REG_GYR_X_LSB, REG_INIT_ADDR_0, REG_INIT_CTRL,
    REG_INIT_DATA, REG_SENSORTIME_0, REG_TEMPERATURE_0, SOFT_RESET_COMMAND, split_init_address,
};
use crate::settings::{Setting, SettingId};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use embedded_hal::spi::SpiDevice;

// Wait after leaving advanced power save before the next write (microseconds).
const ADV_POWER_SAVE_EXIT_DELAY_US: u32 = 450;
// Feature engine start-up time after INIT_CTRL completes (milliseconds).
const CONFIG_LOAD_DELAY_MS: u32 = 20;
// Start-up time after a soft reset (milliseconds).
const SOFT_RESET_DELAY_MS: u32 = 15;
// Bytes written to INIT_DATA per burst.
const CONFIG_CHUNK_LEN: usize = 32;
/// Largest configuration file the 12-bit `INIT_ADDR` word address can reach.
pub const CONFIG_FILE_MAX_LEN: usize = 8192;

/// High-level synchronous driver for the BMI270 IMU.
///
/// The driver owns its bus interface and caches the active [`Config`]; the
/// cached ranges are used to scale raw samples.
pub struct Bmi270<IFACE> {
    interface: IFACE,
    config: Config,
}

/// Decoded view of the `STATUS` register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSnapshot {
    /// STATUS[2] AUX_BUSY.
    pub aux_busy: bool,
    /// STATUS[4] CMD_RDY.
    pub cmd_rdy: bool,
    /// STATUS[5] DRDY_AUX.
    pub drdy_aux: bool,
    /// STATUS[6] DRDY_GYR.
    pub drdy_gyr: bool,
    /// STATUS[7] DRDY_ACC.
    pub drdy_acc: bool,
}

impl From<Status> for StatusSnapshot {
    fn from(status: Status) -> Self {
        Self {
            aux_busy: status.aux_busy(),
            cmd_rdy: status.cmd_rdy(),
            drdy_aux: status.drdy_aux(),
            drdy_gyr: status.drdy_gyr(),
            drdy_acc: status.drdy_acc(),
        }
    }
}

/// Decoded view of the `ERR_REG` register.
///
/// Meant for debugging; the fatal flag is only cleared by a power-on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorErrors {
    /// ERR_REG[0] FATAL_ERR.
    pub fatal: bool,
    /// ERR_REG[4:1] INTERNAL_ERR.
    pub internal: u8,
    /// ERR_REG[6] FIFO_ERR.
    pub fifo: bool,
    /// ERR_REG[7] AUX_ERR.
    pub aux: bool,
}

impl SensorErrors {
    /// Returns `true` when no error flag is raised.
    pub fn is_clear(&self) -> bool {
        !self.fatal && self.internal == 0 && !self.fifo && !self.aux
    }
}

impl From<ErrReg> for SensorErrors {
    fn from(err: ErrReg) -> Self {
        Self {
            fatal: err.fatal_err(),
            internal: err.internal_err(),
            fifo: err.fifo_err(),
            aux: err.aux_err(),
        }
    }
}

impl<IFACE> Bmi270<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus interface.
    ///
    /// `config` is applied by [`init`](Self::init); nothing is sent on the bus here.
    pub fn new(interface: IFACE, config: Config) -> Self {
        Self { interface, config }
    }

    /// Consumes the driver and returns the owned interface with the cached configuration.
    pub fn release(self) -> (IFACE, Config) {
        (self.interface, self.config)
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Returns a shared reference to the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<I2C> Bmi270<I2cInterface<I2C>>
where
    I2C: I2c,
{
    /// Convenience constructor for I2C transports.
    pub fn new_i2c(i2c: I2C, address: u8, config: Config) -> Self {
        Self::new(I2cInterface::new(i2c, address), config)
    }

    /// Releases the driver, returning the I2C bus and configuration.
    pub fn release_i2c(self) -> (I2C, Config) {
        let (iface, config) = self.release();
        (iface.release(), config)
    }
}

impl<SPI> Bmi270<SpiInterface<SPI>>
where
    SPI: SpiDevice,
{
    /// Convenience constructor for SPI transports.
    pub fn new_spi(spi: SPI, config: Config) -> Self {
        Self::new(SpiInterface::new(spi), config)
    }

    /// Releases the driver, returning the SPI device and configuration.
    pub fn release_spi(self) -> (SPI, Config) {
        let (iface, config) = self.release();
        (iface.release(), config)
    }
}

impl<IFACE, CommE> Bmi270<IFACE>
where
    IFACE: Bmi270Interface<Error = CommE>,
{
    // ==================================================================
    // == Initialization & Global Configuration ==========================
    // ==================================================================
    /// Initializes the sensor using the current configuration.
    ///
    /// `config_file` is Bosch's BMI270 feature engine image. It is uploaded
    /// only when `INTERNAL_STATUS` does not already report a completed
    /// initialization, so calling `init` twice is cheap.
    pub fn init(&mut self, delay: &mut impl DelayNs, config_file: &[u8]) -> Result<(), CommE> {
        let config = self.config;
        config.validate().map_err(|_| Error::InvalidConfig)?;

        self.interface.activate().map_err(Error::from)?;
        self.check_chip_id()?;
        self.load_config_file(config_file, delay)?;
        self.configure(config)?;

        info!("bmi270: initialized");
        Ok(())
    }

    /// Uploads the feature engine configuration file.
    ///
    /// Skipped when the device already reports `InitOk`. Fails with
    /// [`Error::InvalidConfig`] for an empty, odd-length or oversized
    /// (> [`CONFIG_FILE_MAX_LEN`]) file, and with [`Error::InitFailed`] when the
    /// device does not acknowledge the upload.
    pub fn load_config_file(
        &mut self,
        config_file: &[u8],
        delay: &mut impl DelayNs,
    ) -> Result<(), CommE> {
        if config_file.is_empty()
            || config_file.len() % 2 != 0
            || config_file.len() > CONFIG_FILE_MAX_LEN
        {
            return Err(Error::InvalidConfig);
        }

        match self.init_message() {
            Ok(InitMessage::InitOk) => {
                debug!("bmi270: initialization already done");
                return Ok(());
            }
            Ok(_) | Err(Error::InvalidValue) => {}
            Err(err) => return Err(err),
        }

        debug!("bmi270: uploading {=usize} byte config file", config_file.len());
        self.modify::<PwrConf, _>(|conf| conf.set_adv_power_save(false))?;
        self.config.advanced_power_save = AdvancedPowerSave::Disabled;
        delay.delay_us(ADV_POWER_SAVE_EXIT_DELAY_US);

        self.interface
            .write_register(REG_INIT_CTRL, INIT_CTRL_PREPARE)
            .map_err(Error::from)?;

        for (index, chunk) in config_file.chunks(CONFIG_CHUNK_LEN).enumerate() {
            let address = split_init_address(index * CONFIG_CHUNK_LEN);
            self.interface
                .write_many(REG_INIT_ADDR_0, &address)
                .map_err(Error::from)?;
            self.interface
                .write_many(REG_INIT_DATA, chunk)
                .map_err(Error::from)?;
        }

        self.interface
            .write_register(REG_INIT_CTRL, INIT_CTRL_COMPLETE)
            .map_err(Error::from)?;
        delay.delay_ms(CONFIG_LOAD_DELAY_MS);

        match self.init_message() {
            Ok(InitMessage::InitOk) => Ok(()),
            Ok(_) | Err(Error::InvalidValue) => {
                error!("bmi270: config file upload not acknowledged");
                Err(Error::InitFailed)
            }
            Err(err) => Err(err),
        }
    }

    /// Applies a new configuration to the device.
    ///
    /// Each register is programmed with a single read-modify-write, in the
    /// order `ACC_CONF`, `ACC_RANGE`, `GYR_CONF`, `GYR_RANGE`, `PWR_CTRL`,
    /// `PWR_CONF`. The cached configuration follows every register that was
    /// written successfully.
    pub fn configure(&mut self, config: Config) -> Result<(), CommE> {
        config.validate().map_err(|_| Error::InvalidConfig)?;

        self.modify::<AccConf, _>(|conf| {
            conf.set_odr(u8::from(config.accel_odr));
            conf.set_bandwidth(config.accel_bandwidth);
            conf.set_filter_perf(config.accel_filter_perf);
        })?;
        self.config.accel_odr = config.accel_odr;
        self.config.accel_bandwidth = config.accel_bandwidth;
        self.config.accel_filter_perf = config.accel_filter_perf;

        self.modify::<AccRange, _>(|range| range.set_range(config.accel_range))?;
        self.config.accel_range = config.accel_range;

        self.modify::<GyrConf, _>(|conf| {
            conf.set_odr(u8::from(config.gyro_odr));
            conf.set_bandwidth(u8::from(config.gyro_bandwidth));
            conf.set_noise_perf(config.gyro_noise_perf);
            conf.set_filter_perf(config.gyro_filter_perf);
        })?;
        self.config.gyro_odr = config.gyro_odr;
        self.config.gyro_bandwidth = config.gyro_bandwidth;
        self.config.gyro_noise_perf = config.gyro_noise_perf;
        self.config.gyro_filter_perf = config.gyro_filter_perf;

        self.modify::<GyrRange, _>(|range| range.set_range(u8::from(config.gyro_range)))?;
        self.config.gyro_range = config.gyro_range;

        self.modify::<PwrCtrl, _>(|ctrl| {
            ctrl.set_acc_en(matches!(config.accel_mode, AccelOperationMode::Enabled));
            ctrl.set_gyr_en(matches!(config.gyro_mode, GyroOperationMode::Enabled));
            ctrl.set_temp_en(matches!(config.temperature, TemperatureSensor::Enabled));
        })?;
        self.config.accel_mode = config.accel_mode;
        self.config.gyro_mode = config.gyro_mode;
        self.config.temperature = config.temperature;

        self.modify::<PwrConf, _>(|conf| {
            conf.set_adv_power_save(matches!(
                config.advanced_power_save,
                AdvancedPowerSave::Enabled
            ));
        })?;
        self.config.advanced_power_save = config.advanced_power_save;

        Ok(())
    }

    /// Issues a soft reset and waits for the device to come back.
    ///
    /// All registers return to their power-on values and the configuration file
    /// must be uploaded again.
    pub fn soft_reset(&mut self, delay: &mut impl DelayNs) -> Result<(), CommE> {
        self.interface
            .write_register(REG_CMD, SOFT_RESET_COMMAND)
            .map_err(Error::from)?;
        delay.delay_ms(SOFT_RESET_DELAY_MS);
        self.config = Config::power_on();

        // The interface falls back to I2C after a reset.
        self.interface.activate().map_err(Error::from)
    }

    // ==================================================================
    // == Identification & Status =======================================
    // ==================================================================
    /// Reads the `CHIP_ID` register.
    pub fn chip_id(&mut self) -> Result<u8, CommE> {
        self.interface
            .read_register(REG_CHIP_ID)
            .map_err(Error::from)
    }

    /// Verifies `CHIP_ID` against the BMI270 identifier.
    pub fn check_chip_id(&mut self) -> Result<(), CommE> {
        let id = self.chip_id()?;
        if id != EXPECTED_CHIP_ID {
            error!("bmi270: unexpected chip id {=u8:#x}", id);
            return Err(Error::DeviceIdMismatch);
        }

        Ok(())
    }

    /// Reads the `INTERNAL_STATUS` register.
    pub fn internal_status(&mut self) -> Result<InternalStatus, CommE> {
        self.read::<InternalStatus>()
    }

    /// Returns the decoded initialization message from `INTERNAL_STATUS`.
    pub fn init_message(&mut self) -> Result<InitMessage, CommE> {
        let status = self.internal_status()?;
        InitMessage::try_from(status.message()).map_err(|_| Error::InvalidValue)
    }

    /// Returns a snapshot of the `STATUS` register.
    pub fn status(&mut self) -> Result<StatusSnapshot, CommE> {
        self.read::<Status>().map(StatusSnapshot::from)
    }

    /// Reads and decodes `ERR_REG`, logging every raised flag.
    pub fn error_flags(&mut self) -> Result<SensorErrors, CommE> {
        let errors = SensorErrors::from(self.read::<ErrReg>()?);

        if errors.aux {
            warn!("bmi270: auxiliary interface error");
        }
        if errors.fifo {
            warn!("bmi270: FIFO overfilled while streaming");
        }
        if errors.internal != 0 {
            warn!("bmi270: internal sensor error {=u8}", errors.internal);
        }
        if errors.fatal {
            error!("bmi270: fatal error, power-on reset required");
        }

        Ok(errors)
    }

    // ==================================================================
    // == Register & Setting Access =====================================
    // ==================================================================
    /// Reads a single raw register.
    pub fn read_register(&mut self, register: u8) -> Result<u8, CommE> {
        self.interface
            .read_register(register)
            .map_err(Error::from)
    }

    /// Reads consecutive raw registers into `buf`.
    pub fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), CommE> {
        self.interface
            .read_many(register, buf)
            .map_err(Error::from)
    }

    /// Writes a raw register without validation.
    ///
    /// The cached configuration is not updated; prefer
    /// [`set_setting`](Self::set_setting) for fields that affect scaling.
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), CommE> {
        self.interface
            .write_register(register, value)
            .map_err(Error::from)
    }

    /// Programs one setting with a read-modify-write of its register.
    ///
    /// `value` is the raw, unshifted field encoding. Values outside the
    /// setting's enumeration fail with [`Error::InvalidValue`] before any bus
    /// traffic; other bits of the register are preserved.
    pub fn set_setting(&mut self, id: SettingId, value: u8) -> Result<(), CommE> {
        let descriptor = id.descriptor();
        if !descriptor.is_legal(value) {
            warn!("bmi270: rejected {} = {=u8}", id, value);
            return Err(Error::InvalidValue);
        }

        let current = self
            .interface
            .read_register(descriptor.register)
            .map_err(Error::from)?;

        let updated = descriptor.merge(current, value);
        if updated != current {
            self
                .interface
                .write_register(descriptor.register, updated)
                .map_err(Error::from)?;
        }

        self.config.record(id, value);
        trace!("bmi270: {} = {=u8}", id, value);
        Ok(())
    }

    /// Reads the raw field value of one setting.
    pub fn setting(&mut self, id: SettingId) -> Result<u8, CommE> {
        let descriptor = id.descriptor();
        let register = self
            .interface
            .read_register(descriptor.register)
            .map_err(Error::from)?;

        let value = descriptor.extract(register);
        self.config.record(id, value);
        Ok(value)
    }

    /// Programs a typed setting.
    pub fn set<S: Setting>(&mut self, value: S) -> Result<(), CommE> {
        self.set_setting(S::ID, value.into())
    }

    /// Reads a typed setting back from the device.
    ///
    /// Fails with [`Error::InvalidValue`] when the field holds an encoding the
    /// enumeration does not define.
    pub fn get<S: Setting>(&mut self) -> Result<S, CommE> {
        let raw = self.setting(S::ID)?;
        S::try_from(raw).map_err(|_| Error::InvalidValue)
    }

    /// Sets the accelerometer full-scale range.
    pub fn set_accel_range(&mut self, range: AccelRange) -> Result<(), CommE> {
        self.set(range)
    }

    /// Reads the accelerometer full-scale range.
    pub fn accel_range(&mut self) -> Result<AccelRange, CommE> {
        self.get()
    }

    /// Enables or disables the accelerometer.
    pub fn set_accel_operation_mode(&mut self, mode: AccelOperationMode) -> Result<(), CommE> {
        self.set(mode)
    }

    /// Reads whether the accelerometer is enabled.
    pub fn accel_operation_mode(&mut self) -> Result<AccelOperationMode, CommE> {
        self.get()
    }

    /// Sets the gyroscope full-scale range.
    pub fn set_gyro_range(&mut self, range: GyroRange) -> Result<(), CommE> {
        self.set(range)
    }

    /// Reads the gyroscope full-scale range.
    pub fn gyro_range(&mut self) -> Result<GyroRange, CommE> {
        self.get()
    }

    // ==================================================================
    // == Data Acquisition ==============================================
    // ==================================================================
    /// Reads a raw acceleration triplet.
    pub fn read_accel_raw(&mut self) -> Result<[i16; 3], CommE> {
        let mut raw = [0u8; 6];
        self.interface
            .read_many(REG_ACC_X_LSB, &mut raw)
            .map_err(Error::from)?;
        Ok(data::decode_axes(&raw))
    }

    /// Reads a raw angular rate triplet.
    pub fn read_gyro_raw(&mut self) -> Result<[i16; 3], CommE> {
        let mut raw = [0u8; 6];
        self.interface
            .read_many(REG_GYR_X_LSB, &mut raw)
            .map_err(Error::from)?;
        Ok(data::decode_axes(&raw))
    }

    /// Reads accelerometer and gyroscope samples in one burst.
    pub fn read_motion_raw(&mut self) -> Result<RawMotion, CommE> {
        let mut raw = [0u8; 12];
        self.interface
            .read_many(REG_ACC_X_LSB, &mut raw)
            .map_err(Error::from)?;
        Ok(RawMotion::from_bytes(&raw))
    }

    /// Returns acceleration in m/s², scaled with the cached range.
    pub fn acceleration(&mut self) -> Result<[f32; 3], CommE> {
        let raw = self.read_accel_raw()?;
        Ok(data::accel_to_mps2(raw, self.config.accel_range))
    }

    /// Returns angular rate in °/s, scaled with the cached range.
    pub fn angular_rate(&mut self) -> Result<[f32; 3], CommE> {
        let raw = self.read_gyro_raw()?;
        Ok(data::gyro_to_dps(raw, self.config.gyro_range))
    }

    /// Returns the die temperature in °C, or `None` while no sample is valid.
    pub fn temperature(&mut self) -> Result<Option<f32>, CommE> {
        let mut raw = [0u8; 2];
        self.interface
            .read_many(REG_TEMPERATURE_0, &mut raw)
            .map_err(Error::from)?;
        Ok(data::temperature_celsius(i16::from_le_bytes(raw)))
    }

    /// Reads the 24-bit sensor time counter (39.0625 µs per LSB).
    pub fn sensor_time(&mut self) -> Result<u32, CommE> {
        let mut raw = [0u8; 3];
        self.interface
            .read_many(REG_SENSORTIME_0, &mut raw)
            .map_err(Error::from)?;
        Ok(u32::from_le_bytes([raw[0], raw[1], raw[2], 0]))
    }

    // ==================================================================
    // == Internal Register Helpers =====================================
    // ==================================================================
    fn read<R: Register>(&mut self) -> Result<R, CommE> {
        self.interface
            .read_register(R::ADDRESS)
            .map(R::from)
            .map_err(Error::from)
    }

    fn modify<R, F>(&mut self, mutate: F) -> Result<R, CommE>
    where
        R: Register,
        F: FnOnce(&mut R),
    {
        debug_assert_eq!(R::ACCESS, RegisterAccess::ReadWrite, "register is not writable");

        let current = self
            .interface
            .read_register(R::ADDRESS)
            .map_err(Error::from)?;

        let mut register = R::from(current);
        mutate(&mut register);

        let updated: u8 = register.into();
        if updated != current {
            self
                .interface
                .write_register(R::ADDRESS, updated)
                .map_err(Error::from)?;
        }

        Ok(register)
    }
}
