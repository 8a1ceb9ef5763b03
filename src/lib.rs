//! `#![no_std]` driver for the Bosch BMI270 accelerometer and gyroscope.
//!
//! The driver exposes register-level access over I2C or SPI, a table of named
//! [settings](settings) programmed with read-modify-write, and scaled
//! acceleration, angular rate and temperature readout.
//!
//! ```rust
//! use bmi270::params::{AccelRange, GyroRange};
//! use bmi270::Config;
//!
//! let config = Config::new()
//!     .accel_range(AccelRange::G8)
//!     .gyro_range(GyroRange::Dps125)
//!     .build();
//! assert!(config.validate().is_ok());
//! ```
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

mod error;

pub mod config;
pub mod data;
pub mod device;
pub mod interface;
pub mod params;
pub mod registers;
pub mod settings;

pub use crate::config::Config;
pub use crate::device::Bmi270;
pub use crate::error::{Error, Result};
pub use crate::settings::{Setting, SettingId};
