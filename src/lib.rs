#![no_std]
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

mod angle;
mod config;
mod driver;
mod error;
mod register;
mod time;
mod utils;
mod variant;
mod velocity;

pub use angle::{
    ANGLE_MAX, AngleUnit, DEGREES_TO_RAW, OFFSET_LIMIT_DEGREES, RAW_TO_DEGREES, RAW_TO_RADIANS,
    apply_offset, degrees_to_raw, raw_to_degrees, raw_to_radians, shortest_delta,
};
pub use config::{
    ConfigField, ConfigValue, FastFilter, Hysteresis, OutputMode, PowerMode, PwmFrequency,
    SlowFilter, Watchdog,
};
pub use driver::{As5600, DEFAULT_ADDRESS, Direction, NoPin};
pub use error::Error;
pub use register::{ConfigurationRegister, I2cAddressRegister, Register, StatusRegister};
pub use time::TimeSource;
pub use variant::{AS5600L_DEFAULT_ADDRESS, As5600L, MAX_ADDRESS, MIN_ADDRESS, is_valid_address};
pub use velocity::VelocityEstimator;
