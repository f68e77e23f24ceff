//! Blocking driver for AS5600 magnetic position sensor

use core::convert::Infallible;

use embedded_hal::{
    digital::{self, OutputPin},
    i2c::{self, ErrorKind, I2c},
};

use crate::{
    angle::{self, AngleUnit, OFFSET_LIMIT_DEGREES},
    config::{
        ConfigField, ConfigValue, FastFilter, Hysteresis, OutputMode, PowerMode, PwmFrequency,
        SlowFilter, Watchdog,
    },
    error::Error,
    register::{ConfigurationRegister, Register, StatusRegister},
    time::TimeSource,
    utils::{self, WORD12_MASK, WORD14_MASK},
    velocity::VelocityEstimator,
};

/// Fixed I2C address of the AS5600
pub const DEFAULT_ADDRESS: u8 = 0x36;

/// Rotation sense, as wired to the DIR pin
///
/// `Clockwise` drives the pin low, `CounterClockwise` drives it high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Angle increases with clockwise rotation
    #[default]
    Clockwise,
    /// Angle increases with counter-clockwise rotation
    CounterClockwise,
}

/// Stand-in for a DIR pin that is hardwired or not connected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoPin;

impl digital::ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// AS5600 driver instance
///
/// Owns the I2C bus handle and, optionally, the DIR pin. Apart from the
/// software offset and the last angular speed sample nothing is cached:
/// every getter reads the device.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct As5600<I2C, DIR = NoPin> {
    i2c: I2C,
    direction_pin: DIR,
    pub(crate) address: u8,
    direction: Direction,
    offset: u16,
    velocity: VelocityEstimator,
    last_error: Option<ErrorKind>,
}

impl<I2C> As5600<I2C, NoPin> {
    /// Create a new AS5600 driver instance without a DIR pin
    pub fn new(i2c: I2C) -> Self {
        Self::with_direction_pin(i2c, NoPin)
    }
}

impl<I2C, DIR> As5600<I2C, DIR> {
    /// Create a new AS5600 driver instance controlling the DIR pin
    ///
    /// The pin is left untouched until [`Self::set_direction`] is called.
    pub fn with_direction_pin(i2c: I2C, direction_pin: DIR) -> Self {
        Self::with_address(i2c, direction_pin, DEFAULT_ADDRESS)
    }

    pub(crate) fn with_address(i2c: I2C, direction_pin: DIR, address: u8) -> Self {
        Self {
            i2c,
            direction_pin,
            address,
            direction: Direction::Clockwise,
            offset: 0,
            velocity: VelocityEstimator::new(),
            last_error: None,
        }
    }

    /// Release the I2C bus and DIR pin, consuming the driver
    pub fn release(self) -> (I2C, DIR) {
        (self.i2c, self.direction_pin)
    }

    /// I2C address the driver talks to
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Last direction set with [`Self::set_direction`]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Outcome of the most recent bus transaction
    ///
    /// `None` if it succeeded (or nothing has been sent yet). Arguments
    /// rejected before reaching the bus do not change it.
    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }

    /// Software offset in raw steps (0-4095)
    pub fn offset_raw(&self) -> u16 {
        self.offset
    }

    /// Software offset in degrees (0-359.9)
    pub fn offset(&self) -> f32 {
        angle::raw_to_degrees(self.offset)
    }

    /// Forget the previous sample used by [`Self::angular_speed`]
    pub fn reset_angular_speed(&mut self) {
        self.velocity.reset();
    }
}

impl<I2C, DIR> As5600<I2C, DIR>
where
    DIR: OutputPin,
{
    /// Set the rotation sense and drive the DIR pin to match
    ///
    /// # Errors
    ///
    /// Returns the pin's error if it cannot be driven; the stored direction
    /// is left unchanged in that case.
    pub fn set_direction(&mut self, direction: Direction) -> Result<(), DIR::Error> {
        match direction {
            Direction::Clockwise => self.direction_pin.set_low()?,
            Direction::CounterClockwise => self.direction_pin.set_high()?,
        }
        self.direction = direction;
        Ok(())
    }
}

impl<I2C, DIR, E> As5600<I2C, DIR>
where
    I2C: I2c<Error = E>,
    E: i2c::Error,
{
    fn track<T>(&mut self, result: Result<T, E>) -> Result<T, Error<E>> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Ok(value)
            }
            Err(e) => {
                let kind = e.kind();
                #[cfg(feature = "defmt")]
                defmt::warn!("I2C error talking to 0x{:02X}: {}", self.address, kind);
                self.last_error = Some(kind);
                Err(Error::Communication(e))
            }
        }
    }

    fn read_byte(&mut self, address: u8) -> Result<u8, Error<E>> {
        let mut buffer = [0u8; 1];
        let result = self.i2c.write_read(self.address, &[address], &mut buffer);
        self.track(result)?;

        #[cfg(feature = "defmt")]
        defmt::trace!("Register 0x{:02X} value: 0x{:02X}", address, buffer[0]);

        Ok(buffer[0])
    }

    fn write_byte(&mut self, address: u8, value: u8) -> Result<(), Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("Writing 0x{:02X} to register 0x{:02X}", value, address);

        let result = self.i2c.write(self.address, &[address, value]);
        self.track(result)
    }

    /// Read a single-byte register
    pub(crate) fn read_register(&mut self, register: Register) -> Result<u8, Error<E>> {
        self.read_byte(register.into())
    }

    /// Write a single-byte register
    pub(crate) fn write_register(&mut self, register: Register, value: u8) -> Result<(), Error<E>> {
        self.write_byte(register.into(), value)
    }

    /// Read a register pair
    ///
    /// The high byte comes first; bits above `mask` are dropped.
    fn read_word(&mut self, register: Register, mask: u16) -> Result<u16, Error<E>> {
        let high = self.read_byte(register.into())?;
        let low = self.read_byte(register.low_byte())?;
        let value = utils::assemble_word(high, low, mask);

        #[cfg(feature = "defmt")]
        defmt::debug!("Register pair 0x{:02X} value: 0x{:04X}", u8::from(register), value);

        Ok(value)
    }

    /// Write a register pair, high byte first
    ///
    /// The caller validates `value` against the register width.
    fn write_word(&mut self, register: Register, value: u16) -> Result<(), Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Writing 0x{:04X} to register pair 0x{:02X}", value, u8::from(register));

        let [high, low] = utils::split_word(value);
        self.write_byte(register.into(), high)?;
        self.write_byte(register.low_byte(), low)
    }

    fn write_word12(&mut self, register: Register, value: u16) -> Result<(), Error<E>> {
        if value > WORD12_MASK {
            #[cfg(feature = "defmt")]
            defmt::warn!("Rejected 12-bit value {} for 0x{:02X}", value, u8::from(register));
            return Err(Error::InvalidArgument);
        }
        self.write_word(register, value)
    }

    /// Check that the sensor acknowledges its address
    ///
    /// Sends an empty write; any bus error counts as not connected and is
    /// kept in [`Self::last_error`].
    pub fn is_connected(&mut self) -> bool {
        let result = self.i2c.write(self.address, &[]);
        self.track(result).is_ok()
    }

    /// Number of times ZPOS and MPOS have been burned (0-3)
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn zmco(&mut self) -> Result<u8, Error<E>> {
        self.read_register(Register::Zmco)
    }

    /// Get the 12-bit zero position (start of the output range)
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn z_position(&mut self) -> Result<u16, Error<E>> {
        self.read_word(Register::ZPos, WORD12_MASK)
    }

    /// Set the 12-bit zero position
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `value` exceeds 4095, or an
    /// error if I2C communication fails
    pub fn set_z_position(&mut self, value: u16) -> Result<(), Error<E>> {
        self.write_word12(Register::ZPos, value)
    }

    /// Get the 12-bit maximum position (end of the output range)
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn m_position(&mut self) -> Result<u16, Error<E>> {
        self.read_word(Register::MPos, WORD12_MASK)
    }

    /// Set the 12-bit maximum position
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `value` exceeds 4095, or an
    /// error if I2C communication fails
    pub fn set_m_position(&mut self, value: u16) -> Result<(), Error<E>> {
        self.write_word12(Register::MPos, value)
    }

    /// Get the 12-bit maximum angle
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn max_angle(&mut self) -> Result<u16, Error<E>> {
        self.read_word(Register::MAng, WORD12_MASK)
    }

    /// Set the 12-bit maximum angle
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `value` exceeds 4095, or an
    /// error if I2C communication fails
    pub fn set_max_angle(&mut self, value: u16) -> Result<(), Error<E>> {
        self.write_word12(Register::MAng, value)
    }

    /// Get the whole 14-bit configuration register
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn configuration(&mut self) -> Result<ConfigurationRegister, Error<E>> {
        self.read_word(Register::Conf, WORD14_MASK)
            .map(ConfigurationRegister)
    }

    /// Overwrite the whole 14-bit configuration register
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `value` has bits above bit 13
    /// set, or an error if I2C communication fails
    pub fn set_configuration(&mut self, value: u16) -> Result<(), Error<E>> {
        if value > WORD14_MASK {
            #[cfg(feature = "defmt")]
            defmt::warn!("Rejected configuration 0x{:04X}", value);
            return Err(Error::InvalidArgument);
        }
        self.write_word(Register::Conf, value)
    }

    /// Read one field of the configuration register
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn config_field(&mut self, field: ConfigField) -> Result<u8, Error<E>> {
        let word = self.read_word(Register::Conf, WORD14_MASK)?;
        Ok(field.extract(word))
    }

    /// Change one field of the configuration register
    ///
    /// The register is read, the field replaced and the result written back,
    /// so every other field keeps its current value. Values outside the
    /// field's range are rejected before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an out-of-range value, or an
    /// error if I2C communication fails
    pub fn set_config_field(&mut self, field: ConfigField, value: u8) -> Result<(), Error<E>> {
        if !field.accepts(value) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Rejected value {} for {}", value, field);
            return Err(Error::InvalidArgument);
        }

        let word = self.read_word(Register::Conf, WORD14_MASK)?;
        self.write_word(Register::Conf, field.replace(word, value))
    }

    /// Read a typed configuration value
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedValue`] if the field holds an undefined
    /// value, or an error if I2C communication fails
    pub fn config<T: ConfigValue>(&mut self) -> Result<T, Error<E>> {
        let value = self.config_field(T::FIELD)?;
        T::try_from(value).map_err(Error::UnexpectedValue)
    }

    /// Write a typed configuration value
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn set_config<T: ConfigValue>(&mut self, value: T) -> Result<(), Error<E>> {
        self.set_config_field(T::FIELD, value.into())
    }

    /// Get the power mode
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn power_mode(&mut self) -> Result<PowerMode, Error<E>> {
        self.config()
    }

    /// Set the power mode
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), Error<E>> {
        self.set_config(mode)
    }

    /// Get the output hysteresis
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn hysteresis(&mut self) -> Result<Hysteresis, Error<E>> {
        self.config()
    }

    /// Set the output hysteresis
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn set_hysteresis(&mut self, hysteresis: Hysteresis) -> Result<(), Error<E>> {
        self.set_config(hysteresis)
    }

    /// Get the output stage of the OUT pin
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedValue`] for the undefined mode `0b11`, or
    /// an error if I2C communication fails
    pub fn output_mode(&mut self) -> Result<OutputMode, Error<E>> {
        self.config()
    }

    /// Set the output stage of the OUT pin
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn set_output_mode(&mut self, mode: OutputMode) -> Result<(), Error<E>> {
        self.set_config(mode)
    }

    /// Get the PWM output frequency
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn pwm_frequency(&mut self) -> Result<PwmFrequency, Error<E>> {
        self.config()
    }

    /// Set the PWM output frequency
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn set_pwm_frequency(&mut self, frequency: PwmFrequency) -> Result<(), Error<E>> {
        self.set_config(frequency)
    }

    /// Get the slow filter setting
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn slow_filter(&mut self) -> Result<SlowFilter, Error<E>> {
        self.config()
    }

    /// Set the slow filter
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn set_slow_filter(&mut self, filter: SlowFilter) -> Result<(), Error<E>> {
        self.set_config(filter)
    }

    /// Get the fast filter threshold
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn fast_filter(&mut self) -> Result<FastFilter, Error<E>> {
        self.config()
    }

    /// Set the fast filter threshold
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn set_fast_filter(&mut self, filter: FastFilter) -> Result<(), Error<E>> {
        self.set_config(filter)
    }

    /// Get the watchdog setting
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn watchdog(&mut self) -> Result<Watchdog, Error<E>> {
        self.config()
    }

    /// Enable or disable the watchdog
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn set_watchdog(&mut self, watchdog: Watchdog) -> Result<(), Error<E>> {
        self.set_config(watchdog)
    }

    /// Get the 12-bit raw angle, before scaling to the ZPOS/MPOS range
    ///
    /// The software offset is not applied.
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn raw_angle(&mut self) -> Result<u16, Error<E>> {
        self.read_word(Register::RawAngle, WORD12_MASK)
    }

    /// Get the 12-bit scaled angle as computed by the device
    ///
    /// The software offset is not applied.
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn angle(&mut self) -> Result<u16, Error<E>> {
        self.read_word(Register::Angle, WORD12_MASK)
    }

    /// Get the scaled angle shifted by the software offset
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn angle_with_offset(&mut self) -> Result<u16, Error<E>> {
        let angle = self.angle()?;
        Ok(angle::apply_offset(angle, self.offset))
    }

    /// Get the offset-corrected angle in degrees (0-359.9)
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn angle_degrees(&mut self) -> Result<f32, Error<E>> {
        self.angle_with_offset().map(angle::raw_to_degrees)
    }

    /// Get the offset-corrected angle in radians (0-2π)
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn angle_radians(&mut self) -> Result<f32, Error<E>> {
        self.angle_with_offset().map(angle::raw_to_radians)
    }

    /// Set the software offset in degrees
    ///
    /// Negative offsets wrap, so `-90.0` is stored as 270°. The value is
    /// quantized to the nearest raw step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `degrees` is not finite or its
    /// magnitude exceeds 360°
    pub fn set_offset(&mut self, degrees: f32) -> Result<(), Error<E>> {
        self.offset = Self::offset_steps(degrees)?;
        Ok(())
    }

    /// Add `degrees` to the current software offset
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `degrees` is not finite or its
    /// magnitude exceeds 360°
    pub fn increase_offset(&mut self, degrees: f32) -> Result<(), Error<E>> {
        let steps = Self::offset_steps(degrees)?;
        self.offset = angle::apply_offset(self.offset, steps);
        Ok(())
    }

    fn offset_steps(degrees: f32) -> Result<u16, Error<E>> {
        if !degrees.is_finite() || libm::fabsf(degrees) > OFFSET_LIMIT_DEGREES {
            #[cfg(feature = "defmt")]
            defmt::warn!("Rejected offset {}°", degrees);
            return Err(Error::InvalidArgument);
        }
        angle::degrees_to_raw(degrees).ok_or(Error::InvalidArgument)
    }

    /// Get the magnet status register
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn status(&mut self) -> Result<StatusRegister, Error<E>> {
        self.read_register(Register::Status).map(StatusRegister)
    }

    /// Check whether a magnet is detected
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn detect_magnet(&mut self) -> Result<bool, Error<E>> {
        self.status().map(|status| status.magnet_detected())
    }

    /// Check whether the magnetic field is too weak (ML)
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn magnet_too_weak(&mut self) -> Result<bool, Error<E>> {
        self.status().map(|status| status.magnet_too_weak())
    }

    /// Check whether the magnetic field is too strong (MH)
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn magnet_too_strong(&mut self) -> Result<bool, Error<E>> {
        self.status().map(|status| status.magnet_too_strong())
    }

    /// Get the automatic gain control value
    ///
    /// Range depends on supply: 0-255 at 5 V, 0-128 at 3.3 V. Lower means
    /// a stronger field.
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn agc(&mut self) -> Result<u8, Error<E>> {
        self.read_register(Register::Agc)
    }

    /// Get the 12-bit CORDIC magnitude
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn magnitude(&mut self) -> Result<u16, Error<E>> {
        self.read_word(Register::Magnitude, WORD12_MASK)
    }

    /// Approximate angular speed since the previous call
    ///
    /// Reads the raw angle, timestamps it with `clock` and compares it with
    /// the previous sample along the shorter way round. The first call after
    /// construction (or [`Self::reset_angular_speed`]) returns `0.0`. Only
    /// meaningful when the shaft turns less than half a revolution between
    /// calls.
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails; the previous sample is
    /// kept in that case
    pub fn angular_speed<T: TimeSource>(
        &mut self,
        clock: &T,
        unit: AngleUnit,
    ) -> Result<f32, Error<E>> {
        let raw = self.raw_angle()?;
        let now = clock.now_us();
        Ok(self.velocity.update(raw, now, unit))
    }
}
