//! AS5600L: the AS5600 with a programmable I2C address

use core::ops::{Deref, DerefMut};

use embedded_hal::i2c::{self, I2c};

use crate::{
    driver::{As5600, NoPin},
    error::Error,
    register::{I2cAddressRegister, Register},
};

/// Factory I2C address of the AS5600L
pub const AS5600L_DEFAULT_ADDRESS: u8 = 0x40;

/// Lowest address outside the reserved I2C range
pub const MIN_ADDRESS: u8 = 0x08;
/// Highest address outside the reserved I2C range
pub const MAX_ADDRESS: u8 = 0x77;

/// Check that `address` is a 7-bit address outside the reserved ranges
#[must_use]
pub const fn is_valid_address(address: u8) -> bool {
    address >= MIN_ADDRESS && address <= MAX_ADDRESS
}

/// AS5600L driver instance
///
/// Everything an [`As5600`] does is available through deref; this type adds
/// the address registers and keeps the bound address in step with them.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct As5600L<I2C, DIR = NoPin> {
    inner: As5600<I2C, DIR>,
}

impl<I2C> As5600L<I2C, NoPin> {
    /// Create a new AS5600L driver instance at the factory address
    pub fn new(i2c: I2C) -> Self {
        Self::with_direction_pin(i2c, NoPin)
    }
}

impl<I2C, DIR> As5600L<I2C, DIR> {
    /// Create a new AS5600L driver instance controlling the DIR pin
    pub fn with_direction_pin(i2c: I2C, direction_pin: DIR) -> Self {
        Self {
            inner: As5600::with_address(i2c, direction_pin, AS5600L_DEFAULT_ADDRESS),
        }
    }

    /// Release the I2C bus and DIR pin, consuming the driver
    pub fn release(self) -> (I2C, DIR) {
        self.inner.release()
    }
}

impl<I2C, DIR> Deref for As5600L<I2C, DIR> {
    type Target = As5600<I2C, DIR>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<I2C, DIR> DerefMut for As5600L<I2C, DIR> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<I2C, DIR, E> As5600L<I2C, DIR>
where
    I2C: I2c<Error = E>,
    E: i2c::Error,
{
    /// Move the device to a new I2C address
    ///
    /// Writes I2CADDR and then I2CUPDT at the current address; the device
    /// answers at `address` from then on, and so does this driver. The new
    /// address is volatile unless burned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an address outside
    /// `0x08..=0x77`, or an error if I2C communication fails. On failure the
    /// driver keeps its current address, but if the I2CUPDT write is the one
    /// that failed the device's I2CADDR already holds `address`.
    pub fn set_address(&mut self, address: u8) -> Result<(), Error<E>> {
        self.set_i2c_address_register(address)?;
        self.set_i2c_update_register(address)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "AS5600L moved from 0x{:02X} to 0x{:02X}",
            self.inner.address,
            address
        );

        self.inner.address = address;
        Ok(())
    }

    /// Address stored in I2CADDR
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn i2c_address_register(&mut self) -> Result<u8, Error<E>> {
        self.read_address(Register::I2cAddr)
    }

    /// Store `address` in I2CADDR without switching to it
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an address outside
    /// `0x08..=0x77`, or an error if I2C communication fails
    pub fn set_i2c_address_register(&mut self, address: u8) -> Result<(), Error<E>> {
        self.modify_address(Register::I2cAddr, address)
    }

    /// Address stored in I2CUPDT
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn i2c_update_register(&mut self) -> Result<u8, Error<E>> {
        self.read_address(Register::I2cUpdt)
    }

    /// Store `address` in I2CUPDT
    ///
    /// The device switches to the new address immediately, but the driver
    /// does not follow; use [`Self::set_address`] for that.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an address outside
    /// `0x08..=0x77`, or an error if I2C communication fails
    pub fn set_i2c_update_register(&mut self, address: u8) -> Result<(), Error<E>> {
        self.modify_address(Register::I2cUpdt, address)
    }

    fn read_address(&mut self, register: Register) -> Result<u8, Error<E>> {
        self.inner
            .read_register(register)
            .map(|value| I2cAddressRegister(value).address())
    }

    fn modify_address(&mut self, register: Register, address: u8) -> Result<(), Error<E>> {
        if !is_valid_address(address) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Rejected I2C address 0x{:02X}", address);
            return Err(Error::InvalidArgument);
        }

        let mut value = I2cAddressRegister(self.inner.read_register(register)?);
        value.set_address(address);
        self.inner.write_register(register, value.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_addresses_are_invalid() {
        assert!(!is_valid_address(0x00));
        assert!(!is_valid_address(0x07));
        assert!(is_valid_address(0x08));
        assert!(is_valid_address(AS5600L_DEFAULT_ADDRESS));
        assert!(is_valid_address(0x77));
        assert!(!is_valid_address(0x78));
        assert!(!is_valid_address(0x80));
    }
}
