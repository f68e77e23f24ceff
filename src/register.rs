//! Register addresses for AS5600 sensor.

/// Register addresses for AS5600 and AS5600L
///
/// 12-bit and 14-bit values span two consecutive registers; the variant
/// names the first (high byte) address of the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
#[repr(u8)]
pub enum Register {
    /// Number of times ZPOS and MPOS have been permanently written
    Zmco = 0x00,
    /// Zero position (12-bit)
    ZPos = 0x01,
    /// Maximum position (12-bit)
    MPos = 0x03,
    /// Maximum angle (12-bit)
    MAng = 0x05,
    /// Configuration (14-bit)
    Conf = 0x07,

    /// Magnet status flags
    Status = 0x0B,
    /// Unscaled, unmodified angle (12-bit)
    RawAngle = 0x0C,
    /// Scaled output angle with hysteresis applied (12-bit)
    Angle = 0x0E,

    /// AS5600L only: I2C address programmed into the device
    I2cAddr = 0x20,
    /// AS5600L only: I2C address the device answers to after update
    I2cUpdt = 0x21,

    /// Automatic gain control
    Agc = 0x1A,
    /// CORDIC magnitude (12-bit)
    Magnitude = 0x1B,
}

impl Register {
    /// Address of the low byte for register pairs
    #[must_use]
    pub const fn low_byte(self) -> u8 {
        self as u8 + 1
    }
}

impl From<Register> for u8 {
    fn from(reg: Register) -> u8 {
        reg as u8
    }
}

bitfield::bitfield! {
    /// CONF
    ///
    /// Bits 13:8 live in register 0x07, bits 7:0 in register 0x08
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct ConfigurationRegister(u16);
    impl Debug;
    u8;
    /// Watchdog: automatic low power mode after one minute without change
    pub wd, set_wd: 13;
    /// Fast filter threshold
    pub fth, set_fth: 12, 10;
    /// Slow filter
    pub sf, set_sf: 9, 8;
    /// PWM frequency
    pub pwmf, set_pwmf: 7, 6;
    /// Output stage
    ///
    /// - `00` = analog, full range 0% to 100% between GND and VDD
    /// - `01` = analog, reduced range 10% to 90%
    /// - `10` = digital PWM
    pub outs, set_outs: 5, 4;
    /// Hysteresis in LSBs
    pub hyst, set_hyst: 3, 2;
    /// Power mode
    pub pm, set_pm: 1, 0;
}

impl ConfigurationRegister {
    /// Get the raw 14-bit register value
    #[must_use]
    pub const fn raw(&self) -> u16 {
        self.0
    }
}

bitfield::bitfield! {
    /// STATUS
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct StatusRegister(u8);
    impl Debug;
    /// Magnet was detected
    pub md, _: 5;
    /// AGC maximum gain overflow, magnet too weak
    pub ml, _: 4;
    /// AGC minimum gain overflow, magnet too strong
    pub mh, _: 3;
}

impl StatusRegister {
    /// Check if a magnet is in front of the sensor
    #[must_use]
    #[inline(always)]
    pub fn magnet_detected(&self) -> bool {
        self.md()
    }

    /// Check if the magnetic field is too weak
    #[must_use]
    #[inline(always)]
    pub fn magnet_too_weak(&self) -> bool {
        self.ml()
    }

    /// Check if the magnetic field is too strong
    #[must_use]
    #[inline(always)]
    pub fn magnet_too_strong(&self) -> bool {
        self.mh()
    }

    /// Check if the magnet is detected and its field strength is within range
    #[must_use]
    #[inline(always)]
    pub fn magnetic_field_ok(&self) -> bool {
        self.md() && !self.ml() && !self.mh()
    }
}

bitfield::bitfield! {
    /// I2CADDR / I2CUPDT (AS5600L)
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct I2cAddressRegister(u8);
    impl Debug;
    u8;
    /// 7-bit I2C address
    pub address, set_address: 7, 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_registers_span_two_addresses() {
        assert_eq!(Register::ZPos.low_byte(), 0x02);
        assert_eq!(Register::Conf.low_byte(), 0x08);
        assert_eq!(Register::RawAngle.low_byte(), 0x0D);
        assert_eq!(Register::Magnitude.low_byte(), 0x1C);
    }

    #[test]
    fn configuration_fields_decode() {
        // WD=1, FTH=0b101, SF=0b10, PWMF=0b01, OUTS=0b10, HYST=0b11, PM=0b01
        let conf = ConfigurationRegister(0b1_101_10_01_10_11_01);
        assert!(conf.wd());
        assert_eq!(conf.fth(), 0b101);
        assert_eq!(conf.sf(), 0b10);
        assert_eq!(conf.pwmf(), 0b01);
        assert_eq!(conf.outs(), 0b10);
        assert_eq!(conf.hyst(), 0b11);
        assert_eq!(conf.pm(), 0b01);
    }

    #[test]
    fn status_flags_decode() {
        let status = StatusRegister(0b0010_0000);
        assert!(status.magnet_detected());
        assert!(status.magnetic_field_ok());

        let status = StatusRegister(0b0011_0000);
        assert!(status.magnet_too_weak());
        assert!(!status.magnetic_field_ok());

        let status = StatusRegister(0b0010_1000);
        assert!(status.magnet_too_strong());
        assert!(!status.magnet_too_weak());

        // Bits outside MD/ML/MH are ignored
        let status = StatusRegister(0b1100_0111);
        assert!(!status.magnet_detected());
        assert!(!status.magnet_too_weak());
        assert!(!status.magnet_too_strong());
    }

    #[test]
    fn address_register_keeps_bit_zero() {
        let mut reg = I2cAddressRegister(0x01);
        reg.set_address(0x40);
        assert_eq!(reg.0, 0x81);
        assert_eq!(reg.address(), 0x40);
    }
}
