//! Fields of the CONF register.
//!
//! Each field is described by its width mask, its bit offset within the
//! 14-bit configuration word and how many of its values are defined.

use crate::utils;

/// Settable field of the configuration word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigField {
    /// PM, bits 1:0
    PowerMode,
    /// HYST, bits 3:2
    Hysteresis,
    /// OUTS, bits 5:4
    OutputMode,
    /// PWMF, bits 7:6
    PwmFrequency,
    /// SF, bits 9:8
    SlowFilter,
    /// FTH, bits 12:10
    FastFilter,
    /// WD, bit 13
    Watchdog,
}

impl ConfigField {
    /// Every field, lowest bits first
    pub const ALL: [ConfigField; 7] = [
        ConfigField::PowerMode,
        ConfigField::Hysteresis,
        ConfigField::OutputMode,
        ConfigField::PwmFrequency,
        ConfigField::SlowFilter,
        ConfigField::FastFilter,
        ConfigField::Watchdog,
    ];

    /// `(mask, shift, number of defined values)`
    const fn layout(self) -> (u16, u8, u8) {
        match self {
            ConfigField::PowerMode => (0b11, 0, 4),
            ConfigField::Hysteresis => (0b11, 2, 4),
            ConfigField::OutputMode => (0b11, 4, 3),
            ConfigField::PwmFrequency => (0b11, 6, 4),
            ConfigField::SlowFilter => (0b11, 8, 4),
            ConfigField::FastFilter => (0b111, 10, 8),
            ConfigField::Watchdog => (0b1, 13, 2),
        }
    }

    /// Field mask, not shifted
    #[must_use]
    pub const fn mask(self) -> u16 {
        self.layout().0
    }

    /// Position of the field's lowest bit
    #[must_use]
    pub const fn shift(self) -> u8 {
        self.layout().1
    }

    /// Number of defined values, starting at zero
    #[must_use]
    pub const fn value_count(self) -> u8 {
        self.layout().2
    }

    /// Check that `value` is one of the field's defined values
    #[must_use]
    pub const fn accepts(self, value: u8) -> bool {
        value < self.value_count()
    }

    /// Read this field out of a configuration word
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn extract(self, word: u16) -> u8 {
        utils::get_bitfield(word, self.mask(), self.shift()) as u8
    }

    /// Write `value` into this field of `word`
    ///
    /// Returns `None` if `value` is out of range for the field.
    #[must_use]
    pub fn insert(self, word: u16, value: u8) -> Option<u16> {
        self.accepts(value).then(|| self.replace(word, value))
    }

    /// Write `value` into this field of `word` without range checking
    ///
    /// Bits of `value` above the field width are dropped.
    pub(crate) fn replace(self, word: u16, value: u8) -> u16 {
        utils::set_bitfield(word, self.mask(), self.shift(), u16::from(value))
    }
}

/// A typed value of one configuration field
pub trait ConfigValue: Copy + Into<u8> + TryFrom<u8, Error = u8> {
    /// Field the value belongs to
    const FIELD: ConfigField;
}

macro_rules! config_value {
    (
        $(#[$meta:meta])*
        $name:ident => $field:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        #[repr(u8)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $value, )+
        }

        impl ConfigValue for $name {
            const FIELD: ConfigField = ConfigField::$field;
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = u8;

            fn try_from(value: u8) -> Result<Self, u8> {
                match value {
                    $( $value => Ok($name::$variant), )+
                    other => Err(other),
                }
            }
        }
    };
}

config_value! {
    /// Power mode and polling interval
    PowerMode => PowerMode {
        /// Always on
        Nominal = 0,
        /// Low power mode 1, 5 ms polling
        Low1 = 1,
        /// Low power mode 2, 20 ms polling
        Low2 = 2,
        /// Low power mode 3, 100 ms polling
        Low3 = 3,
    }
}

config_value! {
    /// Output hysteresis
    Hysteresis => Hysteresis {
        /// No hysteresis
        Off = 0,
        /// 1 LSB
        Lsb1 = 1,
        /// 2 LSBs
        Lsb2 = 2,
        /// 3 LSBs
        Lsb3 = 3,
    }
}

config_value! {
    /// Output stage of the OUT pin
    OutputMode => OutputMode {
        /// Analog, 0% to 100% of supply
        Analog100 = 0,
        /// Analog, 10% to 90% of supply
        Analog90 = 1,
        /// Digital PWM
        Pwm = 2,
    }
}

config_value! {
    /// PWM output frequency
    PwmFrequency => PwmFrequency {
        /// 115 Hz
        Hz115 = 0,
        /// 230 Hz
        Hz230 = 1,
        /// 460 Hz
        Hz460 = 2,
        /// 920 Hz
        Hz920 = 3,
    }
}

config_value! {
    /// Slow filter step response
    SlowFilter => SlowFilter {
        /// 16x, slowest and least noisy
        X16 = 0,
        /// 8x
        X8 = 1,
        /// 4x
        X4 = 2,
        /// 2x
        X2 = 3,
    }
}

config_value! {
    /// Fast filter threshold
    FastFilter => FastFilter {
        /// Slow filter only
        None = 0,
        /// 6 LSBs
        Lsb6 = 1,
        /// 7 LSBs
        Lsb7 = 2,
        /// 9 LSBs
        Lsb9 = 3,
        /// 18 LSBs
        Lsb18 = 4,
        /// 21 LSBs
        Lsb21 = 5,
        /// 24 LSBs
        Lsb24 = 6,
        /// 10 LSBs
        Lsb10 = 7,
    }
}

config_value! {
    /// Watchdog, drops into low power mode 3 after a minute at rest
    Watchdog => Watchdog {
        /// Disabled
        Off = 0,
        /// Enabled
        On = 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::ConfigurationRegister;

    #[test]
    fn rejects_values_past_field_range() {
        assert!(ConfigField::PowerMode.accepts(3));
        assert!(!ConfigField::PowerMode.accepts(4));
        assert!(!ConfigField::OutputMode.accepts(3));
        assert!(ConfigField::FastFilter.accepts(7));
        assert!(!ConfigField::FastFilter.accepts(8));
        assert!(ConfigField::Watchdog.accepts(1));
        assert!(!ConfigField::Watchdog.accepts(2));
        assert_eq!(ConfigField::PowerMode.insert(0, 4), None);
    }

    #[test]
    fn fields_do_not_overlap() {
        let mut seen = 0u16;
        for field in ConfigField::ALL {
            let bits = field.mask() << field.shift();
            assert_eq!(seen & bits, 0, "{field:?} overlaps");
            seen |= bits;
        }
        assert_eq!(seen, 0x3FFF);
    }

    #[test]
    fn insert_preserves_neighbouring_fields() {
        let word = ConfigField::PowerMode.insert(0, 3).unwrap();
        let word = ConfigField::Hysteresis.insert(word, 2).unwrap();
        assert_eq!(ConfigField::PowerMode.extract(word), 3);
        assert_eq!(ConfigField::Hysteresis.extract(word), 2);

        let word = ConfigField::Hysteresis.insert(word, 0).unwrap();
        assert_eq!(ConfigField::PowerMode.extract(word), 3);
    }

    #[test]
    fn replace_masks_to_field_width() {
        let word = ConfigField::Watchdog.replace(0, 1);
        assert_eq!(word, 1 << 13);
        assert_eq!(ConfigField::PowerMode.replace(0b1100, 0b111), 0b1111);
        assert_eq!(
            ConfigField::Hysteresis.insert(0, 2),
            Some(ConfigField::Hysteresis.replace(0, 2))
        );
    }

    #[test]
    fn table_matches_register_layout() {
        let word = 0b1_101_10_01_10_11_01;
        let conf = ConfigurationRegister(word);
        assert_eq!(ConfigField::PowerMode.extract(word), conf.pm());
        assert_eq!(ConfigField::Hysteresis.extract(word), conf.hyst());
        assert_eq!(ConfigField::OutputMode.extract(word), conf.outs());
        assert_eq!(ConfigField::PwmFrequency.extract(word), conf.pwmf());
        assert_eq!(ConfigField::SlowFilter.extract(word), conf.sf());
        assert_eq!(ConfigField::FastFilter.extract(word), conf.fth());
        assert_eq!(ConfigField::Watchdog.extract(word), u8::from(conf.wd()));
    }

    #[test]
    fn typed_values_round_trip_through_u8() {
        assert_eq!(PowerMode::try_from(3), Ok(PowerMode::Low3));
        assert_eq!(PowerMode::try_from(4), Err(4));
        assert_eq!(OutputMode::try_from(3), Err(3));
        assert_eq!(u8::from(FastFilter::Lsb10), 7);
        assert_eq!(FastFilter::FIELD, ConfigField::FastFilter);
    }
}
