/// Mask for 12-bit register pairs (ZPOS, MPOS, MANG, angles, magnitude)
pub const WORD12_MASK: u16 = 0x0FFF;
/// Mask for the 14-bit CONF register pair
pub const WORD14_MASK: u16 = 0x3FFF;

/// Assemble a register pair read as two bytes, high byte first
pub fn assemble_word(high: u8, low: u8, mask: u16) -> u16 {
    u16::from_be_bytes([high, low]) & mask
}

/// Split a register pair value into its high and low bytes
pub fn split_word(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

/// Extract `mask`-wide field at `shift` from `word`
pub fn get_bitfield(word: u16, mask: u16, shift: u8) -> u16 {
    (word >> shift) & mask
}

/// Replace the field at `shift` in `word`, leaving every other bit untouched
pub fn set_bitfield(word: u16, mask: u16, shift: u8, value: u16) -> u16 {
    (word & !(mask << shift)) | ((value & mask) << shift)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_high_nibble_above_low_byte() {
        assert_eq!(assemble_word(0x0A, 0xBC, WORD12_MASK), 0x0ABC);
        assert_eq!(assemble_word(0x0F, 0xFF, WORD12_MASK), 4095);
    }

    #[test]
    fn assembly_drops_bits_above_mask() {
        assert_eq!(assemble_word(0xFA, 0xBC, WORD12_MASK), 0x0ABC);
        assert_eq!(assemble_word(0xFF, 0xFF, WORD14_MASK), 0x3FFF);
    }

    #[test]
    fn split_puts_high_nibble_first() {
        assert_eq!(split_word(0x0ABC), [0x0A, 0xBC]);
        assert_eq!(split_word(0), [0x00, 0x00]);
    }

    #[test]
    fn set_bitfield_preserves_other_bits() {
        // PM=0b11 already set, write HYST=0b10
        let word = set_bitfield(0b0000_0011, 0b11, 2, 0b10);
        assert_eq!(word, 0b0000_1011);
        assert_eq!(get_bitfield(word, 0b11, 0), 0b11);
        assert_eq!(get_bitfield(word, 0b11, 2), 0b10);
    }

    #[test]
    fn set_bitfield_clears_old_value() {
        let word = set_bitfield(0x3FFF, 0b111, 10, 0);
        assert_eq!(word, 0x23FF);
    }

    #[test]
    fn set_bitfield_truncates_to_mask() {
        assert_eq!(set_bitfield(0, 0b1, 13, 0b11), 1 << 13);
    }
}
