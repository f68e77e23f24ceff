//! 12-bit circular angle domain
//!
//! Every raw angle, offset and sample lives in `0..ANGLE_MAX` and all
//! arithmetic on them wraps modulo [`ANGLE_MAX`].

use core::f32::consts::TAU;

/// Number of raw steps per revolution (12-bit: 0-4095, representing 0-360°)
pub const ANGLE_MAX: u16 = 0x0FFF + 1;

/// Degrees per raw step
pub const RAW_TO_DEGREES: f32 = 360.0 / ANGLE_MAX as f32;

/// Radians per raw step
pub const RAW_TO_RADIANS: f32 = TAU / ANGLE_MAX as f32;

/// Raw steps per degree
pub const DEGREES_TO_RAW: f32 = ANGLE_MAX as f32 / 360.0;

/// Largest offset magnitude accepted, in degrees
pub const OFFSET_LIMIT_DEGREES: f32 = 360.0;

/// Unit for converted angles and angular speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AngleUnit {
    /// Degrees
    #[default]
    Degrees,
    /// Radians
    Radians,
}

impl AngleUnit {
    /// Size of one raw step in this unit
    #[must_use]
    pub const fn scale(self) -> f32 {
        match self {
            AngleUnit::Degrees => RAW_TO_DEGREES,
            AngleUnit::Radians => RAW_TO_RADIANS,
        }
    }

    /// Convert a raw angle into this unit
    #[must_use]
    pub fn convert(self, raw: u16) -> f32 {
        f32::from(raw) * self.scale()
    }
}

/// Convert a raw angle to degrees
#[must_use]
pub fn raw_to_degrees(raw: u16) -> f32 {
    AngleUnit::Degrees.convert(raw)
}

/// Convert a raw angle to radians
#[must_use]
pub fn raw_to_radians(raw: u16) -> f32 {
    AngleUnit::Radians.convert(raw)
}

/// Quantize degrees into the raw domain, wrapping negative and
/// multi-turn values
///
/// Returns `None` for non-finite input.
#[must_use]
pub fn degrees_to_raw(degrees: f32) -> Option<u16> {
    if !degrees.is_finite() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let steps = libm::roundf(degrees * DEGREES_TO_RAW) as i32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(steps.rem_euclid(i32::from(ANGLE_MAX)) as u16)
}

/// Apply a raw offset to a raw sample
#[must_use]
pub const fn apply_offset(raw: u16, offset: u16) -> u16 {
    ((raw as u32 + offset as u32) % ANGLE_MAX as u32) as u16
}

/// Signed difference `current - previous` along the shorter way round
///
/// The result lies in `-2048..=2048`, so crossing the 4095/0 boundary is a
/// small step rather than a near full turn.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn shortest_delta(previous: u16, current: u16) -> i16 {
    let half = i32::from(ANGLE_MAX / 2);
    let full = i32::from(ANGLE_MAX);
    let mut delta = i32::from(current % ANGLE_MAX) - i32::from(previous % ANGLE_MAX);
    if delta > half {
        delta -= full;
    } else if delta < -half {
        delta += full;
    }
    delta as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_use_fixed_scale() {
        for raw in [0u16, 1, 1024, 2048, 3072, 4095] {
            assert_eq!(raw_to_degrees(raw), f32::from(raw) * 360.0 / 4096.0);
            assert_eq!(raw_to_radians(raw), f32::from(raw) * RAW_TO_RADIANS);
        }
        assert_eq!(raw_to_degrees(1024), 90.0);
        assert_eq!(raw_to_degrees(2048), 180.0);
    }

    #[test]
    fn offset_stays_in_domain() {
        for raw in (0..ANGLE_MAX).step_by(97) {
            for offset in (0..ANGLE_MAX).step_by(89) {
                let angle = apply_offset(raw, offset);
                assert_eq!(u32::from(angle), (u32::from(raw) + u32::from(offset)) % 4096);
                assert!(angle < ANGLE_MAX);
            }
        }
        assert_eq!(apply_offset(4095, 1), 0);
        assert_eq!(apply_offset(4095, 4095), 4094);
    }

    #[test]
    fn degrees_quantize_with_wraparound() {
        assert_eq!(degrees_to_raw(0.0), Some(0));
        assert_eq!(degrees_to_raw(90.0), Some(1024));
        assert_eq!(degrees_to_raw(-90.0), Some(3072));
        assert_eq!(degrees_to_raw(360.0), Some(0));
        assert_eq!(degrees_to_raw(-360.0), Some(0));
        assert_eq!(degrees_to_raw(450.0), Some(1024));
        assert_eq!(degrees_to_raw(f32::NAN), None);
        assert_eq!(degrees_to_raw(f32::INFINITY), None);
    }

    #[test]
    fn shortest_delta_crosses_zero() {
        assert_eq!(shortest_delta(4090, 5), 11);
        assert_eq!(shortest_delta(5, 4090), -11);
        assert_eq!(shortest_delta(100, 200), 100);
        assert_eq!(shortest_delta(200, 100), -100);
    }

    #[test]
    fn shortest_delta_half_turn_is_not_folded() {
        assert_eq!(shortest_delta(0, 2048), 2048);
        assert_eq!(shortest_delta(2048, 0), -2048);
        assert_eq!(shortest_delta(0, 2049), -2047);
    }
}
