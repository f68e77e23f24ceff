//! Angular speed from consecutive angle samples.

use crate::angle::{self, ANGLE_MAX, AngleUnit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct Sample {
    raw: u16,
    timestamp_us: u64,
}

/// Estimates angular speed from successive raw samples
///
/// The previous angle and its timestamp are kept together, so the estimator
/// is either empty or fully primed. Each update consumes the interval since
/// the previous one; consecutive calls never overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VelocityEstimator {
    last: Option<Sample>,
}

impl VelocityEstimator {
    /// Create an estimator with no previous sample
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Forget the previous sample
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Whether a previous sample is stored
    #[must_use]
    pub const fn is_primed(&self) -> bool {
        self.last.is_some()
    }

    /// Raw angle of the previous sample
    #[must_use]
    pub fn last_angle(&self) -> Option<u16> {
        self.last.map(|sample| sample.raw)
    }

    /// Record a sample and return the speed since the previous one
    ///
    /// Returns `0.0` for the first sample and when no time has elapsed.
    /// The sample is stored in every case.
    pub fn update(&mut self, raw: u16, timestamp_us: u64, unit: AngleUnit) -> f32 {
        let current = Sample {
            raw: raw % ANGLE_MAX,
            timestamp_us,
        };
        let Some(previous) = self.last.replace(current) else {
            return 0.0;
        };

        let elapsed_us = current.timestamp_us.saturating_sub(previous.timestamp_us);
        if elapsed_us == 0 {
            return 0.0;
        }

        let delta = angle::shortest_delta(previous.raw, current.raw);
        #[allow(clippy::cast_precision_loss)]
        let elapsed_s = elapsed_us as f32 / 1_000_000.0;

        f32::from(delta) * unit.scale() / elapsed_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::RAW_TO_RADIANS;

    #[test]
    fn first_sample_reports_zero() {
        let mut estimator = VelocityEstimator::new();
        assert!(!estimator.is_primed());
        assert_eq!(estimator.update(1234, 10, AngleUnit::Degrees), 0.0);
        assert!(estimator.is_primed());
        assert_eq!(estimator.last_angle(), Some(1234));
    }

    #[test]
    fn wraparound_is_a_small_forward_step() {
        let mut estimator = VelocityEstimator::new();
        estimator.update(4090, 0, AngleUnit::Degrees);
        let speed = estimator.update(5, 1_000_000, AngleUnit::Degrees);
        assert_eq!(speed, 11.0 * 360.0 / 4096.0);
    }

    #[test]
    fn backward_wraparound_is_negative() {
        let mut estimator = VelocityEstimator::new();
        estimator.update(5, 0, AngleUnit::Degrees);
        let speed = estimator.update(4090, 1_000_000, AngleUnit::Degrees);
        assert_eq!(speed, -11.0 * 360.0 / 4096.0);
    }

    #[test]
    fn radians_use_radian_scale() {
        let mut estimator = VelocityEstimator::new();
        estimator.update(0, 0, AngleUnit::Radians);
        let speed = estimator.update(1024, 500_000, AngleUnit::Radians);
        let expected = 1024.0 * RAW_TO_RADIANS / 0.5;
        assert!(libm::fabsf(speed - expected) < 1e-4);
    }

    #[test]
    fn zero_elapsed_time_reports_zero_and_advances() {
        let mut estimator = VelocityEstimator::new();
        estimator.update(100, 42, AngleUnit::Degrees);
        assert_eq!(estimator.update(200, 42, AngleUnit::Degrees), 0.0);
        assert_eq!(estimator.last_angle(), Some(200));
    }

    #[test]
    fn intervals_telescope() {
        let mut estimator = VelocityEstimator::new();
        estimator.update(0, 0, AngleUnit::Degrees);
        // 1024 steps in 1 s, then 1024 more in the next 1 s
        assert_eq!(estimator.update(1024, 1_000_000, AngleUnit::Degrees), 90.0);
        assert_eq!(estimator.update(2048, 2_000_000, AngleUnit::Degrees), 90.0);
    }

    #[test]
    fn reset_forgets_previous_sample() {
        let mut estimator = VelocityEstimator::new();
        estimator.update(100, 0, AngleUnit::Degrees);
        estimator.reset();
        assert_eq!(estimator.update(900, 1_000_000, AngleUnit::Degrees), 0.0);
    }
}
