//! Monotonic time source used for angular speed estimation.

/// Monotonic clock with microsecond resolution
///
/// Implemented for any `Fn() -> u64`, so a closure over the platform timer
/// is enough:
///
/// ```ignore
/// let clock = || embassy_time::Instant::now().as_micros();
/// let speed = sensor.angular_speed(&clock, AngleUnit::Degrees)?;
/// ```
pub trait TimeSource {
    /// Microseconds since an arbitrary, fixed starting point
    fn now_us(&self) -> u64;
}

impl<F> TimeSource for F
where
    F: Fn() -> u64,
{
    fn now_us(&self) -> u64 {
        self()
    }
}
