/// Error type for AS5600 operations
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the sensor
    Communication(E),
    /// Argument outside the accepted range; nothing was sent to the sensor
    InvalidArgument,
    /// A register holds a bit pattern with no defined meaning
    UnexpectedValue(u8),
}
