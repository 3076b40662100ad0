//! Error types for the quantizer.

use core::fmt;

/// Conditions which stop the quantizer from running at all.
///
/// There is deliberately only one: everything past initialization is assumed not to fail. It is up to the caller to
/// decide what halting looks like.
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    /// The touch sensor could not be initialized; most likely it is miswired or absent.
    TouchSensor(E),
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Error::TouchSensor(error)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::TouchSensor(e) => write!(f, "touch sensor not found, check wiring? ({:?})", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::TouchSensor(e) => defmt::write!(f, "touch sensor not found, check wiring? ({})", e),
        }
    }
}
