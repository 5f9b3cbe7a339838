//! Error types for the DAC driver.

use core::fmt;

/// Errors that can occur when driving the DAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DacError<E> {
    /// Underlying I2C bus error.
    I2c(E),

    /// Code above the 12-bit range. The code is reported, never masked.
    CodeOutOfRange(u16),
}

impl<E> From<E> for DacError<E> {
    fn from(error: E) -> Self {
        DacError::I2c(error)
    }
}

impl<E: fmt::Debug> fmt::Display for DacError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DacError::I2c(e) => write!(f, "I2C error: {:?}", e),
            DacError::CodeOutOfRange(code) => {
                write!(f, "DAC code {} out of range (must be 0-4095)", code)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for DacError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            DacError::I2c(e) => defmt::write!(f, "I2C error: {}", e),
            DacError::CodeOutOfRange(code) => defmt::write!(f, "DAC code {} out of range", code),
        }
    }
}
