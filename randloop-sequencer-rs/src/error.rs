//! Error types for the sequencer core.

use core::fmt;

/// Configuration errors raised synchronously by the call that would use the
/// offending value.
///
/// None of these are recoverable runtime conditions: they indicate a caller
/// passed a value the menu should never have produced. Values are reported
/// as-is and are never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Interval pattern name is not in the scale catalogue.
    UnknownPattern,
    /// Probability outside `0..=100`.
    InvalidProbability(u8),
    /// Octave count outside `MIN_OCTAVES..=MAX_OCTAVES`.
    OctavesOutOfRange(u8),
    /// Step index outside `0..MAX_STEPS`.
    StepOutOfRange(usize),
    /// Gate length percentage above 100.
    GateLengthOutOfRange(u8),
    /// Scale would reach a DAC code above `MAX_DAC_CODE`; carries the
    /// highest code.
    CodeOutOfRange(u16),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::UnknownPattern => write!(f, "Unknown scale pattern"),
            ConfigError::InvalidProbability(p) => {
                write!(f, "Invalid probability {} (must be 0-100)", p)
            }
            ConfigError::OctavesOutOfRange(o) => write!(f, "Octave count {} out of range", o),
            ConfigError::StepOutOfRange(s) => write!(f, "Step index {} out of range", s),
            ConfigError::GateLengthOutOfRange(g) => {
                write!(f, "Gate length {}% out of range (must be 0-100)", g)
            }
            ConfigError::CodeOutOfRange(c) => {
                write!(f, "Scale reaches DAC code {} (max 4095)", c)
            }
        }
    }
}
