//! Error type for adjustment construction.
//!
//! [`compose`](crate::compose) itself cannot fail: every input it accepts is
//! valid by construction. Errors only arise at the edges, when raw numbers
//! coming from a widget or a route are turned into typed values.

use std::fmt;
use std::num::ParseIntError;

/// Error returned when raw input cannot become an adjustment value.
#[derive(Debug, Clone, PartialEq)]
pub enum AdjustError {
    /// Brightness outside `-1.0..=1.0` (or NaN)
    BrightnessOutOfRange(f32),
    /// Filter index outside `0..=4`
    UnknownPresetIndex(u32),
    /// Filter name that matches no preset
    UnknownPresetName(String),
    /// Filter index that is not a decimal integer
    InvalidPresetIndex(ParseIntError),
}

impl From<ParseIntError> for AdjustError {
    fn from(err: ParseIntError) -> Self {
        AdjustError::InvalidPresetIndex(err)
    }
}

impl fmt::Display for AdjustError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdjustError::BrightnessOutOfRange(value) => {
                write!(f, "brightness {} is outside -1.0..=1.0", value)
            }
            AdjustError::UnknownPresetIndex(index) => {
                write!(f, "no filter preset at index {} (expected 0..=4)", index)
            }
            AdjustError::UnknownPresetName(name) => {
                write!(f, "unknown filter preset '{}'", name)
            }
            AdjustError::InvalidPresetIndex(err) => {
                write!(f, "invalid filter index: {}", err)
            }
        }
    }
}

impl std::error::Error for AdjustError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AdjustError::InvalidPresetIndex(err) => Some(err),
            _ => None,
        }
    }
}
