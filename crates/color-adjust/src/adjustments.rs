//! Adjustment values edited in the filter step.

use std::fmt;

use crate::error::AdjustError;
use crate::preset::FilterPreset;

/// Manual brightness offset in `-1.0..=1.0`.
///
/// `-1.0` darkens fully, `0.0` leaves the image unchanged and `1.0` brightens
/// fully. A `Brightness` is always in range once constructed: use
/// [`Brightness::new`] for values that must already be valid and
/// [`Brightness::clamped`] for raw slider input.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Brightness(f32);

impl Brightness {
    pub const MIN: f32 = -1.0;
    pub const MAX: f32 = 1.0;

    /// Neutral brightness.
    pub const ZERO: Self = Self(0.0);

    /// Checked constructor. Rejects NaN and values outside `-1.0..=1.0`.
    pub fn new(value: f32) -> Result<Self, AdjustError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AdjustError::BrightnessOutOfRange(value))
        }
    }

    /// Clamp raw widget input into range. NaN maps to zero.
    pub fn clamped(value: f32) -> Self {
        if value.is_nan() {
            Self::ZERO
        } else {
            Self(value.clamp(Self::MIN, Self::MAX))
        }
    }

    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Slider label value, e.g. `-35` for `-0.35`.
    pub fn percent(self) -> i32 {
        (self.0 * 100.0).round() as i32
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

impl TryFrom<f32> for Brightness {
    type Error = AdjustError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// The complete set of edits for one image: a preset plus brightness.
///
/// Immutable: every edit produces a new value through [`with_preset`] or
/// [`with_brightness`].
///
/// [`with_preset`]: ImageAdjustments::with_preset
/// [`with_brightness`]: ImageAdjustments::with_brightness
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImageAdjustments {
    pub preset: FilterPreset,
    pub brightness: Brightness,
}

impl ImageAdjustments {
    pub fn new(preset: FilterPreset, brightness: Brightness) -> Self {
        Self { preset, brightness }
    }

    /// Preset only, brightness neutral. Used for filter thumbnails.
    pub fn preset_only(preset: FilterPreset) -> Self {
        Self {
            preset,
            brightness: Brightness::ZERO,
        }
    }

    #[must_use]
    pub fn with_preset(self, preset: FilterPreset) -> Self {
        Self { preset, ..self }
    }

    #[must_use]
    pub fn with_brightness(self, brightness: Brightness) -> Self {
        Self { brightness, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_bounds() {
        assert!(Brightness::new(-1.0).is_ok());
        assert!(Brightness::new(1.0).is_ok());
        assert_eq!(
            Brightness::new(1.01),
            Err(AdjustError::BrightnessOutOfRange(1.01))
        );
        assert!(Brightness::new(f32::NAN).is_err());
    }

    #[test]
    fn test_brightness_clamped() {
        assert_eq!(Brightness::clamped(3.0).value(), 1.0);
        assert_eq!(Brightness::clamped(-3.0).value(), -1.0);
        assert_eq!(Brightness::clamped(0.4).value(), 0.4);
        assert_eq!(Brightness::clamped(f32::NAN), Brightness::ZERO);
    }

    #[test]
    fn test_brightness_percent_label() {
        assert_eq!(Brightness::clamped(-0.354).percent(), -35);
        assert_eq!(Brightness::clamped(0.5).to_string(), "50%");
    }

    #[test]
    fn test_default_adjustments() {
        let adj = ImageAdjustments::default();
        assert_eq!(adj.preset, FilterPreset::Original);
        assert_eq!(adj.brightness.value(), 0.0);
    }

    #[test]
    fn test_with_methods_return_new_values() {
        let base = ImageAdjustments::default();
        let vivid = base.with_preset(FilterPreset::Vivid);
        let bright = vivid.with_brightness(Brightness::clamped(0.3));

        assert_eq!(base.preset, FilterPreset::Original);
        assert_eq!(vivid.brightness, Brightness::ZERO);
        assert_eq!(bright.preset, FilterPreset::Vivid);
        assert_eq!(bright.brightness.value(), 0.3);
    }
}
