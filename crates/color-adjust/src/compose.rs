//! Composition of presets and manual adjustments.

use crate::adjustments::ImageAdjustments;
use crate::preset::FilterPreset;
use crate::transform::ColorTransform;

/// Compose an [`ImageAdjustments`] value into a single [`ColorTransform`].
///
/// The preset's base transform is applied first and the brightness offset is
/// added on top, so the offset is never scaled by the preset: for every
/// preset, `compose(adj).offset(0) == adj.brightness.value()`.
///
/// Pure and deterministic. No clamping happens here.
///
/// # Example
/// ```
/// use color_adjust::{compose, Brightness, ColorTransform, FilterPreset, ImageAdjustments};
///
/// assert_eq!(compose(&ImageAdjustments::default()), ColorTransform::IDENTITY);
///
/// let adj = ImageAdjustments::new(FilterPreset::Sepia, Brightness::clamped(0.25));
/// assert_eq!(compose(&adj).offset(0), 0.25);
/// ```
pub fn compose(adjustments: &ImageAdjustments) -> ColorTransform {
    let base = adjustments.preset.base_transform();
    let brightness = ColorTransform::offset_rgb(adjustments.brightness.value());
    base.then(&brightness)
}

/// Transforms for the filter picker thumbnails, one per preset in index order.
///
/// Thumbnails never see the brightness currently being edited.
pub fn thumbnail_transforms() -> [(FilterPreset, ColorTransform); 5] {
    FilterPreset::ALL.map(|preset| (preset, compose(&ImageAdjustments::preset_only(preset))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjustments::Brightness;

    #[test]
    fn test_zero_brightness_equals_base() {
        for preset in FilterPreset::ALL {
            let composed = compose(&ImageAdjustments::preset_only(preset));
            assert_eq!(composed, preset.base_transform(), "{preset}");
        }
    }

    #[test]
    fn test_brightness_added_after_preset() {
        let adj = ImageAdjustments::new(FilterPreset::Noir, Brightness::clamped(-0.5));
        let out = compose(&adj).apply([1.0, 1.0, 1.0, 1.0]);
        // Grayscale of white is white, then darkened by 0.5.
        for channel in &out[..3] {
            assert!((channel - 0.5).abs() < 1e-6);
        }
        assert_eq!(out[3], 1.0);
    }

    #[test]
    fn test_thumbnails_in_index_order() {
        let thumbs = thumbnail_transforms();
        for (i, (preset, transform)) in thumbs.iter().enumerate() {
            assert_eq!(preset.index() as usize, i);
            assert_eq!(transform.offset(0), 0.0);
        }
    }
}
