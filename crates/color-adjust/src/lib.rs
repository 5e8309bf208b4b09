//! color-adjust: filter presets and manual edits as one color transform
//!
//! This crate turns the edits a user makes in the post editor (a filter
//! preset and a brightness slider) into a single 4x5 [`ColorTransform`] that
//! a renderer can apply to every pixel in one pass.
//!
//! # Quick Start
//!
//! ```
//! use color_adjust::{compose, Brightness, FilterPreset, ImageAdjustments};
//!
//! let adjustments = ImageAdjustments::default()
//!     .with_preset(FilterPreset::Vivid)
//!     .with_brightness(Brightness::clamped(0.1));
//!
//! let transform = compose(&adjustments);
//! let pixel = transform.apply([0.5, 0.25, 0.75, 1.0]);
//! assert_eq!(pixel[3], 1.0);
//! ```
//!
//! # Presets
//!
//! | Index | Preset   | Base transform                         |
//! |-------|----------|----------------------------------------|
//! | 0     | Original | identity                               |
//! | 1     | Vivid    | saturation x1.5                        |
//! | 2     | Muted    | saturation x0.2                        |
//! | 3     | Noir     | saturation x0.0 (grayscale)            |
//! | 4     | Sepia    | fixed sepia rows (0.393, 0.769, ...)   |
//!
//! Saturation matrices interpolate each row between the luminance row
//! `[0.213, 0.715, 0.072]` and the identity row, so neutral grays are fixed
//! points of every saturation preset.
//!
//! # Composition Order
//!
//! ```text
//! input RGBA
//!     |
//!     v
//! preset base transform   (channel mixing, zero offsets)
//!     |
//!     v
//! brightness offset       (+b on R, G, B; alpha untouched)
//!     |
//!     v
//! output RGBA (unclamped)
//! ```
//!
//! Brightness is applied after the preset so that the same slider position
//! produces the same additive offset whatever preset is selected. Composing in
//! the other order would run the offset through the preset's matrix (Sepia,
//! for example, would inflate a red offset by 0.393 + 0.769 + 0.189).
//!
//! Channels are normalized to `0.0..=1.0`; the offset column uses the same
//! scale, so a brightness of `1.0` lifts black to white. Results are not
//! clamped here.

pub mod adjustments;
pub mod compose;
pub mod error;
pub mod preset;
pub mod transform;


pub use adjustments::{Brightness, ImageAdjustments};
pub use compose::{compose, thumbnail_transforms};
pub use error::AdjustError;
pub use preset::FilterPreset;
pub use transform::ColorTransform;
