//! Filter presets.

use std::fmt;
use std::str::FromStr;

use crate::error::AdjustError;
use crate::transform::ColorTransform;

/// Sepia tone rows, reproduced exactly.
const SEPIA: ColorTransform = ColorTransform::from_rows([
    [0.393, 0.769, 0.189, 0.0, 0.0],
    [0.349, 0.686, 0.168, 0.0, 0.0],
    [0.272, 0.534, 0.131, 0.0, 0.0],
    [0.0, 0.0, 0.0, 1.0, 0.0],
]);

/// One of the five filter presets offered in the editor.
///
/// The integer index (`0..=4`) is the stable serialization form used across
/// step routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterPreset {
    #[default]
    Original,
    /// Saturation boosted to 1.5x
    Vivid,
    /// Saturation reduced to 0.2x
    Muted,
    /// Full desaturation
    Noir,
    /// Fixed sepia tone matrix
    Sepia,
}

impl FilterPreset {
    /// Every preset, in index order.
    pub const ALL: [FilterPreset; 5] = [
        FilterPreset::Original,
        FilterPreset::Vivid,
        FilterPreset::Muted,
        FilterPreset::Noir,
        FilterPreset::Sepia,
    ];

    /// Stable integer index.
    #[inline]
    pub fn index(self) -> u8 {
        match self {
            FilterPreset::Original => 0,
            FilterPreset::Vivid => 1,
            FilterPreset::Muted => 2,
            FilterPreset::Noir => 3,
            FilterPreset::Sepia => 4,
        }
    }

    /// Look up a preset by index.
    pub fn from_index(index: u32) -> Result<Self, AdjustError> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(AdjustError::UnknownPresetIndex(index))
    }

    /// Display name shown under the filter thumbnail.
    pub fn name(self) -> &'static str {
        match self {
            FilterPreset::Original => "Original",
            FilterPreset::Vivid => "Vivid",
            FilterPreset::Muted => "Muted",
            FilterPreset::Noir => "Noir",
            FilterPreset::Sepia => "Sepia",
        }
    }

    /// The preset's color transform before any manual adjustment.
    pub fn base_transform(self) -> ColorTransform {
        match self {
            FilterPreset::Original => ColorTransform::IDENTITY,
            FilterPreset::Vivid => ColorTransform::saturation(1.5),
            FilterPreset::Muted => ColorTransform::saturation(0.2),
            FilterPreset::Noir => ColorTransform::saturation(0.0),
            FilterPreset::Sepia => SEPIA,
        }
    }
}

impl fmt::Display for FilterPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterPreset {
    type Err = AdjustError;

    /// Parse a preset from its name (case-insensitive) or its index.
    ///
    /// ```
    /// use color_adjust::FilterPreset;
    ///
    /// assert_eq!("noir".parse::<FilterPreset>().unwrap(), FilterPreset::Noir);
    /// assert_eq!("4".parse::<FilterPreset>().unwrap(), FilterPreset::Sepia);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.chars().all(|c| c.is_ascii_digit()) && !s.is_empty() {
            return Self::from_index(s.parse()?);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| AdjustError::UnknownPresetName(s.to_string()))
    }
}

impl TryFrom<u32> for FilterPreset {
    type Error = AdjustError;

    fn try_from(index: u32) -> Result<Self, Self::Error> {
        Self::from_index(index)
    }
}

impl From<FilterPreset> for u8 {
    fn from(preset: FilterPreset) -> u8 {
        preset.index()
    }
}
