//! 4x5 affine color transform.
//!
//! A [`ColorTransform`] maps a normalized RGBA color to a new RGBA color:
//!
//! ```text
//! R' = m[0][0]*R + m[0][1]*G + m[0][2]*B + m[0][3]*A + m[0][4]
//! G' = m[1][0]*R + m[1][1]*G + m[1][2]*B + m[1][3]*A + m[1][4]
//! B' = m[2][0]*R + m[2][1]*G + m[2][2]*B + m[2][3]*A + m[2][4]
//! A' = m[3][0]*R + m[3][1]*G + m[3][2]*B + m[3][3]*A + m[3][4]
//! ```
//!
//! Channels are on a `0.0..=1.0` scale and the fifth column is an additive
//! offset in the same units. Transforms are values: every operation returns a
//! new transform and none mutates its receiver, so a thumbnail transform can
//! never alias the live preview.

/// Luminance weights used for saturation matrices (Rec. 709 rounded).
pub const LUMA_WEIGHTS: [f32; 3] = [0.213, 0.715, 0.072];

/// A 4x5 color transform over normalized R, G, B, A plus a per-channel offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTransform {
    rows: [[f32; 5]; 4],
}

impl ColorTransform {
    /// The transform that leaves every color unchanged.
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0, 0.0],
        ],
    };

    /// Build a transform from its four rows.
    #[inline]
    pub const fn from_rows(rows: [[f32; 5]; 4]) -> Self {
        Self { rows }
    }

    /// Saturation transform scaling chroma around the luminance axis.
    ///
    /// `1.0` is neutral, `0.0` is full grayscale and values above `1.0`
    /// push colors away from gray. Alpha passes through and offsets are zero.
    ///
    /// # Example
    /// ```
    /// use color_adjust::ColorTransform;
    /// assert_eq!(ColorTransform::saturation(1.0), ColorTransform::IDENTITY);
    /// ```
    pub fn saturation(factor: f32) -> Self {
        let inv = 1.0 - factor;
        let [wr, wg, wb] = LUMA_WEIGHTS;
        let (r, g, b) = (wr * inv, wg * inv, wb * inv);
        Self {
            rows: [
                [r + factor, g, b, 0.0, 0.0],
                [r, g + factor, b, 0.0, 0.0],
                [r, g, b + factor, 0.0, 0.0],
                [0.0, 0.0, 0.0, 1.0, 0.0],
            ],
        }
    }

    /// Identity scale with `offset` added to R, G and B. Alpha is untouched.
    pub fn offset_rgb(offset: f32) -> Self {
        let mut rows = Self::IDENTITY.rows;
        for row in rows.iter_mut().take(3) {
            row[4] = offset;
        }
        Self { rows }
    }

    /// The four rows of the transform.
    #[inline]
    pub fn rows(&self) -> &[[f32; 5]; 4] {
        &self.rows
    }

    /// Row-major flattening (20 values), the layout most renderers expect.
    pub fn to_array(&self) -> [f32; 20] {
        let mut out = [0.0; 20];
        for (i, row) in self.rows.iter().enumerate() {
            out[i * 5..i * 5 + 5].copy_from_slice(row);
        }
        out
    }

    /// Additive offset applied to `channel` (0 = R, 1 = G, 2 = B, 3 = A).
    ///
    /// # Panics
    /// Panics if `channel > 3`.
    #[inline]
    pub fn offset(&self, channel: usize) -> f32 {
        self.rows[channel][4]
    }

    /// Compose two transforms: the result applies `self` first, then `next`.
    ///
    /// In matrix terms this is `next * self` with both promoted to 5x5
    /// homogeneous form.
    pub fn then(&self, next: &ColorTransform) -> ColorTransform {
        let mut rows = [[0.0f32; 5]; 4];
        for (i, out_row) in rows.iter_mut().enumerate() {
            let n = &next.rows[i];
            for (j, cell) in out_row.iter_mut().enumerate() {
                let mut acc = 0.0;
                for k in 0..4 {
                    acc += n[k] * self.rows[k][j];
                }
                if j == 4 {
                    acc += n[4];
                }
                *cell = acc;
            }
        }
        ColorTransform { rows }
    }

    /// Apply the transform to one RGBA color.
    ///
    /// No clamping is performed; results may leave `0.0..=1.0`. Clamping is
    /// the renderer's job.
    pub fn apply(&self, rgba: [f32; 4]) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (o, row) in out.iter_mut().zip(self.rows.iter()) {
            *o = row[0] * rgba[0] + row[1] * rgba[1] + row[2] * rgba[2] + row[3] * rgba[3] + row[4];
        }
        out
    }
}

impl Default for ColorTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
