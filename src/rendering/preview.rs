//! Single-pass application of a color transform to a PNG.
//!
//! The transform itself is unclamped; this is where channel values are
//! brought back into `0..=255`.

use color_adjust::{compose, thumbnail_transforms, ColorTransform, FilterPreset, ImageAdjustments};
use std::io::Cursor;

use crate::error::RenderError;

/// 8-bit RGBA pixels, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbaImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RenderError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(RenderError::UnsupportedLayout(format!(
                "{}x{} RGBA needs {expected} bytes, got {}",
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }
}

/// Decode any 8/16-bit PNG into RGBA8.
pub fn decode_png(bytes: &[u8]) -> Result<RgbaImage, RenderError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    // Palette and low bit depths expand to 8-bit, 16-bit strips to 8-bit
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    if info.bit_depth != png::BitDepth::Eight {
        return Err(RenderError::UnsupportedLayout(format!(
            "bit depth {:?} after expansion",
            info.bit_depth
        )));
    }

    let pixels = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(RenderError::UnsupportedLayout("indexed".to_string()))
        }
    };

    RgbaImage::new(info.width, info.height, pixels)
}

/// Encode RGBA8 pixels as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, image.width, image.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&image.pixels)?;
    }
    Ok(buf.into_inner())
}

/// Apply `transform` to every pixel, clamping the result.
pub fn apply_transform(image: &RgbaImage, transform: &ColorTransform) -> RgbaImage {
    let pixels = image
        .pixels
        .chunks_exact(4)
        .flat_map(|p| {
            let rgba = [
                p[0] as f32 / 255.0,
                p[1] as f32 / 255.0,
                p[2] as f32 / 255.0,
                p[3] as f32 / 255.0,
            ];
            transform.apply(rgba).map(to_channel)
        })
        .collect();

    RgbaImage {
        width: image.width,
        height: image.height,
        pixels,
    }
}

#[inline]
fn to_channel(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Decode, adjust and re-encode a PNG.
pub fn render_preview(png_bytes: &[u8], adjustments: &ImageAdjustments) -> Result<Vec<u8>, RenderError> {
    let image = decode_png(png_bytes)?;
    let adjusted = apply_transform(&image, &compose(adjustments));
    tracing::debug!(
        width = image.width,
        height = image.height,
        preset = %adjustments.preset,
        brightness = adjustments.brightness.value(),
        "Rendered preview"
    );
    encode_png(&adjusted)
}

/// One PNG per preset at neutral brightness, in preset order.
pub fn render_thumbnails(png_bytes: &[u8]) -> Result<Vec<(FilterPreset, Vec<u8>)>, RenderError> {
    let image = decode_png(png_bytes)?;
    thumbnail_transforms()
        .iter()
        .map(|(preset, transform)| Ok((*preset, encode_png(&apply_transform(&image, transform))?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_adjust::Brightness;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
        let pixels = rgba.repeat((width * height) as usize);
        RgbaImage::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_new_checks_length() {
        assert!(RgbaImage::new(2, 2, vec![0; 15]).is_err());
        assert!(RgbaImage::new(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn test_identity_leaves_pixels() {
        let image = solid(3, 2, [10, 120, 250, 200]);
        let out = apply_transform(&image, &ColorTransform::IDENTITY);
        assert_eq!(out, image);
    }

    #[test]
    fn test_brightness_clamps_at_white() {
        let image = solid(1, 1, [200, 100, 0, 255]);
        let transform = compose(&ImageAdjustments::new(
            FilterPreset::Original,
            Brightness::clamped(1.0),
        ));
        let out = apply_transform(&image, &transform);
        assert_eq!(out.pixels, vec![255, 255, 255, 255]);
    }

    #[test]
    fn test_darken_clamps_at_black() {
        let image = solid(1, 1, [40, 80, 120, 255]);
        let transform = compose(&ImageAdjustments::new(
            FilterPreset::Original,
            Brightness::clamped(-1.0),
        ));
        let out = apply_transform(&image, &transform);
        assert_eq!(out.pixels, vec![0, 0, 0, 255]);
    }

    #[test]
    fn test_noir_produces_gray() {
        let image = solid(1, 1, [255, 0, 0, 255]);
        let out = apply_transform(&image, &FilterPreset::Noir.base_transform());
        assert_eq!(out.pixels[0], out.pixels[1]);
        assert_eq!(out.pixels[1], out.pixels[2]);
        // 0.213 * 255 = 54.3
        assert_eq!(out.pixels[0], 54);
    }

    #[test]
    fn test_png_roundtrip() {
        let image = solid(4, 3, [1, 2, 3, 4]);
        let bytes = encode_png(&image).unwrap();
        assert_eq!(decode_png(&bytes).unwrap(), image);
    }

    #[test]
    fn test_decode_rgb_adds_opaque_alpha() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut encoder = png::Encoder::new(&mut buf, 1, 1);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[9, 8, 7]).unwrap();
        }
        let image = decode_png(&buf.into_inner()).unwrap();
        assert_eq!(image.pixels, vec![9, 8, 7, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            decode_png(b"not a png"),
            Err(RenderError::PngDecode(_))
        ));
    }

    #[test]
    fn test_render_thumbnails_one_per_preset() {
        let bytes = encode_png(&solid(2, 2, [200, 50, 50, 255])).unwrap();
        let thumbs = render_thumbnails(&bytes).unwrap();
        assert_eq!(thumbs.len(), 5);
        assert_eq!(thumbs[0].0, FilterPreset::Original);
        // Original thumbnail is the unchanged image
        assert_eq!(decode_png(&thumbs[0].1).unwrap(), decode_png(&bytes).unwrap());
    }
}
