//! Test fixtures and constants.

use revdup::models::{FlowOptions, MediaRef};

/// Media references used across scenarios
pub mod media {
    pub const SIMPLE: &str = "m1";
    pub const CONTENT_URI: &str = "content://media/external/images/media/1042";
    pub const FILE_WITH_SPACES: &str = "file:///storage/DCIM/Camera/My Mustang 1967.jpg";
}

pub fn media_ref(uri: &str) -> MediaRef {
    MediaRef::new(uri).unwrap()
}

/// Flow options with the default tags and caption annotation
pub fn options() -> FlowOptions {
    FlowOptions::default()
}

/// Flow options that submit the caption exactly as typed
pub fn plain_options() -> FlowOptions {
    FlowOptions {
        default_tags: vec!["revdup".to_string()],
        annotate_filter: false,
    }
}

/// A small RGBA PNG with a known gradient
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.push((x * 255 / width.max(1)) as u8);
            pixels.push((y * 255 / height.max(1)) as u8);
            pixels.push(128);
            pixels.push(255);
        }
    }
    let image = revdup::rendering::RgbaImage::new(width, height, pixels).unwrap();
    revdup::rendering::encode_png(&image).unwrap()
}
