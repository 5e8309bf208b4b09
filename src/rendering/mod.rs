pub mod preview;

pub use preview::{apply_transform, decode_png, encode_png, render_preview, render_thumbnails, RgbaImage};
