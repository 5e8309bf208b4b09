use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::MediaError;
use crate::models::MediaRef;

/// File extensions the gallery offers
const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "heic"];

/// Source of media for the first step (camera or gallery).
pub trait MediaProvider {
    /// `Ok(None)` means the user backed out of the picker.
    fn pick(&self) -> Result<Option<MediaRef>, MediaError>;
}

/// Gallery backed by a directory; picks the most recently modified image.
pub struct GalleryProvider {
    dir: PathBuf,
}

impl GalleryProvider {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Images in the gallery, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<MediaRef>, MediaError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| {
            tracing::warn!(dir = %self.dir.display(), error = %e, "Failed to list gallery");
            MediaError::from_io(e, "gallery")
        })?;

        let mut images: Vec<(SystemTime, PathBuf)> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_image(path))
            .filter_map(|path| {
                let modified = path.metadata().and_then(|m| m.modified()).ok()?;
                Some((modified, path))
            })
            .collect();

        // Newest first, ties broken by name for a stable order
        images.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        Ok(images
            .into_iter()
            .take(limit)
            .filter_map(|(_, path)| file_uri(&path))
            .collect())
    }
}

impl MediaProvider for GalleryProvider {
    fn pick(&self) -> Result<Option<MediaRef>, MediaError> {
        let picked = self.recent(1)?.into_iter().next();
        match &picked {
            Some(media) => tracing::debug!(%media, "Gallery image selected"),
            None => tracing::debug!(dir = %self.dir.display(), "Gallery is empty"),
        }
        Ok(picked)
    }
}

/// Camera capture into a directory.
///
/// `capture` stands in for the device camera: it receives the target path
/// and reports whether a picture was taken there.
pub struct CameraProvider<F> {
    capture_dir: PathBuf,
    capture: F,
}

impl<F> CameraProvider<F>
where
    F: Fn(&Path) -> std::io::Result<bool>,
{
    pub fn new(capture_dir: impl AsRef<Path>, capture: F) -> Self {
        Self {
            capture_dir: capture_dir.as_ref().to_path_buf(),
            capture,
        }
    }

    /// Path for the next capture, e.g. `JPEG_20250101_120000_.jpg`.
    pub fn capture_target(&self) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        self.capture_dir.join(format!("JPEG_{stamp}_.jpg"))
    }
}

impl<F> MediaProvider for CameraProvider<F>
where
    F: Fn(&Path) -> std::io::Result<bool>,
{
    fn pick(&self) -> Result<Option<MediaRef>, MediaError> {
        std::fs::create_dir_all(&self.capture_dir)
            .map_err(|e| MediaError::from_io(e, "camera storage"))?;

        let target = self.capture_target();
        let taken = (self.capture)(&target).map_err(|e| MediaError::from_io(e, "camera"))?;

        if taken && target.is_file() {
            tracing::debug!(path = %target.display(), "Image captured");
            Ok(file_uri(&target))
        } else {
            tracing::debug!("Image capture failed or cancelled");
            Ok(None)
        }
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn file_uri(path: &Path) -> Option<MediaRef> {
    let absolute = std::path::absolute(path).ok()?;
    MediaRef::new(format!("file://{}", absolute.display()))
}
