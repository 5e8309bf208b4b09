use thiserror::Error;

/// Failure reported by the post service. The flow stays on the caption
/// step and the user may retry.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("Post service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Post service returned status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Malformed post service response: {0}")]
    MalformedResponse(String),

    #[error("Post service not configured")]
    NotConfigured,
}

/// Failure obtaining media from the camera or gallery.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Camera or storage permission denied: {0}")]
    PermissionDenied(String),

    #[error("Media source unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Map an IO error, surfacing permission problems as their own variant.
    pub fn from_io(e: std::io::Error, what: &str) -> Self {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            MediaError::PermissionDenied(what.to_string())
        } else {
            MediaError::Io(e)
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PNG decode error: {0}")]
    PngDecode(#[from] png::DecodingError),

    #[error("PNG encode error: {0}")]
    PngEncode(#[from] png::EncodingError),

    #[error("Unsupported PNG layout: {0}")]
    UnsupportedLayout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}
