pub mod config;
pub mod media;
pub mod post;

pub use config::{AppConfig, FlowOptions, PostServiceConfig};
pub use media::MediaRef;
pub use post::{CaptionDraft, PostId, PostRequest};
