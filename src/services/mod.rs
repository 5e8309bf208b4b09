pub mod media_provider;
pub mod post_service;

pub use media_provider::{CameraProvider, GalleryProvider, MediaProvider};
pub use post_service::{HttpPostService, InMemoryPostService, PostService};
