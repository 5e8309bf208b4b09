//! RevdUp - post creation flow
//!
//! Media picking, filter adjustment and captioning for the RevdUp feed.
//! This library exposes modules for integration testing.

pub mod error;
pub mod flow;
pub mod models;
pub mod rendering;
pub mod services;
