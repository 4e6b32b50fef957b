//! Client for the photo-to-vector-art workflow
//!
//! Uploads a picture to object storage through a signed URL, submits an
//! image-effects generation job for it, polls the job until it finishes, then
//! renders the result and saves it locally.

pub mod app;
pub mod download;
pub mod error;
pub mod ids;
pub mod jobs;
pub mod media;
pub mod mime;
pub mod models;
pub mod progress;
pub mod render;
pub mod retry;
pub mod storage;

pub use error::{Error, Result};
