//! Error handling and custom error types
//!
//! Every workflow stage reports failure through one enum so a single
//! top-level handler can surface it to the user.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Failed to submit job: {0}")]
    Submission(String),

    #[error("Failed to check status: {0}")]
    JobStatus(String),

    #[error("{0}")]
    JobFailed(String),

    #[error("Job timed out after {polls} polls")]
    JobTimeout { polls: usize },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No image URL in response")]
    MissingResult,

    #[error("Download failed: {}", .failures.join("; "))]
    Download { failures: Vec<String> },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invariant violation: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, Error>;
