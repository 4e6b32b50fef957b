//! Fetching and classifying result media.

pub mod client;
pub mod mock;

pub use client::MediaClient;
pub use mock::MockMediaClient;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Fetch the full body of `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify by the URL path extension, ignoring any query string.
    pub fn from_url(url: &str) -> Self {
        match url_extension(url).as_deref() {
            Some("mp4") | Some("webm") => Self::Video,
            _ => Self::Image,
        }
    }
}

/// Lowercased extension of the URL's last path segment.
pub fn url_extension(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    last_segment
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}
