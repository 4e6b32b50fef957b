//! Object storage integration for source uploads
//!
//! Uploads go straight to storage: the storage API hands out a short-lived
//! signed URL and the bytes are PUT to it without further authentication.

pub mod client;
pub mod mock;

pub use client::StorageClient;
pub use mock::MockStorageClient;

use crate::models::{SourceFile, UploadTarget};
use crate::{ids, Result};
use async_trait::async_trait;
use tracing::{debug, info};

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Ask the storage API for a signed write URL for `file_name`.
    async fn request_upload_url(&self, file_name: &str) -> Result<String>;

    /// PUT `data` to a signed URL.
    async fn put_object(&self, signed_url: &str, data: &[u8], content_type: &str) -> Result<()>;

    /// Public URL the object is served from once uploaded.
    fn public_url(&self, file_name: &str) -> String;
}

/// Upload a picked file under a fresh unique key.
pub async fn upload_file(storage: &dyn StorageService, file: &SourceFile) -> Result<UploadTarget> {
    let file_name = ids::upload_key(&file.name);

    let signed_url = storage.request_upload_url(&file_name).await?;
    debug!("Got signed URL for {}", file_name);

    storage
        .put_object(&signed_url, &file.bytes, &file.content_type)
        .await?;

    let public_url = storage.public_url(&file_name);
    info!(
        "Uploaded {} ({} bytes) to {}",
        file.name,
        file.bytes.len(),
        public_url
    );

    Ok(UploadTarget {
        file_name,
        signed_url,
        public_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::UPLOAD_ID_LENGTH;

    #[tokio::test]
    async fn test_upload_file_preserves_extension() {
        let storage = MockStorageClient::new().with_base_url("https://assets.test".to_string());
        let file = SourceFile::new("portrait.png", "image/png", vec![1, 2, 3]);

        let target = upload_file(&storage, &file).await.unwrap();

        assert!(target.file_name.starts_with("media/"));
        assert!(target.file_name.ends_with(".png"));
        assert_eq!(
            target.public_url,
            format!("https://assets.test/{}", target.file_name)
        );
        assert_eq!(
            storage.get_object(&target.file_name),
            Some((vec![1, 2, 3], "image/png".to_string()))
        );
    }

    #[tokio::test]
    async fn test_upload_file_defaults_to_jpg() {
        let storage = MockStorageClient::new();
        let file = SourceFile::new("camera-roll", "image/jpeg", vec![0xFF, 0xD8]);

        let target = upload_file(&storage, &file).await.unwrap();

        let id = target
            .public_url
            .rsplit('/')
            .next()
            .and_then(|name| name.strip_suffix(".jpg"))
            .unwrap();
        assert_eq!(id.len(), UPLOAD_ID_LENGTH);
    }

    #[tokio::test]
    async fn test_upload_file_uses_unique_keys() {
        let storage = MockStorageClient::new();
        let file = SourceFile::new("a.jpg", "image/jpeg", vec![1]);

        let first = upload_file(&storage, &file).await.unwrap();
        let second = upload_file(&storage, &file).await.unwrap();

        assert_ne!(first.file_name, second.file_name);
        assert_eq!(storage.get_upload_count(), 2);
    }

    #[tokio::test]
    async fn test_upload_file_stops_when_signing_fails() {
        let storage = MockStorageClient::new().with_signing_failure(true);
        let file = SourceFile::new("a.jpg", "image/jpeg", vec![1]);

        let err = upload_file(&storage, &file).await.unwrap_err();

        assert!(matches!(err, crate::Error::Upload(_)));
        assert_eq!(storage.get_upload_count(), 0);
    }
}
