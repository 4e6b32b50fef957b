use super::StorageService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const SIGNED_PREFIX: &str = "https://signed.mock-storage.example.com/";

/// In-memory storage; objects are keyed by file name.
#[derive(Clone)]
pub struct MockStorageClient {
    objects: Arc<Mutex<HashMap<String, (Vec<u8>, String)>>>,
    base_url: String,
    upload_count: Arc<Mutex<usize>>,
    fail_signing: bool,
    fail_upload: bool,
}

impl MockStorageClient {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            base_url: "https://mock-assets.example.com".to_string(),
            upload_count: Arc::new(Mutex::new(0)),
            fail_signing: false,
            fail_upload: false,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_signing_failure(mut self, fail: bool) -> Self {
        self.fail_signing = fail;
        self
    }

    pub fn with_upload_failure(mut self, fail: bool) -> Self {
        self.fail_upload = fail;
        self
    }

    pub fn get_upload_count(&self) -> usize {
        *self.upload_count.lock().unwrap()
    }

    /// Stored bytes and content type for `file_name`.
    pub fn get_object(&self, file_name: &str) -> Option<(Vec<u8>, String)> {
        self.objects.lock().unwrap().get(file_name).cloned()
    }
}

impl Default for MockStorageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageService for MockStorageClient {
    async fn request_upload_url(&self, file_name: &str) -> Result<String> {
        if self.fail_signing {
            return Err(Error::Upload(
                "Failed to get signed URL: Forbidden".to_string(),
            ));
        }
        Ok(format!("{}{}", SIGNED_PREFIX, file_name))
    }

    async fn put_object(&self, signed_url: &str, data: &[u8], content_type: &str) -> Result<()> {
        if self.fail_upload {
            return Err(Error::Upload(
                "Failed to upload file: Internal Server Error".to_string(),
            ));
        }

        let file_name = signed_url
            .strip_prefix(SIGNED_PREFIX)
            .ok_or_else(|| Error::Upload(format!("Unknown signed URL: {}", signed_url)))?;

        *self.upload_count.lock().unwrap() += 1;
        self.objects.lock().unwrap().insert(
            file_name.to_string(),
            (data.to_vec(), content_type.to_string()),
        );
        Ok(())
    }

    fn public_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.base_url, file_name)
    }
}
