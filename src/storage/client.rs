use super::StorageService;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};

/// Storage API client issuing signed upload URLs.
pub struct StorageClient {
    client: Client,
    api_base_url: String,
    asset_base_url: String,
    project_id: String,
}

impl StorageClient {
    pub fn new_with_client(
        client: Client,
        api_base_url: String,
        asset_base_url: String,
        project_id: String,
    ) -> Self {
        Self {
            client,
            api_base_url,
            asset_base_url,
            project_id,
        }
    }

    async fn check(response: Response, action: &str) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        tracing::error!("Storage error (status {}): {}", status, error_text);
        Err(Error::Upload(format!(
            "{}: {}",
            action,
            status.canonical_reason().unwrap_or(status.as_str())
        )))
    }
}

#[async_trait]
impl StorageService for StorageClient {
    async fn request_upload_url(&self, file_name: &str) -> Result<String> {
        let url = format!("{}/media/get-upload-url", self.api_base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("fileName", file_name), ("projectId", &self.project_id)])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to request signed URL: {}", e);
                e
            })?;

        let response = Self::check(response, "Failed to get signed URL").await?;
        let signed_url = response.text().await?.trim().to_string();
        if signed_url.is_empty() {
            return Err(Error::Upload(
                "Failed to get signed URL: empty response".to_string(),
            ));
        }

        Ok(signed_url)
    }

    async fn put_object(&self, signed_url: &str, data: &[u8], content_type: &str) -> Result<()> {
        let response = self
            .client
            .put(signed_url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data.to_vec())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to PUT object to signed URL: {}", e);
                e
            })?;

        Self::check(response, "Failed to upload file").await?;
        Ok(())
    }

    fn public_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.asset_base_url, file_name)
    }
}
