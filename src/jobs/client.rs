use super::JobService;
use crate::models::{
    GenerationJob, JobStatus, JobStatusResponse, SubmitJobRequest, SubmitJobResponse,
};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

const ACCEPT_JSON: &str = "application/json, text/plain, */*";
const TOOL_TYPE: &str = "image-effects";

/// Client for the image-effects generation API.
pub struct ImageEffectsClient {
    client: Client,
    base_url: String,
    user_id: String,
    effect_id: String,
}

impl ImageEffectsClient {
    pub fn new_with_client(
        client: Client,
        base_url: String,
        user_id: String,
        effect_id: String,
    ) -> Self {
        Self {
            client,
            base_url,
            user_id,
            effect_id,
        }
    }

    fn submit_request(&self, image_url: &str) -> SubmitJobRequest {
        SubmitJobRequest {
            model: TOOL_TYPE.to_string(),
            tool_type: TOOL_TYPE.to_string(),
            effect_id: self.effect_id.clone(),
            image_url: image_url.to_string(),
            user_id: self.user_id.clone(),
            remove_watermark: true,
            is_private: true,
        }
    }

    async fn parse<T: DeserializeOwned>(
        response: Response,
        to_error: fn(String) -> Error,
    ) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Image-effects API error (status {}): {}", status, error_text);
            return Err(to_error(
                status.canonical_reason().unwrap_or(status.as_str()).to_string(),
            ));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse image-effects response: {}\nBody: {}", e, body);
            to_error(format!("unexpected response: {}", e))
        })
    }
}

#[async_trait]
impl JobService for ImageEffectsClient {
    async fn submit(&self, image_url: &str) -> Result<GenerationJob> {
        let url = format!("{}/image-gen", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(ACCEPT, ACCEPT_JSON)
            .json(&self.submit_request(image_url))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send job to image-effects API: {}", e);
                e
            })?;

        let submitted: SubmitJobResponse = Self::parse(response, Error::Submission).await?;
        let status = submitted.status.unwrap_or(JobStatus::Queued);
        tracing::debug!("Job submitted: {} Status: {}", submitted.job_id, status);

        Ok(GenerationJob {
            job_id: submitted.job_id,
            status,
            result: Vec::new(),
        })
    }

    async fn fetch_status(&self, job_id: &str) -> Result<JobStatusResponse> {
        let url = format!(
            "{}/image-gen/{}/{}/status",
            self.base_url, self.user_id, job_id
        );
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, ACCEPT_JSON)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to query job status: {}", e);
                e
            })?;

        Self::parse(response, Error::JobStatus).await
    }
}
