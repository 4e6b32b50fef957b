//! Image-effects job submission and status polling
//!
//! A generation job is created with one POST and then queried until it
//! reaches a terminal status.

pub mod client;
pub mod mock;
pub mod poller;

pub use client::ImageEffectsClient;
pub use mock::MockJobClient;
pub use poller::JobPoller;

use crate::models::{GenerationJob, JobStatusResponse};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait JobService: Send + Sync {
    /// Submit a generation job for an uploaded image.
    async fn submit(&self, image_url: &str) -> Result<GenerationJob>;

    /// Fetch the current status of a job.
    async fn fetch_status(&self, job_id: &str) -> Result<JobStatusResponse>;
}
