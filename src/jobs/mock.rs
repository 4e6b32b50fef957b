use super::JobService;
use crate::models::{GenerationJob, JobStatus, JobStatusResponse, ResultItem, ResultPayload};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted job API. Status responses are served in order; once the script
/// runs out the job stays `processing`.
#[derive(Clone)]
pub struct MockJobClient {
    job_id: String,
    statuses: Arc<Mutex<VecDeque<JobStatusResponse>>>,
    submitted_urls: Arc<Mutex<Vec<String>>>,
    status_count: Arc<Mutex<usize>>,
    fail_submit: bool,
}

impl MockJobClient {
    pub fn new() -> Self {
        Self {
            job_id: "mock-job".to_string(),
            statuses: Arc::new(Mutex::new(VecDeque::new())),
            submitted_urls: Arc::new(Mutex::new(Vec::new())),
            status_count: Arc::new(Mutex::new(0)),
            fail_submit: false,
        }
    }

    pub fn with_job_id(mut self, job_id: &str) -> Self {
        self.job_id = job_id.to_string();
        self
    }

    pub fn with_status(self, status: JobStatus) -> Self {
        self.statuses.lock().unwrap().push_back(JobStatusResponse {
            status,
            result: None,
            error: None,
        });
        self
    }

    pub fn with_completed(self, result_url: &str) -> Self {
        self.statuses.lock().unwrap().push_back(JobStatusResponse {
            status: JobStatus::Completed,
            result: Some(ResultPayload::Many(vec![ResultItem {
                image: Some(result_url.to_string()),
                ..ResultItem::default()
            }])),
            error: None,
        });
        self
    }

    pub fn with_failure(self, status: JobStatus, message: Option<&str>) -> Self {
        self.statuses.lock().unwrap().push_back(JobStatusResponse {
            status,
            result: None,
            error: message.map(str::to_string),
        });
        self
    }

    pub fn with_submit_failure(mut self, fail: bool) -> Self {
        self.fail_submit = fail;
        self
    }

    pub fn get_status_count(&self) -> usize {
        *self.status_count.lock().unwrap()
    }

    pub fn get_submitted_urls(&self) -> Vec<String> {
        self.submitted_urls.lock().unwrap().clone()
    }
}

impl Default for MockJobClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobService for MockJobClient {
    async fn submit(&self, image_url: &str) -> Result<GenerationJob> {
        if self.fail_submit {
            return Err(Error::Submission("Internal Server Error".to_string()));
        }

        self.submitted_urls
            .lock()
            .unwrap()
            .push(image_url.to_string());

        Ok(GenerationJob {
            job_id: self.job_id.clone(),
            status: JobStatus::Queued,
            result: Vec::new(),
        })
    }

    async fn fetch_status(&self, job_id: &str) -> Result<JobStatusResponse> {
        if job_id != self.job_id {
            return Err(Error::JobStatus(format!("Unknown job: {}", job_id)));
        }

        *self.status_count.lock().unwrap() += 1;

        Ok(self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(JobStatusResponse {
                status: JobStatus::Processing,
                result: None,
                error: None,
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_serves_script_then_processing() {
        let jobs = MockJobClient::new().with_status(JobStatus::Queued);

        let job = jobs.submit("https://a").await.unwrap();
        assert_eq!(job.job_id, "mock-job");

        let first = jobs.fetch_status(&job.job_id).await.unwrap();
        assert_eq!(first.status, JobStatus::Queued);
        let second = jobs.fetch_status(&job.job_id).await.unwrap();
        assert_eq!(second.status, JobStatus::Processing);

        assert_eq!(jobs.get_status_count(), 2);
        assert_eq!(jobs.get_submitted_urls(), vec!["https://a".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_unknown_job() {
        let jobs = MockJobClient::new();
        assert!(jobs.fetch_status("other").await.is_err());
    }
}
