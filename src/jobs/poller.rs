use super::JobService;
use crate::models::{GenerationJob, JobStatus, DEFAULT_MAX_POLLS, DEFAULT_POLL_INTERVAL};
use crate::progress::{ProgressSink, Stage};
use crate::retry::{fixed_schedule, poll_with_delay, Attempt, PollOutcome, Sleeper, TokioSleeper};
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const DEFAULT_FAILURE_MESSAGE: &str = "Job processing failed";

/// Polls a job at a fixed interval until it reaches a terminal status or the
/// attempt budget runs out.
#[derive(Clone)]
pub struct JobPoller {
    interval: Duration,
    max_polls: usize,
    sleeper: Arc<dyn Sleeper>,
}

impl JobPoller {
    /// At least one poll is always made.
    pub fn new(interval: Duration, max_polls: usize) -> Self {
        Self {
            interval,
            max_polls: max_polls.max(1),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn max_polls(&self) -> usize {
        self.max_polls
    }

    /// Upper bound on time spent sleeping between polls.
    pub fn max_wait(&self) -> Duration {
        self.interval * u32::try_from(self.max_polls).unwrap_or(u32::MAX)
    }

    pub async fn poll(
        &self,
        jobs: &dyn JobService,
        job_id: &str,
        progress: &dyn ProgressSink,
    ) -> Result<GenerationJob> {
        let outcome = poll_with_delay(
            fixed_schedule(self.interval, self.max_polls),
            self.sleeper.as_ref(),
            |attempt| async move {
                let response = jobs.fetch_status(job_id).await?;
                debug!("Poll {} - Status: {}", attempt, response.status);

                match response.status.clone() {
                    status if !status.is_terminal() => {
                        if let JobStatus::Other(raw) = &status {
                            debug!("Unrecognized status '{}' treated as in progress", raw);
                        }
                        progress.update(&Stage::Processing { attempt });
                        Ok(Attempt::Pending)
                    }
                    JobStatus::Completed => Ok(Attempt::Ready(response.into_job(job_id))),
                    _ => {
                        let message = response
                            .error
                            .filter(|m| !m.is_empty())
                            .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
                        warn!("Job {} failed on poll {}: {}", job_id, attempt, message);
                        Err(Error::JobFailed(message))
                    }
                }
            },
        )
        .await?;

        match outcome {
            PollOutcome::Ready { value, attempts } => {
                info!("Job {} completed after {} polls", job_id, attempts);
                Ok(value)
            }
            PollOutcome::Exhausted { attempts } => {
                warn!("Job {} still running after {} polls", job_id, attempts);
                Err(Error::JobTimeout { polls: attempts })
            }
        }
    }
}

impl Default for JobPoller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_POLLS)
    }
}
