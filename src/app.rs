//! Workflow controller: upload, generate, render and download one image.

use crate::download::{DownloadChain, DownloadOutcome, DownloadRequest};
use crate::jobs::{ImageEffectsClient, JobPoller, JobService};
use crate::media::{MediaClient, MediaFetcher};
use crate::models::{Config, SourceFile, UploadTarget};
use crate::progress::{LogProgress, ProgressSink, Stage};
use crate::render::{self, RenderedResult};
use crate::storage::{self, StorageClient, StorageService};
use crate::{Error, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Uploading,
    Ready,
    Generating,
    Complete,
    Failed,
}

/// Owns everything the user interacts with: the current upload, whether
/// generation may start, and the rendered result.
pub struct Workflow {
    storage: Box<dyn StorageService>,
    jobs: Box<dyn JobService>,
    poller: JobPoller,
    media: Arc<dyn MediaFetcher>,
    downloads: DownloadChain,
    progress: Box<dyn ProgressSink>,
    state: WorkflowState,
    current_upload: Option<UploadTarget>,
    result: Option<RenderedResult>,
}

/// Injectable service bundle used to construct [`Workflow`] in tests/harnesses.
pub struct WorkflowServices {
    pub storage: Box<dyn StorageService>,
    pub jobs: Box<dyn JobService>,
    pub media: Arc<dyn MediaFetcher>,
    pub progress: Box<dyn ProgressSink>,
}

impl Workflow {
    /// Build a workflow from concrete service dependencies.
    ///
    /// Downloads use the standard strategy chain over `services.media`.
    pub fn with_services(services: WorkflowServices, poller: JobPoller) -> Self {
        let downloads = DownloadChain::standard(services.media.clone());
        Self {
            storage: services.storage,
            jobs: services.jobs,
            poller,
            media: services.media,
            downloads,
            progress: services.progress,
            state: WorkflowState::Idle,
            current_upload: None,
            result: None,
        }
    }

    pub fn with_download_chain(mut self, downloads: DownloadChain) -> Self {
        self.downloads = downloads;
        self
    }

    /// Construct the HTTP-backed workflow described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        // One connection pool for every service.
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        info!(
            "Storage API: {}, generation API: {} (effect: {})",
            config.storage_api_url, config.generation_api_url, config.effect_id
        );

        let storage = StorageClient::new_with_client(
            http_client.clone(),
            config.storage_api_url.clone(),
            config.asset_base_url.clone(),
            config.project_id.clone(),
        );
        let jobs = ImageEffectsClient::new_with_client(
            http_client.clone(),
            config.generation_api_url.clone(),
            config.user_id.clone(),
            config.effect_id.clone(),
        );
        let media = MediaClient::new_with_client(http_client);

        Ok(Self::with_services(
            WorkflowServices {
                storage: Box::new(storage),
                jobs: Box::new(jobs),
                media: Arc::new(media),
                progress: Box::new(LogProgress),
            },
            JobPoller::new(config.poll_interval, config.max_polls),
        ))
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn current_upload(&self) -> Option<&UploadTarget> {
        self.current_upload.as_ref()
    }

    pub fn result(&self) -> Option<&RenderedResult> {
        self.result.as_ref()
    }

    /// Whether the generate control is enabled.
    pub fn can_generate(&self) -> bool {
        self.current_upload.is_some()
            && matches!(
                self.state,
                WorkflowState::Ready | WorkflowState::Complete | WorkflowState::Failed
            )
    }

    /// Upload a newly picked file. It replaces any earlier upload.
    pub async fn select_file(&mut self, file: &SourceFile) -> Result<&UploadTarget> {
        self.current_upload = None;
        self.state = WorkflowState::Uploading;
        self.progress.update(&Stage::Uploading);

        match storage::upload_file(self.storage.as_ref(), file).await {
            Ok(target) => {
                self.state = WorkflowState::Ready;
                self.progress.update(&Stage::Ready);
                Ok(&*self.current_upload.insert(target))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Submit, poll and render. Returns `Ok(None)` when nothing was uploaded.
    pub async fn generate(&mut self) -> Result<Option<&RenderedResult>> {
        let Some(image_url) = self.current_upload.as_ref().map(|u| u.public_url.clone()) else {
            return Ok(None);
        };
        if !self.can_generate() {
            return Err(Error::Invariant(format!(
                "Cannot generate while {:?}",
                self.state
            )));
        }

        self.state = WorkflowState::Generating;
        self.result = None;

        match self.run_generation(&image_url).await {
            Ok(rendered) => {
                self.state = WorkflowState::Complete;
                self.progress.update(&Stage::Complete);
                Ok(Some(&*self.result.insert(rendered)))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    async fn run_generation(&self, image_url: &str) -> Result<RenderedResult> {
        self.progress.update(&Stage::Submitting);
        let job = self.jobs.submit(image_url).await?;
        info!("Submitted job {} ({})", job.job_id, job.status);

        self.progress.update(&Stage::Queued);
        let job = self
            .poller
            .poll(self.jobs.as_ref(), &job.job_id, self.progress.as_ref())
            .await?;

        let result_url = job.result_url().ok_or(Error::MissingResult)?;
        info!("Result URL: {}", result_url);

        Ok(render::render(self.media.as_ref(), result_url).await)
    }

    /// Save the rendered result into `dest_dir`. `Ok(None)` when there is no
    /// result yet.
    pub async fn download(&self, dest_dir: &Path) -> Result<Option<DownloadOutcome>> {
        let Some(result) = self.result.as_ref() else {
            return Ok(None);
        };

        let outcome = self
            .downloads
            .download(&DownloadRequest { result, dest_dir })
            .await?;
        Ok(Some(outcome))
    }

    /// Forget the upload and the result.
    pub fn reset(&mut self) {
        self.current_upload = None;
        self.result = None;
        self.state = WorkflowState::Idle;
        info!("Workflow reset");
    }

    fn fail(&mut self, e: Error) -> Error {
        error!("Workflow failed: {}", e);
        self.state = WorkflowState::Failed;
        self.progress.update(&Stage::Error);
        e
    }
}
