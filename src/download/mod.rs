//! Saving the result locally
//!
//! Downloads try an ordered list of strategies. Each runs only if every
//! earlier one failed; the failures are collected so the final error (or the
//! log) shows why each path was abandoned.

pub mod direct;
pub mod handoff;
pub mod reencode;

pub use direct::DirectFetch;
pub use handoff::Handoff;
pub use reencode::ReencodeDisplayed;

use crate::media::MediaFetcher;
use crate::render::RenderedResult;
use crate::{ids, Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

pub const FILE_PREFIX: &str = "vector_art_";

pub struct DownloadRequest<'a> {
    pub result: &'a RenderedResult,
    pub dest_dir: &'a Path,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved {
        path: PathBuf,
        strategy: &'static str,
    },
    /// Nothing was saved; the user has to fetch the asset themselves.
    Handoff { url: String, instruction: String },
}

#[async_trait]
pub trait DownloadStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn attempt(&self, request: &DownloadRequest<'_>) -> Result<DownloadOutcome>;
}

pub struct DownloadChain {
    strategies: Vec<Box<dyn DownloadStrategy>>,
}

impl DownloadChain {
    pub fn new(strategies: Vec<Box<dyn DownloadStrategy>>) -> Self {
        Self { strategies }
    }

    /// Direct fetch, then re-encode of the displayed image, then hand-off.
    pub fn standard(fetcher: Arc<dyn MediaFetcher>) -> Self {
        Self::new(vec![
            Box::new(DirectFetch::new(fetcher)),
            Box::new(ReencodeDisplayed),
            Box::new(Handoff),
        ])
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub async fn download(&self, request: &DownloadRequest<'_>) -> Result<DownloadOutcome> {
        let mut failures = Vec::new();

        for strategy in &self.strategies {
            match strategy.attempt(request).await {
                Ok(outcome) => {
                    info!("Download via {} succeeded", strategy.name());
                    return Ok(outcome);
                }
                Err(e) => {
                    warn!("Download via {} failed: {}", strategy.name(), e);
                    failures.push(format!("{}: {}", strategy.name(), e));
                }
            }
        }

        Err(Error::Download { failures })
    }
}

/// Fresh `vector_art_<id>.<ext>` file name.
pub fn download_file_name(extension: &str) -> String {
    format!(
        "{}{}.{}",
        FILE_PREFIX,
        ids::generate_id(ids::DOWNLOAD_ID_LENGTH),
        extension
    )
}
