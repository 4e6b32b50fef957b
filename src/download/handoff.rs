use super::{DownloadOutcome, DownloadRequest, DownloadStrategy};
use crate::Result;
use async_trait::async_trait;

pub const HANDOFF_INSTRUCTION: &str =
    "Download failed. Open the image URL in a browser and save it manually.";

/// Last resort: hand the URL to the user.
pub struct Handoff;

#[async_trait]
impl DownloadStrategy for Handoff {
    fn name(&self) -> &'static str {
        "handoff"
    }

    async fn attempt(&self, request: &DownloadRequest<'_>) -> Result<DownloadOutcome> {
        Ok(DownloadOutcome::Handoff {
            url: request.result.url.clone(),
            instruction: HANDOFF_INSTRUCTION.to_string(),
        })
    }
}
