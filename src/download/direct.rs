use super::{download_file_name, DownloadOutcome, DownloadRequest, DownloadStrategy};
use crate::media::{url_extension, MediaFetcher, MediaKind};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Fetch the asset again and write the bytes as they are.
pub struct DirectFetch {
    fetcher: Arc<dyn MediaFetcher>,
}

impl DirectFetch {
    pub fn new(fetcher: Arc<dyn MediaFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl DownloadStrategy for DirectFetch {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn attempt(&self, request: &DownloadRequest<'_>) -> Result<DownloadOutcome> {
        let bytes = self.fetcher.fetch(&request.result.url).await?;

        // Images are always saved as .png; videos keep their container.
        let extension = match request.result.kind {
            MediaKind::Image => "png".to_string(),
            MediaKind::Video => {
                url_extension(&request.result.url).unwrap_or_else(|| "mp4".to_string())
            }
        };

        let path = request.dest_dir.join(download_file_name(&extension));
        tokio::fs::write(&path, &bytes).await?;

        Ok(DownloadOutcome::Saved {
            path,
            strategy: self.name(),
        })
    }
}
