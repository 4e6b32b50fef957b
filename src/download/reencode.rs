use super::{download_file_name, DownloadOutcome, DownloadRequest, DownloadStrategy};
use crate::{Error, Result};
use async_trait::async_trait;
use image::ImageFormat;
use std::io::Cursor;

/// Encode the displayed pixels as PNG. Works when the asset cannot be fetched
/// a second time but was already shown.
pub struct ReencodeDisplayed;

#[async_trait]
impl DownloadStrategy for ReencodeDisplayed {
    fn name(&self) -> &'static str {
        "re-encode"
    }

    async fn attempt(&self, request: &DownloadRequest<'_>) -> Result<DownloadOutcome> {
        let display = request
            .result
            .displayed_image()
            .filter(|d| d.is_ready())
            .ok_or_else(|| Error::Network("Image not ready for re-encoding".to_string()))?;
        let image = display
            .image()
            .cloned()
            .ok_or_else(|| Error::Invariant("Ready display without pixels".to_string()))?;

        let png = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
            let mut bytes = Vec::new();
            image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
            Ok(bytes)
        })
        .await
        .map_err(|e| Error::Invariant(format!("PNG encode task join error: {}", e)))??;

        if png.is_empty() {
            return Err(Error::Invariant("Re-encoded image is empty".to_string()));
        }

        let path = request.dest_dir.join(download_file_name("png"));
        tokio::fs::write(&path, &png).await?;

        Ok(DownloadOutcome::Saved {
            path,
            strategy: self.name(),
        })
    }
}
