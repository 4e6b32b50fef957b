//! Result rendering
//!
//! Images are fetched and decoded so they can be shown (and re-encoded later
//! if a direct download is not possible). Videos are shown by URL only.

use crate::media::{MediaFetcher, MediaKind};
use crate::{Error, Result};
use image::DynamicImage;
use tracing::{info, warn};

/// The image as currently displayed to the user.
#[derive(Debug, Clone, Default)]
pub struct DisplayedImage {
    image: Option<DynamicImage>,
}

impl DisplayedImage {
    pub fn loaded(image: DynamicImage) -> Self {
        Self { image: Some(image) }
    }

    pub fn not_loaded() -> Self {
        Self { image: None }
    }

    pub fn is_complete(&self) -> bool {
        self.image.is_some()
    }

    /// Decoded pixel size, `(0, 0)` when nothing loaded.
    pub fn natural_size(&self) -> (u32, u32) {
        self.image
            .as_ref()
            .map(|img| (img.width(), img.height()))
            .unwrap_or((0, 0))
    }

    /// Fully loaded with a non-zero natural size.
    pub fn is_ready(&self) -> bool {
        let (width, height) = self.natural_size();
        self.is_complete() && width > 0 && height > 0
    }

    pub fn image(&self) -> Option<&DynamicImage> {
        self.image.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct RenderedResult {
    pub url: String,
    pub kind: MediaKind,
    /// Present for images only.
    pub display: Option<DisplayedImage>,
}

impl RenderedResult {
    pub fn displayed_image(&self) -> Option<&DisplayedImage> {
        self.display.as_ref()
    }
}

/// Render the asset at `url`. A failed image load still renders, only
/// without a ready display.
pub async fn render(fetcher: &dyn MediaFetcher, url: &str) -> RenderedResult {
    let kind = MediaKind::from_url(url);

    let display = match kind {
        MediaKind::Video => {
            info!("Rendering video result {}", url);
            None
        }
        MediaKind::Image => match load_image(fetcher, url).await {
            Ok(image) => {
                info!(
                    "Rendering image result {} ({}x{})",
                    url,
                    image.width(),
                    image.height()
                );
                Some(DisplayedImage::loaded(image))
            }
            Err(e) => {
                warn!("Result image {} did not load: {}", url, e);
                Some(DisplayedImage::not_loaded())
            }
        },
    };

    RenderedResult {
        url: url.to_string(),
        kind,
        display,
    }
}

async fn load_image(fetcher: &dyn MediaFetcher, url: &str) -> Result<DynamicImage> {
    let bytes = fetcher.fetch(url).await?;
    tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| Error::Invariant(format!("Image decode task join error: {}", e)))?
        .map_err(Error::from)
}

#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([12, 34, 56, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}
