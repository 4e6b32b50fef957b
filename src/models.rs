//! Data models and structures
//!
//! Defines the upload and job records exchanged with the storage and
//! image-effects APIs, plus runtime configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Storage location of one uploaded source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    /// Storage key, `media/<id>.<ext>`.
    pub file_name: String,
    pub signed_url: String,
    pub public_url: String,
}

/// The file picked by the user.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Job status as reported by the generation API.
///
/// Values the client does not know are kept verbatim and treated as
/// non-terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    Error,
    Other(String),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Error)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Error => "error",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "queued" => Self::Queued,
            "processing" => Self::Processing,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            "error" => Self::Error,
            _ => Self::Other(value),
        }
    }
}

impl From<JobStatus> for String {
    fn from(value: JobStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One media reference in a job result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ResultItem {
    /// Preferred asset URL: `mediaUrl`, then `video`, then `image`. Empty
    /// values are skipped.
    pub fn url(&self) -> Option<&str> {
        [&self.media_url, &self.video, &self.image]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|url| !url.is_empty())
    }
}

/// The API returns either a list of items or a bare item.
///
/// Variant order matters for `#[serde(untagged)]` decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultPayload {
    Many(Vec<ResultItem>),
    One(ResultItem),
}

/// A submitted generation job and the latest known state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationJob {
    pub job_id: String,
    pub status: JobStatus,
    pub result: Vec<ResultItem>,
}

impl GenerationJob {
    pub fn result_url(&self) -> Option<&str> {
        self.result.first().and_then(ResultItem::url)
    }
}

// Image-effects API request/response models
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobRequest {
    pub model: String,
    pub tool_type: String,
    pub effect_id: String,
    pub image_url: String,
    pub user_id: String,
    pub remove_watermark: bool,
    pub is_private: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobResponse {
    pub job_id: String,
    #[serde(default)]
    pub status: Option<JobStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusResponse {
    pub status: JobStatus,
    #[serde(default)]
    pub result: Option<ResultPayload>,
    #[serde(default)]
    pub error: Option<String>,
}

impl JobStatusResponse {
    pub fn into_job(self, job_id: &str) -> GenerationJob {
        let result = match self.result {
            Some(ResultPayload::Many(items)) => items,
            Some(ResultPayload::One(item)) => vec![item],
            None => Vec::new(),
        };

        GenerationJob {
            job_id: job_id.to_string(),
            status: self.status,
            result,
        }
    }
}

// Configuration
pub const DEFAULT_STORAGE_API_URL: &str = "https://core.faceswapper.ai";
pub const DEFAULT_ASSET_BASE_URL: &str = "https://assets.dressr.ai";
pub const DEFAULT_GENERATION_API_URL: &str = "https://api.chromastudio.ai";
pub const DEFAULT_PROJECT_ID: &str = "dressr";
pub const DEFAULT_EFFECT_ID: &str = "photoToVectorArt";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);
pub const DEFAULT_MAX_POLLS: usize = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub user_id: String,
    pub project_id: String,
    pub storage_api_url: String,
    pub asset_base_url: String,
    pub generation_api_url: String,
    pub effect_id: String,
    pub poll_interval: Duration,
    pub max_polls: usize,
    pub http_timeout: Duration,
    pub debug: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());
        let number = |key: &str, default: u64| -> Result<u64> {
            match get(key) {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    Error::Config(format!("{} must be a non-negative integer, got '{}'", key, raw))
                }),
                None => Ok(default),
            }
        };

        let max_polls = number("MAX_POLLS", DEFAULT_MAX_POLLS as u64)? as usize;
        if max_polls == 0 {
            return Err(Error::Config("MAX_POLLS must be at least 1".to_string()));
        }

        Ok(Self {
            user_id: get("USER_ID").ok_or_else(|| Error::Config("USER_ID not set".to_string()))?,
            project_id: or_default("PROJECT_ID", DEFAULT_PROJECT_ID),
            storage_api_url: trim_base(or_default("STORAGE_API_URL", DEFAULT_STORAGE_API_URL)),
            asset_base_url: trim_base(or_default("ASSET_BASE_URL", DEFAULT_ASSET_BASE_URL)),
            generation_api_url: trim_base(or_default(
                "GENERATION_API_URL",
                DEFAULT_GENERATION_API_URL,
            )),
            effect_id: or_default("EFFECT_ID", DEFAULT_EFFECT_ID),
            poll_interval: Duration::from_millis(number(
                "POLL_INTERVAL_MS",
                DEFAULT_POLL_INTERVAL.as_millis() as u64,
            )?),
            max_polls,
            http_timeout: Duration::from_secs(number("HTTP_TIMEOUT_SECS", 30)?),
            debug: get("DEBUG")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
