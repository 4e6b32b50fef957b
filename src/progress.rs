//! User-facing progress reporting for the workflow.

use std::fmt;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Uploading,
    Ready,
    Submitting,
    Queued,
    /// Non-terminal poll response; carries the 1-based attempt number.
    Processing { attempt: usize },
    Complete,
    Error,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uploading => f.write_str("UPLOADING..."),
            Self::Ready => f.write_str("READY"),
            Self::Submitting => f.write_str("SUBMITTING JOB..."),
            Self::Queued => f.write_str("JOB QUEUED..."),
            Self::Processing { attempt } => write!(f, "PROCESSING... ({})", attempt),
            Self::Complete => f.write_str("COMPLETE"),
            Self::Error => f.write_str("ERROR"),
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn update(&self, stage: &Stage);
}

/// Reports progress through `tracing`.
pub struct LogProgress;

impl LogProgress {
    /// Every stage, poll attempts included, is visible at the default `info` filter.
    pub fn level(stage: &Stage) -> tracing::Level {
        match stage {
            Stage::Error => tracing::Level::WARN,
            _ => tracing::Level::INFO,
        }
    }
}

impl ProgressSink for LogProgress {
    fn update(&self, stage: &Stage) {
        if Self::level(stage) == tracing::Level::WARN {
            tracing::warn!("Status: {}", stage);
        } else {
            tracing::info!("Status: {}", stage);
        }
    }
}

/// Keeps every reported stage, for assertions.
#[derive(Clone, Default)]
pub struct RecordingProgress {
    stages: Arc<Mutex<Vec<Stage>>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_stages(&self) -> Vec<Stage> {
        self.stages.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Stage> {
        self.stages.lock().unwrap().last().cloned()
    }
}

impl ProgressSink for RecordingProgress {
    fn update(&self, stage: &Stage) {
        self.stages.lock().unwrap().push(stage.clone());
    }
}
