/// Stage payload types for the review workflow
///
/// Each stage is a distinct type carrying only the data valid in that stage.
use crate::models::ClipSet;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Ready stage - awaiting inputs or user action
///
/// Initial stage and the target of every reset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ready;

/// Analyzing stage - analysis request in flight
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analyzing {
    pub started_at: DateTime<Utc>,
}

/// Review stage - user curating the clip selection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub clips: ClipSet,
}

/// Processing stage - generation request in flight
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Processing {
    pub started_at: DateTime<Utc>,

    /// Latest reported progress, 0-100
    pub progress: f64,
}

/// Complete stage - clips written by the backend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Complete {
    pub completed_at: DateTime<Utc>,
    pub output_path: PathBuf,
    pub clip_count: usize,
}

/// Failed stage - analysis or generation failed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Failed {
    pub failed_at: DateTime<Utc>,
    pub message: String,
    pub failed_stage: FailedStage,
}

/// Stage where failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailedStage {
    Analyzing,
    Processing,
}

impl Ready {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Ready {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzing {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
        }
    }
}

impl Default for Analyzing {
    fn default() -> Self {
        Self::new()
    }
}

impl Review {
    pub fn new(clips: ClipSet) -> Self {
        Self { clips }
    }

    pub fn selected_count(&self) -> usize {
        self.clips.selected_count()
    }
}

impl Processing {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            progress: 0.0,
        }
    }

    pub fn elapsed(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }
}

impl Default for Processing {
    fn default() -> Self {
        Self::new()
    }
}

impl Complete {
    pub fn new(output_path: PathBuf, clip_count: usize) -> Self {
        Self {
            completed_at: Utc::now(),
            output_path,
            clip_count,
        }
    }
}

impl Failed {
    pub fn new(message: String, failed_stage: FailedStage) -> Self {
        Self {
            failed_at: Utc::now(),
            message,
            failed_stage,
        }
    }
}
