use crate::error::{ClipScribeError, ClipScribeResult};
use crate::models::{Clip, ProcessingResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

/// Event names - centralized for consistency
pub mod event_names {
    pub const CLIP_PROGRESS: &str = "clip-progress";
    pub const TRANSCRIPTION_PROGRESS: &str = "transcription-progress";
    pub const WORKFLOW_STATE_CHANGED: &str = "workflow:state-changed";
}

/// Clip rendering progress pushed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipProgress {
    pub current: u64,
    pub total: u64,
}

impl ClipProgress {
    pub fn new(current: u64, total: u64) -> Self {
        Self { current, total }
    }

    /// `current / total * 100`, or `None` for a zero total
    ///
    /// Values are passed through as-is; no clamping or monotonicity.
    pub fn percent(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(self.current as f64 / self.total as f64 * 100.0)
    }
}

/// Push notification from the backend's process-wide event streams
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    ClipProgress(ClipProgress),
    TranscriptionProgress(String),
}

impl BackendEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClipProgress(_) => event_names::CLIP_PROGRESS,
            Self::TranscriptionProgress(_) => event_names::TRANSCRIPTION_PROGRESS,
        }
    }

    /// Decode a raw named event with a JSON payload
    pub fn from_named(name: &str, payload: serde_json::Value) -> ClipScribeResult<Self> {
        match name {
            event_names::CLIP_PROGRESS => Ok(Self::ClipProgress(serde_json::from_value(payload)?)),
            event_names::TRANSCRIPTION_PROGRESS => {
                Ok(Self::TranscriptionProgress(serde_json::from_value(payload)?))
            }
            other => Err(ClipScribeError::UnknownEvent(other.to_string())),
        }
    }

    pub fn payload(&self) -> ClipScribeResult<serde_json::Value> {
        let value = match self {
            Self::ClipProgress(progress) => serde_json::to_value(progress)?,
            Self::TranscriptionProgress(message) => serde_json::to_value(message)?,
        };
        Ok(value)
    }
}

/// Inbound event for the workflow controller's serialized queue
///
/// Completions carry the generation number of the request that produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    TranscriptFinished {
        generation: u64,
        result: Result<PathBuf, String>,
    },
    AnalysisFinished {
        generation: u64,
        result: Result<Vec<Clip>, String>,
    },
    GenerationFinished {
        generation: u64,
        result: Result<ProcessingResult, String>,
    },
    /// Normalized clip progress, 0-100
    ClipProgress(f64),
    TranscriptionProgress(String),
}

/// Workflow state change, for presentation-side listeners
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStateChangedEvent {
    pub session_id: Uuid,
    pub status: String, // "ready", "analyzing", "review", "processing", "complete", "error"
    pub timestamp: String,
}

impl WorkflowStateChangedEvent {
    pub fn new(session_id: Uuid, status: &str) -> Self {
        Self {
            session_id,
            status: status.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Structured log context describing this change
    pub fn log_context(&self, from: &str) -> HashMap<String, serde_json::Value> {
        let mut context = HashMap::new();
        context.insert(
            "event".to_string(),
            serde_json::json!(event_names::WORKFLOW_STATE_CHANGED),
        );
        context.insert("sessionId".to_string(), serde_json::json!(self.session_id));
        context.insert("from".to_string(), serde_json::json!(from));
        context.insert("status".to_string(), serde_json::json!(self.status));
        context.insert("timestamp".to_string(), serde_json::json!(self.timestamp));
        context
    }
}
