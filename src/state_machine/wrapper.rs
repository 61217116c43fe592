/// Single tagged value for the current workflow stage
///
/// Wraps the per-stage payloads so the controller can hold exactly one of them,
/// while transitions stay checked against the current tag.
use super::states::*;
use crate::error::{ClipScribeError, ClipScribeResult};
use crate::models::{Clip, ClipSet, ProcessingResult};
use serde::Serialize;
use std::path::Path;

/// Workflow stage with its payload
///
/// Serializes as `{ "status": "<tag>", ...payload }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum WorkflowState {
    Ready(Ready),
    Analyzing(Analyzing),
    Review(Review),
    Processing(Processing),
    Complete(Complete),
    Error(Failed),
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::Ready(Ready::new())
    }
}

impl WorkflowState {
    /// Get the current stage as a string
    pub fn status_name(&self) -> &'static str {
        match self {
            Self::Ready(_) => "ready",
            Self::Analyzing(_) => "analyzing",
            Self::Review(_) => "review",
            Self::Processing(_) => "processing",
            Self::Complete(_) => "complete",
            Self::Error(_) => "error",
        }
    }

    /// A backend request for this stage is outstanding
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Analyzing(_) | Self::Processing(_))
    }

    /// Complete and Error only accept a reset
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete(_) | Self::Error(_))
    }

    fn invalid(&self, action: &str) -> ClipScribeError {
        ClipScribeError::InvalidStateTransition(format!(
            "Cannot {} from {} state",
            action,
            self.status_name()
        ))
    }

    /// Ready -> Analyzing
    pub fn begin_analysis(&self) -> ClipScribeResult<Self> {
        match self {
            Self::Ready(ready) => Ok(Self::Analyzing(ready.clone().analyze())),
            _ => Err(self.invalid("analyze")),
        }
    }

    /// Analyzing -> Review
    pub fn finish_analysis(&self, clips: Vec<Clip>) -> ClipScribeResult<Self> {
        match self {
            Self::Analyzing(analyzing) => Ok(Self::Review(analyzing.clone().succeed(clips))),
            _ => Err(self.invalid("finish analysis")),
        }
    }

    /// Review -> Review with one clip toggled
    pub fn toggle_clip(&self, id: &str) -> ClipScribeResult<Self> {
        match self {
            Self::Review(review) => Ok(Self::Review(review.toggle(id))),
            _ => Err(self.invalid("toggle a clip")),
        }
    }

    /// Review -> Processing
    pub fn begin_generation(&self) -> ClipScribeResult<Self> {
        match self {
            Self::Review(review) => Ok(Self::Processing(review.clone().generate())),
            _ => Err(self.invalid("generate")),
        }
    }

    /// Processing -> Processing with a new progress value
    pub fn update_progress(&self, progress: f64) -> ClipScribeResult<Self> {
        match self {
            Self::Processing(processing) => {
                Ok(Self::Processing(processing.clone().update_progress(progress)))
            }
            _ => Err(self.invalid("update progress")),
        }
    }

    /// Processing -> Complete
    pub fn finish_generation(&self, result: ProcessingResult) -> ClipScribeResult<Self> {
        match self {
            Self::Processing(processing) => Ok(Self::Complete(processing.clone().complete(result))),
            _ => Err(self.invalid("complete")),
        }
    }

    /// Analyzing or Processing -> Error
    pub fn fail(&self, message: String) -> ClipScribeResult<Self> {
        match self {
            Self::Analyzing(analyzing) => Ok(Self::Error(analyzing.clone().fail(message))),
            Self::Processing(processing) => Ok(Self::Error(processing.clone().fail(message))),
            _ => Err(self.invalid("fail")),
        }
    }

    /// Any stage -> Ready
    pub fn reset(&self) -> Self {
        match self {
            Self::Complete(complete) => Self::Ready(complete.clone().reset()),
            Self::Error(failed) => Self::Ready(failed.clone().reset()),
            _ => Self::Ready(Ready::new()),
        }
    }

    /// Clips under review
    pub fn clips(&self) -> Option<&ClipSet> {
        match self {
            Self::Review(review) => Some(&review.clips),
            _ => None,
        }
    }

    /// Progress while processing, 0-100
    pub fn progress(&self) -> Option<f64> {
        match self {
            Self::Processing(processing) => Some(processing.progress),
            _ => None,
        }
    }

    /// Output directory once complete
    pub fn output_path(&self) -> Option<&Path> {
        match self {
            Self::Complete(complete) => Some(&complete.output_path),
            _ => None,
        }
    }

    /// Error message if failed
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(failed) => Some(&failed.message),
            _ => None,
        }
    }
}
