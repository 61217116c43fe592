/// Inputs gathered for one session, held alongside the workflow stage
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInputs {
    pub video_path: Option<PathBuf>,

    /// Picked by the user or produced by transcript generation
    pub transcript_path: Option<PathBuf>,

    /// Free-text guidance for clip selection
    pub context: String,
}

impl SessionInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context as sent to the backend; empty means absent
    pub fn context_for_request(&self) -> Option<String> {
        if self.context.is_empty() {
            None
        } else {
            Some(self.context.clone())
        }
    }

    /// Both paths needed for analysis are present
    pub fn is_complete(&self) -> bool {
        self.video_path.is_some() && self.transcript_path.is_some()
    }

    /// Last path component of the video, for display
    pub fn video_file_name(&self) -> Option<String> {
        self.video_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
    }

    pub fn transcript_file_name(&self) -> Option<String> {
        self.transcript_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Side activity: generating a transcript on demand
///
/// Independent of the workflow stage; its failures never reach `WorkflowState`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum TranscriptJob {
    #[default]
    Idle,
    Running {
        status: String,
    },
    Failed {
        message: String,
    },
}

impl TranscriptJob {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// Status text while running
    pub fn status(&self) -> Option<&str> {
        match self {
            Self::Running { status } => Some(status),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_context_is_absent() {
        let mut inputs = SessionInputs::new();
        assert_eq!(inputs.context_for_request(), None);

        inputs.context = "Find action items".to_string();
        assert_eq!(
            inputs.context_for_request().as_deref(),
            Some("Find action items")
        );
    }

    #[test]
    fn test_file_names_and_clear() {
        let mut inputs = SessionInputs {
            video_path: Some(PathBuf::from("/videos/standup.mp4")),
            transcript_path: Some(PathBuf::from("/videos/standup.vtt")),
            context: "focus".to_string(),
        };
        assert!(inputs.is_complete());
        assert_eq!(inputs.video_file_name().as_deref(), Some("standup.mp4"));
        assert_eq!(inputs.transcript_file_name().as_deref(), Some("standup.vtt"));

        inputs.clear();
        assert_eq!(inputs, SessionInputs::default());
        assert!(!inputs.is_complete());
    }

    #[test]
    fn test_transcript_job_accessors() {
        let running = TranscriptJob::Running {
            status: "Starting transcription...".to_string(),
        };
        assert!(running.is_running());
        assert_eq!(running.status(), Some("Starting transcription..."));
        assert_eq!(running.error(), None);

        let failed = TranscriptJob::Failed {
            message: "quota exceeded".to_string(),
        };
        assert!(!failed.is_running());
        assert_eq!(failed.error(), Some("quota exceeded"));
        assert_eq!(TranscriptJob::default(), TranscriptJob::Idle);
    }

    #[test]
    fn test_transcript_job_serializes_with_state_tag() {
        let running = TranscriptJob::Running {
            status: "Extracting audio...".to_string(),
        };
        assert_eq!(
            serde_json::to_value(running).unwrap(),
            json!({ "state": "running", "status": "Extracting audio..." })
        );
        assert_eq!(
            serde_json::to_value(TranscriptJob::Idle).unwrap(),
            json!({ "state": "idle" })
        );
        assert_eq!(
            serde_json::to_value(TranscriptJob::Failed {
                message: "quota exceeded".to_string()
            })
            .unwrap(),
            json!({ "state": "failed", "message": "quota exceeded" })
        );
    }

    #[test]
    fn test_session_inputs_serialize_camel_case() {
        let inputs = SessionInputs {
            video_path: Some(PathBuf::from("/videos/standup.mp4")),
            transcript_path: None,
            context: String::new(),
        };
        assert_eq!(
            serde_json::to_value(inputs).unwrap(),
            json!({
                "videoPath": "/videos/standup.mp4",
                "transcriptPath": null,
                "context": ""
            })
        );
    }
}
