use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A candidate or final clip
///
/// Timestamps are `HH:MM:SS` text produced by the backend, which guarantees
/// `start_time < end_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub id: String,
    pub title: String,
    pub start_time: String,
    pub end_time: String,

    /// Client-owned; absent in analysis responses
    #[serde(default)]
    pub is_selected: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sanitized_filename: Option<String>,
}

impl Clip {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            is_selected: false,
            sanitized_filename: None,
        }
    }

    pub fn with_sanitized_filename(mut self, name: impl Into<String>) -> Self {
        self.sanitized_filename = Some(name.into());
        self
    }

    /// Output file name as written by the backend, e.g. `Intro.mp4`
    pub fn output_file_name(&self) -> Option<String> {
        self.sanitized_filename
            .as_ref()
            .map(|name| format!("{}.mp4", name))
    }

    /// Length in seconds, for display only
    pub fn duration_seconds(&self) -> Option<u64> {
        let start = timestamp_to_seconds(&self.start_time)?;
        let end = timestamp_to_seconds(&self.end_time)?;
        end.checked_sub(start)
    }
}

/// Parse `HH:MM:SS` or `MM:SS` into whole seconds
pub fn timestamp_to_seconds(timestamp: &str) -> Option<u64> {
    let parts = timestamp
        .trim()
        .split(':')
        .map(|p| p.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;

    match parts.as_slice() {
        [h, m, s] => Some(h * 3600 + m * 60 + s),
        [m, s] => Some(m * 60 + s),
        _ => None,
    }
}

/// Result of a successful clip generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub output_directory: PathBuf,
    pub clip_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_payload_defaults_selection_off() {
        let json = r#"{
            "id": "c1",
            "title": "Intro",
            "startTime": "00:00:00",
            "endTime": "00:00:30",
            "sanitizedFilename": "Intro"
        }"#;
        let clip: Clip = serde_json::from_str(json).unwrap();
        assert!(!clip.is_selected);
        assert_eq!(clip.sanitized_filename.as_deref(), Some("Intro"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let clip = Clip::new("c1", "Intro", "00:00:00", "00:00:30");
        let value = serde_json::to_value(&clip).unwrap();
        assert_eq!(value["startTime"], "00:00:00");
        assert_eq!(value["isSelected"], false);
        assert!(value.get("sanitizedFilename").is_none());
    }

    #[test]
    fn test_output_file_name() {
        let clip = Clip::new("c1", "Key Moment", "00:01:00", "00:01:45");
        assert_eq!(clip.output_file_name(), None);

        let clip = clip.with_sanitized_filename("Key Moment");
        assert_eq!(clip.output_file_name().as_deref(), Some("Key Moment.mp4"));
    }

    #[test]
    fn test_duration_seconds() {
        let clip = Clip::new("c1", "Key Moment", "00:01:00", "00:01:45");
        assert_eq!(clip.duration_seconds(), Some(45));

        let short = Clip::new("c2", "Short", "01:30", "02:00");
        assert_eq!(short.duration_seconds(), Some(30));
    }

    #[test]
    fn test_timestamp_parsing() {
        assert_eq!(timestamp_to_seconds("01:02:03"), Some(3723));
        assert_eq!(timestamp_to_seconds("garbage"), None);
        assert_eq!(timestamp_to_seconds("1:2:3:4"), None);
    }

    #[test]
    fn test_processing_result_wire_names() {
        let result: ProcessingResult =
            serde_json::from_str(r#"{ "output_directory": "/out", "clip_count": 1 }"#).unwrap();
        assert_eq!(result.output_directory, PathBuf::from("/out"));
        assert_eq!(result.clip_count, 1);
    }
}
