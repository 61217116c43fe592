use crate::error::{ClipScribeError, ClipScribeResult};
use crate::logger::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File picker filter offered by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(name: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn video() -> Self {
        Self::new("Video File", &["mp4", "mov", "mkv"])
    }

    pub fn transcript() -> Self {
        Self::new("Transcript File", &["vtt", "txt"])
    }

    /// Case-insensitive extension match
    pub fn accepts(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    /// Render as ".mp4, .mov, .mkv"
    pub fn display_extensions(&self) -> String {
        self.extensions
            .iter()
            .map(|e| format!(".{}", e))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn validate(&self) -> ClipScribeResult<()> {
        if self.extensions.is_empty() {
            return Err(ClipScribeError::BuilderError(format!(
                "filter '{}' has no extensions",
                self.name
            )));
        }
        if let Some(bad) = self.extensions.iter().find(|e| e.is_empty() || e.contains('.')) {
            return Err(ClipScribeError::BuilderError(format!(
                "filter '{}' has invalid extension '{}'",
                self.name, bad
            )));
        }
        Ok(())
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipScribeConfig {
    pub video_filter: FileFilter,
    pub transcript_filter: FileFilter,
    pub log_level: LogLevel,

    /// Status shown when a transcript request is issued
    pub transcript_status_starting: String,

    /// Status shown once a transcript arrives
    pub transcript_status_done: String,
}

impl Default for ClipScribeConfig {
    fn default() -> Self {
        Self {
            video_filter: FileFilter::video(),
            transcript_filter: FileFilter::transcript(),
            log_level: LogLevel::Info,
            transcript_status_starting: "Starting transcription...".to_string(),
            transcript_status_done: "Transcript generated!".to_string(),
        }
    }
}

impl ClipScribeConfig {
    pub fn builder() -> ClipScribeConfigBuilder {
        ClipScribeConfigBuilder::new()
    }

    /// Load from a JSON file; absent fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> ClipScribeResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config: ClipScribeConfig = serde_json::from_str(&json)?;
        config
            .video_filter
            .validate()
            .and_then(|_| config.transcript_filter.validate())
            .map_err(|e| {
                ClipScribeError::ConfigError(format!("{}: {}", path.as_ref().display(), e))
            })?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ClipScribeResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

/// Builder for constructing ClipScribeConfig instances with a fluent API
///
/// # Example
/// ```
/// use clipscribe_lib::config::{ClipScribeConfig, FileFilter};
///
/// let config = ClipScribeConfig::builder()
///     .video_filter(FileFilter::new("Video File", &["mp4"]))
///     .build()
///     .unwrap();
/// assert!(config.video_filter.accepts("talk.MP4"));
/// ```
#[derive(Debug, Default)]
pub struct ClipScribeConfigBuilder {
    config: ClipScribeConfig,
}

impl ClipScribeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn video_filter(mut self, filter: FileFilter) -> Self {
        self.config.video_filter = filter;
        self
    }

    pub fn transcript_filter(mut self, filter: FileFilter) -> Self {
        self.config.transcript_filter = filter;
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.log_level = level;
        self
    }

    pub fn transcript_status_messages(
        mut self,
        starting: impl Into<String>,
        done: impl Into<String>,
    ) -> Self {
        self.config.transcript_status_starting = starting.into();
        self.config.transcript_status_done = done.into();
        self
    }

    /// # Errors
    /// Returns `ClipScribeError::BuilderError` if a filter is empty or malformed
    pub fn build(self) -> ClipScribeResult<ClipScribeConfig> {
        self.config.video_filter.validate()?;
        self.config.transcript_filter.validate()?;
        Ok(self.config)
    }
}
