use thiserror::Error;

/// Central error type for the ClipScribe workflow core
#[derive(Error, Debug)]
pub enum ClipScribeError {
    // ============================================================================
    // Workflow Errors
    // ============================================================================
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    // ============================================================================
    // Backend Errors
    // ============================================================================
    /// Failure reported by the processing backend, displayed verbatim
    #[error("{0}")]
    Backend(String),

    #[error("Unknown backend event: {0}")]
    UnknownEvent(String),

    // ============================================================================
    // Settings Errors
    // ============================================================================
    #[error("Please enter a valid API key")]
    MissingApiKey,

    #[error("Invalid API key. Please check and try again.")]
    InvalidApiKey,

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Builder pattern validation error
    #[error("Builder error: {0}")]
    BuilderError(String),

    // ============================================================================
    // Generic/System Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

// Failures render to the message shown by the presentation layer
impl From<ClipScribeError> for String {
    fn from(error: ClipScribeError) -> Self {
        error.to_string()
    }
}

// Backend error strings arrive untyped
impl From<String> for ClipScribeError {
    fn from(err: String) -> Self {
        ClipScribeError::Backend(err)
    }
}

impl From<&str> for ClipScribeError {
    fn from(err: &str) -> Self {
        ClipScribeError::Backend(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ClipScribeError {
    fn from(err: tokio::task::JoinError) -> Self {
        ClipScribeError::Internal(format!("Backend task failed: {}", err))
    }
}

// Helper type alias for Results
pub type ClipScribeResult<T> = Result<T, ClipScribeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_renders_verbatim() {
        let err: ClipScribeError = "timeout".into();
        assert_eq!(err.to_string(), "timeout");
    }

    #[test]
    fn test_error_conversion_to_string() {
        let err = ClipScribeError::InvalidStateTransition("Cannot analyze from Review".to_string());
        let s: String = err.into();
        assert_eq!(s, "Invalid state transition: Cannot analyze from Review");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ClipScribeError = io_err.into();
        assert!(matches!(err, ClipScribeError::Io(_)));
    }

    #[test]
    fn test_settings_messages() {
        assert_eq!(
            ClipScribeError::MissingApiKey.to_string(),
            "Please enter a valid API key"
        );
        assert_eq!(
            ClipScribeError::InvalidApiKey.to_string(),
            "Invalid API key. Please check and try again."
        );
    }
}
