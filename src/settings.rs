//! API key settings flow
//!
//! The stored key is never shown in full; the settings view only sees a masked
//! hint. Saving validates with the backend first. Failures are returned to the
//! caller and never reach the workflow state.

use crate::app_log;
use crate::error::{ClipScribeError, ClipScribeResult};
use crate::gateway::BackendGateway;
use std::sync::Arc;

/// Prefix of a masked key hint
const MASK_PREFIX: &str = "***";

/// Number of trailing characters revealed by a hint
const HINT_CHARS: usize = 4;

pub struct ApiKeySettings {
    gateway: Arc<dyn BackendGateway>,
}

impl ApiKeySettings {
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self { gateway }
    }

    /// Masked hint for the stored key, if one is stored
    pub async fn load_hint(&self) -> ClipScribeResult<Option<String>> {
        let key = self.gateway.get_api_key().await?;
        Ok(key.filter(|k| !k.is_empty()).map(|k| mask(&k)))
    }

    /// Validate `input` with the backend and store it
    ///
    /// An untouched hint (anything starting with `***`) counts as no input.
    pub async fn save(&self, input: &str) -> ClipScribeResult<()> {
        if input.is_empty() || input.starts_with(MASK_PREFIX) {
            return Err(ClipScribeError::MissingApiKey);
        }

        let valid = self.gateway.validate_api_key(input).await.map_err(|e| {
            app_log!(LogLevel::Error, "API key validation failed: {}", e);
            e
        })?;
        if !valid {
            app_log!(LogLevel::Warn, "API key rejected by backend");
            return Err(ClipScribeError::InvalidApiKey);
        }

        self.gateway.save_api_key(input).await?;
        app_log!(LogLevel::Info, "API key saved");
        Ok(())
    }
}

/// `***` followed by the last four characters, or the whole key when shorter
pub fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(HINT_CHARS)..].iter().collect();
    format!("{}{}", MASK_PREFIX, tail)
}
