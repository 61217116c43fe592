//! Boundary to the processing backend
//!
//! Every long-running operation is an async request that resolves to a value or a
//! failure; interim progress arrives separately on the backend's event stream.

pub mod mock;

pub use mock::{GatewayCall, MockGateway, Operation};

use crate::error::ClipScribeResult;
use crate::events::BackendEvent;
use crate::models::{Clip, ProcessingResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;

/// Backend operations used by the workflow core
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Produce a transcript for a video; progress text on `transcription-progress`
    async fn generate_transcript(&self, video_path: &Path) -> ClipScribeResult<PathBuf>;

    /// Propose clips for a transcript, in the backend's order
    async fn analyze_for_clips(
        &self,
        transcript_path: &Path,
        video_path: &Path,
        user_context: Option<&str>,
    ) -> ClipScribeResult<Vec<Clip>>;

    /// Render clips; progress on `clip-progress`
    async fn generate_clips(
        &self,
        video_path: &Path,
        clips: &[Clip],
    ) -> ClipScribeResult<ProcessingResult>;

    async fn validate_api_key(&self, api_key: &str) -> ClipScribeResult<bool>;

    async fn save_api_key(&self, api_key: &str) -> ClipScribeResult<()>;

    async fn get_api_key(&self) -> ClipScribeResult<Option<String>>;

    async fn open_in_file_explorer(&self, path: &Path) -> ClipScribeResult<()>;

    /// Subscribe to the process-wide event streams
    fn subscribe(&self) -> broadcast::Receiver<BackendEvent>;
}
