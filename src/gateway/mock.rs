use super::BackendGateway;
use crate::error::{ClipScribeError, ClipScribeResult};
use crate::events::{BackendEvent, ClipProgress};
use crate::models::{Clip, ProcessingResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::{broadcast, Notify};
use tokio::time::{sleep, Duration};

const EVENT_CAPACITY: usize = 64;

/// Long-running operations that can be held open by the mock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Transcript,
    Analysis,
    Generation,
}

/// Record of a request received by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    GenerateTranscript {
        video_path: PathBuf,
    },
    AnalyzeForClips {
        transcript_path: PathBuf,
        video_path: PathBuf,
        user_context: Option<String>,
    },
    GenerateClips {
        video_path: PathBuf,
        clips: Vec<Clip>,
    },
    ValidateApiKey(String),
    SaveApiKey(String),
    GetApiKey,
    OpenInFileExplorer(PathBuf),
}

/// Holds an operation open until released
#[derive(Default)]
struct Gate {
    held: AtomicBool,
    release: Notify,
}

impl Gate {
    async fn pass(&self) {
        if self.held.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
    }
}

/// Mock backend for development and testing
///
/// Responses are scripted per operation and can be changed between calls.
/// Failures are rendered as `ClipScribeError::Backend`. Useful for:
/// - Unit and integration tests of the workflow
/// - Driving the presentation layer without a real backend
pub struct MockGateway {
    /// Simulated backend latency in milliseconds
    delay_ms: u64,

    /// Emit one `clip-progress` tick per rendered clip
    emit_progress: bool,

    events: broadcast::Sender<BackendEvent>,

    transcript: Mutex<Option<Result<PathBuf, String>>>,
    analysis: Mutex<Result<Vec<Clip>, String>>,
    generation: Mutex<Option<Result<ProcessingResult, String>>>,
    key_valid: Mutex<Result<bool, String>>,
    stored_key: Mutex<Option<String>>,
    open_failure: Mutex<Option<String>>,

    transcript_gate: Gate,
    analysis_gate: Gate,
    generation_gate: Gate,

    calls: Mutex<Vec<GatewayCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockGateway {
    /// Create a mock with instant, successful responses
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            delay_ms: 0,
            emit_progress: false,
            events,
            transcript: Mutex::new(None),
            analysis: Mutex::new(Ok(Vec::new())),
            generation: Mutex::new(None),
            key_valid: Mutex::new(Ok(true)),
            stored_key: Mutex::new(None),
            open_failure: Mutex::new(None),
            transcript_gate: Gate::default(),
            analysis_gate: Gate::default(),
            generation_gate: Gate::default(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Add simulated latency to every long-running operation
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Emit a `clip-progress` tick for each clip while generating
    pub fn with_progress_ticks(mut self) -> Self {
        self.emit_progress = true;
        self
    }

    pub fn with_analysis(self, clips: Vec<Clip>) -> Self {
        self.set_analysis(Ok(clips));
        self
    }

    pub fn set_analysis(&self, response: Result<Vec<Clip>, String>) {
        *lock(&self.analysis) = response;
    }

    /// Script the transcript response; unset derives `<video>.vtt`
    pub fn set_transcript(&self, response: Result<PathBuf, String>) {
        *lock(&self.transcript) = Some(response);
    }

    /// Script the generation response; unset derives `<video dir>/clips`
    pub fn set_generation(&self, response: Result<ProcessingResult, String>) {
        *lock(&self.generation) = Some(response);
    }

    pub fn set_key_validation(&self, response: Result<bool, String>) {
        *lock(&self.key_valid) = response;
    }

    pub fn set_stored_key(&self, key: Option<&str>) {
        *lock(&self.stored_key) = key.map(str::to_string);
    }

    pub fn set_open_failure(&self, failure: Option<&str>) {
        *lock(&self.open_failure) = failure.map(str::to_string);
    }

    fn gate(&self, operation: Operation) -> &Gate {
        match operation {
            Operation::Transcript => &self.transcript_gate,
            Operation::Analysis => &self.analysis_gate,
            Operation::Generation => &self.generation_gate,
        }
    }

    /// Keep future calls of `operation` pending until `release`
    pub fn hold(&self, operation: Operation) {
        self.gate(operation).held.store(true, Ordering::SeqCst);
    }

    /// Let one held call of `operation` resolve
    pub fn release(&self, operation: Operation) {
        self.gate(operation).release.notify_one();
    }

    /// Push an event to subscribers, as the backend would
    pub fn emit(&self, event: BackendEvent) {
        // No subscribers is not an error for a push stream
        let _ = self.events.send(event);
    }

    pub fn emit_clip_progress(&self, current: u64, total: u64) {
        self.emit(BackendEvent::ClipProgress(ClipProgress::new(current, total)));
    }

    pub fn emit_transcription_progress(&self, message: impl Into<String>) {
        self.emit(BackendEvent::TranscriptionProgress(message.into()));
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        lock(&self.calls).clone()
    }

    /// Number of requests of one long-running kind received so far
    pub fn call_count(&self, operation: Operation) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| {
                matches!(
                    (operation, call),
                    (Operation::Transcript, GatewayCall::GenerateTranscript { .. })
                        | (Operation::Analysis, GatewayCall::AnalyzeForClips { .. })
                        | (Operation::Generation, GatewayCall::GenerateClips { .. })
                )
            })
            .count()
    }

    fn record(&self, call: GatewayCall) {
        lock(&self.calls).push(call);
    }

    async fn simulate_latency(&self, operation: Operation) {
        if self.delay_ms > 0 {
            sleep(Duration::from_millis(self.delay_ms)).await;
        }
        self.gate(operation).pass().await;
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendGateway for MockGateway {
    async fn generate_transcript(&self, video_path: &Path) -> ClipScribeResult<PathBuf> {
        self.record(GatewayCall::GenerateTranscript {
            video_path: video_path.to_path_buf(),
        });
        self.emit_transcription_progress("Extracting audio...");
        self.simulate_latency(Operation::Transcript).await;

        let scripted = lock(&self.transcript).clone();
        match scripted {
            Some(response) => response.map_err(ClipScribeError::Backend),
            None => Ok(video_path.with_extension("vtt")),
        }
    }

    async fn analyze_for_clips(
        &self,
        transcript_path: &Path,
        video_path: &Path,
        user_context: Option<&str>,
    ) -> ClipScribeResult<Vec<Clip>> {
        self.record(GatewayCall::AnalyzeForClips {
            transcript_path: transcript_path.to_path_buf(),
            video_path: video_path.to_path_buf(),
            user_context: user_context.map(str::to_string),
        });
        self.simulate_latency(Operation::Analysis).await;

        lock(&self.analysis).clone().map_err(ClipScribeError::Backend)
    }

    async fn generate_clips(
        &self,
        video_path: &Path,
        clips: &[Clip],
    ) -> ClipScribeResult<ProcessingResult> {
        self.record(GatewayCall::GenerateClips {
            video_path: video_path.to_path_buf(),
            clips: clips.to_vec(),
        });

        if self.emit_progress {
            let total = clips.len() as u64;
            for current in 1..=total {
                self.emit_clip_progress(current, total);
            }
        }
        self.simulate_latency(Operation::Generation).await;

        let scripted = lock(&self.generation).clone();
        match scripted {
            Some(response) => response.map_err(ClipScribeError::Backend),
            None => Ok(ProcessingResult {
                output_directory: video_path
                    .parent()
                    .unwrap_or_else(|| Path::new("."))
                    .join("clips"),
                clip_count: clips.len(),
            }),
        }
    }

    async fn validate_api_key(&self, api_key: &str) -> ClipScribeResult<bool> {
        self.record(GatewayCall::ValidateApiKey(api_key.to_string()));
        lock(&self.key_valid).clone().map_err(ClipScribeError::Backend)
    }

    async fn save_api_key(&self, api_key: &str) -> ClipScribeResult<()> {
        self.record(GatewayCall::SaveApiKey(api_key.to_string()));
        *lock(&self.stored_key) = Some(api_key.to_string());
        Ok(())
    }

    async fn get_api_key(&self) -> ClipScribeResult<Option<String>> {
        self.record(GatewayCall::GetApiKey);
        Ok(lock(&self.stored_key).clone())
    }

    async fn open_in_file_explorer(&self, path: &Path) -> ClipScribeResult<()> {
        self.record(GatewayCall::OpenInFileExplorer(path.to_path_buf()));
        match lock(&self.open_failure).clone() {
            Some(message) => Err(ClipScribeError::Backend(message)),
            None => Ok(()),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<BackendEvent> {
        self.events.subscribe()
    }
}
