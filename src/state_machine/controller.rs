use super::requests::{RequestKind, RequestTracker};
use super::session::{SessionInputs, TranscriptJob};
use super::wrapper::WorkflowState;
use crate::app_log;
use crate::config::ClipScribeConfig;
use crate::error::ClipScribeResult;
use crate::events::{ControllerEvent, WorkflowStateChangedEvent};
use crate::gateway::BackendGateway;
use crate::logger::{LogLevel, LogSource, LOGGER};
use crate::models::Clip;
use crate::progress::ProgressChannel;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use uuid::Uuid;

/// What applying a controller event did
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Applied,
    /// Completion for a request that is no longer in flight
    Stale,
    /// Event not meaningful in the current stage
    Ignored,
    /// Transcript generation failed; the workflow stage is untouched
    TranscriptFailed(String),
}

/// Central controller for the review workflow
///
/// Owns the workflow stage, the session inputs and the bookkeeping for backend
/// requests. User intents and backend events are applied one at a time through
/// `&mut self`; backend calls run on spawned tasks and report back through the
/// controller's event queue.
pub struct AppStateMachine {
    session_id: Uuid,
    state: WorkflowState,
    inputs: SessionInputs,
    transcript: TranscriptJob,
    requests: RequestTracker,
    config: ClipScribeConfig,
    gateway: Arc<dyn BackendGateway>,
    events_tx: mpsc::UnboundedSender<ControllerEvent>,
    events_rx: mpsc::UnboundedReceiver<ControllerEvent>,
    state_tx: watch::Sender<WorkflowState>,
    progress: ProgressChannel,
}

impl AppStateMachine {
    /// Create a controller in `Ready`; must be called inside a tokio runtime
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self::with_config(gateway, ClipScribeConfig::default())
    }

    pub fn with_config(gateway: Arc<dyn BackendGateway>, config: ClipScribeConfig) -> Self {
        LOGGER.set_min_level(config.log_level);

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(WorkflowState::default());

        // One subscription for the controller's lifetime, kept across resets
        let progress = ProgressChannel::spawn(gateway.subscribe(), events_tx.clone());

        Self {
            session_id: Uuid::new_v4(),
            state: WorkflowState::default(),
            inputs: SessionInputs::new(),
            transcript: TranscriptJob::Idle,
            requests: RequestTracker::new(),
            config,
            gateway,
            events_tx,
            events_rx,
            state_tx,
            progress,
        }
    }

    // ============================================================================
    // Read access
    // ============================================================================

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn inputs(&self) -> &SessionInputs {
        &self.inputs
    }

    pub fn transcript_job(&self) -> &TranscriptJob {
        &self.transcript
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn config(&self) -> &ClipScribeConfig {
        &self.config
    }

    pub fn is_listening(&self) -> bool {
        self.progress.is_active()
    }

    /// Watch workflow stage changes (re-render trigger)
    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state_tx.subscribe()
    }

    pub fn can_analyze(&self) -> bool {
        matches!(self.state, WorkflowState::Ready(_)) && self.inputs.is_complete()
    }

    pub fn can_generate_transcript(&self) -> bool {
        self.inputs.video_path.is_some()
            && self.inputs.transcript_path.is_none()
            && !self.requests.is_in_flight(RequestKind::Transcript)
    }

    pub fn can_generate(&self) -> bool {
        self.state
            .clips()
            .map(|clips| clips.selected_count() > 0)
            .unwrap_or(false)
    }

    // ============================================================================
    // Session inputs
    // ============================================================================

    pub fn set_video_path(&mut self, path: impl Into<PathBuf>) {
        self.inputs.video_path = Some(path.into());
    }

    pub fn set_transcript_path(&mut self, path: impl Into<PathBuf>) {
        self.inputs.transcript_path = Some(path.into());
    }

    pub fn set_context(&mut self, context: impl Into<String>) {
        self.inputs.context = context.into();
    }

    // ============================================================================
    // User intents
    // ============================================================================

    /// Ask the backend for a transcript of the selected video
    ///
    /// Returns false without side effects when the preconditions do not hold.
    pub fn request_transcript_generation(&mut self) -> bool {
        if !self.can_generate_transcript() {
            app_log!(LogLevel::Debug, "Transcript generation not available");
            return false;
        }
        let Some(video_path) = self.inputs.video_path.clone() else {
            return false;
        };

        let generation = self.requests.begin(RequestKind::Transcript);
        self.transcript = TranscriptJob::Running {
            status: self.config.transcript_status_starting.clone(),
        };
        app_log!(
            LogLevel::Info,
            "Requesting transcript for {} (request {})",
            video_path.display(),
            generation
        );

        let gateway = self.gateway.clone();
        self.dispatch(async move {
            let result = gateway
                .generate_transcript(&video_path)
                .await
                .map_err(String::from);
            ControllerEvent::TranscriptFinished { generation, result }
        });
        true
    }

    /// Ready -> Analyzing, issuing the analysis request
    pub fn analyze(&mut self) -> bool {
        let (Some(video_path), Some(transcript_path)) = (
            self.inputs.video_path.clone(),
            self.inputs.transcript_path.clone(),
        ) else {
            app_log!(LogLevel::Debug, "Analyze ignored: inputs incomplete");
            return false;
        };
        let Some(next) = self.checked(self.state.begin_analysis()) else {
            return false;
        };

        let generation = self.requests.begin(RequestKind::Analysis);
        let user_context = self.inputs.context_for_request();
        self.set_state(next);

        let gateway = self.gateway.clone();
        self.dispatch(async move {
            let result = gateway
                .analyze_for_clips(&transcript_path, &video_path, user_context.as_deref())
                .await
                .map_err(String::from);
            ControllerEvent::AnalysisFinished { generation, result }
        });
        true
    }

    /// Flip one clip's selection; unknown ids leave the state unchanged
    pub fn toggle_clip(&mut self, id: &str) {
        let Some(clips) = self.state.clips() else {
            app_log!(LogLevel::Debug, "Toggle ignored outside review");
            return;
        };
        if !clips.contains(id) {
            app_log!(LogLevel::Debug, "Toggle ignored for unknown clip {}", id);
            return;
        }
        if let Some(next) = self.checked(self.state.toggle_clip(id)) {
            self.set_state(next);
        }
    }

    /// Review -> Processing, rendering the given clips
    pub fn generate(&mut self, clips: Vec<Clip>) -> bool {
        let Some(video_path) = self.inputs.video_path.clone() else {
            app_log!(LogLevel::Debug, "Generate ignored: no video selected");
            return false;
        };
        let Some(next) = self.checked(self.state.begin_generation()) else {
            return false;
        };

        let generation = self.requests.begin(RequestKind::Generation);
        app_log!(
            LogLevel::Info,
            "Generating {} clip(s) (request {})",
            clips.len(),
            generation
        );
        self.set_state(next);

        let gateway = self.gateway.clone();
        self.dispatch(async move {
            let result = gateway
                .generate_clips(&video_path, &clips)
                .await
                .map_err(String::from);
            ControllerEvent::GenerationFinished { generation, result }
        });
        true
    }

    /// Generate the clips currently selected in review, in order
    pub fn generate_selected(&mut self) -> bool {
        let Some(selected) = self.state.clips().map(|clips| clips.selected()) else {
            return false;
        };
        self.generate(selected)
    }

    /// Reveal the output directory; failures are only logged
    pub fn open_output_folder(&self) -> bool {
        let Some(path) = self.state.output_path().map(|p| p.to_path_buf()) else {
            return false;
        };

        let gateway = self.gateway.clone();
        tokio::spawn(async move {
            if let Err(e) = gateway.open_in_file_explorer(&path).await {
                app_log!(
                    LogLevel::Error,
                    "Failed to open folder {}: {}",
                    path.display(),
                    e
                );
            }
        });
        true
    }

    /// Back to Ready from any stage, dropping inputs and outstanding requests
    ///
    /// Dispatched backend calls are not cancelled; their results arrive stale.
    pub fn reset(&mut self) {
        self.requests.clear();
        self.inputs.clear();
        self.transcript = TranscriptJob::Idle;
        self.session_id = Uuid::new_v4();
        let next = self.state.reset();
        self.set_state(next);
    }

    // ============================================================================
    // Event processing
    // ============================================================================

    /// Wait for the next backend completion or progress event
    pub async fn next_event(&mut self) -> Option<ControllerEvent> {
        self.events_rx.recv().await
    }

    /// Wait for the next event and apply it
    pub async fn step(&mut self) -> Option<EventOutcome> {
        let event = self.next_event().await?;
        Some(self.apply(event))
    }

    /// Apply every event already queued, without waiting
    pub fn drain(&mut self) -> Vec<EventOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            outcomes.push(self.apply(event));
        }
        outcomes
    }

    /// Apply one event to the controller
    pub fn apply(&mut self, event: ControllerEvent) -> EventOutcome {
        match event {
            ControllerEvent::TranscriptFinished { generation, result } => {
                if !self.requests.finish(RequestKind::Transcript, generation) {
                    return self.stale(RequestKind::Transcript, generation);
                }
                match result {
                    Ok(path) => {
                        app_log!(
                            LogLevel::Info,
                            "{} {}",
                            self.config.transcript_status_done,
                            path.display()
                        );
                        self.inputs.transcript_path = Some(path);
                        self.transcript = TranscriptJob::Idle;
                        EventOutcome::Applied
                    }
                    Err(message) => {
                        app_log!(LogLevel::Warn, "Failed to generate transcript: {}", message);
                        self.transcript = TranscriptJob::Failed {
                            message: message.clone(),
                        };
                        EventOutcome::TranscriptFailed(message)
                    }
                }
            }
            ControllerEvent::AnalysisFinished { generation, result } => {
                if !self.requests.finish(RequestKind::Analysis, generation) {
                    return self.stale(RequestKind::Analysis, generation);
                }
                let next = match result {
                    Ok(clips) => {
                        app_log!(LogLevel::Info, "Analysis returned {} clip(s)", clips.len());
                        self.state.finish_analysis(clips)
                    }
                    Err(message) => {
                        app_log!(LogLevel::Error, "Analysis failed: {}", message);
                        self.state.fail(message)
                    }
                };
                self.apply_transition(next)
            }
            ControllerEvent::GenerationFinished { generation, result } => {
                if !self.requests.finish(RequestKind::Generation, generation) {
                    return self.stale(RequestKind::Generation, generation);
                }
                let next = match result {
                    Ok(result) => {
                        app_log!(
                            LogLevel::Info,
                            "Generated {} clip(s) into {}",
                            result.clip_count,
                            result.output_directory.display()
                        );
                        self.state.finish_generation(result)
                    }
                    Err(message) => {
                        app_log!(LogLevel::Error, "Clip generation failed: {}", message);
                        self.state.fail(message)
                    }
                };
                self.apply_transition(next)
            }
            ControllerEvent::ClipProgress(progress) => {
                if !matches!(self.state, WorkflowState::Processing(_)) {
                    app_log!(
                        LogLevel::Debug,
                        "Dropping clip progress {:.0}% in {} state",
                        progress,
                        self.state.status_name()
                    );
                    return EventOutcome::Ignored;
                }
                self.apply_transition(self.state.update_progress(progress))
            }
            ControllerEvent::TranscriptionProgress(status) => {
                if !self.transcript.is_running() {
                    return EventOutcome::Ignored;
                }
                self.transcript = TranscriptJob::Running { status };
                EventOutcome::Applied
            }
        }
    }

    // ============================================================================
    // Internals
    // ============================================================================

    /// Run a backend call on its own task and queue its completion
    fn dispatch<F>(&self, call: F)
    where
        F: Future<Output = ControllerEvent> + Send + 'static,
    {
        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            let event = call.await;
            // The receiver lives as long as the controller
            let _ = events_tx.send(event);
        });
    }

    /// Precondition failures are silent no-ops
    fn checked(&self, next: ClipScribeResult<WorkflowState>) -> Option<WorkflowState> {
        match next {
            Ok(next) => Some(next),
            Err(e) => {
                app_log!(LogLevel::Debug, "Intent ignored: {}", e);
                None
            }
        }
    }

    fn apply_transition(&mut self, next: ClipScribeResult<WorkflowState>) -> EventOutcome {
        match self.checked(next) {
            Some(next) => {
                self.set_state(next);
                EventOutcome::Applied
            }
            None => EventOutcome::Ignored,
        }
    }

    fn stale(&self, kind: RequestKind, generation: u64) -> EventOutcome {
        app_log!(
            LogLevel::Debug,
            "Discarding stale {} result (request {})",
            kind.as_str(),
            generation
        );
        EventOutcome::Stale
    }

    fn set_state(&mut self, next: WorkflowState) {
        let previous = self.state.status_name();
        if previous != next.status_name() {
            let event = WorkflowStateChangedEvent::new(self.session_id, next.status_name());
            LOGGER.log_with_context(
                LogLevel::Info,
                &format!("Workflow state changed to {}", event.status),
                LogSource::Core,
                event.log_context(previous),
            );
            log::info!("Workflow state changed: {} -> {}", previous, event.status);
        }

        self.state = next.clone();
        self.state_tx.send_replace(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayCall, MockGateway, Operation};
    use crate::models::ProcessingResult;
    use std::path::Path;

    fn clips() -> Vec<Clip> {
        vec![
            Clip::new("intro", "Intro", "00:00:00", "00:00:30"),
            Clip::new("key", "Key Moment", "00:01:00", "00:01:45"),
        ]
    }

    fn machine_with(gateway: MockGateway) -> (AppStateMachine, Arc<MockGateway>) {
        let gateway = Arc::new(gateway);
        let machine = AppStateMachine::new(gateway.clone());
        (machine, gateway)
    }

    async fn in_review() -> (AppStateMachine, Arc<MockGateway>) {
        let (mut machine, gateway) = machine_with(MockGateway::new().with_analysis(clips()));
        machine.set_video_path("v.mp4");
        machine.set_transcript_path("t.vtt");
        assert!(machine.analyze());
        assert_eq!(machine.step().await, Some(EventOutcome::Applied));
        (machine, gateway)
    }

    #[tokio::test]
    async fn test_starts_ready_and_listening() {
        let (machine, _) = machine_with(MockGateway::new());
        assert_eq!(machine.state(), &WorkflowState::default());
        assert!(machine.is_listening());
        assert!(!machine.can_analyze());
    }

    #[tokio::test]
    async fn test_analyze_requires_both_paths() {
        let (mut machine, gateway) = machine_with(MockGateway::new());
        machine.set_video_path("v.mp4");

        assert!(!machine.analyze());
        assert_eq!(machine.state().status_name(), "ready");
        tokio::task::yield_now().await;
        assert_eq!(gateway.call_count(Operation::Analysis), 0);
    }

    #[tokio::test]
    async fn test_analyze_is_noop_while_analyzing() {
        let gateway = MockGateway::new();
        gateway.hold(Operation::Analysis);
        let (mut machine, gateway) = machine_with(gateway);
        machine.set_video_path("v.mp4");
        machine.set_transcript_path("t.vtt");

        assert!(machine.analyze());
        assert!(!machine.analyze());
        assert_eq!(machine.state().status_name(), "analyzing");

        gateway.release(Operation::Analysis);
        machine.step().await;
        assert_eq!(gateway.call_count(Operation::Analysis), 1);
    }

    #[tokio::test]
    async fn test_analyze_sends_context_or_absent() {
        let (mut machine, gateway) = machine_with(MockGateway::new());
        machine.set_video_path("v.mp4");
        machine.set_transcript_path("t.vtt");
        machine.set_context("Focus on technical decisions");

        machine.analyze();
        machine.step().await;

        assert_eq!(
            gateway.calls(),
            vec![GatewayCall::AnalyzeForClips {
                transcript_path: PathBuf::from("t.vtt"),
                video_path: PathBuf::from("v.mp4"),
                user_context: Some("Focus on technical decisions".to_string()),
            }]
        );
    }

    #[tokio::test]
    async fn test_toggle_and_selected_count() {
        let (mut machine, _) = in_review().await;
        machine.toggle_clip("intro");
        machine.toggle_clip("missing");

        let clips = machine.state().clips().unwrap();
        assert_eq!(clips.selected_count(), 1);
        assert!(machine.can_generate());

        machine.toggle_clip("key");
        assert!(!machine.can_generate());
    }

    #[tokio::test]
    async fn test_toggle_replaces_payload_for_observers() {
        let (mut machine, _) = in_review().await;
        let before = machine.state().clone();

        machine.toggle_clip("intro");

        assert_eq!(before.clips().unwrap().selected_count(), 2);
        assert_eq!(machine.subscribe().borrow().clips().unwrap().selected_count(), 1);
    }

    #[tokio::test]
    async fn test_progress_only_applies_while_processing() {
        let (mut machine, gateway) = in_review().await;
        assert_eq!(
            machine.apply(ControllerEvent::ClipProgress(30.0)),
            EventOutcome::Ignored
        );
        let review = machine.state().clone();

        gateway.hold(Operation::Generation);
        assert!(machine.generate_selected());
        assert_eq!(machine.state().progress(), Some(0.0));

        assert_eq!(
            machine.apply(ControllerEvent::ClipProgress(30.0)),
            EventOutcome::Applied
        );
        assert_eq!(machine.state().progress(), Some(30.0));

        // Regressions pass through
        machine.apply(ControllerEvent::ClipProgress(10.0));
        assert_eq!(machine.state().progress(), Some(10.0));
        assert_ne!(machine.state(), &review);
    }

    #[tokio::test]
    async fn test_stale_analysis_after_reset_is_dropped() {
        let gateway = MockGateway::new().with_analysis(clips());
        gateway.hold(Operation::Analysis);
        let (mut machine, gateway) = machine_with(gateway);
        machine.set_video_path("v.mp4");
        machine.set_transcript_path("t.vtt");
        machine.analyze();

        machine.reset();
        gateway.release(Operation::Analysis);

        assert_eq!(machine.step().await, Some(EventOutcome::Stale));
        assert_eq!(machine.state(), &WorkflowState::default());
    }

    #[tokio::test]
    async fn test_stale_generation_from_previous_request() {
        let (mut machine, _) = in_review().await;
        assert!(machine.generate_selected());

        let outcome = machine.apply(ControllerEvent::GenerationFinished {
            generation: 99,
            result: Ok(ProcessingResult {
                output_directory: PathBuf::from("/old"),
                clip_count: 5,
            }),
        });
        assert_eq!(outcome, EventOutcome::Stale);
        assert_eq!(machine.state().status_name(), "processing");
    }

    #[tokio::test]
    async fn test_generation_failure_moves_to_error() {
        let (mut machine, gateway) = in_review().await;
        gateway.set_generation(Err("ffmpeg not found".to_string()));

        machine.generate_selected();
        machine.step().await;

        assert_eq!(machine.state().error(), Some("ffmpeg not found"));
        machine.reset();
        assert_eq!(machine.state().status_name(), "ready");
    }

    #[tokio::test]
    async fn test_generate_requires_review() {
        let (mut machine, gateway) = machine_with(MockGateway::new());
        machine.set_video_path("v.mp4");

        assert!(!machine.generate(clips()));
        assert_eq!(machine.state().status_name(), "ready");
        tokio::task::yield_now().await;
        assert_eq!(gateway.call_count(Operation::Generation), 0);
    }

    #[tokio::test]
    async fn test_transcript_generation_success() {
        let gateway = MockGateway::new();
        gateway.hold(Operation::Transcript);
        let (mut machine, gateway) = machine_with(gateway);
        machine.set_video_path("/videos/talk.mp4");

        assert!(machine.can_generate_transcript());
        assert!(machine.request_transcript_generation());
        assert_eq!(machine.transcript_job().status(), Some("Starting transcription..."));
        assert!(!machine.request_transcript_generation());

        machine.apply(ControllerEvent::TranscriptionProgress("Extracting audio...".to_string()));
        assert_eq!(machine.transcript_job().status(), Some("Extracting audio..."));

        gateway.release(Operation::Transcript);
        loop {
            if let Some(EventOutcome::Applied) = machine.step().await {
                if !machine.transcript_job().is_running() {
                    break;
                }
            }
        }

        assert_eq!(
            machine.inputs().transcript_path.as_deref(),
            Some(Path::new("/videos/talk.vtt"))
        );
        assert_eq!(machine.state().status_name(), "ready");
        assert!(machine.can_analyze());
    }

    #[tokio::test]
    async fn test_transcript_failure_is_transient() {
        let gateway = MockGateway::new();
        gateway.set_transcript(Err("No API key configured".to_string()));
        let (mut machine, _) = machine_with(gateway);
        machine.set_video_path("v.mp4");

        machine.request_transcript_generation();
        let outcome = loop {
            match machine.step().await {
                Some(EventOutcome::TranscriptFailed(message)) => break message,
                Some(_) => continue,
                None => panic!("event queue closed"),
            }
        };

        assert_eq!(outcome, "No API key configured");
        assert_eq!(machine.transcript_job().error(), Some("No API key configured"));
        assert_eq!(machine.state(), &WorkflowState::default());
        assert!(machine.can_generate_transcript());
    }

    #[tokio::test]
    async fn test_transcript_progress_ignored_when_idle() {
        let (mut machine, _) = machine_with(MockGateway::new());
        assert_eq!(
            machine.apply(ControllerEvent::TranscriptionProgress("stray".to_string())),
            EventOutcome::Ignored
        );
        assert_eq!(machine.transcript_job(), &TranscriptJob::Idle);
    }

    #[tokio::test]
    async fn test_reset_clears_inputs_and_session() {
        let (mut machine, _) = in_review().await;
        machine.set_context("focus");
        let session = machine.session_id();

        machine.reset();

        assert_eq!(machine.state(), &WorkflowState::default());
        assert_eq!(machine.inputs(), &SessionInputs::default());
        assert_ne!(machine.session_id(), session);
        assert!(machine.is_listening());
    }

    #[tokio::test]
    async fn test_open_output_folder_only_when_complete() {
        let (mut machine, gateway) = in_review().await;
        assert!(!machine.open_output_folder());

        machine.generate_selected();
        machine.step().await;
        assert_eq!(machine.state().status_name(), "complete");

        gateway.set_open_failure(Some("xdg-open missing"));
        assert!(machine.open_output_folder());
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert_eq!(machine.state().status_name(), "complete");
    }

    #[tokio::test]
    async fn test_drain_applies_queued_events() {
        let (mut machine, _) = in_review().await;
        machine.generate_selected();
        machine.events_tx.send(ControllerEvent::ClipProgress(50.0)).unwrap();

        let outcomes = machine.drain();
        assert!(outcomes.contains(&EventOutcome::Applied));
    }
}
