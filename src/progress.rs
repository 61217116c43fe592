use crate::app_log;
use crate::events::{BackendEvent, ControllerEvent};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Long-lived subscription to the backend's event streams
///
/// Converts raw `clip-progress` ticks into percentages and forwards them, along
/// with transcription status text, onto the controller's event queue. Ticks are
/// forwarded in arrival order with no smoothing; whether a tick applies is the
/// controller's decision.
pub struct ProgressChannel {
    handle: JoinHandle<()>,
}

impl ProgressChannel {
    /// Start forwarding; must be called inside a tokio runtime
    pub fn spawn(
        mut events: broadcast::Receiver<BackendEvent>,
        sink: mpsc::UnboundedSender<ControllerEvent>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        let Some(adapted) = Self::adapt(event) else {
                            continue;
                        };
                        if sink.send(adapted).is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        app_log!(LogLevel::Warn, "Progress channel lagged, skipped {} events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            app_log!(LogLevel::Debug, "Progress channel closed");
        });

        Self { handle }
    }

    /// Map one backend event to its controller form
    pub fn adapt(event: BackendEvent) -> Option<ControllerEvent> {
        match event {
            BackendEvent::ClipProgress(progress) => match progress.percent() {
                Some(percent) => Some(ControllerEvent::ClipProgress(percent)),
                None => {
                    app_log!(
                        LogLevel::Debug,
                        "Dropping clip progress tick with zero total ({}/{})",
                        progress.current,
                        progress.total
                    );
                    None
                }
            },
            BackendEvent::TranscriptionProgress(message) => {
                Some(ControllerEvent::TranscriptionProgress(message))
            }
        }
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for ProgressChannel {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
