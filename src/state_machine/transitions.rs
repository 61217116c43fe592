/// Typed stage transitions
///
/// Each transition consumes the current stage payload and returns the next one,
/// so a stage can only be left along the edges defined here.
use super::states::*;
use crate::models::{Clip, ClipSet, ProcessingResult};

// ============================================================================
// Ready Transitions
// ============================================================================

impl Ready {
    /// Transition to Analyzing
    pub fn analyze(self) -> Analyzing {
        Analyzing::new()
    }
}

// ============================================================================
// Analyzing Transitions
// ============================================================================

impl Analyzing {
    /// Transition to Review with every clip selected
    pub fn succeed(self, clips: Vec<Clip>) -> Review {
        Review::new(ClipSet::from_analysis(clips))
    }

    /// Transition to Failed
    pub fn fail(self, message: String) -> Failed {
        Failed::new(message, FailedStage::Analyzing)
    }
}

// ============================================================================
// Review Transitions
// ============================================================================

impl Review {
    /// Self-loop: a new Review payload with one clip's selection flipped
    pub fn toggle(&self, id: &str) -> Review {
        Review::new(self.clips.toggle(id))
    }

    /// Transition to Processing at 0%
    pub fn generate(self) -> Processing {
        Processing::new()
    }
}

// ============================================================================
// Processing Transitions
// ============================================================================

impl Processing {
    /// Replace the progress value (last write wins)
    pub fn update_progress(self, progress: f64) -> Processing {
        Processing { progress, ..self }
    }

    /// Transition to Complete
    pub fn complete(self, result: ProcessingResult) -> Complete {
        Complete::new(result.output_directory, result.clip_count)
    }

    /// Transition to Failed
    pub fn fail(self, message: String) -> Failed {
        Failed::new(message, FailedStage::Processing)
    }
}

// ============================================================================
// Terminal Transitions
// ============================================================================

impl Complete {
    /// Transition back to Ready
    pub fn reset(self) -> Ready {
        Ready::new()
    }
}

impl Failed {
    /// Transition back to Ready
    pub fn reset(self) -> Ready {
        Ready::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn two_clips() -> Vec<Clip> {
        vec![
            Clip::new("intro", "Intro", "00:00:00", "00:00:30"),
            Clip::new("key", "Key Moment", "00:01:00", "00:01:45"),
        ]
    }

    #[test]
    fn test_ready_to_review() {
        let review = Ready::new().analyze().succeed(two_clips());

        assert_eq!(review.clips.len(), 2);
        assert!(review.clips.iter().all(|c| c.is_selected));
        let titles: Vec<_> = review.clips.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Intro", "Key Moment"]);
    }

    #[test]
    fn test_analyzing_to_failed() {
        let failed = Ready::new().analyze().fail("timeout".to_string());
        assert_eq!(failed.message, "timeout");
        assert_eq!(failed.failed_stage, FailedStage::Analyzing);
    }

    #[test]
    fn test_review_toggle_replaces_payload() {
        let review = Ready::new().analyze().succeed(two_clips());
        let toggled = review.toggle("intro");

        assert_eq!(toggled.selected_count(), 1);
        assert_eq!(review.selected_count(), 2);
    }

    #[test]
    fn test_processing_progress_last_write_wins() {
        let processing = Ready::new().analyze().succeed(two_clips()).generate();
        assert_eq!(processing.progress, 0.0);

        let processing = processing.update_progress(80.0).update_progress(40.0);
        assert_eq!(processing.progress, 40.0);
    }

    #[test]
    fn test_processing_to_complete() {
        let processing = Ready::new().analyze().succeed(two_clips()).generate();
        let complete = processing.complete(ProcessingResult {
            output_directory: PathBuf::from("/out"),
            clip_count: 1,
        });

        assert_eq!(complete.output_path, PathBuf::from("/out"));
        assert_eq!(complete.clip_count, 1);
        let _ready: Ready = complete.reset();
    }

    #[test]
    fn test_processing_to_failed_and_reset() {
        let processing = Ready::new().analyze().succeed(two_clips()).generate();
        let failed = processing.fail("ffmpeg exited".to_string());

        assert_eq!(failed.failed_stage, FailedStage::Processing);
        assert_eq!(failed.reset(), Ready::new());
    }
}
