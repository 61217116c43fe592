//! Review workflow state machine
//!
//! Stage payloads are separate types and the transitions between them are
//! functions that consume one payload and return the next, so a stage can only
//! be left along a defined edge. `WorkflowState` wraps the payloads into a single
//! tagged value that the controller owns and publishes.
//!
//! # Stages
//!
//! - `Ready` - awaiting inputs or user action
//! - `Analyzing` - clip analysis in flight
//! - `Review` - user curating the proposed clips
//! - `Processing` - clip generation in flight
//! - `Complete` - clips written to the output directory
//! - `Error` - analysis or generation failed
//!
//! # Example
//!
//! ```
//! use clipscribe_lib::models::Clip;
//! use clipscribe_lib::state_machine::WorkflowState;
//!
//! # fn main() -> clipscribe_lib::error::ClipScribeResult<()> {
//! let state = WorkflowState::default().begin_analysis()?;
//! let state = state.finish_analysis(vec![Clip::new("a", "Intro", "00:00:00", "00:00:30")])?;
//! let state = state.toggle_clip("a")?;
//! assert_eq!(state.clips().map(|c| c.selected_count()), Some(0));
//! # Ok(())
//! # }
//! ```
pub mod controller;
pub mod requests;
pub mod session;
pub mod states;
pub mod transitions;
pub mod wrapper;

pub use controller::{AppStateMachine, EventOutcome};
pub use requests::{RequestKind, RequestTracker};
pub use session::{SessionInputs, TranscriptJob};
pub use states::*;
pub use wrapper::WorkflowState;
