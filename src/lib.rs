//! Workflow core for reviewing and cutting highlight clips from a video
//!
//! The crate owns the review workflow (pick inputs, analyze, curate, generate)
//! and talks to the processing backend only through [`gateway::BackendGateway`].

pub mod config;
pub mod error;
pub mod events;
pub mod gateway;
pub mod logger;
pub mod models;
pub mod progress;
pub mod settings;
pub mod state_machine;

pub use config::ClipScribeConfig;
pub use error::{ClipScribeError, ClipScribeResult};
pub use gateway::BackendGateway;
pub use settings::ApiKeySettings;
pub use state_machine::{AppStateMachine, EventOutcome, WorkflowState};
