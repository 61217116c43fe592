pub mod clip;
pub mod clip_set;

pub use clip::{Clip, ProcessingResult};
pub use clip_set::ClipSet;
