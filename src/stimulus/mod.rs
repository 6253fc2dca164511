//! Stimulus pool
//!
//! Enumerates pending stimulus files of one kind, draws the per-session
//! sample, and archives consumed stimuli so later sessions never see them.

mod kind;
mod plan;
mod pool;

pub use kind::{Stimulus, StimulusKind};
pub use plan::SamplePlan;
pub use pool::{DirectoryPool, StimulusPool};
