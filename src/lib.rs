pub mod config;
pub mod error;
pub mod input;
pub mod recorder;
pub mod render;
pub mod session;
pub mod stimulus;
pub mod trial;

pub use config::Config;
pub use error::{Error, Result};
pub use input::{KeySource, TerminalKeySource};
pub use recorder::{CsvResponseLog, ResponseLog, TrialRecord};
pub use render::{CaptureView, Renderer, TerminalGuard, TerminalRenderer};
pub use session::{
    CompletedTrial, SessionConfig, SessionSettings, SessionSummary, TranscriptionSession,
};
pub use stimulus::{DirectoryPool, SamplePlan, Stimulus, StimulusKind, StimulusPool};
pub use trial::{transition, Effect, Key, TrialMachine, TrialState};
