//! Key-event source

mod terminal;

pub use terminal::{classify, KeyPress, TerminalKeySource};

use crate::error::Result;
use crate::trial::Key;
use std::time::Duration;

/// Source of discrete key events, in arrival order
#[async_trait::async_trait]
pub trait KeySource: Send {
    /// Every key available before `tick` elapses; empty when the tick passes
    /// without input
    async fn next_batch(&mut self, tick: Duration) -> Result<Vec<Key>>;

    /// Drop events buffered so far
    fn discard_pending(&mut self) -> Result<()>;
}
