//! Presentation surface
//!
//! The engine only talks to a [`Renderer`]; `TerminalRenderer` is the
//! crossterm implementation used by the binary.

mod media;
mod terminal;

pub use media::{ClipInfo, PlayerCommand, PlayerSet};
pub use terminal::{TerminalGuard, TerminalRenderer};

use crate::error::Result;
use crate::stimulus::Stimulus;

/// What the capture screen shows besides the stimulus
#[derive(Debug, Clone, Copy)]
pub struct CaptureView<'a> {
    /// Instruction line above the response
    pub prompt: &'a str,
    /// Transcription typed so far
    pub text: &'a str,
    /// 1-based trial number
    pub trial: usize,
    /// Trials in this session
    pub total: usize,
}

/// Presentation surface trait
///
/// Drawing calls build up a frame; `flip` makes it visible and starts a new
/// one, so anything not redrawn before the next `flip` disappears.
#[async_trait::async_trait]
pub trait Renderer: Send {
    /// Construct the presentable handle for a stimulus
    async fn load(&mut self, stimulus: &Stimulus) -> Result<()>;

    /// Present the loaded stimulus: play/replay audio, draw a picture or video frame
    async fn present(&mut self) -> Result<()>;

    /// Draw the prompt, current text and trial counter
    fn draw_capture(&mut self, view: &CaptureView<'_>) -> Result<()>;

    /// Draw a centred full-screen message
    fn show_message(&mut self, text: &str) -> Result<()>;

    /// Make the current frame visible
    fn flip(&mut self) -> Result<()>;

    /// Release the loaded stimulus (stop playback, close viewers)
    async fn unload(&mut self) -> Result<()>;

    /// Renderer name for logging
    fn name(&self) -> &str;
}
