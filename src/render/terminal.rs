use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::Print;
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use std::io::{self, Write};
use tokio::process::Child;
use tracing::{debug, info, warn};

use super::media::{ClipInfo, PlayerSet};
use super::{CaptureView, Renderer};
use crate::error::{Error, Result};
use crate::stimulus::{Stimulus, StimulusKind};

/// Puts the terminal in raw mode on the alternate screen; restores it on drop
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        enable_raw_mode().map_err(Error::Render)?;
        execute!(io::stdout(), EnterAlternateScreen, Hide).map_err(Error::Render)?;
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
    }
}

struct LoadedStimulus {
    stimulus: Stimulus,
    /// Extra line under the file name (clip duration, player errors)
    detail: Option<String>,
    /// Running player or viewer process
    player: Option<Child>,
}

/// Text-mode presentation surface.
///
/// Stimuli are shown as a panel naming the file; actual playback is
/// delegated to the configured external players.
pub struct TerminalRenderer<W: Write + Send = io::Stdout> {
    out: W,
    /// Fixed screen size; queried from the terminal when `None`
    size: Option<(u16, u16)>,
    players: PlayerSet,
    loaded: Option<LoadedStimulus>,
    frame_started: bool,
}

impl TerminalRenderer<io::Stdout> {
    pub fn new(players: PlayerSet) -> Self {
        Self::with_writer(io::stdout(), None, players)
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn with_writer(out: W, size: Option<(u16, u16)>, players: PlayerSet) -> Self {
        Self {
            out,
            size,
            players,
            loaded: None,
            frame_started: false,
        }
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    fn screen_size(&self) -> Result<(u16, u16)> {
        match self.size {
            Some(size) => Ok(size),
            None => terminal::size().map_err(Error::Render),
        }
    }

    /// First drawing call after a flip clears the previous frame
    fn begin_frame(&mut self) -> Result<()> {
        if !self.frame_started {
            queue!(self.out, Clear(ClearType::All)).map_err(Error::Render)?;
            self.frame_started = true;
        }
        Ok(())
    }

    fn print_centered(&mut self, row: u16, text: &str) -> Result<()> {
        let (width, _) = self.screen_size()?;
        let len = text.chars().count() as u16;
        let col = width.saturating_sub(len) / 2;
        queue!(self.out, MoveTo(col, row), Print(text)).map_err(Error::Render)
    }

    fn draw_stimulus_panel(&mut self) -> Result<()> {
        let (label, detail) = match &self.loaded {
            Some(loaded) => {
                let playing = loaded.stimulus.kind == StimulusKind::Audio && loaded.player.is_some();
                let marker = if playing { " (playing)" } else { "" };
                (
                    format!(
                        "[{}] {}{}",
                        loaded.stimulus.kind, loaded.stimulus.file_name, marker
                    ),
                    loaded.detail.clone(),
                )
            }
            None => return Ok(()),
        };

        let (_, height) = self.screen_size()?;
        let row = height / 5;
        self.begin_frame()?;
        self.print_centered(row, &label)?;
        if let Some(detail) = detail {
            self.print_centered(row + 1, &detail)?;
        }
        Ok(())
    }

    fn start_player(&self, stimulus: &Stimulus) -> (Option<Child>, Option<String>) {
        match self.players.for_kind(stimulus.kind) {
            Some(player) => match player.spawn(&stimulus.path) {
                Ok(child) => (Some(child), None),
                Err(e) => {
                    warn!("Failed to start player for {}: {:#}", stimulus.file_name, e);
                    (None, Some(format!("player failed: {}", player.program())))
                }
            },
            None => (None, None),
        }
    }
}

async fn stop_player(player: Option<Child>) {
    if let Some(mut child) = player {
        // the player may already have exited on its own
        if let Err(e) = child.kill().await {
            debug!("Player stop: {}", e);
        }
    }
}

#[async_trait::async_trait]
impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    async fn load(&mut self, stimulus: &Stimulus) -> Result<()> {
        if let Some(previous) = self.loaded.take() {
            stop_player(previous.player).await;
        }

        let mut detail = None;
        let mut player = None;

        match stimulus.kind {
            StimulusKind::Audio => match ClipInfo::probe(&stimulus.path) {
                Ok(clip) => detail = Some(clip.describe()),
                Err(e) => warn!("Could not read WAV header of {}: {:#}", stimulus.file_name, e),
            },
            // viewers run for the whole trial; `present` only redraws the panel
            StimulusKind::Video | StimulusKind::Picture => {
                let (child, failure) = self.start_player(stimulus);
                player = child;
                detail = failure;
            }
        }

        info!("Loaded {} stimulus {}", stimulus.kind, stimulus.file_name);

        self.loaded = Some(LoadedStimulus {
            stimulus: stimulus.clone(),
            detail,
            player,
        });

        Ok(())
    }

    async fn present(&mut self) -> Result<()> {
        let kind = match &self.loaded {
            Some(loaded) => loaded.stimulus.kind,
            None => return Ok(()),
        };

        if kind == StimulusKind::Audio {
            // replay restarts playback from the beginning
            let (previous, stimulus) = match self.loaded.as_mut() {
                Some(loaded) => (loaded.player.take(), loaded.stimulus.clone()),
                None => return Ok(()),
            };
            stop_player(previous).await;

            let (child, failure) = self.start_player(&stimulus);
            if let Some(loaded) = self.loaded.as_mut() {
                loaded.player = child;
                if failure.is_some() {
                    loaded.detail = failure;
                }
            }
        }

        self.draw_stimulus_panel()
    }

    fn draw_capture(&mut self, view: &CaptureView<'_>) -> Result<()> {
        let (width, height) = self.screen_size()?;
        self.begin_frame()?;

        self.print_centered(height * 13 / 20, view.prompt)?;
        self.print_centered(height * 3 / 4, view.text)?;

        let counter = format!("{}/{}", view.trial, view.total);
        let col = width.saturating_sub(counter.chars().count() as u16 + 1);
        queue!(
            self.out,
            MoveTo(col, height.saturating_sub(1)),
            Print(counter)
        )
        .map_err(Error::Render)
    }

    fn show_message(&mut self, text: &str) -> Result<()> {
        let (_, height) = self.screen_size()?;
        self.begin_frame()?;

        let lines: Vec<&str> = text.lines().collect();
        let top = (height / 2).saturating_sub(lines.len() as u16 / 2);
        for (i, line) in lines.iter().enumerate() {
            self.print_centered(top + i as u16, line)?;
        }
        Ok(())
    }

    fn flip(&mut self) -> Result<()> {
        self.out.flush().map_err(Error::Render)?;
        self.frame_started = false;
        Ok(())
    }

    async fn unload(&mut self) -> Result<()> {
        if let Some(loaded) = self.loaded.take() {
            stop_player(loaded.player).await;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "terminal"
    }
}
