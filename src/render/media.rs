use anyhow::{Context, Result};
use hound::WavReader;
use std::path::Path;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::stimulus::StimulusKind;

/// Header facts about a WAV stimulus, shown next to its name
#[derive(Debug, Clone, PartialEq)]
pub struct ClipInfo {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
}

impl ClipInfo {
    /// Read the WAV header without decoding samples
    pub fn probe(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let reader = WavReader::open(path)
            .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;

        let spec = reader.spec();
        // duration() counts frames, i.e. samples per channel
        let duration_seconds = reader.duration() as f64 / spec.sample_rate as f64;

        debug!(
            "Probed {}: {:.1}s, {}Hz, {} channels",
            path.display(),
            duration_seconds,
            spec.sample_rate,
            spec.channels
        );

        Ok(Self {
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        })
    }

    pub fn describe(&self) -> String {
        format!(
            "{:.1} s, {} Hz, {}",
            self.duration_seconds,
            self.sample_rate,
            if self.channels == 1 { "mono" } else { "stereo" }
        )
    }
}

/// External program used to play or display a stimulus, e.g. `mpv --loop`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCommand {
    program: String,
    args: Vec<String>,
}

impl PlayerCommand {
    /// Split a configured command line on whitespace; `None` for a blank line
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Start the player on `path`; the process is killed when the handle drops
    pub fn spawn(&self, path: &Path) -> Result<Child> {
        info!("Starting {} {}", self.program, path.display());

        Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start player: {}", self.program))
    }
}

/// Configured player per stimulus kind
#[derive(Debug, Clone, Default)]
pub struct PlayerSet {
    pub audio: Option<PlayerCommand>,
    pub video: Option<PlayerCommand>,
    pub picture: Option<PlayerCommand>,
}

impl PlayerSet {
    pub fn for_kind(&self, kind: StimulusKind) -> Option<&PlayerCommand> {
        match kind {
            StimulusKind::Audio => self.audio.as_ref(),
            StimulusKind::Video => self.video.as_ref(),
            StimulusKind::Picture => self.picture.as_ref(),
        }
    }
}
