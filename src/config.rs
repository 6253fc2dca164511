use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::render::{PlayerCommand, PlayerSet};
use crate::session::SessionSettings;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub display: DisplayConfig,
    pub players: PlayersConfig,
    pub recovery: RecoveryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Flat directory holding the pending stimuli
    pub stimulus_dir: String,
    /// Archive sub-directory, relative to `stimulus_dir` unless absolute
    pub archive_dir: String,
    /// Where the per-coder response logs live
    pub log_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            stimulus_dir: ".".to_string(),
            archive_dir: "CODED".to_string(),
            log_dir: ".".to_string(),
        }
    }
}

impl PathsConfig {
    pub fn stimulus_dir(&self) -> PathBuf {
        expand(&self.stimulus_dir)
    }

    pub fn archive_dir(&self) -> PathBuf {
        // join() keeps an absolute archive_dir as-is
        self.stimulus_dir().join(expand(&self.archive_dir))
    }

    pub fn log_dir(&self) -> PathBuf {
        expand(&self.log_dir)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub refresh_interval_ms: u64,
    pub closing_delay_secs: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 50,
            closing_delay_secs: 2,
        }
    }
}

/// External player command lines, e.g. `audio = "aplay -q"`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlayersConfig {
    pub audio: Option<String>,
    pub video: Option<String>,
    pub picture: Option<String>,
}

impl PlayersConfig {
    pub fn player_set(&self) -> PlayerSet {
        let parse = |line: &Option<String>| line.as_deref().and_then(PlayerCommand::parse);
        PlayerSet {
            audio: parse(&self.audio),
            video: parse(&self.video),
            picture: parse(&self.picture),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    pub enabled: bool,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Diagnostics file; the terminal belongs to the session UI
    pub file: String,
    /// Filter used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: "transcribe.log".to_string(),
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn file_path(&self) -> PathBuf {
        expand(&self.file)
    }
}

impl Config {
    /// Load `path` (any format the `config` crate knows, extension optional;
    /// a missing file is fine) and overlay `TRANSCRIBE__SECTION__KEY`
    /// environment variables
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("TRANSCRIBE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Engine settings derived from this config
    pub fn session_settings(&self, seed: Option<u64>) -> SessionSettings {
        SessionSettings {
            refresh_interval: Duration::from_millis(self.display.refresh_interval_ms),
            closing_delay: Duration::from_secs(self.display.closing_delay_secs),
            seed,
            recovery_log_dir: self.recovery.enabled.then(|| self.paths.log_dir()),
            ..SessionSettings::default()
        }
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
