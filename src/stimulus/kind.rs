use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Stimulus media kind, each bound to exactly one file extension
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum StimulusKind {
    /// `.wav` clips, played once and replayed on request
    Audio,
    /// `.mp4` clips, redrawn every frame
    Video,
    /// `.jpg` images, redrawn every frame
    Picture,
}

impl StimulusKind {
    /// File extension bound to this kind (without the dot)
    pub fn extension(self) -> &'static str {
        match self {
            StimulusKind::Audio => "wav",
            StimulusKind::Video => "mp4",
            StimulusKind::Picture => "jpg",
        }
    }

    /// Whether a file name carries this kind's extension
    pub fn matches(self, file_name: &str) -> bool {
        file_name
            .strip_suffix(self.extension())
            .is_some_and(|stem| stem.ends_with('.'))
    }

    /// Whether the stimulus is redrawn on every refresh of the capture loop.
    ///
    /// Audio is presented once and only replayed on explicit request.
    pub fn redraws_continuously(self) -> bool {
        !matches!(self, StimulusKind::Audio)
    }
}

impl fmt::Display for StimulusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StimulusKind::Audio => "audio",
            StimulusKind::Video => "video",
            StimulusKind::Picture => "picture",
        };
        f.write_str(name)
    }
}

/// A stimulus file in the pending pool
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Stimulus {
    /// File name, unique within the stimulus directory
    pub file_name: String,
    /// Media kind
    pub kind: StimulusKind,
    /// Full path inside the stimulus directory
    pub path: PathBuf,
}

impl Stimulus {
    pub fn new(dir: &Path, file_name: impl Into<String>, kind: StimulusKind) -> Self {
        let file_name = file_name.into();
        Self {
            path: dir.join(&file_name),
            file_name,
            kind,
        }
    }
}
