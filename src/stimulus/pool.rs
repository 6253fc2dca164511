use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::kind::{Stimulus, StimulusKind};
use crate::error::{Error, Result};

/// Pending stimuli and their exclusion marker.
///
/// A stimulus is pending until `archive` succeeds for it; from then on it
/// never shows up in `list_eligible` again.
pub trait StimulusPool {
    /// Pending stimuli of `kind`, sorted by file name
    fn list_eligible(&self, kind: StimulusKind) -> Result<Vec<Stimulus>>;

    /// Permanently remove a stimulus from the pending pool
    fn archive(&self, stimulus: &Stimulus) -> Result<()>;
}

/// Filesystem-backed pool: a flat stimulus directory plus an archive
/// sub-directory that files are moved into once transcribed
#[derive(Debug, Clone)]
pub struct DirectoryPool {
    stimulus_dir: PathBuf,
    archive_dir: PathBuf,
}

impl DirectoryPool {
    pub fn new(stimulus_dir: impl Into<PathBuf>, archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            stimulus_dir: stimulus_dir.into(),
            archive_dir: archive_dir.into(),
        }
    }

    pub fn stimulus_dir(&self) -> &Path {
        &self.stimulus_dir
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    /// File names currently in the archive directory
    fn archived_names(&self) -> Result<HashSet<String>> {
        if !self.archive_dir.is_dir() {
            return Err(Error::ArchiveDirMissing(self.archive_dir.clone()));
        }
        read_file_names(&self.archive_dir)
    }
}

impl StimulusPool for DirectoryPool {
    fn list_eligible(&self, kind: StimulusKind) -> Result<Vec<Stimulus>> {
        let archived = self.archived_names()?;

        let mut eligible: Vec<Stimulus> = read_file_names(&self.stimulus_dir)?
            .into_iter()
            .filter(|name| kind.matches(name))
            .filter(|name| !archived.contains(name))
            .map(|name| Stimulus::new(&self.stimulus_dir, name, kind))
            .collect();
        eligible.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        debug!(
            "{} eligible {} stimuli in {} ({} archived entries)",
            eligible.len(),
            kind,
            self.stimulus_dir.display(),
            archived.len()
        );

        Ok(eligible)
    }

    fn archive(&self, stimulus: &Stimulus) -> Result<()> {
        let destination = self.archive_dir.join(&stimulus.file_name);

        // rename() and copy() both replace silently; an existing entry means the
        // identity was already archived once
        if destination.exists() {
            return Err(Error::Archival {
                file_name: stimulus.file_name.clone(),
                source: io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{} already archived", destination.display()),
                ),
            });
        }

        move_file(&stimulus.path, &destination).map_err(|source| Error::Archival {
            file_name: stimulus.file_name.clone(),
            source,
        })?;

        info!("Archived {} -> {}", stimulus.file_name, destination.display());

        Ok(())
    }
}

/// Rename, or copy and delete when the archive is on another filesystem
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!("{} crosses filesystems, copying instead", from.display());
            copy_then_remove(from, to)
        }
        other => other,
    }
}

/// The copy is synced before the source goes away; a failed copy leaves
/// no partial file in the archive
fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    let copied = fs::copy(from, to).and_then(|_| File::open(to)?.sync_all());
    if let Err(e) = copied {
        let _ = fs::remove_file(to);
        return Err(e);
    }

    fs::remove_file(from)
}

/// Names of the regular files directly inside `dir`
fn read_file_names(dir: &Path) -> Result<HashSet<String>> {
    let dir_err = |source: io::Error| Error::StimulusDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = HashSet::new();
    for entry in fs::read_dir(dir).map_err(dir_err)? {
        let entry = entry.map_err(dir_err)?;
        if !entry.file_type().map_err(dir_err)?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.insert(name.to_string());
        }
    }

    Ok(names)
}
