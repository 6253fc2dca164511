// Shared fixtures for the session integration tests
//
// Scripted key sources, a renderer that records what it was asked to do,
// and spy pool/log wrappers that journal the order of side effects.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stim_transcribe::{
    CaptureView, Error, Key, KeySource, Renderer, ResponseLog, Result, Stimulus, StimulusKind,
    StimulusPool, TrialRecord,
};

/// Key source replaying pre-recorded batches; empty batches once exhausted
#[derive(Debug, Default)]
pub struct ScriptedKeys {
    batches: VecDeque<Vec<Key>>,
    /// Batches queued as "already buffered" for the next discard
    stale: VecDeque<Vec<Key>>,
    /// Report Ctrl-C instead of idling once the batches run out
    interrupt_when_exhausted: bool,
    pub discards: usize,
}

impl ScriptedKeys {
    pub fn new(batches: Vec<Vec<Key>>) -> Self {
        Self {
            batches: batches.into(),
            ..Default::default()
        }
    }

    /// One batch per key
    pub fn typed(keys: &[Key]) -> Self {
        Self::new(keys.iter().map(|k| vec![*k]).collect())
    }

    /// Keys that are already buffered when the next trial starts
    pub fn with_stale(mut self, keys: Vec<Key>) -> Self {
        self.stale.push_back(keys);
        self
    }

    /// Press Ctrl-C right after the last scripted batch
    pub fn then_interrupt(mut self) -> Self {
        self.interrupt_when_exhausted = true;
        self
    }
}

#[async_trait::async_trait]
impl KeySource for ScriptedKeys {
    async fn next_batch(&mut self, _tick: Duration) -> Result<Vec<Key>> {
        // stale input that was never discarded leaks into the trial
        if let Some(leaked) = self.stale.pop_front() {
            return Ok(leaked);
        }
        match self.batches.pop_front() {
            Some(batch) => Ok(batch),
            None if self.interrupt_when_exhausted => Err(Error::Interrupted),
            None => Ok(Vec::new()),
        }
    }

    fn discard_pending(&mut self) -> Result<()> {
        self.discards += 1;
        self.stale.pop_front();
        Ok(())
    }
}

/// Everything a renderer was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCall {
    Load(String),
    Present,
    Capture { text: String, trial: usize, total: usize },
    Message(String),
    Flip,
    Unload,
}

#[derive(Debug, Default, Clone)]
pub struct SpyRenderer {
    pub calls: Arc<Mutex<Vec<RenderCall>>>,
}

impl SpyRenderer {
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, wanted: &RenderCall) -> usize {
        self.calls().iter().filter(|c| *c == wanted).count()
    }

    fn push(&self, call: RenderCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl Renderer for SpyRenderer {
    async fn load(&mut self, stimulus: &Stimulus) -> Result<()> {
        self.push(RenderCall::Load(stimulus.file_name.clone()));
        Ok(())
    }

    async fn present(&mut self) -> Result<()> {
        self.push(RenderCall::Present);
        Ok(())
    }

    fn draw_capture(&mut self, view: &CaptureView<'_>) -> Result<()> {
        self.push(RenderCall::Capture {
            text: view.text.to_string(),
            trial: view.trial,
            total: view.total,
        });
        Ok(())
    }

    fn show_message(&mut self, text: &str) -> Result<()> {
        self.push(RenderCall::Message(text.to_string()));
        Ok(())
    }

    fn flip(&mut self) -> Result<()> {
        self.push(RenderCall::Flip);
        Ok(())
    }

    async fn unload(&mut self) -> Result<()> {
        self.push(RenderCall::Unload);
        Ok(())
    }

    fn name(&self) -> &str {
        "spy"
    }
}

/// Ordered record of log/archive side effects across both spies
pub type Journal = Arc<Mutex<Vec<String>>>;

pub struct JournalingLog<L> {
    pub inner: L,
    pub journal: Journal,
}

impl<L: ResponseLog> ResponseLog for JournalingLog<L> {
    fn append(&self, record: &TrialRecord) -> Result<()> {
        self.inner.append(record)?;
        self.journal
            .lock()
            .unwrap()
            .push(format!("log:{}", record.file_name));
        Ok(())
    }
}

pub struct JournalingPool<P> {
    pub inner: P,
    pub journal: Journal,
}

impl<P: StimulusPool> StimulusPool for JournalingPool<P> {
    fn list_eligible(&self, kind: StimulusKind) -> Result<Vec<Stimulus>> {
        self.inner.list_eligible(kind)
    }

    fn archive(&self, stimulus: &Stimulus) -> Result<()> {
        self.inner.archive(stimulus)?;
        self.journal
            .lock()
            .unwrap()
            .push(format!("archive:{}", stimulus.file_name));
        Ok(())
    }
}

/// Stimulus directory with an archive sub-directory and the given files
pub fn stimulus_dir(root: &Path, files: &[&str]) {
    fs::create_dir_all(root.join("CODED")).unwrap();
    for name in files {
        fs::write(root.join(name), b"stimulus").unwrap();
    }
}

/// Keys that type `word`, then advance
pub fn word(word: &str) -> Vec<Key> {
    let mut keys: Vec<Key> = word.chars().map(Key::from_char).collect();
    keys.push(Key::Advance);
    keys
}
