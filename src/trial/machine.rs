use tracing::debug;

use super::key::Key;

/// Per-trial interaction state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialState {
    /// Before the stimulus has been constructed
    Idle,
    /// Stimulus constructed and shown for the first time
    Presenting,
    /// Accumulating typed input
    Capturing { text: String },
    /// Trial finished; `text` is the final transcription
    Done { text: String },
}

/// Side effect requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Invoke the stimulus presentation action (play, draw)
    Present,
}

/// Apply one key event to a capturing trial.
///
/// Keys outside `Capturing` leave the state untouched. `Replay` is a
/// self-transition that only emits [`Effect::Present`].
pub fn transition(state: TrialState, key: Key) -> (TrialState, Option<Effect>) {
    let mut text = match state {
        TrialState::Capturing { text } => text,
        other => return (other, None),
    };

    match key {
        Key::Advance => return (TrialState::Done { text }, None),
        Key::Replay => return (TrialState::Capturing { text }, Some(Effect::Present)),
        Key::Backspace => {
            text.pop();
        }
        Key::Ignored => {}
        Key::Letter(_) | Key::Digit(_) | Key::QuestionMark => {
            if let Some(c) = key.appended_char() {
                text.push(c);
            }
        }
    }

    (TrialState::Capturing { text }, None)
}

/// Owns the state of one trial from `Idle` to `Done`
#[derive(Debug)]
pub struct TrialMachine {
    state: TrialState,
}

impl Default for TrialMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl TrialMachine {
    pub fn new() -> Self {
        Self {
            state: TrialState::Idle,
        }
    }

    pub fn state(&self) -> &TrialState {
        &self.state
    }

    /// `Idle -> Presenting`; the caller must present the stimulus
    pub fn start(&mut self) -> Option<Effect> {
        if self.state != TrialState::Idle {
            return None;
        }
        self.state = TrialState::Presenting;
        Some(Effect::Present)
    }

    /// `Presenting -> Capturing` with empty text
    pub fn begin_capture(&mut self) {
        if self.state == TrialState::Presenting {
            self.state = TrialState::Capturing {
                text: String::new(),
            };
        }
    }

    /// Feed one key event, returning any effect to perform
    pub fn feed(&mut self, key: Key) -> Option<Effect> {
        let state = std::mem::replace(&mut self.state, TrialState::Idle);
        let (next, effect) = transition(state, key);
        debug!("Key {:?} -> {:?}", key, next);
        self.state = next;
        effect
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, TrialState::Done { .. })
    }

    /// Text typed so far (empty before capture starts)
    pub fn text(&self) -> &str {
        match &self.state {
            TrialState::Capturing { text } | TrialState::Done { text } => text,
            _ => "",
        }
    }

    /// Final transcription, `None` unless the trial reached `Done`
    pub fn into_transcription(self) -> Option<String> {
        match self.state {
            TrialState::Done { text } => Some(text),
            _ => None,
        }
    }
}
