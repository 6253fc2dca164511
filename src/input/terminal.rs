use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::time::Duration;
use tracing::debug;

use super::KeySource;
use crate::error::{Error, Result};
use crate::trial::Key;

/// Outcome of classifying one terminal key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Key(Key),
    /// Ctrl-C
    Interrupt,
    /// Releases and repeats
    Skip,
}

/// Map a crossterm key event onto the capture alphabet
pub fn classify(event: &KeyEvent) -> KeyPress {
    if event.kind != KeyEventKind::Press {
        return KeyPress::Skip;
    }

    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') | KeyCode::Char('C') => KeyPress::Interrupt,
            _ => KeyPress::Key(Key::Ignored),
        };
    }

    let key = match event.code {
        KeyCode::Char(c) => Key::from_char(c),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Enter => Key::Replay,
        KeyCode::Right => Key::Advance,
        _ => Key::Ignored,
    };

    KeyPress::Key(key)
}

/// Key source reading the controlling terminal (raw mode required)
#[derive(Debug, Default)]
pub struct TerminalKeySource;

impl TerminalKeySource {
    pub fn new() -> Self {
        Self
    }
}

/// Block up to `tick` for the first event, then take whatever else is queued
fn read_events(tick: Duration) -> io::Result<Vec<Event>> {
    let mut events = Vec::new();
    if !event::poll(tick)? {
        return Ok(events);
    }
    loop {
        events.push(event::read()?);
        if !event::poll(Duration::ZERO)? {
            break;
        }
    }
    Ok(events)
}

#[async_trait::async_trait]
impl KeySource for TerminalKeySource {
    async fn next_batch(&mut self, tick: Duration) -> Result<Vec<Key>> {
        let events = tokio::task::spawn_blocking(move || read_events(tick))
            .await
            .map_err(|e| Error::Input(io::Error::new(io::ErrorKind::Other, e)))?
            .map_err(Error::Input)?;

        let mut keys = Vec::with_capacity(events.len());
        for event in events {
            if let Event::Key(key_event) = event {
                match classify(&key_event) {
                    KeyPress::Key(key) => keys.push(key),
                    KeyPress::Interrupt => return Err(Error::Interrupted),
                    KeyPress::Skip => {}
                }
            }
        }

        Ok(keys)
    }

    fn discard_pending(&mut self) -> Result<()> {
        let mut dropped = 0usize;
        while event::poll(Duration::ZERO).map_err(Error::Input)? {
            event::read().map_err(Error::Input)?;
            dropped += 1;
        }
        if dropped > 0 {
            debug!("Discarded {} buffered terminal events", dropped);
        }
        Ok(())
    }
}
