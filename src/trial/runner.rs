use std::time::Duration;
use tracing::{debug, info};

use super::key::Key;
use super::machine::{Effect, TrialMachine};
use crate::error::Result;
use crate::input::KeySource;
use crate::render::{CaptureView, Renderer};
use crate::stimulus::Stimulus;

pub const RESPONSE_PROMPT: &str = "Type your response here:";

/// Where a trial sits in the session plan
#[derive(Debug, Clone, Copy)]
pub struct TrialPosition {
    /// 1-based trial number
    pub number: usize,
    pub total: usize,
}

async fn apply(renderer: &mut dyn Renderer, effect: Option<Effect>) -> Result<()> {
    match effect {
        Some(Effect::Present) => renderer.present().await,
        None => Ok(()),
    }
}

/// Run one trial from `Idle` to `Done` and return the transcription.
///
/// Keys buffered before the trial starts are discarded. Keys are applied in
/// arrival order; the rest of a batch after the advance key is dropped.
pub async fn run_trial(
    stimulus: &Stimulus,
    position: TrialPosition,
    renderer: &mut dyn Renderer,
    keys: &mut dyn KeySource,
    refresh: Duration,
) -> Result<String> {
    keys.discard_pending()?;

    info!(
        "Trial {}/{}: presenting {}",
        position.number, position.total, stimulus.file_name
    );

    let mut machine = TrialMachine::new();
    renderer.load(stimulus).await?;
    apply(renderer, machine.start()).await?;
    renderer.flip()?;
    machine.begin_capture();

    let redraw_stimulus = stimulus.kind.redraws_continuously();

    while !machine.is_done() {
        if redraw_stimulus {
            renderer.present().await?;
        }
        renderer.draw_capture(&CaptureView {
            prompt: RESPONSE_PROMPT,
            text: machine.text(),
            trial: position.number,
            total: position.total,
        })?;
        renderer.flip()?;

        for key in keys.next_batch(refresh).await? {
            let effect = machine.feed(key);
            apply(renderer, effect).await?;
            if machine.is_done() {
                break;
            }
        }
    }

    renderer.unload().await?;

    let transcription = machine.into_transcription().unwrap_or_default();
    debug!("Trial {} finished: {:?}", position.number, transcription);

    Ok(transcription)
}

/// Show `text` until the operator presses enter; every other key is ignored
pub async fn await_acknowledgement(
    text: &str,
    renderer: &mut dyn Renderer,
    keys: &mut dyn KeySource,
    refresh: Duration,
) -> Result<()> {
    keys.discard_pending()?;

    loop {
        renderer.show_message(text)?;
        renderer.flip()?;

        if keys
            .next_batch(refresh)
            .await?
            .into_iter()
            .any(|key| key == Key::Replay)
        {
            return Ok(());
        }
    }
}
