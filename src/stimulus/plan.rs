use rand::seq::SliceRandom;
use rand::Rng;

use super::kind::Stimulus;
use crate::error::{Error, Result};

/// Ordered, duplicate-free sample of stimuli drawn once at session start.
///
/// Position `i` in the plan is trial `i + 1`.
#[derive(Debug, Clone)]
pub struct SamplePlan {
    stimuli: Vec<Stimulus>,
}

impl SamplePlan {
    /// Draw `n` distinct stimuli uniformly at random without replacement.
    ///
    /// Fails before anything is presented when `n` exceeds the eligible pool.
    pub fn draw<R: Rng + ?Sized>(
        mut eligible: Vec<Stimulus>,
        n: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if n > eligible.len() {
            return Err(Error::InsufficientStimuli {
                requested: n,
                available: eligible.len(),
            });
        }

        // the listing is already unique by file name
        eligible.shuffle(rng);
        eligible.truncate(n);

        Ok(Self { stimuli: eligible })
    }

    pub fn len(&self) -> usize {
        self.stimuli.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stimuli.is_empty()
    }

    pub fn stimuli(&self) -> &[Stimulus] {
        &self.stimuli
    }

    /// Stimuli paired with their 1-based trial number
    pub fn trials(&self) -> impl Iterator<Item = (usize, &Stimulus)> {
        self.stimuli.iter().enumerate().map(|(i, s)| (i + 1, s))
    }
}
