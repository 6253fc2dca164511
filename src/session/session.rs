use super::config::{SessionConfig, SessionSettings};
use super::recovery::complete_interrupted_archival;
use super::stats::{CompletedTrial, SessionSummary};
use crate::error::Result;
use crate::input::KeySource;
use crate::recorder::{session_date, ResponseLog, TrialRecord};
use crate::render::Renderer;
use crate::stimulus::{SamplePlan, Stimulus, StimulusPool};
use crate::trial::{await_acknowledgement, run_trial, TrialPosition};
use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};

/// A transcription session: instructions, N trials, closing message.
///
/// Every trial runs to completion, then its row is appended, then its
/// stimulus is archived. Nothing overlaps.
pub struct TranscriptionSession {
    /// Operator parameters
    config: SessionConfig,

    /// Engine knobs
    settings: SessionSettings,

    /// Pending stimuli and archival
    pool: Box<dyn StimulusPool>,

    /// Response log for this coder
    log: Box<dyn ResponseLog>,

    renderer: Box<dyn Renderer>,

    keys: Box<dyn KeySource>,

    /// When the session was created
    started_at: DateTime<Local>,

    /// Date column value, fixed for the whole session
    date: String,

    /// Stimuli archived by start-up recovery
    recovered: Vec<String>,
}

impl TranscriptionSession {
    pub fn new(
        config: SessionConfig,
        settings: SessionSettings,
        pool: Box<dyn StimulusPool>,
        log: Box<dyn ResponseLog>,
        renderer: Box<dyn Renderer>,
        keys: Box<dyn KeySource>,
    ) -> Self {
        let started_at = Local::now();

        info!(
            "Creating session {} for coder {} ({} x {}, renderer: {})",
            config.session_number,
            config.coder_id,
            config.sample_size,
            config.kind,
            renderer.name()
        );

        Self {
            date: session_date(&started_at),
            config,
            settings,
            pool,
            log,
            renderer,
            keys,
            started_at,
            recovered: Vec::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Draw the sample plan.
    ///
    /// Runs start-up recovery first when enabled. Fails with
    /// `InsufficientStimuli` before anything is shown or logged.
    pub fn prepare(&mut self) -> Result<SamplePlan> {
        if let Some(log_dir) = &self.settings.recovery_log_dir {
            let recovered =
                complete_interrupted_archival(self.pool.as_ref(), self.config.kind, log_dir)?;
            self.recovered.extend(recovered);
        }

        let eligible = self.pool.list_eligible(self.config.kind)?;
        info!(
            "{} eligible {} stimuli, drawing {}",
            eligible.len(),
            self.config.kind,
            self.config.sample_size
        );

        let mut rng = match self.settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        SamplePlan::draw(eligible, self.config.sample_size, &mut rng)
    }

    /// Prepare and run the whole session
    pub async fn run(&mut self) -> Result<SessionSummary> {
        let plan = self.prepare()?;
        self.run_plan(plan).await
    }

    /// Run a plan drawn by [`prepare`](Self::prepare).
    ///
    /// The instructions are shown here, after the sample was drawn.
    pub async fn run_plan(&mut self, plan: SamplePlan) -> Result<SessionSummary> {
        let refresh = self.settings.refresh_interval;

        await_acknowledgement(
            &self.settings.instructions,
            self.renderer.as_mut(),
            self.keys.as_mut(),
            refresh,
        )
        .await?;

        let total = plan.len();
        let mut trials = Vec::with_capacity(total);

        for (number, stimulus) in plan.trials() {
            let position = TrialPosition { number, total };
            let transcription = run_trial(
                stimulus,
                position,
                self.renderer.as_mut(),
                self.keys.as_mut(),
                refresh,
            )
            .await?;

            self.record_and_archive(stimulus, &transcription)?;

            info!("[{}, {:?}]", stimulus.file_name, transcription);

            trials.push(CompletedTrial {
                trial_number: number,
                file_name: stimulus.file_name.clone(),
                transcription,
            });
        }

        self.renderer.show_message(&self.settings.closing_message)?;
        self.renderer.flip()?;
        tokio::time::sleep(self.settings.closing_delay).await;

        let duration = Local::now().signed_duration_since(self.started_at);

        info!(
            "Session {} complete: {} trials",
            self.config.session_number,
            trials.len()
        );

        Ok(SessionSummary {
            coder_id: self.config.coder_id.clone(),
            session_number: self.config.session_number,
            kind: self.config.kind,
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            trials,
            recovered: self.recovered.clone(),
        })
    }

    /// Log first, archive second; a failed append leaves the stimulus pending
    fn record_and_archive(&self, stimulus: &Stimulus, transcription: &str) -> Result<()> {
        let record = TrialRecord {
            coder_id: self.config.coder_id.clone(),
            date: self.date.clone(),
            session_number: self.config.session_number,
            file_name: stimulus.file_name.clone(),
            transcription: transcription.to_string(),
        };

        if let Err(e) = self.log.append(&record) {
            error!("Response for {} was not recorded: {}", stimulus.file_name, e);
            return Err(e);
        }

        if let Err(e) = self.pool.archive(stimulus) {
            error!(
                "Response for {} is recorded but the file could not be archived: {}",
                stimulus.file_name, e
            );
            return Err(e);
        }

        Ok(())
    }
}
