use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Mutex;
use stim_transcribe::{
    Config, CsvResponseLog, DirectoryPool, SessionConfig, StimulusKind, TerminalGuard,
    TerminalKeySource, TerminalRenderer, TranscriptionSession,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Present a random sample of stimuli and record typed transcriptions
#[derive(Debug, Parser)]
#[command(name = "stim-transcribe", version)]
struct Cli {
    /// Coder ID (names the response log)
    #[arg(long)]
    coder: String,

    /// Session number, 1 for the first batch
    #[arg(long)]
    session: u32,

    /// Number of files to transcribe in this session
    #[arg(long)]
    count: usize,

    /// Stimulus type
    #[arg(long, value_enum)]
    kind: StimulusKind,

    /// Config file (extension optional, may be absent)
    #[arg(long, default_value = "transcribe")]
    config: String,

    /// Seed for the random sample
    #[arg(long)]
    seed: Option<u64>,
}

fn init_tracing(cfg: &Config) -> Result<()> {
    let path = cfg.logging.file_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open diagnostics log {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.logging.level))
        .context("Invalid logging level")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = Config::load(&cli.config)?;
    init_tracing(&cfg)?;

    info!("stim-transcribe v{}", env!("CARGO_PKG_VERSION"));

    let session_config = SessionConfig::new(cli.coder, cli.session, cli.count, cli.kind)?;

    let pool = DirectoryPool::new(cfg.paths.stimulus_dir(), cfg.paths.archive_dir());
    let log = CsvResponseLog::for_coder(&cfg.paths.log_dir(), &session_config.coder_id);
    info!("Stimuli: {}", pool.stimulus_dir().display());
    info!("Archive: {}", pool.archive_dir().display());
    info!("Response log: {}", log.path().display());

    let mut session = TranscriptionSession::new(
        session_config,
        cfg.session_settings(cli.seed),
        Box::new(pool),
        Box::new(log),
        Box::new(TerminalRenderer::new(cfg.players.player_set())),
        Box::new(TerminalKeySource::new()),
    );

    // undersized pools fail here, before the screen is taken over
    let plan = session.prepare().context("Could not draw the sample")?;

    let result = {
        let _terminal = TerminalGuard::enter()?;
        session.run_plan(plan).await
    };

    match result {
        Ok(summary) => {
            println!(
                "Session {} done: {} file(s) transcribed by {}",
                summary.session_number,
                summary.trials.len(),
                summary.coder_id
            );
            for name in &summary.recovered {
                println!("Recovered previously recorded file: {}", name);
            }
            Ok(())
        }
        Err(e) => {
            error!("Session failed: {}", e);
            if e.is_pool_integrity_defect() {
                eprintln!(
                    "The last response was saved, but its file is still in the stimulus \
                     directory. Move it into the archive directory by hand before the next session."
                );
            }
            Err(e).context("Transcription session failed")
        }
    }
}
