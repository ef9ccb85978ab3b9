use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use env_logger::{Env, Target};
use rollris_engine::PieceSeed;

use crate::{high_score::HighScoreStore, tui::Runtime};

use self::app::PlayApp;

mod app;

pub(super) const DEFAULT_FPS: u32 = 60;
pub(crate) const DEFAULT_HIGH_SCORE_FILE: &str = "./data/high_score.json";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Frames per second of the game loop
    #[clap(
        long,
        default_value_t = DEFAULT_FPS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub(super) fps: u32,
    /// Seed for the piece sequence (32 hex digits); random if omitted
    #[clap(long)]
    pub(super) seed: Option<PieceSeed>,
    /// File that stores your best score
    #[clap(long, default_value = DEFAULT_HIGH_SCORE_FILE)]
    pub(super) high_score_file: PathBuf,
    /// Write logs to this file
    #[clap(long)]
    pub(super) log_file: Option<PathBuf>,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            seed: None,
            high_score_file: PathBuf::from(DEFAULT_HIGH_SCORE_FILE),
            log_file: None,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        fps,
        seed,
        high_score_file,
        log_file,
    } = arg;

    if let Some(log_file) = log_file {
        init_logger(log_file)?;
    }

    let high_score = HighScoreStore::load(high_score_file)?;
    let seed = seed.unwrap_or_else(rand::random);
    log::info!(
        "starting rollris (seed: {seed}, best score: {})",
        high_score.best_score()
    );

    let mut app = PlayApp::new(*fps, seed, high_score);
    Runtime::new()
        .run(&mut app)
        .context("Failed to run the terminal UI")?;

    let high_score = app.into_high_score();
    log::info!("exiting (best score: {})", high_score.best_score());
    Ok(())
}

/// Sends logs to `path`; the terminal itself belongs to the UI.
fn init_logger(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("Failed to initialize logger")?;
    Ok(())
}
