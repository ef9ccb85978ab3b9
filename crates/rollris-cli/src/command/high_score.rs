use std::path::PathBuf;

use crate::{
    command::play::DEFAULT_HIGH_SCORE_FILE, high_score::HighScoreStore, theme,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct HighScoreArg {
    /// Forget the stored best score
    #[clap(long)]
    pub(super) reset: bool,
    /// File that stores your best score
    #[clap(long, default_value = DEFAULT_HIGH_SCORE_FILE)]
    high_score_file: PathBuf,
}

pub(crate) fn run(arg: &HighScoreArg) -> anyhow::Result<()> {
    let HighScoreArg {
        reset,
        high_score_file,
    } = arg;

    let mut store = HighScoreStore::load(high_score_file)?;
    if *reset {
        store.reset();
        store.save()?;
        println!("Best score reset ({})", store.path().display());
        return Ok(());
    }

    match store.best() {
        Some(best) => println!(
            "Your best: {} rolls ({}), achieved at {}",
            best.score,
            theme::supply_text(best.score),
            best.achieved_at.to_rfc3339()
        ),
        None => println!("No games played yet"),
    }
    println!("Record: {}", theme::RECORD_TEXT);
    Ok(())
}
