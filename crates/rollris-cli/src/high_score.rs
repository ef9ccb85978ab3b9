use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The best score reached on this machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub score: usize,
    pub achieved_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighScoreFile {
    your_highest_score: Option<HighScore>,
}

/// The best score, backed by a JSON file.
///
/// The file looks like:
///
/// ```json
/// {
///   "your_highest_score": {
///     "score": 120,
///     "achieved_at": "2026-03-14T09:26:53Z"
///   }
/// }
/// ```
#[derive(Debug)]
pub struct HighScoreStore {
    path: PathBuf,
    best: Option<HighScore>,
}

impl HighScoreStore {
    /// Reads the store at `path`. A missing file means no score yet.
    pub fn load<P>(path: P) -> anyhow::Result<Self>
    where
        P: Into<PathBuf>,
    {
        let path = path.into();
        let best = match File::open(&path) {
            Ok(file) => {
                let data: HighScoreFile = serde_json::from_reader(BufReader::new(file))
                    .with_context(|| {
                        format!("Failed to parse high score file: {}", path.display())
                    })?;
                data.your_highest_score
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to open high score file: {}", path.display())
                });
            }
        };
        Ok(Self { path, best })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn best(&self) -> Option<HighScore> {
        self.best
    }

    pub fn best_score(&self) -> usize {
        self.best.map_or(0, |best| best.score)
    }

    /// Keeps `score` if it beats the current best. Returns whether it did.
    ///
    /// Only updates memory; call [`Self::save`] to persist.
    pub fn offer(&mut self, score: usize, now: DateTime<Utc>) -> bool {
        if score <= self.best_score() {
            return false;
        }
        self.best = Some(HighScore {
            score,
            achieved_at: now,
        });
        true
    }

    pub fn reset(&mut self) {
        self.best = None;
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }

        let data = HighScoreFile {
            your_highest_score: self.best,
        };
        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create file: {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &data)
            .with_context(|| format!("Failed to write JSON to {}", self.path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush output to {}", self.path.display()))?;

        log::debug!("saved high score {} to {}", self.best_score(), self.path.display());
        Ok(())
    }
}
