use std::time::Duration;

use serde::Serialize;

/// Gravity interval at level 1.
pub const INITIAL_DROP_INTERVAL: Duration = Duration::from_millis(1000);

/// Gravity never gets faster than this.
pub const MIN_DROP_INTERVAL: Duration = Duration::from_millis(300);

/// Points awarded for clearing `lines` rows with a single lock.
///
/// One line is worth 10 points; `n > 1` lines are worth `n * n * 5`
/// (20, 45, 80, ...). Zero lines are worth nothing.
///
/// # Example
///
/// ```
/// use rollris_engine::line_clear_points;
///
/// assert_eq!(line_clear_points(0), 0);
/// assert_eq!(line_clear_points(1), 10);
/// assert_eq!(line_clear_points(2), 20);
/// assert_eq!(line_clear_points(4), 80);
/// ```
#[must_use]
pub const fn line_clear_points(lines: usize) -> usize {
    match lines {
        0 => 0,
        1 => 10,
        n => n * n * 5,
    }
}

/// Gravity interval for `level`.
#[must_use]
pub fn drop_interval_for_level(level: usize) -> Duration {
    match level {
        0 | 1 => INITIAL_DROP_INTERVAL,
        2 => Duration::from_millis(800),
        3 => Duration::from_millis(700),
        n => {
            let faster = u64::try_from(n - 3).unwrap_or(u64::MAX).saturating_mul(100);
            Duration::from_millis(700_u64.saturating_sub(faster)).max(MIN_DROP_INTERVAL)
        }
    }
}

/// Lines needed to leave `level` once it has been reached.
const fn lines_for_level(level: usize) -> isize {
    if level <= 3 { 2 } else { 4 }
}

/// Result of recording a line clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineClearReward {
    pub points: usize,
    /// The new level, if this clear advanced it.
    pub level_up: Option<usize>,
}

/// Score, level and gravity speed of a running game.
///
/// Progression only changes when rows are cleared:
///
/// - **Score** grows by [`line_clear_points`] for every clear.
/// - **Level** goes up by one whenever the remaining line quota reaches zero.
///   A large clear never skips a level; leftover lines are dropped and the
///   quota is refilled for the new level (2 lines while reaching levels 2
///   and 3, 4 afterwards).
/// - **Drop interval** follows [`drop_interval_for_level`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use rollris_engine::Progression;
///
/// let mut progression = Progression::new();
/// let reward = progression.record_line_clear(1);
///
/// assert_eq!(reward.points, 10);
/// assert_eq!(reward.level_up, Some(2));
/// assert_eq!(progression.level(), 2);
/// assert_eq!(progression.drop_interval(), Duration::from_millis(800));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progression {
    score: usize,
    level: usize,
    lines_to_next_level: isize,
    total_lines_cleared: usize,
    drop_interval: Duration,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    /// Level 1 with no score and a one-line quota.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            lines_to_next_level: 1,
            total_lines_cleared: 0,
            drop_interval: INITIAL_DROP_INTERVAL,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Remaining lines before the next level-up.
    #[must_use]
    pub const fn lines_to_next_level(&self) -> isize {
        self.lines_to_next_level
    }

    #[must_use]
    pub const fn total_lines_cleared(&self) -> usize {
        self.total_lines_cleared
    }

    #[must_use]
    pub const fn drop_interval(&self) -> Duration {
        self.drop_interval
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Applies a clear of `lines` rows from one lock.
    ///
    /// `lines == 0` leaves the progression untouched.
    pub fn record_line_clear(&mut self, lines: usize) -> LineClearReward {
        if lines == 0 {
            return LineClearReward {
                points: 0,
                level_up: None,
            };
        }

        let points = line_clear_points(lines);
        self.score += points;
        self.total_lines_cleared += lines;
        self.lines_to_next_level -= isize::try_from(lines).unwrap_or(isize::MAX);

        let level_up = (self.lines_to_next_level <= 0).then(|| {
            self.level += 1;
            self.lines_to_next_level = lines_for_level(self.level);
            self.drop_interval = drop_interval_for_level(self.level);
            self.level
        });

        LineClearReward { points, level_up }
    }
}
