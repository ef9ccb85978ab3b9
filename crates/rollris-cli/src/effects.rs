use std::time::Duration;

use rollris_engine::{SessionEvent, SettledCell, SettledCells};

pub const LANDING_GLOW_DURATION: Duration = Duration::from_millis(200);
pub const LINE_CLEAR_FLASH_DURATION: Duration = Duration::from_millis(400);
pub const LEVEL_UP_POPUP_DURATION: Duration = Duration::from_millis(600);

#[derive(Debug, Clone)]
struct Timed<T> {
    value: T,
    remaining: Duration,
}

impl<T> Timed<T> {
    fn new(value: T, duration: Duration) -> Self {
        Self {
            value,
            remaining: duration,
        }
    }

    /// Counts down and reports whether the effect is still alive.
    fn advance(&mut self, delta: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(delta);
        !self.remaining.is_zero()
    }
}

/// Rows cleared by one lock, for the score flash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineClearFlash {
    pub count: usize,
    pub points: usize,
}

/// Short-lived visual effects driven by session events.
///
/// Effects only age through [`Effects::update`], so a paused game freezes
/// them along with gravity.
#[derive(Debug, Clone, Default)]
pub struct Effects {
    landing: Option<Timed<SettledCells>>,
    line_clear: Option<Timed<LineClearFlash>>,
    level_up: Option<Timed<usize>>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::Started => *self = Self::new(),
            SessionEvent::PieceLocked { cells } => {
                self.landing = Some(Timed::new(cells.clone(), LANDING_GLOW_DURATION));
            }
            SessionEvent::LinesCleared { count, points, .. } => {
                // The landed cells moved with the removed rows
                self.landing = None;
                let flash = LineClearFlash {
                    count: *count,
                    points: *points,
                };
                self.line_clear = Some(Timed::new(flash, LINE_CLEAR_FLASH_DURATION));
            }
            SessionEvent::LevelUp { level, .. } => {
                self.level_up = Some(Timed::new(*level, LEVEL_UP_POPUP_DURATION));
            }
            SessionEvent::GameOver { .. } => self.landing = None,
            SessionEvent::Paused { .. } | SessionEvent::Resumed => {}
        }
    }

    pub fn update(&mut self, delta: Duration) {
        if let Some(effect) = &mut self.landing
            && !effect.advance(delta)
        {
            self.landing = None;
        }
        if let Some(effect) = &mut self.line_clear
            && !effect.advance(delta)
        {
            self.line_clear = None;
        }
        if let Some(effect) = &mut self.level_up
            && !effect.advance(delta)
        {
            self.level_up = None;
        }
    }

    /// Cells of the piece that just landed.
    pub fn landing_cells(&self) -> &[SettledCell] {
        self.landing
            .as_ref()
            .map_or(&[][..], |effect| effect.value.as_slice())
    }

    pub fn is_landing_cell(&self, x: usize, y: usize) -> bool {
        self.landing_cells()
            .iter()
            .any(|cell| cell.x == x && cell.y == y)
    }

    pub fn line_clear(&self) -> Option<LineClearFlash> {
        self.line_clear.as_ref().map(|effect| effect.value)
    }

    /// The level just reached, while its popup is visible.
    pub fn level_up(&self) -> Option<usize> {
        self.level_up.as_ref().map(|effect| effect.value)
    }
}

#[cfg(test)]
mod tests {
    use rollris_engine::{Board, Cell, GameSession, MoveOutcome, PieceColor, PieceSeed};

    use super::*;

    fn locked_cells() -> SettledCells {
        let mut session = GameSession::with_seed(PieceSeed::from_bytes([3; 16]));
        session.start();
        assert_eq!(session.hard_drop(), MoveOutcome::Locked);
        session
            .drain_events()
            .find_map(|event| match event {
                SessionEvent::PieceLocked { cells } => Some(cells),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_landing_glow_expires() {
        let cells = locked_cells();
        let (x, y) = (cells[0].x, cells[0].y);

        let mut effects = Effects::new();
        effects.handle(&SessionEvent::PieceLocked { cells });
        assert_eq!(effects.landing_cells().len(), 4);
        assert!(effects.is_landing_cell(x, y));

        effects.update(Duration::from_millis(150));
        assert!(effects.is_landing_cell(x, y));
        effects.update(Duration::from_millis(50));
        assert!(effects.landing_cells().is_empty());
    }

    #[test]
    fn test_line_clear_flash_replaces_landing_glow() {
        let mut board = Board::new();
        for x in 0..Board::WIDTH {
            board.set_cell(x, 19, Cell::Filled(PieceColor::Blue));
        }
        let rows = board.clear_full_rows();

        let mut effects = Effects::new();
        effects.handle(&SessionEvent::PieceLocked {
            cells: locked_cells(),
        });
        effects.handle(&SessionEvent::LinesCleared {
            rows,
            count: 1,
            points: 10,
            score: 10,
        });
        assert!(effects.landing_cells().is_empty());
        assert_eq!(
            effects.line_clear(),
            Some(LineClearFlash {
                count: 1,
                points: 10
            })
        );
        effects.update(LINE_CLEAR_FLASH_DURATION);
        assert_eq!(effects.line_clear(), None);
    }

    #[test]
    fn test_level_up_popup() {
        let mut effects = Effects::new();
        effects.handle(&SessionEvent::LevelUp {
            level: 3,
            drop_interval: Duration::from_millis(700),
        });
        assert_eq!(effects.level_up(), Some(3));
        effects.update(Duration::from_millis(599));
        assert_eq!(effects.level_up(), Some(3));
        effects.update(Duration::from_millis(1));
        assert_eq!(effects.level_up(), None);
    }

    #[test]
    fn test_game_over_and_start_clear_effects() {
        let mut effects = Effects::new();
        effects.handle(&SessionEvent::PieceLocked {
            cells: locked_cells(),
        });
        effects.handle(&SessionEvent::GameOver { score: 0, level: 1 });
        assert!(effects.landing_cells().is_empty());

        effects.handle(&SessionEvent::LevelUp {
            level: 2,
            drop_interval: Duration::from_millis(800),
        });
        effects.handle(&SessionEvent::Started);
        assert_eq!(effects.level_up(), None);
        assert_eq!(effects.line_clear(), None);
    }

    #[test]
    fn test_pause_does_not_touch_effects() {
        let mut effects = Effects::new();
        effects.handle(&SessionEvent::LevelUp {
            level: 2,
            drop_interval: Duration::from_millis(800),
        });
        effects.handle(&SessionEvent::Paused {
            reason: rollris_engine::PauseReason::Manual,
        });
        effects.handle(&SessionEvent::Resumed);
        assert_eq!(effects.level_up(), Some(2));
    }
}
