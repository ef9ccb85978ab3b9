use std::{collections::VecDeque, time::Duration};

use serde::Serialize;

use crate::{Board, Piece};

use super::{
    event::{Intent, MoveOutcome, PauseReason, SessionEvent},
    piece_generator::{PieceGenerator, PieceQueue, PieceSeed},
    progression::Progression,
};

/// Lifecycle of a [`GameSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::IsVariant)]
pub enum SessionState {
    /// Created but not started yet.
    Idle,
    Running,
    Paused,
    /// A new piece could not spawn. Only [`GameSession::restart`] leaves this state.
    GameOver,
}

/// One game from start to game over.
///
/// The session owns the board, the active and next pieces, the progression
/// and a queue of [`SessionEvent`]s. It never reads a clock: the driver feeds
/// elapsed time through [`Self::tick`] and player commands through the
/// movement methods or [`Self::apply`].
///
/// # State machine
///
/// ```text
/// Idle --start--> Running <--pause/resume--> Paused
///                    |
///                    +--spawn collision--> GameOver
///
/// any state --restart--> Running
/// ```
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use rollris_engine::{GameSession, MoveOutcome, SessionEvent};
///
/// let mut session = GameSession::new();
/// session.start();
/// assert!(session.state().is_running());
///
/// // One second of gravity at level 1 moves the piece down one row
/// let before = session.active_piece().unwrap().origin();
/// session.tick(Duration::from_secs(1));
/// assert_eq!(session.active_piece().unwrap().origin().y, before.y + 1);
///
/// assert_eq!(session.hard_drop(), MoveOutcome::Locked);
/// let events: Vec<_> = session.drain_events().collect();
/// assert!(events[0].is_started());
/// assert!(events[1].is_piece_locked());
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    progression: Progression,
    queue: PieceQueue,
    active: Option<Piece>,
    state: SessionState,
    pause_reason: Option<PauseReason>,
    drop_timer: Duration,
    events: VecDeque<SessionEvent>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Creates an idle session with a random piece sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::with_generator(PieceGenerator::new())
    }

    /// Creates an idle session with a reproducible piece sequence.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_generator(PieceGenerator::with_seed(seed))
    }

    fn with_generator(generator: PieceGenerator) -> Self {
        Self {
            board: Board::new(),
            progression: Progression::new(),
            queue: PieceQueue::new(generator),
            active: None,
            state: SessionState::Idle,
            pause_reason: None,
            drop_timer: Duration::ZERO,
            events: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.queue.seed()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Why the session is paused, if it is.
    #[must_use]
    pub fn pause_reason(&self) -> Option<PauseReason> {
        self.pause_reason
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    /// The piece that spawns after the active one locks.
    ///
    /// `None` until the first start.
    #[must_use]
    pub fn next_piece(&self) -> Option<&Piece> {
        (!self.state.is_idle()).then(|| self.queue.peek_next())
    }

    /// Where the active piece would land on a hard drop.
    #[must_use]
    pub fn drop_preview(&self) -> Option<Piece> {
        self.active.map(|piece| piece.dropped_on(&self.board))
    }

    /// Read-only view of everything a renderer needs.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            state: self.state,
            pause_reason: self.pause_reason,
            board: &self.board,
            active_piece: self.active.as_ref(),
            next_piece: self.next_piece(),
            score: self.progression.score(),
            level: self.progression.level(),
            lines_to_next_level: self.progression.lines_to_next_level(),
            total_lines_cleared: self.progression.total_lines_cleared(),
            drop_interval: self.progression.drop_interval(),
        }
    }

    /// Takes the queued events in emission order.
    pub fn drain_events(&mut self) -> impl Iterator<Item = SessionEvent> + '_ {
        self.events.drain(..)
    }

    /// Starts a fresh game. Only valid while idle; see [`Self::restart`].
    pub fn start(&mut self) {
        if !self.state.is_idle() {
            return;
        }
        self.board.reset();
        self.progression.reset();
        self.drop_timer = Duration::ZERO;
        self.pause_reason = None;
        self.queue.refill();
        self.state = SessionState::Running;
        log::debug!("session started (seed: {})", self.queue.seed());
        self.events.push_back(SessionEvent::Started);
        // Cannot collide on an empty board
        self.spawn_next();
    }

    pub fn pause(&mut self, reason: PauseReason) {
        if !self.state.is_running() {
            return;
        }
        self.state = SessionState::Paused;
        self.pause_reason = Some(reason);
        log::debug!("session paused ({reason:?})");
        self.events.push_back(SessionEvent::Paused { reason });
    }

    pub fn resume(&mut self) {
        if !self.state.is_paused() {
            return;
        }
        self.state = SessionState::Running;
        self.pause_reason = None;
        log::debug!("session resumed");
        self.events.push_back(SessionEvent::Resumed);
    }

    pub fn toggle_pause(&mut self, reason: PauseReason) {
        match self.state {
            SessionState::Running => self.pause(reason),
            SessionState::Paused => self.resume(),
            SessionState::Idle | SessionState::GameOver => {}
        }
    }

    /// Abandons the current game, whatever its state, and starts a new one.
    pub fn restart(&mut self) {
        log::debug!("session restarted from {:?}", self.state);
        self.events.clear();
        self.active = None;
        self.state = SessionState::Idle;
        self.start();
    }

    /// Advances gravity by `delta`.
    ///
    /// Time only accumulates while running. Once the accumulated time reaches
    /// the drop interval, the active piece moves down one row and the timer
    /// restarts from zero.
    pub fn tick(&mut self, delta: Duration) {
        if !self.state.is_running() {
            return;
        }
        self.drop_timer += delta;
        if self.drop_timer >= self.progression.drop_interval() {
            self.drop_timer = Duration::ZERO;
            self.move_active(0, 1);
        }
    }

    /// Moves the active piece by (`dx`, `dy`).
    ///
    /// A blocked downward move locks the piece instead.
    pub fn move_active(&mut self, dx: i32, dy: i32) -> MoveOutcome {
        let Some(piece) = self.playable_piece() else {
            return MoveOutcome::Ignored;
        };
        match piece.shifted_on(&self.board, dx, dy) {
            Ok(moved) => {
                self.active = Some(moved);
                MoveOutcome::Moved
            }
            Err(_) if dy > 0 => {
                self.lock_active();
                MoveOutcome::Locked
            }
            Err(_) => MoveOutcome::Blocked,
        }
    }

    /// Rotates the active piece clockwise if the rotated shape fits in place.
    pub fn rotate_active(&mut self) -> MoveOutcome {
        let Some(piece) = self.playable_piece() else {
            return MoveOutcome::Ignored;
        };
        match piece.rotated_on(&self.board) {
            Ok(rotated) => {
                self.active = Some(rotated);
                MoveOutcome::Moved
            }
            Err(_) => MoveOutcome::Blocked,
        }
    }

    /// Drops the active piece as far as it goes and locks it.
    pub fn hard_drop(&mut self) -> MoveOutcome {
        let Some(piece) = self.playable_piece() else {
            return MoveOutcome::Ignored;
        };
        self.active = Some(piece.dropped_on(&self.board));
        self.lock_active();
        MoveOutcome::Locked
    }

    /// Dispatches a player command.
    ///
    /// [`Intent::Start`] starts an idle session and restarts a finished one.
    pub fn apply(&mut self, intent: Intent) -> MoveOutcome {
        match intent {
            Intent::MoveLeft => self.move_active(-1, 0),
            Intent::MoveRight => self.move_active(1, 0),
            Intent::SoftDrop => self.move_active(0, 1),
            Intent::HardDrop => self.hard_drop(),
            Intent::Rotate => self.rotate_active(),
            Intent::Start => {
                match self.state {
                    SessionState::Idle => self.start(),
                    SessionState::GameOver => self.restart(),
                    SessionState::Running | SessionState::Paused => {}
                }
                MoveOutcome::Ignored
            }
            Intent::TogglePause => {
                self.toggle_pause(PauseReason::Manual);
                MoveOutcome::Ignored
            }
            Intent::Resume => {
                self.resume();
                MoveOutcome::Ignored
            }
            Intent::Restart => {
                self.restart();
                MoveOutcome::Ignored
            }
        }
    }

    fn playable_piece(&self) -> Option<Piece> {
        self.active.filter(|_| self.state.is_running())
    }

    fn lock_active(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };

        let cells = self.board.settle(&piece);
        self.events.push_back(SessionEvent::PieceLocked { cells });

        let rows = self.board.clear_full_rows();
        if !rows.is_empty() {
            let count = rows.count();
            let reward = self.progression.record_line_clear(count);
            log::debug!("cleared {count} lines for {} points", reward.points);
            self.events.push_back(SessionEvent::LinesCleared {
                rows,
                count,
                points: reward.points,
                score: self.progression.score(),
            });
            if let Some(level) = reward.level_up {
                let drop_interval = self.progression.drop_interval();
                log::info!("level up: {level} (drop interval {drop_interval:?})");
                self.events
                    .push_back(SessionEvent::LevelUp { level, drop_interval });
            }
        }

        self.spawn_next();
    }

    fn spawn_next(&mut self) {
        let piece = self.queue.advance();
        if self.board.collides_piece(&piece) {
            let score = self.progression.score();
            let level = self.progression.level();
            log::info!("game over: score {score}, level {level}");
            self.active = None;
            self.state = SessionState::GameOver;
            self.events.push_back(SessionEvent::GameOver { score, level });
            return;
        }
        self.active = Some(piece);
    }
}

/// Borrowed view of a [`GameSession`] for rendering and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot<'a> {
    pub state: SessionState,
    pub pause_reason: Option<PauseReason>,
    pub board: &'a Board,
    pub active_piece: Option<&'a Piece>,
    pub next_piece: Option<&'a Piece>,
    pub score: usize,
    pub level: usize,
    pub lines_to_next_level: isize,
    pub total_lines_cleared: usize,
    pub drop_interval: Duration,
}

#[cfg(test)]
mod tests {
    use crate::{Cell, PieceColor, Position, ShapeKind};

    use super::*;

    const SEED: PieceSeed = PieceSeed::from_bytes([7; 16]);

    fn running_session() -> GameSession {
        let mut session = GameSession::with_seed(SEED);
        session.start();
        session.drain_events().for_each(drop);
        session
    }

    fn fill_row_except(board: &mut Board, y: usize, gaps: &[usize]) {
        for x in 0..Board::WIDTH {
            if !gaps.contains(&x) {
                board.set_cell(x, y, Cell::Filled(PieceColor::Blue));
            }
        }
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = GameSession::with_seed(SEED);
        assert!(session.state().is_idle());
        assert!(session.active_piece().is_none());
        assert!(session.next_piece().is_none());
        assert_eq!(session.seed(), SEED);
    }

    #[test]
    fn test_start_spawns_pieces() {
        let mut session = GameSession::with_seed(SEED);
        session.start();

        assert!(session.state().is_running());
        let active = session.active_piece().unwrap();
        assert_eq!(active.origin().y, 0);
        assert!(session.next_piece().is_some());

        let snapshot = session.snapshot();
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.level, 1);
        assert_eq!(snapshot.lines_to_next_level, 1);
        assert_eq!(snapshot.drop_interval, Duration::from_millis(1000));

        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(events, [SessionEvent::Started]);
    }

    #[test]
    fn test_start_is_ignored_unless_idle() {
        let mut session = running_session();
        let active = *session.active_piece().unwrap();
        session.start();
        assert_eq!(*session.active_piece().unwrap(), active);
        assert_eq!(session.drain_events().count(), 0);
    }

    #[test]
    fn test_intents_ignored_while_idle() {
        let mut session = GameSession::with_seed(SEED);
        assert_eq!(session.move_active(1, 0), MoveOutcome::Ignored);
        assert_eq!(session.rotate_active(), MoveOutcome::Ignored);
        assert_eq!(session.hard_drop(), MoveOutcome::Ignored);
        session.tick(Duration::from_secs(10));
        session.pause(PauseReason::Manual);
        assert!(session.state().is_idle());
    }

    #[test]
    fn test_o_piece_soft_drops_to_floor() {
        let mut session = running_session();
        session.active = Some(Piece::spawn(ShapeKind::O, PieceColor::Pink));

        let mut moves = 0;
        while session.move_active(0, 1).is_moved() {
            moves += 1;
        }
        assert_eq!(moves, 18);

        let board = session.board();
        for (x, y) in [(4, 18), (5, 18), (4, 19), (5, 19)] {
            assert_eq!(board.cell(x, y), Some(Cell::Filled(PieceColor::Pink)));
        }
        let filled = board
            .rows()
            .flat_map(|row| row.cells())
            .filter(|cell| cell.is_filled())
            .count();
        assert_eq!(filled, 4);
        assert_eq!(session.progression().score(), 0);

        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_piece_locked());
    }

    #[test]
    fn test_hard_drop_completes_row_with_vertical_i() {
        let mut session = running_session();
        fill_row_except(&mut session.board, 19, &[9]);
        let vertical = Piece::spawn(ShapeKind::I, PieceColor::Yellow)
            .rotated()
            .shifted(9 - 3, 0);
        assert_eq!(vertical.origin(), Position::new(9, 0));
        session.active = Some(vertical);

        assert_eq!(session.hard_drop(), MoveOutcome::Locked);

        let progression = session.progression();
        assert_eq!(progression.score(), 10);
        assert_eq!(progression.total_lines_cleared(), 1);
        // The three upper cells of the I shift down by one row
        let board = session.board();
        for y in 17..20 {
            assert_eq!(board.cell(9, y), Some(Cell::Filled(PieceColor::Yellow)));
        }
        assert!(board.cell(9, 16).unwrap().is_empty());
        assert!(board.cell(0, 19).unwrap().is_empty());

        let events: Vec<_> = session.drain_events().collect();
        assert!(events[0].is_piece_locked());
        assert_eq!(
            events[1],
            SessionEvent::LinesCleared {
                rows: {
                    let mut board = Board::new();
                    fill_row_except(&mut board, 19, &[]);
                    board.clear_full_rows()
                },
                count: 1,
                points: 10,
                score: 10,
            }
        );
        assert_eq!(
            events[2],
            SessionEvent::LevelUp {
                level: 2,
                drop_interval: Duration::from_millis(800)
            }
        );
    }

    #[test]
    fn test_hard_drop_horizontal_i_clears_one_row() {
        let mut session = running_session();
        fill_row_except(&mut session.board, 19, &[3, 4, 5, 6]);
        session.active = Some(Piece::spawn(ShapeKind::I, PieceColor::Pink));

        assert_eq!(session.hard_drop(), MoveOutcome::Locked);
        assert_eq!(session.progression().score(), 10);
        assert_eq!(session.progression().total_lines_cleared(), 1);
        assert!(session.board().rows().all(|row| row.is_empty()));
    }

    #[test]
    fn test_rotation_blocked_at_wall() {
        let mut session = running_session();
        // Vertical I against the right wall cannot turn horizontal
        let vertical = Piece::new(ShapeKind::I, PieceColor::Blue, Position::new(9, 5)).rotated();
        session.active = Some(vertical);
        assert_eq!(session.rotate_active(), MoveOutcome::Blocked);
        assert_eq!(*session.active_piece().unwrap(), vertical);

        session.active = Some(Piece::spawn(ShapeKind::T, PieceColor::Blue));
        assert_eq!(session.rotate_active(), MoveOutcome::Moved);
        assert_eq!(session.active_piece().unwrap().rotation(), 1);
    }

    #[test]
    fn test_horizontal_move_blocked_by_wall() {
        let mut session = running_session();
        session.active = Some(Piece::new(
            ShapeKind::O,
            PieceColor::Pink,
            Position::new(0, 3),
        ));
        assert_eq!(session.move_active(-1, 0), MoveOutcome::Blocked);
        assert_eq!(session.move_active(1, 0), MoveOutcome::Moved);
        assert_eq!(session.active_piece().unwrap().origin(), Position::new(1, 3));
    }

    #[test]
    fn test_tick_applies_gravity_at_interval() {
        let mut session = running_session();
        let y = session.active_piece().unwrap().origin().y;

        session.tick(Duration::from_millis(600));
        assert_eq!(session.active_piece().unwrap().origin().y, y);
        session.tick(Duration::from_millis(600));
        assert_eq!(session.active_piece().unwrap().origin().y, y + 1);

        // Overflow beyond the interval is discarded
        session.tick(Duration::from_millis(999));
        assert_eq!(session.active_piece().unwrap().origin().y, y + 1);
        session.tick(Duration::from_millis(1));
        assert_eq!(session.active_piece().unwrap().origin().y, y + 2);
    }

    #[test]
    fn test_tick_uses_faster_interval_after_level_up() {
        let mut session = running_session();
        fill_row_except(&mut session.board, 19, &[3, 4, 5, 6]);
        session.active = Some(Piece::spawn(ShapeKind::I, PieceColor::Pink));
        assert_eq!(session.hard_drop(), MoveOutcome::Locked);
        assert_eq!(session.progression().level(), 2);
        assert_eq!(
            session.progression().drop_interval(),
            Duration::from_millis(800)
        );

        let y = session.active_piece().unwrap().origin().y;
        session.tick(Duration::from_millis(799));
        assert_eq!(session.active_piece().unwrap().origin().y, y);
        session.tick(Duration::from_millis(1));
        assert_eq!(session.active_piece().unwrap().origin().y, y + 1);
    }

    #[test]
    fn test_pause_discards_elapsed_time() {
        let mut session = running_session();
        let origin = session.active_piece().unwrap().origin();

        session.pause(PauseReason::Manual);
        assert!(session.state().is_paused());
        assert_eq!(session.pause_reason(), Some(PauseReason::Manual));
        session.tick(Duration::from_secs(30));
        assert_eq!(session.move_active(1, 0), MoveOutcome::Ignored);
        assert_eq!(session.active_piece().unwrap().origin(), origin);

        session.resume();
        assert!(session.state().is_running());
        assert_eq!(session.pause_reason(), None);
        session.tick(Duration::from_millis(999));
        assert_eq!(session.active_piece().unwrap().origin(), origin);

        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(
            events,
            [
                SessionEvent::Paused {
                    reason: PauseReason::Manual
                },
                SessionEvent::Resumed,
            ]
        );
    }

    #[test]
    fn test_toggle_pause() {
        let mut session = running_session();
        session.toggle_pause(PauseReason::FocusLost);
        assert_eq!(session.pause_reason(), Some(PauseReason::FocusLost));
        session.toggle_pause(PauseReason::Manual);
        assert!(session.state().is_running());

        let mut idle = GameSession::with_seed(SEED);
        idle.toggle_pause(PauseReason::Manual);
        assert!(idle.state().is_idle());
    }

    #[test]
    fn test_game_over_when_spawn_collides() {
        let mut session = running_session();
        for y in 0..2 {
            for x in 3..7 {
                session.board.set_cell(x, y, Cell::Filled(PieceColor::Pink));
            }
        }
        session.active = Some(Piece::new(
            ShapeKind::O,
            PieceColor::Blue,
            Position::new(0, 10),
        ));

        assert_eq!(session.hard_drop(), MoveOutcome::Locked);
        assert!(session.state().is_game_over());
        assert!(session.active_piece().is_none());

        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(
            events.last(),
            Some(&SessionEvent::GameOver { score: 0, level: 1 })
        );

        assert_eq!(session.move_active(1, 0), MoveOutcome::Ignored);
        assert_eq!(session.hard_drop(), MoveOutcome::Ignored);
        session.toggle_pause(PauseReason::Manual);
        assert!(session.state().is_game_over());
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut session = running_session();
        for lines in [4, 4, 4, 1] {
            session.progression.record_line_clear(lines);
        }
        session.pause(PauseReason::Manual);
        fill_row_except(&mut session.board, 19, &[0]);
        assert_eq!(session.progression().score(), 250);
        assert_eq!(session.progression().level(), 4);

        session.restart();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.state, SessionState::Running);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.level, 1);
        assert_eq!(snapshot.total_lines_cleared, 0);
        assert_eq!(snapshot.lines_to_next_level, 1);
        assert_eq!(snapshot.drop_interval, Duration::from_millis(1000));
        assert_eq!(snapshot.pause_reason, None);
        assert!(snapshot.board.rows().all(|row| row.is_empty()));
        assert!(snapshot.active_piece.is_some());

        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(events, [SessionEvent::Started]);
    }

    #[test]
    fn test_apply_dispatches_intents() {
        let mut session = GameSession::with_seed(SEED);
        session.apply(Intent::Start);
        assert!(session.state().is_running());

        session.active = Some(Piece::spawn(ShapeKind::T, PieceColor::Pink));
        assert_eq!(session.apply(Intent::MoveLeft), MoveOutcome::Moved);
        assert_eq!(session.apply(Intent::MoveRight), MoveOutcome::Moved);
        assert_eq!(session.apply(Intent::SoftDrop), MoveOutcome::Moved);
        assert_eq!(session.apply(Intent::Rotate), MoveOutcome::Moved);
        assert_eq!(session.active_piece().unwrap().origin(), Position::new(4, 1));

        session.apply(Intent::TogglePause);
        assert!(session.state().is_paused());
        session.apply(Intent::Resume);
        assert!(session.state().is_running());

        assert_eq!(session.apply(Intent::HardDrop), MoveOutcome::Locked);
        session.apply(Intent::Restart);
        assert!(session.board().rows().all(|row| row.is_empty()));
    }

    #[test]
    fn test_start_intent_restarts_after_game_over() {
        let mut session = running_session();
        session.state = SessionState::GameOver;
        session.active = None;
        session.apply(Intent::Start);
        assert!(session.state().is_running());
        assert!(session.active_piece().is_some());
    }

    #[test]
    fn test_drop_preview() {
        let mut session = running_session();
        session.active = Some(Piece::spawn(ShapeKind::O, PieceColor::Pink));
        let preview = session.drop_preview().unwrap();
        assert_eq!(preview.origin(), Position::new(4, 18));
    }

    #[test]
    fn test_snapshot_serialization() {
        let mut session = running_session();
        session.active = Some(Piece::spawn(ShapeKind::S, PieceColor::Yellow));
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["state"], "Running");
        assert_eq!(json["score"], 0);
        assert_eq!(json["active_piece"], "S:Y#0@4,0");
        assert_eq!(json["board"].as_array().unwrap().len(), 20);
    }
}
