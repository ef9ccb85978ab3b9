use std::time::Duration;

use serde::Serialize;

use crate::{ClearedRows, SettledCells};

/// Why a session is paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::IsVariant)]
pub enum PauseReason {
    /// The player asked for a pause.
    Manual,
    /// The window or terminal lost input focus.
    FocusLost,
}

/// Notifications emitted by [`GameSession`](crate::GameSession).
///
/// Events are queued in emission order and handed to the driver through
/// [`GameSession::drain_events`](crate::GameSession::drain_events). They carry
/// everything a presentation layer needs for sound, visual effects and
/// persistence, so no collaborator has to diff snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum SessionEvent {
    Started,
    /// The active piece locked; `cells` are the board cells it filled.
    PieceLocked { cells: SettledCells },
    LinesCleared {
        rows: ClearedRows,
        count: usize,
        points: usize,
        /// Score after the clear.
        score: usize,
    },
    LevelUp { level: usize, drop_interval: Duration },
    Paused { reason: PauseReason },
    Resumed,
    GameOver { score: usize, level: usize },
}

/// Discrete player commands a driver can forward to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::IsVariant)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    Rotate,
    Start,
    TogglePause,
    Resume,
    Restart,
}

/// What happened to the active piece after a movement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum MoveOutcome {
    /// The piece moved or rotated.
    Moved,
    /// The piece could not descend and was locked into the board.
    Locked,
    /// The move collided and was rejected; nothing changed.
    Blocked,
    /// The session is not running or has no active piece.
    Ignored,
}
