use std::time::Duration;

use crossterm::event::Event as CrosstermEvent;

/// Events processed by TUI applications.
#[derive(Debug, Clone, derive_more::From)]
pub(super) enum TuiEvent {
    /// Frame timing; `delta` is the wall-clock time since the previous tick.
    Tick { delta: Duration },
    /// The screen needs to be redrawn.
    Render,
    /// Terminal events such as key input, focus changes, and resize.
    #[from]
    Crossterm(CrosstermEvent),
}
