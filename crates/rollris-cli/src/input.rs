use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rollris_engine::{Intent, SessionState};

use crate::ui::widgets::KeyBinding;

/// What a key press asks the application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::From)]
pub enum Command {
    #[from]
    Game(Intent),
    Quit,
}

pub const PLAYING_BINDINGS: &[KeyBinding] = &[
    (&["←", "A"], "Left"),
    (&["→", "D"], "Right"),
    (&["↓", "S"], "Soft Drop"),
    (&["↑", "W"], "Rotate"),
    (&["Enter"], "Hard Drop"),
    (&["Space"], "Pause"),
    (&["R"], "Restart"),
    (&["Q"], "Quit"),
];

pub const PAUSED_BINDINGS: &[KeyBinding] = &[
    (&["Space"], "Resume"),
    (&["R"], "Restart"),
    (&["Q"], "Quit"),
];

pub const STOPPED_BINDINGS: &[KeyBinding] = &[(&["Space"], "Start"), (&["Q"], "Quit")];

/// Key hints shown for `state`.
pub fn bindings_for(state: SessionState) -> &'static [KeyBinding<'static>] {
    match state {
        SessionState::Running => PLAYING_BINDINGS,
        SessionState::Paused => PAUSED_BINDINGS,
        SessionState::Idle | SessionState::GameOver => STOPPED_BINDINGS,
    }
}

/// Maps a key press to a command.
///
/// Space starts a stopped game and toggles pause on a live one. Held keys
/// repeat only for sideways moves and soft drop; key releases are ignored.
pub fn command_for_key(key: KeyEvent, state: SessionState) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        let quit = key.kind == KeyEventKind::Press && matches!(key.code, KeyCode::Char('c'));
        return quit.then_some(Command::Quit);
    }
    if let Some(intent) = repeatable_intent(key.code) {
        return Some(intent.into());
    }
    if key.kind == KeyEventKind::Repeat {
        return None;
    }

    let intent = match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W') => Intent::Rotate,
        KeyCode::Enter => Intent::HardDrop,
        KeyCode::Char(' ') => match state {
            SessionState::Idle | SessionState::GameOver => Intent::Start,
            SessionState::Running | SessionState::Paused => Intent::TogglePause,
        },
        KeyCode::Char('r' | 'R') => Intent::Restart,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => return Some(Command::Quit),
        _ => return None,
    };
    Some(intent.into())
}

fn repeatable_intent(code: KeyCode) -> Option<Intent> {
    match code {
        KeyCode::Left | KeyCode::Char('a' | 'A') => Some(Intent::MoveLeft),
        KeyCode::Right | KeyCode::Char('d' | 'D') => Some(Intent::MoveRight),
        KeyCode::Down | KeyCode::Char('s' | 'S') => Some(Intent::SoftDrop),
        _ => None,
    }
}
