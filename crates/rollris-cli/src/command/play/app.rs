use std::time::Duration;

use chrono::Utc;
use crossterm::event::Event;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};
use rollris_engine::{GameSession, PauseReason, PieceSeed, SessionEvent};

use crate::{
    effects::Effects,
    high_score::HighScoreStore,
    input::{self, Command},
    theme,
    tui::{App, Runtime},
    ui::widgets::{KeyBindingDisplay, SessionDisplay},
};

#[derive(Debug)]
pub struct PlayApp {
    fps: u32,
    session: GameSession,
    effects: Effects,
    high_score: HighScoreStore,
    pause_message: &'static str,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(fps: u32, seed: PieceSeed, high_score: HighScoreStore) -> Self {
        Self {
            fps,
            session: GameSession::with_seed(seed),
            effects: Effects::new(),
            high_score,
            pause_message: "",
            is_exiting: false,
        }
    }

    pub fn into_high_score(self) -> HighScoreStore {
        self.high_score
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Game(intent) => _ = self.session.apply(intent),
            Command::Quit => self.is_exiting = true,
        }
    }

    /// Feeds queued session events to the effects and the high score store.
    fn process_events(&mut self) {
        for event in self.session.drain_events() {
            self.effects.handle(&event);
            match event {
                SessionEvent::Paused { reason } => {
                    self.pause_message = theme::pause_message(reason);
                }
                SessionEvent::GameOver { score, level } => {
                    log::info!("{}", theme::game_over_message(score));
                    log::debug!("final level: {level}");
                }
                _ => {}
            }
        }

        let score = self.session.progression().score();
        if self.high_score.offer(score, Utc::now())
            && let Err(e) = self.high_score.save()
        {
            log::warn!("failed to save high score: {e:#}");
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(f64::from(self.fps));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        match event {
            Event::Key(key) => {
                if let Some(command) = input::command_for_key(key, self.session.state()) {
                    self.apply(command);
                }
            }
            Event::FocusLost => self.session.pause(PauseReason::FocusLost),
            _ => {}
        }
        self.process_events();
    }

    fn draw(&self, frame: &mut Frame) {
        let session_display = SessionDisplay::new(self.session.snapshot(), &self.effects)
            .ghost(self.session.drop_preview())
            .best_score(self.high_score.best_score())
            .pause_message(self.pause_message);
        let help = KeyBindingDisplay::new(input::bindings_for(self.session.state()));

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(22), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help, help_area);
    }

    fn update(&mut self, _runtime: &mut Runtime, delta: Duration) {
        if self.session.state().is_running() {
            self.effects.update(delta);
        }
        self.session.tick(delta);
        self.process_events();
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use rollris_engine::SessionState;

    use super::*;

    fn app(name: &str) -> PlayApp {
        let path = std::env::temp_dir()
            .join(format!("rollris-app-test-{}", std::process::id()))
            .join(name);
        let store = HighScoreStore::load(path).unwrap();
        PlayApp::new(60, PieceSeed::from_bytes([9; 16]), store)
    }

    fn key(app: &mut PlayApp, code: KeyCode) {
        let event = Event::Key(KeyEvent::new(code, KeyModifiers::NONE));
        app.handle_event(&mut Runtime::new(), event);
    }

    #[test]
    fn test_space_starts_and_pauses() {
        let mut app = app("space.json");
        key(&mut app, KeyCode::Char(' '));
        assert_eq!(app.session.state(), SessionState::Running);

        key(&mut app, KeyCode::Char(' '));
        assert_eq!(app.session.state(), SessionState::Paused);
        assert!(theme::FUN_FACTS.contains(&app.pause_message));

        key(&mut app, KeyCode::Char(' '));
        assert_eq!(app.session.state(), SessionState::Running);
    }

    #[test]
    fn test_focus_loss_pauses_without_resuming() {
        let mut app = app("focus.json");
        key(&mut app, KeyCode::Char(' '));

        app.handle_event(&mut Runtime::new(), Event::FocusLost);
        assert_eq!(app.session.pause_reason(), Some(PauseReason::FocusLost));
        assert_eq!(app.pause_message, theme::FOCUS_LOST_TEXT);

        app.handle_event(&mut Runtime::new(), Event::FocusGained);
        assert_eq!(app.session.state(), SessionState::Paused);
    }

    #[test]
    fn test_paused_updates_do_not_move_piece() {
        let mut app = app("paused.json");
        key(&mut app, KeyCode::Char(' '));
        let origin = app.session.active_piece().unwrap().origin();

        key(&mut app, KeyCode::Char(' '));
        app.update(&mut Runtime::new(), Duration::from_secs(5));
        key(&mut app, KeyCode::Char(' '));
        assert_eq!(app.session.active_piece().unwrap().origin(), origin);

        app.update(&mut Runtime::new(), Duration::from_secs(1));
        assert_eq!(app.session.active_piece().unwrap().origin().y, origin.y + 1);
    }

    #[test]
    fn test_quit() {
        let mut app = app("quit.json");
        assert!(!app.should_exit());
        key(&mut app, KeyCode::Char('q'));
        assert!(app.should_exit());
    }

    #[test]
    fn test_game_runs_to_game_over() {
        let mut app = app("game_over.json");
        key(&mut app, KeyCode::Char(' '));
        while app.session.state().is_running() {
            key(&mut app, KeyCode::Enter);
        }
        assert_eq!(app.session.state(), SessionState::GameOver);
        assert!(app.effects.landing_cells().is_empty());
    }
}
