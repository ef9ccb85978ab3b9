use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Paragraph, Widget, Wrap},
};
use rollris_engine::{Piece, SessionSnapshot, SessionState};

use crate::{
    effects::Effects,
    theme,
    ui::widgets::{BoardDisplay, PieceDisplay, SessionStatsDisplay, color, style},
};

/// The whole play screen: stats, board, next piece and popups.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    snapshot: SessionSnapshot<'a>,
    ghost: Option<Piece>,
    effects: &'a Effects,
    best_score: usize,
    pause_message: &'a str,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(snapshot: SessionSnapshot<'a>, effects: &'a Effects) -> Self {
        Self {
            snapshot,
            ghost: None,
            effects,
            best_score: 0,
            pause_message: "",
        }
    }

    pub fn ghost(self, ghost: Option<Piece>) -> Self {
        Self { ghost, ..self }
    }

    pub fn best_score(self, best_score: usize) -> Self {
        Self { best_score, ..self }
    }

    pub fn pause_message(self, pause_message: &'a str) -> Self {
        Self {
            pause_message,
            ..self
        }
    }

    fn popup(&self) -> Option<(String, String, Style)> {
        let snapshot = &self.snapshot;
        match snapshot.state {
            SessionState::Idle => Some((
                theme::TITLE.to_owned(),
                "Stack the rolls before the shelves run dry. Press Space to start.".to_owned(),
                style::IDLE_POPUP,
            )),
            SessionState::Paused => Some((
                "PAUSED".to_owned(),
                format!(
                    "{}\n\nCurrent score: {}",
                    self.pause_message, snapshot.score
                ),
                style::PAUSED_POPUP,
            )),
            SessionState::GameOver => Some((
                "GAME OVER!!".to_owned(),
                format!(
                    "{}\n\nPress Space to play again.",
                    theme::game_over_message(snapshot.score)
                ),
                style::GAME_OVER_POPUP,
            )),
            SessionState::Running => self.effects.level_up().map(|level| {
                (
                    "LEVEL UP!".to_owned(),
                    format!("Level {level}"),
                    style::LEVEL_UP_POPUP,
                )
            }),
        }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let snapshot = self.snapshot;
        let block_padding = Padding::horizontal(1);
        let flash = self.effects.line_clear();
        let border_style = match snapshot.state {
            SessionState::Running if flash.is_some() => color::GLOW,
            SessionState::Running | SessionState::Idle => color::PINK,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        };

        let board_title = match flash {
            Some(flash) => Line::from(format!(
                "+{} rolls! ({} lines)",
                flash.points, flash.count
            )),
            None => Line::from(theme::TITLE),
        };
        let game_board = BoardDisplay::new(snapshot.board)
            .active_piece(snapshot.active_piece.copied())
            .ghost(self.ghost)
            .effects(self.effects)
            .block(
                Block::bordered()
                    .title(board_title.centered())
                    .border_style(border_style)
                    .style(style::DEFAULT),
            );
        let next_panel = PieceDisplay::new(snapshot.next_piece.copied()).block(
            Block::bordered()
                .title(Line::from("NEXT").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT),
        );
        let session_stats = SessionStatsDisplay::new(snapshot, self.best_score).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT),
        );

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(session_stats.width()),
            Constraint::Length(game_board.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(session_stats.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        let game_board_width = game_board.width();
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);

        if let Some((title, message, style)) = self.popup() {
            let block = Block::bordered()
                .title(Line::from(title).centered())
                .padding(Padding::horizontal(1))
                .style(style);
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(14));
            Clear.render(area, buf);
            Paragraph::new(Text::from(message))
                .wrap(Wrap { trim: true })
                .centered()
                .block(block)
                .render(area, buf);
        }
    }
}
