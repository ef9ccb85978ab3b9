use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};
use rollris_engine::{Cell, PieceColor};

use crate::ui::widgets::style;

/// One board cell drawn as a two-column roll.
#[derive(Debug)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    pub fn empty(show_dots: bool) -> Self {
        if show_dots {
            Self::new(style::EMPTY_DOT, ".")
        } else {
            Self::new(style::EMPTY, "")
        }
    }

    pub fn roll(color: PieceColor) -> Self {
        let style = match color {
            PieceColor::Pink => style::PINK_ROLL,
            PieceColor::Blue => style::BLUE_ROLL,
            PieceColor::Yellow => style::YELLOW_ROLL,
        };
        Self::new(style, "()")
    }

    pub fn glowing_roll() -> Self {
        Self::new(style::GLOWING_ROLL, "()")
    }

    pub fn ghost() -> Self {
        Self::new(style::GHOST, "[]")
    }

    pub fn from_cell(cell: Cell, show_dots: bool) -> Self {
        match cell {
            Cell::Empty => Self::empty(show_dots),
            Cell::Filled(color) => Self::roll(color),
        }
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Use a Paragraph to fill the whole area, not just the cells with the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
