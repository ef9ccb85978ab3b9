use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};
use rollris_engine::{BOARD_HEIGHT, BOARD_WIDTH, Board, Piece};

use crate::{effects::Effects, ui::widgets::CellDisplay};

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    ghost: Option<Piece>,
    active_piece: Option<Piece>,
    effects: Option<&'a Effects>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            ghost: None,
            active_piece: None,
            effects: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: Option<Piece>) -> Self {
        Self {
            ghost: piece,
            ..self
        }
    }

    pub fn active_piece(self, piece: Option<Piece>) -> Self {
        Self {
            active_piece: piece,
            ..self
        }
    }

    pub fn effects(self, effects: &'a Effects) -> Self {
        Self {
            effects: Some(effects),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        BOARD_WIDTH as u16 * CellDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        BOARD_HEIGHT as u16 * CellDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }

    fn cell_display(&self, x: usize, y: usize) -> CellDisplay {
        if let Some(piece) = self.active_piece
            && covers(&piece, x, y)
        {
            return CellDisplay::roll(piece.color());
        }
        let cell = self.board.cell(x, y).unwrap_or_default();
        if cell.is_filled() && self.effects.is_some_and(|e| e.is_landing_cell(x, y)) {
            return CellDisplay::glowing_roll();
        }
        if cell.is_empty()
            && let Some(ghost) = self.ghost
            && covers(&ghost, x, y)
        {
            return CellDisplay::ghost();
        }
        CellDisplay::from_cell(cell, true)
    }
}

fn covers(piece: &Piece, x: usize, y: usize) -> bool {
    piece.occupied_positions().any(|(px, py)| {
        usize::try_from(px).is_ok_and(|px| px == x) && usize::try_from(py).is_ok_and(|py| py == y)
    })
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints = (0..BOARD_WIDTH).map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints = (0..BOARD_HEIGHT).map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<BOARD_HEIGHT>(&vertical)
            .into_iter()
            .map(|row| row.layout::<BOARD_WIDTH>(&horizontal));

        for (y, grid_row) in iter::zip(0.., grid_cells) {
            for (x, grid_cell) in iter::zip(0.., grid_row) {
                self.cell_display(x, y).render(grid_cell, buf);
            }
        }
    }
}
