use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::{
    piece::{Piece, PieceColor},
    shape::{MAX_SHAPE_CELLS, Shape},
};

/// Number of columns on the board.
pub const BOARD_WIDTH: usize = 10;

/// Number of rows on the board.
pub const BOARD_HEIGHT: usize = 20;

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Locked roll of the given color.
    Filled(PieceColor),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn is_filled(self) -> bool {
        !self.is_empty()
    }

    #[must_use]
    pub fn color(self) -> Option<PieceColor> {
        match self {
            Cell::Empty => None,
            Cell::Filled(color) => Some(color),
        }
    }

    const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Filled(color) => color.as_char(),
        }
    }
}

/// A single board row of exactly [`BOARD_WIDTH`] cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardRow {
    cells: [Cell; BOARD_WIDTH],
}

impl BoardRow {
    pub const EMPTY: Self = Self {
        cells: [Cell::Empty; BOARD_WIDTH],
    };

    #[must_use]
    pub fn cells(&self) -> &[Cell; BOARD_WIDTH] {
        &self.cells
    }

    /// A row is full when every cell is filled.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_filled())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_empty())
    }
}

// Rows serialize as a 10-character string: '.' for empty, 'P'/'B'/'Y' for colors.
impl Serialize for BoardRow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let s: String = self.cells.iter().map(|cell| cell.as_char()).collect();
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for BoardRow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let cells = s
            .chars()
            .map(|c| match c {
                '.' => Ok(Cell::Empty),
                c => PieceColor::from_char(c)
                    .map(Cell::Filled)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid cell: '{c}'"))),
            })
            .collect::<Result<Vec<Cell>, D::Error>>()?;
        let cells = <[Cell; BOARD_WIDTH]>::try_from(cells).map_err(|cells| {
            serde::de::Error::custom(format!(
                "row must have {BOARD_WIDTH} cells, got {}",
                cells.len()
            ))
        })?;
        Ok(Self { cells })
    }
}

/// An absolute board cell written when a piece settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettledCell {
    pub x: usize,
    pub y: usize,
    pub color: PieceColor,
}

/// Cells written by [`Board::settle`].
pub type SettledCells = ArrayVec<SettledCell, MAX_SHAPE_CELLS>;

/// Rows removed by [`Board::clear_full_rows`].
///
/// Indices are pre-removal row numbers, ordered bottom to top.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClearedRows {
    rows: ArrayVec<usize, BOARD_HEIGHT>,
}

impl ClearedRows {
    /// Number of rows cleared.
    #[must_use]
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }
}

/// The fixed 10×20 grid of locked cells.
///
/// Row 0 is the top of the visible area and row 19 the bottom. The board owns
/// collision testing against its contents and bounds, and line clearing.
///
/// # Bounds
///
/// - Columns outside `0..10` and rows at or below 20 are always blocked
/// - Rows above the top (`y < 0`) are never blocked, so freshly spawned or
///   rotated pieces may stick out above the visible area
///
/// # Example
///
/// ```
/// use rollris_engine::{Board, Cell, PieceColor, ShapeKind};
///
/// let mut board = Board::new();
/// for x in 0..10 {
///     board.set_cell(x, 19, Cell::Filled(PieceColor::Pink));
/// }
/// assert!(board.collides(&ShapeKind::O.template(), 4, 18));
///
/// let cleared = board.clear_full_rows();
/// assert_eq!(cleared.count(), 1);
/// assert!(board.rows().all(|row| row.is_empty()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    rows: [BoardRow; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [BoardRow::EMPTY; BOARD_HEIGHT],
    };

    /// Creates an empty board.
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Iterates the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &BoardRow> {
        self.rows.iter()
    }

    /// Returns the cell at (`x`, `y`), or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.rows.get(y)?.cells.get(x).copied()
    }

    /// Overwrites a single cell.
    ///
    /// # Panics
    ///
    /// Panics if (`x`, `y`) is outside the grid.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        self.rows[y].cells[x] = cell;
    }

    /// Returns whether the position (`x`, `y`) blocks a piece cell.
    #[must_use]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        let Some(col) = usize::try_from(x).ok().filter(|col| *col < BOARD_WIDTH) else {
            return true;
        };
        let Ok(row) = usize::try_from(y) else {
            // Above the top
            return false;
        };
        match self.rows.get(row) {
            Some(row) => row.cells[col].is_filled(),
            None => true,
        }
    }

    /// Returns whether `shape` placed with its top-left cell at
    /// (`origin_x`, `origin_y`) overlaps the bounds or the board contents.
    #[must_use]
    pub fn collides(&self, shape: &Shape, origin_x: i32, origin_y: i32) -> bool {
        shape.occupied_cells().any(|(row, col)| {
            let (dx, dy) = (shape_offset(col), shape_offset(row));
            self.is_occupied(origin_x + dx, origin_y + dy)
        })
    }

    #[must_use]
    pub fn collides_piece(&self, piece: &Piece) -> bool {
        let origin = piece.origin();
        self.collides(piece.shape(), origin.x, origin.y)
    }

    /// Writes the piece's color into every occupied cell inside the grid.
    ///
    /// Cells above the top are dropped. Returns the cells written.
    pub fn settle(&mut self, piece: &Piece) -> SettledCells {
        let mut settled = SettledCells::new();
        for (x, y) in piece.occupied_positions() {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            if x >= BOARD_WIDTH || y >= BOARD_HEIGHT {
                continue;
            }
            self.rows[y].cells[x] = Cell::Filled(piece.color());
            settled.push(SettledCell {
                x,
                y,
                color: piece.color(),
            });
        }
        settled
    }

    /// Removes every full row and inserts the same number of empty rows at the top.
    ///
    /// Full rows are detected on the board as it was before any removal, and the
    /// relative order of the remaining rows is preserved.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::default();
        for y in (0..BOARD_HEIGHT).rev() {
            if self.rows[y].is_full() {
                cleared.rows.push(y);
                continue;
            }
            let count = cleared.count();
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..cleared.count()].fill(BoardRow::EMPTY);
        cleared
    }

    /// Empties every cell.
    pub fn reset(&mut self) {
        self.rows.fill(BoardRow::EMPTY);
    }
}

#[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
const fn shape_offset(value: usize) -> i32 {
    value as i32
}
