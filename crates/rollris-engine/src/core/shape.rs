use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Largest extent of a shape along either axis.
pub const MAX_SHAPE_SIZE: usize = 4;

/// Upper bound on the number of occupied cells in a shape.
pub const MAX_SHAPE_CELLS: usize = MAX_SHAPE_SIZE * MAX_SHAPE_SIZE;

/// A rotatable boolean cell matrix.
///
/// A shape has `rows × cols` meaningful cells (both in `1..=4`). Cells outside
/// that extent are always empty, so two shapes compare equal exactly when they
/// have the same dimensions and the same occupied cells.
///
/// Shapes are values: rotating returns a new shape and the templates returned
/// by [`ShapeKind::template`] never change.
///
/// # Example
///
/// ```
/// use rollris_engine::ShapeKind;
///
/// let t = ShapeKind::T.template();
/// assert_eq!((t.rows(), t.cols()), (2, 3));
///
/// let rotated = t.rotated();
/// assert_eq!((rotated.rows(), rotated.cols()), (3, 2));
/// assert_eq!(rotated.rotated().rotated().rotated(), t);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: usize,
    cols: usize,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Builds a shape from a `R × C` matrix of `0`/`1` values.
    ///
    /// Evaluated at compile time for the built-in templates.
    #[must_use]
    pub const fn from_bits<const R: usize, const C: usize>(bits: [[u8; C]; R]) -> Self {
        assert!(R >= 1 && R <= MAX_SHAPE_SIZE);
        assert!(C >= 1 && C <= MAX_SHAPE_SIZE);
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut r = 0;
        while r < R {
            let mut c = 0;
            while c < C {
                cells[r][c] = bits[r][c] != 0;
                c += 1;
            }
            r += 1;
        }
        Self {
            rows: R,
            cols: C,
            cells,
        }
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Returns whether the cell at (`row`, `col`) is occupied.
    ///
    /// Cells outside the shape's extent are reported as empty.
    #[must_use]
    pub const fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row][col]
    }

    /// Iterates the occupied cells as `(row, col)` pairs in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.cols).filter_map(move |col| self.cells[row][col].then_some((row, col)))
        })
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.occupied_cells().count()
    }

    /// Returns this shape rotated 90° clockwise.
    ///
    /// The result has `cols × rows` cells and
    /// `rotated[c][rows - 1 - r] == self[r][c]`.
    #[must_use]
    pub const fn rotated(&self) -> Self {
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut r = 0;
        while r < self.rows {
            let mut c = 0;
            while c < self.cols {
                cells[c][self.rows - 1 - r] = self.cells[r][c];
                c += 1;
            }
            r += 1;
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            if row > 0 {
                writeln!(f)?;
            }
            for col in 0..self.cols {
                let ch = if self.cells[row][col] { '#' } else { '.' };
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

/// The seven piece templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum ShapeKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

const TEMPLATES: [Shape; ShapeKind::LEN] = [
    Shape::from_bits([[1, 1, 1, 1]]),
    Shape::from_bits([[1, 1], [1, 1]]),
    Shape::from_bits([[0, 1, 0], [1, 1, 1]]),
    Shape::from_bits([[0, 1, 1], [1, 1, 0]]),
    Shape::from_bits([[1, 1, 0], [0, 1, 1]]),
    Shape::from_bits([[1, 0, 0], [1, 1, 1]]),
    Shape::from_bits([[0, 0, 1], [1, 1, 1]]),
];

impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        ShapeKind::ALL[rng.random_range(0..ShapeKind::LEN)]
    }
}

impl ShapeKind {
    /// Number of piece templates (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
    ];

    /// Returns the spawn orientation of this piece.
    #[must_use]
    pub const fn template(self) -> Shape {
        TEMPLATES[self as usize]
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            ShapeKind::I => 'I',
            ShapeKind::O => 'O',
            ShapeKind::T => 'T',
            ShapeKind::S => 'S',
            ShapeKind::Z => 'Z',
            ShapeKind::J => 'J',
            ShapeKind::L => 'L',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(ShapeKind::I),
            'O' => Some(ShapeKind::O),
            'T' => Some(ShapeKind::T),
            'S' => Some(ShapeKind::S),
            'Z' => Some(ShapeKind::Z),
            'J' => Some(ShapeKind::J),
            'L' => Some(ShapeKind::L),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_templates_have_four_cells() {
        for kind in ShapeKind::ALL {
            assert_eq!(kind.template().cell_count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn test_template_layouts() {
        assert_eq!(ShapeKind::I.template().to_string(), "####");
        assert_eq!(ShapeKind::O.template().to_string(), "##\n##");
        assert_eq!(ShapeKind::T.template().to_string(), ".#.\n###");
        assert_eq!(ShapeKind::S.template().to_string(), ".##\n##.");
        assert_eq!(ShapeKind::Z.template().to_string(), "##.\n.##");
        assert_eq!(ShapeKind::J.template().to_string(), "#..\n###");
        assert_eq!(ShapeKind::L.template().to_string(), "..#\n###");
    }

    #[test]
    fn test_rotate_clockwise() {
        // .#.      #.
        // ###  ->  ##
        //          #.
        let rotated = ShapeKind::T.template().rotated();
        assert_eq!(rotated.to_string(), "#.\n##\n#.");

        let rotated = ShapeKind::I.template().rotated();
        assert_eq!((rotated.rows(), rotated.cols()), (4, 1));
        assert_eq!(rotated.to_string(), "#\n#\n#\n#");

        // #..      ##
        // ###  ->  #.
        //          #.
        let rotated = ShapeKind::J.template().rotated();
        assert_eq!(rotated.to_string(), "##\n#.\n#.");
    }

    #[test]
    fn test_rotate_four_times_is_identity() {
        for kind in ShapeKind::ALL {
            let shape = kind.template();
            let mut rotated = shape;
            for _ in 0..4 {
                rotated = rotated.rotated();
            }
            assert_eq!(rotated, shape, "{kind:?}");
        }
    }

    #[test]
    fn test_rotate_does_not_touch_template() {
        let before = ShapeKind::S.template();
        let _ = before.rotated();
        assert_eq!(ShapeKind::S.template(), before);
    }

    #[test]
    fn test_rotation_formula_holds_for_every_cell() {
        for kind in ShapeKind::ALL {
            let shape = kind.template();
            let rotated = shape.rotated();
            for r in 0..shape.rows() {
                for c in 0..shape.cols() {
                    assert_eq!(
                        rotated.is_occupied(c, shape.rows() - 1 - r),
                        shape.is_occupied(r, c),
                        "{kind:?} at ({r}, {c})"
                    );
                }
            }
        }
    }

    #[test]
    fn test_out_of_extent_cells_are_empty() {
        let shape = ShapeKind::O.template();
        assert!(!shape.is_occupied(2, 0));
        assert!(!shape.is_occupied(0, 2));
        assert!(!shape.is_occupied(3, 3));
    }

    #[test]
    fn test_shape_kind_char_conversion() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(ShapeKind::from_char('X'), None);
        assert_eq!(ShapeKind::from_char('i'), None);
    }

    #[test]
    fn test_random_kinds_cover_all_templates() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [false; ShapeKind::LEN];
        for _ in 0..500 {
            let kind: ShapeKind = rng.random();
            seen[kind as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
