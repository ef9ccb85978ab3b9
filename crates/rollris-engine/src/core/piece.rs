use std::{fmt, ops::RangeInclusive, str::FromStr};

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use crate::PieceCollisionError;

use super::{
    board::{BOARD_HEIGHT, BOARD_WIDTH, Board},
    shape::{MAX_SHAPE_SIZE, Shape, ShapeKind},
};

// Origins outside these ranges place every cell off the board.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const ORIGIN_X_RANGE: RangeInclusive<i32> = -(MAX_SHAPE_SIZE as i32)..=BOARD_WIDTH as i32;
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const ORIGIN_Y_RANGE: RangeInclusive<i32> = -(MAX_SHAPE_SIZE as i32)..=BOARD_HEIGHT as i32;

/// Color tag of a piece; one of the three roll colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceColor {
    Pink = 0,
    Blue = 1,
    Yellow = 2,
}

impl Distribution<PieceColor> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceColor {
        PieceColor::ALL[rng.random_range(0..PieceColor::LEN)]
    }
}

impl PieceColor {
    /// Number of color tags (3).
    pub const LEN: usize = 3;

    pub const ALL: [Self; Self::LEN] = [PieceColor::Pink, PieceColor::Blue, PieceColor::Yellow];

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceColor::Pink => 'P',
            PieceColor::Blue => 'B',
            PieceColor::Yellow => 'Y',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'P' => Some(PieceColor::Pink),
            'B' => Some(PieceColor::Blue),
            'Y' => Some(PieceColor::Yellow),
            _ => None,
        }
    }
}

/// Board-relative position of a shape's top-left cell.
///
/// - X increases rightward (columns), Y increases downward (rows)
/// - (0, 0) is the top-left cell of the board
/// - Negative rows are above the visible area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// The falling piece: a shape in its current orientation, a color and an origin.
///
/// Pieces are plain values. Movement and rotation return new pieces; the
/// `*_on` variants additionally check the result against a [`Board`].
///
/// # Example
///
/// ```
/// use rollris_engine::{Board, Piece, PieceColor, Position, ShapeKind};
///
/// let board = Board::new();
/// let piece = Piece::spawn(ShapeKind::T, PieceColor::Pink);
/// assert_eq!(piece.origin(), Position::new(4, 0));
///
/// let moved = piece.shifted_on(&board, 1, 0).unwrap();
/// assert_eq!(moved.origin(), Position::new(5, 0));
///
/// // Off the left wall
/// assert!(piece.shifted_on(&board, -5, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: ShapeKind,
    shape: Shape,
    rotation: u8,
    color: PieceColor,
    origin: Position,
}

impl fmt::Display for Piece {
    // Format: "kind:color#rotation@x,y" (e.g., "T:P#1@4,-1")
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}#{}@{},{}",
            self.kind.as_char(),
            self.color.as_char(),
            self.rotation,
            self.origin.x,
            self.origin.y
        )
    }
}

impl FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind_color, rest) = s.split_once('#').ok_or(ParsePieceError::Format)?;
        let (kind, color) = kind_color.split_once(':').ok_or(ParsePieceError::Format)?;
        let (rotation, position) = rest.split_once('@').ok_or(ParsePieceError::Format)?;
        let (x, y) = position.split_once(',').ok_or(ParsePieceError::Format)?;

        let kind = single_char(kind)
            .and_then(ShapeKind::from_char)
            .ok_or(ParsePieceError::Kind)?;
        let color = single_char(color)
            .and_then(PieceColor::from_char)
            .ok_or(ParsePieceError::Color)?;
        let rotation = rotation
            .parse::<u8>()
            .ok()
            .filter(|r| *r < 4)
            .ok_or(ParsePieceError::Rotation)?;
        let x = parse_coordinate(x, &ORIGIN_X_RANGE)?;
        let y = parse_coordinate(y, &ORIGIN_Y_RANGE)?;

        let mut piece = Piece::new(kind, color, Position::new(x, y));
        for _ in 0..rotation {
            piece = piece.rotated();
        }
        Ok(piece)
    }
}

fn parse_coordinate(s: &str, range: &RangeInclusive<i32>) -> Result<i32, ParsePieceError> {
    s.parse::<i32>()
        .ok()
        .filter(|v| range.contains(v))
        .ok_or(ParsePieceError::Coordinate)
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

/// Error returned when parsing a [`Piece`] from its string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParsePieceError {
    #[display("expected format 'kind:color#rotation@x,y'")]
    Format,
    #[display("invalid piece kind")]
    Kind,
    #[display("invalid piece color")]
    Color,
    #[display("rotation must be 0-3")]
    Rotation,
    #[display("coordinate is not a number or lies far outside the board")]
    Coordinate,
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|e| serde::de::Error::custom(format!("invalid piece '{s}': {e}")))
    }
}

impl Piece {
    /// Creates a piece in spawn orientation at the spawn origin.
    ///
    /// The spawn origin is `x = ⌊W/2⌋ − ⌊cols/2⌋`, `y = 0`.
    #[must_use]
    pub fn spawn(kind: ShapeKind, color: PieceColor) -> Self {
        Self::new(kind, color, spawn_origin(kind))
    }

    /// Creates a piece in spawn orientation at an arbitrary origin.
    #[must_use]
    pub fn new(kind: ShapeKind, color: PieceColor, origin: Position) -> Self {
        Self {
            kind,
            shape: kind.template(),
            rotation: 0,
            color,
            origin,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Number of clockwise quarter turns applied since spawn (0..=3).
    #[must_use]
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    #[must_use]
    pub fn color(&self) -> PieceColor {
        self.color
    }

    #[must_use]
    pub fn origin(&self) -> Position {
        self.origin
    }

    /// Absolute board coordinates `(x, y)` of every occupied cell.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied_cells()
            .map(move |(row, col)| (self.origin.x + offset(col), self.origin.y + offset(row)))
    }

    #[must_use]
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            origin: self.origin.offset(dx, dy),
            ..*self
        }
    }

    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated(),
            rotation: (self.rotation + 1) % 4,
            ..*self
        }
    }

    /// Moves the piece by (`dx`, `dy`) if the destination is free.
    pub fn shifted_on(&self, board: &Board, dx: i32, dy: i32) -> Result<Self, PieceCollisionError> {
        let piece = self.shifted(dx, dy);
        if board.collides_piece(&piece) {
            return Err(PieceCollisionError);
        }
        Ok(piece)
    }

    /// Rotates the piece clockwise in place, rejecting the rotation on collision.
    ///
    /// There is no wall kick: the rotated shape keeps the same origin.
    pub fn rotated_on(&self, board: &Board) -> Result<Self, PieceCollisionError> {
        let piece = self.rotated();
        if board.collides_piece(&piece) {
            return Err(PieceCollisionError);
        }
        Ok(piece)
    }

    /// Returns the lowest free position straight below this piece.
    #[must_use]
    pub fn dropped_on(&self, board: &Board) -> Self {
        let mut dropped = *self;
        while let Ok(piece) = dropped.shifted_on(board, 0, 1) {
            dropped = piece;
        }
        dropped
    }
}

#[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
const fn offset(value: usize) -> i32 {
    // Shape offsets are below `MAX_SHAPE_SIZE`.
    value as i32
}

fn spawn_origin(kind: ShapeKind) -> Position {
    let cols = kind.template().cols();
    Position::new(offset(BOARD_WIDTH / 2) - offset(cols / 2), 0)
}
