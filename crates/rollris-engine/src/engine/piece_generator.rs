use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Piece, PieceColor, ShapeKind};

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the generator's PCG stream. The same seed always yields
/// the same sequence of shapes and colors. Seeds are written as 32 hex digits
/// both in their `Display` form and when serialized.
///
/// # Example
///
/// ```
/// use rollris_engine::{PieceGenerator, PieceSeed};
///
/// let seed: PieceSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
/// let mut a = PieceGenerator::with_seed(seed);
/// let mut b = PieceGenerator::with_seed(seed);
/// assert_eq!(a.next_piece(), b.next_piece());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

/// Error returned when parsing a [`PieceSeed`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParsePieceSeedError {
    #[display("invalid hex: expected 32 characters, got {_0}")]
    Length(#[error(not(source))] usize),
    #[display("invalid hex: {_0}")]
    Digit(std::num::ParseIntError),
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParsePieceSeedError::Length(s.len()));
        }
        let num = u128::from_str_radix(s, 16).map_err(ParsePieceSeedError::Digit)?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random seeds with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Draws pieces uniformly at random.
///
/// Every draw picks one of the 7 shapes and one of the 3 colors independently
/// and uniformly, and places the piece at its spawn origin. There is no bag
/// or history: droughts and repeats are possible.
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    seed: PieceSeed,
    rng: Pcg32,
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceGenerator {
    /// Creates a generator with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            seed,
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// The seed this generator was created with.
    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    /// Draws a fresh piece at its spawn origin.
    pub fn next_piece(&mut self) -> Piece {
        let kind: ShapeKind = self.rng.random();
        let color: PieceColor = self.rng.random();
        Piece::spawn(kind, color)
    }
}

/// One-piece lookahead over a [`PieceGenerator`].
///
/// The "next" slot is filled as soon as the queue is created, so a running
/// game always has both a current and a next piece.
#[derive(Debug, Clone)]
pub struct PieceQueue {
    generator: PieceGenerator,
    next: Piece,
}

impl PieceQueue {
    #[must_use]
    pub fn new(mut generator: PieceGenerator) -> Self {
        let next = generator.next_piece();
        Self { generator, next }
    }

    /// The piece that [`Self::advance`] will return.
    #[must_use]
    pub fn peek_next(&self) -> &Piece {
        &self.next
    }

    /// Returns the buffered next piece and refills the slot with a fresh draw.
    pub fn advance(&mut self) -> Piece {
        let fresh = self.generator.next_piece();
        std::mem::replace(&mut self.next, fresh)
    }

    /// Discards the buffered piece and draws a new one.
    pub fn refill(&mut self) {
        self.next = self.generator.next_piece();
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.generator.seed()
    }
}
