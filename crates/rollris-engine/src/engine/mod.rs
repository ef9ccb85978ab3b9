//! Game session logic on top of the core data structures.
//!
//! - [`GameSession`] - State machine for one game: gravity, locking, spawning
//! - [`Progression`] - Score, level and drop interval
//! - [`PieceGenerator`] / [`PieceQueue`] - Seeded piece draws with one-piece lookahead
//! - [`SessionEvent`] - Notifications for sound, effects and persistence
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] and call [`GameSession::start`]
//! 2. Call [`GameSession::tick`] every frame with the elapsed time
//! 3. Forward player input with [`GameSession::apply`]
//! 4. Drain events and render [`GameSession::snapshot`]
//! 5. Repeat until [`SessionState::GameOver`], then [`GameSession::restart`]
//!
//! # Example
//!
//! ```
//! use rollris_engine::{GameSession, Intent, PieceSeed};
//!
//! let seed: PieceSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
//! let mut session = GameSession::with_seed(seed);
//! session.apply(Intent::Start);
//!
//! while !session.state().is_game_over() {
//!     session.apply(Intent::HardDrop);
//! }
//!
//! let snapshot = session.snapshot();
//! assert!(snapshot.active_piece.is_none());
//! ```

pub use self::{event::*, piece_generator::*, progression::*, session::*};

mod event;
mod piece_generator;
mod progression;
mod session;
