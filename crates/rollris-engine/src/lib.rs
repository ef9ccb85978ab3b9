//! Core rules of rollris, a falling-block puzzle where the blocks are
//! stacks of toilet-paper rolls.
//!
//! The crate has no I/O and no clock. A driver owns a [`GameSession`], feeds
//! it elapsed time and player [`Intent`]s, renders its [`SessionSnapshot`] and
//! reacts to the [`SessionEvent`]s it queues.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece collides with the board or its bounds")]
pub struct PieceCollisionError;
