//! A time-bounded game tree search agent for the board game 'Connect 4'
//!
//! The engine encodes a two-channel board observation into a pair of
//! bitboards, short-circuits one-ply tactics (immediate wins and forced
//! blocks), and otherwise runs a negamax search with alpha-beta pruning
//! under iterative deepening until a wall-clock budget expires.
//!
//! # Basic Usage
//!
//! ```
//! use std::time::Duration;
//! use connect4_engine::observation::{ActionMask, Observation};
//! use connect4_engine::solver::choose_move;
//!
//! # fn main() -> anyhow::Result<()> {
//! let observation = Observation::empty();
//! let mask = ActionMask::all();
//! let column = choose_move(&observation, &mask, Duration::from_millis(100))?;
//!
//! assert_eq!(column, Some(3));
//! # Ok(())
//! # }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod observation;

pub mod bitboard;

pub mod evaluator;

pub mod transposition_table;

pub mod solver;

pub mod agent;

pub mod arrayboard;

pub mod tournament;

mod test;

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

// ensure that the given dimensions fit in a u64 for the bitboard representation
const_assert!(WIDTH * (HEIGHT + 1) < 64);
