//! Boundary types for the environment adapter contract
//!
//! The environment reports the board as a 6x7 grid of two-channel
//! occupancy (channel 0 marks the side to move, channel 1 the opponent)
//! with the FIRST row at the TOP of the board, plus a 7-entry indicator
//! vector of droppable columns. Both are validated here before any
//! bitboard is built from them.

use anyhow::{anyhow, Result};

use crate::{HEIGHT, WIDTH};

/// Occupancy of a single cell, relative to the side to move.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Mark {
    Empty,
    Own,
    Opponent,
}

/// A validated board observation.
///
/// Row 0 is the TOP row, matching the environment's convention. The
/// bitboard codec is responsible for inverting this to its own
/// row-0-is-bottom layout.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Observation {
    cells: [[Mark; WIDTH]; HEIGHT],
}

impl Observation {
    pub fn empty() -> Self {
        Self {
            cells: [[Mark::Empty; WIDTH]; HEIGHT],
        }
    }

    /// Builds an observation from the environment's raw two-channel grids.
    ///
    /// A cell marked on both channels has no physical meaning and is
    /// rejected rather than silently corrupting every later win check.
    pub fn from_channels(
        own: &[[u8; WIDTH]; HEIGHT],
        opponent: &[[u8; WIDTH]; HEIGHT],
    ) -> Result<Self> {
        let mut cells = [[Mark::Empty; WIDTH]; HEIGHT];
        for row in 0..HEIGHT {
            for column in 0..WIDTH {
                cells[row][column] = match (own[row][column], opponent[row][column]) {
                    (0, 0) => Mark::Empty,
                    (_, 0) => Mark::Own,
                    (0, _) => Mark::Opponent,
                    _ => {
                        return Err(anyhow!(
                            "malformed observation: cell ({}, {}) marked on both channels",
                            row,
                            column
                        ))
                    }
                };
            }
        }
        Ok(Self { cells })
    }

    pub fn get(&self, row: usize, column: usize) -> Mark {
        self.cells[row][column]
    }

    pub fn set(&mut self, row: usize, column: usize, mark: Mark) {
        self.cells[row][column] = mark;
    }
}

/// The environment's legal-column indicator vector: one entry per
/// column, true = droppable.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ActionMask {
    allowed: [bool; WIDTH],
}

impl ActionMask {
    /// A mask allowing every column.
    pub fn all() -> Self {
        Self {
            allowed: [true; WIDTH],
        }
    }

    pub fn from_indicator(indicator: &[u8; WIDTH]) -> Self {
        let mut allowed = [false; WIDTH];
        for (entry, &value) in allowed.iter_mut().zip(indicator.iter()) {
            *entry = value != 0;
        }
        Self { allowed }
    }

    pub fn from_columns(columns: &[usize]) -> Self {
        let mut allowed = [false; WIDTH];
        for &column in columns {
            allowed[column] = true;
        }
        Self { allowed }
    }

    pub fn allows(&self, column: usize) -> bool {
        self.allowed[column]
    }

    /// The first allowed column, scanning left to right. Used as the
    /// recovery move when the engine's view disagrees with the mask.
    pub fn first_allowed(&self) -> Option<usize> {
        (0..WIDTH).find(|&column| self.allowed[column])
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.iter().all(|&allowed| !allowed)
    }
}
