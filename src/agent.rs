//! Playing agents built over the environment adapter contract
//!
//! Every agent answers the same question: given an observation and the
//! legal-column mask, which column do you drop into? `None` means no
//! column was legal; the harness treats that board as drawn.

use anyhow::Result;
use log::debug;
use rand::prelude::*;

use std::time::Duration;

use crate::bitboard::{connects_four, move_order, BitBoard};
use crate::observation::{ActionMask, Observation};
use crate::solver;
use crate::WIDTH;

pub trait Agent {
    fn name(&self) -> &str;

    fn choose_action(
        &mut self,
        observation: &Observation,
        legal_mask: &ActionMask,
    ) -> Result<Option<usize>>;
}

/// The bitboard search engine under a fixed wall-clock budget per move.
pub struct SearchAgent {
    name: String,
    budget: Duration,
}

impl SearchAgent {
    pub fn new<S: Into<String>>(name: S, budget: Duration) -> Self {
        Self {
            name: name.into(),
            budget,
        }
    }
}

impl Agent for SearchAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_action(
        &mut self,
        observation: &Observation,
        legal_mask: &ActionMask,
    ) -> Result<Option<usize>> {
        solver::choose_move(observation, legal_mask, self.budget)
    }
}

/// Counts the columns whose next drop would complete four for the given
/// tiles, after the candidate move is applied. Two or more is a double
/// threat: the opponent can only answer one of them.
fn threat_count(tiles: u64, mask: u64) -> usize {
    let board = BitBoard::from_masks(tiles, mask);
    (0..WIDTH)
        .filter(|&column| match board.drop_bit(column) {
            Some(bit) => connects_four(tiles | bit),
            None => false,
        })
        .count()
}

fn creates_double_threat(board: &BitBoard, column: usize, tiles: u64) -> bool {
    match board.drop_bit(column) {
        Some(bit) => threat_count(tiles | bit, board.mask() | bit) >= 2,
        None => false,
    }
}

/// The rule-based agent: win, block, dodge double threats, create them,
/// prefer the center, otherwise play anything.
///
/// Every rule works on immutable bitboard values derived from the
/// observation; simulated drops are fresh values, not in-place edits.
pub struct HeuristicAgent {
    name: String,
}

impl HeuristicAgent {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }
}

impl Agent for HeuristicAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_action(
        &mut self,
        observation: &Observation,
        legal_mask: &ActionMask,
    ) -> Result<Option<usize>> {
        let board = BitBoard::from_observation(observation);
        let legal: Vec<usize> = (0..WIDTH)
            .filter(|&column| legal_mask.allows(column) && board.playable(column))
            .collect();
        if legal.is_empty() {
            return Ok(None);
        }

        // 1: win on the spot
        for &column in &legal {
            if board.is_winning_drop(column) {
                debug!("{}: winning move -> column {}", self.name, column);
                return Ok(Some(column));
            }
        }

        // 2: block an opponent win
        for &column in &legal {
            if board.is_blocking_drop(column) {
                debug!("{}: blocking opponent -> column {}", self.name, column);
                return Ok(Some(column));
            }
        }

        // 3: avoid handing the opponent a double threat
        let safe: Vec<usize> = legal
            .iter()
            .copied()
            .filter(|&column| !creates_double_threat(&board, column, board.opponent_position()))
            .collect();
        let safe = if safe.is_empty() { legal } else { safe };

        // 4: create a double threat of our own
        for &column in &safe {
            if creates_double_threat(&board, column, board.position()) {
                debug!("{}: double threat -> column {}", self.name, column);
                return Ok(Some(column));
            }
        }

        // 5: center preference
        for column in move_order() {
            if safe.contains(&column) {
                return Ok(Some(column));
            }
        }

        // 6: anything legal
        Ok(safe.choose(&mut rand::rng()).copied())
    }
}

/// Uniform random play over the legal columns.
pub struct RandomAgent {
    name: String,
}

impl RandomAgent {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_action(
        &mut self,
        observation: &Observation,
        legal_mask: &ActionMask,
    ) -> Result<Option<usize>> {
        let board = BitBoard::from_observation(observation);
        let legal: Vec<usize> = (0..WIDTH)
            .filter(|&column| legal_mask.allows(column) && board.playable(column))
            .collect();
        Ok(legal.choose(&mut rand::rng()).copied())
    }
}
