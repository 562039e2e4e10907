//! Move selection: tactical pre-check, negamax search and the
//! iterative-deepening driver
//!
//! A decision is one synchronous, single-threaded computation. All
//! per-decision state (transposition table, deadline, node counter)
//! lives in a [`Solver`] built fresh for the call and dropped at its
//! end, so consecutive decisions cannot contaminate each other.

use anyhow::Result;
use log::{debug, trace, warn};

use std::time::{Duration, Instant};

use crate::bitboard::{connects_four, move_order, BitBoard};
use crate::evaluator::evaluate;
use crate::observation::{ActionMask, Observation};
use crate::transposition_table::TranspositionTable;
use crate::{HEIGHT, WIDTH};

/// Base score of a proven win. Must dominate every heuristic score the
/// evaluator can produce, so a forced win always outranks a merely good
/// position. The remaining depth is added on top: faster wins score
/// higher, which makes the search prefer the quickest forced win.
pub const WIN_SCORE: i32 = 1_000_000;

/// The longest possible game: one ply per cell.
pub const MAX_DEPTH: usize = WIDTH * HEIGHT;

const INFINITY: i32 = i32::MAX;

/// The outcome of one decision, with search diagnostics.
#[derive(Copy, Clone, Debug)]
pub struct Decision {
    /// The chosen column, or `None` when the board has no legal drop.
    /// Recognizing a full board as a draw is the caller's job.
    pub column: Option<usize>,
    /// Score of the chosen move from the last completed depth, or 0 for
    /// tactical pre-check blocks and fallback moves.
    pub score: i32,
    /// Deepest fully completed search horizon; 0 if the pre-check
    /// answered or not even depth 1 fit in the budget.
    pub depth_reached: usize,
    /// Number of search nodes visited.
    pub nodes: usize,
}

/// Chooses a column for the side to move within a wall-clock budget.
///
/// Always returns an externally legal column when one exists; `None`
/// means the mask allowed nothing.
pub fn choose_move(
    observation: &Observation,
    legal_mask: &ActionMask,
    budget: Duration,
) -> Result<Option<usize>> {
    decide(observation, legal_mask, budget).map(|decision| decision.column)
}

/// [`choose_move`] with diagnostics.
pub fn decide(
    observation: &Observation,
    legal_mask: &ActionMask,
    budget: Duration,
) -> Result<Decision> {
    let deadline = Instant::now() + budget;

    if legal_mask.is_empty() {
        return Ok(Decision {
            column: None,
            score: 0,
            depth_reached: 0,
            nodes: 0,
        });
    }

    let board = BitBoard::from_observation(observation);

    // center-out, restricted to externally allowed and non-full columns
    let columns = board.legal_columns(legal_mask);
    if columns.is_empty() {
        // the environment allows a column our occupancy view says is
        // full; honor the caller's constraint rather than crash
        warn!("legal mask disagrees with board occupancy, taking first allowed column");
        return Ok(Decision {
            column: legal_mask.first_allowed(),
            score: 0,
            depth_reached: 0,
            nodes: 0,
        });
    }

    // tactical pre-check: immediate wins and forced blocks never depend
    // on search depth or remaining budget
    for &column in &columns {
        if board.is_winning_drop(column) {
            debug!("winning move -> column {}", column);
            return Ok(Decision {
                column: Some(column),
                score: WIN_SCORE,
                depth_reached: 0,
                nodes: 0,
            });
        }
    }
    for &column in &columns {
        if board.is_blocking_drop(column) {
            debug!("blocking opponent -> column {}", column);
            return Ok(Decision {
                column: Some(column),
                score: 0,
                depth_reached: 0,
                nodes: 0,
            });
        }
    }

    let mut solver = Solver::new(columns, deadline);
    let (mut column, score, depth_reached) = solver.solve(board);

    // must never trigger under a correct codec, checked anyway: a move
    // has to come back within budget and it has to be externally legal
    if !legal_mask.allows(column) {
        warn!(
            "search produced externally illegal column {}, substituting",
            column
        );
        column = legal_mask.first_allowed().unwrap_or(column);
    }

    Ok(Decision {
        column: Some(column),
        score,
        depth_reached,
        nodes: solver.node_count,
    })
}

/// Per-decision search state.
pub struct Solver {
    // legal columns at the root, center-out; candidate moves at every
    // node are restricted to these
    root_columns: Vec<usize>,
    transposition_table: TranspositionTable,
    deadline: Instant,

    /// The number of nodes searched by this `Solver` so far (for diagnostics only)
    pub node_count: usize,
}

impl Solver {
    pub fn new(root_columns: Vec<usize>, deadline: Instant) -> Self {
        Self {
            root_columns,
            transposition_table: TranspositionTable::new(),
            deadline,
            node_count: 0,
        }
    }

    /// Iterative deepening: searches depth 1, 2, ... until the budget
    /// runs out or a forced win is proven, keeping the best move of the
    /// last depth that COMPLETED. A search cut off mid-tree is
    /// discarded wholesale; a partial alpha-beta pass is not a reliable
    /// best-move indicator.
    ///
    /// Returns `(column, score, depth_reached)`. The last resort, when
    /// not even depth 1 completes, is the first legal column, which the
    /// center-out ordering makes the most central one.
    pub fn solve(&mut self, board: BitBoard) -> (usize, i32, usize) {
        let mut best_column = self.root_columns[0];
        let mut best_score = 0;
        let mut depth_reached = 0;

        for depth in 1..=MAX_DEPTH {
            if Instant::now() >= self.deadline {
                debug!("budget exhausted before depth {}", depth);
                break;
            }
            match self.negamax(board, depth, -INFINITY, INFINITY) {
                Some((score, Some(column))) => {
                    best_column = column;
                    best_score = score;
                    depth_reached = depth;
                    trace!(
                        "depth {} complete: column {} score {} ({} nodes, {} cached)",
                        depth,
                        column,
                        score,
                        self.node_count,
                        self.transposition_table.len()
                    );
                    if score >= WIN_SCORE {
                        debug!("forced win proven at depth {}", depth);
                        break;
                    }
                }
                // stalemate at the root; nothing deeper to find
                Some((score, None)) => {
                    best_score = score;
                    depth_reached = depth;
                    break;
                }
                None => {
                    debug!(
                        "depth {} cancelled mid-search, keeping result of depth {}",
                        depth, depth_reached
                    );
                    break;
                }
            }
        }

        (best_column, best_score, depth_reached)
    }

    /// Negamax with alpha-beta pruning.
    ///
    /// `board` is always from the side to move's perspective; each
    /// recursion flips it. Returns `None` when the deadline passed, and
    /// the `?` on the recursive call propagates that cancellation up the
    /// tree as an ordinary value. The deadline is checked once per call,
    /// so an overrun is bounded by a single node's work.
    fn negamax(
        &mut self,
        board: BitBoard,
        depth: usize,
        mut alpha: i32,
        beta: i32,
    ) -> Option<(i32, Option<usize>)> {
        if Instant::now() >= self.deadline {
            return None;
        }
        self.node_count += 1;

        if depth == 0 {
            return Some((evaluate(&board), None));
        }

        let key = (board.position(), board.mask(), depth);
        if let Some(entry) = self.transposition_table.get(&key) {
            return Some(entry);
        }

        let mut best: Option<(i32, usize)> = None;
        for column in move_order() {
            if !self.root_columns.contains(&column) {
                continue;
            }
            let bit = match board.drop_bit(column) {
                Some(bit) => bit,
                None => continue,
            };

            // a completed alignment ends the game on the spot; deeper
            // wins score lower than this one
            if connects_four(board.position() | bit) {
                let entry = (WIN_SCORE + depth as i32, Some(column));
                self.transposition_table.set(key, entry);
                return Some(entry);
            }

            // the search window is flipped for the other player
            let (child_score, _) = self.negamax(board.play(bit), depth - 1, -beta, -alpha)?;
            let score = -child_score;

            match best {
                Some((best_score, _)) if best_score >= score => {}
                _ => best = Some((score, column)),
            }
            if score > alpha {
                alpha = score;
            }
            // a perfect opponent will not let the game reach this branch
            if alpha >= beta {
                break;
            }
        }

        let entry = match best {
            Some((score, column)) => (score, Some(column)),
            // no playable column: stalemate
            None => (0, None),
        };
        self.transposition_table.set(key, entry);
        Some(entry)
    }
}
