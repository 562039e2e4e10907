//! Static evaluation applied at the search horizon
//!
//! The score is a hand-tuned linear combination: a bonus for tiles in
//! the center column plus a score for every four-cell window on the
//! board. The exact constants are part of the engine's observable
//! behavior; their ordinal relationships matter more than their values
//! (favor the center, reward own three-in-a-rows, and penalize opponent
//! three-in-a-rows harder than own ones are rewarded).

use crate::bitboard::BitBoard;
use crate::{HEIGHT, WIDTH};

/// Window score for four own tiles. Wins are normally caught by the
/// search before the horizon; this keeps a missed one dominant anyway.
const FOUR_OWN: i32 = 100_000;
const THREE_OWN: i32 = 50;
const TWO_OWN: i32 = 10;
const FOUR_OPPONENT: i32 = -100_000;
const THREE_OPPONENT: i32 = -80;
const TWO_OPPONENT: i32 = -10;

/// Per-tile bonus for occupying the center column.
const CENTER_WEIGHT: i32 = 3;

// every four-in-a-line window on a 6x7 board:
// 24 horizontal + 21 vertical + 12 per diagonal
const WINDOW_COUNT: usize = 69;

const fn window_bit(column: usize, row: usize) -> u64 {
    1 << (column * (HEIGHT + 1) + row)
}

const fn window_masks() -> [u64; WINDOW_COUNT] {
    let mut windows = [0u64; WINDOW_COUNT];
    let mut n = 0;

    // horizontal
    let mut row = 0;
    while row < HEIGHT {
        let mut column = 0;
        while column + 3 < WIDTH {
            windows[n] = window_bit(column, row)
                | window_bit(column + 1, row)
                | window_bit(column + 2, row)
                | window_bit(column + 3, row);
            n += 1;
            column += 1;
        }
        row += 1;
    }

    // vertical
    let mut column = 0;
    while column < WIDTH {
        let mut row = 0;
        while row + 3 < HEIGHT {
            windows[n] = window_bit(column, row)
                | window_bit(column, row + 1)
                | window_bit(column, row + 2)
                | window_bit(column, row + 3);
            n += 1;
            row += 1;
        }
        column += 1;
    }

    // diagonal '/'
    let mut column = 0;
    while column + 3 < WIDTH {
        let mut row = 0;
        while row + 3 < HEIGHT {
            windows[n] = window_bit(column, row)
                | window_bit(column + 1, row + 1)
                | window_bit(column + 2, row + 2)
                | window_bit(column + 3, row + 3);
            n += 1;
            row += 1;
        }
        column += 1;
    }

    // diagonal '\'
    let mut column = 0;
    while column + 3 < WIDTH {
        let mut row = 3;
        while row < HEIGHT {
            windows[n] = window_bit(column, row)
                | window_bit(column + 1, row - 1)
                | window_bit(column + 2, row - 2)
                | window_bit(column + 3, row - 3);
            n += 1;
            row += 1;
        }
        column += 1;
    }

    windows
}

static WINDOWS: [u64; WINDOW_COUNT] = window_masks();

fn window_score(own: u32, opponent: u32) -> i32 {
    let empty = 4 - own - opponent;
    match (own, opponent, empty) {
        (4, _, _) => FOUR_OWN,
        (3, _, 1) => THREE_OWN,
        (2, _, 2) => TWO_OWN,
        (_, 4, _) => FOUR_OPPONENT,
        (_, 3, 1) => THREE_OPPONENT,
        (_, 2, 2) => TWO_OPPONENT,
        _ => 0,
    }
}

/// Scores a non-terminal position from the side to move's perspective.
///
/// Pure: two calls on the same board return the same score.
pub fn evaluate(board: &BitBoard) -> i32 {
    let own = board.position();
    let opponent = board.opponent_position();

    let center = BitBoard::column_mask(WIDTH / 2);
    let mut score = CENTER_WEIGHT * (own & center).count_ones() as i32;

    for &window in WINDOWS.iter() {
        score += window_score(
            (own & window).count_ones(),
            (opponent & window).count_ones(),
        );
    }
    score
}
