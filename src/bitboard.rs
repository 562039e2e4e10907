use crate::observation::{ActionMask, Mark, Observation};
use crate::{HEIGHT, WIDTH};

mod static_masks {
    use crate::{HEIGHT, WIDTH};

    pub const fn bottom_row_mask() -> u64 {
        let mut mask = 0;
        let mut column = 0;
        while column < WIDTH {
            mask |= 1 << (column * (HEIGHT + 1));
            column += 1;
        }
        mask
    }
    pub const fn full_board_mask() -> u64 {
        bottom_row_mask() * ((1 << HEIGHT as u64) - 1)
    }
}

/// Columns ordered from the middle outwards: `[3, 2, 4, 1, 5, 0, 6]`.
///
/// Central moves are stronger on average, so exploring them first
/// produces earlier alpha-beta cutoffs.
pub const fn move_order() -> [usize; WIDTH] {
    let mut move_order = [0; WIDTH];
    let mut i = 0;
    while i < WIDTH {
        move_order[i] = if i % 2 == 1 {
            WIDTH / 2 - (i + 1) / 2
        } else {
            WIDTH / 2 + i / 2
        };
        i += 1;
    }
    move_order
}

/// Tests a single player's bitboard for four connected tiles.
///
/// Each direction collapses runs with two shift-and-AND steps, the
/// second at twice the stride, so a run of four survives both. Constant
/// time regardless of board fill; this runs on every candidate move at
/// every search node.
pub fn connects_four(tiles: u64) -> bool {
    // horizontal, stride of one column
    let mut m = tiles & (tiles >> (HEIGHT + 1));
    if m & (m >> (2 * (HEIGHT + 1))) != 0 {
        return true;
    }

    // diagonal '\', one column right and one row down
    m = tiles & (tiles >> HEIGHT);
    if m & (m >> (2 * HEIGHT)) != 0 {
        return true;
    }

    // diagonal '/', one column right and one row up
    m = tiles & (tiles >> (HEIGHT + 2));
    if m & (m >> (2 * (HEIGHT + 2))) != 0 {
        return true;
    }

    // vertical
    m = tiles & (tiles >> 1);
    if m & (m >> 2) != 0 {
        return true;
    }

    false
}

/// The compact board encoding used by the search.
///
/// Each column occupies 7 bits (bit index = `column * 7 + row`, row 0 at
/// the bottom); the top bit of every column is a permanent sentinel that
/// no tile ever sets, so horizontal and diagonal shift checks cannot
/// bleed across column boundaries.
///
/// `position` holds the side to move's tiles and `mask` all tiles; the
/// opponent's tiles are always `mask ^ position` and never stored. The
/// side to move is implicit: after [`BitBoard::play`] the returned board
/// is already from the other player's point of view.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct BitBoard {
    // tiles of the side to move
    position: u64,
    // all tiles
    mask: u64,
}

impl BitBoard {
    pub fn empty() -> Self {
        Self {
            position: 0,
            mask: 0,
        }
    }

    pub fn from_masks(position: u64, mask: u64) -> Self {
        Self { position, mask }
    }

    /// Encodes a validated observation.
    ///
    /// The observation's first row is the TOP of the board; the bitboard
    /// puts row 0 at the bottom, so rows are inverted here. Getting this
    /// inversion backwards silently corrupts every win check, which is
    /// why it lives in exactly one place.
    pub fn from_observation(observation: &Observation) -> Self {
        let mut board = Self::empty();
        for external_row in 0..HEIGHT {
            let row = HEIGHT - 1 - external_row;
            for column in 0..WIDTH {
                let bit = 1 << (column * (HEIGHT + 1) + row);
                match observation.get(external_row, column) {
                    Mark::Own => {
                        board.position |= bit;
                        board.mask |= bit;
                    }
                    Mark::Opponent => {
                        board.mask |= bit;
                    }
                    Mark::Empty => {}
                }
            }
        }
        board
    }

    /// Decodes back to the external grid convention. Inverse of
    /// [`BitBoard::from_observation`].
    pub fn to_observation(&self) -> Observation {
        let mut observation = Observation::empty();
        for external_row in 0..HEIGHT {
            let row = HEIGHT - 1 - external_row;
            for column in 0..WIDTH {
                let bit = 1 << (column * (HEIGHT + 1) + row);
                let mark = if self.position & bit != 0 {
                    Mark::Own
                } else if self.mask & bit != 0 {
                    Mark::Opponent
                } else {
                    Mark::Empty
                };
                observation.set(external_row, column, mark);
            }
        }
        observation
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn mask(&self) -> u64 {
        self.mask
    }

    pub fn opponent_position(&self) -> u64 {
        self.position ^ self.mask
    }

    pub fn top_mask(column: usize) -> u64 {
        1 << (column * (HEIGHT + 1) + (HEIGHT - 1))
    }

    pub fn bottom_mask(column: usize) -> u64 {
        1 << (column * (HEIGHT + 1))
    }

    pub fn column_mask(column: usize) -> u64 {
        ((1 << HEIGHT) - 1) << (column * (HEIGHT + 1))
    }

    /// Number of tiles already in a column, derived from `mask` on demand.
    pub fn column_height(&self, column: usize) -> usize {
        (self.mask & Self::column_mask(column)).count_ones() as usize
    }

    pub fn playable(&self, column: usize) -> bool {
        Self::top_mask(column) & self.mask == 0
    }

    pub fn is_full(&self) -> bool {
        self.mask == static_masks::full_board_mask()
    }

    /// The single bit a drop into `column` would set, or `None` if the
    /// column is full. Adding the column's bottom bit to `mask` carries
    /// up to the first empty cell.
    pub fn drop_bit(&self, column: usize) -> Option<u64> {
        if !self.playable(column) {
            return None;
        }
        Some((self.mask + Self::bottom_mask(column)) & Self::column_mask(column))
    }

    /// Applies a move for the side to move and flips perspective: the
    /// returned board's `position` is the other player's tiles. Bitboards
    /// are plain values, so there is nothing to undo.
    #[must_use]
    pub fn play(self, move_bit: u64) -> Self {
        Self {
            position: self.position ^ self.mask,
            mask: self.mask | move_bit,
        }
    }

    /// Would a drop into `column` win on the spot for the side to move?
    pub fn is_winning_drop(&self, column: usize) -> bool {
        match self.drop_bit(column) {
            Some(bit) => connects_four(self.position | bit),
            None => false,
        }
    }

    /// Would a drop into `column` land on the square the opponent needs
    /// for an immediate win?
    pub fn is_blocking_drop(&self, column: usize) -> bool {
        match self.drop_bit(column) {
            Some(bit) => connects_four(self.opponent_position() | bit),
            None => false,
        }
    }

    /// Columns the engine considers playable, in center-out priority
    /// order, restricted to what the environment allows.
    pub fn legal_columns(&self, allowed: &ActionMask) -> Vec<usize> {
        move_order()
            .iter()
            .copied()
            .filter(|&column| allowed.allows(column) && self.playable(column))
            .collect()
    }
}
