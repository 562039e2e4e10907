//! The authoritative game board and environment adapter
//!
//! The harness owns one `ArrayBoard` per game. Agents never see it
//! directly: they receive the two-channel [`Observation`] (relative to
//! the side to move, first row at the top) and the legal-column
//! [`ActionMask`] this adapter produces, mirroring the environment
//! contract the engine was built against.

use anyhow::{anyhow, Result};
use crossterm::{
    cursor::MoveTo,
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use crate::observation::{ActionMask, Mark, Observation};
use crate::{HEIGHT, WIDTH};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Cell {
    PlayerOne,
    PlayerTwo,
    Empty,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameState {
    Playing,
    PlayerOneWin,
    PlayerTwoWin,
    Draw,
}

#[derive(Clone)]
pub struct ArrayBoard {
    // cells are stored left-to-right, bottom-to-top
    cells: [Cell; WIDTH * HEIGHT],
    heights: [usize; WIDTH],
    pub player_one: bool,
    num_moves: usize,
    pub state: GameState,
}

impl ArrayBoard {
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; WIDTH * HEIGHT],
            heights: [0; WIDTH],
            player_one: true,
            num_moves: 0,
            state: GameState::Playing,
        }
    }

    /// Replays a sequence of 0-indexed columns; test setup helper.
    pub fn from_columns(columns: &[usize]) -> Result<Self> {
        let mut board = Self::new();
        for &column in columns {
            board.play_checked(column)?;
        }
        Ok(board)
    }

    fn cell(&self, column: usize, row: usize) -> Cell {
        self.cells[column + WIDTH * row]
    }

    pub fn playable(&self, column: usize) -> bool {
        self.heights[column] < HEIGHT
    }

    pub fn num_moves(&self) -> usize {
        self.num_moves
    }

    fn to_move(&self) -> Cell {
        if self.player_one {
            Cell::PlayerOne
        } else {
            Cell::PlayerTwo
        }
    }

    /// The legal-move indicator the environment hands to agents.
    pub fn action_mask(&self) -> ActionMask {
        let mut indicator = [0u8; WIDTH];
        for column in 0..WIDTH {
            if self.playable(column) {
                indicator[column] = 1;
            }
        }
        ActionMask::from_indicator(&indicator)
    }

    /// The two-channel observation for the side to move, first row at
    /// the top of the board.
    pub fn observation(&self) -> Observation {
        let to_move = self.to_move();
        let mut observation = Observation::empty();
        for row in 0..HEIGHT {
            let external_row = HEIGHT - 1 - row;
            for column in 0..WIDTH {
                let mark = match self.cell(column, row) {
                    Cell::Empty => Mark::Empty,
                    cell if cell == to_move => Mark::Own,
                    _ => Mark::Opponent,
                };
                observation.set(external_row, column, mark);
            }
        }
        observation
    }

    /// Drops the side to move's tile into a 0-indexed column, advancing
    /// the turn and the game state.
    pub fn play_checked(&mut self, column: usize) -> Result<GameState> {
        if !matches!(self.state, GameState::Playing) {
            return Err(anyhow!("invalid move, game is over"));
        }
        if column >= WIDTH {
            return Err(anyhow!(
                "invalid move, column {} out of range 0..{}",
                column,
                WIDTH
            ));
        }
        if !self.playable(column) {
            return Err(anyhow!("invalid move, column {} full", column));
        }

        self.state = if self.wins(column) {
            if self.player_one {
                GameState::PlayerOneWin
            } else {
                GameState::PlayerTwoWin
            }
        } else if self.num_moves + 1 == WIDTH * HEIGHT {
            GameState::Draw
        } else {
            GameState::Playing
        };

        let player = self.to_move();
        self.cells[column + WIDTH * self.heights[column]] = player;
        self.heights[column] += 1;
        self.num_moves += 1;
        self.player_one = !self.player_one;

        Ok(self.state)
    }

    // would the side to move's drop into this column complete four?
    fn wins(&self, column: usize) -> bool {
        let player = self.to_move();
        let row = self.heights[column];

        // vertical: only downwards from the landing square
        if row >= 3
            && self.cell(column, row - 1) == player
            && self.cell(column, row - 2) == player
            && self.cell(column, row - 3) == player
        {
            return true;
        }

        // horizontal and both diagonals: count outwards from the square
        for dy_dx in -1i32..=1 {
            let mut run = 0;
            for &dx in [-1i32, 1].iter() {
                let mut x = column as i32 + dx;
                let mut y = row as i32 + dx * dy_dx;
                while x >= 0
                    && x < WIDTH as i32
                    && y >= 0
                    && y < HEIGHT as i32
                    && self.cell(x as usize, y as usize) == player
                {
                    x += dx;
                    y += dx * dy_dx;
                    run += 1;
                }
            }
            if run >= 3 {
                return true;
            }
        }

        false
    }

    pub fn display(&self) -> Result<()> {
        let mut stdout = stdout();

        let cols: String = (1..=WIDTH).map(|x| x.to_string()).collect();
        stdout.queue(PrintStyledContent(style(cols + "\n")))?;
        for _ in 0..HEIGHT {
            stdout.queue(PrintStyledContent(style("\n")))?;
        }
        stdout.flush()?;

        let (origin_x, origin_y) = crossterm::cursor::position()?;

        for (idx, cell) in self.cells.iter().enumerate() {
            let (pos_x, pos_y) = (
                origin_x + (idx % WIDTH) as u16,
                origin_y - (idx / WIDTH) as u16,
            );

            stdout
                .queue(MoveTo(pos_x, pos_y))?
                .queue(PrintStyledContent(
                    style("O")
                        .attribute(Attribute::Bold)
                        .on(Color::DarkBlue)
                        .with(match cell {
                            Cell::PlayerOne => Color::Red,
                            Cell::PlayerTwo => Color::Yellow,
                            Cell::Empty => Color::DarkBlue,
                        }),
                ))?;
        }
        stdout
            .queue(MoveTo(origin_x + WIDTH as u16, origin_y))?
            .queue(PrintStyledContent(style("\n")))?;
        stdout.flush()?;
        Ok(())
    }
}

impl Default for ArrayBoard {
    fn default() -> Self {
        Self::new()
    }
}
