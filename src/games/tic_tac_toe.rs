//! Tic-Tac-Toe adapter: 3×3 board, three in a row wins.
//!
//! Small enough that the search solves it outright, which makes it the
//! workhorse fixture for search-correctness tests: the static evaluation
//! is simply zero and every conclusion comes from the tree.

use std::fmt;

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::{Game, MoveList, Player, Status};

const CELLS: usize = 9;

/// The eight win lines: rows, columns, diagonals.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

struct ZobristKeys {
    pieces: [[u64; CELLS]; 2],
    side_to_move: u64,
}

impl ZobristKeys {
    fn generate() -> Self {
        let mut rng = StdRng::seed_from_u64(0x2545_f491_4f6c_dd1d);
        let mut pieces = [[0u64; CELLS]; 2];
        for player in &mut pieces {
            for cell in player.iter_mut() {
                *cell = rng.gen();
            }
        }
        Self {
            pieces,
            side_to_move: rng.gen(),
        }
    }
}

static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::generate);

#[inline]
fn player_index(player: Player) -> usize {
    match player {
        Player::First => 0,
        Player::Second => 1,
    }
}

/// Static ordering preference: center, corners, edges.
const CELL_HINT: [i32; CELLS] = [2, 1, 2, 1, 3, 1, 2, 1, 2];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TicTacToe {
    cells: [Option<Player>; CELLS],
    to_move: Player,
    filled: u8,
    key: u64,
}

impl TicTacToe {
    pub fn new() -> Self {
        Self {
            cells: [None; CELLS],
            to_move: Player::First,
            filled: 0,
            key: 0,
        }
    }

    /// Replay a sequence of cell indices, alternating from `Player::First`.
    pub fn from_moves(moves: &[u8]) -> Self {
        let mut game = Self::new();
        for &mv in moves {
            game.apply(mv);
        }
        game
    }

    pub fn cell(&self, index: usize) -> Option<Player> {
        self.cells[index]
    }

    /// From-scratch key computation, the oracle for the incremental one.
    pub fn recompute_key(&self) -> u64 {
        let mut key = 0u64;
        for (cell, occupant) in self.cells.iter().enumerate() {
            if let Some(player) = occupant {
                key ^= ZOBRIST.pieces[player_index(*player)][cell];
            }
        }
        if self.to_move == Player::Second {
            key ^= ZOBRIST.side_to_move;
        }
        key
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for TicTacToe {
    type Move = u8;
    type Undo = ();

    fn side_to_move(&self) -> Player {
        self.to_move
    }

    fn legal_moves(&self, out: &mut MoveList<u8>) {
        for (index, cell) in self.cells.iter().enumerate() {
            if cell.is_none() {
                out.push(index as u8);
            }
        }
    }

    fn apply(&mut self, mv: u8) {
        let cell = usize::from(mv);
        debug_assert!(self.cells[cell].is_none(), "cell already occupied");
        self.cells[cell] = Some(self.to_move);
        self.filled += 1;
        self.key ^= ZOBRIST.pieces[player_index(self.to_move)][cell];
        self.key ^= ZOBRIST.side_to_move;
        self.to_move = self.to_move.opposite();
    }

    fn undo(&mut self, mv: u8, _token: ()) {
        let cell = usize::from(mv);
        self.to_move = self.to_move.opposite();
        self.cells[cell] = None;
        self.filled -= 1;
        self.key ^= ZOBRIST.pieces[player_index(self.to_move)][cell];
        self.key ^= ZOBRIST.side_to_move;
    }

    fn status(&self) -> Status {
        for line in &LINES {
            if let Some(player) = self.cells[line[0]] {
                if self.cells[line[1]] == Some(player) && self.cells[line[2]] == Some(player) {
                    return Status::Win(player);
                }
            }
        }
        if usize::from(self.filled) == CELLS {
            Status::Draw
        } else {
            Status::Ongoing
        }
    }

    fn evaluate(&self, _perspective: Player) -> i32 {
        0
    }

    fn key(&self) -> u64 {
        self.key
    }

    fn order_hint(&self, mv: u8) -> i32 {
        CELL_HINT[usize::from(mv)]
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let glyph = match self.cells[row * 3 + col] {
                    Some(Player::First) => 'X',
                    Some(Player::Second) => 'O',
                    None => '.',
                };
                write!(f, "{glyph}")?;
            }
            if row < 2 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
