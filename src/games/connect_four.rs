//! Connect Four adapter: 6×7 board, gravity drops, four in a row wins.
//!
//! Reference adapter for the search engine. Moves are column indices;
//! the state keeps per-column heights so move generation and undo are
//! O(1), and the transposition key is maintained incrementally with
//! Zobrist hashing alongside every apply/undo.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::{Game, MoveList, Player, Status};

pub const COLS: usize = 7;
pub const ROWS: usize = 6;
const CELLS: usize = COLS * ROWS;
const CONNECT: usize = 4;

/// Zobrist keys: one random 64-bit number per (player, cell), plus a
/// side-to-move toggle. Seeded so keys are random but reproducible.
struct ZobristKeys {
    pieces: [[u64; CELLS]; 2],
    side_to_move: u64,
}

impl ZobristKeys {
    fn generate() -> Self {
        let mut rng = StdRng::seed_from_u64(0x9e37_79b9_7f4a_7c15);
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

/// Every four-in-a-row line on the board (69 of them), plus a per-cell
/// index so win detection after a move only scans the lines through the
/// cell just played.
#[derive(Debug)]
struct WinTable {
    lines: Vec<[usize; CONNECT]>,
    by_cell: Vec<Vec<usize>>,
}

impl WinTable {
    fn build() -> Self {
        let mut lines = Vec::new();
        let directions: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
        for row in 0..ROWS as isize {
            for col in 0..COLS as isize {
                for (dr, dc) in directions {
                    let end_row = row + dr * (CONNECT as isize - 1);
                    let end_col = col + dc * (CONNECT as isize - 1);
                    if (0..ROWS as isize).contains(&end_row)
                        && (0..COLS as isize).contains(&end_col)
                    {
                        let mut line = [0usize; CONNECT];
                        for (i, cell) in line.iter_mut().enumerate() {
                            let r = row + dr * i as isize;
                            let c = col + dc * i as isize;
                            *cell = (r * COLS as isize + c) as usize;
                        }
                        lines.push(line);
                    }
                }
            }
        }

        let mut by_cell = vec![Vec::new(); CELLS];
        for (idx, line) in lines.iter().enumerate() {
            for &cell in line {
                by_cell[cell].push(idx);
            }
        }
        Self { lines, by_cell }
    }
}

/// Rewind token for one drop.
pub struct Undo {
    prev_last: Option<u8>,
}

/// Line weights for the static evaluation: an unblocked window with n
/// own pieces. Kept far below `WIN_SCORE` so heuristics never read as
/// proven outcomes.
const WINDOW_WEIGHT: [i32; 5] = [0, 1, 8, 32, 400];

/// Bonus per own piece in the center column.
const CENTER_WEIGHT: i32 = 6;

#[derive(Clone, Debug)]
pub struct ConnectFour {
    /// Row-major from the bottom: cell = row * COLS + col.
    cells: [Option<Player>; CELLS],
    heights: [u8; COLS],
    to_move: Player,
    last_cell: Option<u8>,
    key: u64,
    win_table: Arc<WinTable>,
}

impl ConnectFour {
    pub fn new() -> Self {
        Self {
            cells: [None; CELLS],
            heights: [0; COLS],
            to_move: Player::First,
            last_cell: None,
            key: 0,
            win_table: Arc::new(WinTable::build()),
        }
    }

    /// Replay a sequence of drops, alternating from `Player::First`.
    pub fn from_moves(columns: &[u8]) -> Self {
        let mut game = Self::new();
        for &col in columns {
            game.apply(col);
        }
        game
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Player> {
        self.cells[row * COLS + col]
    }

    pub fn height(&self, col: usize) -> usize {
        usize::from(self.heights[col])
    }

    /// From-scratch key computation; must agree with the incrementally
    /// maintained `key()` at every reachable state.
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

impl Default for ConnectFour {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ConnectFour {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
            && self.heights == other.heights
            && self.to_move == other.to_move
            && self.last_cell == other.last_cell
            && self.key == other.key
    }
}

impl Eq for ConnectFour {}

impl Game for ConnectFour {
    type Move = u8;
    type Undo = Undo;

    fn side_to_move(&self) -> Player {
        self.to_move
    }

    fn legal_moves(&self, out: &mut MoveList<u8>) {
        for col in 0..COLS {
            if usize::from(self.heights[col]) < ROWS {
                out.push(col as u8);
            }
        }
    }

    fn apply(&mut self, col: u8) -> Undo {
        let col_idx = usize::from(col);
        let row = usize::from(self.heights[col_idx]);
        debug_assert!(row < ROWS, "drop into a full column");
        let cell = row * COLS + col_idx;

        self.cells[cell] = Some(self.to_move);
        self.heights[col_idx] += 1;
        self.key ^= ZOBRIST.pieces[player_index(self.to_move)][cell];
        self.key ^= ZOBRIST.side_to_move;

        let token = Undo {
            prev_last: self.last_cell,
        };
        self.last_cell = Some(cell as u8);
        self.to_move = self.to_move.opposite();
        token
    }

    fn undo(&mut self, col: u8, token: Undo) {
        let col_idx = usize::from(col);
        self.to_move = self.to_move.opposite();
        self.heights[col_idx] -= 1;
        let row = usize::from(self.heights[col_idx]);
        let cell = row * COLS + col_idx;

        self.cells[cell] = None;
        self.key ^= ZOBRIST.pieces[player_index(self.to_move)][cell];
        self.key ^= ZOBRIST.side_to_move;
        self.last_cell = token.prev_last;
    }

    fn status(&self) -> Status {
        // Only the move just played can have completed a line.
        if let Some(cell) = self.last_cell {
            let mover = self.to_move.opposite();
            for &line_idx in &self.win_table.by_cell[usize::from(cell)] {
                let line = &self.win_table.lines[line_idx];
                if line.iter().all(|&c| self.cells[c] == Some(mover)) {
                    return Status::Win(mover);
                }
            }
        }
        if self.heights.iter().all(|&h| usize::from(h) == ROWS) {
            Status::Draw
        } else {
            Status::Ongoing
        }
    }

    fn evaluate(&self, perspective: Player) -> i32 {
        let mut score = 0;
        for line in &self.win_table.lines {
            let mut mine = 0usize;
            let mut theirs = 0usize;
            for &cell in line {
                match self.cells[cell] {
                    Some(p) if p == perspective => mine += 1,
                    Some(_) => theirs += 1,
                    None => {}
                }
            }
            // A window both players occupy can never be completed.
            if theirs == 0 {
                score += WINDOW_WEIGHT[mine];
            } else if mine == 0 {
                score -= WINDOW_WEIGHT[theirs];
            }
        }

        let center = COLS / 2;
        for row in 0..ROWS {
            match self.cells[row * COLS + center] {
                Some(p) if p == perspective => score += CENTER_WEIGHT,
                Some(_) => score -= CENTER_WEIGHT,
                None => {}
            }
        }
        score
    }

    fn key(&self) -> u64 {
        self.key
    }

    fn order_hint(&self, col: u8) -> i32 {
        // Center columns first: they touch the most win lines.
        let center = (COLS / 2) as i32;
        center - (i32::from(col) - center).abs()
    }
}

impl fmt::Display for ConnectFour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS).rev() {
            for col in 0..COLS {
                let glyph = match self.cells[row * COLS + col] {
                    Some(Player::First) => 'X',
                    Some(Player::Second) => 'O',
                    None => '.',
                };
                write!(f, "{glyph} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "0 1 2 3 4 5 6")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A gravity-legal 42-move sequence ending in a full drawn board.
    const DRAWN_GAME: [u8; 42] = [
        2, 0, 3, 0, 0, 0, 0, 1, 0, 2, 1, 1, 1, 3, 1, 3, 1, 3, 2, 2, 3, 2, 3, 2, 6, 4, 4, 5, 4, 6,
        4, 4, 4, 6, 5, 5, 6, 5, 5, 6, 5, 6,
    ];

    #[test]
    fn drops_stack_upward() {
        let game = ConnectFour::from_moves(&[3, 3, 3]);
        assert_eq!(game.cell(0, 3), Some(Player::First));
        assert_eq!(game.cell(1, 3), Some(Player::Second));
        assert_eq!(game.cell(2, 3), Some(Player::First));
        assert_eq!(game.height(3), 3);
        assert_eq!(game.side_to_move(), Player::Second);
    }

    #[test]
    fn full_column_is_not_legal() {
        let game = ConnectFour::from_moves(&[0, 0, 0, 0, 0, 0]);
        let mut moves = MoveList::new();
        game.legal_moves(&mut moves);
        assert!(!moves.contains(&0));
        assert_eq!(moves.len(), 6);
    }

    #[test]
    fn horizontal_win() {
        let game = ConnectFour::from_moves(&[0, 0, 1, 1, 2, 2, 3]);
        assert_eq!(game.status(), Status::Win(Player::First));
    }

    #[test]
    fn vertical_win() {
        let game = ConnectFour::from_moves(&[5, 6, 5, 6, 5, 6, 5]);
        assert_eq!(game.status(), Status::Win(Player::First));
    }

    #[test]
    fn diagonal_win() {
        // First builds the rising diagonal (0,0)-(1,1)-(2,2)-(3,3).
        let game = ConnectFour::from_moves(&[0, 1, 1, 2, 2, 3, 2, 3, 3, 5, 3]);
        assert_eq!(game.status(), Status::Win(Player::First));
    }

    #[test]
    fn full_board_without_a_line_is_a_draw() {
        let game = ConnectFour::from_moves(&DRAWN_GAME);
        assert_eq!(game.status(), Status::Draw);
        let mut moves = MoveList::new();
        game.legal_moves(&mut moves);
        assert!(moves.is_empty());
    }

    #[test]
    fn no_premature_win_on_the_drawn_game() {
        let mut game = ConnectFour::new();
        for &col in &DRAWN_GAME {
            assert_eq!(game.status(), Status::Ongoing);
            game.apply(col);
        }
        assert_eq!(game.status(), Status::Draw);
    }

    #[test]
    fn undo_restores_every_field() {
        let mut game = ConnectFour::from_moves(&[3, 2, 3, 4]);
        let before = game.clone();
        let token = game.apply(5);
        assert_ne!(game, before);
        game.undo(5, token);
        assert_eq!(game, before);
        assert_eq!(game.key(), before.key());
    }

    #[test]
    fn incremental_key_matches_recomputation() {
        let mut game = ConnectFour::new();
        assert_eq!(game.key(), game.recompute_key());
        let mut rng = StdRng::seed_from_u64(42);
        let mut undo_stack = Vec::new();
        for _ in 0..200 {
            if game.status().is_terminal() || (rng.gen::<bool>() && !undo_stack.is_empty()) {
                while let Some((col, token)) = undo_stack.pop() {
                    game.undo(col, token);
                    assert_eq!(game.key(), game.recompute_key());
                }
                continue;
            }
            let mut moves = MoveList::new();
            game.legal_moves(&mut moves);
            let col = moves[rng.gen_range(0..moves.len())];
            let token = game.apply(col);
            undo_stack.push((col, token));
            assert_eq!(game.key(), game.recompute_key());
        }
    }

    #[test]
    fn key_distinguishes_side_to_move() {
        // Same stones, opposite mover: keys differ by exactly the
        // side-to-move toggle.
        let mut game = ConnectFour::from_moves(&[3, 2]);
        let first_to_move = game.recompute_key();
        game.to_move = game.to_move.opposite();
        let second_to_move = game.recompute_key();
        assert_ne!(first_to_move, second_to_move);
        assert_eq!(first_to_move ^ second_to_move, ZOBRIST.side_to_move);
    }

    #[test]
    fn center_is_the_strongest_hint() {
        let game = ConnectFour::new();
        let hints: Vec<i32> = (0..COLS as u8).map(|c| game.order_hint(c)).collect();
        assert_eq!(hints, vec![0, 1, 2, 3, 2, 1, 0]);
    }

    #[test]
    fn evaluation_is_antisymmetric() {
        let game = ConnectFour::from_moves(&[3, 0, 3, 1, 2]);
        assert_eq!(
            game.evaluate(Player::First),
            -game.evaluate(Player::Second)
        );
    }

    #[test]
    fn win_table_has_sixty_nine_lines() {
        let table = WinTable::build();
        assert_eq!(table.lines.len(), 69);
        // Every line index appears once per member cell.
        let total: usize = table.by_cell.iter().map(Vec::len).sum();
        assert_eq!(total, 69 * CONNECT);
    }
}
