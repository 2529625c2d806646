//! Adversarial game-tree search for two-player, perfect-information,
//! zero-sum games under a wall-clock budget.
//!
//! The engine is game-agnostic: implement [`Game`] for your rules and
//! call [`best_move`]. Internally it runs negamax with alpha-beta
//! pruning driven by iterative deepening, caches positions in a bounded
//! transposition table, and cancels cooperatively when the budget runs
//! out: the move returned is always the best one from the deepest fully
//! completed iteration, never a half-searched guess.
//!
//! ```
//! use std::time::Duration;
//! use gametree::{best_move, games::ConnectFour};
//!
//! let mut game = ConnectFour::new();
//! let column = best_move(&mut game, Duration::from_millis(100));
//! assert!(column.is_some());
//! ```

pub mod game;
pub mod games;
pub mod search;

pub use game::{Game, MoveList, Player, Status};
pub use search::{
    best_move, is_decisive, search, search_parallel, Bound, SearchBudget, SearchConfig,
    SearchInterrupted, SearchReport, TranspositionTable, WIN_SCORE,
};
