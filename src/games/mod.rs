// Reference game adapters
//
// Two small complete games that exercise the engine end-to-end. They are
// fixtures and demo fodder, not the point of the crate: real users bring
// their own `Game` implementations.

mod connect_four;
mod tic_tac_toe;

pub use connect_four::{ConnectFour, COLS, ROWS};
pub use tic_tac_toe::TicTacToe;
