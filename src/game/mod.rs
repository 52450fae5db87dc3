//! Core Connect Four game logic: board representation, player types, win
//! detection, move history, and the game state machine with immutable
//! transitions.

mod board;
mod history;
mod player;
mod state;
pub mod win;

pub use board::{Board, Cell, DEFAULT_COLS, DEFAULT_ROWS, MAX_DIMENSION, MIN_DIMENSION};
pub use history::{EmptyHistory, MoveHistory};
pub use player::Player;
pub use state::{GameState, GameStatus};
pub use win::check_winner;
