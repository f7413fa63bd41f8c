// Public API
pub use board::{evaluate_winner, is_draw, Cell, Mark, WinningLine};

pub mod board;
