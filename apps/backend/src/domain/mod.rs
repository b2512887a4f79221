//! Domain layer: pure checkers logic with no I/O.

pub mod board;
pub mod board_serde;
pub mod errors;
pub mod moves;
pub mod rules;

#[cfg(test)]
mod tests_props_legality;
#[cfg(test)]
mod tests_props_turns;

// Re-exports for ergonomics
pub use board::{initial_board, piece_count, Board, Cell, Player, Position, BOARD_SIZE};
pub use board_serde::SerializedBoard;
pub use errors::Rejection;
pub use moves::{
    apply_move, has_any_jump, has_any_legal_move, is_legal_move, legal_moves, winner, Move,
    MoveKind,
};
pub use rules::{permitted_moves, try_move, AppliedMove, GameView, MoveRequest, RuleSet};
