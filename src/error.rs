//! Errors raised by the game core

use thiserror::Error;

/// Errors returned by [`crate::game::GameEngine`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Board smaller than the playable minimum
    #[error("board of {rows}x{cols} cells is too small, both sides must be at least {min}", min = crate::game::MIN_BOARD_SIZE)]
    InvalidSize { rows: usize, cols: usize },

    /// `advance()` called after the game already ended
    #[error("cannot advance a game that has already ended")]
    GameOver,
}
