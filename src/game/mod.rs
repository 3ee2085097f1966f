//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The engine only consumes ticks and direction requests and produces snapshots.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::{GameEngine, Listener, MAX_PENDING_TURNS, MIN_BOARD_SIZE};
pub use state::{Cell, GameStatus, Snapshot};
