//! Smooth Snake - a tick-driven Snake game with interpolated rendering
//!
//! This library provides:
//! - Core game logic (game module): the deterministic tick state machine
//! - Frame interpolation and TUI painting (render module)
//! - Keyboard and drag input (input module)
//! - Best-score persistence and board sizing for the terminal shell
//! - The interactive terminal mode (modes module)

pub mod error;
pub mod game;
pub mod input;
pub mod layout;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod storage;

pub use error::GameError;
