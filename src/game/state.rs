use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A cell on the game grid, row grows downward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Move cell by delta
    pub fn moved_by(&self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Move cell one step in a direction
    pub fn moved(&self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        self.moved_by(d_row, d_col)
    }

    /// True when the two cells share an edge
    pub fn is_adjacent(&self, other: Cell) -> bool {
        (self.row - other.row).abs() + (self.col - other.col).abs() == 1
    }
}

/// Status reported after each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameStatus {
    /// Snake moved without eating
    Running,
    /// Snake ate the food this tick; lasts a single tick
    JustEaten,
    /// Snake hit a wall or itself
    GameOver,
    /// Snake filled the whole board
    Won,
}

impl GameStatus {
    /// No further ticks are accepted once a terminal status is reached
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::GameOver | GameStatus::Won)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Running => "running",
            GameStatus::JustEaten => "justEaten",
            GameStatus::GameOver => "gameOver",
            GameStatus::Won => "won",
        }
    }
}

/// Engine state at a specific tick.
///
/// Snapshots are plain owned values: the engine hands out a fresh copy every
/// time, so holding on to one never observes later ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub status: GameStatus,
    pub tick: u64,
    /// Body segments, with head at index 0
    pub snake: Vec<Cell>,
    /// `None` only once the board is full
    pub food: Option<Cell>,
    pub direction: Direction,
}

impl Snapshot {
    /// `None` only for a hand-built snapshot with no body
    pub fn head(&self) -> Option<Cell> {
        self.snake.first().copied()
    }

    pub fn tail(&self) -> Option<Cell> {
        self.snake.last().copied()
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snake.is_empty()
    }

    /// The two spawn segments are worth nothing
    pub fn score(&self) -> u32 {
        self.snake.len().saturating_sub(2) as u32
    }
}
