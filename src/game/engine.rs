use std::collections::{HashSet, VecDeque};

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use super::{
    action::Direction,
    config::GameConfig,
    state::{Cell, GameStatus, Snapshot},
};
use crate::error::GameError;

/// Smallest accepted side length of the board
pub const MIN_BOARD_SIZE: usize = 5;

/// Turns that may wait in the queue behind the active direction
pub const MAX_PENDING_TURNS: usize = 3;

/// Callback invoked with every snapshot produced by [`GameEngine::advance`]
pub type Listener = Box<dyn FnMut(&Snapshot)>;

/// The authoritative game state machine.
///
/// One engine lives for exactly one play session. Restarting means building a
/// new engine, never resetting this one.
pub struct GameEngine {
    rows: usize,
    cols: usize,
    /// Body segments, with head at the front
    snake: VecDeque<Cell>,
    food: Option<Cell>,
    /// Front entry is the active direction, the rest are buffered turns
    directions: VecDeque<Direction>,
    status: GameStatus,
    tick: u64,
    rng: StdRng,
    listeners: Vec<Listener>,
}

impl GameEngine {
    /// Create a new engine for a `rows` x `cols` board
    pub fn new(rows: usize, cols: usize) -> Result<Self, GameError> {
        Self::with_rng(rows, cols, StdRng::from_entropy())
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(rows: usize, cols: usize, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(rows, cols, StdRng::seed_from_u64(seed))
    }

    pub fn from_config(config: &GameConfig) -> Result<Self, GameError> {
        Self::new(config.rows, config.cols)
    }

    fn with_rng(rows: usize, cols: usize, rng: StdRng) -> Result<Self, GameError> {
        if rows < MIN_BOARD_SIZE || cols < MIN_BOARD_SIZE {
            return Err(GameError::InvalidSize { rows, cols });
        }

        // Narrow boards start closer to the wall and see the food sooner
        let narrow = cols <= 6;
        let head = Cell::new((rows / 2) as i32, if narrow { 1 } else { 2 });
        let snake = VecDeque::from([head, head.moved(Direction::Left)]);
        let food = head.moved_by(0, if narrow { 2 } else { 3 });

        Ok(Self {
            rows,
            cols,
            snake,
            food: Some(food),
            directions: VecDeque::from([Direction::Right]),
            status: GameStatus::Running,
            tick: 0,
            rng,
            listeners: Vec::new(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Direction the snake is currently travelling in
    pub fn direction(&self) -> Direction {
        self.directions[0]
    }

    /// Every queued direction, active one first
    pub fn queued_directions(&self) -> Vec<Direction> {
        self.directions.iter().copied().collect()
    }

    /// The initial two-segment body is worth nothing
    pub fn score(&self) -> u32 {
        self.snake.len().saturating_sub(2) as u32
    }

    /// Copy of the current state
    pub fn state(&self) -> Snapshot {
        Snapshot {
            status: self.status,
            tick: self.tick,
            snake: self.snake.iter().copied().collect(),
            food: self.food,
            direction: self.direction(),
        }
    }

    /// Register a callback that receives every new snapshot
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&Snapshot) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Queue a turn.
    ///
    /// The turn is compared against the last queued direction rather than the
    /// active one, so two quick presses (up then left) are both honoured on
    /// the next two ticks. Reversals and overflow are silently dropped.
    pub fn change_direction(&mut self, direction: Direction) {
        let last = self.directions[self.directions.len() - 1];
        if last.is_opposite(direction) {
            return;
        }
        if self.directions.len() > MAX_PENDING_TURNS {
            return;
        }
        self.directions.push_back(direction);
    }

    /// Execute one tick of the game
    pub fn advance(&mut self) -> Result<Snapshot, GameError> {
        if self.status.is_terminal() {
            return Err(GameError::GameOver);
        }

        self.tick += 1;

        if self.directions.len() > 1 {
            self.directions.pop_front();
        }

        let new_head = self.snake[0].moved(self.direction());
        let ate_food = self.food == Some(new_head);

        // The tail cell is vacated this tick unless the snake grows
        let body_after_move = if ate_food {
            self.snake.len()
        } else {
            self.snake.len() - 1
        };
        let collided = !self.is_in_bounds(new_head)
            || self
                .snake
                .iter()
                .take(body_after_move)
                .any(|cell| *cell == new_head);

        if collided {
            // The tail is vacated before the move is judged; only the head is withheld
            if !ate_food {
                self.snake.pop_back();
            }
            self.status = GameStatus::GameOver;
            tracing::info!(tick = self.tick, score = self.score(), "game over");
        } else if ate_food {
            self.food = self.spawn_food(new_head);
            self.snake.push_front(new_head);
            match self.food {
                Some(food) => {
                    self.status = GameStatus::JustEaten;
                    tracing::debug!(
                        tick = self.tick,
                        row = food.row,
                        col = food.col,
                        "food eaten, respawned"
                    );
                }
                None => {
                    self.status = GameStatus::Won;
                    tracing::info!(tick = self.tick, score = self.score(), "board filled");
                }
            }
        } else {
            self.status = GameStatus::Running;
            self.snake.pop_back();
            self.snake.push_front(new_head);
        }

        let snapshot = self.state();
        for listener in &mut self.listeners {
            listener(&snapshot);
        }

        Ok(snapshot)
    }

    /// Check if a cell lies on the board
    pub fn is_in_bounds(&self, cell: Cell) -> bool {
        cell.row >= 0
            && (cell.row as usize) < self.rows
            && cell.col >= 0
            && (cell.col as usize) < self.cols
    }

    /// Pick a uniformly random empty cell, never the one just eaten.
    ///
    /// Called before the new head is pushed, so `eaten` is excluded explicitly.
    fn spawn_food(&mut self, eaten: Cell) -> Option<Cell> {
        let occupied: HashSet<Cell> = self.snake.iter().copied().collect();
        let candidates: Vec<Cell> = (0..self.rows as i32)
            .flat_map(|row| (0..self.cols as i32).map(move |col| Cell::new(row, col)))
            .filter(|cell| *cell != eaten && !occupied.contains(cell))
            .collect();

        candidates.choose(&mut self.rng).copied()
    }
}
