//! Frame interpolation between two engine snapshots
//!
//! The engine moves in whole cells once per tick. The interpolator keeps the
//! last two snapshots and, given how far the current tick has progressed,
//! produces a [`Frame`] in pixel space where the head and tail glide between
//! cells instead of snapping. Everything here is pure data; painting is left to
//! [`crate::render::Renderer`].

use std::time::Duration;

use crate::game::{Cell, Direction, GameStatus, Snapshot};

/// A position in pixel space, y grows downward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn offset(self, direction: Direction, by: f64) -> Point {
        let (d_row, d_col) = direction.delta();
        Point::new(self.x + d_col as f64 * by, self.y + d_row as f64 * by)
    }
}

/// Colour class of a background tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    Light,
    Dark,
}

/// Static checkerboard drawn under everything else
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Checkerboard {
    pub rows: usize,
    pub cols: usize,
    pub cell_size: f64,
}

impl Checkerboard {
    pub fn tile_at(&self, row: usize, col: usize) -> Shade {
        if (row & 1) == (col & 1) {
            Shade::Light
        } else {
            Shade::Dark
        }
    }

    /// Top-left corner and shade of every tile, row by row
    pub fn tiles(&self) -> impl Iterator<Item = (Point, Shade)> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.cols).map(move |col| {
                let origin = Point::new(col as f64 * self.cell_size, row as f64 * self.cell_size);
                (origin, self.tile_at(row, col))
            })
        })
    }
}

/// The head square
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadSprite {
    /// Top-left corner
    pub origin: Point,
    pub size: f64,
    /// Draw the game-over cross on top
    pub crossed: bool,
}

impl HeadSprite {
    pub fn center(&self) -> Point {
        Point::new(self.origin.x + self.size / 2.0, self.origin.y + self.size / 2.0)
    }

    /// The two diagonals of the game-over cross
    pub fn cross_lines(&self) -> [(Point, Point); 2] {
        let Point { x, y } = self.origin;
        let s = self.size;
        [
            (Point::new(x, y), Point::new(x + s, y + s)),
            (Point::new(x + s, y), Point::new(x, y + s)),
        ]
    }
}

/// Rounded body piece covering one interior cell.
///
/// Runs from the edge shared with the previous cell, through the cell
/// center, to the edge shared with the next cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    pub start: Point,
    pub through: Point,
    pub end: Point,
}

impl Joint {
    /// True when the snake turns inside this cell
    pub fn is_bend(&self) -> bool {
        let straight_x = (self.start.x - self.end.x).abs() < f64::EPSILON;
        let straight_y = (self.start.y - self.end.y).abs() < f64::EPSILON;
        !(straight_x || straight_y)
    }

    /// Point on the quadratic curve hitting `start` at 0, `through` at 0.5 and `end` at 1
    pub fn point_at(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        let control = Point::new(
            2.0 * self.through.x - (self.start.x + self.end.x) / 2.0,
            2.0 * self.through.y - (self.start.y + self.end.y) / 2.0,
        );
        let u = 1.0 - t;
        Point::new(
            u * u * self.start.x + 2.0 * u * t * control.x + t * t * self.end.x,
            u * u * self.start.y + 2.0 * u * t * control.y + t * t * self.end.y,
        )
    }
}

/// Rounded end of the snake.
///
/// Drawn as a thick stroke with round ends from `center` to `anchor`, where
/// `anchor` is the edge the tail shares with the segment in front of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TailCap {
    pub center: Point,
    pub anchor: Point,
    pub radius: f64,
}

/// Everything needed to paint one display frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub cell_size: f64,
    pub status: GameStatus,
    /// Clamped progress this frame was computed for
    pub progress: f64,
    pub background: Checkerboard,
    /// Top-left corner of the food square
    pub food: Option<Point>,
    /// Interior segments, head side first
    pub joints: Vec<Joint>,
    pub tail: TailCap,
    pub head: HeadSprite,
}

/// Holds the previous and current snapshot and produces frames between them
#[derive(Debug, Clone)]
pub struct FrameInterpolator {
    rows: usize,
    cols: usize,
    cell_size: f64,
    previous: Option<Snapshot>,
    current: Option<Snapshot>,
}

impl FrameInterpolator {
    pub fn new(rows: usize, cols: usize, cell_size: f64) -> Self {
        Self {
            rows,
            cols,
            cell_size,
            previous: None,
            current: None,
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn previous(&self) -> Option<&Snapshot> {
        self.previous.as_ref()
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    /// Fraction of the tick period that has elapsed, clamped to `[0, 1]`
    pub fn progress_for(elapsed: Duration, tick_period: Duration) -> f64 {
        if tick_period.is_zero() {
            return 1.0;
        }
        clamp_progress(elapsed.as_secs_f64() / tick_period.as_secs_f64())
    }

    /// Accept a snapshot from the engine.
    ///
    /// A snapshot for a new tick pushes the held one back to `previous`. A
    /// re-delivery of the same tick only replaces `current`.
    pub fn on_snapshot(&mut self, snapshot: Snapshot) {
        match self.current.take() {
            Some(held) if held.tick != snapshot.tick => self.previous = Some(held),
            _ => {}
        }
        self.current = Some(snapshot);
    }

    /// Compute the frame at `progress` through the current tick.
    ///
    /// Returns `None` until a first snapshot with a body has arrived. A
    /// previous snapshot without a body is ignored.
    pub fn frame_at(&self, progress: f64) -> Option<Frame> {
        let current = self.current.as_ref()?;
        let (head_cell, tail_cell) = (current.head()?, current.tail()?);
        let previous = self
            .previous
            .as_ref()
            .and_then(|previous| Some((previous.head()?, previous.tail()?)));
        let progress = match previous {
            Some(_) => clamp_progress(progress),
            None => 1.0,
        };
        let offset = progress * self.cell_size;

        let head = match (previous, current.status) {
            (_, GameStatus::GameOver) => HeadSprite {
                origin: self.origin(head_cell),
                size: self.cell_size,
                crossed: true,
            },
            (Some((previous_head, _)), _) => HeadSprite {
                origin: self.slide(previous_head, head_cell, offset),
                size: self.cell_size,
                crossed: false,
            },
            (None, _) => HeadSprite {
                origin: self.origin(head_cell),
                size: self.cell_size,
                crossed: false,
            },
        };

        // The tail only moves on plain ticks; eating or dying leaves it in place
        let tail_center = match previous {
            Some((_, previous_tail)) if current.status == GameStatus::Running => {
                let origin = self.slide(previous_tail, tail_cell, offset);
                Point::new(
                    origin.x + self.cell_size / 2.0,
                    origin.y + self.cell_size / 2.0,
                )
            }
            _ => self.center(tail_cell),
        };
        let tail_anchor = match current.snake.len() {
            0 | 1 => tail_center,
            len => self
                .center(current.snake[len - 1])
                .midpoint(self.center(current.snake[len - 2])),
        };

        let joints = current
            .snake
            .windows(3)
            .map(|cells| {
                let (a, b, c) = (self.center(cells[0]), self.center(cells[1]), self.center(cells[2]));
                Joint {
                    start: a.midpoint(b),
                    through: b,
                    end: b.midpoint(c),
                }
            })
            .collect();

        Some(Frame {
            width: self.cols as f64 * self.cell_size,
            height: self.rows as f64 * self.cell_size,
            cell_size: self.cell_size,
            status: current.status,
            progress,
            background: Checkerboard {
                rows: self.rows,
                cols: self.cols,
                cell_size: self.cell_size,
            },
            food: current.food.map(|food| self.origin(food)),
            joints,
            tail: TailCap {
                center: tail_center,
                anchor: tail_anchor,
                radius: self.cell_size / 2.0,
            },
            head,
        })
    }

    /// Top-left corner of a cell
    fn origin(&self, cell: Cell) -> Point {
        Point::new(
            cell.col as f64 * self.cell_size,
            cell.row as f64 * self.cell_size,
        )
    }

    fn center(&self, cell: Cell) -> Point {
        let origin = self.origin(cell);
        Point::new(
            origin.x + self.cell_size / 2.0,
            origin.y + self.cell_size / 2.0,
        )
    }

    /// Top-left corner of a square that has travelled `offset` pixels from
    /// `from` toward the neighbouring cell `to`
    fn slide(&self, from: Cell, to: Cell, offset: f64) -> Point {
        match Direction::between(from, to) {
            Some(direction) => self.origin(from).offset(direction, offset),
            // Not neighbours (or the same cell): nothing to glide along
            None => self.origin(to),
        }
    }
}

fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        1.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: f64 = 40.0;

    fn snapshot(tick: u64, status: GameStatus, snake: &[(i32, i32)]) -> Snapshot {
        Snapshot {
            status,
            tick,
            snake: snake.iter().map(|&(r, c)| Cell::new(r, c)).collect(),
            food: Some(Cell::new(0, 0)),
            direction: Direction::Right,
        }
    }

    fn interpolator() -> FrameInterpolator {
        FrameInterpolator::new(10, 10, CELL)
    }

    #[test]
    fn test_no_snapshot_no_frame() {
        assert!(interpolator().frame_at(0.5).is_none());
    }

    #[test]
    fn test_empty_body_draws_nothing() {
        let mut interp = interpolator();
        interp.on_snapshot(snapshot(1, GameStatus::Running, &[]));
        assert!(interp.frame_at(0.5).is_none());

        // An empty previous snapshot is skipped, the next one is drawn statically
        interp.on_snapshot(snapshot(2, GameStatus::Running, &[(4, 5), (4, 4)]));
        let frame = interp.frame_at(0.5).unwrap();
        assert_eq!(frame.progress, 1.0);
        assert_eq!(frame.head.origin, Point::new(200.0, 160.0));
    }

    #[test]
    fn test_head_slides_half_a_cell() {
        let mut interp = interpolator();
        interp.on_snapshot(snapshot(1, GameStatus::Running, &[(4, 4), (4, 3)]));
        interp.on_snapshot(snapshot(2, GameStatus::Running, &[(4, 5), (4, 4)]));

        let frame = interp.frame_at(0.5).unwrap();
        assert_eq!(frame.head.origin, Point::new(4.0 * CELL + 20.0, 4.0 * CELL));
        assert!(!frame.head.crossed);
    }

    #[test]
    fn test_head_slides_vertically() {
        let mut interp = interpolator();
        interp.on_snapshot(snapshot(1, GameStatus::Running, &[(4, 4), (4, 3)]));
        interp.on_snapshot(snapshot(2, GameStatus::Running, &[(3, 4), (4, 4)]));

        let frame = interp.frame_at(0.25).unwrap();
        assert_eq!(frame.head.origin, Point::new(160.0, 150.0));
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut interp = interpolator();
        interp.on_snapshot(snapshot(1, GameStatus::Running, &[(4, 4), (4, 3)]));
        interp.on_snapshot(snapshot(2, GameStatus::Running, &[(4, 5), (4, 4)]));

        let over = interp.frame_at(3.0).unwrap();
        assert_eq!(over.progress, 1.0);
        assert_eq!(over.head.origin, Point::new(200.0, 160.0));

        let under = interp.frame_at(-1.0).unwrap();
        assert_eq!(under.progress, 0.0);
        assert_eq!(under.head.origin, Point::new(160.0, 160.0));

        assert_eq!(interp.frame_at(f64::NAN).unwrap().progress, 1.0);
    }

    #[test]
    fn test_first_snapshot_is_drawn_statically() {
        let mut interp = interpolator();
        interp.on_snapshot(snapshot(0, GameStatus::Running, &[(5, 2), (5, 1)]));

        let frame = interp.frame_at(0.0).unwrap();
        assert_eq!(frame.progress, 1.0);
        assert_eq!(frame.head.origin, Point::new(80.0, 200.0));
        assert_eq!(frame.tail.center, Point::new(60.0, 220.0));
    }

    #[test]
    fn test_same_tick_redelivery_keeps_previous() {
        let mut interp = interpolator();
        let first = snapshot(1, GameStatus::Running, &[(4, 4), (4, 3)]);
        let second = snapshot(2, GameStatus::Running, &[(4, 5), (4, 4)]);
        interp.on_snapshot(first.clone());
        interp.on_snapshot(second.clone());
        interp.on_snapshot(second.clone());

        assert_eq!(interp.previous(), Some(&first));
        assert_eq!(interp.current(), Some(&second));
    }

    #[test]
    fn test_new_tick_demotes_current() {
        let mut interp = interpolator();
        let first = snapshot(1, GameStatus::Running, &[(4, 4), (4, 3)]);
        interp.on_snapshot(first.clone());
        assert!(interp.previous().is_none());

        interp.on_snapshot(snapshot(2, GameStatus::Running, &[(4, 5), (4, 4)]));
        assert_eq!(interp.previous(), Some(&first));
    }

    #[test]
    fn test_tail_slides_on_plain_tick() {
        let mut interp = interpolator();
        interp.on_snapshot(snapshot(1, GameStatus::Running, &[(4, 4), (4, 3), (4, 2)]));
        interp.on_snapshot(snapshot(2, GameStatus::Running, &[(4, 5), (4, 4), (4, 3)]));

        let frame = interp.frame_at(0.5).unwrap();
        // Previous tail center (4,2) is x = 100, moved 20 px right
        assert_eq!(frame.tail.center, Point::new(120.0, 180.0));
        // Anchored on the edge between the tail (4,3) and (4,4)
        assert_eq!(frame.tail.anchor, Point::new(160.0, 180.0));
        assert_eq!(frame.tail.radius, 20.0);
    }

    #[test]
    fn test_tail_holds_when_eaten() {
        let mut interp = interpolator();
        interp.on_snapshot(snapshot(1, GameStatus::Running, &[(4, 4), (4, 3)]));
        interp.on_snapshot(snapshot(2, GameStatus::JustEaten, &[(4, 5), (4, 4), (4, 3)]));

        let frame = interp.frame_at(0.5).unwrap();
        assert_eq!(frame.tail.center, Point::new(140.0, 180.0));
        // The head still glides
        assert_eq!(frame.head.origin, Point::new(180.0, 160.0));
    }

    #[test]
    fn test_game_over_draws_cross_statically() {
        let mut interp = interpolator();
        interp.on_snapshot(snapshot(1, GameStatus::Running, &[(4, 9), (4, 8), (4, 7)]));
        // Hitting the wall vacates the tail but keeps the head in place
        interp.on_snapshot(snapshot(2, GameStatus::GameOver, &[(4, 9), (4, 8)]));

        let frame = interp.frame_at(0.5).unwrap();
        assert!(frame.head.crossed);
        assert_eq!(frame.head.origin, Point::new(360.0, 160.0));
        assert_eq!(frame.tail.center, Point::new(340.0, 180.0));

        let [(a, b), (c, d)] = frame.head.cross_lines();
        assert_eq!((a, b), (Point::new(360.0, 160.0), Point::new(400.0, 200.0)));
        assert_eq!((c, d), (Point::new(400.0, 160.0), Point::new(360.0, 200.0)));
    }

    #[test]
    fn test_joints_cover_interior_cells() {
        let mut interp = interpolator();
        interp.on_snapshot(snapshot(
            3,
            GameStatus::Running,
            &[(2, 3), (2, 2), (3, 2), (4, 2)],
        ));

        let frame = interp.frame_at(1.0).unwrap();
        assert_eq!(frame.joints.len(), 2);

        let corner = frame.joints[0];
        assert!(corner.is_bend());
        assert_eq!(corner.start, Point::new(120.0, 100.0));
        assert_eq!(corner.through, Point::new(100.0, 100.0));
        assert_eq!(corner.end, Point::new(100.0, 120.0));
        assert_eq!(corner.point_at(0.5), corner.through);
        assert_eq!(corner.point_at(0.0), corner.start);
        assert_eq!(corner.point_at(1.0), corner.end);

        assert!(!frame.joints[1].is_bend());
    }

    #[test]
    fn test_two_segment_snake_has_no_joints() {
        let mut interp = interpolator();
        interp.on_snapshot(snapshot(0, GameStatus::Running, &[(5, 2), (5, 1)]));
        assert!(interp.frame_at(1.0).unwrap().joints.is_empty());
    }

    #[test]
    fn test_food_is_static() {
        let mut interp = interpolator();
        let mut first = snapshot(1, GameStatus::Running, &[(4, 4), (4, 3)]);
        first.food = Some(Cell::new(1, 1));
        let mut second = snapshot(2, GameStatus::JustEaten, &[(4, 5), (4, 4), (4, 3)]);
        second.food = Some(Cell::new(7, 2));
        interp.on_snapshot(first);
        interp.on_snapshot(second);

        let frame = interp.frame_at(0.1).unwrap();
        assert_eq!(frame.food, Some(Point::new(80.0, 280.0)));
    }

    #[test]
    fn test_won_board_has_no_food() {
        let mut interp = interpolator();
        let mut won = snapshot(9, GameStatus::Won, &[(4, 5), (4, 4), (4, 3)]);
        won.food = None;
        interp.on_snapshot(won);
        assert_eq!(interp.frame_at(1.0).unwrap().food, None);
    }

    #[test]
    fn test_checkerboard_alternates() {
        let board = Checkerboard {
            rows: 2,
            cols: 2,
            cell_size: CELL,
        };
        assert_eq!(board.tile_at(0, 0), Shade::Light);
        assert_eq!(board.tile_at(0, 1), Shade::Dark);
        assert_eq!(board.tile_at(1, 0), Shade::Dark);
        assert_eq!(board.tile_at(1, 1), Shade::Light);
        assert_eq!(board.tiles().count(), 4);
    }

    #[test]
    fn test_progress_for_elapsed_time() {
        let period = Duration::from_millis(140);
        assert_eq!(
            FrameInterpolator::progress_for(Duration::from_millis(70), period),
            0.5
        );
        assert_eq!(
            FrameInterpolator::progress_for(Duration::from_millis(500), period),
            1.0
        );
        assert_eq!(
            FrameInterpolator::progress_for(Duration::from_millis(5), Duration::ZERO),
            1.0
        );
    }
}
