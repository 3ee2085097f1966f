use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Clear, Paragraph,
        canvas::{Canvas, Context, Painter, Shape},
    },
};

use super::interpolator::{Frame as BoardFrame, Joint, Point, Shade};

const GRID_LIGHT: Color = Color::Rgb(0x57, 0x57, 0x57);
const GRID_DARK: Color = Color::Rgb(0x5E, 0x5E, 0x5E);
const SNAKE_BODY: Color = Color::Rgb(0x6C, 0xD7, 0x57);
const SNAKE_HEAD: Color = Color::Rgb(0xFF, 0xAB, 0x00);
const FOOD: Color = Color::Rgb(0xE9, 0x69, 0x29);
const CROSS: Color = Color::Red;

/// Samples per joint curve when stroking it
const CURVE_STEPS: usize = 8;

/// Modal shown on top of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    /// Nothing played yet
    Start,
    Paused,
    GameOver,
    Won,
}

/// Text chrome around the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub score: u32,
    pub best_score: Option<u32>,
    pub elapsed: String,
    pub overlay: Overlay,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, board: Option<&BoardFrame>, hud: &Hud) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(hud), chunks[0]);

        if let Some(board) = board {
            let area = board_area(chunks[1], board);
            frame.render_widget(BoardCanvas::new(board, area).widget(), area);
        }

        if hud.overlay != Overlay::None {
            let modal = centered(chunks[1], 36, 9);
            frame.render_widget(Clear, modal);
            frame.render_widget(self.render_modal(hud), modal);
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_stats(&self, hud: &Hud) -> Paragraph<'_> {
        let best = hud
            .best_score
            .map(|best| best.to_string())
            .unwrap_or_else(|| "-".to_string());

        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                hud.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(best, Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(hud.elapsed.clone(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_modal(&self, hud: &Hud) -> Paragraph<'_> {
        let mut text = vec![Line::from("")];

        let (title, color) = match hud.overlay {
            Overlay::GameOver => (Some("GAME OVER"), Color::Red),
            Overlay::Won => (Some("BOARD CLEARED"), Color::Green),
            Overlay::Paused => (Some("PAUSED"), Color::Yellow),
            Overlay::Start | Overlay::None => (None, Color::White),
        };

        if let Some(title) = title {
            text.push(Line::from(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
        }

        if matches!(hud.overlay, Overlay::GameOver | Overlay::Won) {
            text.push(Line::from(vec![
                Span::styled("Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    hud.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
            if let Some(best) = hud.best_score {
                text.push(Line::from(vec![
                    Span::styled("Best Score: ", Style::default().fg(Color::Yellow)),
                    Span::styled(best.to_string(), Style::default().fg(Color::White)),
                ]));
            }
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "SPACE",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to start", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" / "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" / drag to move | "),
            Span::styled("P", Style::default().fg(Color::Yellow)),
            Span::raw(" pause | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest centered rect that shows the board with square half-block pixels
fn board_area(area: Rect, board: &BoardFrame) -> Rect {
    let cols = board.background.cols.max(1) as u16;
    let rows = board.background.rows.max(1) as u16;
    // A terminal cell holds one pixel across and two down
    let scale = (area.width / cols).min(area.height.saturating_mul(2) / rows).max(1);
    let width = (cols * scale).min(area.width);
    let height = (rows * scale).div_ceil(2).min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Rasterises a board frame onto a half-block canvas.
///
/// Canvas y grows upward, board y grows downward; `sample` does the flip.
struct BoardCanvas<'a> {
    board: &'a BoardFrame,
    /// Board pixels covered by one canvas dot
    dot_w: f64,
    dot_h: f64,
}

impl<'a> BoardCanvas<'a> {
    fn new(board: &'a BoardFrame, area: Rect) -> Self {
        let dots_x = f64::from(area.width.max(1));
        let dots_y = f64::from(area.height.max(1)) * 2.0;
        Self {
            board,
            dot_w: board.width / dots_x,
            dot_h: board.height / dots_y,
        }
    }

    fn widget(self) -> Canvas<'a, impl Fn(&mut Context) + 'a> {
        let (width, height) = (self.board.width, self.board.height);
        Canvas::default()
            .marker(Marker::HalfBlock)
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(move |ctx| ctx.draw(&self))
    }

    /// Paint every dot whose center lies in `[min, max]` and satisfies `inside`
    fn fill(
        &self,
        painter: &mut Painter,
        min: Point,
        max: Point,
        color: Color,
        inside: impl Fn(Point) -> bool,
    ) {
        let mut y = (min.y / self.dot_h).floor() * self.dot_h + self.dot_h / 2.0;
        while y <= max.y {
            let mut x = (min.x / self.dot_w).floor() * self.dot_w + self.dot_w / 2.0;
            while x <= max.x {
                let point = Point::new(x, y);
                if inside(point) {
                    self.sample(painter, point, color);
                }
                x += self.dot_w;
            }
            y += self.dot_h;
        }
    }

    fn sample(&self, painter: &mut Painter, point: Point, color: Color) {
        if let Some((x, y)) = painter.get_point(point.x, self.board.height - point.y) {
            painter.paint(x, y, color);
        }
    }

    fn fill_square(&self, painter: &mut Painter, origin: Point, size: f64, color: Color) {
        let max = Point::new(origin.x + size, origin.y + size);
        self.fill(painter, origin, max, color, |p| {
            p.x >= origin.x && p.x < max.x && p.y >= origin.y && p.y < max.y
        });
    }

    /// Thick line with round ends
    fn stroke(&self, painter: &mut Painter, from: Point, to: Point, radius: f64, color: Color) {
        let min = Point::new(from.x.min(to.x) - radius, from.y.min(to.y) - radius);
        let max = Point::new(from.x.max(to.x) + radius, from.y.max(to.y) + radius);
        self.fill(painter, min, max, color, |p| {
            distance_to_segment(p, from, to) <= radius
        });
    }

    fn stroke_joint(&self, painter: &mut Painter, joint: &Joint, radius: f64) {
        let mut last = joint.start;
        for step in 1..=CURVE_STEPS {
            let next = joint.point_at(step as f64 / CURVE_STEPS as f64);
            self.stroke(painter, last, next, radius, SNAKE_BODY);
            last = next;
        }
    }
}

impl Shape for BoardCanvas<'_> {
    fn draw(&self, painter: &mut Painter) {
        let board = self.board;
        let cell = board.cell_size;

        for (origin, shade) in board.background.tiles() {
            let color = match shade {
                Shade::Light => GRID_LIGHT,
                Shade::Dark => GRID_DARK,
            };
            self.fill_square(painter, origin, cell, color);
        }

        if let Some(food) = board.food {
            self.fill_square(painter, food, cell, FOOD);
        }

        let body_radius = cell * 0.45;
        for joint in &board.joints {
            self.stroke_joint(painter, joint, body_radius);
        }
        self.stroke(
            painter,
            board.tail.center,
            board.tail.anchor,
            board.tail.radius * 0.9,
            SNAKE_BODY,
        );

        self.fill_square(painter, board.head.origin, board.head.size, SNAKE_HEAD);
        if board.head.crossed {
            let width = self.dot_w.max(self.dot_h);
            for (from, to) in board.head.cross_lines() {
                self.stroke(painter, from, to, width, CROSS);
            }
        }
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}
