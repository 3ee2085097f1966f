use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::interval;

use crate::game::{GameConfig, GameEngine, GameStatus, Snapshot};
use crate::input::{InputHandler, KeyAction, SwipeTracker};
use crate::layout::terminal_pixels;
use crate::metrics::GameMetrics;
use crate::render::{FrameInterpolator, Hud, Overlay, Renderer};
use crate::storage::{ScoreStore, record_score};

/// Where the session currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Board shown, waiting for the first start
    Ready,
    Playing,
    Paused,
    /// Game over or board cleared
    Finished,
}

pub struct HumanMode {
    config: GameConfig,
    engine: GameEngine,
    interpolator: FrameInterpolator,
    store: Box<dyn ScoreStore>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    swipe: SwipeTracker,
    phase: Phase,
    /// When the current tick's snapshot arrived
    tick_started: Instant,
    /// Progress held while paused
    frozen_progress: Option<f64>,
    /// Delay the tick timer must be re-armed with before its next tick
    next_tick_in: Option<Duration>,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, store: Box<dyn ScoreStore>) -> Result<Self> {
        let engine = GameEngine::from_config(&config).context("Failed to create game")?;
        let interpolator = Self::interpolator_for(&config, &engine);

        let best_score = store.best_score().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "could not read best score");
            None
        });

        Ok(Self {
            config,
            engine,
            interpolator,
            store,
            metrics: GameMetrics::new(best_score),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            swipe: SwipeTracker::default(),
            phase: Phase::Ready,
            tick_started: Instant::now(),
            frozen_progress: Some(1.0),
            next_tick_in: None,
            should_quit: false,
        })
    }

    fn interpolator_for(config: &GameConfig, engine: &GameEngine) -> FrameInterpolator {
        let mut interpolator = FrameInterpolator::new(config.rows, config.cols, config.cell_size);
        interpolator.on_snapshot(engine.state());
        interpolator
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        tracing::info!(
            rows = self.config.rows,
            cols = self.config.cols,
            tick_ms = self.config.tick_ms,
            "starting human mode"
        );

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Logic and animation must agree on this period
        let mut tick_timer = interval(self.config.tick_period());

        // Render at ~60 FPS
        let render_interval = Duration::from_millis(16);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    if self.phase == Phase::Playing {
                        self.update_game()?;
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let board = self.interpolator.frame_at(self.progress());
                    let hud = self.hud();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, board.as_ref(), &hud);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if let Some(delay) = self.next_tick_in.take() {
                tick_timer.reset_after(delay);
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return Ok(());
                }

                let action = self.input_handler.handle_key_event(key);
                self.apply(action)
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => Ok(()),
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        let (x, y) = terminal_pixels(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.swipe.begin(x, y);
                Ok(())
            }
            MouseEventKind::Drag(MouseButton::Left) => match self.swipe.track(x, y) {
                Some(direction) => self.apply(KeyAction::Turn(direction)),
                None => Ok(()),
            },
            // A tap on a waiting board starts it
            MouseEventKind::Up(MouseButton::Left) => {
                if self.swipe.end() && matches!(self.phase, Phase::Ready | Phase::Finished) {
                    self.apply(KeyAction::Start)
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    fn apply(&mut self, action: KeyAction) -> Result<()> {
        match action {
            KeyAction::Turn(direction) => {
                if self.phase != Phase::Finished {
                    self.engine.change_direction(direction);
                }
            }
            KeyAction::Start => match self.phase {
                Phase::Ready | Phase::Paused => self.resume(),
                Phase::Finished => self.restart()?,
                Phase::Playing => {}
            },
            KeyAction::TogglePause => match self.phase {
                Phase::Playing => self.pause(),
                Phase::Paused => self.resume(),
                Phase::Ready | Phase::Finished => {}
            },
            KeyAction::Restart => self.restart()?,
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }

        Ok(())
    }

    fn update_game(&mut self) -> Result<()> {
        let snapshot = self
            .engine
            .advance()
            .context("Game ticked after it had ended")?;

        self.interpolator.on_snapshot(snapshot.clone());
        self.tick_started = Instant::now();

        if snapshot.status.is_terminal() {
            self.finish_game(&snapshot);
        }

        Ok(())
    }

    fn finish_game(&mut self, snapshot: &Snapshot) {
        let score = snapshot.score();
        self.phase = Phase::Finished;
        self.frozen_progress = Some(1.0);
        self.metrics.on_game_over(score);

        // A failed write costs the record, not the session
        if let Err(err) = record_score(self.store.as_mut(), score) {
            tracing::warn!(error = %err, score, "could not save best score");
        }
    }

    /// Replace engine and interpolator wholesale and start playing
    fn restart(&mut self) -> Result<()> {
        self.engine = GameEngine::from_config(&self.config).context("Failed to create game")?;
        self.interpolator = Self::interpolator_for(&self.config, &self.engine);
        self.metrics.on_game_start();
        self.phase = Phase::Playing;
        self.frozen_progress = None;
        self.tick_started = Instant::now();
        self.next_tick_in = Some(self.config.tick_period());
        tracing::debug!("session restarted");
        Ok(())
    }

    fn pause(&mut self) {
        self.frozen_progress = Some(self.progress());
        self.phase = Phase::Paused;
        self.metrics.on_pause();
    }

    fn resume(&mut self) {
        let held = self.frozen_progress.take().unwrap_or(1.0);
        // A fresh board starts a whole tick, a paused one continues its tick
        let progress = if self.phase == Phase::Ready {
            self.metrics.on_game_start();
            0.0
        } else {
            self.metrics.on_resume();
            held
        };
        // Continue the glide from where it stopped and tick once it completes
        let period = self.config.tick_period();
        let elapsed = period.mul_f64(progress);
        self.tick_started = Instant::now()
            .checked_sub(elapsed)
            .unwrap_or_else(Instant::now);
        self.phase = Phase::Playing;
        self.next_tick_in = Some(period.saturating_sub(elapsed));
    }

    fn progress(&self) -> f64 {
        match self.frozen_progress {
            Some(progress) => progress,
            None => FrameInterpolator::progress_for(
                self.tick_started.elapsed(),
                self.config.tick_period(),
            ),
        }
    }

    fn hud(&self) -> Hud {
        let overlay = match self.phase {
            Phase::Ready => Overlay::Start,
            Phase::Playing => Overlay::None,
            Phase::Paused => Overlay::Paused,
            Phase::Finished if self.engine.status() == GameStatus::Won => Overlay::Won,
            Phase::Finished => Overlay::GameOver,
        };

        Hud {
            score: self.engine.score(),
            best_score: self.metrics.best_score,
            elapsed: self.metrics.format_time(),
            overlay,
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;
    use crate::storage::MemoryStore;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn mode(config: GameConfig) -> HumanMode {
        HumanMode::new(config, Box::new(MemoryStore::new())).unwrap()
    }

    fn key(mode: &mut HumanMode, code: KeyCode) {
        mode.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
            .unwrap();
    }

    fn mouse(mode: &mut HumanMode, kind: MouseEventKind, column: u16, row: u16) {
        mode.handle_event(Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }))
        .unwrap();
    }

    /// Steer into the top wall and tick until the session ends
    fn crash(mode: &mut HumanMode) {
        key(mode, KeyCode::Up);
        while mode.phase == Phase::Playing {
            mode.update_game().unwrap();
        }
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode(GameConfig::default());
        assert_eq!(mode.phase, Phase::Ready);
        assert_eq!(mode.engine.score(), 0);
        assert_eq!(mode.hud().overlay, Overlay::Start);
        assert!(mode.interpolator.frame_at(0.0).is_some());
    }

    #[test]
    fn test_rejects_invalid_board() {
        assert!(HumanMode::new(GameConfig::new(3, 3), Box::new(MemoryStore::new())).is_err());
    }

    #[test]
    fn test_space_starts_playing() {
        let mut mode = mode(GameConfig::small());
        key(&mut mode, KeyCode::Char(' '));
        assert_eq!(mode.phase, Phase::Playing);
        assert_eq!(mode.hud().overlay, Overlay::None);

        mode.update_game().unwrap();
        assert_eq!(mode.engine.tick(), 1);
        assert_eq!(mode.interpolator.current().unwrap().tick, 1);
        assert_eq!(mode.interpolator.previous().unwrap().tick, 0);
    }

    #[test]
    fn test_pause_freezes_progress() {
        let mut mode = mode(GameConfig::small());
        key(&mut mode, KeyCode::Char(' '));
        key(&mut mode, KeyCode::Char('p'));
        assert_eq!(mode.phase, Phase::Paused);
        assert_eq!(mode.hud().overlay, Overlay::Paused);

        let held = mode.progress();
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(mode.progress(), held);

        key(&mut mode, KeyCode::Char('p'));
        assert_eq!(mode.phase, Phase::Playing);
        assert!(mode.frozen_progress.is_none());
    }

    #[test]
    fn test_resume_mid_tick_waits_only_for_the_rest() {
        let mut mode = mode(GameConfig::small().with_tick_ms(200));
        key(&mut mode, KeyCode::Char(' '));
        assert_eq!(mode.next_tick_in, Some(Duration::from_millis(200)));
        mode.next_tick_in = None;

        key(&mut mode, KeyCode::Char('p'));
        mode.frozen_progress = Some(0.25);
        key(&mut mode, KeyCode::Char('p'));

        let delay = mode.next_tick_in.unwrap();
        assert!(
            delay > Duration::from_millis(149) && delay < Duration::from_millis(151),
            "delay {delay:?}"
        );
        let progress = mode.progress();
        assert!((0.2..0.5).contains(&progress), "progress {progress}");
    }

    #[test]
    fn test_game_over_records_best_score() {
        let mut mode = mode(GameConfig::small());
        key(&mut mode, KeyCode::Char(' '));
        crash(&mut mode);

        assert_eq!(mode.phase, Phase::Finished);
        assert_eq!(mode.hud().overlay, Overlay::GameOver);
        assert_eq!(mode.store.best_score().unwrap(), Some(0));
        assert_eq!(mode.metrics.best_score, Some(0));
        assert_eq!(mode.metrics.games_played, 1);
    }

    #[test]
    fn test_start_after_game_over_replaces_engine() {
        let mut mode = mode(GameConfig::small());
        key(&mut mode, KeyCode::Char(' '));
        crash(&mut mode);

        key(&mut mode, KeyCode::Char(' '));
        assert_eq!(mode.phase, Phase::Playing);
        assert_eq!(mode.engine.tick(), 0);
        assert_eq!(mode.engine.status(), GameStatus::Running);
        assert!(mode.interpolator.previous().is_none());
    }

    #[test]
    fn test_turns_ignored_after_game_over() {
        let mut mode = mode(GameConfig::small());
        key(&mut mode, KeyCode::Char(' '));
        crash(&mut mode);
        let queued = mode.engine.queued_directions();

        key(&mut mode, KeyCode::Left);
        assert_eq!(mode.engine.queued_directions(), queued);
    }

    #[test]
    fn test_drag_turns_snake() {
        let mut mode = mode(GameConfig::small());
        key(&mut mode, KeyCode::Char(' '));

        mouse(&mut mode, MouseEventKind::Down(MouseButton::Left), 10, 10);
        // 5 rows down is 80 px, past the threshold
        mouse(&mut mode, MouseEventKind::Drag(MouseButton::Left), 10, 15);

        assert_eq!(
            mode.engine.queued_directions(),
            vec![Direction::Right, Direction::Down]
        );
    }

    #[test]
    fn test_tap_starts_waiting_board() {
        let mut mode = mode(GameConfig::small());
        mouse(&mut mode, MouseEventKind::Down(MouseButton::Left), 3, 3);
        mouse(&mut mode, MouseEventKind::Up(MouseButton::Left), 3, 3);
        assert_eq!(mode.phase, Phase::Playing);
    }

    #[test]
    fn test_quit() {
        let mut mode = mode(GameConfig::small());
        key(&mut mode, KeyCode::Char('q'));
        assert!(mode.should_quit);
    }
}
