use std::time::{Duration, Instant};

/// Session clock and per-process score bookkeeping for the HUD
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    /// Best score known to this process, seeded from the score store
    pub best_score: Option<u32>,
    pub games_played: u32,
    /// Time spent paused in the current session
    paused_for: Duration,
    paused_at: Option<Instant>,
}

impl GameMetrics {
    pub fn new(best_score: Option<u32>) -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            best_score,
            games_played: 0,
            paused_for: Duration::ZERO,
            paused_at: None,
        }
    }

    pub fn update(&mut self) {
        if self.paused_at.is_none() {
            self.elapsed_time = self.start_time.elapsed().saturating_sub(self.paused_for);
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.paused_for = Duration::ZERO;
        self.paused_at = None;
    }

    /// Stop the clock
    pub fn on_pause(&mut self) {
        self.update();
        self.paused_at.get_or_insert_with(Instant::now);
    }

    pub fn on_resume(&mut self) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_for += paused_at.elapsed();
        }
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        if self.best_score.is_none_or(|best| final_score > best) {
            self.best_score = Some(final_score);
        }
        self.on_pause();
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new(None)
    }
}
