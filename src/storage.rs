//! Best-score persistence
//!
//! The game core never touches storage. The shell reads the best score once at
//! startup and offers every finished session's score through [`record_score`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the best score lives
pub trait ScoreStore {
    /// `None` when nothing has been recorded yet
    fn best_score(&self) -> Result<Option<u32>>;

    fn set_best_score(&mut self, score: u32) -> Result<()>;
}

/// Store `score` if it beats the recorded best.
///
/// Returns true when the stored value changed.
pub fn record_score(store: &mut dyn ScoreStore, score: u32) -> Result<bool> {
    let improved = match store.best_score()? {
        Some(best) => score > best,
        None => true,
    };

    if improved {
        store.set_best_score(score)?;
        tracing::info!(score, "new best score");
    }

    Ok(improved)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BestScoreRecord {
    best_score: u32,
}

/// Best score kept as a small JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn best_score(&self) -> Result<Option<u32>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read best score from {:?}", self.path))?;
        let record: BestScoreRecord = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse best score file {:?}", self.path))?;

        Ok(Some(record.best_score))
    }

    fn set_best_score(&mut self, score: u32) -> Result<()> {
        // Create parent directories if needed
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(&BestScoreRecord { best_score: score })
            .context("Failed to serialize best score")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write best score to {:?}", self.path))?;

        Ok(())
    }
}

/// Process-local store, used when persistence is disabled and in tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: Option<u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn best_score(&self) -> Result<Option<u32>> {
        Ok(self.best)
    }

    fn set_best_score(&mut self, score: u32) -> Result<()> {
        self.best = Some(score);
        Ok(())
    }
}
