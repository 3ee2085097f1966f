use anyhow::{Context, Result};
use clap::Parser;
use smooth_snake::game::GameConfig;
use smooth_snake::layout::{compute_board_size, terminal_pixels};
use smooth_snake::modes::HumanMode;
use smooth_snake::storage::{JsonFileStore, MemoryStore, ScoreStore};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "smooth_snake")]
#[command(version, about = "Snake with smooth, interpolated movement")]
struct Cli {
    /// Board rows (default: fit the terminal)
    #[arg(long)]
    rows: Option<usize>,

    /// Board columns (default: fit the terminal)
    #[arg(long)]
    cols: Option<usize>,

    /// Milliseconds per game tick
    #[arg(long, default_value = "140")]
    tick_ms: u64,

    /// File holding the best score
    #[arg(long, default_value = ".smooth_snake/best_score.json")]
    best_score_file: PathBuf,

    /// Keep the best score in memory only
    #[arg(long)]
    no_save: bool,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file {:?}", path))?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "smooth_snake=info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .init();

    Ok(())
}

/// Rows and columns from the flags, filling gaps from the terminal size
fn board_dimensions(cli: &Cli) -> Result<(usize, usize)> {
    if let (Some(rows), Some(cols)) = (cli.rows, cli.cols) {
        return Ok((rows, cols));
    }

    let (term_cols, term_rows) =
        crossterm::terminal::size().context("Failed to read terminal size")?;
    let (width, height) = terminal_pixels(term_cols, term_rows);
    let fitted = compute_board_size(width, height);

    Ok((cli.rows.unwrap_or(fitted.rows), cli.cols.unwrap_or(fitted.cols)))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let (rows, cols) = board_dimensions(&cli)?;
    let config = GameConfig::new(rows, cols).with_tick_ms(cli.tick_ms);

    let store: Box<dyn ScoreStore> = if cli.no_save {
        Box::new(MemoryStore::new())
    } else {
        Box::new(JsonFileStore::new(&cli.best_score_file))
    };

    let mut human_mode = HumanMode::new(config, store)?;
    human_mode.run().await?;

    Ok(())
}
