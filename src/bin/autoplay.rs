//! Headless greedy player.
//!
//! Drives a [`GameEngine`] through complete games: cash in any available
//! line, else play a winning selection, else reload. Useful for soak-testing
//! the engine and for eyeballing score distributions.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use rust_bingo::core::{BoardState, EngineConfig, EngineError};
use rust_bingo::engine::{FileStore, GameEngine, GameStore, MemoryStore};
use rust_bingo::eval::find_selection;
use rust_bingo::rules::GameMode;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    Additive,
    Positional,
}

/// Play number bingo with a greedy bot
#[derive(Parser, Debug)]
#[command(name = "autoplay")]
#[command(about = "Play number bingo with a greedy bot", long_about = None)]
struct Args {
    /// Rule set to play
    #[arg(long, value_enum, default_value = "additive")]
    mode: Mode,

    /// Number of games to play
    #[arg(short, long, default_value = "10")]
    games: usize,

    /// RNG seed; omitted seeds from the OS
    #[arg(long)]
    seed: Option<u64>,

    /// Save file; the first game resumes it when present
    #[arg(long)]
    save: Option<PathBuf>,

    /// Give up on a game after this many moves
    #[arg(long, default_value = "500")]
    max_moves: usize,
}

#[derive(Debug, Default)]
struct GameSummary {
    score: u32,
    turns: u32,
    moves: usize,
    finished: bool,
}

#[tokio::main]
async fn main() -> Result<(), EngineError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mode = match args.mode {
        Mode::Additive => GameMode::additive(),
        Mode::Positional => GameMode::positional(),
    };

    let mut config = EngineConfig::default().with_grace_period(None);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let store: Arc<dyn GameStore> = match &args.save {
        Some(path) => Arc::new(FileStore::new(path)),
        None => {
            config = config.with_persistence(false);
            Arc::new(MemoryStore::new())
        }
    };

    let engine = GameEngine::new(mode, config, store);
    info!(games = args.games, mode = %engine.mode().kind, "autoplay starting");

    let mut results = Vec::with_capacity(args.games);
    for game in 0..args.games {
        if game == 0 {
            engine.initial_load().await?;
        } else {
            engine.new_game().await?;
        }
        let summary = play(&engine, args.max_moves).await?;
        info!(game, score = summary.score, turns = summary.turns, moves = summary.moves, "game finished");
        if !summary.finished {
            warn!(game, "move cap reached");
        }
        results.push(summary);
    }
    engine.flush().await;

    let total: u64 = results.iter().map(|r| u64::from(r.score)).sum();
    let best = results.iter().map(|r| r.score).max().unwrap_or(0);
    let capped = results.iter().filter(|r| !r.finished).count();
    println!("Games:      {}", results.len());
    println!("Best score: {best}");
    if !results.is_empty() {
        println!("Mean score: {:.1}", total as f64 / results.len() as f64);
    }
    println!("Move cap:   {capped}");
    Ok(())
}

async fn play(engine: &GameEngine, max_moves: usize) -> Result<GameSummary, EngineError> {
    let mode = engine.mode().clone();
    let size = mode.size();
    let mut summary = GameSummary::default();
    // Set when a drag failed to score; cleared once the board changes
    let mut skip_lines = false;

    while summary.moves < max_moves {
        let state = engine.snapshot();
        if state.board_state == BoardState::GameOver {
            summary.finished = true;
            break;
        }
        summary.moves += 1;

        let line = state
            .available_lines
            .first()
            .filter(|_| !skip_lines && state.board_state.accepts_drag());
        if let Some(line) = line {
            debug!(%line, "dragging line");
            let cells = line.positions(size);
            engine.start_line(cells.first().copied()).await?;
            for &cell in cells.iter().skip(1) {
                engine.drag_line(Some(cell)).await?;
            }
            engine.end_line().await?;
            skip_lines = engine.snapshot().score == state.score;
            continue;
        }

        let selection = if state.board_state.accepts_selection() {
            find_selection(&state.board, &mode)
        } else {
            None
        };
        if let Some(cells) = selection {
            debug!(?cells, "selecting");
            for &cell in &state.selected_positions {
                engine.select_box(cell).await?;
            }
            for cell in cells {
                engine.select_box(cell).await?;
            }
            if engine.snapshot().selection_pending {
                engine.commit_selection().await?;
            }
            skip_lines = false;
            continue;
        }

        if state.reloads_left < mode.board_reload_cost {
            debug!("no move and no board reload left");
            break;
        }
        engine.press_reload().await?;
        skip_lines = false;
    }

    let state = engine.snapshot();
    summary.score = state.score;
    summary.turns = state.turns;
    Ok(summary)
}
