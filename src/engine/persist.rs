//! Saved games.
//!
//! ## Format
//!
//! [`SavedState`] stores the board and queue as flat lists of integer tile
//! codes (`type * 10 + digit`, see [`Tile::code`]). The board is row-major.
//! The RNG state travels with the save so a restored game keeps dealing the
//! same sequence.
//!
//! ## Writes
//!
//! [`Persister`] owns a single writer task. Saves are queued on an
//! unbounded channel and written in order, so the last queued save is the
//! one left on disk. Failures are logged and dropped.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, instrument};

use crate::core::{
    Board, EngineError, GameRngState, GameState, Queue, StoreError, Tile,
};
use crate::rules::{GameMode, ModeKind};

/// Persisted game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    pub mode: ModeKind,
    pub board: Vec<i32>,
    pub queue: Vec<i32>,
    pub score: u32,
    pub reloads_left: u32,
    pub turns: u32,
    pub rng: Option<GameRngState>,
}

impl SavedState {
    /// Capture the persistent part of a snapshot.
    #[must_use]
    pub fn capture(state: &GameState, mode: &GameMode, rng: Option<GameRngState>) -> Self {
        Self {
            mode: mode.kind,
            board: state.board.to_row_major().into_iter().map(Tile::code).collect(),
            queue: state.queue.iter().map(Tile::code).collect(),
            score: state.score,
            reloads_left: state.reloads_left,
            turns: state.turns,
            rng,
        }
    }

    /// Rebuild a snapshot for `mode`. Derived fields are left for evaluation.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidSave`] for another mode, wrong lengths or
    /// unknown tile codes.
    pub fn restore(&self, mode: &GameMode) -> Result<GameState, EngineError> {
        if self.mode != mode.kind {
            return Err(EngineError::InvalidSave(format!(
                "saved for {} mode, playing {}",
                self.mode, mode.kind
            )));
        }

        let board_tiles = decode(&self.board)?;
        let board = Board::from_row_major(mode.size(), &board_tiles).ok_or_else(|| {
            EngineError::InvalidSave(format!("board has {} cells", board_tiles.len()))
        })?;

        let queue_tiles = decode(&self.queue)?;
        if queue_tiles.len() != mode.queue_size {
            return Err(EngineError::InvalidSave(format!(
                "queue has {} tiles",
                queue_tiles.len()
            )));
        }

        let mut state = GameState::empty(mode);
        state.board = board;
        state.queue = Queue::from_tiles(&queue_tiles);
        state.score = self.score;
        state.reloads_left = self.reloads_left;
        state.turns = self.turns;
        Ok(state)
    }
}

fn decode(codes: &[i32]) -> Result<Vec<Tile>, EngineError> {
    codes
        .iter()
        .map(|&code| {
            Tile::from_code(code)
                .ok_or_else(|| EngineError::InvalidSave(format!("unknown tile code {code}")))
        })
        .collect()
}

/// Storage backend.
pub trait GameStore: Send + Sync + std::fmt::Debug {
    /// Last saved game, if any.
    fn load(&self) -> Result<Option<SavedState>, StoreError>;

    /// Replace the saved game.
    fn save(&self, state: &SavedState) -> Result<(), StoreError>;
}

/// In-memory store for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<SavedState>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with a saved game.
    #[must_use]
    pub fn with_saved(state: SavedState) -> Self {
        Self {
            slot: Mutex::new(Some(state)),
        }
    }
}

impl GameStore for MemoryStore {
    fn load(&self) -> Result<Option<SavedState>, StoreError> {
        Ok(self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, state: &SavedState) -> Result<(), StoreError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(state.clone());
        Ok(())
    }
}

/// Single-file bincode store.
///
/// Writes go to a sibling temporary file that is renamed into place.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GameStore for FileStore {
    fn load(&self) -> Result<Option<SavedState>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(bincode::deserialize(&bytes)?))
    }

    fn save(&self, state: &SavedState) -> Result<(), StoreError> {
        let bytes = bincode::serialize(state)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

enum Command {
    Save(SavedState),
    Flush(oneshot::Sender<()>),
}

/// Handle to the background writer task.
#[derive(Debug, Clone)]
pub struct Persister {
    tx: mpsc::UnboundedSender<Command>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Save(state) => write!(f, "Save(score: {})", state.score),
            Command::Flush(_) => write!(f, "Flush"),
        }
    }
}

impl Persister {
    /// Spawn the writer task. Must be called inside a Tokio runtime.
    pub fn spawn(store: Arc<dyn GameStore>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Command>();

        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    Command::Save(state) => write_saved(Arc::clone(&store), state).await,
                    Command::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            debug!("persistence writer stopped");
        });

        Self { tx }
    }

    /// Queue a save. Never blocks.
    pub fn save(&self, state: SavedState) {
        if self.tx.send(Command::Save(state)).is_err() {
            error!("persistence writer is gone, save dropped");
        }
    }

    /// Wait until every save queued before this call has been attempted.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(done_tx)).is_err() {
            return;
        }
        let _ = done_rx.await;
    }
}

#[instrument(skip_all, fields(score = state.score, turns = state.turns))]
async fn write_saved(store: Arc<dyn GameStore>, state: SavedState) {
    match tokio::task::spawn_blocking(move || store.save(&state)).await {
        Ok(Ok(())) => debug!("saved"),
        Ok(Err(e)) => error!(error = %e, "save failed"),
        Err(e) => error!(error = %e, "save task failed"),
    }
}
