//! Core engine types: positions, tiles, pool, board, state, RNG, configuration.
//!
//! These are mode-agnostic building blocks. Rules that interpret tile
//! values live in [`rules`](crate::rules).

pub mod board;
pub mod config;
pub mod error;
pub mod pool;
pub mod position;
pub mod rng;
pub mod state;
pub mod tile;

pub use board::{Board, LineTiles, Queue};
pub use config::EngineConfig;
pub use error::{EngineError, StoreError};
pub use pool::NumberPool;
pub use position::Position;
pub use rng::{GameRng, GameRngState};
pub use state::{BoardState, DisplayMessage, GameState, MessageKey};
pub use tile::{StarKind, Tile};
