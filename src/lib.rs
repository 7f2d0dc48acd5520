//! # rust-bingo
//!
//! Rule engine for a grid-based number bingo puzzle.
//!
//! ## Design Principles
//!
//! 1. **Rules as values**: A [`GameMode`] carries every constant and a
//!    [`Ruleset`] strategy object. It is threaded through every call; there
//!    is no ambient default mode.
//!
//! 2. **Persistent snapshots**: Boards and queues are `im` values. Every
//!    transition produces a new [`GameState`] and published snapshots are
//!    never edited.
//!
//! 3. **Derivation over mutation**: Silver star values are re-derived from
//!    the completed lines of a drag instead of being written into shared
//!    tiles, so undoing a line needs no bookkeeping.
//!
//! ## Architecture
//!
//! - **One intent at a time**: [`GameEngine`] serializes intents behind an
//!   async mutex and publishes staged frames in order through a `watch`
//!   channel.
//!
//! - **Parallel evaluation**: Available lines, selection search and bingo
//!   feasibility run concurrently and are joined before the board state is
//!   derived.
//!
//! - **Seeded dealing**: All randomness comes from a ChaCha8 [`GameRng`]
//!   whose state is saved with the game.
//!
//! ## Modules
//!
//! - `core`: Positions, tiles, pool, board and queue, state, RNG, config, errors
//! - `topology`: Line ids and line geometry
//! - `rules`: `Ruleset` trait, additive and positional rules, `GameMode`
//! - `eval`: Line completion, selection search, bingo feasibility, star resolution
//! - `mutators`: Pure board and queue transformations
//! - `engine`: Dealer, transitions, orchestrator, persistence

pub mod core;
pub mod engine;
pub mod eval;
pub mod mutators;
pub mod rules;
pub mod topology;

// Re-export commonly used types
pub use crate::core::{
    Board, BoardState, DisplayMessage, EngineConfig, EngineError, GameRng, GameRngState,
    GameState, MessageKey, NumberPool, Position, Queue, StarKind, StoreError, Tile,
};

pub use crate::topology::{max_lines, Direction, LineId};

pub use crate::rules::{Additive, GameMode, ModeKind, Positional, Ruleset};

pub use crate::eval::{
    available_lines, derive_board_state, evaluate, find_selection, is_bingo_possible,
    is_line_winning, is_selection_possible, resolve_stars, Evaluation,
};

pub use crate::mutators::QueueInsert;

pub use crate::engine::{Dealer, FileStore, GameEngine, GameStore, MemoryStore, SavedState};
