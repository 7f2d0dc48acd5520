//! Game engine: dealing, transitions, orchestration and persistence.
//!
//! - [`deal`]: parity-balanced [`Dealer`] for one redeal
//! - [`actions`]: pure transitions producing staged frames
//! - [`orchestrator`]: [`GameEngine`], the async intent entry points
//! - [`persist`]: [`SavedState`], stores and the background writer

pub mod actions;
pub mod deal;
pub mod orchestrator;
pub mod persist;

pub use actions::{DragPath, LineRelease, Transition};
pub use deal::Dealer;
pub use orchestrator::GameEngine;
pub use persist::{FileStore, GameStore, MemoryStore, Persister, SavedState};
