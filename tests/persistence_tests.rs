//! Saved games on disk.

use std::sync::Arc;

use rust_bingo::core::{EngineConfig, StoreError};
use rust_bingo::engine::{FileStore, GameEngine, GameStore, MemoryStore, SavedState};
use rust_bingo::rules::{GameMode, ModeKind};
use tempfile::TempDir;

fn config() -> EngineConfig {
    EngineConfig::default().with_seed(11).with_grace_period(None)
}

fn store_in(dir: &TempDir) -> FileStore {
    FileStore::new(dir.path().join("game.bin"))
}

// =============================================================================
// File Store Tests
// =============================================================================

/// Test that a missing save file loads as no game.
#[test]
fn test_missing_file_is_none() {
    let dir = TempDir::new().unwrap();
    assert_eq!(store_in(&dir).load().unwrap(), None);
}

/// Test that a written save reads back unchanged.
#[test]
fn test_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let saved = SavedState {
        mode: ModeKind::Positional,
        board: vec![1, 2, 3, 4, 20, 6, 7, 10, 30],
        queue: vec![5, 6, 7],
        score: 120,
        reloads_left: 4,
        turns: 9,
        rng: None,
    };

    store.save(&saved).unwrap();
    assert_eq!(store.load().unwrap(), Some(saved));
    assert!(!store.path().with_extension("tmp").exists());
}

/// Test that a later save replaces the earlier one.
#[test]
fn test_file_overwrite() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let mut saved = SavedState {
        mode: ModeKind::Additive,
        board: vec![9; 9],
        queue: vec![1, 2, 3],
        score: 1,
        reloads_left: 3,
        turns: 0,
        rng: None,
    };

    store.save(&saved).unwrap();
    saved.score = 2;
    store.save(&saved).unwrap();
    assert_eq!(store.load().unwrap().map(|s| s.score), Some(2));
}

/// Test that garbage on disk is a decode error.
#[test]
fn test_corrupt_file_is_error() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    std::fs::write(store.path(), [0xff, 0x01]).unwrap();

    assert!(matches!(store.load(), Err(StoreError::Encode(_))));
}

// =============================================================================
// Engine Restore Tests
// =============================================================================

/// Test that a corrupt save falls back to a new game.
#[tokio::test]
async fn test_engine_ignores_corrupt_file() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    std::fs::write(store.path(), b"not a game").unwrap();

    let engine = GameEngine::new(GameMode::additive(), config(), Arc::new(store));
    engine.initial_load().await.unwrap();

    let state = engine.snapshot();
    assert!(state.board.is_complete());
    assert_eq!(state.score, 0);
}

/// Test that a game written by one engine is picked up by the next.
#[tokio::test]
async fn test_engine_resumes_saved_game() {
    let dir = TempDir::new().unwrap();

    let first = GameEngine::new(GameMode::additive(), config(), Arc::new(store_in(&dir)));
    first.new_game().await.unwrap();
    first.press_reload().await.unwrap();
    first.flush().await;
    let before = first.snapshot();

    let second = GameEngine::new(GameMode::additive(), config(), Arc::new(store_in(&dir)));
    second.initial_load().await.unwrap();
    let after = second.snapshot();

    assert_eq!(after.board, before.board);
    assert_eq!(after.queue, before.queue);
    assert_eq!(after.score, before.score);
    assert_eq!(after.reloads_left, before.reloads_left);
    assert_eq!(after.board_state, before.board_state);
}

/// Test that the saved RNG state makes the next deal repeatable.
#[tokio::test]
async fn test_restored_rng_repeats_deals() {
    let dir = TempDir::new().unwrap();
    let engine = GameEngine::new(GameMode::additive(), config(), Arc::new(store_in(&dir)));
    engine.new_game().await.unwrap();
    engine.flush().await;

    let saved = store_in(&dir).load().unwrap().unwrap();
    assert!(saved.rng.is_some());

    // Entropy-seeded engines so only the saved state can line them up
    let unseeded = EngineConfig::default().with_grace_period(None).with_persistence(false);
    let a = GameEngine::new(
        GameMode::additive(),
        unseeded.clone(),
        Arc::new(MemoryStore::with_saved(saved.clone())),
    );
    let b = GameEngine::new(
        GameMode::additive(),
        unseeded,
        Arc::new(MemoryStore::with_saved(saved)),
    );
    a.initial_load().await.unwrap();
    b.initial_load().await.unwrap();
    a.press_reload().await.unwrap();
    b.press_reload().await.unwrap();

    assert_eq!(a.snapshot().board, b.snapshot().board);
}

/// Test that a positional save is not loaded into an additive game.
#[tokio::test]
async fn test_engine_rejects_other_mode_file() {
    let dir = TempDir::new().unwrap();

    let positional = GameEngine::new(GameMode::positional(), config(), Arc::new(store_in(&dir)));
    positional.new_game().await.unwrap();
    positional.flush().await;

    let additive = GameEngine::new(GameMode::additive(), config(), Arc::new(store_in(&dir)));
    additive.initial_load().await.unwrap();
    additive.flush().await;

    let saved = store_in(&dir).load().unwrap().unwrap();
    assert_eq!(saved.mode, ModeKind::Additive);
}
