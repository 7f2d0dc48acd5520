//! Board geometry and pool properties.
//!
//! Property tests over every supported board size and arbitrary pools.

use proptest::prelude::*;
use rust_bingo::core::{GameRng, NumberPool, Position};
use rust_bingo::mutators::sort_diagonally;
use rust_bingo::topology::{max_lines, Direction, LineId};

// =============================================================================
// Line Enumeration Tests
// =============================================================================

/// Test that a board of size N has 2N + 2 lines.
#[test]
fn test_line_count_all_sizes() {
    for size in 1..=9 {
        assert_eq!(LineId::all(size).len(), max_lines(size));
        assert_eq!(max_lines(size), 2 * size + 2);
    }
}

/// Test that every line holds N distinct in-bounds positions.
#[test]
fn test_lines_have_size_cells() {
    for size in 1..=9 {
        for line in LineId::all(size) {
            let mut cells = line.positions(size);
            assert_eq!(cells.len(), size);
            assert!(cells.iter().all(|p| p.in_bounds(size)));
            cells.sort();
            cells.dedup();
            assert_eq!(cells.len(), size, "{line} repeats a cell");
        }
    }
}

/// Test that the centre of an odd board lies on four lines and a
/// non-diagonal edge cell on two.
#[test]
fn test_lines_through_cells() {
    assert_eq!(LineId::through(Position::new(1, 1), 3).len(), 4);
    assert_eq!(LineId::through(Position::new(0, 1), 3).len(), 2);
    assert_eq!(LineId::through(Position::new(0, 0), 3).len(), 3);
}

/// Test that diagonals run corner to corner.
#[test]
fn test_diagonal_endpoints() {
    let left = LineId::build(Direction::LeftDiagonal, 0);
    let right = LineId::build(Direction::RightDiagonal, 0);

    assert_eq!(left.positions(4).first(), Some(&Position::new(0, 0)));
    assert_eq!(left.positions(4).last(), Some(&Position::new(3, 3)));
    assert_eq!(right.positions(4).first(), Some(&Position::new(0, 3)));
    assert_eq!(right.positions(4).last(), Some(&Position::new(3, 0)));
}

// =============================================================================
// Path Derivation Tests
// =============================================================================

/// Test that a path must start at an endpoint.
#[test]
fn test_path_from_middle_is_rejected() {
    let path = [Position::new(0, 1), Position::new(0, 0), Position::new(0, 2)];
    assert_eq!(LineId::from_positions(&path, 3), None);
}

/// Test that a path of the wrong length is rejected.
#[test]
fn test_partial_path_is_rejected() {
    let path = [Position::new(0, 0), Position::new(0, 1)];
    assert_eq!(LineId::from_positions(&path, 3), None);
}

/// Test that an L-shaped path is not a line.
#[test]
fn test_bent_path_is_rejected() {
    let path = [Position::new(0, 0), Position::new(0, 1), Position::new(1, 1)];
    assert_eq!(LineId::from_positions(&path, 3), None);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// build then decompose is the identity.
    #[test]
    fn prop_build_decompose_roundtrip(dir in 0u8..4, index in 0usize..10) {
        let direction = Direction::from_code(dir).unwrap();
        let index = if direction.is_diagonal() { 0 } else { index };
        let line = LineId::build(direction, index);

        prop_assert_eq!(line.decompose(), (direction, index));
        prop_assert_eq!(LineId::from_code(line.code()), Some(line));
    }

    /// Every line is recovered from its own cells walked in either direction.
    #[test]
    fn prop_line_from_its_positions(size in 1usize..=9, pick in any::<prop::sample::Index>(), reverse in any::<bool>()) {
        let lines = LineId::all(size);
        let line = lines[pick.index(lines.len())];
        let mut path = line.positions(size);
        if reverse {
            path.reverse();
        }

        let derived = LineId::from_positions(&path, size);
        prop_assert!(derived.is_some());
        // Size 1 boards have every line on the same cell
        if size > 1 {
            prop_assert_eq!(derived, Some(line));
        }
    }

    /// Positions on a line report their own index.
    #[test]
    fn prop_index_of_inverts_position_at(size in 1usize..=9, i in 0usize..9) {
        let i = i % size;
        for line in LineId::all(size) {
            let pos = line.position_at(i, size);
            prop_assert_eq!(line.index_of(pos, size), Some(i));
        }
    }

    /// Diagonal fill order never decreases in row + col.
    #[test]
    fn prop_sort_diagonally_monotone(size in 1usize..=9) {
        let all: Vec<Position> = Position::all(size).collect();
        let sorted = sort_diagonally(&all);
        prop_assert_eq!(sorted.len(), all.len());
        prop_assert!(sorted.windows(2).all(|w| w[0].diagonal_rank() <= w[1].diagonal_rank()));
    }

    /// The partial pool is empty only when the pool is.
    #[test]
    fn prop_partial_pool_never_empty(
        values in prop::collection::vec(0u8..10, 0..30),
        excluded in prop::collection::vec(0u8..10, 0..12),
        even in any::<bool>(),
    ) {
        let pool = NumberPool::new(values.clone());
        let partial = pool.partial_pool(even, &excluded);

        prop_assert_eq!(partial.is_empty(), values.is_empty());
        prop_assert!(partial.iter().all(|v| values.contains(v)));
    }

    /// Draws come from the pool and do not consume it.
    #[test]
    fn prop_draw_does_not_consume(
        values in prop::collection::vec(0u8..10, 1..30),
        seed in any::<u64>(),
        even in any::<bool>(),
    ) {
        let pool = NumberPool::new(values.clone());
        let mut rng = GameRng::new(seed);

        let drawn = pool.draw(even, &[], &mut rng);
        prop_assert!(drawn.is_some_and(|v| values.contains(&v)));
        prop_assert_eq!(pool.len(), values.len());
    }

    /// Excluding values never drives a count below zero.
    #[test]
    fn prop_exclude_is_bounded(
        values in prop::collection::vec(0u8..10, 0..30),
        removals in prop::collection::vec(0u8..10, 0..60),
    ) {
        let mut pool = NumberPool::new(values.clone());
        for v in removals {
            let before = pool.count(v);
            let removed = pool.exclude(v);
            prop_assert_eq!(removed, before > 0);
            prop_assert_eq!(pool.count(v), before.saturating_sub(1));
        }
    }
}
