//! Board coordinates.
//!
//! ## Ordering
//!
//! Positions are ordered column-major: `(col, row)`. Boards iterate in this
//! order, which is also the tie-break used when staging fill order.
//!
//! ## Flat index
//!
//! Persistence uses the row-major index `row * size + col`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A cell on an N x N board, 0-indexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row, top to bottom.
    pub row: u8,
    /// Column, left to right.
    pub col: u8,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Check that this position lies on a board of the given size.
    #[must_use]
    pub fn in_bounds(self, size: usize) -> bool {
        (self.row as usize) < size && (self.col as usize) < size
    }

    /// Row-major flat index.
    #[must_use]
    pub fn flat_index(self, size: usize) -> usize {
        self.row as usize * size + self.col as usize
    }

    /// Inverse of [`Position::flat_index`].
    ///
    /// Returns `None` if the index is outside the board.
    #[must_use]
    pub fn from_flat_index(index: usize, size: usize) -> Option<Self> {
        if size == 0 || index >= size * size {
            return None;
        }
        Some(Self::new((index / size) as u8, (index % size) as u8))
    }

    /// Diagonal rank used to stage fill order (`row + col`).
    #[must_use]
    pub fn diagonal_rank(self) -> usize {
        self.row as usize + self.col as usize
    }

    /// True if `other` is one of the eight neighbours of this position.
    #[must_use]
    pub fn is_adjacent(self, other: Position) -> bool {
        let dr = (self.row as i16 - other.row as i16).abs();
        let dc = (self.col as i16 - other.col as i16).abs();
        dr.max(dc) == 1
    }

    /// Iterate over every position of a board in `Ord` order.
    ///
    /// ```
    /// use rust_bingo::core::Position;
    ///
    /// let all: Vec<_> = Position::all(2).collect();
    /// assert_eq!(all, vec![
    ///     Position::new(0, 0),
    ///     Position::new(1, 0),
    ///     Position::new(0, 1),
    ///     Position::new(1, 1),
    /// ]);
    /// ```
    pub fn all(size: usize) -> impl Iterator<Item = Position> {
        (0..size as u8).flat_map(move |col| (0..size as u8).map(move |row| Position::new(row, col)))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.col, self.row).cmp(&(other.col, other.row))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
