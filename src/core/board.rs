//! Persistent board and queue values.
//!
//! Both wrap `im` collections so a snapshot clone is O(1) and every
//! mutation produces a new value that shares structure with the old one.

use im::{OrdMap, Vector};
use smallvec::SmallVec;

use super::position::Position;
use super::tile::Tile;
use crate::topology::LineId;

/// Tiles along one line. Lines are at most nine cells long.
pub type LineTiles = SmallVec<[Tile; 9]>;

/// N x N board: exactly one tile per position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: OrdMap<Position, Tile>,
}

impl Board {
    /// A board with every cell `Empty`.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "Board must have at least one cell");
        assert!(size <= 9, "Line ids encode the index in one digit");
        let cells = Position::all(size).map(|p| (p, Tile::Empty)).collect();
        Self { size, cells }
    }

    /// Build from row-major tiles. Returns `None` unless there are exactly N^2.
    #[must_use]
    pub fn from_row_major(size: usize, tiles: &[Tile]) -> Option<Self> {
        if size == 0 || size > 9 || tiles.len() != size * size {
            return None;
        }
        let cells = tiles
            .iter()
            .enumerate()
            .filter_map(|(i, &t)| Position::from_flat_index(i, size).map(|p| (p, t)))
            .collect();
        Some(Self { size, cells })
    }

    /// Side length N.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of cells (always N^2).
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Tile at a position. Out-of-bounds reads are `Empty`.
    #[must_use]
    pub fn get(&self, pos: Position) -> Tile {
        self.cells.get(&pos).copied().unwrap_or(Tile::Empty)
    }

    /// New board with one cell replaced. Out-of-bounds writes are ignored.
    #[must_use]
    pub fn with(&self, pos: Position, tile: Tile) -> Self {
        if !pos.in_bounds(self.size) {
            return self.clone();
        }
        Self {
            size: self.size,
            cells: self.cells.update(pos, tile),
        }
    }

    /// Iterate `(position, tile)` in position order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        self.cells.iter().map(|(&p, &t)| (p, t))
    }

    /// Iterate tiles in position order.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.cells.values().copied()
    }

    /// Tiles in row-major order (persistence layout).
    #[must_use]
    pub fn to_row_major(&self) -> Vec<Tile> {
        (0..self.size * self.size)
            .filter_map(|i| Position::from_flat_index(i, self.size))
            .map(|p| self.get(p))
            .collect()
    }

    /// Tiles along a line, in line order.
    #[must_use]
    pub fn line_tiles(&self, line: LineId) -> LineTiles {
        line.positions(self.size).into_iter().map(|p| self.get(p)).collect()
    }

    /// Positions currently holding `Empty`.
    #[must_use]
    pub fn empty_positions(&self) -> Vec<Position> {
        self.iter().filter(|(_, t)| t.is_empty()).map(|(p, _)| p).collect()
    }

    /// True when no cell is `Empty`.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cells.len() == self.size * self.size && self.tiles().all(|t| !t.is_empty())
    }

    /// Number of star tiles, golden and silver.
    #[must_use]
    pub fn star_count(&self) -> usize {
        self.tiles().filter(|t| t.is_star()).count()
    }

    /// Positions of silver stars without a resolved value.
    #[must_use]
    pub fn unresolved_silver_stars(&self) -> Vec<Position> {
        self.iter()
            .filter(|(_, t)| t.is_unresolved_silver())
            .map(|(p, _)| p)
            .collect()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.size as u8 {
            let cells: Vec<String> = (0..self.size as u8)
                .map(|col| format!("{:>3}", self.get(Position::new(row, col)).to_string()))
                .collect();
            writeln!(f, "{}", cells.join(""))?;
        }
        Ok(())
    }
}

/// Fixed-length preview queue. Index 0 is the next tile to land.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Queue {
    tiles: Vector<Tile>,
}

impl Queue {
    /// A queue of `len` empty slots.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            tiles: std::iter::repeat(Tile::Empty).take(len).collect(),
        }
    }

    #[must_use]
    pub fn from_tiles(tiles: &[Tile]) -> Self {
        Self {
            tiles: tiles.iter().copied().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Next tile to land on the board.
    #[must_use]
    pub fn front(&self) -> Tile {
        self.tiles.front().copied().unwrap_or(Tile::Empty)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Tile> {
        self.tiles.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Tile> + '_ {
        self.tiles.iter().copied()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<Tile> {
        self.iter().collect()
    }

    #[must_use]
    pub fn star_count(&self) -> usize {
        self.iter().filter(|t| t.is_star()).count()
    }

    pub(crate) fn inner(&self) -> &Vector<Tile> {
        &self.tiles
    }

    pub(crate) fn from_inner(tiles: Vector<Tile>) -> Self {
        Self { tiles }
    }
}
