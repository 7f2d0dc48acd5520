//! Line identification and enumeration.

use serde::{Deserialize, Serialize};

use crate::core::Position;

/// Direction of a line. The discriminant is the line-id tens digit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Top-left to bottom-right.
    LeftDiagonal = 0,
    /// Top-right to bottom-left.
    RightDiagonal = 1,
    /// A row.
    Horizontal = 2,
    /// A column.
    Vertical = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::LeftDiagonal,
        Direction::RightDiagonal,
        Direction::Horizontal,
        Direction::Vertical,
    ];

    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Direction::LeftDiagonal),
            1 => Some(Direction::RightDiagonal),
            2 => Some(Direction::Horizontal),
            3 => Some(Direction::Vertical),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        matches!(self, Direction::LeftDiagonal | Direction::RightDiagonal)
    }
}

/// A line on the board: `direction * 10 + index`.
///
/// The index is the row for horizontal lines, the column for vertical
/// lines, and always 0 for diagonals.
///
/// ```
/// use rust_bingo::topology::{Direction, LineId};
///
/// let row = LineId::build(Direction::Horizontal, 2);
/// assert_eq!(row.code(), 22);
/// assert_eq!(row.decompose(), (Direction::Horizontal, 2));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineId {
    direction: Direction,
    index: u8,
}

/// Maximum number of lines on an N x N board.
#[must_use]
pub const fn max_lines(size: usize) -> usize {
    2 * size + 2
}

impl LineId {
    /// Build a line id. Diagonal indices are normalised to 0.
    #[must_use]
    pub fn build(direction: Direction, index: usize) -> Self {
        assert!(index < 10, "Line index must fit one digit");
        let index = if direction.is_diagonal() { 0 } else { index as u8 };
        Self { direction, index }
    }

    /// Split into `(direction, index)`.
    #[must_use]
    pub fn decompose(self) -> (Direction, usize) {
        (self.direction, self.index as usize)
    }

    #[must_use]
    pub fn direction(self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// Compact integer code `direction * 10 + index`.
    #[must_use]
    pub fn code(self) -> u8 {
        self.direction.code() * 10 + self.index
    }

    /// Parse a compact code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        let direction = Direction::from_code(code / 10)?;
        let index = code % 10;
        if direction.is_diagonal() && index != 0 {
            return None;
        }
        Some(Self { direction, index })
    }

    /// Every line of an N x N board: both diagonals, then rows, then columns.
    #[must_use]
    pub fn all(size: usize) -> Vec<LineId> {
        let mut lines = Vec::with_capacity(max_lines(size));
        lines.push(LineId::build(Direction::LeftDiagonal, 0));
        lines.push(LineId::build(Direction::RightDiagonal, 0));
        lines.extend((0..size).map(|i| LineId::build(Direction::Horizontal, i)));
        lines.extend((0..size).map(|i| LineId::build(Direction::Vertical, i)));
        lines
    }

    /// Lines satisfying a predicate, in [`LineId::all`] order.
    pub fn matching(size: usize, mut predicate: impl FnMut(LineId) -> bool) -> Vec<LineId> {
        LineId::all(size).into_iter().filter(|&l| predicate(l)).collect()
    }

    /// Lines passing through a position.
    #[must_use]
    pub fn through(pos: Position, size: usize) -> Vec<LineId> {
        Self::matching(size, |l| l.contains(pos, size))
    }

    /// The `i`-th position along this line.
    #[must_use]
    pub fn position_at(self, i: usize, size: usize) -> Position {
        let step = i as u8;
        let last = size as u8 - 1;
        match self.direction {
            Direction::LeftDiagonal => Position::new(step, step),
            Direction::RightDiagonal => Position::new(step, last - step),
            Direction::Horizontal => Position::new(self.index, step),
            Direction::Vertical => Position::new(step, self.index),
        }
    }

    /// Index of a position along this line, if it lies on it.
    #[must_use]
    pub fn index_of(self, pos: Position, size: usize) -> Option<usize> {
        if !pos.in_bounds(size) {
            return None;
        }
        let on_line = match self.direction {
            Direction::LeftDiagonal => pos.row == pos.col,
            Direction::RightDiagonal => pos.row as usize + pos.col as usize == size - 1,
            Direction::Horizontal => pos.row == self.index,
            Direction::Vertical => pos.col == self.index,
        };
        if !on_line {
            return None;
        }
        Some(match self.direction {
            Direction::Horizontal => pos.col as usize,
            _ => pos.row as usize,
        })
    }

    #[must_use]
    pub fn contains(self, pos: Position, size: usize) -> bool {
        self.index_of(pos, size).is_some()
    }

    /// Positions in line order.
    #[must_use]
    pub fn positions(self, size: usize) -> Vec<Position> {
        (0..size).map(|i| self.position_at(i, size)).collect()
    }

    /// Derive the line traced by an ordered path.
    ///
    /// The path must hold exactly N positions of one line, start at one of
    /// its endpoints and walk it cell by cell in either direction.
    #[must_use]
    pub fn from_positions(path: &[Position], size: usize) -> Option<LineId> {
        if size == 0 || path.len() != size {
            return None;
        }
        let first = path[0];
        Self::through(first, size).into_iter().find(|&line| {
            let Some(start) = line.index_of(first, size) else {
                return false;
            };
            let forward = match start {
                0 => true,
                s if s == size - 1 => false,
                _ => return false,
            };
            path.iter().enumerate().all(|(step, &pos)| {
                let expected = if forward { step } else { size - 1 - step };
                line.index_of(pos, size) == Some(expected)
            })
        })
    }
}

impl std::fmt::Display for LineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.direction {
            Direction::LeftDiagonal => write!(f, "diagonal \\"),
            Direction::RightDiagonal => write!(f, "diagonal /"),
            Direction::Horizontal => write!(f, "row {}", self.index),
            Direction::Vertical => write!(f, "column {}", self.index),
        }
    }
}
