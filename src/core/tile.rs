//! Cell contents for the board and the preview queue.
//!
//! ## Persistence codes
//!
//! Tiles persist as `type_code * 10 + digit`:
//!
//! | Tile | Code |
//! |---|---|
//! | `Regular(d)` | `d` |
//! | `Block(d)` | `10 + d` |
//! | `GoldenStar` | `20` |
//! | `SilverStar(v)` | `30 + v.unwrap_or(0)` |
//! | `Empty` | `0` (same as `Regular(0)`) |

use serde::{Deserialize, Serialize};

/// Which kind of star a spawn produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StarKind {
    /// Always-satisfiable wildcard.
    Golden,
    /// Wildcard whose value is inferred once a line through it completes.
    Silver,
}

/// One board or queue cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Selectable numeric tile.
    Regular(u8),
    /// Numeric tile that only counts towards lines.
    Block(u8),
    /// Placeholder while a region is being refilled.
    Empty,
    /// Wildcard that satisfies any line.
    GoldenStar,
    /// Wildcard with a deferred value; `None` until resolved.
    SilverStar(Option<u8>),
}

impl Tile {
    /// A star tile of the given kind, unresolved.
    #[must_use]
    pub const fn star(kind: StarKind) -> Self {
        match kind {
            StarKind::Golden => Tile::GoldenStar,
            StarKind::Silver => Tile::SilverStar(None),
        }
    }

    /// Numeric value, if the tile currently has one.
    ///
    /// Resolved silver stars report their resolved value.
    #[must_use]
    pub const fn value(self) -> Option<u8> {
        match self {
            Tile::Regular(v) | Tile::Block(v) => Some(v),
            Tile::SilverStar(v) => v,
            Tile::Empty | Tile::GoldenStar => None,
        }
    }

    /// Only regular tiles take part in multi-selection.
    #[must_use]
    pub const fn is_selectable(self) -> bool {
        matches!(self, Tile::Regular(_))
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Tile::Empty)
    }

    #[must_use]
    pub const fn is_star(self) -> bool {
        matches!(self, Tile::GoldenStar | Tile::SilverStar(_))
    }

    #[must_use]
    pub const fn is_golden(self) -> bool {
        matches!(self, Tile::GoldenStar)
    }

    /// A silver star without a resolved value.
    #[must_use]
    pub const fn is_unresolved_silver(self) -> bool {
        matches!(self, Tile::SilverStar(None))
    }

    /// Integer persistence code.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Tile::Regular(v) => i32::from(v),
            Tile::Empty => 0,
            Tile::Block(v) => 10 + i32::from(v),
            Tile::GoldenStar => 20,
            Tile::SilverStar(v) => 30 + i32::from(v.unwrap_or(0)),
        }
    }

    /// Decode a persistence code.
    ///
    /// Silver stars always decode unresolved: only committed snapshots are
    /// persisted, and those never carry a resolved star.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        if !(0..40).contains(&code) {
            return None;
        }
        let digit = (code % 10) as u8;
        match code / 10 {
            0 => Some(Tile::Regular(digit)),
            1 => Some(Tile::Block(digit)),
            2 if digit == 0 => Some(Tile::GoldenStar),
            3 => Some(Tile::SilverStar(None)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tile::Regular(v) => write!(f, "{v}"),
            Tile::Block(v) => write!(f, "[{v}]"),
            Tile::Empty => write!(f, "."),
            Tile::GoldenStar => write!(f, "G*"),
            Tile::SilverStar(None) => write!(f, "S*"),
            Tile::SilverStar(Some(v)) => write!(f, "S{v}"),
        }
    }
}
