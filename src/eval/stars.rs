//! Star resolution for completed lines.
//!
//! Silver star values are never stored between drag steps. The board shown
//! during a drag is re-derived from the board captured when the drag began
//! and the lines completed so far, so undoing a line reverts its star for
//! free.

use smallvec::SmallVec;
use tracing::debug;

use super::lines::line_values;
use crate::core::{Board, Position, Tile};
use crate::rules::GameMode;
use crate::topology::LineId;

/// Resolve lone silver stars on each completed line, in completion order.
///
/// A line resolves its star only when it holds no golden star and exactly
/// one unresolved silver star; the star takes the largest needed value.
#[must_use]
pub fn resolve_stars(base: &Board, completed: &[LineId], mode: &GameMode) -> Board {
    let size = base.size();

    completed.iter().fold(base.clone(), |board, &line| {
        let tiles = board.line_tiles(line);
        if tiles.iter().any(|t| t.is_golden()) {
            return board;
        }

        let unresolved: SmallVec<[Position; 9]> = line
            .positions(size)
            .into_iter()
            .filter(|&p| board.get(p).is_unresolved_silver())
            .collect();
        let &[star] = unresolved.as_slice() else {
            return board;
        };

        match mode.needed_numbers(&line_values(&tiles)).last() {
            Some(&value) => {
                debug!(%line, %star, value, "resolved silver star");
                board.with(star, Tile::SilverStar(Some(value)))
            }
            None => board,
        }
    })
}
