//! Bingo feasibility.
//!
//! Decides whether every line can be completed at once when the board holds
//! unresolved silver stars. Golden stars always satisfy their lines.
//!
//! Two phases instead of a search over star assignments:
//!
//! 1. **Inference.** Every line through a star that holds no golden star and
//!    exactly one unresolved silver star pins that star to the value the
//!    ruleset picks from `needed_numbers` (see `Ruleset::pin_star`). A star pinned to two different values, or a
//!    line with no candidate at all, makes bingo infeasible. Lines with two
//!    or more unresolved silver stars are deferred.
//! 2. **Verification.** Pinned values are written to a provisional board and
//!    the deferred lines are re-checked for completion.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use tracing::trace;

use super::lines::{is_line_winning, line_values};
use crate::core::{Board, EngineError, Position, Tile};
use crate::rules::GameMode;
use crate::topology::LineId;

/// Can every line be completed simultaneously?
///
/// # Errors
///
/// [`EngineError::AmbiguousNeededNumbers`] when a single-star line admits
/// more than one value and the ruleset cannot pick one.
pub fn is_bingo_possible(board: &Board, mode: &GameMode) -> Result<bool, EngineError> {
    let stars = board.unresolved_silver_stars();
    if stars.is_empty() {
        return Ok(true);
    }

    let size = board.size();
    let mut candidates: FxHashMap<Position, BTreeSet<u8>> = FxHashMap::default();
    let mut deferred: BTreeSet<LineId> = BTreeSet::new();

    for &star in &stars {
        for line in LineId::through(star, size) {
            let tiles = board.line_tiles(line);
            if tiles.iter().any(|t| t.is_golden()) {
                continue;
            }
            if tiles.iter().filter(|t| t.is_unresolved_silver()).count() >= 2 {
                deferred.insert(line);
                continue;
            }

            let needed = mode.needed_numbers(&line_values(&tiles));
            match mode.pin_star(&needed) {
                Ok(Some(value)) => {
                    candidates.entry(star).or_default().insert(value);
                }
                Ok(None) => {
                    trace!(%line, %star, "no value completes line");
                    return Ok(false);
                }
                Err(count) => return Err(EngineError::AmbiguousNeededNumbers { line, count }),
            }
        }
    }

    if candidates.values().any(|values| values.len() > 1) {
        trace!("star pinned to conflicting values");
        return Ok(false);
    }
    if deferred.is_empty() {
        return Ok(true);
    }

    let provisional = candidates.iter().fold(board.clone(), |b, (&pos, values)| {
        match values.iter().next() {
            Some(&v) => b.with(pos, Tile::SilverStar(Some(v))),
            None => b,
        }
    });

    Ok(deferred
        .iter()
        .all(|&line| is_line_winning(&provisional, line, mode)))
}
