//! Winning-selection search.
//!
//! Depth-first over regular tiles. Order-insensitive rulesets only visit
//! increasing index sequences (combinations); order-sensitive ones visit
//! every arrangement (permutations). The search stops at the first hit.

use smallvec::SmallVec;

use crate::core::{Board, Position};
use crate::rules::GameMode;

type Picked = SmallVec<[usize; 9]>;

/// First winning selection among regular tiles, in selection order.
#[must_use]
pub fn find_selection(board: &Board, mode: &GameMode) -> Option<Vec<Position>> {
    let candidates: Vec<(Position, u8)> = board
        .iter()
        .filter(|(_, tile)| tile.is_selectable())
        .filter_map(|(pos, tile)| tile.value().map(|v| (pos, v)))
        .collect();

    let ordered = mode.order_sensitive();
    let max = mode.max_selection.min(candidates.len());

    for size in mode.min_selection..=max {
        let mut picked = Picked::new();
        let mut used = vec![false; candidates.len()];
        if search(&candidates, size, ordered, mode, &mut picked, &mut used) {
            return Some(picked.iter().map(|&i| candidates[i].0).collect());
        }
    }
    None
}

/// True when some winning selection exists.
#[must_use]
pub fn is_selection_possible(board: &Board, mode: &GameMode) -> bool {
    find_selection(board, mode).is_some()
}

fn search(
    candidates: &[(Position, u8)],
    size: usize,
    ordered: bool,
    mode: &GameMode,
    picked: &mut Picked,
    used: &mut [bool],
) -> bool {
    if picked.len() == size {
        let values: SmallVec<[u8; 9]> = picked.iter().map(|&i| candidates[i].1).collect();
        return mode.is_win_condition(&values);
    }

    let start = if ordered {
        0
    } else {
        picked.last().map_or(0, |&last| last + 1)
    };

    for i in start..candidates.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        picked.push(i);
        if search(candidates, size, ordered, mode, picked, used) {
            return true;
        }
        picked.pop();
        used[i] = false;
    }
    false
}
