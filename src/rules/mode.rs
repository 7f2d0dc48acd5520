//! Game mode: the immutable ruleset value threaded through every action.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::additive::Additive;
use super::positional::Positional;
use super::ruleset::Ruleset;
use crate::core::{NumberPool, StarKind, Tile};

/// Identifies a built-in mode. Persisted with saved games.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeKind {
    /// Sum equals a goal.
    Additive,
    /// Digit concatenation is a multiple of a goal.
    Positional,
}

impl std::fmt::Display for ModeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModeKind::Additive => write!(f, "additive"),
            ModeKind::Positional => write!(f, "positional"),
        }
    }
}

/// Complete ruleset for one mode.
///
/// Cloning is cheap: the strategy object is shared.
#[derive(Clone, Debug)]
pub struct GameMode {
    /// Which built-in mode this is.
    pub kind: ModeKind,

    /// Values dealt as selectable tiles.
    pub regular_alphabet: Vec<u8>,

    /// Values dealt as block tiles.
    pub block_alphabet: Vec<u8>,

    /// Copies of each alphabet value in a fresh pool.
    pub copies: usize,

    /// Board side length N (also the line length).
    pub line_length: usize,

    /// Preview queue length.
    pub queue_size: usize,

    /// Reloads available at the start of a game.
    pub initial_reloads: u32,

    /// Reloads spent to redeal the board.
    pub board_reload_cost: u32,

    /// Reloads spent to redeal the queue.
    pub queue_reload_cost: u32,

    /// A star spawns every `star_cadence` completed selections.
    pub star_cadence: u32,

    /// Most stars allowed on board and queue combined.
    pub max_stars: usize,

    /// Smallest selection that is tested for a win.
    pub min_selection: usize,

    /// Largest selection; reaching it commits or clears.
    pub max_selection: usize,

    /// Points per committed selected tile.
    pub points_per_tile: u32,

    /// Base points for a line; k lines in one drag score `k^2` times this.
    pub line_points: u32,

    /// Reloads granted per completed line.
    pub reloads_per_line: u32,

    ruleset: Arc<dyn Ruleset>,
}

impl GameMode {
    fn base(kind: ModeKind, ruleset: Arc<dyn Ruleset>) -> Self {
        Self {
            kind,
            regular_alphabet: (1..=9).collect(),
            block_alphabet: vec![0],
            copies: 2,
            line_length: 3,
            queue_size: 3,
            initial_reloads: 3,
            board_reload_cost: 2,
            queue_reload_cost: 1,
            star_cadence: 3,
            max_stars: 2,
            min_selection: 2,
            max_selection: 3,
            points_per_tile: 1,
            line_points: 10,
            reloads_per_line: 1,
            ruleset,
        }
    }

    /// Sum-to-7-or-17 mode on a 3x3 board.
    #[must_use]
    pub fn additive() -> Self {
        Self::base(ModeKind::Additive, Arc::new(Additive::default()))
    }

    /// Multiple-of-7 digit mode on a 3x3 board.
    #[must_use]
    pub fn positional() -> Self {
        let mut mode = Self::base(ModeKind::Positional, Arc::new(Positional::default()));
        mode.star_cadence = 5;
        mode
    }

    /// Built-in mode by kind.
    #[must_use]
    pub fn for_kind(kind: ModeKind) -> Self {
        match kind {
            ModeKind::Additive => Self::additive(),
            ModeKind::Positional => Self::positional(),
        }
    }

    /// Replace the rule strategy.
    #[must_use]
    pub fn with_ruleset(mut self, ruleset: Arc<dyn Ruleset>) -> Self {
        self.ruleset = ruleset;
        self
    }

    /// Set the selection size bounds.
    #[must_use]
    pub fn with_selection_bounds(mut self, min: usize, max: usize) -> Self {
        assert!(min >= 1 && min <= max, "Selection bounds must satisfy 1 <= min <= max");
        self.min_selection = min;
        self.max_selection = max;
        self
    }

    /// Set the star spawn cadence.
    #[must_use]
    pub fn with_star_cadence(mut self, cadence: u32) -> Self {
        assert!(cadence > 0, "Star cadence must be positive");
        self.star_cadence = cadence;
        self
    }

    /// Set the starting reload budget.
    #[must_use]
    pub fn with_initial_reloads(mut self, reloads: u32) -> Self {
        self.initial_reloads = reloads;
        self
    }

    /// Board side length.
    #[must_use]
    pub fn size(&self) -> usize {
        self.line_length
    }

    /// A fresh pool for this mode.
    #[must_use]
    pub fn pool(&self) -> NumberPool {
        NumberPool::from_alphabets(&self.regular_alphabet, &self.block_alphabet, self.copies)
    }

    /// Tile for a dealt value.
    #[must_use]
    pub fn tile_for(&self, value: u8) -> Tile {
        if self.block_alphabet.contains(&value) && !self.regular_alphabet.contains(&value) {
            Tile::Block(value)
        } else {
            Tile::Regular(value)
        }
    }

    /// Points for `lines` lines completed in one drag.
    #[must_use]
    pub fn score_for_lines(&self, lines: usize) -> u32 {
        let k = lines as u32;
        self.line_points * k * k
    }

    // === Rule predicates ===

    #[must_use]
    pub fn is_win_condition(&self, values: &[u8]) -> bool {
        self.ruleset.is_win_condition(values)
    }

    #[must_use]
    pub fn needed_numbers(&self, line: &[Option<u8>]) -> BTreeSet<u8> {
        self.ruleset.needed_numbers(line)
    }

    #[must_use]
    pub fn star_kind(&self, score: u32) -> StarKind {
        self.ruleset.star_kind(score)
    }

    /// See [`Ruleset::pin_star`].
    pub fn pin_star(&self, candidates: &BTreeSet<u8>) -> Result<Option<u8>, usize> {
        self.ruleset.pin_star(candidates)
    }

    #[must_use]
    pub fn order_sensitive(&self) -> bool {
        self.ruleset.order_sensitive()
    }

    #[must_use]
    pub fn describe(&self, values: &[u8]) -> String {
        self.ruleset.describe(values)
    }
}
