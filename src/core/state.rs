//! Game state snapshot.
//!
//! ## GameState
//!
//! The single authoritative value the orchestrator publishes:
//! - Board and queue (persistent `im` values)
//! - Score, reload budget, completed selection turns
//! - Derived evaluation: board state, available lines, search flags
//! - In-progress interaction: selection, dragged path, completed lines
//!
//! Snapshots are never edited once published. Transitions clone (O(1))
//! and replace fields.

use serde::{Deserialize, Serialize};

use super::board::{Board, Queue};
use super::position::Position;
use crate::rules::GameMode;
use crate::topology::LineId;

/// Derived board classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardState {
    /// Moves are available.
    #[default]
    Ready,
    /// No line or selection, but a reload is affordable.
    Blocked,
    /// Every line can be completed at once.
    Bingo,
    /// No move and no affordable reload.
    GameOver,
}

impl BoardState {
    /// True while selections are accepted.
    #[must_use]
    pub fn accepts_selection(self) -> bool {
        matches!(self, BoardState::Ready)
    }

    /// True while line drags are accepted.
    #[must_use]
    pub fn accepts_drag(self) -> bool {
        matches!(self, BoardState::Ready | BoardState::Bingo)
    }
}

/// Localisation key of the status message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKey {
    /// Live selection expression. Args: `[expression]`.
    Selection,
    /// Lines cashed in. Args: `[count, points]`.
    LinesCompleted,
    /// Reload refused. Args: `[reloads_left, cost]`.
    NotEnoughReloads,
    Bingo,
    Blocked,
    GameOver,
}

/// Status message for the renderer: a key plus positional arguments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMessage {
    pub key: MessageKey,
    pub args: Vec<String>,
}

impl DisplayMessage {
    #[must_use]
    pub fn new(key: MessageKey) -> Self {
        Self { key, args: Vec::new() }
    }

    #[must_use]
    pub fn with_args(key: MessageKey, args: Vec<String>) -> Self {
        Self { key, args }
    }
}

/// Published game snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    /// N x N board.
    pub board: Board,

    /// Preview queue, index 0 lands next.
    pub queue: Queue,

    /// Cumulative score.
    pub score: u32,

    /// Remaining reload budget.
    pub reloads_left: u32,

    /// Committed selections this game (drives star cadence).
    pub turns: u32,

    /// Derived classification of the board.
    pub board_state: BoardState,

    /// Lines currently completion-eligible.
    pub available_lines: Vec<LineId>,

    /// Lines completed by the drag in progress.
    pub completed_lines: Vec<LineId>,

    /// Multi-selection in selection order.
    pub selected_positions: Vec<Position>,

    /// Drag path in visiting order.
    pub lined_positions: Vec<Position>,

    /// Winning selection awaiting its grace window.
    pub selection_pending: bool,

    /// Some winning selection exists among regular tiles.
    pub selection_possible: bool,

    /// All lines could be completed at once.
    pub bingo_possible: bool,

    /// Status message for the renderer.
    pub message: Option<DisplayMessage>,

    /// Publication counter, strictly increasing.
    pub version: u64,
}

impl GameState {
    /// Blank snapshot for a mode: empty board and queue, fresh budget.
    #[must_use]
    pub fn empty(mode: &GameMode) -> Self {
        Self {
            board: Board::new(mode.size()),
            queue: Queue::new(mode.queue_size),
            score: 0,
            reloads_left: mode.initial_reloads,
            turns: 0,
            board_state: BoardState::Ready,
            available_lines: Vec::new(),
            completed_lines: Vec::new(),
            selected_positions: Vec::new(),
            lined_positions: Vec::new(),
            selection_pending: false,
            selection_possible: false,
            bingo_possible: false,
            message: None,
            version: 0,
        }
    }

    /// Values of the current selection, in selection order.
    #[must_use]
    pub fn selected_values(&self) -> Vec<u8> {
        self.selected_positions
            .iter()
            .filter_map(|&p| self.board.get(p).value())
            .collect()
    }

    /// Drop any selection and drag bookkeeping.
    pub fn clear_interaction(&mut self) {
        self.selected_positions.clear();
        self.lined_positions.clear();
        self.completed_lines.clear();
        self.selection_pending = false;
    }
}
