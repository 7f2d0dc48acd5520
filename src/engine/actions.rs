//! Pure game transitions.
//!
//! Each transition reads a snapshot and returns the staged frames that lead
//! to a new one. Nothing here publishes, evaluates or persists: the
//! orchestrator runs the shared evaluation tail on [`Transition::state`]
//! when [`Transition::evaluate`] is set.
//!
//! Returning `Ok(None)` means the intent does not apply to the snapshot and
//! is ignored.

use std::collections::BTreeSet;

use tracing::debug;

use super::deal::Dealer;
use crate::core::{
    Board, DisplayMessage, EngineError, GameRng, GameState, MessageKey, Position, Tile,
};
use crate::eval::{is_line_winning, resolve_stars};
use crate::mutators::{self, QueueInsert};
use crate::rules::GameMode;
use crate::topology::LineId;

/// Result of one transition.
#[derive(Clone, Debug)]
pub struct Transition {
    /// Intermediate snapshots, published in order before `state`.
    pub frames: Vec<GameState>,

    /// Resulting snapshot.
    pub state: GameState,

    /// Run the evaluation tail and persist `state`.
    pub evaluate: bool,

    /// A winning selection is waiting for its grace window.
    pub grace_window: bool,
}

impl Transition {
    /// A single-frame change that needs no evaluation.
    #[must_use]
    pub fn immediate(state: GameState) -> Self {
        Self {
            frames: Vec::new(),
            state,
            evaluate: false,
            grace_window: false,
        }
    }

    /// A committed change: the last staged frame becomes the result.
    fn committed(mut frames: Vec<GameState>, fallback: GameState) -> Self {
        let state = frames.pop().unwrap_or(fallback);
        Self {
            frames,
            state,
            evaluate: true,
            grace_window: false,
        }
    }
}

/// A line drag in progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragPath {
    /// Board when the drag started; stars are unresolved here.
    pub base_board: Board,

    /// Visited positions in order.
    pub path: Vec<Position>,

    /// Path length at the moment each completed line was recognised.
    pub marks: Vec<usize>,

    /// Completed lines in completion order.
    pub completed: Vec<LineId>,
}

impl DragPath {
    fn new(base_board: Board, start: Position) -> Self {
        Self {
            base_board,
            path: vec![start],
            marks: Vec::new(),
            completed: Vec::new(),
        }
    }

    /// The board shown for this drag: stars resolved over completed lines.
    #[must_use]
    pub fn derived_board(&self, mode: &GameMode) -> Board {
        resolve_stars(&self.base_board, &self.completed, mode)
    }

    /// Every position covered by a completed line.
    #[must_use]
    pub fn line_positions(&self, size: usize) -> Vec<Position> {
        let covered: BTreeSet<Position> = self
            .completed
            .iter()
            .flat_map(|line| line.positions(size))
            .collect();
        covered.into_iter().collect()
    }

    /// Candidate segment since the last completed line.
    ///
    /// The segment may start on the last cell of the previous line so that
    /// consecutive lines can share a corner.
    fn segment(&self, size: usize) -> Option<&[Position]> {
        let mark = self.marks.last().copied().unwrap_or(0);
        let tail = &self.path[mark..];
        if tail.len() == size {
            Some(tail)
        } else if mark > 0 && tail.len() + 1 == size {
            Some(&self.path[mark - 1..])
        } else {
            None
        }
    }

    fn step_back(&mut self) {
        self.path.pop();
        if self.marks.last().is_some_and(|&mark| mark > self.path.len()) {
            self.marks.pop();
            self.completed.pop();
        }
    }

    fn step_to(&mut self, pos: Position, mode: &GameMode) {
        self.path.push(pos);

        let size = self.base_board.size();
        let Some(line) = self.segment(size).and_then(|seg| LineId::from_positions(seg, size)) else {
            return;
        };
        if self.completed.contains(&line) {
            return;
        }
        if is_line_winning(&self.derived_board(mode), line, mode) {
            debug!(%line, "line completed");
            self.completed.push(line);
            self.marks.push(self.path.len());
        }
    }
}

/// What releasing a drag amounts to.
#[derive(Clone, Debug)]
pub enum LineRelease {
    /// At least one line was completed.
    Commit(Transition),
    /// A tap on a single cell: treat as a selection of that cell.
    Select(GameState, Position),
    /// Nothing completed; the path is dropped.
    Discard(GameState),
}

fn stage(frames: &mut Vec<GameState>, state: &GameState) {
    frames.push(state.clone());
}

/// Fill every empty board cell in diagonal order, then the whole queue.
fn deal_fresh(
    state: &mut GameState,
    frames: &mut Vec<GameState>,
    dealer: &mut Dealer,
    mode: &GameMode,
    rng: &mut GameRng,
) -> Result<(), EngineError> {
    for pos in mutators::sort_diagonally(&state.board.empty_positions()) {
        let tile = dealer.draw(mode, rng)?;
        state.board = mutators::place(&state.board, pos, tile);
        stage(frames, state);
    }
    Ok(())
}

fn deal_queue(
    state: &mut GameState,
    frames: &mut Vec<GameState>,
    dealer: &mut Dealer,
    mode: &GameMode,
    rng: &mut GameRng,
) -> Result<(), EngineError> {
    for _ in 0..mode.queue_size {
        let tile = dealer.draw(mode, rng)?;
        state.queue = mutators::enqueue(&state.queue, tile, QueueInsert::Fifo);
        stage(frames, state);
    }
    Ok(())
}

/// Clear `positions` and refill them from the queue front, backfilling the
/// queue from a fresh dealer.
fn refill(
    state: &mut GameState,
    frames: &mut Vec<GameState>,
    positions: &[Position],
    mode: &GameMode,
    rng: &mut GameRng,
) -> Result<(), EngineError> {
    state.board = mutators::clear(&state.board, positions);
    stage(frames, state);

    let in_play: Vec<Tile> = state.board.tiles().chain(state.queue.iter()).collect();
    let mut dealer = Dealer::new(mode, in_play, rng);

    for pos in mutators::sort_diagonally(positions) {
        let landing = state.queue.front();
        state.board = mutators::place(&state.board, pos, landing);
        let incoming = dealer.draw(mode, rng)?;
        state.queue = mutators::enqueue(&state.queue, incoming, QueueInsert::Fifo);
        stage(frames, state);
    }
    Ok(())
}

/// NEW_GAME: empty board, fresh budget, board then queue dealt tile by tile.
///
/// # Errors
///
/// [`EngineError::PoolExhausted`] if the mode's pool cannot fill the board
/// and queue.
pub fn new_game(mode: &GameMode, rng: &mut GameRng) -> Result<Transition, EngineError> {
    let mut state = GameState::empty(mode);
    let mut frames = vec![state.clone()];
    let mut dealer = Dealer::new(mode, std::iter::empty(), rng);

    deal_fresh(&mut state, &mut frames, &mut dealer, mode, rng)?;
    deal_queue(&mut state, &mut frames, &mut dealer, mode, rng)?;

    Ok(Transition::committed(frames, state))
}

fn refuse_reload(state: &GameState, cost: u32) -> Transition {
    debug!(reloads_left = state.reloads_left, cost, "reload refused");
    let mut next = state.clone();
    next.message = Some(DisplayMessage::with_args(
        MessageKey::NotEnoughReloads,
        vec![state.reloads_left.to_string(), cost.to_string()],
    ));
    Transition::immediate(next)
}

/// RELOAD_BOARD: spend the board cost and redeal the board only.
///
/// With too small a budget the snapshot only gains a
/// [`MessageKey::NotEnoughReloads`] message.
///
/// # Errors
///
/// [`EngineError::PoolExhausted`] if the redeal runs dry.
pub fn reload_board(
    state: &GameState,
    mode: &GameMode,
    rng: &mut GameRng,
) -> Result<Transition, EngineError> {
    let cost = mode.board_reload_cost;
    if state.reloads_left < cost {
        return Ok(refuse_reload(state, cost));
    }

    let mut next = state.clone();
    next.reloads_left -= cost;
    next.clear_interaction();
    next.message = None;
    next.board = mutators::empty_board(mode.size());

    let mut frames = vec![next.clone()];
    let mut dealer = Dealer::new(mode, next.queue.to_vec(), rng);
    deal_fresh(&mut next, &mut frames, &mut dealer, mode, rng)?;

    Ok(Transition::committed(frames, next))
}

/// RELOAD_QUEUE: spend the queue cost and redeal the queue only.
///
/// # Errors
///
/// [`EngineError::PoolExhausted`] if the redeal runs dry.
pub fn reload_queue(
    state: &GameState,
    mode: &GameMode,
    rng: &mut GameRng,
) -> Result<Transition, EngineError> {
    let cost = mode.queue_reload_cost;
    if state.reloads_left < cost {
        return Ok(refuse_reload(state, cost));
    }

    let mut next = state.clone();
    next.reloads_left -= cost;
    next.clear_interaction();
    next.message = None;

    let mut frames = vec![next.clone()];
    let mut dealer = Dealer::new(mode, next.board.to_row_major(), rng);
    deal_queue(&mut next, &mut frames, &mut dealer, mode, rng)?;

    Ok(Transition::committed(frames, next))
}

/// SELECT: toggle a regular tile in the multi-selection.
///
/// A winning selection below the maximum opens the grace window; at the
/// maximum it commits, and a losing maximal selection is cleared.
///
/// # Errors
///
/// Errors from [`complete_selection`] when the selection commits.
pub fn select(
    state: &GameState,
    pos: Position,
    mode: &GameMode,
    rng: &mut GameRng,
) -> Result<Option<Transition>, EngineError> {
    if !state.board_state.accepts_selection() || !pos.in_bounds(mode.size()) {
        return Ok(None);
    }
    if !state.board.get(pos).is_selectable() {
        return Ok(None);
    }

    let mut next = state.clone();
    next.selection_pending = false;
    match next.selected_positions.iter().position(|&p| p == pos) {
        Some(idx) => {
            next.selected_positions.remove(idx);
        }
        None => next.selected_positions.push(pos),
    }

    let values = next.selected_values();
    next.message = if values.is_empty() {
        None
    } else {
        Some(DisplayMessage::with_args(
            MessageKey::Selection,
            vec![mode.describe(&values)],
        ))
    };

    let count = values.len();
    if count < mode.min_selection {
        return Ok(Some(Transition::immediate(next)));
    }

    let wins = mode.is_win_condition(&values);
    if wins && count < mode.max_selection {
        next.selection_pending = true;
        let mut transition = Transition::immediate(next);
        transition.grace_window = true;
        return Ok(Some(transition));
    }
    if wins {
        let mut transition = complete_selection(&next, mode, rng)?;
        transition.frames.insert(0, next);
        return Ok(Some(transition));
    }
    if count >= mode.max_selection {
        debug!(?values, "maximal selection does not win");
        next.selected_positions.clear();
    }
    Ok(Some(Transition::immediate(next)))
}

/// COMPLETE_SELECTION: score the selection, maybe spawn a star, refill.
///
/// Returns an immediate no-op transition when the selection is not winning.
///
/// # Errors
///
/// [`EngineError::PoolExhausted`] if the backfill runs dry.
pub fn complete_selection(
    state: &GameState,
    mode: &GameMode,
    rng: &mut GameRng,
) -> Result<Transition, EngineError> {
    let values = state.selected_values();
    if values.len() < mode.min_selection || !mode.is_win_condition(&values) {
        return Ok(Transition::immediate(state.clone()));
    }

    let positions = state.selected_positions.clone();
    let mut next = state.clone();
    next.score += mode.points_per_tile * values.len() as u32;
    next.turns += 1;
    next.clear_interaction();

    let stars = next.board.star_count() + next.queue.star_count();
    if mode.star_cadence > 0 && next.turns % mode.star_cadence == 0 && stars < mode.max_stars {
        let kind = mode.star_kind(next.score);
        debug!(?kind, turns = next.turns, "star spawned");
        next.queue = mutators::enqueue(&next.queue, Tile::star(kind), QueueInsert::ReplaceLast);
    }

    let mut frames = Vec::new();
    refill(&mut next, &mut frames, &positions, mode, rng)?;
    Ok(Transition::committed(frames, next))
}

/// LINE_START: begin a drag on an in-bounds cell.
#[must_use]
pub fn start_line(
    state: &GameState,
    pos: Option<Position>,
    mode: &GameMode,
) -> Option<(DragPath, GameState)> {
    let pos = pos.filter(|p| p.in_bounds(mode.size()))?;
    if !state.board_state.accepts_drag() {
        return None;
    }

    let drag = DragPath::new(state.board.clone(), pos);
    let mut next = state.clone();
    next.lined_positions = drag.path.clone();
    next.completed_lines.clear();
    if !next.selected_positions.is_empty() {
        next.selected_positions.clear();
        next.selection_pending = false;
        next.message = None;
    }
    Some((drag, next))
}

/// LINE_DRAG: extend or shorten the path by one cell.
///
/// Returns `None` for a step that is not a move: off the board, onto the
/// current cell, not adjacent, or onto an already-visited cell other than
/// the previous one.
#[must_use]
pub fn drag_line(
    state: &GameState,
    drag: &DragPath,
    pos: Option<Position>,
    mode: &GameMode,
) -> Option<(DragPath, GameState)> {
    let pos = pos.filter(|p| p.in_bounds(mode.size()))?;
    let &last = drag.path.last()?;
    if pos == last {
        return None;
    }

    let mut next_drag = drag.clone();
    let len = drag.path.len();
    if len >= 2 && drag.path[len - 2] == pos {
        next_drag.step_back();
    } else if last.is_adjacent(pos) && !drag.path.contains(&pos) {
        next_drag.step_to(pos, mode);
    } else {
        return None;
    }

    let mut next = state.clone();
    next.board = next_drag.derived_board(mode);
    next.lined_positions = next_drag.path.clone();
    next.completed_lines = next_drag.completed.clone();
    Some((next_drag, next))
}

/// LINE_END: commit completed lines, or fall back to a tap or a discard.
///
/// # Errors
///
/// [`EngineError::PoolExhausted`] if the refill runs dry.
pub fn end_line(
    state: &GameState,
    drag: &DragPath,
    mode: &GameMode,
    rng: &mut GameRng,
) -> Result<LineRelease, EngineError> {
    let mut next = state.clone();
    next.lined_positions.clear();
    next.completed_lines.clear();

    if drag.completed.is_empty() {
        next.board = drag.base_board.clone();
        return Ok(match drag.path.as_slice() {
            &[pos] => LineRelease::Select(next, pos),
            _ => LineRelease::Discard(next),
        });
    }

    let lines = drag.completed.len();
    let points = mode.score_for_lines(lines);
    let positions = drag.line_positions(mode.size());

    next.board = drag.derived_board(mode);
    next.score += points;
    next.reloads_left += mode.reloads_per_line * lines as u32;
    next.clear_interaction();
    next.message = Some(DisplayMessage::with_args(
        MessageKey::LinesCompleted,
        vec![lines.to_string(), points.to_string()],
    ));
    debug!(lines, points, "lines committed");

    let mut frames = Vec::new();
    refill(&mut next, &mut frames, &positions, mode, rng)?;
    Ok(LineRelease::Commit(Transition::committed(frames, next)))
}
