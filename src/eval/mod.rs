//! Board evaluation.
//!
//! Read-only queries over a board and a mode:
//!
//! - [`lines`]: line completion and the available-lines query
//! - [`selection`]: winning-selection search over regular tiles
//! - [`bingo`]: bingo feasibility under unresolved silver stars
//! - [`stars`]: star resolution for completed lines
//!
//! [`evaluate`] runs every query and [`derive_board_state`] classifies the
//! result. The orchestrator runs the same queries concurrently; the pieces
//! here are the synchronous building blocks.

pub mod bingo;
pub mod lines;
pub mod selection;
pub mod stars;

pub use bingo::is_bingo_possible;
pub use lines::{available_lines, is_line_winning};
pub use selection::{find_selection, is_selection_possible};
pub use stars::resolve_stars;

use crate::core::{Board, BoardState, DisplayMessage, EngineError, GameState, MessageKey};
use crate::rules::GameMode;
use crate::topology::{max_lines, LineId};

/// Joined result of the evaluation queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub available_lines: Vec<LineId>,
    pub selection_possible: bool,
    pub bingo_possible: bool,
    pub star_count: usize,
}

/// Reject boards that cannot be evaluated.
///
/// # Errors
///
/// [`EngineError::Structural`] if any cell is empty or the board holds more
/// stars than the mode allows.
pub fn check_structure(board: &Board, mode: &GameMode) -> Result<(), EngineError> {
    if !board.is_complete() {
        return Err(EngineError::structural(format!(
            "{} empty cells",
            board.empty_positions().len()
        )));
    }
    let stars = board.star_count();
    if stars > mode.max_stars {
        return Err(EngineError::structural(format!(
            "{stars} stars, at most {} allowed",
            mode.max_stars
        )));
    }
    Ok(())
}

/// Run every query on one thread.
///
/// # Errors
///
/// Structural errors from [`check_structure`] and contract violations from
/// [`is_bingo_possible`].
pub fn evaluate(board: &Board, mode: &GameMode) -> Result<Evaluation, EngineError> {
    check_structure(board, mode)?;
    Ok(Evaluation {
        available_lines: available_lines(board, mode),
        selection_possible: is_selection_possible(board, mode),
        bingo_possible: is_bingo_possible(board, mode)?,
        star_count: board.star_count(),
    })
}

/// Classify an evaluated board.
#[must_use]
pub fn derive_board_state(
    evaluation: &Evaluation,
    size: usize,
    reloads_left: u32,
    mode: &GameMode,
) -> BoardState {
    if evaluation.available_lines.len() == max_lines(size) && evaluation.bingo_possible {
        BoardState::Bingo
    } else if evaluation.available_lines.is_empty() && !evaluation.selection_possible {
        if reloads_left < mode.board_reload_cost {
            BoardState::GameOver
        } else {
            BoardState::Blocked
        }
    } else {
        BoardState::Ready
    }
}

/// Write an evaluation into a snapshot.
///
/// Terminal-ish states replace the message; `Ready` keeps whatever the
/// transition set.
pub fn apply_evaluation(state: &mut GameState, evaluation: Evaluation, mode: &GameMode) {
    let board_state =
        derive_board_state(&evaluation, state.board.size(), state.reloads_left, mode);

    state.board_state = board_state;
    state.available_lines = evaluation.available_lines;
    state.selection_possible = evaluation.selection_possible;
    state.bingo_possible = evaluation.bingo_possible;

    match board_state {
        BoardState::Ready => {}
        BoardState::Bingo => state.message = Some(DisplayMessage::new(MessageKey::Bingo)),
        BoardState::Blocked => state.message = Some(DisplayMessage::new(MessageKey::Blocked)),
        BoardState::GameOver => state.message = Some(DisplayMessage::new(MessageKey::GameOver)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Tile;
    use crate::core::Tile::Regular as R;

    fn board(tiles: [Tile; 9]) -> Board {
        Board::from_row_major(3, &tiles).unwrap()
    }

    #[test]
    fn test_structure_rejects_empty_cells() {
        let mode = GameMode::additive();
        let err = check_structure(&Board::new(3), &mode).unwrap_err();
        assert!(matches!(err, EngineError::Structural { .. }));
    }

    #[test]
    fn test_structure_rejects_too_many_stars() {
        let mode = GameMode::additive();
        let b = board([
            Tile::GoldenStar, Tile::GoldenStar, Tile::SilverStar(None),
            R(1), R(1), R(1),
            R(1), R(1), R(1),
        ]);
        assert!(check_structure(&b, &mode).is_err());
        assert!(evaluate(&b, &mode).is_err());
    }

    #[test]
    fn test_ready() {
        let mode = GameMode::additive();
        let b = board([R(3), R(4), R(9), R(9), R(9), R(9), R(9), R(9), R(9)]);
        let evaluation = evaluate(&b, &mode).unwrap();

        assert!(evaluation.available_lines.is_empty());
        assert!(evaluation.selection_possible);
        assert_eq!(derive_board_state(&evaluation, 3, 3, &mode), BoardState::Ready);
    }

    #[test]
    fn test_blocked_then_game_over() {
        let mode = GameMode::additive();
        let b = board([R(9); 9]);
        let evaluation = evaluate(&b, &mode).unwrap();

        assert_eq!(derive_board_state(&evaluation, 3, 2, &mode), BoardState::Blocked);
        // A queue reload never changes the board, so only the board cost counts
        assert_eq!(derive_board_state(&evaluation, 3, 1, &mode), BoardState::GameOver);
        assert_eq!(derive_board_state(&evaluation, 3, 0, &mode), BoardState::GameOver);
    }

    #[test]
    fn test_bingo() {
        let mode = GameMode::additive();
        // Outer rows and columns sum to 7; the rest run through the star
        let b = board([
            R(1), R(5), R(1),
            R(5), Tile::GoldenStar, R(5),
            R(1), R(5), R(1),
        ]);
        let evaluation = evaluate(&b, &mode).unwrap();

        assert_eq!(evaluation.available_lines.len(), max_lines(3));
        assert_eq!(derive_board_state(&evaluation, 3, 0, &mode), BoardState::Bingo);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let mode = GameMode::additive();
        let b = board([R(3), R(4), R(9), R(2), R(9), R(9), R(2), R(9), R(9)]);
        assert_eq!(evaluate(&b, &mode), evaluate(&b, &mode));
    }

    #[test]
    fn test_apply_sets_message() {
        let mode = GameMode::additive();
        let mut state = GameState::empty(&mode);
        state.board = board([R(9); 9]);
        state.reloads_left = 0;

        let evaluation = evaluate(&state.board, &mode).unwrap();
        apply_evaluation(&mut state, evaluation, &mode);

        assert_eq!(state.board_state, BoardState::GameOver);
        assert_eq!(state.message, Some(DisplayMessage::new(MessageKey::GameOver)));
    }
}
