//! Line completion.

use smallvec::SmallVec;

use crate::core::{Board, Tile};
use crate::rules::GameMode;
use crate::topology::LineId;

/// Line values for `needed_numbers`: unresolved stars become `None`.
pub(crate) fn line_values(tiles: &[Tile]) -> SmallVec<[Option<u8>; 9]> {
    tiles.iter().map(|t| t.value()).collect()
}

/// Is this line winning on the given board?
///
/// Optimistic about wildcards: a golden star or an unresolved silver star
/// means the line could still win. Any `Empty` cell means it cannot.
#[must_use]
pub fn is_line_winning(board: &Board, line: LineId, mode: &GameMode) -> bool {
    let tiles = board.line_tiles(line);

    if tiles.iter().any(|t| t.is_empty()) {
        return false;
    }
    if tiles.iter().any(|t| t.is_golden() || t.is_unresolved_silver()) {
        return true;
    }

    let values: SmallVec<[u8; 9]> = tiles.iter().filter_map(|t| t.value()).collect();
    mode.is_win_condition(&values)
}

/// Lines currently completion-eligible, in [`LineId::all`] order.
#[must_use]
pub fn available_lines(board: &Board, mode: &GameMode) -> Vec<LineId> {
    LineId::matching(board.size(), |line| is_line_winning(board, line, mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Position;
    use crate::topology::Direction;

    fn board(values: [u8; 9]) -> Board {
        let tiles: Vec<Tile> = values.iter().map(|&v| Tile::Regular(v)).collect();
        Board::from_row_major(3, &tiles).unwrap()
    }

    #[test]
    fn test_winning_row() {
        let mode = GameMode::additive();
        let b = board([1, 2, 4, 9, 9, 9, 9, 9, 9]);
        assert!(is_line_winning(&b, LineId::build(Direction::Horizontal, 0), &mode));
        assert!(!is_line_winning(&b, LineId::build(Direction::Horizontal, 1), &mode));
    }

    #[test]
    fn test_block_counts_towards_line() {
        let mode = GameMode::additive();
        let b = board([3, 4, 9, 9, 9, 9, 9, 9, 9]).with(Position::new(0, 2), Tile::Block(0));
        assert!(is_line_winning(&b, LineId::build(Direction::Horizontal, 0), &mode));
    }

    #[test]
    fn test_stars_are_optimistic() {
        let mode = GameMode::additive();
        let base = board([9; 9]);
        let row = LineId::build(Direction::Horizontal, 0);

        let golden = base.with(Position::new(0, 0), Tile::GoldenStar);
        assert!(is_line_winning(&golden, row, &mode));

        // 9 + 9 + x can never be 7 or 17 for x >= 0, but it is unresolved
        let silver = base.with(Position::new(0, 0), Tile::SilverStar(None));
        assert!(is_line_winning(&silver, row, &mode));

        let resolved = base.with(Position::new(0, 0), Tile::SilverStar(Some(0)));
        assert!(!is_line_winning(&resolved, row, &mode));
    }

    #[test]
    fn test_empty_cell_never_wins() {
        let mode = GameMode::additive();
        let b = board([9; 9])
            .with(Position::new(0, 0), Tile::GoldenStar)
            .with(Position::new(0, 1), Tile::Empty);
        assert!(!is_line_winning(&b, LineId::build(Direction::Horizontal, 0), &mode));
    }

    #[test]
    fn test_available_lines() {
        let mode = GameMode::additive();
        // Row 0 sums to 7, column 0 sums to 1 + 8 + 8 = 17
        let b = board([1, 2, 4, 8, 9, 9, 8, 9, 9]);
        let lines: Vec<u8> = available_lines(&b, &mode).iter().map(|l| l.code()).collect();
        assert_eq!(lines, vec![20, 30]);
    }
}
