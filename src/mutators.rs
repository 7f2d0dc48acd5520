//! Pure board and queue transformations.
//!
//! Every function returns a new value; inputs are left untouched.

use crate::core::{Board, Position, Queue, Tile};

/// How a tile joins the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueInsert {
    /// Push to the back and evict the front (oldest) tile.
    Fifo,
    /// Overwrite the last tile.
    ReplaceLast,
}

/// Place a tile on the board.
#[must_use]
pub fn place(board: &Board, pos: Position, tile: Tile) -> Board {
    board.with(pos, tile)
}

/// Set every listed position to `Empty`.
#[must_use]
pub fn clear(board: &Board, positions: &[Position]) -> Board {
    positions.iter().fold(board.clone(), |b, &p| b.with(p, Tile::Empty))
}

/// Add a tile to the queue. Length is preserved in both modes.
#[must_use]
pub fn enqueue(queue: &Queue, tile: Tile, mode: QueueInsert) -> Queue {
    let mut tiles = queue.inner().clone();
    if tiles.is_empty() {
        return queue.clone();
    }
    match mode {
        QueueInsert::Fifo => {
            tiles.pop_front();
            tiles.push_back(tile);
        }
        QueueInsert::ReplaceLast => {
            let last = tiles.len() - 1;
            tiles.set(last, tile);
        }
    }
    Queue::from_inner(tiles)
}

/// Order positions for staged filling: by `row + col`, ties in position order.
#[must_use]
pub fn sort_diagonally(positions: &[Position]) -> Vec<Position> {
    let mut sorted = positions.to_vec();
    sorted.sort_by_key(|&p| (p.diagonal_rank(), p));
    sorted
}

/// An N x N board of `Empty` cells.
#[must_use]
pub fn empty_board(size: usize) -> Board {
    Board::new(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_place_returns_new_board() {
        let board = empty_board(3);
        let placed = place(&board, p(0, 1), Tile::Regular(6));

        assert_eq!(placed.get(p(0, 1)), Tile::Regular(6));
        assert_eq!(board.get(p(0, 1)), Tile::Empty);
    }

    #[test]
    fn test_clear() {
        let board = place(&place(&empty_board(3), p(0, 0), Tile::Regular(1)), p(1, 1), Tile::Regular(2));
        let cleared = clear(&board, &[p(0, 0)]);

        assert_eq!(cleared.get(p(0, 0)), Tile::Empty);
        assert_eq!(cleared.get(p(1, 1)), Tile::Regular(2));
    }

    #[test]
    fn test_enqueue_fifo_evicts_oldest() {
        let queue = Queue::from_tiles(&[Tile::Regular(1), Tile::Regular(2), Tile::Regular(3)]);
        let next = enqueue(&queue, Tile::Regular(4), QueueInsert::Fifo);

        assert_eq!(next.to_vec(), vec![Tile::Regular(2), Tile::Regular(3), Tile::Regular(4)]);
        assert_eq!(queue.front(), Tile::Regular(1));
    }

    #[test]
    fn test_enqueue_replace_last() {
        let queue = Queue::from_tiles(&[Tile::Regular(1), Tile::Regular(2), Tile::Regular(3)]);
        let next = enqueue(&queue, Tile::GoldenStar, QueueInsert::ReplaceLast);

        assert_eq!(next.to_vec(), vec![Tile::Regular(1), Tile::Regular(2), Tile::GoldenStar]);
    }

    #[test]
    fn test_sort_diagonally() {
        let all: Vec<Position> = Position::all(3).collect();
        let sorted = sort_diagonally(&all);

        assert_eq!(sorted[0], p(0, 0));
        assert_eq!(&sorted[1..3], &[p(1, 0), p(0, 1)]);
        assert_eq!(sorted[8], p(2, 2));
        assert!(sorted.windows(2).all(|w| w[0].diagonal_rank() <= w[1].diagonal_rank()));
    }
}
