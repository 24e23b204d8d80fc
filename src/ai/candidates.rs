//! 候補手の生成
//! 探索の分岐数を抑えるため、既存の石に隣接する空きマスだけを候補にする。

use std::collections::BTreeSet;

use crate::game::{Board, Position};

pub struct CandidateGenerator;

impl CandidateGenerator {
    /// 石のあるマスの8近傍にある空きマスを重複なく行優先順で返す
    /// 石が1つもない盤面では中央のみ、石があって空き近傍がない（満杯）場合は空
    pub fn candidates(board: &Board) -> Vec<Position> {
        if board.is_blank() {
            return vec![board.center()];
        }

        let size = board.size();
        let mut candidates = BTreeSet::new();

        for (position, _) in board.occupied() {
            for dr in -1..=1 {
                for dc in -1..=1 {
                    if let Some(neighbor) = position.offset(dr, dc, size) {
                        if board.is_empty(neighbor) {
                            candidates.insert(neighbor);
                        }
                    }
                }
            }
        }

        candidates.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Cell;

    #[test]
    fn test_empty_board_returns_center() {
        assert_eq!(CandidateGenerator::candidates(&Board::new()), vec![Position { row: 10, col: 10 }]);
        assert_eq!(CandidateGenerator::candidates(&Board::with_size(7)), vec![Position { row: 3, col: 3 }]);
    }

    #[test]
    fn test_single_stone_neighbors() {
        let mut board = Board::new();
        board.set_cell(Position { row: 10, col: 10 }, Cell::Black);

        let candidates = CandidateGenerator::candidates(&board);
        assert_eq!(candidates.len(), 8);
        for c in &candidates {
            assert!(c.row.abs_diff(10) <= 1 && c.col.abs_diff(10) <= 1);
            assert_ne!(*c, Position { row: 10, col: 10 });
        }
    }

    #[test]
    fn test_corner_stone_is_bounds_checked() {
        let mut board = Board::new();
        board.set_cell(Position { row: 0, col: 0 }, Cell::White);

        let candidates = CandidateGenerator::candidates(&board);
        assert_eq!(
            candidates,
            vec![
                Position { row: 0, col: 1 },
                Position { row: 1, col: 0 },
                Position { row: 1, col: 1 },
            ]
        );
    }

    #[test]
    fn test_overlapping_neighborhoods_are_deduplicated() {
        let mut board = Board::new();
        board.set_cell(Position { row: 5, col: 5 }, Cell::Black);
        board.set_cell(Position { row: 5, col: 6 }, Cell::White);

        let candidates = CandidateGenerator::candidates(&board);
        // 3x4の矩形から石のある2マスを除く
        assert_eq!(candidates.len(), 10);
        assert!(candidates.windows(2).all(|w| w[0] < w[1]));
        assert!(!candidates.contains(&Position { row: 5, col: 5 }));
        assert!(!candidates.contains(&Position { row: 5, col: 6 }));
    }

    #[test]
    fn test_full_board_has_no_candidates() {
        let mut board = Board::with_size(4);
        for row in 0..4 {
            for col in 0..4 {
                let cell = if (row + col) % 2 == 0 { Cell::Black } else { Cell::White };
                board.set_cell(Position { row, col }, cell);
            }
        }

        assert!(CandidateGenerator::candidates(&board).is_empty());
    }
}
