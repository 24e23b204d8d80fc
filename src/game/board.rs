//! 五目並べの盤面状態を管理するモジュール
//! NxNグリッドの盤面と石の配置、探索中の仮配置を担当する。

use std::ops::{Deref, DerefMut};

use super::types::{Cell, Position, BOARD_SIZE};
use serde::{Deserialize, Serialize};

/// 五目並べの盤面を表現する構造体
/// 行優先で各マスのCell状態を保持する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// 標準サイズ（20x20）の空盤面を作成する
    pub fn new() -> Self {
        Self::with_size(BOARD_SIZE)
    }

    /// 一辺sizeの空盤面を作成する
    pub fn with_size(size: usize) -> Self {
        Board {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// 座標が盤面内かチェックする
    pub fn contains(&self, position: Position) -> bool {
        position.is_valid_for(self.size)
    }

    /// 中央のマス (N/2, N/2)
    pub fn center(&self) -> Position {
        Position {
            row: self.size / 2,
            col: self.size / 2,
        }
    }

    /// 指定した位置のセル状態を取得する
    /// 範囲外の場合はNoneを返す
    pub fn get_cell(&self, position: Position) -> Option<Cell> {
        if self.contains(position) {
            Some(self.cells[position.row * self.size + position.col])
        } else {
            None
        }
    }

    /// 指定した位置にセル状態を設定する
    /// 範囲外の場合はfalseを返す
    pub fn set_cell(&mut self, position: Position, cell: Cell) -> bool {
        if self.contains(position) {
            self.cells[position.row * self.size + position.col] = cell;
            true
        } else {
            false
        }
    }

    /// 指定した位置が空かチェックする
    pub fn is_empty(&self, position: Position) -> bool {
        matches!(self.get_cell(position), Some(Cell::Empty))
    }

    /// 石が置かれているマスを行優先で列挙する
    pub fn occupied(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell != Cell::Empty)
            .map(move |(index, cell)| {
                (
                    Position {
                        row: index / size,
                        col: index % size,
                    },
                    *cell,
                )
            })
    }

    /// 盤面上の黒石と白石の数を数える
    /// 戻り値: (黒石数, 白石数)
    pub fn count_stones(&self) -> (usize, usize) {
        self.occupied()
            .fold((0, 0), |(black, white), (_, cell)| match cell {
                Cell::Black => (black + 1, white),
                Cell::White => (black, white + 1),
                Cell::Empty => (black, white),
            })
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| *cell != Cell::Empty)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|cell| *cell == Cell::Empty)
    }

    /// 全マスを空に戻す
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// 探索用の仮配置を行う
    /// 戻り値のガードがスコープを抜けると元のセル状態に戻る
    pub fn place_scoped(&mut self, position: Position, cell: Cell) -> Placement<'_> {
        let previous = self.get_cell(position).unwrap_or(Cell::Empty);
        self.set_cell(position, cell);
        Placement {
            board: self,
            position,
            previous,
        }
    }

    /// デバッグ用の盤面表示文字列を生成する
    /// ●で黒、○で白、.で空マスを表現
    pub fn display(&self) -> String {
        let mut result = String::from("   ");
        for col in 0..self.size {
            result.push_str(&format!("{:>2}", col));
        }
        result.push('\n');

        for row in 0..self.size {
            result.push_str(&format!("{:>2} ", row));
            for col in 0..self.size {
                let symbol = match self.cells[row * self.size + col] {
                    Cell::Empty => ".",
                    Cell::Black => "●",
                    Cell::White => "○",
                };
                result.push_str(&format!(" {}", symbol));
            }
            result.push('\n');
        }

        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// 仮配置のガード
/// Drop時に配置前のセル状態を復元するため、枝刈りによる早期脱出でも盤面は元に戻る
pub struct Placement<'a> {
    board: &'a mut Board,
    position: Position,
    previous: Cell,
}

impl Deref for Placement<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for Placement<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for Placement<'_> {
    fn drop(&mut self) {
        self.board.set_cell(self.position, self.previous);
    }
}
