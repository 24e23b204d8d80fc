//! ゲームの基本型定義モジュール
//! 五目並べで使用される基本的な型とenum、構造体を定義する。

use serde::{Deserialize, Serialize};

/// 盤面の一辺のマス数（デフォルト）
pub const BOARD_SIZE: usize = 20;

/// 勝利に必要な連続石数（デフォルト）
pub const WIN_LENGTH: usize = 5;

/// 盤面の各マスの状態を表現するenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Black,
    White,
}

/// ゲームのプレイヤーを表すenum
/// 人間が先手（黒）、マシンが後手（白）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Human,
    Machine,
}

impl Player {
    /// 相手プレイヤーを返す
    pub fn opposite(self) -> Player {
        match self {
            Player::Human => Player::Machine,
            Player::Machine => Player::Human,
        }
    }

    /// プレイヤーを対応するセル状態に変換する
    pub fn to_cell(self) -> Cell {
        match self {
            Player::Human => Cell::Black,
            Player::Machine => Cell::White,
        }
    }

    /// セル状態から石の持ち主を求める
    /// 空マスの場合はNoneを返す
    pub fn from_cell(cell: Cell) -> Option<Player> {
        match cell {
            Cell::Black => Some(Player::Human),
            Cell::White => Some(Player::Machine),
            Cell::Empty => None,
        }
    }
}

/// 盤面上の座標を表す構造体
/// 導出されたOrdは行優先順（row, col）になり、候補手の列挙順として使う
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// 標準盤面（20x20）の範囲チェック付きコンストラクタ
    /// 範囲外の座標の場合はNoneを返す
    pub fn new(row: usize, col: usize) -> Option<Position> {
        Self::checked(row, col, BOARD_SIZE)
    }

    /// 任意サイズの盤面に対する範囲チェック付きコンストラクタ
    pub fn checked(row: usize, col: usize, size: usize) -> Option<Position> {
        if row < size && col < size {
            Some(Position { row, col })
        } else {
            None
        }
    }

    /// 座標が一辺sizeの盤面の範囲内かチェックする
    pub fn is_valid_for(&self, size: usize) -> bool {
        self.row < size && self.col < size
    }

    /// 座標を(dr, dc)だけずらした位置を返す
    /// 盤面外に出る場合はNone
    pub fn offset(&self, dr: isize, dc: isize, size: usize) -> Option<Position> {
        let row = self.row as isize + dr;
        let col = self.col as isize + dc;
        if row < 0 || col < 0 {
            return None;
        }
        Self::checked(row as usize, col as usize, size)
    }
}

/// ゲームの1手を表現する構造体
/// 打ったプレイヤーと位置、タイムスタンプを保持する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub player: Player,
    pub position: Position,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl Move {
    /// 新しい手を作成する
    /// タイムスタンプは現在時刻で自動設定される
    pub fn new(player: Player, position: Position) -> Self {
        Self {
            player,
            position,
            timestamp: chrono::Utc::now(),
        }
    }
}
