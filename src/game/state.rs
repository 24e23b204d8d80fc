//! ゲーム状態管理モジュール
//! 1局分の盤面、終局フラグ、手の履歴をまとめたセッションオブジェクトを提供する。

use super::board::Board;
use super::rules::{GomokuRules, MoveOutcome};
use super::types::{Move, Player, Position, BOARD_SIZE, WIN_LENGTH};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ゲームの進行状態を表すenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// ゲーム進行中
    InProgress,
    /// ゲーム終了（勝者なしは引き分け）
    Finished { winner: Option<Player> },
}

/// 五目並べ1局の全体状態を保持する構造体
/// 盤面を所有し、終局後の着手をリセットまで拒否するゲートを兼ねる
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub id: Uuid,
    pub board: Board,
    pub win_length: usize,
    pub game_status: GameStatus,
    pub move_history: Vec<Move>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl GameState {
    /// 標準ルール（20x20、五目）で新しいゲーム状態を作成する
    pub fn new() -> Self {
        Self::with_rules(BOARD_SIZE, WIN_LENGTH)
    }

    /// 盤面サイズと勝利連数を指定してゲーム状態を作成する
    pub fn with_rules(board_size: usize, win_length: usize) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            board: Board::with_size(board_size),
            win_length,
            game_status: GameStatus::InProgress,
            move_history: Vec::new(),
            created_at: now,
            last_updated: now,
        }
    }

    /// 盤面を空に戻し、終局フラグと履歴をクリアする
    pub fn reset(&mut self) {
        self.board.clear();
        self.game_status = GameStatus::InProgress;
        self.move_history.clear();
        self.last_updated = Utc::now();
    }

    /// 人間の手を適用する
    /// 範囲外・既に石がある・終局後の着手はエラーになり、盤面は変更されない
    pub fn apply_human_move(&mut self, position: Position) -> Result<MoveOutcome> {
        GomokuRules::apply_move(self, position, Player::Human)
    }

    /// マシンが選んだ手を適用する
    pub fn apply_machine_move(&mut self, position: Position) -> Result<MoveOutcome> {
        GomokuRules::apply_move(self, position, Player::Machine)
    }

    /// マシンに候補手がない場合に引き分けで終局させる
    pub fn finish_draw(&mut self) {
        self.finish(None);
    }

    /// ゲームが終了しているかチェックする
    pub fn is_finished(&self) -> bool {
        matches!(self.game_status, GameStatus::Finished { .. })
    }

    /// 勝者を返す（未終局・引き分けはNone）
    pub fn winner(&self) -> Option<Player> {
        match self.game_status {
            GameStatus::Finished { winner } => winner,
            GameStatus::InProgress => None,
        }
    }

    /// 手の履歴に新しい手を追加する
    /// 最終更新時刻も同時に更新する
    pub fn add_move(&mut self, game_move: Move) {
        self.move_history.push(game_move);
        self.last_updated = Utc::now();
    }

    /// ゲームを終了させる
    pub fn finish(&mut self, winner: Option<Player>) {
        self.game_status = GameStatus::Finished { winner };
        self.last_updated = Utc::now();
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.move_history.last()
    }

    /// これまでの手数を取得する
    pub fn get_move_count(&self) -> usize {
        self.move_history.len()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
