//! 五目並べのルールとゲームロジック実装モジュール
//! 着手の検証、勝利判定、引き分け判定などを担当する。

use serde::{Deserialize, Serialize};

use super::board::Board;
use super::state::GameState;
use super::types::{Move, Player, Position};
use crate::error::{GameError, Result};

/// 連の判定に使う4軸の方向ベクトル
/// 横、縦、右下がり斜め、右上がり斜め
pub const DIRECTIONS: [(isize, isize); 4] = [
    (0, 1),  // 横
    (1, 0),  // 縦
    (1, 1),  // 右下がり
    (1, -1), // 右上がり
];

/// 1手を適用した結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// ゲーム続行
    Continue,
    /// 着手したプレイヤーの勝利
    Win(Player),
    /// 盤面が埋まり引き分け
    Draw,
}

/// 五目並べのルールを実装する構造体
/// スタティックメソッドのみを提供する
pub struct GomokuRules;

impl GomokuRules {
    /// 直前に置かれた石で勝利条件を満たしたか判定する
    /// 各軸について正負両方向に同色の連続石を数え、起点の1個を足してwin_length以上なら勝ち
    pub fn check_win(board: &Board, position: Position, player: Player, win_length: usize) -> bool {
        let cell = player.to_cell();
        let size = board.size();

        DIRECTIONS.iter().any(|&(dr, dc)| {
            let mut count = 1;
            for sign in [1, -1] {
                let mut current = position;
                while let Some(next) = current.offset(dr * sign, dc * sign, size) {
                    if board.get_cell(next) != Some(cell) {
                        break;
                    }
                    count += 1;
                    current = next;
                }
            }
            count >= win_length
        })
    }

    /// 着手位置が盤面内かつ空きマスであることを検証する
    pub fn validate_move(board: &Board, position: Position) -> Result<()> {
        if !board.contains(position) {
            return Err(GameError::InvalidCoordinate {
                row: i64::try_from(position.row).unwrap_or(i64::MAX),
                col: i64::try_from(position.col).unwrap_or(i64::MAX),
            });
        }

        if !board.is_empty(position) {
            return Err(GameError::CellOccupied {
                row: position.row,
                col: position.col,
            });
        }

        Ok(())
    }

    /// 指定したプレイヤーの手を適用し、勝敗・引き分けを判定する
    /// 終了済みゲームへの着手はGameAlreadyOverで拒否する
    pub fn apply_move(game_state: &mut GameState, position: Position, player: Player) -> Result<MoveOutcome> {
        if game_state.is_finished() {
            return Err(GameError::GameAlreadyOver);
        }

        Self::validate_move(&game_state.board, position)?;

        game_state.board.set_cell(position, player.to_cell());
        game_state.add_move(Move::new(player, position));

        if Self::check_win(&game_state.board, position, player, game_state.win_length) {
            game_state.finish(Some(player));
            return Ok(MoveOutcome::Win(player));
        }

        if game_state.board.is_full() {
            game_state.finish(None);
            return Ok(MoveOutcome::Draw);
        }

        Ok(MoveOutcome::Continue)
    }
}
