//! AIの盤面評価システム
//! 五目並べのAIが盤面の優劣を判定するための評価関数を提供する。
//! 各石を中心とした4方向の9マス窓に対して形（パターン）を照合し、重み付きで合計する。

use crate::game::{Board, Cell, Player, Position, DIRECTIONS};

/// 窓の中心から片側に見るマス数
const WINDOW_RADIUS: isize = 4;
/// 窓の長さ（中心を含めて9マス）
const WINDOW_LEN: usize = 2 * WINDOW_RADIUS as usize + 1;

/// パターンを構成するトークン
/// 盤面外のマスはどのトークンにも一致しない
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Empty,
    Own,
}

const E: Token = Token::Empty;
const P: Token = Token::Own;

const FIVE: &[Token] = &[P, P, P, P, P];
const OPEN_FOUR: &[Token] = &[E, P, P, P, P, E];
const OPEN_THREE: &[Token] = &[E, P, P, P, E];
const OPEN_TWO: &[Token] = &[E, P, P, E];
const CLOSED_FOUR_RIGHT: &[Token] = &[P, P, P, P, E];
const CLOSED_FOUR_LEFT: &[Token] = &[E, P, P, P, P];
const EDGE_THREE_RIGHT: &[Token] = &[P, P, P, E, E];
const EDGE_THREE_LEFT: &[Token] = &[E, E, P, P, P];

/// 評価に使う形と重みの組
#[derive(Debug, Clone)]
pub struct Pattern {
    pub name: &'static str,
    pub tokens: &'static [Token],
    pub weight: f64,
}

impl Pattern {
    /// 窓のstart位置からこのパターンが完全一致するか
    fn matches_at(&self, window: &[Option<Cell>; WINDOW_LEN], start: usize, own: Cell) -> bool {
        self.tokens.iter().enumerate().all(|(k, token)| {
            match (token, window[start + k]) {
                (Token::Own, Some(cell)) => cell == own,
                (Token::Empty, Some(cell)) => cell == Cell::Empty,
                (_, None) => false,
            }
        })
    }

    /// 窓全体で一致した回数（重なりも個別に数える）
    fn count_in(&self, window: &[Option<Cell>; WINDOW_LEN], own: Cell) -> usize {
        (0..=WINDOW_LEN - self.tokens.len())
            .filter(|&start| self.matches_at(window, start, own))
            .count()
    }
}

/// 評価関数の重み係数を管理する構造体
/// 形ごとの点数と、相手の形に掛ける係数を保持する
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalWeights {
    /// 五連
    pub five: f64,
    /// 両端が空いた四連 `_PPPP_`
    pub open_four: f64,
    /// 片側が空いた四連 `PPPP_` / `_PPPP`
    pub closed_four: f64,
    /// 両端が空いた三連 `_PPP_`
    pub open_three: f64,
    /// 両端が空いた二連 `_PP_`
    pub open_two: f64,
    /// 片側に2マス空きのある三連 `PPP__` / `__PPP`
    pub edge_three: f64,
    /// 相手の石の寄与に掛ける係数
    /// 1未満にすると防御より自分の攻めを優先する
    pub opponent_factor: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            five: 10000.0,
            open_four: 5000.0,
            closed_four: 1000.0,
            open_three: 500.0,
            open_two: 50.0,
            edge_three: 50.0,
            opponent_factor: 0.8,
        }
    }
}

impl EvalWeights {
    /// 相手係数だけを差し替えた重みを作る
    pub fn with_opponent_factor(opponent_factor: f64) -> Self {
        Self {
            opponent_factor,
            ..Self::default()
        }
    }

    /// 照合に使うパターン一覧
    pub fn catalogue(&self) -> [Pattern; 8] {
        [
            Pattern { name: "five", tokens: FIVE, weight: self.five },
            Pattern { name: "open_four", tokens: OPEN_FOUR, weight: self.open_four },
            Pattern { name: "open_three", tokens: OPEN_THREE, weight: self.open_three },
            Pattern { name: "open_two", tokens: OPEN_TWO, weight: self.open_two },
            Pattern { name: "closed_four_right", tokens: CLOSED_FOUR_RIGHT, weight: self.closed_four },
            Pattern { name: "closed_four_left", tokens: CLOSED_FOUR_LEFT, weight: self.closed_four },
            Pattern { name: "edge_three_right", tokens: EDGE_THREE_RIGHT, weight: self.edge_three },
            Pattern { name: "edge_three_left", tokens: EDGE_THREE_LEFT, weight: self.edge_three },
        ]
    }

    /// 探索を打ち切る勝敗確定スコアの閾値
    pub fn win_score(&self) -> f64 {
        self.five
    }
}

/// 盤面評価を行うスタティックメソッド集
pub struct BoardEvaluator;

impl BoardEvaluator {
    /// 指定したプレイヤーにとっての盤面の総合評価値を計算する
    /// 自分の石の寄与は加算、相手の石の寄与はopponent_factor倍して減算するため
    /// evaluate(b, A) と -evaluate(b, B) は一般に一致しない
    pub fn evaluate_position(board: &Board, player: Player, weights: &EvalWeights) -> f64 {
        let patterns = weights.catalogue();
        let own = player.to_cell();

        board
            .occupied()
            .map(|(position, cell)| {
                let contribution = Self::score_point(board, position, cell, &patterns);
                if cell == own {
                    contribution
                } else {
                    -weights.opponent_factor * contribution
                }
            })
            .sum()
    }

    /// 1つの石について、その持ち主から見た形の点数を4方向分合計する
    pub fn evaluate_point(board: &Board, position: Position, owner: Player, weights: &EvalWeights) -> f64 {
        Self::score_point(board, position, owner.to_cell(), &weights.catalogue())
    }

    fn score_point(board: &Board, position: Position, own: Cell, patterns: &[Pattern]) -> f64 {
        DIRECTIONS
            .iter()
            .map(|&direction| {
                let window = Self::extract_window(board, position, direction);
                patterns
                    .iter()
                    .map(|pattern| pattern.count_in(&window, own) as f64 * pattern.weight)
                    .sum::<f64>()
            })
            .sum()
    }

    /// 中心から方向(dr, dc)に沿って-4..=4の9マスを取り出す
    /// 盤面外はNone
    fn extract_window(board: &Board, position: Position, (dr, dc): (isize, isize)) -> [Option<Cell>; WINDOW_LEN] {
        let mut window = [None; WINDOW_LEN];
        for (slot, i) in window.iter_mut().zip(-WINDOW_RADIUS..=WINDOW_RADIUS) {
            *slot = position
                .offset(dr * i, dc * i, board.size())
                .and_then(|pos| board.get_cell(pos));
        }
        window
    }
}
