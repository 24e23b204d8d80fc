//! AI戦略の実装モジュール
//! ミニマックス法とαβ法による着手探索を定義し、
//! 統一されたインターフェースで提供する。

use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::candidates::CandidateGenerator;
use super::evaluation::{BoardEvaluator, EvalWeights};
use crate::config::EngineConfig;
use crate::game::{Board, Player, Position};

/// ルートの着手の後に渡す探索深度（デフォルト）
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// 探索アルゴリズムの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    /// αβ枝刈り付きミニマックス（通常はこちら）
    AlphaBeta,
    /// 枝刈りなしの全探索ミニマックス
    Minimax,
}

impl StrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::AlphaBeta => "AlphaBetaAI",
            StrategyKind::Minimax => "MinimaxAI",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "alphabeta" | "alpha_beta" | "alpha-beta" => Ok(StrategyKind::AlphaBeta),
            "minimax" => Ok(StrategyKind::Minimax),
            _ => Err(format!("Invalid strategy: {}. Valid options: alphabeta, minimax", s)),
        }
    }
}

/// 1回の着手探索の結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    /// 選ばれた手（候補手がなければNone = 引き分け）
    pub best_move: Option<Position>,
    /// 選ばれた手の評価値（マシン視点）
    pub score: f64,
    /// minimaxの呼び出し回数
    pub nodes_evaluated: u64,
    /// ルート着手の後に探索した深度
    pub depth: u32,
    /// 期限切れでルートの候補を打ち切った場合はfalse
    pub completed: bool,
}

/// AI戦略の共通インターフェース
/// 盤面は探索中に仮配置で書き換えられるが、戻る時点では必ず呼び出し前と同一になる
pub trait AIStrategy: Send + Sync {
    /// マシンの手を探索する
    /// deadlineはルートの候補手の間でのみ確認し、超過時はそれまでの最善手を返す
    fn calculate_move(&self, board: &mut Board, deadline: Option<Instant>) -> SearchOutcome;
    /// このAIの探索アルゴリズムを返す
    fn kind(&self) -> StrategyKind;
    /// AIの名前を返す
    fn get_name(&self) -> &'static str {
        self.kind().name()
    }
}

/// ルートでの手選択
/// 各候補にマシンの石を仮配置してscore_replyで評価し、厳密に大きい値のみ更新する（同点は先着優先）
fn search_root<F>(board: &mut Board, depth: u32, deadline: Option<Instant>, mut score_reply: F) -> SearchOutcome
where
    F: FnMut(&mut Board, &mut u64) -> f64,
{
    let mut best_move = None;
    let mut best_score = f64::NEG_INFINITY;
    let mut nodes_evaluated = 0;
    let mut completed = true;

    for position in CandidateGenerator::candidates(board) {
        if best_move.is_some() && deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            completed = false;
            break;
        }

        let score = {
            let mut placed = board.place_scoped(position, Player::Machine.to_cell());
            score_reply(&mut *placed, &mut nodes_evaluated)
        };

        if score > best_score {
            best_score = score;
            best_move = Some(position);
        }
    }

    debug!(
        best_move = ?best_move,
        score = best_score,
        nodes = nodes_evaluated,
        completed,
        "root search finished"
    );

    SearchOutcome {
        best_move,
        score: best_score,
        nodes_evaluated,
        depth,
        completed,
    }
}

/// αβ法（アルファベータ法）を使用するAI実装
/// ミニマックス法に枝刈りを追加して高速化したAI
#[derive(Debug, Clone)]
pub struct AlphaBetaAI {
    /// 探索深度（手数）
    pub depth: u32,
    weights: EvalWeights,
}

impl AlphaBetaAI {
    /// 指定した探索深度で新しいAlphaBetaAIを作成する
    pub fn new(depth: u32) -> Self {
        Self::with_weights(depth, EvalWeights::default())
    }

    pub fn with_weights(depth: u32, weights: EvalWeights) -> Self {
        AlphaBetaAI { depth, weights }
    }

    /// マシンの最善手を選ぶ（時間制限なし）
    pub fn choose_machine_move(&self, board: &mut Board) -> SearchOutcome {
        self.calculate_move(board, None)
    }

    /// αβ枝刈り付きミニマックス
    /// depthが0、または勝敗確定スコアに達した局面では静的評価をそのまま返す
    pub fn minimax(
        &self,
        board: &mut Board,
        depth: u32,
        maximizing: bool,
        mut alpha: f64,
        mut beta: f64,
        nodes: &mut u64,
    ) -> f64 {
        *nodes += 1;
        let score = BoardEvaluator::evaluate_position(board, Player::Machine, &self.weights);
        if depth == 0 || score.abs() >= self.weights.win_score() {
            return score;
        }

        let candidates = CandidateGenerator::candidates(board);
        // 盤面が埋まった局面は終端として扱う
        if candidates.is_empty() {
            return score;
        }

        if maximizing {
            let mut max_eval = f64::NEG_INFINITY;
            for position in candidates {
                let eval = {
                    let mut placed = board.place_scoped(position, Player::Machine.to_cell());
                    self.minimax(&mut *placed, depth - 1, false, alpha, beta, nodes)
                };
                max_eval = max_eval.max(eval);
                alpha = alpha.max(eval);
                if beta <= alpha {
                    break;
                }
            }
            max_eval
        } else {
            let mut min_eval = f64::INFINITY;
            for position in candidates {
                let eval = {
                    let mut placed = board.place_scoped(position, Player::Human.to_cell());
                    self.minimax(&mut *placed, depth - 1, true, alpha, beta, nodes)
                };
                min_eval = min_eval.min(eval);
                beta = beta.min(eval);
                if beta <= alpha {
                    break;
                }
            }
            min_eval
        }
    }
}

impl Default for AlphaBetaAI {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl AIStrategy for AlphaBetaAI {
    fn calculate_move(&self, board: &mut Board, deadline: Option<Instant>) -> SearchOutcome {
        search_root(board, self.depth, deadline, |board, nodes| {
            self.minimax(board, self.depth, false, f64::NEG_INFINITY, f64::INFINITY, nodes)
        })
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::AlphaBeta
    }
}

/// 枝刈りなしのミニマックス法を使用するAI実装
/// αβ法と同じ候補順・同じ深度で全ての枝を評価する
#[derive(Debug, Clone)]
pub struct MinimaxAI {
    /// 探索深度（手数）
    pub depth: u32,
    weights: EvalWeights,
}

impl MinimaxAI {
    /// 指定した探索深度で新しいMinimaxAIを作成する
    pub fn new(depth: u32) -> Self {
        Self::with_weights(depth, EvalWeights::default())
    }

    pub fn with_weights(depth: u32, weights: EvalWeights) -> Self {
        MinimaxAI { depth, weights }
    }

    pub fn minimax(&self, board: &mut Board, depth: u32, maximizing: bool, nodes: &mut u64) -> f64 {
        *nodes += 1;
        let score = BoardEvaluator::evaluate_position(board, Player::Machine, &self.weights);
        if depth == 0 || score.abs() >= self.weights.win_score() {
            return score;
        }

        let candidates = CandidateGenerator::candidates(board);
        if candidates.is_empty() {
            return score;
        }

        let player = if maximizing { Player::Machine } else { Player::Human };
        let mut best = if maximizing { f64::NEG_INFINITY } else { f64::INFINITY };

        for position in candidates {
            let eval = {
                let mut placed = board.place_scoped(position, player.to_cell());
                self.minimax(&mut *placed, depth - 1, !maximizing, nodes)
            };
            best = if maximizing { best.max(eval) } else { best.min(eval) };
        }

        best
    }
}

impl AIStrategy for MinimaxAI {
    fn calculate_move(&self, board: &mut Board, deadline: Option<Instant>) -> SearchOutcome {
        search_root(board, self.depth, deadline, |board, nodes| {
            self.minimax(board, self.depth, false, nodes)
        })
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Minimax
    }
}

/// エンジン設定に応じたAI戦略を生成するファクトリ関数
pub fn create_ai_strategy(config: &EngineConfig) -> Box<dyn AIStrategy> {
    let weights = EvalWeights::with_opponent_factor(config.opponent_weight);
    match config.strategy {
        StrategyKind::AlphaBeta => Box::new(AlphaBetaAI::with_weights(config.max_depth, weights)),
        StrategyKind::Minimax => Box::new(MinimaxAI::with_weights(config.max_depth, weights)),
    }
}
