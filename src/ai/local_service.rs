use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

use crate::config::EngineConfig;
use crate::error::AIError;
use crate::game::GameState;

use super::service::{AIMoveResult, AIService, AIServiceType};
use super::strategies::create_ai_strategy;

/// プロセス内の探索エンジンでマシンの手を計算するサービス
/// 探索はブロッキング処理なのでspawn_blockingで実行する
#[derive(Debug, Clone)]
pub struct LocalAIService {
    pub engine: EngineConfig,
    pub timeout_ms: u64,
}

impl LocalAIService {
    pub fn new(engine: EngineConfig, timeout_ms: u64) -> Self {
        Self { engine, timeout_ms }
    }
}

impl Default for LocalAIService {
    fn default() -> Self {
        Self::new(EngineConfig::default(), 5000)
    }
}

#[async_trait]
impl AIService for LocalAIService {
    #[instrument(skip_all, fields(game_id = %game_state.id, moves = game_state.get_move_count()))]
    async fn calculate_move(&self, game_state: &GameState) -> Result<AIMoveResult, AIError> {
        let start_time = Instant::now();

        if game_state.is_finished() {
            return Err(AIError::StrategyError {
                message: "Cannot calculate move for finished game".to_string(),
            });
        }

        let mut board = game_state.board.clone();
        let engine = self.engine.clone();
        let deadline = start_time + Duration::from_millis(self.timeout_ms);

        let outcome = tokio::task::spawn_blocking(move || {
            let strategy = create_ai_strategy(&engine);
            strategy.calculate_move(&mut board, Some(deadline))
        })
        .await
        .map_err(|e| AIError::StrategyError {
            message: format!("search task failed: {}", e),
        })?;

        let position = outcome.best_move.ok_or(AIError::NoValidMoves)?;
        let thinking_time_ms = start_time.elapsed().as_millis() as u64;

        debug!(
            ?position,
            score = outcome.score,
            nodes = outcome.nodes_evaluated,
            completed = outcome.completed,
            thinking_time_ms,
            "machine move calculated"
        );

        Ok(AIMoveResult {
            position,
            thinking_time_ms,
            evaluation_score: Some(outcome.score),
            depth_reached: Some(outcome.depth),
            nodes_evaluated: Some(outcome.nodes_evaluated),
        })
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn get_name(&self) -> &'static str {
        "LocalAIService"
    }

    fn get_service_type(&self) -> AIServiceType {
        AIServiceType::Local
    }
}
