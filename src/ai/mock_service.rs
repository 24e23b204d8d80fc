use async_trait::async_trait;
use std::time::Instant;
use tokio::time::{sleep, Duration};

use crate::error::AIError;
use crate::game::{GameState, Position};

use super::candidates::CandidateGenerator;
use super::service::{AIMoveResult, AIService, AIServiceType};

#[derive(Debug, Clone)]
pub struct MockAIConfig {
    pub available: bool,
    pub response_time_ms: u64,
    pub should_error: bool,
    pub error_message: String,
    pub fixed_move: Option<Position>,
}

impl Default for MockAIConfig {
    fn default() -> Self {
        Self {
            available: true,
            response_time_ms: 0,
            should_error: false,
            error_message: "Mock AI error".to_string(),
            fixed_move: None,
        }
    }
}

/// テスト用のAIサービス
/// 固定の手、または行優先で最初の候補手を返す
#[derive(Debug, Clone)]
pub struct MockAIService {
    config: MockAIConfig,
}

impl MockAIService {
    pub fn new(config: MockAIConfig) -> Self {
        Self { config }
    }

    pub fn new_default() -> Self {
        Self::new(MockAIConfig::default())
    }

    pub fn new_unavailable() -> Self {
        Self::new(MockAIConfig {
            available: false,
            ..MockAIConfig::default()
        })
    }

    pub fn new_error(error_message: impl Into<String>) -> Self {
        Self::new(MockAIConfig {
            should_error: true,
            error_message: error_message.into(),
            ..MockAIConfig::default()
        })
    }

    pub fn new_with_fixed_move(position: Position) -> Self {
        Self::new(MockAIConfig {
            fixed_move: Some(position),
            ..MockAIConfig::default()
        })
    }

    pub fn new_slow(response_time_ms: u64) -> Self {
        Self::new(MockAIConfig {
            response_time_ms,
            ..MockAIConfig::default()
        })
    }

    pub fn update_config(&mut self, config: MockAIConfig) {
        self.config = config;
    }

    pub fn get_config(&self) -> &MockAIConfig {
        &self.config
    }
}

#[async_trait]
impl AIService for MockAIService {
    async fn calculate_move(&self, game_state: &GameState) -> Result<AIMoveResult, AIError> {
        let start_time = Instant::now();

        if !self.config.available {
            return Err(AIError::ServiceUnavailable {
                service_name: self.get_name().to_string(),
                reason: "Mock AI service is configured as unavailable".to_string(),
            });
        }

        if self.config.should_error {
            return Err(AIError::StrategyError {
                message: self.config.error_message.clone(),
            });
        }

        if game_state.is_finished() {
            return Err(AIError::StrategyError {
                message: "Cannot calculate move for finished game".to_string(),
            });
        }

        if self.config.response_time_ms > 0 {
            sleep(Duration::from_millis(self.config.response_time_ms)).await;
        }

        let position = match self.config.fixed_move {
            Some(fixed_move) if game_state.board.is_empty(fixed_move) => fixed_move,
            _ => CandidateGenerator::candidates(&game_state.board)
                .first()
                .copied()
                .ok_or(AIError::NoValidMoves)?,
        };

        Ok(AIMoveResult {
            position,
            thinking_time_ms: start_time.elapsed().as_millis() as u64,
            evaluation_score: Some(0.0),
            depth_reached: Some(0),
            nodes_evaluated: Some(0),
        })
    }

    async fn is_available(&self) -> bool {
        self.config.available
    }

    fn get_name(&self) -> &'static str {
        "MockAIService"
    }

    fn get_service_type(&self) -> AIServiceType {
        AIServiceType::Mock
    }
}
