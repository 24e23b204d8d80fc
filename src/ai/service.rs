//! AIサービスの抽象化層モジュール
//! 異なるAI実装（ローカル探索、モックなど）を統一した
//! インターフェースで提供し、AIサービスの生成と管理を行う。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::AIError;
use crate::game::{GameState, Position};

/// AIの手の計算結果を表す構造体
/// 選択した位置と計算の統計情報を含む
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIMoveResult {
    /// AIが選択した手の位置
    pub position: Position,
    /// 思考時間（ミリ秒）
    pub thinking_time_ms: u64,
    /// 盤面評価値（実装によっては省略）
    pub evaluation_score: Option<f64>,
    /// 探索した深度（実装によっては省略）
    pub depth_reached: Option<u32>,
    /// 評価したノード数（実装によっては省略）
    pub nodes_evaluated: Option<u64>,
}

/// AIサービスの種類を表すenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AIServiceType {
    /// ローカルの探索エンジン
    Local,
    /// テスト用のモックAI
    Mock,
}

/// AIサービスの状態情報を表す構造体
/// サービスの健全性やパフォーマンスの監視に使用
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIServiceStatus {
    pub service_type: AIServiceType,
    pub name: String,
    pub available: bool,
    pub last_check: DateTime<Utc>,
    pub average_response_time_ms: Option<u64>,
}

/// AIサービスの統一インターフェース
/// 異なるAI実装を同じ方法で呼び出すためのtrait
#[async_trait]
pub trait AIService: Send + Sync {
    /// 指定したゲーム状態でマシンの手を計算する
    /// 候補手がない（盤面が埋まっている）場合はAIError::NoValidMovesを返す
    async fn calculate_move(&self, game_state: &GameState) -> Result<AIMoveResult, AIError>;

    /// サービスが利用可能かチェックする
    async fn is_available(&self) -> bool;

    /// サービス名を返す
    fn get_name(&self) -> &'static str;

    /// サービスの種類を返す
    fn get_service_type(&self) -> AIServiceType;

    /// サービスの現在の状態を取得する
    async fn get_status(&self) -> AIServiceStatus {
        AIServiceStatus {
            service_type: self.get_service_type(),
            name: self.get_name().to_string(),
            available: self.is_available().await,
            last_check: Utc::now(),
            average_response_time_ms: None,
        }
    }

    /// サービスの健全性チェックを実行し、レスポンス時間も測定する
    async fn health_check(&self) -> Result<AIServiceStatus, AIError> {
        let start_time = std::time::Instant::now();
        let available = self.is_available().await;
        let response_time = start_time.elapsed().as_millis() as u64;

        if available {
            Ok(AIServiceStatus {
                service_type: self.get_service_type(),
                name: self.get_name().to_string(),
                available: true,
                last_check: Utc::now(),
                average_response_time_ms: Some(response_time),
            })
        } else {
            Err(AIError::ServiceUnavailable {
                service_name: self.get_name().to_string(),
                reason: "Service health check failed".to_string(),
            })
        }
    }
}

/// AIサービスの設定を管理する構造体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIServiceConfig {
    pub service_type: AIServiceType,
    /// 1手の探索に使える時間（ミリ秒）
    pub timeout_ms: u64,
}

impl Default for AIServiceConfig {
    fn default() -> Self {
        Self {
            service_type: AIServiceType::Local,
            timeout_ms: 5000,
        }
    }
}

/// AIサービスを生成するファクトリ
/// 設定に基づいて適切なAIサービス実装を選択して生成する
pub struct AIServiceFactory;

impl AIServiceFactory {
    /// 設定に基づいてAIサービスを生成する
    pub fn create_service(
        config: &AIServiceConfig,
        engine: &EngineConfig,
    ) -> Result<Box<dyn AIService>, AIError> {
        if config.timeout_ms == 0 {
            return Err(AIError::ConfigurationError {
                message: "timeout_ms must be greater than zero".to_string(),
            });
        }

        match config.service_type {
            AIServiceType::Local => {
                use crate::ai::local_service::LocalAIService;
                Ok(Box::new(LocalAIService::new(engine.clone(), config.timeout_ms)))
            }
            AIServiceType::Mock => {
                use crate::ai::mock_service::{MockAIConfig, MockAIService};
                Ok(Box::new(MockAIService::new(MockAIConfig::default())))
            }
        }
    }

    /// デフォルト設定のローカルAIサービスを生成する
    pub fn create_default_local() -> Box<dyn AIService> {
        use crate::ai::local_service::LocalAIService;
        Box::new(LocalAIService::default())
    }

    /// カスタム設定でモックAIサービスを生成する
    /// テスト時に特定の動作をシミュレートするために使用
    pub fn create_mock(config: Option<crate::ai::mock_service::MockAIConfig>) -> Box<dyn AIService> {
        use crate::ai::mock_service::MockAIService;
        Box::new(MockAIService::new(config.unwrap_or_default()))
    }
}
