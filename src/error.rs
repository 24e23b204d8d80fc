//! アプリケーション全体のエラー定義モジュール
//! ゲームルール、セッション、AIサービスのエラーを統一管理。

use thiserror::Error;
use uuid::Uuid;

/// ゲームロジックとセッション管理に関連するエラー
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Invalid coordinate: ({row}, {col}) is outside the board")]
    InvalidCoordinate { row: i64, col: i64 },

    #[error("Cell occupied: ({row}, {col}) already holds a stone")]
    CellOccupied { row: usize, col: usize },

    #[error("Game already over")]
    GameAlreadyOver,

    #[error("Game not found: {game_id}")]
    GameNotFound { game_id: Uuid },

    #[error("Session limit exceeded (max: {max})")]
    SessionLimitExceeded { max: usize },

    #[error("A move is already being processed for this game")]
    MoveInProgress,

    #[error("AI calculation failed: {source}")]
    AIError {
        #[from]
        source: AIError,
    },
}

/// AIサービスに関連するエラー
#[derive(Debug, Error)]
pub enum AIError {
    /// 候補手が存在しない（盤面が埋まった引き分け）
    #[error("No valid moves available")]
    NoValidMoves,

    #[error("AI calculation timeout")]
    Timeout,

    #[error("AI strategy error: {message}")]
    StrategyError { message: String },

    #[error("AI service unavailable: {service_name} - {reason}")]
    ServiceUnavailable {
        service_name: String,
        reason: String,
    },

    #[error("AI service configuration error: {message}")]
    ConfigurationError { message: String },
}

/// ゲームエラーをベースとした結果型
pub type Result<T> = std::result::Result<T, GameError>;
