//! APIのリクエスト/レスポンス型とエラー変換

use axum::{extract::rejection::JsonRejection, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AIError, GameError};
use crate::game::{GameStatus, Move, Player, Position};
use crate::session::GameSession;

/// 人間の着手リクエスト
/// 負の座標もJSONとしては受け付け、盤外の座標としてINVALID_COORDINATEで返す
#[derive(Debug, Deserialize)]
pub struct PlayerMoveRequest {
    pub row: i64,
    pub col: i64,
}

impl PlayerMoveRequest {
    pub fn position(&self) -> Result<Position, GameError> {
        match (usize::try_from(self.row), usize::try_from(self.col)) {
            (Ok(row), Ok(col)) => Ok(Position { row, col }),
            _ => Err(GameError::InvalidCoordinate {
                row: self.row,
                col: self.col,
            }),
        }
    }
}

/// 着手後の対局結果メッセージ
/// JSONでは "human_wins" / "machine_wins" / "draw" になる
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMessage {
    HumanWins,
    MachineWins,
    Draw,
}

impl GameMessage {
    /// 終局状態からメッセージを決める（進行中はNone）
    pub fn from_status(status: GameStatus) -> Option<Self> {
        match status {
            GameStatus::InProgress => None,
            GameStatus::Finished { winner: Some(Player::Human) } => Some(GameMessage::HumanWins),
            GameStatus::Finished { winner: Some(Player::Machine) } => Some(GameMessage::MachineWins),
            GameStatus::Finished { winner: None } => Some(GameMessage::Draw),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub game_id: Uuid,
    pub board_size: usize,
    pub win_length: usize,
    /// 行ごとの盤面（Noneは空きマス）
    pub board: Vec<Vec<Option<Player>>>,
    pub status: GameStatus,
    pub machine_thinking: bool,
    pub last_move: Option<Move>,
    pub move_count: usize,
}

impl GameResponse {
    pub fn from_session(session: &GameSession) -> Self {
        let state = &session.game_state;
        let size = state.board.size();

        let board = (0..size)
            .map(|row| {
                (0..size)
                    .map(|col| {
                        state
                            .board
                            .get_cell(Position { row, col })
                            .and_then(Player::from_cell)
                    })
                    .collect()
            })
            .collect();

        Self {
            game_id: session.id,
            board_size: size,
            win_length: state.win_length,
            board,
            status: state.game_status,
            machine_thinking: session.machine_thinking,
            last_move: state.last_move().cloned(),
            move_count: state.get_move_count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MoveResponse {
    pub success: bool,
    pub game_state: GameResponse,
    pub player_move: Position,
    pub machine_move: Option<Position>,
    pub thinking_time_ms: Option<u64>,
    pub message: Option<GameMessage>,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummary>,
    pub total_count: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub game_id: Uuid,
    pub status: GameStatus,
    pub created_at: DateTime<Utc>,
    pub last_move_at: DateTime<Utc>,
    pub move_count: usize,
}

impl SessionSummary {
    pub fn from_session(session: &GameSession) -> Self {
        Self {
            game_id: session.id,
            status: session.game_state.game_status,
            created_at: session.created_at,
            last_move_at: session.last_move_at,
            move_count: session.game_state.get_move_count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MoveHistoryResponse {
    pub game_id: Uuid,
    pub moves: Vec<Move>,
    pub total_moves: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub error_code: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Utc::now(),
            error_code: None,
        }
    }

    pub fn with_code(error: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Utc::now(),
            error_code: Some(code.into()),
        }
    }

    /// 解析できないリクエストボディを400のエラーレスポンスにする
    pub fn from_rejection(rejection: JsonRejection) -> (StatusCode, Json<Self>) {
        let status_code = StatusCode::BAD_REQUEST;
        let error_response = Self::with_code(
            status_code.canonical_reason().unwrap_or("Error"),
            rejection.body_text(),
            "INVALID_REQUEST",
        );
        (status_code, Json(error_response))
    }
}

impl GameError {
    pub fn error_code(&self) -> &'static str {
        match self {
            GameError::InvalidCoordinate { .. } => "INVALID_COORDINATE",
            GameError::CellOccupied { .. } => "CELL_OCCUPIED",
            GameError::GameAlreadyOver => "GAME_ALREADY_OVER",
            GameError::GameNotFound { .. } => "GAME_NOT_FOUND",
            GameError::SessionLimitExceeded { .. } => "SESSION_LIMIT_EXCEEDED",
            GameError::MoveInProgress => "MOVE_IN_PROGRESS",
            GameError::AIError { source } => match source {
                AIError::Timeout => "AI_TIMEOUT",
                AIError::ServiceUnavailable { .. } => "AI_UNAVAILABLE",
                _ => "AI_ERROR",
            },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GameError::InvalidCoordinate { .. }
            | GameError::CellOccupied { .. }
            | GameError::GameAlreadyOver => StatusCode::BAD_REQUEST,
            GameError::GameNotFound { .. } => StatusCode::NOT_FOUND,
            GameError::SessionLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            GameError::MoveInProgress => StatusCode::CONFLICT,
            GameError::AIError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GameError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: GameError) -> Self {
        let status_code = err.status_code();
        let error_response = ErrorResponse::with_code(
            status_code.canonical_reason().unwrap_or("Error"),
            err.to_string(),
            err.error_code(),
        );
        (status_code, Json(error_response))
    }
}
