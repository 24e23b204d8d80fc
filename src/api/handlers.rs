//! 対局APIハンドラー

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use uuid::Uuid;

use super::dto::{ErrorResponse, GameResponse, MoveHistoryResponse, MoveResponse, PlayerMoveRequest, SessionListResponse};
use super::service::GameService;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// ルーター全体で共有する状態
#[derive(Clone)]
pub struct AppState {
    pub game_service: Arc<GameService>,
}

impl AppState {
    pub fn new(game_service: Arc<GameService>) -> Self {
        Self { game_service }
    }
}

pub async fn create_game(State(state): State<AppState>) -> Result<(StatusCode, Json<GameResponse>), ApiError> {
    match state.game_service.create_game() {
        Ok(response) => Ok((StatusCode::CREATED, Json(response))),
        Err(err) => Err(err.into()),
    }
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameResponse>, ApiError> {
    state.game_service.get_game(game_id).map(Json).map_err(Into::into)
}

pub async fn make_move(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    request: Result<Json<PlayerMoveRequest>, JsonRejection>,
) -> Result<Json<MoveResponse>, ApiError> {
    let Json(request) = request.map_err(ErrorResponse::from_rejection)?;
    let position = request.position()?;

    match state.game_service.make_move(game_id, position).await {
        Ok(response) => Ok(Json(response)),
        Err(err) => Err(err.into()),
    }
}

pub async fn reset_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameResponse>, ApiError> {
    state.game_service.reset_game(game_id).map(Json).map_err(Into::into)
}

pub async fn delete_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    match state.game_service.delete_game(game_id) {
        Ok(_) => Ok(StatusCode::NO_CONTENT),
        Err(err) => Err(err.into()),
    }
}

pub async fn get_history(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<MoveHistoryResponse>, ApiError> {
    state.game_service.get_move_history(game_id).map(Json).map_err(Into::into)
}

pub async fn list_games(State(state): State<AppState>) -> Json<SessionListResponse> {
    Json(state.game_service.list_sessions())
}
