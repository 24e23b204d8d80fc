use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::{
    handlers::{create_game, delete_game, get_game, get_history, list_games, make_move, reset_game, AppState},
    middleware::{cors, logging},
};
use crate::config::ServerConfig;

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/games", post(create_game).get(list_games))
        .route("/api/games/:id", get(get_game).delete(delete_game))
        .route("/api/games/:id/move", post(make_move))
        .route("/api/games/:id/reset", post(reset_game))
        .route("/api/games/:id/history", get(get_history))
        .route("/health", get(health_check))
}

/// CORSとリクエストログを有効にしたルーター
pub fn create_router() -> Router<AppState> {
    api_routes()
        .layer(middleware::from_fn(cors))
        .layer(middleware::from_fn(logging))
}

/// サーバー設定に従ってミドルウェアを付けたルーター
pub fn create_router_with(server: &ServerConfig) -> Router<AppState> {
    let mut router = api_routes();
    if server.enable_cors {
        router = router.layer(middleware::from_fn(cors));
    }
    if server.enable_logging {
        router = router.layer(middleware::from_fn(logging));
    }
    router
}

/// 状態を結び付けた完成済みのアプリケーション
pub fn create_app(state: AppState) -> Router {
    create_router().with_state(state)
}

async fn health_check() -> &'static str {
    "Gomoku API Server is running"
}
