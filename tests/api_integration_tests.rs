//! 対局APIの統合テストモジュール
//! 実際のHTTPリクエストをシミュレートしてAPIの動作を確認し、
//! エンドポイント間の連携やエラーハンドリングをテストする。

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use gomoku::{
    ai::{local_service::LocalAIService, mock_service::MockAIService, service::AIService},
    api::{create_app, AppState, GameService},
    config::{EngineConfig, SessionConfig},
    session::GameSessionManager,
};

fn create_app_with(ai_service: Arc<dyn AIService>, engine: EngineConfig, max_sessions: usize) -> Router {
    let sessions = SessionConfig {
        max_sessions,
        ..SessionConfig::default()
    };
    let session_manager = Arc::new(GameSessionManager::from_config(&sessions, &engine));
    let game_service = Arc::new(GameService::new(session_manager, ai_service));
    create_app(AppState::new(game_service))
}

fn create_test_app() -> Router {
    create_app_with(Arc::new(MockAIService::new_default()), EngineConfig::default(), 10)
}

async fn parse_response_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send_request(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    let request = match body {
        Some(body) => request.body(Body::from(serde_json::to_vec(&body).unwrap())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

async fn create_game(app: &Router) -> String {
    let response = send_request(app, Method::POST, "/api/games", None).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_json(response).await;
    body["game_id"].as_str().unwrap().to_string()
}

async fn play(app: &Router, game_id: &str, row: usize, col: usize) -> Response<Body> {
    send_request(
        app,
        Method::POST,
        &format!("/api/games/{}/move", game_id),
        Some(json!({ "row": row, "col": col })),
    )
    .await
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let response = send_request(&app, Method::GET, "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Gomoku API Server is running");
}

#[tokio::test]
async fn test_full_game_workflow() {
    let app = create_test_app();
    let game_id = create_game(&app).await;

    let response = send_request(&app, Method::GET, &format!("/api/games/{}", game_id), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let state = parse_response_json(response).await;
    assert_eq!(state["game_id"], game_id.as_str());
    assert_eq!(state["board_size"], 20);
    assert_eq!(state["status"], "InProgress");
    assert_eq!(state["move_count"], 0);

    let response = play(&app, &game_id, 10, 10).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["player_move"], json!({ "row": 10, "col": 10 }));
    assert_eq!(body["machine_move"], json!({ "row": 9, "col": 9 }));
    assert!(body["message"].is_null());
    assert_eq!(body["game_state"]["board"][10][10], "Human");
    assert_eq!(body["game_state"]["board"][9][9], "Machine");

    let response = send_request(&app, Method::GET, &format!("/api/games/{}/history", game_id), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let history = parse_response_json(response).await;
    assert_eq!(history["total_moves"], 2);
    assert_eq!(history["moves"][0]["player"], "Human");
    assert_eq!(history["moves"][1]["player"], "Machine");

    let response = send_request(&app, Method::GET, "/api/games", None).await;
    let list = parse_response_json(response).await;
    assert_eq!(list["total_count"], 1);

    let response = send_request(&app, Method::DELETE, &format!("/api/games/{}", game_id), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send_request(&app, Method::GET, &format!("/api/games/{}", game_id), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error = parse_response_json(response).await;
    assert_eq!(error["error_code"], "GAME_NOT_FOUND");
}

#[tokio::test]
async fn test_invalid_moves_are_rejected() {
    let app = create_test_app();
    let game_id = create_game(&app).await;

    let response = play(&app, &game_id, 20, 3).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_response_json(response).await["error_code"], "INVALID_COORDINATE");

    play(&app, &game_id, 10, 10).await;
    let response = play(&app, &game_id, 10, 10).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_response_json(response).await["error_code"], "CELL_OCCUPIED");

    let response = play(&app, &Uuid::new_v4().to_string(), 0, 0).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_coordinates_return_error_response() {
    let app = create_test_app();
    let game_id = create_game(&app).await;
    let uri = format!("/api/games/{}/move", game_id);

    let response = send_request(&app, Method::POST, &uri, Some(json!({ "row": -1, "col": 3 }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_response_json(response).await["error_code"], "INVALID_COORDINATE");

    let response = send_request(&app, Method::POST, &uri, Some(json!({ "row": 1.5, "col": 3 }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_response_json(response).await["error_code"], "INVALID_REQUEST");

    let response = send_request(&app, Method::GET, &format!("/api/games/{}", game_id), None).await;
    assert_eq!(parse_response_json(response).await["move_count"], 0);
}

#[tokio::test]
async fn test_human_win_then_reset() {
    let app = create_test_app();
    let game_id = create_game(&app).await;

    // 人間は10行目に横一列、モックは斜め左上へ応手していく
    for col in 5..9 {
        let response = play(&app, &game_id, 10, col).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = play(&app, &game_id, 10, 9).await;
    let body = parse_response_json(response).await;
    assert_eq!(body["message"], "human_wins");
    assert!(body["machine_move"].is_null());
    assert_eq!(body["game_state"]["status"]["Finished"]["winner"], "Human");

    let response = play(&app, &game_id, 0, 19).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_response_json(response).await["error_code"], "GAME_ALREADY_OVER");

    let response = send_request(&app, Method::POST, &format!("/api/games/{}/reset", game_id), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let state = parse_response_json(response).await;
    assert_eq!(state["status"], "InProgress");
    assert_eq!(state["move_count"], 0);

    let response = play(&app, &game_id, 0, 19).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_full_board_is_reported_as_draw() {
    let engine = EngineConfig {
        board_size: 3,
        win_length: 3,
        ..EngineConfig::default()
    };
    let app = create_app_with(Arc::new(MockAIService::new_default()), engine, 10);
    let game_id = create_game(&app).await;

    // モックは行優先で最初の候補に打つ: (0,0) (0,2) (1,2) (2,1)
    for (row, col) in [(0, 1), (1, 0), (1, 1), (2, 0)] {
        let response = play(&app, &game_id, row, col).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(parse_response_json(response).await["message"].is_null());
    }

    let response = play(&app, &game_id, 2, 2).await;
    let body = parse_response_json(response).await;
    assert_eq!(body["message"], "draw");
    assert_eq!(body["game_state"]["move_count"], 9);
    assert!(body["game_state"]["status"]["Finished"]["winner"].is_null());
}

#[tokio::test]
async fn test_local_engine_replies_next_to_human_stone() {
    let app = create_app_with(Arc::new(LocalAIService::default()), EngineConfig::default(), 10);
    let game_id = create_game(&app).await;

    let response = play(&app, &game_id, 10, 10).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_json(response).await;

    let row = body["machine_move"]["row"].as_u64().unwrap();
    let col = body["machine_move"]["col"].as_u64().unwrap();
    assert!(row.abs_diff(10) <= 1 && col.abs_diff(10) <= 1);
    assert!(body["thinking_time_ms"].is_u64());
}

#[tokio::test]
async fn test_session_limit() {
    let app = create_app_with(Arc::new(MockAIService::new_default()), EngineConfig::default(), 1);
    create_game(&app).await;

    let response = send_request(&app, Method::POST, "/api/games", None).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(parse_response_json(response).await["error_code"], "SESSION_LIMIT_EXCEEDED");
}

#[tokio::test]
async fn test_overlapping_move_is_rejected() {
    let app = create_app_with(Arc::new(MockAIService::new_slow(300)), EngineConfig::default(), 10);
    let game_id = create_game(&app).await;

    let first = {
        let app = app.clone();
        let game_id = game_id.clone();
        tokio::spawn(async move { play(&app, &game_id, 5, 5).await.status() })
    };
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let response = play(&app, &game_id, 6, 6).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(parse_response_json(response).await["error_code"], "MOVE_IN_PROGRESS");

    assert_eq!(first.await.unwrap(), StatusCode::OK);
}

#[tokio::test]
async fn test_concurrent_games_are_independent() {
    let app = create_test_app();
    let ids = futures::future::join_all((0..4).map(|_| create_game(&app))).await;

    let responses = futures::future::join_all(ids.iter().map(|id| play(&app, id, 3, 3))).await;
    for response in responses {
        assert_eq!(response.status(), StatusCode::OK);
    }

    for id in &ids {
        let response = send_request(&app, Method::GET, &format!("/api/games/{}", id), None).await;
        assert_eq!(parse_response_json(response).await["move_count"], 2);
    }
}
