//! 五目並べAPIサーバーのエントリポイント
//! 設定読み込み、AIサービス初期化、HTTPサーバー起動を行う。

use std::{sync::Arc, time::Duration};

use gomoku::{
    ai::service::{AIService, AIServiceFactory},
    api::{routes::create_router_with, AppState, GameService},
    config::Config,
    session::GameSessionManager,
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// メイン関数 - サーバーの初期化と起動を担当
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if std::env::args().any(|arg| arg == "--generate-config") {
        match Config::default().save_to_file("config.json") {
            Ok(()) => info!("デフォルト設定を config.json に出力しました"),
            Err(e) => {
                error!("設定ファイル出力失敗: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // 設定ファイルと環境変数から統合設定を読み込み
    let config = match Config::load().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            error!("設定エラー: {}", e);
            error!("デフォルト設定を生成: cargo run -- --generate-config");
            std::process::exit(1);
        }
    };

    info!(
        host = %config.server.host,
        port = config.server.port,
        board_size = config.engine.board_size,
        depth = config.engine.max_depth,
        strategy = config.engine.strategy.name(),
        ai_service = ?config.ai_service.service_type,
        max_sessions = config.sessions.max_sessions,
        "設定読み込み完了"
    );

    // 探索の期限はAIサービスのタイムアウトと計算時間上限の短い方
    let mut ai_config = config.ai_service.clone();
    let limit_ms = config.system_limits.max_ai_calculation_time.as_millis() as u64;
    ai_config.timeout_ms = ai_config.timeout_ms.min(limit_ms.max(1));

    let ai_service = match AIServiceFactory::create_service(&ai_config, &config.engine) {
        Ok(service) => Arc::from(service),
        Err(e) => {
            error!("AIサービス作成失敗: {}", e);
            std::process::exit(1);
        }
    };

    let session_manager = Arc::new(GameSessionManager::from_config(&config.sessions, &config.engine));
    let game_service = Arc::new(GameService::new(Arc::clone(&session_manager), ai_service));

    match game_service.get_ai_service().health_check().await {
        Ok(status) => info!(service = %status.name, "AIサービス正常"),
        Err(e) => warn!("AIサービスが不健全: {}", e),
    }

    if config.sessions.enable_session_cleanup {
        let manager = Arc::clone(&session_manager);
        let period = Duration::from_secs(config.sessions.cleanup_interval_minutes.max(1) * 60);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let removed = manager.cleanup_inactive_sessions();
                if removed > 0 {
                    info!(removed, "非アクティブなセッションを削除しました");
                }
            }
        });
    }

    let app = create_router_with(&config.server).with_state(AppState::new(game_service));

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("アドレスバインド失敗 {}: {}", bind_address, e);
            std::process::exit(1);
        }
    };

    info!("五目並べAPIサーバー開始: {} (Ctrl+C で停止)", bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("サーバーエラー: {}", e);
        std::process::exit(1);
    }
}
