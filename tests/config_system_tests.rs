//! 設定システム統合テスト

use std::{env, fs, time::Duration};
use tempfile::TempDir;

use gomoku::{
    ai::{
        service::{AIService, AIServiceConfig, AIServiceFactory, AIServiceType},
        strategies::{create_ai_strategy, AIStrategy, StrategyKind},
    },
    config::{Config, ConfigError, EngineConfig, ServerConfig, SessionConfig},
};

fn create_test_config() -> Config {
    Config {
        engine: EngineConfig {
            board_size: 15,
            win_length: 5,
            max_depth: 1,
            opponent_weight: 1.0,
            strategy: StrategyKind::Minimax,
        },
        server: ServerConfig {
            port: 4000,
            host: "127.0.0.1".to_string(),
            enable_cors: false,
            enable_logging: false,
        },
        sessions: SessionConfig {
            max_sessions: 50,
            session_timeout_minutes: 15,
            enable_session_cleanup: false,
            cleanup_interval_minutes: 10,
        },
        ai_service: AIServiceConfig {
            service_type: AIServiceType::Mock,
            timeout_ms: 2000,
        },
        ..Default::default()
    }
}

#[test]
fn test_config_serialization_deserialization() {
    let config = create_test_config();

    let json_str = serde_json::to_string_pretty(&config).unwrap();
    assert!(json_str.contains("4000"));
    assert!(json_str.contains("127.0.0.1"));
    assert!(json_str.contains("Minimax"));

    let deserialized: Config = serde_json::from_str(&json_str).unwrap();
    assert_eq!(deserialized.server.port, 4000);
    assert_eq!(deserialized.engine, config.engine);
    assert_eq!(deserialized.ai_service.service_type, AIServiceType::Mock);
}

#[test]
fn test_config_file_operations() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("test_config.json");

    let original_config = create_test_config();
    original_config.save_to_file(&config_path).unwrap();
    assert!(config_path.exists());

    let loaded_config = Config::from_file(&config_path).unwrap();
    assert_eq!(loaded_config.server.port, original_config.server.port);
    assert_eq!(loaded_config.sessions.max_sessions, 50);
    assert_eq!(loaded_config.engine.board_size, 15);
    assert_eq!(loaded_config.system_limits.max_ai_calculation_time, Duration::from_secs(30));
}

#[test]
fn test_config_file_errors() {
    let temp_dir = TempDir::new().unwrap();

    let missing = Config::from_file(temp_dir.path().join("missing.json"));
    assert!(matches!(missing, Err(ConfigError::FileReadError(_))));

    let broken_path = temp_dir.path().join("broken.json");
    fs::write(&broken_path, "{ not json").unwrap();
    assert!(matches!(Config::from_file(&broken_path), Err(ConfigError::ParseError(_))));
}

#[test]
fn test_load_first_existing_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.json");
    let valid = temp_dir.path().join("app.json");
    let broken = temp_dir.path().join("broken.json");

    create_test_config().save_to_file(&valid).unwrap();
    fs::write(&broken, "{ not json").unwrap();

    let config = Config::load_first_existing(&[&missing]).unwrap();
    assert_eq!(config.server.port, 3000);

    let config = Config::load_first_existing(&[&missing, &valid, &broken]).unwrap();
    assert_eq!(config.server.port, 4000);

    // 存在するファイルが壊れていればデフォルトに戻さない
    let result = Config::load_first_existing(&[&missing, &broken, &valid]);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn test_config_validation() {
    assert!(Config::default().validate().is_ok());
    assert!(create_test_config().validate().is_ok());

    let mut config = Config::default();
    config.server.port = 0;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));

    let mut config = Config::default();
    config.sessions.max_sessions = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.ai_service.timeout_ms = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.engine.win_length = 1;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.sessions.session_timeout_minutes = -5;
    assert!(config.validate().is_err());
}

/// 環境変数を触るテストはこの1つにまとめる（並列実行で競合しないように）
#[test]
fn test_environment_overrides() {
    let vars = [
        ("SERVER_PORT", "5050"),
        ("MAX_SESSIONS", "7"),
        ("AI_SERVICE_TYPE", "mock"),
        ("AI_STRATEGY", "minimax"),
        ("SEARCH_DEPTH", "3"),
        ("AI_TIMEOUT_MS", "750"),
    ];
    for (name, value) in vars {
        env::set_var(name, value);
    }

    let config = Config::from_env().unwrap();
    assert_eq!(config.server.port, 5050);
    assert_eq!(config.sessions.max_sessions, 7);
    assert_eq!(config.ai_service.service_type, AIServiceType::Mock);
    assert_eq!(config.engine.strategy, StrategyKind::Minimax);
    assert_eq!(config.engine.max_depth, 3);
    assert_eq!(config.ai_service.timeout_ms, 750);
    assert_eq!(config.system_limits.max_ai_calculation_time, Duration::from_millis(750));

    env::set_var("SERVER_PORT", "not-a-port");
    assert!(matches!(
        Config::from_env(),
        Err(ConfigError::EnvVarError { ref name, .. }) if name == "SERVER_PORT"
    ));

    env::set_var("SERVER_PORT", "5050");
    env::set_var("AI_SERVICE_TYPE", "remote");
    assert!(Config::from_env().is_err());

    for (name, _) in vars {
        env::remove_var(name);
    }
}

#[test]
fn test_services_built_from_config() {
    let config = create_test_config();

    let ai_service = AIServiceFactory::create_service(&config.ai_service, &config.engine).unwrap();
    assert_eq!(ai_service.get_service_type(), AIServiceType::Mock);

    let strategy = create_ai_strategy(&config.engine);
    assert_eq!(strategy.kind(), StrategyKind::Minimax);
    assert_eq!(strategy.get_name(), "MinimaxAI");
}
