//! アプリケーション設定管理モジュール
//! 探索エンジン、サーバー、セッション、AIサービスなどの設定を
//! 設定ファイルと環境変数から読み込んで管理する。

use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, time::Duration};
use tracing::info;

use crate::ai::service::{AIServiceConfig, AIServiceType};
use crate::ai::strategies::{StrategyKind, DEFAULT_MAX_DEPTH};
use crate::game::{BOARD_SIZE, WIN_LENGTH};

/// セッションタイムアウトの上限（1週間）
pub const MAX_SESSION_TIMEOUT_MINUTES: i64 = 60 * 24 * 7;

/// 設定ファイルを探す順序
const CONFIG_PATHS: [&str; 3] = ["config.json", "config/app.json", "/etc/gomoku/config.json"];

/// Duration型をJSONでシリアライズするためのモジュール
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    /// Durationを(secs, nanos)のタプルとしてシリアライズ
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let secs = duration.as_secs();
        let nanos = duration.subsec_nanos();
        (secs, nanos).serialize(serializer)
    }

    /// (secs, nanos)のタプルからDurationをデシリアライズ
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (secs, nanos) = <(u64, u32)>::deserialize(deserializer)?;
        Ok(Duration::new(secs, nanos))
    }
}

/// 探索エンジンの設定
/// デフォルト値は20x20盤・五目・深度2・相手係数0.8
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 盤面の一辺のマス数
    pub board_size: usize,
    /// 勝利に必要な連続石数
    pub win_length: usize,
    /// ルート着手の後に探索する深度
    pub max_depth: u32,
    /// 相手の形の評価に掛ける係数
    pub opponent_weight: f64,
    /// 探索アルゴリズム
    pub strategy: StrategyKind,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            win_length: WIN_LENGTH,
            max_depth: DEFAULT_MAX_DEPTH,
            opponent_weight: 0.8,
            strategy: StrategyKind::AlphaBeta,
        }
    }
}

/// システムの制限値を定義する構造体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemLimits {
    /// AIの計算時間の上限（ルートの候補手の間で確認する）
    #[serde(with = "duration_serde")]
    pub max_ai_calculation_time: Duration,
}

impl Default for SystemLimits {
    fn default() -> Self {
        Self {
            max_ai_calculation_time: Duration::from_secs(30),
        }
    }
}

/// サーバーの設定を管理する構造体
/// ポート番号、ホスト名、CORS設定などを含む
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub enable_cors: bool,
    pub enable_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
            enable_cors: true,
            enable_logging: true,
        }
    }
}

/// 対局セッションの設定を管理する構造体
/// セッション数制限、タイムアウト、クリーンアップ設定など
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub max_sessions: usize,
    pub session_timeout_minutes: i64,
    pub enable_session_cleanup: bool,
    pub cleanup_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: 100,
            session_timeout_minutes: 30,
            enable_session_cleanup: true,
            cleanup_interval_minutes: 5,
        }
    }
}

/// アプリケーションの全設定を統合するメイン設定構造体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub engine: EngineConfig,
    pub system_limits: SystemLimits,
    pub server: ServerConfig,
    pub sessions: SessionConfig,
    pub ai_service: AIServiceConfig,
}

/// 設定関連のエラーを表すenum
/// ファイル読み込み、パース、検証エラーなどを含む
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("設定ファイル読み込みエラー: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("設定ファイル解析エラー: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("環境変数エラー: {name} = {value}")]
    EnvVarError { name: String, value: String },

    #[error("設定値が無効です: {field} = {value}")]
    InvalidValue { field: String, value: String },
}

/// 環境変数を読み、設定されていればパースする
fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarError {
                name: name.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}

impl Config {
    /// 指定したファイルパスから設定を読み込む
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 環境変数から設定を読み込む
    /// デフォルト値をベースに環境変数で上書きする
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// 設定済みの値に環境変数を上書き適用する
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(port) = parse_env("SERVER_PORT")? {
            self.server.port = port;
        }

        if let Ok(host) = env::var("SERVER_HOST") {
            self.server.host = host;
        }

        if let Some(max_sessions) = parse_env("MAX_SESSIONS")? {
            self.sessions.max_sessions = max_sessions;
        }

        if let Some(timeout) = parse_env("SESSION_TIMEOUT_MINUTES")? {
            self.sessions.session_timeout_minutes = timeout;
        }

        if let Ok(service_type) = env::var("AI_SERVICE_TYPE") {
            self.ai_service.service_type = match service_type.to_lowercase().as_str() {
                "local" => AIServiceType::Local,
                "mock" => AIServiceType::Mock,
                _ => {
                    return Err(ConfigError::EnvVarError {
                        name: "AI_SERVICE_TYPE".to_string(),
                        value: service_type,
                    })
                }
            };
        }

        if let Some(strategy) = parse_env("AI_STRATEGY")? {
            self.engine.strategy = strategy;
        }

        if let Some(depth) = parse_env("SEARCH_DEPTH")? {
            self.engine.max_depth = depth;
        }

        if let Some(timeout_ms) = parse_env::<u64>("AI_TIMEOUT_MS")? {
            self.ai_service.timeout_ms = timeout_ms;
            self.system_limits.max_ai_calculation_time = Duration::from_millis(timeout_ms);
        }

        Ok(())
    }

    /// 設定ファイルと環境変数を結合して設定を読み込む
    /// 設定ファイルがなくてもデフォルト値で動作する
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_first_existing(&CONFIG_PATHS)?;

        // 環境変数で設定を上書き
        config.apply_env()?;

        Ok(config)
    }

    /// 候補パスのうち最初に存在するファイルを読み込む
    /// 存在するファイルが壊れている場合はデフォルトに戻さずエラーを返す
    pub fn load_first_existing<P: AsRef<Path>>(paths: &[P]) -> Result<Self, ConfigError> {
        match paths.iter().map(|path| -> &Path { path.as_ref() }).find(|path| path.exists()) {
            Some(path) => {
                info!(path = %path.display(), "設定ファイルを読み込みます");
                Self::from_file(path)
            }
            None => Ok(Config::default()),
        }
    }

    /// 現在の設定を指定したファイルに保存する
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 設定値の妥当性をチェックする
    /// 不正な値がある場合はConfigErrorを返す
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &str, value: impl ToString) -> ConfigError {
            ConfigError::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
            }
        }

        if self.server.port == 0 {
            return Err(invalid("server.port", self.server.port));
        }

        if self.sessions.max_sessions == 0 {
            return Err(invalid("sessions.max_sessions", self.sessions.max_sessions));
        }

        let timeout = self.sessions.session_timeout_minutes;
        if timeout <= 0 || timeout > MAX_SESSION_TIMEOUT_MINUTES {
            return Err(invalid("sessions.session_timeout_minutes", timeout));
        }

        if self.ai_service.timeout_ms == 0 {
            return Err(invalid("ai_service.timeout_ms", self.ai_service.timeout_ms));
        }

        if self.engine.win_length < 2 {
            return Err(invalid("engine.win_length", self.engine.win_length));
        }

        if self.engine.board_size < self.engine.win_length {
            return Err(invalid("engine.board_size", self.engine.board_size));
        }

        if !(self.engine.opponent_weight >= 0.0) {
            return Err(invalid("engine.opponent_weight", self.engine.opponent_weight));
        }

        Ok(())
    }
}
