//! 対局セッション管理モジュール
//! 同時に進行する複数の対局をUUIDで管理し、
//! セッション数制限、着手の排他、タイムアウト処理、クリーンアップを担当する。

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::config::{EngineConfig, SessionConfig};
use crate::error::{GameError, Result};
use crate::game::GameState;

/// 1つの対局セッション
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub id: Uuid,
    pub game_state: GameState,
    /// マシンの探索中はtrue（同じ盤面への着手を拒否する）
    pub machine_thinking: bool,
    pub created_at: DateTime<Utc>,
    pub last_move_at: DateTime<Utc>,
}

impl GameSession {
    pub fn new(engine: &EngineConfig) -> Self {
        let game_state = GameState::with_rules(engine.board_size, engine.win_length);
        let now = Utc::now();
        Self {
            id: game_state.id,
            game_state,
            machine_thinking: false,
            created_at: now,
            last_move_at: now,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.game_state.is_finished()
    }

    /// 最終操作時刻を更新する
    pub fn touch(&mut self) {
        self.last_move_at = Utc::now();
    }
}

/// 対局セッションの管理を行うメイン構造体
/// スレッドセーフなDashMapで同時アクセスを効率的に処理
#[derive(Debug, Clone)]
pub struct GameSessionManager {
    /// アクティブセッションのコレクション
    sessions: Arc<DashMap<Uuid, GameSession>>,
    /// 新しいセッションの盤面ルール
    engine: EngineConfig,
    /// 同時存在可能な最大セッション数
    max_sessions: usize,
    /// セッションのタイムアウト時間（分）
    session_timeout_minutes: i64,
    /// 上限の確認と追加を一体で行うためのロック
    create_lock: Arc<Mutex<()>>,
}

impl GameSessionManager {
    /// デフォルトタイムアウト（30分）・標準ルールでセッションマネージャーを作成
    pub fn new(max_sessions: usize) -> Self {
        Self::with_timeout(max_sessions, 30)
    }

    /// カスタムタイムアウトでセッションマネージャーを作成
    pub fn with_timeout(max_sessions: usize, timeout_minutes: i64) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            engine: EngineConfig::default(),
            max_sessions,
            session_timeout_minutes: timeout_minutes,
            create_lock: Arc::new(Mutex::new(())),
        }
    }

    /// 設定ファイルの値からセッションマネージャーを作成
    pub fn from_config(sessions: &SessionConfig, engine: &EngineConfig) -> Self {
        Self {
            engine: engine.clone(),
            ..Self::with_timeout(sessions.max_sessions, sessions.session_timeout_minutes)
        }
    }

    /// 新しい対局セッションを作成する
    /// 最大セッション数に達している場合はエラーを返す
    pub fn create_session(&self) -> Result<GameSession> {
        let _guard = self.create_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if self.sessions.len() >= self.max_sessions {
            return Err(GameError::SessionLimitExceeded { max: self.max_sessions });
        }

        let session = GameSession::new(&self.engine);
        self.sessions.insert(session.id, session.clone());

        Ok(session)
    }

    /// 指定したIDのセッションを取得する
    pub fn get_session(&self, session_id: &Uuid) -> Result<GameSession> {
        self.sessions
            .get(session_id)
            .map(|session| session.clone())
            .ok_or(GameError::GameNotFound { game_id: *session_id })
    }

    pub fn update_session(&self, session: GameSession) -> Result<()> {
        let session_id = session.id;

        match self.sessions.get_mut(&session_id) {
            Some(mut existing_session) => {
                *existing_session = session;
                Ok(())
            }
            None => Err(GameError::GameNotFound { game_id: session_id }),
        }
    }

    pub fn remove_session(&self, session_id: &Uuid) -> Result<GameSession> {
        self.sessions
            .remove(session_id)
            .map(|(_, session)| session)
            .ok_or(GameError::GameNotFound { game_id: *session_id })
    }

    pub fn list_sessions(&self) -> Vec<GameSession> {
        self.sessions.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// 最終操作からタイムアウト時間を過ぎたセッションを削除する
    /// 探索中のセッションは削除しない。表現できないほど長いタイムアウトでは何も削除しない
    pub fn cleanup_inactive_sessions(&self) -> usize {
        let Some(cutoff_time) = Duration::try_minutes(self.session_timeout_minutes)
            .and_then(|timeout| Utc::now().checked_sub_signed(timeout))
        else {
            return 0;
        };
        let before = self.sessions.len();

        self.sessions
            .retain(|_, session| session.machine_thinking || session.last_move_at >= cutoff_time);

        before.saturating_sub(self.sessions.len())
    }

    pub fn session_exists(&self, session_id: &Uuid) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// 着手処理の開始を宣言する
    /// 探索中フラグの確認と設定をエントリのロック内で行い、同じセッションへの
    /// 重複した着手はMoveInProgressで拒否する。開始時点のセッションの複製を返す
    pub fn begin_move(&self, session_id: &Uuid) -> Result<GameSession> {
        let mut session = self
            .sessions
            .get_mut(session_id)
            .ok_or(GameError::GameNotFound { game_id: *session_id })?;

        if session.machine_thinking {
            return Err(GameError::MoveInProgress);
        }

        session.machine_thinking = true;
        Ok(session.clone())
    }

    /// 着手処理を終了し、結果のセッションを書き戻す（探索中フラグは解除される）
    /// 処理中にセッションが削除されていた場合は書き戻さない
    pub fn finish_move(&self, mut session: GameSession) -> Result<()> {
        session.machine_thinking = false;
        self.update_session(session)
    }

    /// エラー時に探索中フラグだけを解除する
    pub fn abort_move(&self, session_id: &Uuid) {
        if let Some(mut session) = self.sessions.get_mut(session_id) {
            session.machine_thinking = false;
        }
    }

    pub fn is_machine_thinking(&self, session_id: &Uuid) -> Result<bool> {
        self.sessions
            .get(session_id)
            .map(|session| session.machine_thinking)
            .ok_or(GameError::GameNotFound { game_id: *session_id })
    }

    pub fn get_stats(&self) -> SessionStats {
        let mut stats = SessionStats {
            total_sessions: 0,
            max_sessions: self.max_sessions,
            machine_thinking_count: 0,
            finished_count: 0,
        };

        for entry in self.sessions.iter() {
            stats.total_sessions += 1;
            if entry.machine_thinking {
                stats.machine_thinking_count += 1;
            }
            if entry.is_finished() {
                stats.finished_count += 1;
            }
        }

        stats
    }
}

impl Default for GameSessionManager {
    fn default() -> Self {
        Self::new(100)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub total_sessions: usize,
    pub max_sessions: usize,
    pub machine_thinking_count: usize,
    pub finished_count: usize,
}
