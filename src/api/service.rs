//! 対局サービス
//! 人間の着手 → マシンの探索 → マシンの着手 という1手番の流れをまとめる。

use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::ai::service::AIService;
use crate::error::{AIError, GameError, Result};
use crate::game::{MoveOutcome, Position};
use crate::session::{GameSession, GameSessionManager, SessionStats};

use super::dto::{GameMessage, GameResponse, MoveHistoryResponse, MoveResponse, SessionListResponse, SessionSummary};

pub struct GameService {
    session_manager: Arc<GameSessionManager>,
    ai_service: Arc<dyn AIService>,
}

impl std::fmt::Debug for GameService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameService")
            .field("session_manager", &self.session_manager)
            .field("ai_service", &self.ai_service.get_name())
            .finish()
    }
}

impl GameService {
    pub fn new(session_manager: Arc<GameSessionManager>, ai_service: Arc<dyn AIService>) -> Self {
        Self {
            session_manager,
            ai_service,
        }
    }

    pub fn get_ai_service(&self) -> &Arc<dyn AIService> {
        &self.ai_service
    }

    pub fn session_manager(&self) -> &Arc<GameSessionManager> {
        &self.session_manager
    }

    pub fn create_game(&self) -> Result<GameResponse> {
        let session = self.session_manager.create_session()?;
        info!(game_id = %session.id, "game created");
        Ok(GameResponse::from_session(&session))
    }

    pub fn get_game(&self, game_id: Uuid) -> Result<GameResponse> {
        let session = self.session_manager.get_session(&game_id)?;
        Ok(GameResponse::from_session(&session))
    }

    /// 人間の手を打ち、続けてマシンの応手を返す
    /// 手番の途中で失敗した場合、セッションは着手前の状態のまま残る
    #[instrument(skip(self), fields(row = position.row, col = position.col))]
    pub async fn make_move(&self, game_id: Uuid, position: Position) -> Result<MoveResponse> {
        let mut session = self.session_manager.begin_move(&game_id)?;

        let machine_reply = match self.play_turn(&mut session, position).await {
            Ok(reply) => reply,
            Err(err) => {
                self.session_manager.abort_move(&game_id);
                return Err(err);
            }
        };

        session.machine_thinking = false;
        session.touch();

        let message = GameMessage::from_status(session.game_state.game_status);
        if let Some(message) = message {
            info!(%game_id, ?message, "game finished");
        }

        let game_state = GameResponse::from_session(&session);
        self.session_manager.finish_move(session)?;

        Ok(MoveResponse {
            success: true,
            game_state,
            player_move: position,
            machine_move: machine_reply.map(|(position, _)| position),
            thinking_time_ms: machine_reply.map(|(_, thinking_time_ms)| thinking_time_ms),
            message,
        })
    }

    /// 人間の手を適用し、対局が続く場合はマシンの手も適用する
    /// マシンが打った場合はその位置と思考時間を返す
    async fn play_turn(&self, session: &mut GameSession, position: Position) -> Result<Option<(Position, u64)>> {
        let state = &mut session.game_state;

        if state.apply_human_move(position)? != MoveOutcome::Continue {
            return Ok(None);
        }

        match self.ai_service.calculate_move(state).await {
            Ok(result) => {
                state.apply_machine_move(result.position)?;
                Ok(Some((result.position, result.thinking_time_ms)))
            }
            // 候補手がない = 盤面が埋まっている
            Err(AIError::NoValidMoves) => {
                state.finish_draw();
                Ok(None)
            }
            Err(err) => {
                warn!(error = %err, "machine move failed");
                Err(GameError::from(err))
            }
        }
    }

    /// 盤面を空に戻して新しい対局を始める
    pub fn reset_game(&self, game_id: Uuid) -> Result<GameResponse> {
        let mut session = self.session_manager.begin_move(&game_id)?;
        session.game_state.reset();
        session.touch();
        session.machine_thinking = false;

        let response = GameResponse::from_session(&session);
        self.session_manager.finish_move(session)?;
        Ok(response)
    }

    pub fn get_move_history(&self, game_id: Uuid) -> Result<MoveHistoryResponse> {
        let session = self.session_manager.get_session(&game_id)?;
        let moves = session.game_state.move_history;

        Ok(MoveHistoryResponse {
            game_id,
            total_moves: moves.len(),
            moves,
        })
    }

    pub fn list_sessions(&self) -> SessionListResponse {
        let sessions: Vec<SessionSummary> = self
            .session_manager
            .list_sessions()
            .iter()
            .map(SessionSummary::from_session)
            .collect();

        SessionListResponse {
            total_count: sessions.len(),
            sessions,
        }
    }

    pub fn delete_game(&self, game_id: Uuid) -> Result<()> {
        self.session_manager.remove_session(&game_id)?;
        info!(%game_id, "game deleted");
        Ok(())
    }

    pub fn cleanup_inactive_sessions(&self) -> usize {
        self.session_manager.cleanup_inactive_sessions()
    }

    pub fn get_stats(&self) -> SessionStats {
        self.session_manager.get_stats()
    }
}
