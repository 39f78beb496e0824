//! Sending moves to the engine and applying its answer.

use std::sync::Arc;

use tracing::{info, warn};
use twisty_core::{Applied, CubeError, CubeResult, MoveToken, Notice, StateSnapshot};

use crate::engine::PuzzleEngine;
use crate::sync_loop::Refresh;
use crate::SharedSession;

/// Status reported for notation that never reached the engine
const UNPARSABLE: &str = "unparsable";

pub struct MoveSubmitter<E> {
    engine: Arc<E>,
    session: SharedSession,
    refresh: Refresh,
    refetch_on_reject: bool,
}

impl<E> Clone for MoveSubmitter<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            session: Arc::clone(&self.session),
            refresh: self.refresh.clone(),
            refetch_on_reject: self.refetch_on_reject,
        }
    }
}

impl<E: PuzzleEngine> MoveSubmitter<E> {
    pub fn new(engine: Arc<E>, session: SharedSession, refresh: Refresh) -> Self {
        Self {
            engine,
            session,
            refresh,
            refetch_on_reject: false,
        }
    }

    /// Also poll right away when the engine rejects a move, in case the
    /// rejection came from a stale local view
    pub fn refetch_on_reject(mut self, enabled: bool) -> Self {
        self.refetch_on_reject = enabled;
        self
    }

    /// Send `token` and apply the accepted state without waiting for the next poll.
    ///
    /// A rejection raises an [`Notice::InvalidMove`] and leaves every cubie as it was.
    /// An accepted move always triggers a refresh, even when its state is unusable.
    pub async fn submit(&self, token: MoveToken) -> CubeResult<Applied> {
        let user = self.session.lock().user().to_string();

        let response = self.engine.submit_move(&user, &token).await.map_err(|err| {
            warn!(%token, error = %err, "move submission failed");
            err
        })?;

        if !response.is_ok() {
            let status = response.status;
            self.reject(token.to_string(), status.clone());
            if self.refetch_on_reject {
                self.refresh.now();
            }
            return Err(CubeError::InvalidMoveRejected {
                token: token.to_string(),
                status,
            });
        }

        let snapshot = response
            .into_snapshot()
            .unwrap_or_else(|| StateSnapshot::new(Vec::new()));
        // The engine answered every earlier poll before turning, so the id is
        // taken on arrival: polls still in flight are older than this state.
        let result = {
            let mut session = self.session.lock();
            let id = session.next_request();
            session.apply_response(id, &snapshot)
        };
        self.refresh.now();

        let applied = result.map_err(|err| {
            warn!(%token, error = %err, "accepted move carried unusable state");
            err
        })?;
        info!(%token, ?applied, "move accepted");
        Ok(applied)
    }

    /// Parse `notation` first; anything outside the alphabet is rejected
    /// locally, without a request
    pub async fn submit_notation(&self, notation: &str) -> CubeResult<Applied> {
        match notation.parse::<MoveToken>() {
            Ok(token) => self.submit(token).await,
            Err(_) => {
                self.reject(notation.to_string(), UNPARSABLE.to_string());
                Err(CubeError::InvalidMoveRejected {
                    token: notation.to_string(),
                    status: UNPARSABLE.to_string(),
                })
            }
        }
    }

    fn reject(&self, token: String, status: String) {
        warn!(%token, %status, "move rejected");
        self.session
            .lock()
            .push_notice(Notice::InvalidMove { token, status });
    }
}
