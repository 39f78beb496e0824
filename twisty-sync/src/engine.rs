//! The puzzle engine seam: who owns the true state and validates moves.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, instrument};
use twisty_core::{
    CubeError, CubeResult, MoveRequest, MoveResponse, MoveToken, PuzzleModel, StateSnapshot,
};

/// Remote (or simulated) authority over the puzzle state
pub trait PuzzleEngine: Send + Sync + 'static {
    /// Current full state for `user`
    fn fetch_state(&self, user: &str) -> impl Future<Output = CubeResult<StateSnapshot>> + Send;

    /// Ask the engine to perform `token`; rejections come back as a
    /// non-`"ok"` status, not as an error
    fn submit_move(
        &self,
        user: &str,
        token: &MoveToken,
    ) -> impl Future<Output = CubeResult<MoveResponse>> + Send;
}

impl<E: PuzzleEngine> PuzzleEngine for Arc<E> {
    fn fetch_state(&self, user: &str) -> impl Future<Output = CubeResult<StateSnapshot>> + Send {
        (**self).fetch_state(user)
    }

    fn submit_move(
        &self,
        user: &str,
        token: &MoveToken,
    ) -> impl Future<Output = CubeResult<MoveResponse>> + Send {
        (**self).submit_move(user, token)
    }
}

fn transport(err: reqwest::Error) -> CubeError {
    CubeError::Transport(err.to_string())
}

/// Engine reached over HTTP: `GET /getstate?user=..` and `POST /maketurn`
#[derive(Debug, Clone)]
pub struct HttpEngine {
    client: reqwest::Client,
    base_url: String,
}

impl HttpEngine {
    pub fn new(base_url: &str, timeout: Duration) -> CubeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl PuzzleEngine for HttpEngine {
    #[instrument(skip(self), level = "trace")]
    async fn fetch_state(&self, user: &str) -> CubeResult<StateSnapshot> {
        let response = self
            .client
            .get(format!("{}/getstate", self.base_url))
            .query(&[("user", user)])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(transport)?;
        let snapshot: StateSnapshot = response.json().await.map_err(transport)?;
        debug!(pieces = snapshot.len(), "fetched state");
        Ok(snapshot)
    }

    #[instrument(skip(self, token), fields(token = %token), level = "trace")]
    async fn submit_move(&self, user: &str, token: &MoveToken) -> CubeResult<MoveResponse> {
        let request = MoveRequest {
            user: user.to_string(),
            token: token.to_string(),
        };
        let response = self
            .client
            .post(format!("{}/maketurn", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(transport)?;

        // A rejection may come with an error status but still carry a body
        let http_status = response.status();
        let body = response.text().await.map_err(transport)?;
        MoveResponse::from_json(&body).map_err(|err| {
            CubeError::Transport(format!("maketurn answered {http_status}: {err}"))
        })
    }
}

/// In-process engine backed by [`PuzzleModel`], for offline play
#[derive(Debug)]
pub struct LocalEngine {
    model: Mutex<PuzzleModel>,
}

impl LocalEngine {
    pub fn new(model: PuzzleModel) -> Self {
        Self {
            model: Mutex::new(model),
        }
    }
}

impl PuzzleEngine for LocalEngine {
    async fn fetch_state(&self, _user: &str) -> CubeResult<StateSnapshot> {
        Ok(self.model.lock().snapshot())
    }

    async fn submit_move(&self, _user: &str, token: &MoveToken) -> CubeResult<MoveResponse> {
        let mut model = self.model.lock();
        model.apply(*token);
        Ok(MoveResponse::accepted(model.snapshot()))
    }
}
