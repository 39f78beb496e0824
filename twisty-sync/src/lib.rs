//! Twisty Sync - keeps a [`Session`] in step with the puzzle engine.
//!
//! The sync loop polls the engine on a fixed interval and the move submitter
//! pushes moves, applying accepted state immediately. Both share the session
//! through a short-lived lock that is never held across an await point.

pub mod engine;
pub mod submit;
pub mod sync_loop;

use std::sync::Arc;

use parking_lot::Mutex;
use twisty_core::{ClientConfig, CubeResult, Session};

pub use engine::{HttpEngine, LocalEngine, PuzzleEngine};
pub use submit::MoveSubmitter;
pub use sync_loop::{Refresh, StepOutcome, SyncHandle, SyncLoop};

pub type SharedSession = Arc<Mutex<Session>>;

/// A started session together with its running sync loop
pub struct SyncClient<E> {
    pub session: SharedSession,
    pub submitter: MoveSubmitter<E>,
    pub handle: SyncHandle,
}

impl<E: PuzzleEngine> SyncClient<E> {
    /// Build the session and start polling. Must run inside a tokio runtime.
    pub fn start(config: &ClientConfig, engine: E) -> CubeResult<Self> {
        let session: SharedSession =
            Arc::new(Mutex::new(Session::start(config, config.user.clone())?));
        let engine = Arc::new(engine);

        let sync = SyncLoop::new(Arc::clone(&engine), Arc::clone(&session), config.poll_interval());
        let submitter = MoveSubmitter::new(engine, Arc::clone(&session), sync.refresher())
            .refetch_on_reject(config.refetch_on_reject);
        let handle = sync.spawn();

        Ok(Self {
            session,
            submitter,
            handle,
        })
    }
}
