//! Periodic state polling with on-demand refresh.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};
use twisty_core::{Applied, CubeResult};

use crate::engine::PuzzleEngine;
use crate::SharedSession;

/// Result of one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Snapshot applied to this many cubies
    Applied(usize),
    /// A newer snapshot had already been applied
    Stale,
    /// Another fetch was still in flight; nothing was requested
    Busy,
}

/// Wakes the sync loop for an immediate fetch. Repeated calls while a fetch
/// is running collapse into a single follow-up fetch.
#[derive(Debug, Clone, Default)]
pub struct Refresh(Arc<Notify>);

impl Refresh {
    pub fn now(&self) {
        self.0.notify_one();
    }
}

/// Clears the in-flight flag when a step finishes or is dropped
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SyncLoop<E> {
    engine: Arc<E>,
    session: SharedSession,
    interval: Duration,
    in_flight: AtomicBool,
    refresh: Refresh,
}

impl<E: PuzzleEngine> SyncLoop<E> {
    pub fn new(engine: Arc<E>, session: SharedSession, interval: Duration) -> Self {
        Self {
            engine,
            session,
            interval,
            in_flight: AtomicBool::new(false),
            refresh: Refresh::default(),
        }
    }

    pub fn refresher(&self) -> Refresh {
        self.refresh.clone()
    }

    /// Fetch once and apply the result. At most one fetch runs at a time.
    pub async fn step(&self) -> CubeResult<StepOutcome> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            trace!("fetch already in flight");
            return Ok(StepOutcome::Busy);
        }
        let _guard = InFlight(&self.in_flight);

        let (id, user) = {
            let mut session = self.session.lock();
            (session.next_request(), session.user().to_string())
        };
        let snapshot = self.engine.fetch_state(&user).await?;
        let applied = self.session.lock().apply_response(id, &snapshot)?;

        Ok(match applied {
            Applied::Fresh(written) => StepOutcome::Applied(written),
            Applied::Stale => StepOutcome::Stale,
        })
    }

    /// Run until the returned handle shuts the loop down. The first fetch
    /// happens immediately.
    pub fn spawn(self) -> SyncHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let refresh = self.refresher();
        let task = tokio::spawn(self.run(shutdown_rx));
        SyncHandle {
            refresh,
            shutdown: shutdown_tx,
            task,
        }
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(interval_ms = self.interval.as_millis() as u64, "sync loop started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                _ = ticker.tick() => {}
                _ = self.refresh.0.notified() => {
                    // fresh state just arrived, the next poll can wait a full interval
                    ticker.reset();
                }
            }

            match self.step().await {
                Ok(outcome) => trace!(?outcome, "poll finished"),
                Err(err) => warn!(error = %err, "poll failed, keeping last good state"),
            }
        }
        debug!("sync loop stopped");
    }
}

/// Control handle for a spawned [`SyncLoop`]. Dropping it stops the loop.
#[derive(Debug)]
pub struct SyncHandle {
    refresh: Refresh,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    pub fn refresh_now(&self) {
        self.refresh.now();
    }

    pub fn refresher(&self) -> Refresh {
        self.refresh.clone()
    }

    /// Stop polling and wait for the loop to exit
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(err) = self.task.await {
            warn!(error = %err, "sync loop task ended abnormally");
        }
    }
}
