#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use twisty_core::{
    lattice_positions, ClientConfig, CubeError, CubeResult, MoveResponse, MoveToken, Placement,
    PuzzleModel, Session, StateSnapshot,
};
use twisty_sync::{PuzzleEngine, SharedSession};

/// What the next fetch should do
pub enum FetchStep {
    Reply(StateSnapshot),
    Fail,
    /// Wait until the test sends the snapshot
    Gate(oneshot::Receiver<StateSnapshot>),
}

/// Engine double: answers from a [`PuzzleModel`] unless a fetch step is queued
pub struct ScriptedEngine {
    model: Mutex<PuzzleModel>,
    script: Mutex<VecDeque<FetchStep>>,
    reject_with: Mutex<Option<String>>,
    move_gate: Mutex<Option<oneshot::Receiver<()>>>,
    truncate_moves: AtomicBool,
    fetches: AtomicUsize,
    submits: AtomicUsize,
}

impl ScriptedEngine {
    pub fn solved() -> Self {
        Self {
            model: Mutex::new(PuzzleModel::solved(3)),
            script: Mutex::new(VecDeque::new()),
            reject_with: Mutex::new(None),
            move_gate: Mutex::new(None),
            truncate_moves: AtomicBool::new(false),
            fetches: AtomicUsize::new(0),
            submits: AtomicUsize::new(0),
        }
    }

    pub fn push(&self, step: FetchStep) {
        self.script.lock().push_back(step);
    }

    /// Queue a fetch that blocks until the returned sender fires
    pub fn gate(&self) -> oneshot::Sender<StateSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.push(FetchStep::Gate(rx));
        tx
    }

    pub fn reject_moves(&self, status: &str) {
        *self.reject_with.lock() = Some(status.to_string());
    }

    /// Hold the next move until the returned sender fires; the turn is
    /// performed only after release
    pub fn gate_moves(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.move_gate.lock() = Some(rx);
        tx
    }

    /// Accept moves but answer with one piece missing
    pub fn truncate_moves(&self) {
        self.truncate_moves.store(true, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn submits(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.model.lock().snapshot()
    }
}

impl PuzzleEngine for ScriptedEngine {
    async fn fetch_state(&self, _user: &str) -> CubeResult<StateSnapshot> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let step = self.script.lock().pop_front();
        match step {
            None => Ok(self.snapshot()),
            Some(FetchStep::Reply(snapshot)) => Ok(snapshot),
            Some(FetchStep::Fail) => Err(CubeError::Transport("connection refused".into())),
            Some(FetchStep::Gate(rx)) => rx
                .await
                .map_err(|_| CubeError::Transport("gate dropped".into())),
        }
    }

    async fn submit_move(&self, _user: &str, token: &MoveToken) -> CubeResult<MoveResponse> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        let gate = self.move_gate.lock().take();
        if let Some(gate) = gate {
            gate.await
                .map_err(|_| CubeError::Transport("gate dropped".into()))?;
        }
        if let Some(status) = self.reject_with.lock().clone() {
            return Ok(MoveResponse::rejected(status));
        }
        let mut snapshot = {
            let mut model = self.model.lock();
            model.apply(*token);
            model.snapshot()
        };
        if self.truncate_moves.load(Ordering::SeqCst) {
            snapshot.pieces.pop();
        }
        Ok(MoveResponse::accepted(snapshot))
    }
}

pub fn shared_session() -> SharedSession {
    Arc::new(Mutex::new(
        Session::start(&ClientConfig::default(), "ana").expect("default config is valid"),
    ))
}

pub fn turned(notation: &str) -> StateSnapshot {
    PuzzleModel::scrambled(3, notation).unwrap().snapshot()
}

pub fn placements_of(snapshot: &StateSnapshot) -> Vec<Placement> {
    snapshot
        .pieces
        .iter()
        .enumerate()
        .map(|(i, p)| p.to_placement(i).unwrap())
        .collect()
}

pub fn assert_solved(session: &SharedSession) {
    let placements = session.lock().placements();
    assert_eq!(placements.len(), 27);
    for (placement, home) in placements.iter().zip(lattice_positions(3)) {
        assert!(
            placement.approx_eq(&Placement::at(home), 1e-6),
            "{placement:?} not at {home:?}"
        );
    }
}
