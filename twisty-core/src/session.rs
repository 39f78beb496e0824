//! Per-user session: owns every cubie and orders incoming snapshots.

use std::collections::VecDeque;

use tracing::{debug, info};

use crate::applier::TransformApplier;
use crate::config::ClientConfig;
use crate::cubie::{lattice_positions, Cubie, CubieFactory};
use crate::error::CubeResult;
use crate::registry::PieceRegistry;
use crate::state::StateSnapshot;
use crate::transform::Placement;

/// Issued when a fetch or move request starts; higher ids are newer
pub type RequestId = u64;

/// Outcome of offering a response to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Snapshot written to this many cubies
    Fresh(usize),
    /// A newer response was already applied; nothing changed
    Stale,
}

/// Something the user has to be told about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    InvalidMove { token: String, status: String },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::InvalidMove { token, .. } => write!(f, "invalid turn: {token}"),
        }
    }
}

pub struct Session {
    user: String,
    registry: PieceRegistry<Cubie>,
    applier: TransformApplier,
    issued: RequestId,
    last_applied: RequestId,
    notices: VecDeque<Notice>,
}

impl Session {
    /// Build and register one cubie per lattice position
    pub fn start(config: &ClientConfig, user: impl Into<String>) -> CubeResult<Self> {
        config.validate()?;
        let factory = CubieFactory::new(config.puzzle_order, config.cubie.into());
        let mut registry = PieceRegistry::new(config.piece_count());
        for (index, position) in lattice_positions(config.puzzle_order).into_iter().enumerate() {
            registry.register(index, factory.build(position))?;
        }

        let user = user.into();
        info!(%user, pieces = registry.len(), "session started");
        Ok(Self {
            user,
            registry,
            applier: TransformApplier::new(config.layout_spacing),
            issued: 0,
            last_applied: 0,
            notices: VecDeque::new(),
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn registry(&self) -> &PieceRegistry<Cubie> {
        &self.registry
    }

    pub fn next_request(&mut self) -> RequestId {
        self.issued += 1;
        self.issued
    }

    /// Apply the snapshot answering request `id` unless a newer one already landed.
    /// A rejected snapshot leaves both the cubies and the ordering untouched.
    pub fn apply_response(
        &mut self,
        id: RequestId,
        snapshot: &StateSnapshot,
    ) -> CubeResult<Applied> {
        if id <= self.last_applied {
            debug!(id, last_applied = self.last_applied, "dropping stale snapshot");
            return Ok(Applied::Stale);
        }
        let written = self.applier.apply(&mut self.registry, snapshot)?;
        self.last_applied = id;
        Ok(Applied::Fresh(written))
    }

    pub fn placements(&self) -> Vec<Placement> {
        self.registry.iter().map(|(_, cubie)| cubie.placement).collect()
    }

    pub fn push_notice(&mut self, notice: Notice) {
        info!(%notice, "notice raised");
        self.notices.push_back(notice);
    }

    /// Drain pending notices; each one is returned exactly once
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }
}
