//! Wire types exchanged with the puzzle engine.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::cubie::lattice_positions;
use crate::error::{CubeError, CubeResult};
use crate::transform::{Orientation, Placement};

/// Status value the engine uses for an accepted move
pub const STATUS_OK: &str = "ok";

/// One piece as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieceState {
    pub position: [f32; 3],
    /// `[x, y, z, w]`
    pub orientation: [f32; 4],
}

impl PieceState {
    pub fn new(position: [f32; 3], orientation: [f32; 4]) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Validate and convert, tagging errors with the piece index
    pub fn to_placement(&self, index: usize) -> CubeResult<Placement> {
        if self.position.iter().any(|c| !c.is_finite()) {
            return Err(CubeError::NonFinitePosition { index });
        }
        let orientation = Orientation::from_array(self.orientation, index)?;
        Ok(Placement::new(Vector3::from(self.position), orientation))
    }
}

impl From<Placement> for PieceState {
    fn from(placement: Placement) -> Self {
        Self {
            position: placement.position.into(),
            orientation: placement.orientation.to_array(),
        }
    }
}

/// Full ordered puzzle state; always applied as a whole
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub pieces: Vec<PieceState>,
}

impl StateSnapshot {
    pub fn new(pieces: Vec<PieceState>) -> Self {
        Self { pieces }
    }

    /// Solved puzzle: every piece at its lattice position with identity rotation
    pub fn solved(order: usize) -> Self {
        let pieces = lattice_positions(order)
            .into_iter()
            .map(|p| PieceState::from(Placement::at(p)))
            .collect();
        Self { pieces }
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn from_json(json: &str) -> CubeResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CubeError::Transport(format!("bad state payload: {e}")))
    }
}

/// Body of a move submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub user: String,
    #[serde(rename = "move")]
    pub token: String,
}

/// Engine answer to a move submission. `pieces` is only present on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pieces: Option<Vec<PieceState>>,
}

impl MoveResponse {
    pub fn accepted(snapshot: StateSnapshot) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            pieces: Some(snapshot.pieces),
        }
    }

    pub fn rejected(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            pieces: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// New state carried by an accepted move; an accepted move without
    /// pieces counts as an empty snapshot so length validation rejects it
    pub fn into_snapshot(self) -> Option<StateSnapshot> {
        if !self.is_ok() {
            return None;
        }
        Some(StateSnapshot::new(self.pieces.unwrap_or_default()))
    }

    pub fn from_json(json: &str) -> CubeResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CubeError::Transport(format!("bad move payload: {e}")))
    }
}
