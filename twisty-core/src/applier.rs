//! Writes engine snapshots onto registered cubies.

use tracing::{debug, warn};

use crate::cubie::Cubie;
use crate::error::{CubeError, CubeResult};
use crate::registry::PieceRegistry;
use crate::state::StateSnapshot;
use crate::transform::Placement;

/// Sets every cubie's absolute placement from a snapshot.
///
/// The whole snapshot is validated before the first cubie is touched, so a
/// malformed payload never leaves the puzzle half updated.
#[derive(Debug, Clone, Copy)]
pub struct TransformApplier {
    spacing: f32,
}

impl TransformApplier {
    /// `spacing` scales every position uniformly; values above 1 open gaps between cubies
    pub fn new(spacing: f32) -> Self {
        Self { spacing }
    }

    /// Returns the number of cubies written
    pub fn apply(
        &self,
        registry: &mut PieceRegistry<Cubie>,
        snapshot: &StateSnapshot,
    ) -> CubeResult<usize> {
        let placements = self.validate(registry.len(), snapshot).map_err(|err| {
            warn!(error = %err, "rejecting state snapshot");
            err
        })?;
        if let Some(index) = (0..registry.len()).find(|i| registry.get(*i).is_err()) {
            return Err(CubeError::IndexOutOfRange {
                index,
                len: registry.len(),
            });
        }

        for (index, placement) in placements.into_iter().enumerate() {
            registry.get_mut(index)?.placement = placement;
        }

        debug!(pieces = registry.len(), "applied state snapshot");
        Ok(registry.len())
    }

    fn validate(&self, expected: usize, snapshot: &StateSnapshot) -> CubeResult<Vec<Placement>> {
        if snapshot.len() != expected {
            return Err(CubeError::StateLengthMismatch {
                expected,
                actual: snapshot.len(),
            });
        }

        snapshot
            .pieces
            .iter()
            .enumerate()
            .map(|(index, piece)| {
                let placement = piece.to_placement(index)?;
                Ok(Placement::new(placement.position * self.spacing, placement.orientation))
            })
            .collect()
    }
}

impl Default for TransformApplier {
    fn default() -> Self {
        Self::new(1.0)
    }
}
