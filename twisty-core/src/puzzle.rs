//! In-memory puzzle model that applies moves to a snapshot.
//!
//! Stands in for the remote engine in offline mode and in tests. Pieces are
//! kept in lattice order so index `i` matches the cubie built for the same
//! starting position.

use std::f32::consts::FRAC_PI_2;

use nalgebra::Vector3;
use tracing::trace;

use crate::cubie::lattice_positions;
use crate::error::CubeResult;
use crate::moves::{parse_sequence, Face, MoveToken};
use crate::state::{PieceState, StateSnapshot};
use crate::transform::{Orientation, Placement};

/// The sequence every engine session used to start from
pub const DEFAULT_SCRAMBLE: &str = "R U R' U' R U R' U' R U R' U'";

/// Which layers along the turn axis a move affects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layers {
    Outer,
    Middle,
    All,
}

#[derive(Debug, Clone)]
pub struct PuzzleModel {
    order: usize,
    pieces: Vec<Placement>,
}

impl PuzzleModel {
    pub fn solved(order: usize) -> Self {
        let pieces = lattice_positions(order).into_iter().map(Placement::at).collect();
        Self { order, pieces }
    }

    pub fn scrambled(order: usize, sequence: &str) -> CubeResult<Self> {
        let mut model = Self::solved(order);
        for token in parse_sequence(sequence)? {
            model.apply(token);
        }
        Ok(model)
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn placements(&self) -> &[Placement] {
        &self.pieces
    }

    pub fn is_solved(&self) -> bool {
        lattice_positions(self.order)
            .into_iter()
            .zip(&self.pieces)
            .all(|(home, piece)| piece.approx_eq(&Placement::at(home), 1e-4))
    }

    pub fn apply(&mut self, token: MoveToken) {
        let (axis, layers) = turn_axis(token.face);
        let angle = -(token.modifier.quarter_turns() as f32) * FRAC_PI_2;
        let turn = Orientation::from_axis_angle(axis, angle);
        let outer = (self.order as f32 - 1.0) / 2.0;

        let mut turned = 0;
        for piece in &mut self.pieces {
            let depth = piece.position.dot(&axis);
            let selected = match layers {
                Layers::Outer => depth > outer - 0.5,
                Layers::Middle => depth.abs() < 0.5,
                Layers::All => true,
            };
            if !selected {
                continue;
            }
            piece.position = snap(turn.rotate_vector(piece.position), outer);
            piece.orientation = turn.compose(piece.orientation);
            turned += 1;
        }
        trace!(%token, turned, "applied move to puzzle model");
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::new(self.pieces.iter().copied().map(PieceState::from).collect())
    }
}

fn turn_axis(face: Face) -> (Vector3<f32>, Layers) {
    match face {
        Face::Right => (Vector3::x(), Layers::Outer),
        Face::Left => (-Vector3::x(), Layers::Outer),
        Face::Up => (Vector3::y(), Layers::Outer),
        Face::Down => (-Vector3::y(), Layers::Outer),
        Face::Front => (Vector3::z(), Layers::Outer),
        Face::Back => (-Vector3::z(), Layers::Outer),
        Face::Middle => (-Vector3::x(), Layers::Middle),
        Face::Equator => (-Vector3::y(), Layers::Middle),
        Face::Standing => (Vector3::z(), Layers::Middle),
        Face::X => (Vector3::x(), Layers::All),
        Face::Y => (Vector3::y(), Layers::All),
        Face::Z => (Vector3::z(), Layers::All),
    }
}

/// Round each coordinate back onto the lattice
fn snap(position: Vector3<f32>, outer: f32) -> Vector3<f32> {
    position.map(|c| (c + outer).round() - outer)
}
