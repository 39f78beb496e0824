//! Cubie construction: one black body plus six oriented stickers per piece.

use nalgebra::{Matrix4, Vector3};

use crate::geometry::{FaceColor, Mesh};
use crate::transform::{Orientation, Placement, Transform};

/// Tolerance when deciding whether a lattice coordinate sits on the outer layer
const LAYER_EPSILON: f32 = 1e-3;

/// The six axis directions a sticker can face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::PosX,
        Direction::NegX,
        Direction::PosY,
        Direction::NegY,
        Direction::PosZ,
        Direction::NegZ,
    ];

    pub fn vector(self) -> Vector3<f32> {
        match self {
            Direction::PosX => Vector3::new(1.0, 0.0, 0.0),
            Direction::NegX => Vector3::new(-1.0, 0.0, 0.0),
            Direction::PosY => Vector3::new(0.0, 1.0, 0.0),
            Direction::NegY => Vector3::new(0.0, -1.0, 0.0),
            Direction::PosZ => Vector3::new(0.0, 0.0, 1.0),
            Direction::NegZ => Vector3::new(0.0, 0.0, -1.0),
        }
    }

    /// Puzzle coloring. The only place colors are assigned to faces.
    pub fn color(self) -> FaceColor {
        match self {
            Direction::PosX => FaceColor::Red,
            Direction::NegX => FaceColor::Orange,
            Direction::PosY => FaceColor::Yellow,
            Direction::NegY => FaceColor::White,
            Direction::PosZ => FaceColor::Blue,
            Direction::NegZ => FaceColor::Green,
        }
    }
}

/// Physical dimensions shared by every cubie
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubieMetrics {
    /// Edge length of the body
    pub extent: f32,
    /// Gap between a sticker's edge and the body's edge
    pub sticker_padding: f32,
    pub sticker_thickness: f32,
}

impl CubieMetrics {
    pub fn sticker_size(&self) -> f32 {
        self.extent - self.sticker_padding * 2.0
    }

    /// Distance from the cubie center to a sticker center
    pub fn sticker_offset(&self) -> f32 {
        self.extent / 2.0 + self.sticker_thickness / 2.0
    }
}

impl Default for CubieMetrics {
    fn default() -> Self {
        Self {
            extent: 1.0,
            sticker_padding: 0.05,
            sticker_thickness: 0.02,
        }
    }
}

/// One face marker, in the cubie's local frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sticker {
    pub direction: Direction,
    pub color: FaceColor,
    pub offset: Vector3<f32>,
    /// Turns the sticker's `+Z` normal onto `direction`
    pub rotation: Orientation,
    /// Drawn from both sides, so it stays visible from inside the puzzle's hull
    pub double_sided: bool,
}

/// Renderable object for one piece. Only `placement` changes after construction.
#[derive(Debug, Clone)]
pub struct Cubie {
    pub metrics: CubieMetrics,
    pub initial_position: Vector3<f32>,
    pub stickers: [Sticker; 6],
    pub placement: Placement,
}

impl Cubie {
    /// Local-space mesh: body plus stickers, before placement
    pub fn local_mesh(&self) -> Mesh {
        let mut mesh = Mesh::cube(self.metrics.extent, FaceColor::Black);
        let size = self.metrics.sticker_size();
        let plate = Mesh::cuboid(
            Vector3::new(size, size, self.metrics.sticker_thickness),
            FaceColor::Black,
        );
        for sticker in &self.stickers {
            let offset = sticker.offset;
            let local = Transform::translation_matrix(offset.x, offset.y, offset.z)
                * sticker.rotation.to_unit().to_homogeneous();
            let mut placed = plate.transformed(&local);
            for triangle in &mut placed.triangles {
                triangle.color = sticker.color;
            }
            mesh.extend(placed);
        }
        mesh
    }

    /// World-space mesh at the current placement
    pub fn world_mesh(&self) -> Mesh {
        self.local_mesh().transformed(&self.model_matrix())
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.placement.model_matrix()
    }

    pub fn sticker(&self, direction: Direction) -> &Sticker {
        let index = Direction::ALL
            .iter()
            .position(|d| *d == direction)
            .unwrap_or_default();
        &self.stickers[index]
    }
}

/// Builds cubies for a puzzle of a given order
#[derive(Debug, Clone, Copy)]
pub struct CubieFactory {
    metrics: CubieMetrics,
    order: usize,
}

impl CubieFactory {
    pub fn new(order: usize, metrics: CubieMetrics) -> Self {
        Self { metrics, order }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Coordinate of the outer layer along any axis
    fn outer_layer(&self) -> f32 {
        (self.order as f32 - 1.0) / 2.0
    }

    /// Build the cubie that starts at `initial_position`. Faces on the
    /// puzzle's surface get their color, inward faces stay neutral.
    pub fn build(&self, initial_position: Vector3<f32>) -> Cubie {
        let outer = self.outer_layer();
        let stickers = Direction::ALL.map(|direction| {
            let axis = direction.vector();
            let exterior = initial_position.dot(&axis) >= outer - LAYER_EPSILON;
            Sticker {
                direction,
                color: if exterior {
                    direction.color()
                } else {
                    FaceColor::Neutral
                },
                offset: axis * self.metrics.sticker_offset(),
                rotation: Orientation::between(Vector3::z(), axis),
                double_sided: true,
            }
        });

        Cubie {
            metrics: self.metrics,
            initial_position,
            stickers,
            placement: Placement::at(initial_position),
        }
    }
}

impl Default for CubieFactory {
    fn default() -> Self {
        Self::new(3, CubieMetrics::default())
    }
}

/// Initial lattice positions, x-major then y then z
pub fn lattice_positions(order: usize) -> Vec<Vector3<f32>> {
    let outer = (order as f32 - 1.0) / 2.0;
    let coord = |i: usize| i as f32 - outer;
    let mut positions = Vec::with_capacity(order * order * order);
    for i in 0..order {
        for j in 0..order {
            for k in 0..order {
                positions.push(Vector3::new(coord(i), coord(j), coord(k)));
            }
        }
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lattice_spans_unit_cube() {
        let positions = lattice_positions(3);
        assert_eq!(positions.len(), 27);
        assert_eq!(positions[0], Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(positions[13], Vector3::zeros());
        assert_eq!(positions[26], Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_corner_has_three_colors() {
        let cubie = CubieFactory::default().build(Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(cubie.sticker(Direction::PosX).color, FaceColor::Red);
        assert_eq!(cubie.sticker(Direction::PosY).color, FaceColor::Yellow);
        assert_eq!(cubie.sticker(Direction::PosZ).color, FaceColor::Blue);
        assert_eq!(cubie.sticker(Direction::NegX).color, FaceColor::Neutral);
        assert_eq!(cubie.sticker(Direction::NegY).color, FaceColor::Neutral);
        assert_eq!(cubie.sticker(Direction::NegZ).color, FaceColor::Neutral);
    }

    #[test]
    fn test_core_is_all_neutral() {
        let cubie = CubieFactory::default().build(Vector3::zeros());
        assert!(cubie.stickers.iter().all(|s| s.color == FaceColor::Neutral));
    }

    #[test]
    fn test_even_order_outer_layer() {
        let factory = CubieFactory::new(2, CubieMetrics::default());
        let cubie = factory.build(Vector3::new(-0.5, 0.5, -0.5));
        assert_eq!(cubie.sticker(Direction::NegX).color, FaceColor::Orange);
        assert_eq!(cubie.sticker(Direction::PosY).color, FaceColor::Yellow);
        assert_eq!(cubie.sticker(Direction::NegZ).color, FaceColor::Green);
    }

    #[test]
    fn test_stickers_face_outward() {
        let metrics = CubieMetrics::default();
        let cubie = CubieFactory::default().build(Vector3::new(1.0, 0.0, -1.0));
        for sticker in &cubie.stickers {
            let normal = sticker.rotation.rotate_vector(Vector3::z());
            assert!((normal - sticker.direction.vector()).norm() < 1e-5);
            assert!((sticker.offset.norm() - metrics.sticker_offset()).abs() < 1e-6);
            assert!(sticker.double_sided);
        }
    }

    #[test]
    fn test_build_is_pure() {
        let factory = CubieFactory::default();
        let a = factory.build(Vector3::new(0.0, 1.0, 0.0));
        let b = factory.build(Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(a.stickers, b.stickers);
        assert_eq!(a.placement, Placement::at(Vector3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_local_mesh_triangle_count() {
        let cubie = CubieFactory::default().build(Vector3::zeros());
        // body + six sticker plates, twelve triangles each
        assert_eq!(cubie.local_mesh().triangles.len(), 12 * 7);
    }
}
