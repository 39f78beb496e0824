/// Orientation and placement math, plus the matrix helpers used by renderers
use nalgebra::{Matrix4, Quaternion, Unit, UnitQuaternion, Vector3};

use crate::error::{CubeError, CubeResult};

/// Norms below this are treated as a zero quaternion
const MIN_NORM: f32 = 1e-6;

/// Unit quaternion stored as a plain `(x, y, z, w)` tuple.
///
/// Every value built through [`Orientation::new`] has unit length. `q` and
/// `-q` describe the same rotation, so equality checks go through
/// [`Orientation::approx_eq`], which ignores the sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Orientation {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Normalize `(x, y, z, w)` into a unit quaternion
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Option<Self> {
        let norm = (x * x + y * y + z * z + w * w).sqrt();
        if !norm.is_finite() || norm < MIN_NORM {
            return None;
        }
        Some(Self {
            x: x / norm,
            y: y / norm,
            z: z / norm,
            w: w / norm,
        })
    }

    /// Build from the `[x, y, z, w]` wire layout, tagging failures with the piece index
    pub fn from_array(values: [f32; 4], index: usize) -> CubeResult<Self> {
        let [x, y, z, w] = values;
        Self::new(x, y, z, w).ok_or(CubeError::DegenerateOrientation { index })
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Rotation of `radians` around `axis`
    pub fn from_axis_angle(axis: Vector3<f32>, radians: f32) -> Self {
        let axis = Unit::new_normalize(axis);
        Self::from_unit(UnitQuaternion::from_axis_angle(&axis, radians))
    }

    /// Rotation that turns `from` onto `to`. Opposite vectors turn half way around an
    /// arbitrary perpendicular axis.
    pub fn between(from: Vector3<f32>, to: Vector3<f32>) -> Self {
        match UnitQuaternion::rotation_between(&from, &to) {
            Some(q) => Self::from_unit(q),
            None => {
                let perpendicular = if from.x.abs() < 0.9 {
                    from.cross(&Vector3::x())
                } else {
                    from.cross(&Vector3::y())
                };
                Self::from_axis_angle(perpendicular, std::f32::consts::PI)
            }
        }
    }

    /// Hamilton product `self * rhs`: `rhs` is applied first
    pub fn compose(self, rhs: Self) -> Self {
        let (a, b) = (self, rhs);
        let product = Self {
            x: a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            y: a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            z: a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
            w: a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        };
        // Renormalize to keep drift from accumulating over long move sequences
        Self::new(product.x, product.y, product.z, product.w).unwrap_or(Self::IDENTITY)
    }

    pub fn rotate_vector(self, v: Vector3<f32>) -> Vector3<f32> {
        self.to_unit() * v
    }

    /// Compare rotations within `eps`, treating `q` and `-q` as equal
    pub fn approx_eq(self, other: Self, eps: f32) -> bool {
        let dot = self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w;
        (1.0 - dot.abs()) <= eps
    }

    pub fn to_unit(self) -> UnitQuaternion<f32> {
        UnitQuaternion::new_unchecked(Quaternion::new(self.w, self.x, self.y, self.z))
    }

    fn from_unit(q: UnitQuaternion<f32>) -> Self {
        Self {
            x: q.i,
            y: q.j,
            z: q.k,
            w: q.w,
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Absolute world placement of one cubie
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vector3<f32>,
    pub orientation: Orientation,
}

impl Placement {
    pub fn new(position: Vector3<f32>, orientation: Orientation) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn at(position: Vector3<f32>) -> Self {
        Self::new(position, Orientation::IDENTITY)
    }

    /// Translation after rotation
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Transform::translation_matrix(self.position.x, self.position.y, self.position.z)
            * self.orientation.to_unit().to_homogeneous()
    }

    pub fn approx_eq(&self, other: &Self, eps: f32) -> bool {
        (self.position - other.position).norm() <= eps
            && self.orientation.approx_eq(other.orientation, eps)
    }
}

/// Camera orbit angles around the puzzle (in radians)
#[derive(Debug, Clone, Copy)]
pub struct RotationState {
    pub yaw: f32,
    pub pitch: f32,
}

impl RotationState {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    /// Rotate by delta amounts, keeping the pitch short of the poles
    pub fn rotate(&mut self, dyaw: f32, dpitch: f32) {
        let limit = std::f32::consts::FRAC_PI_2 - 0.05;
        self.yaw = (self.yaw + dyaw) % std::f32::consts::TAU;
        self.pitch = (self.pitch + dpitch).clamp(-limit, limit);
    }

    /// Point on a sphere of `radius` around the origin
    pub fn eye(&self, radius: f32) -> Vector3<f32> {
        Vector3::new(
            radius * self.pitch.cos() * self.yaw.sin(),
            radius * self.pitch.sin(),
            radius * self.pitch.cos() * self.yaw.cos(),
        )
    }
}

impl Default for RotationState {
    fn default() -> Self {
        // Looking down a corner, like the classic (3, 3, 3) camera
        Self::new(std::f32::consts::FRAC_PI_4, 0.6155)
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }
}
