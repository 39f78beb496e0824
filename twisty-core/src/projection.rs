/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

use crate::transform::RotationState;

/// Camera orbiting the puzzle's center
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Orbit distance that frames a 3x3x3 puzzle
    pub const DEFAULT_RADIUS: f32 = 5.2;

    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            position: Point3::new(3.0, 3.0, 3.0),
            target: Point3::origin(),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::PI / 3.0,
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 1000.0,
        };
        camera.orbit(&RotationState::default(), Self::DEFAULT_RADIUS);
        camera
    }

    /// Place the camera on the orbit sphere, looking at the target
    pub fn orbit(&mut self, rotation: &RotationState, radius: f32) {
        self.position = self.target + rotation.eye(radius);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the perspective projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world-space point to screen space as `(x, y, depth)`.
    /// Returns `None` for points outside the view volume.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        view_projection: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        // transform_point performs the perspective divide
        let ndc = view_projection.transform_point(point);

        if !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
