/// Geometry primitives for cubie meshes
use nalgebra::{Matrix4, Point3, Vector3};

/// Material color of a triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceColor {
    Red,
    Orange,
    Yellow,
    White,
    Blue,
    Green,
    /// Cubie body
    Black,
    /// Sticker on a face that starts out inside the puzzle
    Neutral,
}

impl FaceColor {
    /// sRGB value used by the renderers
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            FaceColor::Red => (0xff, 0x00, 0x00),
            FaceColor::Orange => (0xff, 0x8c, 0x00),
            FaceColor::Yellow => (0xff, 0xff, 0x33),
            FaceColor::White => (0xff, 0xff, 0xff),
            FaceColor::Blue => (0x00, 0x00, 0xff),
            FaceColor::Green => (0x00, 0x80, 0x00),
            FaceColor::Black => (0x00, 0x00, 0x00),
            FaceColor::Neutral => (0x40, 0x40, 0x40),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FaceColor::Red => "red",
            FaceColor::Orange => "orange",
            FaceColor::Yellow => "yellow",
            FaceColor::White => "white",
            FaceColor::Blue => "blue",
            FaceColor::Green => "green",
            FaceColor::Black => "black",
            FaceColor::Neutral => "neutral",
        }
    }
}

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }
}

/// A colored triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
    pub color: FaceColor,
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex, color: FaceColor) -> Self {
        Self {
            vertices: [v0, v1, v2],
            color,
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn extend(&mut self, other: Mesh) {
        self.triangles.extend(other.triangles);
    }

    /// Axis-aligned box centered on the origin, wound counter-clockwise from outside
    pub fn cuboid(extent: Vector3<f32>, color: FaceColor) -> Self {
        let (hx, hy, hz) = (extent.x / 2.0, extent.y / 2.0, extent.z / 2.0);
        let mut mesh = Self::with_capacity(12);

        // (normal, four corners in counter-clockwise order seen from outside)
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            ([1.0, 0.0, 0.0], [[hx, -hy, -hz], [hx, hy, -hz], [hx, hy, hz], [hx, -hy, hz]]),
            ([-1.0, 0.0, 0.0], [[-hx, -hy, -hz], [-hx, -hy, hz], [-hx, hy, hz], [-hx, hy, -hz]]),
            ([0.0, 1.0, 0.0], [[-hx, hy, -hz], [-hx, hy, hz], [hx, hy, hz], [hx, hy, -hz]]),
            ([0.0, -1.0, 0.0], [[-hx, -hy, -hz], [hx, -hy, -hz], [hx, -hy, hz], [-hx, -hy, hz]]),
            ([0.0, 0.0, 1.0], [[-hx, -hy, hz], [hx, -hy, hz], [hx, hy, hz], [-hx, hy, hz]]),
            ([0.0, 0.0, -1.0], [[-hx, -hy, -hz], [-hx, hy, -hz], [hx, hy, -hz], [hx, -hy, -hz]]),
        ];

        for ([nx, ny, nz], corners) in faces {
            let v = corners.map(|[x, y, z]| Vertex::new(x, y, z, nx, ny, nz));
            mesh.add_triangle(Triangle::new(v[0], v[1], v[2], color));
            mesh.add_triangle(Triangle::new(v[0], v[2], v[3], color));
        }

        mesh
    }

    /// Create a cube mesh of edge length `size`
    pub fn cube(size: f32, color: FaceColor) -> Self {
        Self::cuboid(Vector3::new(size, size, size), color)
    }

    /// Copy of this mesh with every vertex moved by `matrix`
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Self {
        let triangles = self
            .triangles
            .iter()
            .map(|triangle| Triangle {
                vertices: triangle.vertices.map(|vertex| Vertex {
                    position: matrix.transform_point(&vertex.position),
                    normal: matrix.transform_vector(&vertex.normal).normalize(),
                }),
                color: triangle.color,
            })
            .collect();
        Self { triangles }
    }
}
