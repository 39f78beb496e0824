/// Colored ASCII rasterizer for the puzzle's cubies
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Vector3};
use std::io::Write;
use twisty_core::{Camera, FaceColor, Mesh, Triangle};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Shading never drops below this, so faces seen edge-on keep their color
const AMBIENT: f32 = 0.35;

/// One character cell of the frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub glyph: char,
    pub color: Option<Color>,
}

impl Cell {
    const EMPTY: Cell = Cell {
        glyph: ' ',
        color: None,
    };
}

/// ASCII renderer that converts cubie meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![Cell::EMPTY; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(Cell::EMPTY);
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    /// Rasterize a world-space mesh. Every triangle is drawn regardless of
    /// winding; the depth buffer sorts out what is visible.
    pub fn render_mesh(&mut self, mesh: &Mesh, camera: &Camera) {
        let view_projection = camera.view_projection();
        let to_eye = (camera.position - camera.target).normalize();
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, &view_projection, &to_eye, camera);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        view_projection: &Matrix4<f32>,
        to_eye: &Vector3<f32>,
        camera: &Camera,
    ) {
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match camera.project_to_screen(
                &vertex.position,
                view_projection,
                self.width as u32,
                self.height as u32,
            ) {
                Some(coords) => *slot = coords,
                None => return,
            }
        }

        // Stickers are double-sided, so light both faces alike
        let brightness = triangle.calculate_normal().dot(to_eye).abs();
        let cell = shade(triangle.color, brightness);

        self.rasterize_triangle(&screen_coords, cell);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], cell: Cell) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box, clipped to the screen
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), p)
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.cells[idx] = cell;
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (y, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            let mut current = None;
            for cell in row {
                if cell.color != current {
                    match cell.color {
                        Some(color) => writer.queue(SetForegroundColor(color))?,
                        None => writer.queue(ResetColor)?,
                    };
                    current = cell.color;
                }
                writer.queue(Print(cell.glyph))?;
            }
            writer.queue(ResetColor)?;
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        Ok(())
    }
}

/// Pick glyph and color for a face lit at `brightness` in `[0, 1]`
fn shade(color: FaceColor, brightness: f32) -> Cell {
    let light = AMBIENT + (1.0 - AMBIENT) * brightness.clamp(0.0, 1.0);
    let glyph_index = ((light * (LUMINOSITY_RAMP.len() - 1) as f32) as usize)
        .min(LUMINOSITY_RAMP.len() - 1);

    let (r, g, b) = match color {
        // The body would vanish on a dark terminal
        FaceColor::Black => (0x30, 0x30, 0x30),
        other => other.rgb(),
    };
    let scale = |c: u8| (c as f32 * light).round() as u8;

    Cell {
        glyph: LUMINOSITY_RAMP[glyph_index],
        color: Some(Color::Rgb {
            r: scale(r),
            g: scale(g),
            b: scale(b),
        }),
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use twisty_core::{CubieFactory, Placement};

    #[test]
    fn test_barycentric_inside_and_outside() {
        let (a, b, c) = ((0.0, 0.0), (4.0, 0.0), (0.0, 4.0));
        let (w0, w1, w2) = barycentric(a, b, c, (1.0, 1.0)).unwrap();
        assert!(w0 > 0.0 && w1 > 0.0 && w2 > 0.0);
        assert!((w0 + w1 + w2 - 1.0).abs() < 1e-6);

        let (_, w1, w2) = barycentric(a, b, c, (5.0, 5.0)).unwrap();
        assert!(w1 < 0.0 || w2 < 0.0 || w1 + w2 > 1.0);
        assert!(barycentric(a, a, a, (0.0, 0.0)).is_none());
    }

    #[test]
    fn test_shade_keeps_hue() {
        let lit = shade(FaceColor::Red, 1.0);
        assert_eq!(lit.color, Some(Color::Rgb { r: 255, g: 0, b: 0 }));
        assert_eq!(lit.glyph, '@');

        let dim = shade(FaceColor::Red, 0.0);
        assert!(matches!(dim.color, Some(Color::Rgb { r, g: 0, b: 0 }) if r < 255 && r > 0));
    }

    #[test]
    fn test_center_cubie_covers_screen_center() {
        let factory = CubieFactory::default();
        let mut cubie = factory.build(Vector3::new(1.0, 1.0, 1.0));
        cubie.placement = Placement::at(Vector3::zeros());

        let camera = Camera::new(40, 20);
        let mut renderer = AsciiRenderer::new(40, 20);
        renderer.render_mesh(&cubie.world_mesh(), &camera);

        assert_ne!(renderer.cell(20, 10), Some(Cell::EMPTY));
        assert_eq!(renderer.cell(0, 0), Some(Cell::EMPTY));
        assert_eq!(renderer.cell(40, 0), None);

        renderer.clear();
        assert_eq!(renderer.cell(20, 10), Some(Cell::EMPTY));
    }

    #[test]
    fn test_nearer_sticker_wins() {
        // corner cubie facing the default camera shows its stickers, not its body
        let factory = CubieFactory::default();
        let cubie = factory.build(Vector3::new(1.0, 1.0, 1.0));
        let camera = Camera::new(80, 40);
        let mut renderer = AsciiRenderer::new(80, 40);
        renderer.render_mesh(&cubie.world_mesh(), &camera);

        let colored = renderer
            .cells
            .iter()
            .filter_map(|cell| cell.color)
            .filter(|color| {
                matches!(color, Color::Rgb { r, g, b } if (*r, *g, *b) != (0, 0, 0) && r != g)
            })
            .count();
        assert!(colored > 0);
    }

    #[test]
    fn test_draw_writes_every_row() {
        let renderer = AsciiRenderer::new(3, 2);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("\r\n").count(), 1);
    }
}
