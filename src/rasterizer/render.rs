//! Framebuffer and triangle rasterization

use super::camera::Camera;
use super::math::{Vec2, Vec3};
use super::types::{Color, Face, Material, RasterSettings, Vertex};

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>,   // RGBA, 4 bytes per pixel
    pub zbuffer: Vec<f32>, // Depth buffer
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![f32::MAX; width * height],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; width * height * 4];
            self.zbuffer = vec![f32::MAX; width * height];
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        self.zbuffer.fill(f32::MAX);
    }

    #[cfg(test)]
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        Some(Color::new(self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]))
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    fn set_pixel_safe(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    /// Set a pixel with alpha blending (0 = transparent, 255 = opaque)
    #[inline]
    pub fn set_pixel_alpha(&mut self, x: usize, y: usize, color: Color, alpha: u8) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;

            let back_r = self.pixels[idx];
            let back_g = self.pixels[idx + 1];
            let back_b = self.pixels[idx + 2];

            // Alpha blend: result = front * alpha + back * (1 - alpha)
            let a = alpha as u16;
            let inv_a = 255 - a;
            self.pixels[idx] = ((color.r as u16 * a + back_r as u16 * inv_a) / 255) as u8;
            self.pixels[idx + 1] = ((color.g as u16 * a + back_g as u16 * inv_a) / 255) as u8;
            self.pixels[idx + 2] = ((color.b as u16 * a + back_b as u16 * inv_a) / 255) as u8;
            self.pixels[idx + 3] = 255;
        }
    }

    /// Draw a filled circle at (cx, cy) with given radius and color
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        let r_sq = radius * radius;
        for y in (cy - radius).max(0)..=(cy + radius).min(self.height as i32 - 1) {
            for x in (cx - radius).max(0)..=(cx + radius).min(self.width as i32 - 1) {
                let dx = x - cx;
                let dy = y - cy;
                if dx * dx + dy * dy <= r_sq {
                    self.set_pixel(x as usize, y as usize, color);
                }
            }
        }
    }

    /// Draw a line from (x0, y0) to (x1, y1) using Bresenham's algorithm
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        self.bresenham(x0, y0, x1, y1, |fb, x, y| fb.set_pixel_safe(x, y, color));
    }

    fn bresenham(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, mut plot: impl FnMut(&mut Self, i32, i32)) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            plot(self, x, y);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw a line with depth testing; co-planar surfaces let it through
    pub fn draw_line_3d(&mut self, x0: i32, y0: i32, z0: f32, x1: i32, y1: i32, z1: f32, color: Color) {
        let total_steps = (x1 - x0).abs().max((y1 - y0).abs()).max(1) as f32;
        let mut step = 0.0f32;
        self.bresenham(x0, y0, x1, y1, |fb, x, y| {
            if x >= 0 && x < fb.width as i32 && y >= 0 && y < fb.height as i32 {
                let z = z0 + (step / total_steps).min(1.0) * (z1 - z0);
                let idx = y as usize * fb.width + x as usize;
                if z <= fb.zbuffer[idx] {
                    fb.set_pixel(x as usize, y as usize, color);
                }
            }
            step += 1.0;
        });
    }

    /// Draw a thick line as a filled quad
    pub fn draw_thick_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, thickness: f32, color: Color) {
        if thickness <= 1.0 {
            self.draw_line(x0.round() as i32, y0.round() as i32, x1.round() as i32, y1.round() as i32, color);
            return;
        }

        let dx = x1 - x0;
        let dy = y1 - y0;
        let len = (dx * dx + dy * dy).sqrt();
        if len < 0.001 {
            return;
        }

        let half = thickness * 0.5;
        let px = -dy / len * half;
        let py = dx / len * half;
        // Extend along the line so joined segments meet at corners
        let ex = dx / len * half;
        let ey = dy / len * half;

        let corners = [
            (x0 - ex + px, y0 - ey + py),
            (x0 - ex - px, y0 - ey - py),
            (x1 + ex - px, y1 + ey - py),
            (x1 + ex + px, y1 + ey + py),
        ];
        self.fill_polygon(&corners, color);
    }

    /// Fill a polygon using the even-odd rule, sampling pixel centers
    pub fn fill_polygon(&mut self, points: &[(f32, f32)], color: Color) {
        self.scan_polygon(points, |fb, x, y| fb.set_pixel(x, y, color));
    }

    /// Outline a closed polygon
    pub fn stroke_polygon(&mut self, points: &[(f32, f32)], thickness: f32, color: Color) {
        for (i, &(x0, y0)) in points.iter().enumerate() {
            let (x1, y1) = points[(i + 1) % points.len()];
            self.draw_thick_line(x0, y0, x1, y1, thickness, color);
        }
    }

    fn scan_polygon(&mut self, points: &[(f32, f32)], mut plot: impl FnMut(&mut Self, usize, usize)) {
        if points.len() < 3 || self.is_empty() {
            return;
        }
        let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        if !min_y.is_finite() || !max_y.is_finite() {
            return;
        }
        let y_start = (min_y - 0.5).ceil().max(0.0) as usize;
        let y_end = ((max_y - 0.5).ceil().max(0.0) as usize).min(self.height);

        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for y in y_start..y_end {
            let cy = y as f32 + 0.5;
            crossings.clear();
            for (i, &(ax, ay)) in points.iter().enumerate() {
                let (bx, by) = points[(i + 1) % points.len()];
                // Half-open rule so shared vertices count once
                if (ay <= cy && by > cy) || (by <= cy && ay > cy) {
                    crossings.push(ax + (cy - ay) / (by - ay) * (bx - ax));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            for span in crossings.chunks_exact(2) {
                let x_start = (span[0] - 0.5).ceil().max(0.0) as usize;
                let x_end = ((span[1] - 0.5).ceil().max(0.0) as usize).min(self.width);
                for x in x_start..x_end {
                    plot(self, x, y);
                }
            }
        }
    }
}

/// Vertex after the camera transform, before projection
#[derive(Debug, Clone, Copy)]
struct ClipVertex {
    pos: Vec3,
    uv: Vec2,
}

/// Sutherland-Hodgman against the near plane
fn clip_to_near(input: &[ClipVertex; 3], near: f32) -> Vec<ClipVertex> {
    let mut out = Vec::with_capacity(4);
    for i in 0..3 {
        let a = input[i];
        let b = input[(i + 1) % 3];
        let a_in = a.pos.z >= near;
        let b_in = b.pos.z >= near;
        if a_in {
            out.push(a);
        }
        if a_in != b_in {
            let t = (near - a.pos.z) / (b.pos.z - a.pos.z);
            let mut pos = a.pos.lerp(b.pos, t);
            // Rounding in lerp can land just in front of the plane
            pos.z = near;
            out.push(ClipVertex {
                pos,
                uv: a.uv.lerp(b.uv, t),
            });
        }
    }
    out
}

/// Flat lighting for one face: (diffuse multiplier, specular white)
fn shade_face(normal: Vec3, to_eye: Vec3, material: &Material, settings: &RasterSettings) -> (f32, f32) {
    if material.unlit {
        return (1.0, 0.0);
    }
    let gloss = 1.0 - material.roughness;
    let shininess = 8.0 + 56.0 * gloss;
    let mut diffuse = settings.ambient;
    let mut specular = 0.0;
    for light in &settings.lights {
        let to_light = -light.direction;
        let ndl = normal.dot(to_light).max(0.0);
        diffuse += light.intensity * ndl * (1.0 - 0.5 * material.metalness);
        if ndl > 0.0 {
            let half = (to_light + to_eye).normalize();
            let ndh = normal.dot(half).max(0.0);
            specular += light.intensity * gloss * gloss * (0.3 + 0.7 * material.metalness) * ndh.powf(shininess);
        }
    }
    (diffuse, specular)
}

/// Render world-space triangles with depth testing and flat lighting
pub fn render_mesh(
    fb: &mut Framebuffer,
    camera: &Camera,
    vertices: &[Vertex],
    faces: &[Face],
    material: &Material,
    settings: &RasterSettings,
) {
    if fb.is_empty() {
        return;
    }

    for face in faces {
        let (Some(a), Some(b), Some(c)) = (vertices.get(face.v0), vertices.get(face.v1), vertices.get(face.v2)) else {
            continue;
        };

        let mut normal = (b.pos - a.pos).cross(c.pos - a.pos).normalize();
        if normal == Vec3::ZERO {
            continue;
        }
        let to_eye = (camera.position - a.pos).normalize();
        if normal.dot(to_eye) < 0.0 {
            if !material.double_sided {
                continue;
            }
            normal = -normal;
        }
        let (diffuse, specular) = shade_face(normal, to_eye, material, settings);

        let clip_in = [
            ClipVertex { pos: camera.to_camera_space(a.pos), uv: a.uv },
            ClipVertex { pos: camera.to_camera_space(b.pos), uv: b.uv },
            ClipVertex { pos: camera.to_camera_space(c.pos), uv: c.uv },
        ];
        if clip_in.iter().all(|v| v.pos.z > camera.far) {
            continue;
        }
        let clipped = clip_to_near(&clip_in, camera.near);
        if clipped.len() < 3 {
            continue;
        }

        let projected: Vec<(Vec3, Vec2)> = clipped
            .iter()
            .filter_map(|v| {
                camera
                    .project_camera_space(v.pos, fb.width, fb.height)
                    .map(|s| (s, v.uv))
            })
            .collect();
        if projected.len() < 3 {
            continue;
        }

        for i in 1..projected.len() - 1 {
            rasterize_triangle(
                fb,
                [projected[0], projected[i], projected[i + 1]],
                material,
                diffuse,
                specular,
            );
        }
    }
}

/// Perspective-correct scan conversion of one projected triangle
fn rasterize_triangle(
    fb: &mut Framebuffer,
    verts: [(Vec3, Vec2); 3],
    material: &Material,
    diffuse: f32,
    specular: f32,
) {
    let [(v1, uv1), (v2, uv2), (v3, uv3)] = verts;

    let min_x = v1.x.min(v2.x).min(v3.x).max(0.0) as usize;
    let max_x = (v1.x.max(v2.x).max(v3.x) + 1.0).min(fb.width as f32).max(0.0) as usize;
    let min_y = v1.y.min(v2.y).min(v3.y).max(0.0) as usize;
    let max_y = (v1.y.max(v2.y).max(v3.y) + 1.0).min(fb.height as f32).max(0.0) as usize;
    if min_x >= max_x || min_y >= max_y {
        return;
    }

    let area = (v2.y - v3.y) * (v1.x - v3.x) + (v3.x - v2.x) * (v1.y - v3.y);
    if area.abs() < 0.00001 {
        return; // Degenerate triangle
    }
    let inv_area = 1.0 / area;

    let inv_z = [1.0 / v1.z, 1.0 / v2.z, 1.0 / v3.z];
    let alpha = (material.opacity * 255.0).round() as u8;
    let opaque = alpha == 255;
    let flat = if material.texture.is_none() {
        Some(material.color.shade(diffuse).add_white(specular))
    } else {
        None
    };

    for y in min_y..max_y {
        let py = y as f32 + 0.5;
        for x in min_x..max_x {
            let px = x as f32 + 0.5;

            let w1 = ((v2.y - v3.y) * (px - v3.x) + (v3.x - v2.x) * (py - v3.y)) * inv_area;
            let w2 = ((v3.y - v1.y) * (px - v3.x) + (v1.x - v3.x) * (py - v3.y)) * inv_area;
            let w3 = 1.0 - w1 - w2;

            const ERR: f32 = -0.0001;
            if w1 < ERR || w2 < ERR || w3 < ERR {
                continue;
            }

            // 1/z interpolates linearly in screen space
            let iz = w1 * inv_z[0] + w2 * inv_z[1] + w3 * inv_z[2];
            if iz <= 0.0 {
                continue;
            }
            let z = 1.0 / iz;
            let idx = y * fb.width + x;
            if z >= fb.zbuffer[idx] {
                continue;
            }

            let color = match (&flat, &material.texture) {
                (Some(c), _) => *c,
                (None, Some(tex)) => {
                    let u = (w1 * uv1.x * inv_z[0] + w2 * uv2.x * inv_z[1] + w3 * uv3.x * inv_z[2]) * z;
                    let v = (w1 * uv1.y * inv_z[0] + w2 * uv2.y * inv_z[1] + w3 * uv3.y * inv_z[2]) * z;
                    tex.sample(u, v).modulate(material.color).shade(diffuse).add_white(specular)
                }
                (None, None) => material.color,
            };

            if opaque {
                fb.zbuffer[idx] = z;
                fb.set_pixel(x, y, color);
            } else {
                fb.set_pixel_alpha(x, y, color, alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_polygon_square() {
        let mut fb = Framebuffer::new(10, 10);
        fb.clear(Color::WHITE);
        fb.fill_polygon(&[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)], Color::BLACK);
        assert_eq!(fb.get_pixel(2, 2), Some(Color::BLACK));
        assert_eq!(fb.get_pixel(5, 5), Some(Color::BLACK));
        assert_eq!(fb.get_pixel(6, 6), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(1, 3), Some(Color::WHITE));
    }

    #[test]
    fn test_fill_concave_polygon_leaves_notch() {
        let mut fb = Framebuffer::new(20, 20);
        fb.clear(Color::WHITE);
        // L shape with the notch in the lower right
        let l = [(0.0, 0.0), (20.0, 0.0), (20.0, 12.0), (8.0, 12.0), (8.0, 20.0), (0.0, 20.0)];
        fb.fill_polygon(&l, Color::BLACK);
        assert_eq!(fb.get_pixel(15, 5), Some(Color::BLACK));
        assert_eq!(fb.get_pixel(3, 18), Some(Color::BLACK));
        assert_eq!(fb.get_pixel(15, 16), Some(Color::WHITE));
    }

    #[test]
    fn test_alpha_blend() {
        let mut fb = Framebuffer::new(1, 1);
        fb.clear(Color::WHITE);
        fb.set_pixel_alpha(0, 0, Color::BLACK, 128);
        let c = fb.get_pixel(0, 0).unwrap();
        assert!(c.r > 120 && c.r < 135);
    }

    #[test]
    fn test_render_mesh_depth_order() {
        let mut fb = Framebuffer::new(64, 64);
        fb.clear(Color::WHITE);
        let camera = Camera::look_at(Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO);
        let settings = RasterSettings::default();

        let quad = |z: f32| {
            vec![
                Vertex::new(Vec3::new(-50.0, -50.0, z), Vec2::default(), Vec3::ZERO),
                Vertex::new(Vec3::new(50.0, -50.0, z), Vec2::default(), Vec3::ZERO),
                Vertex::new(Vec3::new(50.0, 50.0, z), Vec2::default(), Vec3::ZERO),
                Vertex::new(Vec3::new(-50.0, 50.0, z), Vec2::default(), Vec3::ZERO),
            ]
        };
        let faces = [Face::new(0, 1, 2), Face::new(0, 2, 3)];
        let near = Material::basic(Color::new(255, 0, 0), 1.0);
        let far = Material::basic(Color::new(0, 0, 255), 1.0);

        // Draw the near quad first; the far one must not overwrite it
        render_mesh(&mut fb, &camera, &quad(10.0), &faces, &near, &settings);
        render_mesh(&mut fb, &camera, &quad(-10.0), &faces, &far, &settings);
        assert_eq!(fb.get_pixel(32, 32), Some(Color::new(255, 0, 0)));
    }

    #[test]
    fn test_render_mesh_culls_back_faces() {
        let mut fb = Framebuffer::new(32, 32);
        fb.clear(Color::WHITE);
        let camera = Camera::look_at(Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO);
        // Clockwise as seen from the camera
        let verts = [
            Vertex::new(Vec3::new(-50.0, -50.0, 0.0), Vec2::default(), Vec3::ZERO),
            Vertex::new(Vec3::new(0.0, 50.0, 0.0), Vec2::default(), Vec3::ZERO),
            Vertex::new(Vec3::new(50.0, -50.0, 0.0), Vec2::default(), Vec3::ZERO),
        ];
        let mut material = Material::standard(Color::BLACK, 0.5, 0.0);
        render_mesh(&mut fb, &camera, &verts, &[Face::new(0, 1, 2)], &material, &RasterSettings::default());
        assert_eq!(fb.get_pixel(16, 16), Some(Color::WHITE));

        material.double_sided = true;
        render_mesh(&mut fb, &camera, &verts, &[Face::new(0, 1, 2)], &material, &RasterSettings::default());
        assert_ne!(fb.get_pixel(16, 16), Some(Color::WHITE));
    }

    #[test]
    fn test_near_clip_vertices_stay_projectable() {
        let camera = Camera::look_at(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, 10.0, -1.0));
        let tri = [
            ClipVertex { pos: Vec3::new(-3.7, 1.3, -0.9), uv: Vec2::default() },
            ClipVertex { pos: Vec3::new(2.1, -4.4, 500.0), uv: Vec2::default() },
            ClipVertex { pos: Vec3::new(7.3, 0.6, -13.1), uv: Vec2::default() },
        ];
        let clipped = clip_to_near(&tri, camera.near);
        assert_eq!(clipped.len(), 3);
        for v in &clipped {
            assert!(v.pos.z >= camera.near);
            assert!(camera.project_camera_space(v.pos, 64, 64).is_some());
        }
    }

    #[test]
    fn test_triangle_crossing_near_plane_is_clipped() {
        let mut fb = Framebuffer::new(32, 32);
        fb.clear(Color::WHITE);
        let camera = Camera::look_at(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, 10.0, -1.0));
        // Floor triangle running from behind the eye to far ahead
        let verts = [
            Vertex::new(Vec3::new(-100.0, 0.0, 50.0), Vec2::default(), Vec3::ZERO),
            Vertex::new(Vec3::new(100.0, 0.0, 50.0), Vec2::default(), Vec3::ZERO),
            Vertex::new(Vec3::new(0.0, 0.0, -500.0), Vec2::default(), Vec3::ZERO),
        ];
        let material = Material::basic(Color::BLACK, 1.0);
        render_mesh(&mut fb, &camera, &verts, &[Face::new(0, 1, 2)], &material, &RasterSettings::default());
        // Lower half of the screen sees the floor, upper half does not
        assert_eq!(fb.get_pixel(16, 28), Some(Color::BLACK));
        assert_eq!(fb.get_pixel(16, 4), Some(Color::WHITE));
    }
}
