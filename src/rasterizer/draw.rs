//! Line and grid helpers for 3D overlays

use super::camera::Camera;
use super::math::Vec3;
use super::render::Framebuffer;
use super::types::Color;

/// Draw a depth-tested 3D line, clipped against the near plane
pub fn draw_3d_line_clipped(fb: &mut Framebuffer, camera: &Camera, p0: Vec3, p1: Vec3, color: Color) {
    let c0 = camera.to_camera_space(p0);
    let c1 = camera.to_camera_space(p1);
    let near = camera.near;

    // Both behind camera - skip entirely
    if c0.z <= near && c1.z <= near {
        return;
    }

    let (c0, c1) = if c0.z <= near {
        let t = (near - c0.z) / (c1.z - c0.z);
        (c0.lerp(c1, t), c1)
    } else if c1.z <= near {
        let t = (near - c0.z) / (c1.z - c0.z);
        (c0, c0.lerp(c1, t))
    } else {
        (c0, c1)
    };

    let s0 = camera.project_camera_space(c0, fb.width, fb.height);
    let s1 = camera.project_camera_space(c1, fb.width, fb.height);
    if let (Some(a), Some(b)) = (s0, s1) {
        // Keep coordinates in a range Bresenham can walk
        const LIMIT: f32 = 16384.0;
        let clamp = |v: f32| v.clamp(-LIMIT, LIMIT) as i32;
        fb.draw_line_3d(clamp(a.x), clamp(a.y), a.z, clamp(b.x), clamp(b.y), b.z, color);
    }
}

/// Draw a square grid on the y = `y` plane, `extent` wide, with `divisions`
/// cells per side. The two center lines use `center_color`.
pub fn draw_floor_grid(
    fb: &mut Framebuffer,
    camera: &Camera,
    y: f32,
    extent: f32,
    divisions: usize,
    grid_color: Color,
    center_color: Color,
) {
    if divisions == 0 {
        return;
    }
    let half = extent * 0.5;
    let spacing = extent / divisions as f32;

    for i in 0..=divisions {
        let offset = -half + i as f32 * spacing;
        let color = if i * 2 == divisions { center_color } else { grid_color };

        // Short segments clip better against the near plane
        for j in 0..divisions {
            let a = -half + j as f32 * spacing;
            let b = a + spacing;
            draw_3d_line_clipped(fb, camera, Vec3::new(a, y, offset), Vec3::new(b, y, offset), color);
            draw_3d_line_clipped(fb, camera, Vec3::new(offset, y, a), Vec3::new(offset, y, b), color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_behind_camera_is_skipped() {
        let mut fb = Framebuffer::new(16, 16);
        fb.clear(Color::WHITE);
        let camera = Camera::look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        draw_3d_line_clipped(&mut fb, &camera, Vec3::new(-5.0, 0.0, 20.0), Vec3::new(5.0, 0.0, 20.0), Color::BLACK);
        assert!(fb.pixels.chunks_exact(4).all(|p| p[0] == 255));
    }

    #[test]
    fn test_grid_draws_center_line() {
        let mut fb = Framebuffer::new(64, 64);
        fb.clear(Color::WHITE);
        let camera = Camera::look_at(Vec3::new(0.0, 300.0, 300.0), Vec3::ZERO);
        let center = Color::new(0x88, 0x88, 0x88);
        draw_floor_grid(&mut fb, &camera, 0.0, 2000.0, 20, Color::new(0x44, 0x44, 0x44), center);
        // The x = 0 center line passes through the middle column
        assert_eq!(fb.get_pixel(32, 32), Some(center));
    }
}
