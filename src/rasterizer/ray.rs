//! Ray casting utilities for 3D picking
//!
//! The inverse of `Camera::project_camera_space`.

use super::camera::Camera;
use super::math::{ray_triangle_intersect, Vec3};

/// A 3D ray with origin and direction
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3, // Normalized
}

impl Ray {
    /// Create a new ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn intersect_triangle(&self, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
        ray_triangle_intersect(self.origin, self.direction, v0, v1, v2)
    }
}

/// Ray from the eye through a pixel of a `width` × `height` viewport
pub fn screen_to_ray(screen_x: f32, screen_y: f32, width: usize, height: usize, camera: &Camera) -> Ray {
    let f = camera.focal_length(height);
    let cx = (screen_x - width as f32 * 0.5) / f;
    let cy = (screen_y - height as f32 * 0.5) / f;
    let dir = camera.basis_z + camera.basis_x * cx + camera.basis_y * cy;
    Ray::new(camera.position, dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit_floor(ray: &Ray) -> Option<Vec3> {
        let denom = ray.direction.dot(Vec3::UP);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = -ray.origin.dot(Vec3::UP) / denom;
        (t >= 0.0).then(|| ray.origin + ray.direction * t)
    }

    #[test]
    fn test_ray_inverts_projection() {
        let cam = Camera::look_at(Vec3::new(120.0, 300.0, 500.0), Vec3::new(0.0, 0.0, 0.0));
        let world = Vec3::new(40.0, 0.0, -60.0);
        let screen = cam.world_to_screen(world, 800, 600).unwrap();
        let ray = screen_to_ray(screen.x, screen.y, 800, 600, &cam);
        let hit = hit_floor(&ray).unwrap();
        assert!((hit - world).len() < 0.05);
    }

    #[test]
    fn test_parallel_ray_misses_floor() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(hit_floor(&ray).is_none());
        let away = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::UP);
        assert!(hit_floor(&away).is_none());
    }
}
