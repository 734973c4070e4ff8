//! Perspective camera and orbit controller
//!
//! Camera space: +X right, +Y down (screen rows), +Z forward.

use super::math::Vec3;
use std::f32::consts::FRAC_PI_2;

/// Camera state for 3D rendering
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,

    // Computed basis vectors
    pub basis_x: Vec3,
    pub basis_y: Vec3,
    pub basis_z: Vec3,
}

impl Camera {
    pub const DEFAULT_FOV: f32 = 75.0;
    pub const DEFAULT_NEAR: f32 = 0.1;
    pub const DEFAULT_FAR: f32 = 2000.0;

    /// Camera at `position` looking at `target`
    pub fn look_at(position: Vec3, target: Vec3) -> Self {
        let mut cam = Self {
            position,
            fov_y_deg: Self::DEFAULT_FOV,
            near: Self::DEFAULT_NEAR,
            far: Self::DEFAULT_FAR,
            basis_x: Vec3::new(1.0, 0.0, 0.0),
            basis_y: Vec3::new(0.0, -1.0, 0.0),
            basis_z: Vec3::new(0.0, 0.0, -1.0),
        };
        cam.aim(target);
        cam
    }

    pub fn aim(&mut self, target: Vec3) {
        let forward = (target - self.position).normalize();
        if forward == Vec3::ZERO {
            return;
        }
        let mut right = forward.cross(Vec3::UP).normalize();
        // Looking straight up or down
        if right == Vec3::ZERO {
            right = Vec3::new(1.0, 0.0, 0.0);
        }
        self.basis_z = forward;
        self.basis_x = right;
        self.basis_y = forward.cross(right);
    }

    /// Focal length in pixels for a viewport of `height` rows
    pub fn focal_length(&self, height: usize) -> f32 {
        (height as f32 * 0.5) / (self.fov_y_deg.to_radians() * 0.5).tan()
    }

    /// World point into camera space
    pub fn to_camera_space(&self, p: Vec3) -> Vec3 {
        let rel = p - self.position;
        Vec3::new(rel.dot(self.basis_x), rel.dot(self.basis_y), rel.dot(self.basis_z))
    }

    /// Camera-space point to screen (x, y, depth). None behind the near plane.
    pub fn project_camera_space(&self, c: Vec3, width: usize, height: usize) -> Option<Vec3> {
        if c.z < self.near {
            return None;
        }
        let f = self.focal_length(height);
        Some(Vec3::new(
            width as f32 * 0.5 + c.x * f / c.z,
            height as f32 * 0.5 + c.y * f / c.z,
            c.z,
        ))
    }

    #[cfg(test)]
    pub fn world_to_screen(&self, p: Vec3, width: usize, height: usize) -> Option<Vec3> {
        self.project_camera_space(self.to_camera_space(p), width, height)
    }
}

/// Orbit controller around a target point
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    pub target: Vec3,
    /// Radians around +Y; 0 places the eye on +Z
    pub yaw: f32,
    /// Radians above the horizon
    pub pitch: f32,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitCamera {
    pub const MIN_DISTANCE: f32 = 100.0;
    pub const MAX_DISTANCE: f32 = 1000.0;
    const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

    pub fn new() -> Self {
        let mut orbit = Self {
            target: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            distance: 0.0,
            min_distance: Self::MIN_DISTANCE,
            max_distance: Self::MAX_DISTANCE,
        };
        orbit.set_position(Vec3::new(0.0, 500.0, 500.0));
        orbit
    }

    /// Place the eye at `position` (clamped to the distance range)
    pub fn set_position(&mut self, position: Vec3) {
        let offset = position - self.target;
        let horizontal = (offset.x * offset.x + offset.z * offset.z).sqrt();
        self.yaw = offset.x.atan2(offset.z);
        self.pitch = offset.y.atan2(horizontal).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        self.distance = offset.len().clamp(self.min_distance, self.max_distance);
    }

    /// Frame a room footprint of `max_size` from the front and above
    pub fn frame_room(&mut self, max_size: f32) {
        self.target = Vec3::ZERO;
        self.set_position(Vec3::new(0.0, max_size * 0.7, max_size * 1.2));
    }

    pub fn position(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vec3::new(sy * cp, sp, cy * cp) * self.distance
    }

    pub fn rotate(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    /// Scale the distance; `factor` < 1 moves closer
    pub fn zoom(&mut self, factor: f32) {
        if factor > 0.0 {
            self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
        }
    }

    pub fn camera(&self) -> Camera {
        Camera::look_at(self.position(), self.target)
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).len() < 1e-2
    }

    #[test]
    fn test_target_projects_to_center() {
        let cam = Camera::look_at(Vec3::new(0.0, 350.0, 600.0), Vec3::ZERO);
        let p = cam.world_to_screen(Vec3::ZERO, 640, 480).unwrap();
        assert!((p.x - 320.0).abs() < 0.01 && (p.y - 240.0).abs() < 0.01);
        // Points above the target land higher on screen
        let up = cam.world_to_screen(Vec3::new(0.0, 50.0, 0.0), 640, 480).unwrap();
        assert!(up.y < 240.0);
        // Behind the camera
        assert!(cam.world_to_screen(Vec3::new(0.0, 400.0, 900.0), 640, 480).is_none());
    }

    #[test]
    fn test_frame_room_positions_eye() {
        let mut orbit = OrbitCamera::new();
        orbit.frame_room(500.0);
        assert!(close(orbit.position(), Vec3::new(0.0, 350.0, 600.0)));
    }

    #[test]
    fn test_distance_is_clamped() {
        let mut orbit = OrbitCamera::new();
        orbit.frame_room(900.0);
        assert!((orbit.distance - OrbitCamera::MAX_DISTANCE).abs() < 1e-3);
        orbit.zoom(0.01);
        assert_eq!(orbit.distance, OrbitCamera::MIN_DISTANCE);
    }

    #[test]
    fn test_pitch_is_limited() {
        let mut orbit = OrbitCamera::new();
        orbit.rotate(0.0, 10.0);
        assert!(orbit.pitch < FRAC_PI_2);
        let cam = orbit.camera();
        assert!(cam.basis_x.len() > 0.99);
    }
}
