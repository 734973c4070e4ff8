//! Software rasterizer shared by the plan and 3D views
//!
//! Both views draw into an RGBA `Framebuffer` that the app uploads as a
//! texture each frame.
//!
//! # Module Organization
//!
//! - `types` - Color, Texture, Vertex, Face, Material, Light, RasterSettings
//! - `math` - Vec3, Vec2, Aabb, 4x4 transforms, ray/triangle test
//! - `camera` - perspective Camera and OrbitCamera
//! - `render` - Framebuffer, 2D fills and z-buffered mesh rendering
//! - `draw` - 3D line and floor grid overlays
//! - `ray` - screen-to-world rays for picking

pub mod camera;
pub mod draw;
pub mod math;
pub mod ray;
pub mod render;
pub mod types;

pub use camera::{Camera, OrbitCamera};
pub use draw::draw_floor_grid;
pub use math::{mat4_identity, mat4_mul, mat4_transform_dir, mat4_transform_point, mat4_trs, Aabb, Mat4, Vec2, Vec3};
pub use ray::{screen_to_ray, Ray};
pub use render::{render_mesh, Framebuffer};
pub use types::{Color, Face, Light, Material, RasterSettings, Texture, Vertex};
