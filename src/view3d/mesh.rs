//! Triangle meshes and the primitive shapes the scene is built from

use crate::catalog::Category;
use crate::rasterizer::{mat4_transform_dir, mat4_transform_point, Aabb, Face, Mat4, Vec2, Vec3, Vertex};

/// Indexed triangle mesh, counter-clockwise front faces
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().map(|v| v.pos))
    }

    /// Copy with every vertex moved by `m`
    pub fn transformed(&self, m: &Mat4) -> Mesh {
        let vertices = self
            .vertices
            .iter()
            .map(|v| Vertex::new(mat4_transform_point(m, v.pos), v.uv, mat4_transform_dir(m, v.normal).normalize()))
            .collect();
        Mesh::new(vertices, self.faces.clone())
    }

    /// Axis-aligned box of `size` centered on `center`
    pub fn cuboid(size: Vec3, center: Vec3) -> Mesh {
        let h = size * 0.5;
        let mut mesh = Mesh::default();
        // (normal, u axis, v axis) per side; u × v = normal keeps the winding outward
        let sides = [
            (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 1.0, 0.0)),
            (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 0.0)),
            (Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0)),
            (Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
            (Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
            (Vec3::new(0.0, 0.0, -1.0), Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
        ];
        let extent = |d: Vec3| Vec3::new(d.x * h.x, d.y * h.y, d.z * h.z);
        for (normal, u, v) in sides {
            let c = center + extent(normal);
            let (eu, ev) = (extent(u), extent(v));
            mesh.push_quad(
                [c - eu - ev, c + eu - ev, c + eu + ev, c - eu + ev],
                normal,
            );
        }
        mesh
    }

    /// Horizontal rectangle at y = 0 facing up, centered on the origin
    pub fn floor_plane(width: f32, depth: f32) -> Mesh {
        let (hw, hd) = (width * 0.5, depth * 0.5);
        let mut mesh = Mesh::default();
        mesh.push_quad(
            [
                Vec3::new(-hw, 0.0, hd),
                Vec3::new(hw, 0.0, hd),
                Vec3::new(hw, 0.0, -hd),
                Vec3::new(-hw, 0.0, -hd),
            ],
            Vec3::UP,
        );
        mesh
    }

    /// Vertical rectangle in the XY plane facing +Z, centered on the origin
    pub fn wall_plane(width: f32, height: f32) -> Mesh {
        let (hw, hh) = (width * 0.5, height * 0.5);
        let mut mesh = Mesh::default();
        mesh.push_quad(
            [
                Vec3::new(-hw, -hh, 0.0),
                Vec3::new(hw, -hh, 0.0),
                Vec3::new(hw, hh, 0.0),
                Vec3::new(-hw, hh, 0.0),
            ],
            Vec3::new(0.0, 0.0, 1.0),
        );
        mesh
    }

    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let base = self.vertices.len();
        let uvs = [Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 0.0)];
        for (pos, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(Vertex::new(pos, uv, normal));
        }
        self.faces.push(Face::new(base, base + 1, base + 2));
        self.faces.push(Face::new(base, base + 2, base + 3));
    }
}

/// Boxes approximating a catalog item of `size` (width, height, depth) that
/// stands on y = 0 and is centered on x and z
pub fn fallback_parts(category: Category, size: Vec3) -> Vec<Mesh> {
    let (w, h, d) = (size.x, size.y, size.z);
    let leg = (w.min(d) * 0.1).max(0.5);
    let legs = |height: f32| -> Vec<Mesh> {
        let (lx, lz) = (w * 0.5 - leg * 0.5, d * 0.5 - leg * 0.5);
        [(-lx, -lz), (lx, -lz), (lx, lz), (-lx, lz)]
            .into_iter()
            .map(|(x, z)| Mesh::cuboid(Vec3::new(leg, height, leg), Vec3::new(x, height * 0.5, z)))
            .collect()
    };

    match category {
        Category::Chairs => {
            let seat_y = h * 0.45;
            let seat_t = h * 0.06;
            let back_t = d * 0.1;
            let mut parts = vec![
                Mesh::cuboid(Vec3::new(w, seat_t, d), Vec3::new(0.0, seat_y + seat_t * 0.5, 0.0)),
                Mesh::cuboid(
                    Vec3::new(w, h - seat_y - seat_t, back_t),
                    Vec3::new(0.0, (h + seat_y + seat_t) * 0.5, -d * 0.5 + back_t * 0.5),
                ),
            ];
            parts.extend(legs(seat_y));
            parts
        }
        Category::Tables => {
            let top_t = h * 0.06;
            let mut parts = vec![Mesh::cuboid(Vec3::new(w, top_t, d), Vec3::new(0.0, h - top_t * 0.5, 0.0))];
            parts.extend(legs(h - top_t));
            parts
        }
        Category::Sofas => {
            let base_h = h * 0.45;
            let arm_w = w * 0.1;
            let back_t = d * 0.2;
            let arm_h = h * 0.65;
            vec![
                Mesh::cuboid(Vec3::new(w, base_h, d), Vec3::new(0.0, base_h * 0.5, 0.0)),
                Mesh::cuboid(
                    Vec3::new(w, h - base_h, back_t),
                    Vec3::new(0.0, base_h + (h - base_h) * 0.5, -d * 0.5 + back_t * 0.5),
                ),
                Mesh::cuboid(Vec3::new(arm_w, arm_h, d), Vec3::new(-w * 0.5 + arm_w * 0.5, arm_h * 0.5, 0.0)),
                Mesh::cuboid(Vec3::new(arm_w, arm_h, d), Vec3::new(w * 0.5 - arm_w * 0.5, arm_h * 0.5, 0.0)),
            ]
        }
        Category::Cabinets => {
            let plinth = h * 0.05;
            vec![
                Mesh::cuboid(Vec3::new(w * 0.95, plinth, d * 0.95), Vec3::new(0.0, plinth * 0.5, 0.0)),
                Mesh::cuboid(Vec3::new(w, h - plinth, d), Vec3::new(0.0, plinth + (h - plinth) * 0.5, 0.0)),
            ]
        }
        Category::Beds => {
            let frame_h = h * 0.35;
            let mattress_h = h * 0.2;
            let head_t = d * 0.05;
            vec![
                Mesh::cuboid(Vec3::new(w, frame_h, d), Vec3::new(0.0, frame_h * 0.5, 0.0)),
                Mesh::cuboid(
                    Vec3::new(w * 0.96, mattress_h, d * 0.92),
                    Vec3::new(0.0, frame_h + mattress_h * 0.5, head_t * 0.5),
                ),
                Mesh::cuboid(Vec3::new(w, h, head_t), Vec3::new(0.0, h * 0.5, -d * 0.5 + head_t * 0.5)),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn union(parts: &[Mesh]) -> Aabb {
        let mut bounds = parts[0].bounds().unwrap();
        for p in &parts[1..] {
            bounds = bounds.union(&p.bounds().unwrap());
        }
        bounds
    }

    #[test]
    fn test_cuboid_faces_point_outward() {
        let mesh = Mesh::cuboid(Vec3::new(2.0, 4.0, 6.0), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(mesh.faces.len(), 12);
        let center = Vec3::new(0.0, 2.0, 0.0);
        for f in &mesh.faces {
            let (a, b, c) = (mesh.vertices[f.v0].pos, mesh.vertices[f.v1].pos, mesh.vertices[f.v2].pos);
            let n = (b - a).cross(c - a);
            assert!(n.dot(a - center) > 0.0);
        }
        let b = mesh.bounds().unwrap();
        assert_eq!(b.min, Vec3::new(-1.0, 0.0, -3.0));
        assert_eq!(b.max, Vec3::new(1.0, 4.0, 3.0));
    }

    #[test]
    fn test_fallback_fills_requested_size() {
        let size = Vec3::new(45.0, 90.0, 50.0);
        for category in Category::ALL {
            let parts = fallback_parts(category, size);
            let b = union(&parts);
            assert!((b.size() - size).len() < 1e-3, "{:?} spans {:?}", category, b.size());
            assert!(b.min.y.abs() < 1e-4);
        }
    }

    #[test]
    fn test_chair_has_seat_back_and_legs() {
        assert_eq!(fallback_parts(Category::Chairs, Vec3::new(45.0, 90.0, 50.0)).len(), 6);
        assert_eq!(fallback_parts(Category::Sofas, Vec3::new(200.0, 85.0, 90.0)).len(), 4);
    }

    #[test]
    fn test_floor_plane_faces_up() {
        let floor = Mesh::floor_plane(400.0, 300.0);
        let f = floor.faces[0];
        let (a, b, c) = (floor.vertices[f.v0].pos, floor.vertices[f.v1].pos, floor.vertices[f.v2].pos);
        assert!((b - a).cross(c - a).y > 0.0);
    }
}
