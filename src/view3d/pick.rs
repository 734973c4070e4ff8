//! Ray picking against furniture geometry

use super::scene::{NodeTag, Scene};
use crate::design::InstanceId;
use crate::rasterizer::{mat4_transform_point, Ray};

/// Closest furniture instance hit by `ray`, with its distance
pub fn pick_furniture(scene: &Scene, ray: &Ray) -> Option<(InstanceId, f32)> {
    let mut best: Option<(InstanceId, f32)> = None;

    for (id, node) in scene.iter() {
        let Some(mesh) = &node.mesh else { continue };
        if matches!(node.tag, NodeTag::Room | NodeTag::Helper) || !scene.is_visible(id) {
            continue;
        }
        let Some((_, instance)) = scene.furniture_root(id) else {
            continue;
        };

        let world = scene.world_matrix(id);
        let positions: Vec<_> = mesh.vertices.iter().map(|v| mat4_transform_point(&world, v.pos)).collect();
        for face in &mesh.faces {
            let (Some(&a), Some(&b), Some(&c)) = (positions.get(face.v0), positions.get(face.v1), positions.get(face.v2))
            else {
                continue;
            };
            if let Some(t) = ray.intersect_triangle(a, b, c) {
                if best.map_or(true, |(_, bt)| t < bt) {
                    best = Some((instance, t));
                }
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{Material, Vec3};
    use crate::view3d::mesh::Mesh;
    use crate::view3d::scene::Node;
    use std::rc::Rc;

    fn cube_at(scene: &mut Scene, instance: u32, x: f32) {
        let mut root = Node::new(NodeTag::Furniture(InstanceId(instance)));
        root.position = Vec3::new(x, 0.0, 0.0);
        let root = scene.add(root);
        let mesh = Rc::new(Mesh::cuboid(Vec3::new(20.0, 20.0, 20.0), Vec3::new(0.0, 10.0, 0.0)));
        scene.add_child(root, Node::with_mesh(NodeTag::Part, mesh, Material::default()));
    }

    #[test]
    fn test_picks_nearest_instance() {
        let mut scene = Scene::new();
        cube_at(&mut scene, 1, 0.0);
        cube_at(&mut scene, 2, 50.0);
        // Looking down -X from the right: instance 2 is in front
        let ray = Ray::new(Vec3::new(200.0, 12.0, 3.0), Vec3::new(-1.0, 0.0, 0.0));
        let (id, t) = pick_furniture(&scene, &ray).unwrap();
        assert_eq!(id, InstanceId(2));
        assert!((t - 140.0).abs() < 1e-3);
    }

    #[test]
    fn test_room_geometry_is_not_pickable() {
        let mut scene = Scene::new();
        let floor = Rc::new(Mesh::floor_plane(100.0, 100.0));
        scene.add(Node::with_mesh(NodeTag::Room, floor, Material::default()));
        let ray = Ray::new(Vec3::new(7.0, 100.0, 3.0), Vec3::new(0.0, -1.0, 0.0));
        assert!(pick_furniture(&scene, &ray).is_none());
    }

    #[test]
    fn test_miss_returns_none() {
        let mut scene = Scene::new();
        cube_at(&mut scene, 1, 0.0);
        let ray = Ray::new(Vec3::new(0.0, 100.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert!(pick_furniture(&scene, &ray).is_none());
    }
}
