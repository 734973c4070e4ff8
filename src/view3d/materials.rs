//! Furniture materials and the transient preview overlay

use super::scene::{NodeId, NodeTag, Scene};
use crate::design::InstanceId;
use crate::rasterizer::{Color, Material, Texture};
use std::collections::HashMap;
use std::rc::Rc;

/// Standard material for a shading level in [0, 1]
pub fn shaded_material(color: Color, level: f32, texture: Option<Rc<Texture>>) -> Material {
    let level = level.clamp(0.0, 1.0);
    let mut material = Material::standard(color, 1.0 - level, level * 0.5);
    material.texture = texture;
    material
}

/// Base color: texture tint, then instance color, then catalog color
pub fn base_color(texture_tint: Option<&str>, instance_color: Option<&str>, catalog_color: &str) -> Color {
    texture_tint
        .and_then(Color::from_hex)
        .or_else(|| instance_color.and_then(Color::from_hex))
        .or_else(|| Color::from_hex(catalog_color))
        .unwrap_or(Color::FALLBACK_GRAY)
}

/// Mesh nodes below (and including) a furniture root
pub fn furniture_meshes(scene: &Scene, root: NodeId) -> Vec<NodeId> {
    scene
        .subtree(root)
        .into_iter()
        .filter(|&id| scene.get(id).map_or(false, |n| n.mesh.is_some() && n.tag != NodeTag::Helper))
        .collect()
}

/// Original materials of nodes currently showing a preview
#[derive(Debug, Default)]
pub struct PreviewOverlay {
    snapshots: HashMap<InstanceId, Vec<(NodeId, Material)>>,
}

impl PreviewOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_previewing(&self, instance: InstanceId) -> bool {
        self.snapshots.contains_key(&instance)
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Remember the current materials unless already snapshotted
    fn snapshot(&mut self, scene: &Scene, instance: InstanceId, root: NodeId) {
        self.snapshots.entry(instance).or_insert_with(|| {
            furniture_meshes(scene, root)
                .into_iter()
                .filter_map(|id| scene.get(id).map(|n| (id, n.material.clone())))
                .collect()
        });
    }

    /// Preview a shading level on the live nodes of one instance
    pub fn preview_shading(&mut self, scene: &mut Scene, instance: InstanceId, root: NodeId, level: f32) {
        self.snapshot(scene, instance, root);
        let level = level.clamp(0.0, 1.0);
        for id in furniture_meshes(scene, root) {
            if let Some(node) = scene.get_mut(id) {
                node.material.roughness = 1.0 - level;
                node.material.metalness = level * 0.5;
            }
        }
    }

    /// Preview a texture: originals come back first so previews never stack
    pub fn preview_texture(
        &mut self,
        scene: &mut Scene,
        instance: InstanceId,
        root: NodeId,
        tint: Color,
        image: Option<Rc<Texture>>,
    ) {
        self.restore(scene, instance);
        self.snapshot(scene, instance, root);
        for id in furniture_meshes(scene, root) {
            if let Some(node) = scene.get_mut(id) {
                node.material.color = tint;
                node.material.texture = image.clone();
            }
        }
    }

    /// Put back the snapshotted materials of one instance
    pub fn restore(&mut self, scene: &mut Scene, instance: InstanceId) -> bool {
        let Some(saved) = self.snapshots.remove(&instance) else {
            return false;
        };
        for (id, material) in saved {
            if let Some(node) = scene.get_mut(id) {
                node.material = material;
            }
        }
        true
    }

    /// Edit the saved materials of a previewed instance, so a later restore
    /// shows the change
    pub fn update_saved(&mut self, instance: InstanceId, edit: impl Fn(&mut Material)) -> bool {
        let Some(saved) = self.snapshots.get_mut(&instance) else {
            return false;
        };
        for (_, material) in saved.iter_mut() {
            edit(material);
        }
        true
    }

    pub fn restore_all(&mut self, scene: &mut Scene) {
        let ids: Vec<InstanceId> = self.snapshots.keys().copied().collect();
        for id in ids {
            self.restore(scene, id);
        }
    }

    /// Forget snapshots without touching nodes, for when the nodes are gone
    pub fn discard(&mut self) {
        self.snapshots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view3d::mesh::Mesh;
    use crate::view3d::scene::Node;
    use crate::rasterizer::Vec3;

    fn furniture(scene: &mut Scene, id: u32, color: Color) -> (NodeId, NodeId) {
        let root = scene.add(Node::new(NodeTag::Furniture(InstanceId(id))));
        let mesh = Rc::new(Mesh::cuboid(Vec3::new(1.0, 1.0, 1.0), Vec3::ZERO));
        let part = scene.add_child(root, Node::with_mesh(NodeTag::Part, mesh, shaded_material(color, 0.3, None)));
        (root, part)
    }

    #[test]
    fn test_shading_level_maps_to_roughness_and_metalness() {
        let m = shaded_material(Color::WHITE, 0.8, None);
        assert!((m.roughness - 0.2).abs() < 1e-6);
        assert!((m.metalness - 0.4).abs() < 1e-6);
        let clamped = shaded_material(Color::WHITE, 3.0, None);
        assert_eq!(clamped.roughness, 0.0);
    }

    #[test]
    fn test_base_color_precedence() {
        let wood = Color::new(0x8B, 0x45, 0x13);
        assert_eq!(base_color(Some("#8B4513"), Some("#000000"), "#FFFFFF"), wood);
        assert_eq!(base_color(None, Some("#000000"), "#FFFFFF"), Color::BLACK);
        assert_eq!(base_color(None, None, "#FFFFFF"), Color::WHITE);
        assert_eq!(base_color(None, Some("junk"), "#000000"), Color::BLACK);
    }

    #[test]
    fn test_preview_restores_originals() {
        let mut scene = Scene::new();
        let (root, part) = furniture(&mut scene, 1, Color::BLACK);
        let mut overlay = PreviewOverlay::new();

        overlay.preview_shading(&mut scene, InstanceId(1), root, 1.0);
        assert_eq!(scene.get(part).unwrap().material.roughness, 0.0);
        overlay.preview_shading(&mut scene, InstanceId(1), root, 0.5);

        assert!(overlay.restore(&mut scene, InstanceId(1)));
        let m = &scene.get(part).unwrap().material;
        assert!((m.roughness - 0.7).abs() < 1e-6);
        assert!(!overlay.restore(&mut scene, InstanceId(1)));
    }

    #[test]
    fn test_texture_previews_do_not_stack() {
        let mut scene = Scene::new();
        let (root, part) = furniture(&mut scene, 1, Color::BLACK);
        let mut overlay = PreviewOverlay::new();

        overlay.preview_texture(&mut scene, InstanceId(1), root, Color::new(255, 0, 0), None);
        overlay.preview_texture(&mut scene, InstanceId(1), root, Color::new(0, 0, 255), None);
        assert_eq!(scene.get(part).unwrap().material.color, Color::new(0, 0, 255));

        overlay.restore_all(&mut scene);
        assert_eq!(scene.get(part).unwrap().material.color, Color::BLACK);
        assert!(overlay.is_empty());
    }
}
