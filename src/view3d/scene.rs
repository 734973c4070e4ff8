//! Retained scene graph for the 3D view
//!
//! Nodes form a tree through parent links. Furniture roots carry the
//! instance id they render; their parts point back up to them so a picked
//! triangle can be mapped to an instance.

use super::mesh::Mesh;
use crate::design::InstanceId;
use crate::rasterizer::{mat4_identity, mat4_mul, mat4_trs, Mat4, Material, Vec3};
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeTag {
    Room,
    /// Root node of one placed instance
    Furniture(InstanceId),
    /// Selection highlight and other overlays, never pickable
    Helper,
    /// Geometry below a furniture root
    Part,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub tag: NodeTag,
    pub position: Vec3,
    pub rotation_y: f32,
    pub scale: Vec3,
    pub mesh: Option<Rc<Mesh>>,
    pub material: Material,
    pub visible: bool,
}

impl Node {
    pub fn new(tag: NodeTag) -> Self {
        Self {
            parent: None,
            tag,
            position: Vec3::ZERO,
            rotation_y: 0.0,
            scale: Vec3::new(1.0, 1.0, 1.0),
            mesh: None,
            material: Material::default(),
            visible: true,
        }
    }

    pub fn with_mesh(tag: NodeTag, mesh: Rc<Mesh>, material: Material) -> Self {
        Self {
            mesh: Some(mesh),
            material,
            ..Self::new(tag)
        }
    }

    pub fn local_matrix(&self) -> Mat4 {
        mat4_trs(self.position, self.rotation_y, self.scale)
    }
}

#[derive(Debug, Default)]
pub struct Scene {
    nodes: BTreeMap<NodeId, Node>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        node.parent = Some(parent);
        self.add(node)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.parent == Some(id))
            .map(|(&cid, _)| cid)
            .collect()
    }

    /// `id` and everything below it
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![id];
        let mut i = 0;
        while i < out.len() {
            out.extend(self.children(out[i]));
            i += 1;
        }
        out
    }

    /// Remove a node and its descendants
    pub fn remove(&mut self, id: NodeId) {
        for n in self.subtree(id) {
            self.nodes.remove(&n);
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(&id, n)| (id, n))
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut m = mat4_identity();
        let mut cur = self.nodes.get(&id);
        while let Some(node) = cur {
            m = mat4_mul(&node.local_matrix(), &m);
            cur = node.parent.and_then(|p| self.nodes.get(&p));
        }
        m
    }

    /// A node is drawn only when it and all its ancestors are visible
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut cur = self.nodes.get(&id);
        while let Some(node) = cur {
            if !node.visible {
                return false;
            }
            cur = node.parent.and_then(|p| self.nodes.get(&p));
        }
        true
    }

    /// Walk up the parent chain to the furniture root owning `id`
    pub fn furniture_root(&self, id: NodeId) -> Option<(NodeId, InstanceId)> {
        let mut cur = Some(id);
        while let Some(nid) = cur {
            let node = self.nodes.get(&nid)?;
            if let NodeTag::Furniture(instance) = node.tag {
                return Some((nid, instance));
            }
            cur = node.parent;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::mat4_transform_point;

    #[test]
    fn test_remove_takes_descendants() {
        let mut scene = Scene::new();
        let root = scene.add(Node::new(NodeTag::Furniture(InstanceId(1))));
        let part = scene.add_child(root, Node::new(NodeTag::Part));
        scene.add_child(part, Node::new(NodeTag::Part));
        let other = scene.add(Node::new(NodeTag::Room));

        scene.remove(root);
        assert_eq!(scene.len(), 1);
        assert!(scene.contains(other));
    }

    #[test]
    fn test_furniture_root_walks_parents() {
        let mut scene = Scene::new();
        let root = scene.add(Node::new(NodeTag::Furniture(InstanceId(4))));
        let part = scene.add_child(root, Node::new(NodeTag::Part));
        let leaf = scene.add_child(part, Node::new(NodeTag::Part));
        let wall = scene.add(Node::new(NodeTag::Room));

        assert_eq!(scene.furniture_root(leaf), Some((root, InstanceId(4))));
        assert_eq!(scene.furniture_root(wall), None);
    }

    #[test]
    fn test_world_matrix_composes_parent_first() {
        let mut scene = Scene::new();
        let mut root = Node::new(NodeTag::Furniture(InstanceId(1)));
        root.position = Vec3::new(100.0, 0.0, 0.0);
        root.rotation_y = std::f32::consts::FRAC_PI_2;
        let root = scene.add(root);
        let mut child = Node::new(NodeTag::Part);
        child.position = Vec3::new(10.0, 0.0, 0.0);
        let child = scene.add_child(root, child);

        let p = mat4_transform_point(&scene.world_matrix(child), Vec3::ZERO);
        // +X turns toward -Z under a positive yaw
        assert!((p - Vec3::new(100.0, 0.0, -10.0)).len() < 1e-4);
    }

    #[test]
    fn test_hidden_parent_hides_children() {
        let mut scene = Scene::new();
        let root = scene.add(Node::new(NodeTag::Furniture(InstanceId(1))));
        let part = scene.add_child(root, Node::new(NodeTag::Part));
        assert!(scene.is_visible(part));
        scene.get_mut(root).unwrap().visible = false;
        assert!(!scene.is_visible(part));
    }

}
