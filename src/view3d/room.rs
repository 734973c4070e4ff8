//! Room shell and placement helpers
//!
//! The room is centered on the world origin. Plan coordinates map to world
//! x and z with the room's top-left corner at (-W/2, -D/2).

use super::mesh::Mesh;
use super::scene::{Node, NodeId, NodeTag, Scene};
use crate::design::{FurnitureInstance, Room};
use crate::rasterizer::{Color, Material, Vec3};
use std::f32::consts::FRAC_PI_2;
use std::rc::Rc;

/// Lifts the highlight off the floor to avoid z-fighting
const HIGHLIGHT_LIFT: f32 = 0.5;
const HIGHLIGHT_MARGIN: f32 = 10.0;
pub const HIGHLIGHT_OPACITY: f32 = 0.3;

/// World position of an instance's footprint center on the floor
pub fn placement(item: &FurnitureInstance, room: &Room) -> Vec3 {
    Vec3::new(item.x - room.width * 0.5, 0.0, item.y - room.depth * 0.5)
}

pub fn yaw(item: &FurnitureInstance) -> f32 {
    item.rotation.to_radians()
}

/// Floor and the back, left and right walls
pub fn build_room(scene: &mut Scene, room: &Room) -> Vec<NodeId> {
    let wall_color = Color::from_hex_or(&room.wall_color, Color::WHITE);
    let floor_color = Color::from_hex_or(&room.floor_color, Color::FALLBACK_GRAY);

    let floor_mat = Material::standard(floor_color, 0.9, 0.1);
    let mut wall_mat = Material::standard(wall_color, 0.8, 0.2);
    wall_mat.double_sided = true;

    let (w, d, h) = (room.width, room.depth, room.height);
    let mut ids = Vec::with_capacity(4);

    ids.push(scene.add(Node::with_mesh(NodeTag::Room, Rc::new(Mesh::floor_plane(w, d)), floor_mat)));

    let mut back = Node::with_mesh(NodeTag::Room, Rc::new(Mesh::wall_plane(w, h)), wall_mat.clone());
    back.position = Vec3::new(0.0, h * 0.5, -d * 0.5);
    ids.push(scene.add(back));

    let side = Rc::new(Mesh::wall_plane(d, h));
    let mut left = Node::with_mesh(NodeTag::Room, Rc::clone(&side), wall_mat.clone());
    left.position = Vec3::new(-w * 0.5, h * 0.5, 0.0);
    left.rotation_y = FRAC_PI_2;
    ids.push(scene.add(left));

    let mut right = Node::with_mesh(NodeTag::Room, side, wall_mat);
    right.position = Vec3::new(w * 0.5, h * 0.5, 0.0);
    right.rotation_y = -FRAC_PI_2;
    ids.push(scene.add(right));

    ids
}

/// Translucent ground marker under a selected instance
pub fn build_highlight(scene: &mut Scene, item: &FurnitureInstance, room: &Room, width: f32, depth: f32) -> NodeId {
    let mesh = Mesh::floor_plane(
        width * item.scale + HIGHLIGHT_MARGIN,
        depth * item.scale + HIGHLIGHT_MARGIN,
    );
    let mut node = Node::with_mesh(
        NodeTag::Helper,
        Rc::new(mesh),
        Material::basic(Color::SELECTION, HIGHLIGHT_OPACITY),
    );
    node.position = placement(item, room) + Vec3::new(0.0, HIGHLIGHT_LIFT, 0.0);
    node.rotation_y = yaw(item);
    scene.add(node)
}
