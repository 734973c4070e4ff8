//! Design document types
//!
//! Room coordinates are centimeters. The room plane origin is the top-left
//! corner of the floor plan: x grows to the right, y grows toward the viewer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Placeholder name for designs saved without one
pub const UNTITLED_DESIGN: &str = "Untitled Design";
/// Owner used when nobody is signed in
pub const DEFAULT_OWNER: &str = "default-user";
/// Shading level used for every instance while shading is turned off
pub const SHADING_DISABLED_LEVEL: f32 = 0.5;
/// Default global shading level of a new design
pub const DEFAULT_SHADING_LEVEL: f32 = 0.3;

pub const MIN_SCALE: f32 = 0.5;
pub const MAX_SCALE: f32 = 2.0;

/// Identifies one placed furniture instance within a design
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(pub u32);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoomShape {
    #[default]
    Rectangle,
    Square,
    LShaped,
}

impl RoomShape {
    pub const ALL: [RoomShape; 3] = [RoomShape::Rectangle, RoomShape::Square, RoomShape::LShaped];

    pub fn label(&self) -> &'static str {
        match self {
            RoomShape::Rectangle => "Rectangle",
            RoomShape::Square => "Square",
            RoomShape::LShaped => "L-Shaped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Room {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    pub shape: RoomShape,
    pub wall_color: String,
    pub floor_color: String,
    pub accent_color: String,
}

impl Default for Room {
    fn default() -> Self {
        Self {
            width: 500.0,
            depth: 400.0,
            height: 280.0,
            shape: RoomShape::Rectangle,
            wall_color: "#F8F8FF".to_string(),
            floor_color: "#A9A9A9".to_string(),
            accent_color: "#4682B4".to_string(),
        }
    }
}

/// Reference to a surface texture with its tint color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureRef {
    pub id: String,
    pub path: String,
    pub color: String,
}

impl TextureRef {
    pub fn new(id: impl Into<String>, path: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            color: color.into(),
        }
    }

    /// Texture applied to every new design
    pub fn default_wood() -> Self {
        Self::new("wood", "textures/wood.jpg", "#8B4513")
    }
}

/// One catalog item placed in the room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureInstance {
    pub instance_id: InstanceId,
    pub catalog_id: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "unit_scale")]
    pub scale: f32,
    #[serde(default)]
    pub color: Option<String>,
}

fn unit_scale() -> f32 {
    1.0
}

impl FurnitureInstance {
    pub fn new(instance_id: InstanceId, catalog_id: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            instance_id,
            catalog_id: catalog_id.into(),
            x,
            y,
            rotation: 0.0,
            scale: 1.0,
            color: None,
        }
    }
}

/// The root aggregate edited by the design state
#[derive(Debug, Clone, PartialEq)]
pub struct Design {
    pub id: Option<String>,
    pub name: String,
    pub owner: String,
    pub room: Room,
    pub furniture: Vec<FurnitureInstance>,
    pub shading_enabled: bool,
    pub global_shading_level: f32,
    pub custom_shading: BTreeMap<InstanceId, f32>,
    pub global_texture: Option<TextureRef>,
    pub custom_textures: BTreeMap<InstanceId, TextureRef>,
    pub created_at: Option<u64>,
    pub updated_at: Option<u64>,
}

impl Design {
    /// Blank template for `owner`
    pub fn blank(owner: impl Into<String>) -> Self {
        Self {
            id: None,
            name: UNTITLED_DESIGN.to_string(),
            owner: owner.into(),
            room: Room::default(),
            furniture: Vec::new(),
            shading_enabled: true,
            global_shading_level: DEFAULT_SHADING_LEVEL,
            custom_shading: BTreeMap::new(),
            global_texture: Some(TextureRef::default_wood()),
            custom_textures: BTreeMap::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn instance(&self, id: InstanceId) -> Option<&FurnitureInstance> {
        self.furniture.iter().find(|f| f.instance_id == id)
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.instance(id).is_some()
    }

    /// Next unused instance id
    pub fn next_instance_id(&self) -> InstanceId {
        let max = self.furniture.iter().map(|f| f.instance_id.0).max();
        InstanceId(max.map_or(1, |m| m + 1))
    }

    /// Shading level the renderer should use for an instance
    pub fn effective_shading(&self, id: InstanceId) -> f32 {
        if !self.shading_enabled {
            return SHADING_DISABLED_LEVEL;
        }
        self.custom_shading
            .get(&id)
            .copied()
            .unwrap_or(self.global_shading_level)
    }

    /// Texture for an instance: its override, else the global texture when
    /// `force_global` is set
    pub fn effective_texture(&self, id: InstanceId, force_global: bool) -> Option<&TextureRef> {
        self.custom_textures.get(&id).or(if force_global {
            self.global_texture.as_ref()
        } else {
            None
        })
    }

    /// Reassign duplicate instance ids and drop overrides for ids that are not
    /// in `furniture`. Returns the number of entries touched.
    pub fn normalize(&mut self) -> usize {
        let mut touched = 0;
        let mut seen = std::collections::HashSet::new();
        let mut next = self.next_instance_id().0;
        for item in &mut self.furniture {
            if !seen.insert(item.instance_id) {
                item.instance_id = InstanceId(next);
                seen.insert(item.instance_id);
                next += 1;
                touched += 1;
            }
        }
        touched += self.prune_overrides();
        touched
    }

    /// Remove override entries whose instance is gone
    pub fn prune_overrides(&mut self) -> usize {
        let live: std::collections::HashSet<InstanceId> =
            self.furniture.iter().map(|f| f.instance_id).collect();
        let before = self.custom_shading.len() + self.custom_textures.len();
        self.custom_shading.retain(|id, _| live.contains(id));
        self.custom_textures.retain(|id, _| live.contains(id));
        before - (self.custom_shading.len() + self.custom_textures.len())
    }
}

/// Normalize degrees into [0, 360)
pub fn normalize_rotation(degrees: f32) -> f32 {
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

pub fn clamp_scale(scale: f32) -> f32 {
    if scale.is_nan() {
        return 1.0;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// Rotation after one rotate-button press
pub fn step_rotation(current: f32, delta: f32) -> f32 {
    normalize_rotation(current + delta)
}

/// Scale after one scale-button press, rounded to one decimal
pub fn step_scale(current: f32, delta: f32) -> f32 {
    clamp_scale(((current + delta) * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_rotation() {
        assert_eq!(normalize_rotation(0.0), 0.0);
        assert_eq!(normalize_rotation(375.0), 15.0);
        assert_eq!(normalize_rotation(-15.0), 345.0);
        assert_eq!(normalize_rotation(-720.0), 0.0);
        assert!(normalize_rotation(-1e-7) < 360.0);
    }

    #[test]
    fn test_clamp_scale() {
        assert_eq!(clamp_scale(3.0), 2.0);
        assert_eq!(clamp_scale(0.1), 0.5);
        assert_eq!(clamp_scale(1.3), 1.3);
        assert_eq!(clamp_scale(f32::NAN), 1.0);
    }

    #[test]
    fn test_step_scale_rounds() {
        assert_eq!(step_scale(1.0, 0.1), 1.1);
        assert_eq!(step_scale(1.95, 0.1), 2.0);
        assert_eq!(step_scale(0.5, -0.1), 0.5);
    }

    #[test]
    fn test_effective_shading_disabled_uses_constant() {
        let mut design = Design::blank("u1");
        design.furniture.push(FurnitureInstance::new(InstanceId(1), "chair-1", 0.0, 0.0));
        design.custom_shading.insert(InstanceId(1), 0.9);
        assert_eq!(design.effective_shading(InstanceId(1)), 0.9);
        design.shading_enabled = false;
        assert_eq!(design.effective_shading(InstanceId(1)), SHADING_DISABLED_LEVEL);
    }

    #[test]
    fn test_effective_texture_force_flag() {
        let mut design = Design::blank("u1");
        design.furniture.push(FurnitureInstance::new(InstanceId(1), "chair-1", 0.0, 0.0));
        assert!(design.effective_texture(InstanceId(1), false).is_none());
        assert_eq!(design.effective_texture(InstanceId(1), true).unwrap().id, "wood");
        let marble = TextureRef::new("marble", "textures/marble.jpg", "#F5F5F5");
        design.custom_textures.insert(InstanceId(1), marble.clone());
        assert_eq!(design.effective_texture(InstanceId(1), false), Some(&marble));
    }

    #[test]
    fn test_normalize_reassigns_duplicates_and_prunes() {
        let mut design = Design::blank("u1");
        design.furniture.push(FurnitureInstance::new(InstanceId(3), "chair-1", 0.0, 0.0));
        design.furniture.push(FurnitureInstance::new(InstanceId(3), "chair-1", 10.0, 0.0));
        design.custom_shading.insert(InstanceId(9), 0.4);
        let touched = design.normalize();
        assert_eq!(touched, 2);
        assert_eq!(design.furniture[0].instance_id, InstanceId(3));
        assert_eq!(design.furniture[1].instance_id, InstanceId(4));
        assert!(design.custom_shading.is_empty());
    }

    #[test]
    fn test_next_instance_id() {
        let mut design = Design::blank("u1");
        assert_eq!(design.next_instance_id(), InstanceId(1));
        design.furniture.push(FurnitureInstance::new(InstanceId(7), "bed-1", 0.0, 0.0));
        assert_eq!(design.next_instance_id(), InstanceId(8));
    }
}
