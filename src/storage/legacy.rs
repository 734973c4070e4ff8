//! Import of designs exported by the web version of the editor
//!
//! Those documents are JSON with camelCase keys. Furniture entries carry only
//! the catalog id, and shading/texture overrides are keyed by that catalog id,
//! so every instance of the same item shares one override. On import each
//! placed item gets a fresh instance id and catalog-keyed overrides are fanned
//! out to all matching instances.

use super::StorageError;
use crate::design::{
    clamp_scale, normalize_rotation, Design, FurnitureInstance, InstanceId, RoomShape, TextureRef,
    DEFAULT_OWNER, UNTITLED_DESIGN,
};
use serde::Deserialize;

/// Sample designs seeded into an empty store
const SAMPLE_DESIGNS: &str = include_str!("../../assets/samples/sample_designs.json");

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyDesign {
    id: Option<String>,
    name: Option<String>,
    created_by: Option<serde_json::Value>,
    room: Option<LegacyRoom>,
    furniture: Vec<LegacyFurniture>,
    shading_enabled: Option<bool>,
    global_shading: Option<f32>,
    custom_shading: Vec<LegacyShading>,
    global_texture_id: Option<String>,
    global_texture_color: Option<String>,
    global_texture_path: Option<String>,
    custom_textures: Vec<LegacyTexture>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyRoom {
    width: Option<f32>,
    depth: Option<f32>,
    height: Option<f32>,
    shape: Option<String>,
    wall_color: Option<String>,
    floor_color: Option<String>,
    accent_color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyFurniture {
    id: String,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    rotation: Option<f32>,
    color: Option<String>,
    scale: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyShading {
    furniture_id: String,
    shading_level: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyTexture {
    furniture_id: String,
    texture_id: String,
    texture_path: Option<String>,
    color: Option<String>,
}

fn parse_shape(shape: &str) -> RoomShape {
    match shape {
        "square" => RoomShape::Square,
        "l-shaped" => RoomShape::LShaped,
        _ => RoomShape::Rectangle,
    }
}

fn owner_from(value: Option<serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => DEFAULT_OWNER.to_string(),
    }
}

fn texture_path(id: &str, path: Option<String>) -> String {
    path.map(|p| p.trim_start_matches('/').to_string())
        .unwrap_or_else(|| format!("textures/{}.jpg", id))
}

impl LegacyDesign {
    fn into_design(self) -> Design {
        let mut design = Design::blank(owner_from(self.created_by));
        design.id = self.id;
        design.name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNTITLED_DESIGN.to_string());

        if let Some(room) = self.room {
            let target = &mut design.room;
            if let Some(v) = room.width {
                target.width = v;
            }
            if let Some(v) = room.depth {
                target.depth = v;
            }
            if let Some(v) = room.height {
                target.height = v;
            }
            if let Some(s) = room.shape {
                target.shape = parse_shape(&s);
            }
            if let Some(c) = room.wall_color {
                target.wall_color = c;
            }
            if let Some(c) = room.floor_color {
                target.floor_color = c;
            }
            if let Some(c) = room.accent_color {
                target.accent_color = c;
            }
        }

        design.furniture = self
            .furniture
            .into_iter()
            .enumerate()
            .map(|(i, f)| FurnitureInstance {
                instance_id: InstanceId(i as u32 + 1),
                catalog_id: f.id,
                x: f.x,
                y: f.y,
                rotation: normalize_rotation(f.rotation.unwrap_or(0.0)),
                scale: clamp_scale(f.scale.unwrap_or(1.0)),
                color: f.color,
            })
            .collect();

        if let Some(enabled) = self.shading_enabled {
            design.shading_enabled = enabled;
        }
        if let Some(level) = self.global_shading {
            design.global_shading_level = level.clamp(0.0, 1.0);
        }

        if let Some(id) = self.global_texture_id {
            let color = self.global_texture_color.unwrap_or_else(|| "#8B4513".to_string());
            let path = texture_path(&id, self.global_texture_path);
            design.global_texture = Some(TextureRef::new(id, path, color));
        }

        let instances_of = |catalog_id: &str| -> Vec<InstanceId> {
            design
                .furniture
                .iter()
                .filter(|f| f.catalog_id == catalog_id)
                .map(|f| f.instance_id)
                .collect()
        };

        let mut shading = Vec::new();
        for entry in self.custom_shading {
            for id in instances_of(&entry.furniture_id) {
                shading.push((id, entry.shading_level.clamp(0.0, 1.0)));
            }
        }
        let mut textures = Vec::new();
        for entry in self.custom_textures {
            let color = entry.color.unwrap_or_else(|| "#8B4513".to_string());
            let path = texture_path(&entry.texture_id, entry.texture_path);
            let texture = TextureRef::new(entry.texture_id, path, color);
            for id in instances_of(&entry.furniture_id) {
                textures.push((id, texture.clone()));
            }
        }
        design.custom_shading.extend(shading);
        design.custom_textures.extend(textures);
        design
    }
}

/// Parse one legacy design object
pub fn parse_design(bytes: &[u8]) -> Result<Design, StorageError> {
    let legacy: LegacyDesign =
        serde_json::from_slice(bytes).map_err(|e| StorageError::Decode(e.to_string()))?;
    Ok(legacy.into_design())
}

/// Parse the web version's full saved-designs array
pub fn parse_collection(bytes: &[u8]) -> Result<Vec<Design>, StorageError> {
    let legacy: Vec<LegacyDesign> =
        serde_json::from_slice(bytes).map_err(|e| StorageError::Decode(e.to_string()))?;
    Ok(legacy.into_iter().map(LegacyDesign::into_design).collect())
}

pub fn sample_designs() -> Result<Vec<Design>, StorageError> {
    parse_collection(SAMPLE_DESIGNS.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_parse() {
        let samples = sample_designs().unwrap();
        assert_eq!(samples.len(), 2);
        let living = &samples[0];
        assert_eq!(living.id.as_deref(), Some("design-1"));
        assert_eq!(living.owner, "1");
        assert_eq!(living.furniture.len(), 4);
        assert_eq!(living.global_shading_level, 0.7);
        // chair-3 is the third item
        assert_eq!(living.custom_shading.get(&InstanceId(3)), Some(&0.9));

        let dining = &samples[1];
        assert_eq!(dining.room.shape, RoomShape::Square);
        assert_eq!(dining.furniture.iter().filter(|f| f.catalog_id == "chair-1").count(), 4);
    }

    #[test]
    fn test_catalog_keyed_overrides_fan_out() {
        let json = br##"{
            "name": "Pair",
            "createdBy": "alice",
            "furniture": [
                {"id": "chair-1", "x": 10, "y": 10, "rotation": -90},
                {"id": "chair-1", "x": 50, "y": 10},
                {"id": "table-2", "x": 90, "y": 40, "scale": 9}
            ],
            "customShading": [{"furnitureId": "chair-1", "shadingLevel": 0.6}],
            "globalTextureId": "marble",
            "globalTexturePath": "/textures/marble.jpg",
            "customTextures": [{"furnitureId": "table-2", "textureId": "red", "color": "#B91C1C"}]
        }"##;
        let design = parse_design(json).unwrap();
        assert_eq!(design.owner, "alice");
        assert_eq!(design.furniture[0].rotation, 270.0);
        assert_eq!(design.furniture[2].scale, 2.0);
        assert_eq!(design.custom_shading.len(), 2);
        assert_eq!(design.custom_shading[&InstanceId(1)], 0.6);
        assert_eq!(design.custom_shading[&InstanceId(2)], 0.6);
        assert_eq!(design.global_texture.as_ref().unwrap().path, "textures/marble.jpg");
        let red = &design.custom_textures[&InstanceId(3)];
        assert_eq!(red.path, "textures/red.jpg");
    }

    #[test]
    fn test_missing_texture_fields_keep_defaults() {
        let design = parse_design(br#"{"furniture": []}"#).unwrap();
        assert_eq!(design.name, UNTITLED_DESIGN);
        assert_eq!(design.owner, DEFAULT_OWNER);
        assert_eq!(design.global_texture, Some(TextureRef::default_wood()));
        assert!(design.custom_textures.is_empty());
    }
}
