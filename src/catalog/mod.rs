//! Furniture catalog, texture library and room presets
//!
//! Read-only descriptors consumed by the design state and both renderers.
//! Nothing in the editor mutates catalog data; it is reached through the
//! `CatalogLookup` trait so tests can swap in a smaller table.

mod furniture;
mod presets;
mod textures;

pub use furniture::builtin_furniture;
pub use presets::{builtin_color_schemes, builtin_presets, ColorScheme, RoomPreset};
pub use textures::builtin_textures;

use serde::{Deserialize, Serialize};

/// Furniture category, used for grouping in the catalog panel and for
/// picking a fallback primitive in the 3D view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Chairs,
    Tables,
    Sofas,
    Cabinets,
    Beds,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Chairs,
        Category::Tables,
        Category::Sofas,
        Category::Cabinets,
        Category::Beds,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Chairs => "Chairs",
            Category::Tables => "Tables",
            Category::Sofas => "Sofas",
            Category::Cabinets => "Cabinets",
            Category::Beds => "Beds",
        }
    }
}

/// Physical size of a catalog item in centimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

impl Dimensions {
    pub const fn new(width: f32, depth: f32, height: f32) -> Self {
        Self { width, depth, height }
    }
}

/// Static descriptor for one placeable furniture item
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub dimensions: Dimensions,
    pub default_color: String,
    /// Model path relative to the asset directory
    pub model: Option<String>,
    /// Per-item correction for model data authored at the wrong size
    pub model_scale: f32,
    /// Extra multiplier so small props read well in the 3D view
    pub visual_boost: f32,
    /// Model origin already sits on the floor, skip bounding box alignment
    pub floor_aligned_origin: bool,
}

impl CatalogEntry {
    /// Combined multiplier applied on top of the fit-to-dimensions scale
    pub fn model_override(&self) -> f32 {
        self.model_scale * self.visual_boost
    }
}

/// A selectable surface texture
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDescriptor {
    pub id: String,
    pub name: String,
    pub path: String,
    /// Swatch color, also used as the material tint
    pub color: String,
}

/// Read-only catalog access
pub trait CatalogLookup {
    fn get(&self, catalog_id: &str) -> Option<&CatalogEntry>;
    fn entries(&self) -> &[CatalogEntry];
    fn textures(&self) -> &[TextureDescriptor];
    fn room_presets(&self) -> &[RoomPreset];
    fn color_schemes(&self) -> &[ColorScheme];

    fn texture(&self, texture_id: &str) -> Option<&TextureDescriptor> {
        self.textures().iter().find(|t| t.id == texture_id)
    }

    fn room_preset(&self, preset_id: &str) -> Option<&RoomPreset> {
        self.room_presets().iter().find(|p| p.id == preset_id)
    }

    fn by_category(&self, category: Category) -> Vec<&CatalogEntry> {
        self.entries().iter().filter(|e| e.category == category).collect()
    }
}

/// The built-in catalog shipped with the editor
#[derive(Debug, Clone)]
pub struct Catalog {
    furniture: Vec<CatalogEntry>,
    textures: Vec<TextureDescriptor>,
    presets: Vec<RoomPreset>,
    schemes: Vec<ColorScheme>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            furniture: builtin_furniture(),
            textures: builtin_textures(),
            presets: builtin_presets(),
            schemes: builtin_color_schemes(),
        }
    }

    /// Catalog with custom furniture and the built-in textures
    #[cfg(test)]
    pub fn with_furniture(furniture: Vec<CatalogEntry>) -> Self {
        Self {
            furniture,
            ..Self::builtin()
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CatalogLookup for Catalog {
    fn get(&self, catalog_id: &str) -> Option<&CatalogEntry> {
        self.furniture.iter().find(|e| e.id == catalog_id)
    }

    fn entries(&self) -> &[CatalogEntry] {
        &self.furniture
    }

    fn textures(&self) -> &[TextureDescriptor] {
        &self.textures
    }

    fn room_presets(&self) -> &[RoomPreset] {
        &self.presets
    }

    fn color_schemes(&self) -> &[ColorScheme] {
        &self.schemes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_and_unknown() {
        let catalog = Catalog::builtin();
        let chair = catalog.get("chair-1").unwrap();
        assert_eq!(chair.name, "Dining Chair");
        assert_eq!(chair.dimensions, Dimensions::new(45.0, 50.0, 90.0));
        assert!(catalog.get("nonexistent-id").is_none());
    }

    #[test]
    fn test_model_override_combines_scale_and_boost() {
        let catalog = Catalog::builtin();
        let lounge = catalog.get("chair-3").unwrap();
        assert!((lounge.model_override() - 2.6).abs() < 1e-5);
        let bed = catalog.get("bed-1").unwrap();
        assert!((bed.model_override() - 4.0).abs() < 1e-5);
        assert!(bed.floor_aligned_origin);
        assert_eq!(catalog.get("chair-1").unwrap().model_override(), 1.0);
    }

    #[test]
    fn test_presets_reference_known_furniture() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.room_presets().len(), 6);
        for preset in catalog.room_presets() {
            for item in &preset.furniture {
                assert!(catalog.get(&item.catalog_id).is_some(), "{} in {}", item.catalog_id, preset.id);
            }
        }
    }

    #[test]
    fn test_by_category_and_textures() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.by_category(Category::Chairs).len(), 3);
        assert_eq!(catalog.by_category(Category::Beds).len(), 1);
        assert_eq!(catalog.texture("wood").unwrap().color, "#8B4513");
        assert!(catalog.texture("plaid").is_none());
    }
}
