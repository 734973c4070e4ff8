//! On-disk design format
//!
//! Designs are stored as RON, brotli-compressed when written by the editor.
//! Reading auto-detects the format:
//! - plain RON text (starts with `(` or whitespace)
//! - legacy JSON exported by the web version (starts with `{`)
//! - anything else is treated as brotli and decompressed first
//!
//! Every field of `DesignDocument` has a default, so documents written by
//! older versions load with the current defaults filled in.

use super::{legacy, StorageError};
use crate::design::{
    clamp_scale, normalize_rotation, Design, FurnitureInstance, InstanceId, Room, TextureRef,
    DEFAULT_OWNER,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Cursor;

/// Current document version
pub const DOCUMENT_VERSION: u32 = 2;

/// Validation limits to keep malformed files from exhausting memory
pub mod limits {
    pub const MAX_FURNITURE: usize = 1024;
    pub const MAX_STRING_LEN: usize = 256;
    pub const MAX_COORD: f32 = 100_000.0;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignDocument {
    pub version: u32,
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

impl Default for DesignDocument {
    fn default() -> Self {
        let mut doc = DesignDocument::from(&Design::blank(DEFAULT_OWNER));
        // Documents without a version field predate versioning
        doc.version = 1;
        doc
    }
}

impl From<&Design> for DesignDocument {
    fn from(d: &Design) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            id: d.id.clone(),
            name: d.name.clone(),
            owner: d.owner.clone(),
            room: d.room.clone(),
            furniture: d.furniture.clone(),
            shading_enabled: d.shading_enabled,
            global_shading_level: d.global_shading_level,
            custom_shading: d.custom_shading.clone(),
            global_texture: d.global_texture.clone(),
            custom_textures: d.custom_textures.clone(),
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

impl DesignDocument {
    /// Validate and migrate into a live design
    pub fn into_design(self) -> Result<Design, StorageError> {
        validate(&self)?;

        let mut design = Design {
            id: self.id,
            name: self.name,
            owner: self.owner,
            room: self.room,
            furniture: self.furniture,
            shading_enabled: self.shading_enabled,
            global_shading_level: self.global_shading_level.clamp(0.0, 1.0),
            custom_shading: self.custom_shading,
            global_texture: self.global_texture,
            custom_textures: self.custom_textures,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };

        for item in &mut design.furniture {
            item.rotation = normalize_rotation(item.rotation);
            item.scale = clamp_scale(item.scale);
        }
        for level in design.custom_shading.values_mut() {
            *level = level.clamp(0.0, 1.0);
        }
        // Version 1 stored texture paths web-style with a leading slash
        if self.version < 2 {
            strip_leading_slash(&mut design);
        }
        let fixed = design.normalize();
        if fixed > 0 {
            log::warn!("design {:?}: repaired {} inconsistent entries", design.id, fixed);
        }
        Ok(design)
    }
}

fn strip_leading_slash(design: &mut Design) {
    let fix = |t: &mut TextureRef| {
        if let Some(stripped) = t.path.strip_prefix('/') {
            t.path = stripped.to_string();
        }
    };
    if let Some(t) = design.global_texture.as_mut() {
        fix(t);
    }
    design.custom_textures.values_mut().for_each(fix);
}

fn is_valid_float(f: f32) -> bool {
    f.is_finite() && f.abs() <= limits::MAX_COORD
}

fn validate(doc: &DesignDocument) -> Result<(), StorageError> {
    let err = |msg: String| Err(StorageError::Decode(msg));

    if doc.furniture.len() > limits::MAX_FURNITURE {
        return err(format!(
            "too many furniture items ({} > {})",
            doc.furniture.len(),
            limits::MAX_FURNITURE
        ));
    }
    if doc.name.len() > limits::MAX_STRING_LEN || doc.owner.len() > limits::MAX_STRING_LEN {
        return err("name or owner too long".to_string());
    }
    for (label, v) in [("width", doc.room.width), ("depth", doc.room.depth), ("height", doc.room.height)] {
        if !is_valid_float(v) {
            return err(format!("invalid room {} = {}", label, v));
        }
    }
    for (i, item) in doc.furniture.iter().enumerate() {
        if item.catalog_id.len() > limits::MAX_STRING_LEN {
            return err(format!("furniture[{}]: catalog id too long", i));
        }
        for v in [item.x, item.y, item.rotation, item.scale] {
            if !is_valid_float(v) {
                return err(format!("furniture[{}]: invalid number {}", i, v));
            }
        }
    }
    if !doc.global_shading_level.is_finite() || doc.custom_shading.values().any(|l| !l.is_finite()) {
        return err("invalid shading level".to_string());
    }
    Ok(())
}

/// Serialize a design to compressed bytes
pub fn encode(design: &Design) -> Result<Vec<u8>, StorageError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let doc = DesignDocument::from(design);
    let ron_string =
        ron::ser::to_string_pretty(&doc, config).map_err(|e| StorageError::Encode(e.to_string()))?;

    // Quality 6, window 22: good balance of speed and ratio
    let mut compressed = Vec::new();
    brotli::BrotliCompress(
        &mut Cursor::new(ron_string.as_bytes()),
        &mut compressed,
        &brotli::enc::BrotliEncoderParams {
            quality: 6,
            lgwin: 22,
            ..Default::default()
        },
    )
    .map_err(|e| StorageError::Compression(e.to_string()))?;

    Ok(compressed)
}

/// Parse a design from bytes in any supported format
pub fn decode(bytes: &[u8]) -> Result<Design, StorageError> {
    if bytes.is_empty() {
        return Err(StorageError::Decode("empty document".to_string()));
    }
    match sniff(bytes) {
        Format::Ron => decode_text(bytes),
        Format::Json => legacy::parse_design(bytes),
        Format::Compressed => {
            let mut decompressed = Vec::new();
            brotli::BrotliDecompress(&mut Cursor::new(bytes), &mut decompressed)
                .map_err(|e| StorageError::Compression(format!("brotli decompression failed: {}", e)))?;
            match sniff(&decompressed) {
                Format::Json => legacy::parse_design(&decompressed),
                _ => decode_text(&decompressed),
            }
        }
    }
}

fn decode_text(bytes: &[u8]) -> Result<Design, StorageError> {
    let text = std::str::from_utf8(bytes).map_err(|e| StorageError::Decode(format!("invalid UTF-8: {}", e)))?;
    let doc: DesignDocument = ron::from_str(text).map_err(|e| StorageError::Decode(e.to_string()))?;
    doc.into_design()
}

enum Format {
    Ron,
    Json,
    Compressed,
}

fn sniff(bytes: &[u8]) -> Format {
    match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'(') => Format::Ron,
        Some(b'{') => Format::Json,
        // Whitespace-only or empty input falls through to the RON parser's error
        None => Format::Ron,
        Some(_) if bytes.first().map_or(false, |b| b.is_ascii_whitespace()) => Format::Ron,
        Some(_) => Format::Compressed,
    }
}
