//! Built-in texture library

use super::TextureDescriptor;

const TEXTURES: &[(&str, &str, &str)] = &[
    ("blue", "Blue", "#1E3A8A"),
    ("green", "Green", "#166534"),
    ("red", "Red", "#B91C1C"),
    ("yellow", "Yellow", "#CA8A04"),
    ("white", "White", "#FFFFFF"),
    ("black", "Black", "#171717"),
    ("wood", "Wood", "#8B4513"),
    ("marble", "Marble", "#F5F5F5"),
];

pub fn builtin_textures() -> Vec<TextureDescriptor> {
    TEXTURES
        .iter()
        .map(|(id, name, color)| TextureDescriptor {
            id: id.to_string(),
            name: name.to_string(),
            path: format!("textures/{}.jpg", id),
            color: color.to_string(),
        })
        .collect()
}
