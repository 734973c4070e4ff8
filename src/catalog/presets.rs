//! Room presets and wall/floor color schemes

/// One furniture placement inside a preset
#[derive(Debug, Clone, PartialEq)]
pub struct PresetItem {
    pub catalog_id: String,
    pub x: f32,
    pub y: f32,
}

/// A pre-configured room with starting furniture
#[derive(Debug, Clone)]
pub struct RoomPreset {
    pub id: String,
    pub name: String,
    pub square: bool,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    pub wall_color: String,
    pub floor_color: String,
    pub accent_color: String,
    pub furniture: Vec<PresetItem>,
}

/// Named wall/floor/accent palette for the room panel
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub id: String,
    pub name: String,
    pub wall_color: String,
    pub floor_color: String,
    pub accent_color: String,
}

type PresetRow = (
    &'static str,
    &'static str,
    bool,
    [f32; 3],
    [&'static str; 3],
    &'static [(&'static str, f32, f32)],
);

const PRESETS: &[PresetRow] = &[
    (
        "kitchen",
        "Kitchen",
        false,
        [350.0, 300.0, 260.0],
        ["#FFF8E1", "#D2B48C", "#FFB300"],
        &[("table-1", 175.0, 150.0), ("chair-1", 110.0, 90.0), ("chair-1", 240.0, 90.0), ("cabinet-2", 300.0, 260.0)],
    ),
    (
        "bedroom",
        "Bedroom",
        false,
        [420.0, 350.0, 250.0],
        ["#E1F5FE", "#DCEDC8", "#F06292"],
        &[("bed-1", 210.0, 140.0), ("cabinet-1", 60.0, 290.0)],
    ),
    (
        "living-room",
        "Living Room",
        false,
        [500.0, 400.0, 280.0],
        ["#F5F5F5", "#D2B48C", "#FF7043"],
        &[("sofa-1", 110.0, 100.0), ("table-2", 250.0, 120.0), ("cabinet-2", 400.0, 350.0)],
    ),
    (
        "office",
        "Office",
        true,
        [350.0, 350.0, 250.0],
        ["#E0F7FA", "#607D8B", "#29B6F6"],
        &[("table-1", 175.0, 175.0), ("chair-2", 175.0, 115.0), ("cabinet-1", 60.0, 300.0)],
    ),
    (
        "dining-room",
        "Dining Room",
        false,
        [450.0, 350.0, 260.0],
        ["#FFF8E1", "#8B4513", "#D84315"],
        &[
            ("table-1", 225.0, 175.0),
            ("chair-1", 160.0, 115.0),
            ("chair-1", 290.0, 115.0),
            ("chair-1", 160.0, 235.0),
            ("chair-1", 290.0, 235.0),
        ],
    ),
    (
        "guest-room",
        "Guest Room",
        false,
        [400.0, 320.0, 250.0],
        ["#E1F5FE", "#CFD8DC", "#81C784"],
        &[("bed-1", 200.0, 140.0), ("cabinet-1", 330.0, 270.0)],
    ),
];

pub fn builtin_presets() -> Vec<RoomPreset> {
    PRESETS
        .iter()
        .map(|(id, name, square, [w, d, h], [wall, floor, accent], items)| RoomPreset {
            id: id.to_string(),
            name: name.to_string(),
            square: *square,
            width: *w,
            depth: *d,
            height: *h,
            wall_color: wall.to_string(),
            floor_color: floor.to_string(),
            accent_color: accent.to_string(),
            furniture: items
                .iter()
                .map(|(catalog_id, x, y)| PresetItem {
                    catalog_id: catalog_id.to_string(),
                    x: *x,
                    y: *y,
                })
                .collect(),
        })
        .collect()
}

const SCHEMES: &[(&str, &str, [&str; 3])] = &[
    ("neutral", "Neutral", ["#F5F5DC", "#D2B48C", "#8B4513"]),
    ("modern", "Modern", ["#F8F8FF", "#A9A9A9", "#4682B4"]),
    ("warm", "Warm", ["#FFF8DC", "#8B4513", "#CD853F"]),
    ("cool", "Cool", ["#E0FFFF", "#708090", "#4169E1"]),
    ("vibrant", "Vibrant", ["#FFFFFF", "#2F4F4F", "#FF4500"]),
];

pub fn builtin_color_schemes() -> Vec<ColorScheme> {
    SCHEMES
        .iter()
        .map(|(id, name, [wall, floor, accent])| ColorScheme {
            id: id.to_string(),
            name: name.to_string(),
            wall_color: wall.to_string(),
            floor_color: floor.to_string(),
            accent_color: accent.to_string(),
        })
        .collect()
}
