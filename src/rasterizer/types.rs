//! Core raster types: colors, textures, meshes, materials and lights

use super::math::{Vec2, Vec3};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };
    /// Selection blue shared by both views
    pub const SELECTION: Color = Color { r: 0x25, g: 0x63, b: 0xEB };
    /// Stand-in for colors that would vanish against a white canvas
    pub const FALLBACK_GRAY: Color = Color { r: 0xA3, g: 0xA3, b: 0xA3 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB`, `#RRGGBB` or one of a few CSS color names
    pub fn from_hex(s: &str) -> Option<Color> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "white" => return Some(Color::WHITE),
            "black" => return Some(Color::BLACK),
            "gray" | "grey" => return Some(Color::new(128, 128, 128)),
            "red" => return Some(Color::new(255, 0, 0)),
            "green" => return Some(Color::new(0, 128, 0)),
            "blue" => return Some(Color::new(0, 0, 255)),
            _ => {}
        }

        let hex = s.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize, len: usize| u8::from_str_radix(&hex[i..i + len], 16).ok();
        match hex.len() {
            3 => {
                let r = channel(0, 1)?;
                let g = channel(1, 1)?;
                let b = channel(2, 1)?;
                Some(Color::new(r * 17, g * 17, b * 17))
            }
            6 => Some(Color::new(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
            _ => None,
        }
    }

    /// Parse, or use `fallback` when the string is not a color
    pub fn from_hex_or(s: &str, fallback: Color) -> Color {
        Self::from_hex(s).unwrap_or(fallback)
    }

    /// Multiply by intensity; values above 1 brighten and saturate
    pub fn shade(self, intensity: f32) -> Self {
        let i = intensity.max(0.0);
        Self {
            r: (self.r as f32 * i).min(255.0) as u8,
            g: (self.g as f32 * i).min(255.0) as u8,
            b: (self.b as f32 * i).min(255.0) as u8,
        }
    }

    /// Channel-wise product, used for texture tinting
    pub fn modulate(self, tint: Color) -> Self {
        Self {
            r: ((self.r as u16 * tint.r as u16) / 255) as u8,
            g: ((self.g as u16 * tint.g as u16) / 255) as u8,
            b: ((self.b as u16 * tint.b as u16) / 255) as u8,
        }
    }

    /// Add `amount` of white light
    pub fn add_white(self, amount: f32) -> Self {
        let add = (amount.max(0.0) * 255.0) as u16;
        Self {
            r: (self.r as u16 + add).min(255) as u8,
            g: (self.g as u16 + add).min(255) as u8,
            b: (self.b as u16 + add).min(255) as u8,
        }
    }

    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let inv_t = 1.0 - t;
        Self {
            r: (self.r as f32 * inv_t + other.r as f32 * t) as u8,
            g: (self.g as f32 * inv_t + other.g as f32 * t) as u8,
            b: (self.b as f32 * inv_t + other.b as f32 * t) as u8,
        }
    }

    /// RGBA bytes for the framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// RGBA texture sampled with repeat wrapping
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
}

impl Texture {
    #[cfg(test)]
    pub fn new_filled(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    /// Build from tightly packed RGBA8 data. Returns None on a size mismatch.
    pub fn from_rgba(width: usize, height: usize, rgba: &[u8]) -> Option<Self> {
        if width == 0 || height == 0 || rgba.len() != width * height * 4 {
            return None;
        }
        let pixels = rgba
            .chunks_exact(4)
            .map(|p| Color::new(p[0], p[1], p[2]))
            .collect();
        Some(Self { width, height, pixels })
    }

    /// Nearest sample with wrap-around
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let u = u - u.floor();
        let v = v - v.floor();
        let x = ((u * self.width as f32) as usize).min(self.width - 1);
        let y = ((v * self.height as f32) as usize).min(self.height - 1);
        self.pixels[y * self.width + x]
    }

    #[cfg(test)]
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }
}

/// Mesh vertex
#[derive(Debug, Clone, Copy, Default)]
pub struct Vertex {
    pub pos: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(pos: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self { pos, uv, normal }
    }
}

/// Triangle by vertex index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
}

impl Face {
    pub fn new(v0: usize, v1: usize, v2: usize) -> Self {
        Self { v0, v1, v2 }
    }
}

/// Surface parameters consumed by the rasterizer
#[derive(Debug, Clone)]
pub struct Material {
    pub color: Color,
    pub texture: Option<std::rc::Rc<Texture>>,
    pub roughness: f32,
    pub metalness: f32,
    /// 1.0 = opaque. Translucent surfaces test depth but do not write it.
    pub opacity: f32,
    pub double_sided: bool,
    /// Skip lighting entirely
    pub unlit: bool,
}

impl Material {
    pub fn standard(color: Color, roughness: f32, metalness: f32) -> Self {
        Self {
            color,
            texture: None,
            roughness: roughness.clamp(0.0, 1.0),
            metalness: metalness.clamp(0.0, 1.0),
            opacity: 1.0,
            double_sided: false,
            unlit: false,
        }
    }

    pub fn basic(color: Color, opacity: f32) -> Self {
        Self {
            color,
            texture: None,
            roughness: 1.0,
            metalness: 0.0,
            opacity: opacity.clamp(0.0, 1.0),
            double_sided: true,
            unlit: true,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::standard(Color::WHITE, 0.5, 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Direction the light travels, normalized
    pub direction: Vec3,
    pub intensity: f32,
}

impl Light {
    /// Light shining from `position` toward the origin
    pub fn directional_from(position: Vec3, intensity: f32) -> Self {
        Self {
            direction: (Vec3::ZERO - position).normalize(),
            intensity,
        }
    }
}

/// Scene-wide lighting
#[derive(Debug, Clone)]
pub struct RasterSettings {
    pub ambient: f32,
    pub lights: Vec<Light>,
    pub background: Color,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            ambient: 0.6,
            lights: vec![Light::directional_from(Vec3::new(1.0, 1.0, 1.0), 0.8)],
            background: Color::new(0xF0, 0xF0, 0xF0),
        }
    }
}
