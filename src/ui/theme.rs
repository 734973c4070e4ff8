//! Shared colors and sizes for the editor panels

use macroquad::prelude::Color;

// =============================================================================
// Surfaces
// =============================================================================

pub const BG_COLOR: Color = Color::new(0.94, 0.94, 0.95, 1.0);
pub const PANEL_BG: Color = Color::new(0.98, 0.98, 0.99, 1.0);
pub const HEADER_COLOR: Color = Color::new(0.88, 0.89, 0.91, 1.0);
pub const TOOLBAR_BG: Color = Color::new(0.16, 0.18, 0.22, 1.0);
pub const STATUS_BG: Color = Color::new(0.90, 0.91, 0.93, 1.0);
pub const BORDER_COLOR: Color = Color::new(0.78, 0.79, 0.82, 1.0);
pub const DIVIDER_ACTIVE: Color = Color::new(0.15, 0.39, 0.92, 1.0);

// =============================================================================
// Text
// =============================================================================

pub const TEXT_COLOR: Color = Color::new(0.12, 0.13, 0.16, 1.0);
pub const TEXT_DIM: Color = Color::new(0.45, 0.47, 0.52, 1.0);
pub const TEXT_ON_DARK: Color = Color::new(0.93, 0.94, 0.96, 1.0);
pub const TEXT_ERROR: Color = Color::new(0.75, 0.15, 0.15, 1.0);

pub const FONT_SIZE_HEADER: f32 = 16.0;
pub const FONT_SIZE_CONTENT: f32 = 14.0;
pub const FONT_SIZE_SMALL: f32 = 12.0;

// =============================================================================
// Controls
// =============================================================================

/// Selection blue, shared with the plan outline and the 3D marker
pub const ACCENT_COLOR: Color = Color::new(0.145, 0.388, 0.922, 1.0);
pub const BUTTON_BG: Color = Color::new(0.86, 0.87, 0.90, 1.0);
pub const BUTTON_HOVER: Color = Color::new(0.80, 0.82, 0.86, 1.0);
pub const BUTTON_PRESSED: Color = Color::new(0.72, 0.75, 0.80, 1.0);
pub const TOOLBAR_BUTTON_HOVER: Color = Color::new(0.26, 0.29, 0.35, 1.0);
pub const DANGER_COLOR: Color = Color::new(0.80, 0.20, 0.20, 1.0);
pub const SLIDER_TRACK: Color = Color::new(0.80, 0.81, 0.84, 1.0);

pub const ROW_HEIGHT: f32 = 24.0;
pub const ROW_GAP: f32 = 4.0;
