//! Basic widgets: buttons, sliders, steppers, swatches

use super::{
    Rect, UiContext, ACCENT_COLOR, BORDER_COLOR, BUTTON_BG, BUTTON_HOVER, BUTTON_PRESSED, FONT_SIZE_CONTENT,
    FONT_SIZE_SMALL, SLIDER_TRACK, TEXT_COLOR, TEXT_DIM, TEXT_ON_DARK, TOOLBAR_BG, TOOLBAR_BUTTON_HOVER,
};
use crate::rasterizer::Color as RasterColor;
use macroquad::prelude::*;

pub fn to_screen_color(c: RasterColor) -> Color {
    Color::from_rgba(c.r, c.g, c.b, 255)
}

/// Horizontal strip of text buttons, laid out left to right
pub struct Toolbar {
    rect: Rect,
    cursor_x: f32,
    spacing: f32,
}

impl Toolbar {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            cursor_x: rect.x + 6.0,
            spacing: 4.0,
        }
    }

    pub fn cursor_x(&self) -> f32 {
        self.cursor_x
    }

    pub fn separator(&mut self) {
        self.cursor_x += self.spacing * 2.0;
        draw_line(
            self.cursor_x,
            self.rect.y + 6.0,
            self.cursor_x,
            self.rect.bottom() - 6.0,
            1.0,
            TEXT_DIM,
        );
        self.cursor_x += self.spacing * 2.0;
    }

    pub fn label(&mut self, text: &str) {
        let dims = measure_text(text, None, FONT_SIZE_CONTENT as u16, 1.0);
        let text_y = (self.rect.y + (self.rect.h + dims.height) * 0.5).round();
        draw_text(text, self.cursor_x.round(), text_y, FONT_SIZE_CONTENT, TEXT_ON_DARK);
        self.cursor_x += dims.width + self.spacing;
    }

    fn next_rect(&mut self, width: f32) -> Rect {
        let rect = Rect::new(self.cursor_x.round(), (self.rect.y + 4.0).round(), width, self.rect.h - 8.0);
        self.cursor_x += width + self.spacing;
        rect
    }

    pub fn button(&mut self, ctx: &mut UiContext, label: &str, width: f32) -> bool {
        let rect = self.next_rect(width);
        dark_button(ctx, rect, label, false)
    }

    pub fn toggle(&mut self, ctx: &mut UiContext, label: &str, width: f32, active: bool) -> bool {
        let rect = self.next_rect(width);
        dark_button(ctx, rect, label, active)
    }
}

fn dark_button(ctx: &mut UiContext, rect: Rect, label: &str, active: bool) -> bool {
    let id = ctx.next_id();
    let hovered = ctx.mouse.inside(&rect);
    if hovered {
        ctx.set_hot(id);
    }
    if active {
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, ACCENT_COLOR);
    } else if hovered {
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, TOOLBAR_BUTTON_HOVER);
    }
    draw_centered_text(rect, label, FONT_SIZE_CONTENT, TEXT_ON_DARK);
    ctx.mouse.clicked(&rect) && ctx.dragging.is_none()
}

fn draw_centered_text(rect: Rect, text: &str, size: f32, color: Color) {
    let dims = measure_text(text, None, size as u16, 1.0);
    let x = (rect.center_x() - dims.width * 0.5).round();
    let y = (rect.center_y() + dims.offset_y * 0.5).round();
    draw_text(text, x, y, size, color);
}

pub fn draw_label(rect: Rect, text: &str, color: Color) {
    let y = (rect.center_y() + FONT_SIZE_CONTENT * 0.35).round();
    draw_text(text, rect.x.round(), y, FONT_SIZE_CONTENT, color);
}

/// Light push button. Returns true when clicked.
pub fn button(ctx: &mut UiContext, rect: Rect, label: &str) -> bool {
    toggle_button(ctx, rect, label, false)
}

/// Push button drawn in the accent color while `active`
pub fn toggle_button(ctx: &mut UiContext, rect: Rect, label: &str, active: bool) -> bool {
    let id = ctx.next_id();
    let hovered = ctx.mouse.inside(&rect);
    if hovered {
        ctx.set_hot(id);
    }
    let (bg, fg) = if active {
        (ACCENT_COLOR, WHITE)
    } else if ctx.mouse.clicking(&rect) {
        (BUTTON_PRESSED, TEXT_COLOR)
    } else if hovered {
        (BUTTON_HOVER, TEXT_COLOR)
    } else {
        (BUTTON_BG, TEXT_COLOR)
    };
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, bg);
    draw_centered_text(rect, label, FONT_SIZE_CONTENT, fg);
    ctx.mouse.clicked(&rect) && ctx.dragging.is_none()
}

/// Value for a mouse x position along a slider track
fn slider_value(rect: Rect, mouse_x: f32, min: f32, max: f32) -> f32 {
    if rect.w <= 0.0 {
        return min;
    }
    let t = ((mouse_x - rect.x) / rect.w).clamp(0.0, 1.0);
    min + (max - min) * t
}

/// Horizontal slider. Returns the new value while it is being dragged.
pub fn slider(ctx: &mut UiContext, rect: Rect, value: f32, min: f32, max: f32) -> Option<f32> {
    let id = ctx.next_id();
    if ctx.mouse.inside(&rect) {
        ctx.set_hot(id);
        if ctx.mouse.left_pressed && ctx.dragging.is_none() {
            ctx.start_drag(id);
        }
    }

    let track_y = rect.center_y() - 2.0;
    draw_rectangle(rect.x, track_y, rect.w, 4.0, SLIDER_TRACK);
    let t = if max > min { ((value - min) / (max - min)).clamp(0.0, 1.0) } else { 0.0 };
    draw_rectangle(rect.x, track_y, rect.w * t, 4.0, ACCENT_COLOR);
    draw_circle(rect.x + rect.w * t, rect.center_y(), 6.0, ACCENT_COLOR);

    if ctx.is_dragging(id) {
        let new_value = slider_value(rect, ctx.mouse.x, min, max);
        if new_value != value {
            return Some(new_value);
        }
    }
    None
}

fn stepped(value: f32, delta: f32, min: f32, max: f32) -> f32 {
    (value + delta).clamp(min, max)
}

/// `label  [-] value [+]`. Returns the stepped value when a button is hit.
pub fn stepper(
    ctx: &mut UiContext,
    rect: Rect,
    label: &str,
    value: f32,
    step: f32,
    min: f32,
    max: f32,
) -> Option<f32> {
    let (label_rect, controls) = rect.split_h(0.45);
    draw_label(label_rect, label, TEXT_DIM);

    let cols = controls.columns(3, 2.0);
    let mut result = None;
    if button(ctx, cols[0], "-") {
        result = Some(stepped(value, -step, min, max));
    }
    draw_centered_text(cols[1], &format!("{:.0}", value), FONT_SIZE_CONTENT, TEXT_COLOR);
    if button(ctx, cols[2], "+") {
        result = Some(stepped(value, step, min, max));
    }
    result.filter(|v| *v != value)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SwatchResponse {
    pub hovered: bool,
    pub clicked: bool,
}

/// Color chip with an accent ring when `selected`
pub fn swatch(ctx: &mut UiContext, rect: Rect, color: RasterColor, selected: bool, tooltip: &str) -> SwatchResponse {
    let id = ctx.next_id();
    let hovered = ctx.mouse.inside(&rect);
    if hovered {
        ctx.set_hot(id);
        if !tooltip.is_empty() {
            ctx.set_tooltip(tooltip, ctx.mouse.x, ctx.mouse.y);
        }
    }
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, to_screen_color(color));
    let ring = if selected { ACCENT_COLOR } else if hovered { TEXT_DIM } else { BORDER_COLOR };
    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, if selected { 3.0 } else { 1.0 }, ring);

    SwatchResponse {
        hovered,
        clicked: ctx.mouse.clicked(&rect) && ctx.dragging.is_none(),
    }
}

/// Draw the tooltip queued this frame, if any. Call last.
pub fn draw_tooltip(ctx: &UiContext) {
    let Some((text, x, y)) = ctx.tooltip() else {
        return;
    };
    let dims = measure_text(text, None, FONT_SIZE_SMALL as u16, 1.0);
    let (w, h) = (dims.width + 10.0, 20.0);
    let x = (x + 12.0).min(screen_width() - w);
    let y = (y + 16.0).min(screen_height() - h);
    draw_rectangle(x, y, w, h, TOOLBAR_BG);
    draw_text(text, x + 5.0, y + 14.0, FONT_SIZE_SMALL, TEXT_ON_DARK);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_maps_track_to_range() {
        let rect = Rect::new(100.0, 0.0, 200.0, 20.0);
        assert_eq!(slider_value(rect, 100.0, 0.0, 1.0), 0.0);
        assert_eq!(slider_value(rect, 200.0, 0.0, 1.0), 0.5);
        assert_eq!(slider_value(rect, 900.0, 0.0, 1.0), 1.0);
        assert_eq!(slider_value(Rect::default(), 50.0, 0.2, 1.0), 0.2);
    }

    #[test]
    fn test_stepper_clamps() {
        assert_eq!(stepped(300.0, 10.0, 100.0, 2000.0), 310.0);
        assert_eq!(stepped(105.0, -10.0, 100.0, 2000.0), 100.0);
    }

    #[test]
    fn test_color_conversion() {
        let c = to_screen_color(RasterColor::WHITE);
        assert_eq!((c.r, c.g, c.b, c.a), (1.0, 1.0, 1.0, 1.0));
    }
}
