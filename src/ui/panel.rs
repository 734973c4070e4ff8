//! Panels and draggable splits

use super::{Rect, UiContext, BORDER_COLOR, DIVIDER_ACTIVE, HEADER_COLOR, TEXT_COLOR};
use macroquad::prelude::*;

pub const PANEL_TITLE_HEIGHT: f32 = 22.0;

/// Left and right children with a draggable divider between them
#[derive(Debug, Clone)]
pub struct SplitPanel {
    pub id: u64,
    pub ratio: f32,
    /// Minimum size in pixels for each side
    pub min_size: f32,
    pub divider_size: f32,
}

impl SplitPanel {
    pub fn horizontal(id: u64) -> Self {
        Self {
            id,
            ratio: 0.5,
            min_size: 50.0,
            divider_size: 4.0,
        }
    }

    pub fn with_ratio(mut self, ratio: f32) -> Self {
        self.ratio = ratio.clamp(0.0, 1.0);
        self
    }

    pub fn with_min_size(mut self, min_size: f32) -> Self {
        self.min_size = min_size;
        self
    }

    /// Process divider dragging, draw it and return the child rects.
    /// Split ids live in a separate range from positional widget ids.
    pub fn update(&mut self, ctx: &mut UiContext, bounds: Rect) -> (Rect, Rect) {
        let divider = self.divider_rect(bounds);

        if ctx.dragging.is_none() && ctx.mouse.inside(&divider) {
            ctx.set_hot(self.id);
            if ctx.mouse.left_pressed {
                ctx.start_drag(self.id);
            }
        }

        if ctx.is_dragging(self.id) {
            self.ratio = self.clamp_ratio((ctx.mouse.x - bounds.x) / bounds.w, bounds.w);
        }

        let color = if ctx.is_hot(self.id) || ctx.is_dragging(self.id) {
            DIVIDER_ACTIVE
        } else {
            BORDER_COLOR
        };
        let divider = self.divider_rect(bounds);
        draw_rectangle(divider.x, divider.y, divider.w, divider.h, color);

        self.child_rects(bounds)
    }

    fn clamp_ratio(&self, ratio: f32, total: f32) -> f32 {
        if total <= self.min_size * 2.0 {
            return 0.5;
        }
        let min_ratio = self.min_size / total;
        ratio.clamp(min_ratio, 1.0 - min_ratio)
    }

    fn divider_rect(&self, bounds: Rect) -> Rect {
        let x = bounds.x + bounds.w * self.ratio - self.divider_size * 0.5;
        Rect::new(x, bounds.y, self.divider_size, bounds.h)
    }

    fn child_rects(&self, bounds: Rect) -> (Rect, Rect) {
        let half_div = self.divider_size * 0.5;
        let split = bounds.w * self.ratio;
        (
            Rect::new(bounds.x, bounds.y, (split - half_div).max(0.0), bounds.h),
            Rect::new(bounds.x + split + half_div, bounds.y, (bounds.w - split - half_div).max(0.0), bounds.h),
        )
    }
}

pub fn draw_panel(rect: Rect, title: Option<&str>, bg_color: Color) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, bg_color);
    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, BORDER_COLOR);

    if let Some(title) = title {
        draw_rectangle(rect.x, rect.y, rect.w, PANEL_TITLE_HEIGHT, HEADER_COLOR);
        draw_text(title, rect.x + 6.0, rect.y + 15.0, 16.0, TEXT_COLOR);
    }
}

/// Content area of a panel, below the title bar
pub fn panel_content_rect(rect: Rect, has_title: bool) -> Rect {
    if has_title {
        rect.remaining_after_top(PANEL_TITLE_HEIGHT).pad(4.0)
    } else {
        rect.pad(4.0)
    }
}
