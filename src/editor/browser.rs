//! Design browser and rename dialogs
//!
//! Both are modal: while one is open the canvases and shortcuts are skipped.

use super::EditorAction;
use crate::design::Design;
use crate::ui::{
    button, draw_label, draw_panel, draw_text_input, panel_content_rect, toggle_button, Rect, TextInputOutcome,
    TextInputState, UiContext, ACCENT_COLOR, BORDER_COLOR, BUTTON_HOVER, FONT_SIZE_CONTENT, PANEL_BG, ROW_GAP,
    ROW_HEIGHT, TEXT_COLOR, TEXT_DIM,
};
use macroquad::prelude::*;

const DIM_OVERLAY: Color = Color::new(0.0, 0.0, 0.0, 0.35);
const LIST_ROW_HEIGHT: f32 = 40.0;

/// Designs fetched when the browser was opened
#[derive(Debug, Default)]
pub struct BrowserState {
    pub designs: Vec<Design>,
    /// List every owner's designs instead of only the current one
    pub show_all: bool,
    pub scroll: f32,
}

impl BrowserState {
    pub fn new(mut designs: Vec<Design>, show_all: bool) -> Self {
        // Most recently touched first
        designs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Self {
            designs,
            show_all,
            scroll: 0.0,
        }
    }

    fn max_scroll(&self, visible_height: f32) -> f32 {
        (self.designs.len() as f32 * LIST_ROW_HEIGHT - visible_height).max(0.0)
    }
}

/// One-line description shown under a design's name
pub fn design_summary(design: &Design) -> String {
    let items = design.furniture.len();
    format!(
        "{} item{}, {:.0} x {:.0} cm, {}",
        items,
        if items == 1 { "" } else { "s" },
        design.room.width,
        design.room.depth,
        design.owner,
    )
}

fn centered_dialog(width: f32, height: f32) -> Rect {
    let w = width.min(screen_width() - 20.0);
    let h = height.min(screen_height() - 20.0);
    Rect::new(
        ((screen_width() - w) * 0.5).round(),
        ((screen_height() - h) * 0.5).round(),
        w,
        h,
    )
}

pub fn draw_browser(ctx: &mut UiContext, browser: &mut BrowserState, current_id: Option<&str>) -> Vec<EditorAction> {
    let mut actions = Vec::new();
    draw_rectangle(0.0, 0.0, screen_width(), screen_height(), DIM_OVERLAY);

    let dialog = centered_dialog(480.0, 420.0);
    draw_panel(dialog, Some("Open Design"), PANEL_BG);
    let content = panel_content_rect(dialog, true);

    let header = content.slice_top(ROW_HEIGHT);
    let cols = header.columns(2, ROW_GAP);
    if toggle_button(ctx, cols[0], "Mine", !browser.show_all) && browser.show_all {
        actions.push(EditorAction::BrowserShowAll(false));
    }
    if toggle_button(ctx, cols[1], "All owners", browser.show_all) && !browser.show_all {
        actions.push(EditorAction::BrowserShowAll(true));
    }

    let footer = content.slice_bottom(ROW_HEIGHT);
    let list = content
        .remaining_after_top(ROW_HEIGHT + ROW_GAP)
        .remaining_after_bottom(ROW_HEIGHT + ROW_GAP);

    if ctx.mouse.inside(&list) && ctx.mouse.scroll != 0.0 {
        let max = browser.max_scroll(list.h);
        browser.scroll = (browser.scroll - ctx.mouse.scroll.signum() * LIST_ROW_HEIGHT).clamp(0.0, max);
    }

    draw_rectangle_lines(list.x, list.y, list.w, list.h, 1.0, BORDER_COLOR);
    if browser.designs.is_empty() {
        draw_label(list.pad(8.0).slice_top(ROW_HEIGHT), "No saved designs yet", TEXT_DIM);
    }

    for (i, design) in browser.designs.iter().enumerate() {
        let y = list.y + i as f32 * LIST_ROW_HEIGHT - browser.scroll;
        if y < list.y || y + LIST_ROW_HEIGHT > list.bottom() {
            continue;
        }
        let row = list.row_at(y, LIST_ROW_HEIGHT).pad(2.0);
        let Some(id) = design.id.as_deref() else {
            continue;
        };
        let is_current = current_id == Some(id);
        if is_current {
            draw_rectangle_lines(row.x, row.y, row.w, row.h, 2.0, ACCENT_COLOR);
        } else if ctx.mouse.inside(&row) {
            draw_rectangle(row.x, row.y, row.w, row.h, BUTTON_HOVER);
        }
        draw_text(&design.name, row.x + 6.0, row.y + 16.0, FONT_SIZE_CONTENT, TEXT_COLOR);
        draw_text(&design_summary(design), row.x + 6.0, row.y + 31.0, 12.0, TEXT_DIM);

        let open_rect = Rect::new(row.right() - 64.0, row.y + 6.0, 58.0, row.h - 12.0);
        if button(ctx, open_rect, "Open") {
            actions.push(EditorAction::LoadDesign(id.to_string()));
        }
    }

    let close_rect = Rect::new(footer.right() - 90.0, footer.y, 90.0, footer.h);
    if button(ctx, close_rect, "Close") {
        actions.push(EditorAction::CloseBrowser);
    }
    actions
}

pub fn draw_rename_dialog(ctx: &mut UiContext, input: &mut TextInputState) -> Vec<EditorAction> {
    let mut actions = Vec::new();
    draw_rectangle(0.0, 0.0, screen_width(), screen_height(), DIM_OVERLAY);

    let dialog = centered_dialog(360.0, 120.0);
    draw_panel(dialog, Some("Rename Design"), PANEL_BG);
    let content = panel_content_rect(dialog, true);

    let field = content.slice_top(28.0);
    match draw_text_input(field, input, FONT_SIZE_CONTENT) {
        TextInputOutcome::Submitted(name) => actions.push(EditorAction::Rename(name)),
        TextInputOutcome::Cancelled => actions.push(EditorAction::CancelRename),
        TextInputOutcome::Idle | TextInputOutcome::Changed => {}
    }

    let buttons = content.slice_bottom(ROW_HEIGHT);
    let cols = Rect::new(buttons.right() - 184.0, buttons.y, 184.0, buttons.h).columns(2, ROW_GAP);
    if button(ctx, cols[0], "Cancel") {
        actions.push(EditorAction::CancelRename);
    }
    if button(ctx, cols[1], "Rename") {
        actions.push(EditorAction::Rename(input.text.trim().to_string()));
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{FurnitureInstance, InstanceId};

    #[test]
    fn test_summary_pluralizes() {
        let mut design = Design::blank("alice");
        assert_eq!(design_summary(&design), "0 items, 500 x 400 cm, alice");
        design.furniture.push(FurnitureInstance::new(InstanceId(1), "chair-1", 10.0, 10.0));
        assert_eq!(design_summary(&design), "1 item, 500 x 400 cm, alice");
    }

    #[test]
    fn test_newest_first() {
        let mut old = Design::blank("u");
        old.updated_at = Some(10);
        let mut new = Design::blank("u");
        new.updated_at = Some(20);
        new.name = "Newer".to_string();
        let browser = BrowserState::new(vec![old, new], false);
        assert_eq!(browser.designs[0].name, "Newer");
    }

    #[test]
    fn test_scroll_limit() {
        let designs = (0..5).map(|_| Design::blank("u")).collect();
        let browser = BrowserState::new(designs, false);
        assert_eq!(browser.max_scroll(100.0), 100.0);
        assert_eq!(browser.max_scroll(400.0), 0.0);
    }
}
