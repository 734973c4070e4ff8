//! Catalog panel and the tabbed property panel

use super::{ApplyScope, EditorAction, PanelTab, ViewMode};
use crate::app::AppState;
use crate::catalog::Category;
use crate::design::{Room, RoomPatch, RoomShape, TextureRef};
use crate::rasterizer::Color as RasterColor;
use crate::ui::{
    button, draw_label, slider, stepper, swatch, toggle_button, Rect, UiContext, DANGER_COLOR, FONT_SIZE_CONTENT,
    ROW_GAP, ROW_HEIGHT, TEXT_COLOR, TEXT_DIM,
};
use macroquad::prelude::*;

pub const MIN_ROOM_SIDE: f32 = 200.0;
pub const MAX_ROOM_SIDE: f32 = 1500.0;
pub const ROOM_SIDE_STEP: f32 = 25.0;
pub const MIN_ROOM_HEIGHT: f32 = 200.0;
pub const MAX_ROOM_HEIGHT: f32 = 450.0;
pub const ROOM_HEIGHT_STEP: f32 = 10.0;

/// Colors offered for a selected item, besides its catalog default
const ITEM_COLORS: [(&str, &str); 10] = [
    ("#8B4513", "Walnut"),
    ("#D2B48C", "Oak"),
    ("#F5F5DC", "Cream"),
    ("#FFFFFF", "White"),
    ("#2F2F2F", "Charcoal"),
    ("#808080", "Gray"),
    ("#4682B4", "Steel blue"),
    ("#2E8B57", "Sea green"),
    ("#B22222", "Brick"),
    ("#DAA520", "Mustard"),
];

/// Top-down row cursor inside a panel
struct Rows {
    area: Rect,
    y: f32,
}

impl Rows {
    fn new(area: Rect) -> Self {
        Self { y: area.y, area }
    }

    fn next(&mut self, height: f32) -> Rect {
        let rect = self.area.row_at(self.y, height);
        self.y += height + ROW_GAP;
        rect
    }

    fn row(&mut self) -> Rect {
        self.next(ROW_HEIGHT)
    }

    fn heading(&mut self, text: &str) {
        self.y += ROW_GAP;
        let rect = self.next(18.0);
        draw_text(text, rect.x, rect.bottom() - 4.0, FONT_SIZE_CONTENT, TEXT_COLOR);
    }

    fn note(&mut self, text: &str) {
        draw_label(self.row(), text, TEXT_DIM);
    }
}

fn swatch_color(hex: &str) -> RasterColor {
    RasterColor::from_hex_or(hex, RasterColor::FALLBACK_GRAY)
}

/// Patch for a shape change. Square rooms take the width as depth.
pub fn shape_patch(room: &Room, shape: RoomShape) -> RoomPatch {
    RoomPatch {
        shape: Some(shape),
        depth: (shape == RoomShape::Square).then_some(room.width),
        ..Default::default()
    }
}

/// Patch for a new width, keeping square rooms square
pub fn width_patch(room: &Room, width: f32) -> RoomPatch {
    RoomPatch {
        width: Some(width),
        depth: (room.shape == RoomShape::Square).then_some(width),
        ..Default::default()
    }
}

// =============================================================================
// Catalog
// =============================================================================

pub fn draw_catalog_panel(ctx: &mut UiContext, area: Rect, app: &AppState) -> Vec<EditorAction> {
    let mut actions = Vec::new();
    let mut rows = Rows::new(area);

    for pair in Category::ALL.chunks(3) {
        let cols = rows.row().columns(3, ROW_GAP);
        for (category, rect) in pair.iter().zip(cols) {
            if toggle_button(ctx, rect, category.label(), app.category == *category) {
                actions.push(EditorAction::SetCategory(*category));
            }
        }
    }

    rows.heading("Click to place in the room");
    for entry in app.design.catalog().by_category(app.category) {
        let row = rows.next(ROW_HEIGHT + 8.0);
        let (chip, rest) = row.split_h_px(row.h);
        swatch(ctx, chip.pad(3.0), swatch_color(&entry.default_color), false, "");
        let d = entry.dimensions;
        let label = format!("{}  ({:.0}x{:.0})", entry.name, d.width, d.depth);
        if button(ctx, rest.pad_sides(ROW_GAP, 0.0, 0.0, 0.0), &label) {
            actions.push(EditorAction::AddFurniture(entry.id.clone()));
        }
    }
    actions
}

// =============================================================================
// Properties
// =============================================================================

pub fn draw_properties_panel(ctx: &mut UiContext, area: Rect, app: &AppState) -> Vec<EditorAction> {
    let mut actions = Vec::new();
    let mut rows = Rows::new(area);

    let tabs = rows.row().columns(PanelTab::ALL.len(), 2.0);
    for (tab, rect) in PanelTab::ALL.iter().zip(tabs) {
        if toggle_button(ctx, rect, tab.label(), app.tab == *tab) {
            actions.push(EditorAction::SetTab(*tab));
        }
    }
    rows.y += ROW_GAP;

    match app.tab {
        PanelTab::Room => room_tab(ctx, &mut rows, app, &mut actions),
        PanelTab::Item => item_tab(ctx, &mut rows, app, &mut actions),
        PanelTab::Shading => shading_tab(ctx, &mut rows, app, &mut actions),
        PanelTab::Texture => texture_tab(ctx, &mut rows, app, &mut actions),
    }
    actions
}

fn room_tab(ctx: &mut UiContext, rows: &mut Rows, app: &AppState, actions: &mut Vec<EditorAction>) {
    let room = &app.design.design().room;
    let catalog = app.design.catalog();

    rows.heading("Presets");
    for pair in catalog.room_presets().chunks(2) {
        let cols = rows.row().columns(2, ROW_GAP);
        for (preset, rect) in pair.iter().zip(cols) {
            if button(ctx, rect, &preset.name) {
                actions.push(EditorAction::ApplyPreset(preset.id.clone()));
            }
        }
    }

    rows.heading("Shape");
    let cols = rows.row().columns(RoomShape::ALL.len(), ROW_GAP);
    for (shape, rect) in RoomShape::ALL.iter().zip(cols) {
        if toggle_button(ctx, rect, shape.label(), room.shape == *shape) && room.shape != *shape {
            actions.push(EditorAction::UpdateRoom(shape_patch(room, *shape)));
        }
    }

    rows.heading("Size (cm)");
    if let Some(w) = stepper(ctx, rows.row(), "Width", room.width, ROOM_SIDE_STEP, MIN_ROOM_SIDE, MAX_ROOM_SIDE) {
        actions.push(EditorAction::UpdateRoom(width_patch(room, w)));
    }
    if room.shape != RoomShape::Square {
        if let Some(d) = stepper(ctx, rows.row(), "Depth", room.depth, ROOM_SIDE_STEP, MIN_ROOM_SIDE, MAX_ROOM_SIDE)
        {
            actions.push(EditorAction::UpdateRoom(RoomPatch {
                depth: Some(d),
                ..Default::default()
            }));
        }
    }
    if let Some(h) = stepper(
        ctx,
        rows.row(),
        "Height",
        room.height,
        ROOM_HEIGHT_STEP,
        MIN_ROOM_HEIGHT,
        MAX_ROOM_HEIGHT,
    ) {
        actions.push(EditorAction::UpdateRoom(RoomPatch {
            height: Some(h),
            ..Default::default()
        }));
    }

    rows.heading("Color scheme");
    let schemes = catalog.color_schemes();
    for chunk in schemes.chunks(6) {
        let cols = rows.next(28.0).columns(6, ROW_GAP);
        for (scheme, rect) in chunk.iter().zip(cols) {
            let active = room.wall_color.eq_ignore_ascii_case(&scheme.wall_color)
                && room.floor_color.eq_ignore_ascii_case(&scheme.floor_color);
            let (wall, floor) = (rect.slice_top(rect.h * 0.6), rect.remaining_after_top(rect.h * 0.6));
            swatch(ctx, floor, swatch_color(&scheme.floor_color), false, "");
            if swatch(ctx, wall, swatch_color(&scheme.wall_color), active, &scheme.name).clicked {
                actions.push(EditorAction::ApplyColorScheme(scheme.id.clone()));
            }
        }
    }
}

fn item_tab(ctx: &mut UiContext, rows: &mut Rows, app: &AppState, actions: &mut Vec<EditorAction>) {
    let Some(item) = app.design.selected_furniture() else {
        rows.note("Select an item in the plan or 3D view");
        return;
    };
    let entry = app.design.catalog().get(&item.catalog_id);
    rows.heading(entry.map(|e| e.name.as_str()).unwrap_or(item.catalog_id.as_str()));
    rows.note(&format!("Position {:.0}, {:.0} cm", item.x, item.y));
    rows.note(&format!("Rotation {:.0} deg, scale {:.1}x", item.rotation, item.scale));

    let cols = rows.row().columns(2, ROW_GAP);
    if button(ctx, cols[0], "Rotate left") {
        actions.push(EditorAction::RotateSelected { clockwise: false });
    }
    if button(ctx, cols[1], "Rotate right") {
        actions.push(EditorAction::RotateSelected { clockwise: true });
    }
    let cols = rows.row().columns(2, ROW_GAP);
    if button(ctx, cols[0], "Smaller") {
        actions.push(EditorAction::ScaleSelected { grow: false });
    }
    if button(ctx, cols[1], "Larger") {
        actions.push(EditorAction::ScaleSelected { grow: true });
    }

    rows.heading("Color");
    for chunk in ITEM_COLORS.chunks(5) {
        let cols = rows.next(26.0).columns(5, ROW_GAP);
        for ((hex, name), rect) in chunk.iter().zip(cols) {
            let active = item.color.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(hex));
            if swatch(ctx, rect, swatch_color(hex), active, name).clicked {
                actions.push(EditorAction::SetItemColor(Some(hex.to_string())));
            }
        }
    }
    if button(ctx, rows.row(), "Catalog default") {
        actions.push(EditorAction::SetItemColor(None));
    }

    rows.y += ROW_GAP * 2.0;
    let remove = rows.row();
    draw_rectangle(remove.x, remove.y, remove.w, remove.h, DANGER_COLOR);
    if button(ctx, remove.pad(1.0), "Remove item") {
        actions.push(EditorAction::RemoveSelected);
    }
}

fn scope_row(ctx: &mut UiContext, rows: &mut Rows, scope: ApplyScope, actions: &mut Vec<EditorAction>) {
    let cols = rows.row().columns(2, ROW_GAP);
    for (s, rect) in [ApplyScope::Selected, ApplyScope::All].iter().zip(cols) {
        if toggle_button(ctx, rect, s.label(), scope == *s) && scope != *s {
            actions.push(EditorAction::SetScope(*s));
        }
    }
}

fn apply_cancel_row(
    ctx: &mut UiContext,
    rows: &mut Rows,
    pending: bool,
    apply: EditorAction,
    actions: &mut Vec<EditorAction>,
) {
    let cols = rows.row().columns(2, ROW_GAP);
    if toggle_button(ctx, cols[0], "Apply", pending) && pending {
        actions.push(apply);
    }
    if button(ctx, cols[1], "Cancel") && pending {
        actions.push(EditorAction::CancelPreview);
    }
}

fn preview_hint(rows: &mut Rows, app: &AppState) {
    if app.view_mode != ViewMode::Scene {
        rows.note("Previews show in the 3D view");
    }
}

fn shading_tab(ctx: &mut UiContext, rows: &mut Rows, app: &AppState, actions: &mut Vec<EditorAction>) {
    let design = app.design.design();

    let enabled = design.shading_enabled;
    if toggle_button(ctx, rows.row(), if enabled { "Shading on" } else { "Shading off" }, enabled) {
        actions.push(EditorAction::SetShadingEnabled(!enabled));
    }

    rows.heading(&format!("Global level {:.0}%", design.global_shading_level * 100.0));
    if let Some(v) = slider(ctx, rows.row(), design.global_shading_level, 0.0, 1.0) {
        actions.push(EditorAction::SetGlobalShading(v));
    }

    rows.heading("Custom level");
    scope_row(ctx, rows, app.scope, actions);
    let committed = match (app.scope, app.design.selected()) {
        (ApplyScope::Selected, Some(id)) => app.design.effective_shading(id),
        _ => design.global_shading_level,
    };
    let shown = app.shading.level().unwrap_or(committed);
    rows.note(&format!("{:.0}%{}", shown * 100.0, if app.shading.is_pending() { " (preview)" } else { "" }));
    if let Some(v) = slider(ctx, rows.row(), shown, 0.0, 1.0) {
        actions.push(EditorAction::PreviewShading(v));
    }
    apply_cancel_row(ctx, rows, app.shading.is_pending(), EditorAction::ApplyShading, actions);
    preview_hint(rows, app);

    rows.y += ROW_GAP;
    if app.design.selected().is_some() && button(ctx, rows.row(), "Clear item override") {
        actions.push(EditorAction::ClearItemShading);
    }
    if button(ctx, rows.row(), "Reset all shading") {
        actions.push(EditorAction::ResetShading);
    }
}

fn texture_tab(ctx: &mut UiContext, rows: &mut Rows, app: &AppState, actions: &mut Vec<EditorAction>) {
    let design = app.design.design();
    let catalog = app.design.catalog();

    let global = design
        .global_texture
        .as_ref()
        .map(|t| catalog.texture(&t.id).map_or(t.id.as_str(), |d| d.name.as_str()))
        .unwrap_or("none");
    rows.note(&format!("Global texture: {}", global));

    scope_row(ctx, rows, app.scope, actions);
    let committed = match (app.scope, app.design.selected()) {
        (ApplyScope::Selected, Some(id)) => app.design.effective_texture(id, false).map(|t| t.id.clone()),
        _ => design.global_texture.as_ref().map(|t| t.id.clone()),
    };
    let shown = app.texture.texture().map(|t| t.id.clone()).or(committed);

    for chunk in catalog.textures().chunks(4) {
        let cols = rows.next(36.0).columns(4, ROW_GAP);
        for (texture, rect) in chunk.iter().zip(cols) {
            let active = shown.as_deref() == Some(texture.id.as_str());
            if swatch(ctx, rect, swatch_color(&texture.color), active, &texture.name).clicked {
                actions.push(EditorAction::PreviewTexture(TextureRef::new(
                    texture.id.clone(),
                    texture.path.clone(),
                    texture.color.clone(),
                )));
            }
        }
    }
    apply_cancel_row(ctx, rows, app.texture.is_pending(), EditorAction::ApplyTexture, actions);
    preview_hint(rows, app);

    rows.y += ROW_GAP;
    if app.design.selected().is_some() && button(ctx, rows.row(), "Clear item texture") {
        actions.push(EditorAction::ClearItemTexture);
    }
    if button(ctx, rows.row(), "Reset all textures") {
        actions.push(EditorAction::ResetTextures);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_shape_copies_width() {
        let room = Room::default();
        let patch = shape_patch(&room, RoomShape::Square);
        assert_eq!(patch.depth, Some(500.0));
        assert_eq!(patch.shape, Some(RoomShape::Square));

        let patch = shape_patch(&room, RoomShape::LShaped);
        assert_eq!(patch.depth, None);
    }

    #[test]
    fn test_square_width_keeps_depth_in_step() {
        let mut room = Room::default();
        assert_eq!(width_patch(&room, 600.0).depth, None);
        room.shape = RoomShape::Square;
        assert_eq!(width_patch(&room, 600.0).depth, Some(600.0));
    }
}
