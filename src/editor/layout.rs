//! Editor layout: toolbar, catalog | canvas | properties, status bar

use super::browser::{draw_browser, draw_rename_dialog};
use super::panels::{draw_catalog_panel, draw_properties_panel};
use super::viewport::{draw_plan_viewport, draw_scene_viewport};
use super::{EditorAction, ViewMode};
use crate::app::AppState;
use crate::view3d::LoadState;
use crate::ui::{
    draw_panel, panel_content_rect, MouseState, Rect, SplitPanel, Toolbar, UiContext, BG_COLOR, FONT_SIZE_SMALL,
    PANEL_BG, STATUS_BG, TEXT_COLOR, TEXT_DIM, TEXT_ERROR, TOOLBAR_BG,
};
use macroquad::prelude::*;

const TOOLBAR_HEIGHT: f32 = 34.0;
const STATUS_HEIGHT: f32 = 22.0;

/// Split panel ratios, kept across frames
pub struct EditorLayout {
    /// Catalog | canvas + properties
    pub main_split: SplitPanel,
    /// Canvas | properties
    pub right_split: SplitPanel,
}

impl EditorLayout {
    pub fn new() -> Self {
        Self {
            main_split: SplitPanel::horizontal(1).with_ratio(0.2).with_min_size(180.0),
            right_split: SplitPanel::horizontal(2).with_ratio(0.74).with_min_size(240.0),
        }
    }
}

impl Default for EditorLayout {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw the complete editor for this frame and collect what the user asked for
pub fn draw_editor(ctx: &mut UiContext, layout: &mut EditorLayout, app: &mut AppState) -> Vec<EditorAction> {
    let screen = Rect::screen(screen_width(), screen_height());
    clear_background(BG_COLOR);

    // A modal dialog owns the mouse; everything under it sees an idle one
    let modal = app.browser.is_some() || app.rename.is_some();
    let real_mouse = ctx.mouse;
    if modal {
        ctx.mouse = MouseState {
            x: -1.0,
            y: -1.0,
            ..Default::default()
        };
    }

    let toolbar_rect = screen.slice_top(TOOLBAR_HEIGHT);
    let main_rect = screen.remaining_after_top(TOOLBAR_HEIGHT);
    let status_rect = main_rect.slice_bottom(STATUS_HEIGHT);
    let panels_rect = main_rect.remaining_after_bottom(STATUS_HEIGHT);

    let mut actions = draw_toolbar(ctx, toolbar_rect, app);

    let (left_rect, rest_rect) = layout.main_split.update(ctx, panels_rect);
    let (center_rect, right_rect) = layout.right_split.update(ctx, rest_rect);

    draw_panel(left_rect, Some("Catalog"), PANEL_BG);
    actions.extend(draw_catalog_panel(ctx, panel_content_rect(left_rect, true), app));

    draw_panel(right_rect, Some("Properties"), PANEL_BG);
    actions.extend(draw_properties_panel(ctx, panel_content_rect(right_rect, true), app));

    let canvas = center_rect.pad(2.0);
    match app.view_mode {
        ViewMode::Plan => draw_plan_viewport(ctx, canvas, &mut app.design, &mut app.plan, &mut app.pointer),
        ViewMode::Scene => {
            if let Some(err) = draw_scene_viewport(ctx, canvas, &mut app.design, &mut app.scene, &mut app.gesture) {
                app.report_error(err);
            }
        }
    }

    draw_status_bar(status_rect, app);

    ctx.mouse = real_mouse;
    if let Some(browser) = app.browser.as_mut() {
        let current = app.design.design().id.clone();
        actions.extend(draw_browser(ctx, browser, current.as_deref()));
    } else if let Some(input) = app.rename.as_mut() {
        actions.extend(draw_rename_dialog(ctx, input));
    }
    actions
}

fn draw_toolbar(ctx: &mut UiContext, rect: Rect, app: &AppState) -> Vec<EditorAction> {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, TOOLBAR_BG);
    let mut actions = Vec::new();
    let mut toolbar = Toolbar::new(rect);

    if toolbar.button(ctx, "New", 48.0) {
        actions.push(EditorAction::NewDesign);
    }
    if toolbar.button(ctx, "Open", 52.0) {
        actions.push(EditorAction::OpenBrowser);
    }
    if toolbar.button(ctx, "Save", 52.0) {
        actions.push(EditorAction::Save);
    }
    if toolbar.button(ctx, "Rename", 66.0) {
        actions.push(EditorAction::BeginRename);
    }
    if app.design.design().id.is_some() && toolbar.button(ctx, "Delete", 60.0) {
        actions.push(EditorAction::DeleteDesign);
    }

    toolbar.separator();
    for mode in ViewMode::ALL {
        if toolbar.toggle(ctx, mode.label(), 72.0, app.view_mode == mode) && app.view_mode != mode {
            actions.push(EditorAction::SetViewMode(mode));
        }
    }

    toolbar.separator();
    if toolbar.button(ctx, "-", 28.0) {
        actions.push(EditorAction::ZoomOut);
    }
    if toolbar.button(ctx, "+", 28.0) {
        actions.push(EditorAction::ZoomIn);
    }

    toolbar.separator();
    let design = app.design.design();
    let dirty = if app.design.is_dirty() { " *" } else { "" };
    toolbar.label(&format!("{}{}", design.name, dirty));
    actions
}

fn draw_status_bar(rect: Rect, app: &AppState) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, STATUS_BG);
    let y = rect.y + 15.0;

    let color = if app.status.is_error { TEXT_ERROR } else { TEXT_COLOR };
    draw_text(&app.status.message, rect.x + 8.0, y, FONT_SIZE_SMALL, color);

    let design = app.design.design();
    let selection = match app.design.selected_furniture() {
        Some(item) if app.view_mode == ViewMode::Scene && app.scene.load_state(item.instance_id) == LoadState::Loading => {
            format!("selected {} {} (loading model)", item.catalog_id, item.instance_id)
        }
        Some(item) => format!("selected {} {}", item.catalog_id, item.instance_id),
        None => "no selection".to_string(),
    };
    let summary = format!(
        "{:.0} x {:.0} x {:.0} cm | {} items | {}",
        design.room.width,
        design.room.depth,
        design.room.height,
        design.furniture.len(),
        selection
    );
    let dims = measure_text(&summary, None, FONT_SIZE_SMALL as u16, 1.0);
    draw_text(&summary, rect.right() - dims.width - 8.0, y, FONT_SIZE_SMALL, TEXT_DIM);
}
