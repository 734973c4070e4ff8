//! Application state and action dispatch
//!
//! Owns the design session, both views and the transient UI state. The
//! layout code returns `EditorAction`s and `apply` executes them after the
//! UI pass, so nothing here calls into macroquad.

use crate::canvas2d::{remove_selected, rotate_selected, scale_selected, PlanView, PointerTracker};
use crate::catalog::Category;
use crate::design::{
    DesignError, DesignResult, DesignState, FurniturePatch, InstanceId, RoomPatch, SaveOverrides, ShadingPatch,
};
use crate::editor::{
    ApplyScope, BrowserState, EditorAction, OrbitGesture, PanelTab, ShadingDraft, TextureDraft, ViewMode,
};
use crate::ui::TextInputState;
use crate::view3d::{AssetSource, SceneView};

/// Message line at the bottom of the window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Status {
    pub message: String,
    pub is_error: bool,
}

impl Status {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

pub struct AppState {
    pub design: DesignState,
    pub plan: PlanView,
    pub scene: SceneView,
    pub pointer: PointerTracker,
    pub gesture: OrbitGesture,

    pub view_mode: ViewMode,
    pub tab: PanelTab,
    pub category: Category,
    pub scope: ApplyScope,
    pub shading: ShadingDraft,
    pub texture: TextureDraft,

    /// Open design browser, if any
    pub browser: Option<BrowserState>,
    /// Open rename dialog, if any
    pub rename: Option<TextInputState>,
    pub status: Status,
}

impl AppState {
    pub fn new(mut design: DesignState, assets: Box<dyn AssetSource>, initial_zoom: f32) -> Self {
        let plan = PlanView::new(&mut design, initial_zoom);
        let scene = SceneView::new(&mut design, assets);
        Self {
            design,
            plan,
            scene,
            pointer: PointerTracker::new(),
            gesture: OrbitGesture::default(),
            view_mode: ViewMode::Plan,
            tab: PanelTab::Room,
            category: Category::Chairs,
            scope: ApplyScope::Selected,
            shading: ShadingDraft::default(),
            texture: TextureDraft::default(),
            browser: None,
            rename: None,
            status: Status::info("Ready"),
        }
    }

    /// True while a dialog has the keyboard and mouse
    pub fn is_modal(&self) -> bool {
        self.browser.is_some() || self.rename.is_some()
    }

    pub fn report_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.status = Status::error(message);
    }

    /// Unsubscribe both views and end the design session
    pub fn shutdown(&mut self) {
        self.cancel_drafts();
        self.plan.detach(&mut self.design);
        self.scene.detach(&mut self.design);
        self.design.teardown();
    }

    pub fn apply(&mut self, action: EditorAction) {
        log::debug!("action {:?}", action);
        match self.run(action) {
            Ok(Some(message)) => self.status = Status::info(message),
            Ok(None) => {}
            Err(e) => self.report_error(e.to_string()),
        }
    }

    pub fn apply_all(&mut self, actions: impl IntoIterator<Item = EditorAction>) {
        for action in actions {
            self.apply(action);
        }
    }

    fn cancel_drafts(&mut self) {
        self.shading.cancel(&mut self.scene);
        self.texture.cancel(&mut self.scene);
    }

    fn run(&mut self, action: EditorAction) -> DesignResult<Option<String>> {
        match action {
            // Design lifecycle
            EditorAction::NewDesign => {
                self.cancel_drafts();
                let owner = self.design.default_owner().to_string();
                self.design.create_new_design(&owner);
                Ok(Some("New design".to_string()))
            }
            EditorAction::Save => {
                let saved = self.design.save_current_design(None, SaveOverrides::default())?;
                Ok(Some(format!("Saved \"{}\"", saved.name)))
            }
            EditorAction::DeleteDesign => {
                let name = self.design.design().name.clone();
                self.cancel_drafts();
                self.design.delete_current_design()?;
                Ok(Some(format!("Deleted \"{}\"", name)))
            }
            EditorAction::OpenBrowser => {
                let designs = self.design.list_designs()?;
                self.browser = Some(BrowserState::new(designs, false));
                Ok(None)
            }
            EditorAction::BrowserShowAll(show_all) => {
                let designs = if show_all {
                    self.design.list_all_designs()?
                } else {
                    self.design.list_designs()?
                };
                self.browser = Some(BrowserState::new(designs, show_all));
                Ok(None)
            }
            EditorAction::CloseBrowser => {
                self.browser = None;
                Ok(None)
            }
            EditorAction::LoadDesign(id) => {
                self.cancel_drafts();
                let name = self.design.load_design(&id)?.name.clone();
                self.browser = None;
                Ok(Some(format!("Opened \"{}\"", name)))
            }
            EditorAction::BeginRename => {
                let mut input = TextInputState::new(self.design.design().name.clone());
                input.select_all();
                self.rename = Some(input);
                Ok(None)
            }
            EditorAction::Rename(name) => {
                // Dialog stays open on failure so the name can be fixed
                self.design.rename_design(&name)?;
                self.rename = None;
                Ok(Some(format!("Renamed to \"{}\"", self.design.design().name)))
            }
            EditorAction::CancelRename => {
                self.rename = None;
                Ok(None)
            }

            // Shell
            EditorAction::SetViewMode(mode) => {
                if mode != self.view_mode {
                    self.cancel_drafts();
                    self.view_mode = mode;
                }
                Ok(None)
            }
            EditorAction::SetTab(tab) => {
                if tab != self.tab && self.tab.has_drafts() {
                    self.cancel_drafts();
                }
                self.tab = tab;
                Ok(None)
            }
            EditorAction::SetCategory(category) => {
                self.category = category;
                Ok(None)
            }
            EditorAction::ZoomIn => {
                match self.view_mode {
                    ViewMode::Plan => self.plan.zoom_in(),
                    ViewMode::Scene => self.scene.zoom(1.0),
                }
                Ok(None)
            }
            EditorAction::ZoomOut => {
                match self.view_mode {
                    ViewMode::Plan => self.plan.zoom_out(),
                    ViewMode::Scene => self.scene.zoom(-1.0),
                }
                Ok(None)
            }

            // Furniture
            EditorAction::AddFurniture(catalog_id) => {
                let room = &self.design.design().room;
                let (x, y) = (room.width / 2.0, room.depth / 2.0);
                self.design.add_furniture(&catalog_id, x, y)?;
                self.tab = PanelTab::Item;
                let name = self.design.catalog().get(&catalog_id).map(|e| e.name.clone()).unwrap_or(catalog_id);
                Ok(Some(format!("Added {}", name)))
            }
            EditorAction::RotateSelected { clockwise } => {
                rotate_selected(&mut self.design, clockwise)?;
                Ok(None)
            }
            EditorAction::ScaleSelected { grow } => {
                scale_selected(&mut self.design, grow)?;
                Ok(None)
            }
            EditorAction::RemoveSelected => {
                if remove_selected(&mut self.design)? {
                    return Ok(Some("Item removed".to_string()));
                }
                Ok(None)
            }
            EditorAction::ClearSelection => {
                self.design.select(None)?;
                Ok(None)
            }
            EditorAction::SetItemColor(color) => {
                let id = self.selected()?;
                self.design.update_furniture(id, FurniturePatch::color(color))?;
                Ok(None)
            }

            // Room
            EditorAction::UpdateRoom(patch) => {
                self.design.update_room(patch);
                Ok(None)
            }
            EditorAction::ApplyPreset(preset_id) => {
                self.cancel_drafts();
                self.design.apply_room_preset(&preset_id)?;
                let name = self.design.catalog().room_preset(&preset_id).map(|p| p.name.clone());
                Ok(name.map(|n| format!("Applied preset {}", n)))
            }
            EditorAction::ApplyColorScheme(scheme_id) => {
                let scheme = self
                    .design
                    .catalog()
                    .color_schemes()
                    .iter()
                    .find(|s| s.id == scheme_id)
                    .cloned()
                    .ok_or_else(|| DesignError::NotFound(format!("color scheme {}", scheme_id)))?;
                self.design.update_room(RoomPatch {
                    wall_color: Some(scheme.wall_color),
                    floor_color: Some(scheme.floor_color),
                    accent_color: Some(scheme.accent_color),
                    ..Default::default()
                });
                Ok(Some(format!("Applied {} colors", scheme.name)))
            }

            // Shading
            EditorAction::SetShadingEnabled(enabled) => {
                self.design.update_shading_settings(ShadingPatch {
                    enabled: Some(enabled),
                    ..Default::default()
                });
                Ok(None)
            }
            EditorAction::SetGlobalShading(level) => {
                self.design.update_shading_settings(ShadingPatch {
                    global_level: Some(level),
                    ..Default::default()
                });
                Ok(None)
            }
            EditorAction::PreviewShading(level) => {
                self.shading.preview(&self.design, &mut self.scene, self.scope, level);
                Ok(None)
            }
            EditorAction::ApplyShading => {
                let applied = self.shading.apply(&mut self.design, &mut self.scene, self.scope)?;
                Ok(applied.then(|| format!("Shading applied to {}", self.scope.label().to_lowercase())))
            }
            EditorAction::ClearItemShading => {
                let id = self.selected()?;
                self.design.clear_custom_shading(id);
                Ok(None)
            }
            EditorAction::ResetShading => {
                self.cancel_drafts();
                self.design.reset_all_shading();
                Ok(Some("Shading reset".to_string()))
            }

            // Textures
            EditorAction::PreviewTexture(texture) => {
                self.texture.preview(&self.design, &mut self.scene, self.scope, texture);
                Ok(None)
            }
            EditorAction::ApplyTexture => {
                let applied = self.texture.apply(&mut self.design, &mut self.scene, self.scope)?;
                Ok(applied.then(|| format!("Texture applied to {}", self.scope.label().to_lowercase())))
            }
            EditorAction::ClearItemTexture => {
                let id = self.selected()?;
                self.design.set_furniture_texture(id, None)?;
                Ok(None)
            }
            EditorAction::ResetTextures => {
                self.cancel_drafts();
                self.design.reset_all_textures();
                Ok(Some("Textures reset".to_string()))
            }

            EditorAction::SetScope(scope) => {
                if scope != self.scope {
                    self.cancel_drafts();
                    self.scope = scope;
                }
                Ok(None)
            }
            EditorAction::CancelPreview => {
                self.cancel_drafts();
                Ok(None)
            }
        }
    }

    fn selected(&self) -> DesignResult<InstanceId> {
        self.design
            .selected()
            .ok_or_else(|| DesignError::InvalidState("select a furniture item first".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::design::TextureRef;
    use crate::storage::MemoryDesignStore;
    use crate::view3d::MemoryAssetSource;
    use std::rc::Rc;

    fn app() -> AppState {
        let design = DesignState::new(Box::new(MemoryDesignStore::new()), Rc::new(Catalog::builtin()), "u1");
        AppState::new(design, Box::new(MemoryAssetSource::new()), 0.5)
    }

    #[test]
    fn test_add_places_at_room_center_and_selects() {
        let mut app = app();
        app.apply(EditorAction::AddFurniture("chair-1".to_string()));

        let item = app.design.selected_furniture().unwrap();
        assert_eq!((item.x, item.y), (250.0, 200.0));
        assert_eq!(app.tab, PanelTab::Item);
        assert!(!app.status.is_error);
    }

    #[test]
    fn test_errors_land_in_status() {
        let mut app = app();
        app.apply(EditorAction::AddFurniture("no-such-item".to_string()));
        assert!(app.status.is_error);
        assert!(app.design.design().furniture.is_empty());

        app.apply(EditorAction::SetItemColor(Some("#FFFFFF".to_string())));
        assert!(app.status.is_error);
    }

    #[test]
    fn test_save_then_open_from_browser() {
        let mut app = app();
        app.apply(EditorAction::ApplyPreset("bedroom".to_string()));
        app.apply(EditorAction::Save);
        assert!(!app.status.is_error);
        let id = app.design.design().id.clone().unwrap();

        app.apply(EditorAction::NewDesign);
        assert!(app.design.design().furniture.is_empty());

        app.apply(EditorAction::OpenBrowser);
        assert_eq!(app.browser.as_ref().unwrap().designs.len(), 1);
        app.apply(EditorAction::LoadDesign(id));
        assert!(app.browser.is_none());
        assert_eq!(app.design.design().furniture.len(), 2);
        assert_eq!(app.design.design().room.width, 420.0);
    }

    #[test]
    fn test_rename_keeps_dialog_on_empty_name() {
        let mut app = app();
        app.apply(EditorAction::BeginRename);
        assert!(app.rename.is_some());

        app.apply(EditorAction::Rename("   ".to_string()));
        assert!(app.status.is_error);
        assert!(app.rename.is_some());

        app.apply(EditorAction::Rename("Studio".to_string()));
        assert!(app.rename.is_none());
        assert_eq!(app.design.design().name, "Studio");
    }

    #[test]
    fn test_color_scheme_sets_room_colors() {
        let mut app = app();
        app.apply(EditorAction::ApplyColorScheme("warm".to_string()));
        let room = &app.design.design().room;
        assert_eq!(room.wall_color, "#FFF8DC");
        assert_eq!(room.floor_color, "#8B4513");
        assert_eq!(room.accent_color, "#CD853F");
        assert_eq!(room.width, 500.0);
    }

    #[test]
    fn test_view_switch_drops_pending_preview() {
        let mut app = app();
        app.apply(EditorAction::AddFurniture("chair-1".to_string()));
        app.scene.update(&mut app.design, 64, 48);
        let id = app.design.selected().unwrap();

        app.apply(EditorAction::SetViewMode(ViewMode::Scene));
        app.apply(EditorAction::PreviewShading(0.9));
        assert!(app.scene.is_previewing(id));

        app.apply(EditorAction::SetViewMode(ViewMode::Plan));
        assert!(!app.scene.is_previewing(id));
        assert!(!app.shading.is_pending());
        assert!(app.design.design().custom_shading.is_empty());
    }

    #[test]
    fn test_apply_texture_to_selected() {
        let mut app = app();
        app.apply(EditorAction::AddFurniture("chair-1".to_string()));
        let id = app.design.selected().unwrap();

        let red = TextureRef::new("red", "textures/red.jpg", "#B91C1C");
        app.apply(EditorAction::PreviewTexture(red.clone()));
        app.apply(EditorAction::ApplyTexture);
        assert_eq!(app.design.effective_texture(id, false), Some(&red));

        app.apply(EditorAction::ClearItemTexture);
        assert_eq!(app.design.design().custom_textures.get(&id), None);
    }

    #[test]
    fn test_scope_change_cancels_draft() {
        let mut app = app();
        app.apply(EditorAction::AddFurniture("chair-1".to_string()));
        app.apply(EditorAction::PreviewShading(0.2));
        assert!(app.shading.is_pending());

        app.apply(EditorAction::SetScope(ApplyScope::All));
        assert!(!app.shading.is_pending());
        assert_eq!(app.scope, ApplyScope::All);
    }

    #[test]
    fn test_delete_unsaved_design_is_an_error() {
        let mut app = app();
        app.apply(EditorAction::DeleteDesign);
        assert!(app.status.is_error);
    }

    #[test]
    fn test_shortcut_edits_without_selection_are_quiet() {
        let mut app = app();
        app.apply(EditorAction::RotateSelected { clockwise: true });
        app.apply(EditorAction::RemoveSelected);
        assert_eq!(app.status, Status::info("Ready"));
    }
}
