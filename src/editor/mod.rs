//! Editor shell: toolbar, catalog and property panels, design browser
//!
//! Panels never touch the design directly. They read the current state and
//! return `EditorAction`s, which `AppState::apply` turns into Design State
//! calls after the frame's UI pass.

mod browser;
mod drafts;
mod layout;
mod panels;
mod shortcuts;
mod viewport;

pub use browser::BrowserState;
pub use drafts::{ApplyScope, ShadingDraft, TextureDraft};
pub use layout::{draw_editor, EditorLayout};
pub use shortcuts::poll_shortcuts;
pub use viewport::OrbitGesture;

use crate::catalog::Category;
use crate::design::{RoomPatch, TextureRef};

/// Which canvas fills the center of the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Plan,
    Scene,
}

impl ViewMode {
    pub const ALL: [ViewMode; 2] = [ViewMode::Plan, ViewMode::Scene];

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Plan => "2D Plan",
            ViewMode::Scene => "3D View",
        }
    }
}

/// Tabs of the right-hand property panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelTab {
    #[default]
    Room,
    Item,
    Shading,
    Texture,
}

impl PanelTab {
    pub const ALL: [PanelTab; 4] = [PanelTab::Room, PanelTab::Item, PanelTab::Shading, PanelTab::Texture];

    pub fn label(&self) -> &'static str {
        match self {
            PanelTab::Room => "Room",
            PanelTab::Item => "Item",
            PanelTab::Shading => "Shading",
            PanelTab::Texture => "Texture",
        }
    }

    /// Tabs whose edits go through a preview draft
    pub fn has_drafts(&self) -> bool {
        matches!(self, PanelTab::Shading | PanelTab::Texture)
    }
}

/// Everything the UI can ask of the editor
#[derive(Debug, Clone)]
pub enum EditorAction {
    // Design lifecycle
    NewDesign,
    Save,
    DeleteDesign,
    OpenBrowser,
    BrowserShowAll(bool),
    CloseBrowser,
    LoadDesign(String),
    BeginRename,
    Rename(String),
    CancelRename,

    // Shell
    SetViewMode(ViewMode),
    SetTab(PanelTab),
    SetCategory(Category),
    ZoomIn,
    ZoomOut,

    // Furniture
    AddFurniture(String),
    RotateSelected { clockwise: bool },
    ScaleSelected { grow: bool },
    RemoveSelected,
    ClearSelection,
    SetItemColor(Option<String>),

    // Room
    UpdateRoom(RoomPatch),
    ApplyPreset(String),
    ApplyColorScheme(String),

    // Shading
    SetShadingEnabled(bool),
    SetGlobalShading(f32),
    PreviewShading(f32),
    ApplyShading,
    ClearItemShading,
    ResetShading,

    // Textures
    PreviewTexture(TextureRef),
    ApplyTexture,
    ClearItemTexture,
    ResetTextures,

    SetScope(ApplyScope),
    CancelPreview,
}
