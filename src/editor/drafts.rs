//! Pending shading and texture edits
//!
//! A draft is shown on the 3D view through its preview overlay and reaches
//! the design only on Apply. Cancel, a scope change or a view switch throws
//! the draft away and restores the committed look.

use crate::design::{DesignError, DesignResult, DesignState, TextureRef};
use crate::view3d::{PreviewTarget, SceneView};

/// Which instances an Apply writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyScope {
    #[default]
    Selected,
    All,
}

impl ApplyScope {
    pub fn label(&self) -> &'static str {
        match self {
            ApplyScope::Selected => "Selected",
            ApplyScope::All => "All items",
        }
    }

    fn target(&self, state: &DesignState) -> Option<PreviewTarget> {
        match self {
            ApplyScope::Selected => state.selected().map(PreviewTarget::Instance),
            ApplyScope::All => Some(PreviewTarget::All),
        }
    }
}

fn nothing_selected() -> DesignError {
    DesignError::InvalidState("select a furniture item first".to_string())
}

#[derive(Debug, Default)]
pub struct ShadingDraft {
    level: Option<f32>,
}

impl ShadingDraft {
    pub fn level(&self) -> Option<f32> {
        self.level
    }

    pub fn is_pending(&self) -> bool {
        self.level.is_some()
    }

    pub fn preview(&mut self, state: &DesignState, view: &mut SceneView, scope: ApplyScope, level: f32) {
        let level = level.clamp(0.0, 1.0);
        self.level = Some(level);
        if let Some(target) = scope.target(state) {
            view.preview_shading(target, level);
        }
    }

    /// Commit the pending level. Returns false when there was nothing to apply.
    pub fn apply(&mut self, state: &mut DesignState, view: &mut SceneView, scope: ApplyScope) -> DesignResult<bool> {
        let Some(level) = self.level else {
            return Ok(false);
        };
        match scope {
            ApplyScope::Selected => {
                let id = state.selected().ok_or_else(nothing_selected)?;
                state.set_custom_shading(id, level);
            }
            ApplyScope::All => state.set_custom_shading_all(level),
        }
        self.level = None;
        view.clear_preview();
        Ok(true)
    }

    pub fn cancel(&mut self, view: &mut SceneView) {
        self.level = None;
        view.clear_preview();
    }
}

#[derive(Debug, Default)]
pub struct TextureDraft {
    texture: Option<TextureRef>,
}

impl TextureDraft {
    pub fn texture(&self) -> Option<&TextureRef> {
        self.texture.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.texture.is_some()
    }

    pub fn preview(&mut self, state: &DesignState, view: &mut SceneView, scope: ApplyScope, texture: TextureRef) {
        if let Some(target) = scope.target(state) {
            view.preview_texture(target, &texture);
        }
        self.texture = Some(texture);
    }

    /// Selected scope sets one override; All replaces the global texture and
    /// stamps it onto every instance.
    pub fn apply(&mut self, state: &mut DesignState, view: &mut SceneView, scope: ApplyScope) -> DesignResult<bool> {
        let Some(texture) = self.texture.clone() else {
            return Ok(false);
        };
        match scope {
            ApplyScope::Selected => {
                let id = state.selected().ok_or_else(nothing_selected)?;
                state.set_furniture_texture(id, Some(texture))?;
            }
            ApplyScope::All => state.set_global_texture(texture),
        }
        self.texture = None;
        view.clear_preview();
        Ok(true)
    }

    pub fn cancel(&mut self, view: &mut SceneView) {
        self.texture = None;
        view.clear_preview();
    }
}
