//! The authoritative design state
//!
//! Owns the current design and the selection. Every mutation either applies
//! completely or returns an error with nothing changed, then publishes a
//! `ChangeSet` to all subscribers.

use super::changes::{ChangeSet, SubscriberId, Subscribers};
use super::error::{DesignError, DesignResult};
use super::model::*;
use super::selection::Selection;
use crate::catalog::CatalogLookup;
use crate::storage::{DesignRepository, StorageError};
use std::rc::Rc;

/// Fields of `Room` to overwrite; `None` leaves the field as is
#[derive(Debug, Clone, Default)]
pub struct RoomPatch {
    pub width: Option<f32>,
    pub depth: Option<f32>,
    pub height: Option<f32>,
    pub shape: Option<RoomShape>,
    pub wall_color: Option<String>,
    pub floor_color: Option<String>,
    pub accent_color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FurniturePatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub rotation: Option<f32>,
    pub scale: Option<f32>,
    /// `Some(None)` resets to the catalog default color
    pub color: Option<Option<String>>,
}

impl FurniturePatch {
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn rotation(degrees: f32) -> Self {
        Self {
            rotation: Some(degrees),
            ..Default::default()
        }
    }

    pub fn scale(scale: f32) -> Self {
        Self {
            scale: Some(scale),
            ..Default::default()
        }
    }

    pub fn color(color: Option<String>) -> Self {
        Self {
            color: Some(color),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShadingPatch {
    pub enabled: Option<bool>,
    pub global_level: Option<f32>,
}

/// Values merged onto the design when saving
#[derive(Debug, Clone, Default)]
pub struct SaveOverrides {
    pub name: Option<String>,
}

pub struct DesignState {
    design: Design,
    selection: Selection,
    store: Box<dyn DesignRepository>,
    catalog: Rc<dyn CatalogLookup>,
    subscribers: Subscribers,
    default_owner: String,
    dirty: bool,
}

impl DesignState {
    /// Start a session with a blank design for `owner`
    pub fn new(
        store: Box<dyn DesignRepository>,
        catalog: Rc<dyn CatalogLookup>,
        owner: impl Into<String>,
    ) -> Self {
        let owner = owner.into();
        log::info!("design session started for {}", owner);
        Self {
            design: Design::blank(owner.clone()),
            selection: Selection::new(),
            store,
            catalog,
            subscribers: Subscribers::default(),
            default_owner: owner,
            dirty: false,
        }
    }

    /// End the session: drop observers and reset to a blank design
    pub fn teardown(&mut self) {
        log::info!("design session for {} ended", self.default_owner);
        self.subscribers.clear();
        self.design = Design::blank(self.default_owner.clone());
        self.selection.clear();
        self.dirty = false;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    pub fn design(&self) -> &Design {
        &self.design
    }

    pub fn catalog(&self) -> &dyn CatalogLookup {
        self.catalog.as_ref()
    }

    pub fn selected(&self) -> Option<InstanceId> {
        self.selection.current()
    }

    /// The selected instance, read fresh from the design
    pub fn selected_furniture(&self) -> Option<&FurnitureInstance> {
        self.selection.current().and_then(|id| self.design.instance(id))
    }

    pub fn effective_shading(&self, id: InstanceId) -> f32 {
        self.design.effective_shading(id)
    }

    pub fn effective_texture(&self, id: InstanceId, force_global: bool) -> Option<&TextureRef> {
        self.design.effective_texture(id, force_global)
    }

    /// True when the design has edits that are not persisted
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn default_owner(&self) -> &str {
        &self.default_owner
    }

    // ─────────────────────────────────────────────────────────────────────
    // Subscriptions
    // ─────────────────────────────────────────────────────────────────────

    pub fn subscribe(&mut self) -> SubscriberId {
        self.subscribers.subscribe()
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.unsubscribe(id);
    }

    pub fn take_changes(&mut self, id: SubscriberId) -> ChangeSet {
        self.subscribers.take(id)
    }

    fn publish(&mut self, change: ChangeSet) {
        self.subscribers.publish(&change);
    }

    fn edited(&mut self, change: ChangeSet) {
        self.dirty = true;
        self.publish(change);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Document lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Replace the current design with a stored one
    pub fn load_design(&mut self, id: &str) -> DesignResult<&Design> {
        let mut loaded = match self.store.get_by_id(id) {
            Ok(design) => design,
            Err(StorageError::NotFound(_)) => return Err(DesignError::NotFound(format!("design {}", id))),
            Err(e) => return Err(e.into()),
        };
        loaded.normalize();
        log::info!("loaded design {} ({} items)", id, loaded.furniture.len());
        self.design = loaded;
        self.selection.clear();
        self.dirty = false;
        self.publish(ChangeSet::everything());
        Ok(&self.design)
    }

    /// Reset to a blank design for `owner`. Never touches storage.
    pub fn create_new_design(&mut self, owner: &str) {
        let owner = if owner.trim().is_empty() {
            self.default_owner.clone()
        } else {
            owner.to_string()
        };
        self.design = Design::blank(owner);
        self.selection.clear();
        self.dirty = false;
        self.publish(ChangeSet::everything());
    }

    pub fn rename_design(&mut self, new_name: &str) -> DesignResult<()> {
        let name = new_name.trim();
        if name.is_empty() {
            return Err(DesignError::InvalidArgument("design name is empty".to_string()));
        }

        match self.design.id.clone() {
            Some(id) => {
                let mut stored = match self.store.rename(&id, name) {
                    Ok(stored) => stored,
                    Err(StorageError::NotFound(_)) => {
                        return Err(DesignError::NotFound(format!("design {}", id)))
                    }
                    Err(e) => return Err(e.into()),
                };
                // The stored document replaces the in-memory one
                stored.normalize();
                self.design = stored;
                let design = &self.design;
                self.selection.retain(|item| design.contains(item));
                self.dirty = false;
                self.publish(ChangeSet::everything());
            }
            None => {
                self.design.name = name.to_string();
                self.dirty = true;
                self.publish(ChangeSet {
                    meta: true,
                    ..Default::default()
                });
            }
        }
        Ok(())
    }

    /// Merge the design with `overrides` and persist it, adopting the stored
    /// document on success. On failure the in-memory design is unchanged.
    pub fn save_current_design(&mut self, owner: Option<&str>, overrides: SaveOverrides) -> DesignResult<&Design> {
        let mut draft = self.design.clone();
        if let Some(name) = overrides.name {
            draft.name = name;
        }
        draft.owner = owner
            .filter(|o| !o.trim().is_empty())
            .map(str::to_string)
            .or_else(|| Some(draft.owner.clone()).filter(|o| !o.trim().is_empty()))
            .unwrap_or_else(|| self.default_owner.clone());
        if draft.name.trim().is_empty() {
            draft.name = UNTITLED_DESIGN.to_string();
        } else {
            draft.name = draft.name.trim().to_string();
        }

        let saved = match draft.id.clone() {
            Some(id) => self.store.update(&id, &draft),
            None => self.store.create(&draft),
        };
        let saved = saved.map_err(|e| {
            log::warn!("saving design failed: {}", e);
            match e {
                StorageError::NotFound(id) => DesignError::NotFound(format!("design {}", id)),
                e => DesignError::from(e),
            }
        })?;

        log::info!("saved design {:?} as {:?}", saved.id, saved.name);
        self.design = saved;
        self.dirty = false;
        self.publish(ChangeSet {
            meta: true,
            ..Default::default()
        });
        Ok(&self.design)
    }

    pub fn delete_current_design(&mut self) -> DesignResult<()> {
        let id = self
            .design
            .id
            .clone()
            .ok_or_else(|| DesignError::InvalidState("design has not been saved".to_string()))?;
        if !self.store.delete(&id)? {
            return Err(DesignError::NotFound(format!("design {}", id)));
        }
        log::info!("deleted design {}", id);
        let owner = self.design.owner.clone();
        self.create_new_design(&owner);
        Ok(())
    }

    /// Designs stored for the current owner
    pub fn list_designs(&self) -> DesignResult<Vec<Design>> {
        Ok(self.store.list_for_owner(&self.design.owner)?)
    }

    pub fn list_all_designs(&self) -> DesignResult<Vec<Design>> {
        Ok(self.store.list_all()?)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Room
    // ─────────────────────────────────────────────────────────────────────

    /// Shallow-merge room fields. Values are taken as given.
    pub fn update_room(&mut self, patch: RoomPatch) {
        let room = &mut self.design.room;
        if let Some(v) = patch.width {
            room.width = v;
        }
        if let Some(v) = patch.depth {
            room.depth = v;
        }
        if let Some(v) = patch.height {
            room.height = v;
        }
        if let Some(v) = patch.shape {
            room.shape = v;
        }
        if let Some(v) = patch.wall_color {
            room.wall_color = v;
        }
        if let Some(v) = patch.floor_color {
            room.floor_color = v;
        }
        if let Some(v) = patch.accent_color {
            room.accent_color = v;
        }
        self.edited(ChangeSet {
            room: true,
            ..Default::default()
        });
    }

    /// Switch to a preset room with its default furniture
    pub fn apply_room_preset(&mut self, preset_id: &str) -> DesignResult<()> {
        let preset = self
            .catalog
            .room_preset(preset_id)
            .cloned()
            .ok_or_else(|| DesignError::NotFound(format!("room preset {}", preset_id)))?;

        // Fresh ids so overrides of the old layout cannot attach to new items
        let base = self.design.next_instance_id().0;
        let furniture = preset
            .furniture
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let mut instance =
                    FurnitureInstance::new(InstanceId(base + i as u32), item.catalog_id.clone(), item.x, item.y);
                instance.color = self.catalog.get(&item.catalog_id).map(|c| c.default_color.clone());
                instance
            })
            .collect();

        self.update_room(RoomPatch {
            width: Some(preset.width),
            depth: Some(preset.depth),
            height: Some(preset.height),
            shape: Some(if preset.square { RoomShape::Square } else { RoomShape::Rectangle }),
            wall_color: Some(preset.wall_color),
            floor_color: Some(preset.floor_color),
            accent_color: Some(preset.accent_color),
        });
        self.replace_furniture(furniture);
        log::info!("applied room preset {}", preset_id);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Furniture
    // ─────────────────────────────────────────────────────────────────────

    /// Place a catalog item and select it
    pub fn add_furniture(&mut self, catalog_id: &str, x: f32, y: f32) -> DesignResult<InstanceId> {
        let entry = self
            .catalog
            .get(catalog_id)
            .ok_or_else(|| DesignError::NotFound(format!("catalog item {}", catalog_id)))?;

        let id = self.design.next_instance_id();
        let mut instance = FurnitureInstance::new(id, catalog_id, x, y);
        instance.color = Some(entry.default_color.clone());
        self.design.furniture.push(instance);
        self.selection.select(Some(id));
        log::debug!("added {} as {}", catalog_id, id);

        self.edited(ChangeSet {
            structure: true,
            selection: true,
            ..Default::default()
        });
        Ok(id)
    }

    /// Replace the whole furniture list. Duplicate ids are reassigned,
    /// overrides for vanished instances are pruned and a dangling selection
    /// is cleared.
    pub fn replace_furniture(&mut self, furniture: Vec<FurnitureInstance>) {
        for item in &furniture {
            if self.catalog.get(&item.catalog_id).is_none() {
                log::warn!("furniture {} references unknown catalog item {}", item.instance_id, item.catalog_id);
            }
        }
        self.design.furniture = furniture;
        for item in &mut self.design.furniture {
            item.rotation = normalize_rotation(item.rotation);
            item.scale = clamp_scale(item.scale);
        }
        let repaired = self.design.normalize();
        if repaired > 0 {
            log::debug!("replace_furniture repaired {} entries", repaired);
        }
        let design = &self.design;
        let selection_cleared = self.selection.retain(|id| design.contains(id));

        self.edited(ChangeSet {
            structure: true,
            materials: repaired > 0,
            selection: selection_cleared,
            ..Default::default()
        });
    }

    pub fn update_furniture(&mut self, id: InstanceId, patch: FurniturePatch) -> DesignResult<()> {
        let item = self
            .design
            .furniture
            .iter_mut()
            .find(|f| f.instance_id == id)
            .ok_or_else(|| DesignError::NotFound(format!("furniture {}", id)))?;

        if let Some(x) = patch.x {
            item.x = x;
        }
        if let Some(y) = patch.y {
            item.y = y;
        }
        if let Some(r) = patch.rotation {
            item.rotation = normalize_rotation(r);
        }
        if let Some(s) = patch.scale {
            item.scale = clamp_scale(s);
        }
        if let Some(c) = patch.color {
            item.color = c;
        }

        let mut change = ChangeSet::default();
        change.instances.insert(id);
        self.edited(change);
        Ok(())
    }

    /// Remove an instance together with its overrides
    pub fn remove_furniture(&mut self, id: InstanceId) -> DesignResult<()> {
        let index = self
            .design
            .furniture
            .iter()
            .position(|f| f.instance_id == id)
            .ok_or_else(|| DesignError::NotFound(format!("furniture {}", id)))?;

        self.design.furniture.remove(index);
        let had_overrides = self.design.custom_shading.remove(&id).is_some()
            | self.design.custom_textures.remove(&id).is_some();
        let selection_cleared = self.selection.forget(id);
        log::debug!("removed {}", id);

        self.edited(ChangeSet {
            structure: true,
            materials: had_overrides,
            selection: selection_cleared,
            ..Default::default()
        });
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────

    /// Select a live instance or clear the selection
    pub fn select(&mut self, id: Option<InstanceId>) -> DesignResult<()> {
        if let Some(id) = id {
            if !self.design.contains(id) {
                return Err(DesignError::NotFound(format!("furniture {}", id)));
            }
        }
        if self.selection.select(id) {
            self.publish(ChangeSet {
                selection: true,
                ..Default::default()
            });
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Shading
    // ─────────────────────────────────────────────────────────────────────

    pub fn update_shading_settings(&mut self, patch: ShadingPatch) {
        if let Some(enabled) = patch.enabled {
            self.design.shading_enabled = enabled;
        }
        if let Some(level) = patch.global_level {
            self.design.global_shading_level = level.clamp(0.0, 1.0);
        }
        self.edited(ChangeSet {
            materials: true,
            ..Default::default()
        });
    }

    /// Upsert a shading override. Returns false (and changes nothing) when
    /// the instance is not in the design.
    pub fn set_custom_shading(&mut self, id: InstanceId, level: f32) -> bool {
        if !self.design.contains(id) {
            log::debug!("ignoring shading override for missing {}", id);
            return false;
        }
        self.design.custom_shading.insert(id, level.clamp(0.0, 1.0));
        self.edited(ChangeSet {
            materials: true,
            ..Default::default()
        });
        true
    }

    /// Give every current instance the same shading override
    pub fn set_custom_shading_all(&mut self, level: f32) {
        let level = level.clamp(0.0, 1.0);
        self.design.custom_shading = self
            .design
            .furniture
            .iter()
            .map(|f| (f.instance_id, level))
            .collect();
        self.edited(ChangeSet {
            materials: true,
            ..Default::default()
        });
    }

    /// Reset one instance to the global level
    pub fn clear_custom_shading(&mut self, id: InstanceId) -> bool {
        if self.design.custom_shading.remove(&id).is_none() {
            return false;
        }
        self.edited(ChangeSet {
            materials: true,
            ..Default::default()
        });
        true
    }

    pub fn reset_all_shading(&mut self) {
        self.design.custom_shading.clear();
        self.edited(ChangeSet {
            materials: true,
            ..Default::default()
        });
    }

    // ─────────────────────────────────────────────────────────────────────
    // Textures
    // ─────────────────────────────────────────────────────────────────────

    /// Set the global texture and stamp a matching override onto every
    /// current instance
    pub fn set_global_texture(&mut self, texture: TextureRef) {
        self.design.custom_textures = self
            .design
            .furniture
            .iter()
            .map(|f| (f.instance_id, texture.clone()))
            .collect();
        self.design.global_texture = Some(texture);
        self.edited(ChangeSet {
            materials: true,
            ..Default::default()
        });
    }

    /// Set an instance's texture, or remove its override with `None`
    pub fn set_furniture_texture(&mut self, id: InstanceId, texture: Option<TextureRef>) -> DesignResult<()> {
        if !self.design.contains(id) {
            return Err(DesignError::NotFound(format!("furniture {}", id)));
        }
        match texture {
            Some(t) => {
                self.design.custom_textures.insert(id, t);
            }
            None => {
                self.design.custom_textures.remove(&id);
            }
        }
        self.edited(ChangeSet {
            materials: true,
            ..Default::default()
        });
        Ok(())
    }

    /// Clear all per-instance textures. The global texture stays.
    pub fn reset_all_textures(&mut self) {
        self.design.custom_textures.clear();
        self.edited(ChangeSet {
            materials: true,
            ..Default::default()
        });
    }
}
