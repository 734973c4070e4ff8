//! The 3D view: reconciliation, async loading, preview and rendering
//!
//! Room, material or furniture-list changes tear the scene down and rebuild
//! it under a new generation. Moves, rotations, scale and color edits patch
//! the existing nodes. Model fetches carry the generation they were issued
//! under; a completion from an older generation is dropped.

use super::assets::{decode_model, decode_texture, AssetCache, AssetSource, CacheEntry};
use super::materials::{base_color, furniture_meshes, shaded_material, PreviewOverlay};
use super::mesh::{fallback_parts, Mesh};
use super::pick::pick_furniture;
use super::room::{build_highlight, build_room, placement, yaw};
use super::scene::{Node, NodeId, NodeTag, Scene};
use crate::catalog::CatalogEntry;
use crate::design::{DesignResult, DesignState, FurnitureInstance, InstanceId, SubscriberId, TextureRef};
use crate::rasterizer::{
    draw_floor_grid, render_mesh, screen_to_ray, Color, Framebuffer, Material, OrbitCamera, RasterSettings, Texture,
    Vec3,
};
use std::collections::HashMap;
use std::rc::Rc;

const GRID_SIZE: f32 = 2000.0;
const GRID_DIVISIONS: usize = 20;
const GRID_COLOR: Color = Color::new(0x44, 0x44, 0x44);
const GRID_CENTER_COLOR: Color = Color::new(0x88, 0x88, 0x88);
/// Just below the floor so the floor wins the depth test
const GRID_Y: f32 = -0.5;
/// Gap between a model's lowest point and the floor
const MODEL_FLOOR_GAP: f32 = 0.1;
/// Radians per dragged pixel
const ORBIT_SPEED: f32 = 0.01;
const ZOOM_FACTOR: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    LoadedFallback,
    LoadedModel,
    Disposed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewTarget {
    Instance(InstanceId),
    All,
}

#[derive(Debug)]
struct InstanceEntry {
    root: NodeId,
    catalog_id: String,
    state: LoadState,
    scale: f32,
}

#[derive(Debug)]
struct ModelWaiter {
    instance: InstanceId,
    catalog_id: String,
    generation: u64,
}

pub struct SceneView {
    pub framebuffer: Framebuffer,
    pub orbit: OrbitCamera,
    scene: Scene,
    settings: RasterSettings,
    subscriber: SubscriberId,
    source: Box<dyn AssetSource>,
    models: AssetCache<Mesh>,
    textures: AssetCache<Texture>,
    waiters: HashMap<String, Vec<ModelWaiter>>,
    instances: HashMap<InstanceId, InstanceEntry>,
    preview: PreviewOverlay,
    /// Texture paths shown by an active texture preview
    preview_textures: HashMap<InstanceId, String>,
    highlight: Option<NodeId>,
    generation: u64,
    needs_rebuild: bool,
    needs_render: bool,
}

impl SceneView {
    pub fn new(state: &mut DesignState, source: Box<dyn AssetSource>) -> Self {
        Self {
            framebuffer: Framebuffer::new(0, 0),
            orbit: OrbitCamera::new(),
            scene: Scene::new(),
            settings: lighting(RasterSettings::default()),
            subscriber: state.subscribe(),
            source,
            models: AssetCache::default(),
            textures: AssetCache::default(),
            waiters: HashMap::new(),
            instances: HashMap::new(),
            preview: PreviewOverlay::new(),
            preview_textures: HashMap::new(),
            highlight: None,
            generation: 0,
            needs_rebuild: true,
            needs_render: true,
        }
    }

    /// Stop observing the design and release every node
    pub fn detach(&mut self, state: &mut DesignState) {
        state.unsubscribe(self.subscriber);
        self.dispose_all();
        self.waiters.clear();
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn load_state(&self, id: InstanceId) -> LoadState {
        self.instances.get(&id).map_or(LoadState::Unloaded, |e| e.state)
    }

    pub fn instance_root(&self, id: InstanceId) -> Option<NodeId> {
        self.instances
            .get(&id)
            .filter(|e| e.state != LoadState::Disposed)
            .map(|e| e.root)
    }

    pub fn highlight(&self) -> Option<NodeId> {
        self.highlight
    }

    pub fn is_previewing(&self, id: InstanceId) -> bool {
        self.preview.is_previewing(id)
    }

    /// Per-frame sync. Returns true when the framebuffer was redrawn.
    pub fn update(&mut self, state: &mut DesignState, width: usize, height: usize) -> bool {
        if width != self.framebuffer.width || height != self.framebuffer.height {
            self.framebuffer.resize(width, height);
            self.needs_render = true;
        }

        let changes = state.take_changes(self.subscriber);
        let state = &*state;
        if self.needs_rebuild || changes.needs_rebuild() {
            self.rebuild(state);
        } else if !changes.is_empty() {
            for &id in &changes.instances {
                self.sync_instance(state, id);
            }
            if changes.selection || !changes.instances.is_empty() {
                self.sync_highlight(state);
            }
            self.needs_render = true;
        }

        if self.poll_assets(state) {
            self.needs_render = true;
        }

        if !self.needs_render || self.framebuffer.is_empty() {
            return false;
        }
        self.render();
        true
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reconciliation
    // ─────────────────────────────────────────────────────────────────────

    fn dispose_all(&mut self) {
        self.preview.discard();
        self.preview_textures.clear();
        self.scene.clear();
        self.highlight = None;
        self.instances.retain(|_, e| e.state != LoadState::Disposed);
        for entry in self.instances.values_mut() {
            entry.state = LoadState::Disposed;
        }
    }

    fn rebuild(&mut self, state: &DesignState) {
        self.generation += 1;
        self.needs_rebuild = false;
        self.dispose_all();

        let design = state.design();
        build_room(&mut self.scene, &design.room);
        for item in &design.furniture {
            self.build_instance(state, item);
        }
        self.sync_highlight(state);
        self.orbit.frame_room(design.room.width.max(design.room.depth));
        self.needs_render = true;

        log::debug!(
            "scene rebuilt: generation {}, {} items, {} nodes",
            self.generation,
            design.furniture.len(),
            self.scene.len()
        );
    }

    fn build_instance(&mut self, state: &DesignState, item: &FurnitureInstance) {
        let Some(entry) = state.catalog().get(&item.catalog_id) else {
            log::warn!("no catalog entry for {} ({}), not rendered", item.catalog_id, item.instance_id);
            return;
        };

        let mut root = Node::new(NodeTag::Furniture(item.instance_id));
        root.position = placement(item, &state.design().room);
        root.rotation_y = yaw(item);
        let root = self.scene.add(root);
        let material = self.furniture_material(state, item, entry);

        let load_state = match entry.model.as_deref() {
            None => self.attach_fallback(root, item, entry, material),
            Some(path) => match self.models.get(path).cloned() {
                Some(CacheEntry::Ready(mesh)) => self.attach_model(root, mesh, item, entry, material),
                Some(CacheEntry::Failed) => self.attach_fallback(root, item, entry, material),
                Some(CacheEntry::Pending) | None => {
                    if self.models.begin(path) {
                        self.source.request(path);
                    }
                    self.waiters.entry(path.to_string()).or_default().push(ModelWaiter {
                        instance: item.instance_id,
                        catalog_id: item.catalog_id.clone(),
                        generation: self.generation,
                    });
                    LoadState::Loading
                }
            },
        };

        self.instances.insert(
            item.instance_id,
            InstanceEntry {
                root,
                catalog_id: item.catalog_id.clone(),
                state: load_state,
                scale: item.scale,
            },
        );
    }

    fn attach_fallback(
        &mut self,
        root: NodeId,
        item: &FurnitureInstance,
        entry: &CatalogEntry,
        material: Material,
    ) -> LoadState {
        let s = item.scale * entry.model_override();
        let dims = entry.dimensions;
        let size = Vec3::new(dims.width * s, dims.height * s, dims.depth * s);
        for part in fallback_parts(entry.category, size) {
            self.scene
                .add_child(root, Node::with_mesh(NodeTag::Part, Rc::new(part), material.clone()));
        }
        LoadState::LoadedFallback
    }

    fn attach_model(
        &mut self,
        root: NodeId,
        mesh: Rc<Mesh>,
        item: &FurnitureInstance,
        entry: &CatalogEntry,
        material: Material,
    ) -> LoadState {
        let Some(bounds) = mesh.bounds() else {
            return self.attach_fallback(root, item, entry, material);
        };
        let size = bounds.size();
        let dims = entry.dimensions;
        let fit = [
            (dims.width * item.scale, size.x),
            (dims.height * item.scale, size.y),
            (dims.depth * item.scale, size.z),
        ]
        .into_iter()
        .filter(|&(_, actual)| actual > f32::EPSILON)
        .map(|(target, actual)| target / actual)
        .fold(f32::INFINITY, f32::min);
        if !fit.is_finite() {
            log::warn!("model for {} has no extent, using fallback", entry.id);
            return self.attach_fallback(root, item, entry, material);
        }

        let factor = fit * entry.model_override();
        let lift = if entry.floor_aligned_origin {
            0.0
        } else {
            -bounds.min.y * factor + MODEL_FLOOR_GAP
        };
        let mut node = Node::with_mesh(NodeTag::Part, mesh, material);
        node.scale = Vec3::new(factor, factor, factor);
        node.position = Vec3::new(0.0, lift, 0.0);
        self.scene.add_child(root, node);
        LoadState::LoadedModel
    }

    fn furniture_material(&mut self, state: &DesignState, item: &FurnitureInstance, entry: &CatalogEntry) -> Material {
        let id = item.instance_id;
        let level = state.effective_shading(id);
        let texture = state.effective_texture(id, false);
        let color = base_color(
            texture.map(|t| t.color.as_str()),
            item.color.as_deref(),
            &entry.default_color,
        );
        let image = texture.and_then(|t| self.texture_image(&t.path));
        shaded_material(color, level, image)
    }

    /// Cached image for `path`, fetching it on first use
    fn texture_image(&mut self, path: &str) -> Option<Rc<Texture>> {
        if path.is_empty() {
            return None;
        }
        if self.textures.begin(path) {
            self.source.request(path);
        }
        self.textures.ready(path)
    }

    /// Patch one instance's nodes after a transform or color edit
    fn sync_instance(&mut self, state: &DesignState, id: InstanceId) {
        let Some(item) = state.design().instance(id) else {
            return;
        };
        let Some(entry) = self.instances.get(&id) else {
            return;
        };
        let (root, load_state, old_scale) = (entry.root, entry.state, entry.scale);

        if let Some(node) = self.scene.get_mut(root) {
            node.position = placement(item, &state.design().room);
            node.rotation_y = yaw(item);
        }
        // Pending loads read the fresh values when they attach
        if load_state == LoadState::Loading || load_state == LoadState::Disposed {
            return;
        }
        let Some(cat) = state.catalog().get(&item.catalog_id) else {
            return;
        };

        self.preview.restore(&mut self.scene, id);
        self.preview_textures.remove(&id);
        let material = self.furniture_material(state, item, cat);

        if old_scale != item.scale {
            for child in self.scene.children(root) {
                self.scene.remove(child);
            }
            let cached = cat.model.as_deref().and_then(|p| self.models.ready(p));
            let new_state = match (load_state, cached) {
                (LoadState::LoadedModel, Some(mesh)) => self.attach_model(root, mesh, item, cat, material),
                _ => self.attach_fallback(root, item, cat, material),
            };
            if let Some(entry) = self.instances.get_mut(&id) {
                entry.state = new_state;
                entry.scale = item.scale;
            }
        } else {
            for node_id in furniture_meshes(&self.scene, root) {
                if let Some(node) = self.scene.get_mut(node_id) {
                    node.material = material.clone();
                }
            }
        }
    }

    fn sync_highlight(&mut self, state: &DesignState) {
        if let Some(old) = self.highlight.take() {
            self.scene.remove(old);
            self.needs_render = true;
        }
        let Some(item) = state.selected_furniture() else {
            return;
        };
        let Some(cat) = state.catalog().get(&item.catalog_id) else {
            return;
        };
        let dims = cat.dimensions;
        self.highlight = Some(build_highlight(
            &mut self.scene,
            item,
            &state.design().room,
            dims.width,
            dims.depth,
        ));
        self.needs_render = true;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Async assets
    // ─────────────────────────────────────────────────────────────────────

    /// Apply finished fetches. Returns true when the scene changed.
    fn poll_assets(&mut self, state: &DesignState) -> bool {
        let mut changed = false;
        for (path, bytes) in self.source.poll() {
            if self.models.is_pending(&path) {
                let decoded = bytes.and_then(|b| decode_model(&b));
                let entry = self.models.finish(&path, decoded);
                for waiter in self.waiters.remove(&path).unwrap_or_default() {
                    changed |= self.complete_model(state, waiter, &entry);
                }
            } else if self.textures.is_pending(&path) {
                let decoded = bytes.and_then(|b| decode_texture(&b));
                if let CacheEntry::Ready(image) = self.textures.finish(&path, decoded) {
                    self.texture_ready(state, &path, image);
                    changed = true;
                }
            } else {
                log::debug!("ignoring unrequested asset {}", path);
            }
        }
        changed
    }

    fn complete_model(&mut self, state: &DesignState, waiter: ModelWaiter, result: &CacheEntry<Mesh>) -> bool {
        let live = waiter.generation == self.generation
            && self.instances.get(&waiter.instance).map_or(false, |e| {
                e.state == LoadState::Loading && e.catalog_id == waiter.catalog_id
            });
        if !live {
            log::debug!(
                "dropping stale model load for {} (generation {}, now {})",
                waiter.instance,
                waiter.generation,
                self.generation
            );
            return false;
        }
        let Some(item) = state.design().instance(waiter.instance) else {
            return false;
        };
        let Some(cat) = state.catalog().get(&item.catalog_id) else {
            return false;
        };
        let Some(root) = self.instance_root(waiter.instance) else {
            return false;
        };

        let material = self.furniture_material(state, item, cat);
        let new_state = match result {
            CacheEntry::Ready(mesh) => self.attach_model(root, Rc::clone(mesh), item, cat, material),
            _ => self.attach_fallback(root, item, cat, material),
        };
        if let Some(entry) = self.instances.get_mut(&waiter.instance) {
            entry.state = new_state;
            entry.scale = item.scale;
        }
        true
    }

    fn texture_ready(&mut self, state: &DesignState, path: &str, image: Rc<Texture>) {
        let ids: Vec<(InstanceId, NodeId, LoadState)> =
            self.instances.iter().map(|(&id, e)| (id, e.root, e.state)).collect();
        for (id, root, load_state) in ids {
            if !matches!(load_state, LoadState::LoadedModel | LoadState::LoadedFallback) {
                continue;
            }
            let committed = state.effective_texture(id, false).map_or(false, |t| t.path == path);
            let previewed = self.preview_textures.get(&id).map_or(false, |p| p == path);

            if committed && self.preview.is_previewing(id) {
                let img = Rc::clone(&image);
                self.preview.update_saved(id, |m| m.texture = Some(Rc::clone(&img)));
            }
            if previewed || (committed && !self.preview.is_previewing(id)) {
                set_texture(&mut self.scene, root, &image);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Preview
    // ─────────────────────────────────────────────────────────────────────

    fn targets(&self, target: PreviewTarget) -> Vec<(InstanceId, NodeId)> {
        let live = |e: &InstanceEntry| e.state != LoadState::Disposed;
        match target {
            PreviewTarget::Instance(id) => self
                .instances
                .get(&id)
                .filter(|e| live(e))
                .map(|e| vec![(id, e.root)])
                .unwrap_or_default(),
            PreviewTarget::All => {
                let mut all: Vec<_> = self
                    .instances
                    .iter()
                    .filter(|(_, e)| live(e))
                    .map(|(&id, e)| (id, e.root))
                    .collect();
                all.sort();
                all
            }
        }
    }

    /// Show a shading level on live nodes without touching the design
    pub fn preview_shading(&mut self, target: PreviewTarget, level: f32) {
        for (id, root) in self.targets(target) {
            self.preview.preview_shading(&mut self.scene, id, root, level);
        }
        self.needs_render = true;
    }

    pub fn preview_texture(&mut self, target: PreviewTarget, texture: &TextureRef) {
        let tint = Color::from_hex_or(&texture.color, Color::FALLBACK_GRAY);
        let image = self.texture_image(&texture.path);
        for (id, root) in self.targets(target) {
            self.preview
                .preview_texture(&mut self.scene, id, root, tint, image.clone());
            self.preview_textures.insert(id, texture.path.clone());
        }
        self.needs_render = true;
    }

    /// Drop every preview and show the committed materials again
    pub fn clear_preview(&mut self) {
        if self.preview.is_empty() {
            return;
        }
        self.preview.restore_all(&mut self.scene);
        self.preview_textures.clear();
        self.needs_render = true;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Interaction
    // ─────────────────────────────────────────────────────────────────────

    /// Select the furniture under a framebuffer pixel; a miss clears the selection
    pub fn pick(&mut self, state: &mut DesignState, x: f32, y: f32) -> DesignResult<Option<InstanceId>> {
        let hit = if self.framebuffer.is_empty() {
            None
        } else {
            let camera = self.orbit.camera();
            let ray = screen_to_ray(x, y, self.framebuffer.width, self.framebuffer.height, &camera);
            pick_furniture(&self.scene, &ray).map(|(id, _)| id)
        };
        state.select(hit)?;
        self.sync_highlight(state);
        Ok(hit)
    }

    pub fn orbit_drag(&mut self, dx: f32, dy: f32) {
        if dx != 0.0 || dy != 0.0 {
            self.orbit.rotate(-dx * ORBIT_SPEED, dy * ORBIT_SPEED);
            self.needs_render = true;
        }
    }

    /// Positive scroll moves closer
    pub fn zoom(&mut self, scroll: f32) {
        if scroll > 0.0 {
            self.orbit.zoom(ZOOM_FACTOR);
        } else if scroll < 0.0 {
            self.orbit.zoom(1.0 / ZOOM_FACTOR);
        } else {
            return;
        }
        self.needs_render = true;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────

    pub fn render(&mut self) {
        self.needs_render = false;
        if self.framebuffer.is_empty() {
            return;
        }
        let camera = self.orbit.camera();
        let fb = &mut self.framebuffer;
        fb.clear(self.settings.background);
        draw_floor_grid(fb, &camera, GRID_Y, GRID_SIZE, GRID_DIVISIONS, GRID_COLOR, GRID_CENTER_COLOR);

        // Translucent overlays go last so they blend over what is behind them
        let mut translucent = Vec::new();
        for (id, node) in self.scene.iter() {
            if node.mesh.is_none() || !self.scene.is_visible(id) {
                continue;
            }
            if node.material.opacity < 1.0 {
                translucent.push(id);
            } else {
                draw_node(fb, &self.scene, id, &camera, &self.settings);
            }
        }
        for id in translucent {
            draw_node(fb, &self.scene, id, &camera, &self.settings);
        }
    }
}

fn draw_node(
    fb: &mut Framebuffer,
    scene: &Scene,
    id: NodeId,
    camera: &crate::rasterizer::Camera,
    settings: &RasterSettings,
) {
    let Some(node) = scene.get(id) else { return };
    let Some(mesh) = &node.mesh else { return };
    let world = mesh.transformed(&scene.world_matrix(id));
    render_mesh(fb, camera, &world.vertices, &world.faces, &node.material, settings);
}

fn set_texture(scene: &mut Scene, root: NodeId, image: &Rc<Texture>) {
    for id in furniture_meshes(scene, root) {
        if let Some(node) = scene.get_mut(id) {
            node.material.texture = Some(Rc::clone(image));
        }
    }
}

/// Drop lights that cannot shade anything
fn lighting(mut settings: RasterSettings) -> RasterSettings {
    settings.lights.retain(|light| {
        let ok = light.direction.len() > 0.5 && light.intensity.is_finite();
        if !ok {
            log::warn!("ignoring unusable light {:?}", light);
        }
        ok
    });
    settings
}
