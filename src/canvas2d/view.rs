//! Top-down plan view
//!
//! Redraws the whole plan into its framebuffer whenever the design, the
//! selection, the zoom or the canvas size changes. Tens of items make a full
//! redraw cheaper than tracking damage.

use super::hit::{clamp_to_room, hit_test, visible_color, Footprint};
use super::transform::{clamp_zoom, PlanTransform, ZOOM_STEP};
use crate::design::{DesignState, FurniturePatch, InstanceId, SubscriberId};
use crate::rasterizer::{Color, Framebuffer};

/// Pointer input in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
    Leave,
}

#[derive(Debug, Clone, Copy)]
struct DragSession {
    id: InstanceId,
    last_x: f32,
    last_y: f32,
}

pub struct PlanView {
    pub framebuffer: Framebuffer,
    subscriber: SubscriberId,
    zoom: f32,
    drag: Option<DragSession>,
    needs_redraw: bool,
}

impl PlanView {
    pub fn new(state: &mut DesignState, initial_zoom: f32) -> Self {
        Self {
            framebuffer: Framebuffer::new(0, 0),
            subscriber: state.subscribe(),
            zoom: clamp_zoom(initial_zoom),
            drag: None,
            needs_redraw: true,
        }
    }

    /// Stop observing the design
    pub fn detach(&mut self, state: &mut DesignState) {
        state.unsubscribe(self.subscriber);
        self.drag = None;
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        let zoom = clamp_zoom(zoom);
        if zoom != self.zoom {
            self.zoom = zoom;
            self.needs_redraw = true;
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(((self.zoom + ZOOM_STEP) * 10.0).round() / 10.0);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(((self.zoom - ZOOM_STEP) * 10.0).round() / 10.0);
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn transform(&self, state: &DesignState) -> PlanTransform {
        PlanTransform::fit(
            self.framebuffer.width as f32,
            self.framebuffer.height as f32,
            &state.design().room,
            self.zoom,
        )
    }

    /// Per-frame sync. Returns true when the framebuffer was redrawn.
    pub fn update(&mut self, state: &mut DesignState, width: usize, height: usize) -> bool {
        if width != self.framebuffer.width || height != self.framebuffer.height {
            self.framebuffer.resize(width, height);
            self.needs_redraw = true;
        }
        if !state.take_changes(self.subscriber).is_empty() {
            self.needs_redraw = true;
        }
        if !self.needs_redraw || self.framebuffer.is_empty() {
            return false;
        }
        self.redraw(state);
        true
    }

    /// Clear and draw room and furniture
    pub fn redraw(&mut self, state: &DesignState) {
        self.needs_redraw = false;
        if self.framebuffer.is_empty() {
            return;
        }
        let transform = self.transform(state);
        let design = state.design();
        let fb = &mut self.framebuffer;

        fb.clear(Color::WHITE);

        let outline = transform.room_outline(&design.room);
        fb.fill_polygon(&outline, Color::from_hex_or(&design.room.floor_color, Color::FALLBACK_GRAY));
        fb.stroke_polygon(&outline, 2.0, Color::BLACK);

        for item in &design.furniture {
            let Some(footprint) = Footprint::of(item, state.catalog(), &transform) else {
                continue;
            };
            let fill = match item.color.as_deref() {
                Some(c) => visible_color(Some(c)),
                None => visible_color(state.catalog().get(&item.catalog_id).map(|e| e.default_color.as_str())),
            };
            let corners = footprint.corners();
            fb.fill_polygon(&corners, fill);
            if state.selected() == Some(item.instance_id) {
                fb.stroke_polygon(&corners, 3.0, Color::SELECTION);
            } else {
                fb.stroke_polygon(&corners, 1.0, Color::BLACK);
            }
        }
    }

    pub fn handle_pointer(&mut self, state: &mut DesignState, event: PointerEvent) {
        match event {
            PointerEvent::Down { x, y } => {
                let transform = self.transform(state);
                let hit = hit_test(state.design(), state.catalog(), &transform, x, y);
                match state.select(hit) {
                    Ok(()) => self.drag = hit.map(|id| DragSession { id, last_x: x, last_y: y }),
                    Err(e) => {
                        log::debug!("selection failed: {}", e);
                        self.drag = None;
                    }
                }
            }
            PointerEvent::Move { x, y } => {
                if let Some(session) = self.drag {
                    self.drag_to(state, session, x, y);
                }
            }
            PointerEvent::Up | PointerEvent::Leave => {
                self.drag = None;
            }
        }
    }

    fn drag_to(&mut self, state: &mut DesignState, session: DragSession, x: f32, y: f32) {
        let dx = (x - session.last_x) / self.zoom;
        let dy = (y - session.last_y) / self.zoom;

        let design = state.design();
        let target = design.instance(session.id).and_then(|item| {
            let entry = state.catalog().get(&item.catalog_id)?;
            let half_w = entry.dimensions.width * item.scale * 0.5;
            let half_d = entry.dimensions.depth * item.scale * 0.5;
            Some(clamp_to_room(item.x + dx, item.y + dy, half_w, half_d, &design.room))
        });

        let Some((nx, ny)) = target else {
            self.drag = None;
            return;
        };
        match state.update_furniture(session.id, FurniturePatch::position(nx, ny)) {
            Ok(()) => {
                self.drag = Some(DragSession { last_x: x, last_y: y, ..session });
            }
            Err(e) => {
                log::debug!("drag ended: {}", e);
                self.drag = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, CatalogEntry, Category, Dimensions};
    use crate::design::{RoomPatch, RoomShape};
    use crate::storage::MemoryDesignStore;
    use std::rc::Rc;

    fn entry(id: &str, width: f32, depth: f32) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            name: id.to_string(),
            category: Category::Chairs,
            dimensions: Dimensions::new(width, depth, 80.0),
            default_color: "#FFFFFF".to_string(),
            model: None,
            model_scale: 1.0,
            visual_boost: 1.0,
            floor_aligned_origin: false,
        }
    }

    fn state() -> DesignState {
        let catalog = Catalog::with_furniture(vec![entry("chair", 50.0, 50.0)]);
        DesignState::new(Box::new(MemoryDesignStore::new()), Rc::new(catalog), "u1")
    }

    fn room(state: &mut DesignState, width: f32, depth: f32) {
        state.update_room(RoomPatch {
            width: Some(width),
            depth: Some(depth),
            ..Default::default()
        });
    }

    #[test]
    fn test_drag_is_clamped_to_room() {
        let mut state = state();
        room(&mut state, 120.0, 300.0);
        let id = state.add_furniture("chair", 100.0, 150.0).unwrap();

        let mut view = PlanView::new(&mut state, 1.0);
        view.update(&mut state, 200, 400);
        let t = view.transform(&state);
        let (sx, sy) = t.to_screen(100.0, 150.0);

        view.handle_pointer(&mut state, PointerEvent::Down { x: sx, y: sy });
        assert_eq!(state.selected(), Some(id));
        assert!(view.is_dragging());

        view.handle_pointer(&mut state, PointerEvent::Move { x: sx + 100.0, y: sy });
        let item = state.design().instance(id).unwrap();
        assert_eq!(item.x, 95.0);
        assert_eq!(item.y, 150.0);

        view.handle_pointer(&mut state, PointerEvent::Leave);
        assert!(!view.is_dragging());
        view.handle_pointer(&mut state, PointerEvent::Move { x: 0.0, y: 0.0 });
        assert_eq!(state.design().instance(id).unwrap().x, 95.0);
    }

    #[test]
    fn test_drag_scales_by_zoom() {
        let mut state = state();
        room(&mut state, 500.0, 400.0);
        let id = state.add_furniture("chair", 200.0, 200.0).unwrap();

        let mut view = PlanView::new(&mut state, 0.5);
        view.update(&mut state, 400, 400);
        let (sx, sy) = view.transform(&state).to_screen(200.0, 200.0);
        view.handle_pointer(&mut state, PointerEvent::Down { x: sx, y: sy });
        view.handle_pointer(&mut state, PointerEvent::Move { x: sx + 10.0, y: sy - 5.0 });
        view.handle_pointer(&mut state, PointerEvent::Up);

        let item = state.design().instance(id).unwrap();
        assert_eq!((item.x, item.y), (220.0, 190.0));
    }

    #[test]
    fn test_click_on_empty_floor_clears_selection() {
        let mut state = state();
        room(&mut state, 500.0, 400.0);
        state.add_furniture("chair", 100.0, 100.0).unwrap();
        assert!(state.selected().is_some());

        let mut view = PlanView::new(&mut state, 1.0);
        view.update(&mut state, 500, 400);
        view.handle_pointer(&mut state, PointerEvent::Down { x: 400.0, y: 300.0 });
        assert_eq!(state.selected(), None);
        assert!(!view.is_dragging());
    }

    #[test]
    fn test_click_switches_selection_and_starts_drag() {
        let mut state = state();
        room(&mut state, 500.0, 400.0);
        let first = state.add_furniture("chair", 100.0, 100.0).unwrap();
        let second = state.add_furniture("chair", 300.0, 250.0).unwrap();
        assert_eq!(state.selected(), Some(second));

        let mut view = PlanView::new(&mut state, 1.0);
        view.update(&mut state, 500, 400);
        let (sx, sy) = view.transform(&state).to_screen(100.0, 100.0);
        view.handle_pointer(&mut state, PointerEvent::Down { x: sx, y: sy });
        assert_eq!(state.selected(), Some(first));
        assert!(view.is_dragging());
    }

    #[test]
    fn test_redraws_only_on_change() {
        let mut state = state();
        let mut view = PlanView::new(&mut state, 0.5);
        assert!(!view.update(&mut state, 0, 0));
        assert!(view.update(&mut state, 300, 200));
        assert!(!view.update(&mut state, 300, 200));

        state.add_furniture("chair", 100.0, 100.0).unwrap();
        assert!(view.update(&mut state, 300, 200));
        assert!(!view.update(&mut state, 300, 200));

        view.zoom_in();
        assert!(view.update(&mut state, 300, 200));
        assert!(view.update(&mut state, 301, 200));
    }

    #[test]
    fn test_draws_selection_and_fallback_fill() {
        let mut state = state();
        room(&mut state, 400.0, 400.0);
        let id = state.add_furniture("chair", 200.0, 200.0).unwrap();
        state.select(None).unwrap();

        let mut view = PlanView::new(&mut state, 1.0);
        view.update(&mut state, 400, 400);
        // White catalog color renders gray
        assert_eq!(view.framebuffer.get_pixel(200, 200), Some(Color::FALLBACK_GRAY));
        assert_eq!(view.framebuffer.get_pixel(175, 200), Some(Color::BLACK));

        state.select(Some(id)).unwrap();
        view.update(&mut state, 400, 400);
        assert_eq!(view.framebuffer.get_pixel(175, 200), Some(Color::SELECTION));
    }

    #[test]
    fn test_l_shape_leaves_notch_unfilled() {
        let mut state = state();
        state.update_room(RoomPatch {
            width: Some(500.0),
            depth: Some(400.0),
            shape: Some(RoomShape::LShaped),
            floor_color: Some("#A9A9A9".to_string()),
            ..Default::default()
        });
        let mut view = PlanView::new(&mut state, 1.0);
        view.update(&mut state, 500, 400);
        assert_eq!(view.framebuffer.get_pixel(100, 350), Some(Color::new(0xA9, 0xA9, 0xA9)));
        assert_eq!(view.framebuffer.get_pixel(400, 350), Some(Color::WHITE));
    }

    #[test]
    fn test_zoom_steps_and_clamps() {
        let mut state = state();
        let mut view = PlanView::new(&mut state, 0.5);
        view.zoom_in();
        assert_eq!(view.zoom(), 0.6);
        for _ in 0..20 {
            view.zoom_out();
        }
        assert_eq!(view.zoom(), 0.2);
        for _ in 0..20 {
            view.zoom_in();
        }
        assert_eq!(view.zoom(), 1.5);
    }
}
