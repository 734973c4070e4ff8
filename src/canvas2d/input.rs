//! Mouse and touch input translated into plan pointer events

use super::view::PointerEvent;
use crate::ui::{MouseState, Rect};
use macroquad::input::{Touch, TouchPhase};

/// Tracks pointer state across frames for one canvas rectangle
#[derive(Debug, Default)]
pub struct PointerTracker {
    last: Option<(f32, f32)>,
    pressed: bool,
    touch_id: Option<u64>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events for this frame, in canvas-local pixels. When touches are
    /// present the synthesized mouse state is ignored.
    pub fn events(&mut self, rect: Rect, mouse: &MouseState, touches: &[Touch]) -> Vec<PointerEvent> {
        if !touches.is_empty() || self.touch_id.is_some() {
            return self.touch_events(rect, touches);
        }
        self.mouse_events(rect, mouse)
    }

    fn mouse_events(&mut self, rect: Rect, mouse: &MouseState) -> Vec<PointerEvent> {
        let mut out = Vec::new();
        let local = (mouse.x - rect.x, mouse.y - rect.y);
        let inside = mouse.inside(&rect);

        if mouse.left_pressed && inside {
            out.push(PointerEvent::Down { x: local.0, y: local.1 });
            self.pressed = true;
        } else if self.pressed && self.last != Some(local) {
            if inside {
                out.push(PointerEvent::Move { x: local.0, y: local.1 });
            } else {
                out.push(PointerEvent::Leave);
                self.pressed = false;
            }
        }
        if mouse.left_released && self.pressed {
            out.push(PointerEvent::Up);
            self.pressed = false;
        }
        self.last = Some(local);
        out
    }

    fn touch_events(&mut self, rect: Rect, touches: &[Touch]) -> Vec<PointerEvent> {
        let mut out = Vec::new();
        let tracked = match self.touch_id {
            Some(id) => touches.iter().find(|t| t.id == id),
            None => touches.iter().find(|t| matches!(t.phase, TouchPhase::Started)),
        };
        let Some(touch) = tracked else {
            // Tracked finger vanished without an end phase
            if self.touch_id.take().is_some() {
                out.push(PointerEvent::Leave);
            }
            return out;
        };
        let local = (touch.position.x - rect.x, touch.position.y - rect.y);
        match touch.phase {
            TouchPhase::Started => {
                if rect.contains(touch.position.x, touch.position.y) {
                    self.touch_id = Some(touch.id);
                    out.push(PointerEvent::Down { x: local.0, y: local.1 });
                }
            }
            TouchPhase::Moved | TouchPhase::Stationary => {
                if self.touch_id.is_some() && self.last != Some(local) {
                    out.push(PointerEvent::Move { x: local.0, y: local.1 });
                }
            }
            TouchPhase::Ended => {
                self.touch_id = None;
                out.push(PointerEvent::Up);
            }
            TouchPhase::Cancelled => {
                self.touch_id = None;
                out.push(PointerEvent::Leave);
            }
        }
        self.last = Some(local);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::vec2;

    fn mouse(x: f32, y: f32, pressed: bool, released: bool) -> MouseState {
        MouseState {
            x,
            y,
            left_down: pressed,
            left_pressed: pressed,
            left_released: released,
            ..Default::default()
        }
    }

    fn touch(id: u64, phase: TouchPhase, x: f32, y: f32) -> Touch {
        Touch { id, phase, position: vec2(x, y) }
    }

    #[test]
    fn test_mouse_press_drag_release() {
        let rect = Rect::new(10.0, 20.0, 100.0, 100.0);
        let mut tracker = PointerTracker::new();
        assert_eq!(
            tracker.events(rect, &mouse(30.0, 40.0, true, false), &[]),
            vec![PointerEvent::Down { x: 20.0, y: 20.0 }]
        );
        let mut held = mouse(50.0, 40.0, false, false);
        held.left_down = true;
        assert_eq!(tracker.events(rect, &held, &[]), vec![PointerEvent::Move { x: 40.0, y: 20.0 }]);
        assert_eq!(tracker.events(rect, &mouse(50.0, 40.0, false, true), &[]), vec![PointerEvent::Up]);
    }

    #[test]
    fn test_mouse_leaving_rect_ends_drag() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut tracker = PointerTracker::new();
        tracker.events(rect, &mouse(50.0, 50.0, true, false), &[]);
        let mut outside = mouse(150.0, 50.0, false, false);
        outside.left_down = true;
        assert_eq!(tracker.events(rect, &outside, &[]), vec![PointerEvent::Leave]);
        assert!(tracker.events(rect, &mouse(150.0, 50.0, false, true), &[]).is_empty());
    }

    #[test]
    fn test_touch_translates_to_pointer() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut tracker = PointerTracker::new();
        let idle = MouseState::default();
        assert_eq!(
            tracker.events(rect, &idle, &[touch(7, TouchPhase::Started, 10.0, 10.0)]),
            vec![PointerEvent::Down { x: 10.0, y: 10.0 }]
        );
        assert_eq!(
            tracker.events(rect, &idle, &[touch(7, TouchPhase::Moved, 20.0, 15.0)]),
            vec![PointerEvent::Move { x: 20.0, y: 15.0 }]
        );
        assert_eq!(
            tracker.events(rect, &idle, &[touch(7, TouchPhase::Ended, 20.0, 15.0)]),
            vec![PointerEvent::Up]
        );
        assert!(tracker.events(rect, &idle, &[]).is_empty());
    }

    #[test]
    fn test_lost_touch_is_a_leave() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut tracker = PointerTracker::new();
        let idle = MouseState::default();
        tracker.events(rect, &idle, &[touch(1, TouchPhase::Started, 10.0, 10.0)]);
        assert_eq!(tracker.events(rect, &idle, &[]), vec![PointerEvent::Leave]);
    }
}
