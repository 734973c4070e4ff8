//! Per-frame input snapshot and widget interaction state

use super::Rect;
use macroquad::prelude::*;

#[derive(Debug, Clone, Copy, Default)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub left_down: bool,
    pub right_down: bool,
    pub left_pressed: bool,  // Just pressed this frame
    pub left_released: bool, // Just released this frame
    pub scroll: f32,
}

impl MouseState {
    /// Read this frame's mouse from macroquad
    pub fn capture() -> Self {
        let (x, y) = mouse_position();
        let (_, wheel_y) = mouse_wheel();
        Self {
            x,
            y,
            left_down: is_mouse_button_down(MouseButton::Left),
            right_down: is_mouse_button_down(MouseButton::Right),
            left_pressed: is_mouse_button_pressed(MouseButton::Left),
            left_released: is_mouse_button_released(MouseButton::Left),
            scroll: wheel_y,
        }
    }

    pub fn inside(&self, rect: &Rect) -> bool {
        rect.contains(self.x, self.y)
    }

    /// Held down over `rect`
    pub fn clicking(&self, rect: &Rect) -> bool {
        self.left_down && rect.contains(self.x, self.y)
    }

    /// Pressed over `rect` this frame
    pub fn clicked(&self, rect: &Rect) -> bool {
        self.left_pressed && rect.contains(self.x, self.y)
    }
}

/// UI context passed through the frame
#[derive(Debug, Default)]
pub struct UiContext {
    pub mouse: MouseState,
    /// Widget that owns the current drag
    pub dragging: Option<u64>,
    /// Widget under the mouse
    pub hot: Option<u64>,
    tooltip: Option<(String, f32, f32)>,
    id_counter: u64,
}

impl UiContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids are positional: the same widget gets the same id every frame
    /// as long as the layout code runs in the same order.
    pub fn next_id(&mut self) -> u64 {
        self.id_counter += 1;
        self.id_counter
    }

    pub fn begin_frame(&mut self, mouse: MouseState) {
        self.mouse = mouse;
        self.hot = None;
        self.tooltip = None;
        self.id_counter = 0;
        if !self.mouse.left_down {
            self.dragging = None;
        }
    }

    pub fn is_dragging(&self, id: u64) -> bool {
        self.dragging == Some(id)
    }

    pub fn start_drag(&mut self, id: u64) {
        self.dragging = Some(id);
    }

    /// Mark hovered, unless something else is being dragged
    pub fn set_hot(&mut self, id: u64) {
        if self.dragging.is_none() || self.dragging == Some(id) {
            self.hot = Some(id);
        }
    }

    pub fn is_hot(&self, id: u64) -> bool {
        self.hot == Some(id)
    }

    /// True while a widget drag is in progress, so canvases ignore the mouse
    pub fn captured(&self) -> bool {
        self.dragging.is_some()
    }

    pub fn set_tooltip(&mut self, text: &str, x: f32, y: f32) {
        self.tooltip = Some((text.to_string(), x, y));
    }

    pub fn tooltip(&self) -> Option<(&str, f32, f32)> {
        self.tooltip.as_ref().map(|(t, x, y)| (t.as_str(), *x, *y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_ends_drag() {
        let mut ctx = UiContext::new();
        ctx.begin_frame(MouseState { left_down: true, ..Default::default() });
        let id = ctx.next_id();
        ctx.start_drag(id);
        assert!(ctx.captured());

        ctx.begin_frame(MouseState::default());
        assert!(!ctx.is_dragging(id));
        assert_eq!(ctx.next_id(), id);
    }

    #[test]
    fn test_drag_blocks_other_hot() {
        let mut ctx = UiContext::new();
        ctx.begin_frame(MouseState { left_down: true, ..Default::default() });
        ctx.start_drag(1);
        ctx.set_hot(2);
        assert!(!ctx.is_hot(2));
        ctx.set_hot(1);
        assert!(ctx.is_hot(1));
    }

    #[test]
    fn test_tooltip_cleared_each_frame() {
        let mut ctx = UiContext::new();
        ctx.set_tooltip("Rotate", 4.0, 5.0);
        assert_eq!(ctx.tooltip(), Some(("Rotate", 4.0, 5.0)));
        ctx.begin_frame(MouseState::default());
        assert!(ctx.tooltip().is_none());
    }
}
