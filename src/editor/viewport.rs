//! Plan and 3D viewports: input routing and framebuffer display

use crate::canvas2d::{PlanView, PointerTracker};
use crate::design::DesignState;
use crate::rasterizer::Framebuffer;
use crate::ui::{Rect, UiContext, BORDER_COLOR, FONT_SIZE_SMALL, TEXT_DIM};
use crate::view3d::SceneView;
use macroquad::prelude::*;

/// The 3D view renders at this fraction of the viewport size
pub const SCENE_RESOLUTION_SCALE: f32 = 0.5;
/// Mouse travel (px) under which a press-release counts as a click
const CLICK_SLOP: f32 = 4.0;

/// What one frame of mouse input means for the 3D view
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GestureOutput {
    pub orbit: Option<(f32, f32)>,
    /// Click position, viewport-local pixels
    pub click: Option<(f32, f32)>,
}

/// Tells clicks (pick) from drags (orbit)
#[derive(Debug, Default)]
pub struct OrbitGesture {
    start: Option<(f32, f32)>,
    last: (f32, f32),
    dragged: bool,
}

impl OrbitGesture {
    /// `x`, `y` are viewport-local. `pressed` only counts inside the viewport.
    pub fn update(&mut self, x: f32, y: f32, pressed: bool, down: bool, inside: bool) -> GestureOutput {
        let mut out = GestureOutput::default();

        if pressed && inside {
            self.start = Some((x, y));
            self.last = (x, y);
            self.dragged = false;
            return out;
        }
        let Some(start) = self.start else {
            return out;
        };

        if down {
            let (dx, dy) = (x - self.last.0, y - self.last.1);
            if !self.dragged && ((x - start.0).abs() > CLICK_SLOP || (y - start.1).abs() > CLICK_SLOP) {
                self.dragged = true;
            }
            if self.dragged && (dx != 0.0 || dy != 0.0) {
                out.orbit = Some((dx, dy));
            }
            self.last = (x, y);
        } else {
            if !self.dragged && inside {
                out.click = Some(start);
            }
            self.start = None;
        }
        out
    }
}

/// Upload a framebuffer and stretch it over `rect`
fn blit(fb: &Framebuffer, rect: Rect) {
    if fb.is_empty() {
        return;
    }
    let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
    texture.set_filter(FilterMode::Linear);
    draw_texture_ex(
        &texture,
        rect.x,
        rect.y,
        WHITE,
        DrawTextureParams {
            dest_size: Some(Vec2::new(rect.w, rect.h)),
            ..Default::default()
        },
    );
}

pub fn draw_plan_viewport(
    ctx: &mut UiContext,
    rect: Rect,
    state: &mut DesignState,
    plan: &mut PlanView,
    pointer: &mut PointerTracker,
) {
    let (w, h) = (rect.w.max(0.0) as usize, rect.h.max(0.0) as usize);

    if !ctx.captured() {
        for event in pointer.events(rect, &ctx.mouse, &touches()) {
            plan.handle_pointer(state, event);
        }
        if ctx.mouse.inside(&rect) && ctx.mouse.scroll != 0.0 {
            if ctx.mouse.scroll > 0.0 {
                plan.zoom_in();
            } else {
                plan.zoom_out();
            }
        }
    }

    plan.update(state, w, h);
    blit(&plan.framebuffer, rect);
    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, BORDER_COLOR);
    draw_text(
        &format!("Zoom {:.0}%", plan.zoom() * 100.0),
        rect.x + 8.0,
        rect.bottom() - 8.0,
        FONT_SIZE_SMALL,
        TEXT_DIM,
    );
}

pub fn draw_scene_viewport(
    ctx: &mut UiContext,
    rect: Rect,
    state: &mut DesignState,
    scene: &mut SceneView,
    gesture: &mut OrbitGesture,
) -> Option<String> {
    let mut error = None;
    let inside = ctx.mouse.inside(&rect);

    if !ctx.captured() {
        let (lx, ly) = (ctx.mouse.x - rect.x, ctx.mouse.y - rect.y);
        let down = ctx.mouse.left_down || ctx.mouse.right_down;
        let pressed = ctx.mouse.left_pressed || is_mouse_button_pressed(MouseButton::Right);
        let out = gesture.update(lx, ly, pressed, down, inside);
        if let Some((dx, dy)) = out.orbit {
            scene.orbit_drag(dx, dy);
        }
        if let Some((cx, cy)) = out.click {
            let (px, py) = (cx * SCENE_RESOLUTION_SCALE, cy * SCENE_RESOLUTION_SCALE);
            if let Err(e) = scene.pick(state, px, py) {
                error = Some(e.to_string());
            }
        }
        if inside {
            scene.zoom(ctx.mouse.scroll);
        }
    }

    let w = (rect.w * SCENE_RESOLUTION_SCALE).max(0.0) as usize;
    let h = (rect.h * SCENE_RESOLUTION_SCALE).max(0.0) as usize;
    scene.update(state, w, h);
    blit(&scene.framebuffer, rect);
    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, BORDER_COLOR);
    draw_text(
        "Drag to orbit, scroll to zoom, click to select",
        rect.x + 8.0,
        rect.bottom() - 8.0,
        FONT_SIZE_SMALL,
        TEXT_DIM,
    );
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_release_is_click() {
        let mut g = OrbitGesture::default();
        g.update(50.0, 40.0, true, true, true);
        g.update(52.0, 41.0, false, true, true);
        let out = g.update(52.0, 41.0, false, false, true);
        assert_eq!(out.click, Some((50.0, 40.0)));
        assert_eq!(out.orbit, None);
    }

    #[test]
    fn test_drag_orbits_without_click() {
        let mut g = OrbitGesture::default();
        g.update(50.0, 40.0, true, true, true);
        let out = g.update(70.0, 40.0, false, true, true);
        assert_eq!(out.orbit, Some((20.0, 0.0)));
        let out = g.update(75.0, 45.0, false, true, true);
        assert_eq!(out.orbit, Some((5.0, 5.0)));
        let out = g.update(75.0, 45.0, false, false, true);
        assert_eq!(out.click, None);
    }

    #[test]
    fn test_press_outside_is_ignored() {
        let mut g = OrbitGesture::default();
        g.update(-5.0, 10.0, true, true, false);
        let out = g.update(40.0, 10.0, false, true, true);
        assert_eq!(out, GestureOutput::default());
    }
}
