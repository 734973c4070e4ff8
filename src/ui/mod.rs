//! Immediate-mode UI for the editor shell
//!
//! Nothing is retained between frames except what the caller keeps: panels
//! are laid out with rectangle arithmetic and drawn straight through
//! macroquad every frame.

mod input;
mod panel;
mod rect;
mod text_input;
mod theme;
mod widgets;

pub use input::{MouseState, UiContext};
pub use panel::{draw_panel, panel_content_rect, SplitPanel};
pub use rect::Rect;
pub use text_input::{draw_text_input, TextInputOutcome, TextInputState};
pub use theme::*;
pub use widgets::{
    button, draw_label, draw_tooltip, slider, stepper, swatch, toggle_button, Toolbar,
};
