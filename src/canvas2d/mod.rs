//! 2D floor plan
//!
//! A top-down rendition of the current design with selection and dragging.
//! Drawing goes into a software framebuffer; all edits are written back
//! through `DesignState`.

mod controls;
mod hit;
mod input;
mod transform;
mod view;

pub use controls::{remove_selected, rotate_selected, scale_selected};
pub use input::PointerTracker;
pub use transform::{clamp_zoom, MAX_ZOOM};
pub use view::PlanView;
