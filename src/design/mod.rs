//! Design document, selection and the authoritative design state
//!
//! `DesignState` is the single owner of the current design. Both renderers
//! and the editor panels read snapshots from it and request mutations through
//! its API; nothing else mutates design fields.

mod changes;
mod error;
mod model;
mod selection;
mod state;

pub use changes::SubscriberId;
pub use error::{DesignError, DesignResult};
pub use model::*;
pub use selection::Selection;
pub use state::{FurniturePatch, RoomPatch, SaveOverrides, ShadingPatch, DesignState};
