//! 3D room view
//!
//! A retained scene graph mirrors the design: the room shell, one root
//! node per placed instance and a translucent marker under the selection.
//! Models stream in through an [`AssetSource`]; a procedural stand-in is
//! shown for items that have no model or fail to load.

mod assets;
mod materials;
mod mesh;
mod obj;
mod pick;
mod room;
mod scene;
mod view;

pub use assets::{AssetSource, ThreadedAssetSource};
#[cfg(test)]
pub use assets::MemoryAssetSource;
pub use view::{LoadState, PreviewTarget, SceneView};
