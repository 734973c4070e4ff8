//! RoomCraft: an interior design editor
//!
//! Lay out a room on a 2D floor plan, furnish it from the catalog and look
//! at the result in a software-rendered 3D view. Designs are saved as
//! compressed RON documents under the user's data directory.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod canvas2d;
mod catalog;
mod config;
mod design;
mod editor;
mod rasterizer;
mod storage;
mod ui;
mod view3d;

use app::AppState;
use catalog::Catalog;
use config::EditorConfig;
use design::DesignState;
use editor::{draw_editor, poll_shortcuts, EditorLayout};
use macroquad::prelude::*;
use std::rc::Rc;
use storage::{seed_samples, DesignRepository, FileDesignStore, LocalStorage, MemoryDesignStore};
use ui::{draw_tooltip, MouseState, UiContext};
use view3d::ThreadedAssetSource;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("RoomCraft v{}", VERSION),
        window_width: 1440,
        window_height: 900,
        window_resizable: true,
        high_dpi: true,
        #[cfg(not(target_arch = "wasm32"))]
        fullscreen: false,
        ..Default::default()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging(config: &EditorConfig) {
    env_logger::Builder::new()
        .filter_level(config.log_filter())
        .parse_default_env()
        .init();
}

#[cfg(target_arch = "wasm32")]
fn init_logging(_config: &EditorConfig) {}

/// File store under the data directory, or an in-memory one when that
/// directory cannot be created
fn open_store(config: &EditorConfig) -> Box<dyn DesignRepository> {
    let mut store: Box<dyn DesignRepository> = match std::fs::create_dir_all(&config.data_dir) {
        Ok(()) => Box::new(FileDesignStore::open(config.data_dir.clone())),
        Err(e) => {
            log::warn!(
                "cannot use {}: {}; designs will only last for this session",
                config.data_dir.display(),
                e
            );
            Box::new(MemoryDesignStore::new())
        }
    };
    if config.seed_sample_designs {
        if let Err(e) = seed_samples(store.as_mut()) {
            log::warn!("could not seed sample designs: {}", e);
        }
    }
    store
}

#[macroquad::main(window_conf)]
async fn main() {
    // Crash logging goes first so a panic anywhere below is captured
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let config = EditorConfig::load_or_default();
    init_logging(&config);
    log::info!("RoomCraft {} starting, data in {}", VERSION, config.data_dir.display());

    let store = open_store(&config);
    let design = DesignState::new(store, Rc::new(Catalog::builtin()), config.default_owner.clone());
    let assets = ThreadedAssetSource::new(LocalStorage::with_base_dir(config.asset_dir.clone()));
    let mut app = AppState::new(design, Box::new(assets), config.initial_zoom);

    let mut ctx = UiContext::new();
    let mut layout = EditorLayout::new();
    prevent_quit();

    loop {
        if is_quit_requested() {
            if app.design.is_dirty() {
                log::warn!("closing with unsaved changes to {:?}", app.design.design().name);
            }
            app.shutdown();
            break;
        }

        ctx.begin_frame(MouseState::capture());

        let mut actions = draw_editor(&mut ctx, &mut layout, &mut app);
        // Dialogs own the keyboard while open
        if !app.is_modal() {
            actions.extend(poll_shortcuts());
        }
        app.apply_all(actions);

        draw_tooltip(&ctx);
        next_frame().await;
    }
}
