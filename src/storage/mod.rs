//! Design persistence
//!
//! The editor talks to storage through `DesignRepository`. Two backends:
//! - `FileDesignStore`: one brotli-compressed RON file per design on disk
//! - `MemoryDesignStore`: a plain map, used for sessions without a data
//!   directory and in tests
//!
//! Every operation is synchronous from the caller's point of view. Model and
//! texture reads for the 3D view go through the fire-and-poll helpers in
//! `async_ops` instead.

pub mod async_ops;
pub mod document;
pub mod file_store;
pub mod legacy;
pub mod local;
pub mod memory;

pub use async_ops::{read_async, AsyncOp};
pub use file_store::FileDesignStore;
pub use local::LocalStorage;
pub use memory::MemoryDesignStore;

use crate::design::Design;

/// Storage error types
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Encode(String),
    #[error("malformed design document: {0}")]
    Decode(String),
    #[error("compression error: {0}")]
    Compression(String),
    #[error("{0}")]
    Other(String),
}

impl StorageError {
    /// Map an I/O error, keeping missing files distinguishable
    pub fn from_io(e: std::io::Error, path: &str) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound(path.to_string())
        } else {
            StorageError::Io(e)
        }
    }
}

/// Persistence contract consumed by the design state.
///
/// Documents are scoped by the `owner` field the caller supplies; the store
/// assigns ids and timestamps.
pub trait DesignRepository {
    /// Store a new design, assigning id and timestamps
    fn create(&mut self, design: &Design) -> Result<Design, StorageError>;

    /// Overwrite the content of an existing design, refreshing `updated_at`
    fn update(&mut self, id: &str, design: &Design) -> Result<Design, StorageError>;

    fn rename(&mut self, id: &str, name: &str) -> Result<Design, StorageError>;

    /// Remove a design. Deleting a missing id is not an error.
    fn delete(&mut self, id: &str) -> Result<bool, StorageError>;

    fn get_by_id(&self, id: &str) -> Result<Design, StorageError>;

    fn list_all(&self) -> Result<Vec<Design>, StorageError>;

    /// Store a design as-is, keeping its id and timestamps when present
    fn import(&mut self, design: Design) -> Result<Design, StorageError>;

    fn list_for_owner(&self, owner: &str) -> Result<Vec<Design>, StorageError> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|d| d.owner == owner)
            .collect())
    }

    fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.list_all()?.is_empty())
    }
}

/// Milliseconds since the Unix epoch
pub fn now_millis() -> u64 {
    (macroquad::miniquad::date::now() * 1000.0) as u64
}

/// Generate a `design-<millis>` id that is not in `taken`
pub fn generate_id(now: u64, taken: impl Fn(&str) -> bool) -> String {
    let base = format!("design-{}", now);
    if !taken(&base) {
        return base;
    }
    let mut n = 1u32;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Seed an empty store with the bundled sample designs
pub fn seed_samples(store: &mut dyn DesignRepository) -> Result<usize, StorageError> {
    if !store.is_empty()? {
        return Ok(0);
    }
    let samples = legacy::sample_designs()?;
    let count = samples.len();
    for design in samples {
        store.import(design)?;
    }
    log::info!("seeded {} sample designs", count);
    Ok(count)
}
