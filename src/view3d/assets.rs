//! Model and texture fetching for the 3D view
//!
//! Requests are fire-and-poll: `request` starts a background read, `poll`
//! hands back whatever finished since the last frame. Decoded results are
//! cached per path for the whole session, failures included, so a broken
//! file is fetched once.

use super::mesh::Mesh;
use super::obj::ObjImporter;
use crate::rasterizer::Texture;
use crate::storage::{read_async, AsyncOp, LocalStorage, StorageError};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(thiserror::Error, Debug)]
pub enum AssetLoadError {
    #[error("asset read failed: {0}")]
    Io(#[from] StorageError),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("image decode failed: {0}")]
    Image(String),
}

/// Raw bytes provider for model and texture files
pub trait AssetSource {
    /// Start fetching `path`. Duplicate requests may be ignored.
    fn request(&mut self, path: &str);
    /// Finished fetches since the last call
    fn poll(&mut self) -> Vec<(String, Result<Vec<u8>, AssetLoadError>)>;
}

/// Reads files below the asset directory on worker threads
pub struct ThreadedAssetSource {
    storage: LocalStorage,
    pending: Vec<(String, AsyncOp<Vec<u8>>)>,
}

impl ThreadedAssetSource {
    pub fn new(storage: LocalStorage) -> Self {
        Self {
            storage,
            pending: Vec::new(),
        }
    }
}

impl AssetSource for ThreadedAssetSource {
    fn request(&mut self, path: &str) {
        if self.pending.iter().any(|(p, _)| p == path) {
            return;
        }
        log::debug!("fetching asset {}", path);
        self.pending.push((path.to_string(), read_async(&self.storage, path)));
    }

    fn poll(&mut self) -> Vec<(String, Result<Vec<u8>, AssetLoadError>)> {
        let mut done = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].1.is_complete() {
                let (path, op) = self.pending.swap_remove(i);
                let result = match op.take() {
                    Some(r) => r.map_err(AssetLoadError::from),
                    None => Err(AssetLoadError::Io(StorageError::Other("read vanished".into()))),
                };
                done.push((path, result));
            } else {
                i += 1;
            }
        }
        done
    }
}

/// In-memory source; completes requests on the next poll
#[cfg(test)]
#[derive(Default)]
pub struct MemoryAssetSource {
    files: HashMap<String, Vec<u8>>,
    queued: Vec<String>,
    /// Every path ever requested, in order
    pub requests: Vec<String>,
}

#[cfg(test)]
impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.to_string(), bytes.into());
        self
    }
}

#[cfg(test)]
impl AssetSource for MemoryAssetSource {
    fn request(&mut self, path: &str) {
        self.requests.push(path.to_string());
        self.queued.push(path.to_string());
    }

    fn poll(&mut self) -> Vec<(String, Result<Vec<u8>, AssetLoadError>)> {
        self.queued
            .drain(..)
            .map(|path| {
                let result = self
                    .files
                    .get(&path)
                    .cloned()
                    .ok_or_else(|| AssetLoadError::Io(StorageError::NotFound(path.clone())));
                (path, result)
            })
            .collect()
    }
}

#[derive(Debug)]
pub enum CacheEntry<T> {
    Pending,
    Ready(Rc<T>),
    Failed,
}

// Derive would demand `T: Clone`; only the Rc is cloned
impl<T> Clone for CacheEntry<T> {
    fn clone(&self) -> Self {
        match self {
            CacheEntry::Pending => CacheEntry::Pending,
            CacheEntry::Ready(v) => CacheEntry::Ready(Rc::clone(v)),
            CacheEntry::Failed => CacheEntry::Failed,
        }
    }
}

/// Per-path cache of decoded assets
#[derive(Debug)]
pub struct AssetCache<T> {
    entries: HashMap<String, CacheEntry<T>>,
}

impl<T> Default for AssetCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> AssetCache<T> {
    pub fn get(&self, path: &str) -> Option<&CacheEntry<T>> {
        self.entries.get(path)
    }

    pub fn ready(&self, path: &str) -> Option<Rc<T>> {
        match self.entries.get(path) {
            Some(CacheEntry::Ready(v)) => Some(Rc::clone(v)),
            _ => None,
        }
    }

    /// Mark `path` pending. Returns true when the caller should fetch it.
    pub fn begin(&mut self, path: &str) -> bool {
        if self.entries.contains_key(path) {
            return false;
        }
        self.entries.insert(path.to_string(), CacheEntry::Pending);
        true
    }

    pub fn finish(&mut self, path: &str, result: Result<T, AssetLoadError>) -> CacheEntry<T> {
        let entry = match result {
            Ok(value) => CacheEntry::Ready(Rc::new(value)),
            Err(e) => {
                log::warn!("failed to load {}: {}", path, e);
                CacheEntry::Failed
            }
        };
        self.entries.insert(path.to_string(), entry.clone());
        entry
    }

    pub fn is_pending(&self, path: &str) -> bool {
        matches!(self.entries.get(path), Some(CacheEntry::Pending))
    }
}

pub fn decode_model(bytes: &[u8]) -> Result<Mesh, AssetLoadError> {
    let text = std::str::from_utf8(bytes).map_err(|e| AssetLoadError::Parse(format!("not UTF-8: {}", e)))?;
    ObjImporter::parse(text)
}

pub fn decode_texture(bytes: &[u8]) -> Result<Texture, AssetLoadError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| AssetLoadError::Image(e.to_string()))?
        .to_rgba8();
    let (w, h) = img.dimensions();
    Texture::from_rgba(w as usize, h as usize, img.as_raw())
        .ok_or_else(|| AssetLoadError::Image(format!("bad pixel buffer for {}x{} image", w, h)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_fetches_once() {
        let mut cache: AssetCache<u32> = AssetCache::default();
        assert!(cache.begin("a"));
        assert!(!cache.begin("a"));
        assert!(cache.is_pending("a"));
        cache.finish("a", Ok(7));
        assert_eq!(cache.ready("a").as_deref(), Some(&7));

        assert!(cache.begin("b"));
        cache.finish("b", Err(AssetLoadError::Parse("bad".into())));
        assert!(matches!(cache.get("b"), Some(CacheEntry::Failed)));
        // Failures stay cached
        assert!(!cache.begin("b"));
    }

    #[test]
    fn test_cache_holds_non_clone_values() {
        // Meshes are not Clone; the cache only shares them through Rc
        struct Heavy(Vec<u8>);
        let mut cache: AssetCache<Heavy> = AssetCache::default();
        assert!(cache.begin("m"));
        let entry = cache.finish("m", Ok(Heavy(vec![1, 2, 3])));
        let CacheEntry::Ready(value) = entry else {
            panic!("expected a ready entry");
        };
        let cached = cache.ready("m").unwrap();
        assert!(Rc::ptr_eq(&value, &cached));
        assert_eq!(cached.0, vec![1, 2, 3]);
    }

    #[test]
    fn test_memory_source_completes_on_poll() {
        let mut source = MemoryAssetSource::new().with_file("models/a.obj", b"v 0 0 0".to_vec());
        source.request("models/a.obj");
        source.request("models/missing.obj");
        let done = source.poll();
        assert_eq!(done.len(), 2);
        assert!(done[0].1.is_ok());
        assert!(matches!(done[1].1, Err(AssetLoadError::Io(StorageError::NotFound(_)))));
        assert!(source.poll().is_empty());
    }

    #[test]
    fn test_decode_texture_png() {
        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, image::Rgba([0, 0, 255, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let tex = decode_texture(&bytes).unwrap();
        assert_eq!((tex.width, tex.height), (2, 1));
        assert_eq!(tex.get_pixel(1, 0), crate::rasterizer::Color::new(0, 0, 255));
        assert!(matches!(decode_texture(b"nope"), Err(AssetLoadError::Image(_))));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_threaded_source_reads_files() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("models")).unwrap();
        std::fs::write(dir.path().join("models/box.obj"), b"v 0 0 0").unwrap();
        let mut source = ThreadedAssetSource::new(LocalStorage::with_base_dir(dir.path()));
        source.request("models/box.obj");

        let start = std::time::Instant::now();
        let mut done = Vec::new();
        while done.is_empty() {
            assert!(start.elapsed() < std::time::Duration::from_secs(5));
            done = source.poll();
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        assert_eq!(done[0].0, "models/box.obj");
        assert_eq!(done[0].1.as_ref().unwrap(), b"v 0 0 0");
    }
}
