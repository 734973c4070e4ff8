//! Local filesystem backend
//!
//! Byte-level reads and writes below a base directory. Used by the design
//! file store and by the asset loader threads.

use super::StorageError;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    /// Base directory for relative paths
    base_dir: PathBuf,
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStorage {
    /// Rooted at the current directory
    pub fn new() -> Self {
        Self {
            base_dir: PathBuf::from("."),
        }
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a path relative to the base directory. Leading slashes are
    /// stripped so web-style asset paths stay inside the base.
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_dir.join(path.trim_start_matches('/'))
    }

    /// File names (not full paths) in a directory. A missing directory is
    /// an empty listing.
    pub fn list(&self, path: &str) -> Result<Vec<String>, StorageError> {
        let full_path = self.resolve(path);
        let entries = match std::fs::read_dir(&full_path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::Io(e)),
        };
        Ok(entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .filter_map(|e| e.file_name().into_string().ok())
            .collect())
    }

    pub fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        std::fs::read(self.resolve(path)).map_err(|e| StorageError::from_io(e, path))
    }

    /// Write a file, creating parent directories. The data lands in a
    /// sibling temp file first so a failed write never truncates the old one.
    pub fn write(&self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        let full_path = self.resolve(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp_path = full_path.with_extension("tmp");
        std::fs::write(&tmp_path, data)?;
        std::fs::rename(&tmp_path, &full_path)?;
        Ok(())
    }

    /// Delete a file. Returns false if it did not exist.
    pub fn delete(&self, path: &str) -> Result<bool, StorageError> {
        match std::fs::remove_file(self.resolve(path)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    pub fn exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_dir() -> (TempDir, LocalStorage) {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::with_base_dir(dir.path());
        (dir, storage)
    }

    #[test]
    fn test_write_and_read() {
        let (_dir, storage) = setup_test_dir();
        storage.write("test.txt", b"hello world").unwrap();
        assert_eq!(storage.read("test.txt").unwrap(), b"hello world");
    }

    #[test]
    fn test_read_not_found() {
        let (_dir, storage) = setup_test_dir();
        let result = storage.read("nonexistent.txt");
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_list_skips_directories() {
        let (dir, storage) = setup_test_dir();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();

        let mut files = storage.list(".").unwrap();
        files.sort();
        assert_eq!(files, vec!["a.txt", "b.txt"]);
        assert!(storage.list("missing").unwrap().is_empty());
    }

    #[test]
    fn test_delete_reports_existence() {
        let (dir, storage) = setup_test_dir();
        std::fs::write(dir.path().join("delete_me.txt"), "x").unwrap();
        assert!(storage.delete("delete_me.txt").unwrap());
        assert!(!dir.path().join("delete_me.txt").exists());
        assert!(!storage.delete("delete_me.txt").unwrap());
    }

    #[test]
    fn test_write_creates_parent_dirs_and_strips_leading_slash() {
        let (_dir, storage) = setup_test_dir();
        storage.write("deep/nested/file.txt", b"data").unwrap();
        assert_eq!(storage.read("/deep/nested/file.txt").unwrap(), b"data");
        assert!(storage.exists("deep/nested/file.txt"));
        assert!(!storage.exists("deep/nested/file.tmp"));
    }
}
