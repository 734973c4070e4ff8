//! File-backed design store
//!
//! One file per design under `<base>/designs/`. New files are written as
//! brotli-compressed RON (`<id>.ron.br`); hand-written `.ron` files and
//! `.json` exports from the web version are read as well.

use super::{document, generate_id, now_millis, DesignRepository, LocalStorage, StorageError};
use crate::design::Design;

const DESIGN_DIR: &str = "designs";
const EXTENSIONS: [&str; 3] = [".ron.br", ".ron", ".json"];

pub struct FileDesignStore {
    storage: LocalStorage,
}

impl FileDesignStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn open(base_dir: impl Into<std::path::PathBuf>) -> Self {
        Self::new(LocalStorage::with_base_dir(base_dir))
    }

    fn valid_id(id: &str) -> bool {
        !id.is_empty()
            && id.len() <= 128
            && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    /// Path of the existing file for `id`, if any
    fn existing_path(&self, id: &str) -> Option<String> {
        if !Self::valid_id(id) {
            return None;
        }
        EXTENSIONS
            .iter()
            .map(|ext| format!("{}/{}{}", DESIGN_DIR, id, ext))
            .find(|path| self.storage.exists(path))
    }

    fn canonical_path(id: &str) -> String {
        format!("{}/{}.ron.br", DESIGN_DIR, id)
    }

    fn read_path(&self, path: &str, id: &str) -> Result<Design, StorageError> {
        let bytes = self.storage.read(path)?;
        let mut design = document::decode(&bytes)?;
        // The file name is authoritative
        design.id = Some(id.to_string());
        Ok(design)
    }

    fn write(&self, design: &Design) -> Result<(), StorageError> {
        let id = design
            .id
            .as_deref()
            .ok_or_else(|| StorageError::Other("design has no id".to_string()))?;
        let data = document::encode(design)?;
        self.storage.write(&Self::canonical_path(id), &data)?;
        // Drop any older-format file so the id resolves to one document
        for ext in &EXTENSIONS[1..] {
            self.storage.delete(&format!("{}/{}{}", DESIGN_DIR, id, ext))?;
        }
        Ok(())
    }

    fn ids(&self) -> Result<Vec<String>, StorageError> {
        let mut ids: Vec<String> = self
            .storage
            .list(DESIGN_DIR)?
            .into_iter()
            .filter_map(|name| {
                EXTENSIONS
                    .iter()
                    .find_map(|ext| name.strip_suffix(ext).map(str::to_string))
            })
            .filter(|id| Self::valid_id(id))
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    fn taken(&self, id: &str) -> bool {
        self.existing_path(id).is_some()
    }
}

impl DesignRepository for FileDesignStore {
    fn create(&mut self, design: &Design) -> Result<Design, StorageError> {
        let now = now_millis();
        let mut stored = design.clone();
        stored.id = Some(generate_id(now, |id| self.taken(id)));
        stored.created_at = Some(now);
        stored.updated_at = Some(now);
        self.write(&stored)?;
        log::info!("created design {:?}", stored.id);
        Ok(stored)
    }

    fn update(&mut self, id: &str, design: &Design) -> Result<Design, StorageError> {
        let existing = self.get_by_id(id)?;
        let mut stored = design.clone();
        stored.id = Some(id.to_string());
        stored.created_at = existing.created_at;
        stored.updated_at = Some(now_millis());
        self.write(&stored)?;
        Ok(stored)
    }

    fn rename(&mut self, id: &str, name: &str) -> Result<Design, StorageError> {
        let mut stored = self.get_by_id(id)?;
        stored.name = name.to_string();
        stored.updated_at = Some(now_millis());
        self.write(&stored)?;
        Ok(stored)
    }

    fn delete(&mut self, id: &str) -> Result<bool, StorageError> {
        if !Self::valid_id(id) {
            return Ok(false);
        }
        let mut removed = false;
        for ext in EXTENSIONS {
            removed |= self.storage.delete(&format!("{}/{}{}", DESIGN_DIR, id, ext))?;
        }
        if removed {
            log::info!("deleted design {}", id);
        }
        Ok(removed)
    }

    fn get_by_id(&self, id: &str) -> Result<Design, StorageError> {
        let path = self
            .existing_path(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        self.read_path(&path, id)
    }

    fn list_all(&self) -> Result<Vec<Design>, StorageError> {
        let mut designs = Vec::new();
        for id in self.ids()? {
            match self.get_by_id(&id) {
                Ok(design) => designs.push(design),
                // One corrupt file should not hide the rest
                Err(e) => log::warn!("skipping design {}: {}", id, e),
            }
        }
        designs.sort_by_key(|d| std::cmp::Reverse(d.updated_at));
        Ok(designs)
    }

    fn import(&mut self, mut design: Design) -> Result<Design, StorageError> {
        let now = now_millis();
        let id = match design.id.take() {
            Some(id) if Self::valid_id(&id) && !self.taken(&id) => id,
            _ => generate_id(now, |id| self.taken(id)),
        };
        design.id = Some(id);
        design.created_at.get_or_insert(now);
        design.updated_at.get_or_insert(now);
        self.write(&design)?;
        Ok(design)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{FurnitureInstance, InstanceId};
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileDesignStore) {
        let dir = TempDir::new().unwrap();
        let store = FileDesignStore::open(dir.path());
        (dir, store)
    }

    #[test]
    fn test_create_then_get() {
        let (dir, mut store) = setup();
        let mut design = Design::blank("u1");
        design.furniture.push(FurnitureInstance::new(InstanceId(1), "bed-1", 200.0, 140.0));
        let created = store.create(&design).unwrap();
        let id = created.id.clone().unwrap();

        assert!(dir.path().join(format!("designs/{}.ron.br", id)).exists());
        let loaded = store.get_by_id(&id).unwrap();
        assert_eq!(loaded, created);
    }

    #[test]
    fn test_missing_and_invalid_ids() {
        let (_dir, mut store) = setup();
        assert!(matches!(store.get_by_id("design-404"), Err(StorageError::NotFound(_))));
        assert!(matches!(store.get_by_id("../etc/passwd"), Err(StorageError::NotFound(_))));
        assert!(!store.delete("../x").unwrap());
        assert!(matches!(store.rename("design-404", "x"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_update_rename_delete() {
        let (_dir, mut store) = setup();
        let created = store.create(&Design::blank("u1")).unwrap();
        let id = created.id.clone().unwrap();

        let mut edited = created.clone();
        edited.room.width = 321.0;
        let updated = store.update(&id, &edited).unwrap();
        assert_eq!(updated.room.width, 321.0);
        assert_eq!(updated.created_at, created.created_at);

        assert_eq!(store.rename(&id, "Loft").unwrap().name, "Loft");
        assert_eq!(store.get_by_id(&id).unwrap().name, "Loft");

        assert!(store.delete(&id).unwrap());
        assert!(!store.delete(&id).unwrap());
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_reads_plain_ron_and_legacy_json() {
        let (dir, store) = setup();
        let designs = dir.path().join("designs");
        std::fs::create_dir_all(&designs).unwrap();
        std::fs::write(designs.join("hand-made.ron"), r#"(name: "Hand", owner: "u1")"#).unwrap();
        std::fs::write(
            designs.join("web-export.json"),
            r#"{"name": "Web", "createdBy": "u1", "furniture": [{"id": "chair-1", "x": 5, "y": 5}]}"#,
        )
        .unwrap();
        std::fs::write(designs.join("notes.txt"), "ignored").unwrap();

        let all = store.list_for_owner("u1").unwrap();
        assert_eq!(all.len(), 2);
        let web = store.get_by_id("web-export").unwrap();
        assert_eq!(web.id.as_deref(), Some("web-export"));
        assert_eq!(web.furniture.len(), 1);
    }

    #[test]
    fn test_corrupt_file_is_skipped_in_listing() {
        let (dir, mut store) = setup();
        store.create(&Design::blank("u1")).unwrap();
        let designs = dir.path().join("designs");
        std::fs::write(designs.join("broken.ron.br"), [0xff, 0x00, 0x13]).unwrap();
        assert_eq!(store.list_all().unwrap().len(), 1);
        assert!(store.get_by_id("broken").is_err());
    }

    #[test]
    fn test_rewrite_replaces_older_format() {
        let (dir, mut store) = setup();
        let designs = dir.path().join("designs");
        std::fs::create_dir_all(&designs).unwrap();
        std::fs::write(designs.join("old.ron"), r#"(name: "Old")"#).unwrap();

        store.rename("old", "New").unwrap();
        assert!(!designs.join("old.ron").exists());
        assert!(designs.join("old.ron.br").exists());
        assert_eq!(store.list_all().unwrap().len(), 1);
    }
}
