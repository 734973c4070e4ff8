//! In-memory design store

use super::{generate_id, now_millis, DesignRepository, StorageError};
use crate::design::Design;

/// Keeps designs in insertion order for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryDesignStore {
    designs: Vec<Design>,
}

impl MemoryDesignStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.designs.iter().position(|d| d.id.as_deref() == Some(id))
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Design, StorageError> {
        match self.position(id) {
            Some(i) => Ok(&mut self.designs[i]),
            None => Err(StorageError::NotFound(id.to_string())),
        }
    }
}

impl DesignRepository for MemoryDesignStore {
    fn create(&mut self, design: &Design) -> Result<Design, StorageError> {
        let now = now_millis();
        let mut stored = design.clone();
        stored.id = Some(generate_id(now, |id| self.position(id).is_some()));
        stored.created_at = Some(now);
        stored.updated_at = Some(now);
        self.designs.push(stored.clone());
        Ok(stored)
    }

    fn update(&mut self, id: &str, design: &Design) -> Result<Design, StorageError> {
        let existing = self.find_mut(id)?;
        let created_at = existing.created_at;
        *existing = design.clone();
        existing.id = Some(id.to_string());
        existing.created_at = created_at;
        existing.updated_at = Some(now_millis());
        Ok(existing.clone())
    }

    fn rename(&mut self, id: &str, name: &str) -> Result<Design, StorageError> {
        let existing = self.find_mut(id)?;
        existing.name = name.to_string();
        existing.updated_at = Some(now_millis());
        Ok(existing.clone())
    }

    fn delete(&mut self, id: &str) -> Result<bool, StorageError> {
        let before = self.designs.len();
        self.designs.retain(|d| d.id.as_deref() != Some(id));
        Ok(self.designs.len() != before)
    }

    fn get_by_id(&self, id: &str) -> Result<Design, StorageError> {
        self.position(id)
            .map(|i| self.designs[i].clone())
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    fn list_all(&self) -> Result<Vec<Design>, StorageError> {
        Ok(self.designs.clone())
    }

    fn import(&mut self, mut design: Design) -> Result<Design, StorageError> {
        let now = now_millis();
        let id = match design.id.take() {
            Some(id) if self.position(&id).is_none() => id,
            _ => generate_id(now, |id| self.position(id).is_some()),
        };
        design.id = Some(id);
        design.created_at.get_or_insert(now);
        design.updated_at.get_or_insert(now);
        self.designs.push(design.clone());
        Ok(design)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assigns_id_and_timestamps() {
        let mut store = MemoryDesignStore::new();
        let a = store.create(&Design::blank("u1")).unwrap();
        let b = store.create(&Design::blank("u1")).unwrap();
        assert!(a.id.as_deref().unwrap().starts_with("design-"));
        assert_ne!(a.id, b.id);
        assert!(a.created_at.is_some());
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn test_update_keeps_created_at() {
        let mut store = MemoryDesignStore::new();
        let created = store.create(&Design::blank("u1")).unwrap();
        let id = created.id.clone().unwrap();
        let mut edited = created.clone();
        edited.name = "Edited".to_string();
        edited.created_at = Some(1);
        let updated = store.update(&id, &edited).unwrap();
        assert_eq!(updated.name, "Edited");
        assert_eq!(updated.created_at, created.created_at);
        assert!(matches!(store.update("design-0", &edited), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_rename_delete_and_owner_scope() {
        let mut store = MemoryDesignStore::new();
        let mine = store.create(&Design::blank("u1")).unwrap();
        store.create(&Design::blank("u2")).unwrap();
        let id = mine.id.unwrap();

        assert_eq!(store.rename(&id, "Den").unwrap().name, "Den");
        assert_eq!(store.list_for_owner("u1").unwrap().len(), 1);
        assert_eq!(store.list_all().unwrap().len(), 2);

        assert!(store.delete(&id).unwrap());
        assert!(!store.delete(&id).unwrap());
        assert!(matches!(store.rename(&id, "x"), Err(StorageError::NotFound(_))));
        assert!(matches!(store.get_by_id(&id), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_import_keeps_unique_ids() {
        let mut store = MemoryDesignStore::new();
        let mut design = Design::blank("u1");
        design.id = Some("design-1".to_string());
        assert_eq!(store.import(design.clone()).unwrap().id.as_deref(), Some("design-1"));
        let second = store.import(design).unwrap();
        assert_ne!(second.id.as_deref(), Some("design-1"));
    }
}
