//! Selection tracking
//!
//! Holds at most one instance id. The design state owns the only instance and
//! clears it in the same call that removes or replaces the referenced item.

use super::model::InstanceId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<InstanceId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<InstanceId> {
        self.current
    }

    pub fn is_selected(&self, id: InstanceId) -> bool {
        self.current == Some(id)
    }

    /// Set or clear the selection. Returns true if it changed.
    pub fn select(&mut self, id: Option<InstanceId>) -> bool {
        let changed = self.current != id;
        self.current = id;
        changed
    }

    pub fn clear(&mut self) -> bool {
        self.select(None)
    }

    /// Clear if it points at `id`. Returns true if it was cleared.
    pub fn forget(&mut self, id: InstanceId) -> bool {
        if self.is_selected(id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Clear if the selected id fails `alive`
    pub fn retain(&mut self, alive: impl Fn(InstanceId) -> bool) -> bool {
        match self.current {
            Some(id) if !alive(id) => {
                self.current = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_and_forget() {
        let mut sel = Selection::new();
        assert!(sel.select(Some(InstanceId(2))));
        assert!(!sel.select(Some(InstanceId(2))));
        assert!(!sel.forget(InstanceId(5)));
        assert_eq!(sel.current(), Some(InstanceId(2)));
        assert!(sel.forget(InstanceId(2)));
        assert_eq!(sel.current(), None);
    }

    #[test]
    fn test_retain() {
        let mut sel = Selection::new();
        sel.select(Some(InstanceId(1)));
        assert!(!sel.retain(|id| id == InstanceId(1)));
        assert!(sel.retain(|_| false));
        assert!(sel.current().is_none());
    }
}
