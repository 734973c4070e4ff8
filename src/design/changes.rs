//! Change notification for design observers
//!
//! Every mutation records what it touched into the pending change set of each
//! subscriber. Renderers drain their set once per frame and decide on their
//! own reconciliation granularity.

use super::model::InstanceId;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

/// Accumulated changes since the subscriber last drained its queue
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    /// Furniture composition changed or a whole design was swapped in
    pub structure: bool,
    pub room: bool,
    /// Committed shading or texture state changed
    pub materials: bool,
    /// Name, id or timestamps changed
    pub meta: bool,
    pub selection: bool,
    /// Instances whose position, rotation, scale or color changed
    pub instances: BTreeSet<InstanceId>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        !self.structure
            && !self.room
            && !self.materials
            && !self.meta
            && !self.selection
            && self.instances.is_empty()
    }

    /// Changes that invalidate every derived scene object
    pub fn needs_rebuild(&self) -> bool {
        self.structure || self.room || self.materials
    }

    pub fn merge(&mut self, other: &ChangeSet) {
        self.structure |= other.structure;
        self.room |= other.room;
        self.materials |= other.materials;
        self.meta |= other.meta;
        self.selection |= other.selection;
        self.instances.extend(other.instances.iter().copied());
    }

    pub fn everything() -> Self {
        Self {
            structure: true,
            room: true,
            materials: true,
            meta: true,
            selection: true,
            instances: BTreeSet::new(),
        }
    }
}

/// Pending change sets keyed by subscriber
#[derive(Debug, Default)]
pub struct Subscribers {
    queues: Vec<Option<ChangeSet>>,
}

impl Subscribers {
    /// New subscribers start with everything dirty so their first sync is a
    /// full build
    pub fn subscribe(&mut self) -> SubscriberId {
        if let Some(slot) = self.queues.iter().position(|q| q.is_none()) {
            self.queues[slot] = Some(ChangeSet::everything());
            return SubscriberId(slot);
        }
        self.queues.push(Some(ChangeSet::everything()));
        SubscriberId(self.queues.len() - 1)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) {
        if let Some(slot) = self.queues.get_mut(id.0) {
            *slot = None;
        }
    }

    pub fn publish(&mut self, change: &ChangeSet) {
        if change.is_empty() {
            return;
        }
        for queue in self.queues.iter_mut().flatten() {
            queue.merge(change);
        }
    }

    /// Drain the pending set. Unknown subscribers get an empty set.
    pub fn take(&mut self, id: SubscriberId) -> ChangeSet {
        match self.queues.get_mut(id.0) {
            Some(Some(queue)) => std::mem::take(queue),
            _ => ChangeSet::default(),
        }
    }

    pub fn clear(&mut self) {
        self.queues.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_subscriber_starts_dirty() {
        let mut subs = Subscribers::default();
        let id = subs.subscribe();
        assert!(subs.take(id).needs_rebuild());
        assert!(subs.take(id).is_empty());
    }

    #[test]
    fn test_publish_merges_per_subscriber() {
        let mut subs = Subscribers::default();
        let a = subs.subscribe();
        let b = subs.subscribe();
        subs.take(a);
        subs.take(b);

        let mut moved = ChangeSet::default();
        moved.instances.insert(InstanceId(1));
        subs.publish(&moved);
        let mut sel = ChangeSet::default();
        sel.selection = true;
        subs.publish(&sel);

        let got = subs.take(a);
        assert!(got.selection);
        assert!(got.instances.contains(&InstanceId(1)));
        assert!(!got.needs_rebuild());
        assert_eq!(subs.take(b), got);
    }

    #[test]
    fn test_unsubscribe_frees_slot() {
        let mut subs = Subscribers::default();
        let a = subs.subscribe();
        subs.unsubscribe(a);
        assert!(subs.take(a).is_empty());
        let b = subs.subscribe();
        assert_eq!(a, b);
    }
}
