//! Ordered user-resource list with copy-on-write mutation.
//!
//! # Purpose
//! The view keeps one authoritative list of user resources per workspace
//! service. Mutations never touch an existing snapshot: every operation
//! returns a new list, so a reader holding the previous value is unaffected
//! by a concurrent replacement.
//!
//! # Notes
//! `update` and `remove` are silent no-ops when the id is absent. The poll
//! timer may replace the whole list between a caller deciding to mutate and
//! the mutation landing; treating the missing id as an error would turn that
//! benign race into a failure.
use crate::model::UserResource;

/// Ordered collection of user resources, keyed by resource id.
///
/// Identifiers are unique within the list; all operations are O(n).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceList {
    items: Vec<UserResource>,
}

impl ResourceList {
    pub fn new(items: Vec<UserResource>) -> Self {
        ResourceList { items }
    }

    pub fn items(&self) -> &[UserResource] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&UserResource> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Appends a resource, preserving the order of all existing entries.
    pub fn add(&self, resource: UserResource) -> Self {
        let mut items = self.items.clone();
        items.push(resource);
        ResourceList { items }
    }

    /// Replaces the entry with the same id in place. No-op when absent.
    pub fn update(&self, resource: UserResource) -> Self {
        let mut items = self.items.clone();
        if let Some(slot) = items.iter_mut().find(|item| item.id == resource.id) {
            *slot = resource;
        }
        ResourceList { items }
    }

    /// Deletes the entry with the same id. No-op when absent.
    pub fn remove(&self, resource: &UserResource) -> Self {
        let items = self
            .items
            .iter()
            .filter(|item| item.id != resource.id)
            .cloned()
            .collect();
        ResourceList { items }
    }
}

impl From<Vec<UserResource>> for ResourceList {
    fn from(items: Vec<UserResource>) -> Self {
        ResourceList::new(items)
    }
}
