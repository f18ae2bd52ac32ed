//! Best-effort owner display cache.
//!
//! # Purpose
//! Maps principal identifiers to display metadata fetched from the workspace
//! membership endpoint. The cache is disposable: it is rebuilt wholesale on
//! every refresh and replaced with an empty one when the fetch fails, so the
//! view shows "unknown owner" rather than a stale wrong one.
use std::collections::HashMap;

use crate::model::{CachedUser, WorkspaceUser};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserDisplayCache {
    entries: HashMap<String, CachedUser>,
}

impl UserDisplayCache {
    pub fn from_users(users: Vec<WorkspaceUser>) -> Self {
        let entries = users
            .iter()
            .map(|user| (user.id.clone(), CachedUser::from(user)))
            .collect();
        UserDisplayCache { entries }
    }

    pub fn get(&self, principal_id: &str) -> Option<&CachedUser> {
        self.entries.get(principal_id)
    }

    /// Label to render for an owner; falls back to the raw identifier when
    /// the principal is not in the cache.
    pub fn display_label(&self, principal_id: &str) -> String {
        match self.entries.get(principal_id) {
            Some(user) => user.display_name.clone(),
            None => principal_id.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, name: &str, email: Option<&str>) -> WorkspaceUser {
        WorkspaceUser {
            id: id.to_string(),
            display_name: name.to_string(),
            email: email.map(str::to_string),
            user_principal_name: None,
        }
    }

    #[test]
    fn cache_resolves_known_principals() {
        let cache = UserDisplayCache::from_users(vec![
            user("u1", "Ada Lovelace", Some("ada@example.org")),
            user("u2", "Charles Babbage", None),
        ]);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.display_label("u1"), "Ada Lovelace");
        assert_eq!(
            cache.get("u1").and_then(|u| u.contact.as_deref()),
            Some("ada@example.org")
        );
    }

    #[test]
    fn unknown_principal_degrades_to_raw_identifier() {
        let cache = UserDisplayCache::from_users(vec![user("u1", "Ada Lovelace", None)]);
        assert_eq!(cache.display_label("u-missing"), "u-missing");
        assert!(cache.get("u-missing").is_none());
    }

    #[test]
    fn empty_cache_is_valid_and_resolves_nothing() {
        let cache = UserDisplayCache::default();
        assert!(cache.is_empty());
        assert_eq!(cache.display_label("u1"), "u1");
    }
}
