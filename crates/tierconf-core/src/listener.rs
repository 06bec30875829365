//! Change notifications and cache invalidation
//!
//! Once the host store reports that a group changed, the matching cache
//! entries no longer describe pending work and are evicted. This is the only
//! place entries are removed; reads never evict.

use crate::cache::OverrideCache;
use crate::group::SettingField;
use crate::scope::{Resource, Scope, Tier};
use serde::{Deserialize, Serialize};

/// One changed key reported by the host store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedKey {
    /// Qualified key (`section` or `section.field`)
    pub key: String,
    /// Resource the change was limited to; `None` affects every resource.
    pub resource: Option<Resource>,
}

/// A change notification from the host store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationChange {
    keys: Vec<ChangedKey>,
}

impl ConfigurationChange {
    pub fn new() -> Self {
        Self::default()
    }

    /// A change to `key` across all resources.
    pub fn for_key(key: impl Into<String>) -> Self {
        Self::new().with_key(key, None)
    }

    pub fn with_key(mut self, key: impl Into<String>, resource: Option<Resource>) -> Self {
        self.keys.push(ChangedKey {
            key: key.into(),
            resource,
        });
        self
    }

    pub fn keys(&self) -> &[ChangedKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether this change touches `section`, optionally as seen from
    /// `resource`.
    ///
    /// A changed key matches a section when either one is a dotted prefix of
    /// the other (`languageTool` matches `languageTool.language` and vice
    /// versa). An unscoped changed key applies to every resource; a scoped
    /// one applies to resources inside it.
    pub fn affects(&self, section: &str, resource: Option<&Resource>) -> bool {
        self.keys.iter().any(|changed| {
            let key_matches =
                is_dotted_prefix(section, &changed.key) || is_dotted_prefix(&changed.key, section);
            let resource_matches = match (&changed.resource, resource) {
                (None, _) | (_, None) => true,
                (Some(scope), Some(resource)) => resource.is_within(scope),
            };
            key_matches && resource_matches
        })
    }
}

fn is_dotted_prefix(prefix: &str, key: &str) -> bool {
    key == prefix
        || key
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('.'))
}

/// Scopes whose cache entries were dropped by one notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invalidation {
    pub evicted: Vec<Scope>,
}

impl Invalidation {
    pub fn is_empty(&self) -> bool {
        self.evicted.is_empty()
    }

    pub fn extend(&mut self, other: Invalidation) {
        self.evicted.extend(other.evicted);
    }
}

/// Evict cache entries of `section` made stale by `change`.
///
/// Global and Workspace entries go when the section changed at all; a
/// folder's entry goes when the change affects that folder.
pub fn invalidate<F: SettingField>(
    cache: &mut OverrideCache<F>,
    section: &str,
    change: &ConfigurationChange,
    folders: &[Resource],
) -> Invalidation {
    let mut invalidation = Invalidation::default();

    if change.affects(section, None) {
        for tier in [Tier::Global, Tier::Workspace] {
            let scope = Scope::Tier(tier);
            if cache.evict(&scope) {
                invalidation.evicted.push(scope);
            }
        }
    }

    for folder in folders {
        if change.affects(section, Some(folder)) {
            let scope = Scope::folder(folder.clone());
            if cache.evict(&scope) {
                invalidation.evicted.push(scope);
            }
        }
    }

    if !invalidation.is_empty() {
        tracing::debug!(
            section,
            evicted = invalidation.evicted.len(),
            "invalidated cached settings"
        );
    }
    invalidation
}
