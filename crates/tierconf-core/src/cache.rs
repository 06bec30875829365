//! Local override cache
//!
//! Holds writes made through this process before the host store confirms
//! them with a change notification, plus the whole Folder tier, which the
//! host store does not model at all.
//!
//! Entries are keyed by `<tier>::<resource>`. Global and Workspace keys never
//! carry a resource, so every resource shares one entry per tier; Folder
//! keys are distinct per folder.

use crate::Result;
use crate::group::SettingField;
use crate::scope::{FullScope, Scope, Target, config_target_to_scope, normalize_scope};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Pending values for one cache entry.
///
/// `Some(value)` is a pending write; `None` is a pending unset, which hides
/// whatever the host store still reports for that tier.
pub type PartialSettings<F> = BTreeMap<F, Option<Value>>;

/// Key of one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a scope, after normalization.
    pub fn for_scope(scope: &Scope) -> Self {
        let FullScope { tier, resource } = normalize_scope(scope);
        let path = resource.as_ref().map(|r| r.as_str()).unwrap_or("");
        Self(format!("{tier}::{path}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// In-memory overlay of pending and folder-level settings.
#[derive(Debug, Clone)]
pub struct OverrideCache<F> {
    entries: HashMap<CacheKey, PartialSettings<F>>,
}

impl<F> Default for OverrideCache<F> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<F: SettingField> OverrideCache<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `field = value` for the entry addressed by `target`.
    ///
    /// Fails only when the target cannot name a tier (see
    /// [`config_target_to_scope`]).
    pub fn write(&mut self, target: &Target, field: F, value: Option<Value>) -> Result<CacheKey> {
        let scope = config_target_to_scope(target)?;
        let key = CacheKey::for_scope(&scope);
        tracing::debug!(key = %key, field = field.key(), ?value, "cache write");
        self.entries
            .entry(key.clone())
            .or_default()
            .insert(field, value);
        Ok(key)
    }

    /// Pending values for `scope`; empty when nothing is cached.
    pub fn read(&self, scope: &Scope) -> Cow<'_, PartialSettings<F>> {
        match self.entries.get(&CacheKey::for_scope(scope)) {
            Some(entry) => Cow::Borrowed(entry),
            None => Cow::Owned(PartialSettings::new()),
        }
    }

    /// Drop the entry for `scope`. Returns whether an entry existed.
    pub fn evict(&mut self, scope: &Scope) -> bool {
        let key = CacheKey::for_scope(scope);
        let existed = self.entries.remove(&key).is_some();
        if existed {
            tracing::debug!(key = %key, "cache evict");
        }
        existed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys of all live entries, sorted.
    pub fn keys(&self) -> Vec<CacheKey> {
        let mut keys: Vec<_> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
