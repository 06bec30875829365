//! In-memory host store

use super::{ConfigHost, GroupInspection, enclosing_folder, merge_group_objects};
use crate::group::qualify;
use crate::listener::ConfigurationChange;
use crate::scope::Resource;
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A write the host accepted, recorded for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct HostWrite {
    pub section: String,
    pub key: String,
    pub value: Option<Value>,
    pub is_global: bool,
    pub resource: Option<Resource>,
}

/// Host store kept entirely in memory.
///
/// Useful for embedding and for driving the resolver in tests: seed tiers
/// with [`MemoryHost::set_default`] and friends, inspect accepted writes with
/// [`MemoryHost::writes`], and make writes fail with
/// [`MemoryHost::fail_writes`].
#[derive(Debug, Default)]
pub struct MemoryHost {
    defaults: BTreeMap<String, Map<String, Value>>,
    global: BTreeMap<String, Map<String, Value>>,
    workspace: BTreeMap<String, Map<String, Value>>,
    folders: Vec<Resource>,
    pending: Vec<ConfigurationChange>,
    writes: Vec<HostWrite>,
    write_failure: Option<String>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host whose workspace has the given folders.
    pub fn with_folders(folders: impl IntoIterator<Item = impl Into<Resource>>) -> Self {
        Self {
            folders: folders.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Seed a default value. Defaults never produce change notifications.
    pub fn set_default(&mut self, section: &str, key: &str, value: Value) {
        self.defaults
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Seed a user-level value without queuing a notification.
    pub fn set_global(&mut self, section: &str, key: &str, value: Value) {
        self.global
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Seed a workspace-level value without queuing a notification.
    pub fn set_workspace(&mut self, section: &str, key: &str, value: Value) {
        self.workspace
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Remove a workspace value as an external editor would, queuing the
    /// matching notification.
    pub fn remove_workspace_value(&mut self, section: &str, key: &str) {
        if let Some(group) = self.workspace.get_mut(section) {
            group.remove(key);
        }
        self.notify(ConfigurationChange::for_key(qualify(section, key)));
    }

    /// Queue an arbitrary notification.
    pub fn notify(&mut self, change: ConfigurationChange) {
        self.pending.push(change);
    }

    /// Make every following write fail with `message`.
    pub fn fail_writes(&mut self, message: impl Into<String>) {
        self.write_failure = Some(message.into());
    }

    /// Let writes succeed again.
    pub fn accept_writes(&mut self) {
        self.write_failure = None;
    }

    /// Writes accepted so far, oldest first.
    pub fn writes(&self) -> &[HostWrite] {
        &self.writes
    }

    /// Number of notifications waiting to be drained.
    pub fn pending_changes(&self) -> usize {
        self.pending.len()
    }

    fn group(tier: &BTreeMap<String, Map<String, Value>>, section: &str) -> Option<Value> {
        tier.get(section).cloned().map(Value::Object)
    }
}

impl ConfigHost for MemoryHost {
    fn raw_group_value(
        &self,
        section: &str,
        _resource: Option<&Resource>,
    ) -> Result<Map<String, Value>> {
        let layers = [
            Self::group(&self.defaults, section),
            Self::group(&self.global, section),
            Self::group(&self.workspace, section),
        ];
        Ok(merge_group_objects(layers.iter().map(Option::as_ref)))
    }

    fn inspect_group(
        &self,
        section: &str,
        _resource: Option<&Resource>,
    ) -> Result<Option<GroupInspection>> {
        let inspection = GroupInspection {
            key: section.to_string(),
            default_value: Self::group(&self.defaults, section),
            global_value: Self::group(&self.global, section),
            workspace_value: Self::group(&self.workspace, section),
        };
        let known = inspection.default_value.is_some()
            || inspection.global_value.is_some()
            || inspection.workspace_value.is_some();
        Ok(known.then_some(inspection))
    }

    fn write_group_field(
        &mut self,
        section: &str,
        key: &str,
        value: Option<&Value>,
        is_global: bool,
        resource: Option<&Resource>,
    ) -> Result<()> {
        if let Some(message) = &self.write_failure {
            return Err(Error::host(message.clone()));
        }

        let tier = if is_global {
            &mut self.global
        } else {
            &mut self.workspace
        };
        match value {
            Some(value) => {
                tier.entry(section.to_string())
                    .or_default()
                    .insert(key.to_string(), value.clone());
            }
            None => {
                if let Some(group) = tier.get_mut(section) {
                    group.remove(key);
                    if group.is_empty() {
                        tier.remove(section);
                    }
                }
            }
        }

        self.writes.push(HostWrite {
            section: section.to_string(),
            key: key.to_string(),
            value: value.cloned(),
            is_global,
            resource: resource.cloned(),
        });
        self.notify(ConfigurationChange::for_key(qualify(section, key)));
        Ok(())
    }

    fn resolve_resource_to_folder(&self, resource: &Resource) -> Option<Resource> {
        enclosing_folder(&self.folders, resource)
    }

    fn workspace_folders(&self) -> Vec<Resource> {
        self.folders.clone()
    }

    fn take_changes(&mut self) -> Vec<ConfigurationChange> {
        std::mem::take(&mut self.pending)
    }
}
