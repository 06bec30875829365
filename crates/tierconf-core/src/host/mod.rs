//! Host configuration store abstraction
//!
//! The host store owns the persisted Default, Global and Workspace tiers and
//! reports changes to them. It has no notion of a Folder tier; that tier is
//! synthesized from the override cache.

mod file;
mod memory;

pub use file::FileHost;
pub use memory::{HostWrite, MemoryHost};

use crate::Result;
use crate::listener::ConfigurationChange;
use crate::scope::Resource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw per-tier values of one settings group as the host store sees them.
///
/// Each value is the whole group object at that tier, or `None` when the
/// tier does not mention the group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInspection {
    pub key: String,
    pub default_value: Option<Value>,
    pub global_value: Option<Value>,
    pub workspace_value: Option<Value>,
}

/// Trait for the external configuration store.
///
/// Reads take `&self`; writes and draining change notifications take
/// `&mut self` because the store is driven from a single thread.
pub trait ConfigHost {
    /// Effective value of the whole group (defaults, then user, then
    /// workspace), or an empty object if nothing defines it.
    fn raw_group_value(
        &self,
        section: &str,
        resource: Option<&Resource>,
    ) -> Result<Map<String, Value>>;

    /// Per-tier raw values of the group. `None` when the store knows nothing
    /// about the section.
    fn inspect_group(
        &self,
        section: &str,
        resource: Option<&Resource>,
    ) -> Result<Option<GroupInspection>>;

    /// Persist a single field. `None` removes it.
    ///
    /// `is_global` selects user-level storage; otherwise the write goes to
    /// the workspace. A successful write eventually produces a change
    /// notification through [`ConfigHost::take_changes`].
    fn write_group_field(
        &mut self,
        section: &str,
        key: &str,
        value: Option<&Value>,
        is_global: bool,
        resource: Option<&Resource>,
    ) -> Result<()>;

    /// Workspace folder that owns `resource`, if any.
    fn resolve_resource_to_folder(&self, resource: &Resource) -> Option<Resource>;

    /// Folders of the open workspace, in order.
    fn workspace_folders(&self) -> Vec<Resource>;

    /// Drain change notifications queued since the last call.
    fn take_changes(&mut self) -> Vec<ConfigurationChange>;
}

/// Pick the deepest folder containing `resource`.
pub(crate) fn enclosing_folder(folders: &[Resource], resource: &Resource) -> Option<Resource> {
    folders
        .iter()
        .filter(|folder| resource.is_within(folder))
        .max_by_key(|folder| folder.depth())
        .cloned()
}

/// Shallow-merge group objects, later objects winning per field.
pub(crate) fn merge_group_objects<'a>(
    layers: impl IntoIterator<Item = Option<&'a Value>>,
) -> Map<String, Value> {
    let mut merged = Map::new();
    for layer in layers.into_iter().flatten() {
        if let Value::Object(fields) = layer {
            for (key, value) in fields {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}
