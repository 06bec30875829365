//! Host store backed by settings files
//!
//! Tiers map to files as follows:
//!
//! 1. **Default** - registered in memory with [`FileHost::with_defaults`]
//! 2. **Global** - `<config_dir>/tierconf/settings.json`
//! 3. **Workspace** - `<workspace>/.tierconf/settings.json`
//!
//! Each file holds one object whose top-level keys are section names.
//! Missing files read as empty objects.

use super::{ConfigHost, GroupInspection, enclosing_folder, merge_group_objects};
use crate::group::qualify;
use crate::listener::ConfigurationChange;
use crate::scope::{Resource, Tier};
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tierconf_fs::{NormalizedPath, SettingsPath, SettingsStore};

/// Settings file host for one workspace.
#[derive(Debug)]
pub struct FileHost {
    /// Workspace root directory
    root: NormalizedPath,

    /// Override for the global config directory (used for testing).
    /// When `None`, the platform-appropriate directory is used via `dirs::config_dir()`.
    global_config_dir_override: Option<PathBuf>,

    folders: Vec<Resource>,
    defaults: BTreeMap<String, Map<String, Value>>,
    store: SettingsStore,

    /// Last file contents seen per tier, for change detection
    snapshots: HashMap<Tier, Map<String, Value>>,
    pending: Vec<ConfigurationChange>,
}

impl FileHost {
    /// Create a host for the workspace at `root`.
    ///
    /// The root, declared folders and looked-up resources are all
    /// canonicalized, so a resource spelled through a symlink still lands in
    /// the right folder.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: canonical(root.as_ref()),
            global_config_dir_override: None,
            folders: Vec::new(),
            defaults: BTreeMap::new(),
            store: SettingsStore::new(),
            snapshots: HashMap::new(),
            pending: Vec::new(),
        }
    }

    /// Create a host with a custom global config directory.
    ///
    /// This is primarily useful for testing, where you need to control
    /// the global config path without affecting the real user config.
    pub fn with_global_config_dir(root: impl AsRef<Path>, global_config_dir: PathBuf) -> Self {
        Self {
            global_config_dir_override: Some(global_config_dir),
            ..Self::new(root)
        }
    }

    /// Declare the workspace folders. Without this the root is the only
    /// folder.
    pub fn with_folders(mut self, folders: impl IntoIterator<Item = impl Into<Resource>>) -> Self {
        self.folders = folders
            .into_iter()
            .map(|folder| canonical(&folder.into().to_native()))
            .collect();
        self
    }

    /// Register default values for a section.
    pub fn with_defaults(mut self, section: &str, defaults: Map<String, Value>) -> Self {
        self.defaults.insert(section.to_string(), defaults);
        self
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Determine the global config directory path.
    ///
    /// Returns the override if set, otherwise falls back to the
    /// platform-appropriate config directory via `dirs::config_dir()`.
    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref override_dir) = self.global_config_dir_override {
            return Some(override_dir.clone());
        }
        dirs::config_dir().map(|d| d.join(SettingsPath::GlobalDir))
    }

    /// Path of the user-level settings file, if the platform has a config dir.
    pub fn global_settings_path(&self) -> Option<NormalizedPath> {
        self.global_config_dir()
            .map(|dir| NormalizedPath::new(dir.join(SettingsPath::SettingsFile)))
    }

    /// Path of the workspace settings file.
    pub fn workspace_settings_path(&self) -> NormalizedPath {
        self.root
            .join(SettingsPath::WorkspaceDir.as_str())
            .join(SettingsPath::SettingsFile.as_str())
    }

    fn settings_path(&self, tier: Tier) -> Option<NormalizedPath> {
        match tier {
            Tier::Global => self.global_settings_path(),
            Tier::Workspace => Some(self.workspace_settings_path()),
            Tier::Default | Tier::Folder => None,
        }
    }

    fn load_tier(&self, tier: Tier) -> Result<Map<String, Value>> {
        match self.settings_path(tier) {
            Some(path) => {
                tracing::debug!(%path, %tier, "loading settings file");
                Ok(self.store.load_object(&path)?)
            }
            None => Ok(Map::new()),
        }
    }

    /// Re-read the settings files and queue a notification for every
    /// section edited outside this host since the previous read.
    ///
    /// The first call only records a baseline. Returns the number of changed
    /// keys found.
    pub fn refresh(&mut self) -> Result<usize> {
        let mut change = ConfigurationChange::new();
        for tier in [Tier::Global, Tier::Workspace] {
            let current = self.load_tier(tier)?;
            if let Some(previous) = self.snapshots.get(&tier) {
                for key in changed_keys(previous, &current) {
                    change = change.with_key(key, None);
                }
            }
            self.snapshots.insert(tier, current);
        }

        let count = change.keys().len();
        if !change.is_empty() {
            tracing::debug!(changed = count, "settings files changed on disk");
            self.pending.push(change);
        }
        Ok(count)
    }
}

/// Canonical form of `path`. Trailing components that do not exist yet are
/// appended to the canonicalized existing ancestor.
fn canonical(path: &Path) -> NormalizedPath {
    let mut existing = path;
    let mut missing = Vec::new();
    loop {
        if let Ok(resolved) = dunce::canonicalize(existing) {
            let full = missing
                .iter()
                .rev()
                .fold(resolved, |acc: PathBuf, part| acc.join(part));
            return NormalizedPath::new(full);
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return NormalizedPath::new(path),
        }
    }
}

/// Qualified keys that differ between two file snapshots.
fn changed_keys(previous: &Map<String, Value>, current: &Map<String, Value>) -> Vec<String> {
    let sections: BTreeSet<&String> = previous.keys().chain(current.keys()).collect();
    let mut keys = Vec::new();

    for section in sections {
        let before = previous.get(section.as_str());
        let after = current.get(section.as_str());
        if before == after {
            continue;
        }
        match (before, after) {
            (Some(Value::Object(before)), Some(Value::Object(after))) => {
                let fields: BTreeSet<&String> = before.keys().chain(after.keys()).collect();
                for field in fields {
                    if before.get(field.as_str()) != after.get(field.as_str()) {
                        keys.push(qualify(section, field));
                    }
                }
            }
            _ => keys.push(section.clone()),
        }
    }
    keys
}

impl ConfigHost for FileHost {
    fn raw_group_value(
        &self,
        section: &str,
        resource: Option<&Resource>,
    ) -> Result<Map<String, Value>> {
        Ok(match self.inspect_group(section, resource)? {
            Some(inspection) => merge_group_objects([
                inspection.default_value.as_ref(),
                inspection.global_value.as_ref(),
                inspection.workspace_value.as_ref(),
            ]),
            None => Map::new(),
        })
    }

    fn inspect_group(
        &self,
        section: &str,
        _resource: Option<&Resource>,
    ) -> Result<Option<GroupInspection>> {
        let global = self.load_tier(Tier::Global)?;
        let workspace = self.load_tier(Tier::Workspace)?;

        let inspection = GroupInspection {
            key: section.to_string(),
            default_value: self.defaults.get(section).cloned().map(Value::Object),
            global_value: global.get(section).cloned(),
            workspace_value: workspace.get(section).cloned(),
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
        _resource: Option<&Resource>,
    ) -> Result<()> {
        let tier = if is_global {
            Tier::Global
        } else {
            Tier::Workspace
        };
        let path = self
            .settings_path(tier)
            .ok_or_else(|| Error::host("no user configuration directory on this platform"))?;

        let mut settings = self.store.load_object(&path)?;
        match value {
            Some(value) => {
                let group = settings
                    .entry(section.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !group.is_object() {
                    tracing::warn!(%path, section, "replacing non-object section");
                    *group = Value::Object(Map::new());
                }
                if let Value::Object(fields) = group {
                    fields.insert(key.to_string(), value.clone());
                }
            }
            None => {
                let now_empty = match settings.get_mut(section) {
                    Some(Value::Object(fields)) => {
                        fields.remove(key);
                        fields.is_empty()
                    }
                    _ => false,
                };
                if now_empty {
                    settings.remove(section);
                }
            }
        }

        self.store.save_object(&path, &settings)?;
        tracing::debug!(%path, key = %qualify(section, key), "persisted setting");

        self.snapshots.insert(tier, settings);
        self.pending
            .push(ConfigurationChange::for_key(qualify(section, key)));
        Ok(())
    }

    fn resolve_resource_to_folder(&self, resource: &Resource) -> Option<Resource> {
        let resource = canonical(&resource.to_native());
        enclosing_folder(&self.workspace_folders(), &resource)
    }

    fn workspace_folders(&self) -> Vec<Resource> {
        if self.folders.is_empty() {
            vec![self.root.clone()]
        } else {
            self.folders.clone()
        }
    }

    fn take_changes(&mut self) -> Vec<ConfigurationChange> {
        std::mem::take(&mut self.pending)
    }
}
