//! Layered settings for one settings group
//!
//! [`LayeredSettings`] owns a host store and an override cache and exposes
//! the read and write operations callers use:
//!
//! - [`inspect`](LayeredSettings::inspect) - four-tier view of one field
//! - [`get_best_value`](LayeredSettings::get_best_value) - effective value at
//!   a scope, with fallback
//! - [`get_raw_tier_value`](LayeredSettings::get_raw_tier_value) - value at
//!   exactly one tier
//! - [`set_value`](LayeredSettings::set_value) - cache first, then host
//! - [`process_changes`](LayeredSettings::process_changes) - apply host
//!   notifications to the cache
//!
//! # Example
//!
//! ```ignore
//! use tierconf_core::{LayeredSettings, MemoryHost, Target, Tier};
//! use serde_json::json;
//!
//! let mut settings = LayeredSettings::<LanguageTool, _>::new(MemoryHost::new());
//! settings.set_value(Field::Language, Some(json!("en-US")), &Target::workspace())?;
//! assert_eq!(
//!     settings.get_best_value(Field::Language, Tier::Workspace)?,
//!     Some(json!("en-US"))
//! );
//! ```

use crate::cache::{OverrideCache, PartialSettings};
use crate::group::{SettingField, SettingsGroup};
use crate::host::ConfigHost;
use crate::inspect::{Inspection, Overlays, merge_inspection, project_inspection};
use crate::listener::{ConfigurationChange, Invalidation, invalidate};
use crate::resolve::{Resolution, find_best_value};
use crate::scope::{FullScope, Resource, Scope, Target, Tier, normalize_scope};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::marker::PhantomData;

/// Resolver and write path for the settings group `G` over host `H`.
pub struct LayeredSettings<G: SettingsGroup, H> {
    host: H,
    cache: OverrideCache<G::Field>,
    _group: PhantomData<fn() -> G>,
}

impl<G: SettingsGroup, H: ConfigHost> LayeredSettings<G, H> {
    /// Create settings with an empty override cache.
    pub fn new(host: H) -> Self {
        Self::with_cache(host, OverrideCache::new())
    }

    /// Create settings around an existing cache.
    pub fn with_cache(host: H, cache: OverrideCache<G::Field>) -> Self {
        Self {
            host,
            cache,
            _group: PhantomData,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn cache(&self) -> &OverrideCache<G::Field> {
        &self.cache
    }

    pub fn into_parts(self) -> (H, OverrideCache<G::Field>) {
        (self.host, self.cache)
    }

    /// Folder scope that owns `resource`, or `None` if no workspace folder
    /// contains it.
    fn folder_scope(&self, resource: Option<&Resource>) -> Option<Scope> {
        let folder = self.host.resolve_resource_to_folder(resource?)?;
        Some(Scope::folder(folder))
    }

    /// Four-tier view of `field` as seen from `resource`, with pending
    /// local writes applied.
    pub fn inspect(&self, field: G::Field, resource: Option<&Resource>) -> Result<Inspection> {
        let raw = self.host.inspect_group(G::SECTION, resource)?;

        let global = self.cache.read(&Scope::Tier(Tier::Global));
        let workspace = self.cache.read(&Scope::Tier(Tier::Workspace));
        let empty = PartialSettings::new();
        let folder = self
            .folder_scope(resource)
            .map(|scope| self.cache.read(&scope));

        Ok(merge_inspection(
            G::SECTION,
            field,
            raw.as_ref(),
            Overlays {
                global: &global,
                workspace: &workspace,
                folder: folder.as_deref().unwrap_or(&empty),
            },
        ))
    }

    /// Four-tier view of `field` from the host alone, ignoring the cache.
    pub fn inspect_raw(&self, field: G::Field, resource: Option<&Resource>) -> Result<Inspection> {
        let raw = self.host.inspect_group(G::SECTION, resource)?;
        Ok(project_inspection(G::SECTION, field, raw.as_ref()))
    }

    /// Tier and value `field` resolves to at `scope`.
    pub fn resolve(&self, field: G::Field, scope: impl Into<Scope>) -> Result<Resolution> {
        let FullScope { tier, resource } = normalize_scope(&scope.into());
        let inspection = self.inspect(field, resource.as_ref())?;
        Ok(find_best_value(&inspection, tier))
    }

    /// Effective value of `field` at `scope`; `None` when unset everywhere.
    pub fn get_best_value(
        &self,
        field: G::Field,
        scope: impl Into<Scope>,
    ) -> Result<Option<Value>> {
        Ok(self.resolve(field, scope)?.value)
    }

    /// Effective value of `field` at `scope`, deserialized into `T`.
    pub fn get_best_value_as<T: DeserializeOwned>(
        &self,
        field: G::Field,
        scope: impl Into<Scope>,
    ) -> Result<Option<T>> {
        self.get_best_value(field, scope)?
            .map(|value| {
                serde_json::from_value(value).map_err(|source| Error::InvalidValue {
                    key: G::qualified_key(field),
                    source,
                })
            })
            .transpose()
    }

    /// Value of `field` at exactly the scope's tier, without fallback.
    pub fn get_raw_tier_value(
        &self,
        field: G::Field,
        scope: impl Into<Scope>,
    ) -> Result<Option<Value>> {
        let FullScope { tier, resource } = normalize_scope(&scope.into());
        let inspection = self.inspect(field, resource.as_ref())?;
        Ok(inspection.value_at(tier).cloned())
    }

    /// Effective values of every field of the group at `scope`. Unset fields
    /// are left out.
    pub fn effective_group(&self, scope: impl Into<Scope>) -> Result<Map<String, Value>> {
        let scope = scope.into();
        let mut group = Map::new();
        for field in G::Field::all() {
            if let Some(value) = self.get_best_value(*field, scope.clone())? {
                group.insert(field.key().to_string(), value);
            }
        }
        Ok(group)
    }

    /// The host's own merged view of the group, without pending writes.
    pub fn host_group_value(&self, resource: Option<&Resource>) -> Result<Map<String, Value>> {
        self.host.raw_group_value(G::SECTION, resource)
    }

    /// Write `field = value` at `target`. `None` unsets the field.
    ///
    /// A Folder target must carry a resource; without one the write fails
    /// with [`Error::InvalidTarget`] and nothing reaches the host.
    ///
    /// The cache is updated before the host write is issued, so reads
    /// observe the value immediately. A failed host write is returned to the
    /// caller but the cache keeps the value until the next notification for
    /// the group evicts it.
    pub fn set_value(
        &mut self,
        field: G::Field,
        value: Option<Value>,
        target: &Target,
    ) -> Result<()> {
        match target.tier() {
            Tier::Folder => {
                let resource = target
                    .resource()
                    .ok_or(Error::InvalidTarget { tier: Tier::Folder })?;
                match self.host.resolve_resource_to_folder(resource) {
                    Some(folder) => {
                        self.cache
                            .write(&Target::folder(folder), field, value.clone())?;
                    }
                    None => {
                        tracing::debug!(
                            key = %G::qualified_key(field),
                            %resource,
                            "resource outside every workspace folder, folder value not cached"
                        );
                    }
                }
            }
            _ => {
                self.cache.write(target, field, value.clone())?;
            }
        }

        self.host
            .write_group_field(
                G::SECTION,
                field.key(),
                value.as_ref(),
                target.is_global(),
                target.resource(),
            )
            .inspect_err(|err| {
                tracing::warn!(key = %G::qualified_key(field), %err, "host rejected setting write");
            })
    }

    /// Remove `field` at `target`.
    pub fn unset_value(&mut self, field: G::Field, target: &Target) -> Result<()> {
        self.set_value(field, None, target)
    }

    /// Evict cache entries made stale by one host notification.
    pub fn handle_change(&mut self, change: &ConfigurationChange) -> Invalidation {
        let folders = self.host.workspace_folders();
        invalidate(&mut self.cache, G::SECTION, change, &folders)
    }

    /// Drain the host's pending notifications and apply them in order.
    pub fn process_changes(&mut self) -> Invalidation {
        let mut invalidation = Invalidation::default();
        for change in self.host.take_changes() {
            invalidation.extend(self.handle_change(&change));
        }
        invalidation
    }
}
