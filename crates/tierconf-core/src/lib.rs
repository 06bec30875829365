//! Layered settings resolution for tierconf
//!
//! Resolves one setting from four precedence tiers and keeps a local
//! override cache of writes the host store has not yet confirmed:
//!
//! - **Scope model**: tiers, read scopes and write targets
//! - **Override cache**: pending local writes and the synthesized Folder tier
//! - **Inspection**: host values per tier merged with the cache
//! - **Resolution**: first defined value from the requested tier downwards
//! - **Invalidation**: host change notifications evict stale cache entries
//!
//! # Architecture
//!
//! ```text
//!                 LayeredSettings
//!                        |
//!      +--------+--------+---------+----------+
//!      |        |        |         |          |
//!    scope    cache   inspect   resolve   listener
//!                        |
//!                   ConfigHost (MemoryHost, FileHost)
//!                        |
//!                   tierconf-fs
//! ```

pub mod cache;
pub mod error;
pub mod group;
pub mod host;
pub mod inspect;
pub mod listener;
pub mod logging;
pub mod resolve;
pub mod scope;
pub mod settings;

#[cfg(test)]
pub(crate) mod fixtures;

pub use cache::{CacheKey, OverrideCache, PartialSettings};
pub use error::{Error, Result};
pub use group::{SettingField, SettingsGroup, qualify};
pub use host::{ConfigHost, FileHost, GroupInspection, HostWrite, MemoryHost};
pub use inspect::Inspection;
pub use listener::{ChangedKey, ConfigurationChange, Invalidation};
pub use resolve::{Resolution, find_best_value};
pub use scope::{
    FullScope, Resource, Scope, Target, Tier, config_target_to_scope, normalize_scope, to_scope,
};
pub use settings::LayeredSettings;
