//! Tiers, read scopes and write targets
//!
//! Settings live in four tiers ordered from least to most specific:
//!
//! ```text
//! Default < Global < Workspace < Folder
//! ```
//!
//! A [`Target`] says where a write goes; a [`Scope`] says where a read comes
//! from. Only the Folder tier is tied to a resource. Every other tier is
//! resource-independent, which [`normalize_scope`] enforces.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tierconf_fs::NormalizedPath;

/// Identity of a file or folder used to select folder-level settings.
pub type Resource = NormalizedPath;

/// One precedence level of the layered configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    /// Built-in defaults
    Default,
    /// User settings shared by every workspace
    Global,
    /// Settings of the open workspace
    Workspace,
    /// Settings of one workspace folder
    #[serde(rename = "workspaceFolder")]
    Folder,
}

impl Tier {
    /// All tiers, least specific first.
    pub const ALL: [Tier; 4] = [Tier::Default, Tier::Global, Tier::Workspace, Tier::Folder];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Global => "global",
            Self::Workspace => "workspace",
            Self::Folder => "workspaceFolder",
        }
    }

    /// Position in [`Tier::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn is_more_specific_than(&self, other: Tier) -> bool {
        *self > other
    }

    /// Tiers to consult when resolving at this tier: this tier first, then
    /// every less specific one down to `Default`.
    pub fn fallback_chain(self) -> impl Iterator<Item = Tier> {
        Self::ALL.into_iter().take(self.index() + 1).rev()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" => Ok(Self::Default),
            "global" | "user" => Ok(Self::Global),
            "workspace" => Ok(Self::Workspace),
            "workspaceFolder" | "folder" => Ok(Self::Folder),
            _ => Err(Error::UnknownTier {
                name: s.to_string(),
            }),
        }
    }
}

/// Destination of a write.
///
/// Folder-level writes need a resource; [`Target::folder`] is the only way
/// to build one through the constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    tier: Tier,
    resource: Option<Resource>,
}

impl Target {
    pub fn new(tier: Tier, resource: Option<Resource>) -> Self {
        Self { tier, resource }
    }

    pub fn global() -> Self {
        Self::new(Tier::Global, None)
    }

    pub fn workspace() -> Self {
        Self::new(Tier::Workspace, None)
    }

    pub fn folder(resource: impl Into<Resource>) -> Self {
        Self::new(Tier::Folder, Some(resource.into()))
    }

    /// Attach a resource to this target.
    pub fn with_resource(mut self, resource: impl Into<Resource>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn resource(&self) -> Option<&Resource> {
        self.resource.as_ref()
    }

    /// Whether the host should persist this write at user level.
    pub fn is_global(&self) -> bool {
        self.tier == Tier::Global
    }
}

/// A read locus with an explicit, possibly absent, resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FullScope {
    pub tier: Tier,
    pub resource: Option<Resource>,
}

impl FullScope {
    pub fn new(tier: Tier, resource: Option<Resource>) -> Self {
        Self { tier, resource }
    }

    /// Drop the resource unless the tier is Folder.
    pub fn normalized(self) -> Self {
        match self.tier {
            Tier::Folder => self,
            tier => Self {
                tier,
                resource: None,
            },
        }
    }
}

/// Where a read comes from: a bare tier or a tier with a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scope {
    Tier(Tier),
    Full(FullScope),
}

impl Scope {
    /// Folder scope for `resource`.
    pub fn folder(resource: impl Into<Resource>) -> Self {
        Self::Full(FullScope::new(Tier::Folder, Some(resource.into())))
    }

    pub fn with_resource(tier: Tier, resource: Option<Resource>) -> Self {
        Self::Full(FullScope::new(tier, resource))
    }

    pub fn tier(&self) -> Tier {
        match self {
            Self::Tier(tier) => *tier,
            Self::Full(scope) => scope.tier,
        }
    }

    pub fn resource(&self) -> Option<&Resource> {
        match self {
            Self::Tier(_) => None,
            Self::Full(scope) => scope.resource.as_ref(),
        }
    }

    pub fn is_resource_free(&self) -> bool {
        self.resource().is_none()
    }
}

impl From<Tier> for Scope {
    fn from(tier: Tier) -> Self {
        Self::Tier(tier)
    }
}

impl From<FullScope> for Scope {
    fn from(scope: FullScope) -> Self {
        Self::Full(scope)
    }
}

/// Map a write tier to the read tier it lands in.
///
/// Only Global and Workspace map directly; everything else needs a resource.
pub fn to_scope(tier: Tier) -> Result<Tier> {
    match tier {
        Tier::Global | Tier::Workspace => Ok(tier),
        other => Err(Error::InvalidTarget { tier: other }),
    }
}

/// Scope a read must use to observe a write made to `target`.
pub fn config_target_to_scope(target: &Target) -> Result<Scope> {
    match target.resource() {
        Some(resource) => {
            let tier = match target.tier() {
                Tier::Folder => Tier::Folder,
                other => to_scope(other)?,
            };
            Ok(Scope::with_resource(tier, Some(resource.clone())))
        }
        None => Ok(Scope::Tier(to_scope(target.tier())?)),
    }
}

/// Turn any scope into a full scope, keeping a resource only for Folder.
pub fn normalize_scope(scope: &Scope) -> FullScope {
    match scope {
        Scope::Tier(tier) => FullScope::new(*tier, None),
        Scope::Full(full) => full.clone().normalized(),
    }
}
