//! Well-known directory and file names for settings storage.

use std::path::Path;

/// Filesystem names used when locating settings files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsPath {
    /// Application directory under the platform config dir (`tierconf`)
    GlobalDir,
    /// Per-workspace settings directory (`.tierconf`)
    WorkspaceDir,
    /// Settings file inside either directory (`settings.json`)
    SettingsFile,
}

impl SettingsPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GlobalDir => "tierconf",
            Self::WorkspaceDir => ".tierconf",
            Self::SettingsFile => "settings.json",
        }
    }
}

impl AsRef<Path> for SettingsPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for SettingsPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for SettingsPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
