//! Error types for tierconf-core

use crate::scope::Tier;

/// Result type for tierconf-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tierconf-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Target tier cannot be written without a resource
    #[error("Cannot address the {tier} tier as a write target without a resource")]
    InvalidTarget { tier: Tier },

    /// Tier name did not match any known tier
    #[error("Unknown tier: {name}")]
    UnknownTier { name: String },

    /// The host configuration store rejected an operation
    #[error("Host store error: {message}")]
    Host { message: String },

    /// A stored value could not be converted to the requested type
    #[error("Invalid value for {key}: {source}")]
    InvalidValue {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from tierconf-fs
    #[error(transparent)]
    Fs(#[from] tierconf_fs::Error),
}

impl Error {
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host {
            message: message.into(),
        }
    }
}
