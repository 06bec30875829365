//! Filesystem layer for tierconf
//!
//! Provides normalized resource paths and safe reading/writing of
//! settings files.

pub mod constants;
pub mod error;
pub mod io;
pub mod path;
pub mod store;

pub use constants::SettingsPath;
pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use store::{SettingsFormat, SettingsStore};
