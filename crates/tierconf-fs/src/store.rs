//! Format-agnostic settings file loading and saving

use crate::{Error, NormalizedPath, Result, io};
use serde_json::{Map, Value};

/// On-disk format of a settings file, detected from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    Json,
    Toml,
}

impl SettingsFormat {
    /// Detect the format from a path's extension.
    pub fn from_path(path: &NormalizedPath) -> Result<Self> {
        let extension = path.extension().unwrap_or("");
        match extension.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Toml => "TOML",
        }
    }
}

/// Loads and saves settings objects.
///
/// A settings file always holds a single object at the top level. Format is
/// detected from the file extension and handled transparently.
#[derive(Debug, Default, Clone, Copy)]
pub struct SettingsStore;

impl SettingsStore {
    pub fn new() -> Self {
        Self
    }

    /// Load the settings object stored at `path`.
    ///
    /// A missing file yields an empty object. An empty or whitespace-only
    /// file does too, since editors commonly create those.
    pub fn load_object(&self, path: &NormalizedPath) -> Result<Map<String, Value>> {
        let format = SettingsFormat::from_path(path)?;
        let Some(content) = io::read_text_if_exists(path)? else {
            tracing::debug!(%path, "settings file not found, using empty object");
            return Ok(Map::new());
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        let parse_error = |message: String| Error::SettingsParse {
            path: path.to_native(),
            format: format.name().into(),
            message,
        };
        let value: Value = match format {
            SettingsFormat::Json => {
                serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?
            }
            SettingsFormat::Toml => {
                toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?
            }
        };

        match value {
            Value::Object(map) => Ok(map),
            _ => Err(Error::NotAnObject {
                path: path.to_native(),
            }),
        }
    }

    /// Save a settings object to `path` atomically.
    pub fn save_object(&self, path: &NormalizedPath, object: &Map<String, Value>) -> Result<()> {
        let format = SettingsFormat::from_path(path)?;
        let serialize_error = |message: String| Error::SettingsSerialize {
            path: path.to_native(),
            format: format.name().into(),
            message,
        };

        let content = match format {
            SettingsFormat::Json => {
                let mut text = serde_json::to_string_pretty(object)
                    .map_err(|e| serialize_error(e.to_string()))?;
                text.push('\n');
                text
            }
            SettingsFormat::Toml => {
                toml::to_string_pretty(object).map_err(|e| serialize_error(e.to_string()))?
            }
        };

        io::write_text(path, &content)
    }
}
