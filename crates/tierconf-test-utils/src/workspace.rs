//! [`TestWorkspace`] builder for file-backed host scenarios.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tierconf_core::FileHost;

/// A temporary workspace plus a private user config directory.
///
/// # Example
///
/// ```rust,no_run
/// use tierconf_test_utils::TestWorkspace;
/// use serde_json::json;
///
/// let ws = TestWorkspace::new();
/// ws.write_workspace_settings(&json!({"languageTool": {"language": "de-DE"}}));
/// let host = ws.file_host();
/// ws.assert_workspace_setting("languageTool", "language", &json!("de-DE"));
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create an empty workspace directory and user config directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("workspace")).unwrap();
        fs::create_dir_all(temp_dir.path().join("user")).unwrap();
        Self { temp_dir }
    }

    /// Root of the workspace.
    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join("workspace")
    }

    /// Directory standing in for the platform config dir.
    pub fn user_dir(&self) -> PathBuf {
        self.temp_dir.path().join("user")
    }

    /// Create a folder under the workspace root and return its path.
    pub fn add_folder(&self, name: &str) -> PathBuf {
        let folder = self.root().join(name);
        fs::create_dir_all(&folder).unwrap();
        folder
    }

    pub fn workspace_settings_file(&self) -> PathBuf {
        self.root().join(".tierconf").join("settings.json")
    }

    pub fn user_settings_file(&self) -> PathBuf {
        self.user_dir().join("settings.json")
    }

    /// Overwrite the workspace settings file.
    pub fn write_workspace_settings(&self, settings: &Value) {
        write_json(&self.workspace_settings_file(), settings);
    }

    /// Overwrite the user settings file.
    pub fn write_user_settings(&self, settings: &Value) {
        write_json(&self.user_settings_file(), settings);
    }

    /// A [`FileHost`] rooted at this workspace using the private user dir.
    pub fn file_host(&self) -> FileHost {
        FileHost::with_global_config_dir(self.root(), self.user_dir())
    }

    /// Assert that the workspace settings file holds `expected` for
    /// `section.key`.
    ///
    /// # Panics
    /// Panics if the file is missing, unparsable, or holds another value.
    pub fn assert_workspace_setting(&self, section: &str, key: &str, expected: &Value) {
        assert_setting(
            &self.workspace_settings_file(),
            section,
            key,
            Some(expected),
        );
    }

    /// Assert that the user settings file holds `expected` for `section.key`.
    ///
    /// # Panics
    /// Panics if the file is missing, unparsable, or holds another value.
    pub fn assert_user_setting(&self, section: &str, key: &str, expected: &Value) {
        assert_setting(&self.user_settings_file(), section, key, Some(expected));
    }

    /// Assert that the workspace settings file does **not** define
    /// `section.key`. A missing file counts as not defining it.
    pub fn assert_workspace_setting_absent(&self, section: &str, key: &str) {
        assert_setting(&self.workspace_settings_file(), section, key, None);
    }
}

fn write_json(path: &Path, value: &Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn assert_setting(path: &Path, section: &str, key: &str, expected: Option<&Value>) {
    let settings: Value = match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content)
            .unwrap_or_else(|e| panic!("Could not parse {}: {}", path.display(), e)),
        Err(_) if expected.is_none() => return,
        Err(e) => panic!("Could not read {}: {}", path.display(), e),
    };
    let actual = settings.get(section).and_then(|group| group.get(key));
    assert_eq!(
        actual,
        expected,
        "Unexpected value for {}.{} in {}",
        section,
        key,
        path.display()
    );
}
