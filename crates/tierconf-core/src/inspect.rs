//! Four-tier inspection of a single setting
//!
//! Combines the host store's raw group inspection with the override cache.
//! Cached Global and Workspace values replace what the host reports; the
//! Folder tier comes from the cache alone.

use crate::cache::PartialSettings;
use crate::group::{SettingField, qualify};
use crate::host::GroupInspection;
use crate::scope::Tier;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Values of one setting at each tier, before fallback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    /// Qualified key, e.g. `languageTool.language`
    pub key: String,
    pub default_value: Option<Value>,
    pub global_value: Option<Value>,
    pub workspace_value: Option<Value>,
    pub workspace_folder_value: Option<Value>,
}

impl Inspection {
    /// An inspection with no value at any tier.
    pub fn empty(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Value at exactly `tier`.
    pub fn value_at(&self, tier: Tier) -> Option<&Value> {
        match tier {
            Tier::Default => self.default_value.as_ref(),
            Tier::Global => self.global_value.as_ref(),
            Tier::Workspace => self.workspace_value.as_ref(),
            Tier::Folder => self.workspace_folder_value.as_ref(),
        }
    }

    /// Most specific tier holding a value, if any.
    pub fn most_specific_tier(&self) -> Option<Tier> {
        Tier::ALL
            .into_iter()
            .rev()
            .find(|tier| self.value_at(*tier).is_some())
    }
}

/// Pending cache values for the three overlayable tiers.
#[derive(Debug, Clone, Copy)]
pub struct Overlays<'a, F> {
    pub global: &'a PartialSettings<F>,
    pub workspace: &'a PartialSettings<F>,
    pub folder: &'a PartialSettings<F>,
}

/// Project `field` out of one raw tier object.
///
/// A missing tier, or one that is not an object, projects to `None`.
fn project(tier_value: Option<&Value>, key: &str) -> Option<Value> {
    tier_value.and_then(|group| group.get(key)).cloned()
}

/// Cached value wins when the cache mentions the field at all, even as an
/// unset.
fn overlay<F: SettingField>(
    host_value: Option<Value>,
    cached: &PartialSettings<F>,
    field: F,
) -> Option<Value> {
    match cached.get(&field) {
        Some(pending) => pending.clone(),
        None => host_value,
    }
}

/// Host-only projection of `field`; the Folder tier is always empty.
pub fn project_inspection<F: SettingField>(
    section: &str,
    field: F,
    raw: Option<&GroupInspection>,
) -> Inspection {
    let key = field.key();
    let mut inspection = Inspection::empty(qualify(section, key));
    if let Some(raw) = raw {
        inspection.default_value = project(raw.default_value.as_ref(), key);
        inspection.global_value = project(raw.global_value.as_ref(), key);
        inspection.workspace_value = project(raw.workspace_value.as_ref(), key);
    }
    inspection
}

/// Merge the host's raw inspection with the cache overlays.
pub fn merge_inspection<F: SettingField>(
    section: &str,
    field: F,
    raw: Option<&GroupInspection>,
    overlays: Overlays<'_, F>,
) -> Inspection {
    let projected = project_inspection(section, field, raw);
    Inspection {
        global_value: overlay(projected.global_value, overlays.global, field),
        workspace_value: overlay(projected.workspace_value, overlays.workspace, field),
        workspace_folder_value: overlays.folder.get(&field).cloned().flatten(),
        ..projected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Field;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn raw() -> GroupInspection {
        GroupInspection {
            key: "languageTool".into(),
            default_value: Some(json!({"language": "auto", "motherTongue": ""})),
            global_value: Some(json!({"language": "en-GB"})),
            workspace_value: None,
        }
    }

    #[test]
    fn projects_each_tier_independently() {
        let inspection = project_inspection("languageTool", Field::Language, Some(&raw()));

        assert_eq!(inspection.key, "languageTool.language");
        assert_eq!(inspection.default_value, Some(json!("auto")));
        assert_eq!(inspection.global_value, Some(json!("en-GB")));
        assert_eq!(inspection.workspace_value, None);
        assert_eq!(inspection.workspace_folder_value, None);
    }

    #[test]
    fn missing_group_projects_to_empty() {
        let inspection = project_inspection("languageTool", Field::Language, None);
        assert_eq!(inspection, Inspection::empty("languageTool.language"));
        assert_eq!(inspection.most_specific_tier(), None);
    }

    #[test]
    fn non_object_tier_projects_to_none() {
        let mut raw = raw();
        raw.workspace_value = Some(json!("not an object"));
        let inspection = project_inspection("languageTool", Field::Language, Some(&raw));
        assert_eq!(inspection.workspace_value, None);
    }

    #[test]
    fn cache_overlays_host_values() {
        let global = PartialSettings::from([(Field::Language, Some(json!("en-US")))]);
        let workspace = PartialSettings::from([(Field::Language, Some(json!("de-DE")))]);
        let folder = PartialSettings::from([(Field::Language, Some(json!("fr")))]);

        let inspection = merge_inspection(
            "languageTool",
            Field::Language,
            Some(&raw()),
            Overlays {
                global: &global,
                workspace: &workspace,
                folder: &folder,
            },
        );

        assert_eq!(
            inspection,
            Inspection {
                key: "languageTool.language".into(),
                default_value: Some(json!("auto")),
                global_value: Some(json!("en-US")),
                workspace_value: Some(json!("de-DE")),
                workspace_folder_value: Some(json!("fr")),
            }
        );
        assert_eq!(inspection.most_specific_tier(), Some(Tier::Folder));
    }

    #[test]
    fn pending_unset_hides_host_value() {
        let global = PartialSettings::from([(Field::Language, None)]);
        let empty = PartialSettings::new();

        let inspection = merge_inspection(
            "languageTool",
            Field::Language,
            Some(&raw()),
            Overlays {
                global: &global,
                workspace: &empty,
                folder: &empty,
            },
        );

        assert_eq!(inspection.global_value, None);
        assert_eq!(inspection.default_value, Some(json!("auto")));
    }

    #[test]
    fn overlay_for_other_field_leaves_host_value() {
        let global = PartialSettings::from([(Field::MotherTongue, Some(json!("nl")))]);
        let empty = PartialSettings::new();

        let inspection = merge_inspection(
            "languageTool",
            Field::Language,
            Some(&raw()),
            Overlays {
                global: &global,
                workspace: &empty,
                folder: &empty,
            },
        );

        assert_eq!(inspection.global_value, Some(json!("en-GB")));
    }

    #[test]
    fn value_at_reads_exact_tier() {
        let inspection = project_inspection("languageTool", Field::Language, Some(&raw()));
        assert_eq!(inspection.value_at(Tier::Global), Some(&json!("en-GB")));
        assert_eq!(inspection.value_at(Tier::Workspace), None);
    }
}
