//! End-to-end scenarios over the file-backed host
//!
//! These exercise the full flow: settings files on disk -> host inspection ->
//! cache overlay -> resolution, and the notification path back to the cache.

use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};
use tierconf_core::{ConfigHost, Error, FileHost, LayeredSettings, Resource, Scope, Target, Tier};
use tierconf_test_utils::{LanguageField, LanguageTool, TestWorkspace};

type Settings = LayeredSettings<LanguageTool, FileHost>;

fn defaults() -> Map<String, Value> {
    match json!({"language": "auto", "motherTongue": "", "disabledRules": []}) {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

/// Route resolver logs to the test output; only the first call installs.
fn init_logging() {
    let _ = tierconf_core::logging::init_with_filter("tierconf_core=debug");
}

fn open(ws: &TestWorkspace) -> Settings {
    init_logging();
    let mut host = ws.file_host().with_defaults("languageTool", defaults());
    host.refresh().unwrap();
    LayeredSettings::new(host)
}

#[test]
fn tiers_resolve_from_files_in_precedence_order() {
    let ws = TestWorkspace::new();
    ws.write_user_settings(&json!({"languageTool": {"language": "en-GB", "motherTongue": "nl"}}));
    ws.write_workspace_settings(&json!({"languageTool": {"language": "de-DE"}}));
    let settings = open(&ws);

    let inspection = settings.inspect(LanguageField::Language, None).unwrap();
    assert_eq!(inspection.key, "languageTool.language");
    assert_eq!(inspection.default_value, Some(json!("auto")));
    assert_eq!(inspection.global_value, Some(json!("en-GB")));
    assert_eq!(inspection.workspace_value, Some(json!("de-DE")));
    assert_eq!(inspection.workspace_folder_value, None);

    assert_eq!(
        settings
            .get_best_value(LanguageField::Language, Tier::Global)
            .unwrap(),
        Some(json!("en-GB"))
    );
    assert_eq!(
        settings
            .get_best_value(LanguageField::MotherTongue, Tier::Workspace)
            .unwrap(),
        Some(json!("nl"))
    );
    assert_eq!(
        settings
            .get_best_value(LanguageField::PreferredVariants, Tier::Workspace)
            .unwrap(),
        None
    );
}

#[test]
fn workspace_write_round_trips_through_disk() {
    let ws = TestWorkspace::new();
    let mut settings = open(&ws);

    settings
        .set_value(
            LanguageField::Language,
            Some(json!("en-US")),
            &Target::workspace(),
        )
        .unwrap();
    ws.assert_workspace_setting("languageTool", "language", &json!("en-US"));
    assert_eq!(settings.cache().len(), 1);

    let invalidation = settings.process_changes();
    assert_eq!(invalidation.evicted, vec![Scope::Tier(Tier::Workspace)]);
    assert!(settings.cache().is_empty());

    assert_eq!(
        settings
            .get_best_value(LanguageField::Language, Tier::Workspace)
            .unwrap(),
        Some(json!("en-US"))
    );
}

#[test]
fn global_write_lands_in_user_file() {
    let ws = TestWorkspace::new();
    let mut settings = open(&ws);

    settings
        .set_value(
            LanguageField::DisabledRules,
            Some(json!(["WHITESPACE_RULE"])),
            &Target::global(),
        )
        .unwrap();

    ws.assert_user_setting("languageTool", "disabledRules", &json!(["WHITESPACE_RULE"]));
    ws.assert_workspace_setting_absent("languageTool", "disabledRules");

    let rules: Option<Vec<String>> = settings
        .get_best_value_as(LanguageField::DisabledRules, Tier::Workspace)
        .unwrap();
    assert_eq!(rules, Some(vec!["WHITESPACE_RULE".to_string()]));
}

#[test]
fn external_edit_is_picked_up_by_refresh() {
    let ws = TestWorkspace::new();
    ws.write_user_settings(&json!({"languageTool": {"language": "en-GB"}}));
    let mut settings = open(&ws);

    settings
        .set_value(
            LanguageField::Language,
            Some(json!("en-US")),
            &Target::workspace(),
        )
        .unwrap();
    assert_eq!(
        settings
            .get_best_value(LanguageField::Language, Tier::Workspace)
            .unwrap(),
        Some(json!("en-US"))
    );

    // Another process empties the workspace settings file
    ws.write_workspace_settings(&json!({}));
    assert_eq!(settings.host_mut().refresh().unwrap(), 1);
    settings.process_changes();

    let resolution = settings
        .resolve(LanguageField::Language, Tier::Workspace)
        .unwrap();
    assert_eq!(resolution.tier, Tier::Global);
    assert_eq!(resolution.value, Some(json!("en-GB")));
}

#[test]
fn folder_values_are_kept_per_folder() {
    let ws = TestWorkspace::new();
    let app = ws.add_folder("app");
    let docs = ws.add_folder("docs");
    init_logging();
    let host = ws
        .file_host()
        .with_defaults("languageTool", defaults())
        .with_folders([app.as_path(), docs.as_path()]);
    let mut settings = LayeredSettings::<LanguageTool, _>::new(host);

    let readme = Resource::new(docs.join("README.md"));
    settings
        .set_value(
            LanguageField::Language,
            Some(json!("fr")),
            &Target::folder(readme.clone()),
        )
        .unwrap();

    assert_eq!(
        settings
            .get_raw_tier_value(LanguageField::Language, Scope::folder(readme))
            .unwrap(),
        Some(json!("fr"))
    );
    assert_eq!(
        settings
            .get_raw_tier_value(LanguageField::Language, Scope::folder(Resource::new(&app)))
            .unwrap(),
        None
    );

    // The host has no folder tier; the value was persisted at workspace level
    ws.assert_workspace_setting("languageTool", "language", &json!("fr"));
}

#[test]
fn unset_removes_value_from_file() {
    let ws = TestWorkspace::new();
    ws.write_workspace_settings(
        &json!({"languageTool": {"language": "de-DE", "motherTongue": "en"}}),
    );
    let mut settings = open(&ws);

    settings
        .unset_value(LanguageField::Language, &Target::workspace())
        .unwrap();

    ws.assert_workspace_setting_absent("languageTool", "language");
    ws.assert_workspace_setting("languageTool", "motherTongue", &json!("en"));
    assert_eq!(
        settings
            .get_best_value(LanguageField::Language, Tier::Workspace)
            .unwrap(),
        Some(json!("auto"))
    );
}

#[test]
fn effective_group_combines_all_tiers() {
    let ws = TestWorkspace::new();
    ws.write_user_settings(&json!({"languageTool": {"motherTongue": "nl"}}));
    let mut settings = open(&ws);
    settings
        .set_value(
            LanguageField::PreferredVariants,
            Some(json!(["en-US"])),
            &Target::workspace(),
        )
        .unwrap();

    let group = settings.effective_group(Tier::Workspace).unwrap();
    assert_eq!(
        Value::Object(group),
        json!({
            "language": "auto",
            "motherTongue": "nl",
            "preferredVariants": ["en-US"],
            "disabledRules": []
        })
    );

    let host_view = settings.host_group_value(None).unwrap();
    assert_eq!(host_view["preferredVariants"], json!(["en-US"]));
}

#[test]
fn malformed_settings_file_fails_reads() {
    let ws = TestWorkspace::new();
    std::fs::create_dir_all(ws.workspace_settings_file().parent().unwrap()).unwrap();
    std::fs::write(ws.workspace_settings_file(), "{ not json").unwrap();
    let settings = LayeredSettings::<LanguageTool, _>::new(ws.file_host());

    let err = settings
        .get_best_value(LanguageField::Language, Tier::Workspace)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Fs(tierconf_fs::Error::SettingsParse { .. })
    ));
}

#[test]
fn root_folder_is_used_when_none_are_declared() {
    let ws = TestWorkspace::new();
    let mut settings = open(&ws);
    let file = settings.host().root().join("notes/today.md");

    settings
        .set_value(
            LanguageField::MotherTongue,
            Some(json!("pl")),
            &Target::folder(file.clone()),
        )
        .unwrap();

    let folders = settings.host().workspace_folders();
    assert_eq!(folders.len(), 1);
    assert_eq!(
        settings
            .resolve(LanguageField::MotherTongue, Scope::folder(file))
            .unwrap()
            .tier,
        Tier::Folder
    );
}
