//! Settings group shared by the test suites.

use tierconf_core::{SettingField, SettingsGroup};

/// Fields of the `languageTool` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LanguageField {
    Language,
    MotherTongue,
    PreferredVariants,
    DisabledRules,
}

impl SettingField for LanguageField {
    fn key(&self) -> &'static str {
        match self {
            Self::Language => "language",
            Self::MotherTongue => "motherTongue",
            Self::PreferredVariants => "preferredVariants",
            Self::DisabledRules => "disabledRules",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::Language,
            Self::MotherTongue,
            Self::PreferredVariants,
            Self::DisabledRules,
        ]
    }
}

/// The `languageTool` settings section.
pub struct LanguageTool;

impl SettingsGroup for LanguageTool {
    const SECTION: &'static str = "languageTool";
    type Field = LanguageField;
}
