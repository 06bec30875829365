//! Settings group used by the unit tests in this crate.

use crate::{SettingField, SettingsGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Language,
    MotherTongue,
    DisabledRules,
}

impl SettingField for Field {
    fn key(&self) -> &'static str {
        match self {
            Self::Language => "language",
            Self::MotherTongue => "motherTongue",
            Self::DisabledRules => "disabledRules",
        }
    }

    fn all() -> &'static [Self] {
        &[Self::Language, Self::MotherTongue, Self::DisabledRules]
    }
}

pub struct Lang;

impl SettingsGroup for Lang {
    const SECTION: &'static str = "languageTool";
    type Field = Field;
}
