//! Typed settings groups
//!
//! A settings group is one configuration section (for example
//! `languageTool`) with a fixed set of known fields. Fields are an
//! enumeration rather than free-form strings so that cache entries and
//! tier projections can only ever name a field the group declares.

use std::fmt::Debug;
use std::hash::Hash;

/// One known field of a settings group.
pub trait SettingField: Copy + Eq + Ord + Hash + Debug + 'static {
    /// Key of this field inside its section, e.g. `language`.
    fn key(&self) -> &'static str;

    /// Every field of the group, in declaration order.
    fn all() -> &'static [Self];

    /// Look up a field by its key.
    fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|field| field.key() == key)
    }
}

/// A configuration section with an enumerated set of fields.
///
/// # Example
///
/// ```
/// use tierconf_core::{SettingField, SettingsGroup};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// enum EditorField {
///     FontSize,
///     TabWidth,
/// }
///
/// impl SettingField for EditorField {
///     fn key(&self) -> &'static str {
///         match self {
///             Self::FontSize => "fontSize",
///             Self::TabWidth => "tabWidth",
///         }
///     }
///
///     fn all() -> &'static [Self] {
///         &[Self::FontSize, Self::TabWidth]
///     }
/// }
///
/// struct Editor;
///
/// impl SettingsGroup for Editor {
///     const SECTION: &'static str = "editor";
///     type Field = EditorField;
/// }
///
/// assert_eq!(Editor::qualified_key(EditorField::TabWidth), "editor.tabWidth");
/// assert_eq!(EditorField::from_key("fontSize"), Some(EditorField::FontSize));
/// ```
pub trait SettingsGroup {
    /// Section name as the host store knows it.
    const SECTION: &'static str;

    /// Enumeration of the section's fields.
    type Field: SettingField;

    /// Fully qualified key of `field`, e.g. `languageTool.language`.
    fn qualified_key(field: Self::Field) -> String {
        qualify(Self::SECTION, field.key())
    }
}

/// Qualify a field key with its section name.
pub fn qualify(section: &str, key: &str) -> String {
    format!("{section}.{key}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Field, Lang};

    #[test]
    fn qualify_joins_with_dot() {
        assert_eq!(qualify("languageTool", "language"), "languageTool.language");
        assert_eq!(
            Lang::qualified_key(Field::MotherTongue),
            "languageTool.motherTongue"
        );
    }

    #[test]
    fn from_key_finds_declared_fields_only() {
        assert_eq!(Field::from_key("language"), Some(Field::Language));
        assert_eq!(Field::from_key("Language"), None);
        assert_eq!(Field::from_key("unknown"), None);
    }
}
