//! Core types for the TMX document model.
//! The reconciler and the format layer both operate on these.

use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

/// One language's text value within a translation unit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Variant {
    /// The language id (e.g. "en", "fr-FR").
    pub lang: String,

    /// The translated text.
    pub text: String,
}

impl Variant {
    pub fn new(lang: impl Into<String>, text: impl Into<String>) -> Self {
        Variant {
            lang: lang.into(),
            text: text.into(),
        }
    }

    /// Parses the variant's language id as a BCP 47 identifier, if valid.
    pub fn language_identifier(&self) -> Option<LanguageIdentifier> {
        self.lang.parse().ok()
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.lang, self.text)
    }
}

/// A named, language-keyed bundle of translated text variants.
///
/// The id carries suffix conventions for the sub-kinds of one logical UI
/// element (`Foo`, `Foo_ToolTip_`, `Foo_ShortcutKeys_`); see
/// [`crate::updater::TransUnitUpdater`]. A unit's variants are unique per
/// language id — [`TransUnit::set_variant`] replaces rather than duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransUnit {
    /// Unique unit identifier within a document.
    pub id: String,

    /// Ordered list of per-language variants.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub variants: Vec<Variant>,

    /// Free-text notes (translator comments).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub notes: Vec<String>,

    /// Format-specific properties attached to this unit (`<prop>` elements).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    #[serde(default)]
    pub props: BTreeMap<String, String>,
}

impl TransUnit {
    pub fn new(id: impl Into<String>) -> Self {
        TransUnit {
            id: id.into(),
            variants: Vec::new(),
            notes: Vec::new(),
            props: BTreeMap::new(),
        }
    }

    /// Finds the variant for an exact language id, if present.
    pub fn variant_for_lang(&self, lang: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.lang == lang)
    }

    /// Sets the text for a language, replacing any existing variant with the
    /// same language id.
    pub fn set_variant(&mut self, lang: impl Into<String>, text: impl Into<String>) {
        let lang = lang.into();
        let text = text.into();
        match self.variants.iter_mut().find(|v| v.lang == lang) {
            Some(variant) => variant.text = text,
            None => self.variants.push(Variant { lang, text }),
        }
    }

    /// Removes the variant for a language. Returns `true` if one was removed.
    pub fn remove_variant(&mut self, lang: &str) -> bool {
        let before = self.variants.len();
        self.variants.retain(|v| v.lang != lang);
        self.variants.len() != before
    }

    /// Appends a free-text note.
    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// A unit with no variants carries no content and must not stay in a
    /// document.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl Display for TransUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TransUnit {{ id: {}, variants: {} }}",
            self.id,
            self.variants.len()
        )
    }
}

/// Header-level metadata for a TMX document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Header {
    /// The source language of the memory (`srclang`).
    pub source_lang: String,

    /// The tool that produced the document (`creationtool`).
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(default)]
    pub creation_tool: String,

    /// Header properties (`<prop type="...">` elements), e.g.
    /// `x-hardlinebreakreplacement`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    #[serde(default)]
    pub props: BTreeMap<String, String>,
}

impl Header {
    /// Looks up a header property by its `type` key.
    pub fn prop(&self, key: &str) -> Option<&str> {
        self.props.get(key).map(String::as_str)
    }

    /// Sets a header property, replacing any existing value for the key.
    pub fn set_prop(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.props.insert(key.into(), value.into());
    }
}

impl Default for Header {
    fn default() -> Self {
        Header {
            source_lang: "en".to_string(),
            creation_tool: String::new(),
            props: BTreeMap::new(),
        }
    }
}

/// How important it is that a UI element gets localized.
///
/// Only [`LocalizationPriority::NotLocalizable`] changes reconciliation
/// behavior (the element's units are removed from the document); the other
/// levels are ordering hints for translators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalizationPriority {
    /// The element must never be localized; any stored strings are stale.
    NotLocalizable,
    Low,
    MediumLow,
    Medium,
    MediumHigh,
    High,
}

impl Default for LocalizationPriority {
    fn default() -> Self {
        LocalizationPriority::Medium
    }
}

impl FromStr for LocalizationPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NOT_LOCALIZABLE" => Ok(LocalizationPriority::NotLocalizable),
            "LOW" => Ok(LocalizationPriority::Low),
            "MEDIUM_LOW" => Ok(LocalizationPriority::MediumLow),
            "MEDIUM" => Ok(LocalizationPriority::Medium),
            "MEDIUM_HIGH" => Ok(LocalizationPriority::MediumHigh),
            "HIGH" => Ok(LocalizationPriority::High),
            _ => Err(format!("Unknown localization priority: {}", s)),
        }
    }
}

bitflags! {
    /// Which localizable fields of a UI element an update applies to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UpdateFields: u8 {
        const TEXT = 1;
        const COMMENT = 1 << 1;
        const TOOLTIP = 1 << 2;
        const SHORTCUT_KEYS = 1 << 3;
        const ALL = Self::TEXT.bits()
            | Self::COMMENT.bits()
            | Self::TOOLTIP.bits()
            | Self::SHORTCUT_KEYS.bits();
    }
}

/// The transient record describing what one UI element's localizable content
/// should be. Produced by UI-tree-walking callers, consumed by
/// [`crate::updater::TransUnitUpdater`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizingInfo {
    /// Base unit id for the element (e.g. "MainWindow.OkButton").
    pub id: String,

    /// Language id the update applies to. An empty value makes the update a
    /// reported no-op.
    pub lang_id: String,

    /// Body text of the element. `None` is treated as empty.
    pub text: Option<String>,

    /// Tooltip text of the element.
    pub tooltip_text: Option<String>,

    /// Shortcut-keys text of the element (e.g. "Ctrl+S").
    pub shortcut_keys: Option<String>,

    /// Developer comment for translators.
    pub comment: Option<String>,

    pub priority: LocalizationPriority,

    /// Which of the fields above are eligible for this update.
    pub update_fields: UpdateFields,
}

impl LocalizingInfo {
    /// Creates a record with no content fields set and an empty update mask.
    pub fn new(id: impl Into<String>, lang_id: impl Into<String>) -> Self {
        LocalizingInfo {
            id: id.into(),
            lang_id: lang_id.into(),
            text: None,
            tooltip_text: None,
            shortcut_keys: None,
            comment: None,
            priority: LocalizationPriority::default(),
            update_fields: UpdateFields::empty(),
        }
    }
}

/// Strategy for handling conflicts when merging documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictStrategy {
    /// Keep the value already in the target
    First,
    /// Overwrite with the incoming value (default)
    Last,
    /// Leave units with conflicting variants entirely untouched
    Skip,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_variant_replaces_same_language() {
        let mut unit = TransUnit::new("greeting");
        unit.set_variant("en", "Hello");
        unit.set_variant("fr", "Bonjour");
        unit.set_variant("en", "Hi");

        assert_eq!(unit.variants.len(), 2);
        assert_eq!(unit.variant_for_lang("en").unwrap().text, "Hi");
        assert_eq!(unit.variant_for_lang("fr").unwrap().text, "Bonjour");
    }

    #[test]
    fn test_remove_variant() {
        let mut unit = TransUnit::new("greeting");
        unit.set_variant("en", "Hello");

        assert!(unit.remove_variant("en"));
        assert!(!unit.remove_variant("en"));
        assert!(unit.is_empty());
    }

    #[test]
    fn test_variant_language_identifier() {
        let variant = Variant::new("fr-FR", "Bonjour");
        let lang_id = variant.language_identifier().unwrap();
        assert_eq!(lang_id.language.as_str(), "fr");
        assert_eq!(lang_id.region.unwrap().as_str(), "FR");

        let bad = Variant::new("not-a-language", "x");
        assert!(bad.language_identifier().is_none());
    }

    #[test]
    fn test_header_props() {
        let mut header = Header::default();
        assert_eq!(header.source_lang, "en");
        assert!(header.prop("x-hardlinebreakreplacement").is_none());

        header.set_prop("x-hardlinebreakreplacement", "¶");
        assert_eq!(header.prop("x-hardlinebreakreplacement"), Some("¶"));

        header.set_prop("x-hardlinebreakreplacement", "\\n");
        assert_eq!(header.prop("x-hardlinebreakreplacement"), Some("\\n"));
    }

    #[test]
    fn test_localization_priority_from_str() {
        assert_eq!(
            LocalizationPriority::from_str("not_localizable").unwrap(),
            LocalizationPriority::NotLocalizable
        );
        assert_eq!(
            LocalizationPriority::from_str("medium_low").unwrap(),
            LocalizationPriority::MediumLow
        );
        assert_eq!(
            LocalizationPriority::from_str("HIGH").unwrap(),
            LocalizationPriority::High
        );
        assert!(LocalizationPriority::from_str("urgent").is_err());
    }

    #[test]
    fn test_localization_priority_ordering() {
        assert!(LocalizationPriority::NotLocalizable < LocalizationPriority::Low);
        assert!(LocalizationPriority::MediumLow < LocalizationPriority::High);
    }

    #[test]
    fn test_update_fields_mask() {
        let fields = UpdateFields::TEXT | UpdateFields::TOOLTIP;
        assert!(fields.contains(UpdateFields::TEXT));
        assert!(fields.contains(UpdateFields::TOOLTIP));
        assert!(!fields.contains(UpdateFields::COMMENT));
        assert!(UpdateFields::ALL.contains(UpdateFields::SHORTCUT_KEYS));
        assert!(UpdateFields::empty().is_empty());
    }

    #[test]
    fn test_localizing_info_new() {
        let info = LocalizingInfo::new("MainWindow.OkButton", "en");
        assert_eq!(info.id, "MainWindow.OkButton");
        assert_eq!(info.lang_id, "en");
        assert!(info.text.is_none());
        assert_eq!(info.priority, LocalizationPriority::Medium);
        assert!(info.update_fields.is_empty());
    }

    #[test]
    fn test_trans_unit_display() {
        let mut unit = TransUnit::new("greeting");
        unit.set_variant("en", "Hello");
        let display = format!("{}", unit);
        assert!(display.contains("greeting"));
    }
}
