//! Composite-format placeholder extraction and validation.
//!
//! Localized UI strings are format templates (`"Saved {0} of {1}"`,
//! `"{0:d} items"`); a variant that drops or invents an argument index will
//! fail at render time in that one language. This module extracts the
//! argument indexes used by a string and checks every variant of a unit
//! against its source-language variant.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{document::TmxDocument, error::Error, types::TransUnit};

lazy_static! {
    // Doubled braces are literals; a real placeholder is {index[,alignment][:format]}.
    static ref TOKEN_REGEX: Regex =
        Regex::new(r"\{\{|\}\}|\{(\d+)(?:,-?\d+)?(?::[^{}]*)?\}").unwrap();
}

/// One placeholder occurrence in a format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlaceholderToken {
    /// The argument index (`{0}`, `{1:d}`, ... → 0, 1, ...).
    pub index: usize,
}

/// Extracts placeholder tokens in occurrence order, ignoring escaped braces.
pub fn extract_placeholders(input: &str) -> Vec<PlaceholderToken> {
    TOKEN_REGEX
        .captures_iter(input)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse().ok())
        .map(|index| PlaceholderToken { index })
        .collect()
}

/// The set of argument indexes a format string consumes.
pub fn placeholder_signature(input: &str) -> BTreeSet<usize> {
    extract_placeholders(input).iter().map(|t| t.index).collect()
}

/// A variant whose placeholder set disagrees with the source language's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderMismatch {
    pub unit_id: String,
    pub lang: String,
    /// Indexes the source text uses that this variant lacks.
    pub missing: Vec<usize>,
    /// Indexes this variant uses that the source text does not.
    pub unexpected: Vec<usize>,
}

/// Checks every variant of `unit` against the variant in `source_lang`.
///
/// A unit without a source-language variant produces no mismatches; there is
/// nothing to compare against.
pub fn validate_unit_placeholders(unit: &TransUnit, source_lang: &str) -> Vec<PlaceholderMismatch> {
    let Some(source) = unit.variant_for_lang(source_lang) else {
        return Vec::new();
    };
    let expected = placeholder_signature(&source.text);

    unit.variants
        .iter()
        .filter(|v| v.lang != source_lang)
        .filter_map(|variant| {
            let actual = placeholder_signature(&variant.text);
            if actual == expected {
                return None;
            }
            Some(PlaceholderMismatch {
                unit_id: unit.id.clone(),
                lang: variant.lang.clone(),
                missing: expected.difference(&actual).copied().collect(),
                unexpected: actual.difference(&expected).copied().collect(),
            })
        })
        .collect()
}

/// Checks every unit of `doc` against the header's source language.
pub fn validate_placeholders(doc: &TmxDocument) -> Vec<PlaceholderMismatch> {
    doc.iter()
        .flat_map(|unit| validate_unit_placeholders(unit, &doc.header.source_lang))
        .collect()
}

/// Strict variant of [`validate_placeholders`]: fails with
/// [`Error::Validation`] naming the offending units.
pub fn ensure_placeholders(doc: &TmxDocument) -> Result<(), Error> {
    let mismatches = validate_placeholders(doc);
    if mismatches.is_empty() {
        return Ok(());
    }
    let summary = mismatches
        .iter()
        .map(|m| format!("{} [{}]", m.unit_id, m.lang))
        .collect::<Vec<_>>()
        .join(", ");
    Err(Error::validation_error(format!(
        "placeholder mismatch in {}",
        summary
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_placeholders() {
        let tokens = extract_placeholders("Saved {0} of {1}");
        assert_eq!(
            tokens,
            vec![PlaceholderToken { index: 0 }, PlaceholderToken { index: 1 }]
        );
    }

    #[test]
    fn test_extract_with_alignment_and_format() {
        let tokens = extract_placeholders("{0,-5:N2} and {1:d}");
        assert_eq!(
            tokens,
            vec![PlaceholderToken { index: 0 }, PlaceholderToken { index: 1 }]
        );
    }

    #[test]
    fn test_escaped_braces_are_ignored() {
        assert!(extract_placeholders("{{0}} literal").is_empty());
        // "{{{0}}}" renders as a braced argument; the inner {0} is real.
        assert_eq!(
            extract_placeholders("{{{0}}}"),
            vec![PlaceholderToken { index: 0 }]
        );
    }

    #[test]
    fn test_named_braces_are_not_placeholders() {
        assert!(extract_placeholders("set {name} here").is_empty());
    }

    #[test]
    fn test_signature_deduplicates() {
        let sig = placeholder_signature("{1} then {0} then {1}");
        assert_eq!(sig.into_iter().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_validate_unit_reports_missing_and_unexpected() {
        let mut unit = TransUnit::new("Progress.Label");
        unit.set_variant("en", "Saved {0} of {1}");
        unit.set_variant("fr", "Enregistré {0} sur {2}");

        let mismatches = validate_unit_placeholders(&unit, "en");
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].lang, "fr");
        assert_eq!(mismatches[0].missing, vec![1]);
        assert_eq!(mismatches[0].unexpected, vec![2]);
    }

    #[test]
    fn test_validate_unit_without_source_variant() {
        let mut unit = TransUnit::new("X");
        unit.set_variant("fr", "{0}");
        assert!(validate_unit_placeholders(&unit, "en").is_empty());
    }

    #[test]
    fn test_ensure_placeholders() {
        let mut doc = TmxDocument::new();
        let mut unit = TransUnit::new("Progress.Label");
        unit.set_variant("en", "Saved {0}");
        unit.set_variant("fr", "Enregistré");
        doc.add_unit(unit);

        let err = ensure_placeholders(&doc).unwrap_err();
        assert!(err.to_string().contains("Progress.Label [fr]"));

        doc.unit_for_id_mut("Progress.Label")
            .unwrap()
            .set_variant("fr", "Enregistré {0}");
        assert!(ensure_placeholders(&doc).is_ok());
    }

    #[test]
    fn test_validate_document_uses_header_source_lang() {
        let mut doc = TmxDocument::new();
        doc.header.source_lang = "en".to_string();

        let mut good = TransUnit::new("good");
        good.set_variant("en", "{0} files");
        good.set_variant("de", "{0} Dateien");
        doc.add_unit(good);

        let mut bad = TransUnit::new("bad");
        bad.set_variant("en", "{0} files");
        bad.set_variant("de", "Dateien");
        doc.add_unit(bad);

        let mismatches = validate_placeholders(&doc);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].unit_id, "bad");
        assert_eq!(mismatches[0].missing, vec![0]);
    }
}
