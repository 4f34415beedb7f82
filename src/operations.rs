//! High-level document operations reusable by library users.

use serde::{Deserialize, Serialize};

use crate::{
    document::TmxDocument,
    types::{ConflictStrategy, TransUnit},
};

/// Counters describing what a merge did.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MergeReport {
    /// Units that did not exist in the target and were appended whole.
    pub added_units: usize,
    /// Variants added to units already present in the target.
    pub added_variants: usize,
    /// Variants overwritten with the incoming value.
    pub replaced_variants: usize,
    /// Units left untouched because of a conflict under
    /// [`ConflictStrategy::Skip`].
    pub skipped_units: usize,
}

/// Merges the units of `source` into `target`.
///
/// Rules:
/// - Units unknown to `target` are appended whole, in `source` order.
/// - Known units merge variant-by-variant: languages missing from the target
///   unit are added; languages present in both are a conflict resolved by
///   `strategy` (`First` keeps the target value, `Last` takes the incoming
///   value, `Skip` leaves a conflicting unit entirely untouched).
/// - Notes and props are only taken from `source` when the target unit has
///   none of its own.
pub fn merge_documents(
    target: &mut TmxDocument,
    source: &TmxDocument,
    strategy: ConflictStrategy,
) -> MergeReport {
    let mut report = MergeReport::default();

    for incoming in source.iter() {
        let Some(existing) = target.unit_for_id_mut(&incoming.id) else {
            report.added_units += 1;
            report.added_variants += incoming.variants.len();
            target.add_unit(incoming.clone());
            continue;
        };

        if strategy == ConflictStrategy::Skip && has_conflict(existing, incoming) {
            report.skipped_units += 1;
            continue;
        }

        for variant in &incoming.variants {
            match existing.variant_for_lang(&variant.lang) {
                None => {
                    existing.set_variant(variant.lang.clone(), variant.text.clone());
                    report.added_variants += 1;
                }
                Some(current) if current.text != variant.text => {
                    if strategy == ConflictStrategy::Last {
                        existing.set_variant(variant.lang.clone(), variant.text.clone());
                        report.replaced_variants += 1;
                    }
                }
                Some(_) => {}
            }
        }

        if existing.notes.is_empty() {
            existing.notes = incoming.notes.clone();
        }
        if existing.props.is_empty() {
            existing.props = incoming.props.clone();
        }
    }

    report
}

fn has_conflict(existing: &TransUnit, incoming: &TransUnit) -> bool {
    incoming.variants.iter().any(|v| {
        existing
            .variant_for_lang(&v.lang)
            .is_some_and(|current| current.text != v.text)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(entries: &[(&str, &[(&str, &str)])]) -> TmxDocument {
        let mut doc = TmxDocument::new();
        for (id, variants) in entries {
            let mut unit = TransUnit::new(*id);
            for (lang, text) in *variants {
                unit.set_variant(*lang, *text);
            }
            doc.add_unit(unit);
        }
        doc
    }

    #[test]
    fn test_merge_appends_unknown_units() {
        let mut target = doc_with(&[("a", &[("en", "A")])]);
        let source = doc_with(&[("b", &[("en", "B"), ("fr", "Bé")])]);

        let report = merge_documents(&mut target, &source, ConflictStrategy::Last);
        assert_eq!(report.added_units, 1);
        assert_eq!(report.added_variants, 2);
        assert_eq!(target.len(), 2);
        assert_eq!(
            target.unit_for_id("b").unwrap().variant_for_lang("fr").unwrap().text,
            "Bé"
        );
    }

    #[test]
    fn test_merge_adds_missing_languages() {
        let mut target = doc_with(&[("a", &[("en", "A")])]);
        let source = doc_with(&[("a", &[("en", "A"), ("fr", "Ah")])]);

        let report = merge_documents(&mut target, &source, ConflictStrategy::First);
        assert_eq!(report.added_variants, 1);
        assert_eq!(report.replaced_variants, 0);
        assert_eq!(
            target.unit_for_id("a").unwrap().variant_for_lang("fr").unwrap().text,
            "Ah"
        );
    }

    #[test]
    fn test_merge_last_overwrites_conflicts() {
        let mut target = doc_with(&[("a", &[("en", "Old")])]);
        let source = doc_with(&[("a", &[("en", "New")])]);

        let report = merge_documents(&mut target, &source, ConflictStrategy::Last);
        assert_eq!(report.replaced_variants, 1);
        assert_eq!(
            target.unit_for_id("a").unwrap().variant_for_lang("en").unwrap().text,
            "New"
        );
    }

    #[test]
    fn test_merge_first_keeps_target_value() {
        let mut target = doc_with(&[("a", &[("en", "Old")])]);
        let source = doc_with(&[("a", &[("en", "New")])]);

        let report = merge_documents(&mut target, &source, ConflictStrategy::First);
        assert_eq!(report.replaced_variants, 0);
        assert_eq!(
            target.unit_for_id("a").unwrap().variant_for_lang("en").unwrap().text,
            "Old"
        );
    }

    #[test]
    fn test_merge_skip_leaves_conflicting_unit_untouched() {
        let mut target = doc_with(&[("a", &[("en", "Old")])]);
        let source = doc_with(&[("a", &[("en", "New"), ("fr", "Nouveau")])]);

        let report = merge_documents(&mut target, &source, ConflictStrategy::Skip);
        assert_eq!(report.skipped_units, 1);
        let unit = target.unit_for_id("a").unwrap();
        assert_eq!(unit.variants.len(), 1);
        assert_eq!(unit.variant_for_lang("en").unwrap().text, "Old");
    }

    #[test]
    fn test_merge_fills_notes_only_when_target_has_none() {
        let mut target = doc_with(&[("a", &[("en", "A")])]);
        let mut source = doc_with(&[("a", &[("en", "A")])]);
        source.unit_for_id_mut("a").unwrap().add_note("from source");

        merge_documents(&mut target, &source, ConflictStrategy::Last);
        assert_eq!(target.unit_for_id("a").unwrap().notes, vec!["from source"]);

        let mut source2 = doc_with(&[("a", &[("en", "A")])]);
        source2.unit_for_id_mut("a").unwrap().add_note("other note");
        merge_documents(&mut target, &source2, ConflictStrategy::Last);
        assert_eq!(target.unit_for_id("a").unwrap().notes, vec!["from source"]);
    }
}
