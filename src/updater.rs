//! Reconciles UI element metadata against a TMX document.
//!
//! One [`LocalizingInfo`] record describes what a single UI element's
//! localizable strings currently are; [`TransUnitUpdater::update`] brings the
//! document's units for that element up to date with it, creating, updating,
//! or removing units and variants as needed.

use crate::{
    document::TmxDocument,
    types::{LocalizationPriority, LocalizingInfo, TransUnit, UpdateFields},
};

/// Single-pass reconciler for [`LocalizingInfo`] records.
///
/// A logical UI element maps to up to three translation units: the body text
/// under the element's id, the tooltip under the id plus
/// [`TransUnitUpdater::TOOLTIP_SUFFIX`], and the shortcut keys under the id
/// plus [`TransUnitUpdater::SHORTCUT_SUFFIX`].
pub struct TransUnitUpdater {
    literal_newline: String,
}

impl TransUnitUpdater {
    /// Suffix distinguishing an element's tooltip unit from its text unit.
    pub const TOOLTIP_SUFFIX: &'static str = "_ToolTip_";

    /// Suffix distinguishing an element's shortcut-keys unit.
    pub const SHORTCUT_SUFFIX: &'static str = "_ShortcutKeys_";

    /// Header prop that overrides the literal-newline marker for a document.
    pub const HARD_LINEBREAK_PROP: &'static str = "x-hardlinebreakreplacement";

    /// Marker users put in localized text where they want a rendered line
    /// break. Two characters (backslash, 'n'), not a control character.
    pub const DEFAULT_LITERAL_NEWLINE: &'static str = "\\n";

    // Cannot treat CRLF and a bare newline as one case: control text carries
    // CRLF pairs while stored text may already contain bare newlines.
    const CRLF: &'static str = "\r\n";
    const RAW_NEWLINE: &'static str = "\n";

    // Transient stand-in so markers already present in the text survive the
    // newline pass.
    const NEWLINE_STASH: &'static str = "@#$";

    /// Creates an updater for documents shaped like `doc`, reading the
    /// literal-newline marker from the document header.
    pub fn new(doc: &TmxDocument) -> Self {
        let literal_newline = doc
            .header
            .prop(Self::HARD_LINEBREAK_PROP)
            .unwrap_or(Self::DEFAULT_LITERAL_NEWLINE)
            .to_string();
        TransUnitUpdater { literal_newline }
    }

    /// The marker this updater stores in place of raw newlines.
    pub fn literal_newline(&self) -> &str {
        &self.literal_newline
    }

    /// Brings the document's units for `info.id` up to date with `info`.
    ///
    /// Returns `true` if any unit or variant was added, changed, or removed.
    /// A record without a language id is skipped and reported as `false`;
    /// callers that care must check the return value. Comment-only changes
    /// do not count as a content change.
    pub fn update(&self, doc: &mut TmxDocument, info: &LocalizingInfo) -> bool {
        // Can't do anything without a language id.
        if info.lang_id.is_empty() {
            return false;
        }

        let text_id = info.id.clone();
        let tooltip_id = format!("{}{}", info.id, Self::TOOLTIP_SUFFIX);
        let shortcut_id = format!("{}{}", info.id, Self::SHORTCUT_SUFFIX);

        if info.priority == LocalizationPriority::NotLocalizable {
            let mut removed = doc.remove_unit(&text_id);
            removed |= doc.remove_unit(&tooltip_id);
            removed |= doc.remove_unit(&shortcut_id);
            return removed;
        }

        let mut changed = false;

        // Save the shortcut keys
        if info.update_fields.contains(UpdateFields::SHORTCUT_KEYS) {
            changed |= self.update_value(
                doc,
                &shortcut_id,
                info.shortcut_keys.as_deref(),
                &info.lang_id,
            );
        }

        // Save the tooltips
        if info.update_fields.contains(UpdateFields::TOOLTIP) {
            changed |= self.update_value(
                doc,
                &tooltip_id,
                info.tooltip_text.as_deref(),
                &info.lang_id,
            );
        }

        // Save the text
        if info.update_fields.contains(UpdateFields::TEXT) {
            let text = self.normalize_newlines(info.text.as_deref().unwrap_or_default());
            changed |= self.update_value(doc, &text_id, Some(&text), &info.lang_id);
        }

        if !info.update_fields.contains(UpdateFields::COMMENT) {
            return changed;
        }

        // Save the comment on the first of the element's units still in the
        // document: text, else tooltip, else shortcut keys. The others are
        // left alone; with none present, no comment is recorded.
        for id in [&text_id, &tooltip_id, &shortcut_id] {
            if let Some(unit) = doc.unit_for_id_mut(id) {
                unit.notes.clear();
                if let Some(comment) = info.comment.as_deref()
                    && !comment.is_empty()
                {
                    unit.add_note(comment);
                }
                break;
            }
        }

        changed
    }

    /// Reconciles one unit against a new value for one language.
    ///
    /// Any existing variant for the language is removed first, dropping the
    /// unit from the document if that left it empty. Empty values are never
    /// stored; a non-empty value re-creates the unit when needed.
    fn update_value(
        &self,
        doc: &mut TmxDocument,
        unit_id: &str,
        new_value: Option<&str>,
        lang_id: &str,
    ) -> bool {
        let new_value = new_value.unwrap_or_default();
        let mut changed = false;

        if let Some(unit) = doc.unit_for_id_mut(unit_id)
            && unit.remove_variant(lang_id)
        {
            changed = true;
            if unit.is_empty() {
                doc.remove_unit(unit_id);
            }
        }

        if new_value.is_empty() {
            return changed;
        }

        if doc.unit_for_id(unit_id).is_none() {
            doc.add_unit(TransUnit::new(unit_id));
        }
        if let Some(unit) = doc.unit_for_id_mut(unit_id) {
            unit.set_variant(lang_id, new_value);
            changed = true;
        }

        changed
    }

    /// Normalizes every newline in `text` to the literal-newline marker.
    ///
    /// CRLF pairs collapse first so the bare-newline pass never sees their
    /// trailing half; markers already present are stashed so they are not
    /// processed twice.
    fn normalize_newlines(&self, text: &str) -> String {
        let text = text.replace(Self::CRLF, &self.literal_newline);
        let text = text.replace(&self.literal_newline, Self::NEWLINE_STASH);
        let text = text.replace(Self::RAW_NEWLINE, &self.literal_newline);
        text.replace(Self::NEWLINE_STASH, &self.literal_newline)
    }
}
