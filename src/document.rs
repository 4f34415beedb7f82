//! The TMX document: an ordered collection of translation units plus header
//! metadata. The document owns all units and variants outright; callers
//! mutate it through one reconciliation or edit at a time (single-writer).

use std::{collections::BTreeSet, path::Path};

use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use crate::{
    error::Error,
    types::{Header, TransUnit},
};

/// An in-memory TMX document.
///
/// Units keep their insertion order and are addressed by their unique id.
/// The XML representation lives in [`crate::formats::tmx`]; this type also
/// supports a JSON cache representation for fast reloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TmxDocument {
    pub header: Header,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    units: Vec<TransUnit>,
}

impl TmxDocument {
    /// Creates a new, empty document with a default header.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Returns an iterator over all units in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, TransUnit> {
        self.units.iter()
    }

    /// Finds a unit by its id, if present.
    pub fn unit_for_id(&self, id: &str) -> Option<&TransUnit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Finds a mutable unit by its id, if present.
    pub fn unit_for_id_mut(&mut self, id: &str) -> Option<&mut TransUnit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// Appends a unit to the document.
    pub fn add_unit(&mut self, unit: TransUnit) {
        self.units.push(unit);
    }

    /// Removes the unit with the given id. Returns `true` if one existed.
    /// Removing an absent id is a harmless no-op.
    pub fn remove_unit(&mut self, id: &str) -> bool {
        let before = self.units.len();
        self.units.retain(|u| u.id != id);
        self.units.len() != before
    }

    /// The set of language ids present anywhere in the document.
    pub fn languages(&self) -> BTreeSet<String> {
        self.units
            .iter()
            .flat_map(|u| &u.variants)
            .map(|v| v.lang.clone())
            .collect()
    }

    /// Check if any variant in the document carries the given language,
    /// matching on the primary language subtag ("en" matches "en-US").
    pub fn has_language(&self, lang: &str) -> bool {
        let Ok(target) = lang.parse::<LanguageIdentifier>() else {
            return false;
        };
        self.units
            .iter()
            .flat_map(|u| &u.variants)
            .any(|v| match v.language_identifier() {
                Some(lang_id) => lang_id.language == target.language,
                None => false,
            })
    }

    /// Caches the document to a JSON file.
    pub fn cache_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(Error::Io)?;
        }
        let mut writer = std::fs::File::create(path).map_err(Error::Io)?;
        serde_json::to_writer(&mut writer, self).map_err(Error::Parse)?;
        Ok(())
    }

    /// Loads a document from a JSON cache file.
    pub fn load_from_cache<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut reader = std::fs::File::open(path).map_err(Error::Io)?;
        serde_json::from_reader(&mut reader).map_err(Error::Parse)
    }
}
