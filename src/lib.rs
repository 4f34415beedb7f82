#![forbid(unsafe_code)]
//! Translation-memory (TMX) toolkit for Rust.
//!
//! Models TMX documents (translation units, per-language variants, notes),
//! parses and writes the TMX XML representation, and reconciles UI string
//! metadata against a document through [`TransUnitUpdater`].
//!
//! # Quick Start
//!
//! ```rust
//! use tmxkit::{LocalizingInfo, TmxDocument, TransUnitUpdater, UpdateFields};
//!
//! let mut doc = TmxDocument::new();
//! let updater = TransUnitUpdater::new(&doc);
//!
//! // Describe what one UI element's strings currently are...
//! let mut info = LocalizingInfo::new("MainWindow.OkButton", "en");
//! info.text = Some("OK".to_string());
//! info.update_fields = UpdateFields::TEXT;
//!
//! // ...and bring the document up to date with it.
//! assert!(updater.update(&mut doc, &info));
//! assert!(doc.unit_for_id("MainWindow.OkButton").is_some());
//! ```
//!
//! # Features
//!
//! - Unified in-memory model (`TmxDocument`) for translation units, variants,
//!   notes, and header properties
//! - TMX 1.4 parsing and writing with BOM-aware decoding
//! - Single-pass reconciliation of UI element metadata against a document,
//!   including literal-newline normalization
//! - Document merging with configurable conflict handling
//! - Placeholder consistency checks across languages

pub mod document;
pub mod error;
pub mod formats;
pub mod operations;
pub mod placeholder;
pub mod traits;
pub mod types;
pub mod updater;

// Re-export most used types for easy consumption
pub use crate::{
    document::TmxDocument,
    error::Error,
    types::{
        ConflictStrategy, Header, LocalizationPriority, LocalizingInfo, TransUnit, UpdateFields,
        Variant,
    },
    updater::TransUnitUpdater,
};
