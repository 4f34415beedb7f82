//! On-disk formats for TMX documents.
//!
//! TMX 1.4 XML is the canonical representation; the JSON cache lives on
//! [`crate::document::TmxDocument`] directly.

pub mod tmx;
