//! All error types for the tmxkit crate.
//!
//! These are returned from all fallible operations (parsing, serialization,
//! file I/O, validation).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    DataMismatch(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Creates a new invalid-document error
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Error::InvalidDocument(message.into())
    }

    /// Creates a new validation error
    pub fn validation_error(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_parse_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let error = Error::Parse(json_error);
        assert!(error.to_string().contains("parse error"));
    }

    #[test]
    fn test_data_mismatch_error() {
        let error = Error::DataMismatch("tu element missing 'tuid'".to_string());
        assert_eq!(error.to_string(), "invalid data: tu element missing 'tuid'");
    }

    #[test]
    fn test_invalid_document_error() {
        let error = Error::invalid_document("unexpected EOF");
        assert_eq!(error.to_string(), "invalid document: unexpected EOF");
    }

    #[test]
    fn test_validation_error() {
        let error = Error::validation_error("placeholder mismatch");
        assert_eq!(error.to_string(), "validation error: placeholder mismatch");
    }

    #[test]
    fn test_error_debug() {
        let error = Error::DataMismatch("test".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("DataMismatch"));
        assert!(debug.contains("test"));
    }
}
