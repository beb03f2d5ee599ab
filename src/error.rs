//! Error types for docoutline library.

use std::io;
use thiserror::Error;

/// Result type alias for docoutline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while inferring a document outline.
///
/// The outline pipeline itself never surfaces these to its caller; they flow
/// out of the collaborator traits and are absorbed by the degrade paths in
/// [`crate::outline::OutlineBuilder`]. Only I/O-facing entry points (loading
/// a dump, writing records, scanning batch directories) return them.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// The page extraction collaborator failed.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// The layout-analysis collaborator failed on a page.
    #[error("Layout analysis error: {0}")]
    Layout(String),

    /// No layout-analysis engine is available.
    #[error("Layout analysis is unavailable")]
    LayoutUnavailable,

    /// A page dump is structurally invalid.
    #[error("Invalid page dump: {0}")]
    InvalidDump(String),

    /// Error while rendering an output record.
    #[error("Rendering error: {0}")]
    Render(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::LayoutUnavailable;
        assert_eq!(err.to_string(), "Layout analysis is unavailable");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_message_variants_keep_their_prefix() {
        let err = Error::InvalidDump("page 3 listed twice".to_string());
        assert_eq!(err.to_string(), "Invalid page dump: page 3 listed twice");

        let err = Error::Layout("model returned no regions".to_string());
        assert_eq!(
            err.to_string(),
            "Layout analysis error: model returned no regions"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
