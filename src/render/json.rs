//! JSON rendering for output records.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a record to JSON. Non-ASCII text is written as-is.
pub fn to_json<T: Serialize + ?Sized>(record: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(record),
        JsonFormat::Compact => serde_json::to_string(record),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Write a record to `path` as JSON, followed by a newline.
pub fn write_json<T: Serialize + ?Sized>(
    record: &T,
    path: impl AsRef<Path>,
    format: JsonFormat,
) -> Result<()> {
    let mut json = to_json(record, format)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentResult, Heading, HeadingLevel, Outline};

    fn record() -> DocumentResult {
        let outline = Outline::from(vec![
            Heading::new(HeadingLevel::H1, "概要", 1),
            Heading::new(HeadingLevel::H2, "Scope", 2),
        ]);
        DocumentResult::new("Test", outline)
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&record(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\": \"Test\""));
        assert!(json.contains("\"level\": \"H1\""));
        assert!(json.contains("概要"));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&record(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n')); // Compact has no newlines
        assert_eq!(
            json,
            r#"{"title":"Test","outline":[{"level":"H1","text":"概要","page":1},{"level":"H2","text":"Scope","page":2}]}"#
        );
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&record(), &path, JsonFormat::Compact).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("}\n"));
        let back: DocumentResult = serde_json::from_str(&written).unwrap();
        assert_eq!(back, record());
    }
}
