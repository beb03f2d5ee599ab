//! Document-level types: metadata, embedded TOC entries and result records.

use super::{BBox, Heading, HeadingLevel, ImageRef, Outline};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when nothing better is known.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Document metadata as exposed by the extraction backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Keywords
    pub keywords: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// Producer application
    pub producer: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,

    /// Total number of pages
    #[serde(rename = "pages")]
    pub page_count: u32,
}

impl Metadata {
    /// Metadata title trimmed, if it is longer than three characters.
    pub fn usable_title(&self) -> Option<String> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| t.chars().count() > 3)
            .map(str::to_string)
    }
}

/// Parse a PDF date string (`D:YYYYMMDDHHmmSS...`).
///
/// Missing trailing fields default to the start of their range; the timezone
/// suffix is ignored.
pub fn parse_pdf_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    let s = s.strip_prefix("D:").unwrap_or(s);

    if s.len() < 4 {
        return None;
    }

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month: u32 = s.get(4..6).and_then(|m| m.parse().ok()).unwrap_or(1);
    let day: u32 = s.get(6..8).and_then(|d| d.parse().ok()).unwrap_or(1);
    let hour: u32 = s.get(8..10).and_then(|h| h.parse().ok()).unwrap_or(0);
    let minute: u32 = s.get(10..12).and_then(|m| m.parse().ok()).unwrap_or(0);
    let second: u32 = s.get(12..14).and_then(|s| s.parse().ok()).unwrap_or(0);

    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
}

/// One entry of a document's embedded table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Nesting depth (1 = top level)
    pub level: u32,
    /// Entry title
    pub title: String,
    /// Target page (1-indexed)
    pub page: u32,
}

impl TocEntry {
    /// Create a new TOC entry.
    pub fn new(level: u32, title: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            title: title.into(),
            page,
        }
    }
}

/// The outline record produced for every input document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Document title (never empty)
    pub title: String,
    /// Inferred outline
    pub outline: Outline,
}

impl DocumentResult {
    /// Create a new result.
    pub fn new(title: impl Into<String>, outline: Outline) -> Self {
        let title = title.into();
        let title = if title.trim().is_empty() {
            UNKNOWN_TITLE.to_string()
        } else {
            title
        };
        Self { title, outline }
    }

    /// Record emitted when a document could not be read at all: a single H1
    /// heading repeating the best-known title.
    pub fn placeholder(title: impl Into<String>) -> Self {
        let mut result = Self::new(title, Outline::new());
        let heading = Heading::new(HeadingLevel::H1, result.title.clone(), 1);
        result.outline.push(heading);
        result
    }
}

/// Text block as reported in the universal record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Block text
    pub text: String,
    /// Block bounds
    pub bbox: BBox,
}

/// Per-page content in the universal record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Raw page text, trimmed
    pub raw_text: String,
    /// Text blocks
    pub blocks: Vec<ContentBlock>,
    /// Images placed on the page
    pub images: Vec<ImageRef>,
    /// Detected tables
    pub tables: Vec<ContentBlock>,
}

/// Coarse document structure flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    /// Number of pages
    pub pages: u32,
    /// Whether any page carries extractable text
    pub has_text: bool,
    /// Whether any page carries images
    pub has_images: bool,
    /// Whether any page looks like it contains a table
    pub has_tables: bool,
}

/// The richer per-document record of the universal variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniversalResult {
    /// Document title
    pub title: String,
    /// Detected language code
    pub language: String,
    /// Per-page content
    pub content: Vec<PageContent>,
    /// Document metadata
    pub metadata: Metadata,
    /// Structure flags
    pub structure: Structure,
}

impl UniversalResult {
    /// Minimal record: no content, default language.
    pub fn minimal(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            title: if title.trim().is_empty() {
                UNKNOWN_TITLE.to_string()
            } else {
                title
            },
            language: crate::detect::DEFAULT_LANGUAGE.to_string(),
            content: Vec::new(),
            metadata: Metadata::default(),
            structure: Structure::default(),
        }
    }
}
