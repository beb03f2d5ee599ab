//! Page dumps: collaborator output recorded as JSON.
//!
//! A dump captures everything the extraction and layout collaborators report
//! for a document, so the pipeline can run without either of them:
//!
//! ```json
//! {
//!   "metadata": { "title": "...", "author": "...", "creation_date": "D:2024..." },
//!   "toc": [ { "level": 1, "title": "Intro", "page": 1 } ],
//!   "pages": [
//!     { "number": 1, "width": 612, "height": 792, "text": "...",
//!       "blocks": [ { "bbox": [..], "lines": [ { "bbox": [..], "spans": [..] } ] } ],
//!       "images": [ { "index": 0, "bbox": [..] } ],
//!       "layout": [ { "type": "title", "bbox": [..], "text": "..." } ] }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::PageSource;
use crate::error::{Error, Result};
use crate::model::{parse_pdf_date, ImageRef, LayoutRegion, Metadata, RawBlock, TocEntry};

/// Metadata section of a dump, with dates kept in their raw PDF form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub mod_date: Option<String>,
}

/// One recorded page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpPage {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in page units
    pub width: f32,
    /// Page height in page units
    pub height: f32,
    /// Raw page text; derived from the blocks when absent
    pub text: Option<String>,
    /// Text blocks
    pub blocks: Vec<RawBlock>,
    /// Placed images
    pub images: Vec<ImageRef>,
    /// Recorded layout regions in page coordinates; `None` when the page was
    /// never analyzed
    pub layout: Option<Vec<LayoutRegion>>,
}

/// A whole recorded document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageDump {
    pub metadata: DumpMetadata,
    pub toc: Vec<TocEntry>,
    pub pages: Vec<DumpPage>,
}

impl PageDump {
    /// Sort pages by number and check they run `1..=n` without gaps.
    fn normalize(mut self) -> Result<Self> {
        self.pages.sort_by_key(|p| p.number);
        for (idx, page) in self.pages.iter().enumerate() {
            let expected = idx as u32 + 1;
            if page.number != expected {
                return Err(Error::InvalidDump(format!(
                    "expected page {}, found page {}",
                    expected, page.number
                )));
            }
        }
        Ok(self)
    }
}

/// A [`PageSource`] backed by a [`PageDump`].
#[derive(Debug, Clone)]
pub struct DumpSource {
    id: String,
    dump: PageDump,
}

impl DumpSource {
    /// Load a dump file; the document id is the file stem.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let data = fs::read_to_string(path)?;
        Self::from_json(id, &data)
    }

    /// Parse a dump from a JSON string.
    pub fn from_json(id: impl Into<String>, json: &str) -> Result<Self> {
        let dump: PageDump = serde_json::from_str(json)?;
        Self::from_dump(id, dump)
    }

    /// Wrap an in-memory dump.
    pub fn from_dump(id: impl Into<String>, dump: PageDump) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            dump: dump.normalize()?,
        })
    }

    /// Borrow the underlying dump.
    pub fn dump(&self) -> &PageDump {
        &self.dump
    }

    fn page(&self, page: u32) -> Result<&DumpPage> {
        let count = self.dump.pages.len() as u32;
        if page == 0 || page > count {
            return Err(Error::PageOutOfRange(page, count));
        }
        Ok(&self.dump.pages[(page - 1) as usize])
    }
}

impl PageSource for DumpSource {
    fn document_id(&self) -> String {
        self.id.clone()
    }

    fn page_count(&self) -> Result<u32> {
        Ok(self.dump.pages.len() as u32)
    }

    fn metadata(&self) -> Result<Metadata> {
        let m = &self.dump.metadata;
        Ok(Metadata {
            title: m.title.clone(),
            author: m.author.clone(),
            subject: m.subject.clone(),
            keywords: m.keywords.clone(),
            creator: m.creator.clone(),
            producer: m.producer.clone(),
            created: m.creation_date.as_deref().and_then(parse_pdf_date),
            modified: m.mod_date.as_deref().and_then(parse_pdf_date),
            page_count: self.dump.pages.len() as u32,
        })
    }

    fn table_of_contents(&self) -> Result<Vec<TocEntry>> {
        Ok(self.dump.toc.clone())
    }

    fn page_size(&self, page: u32) -> Result<(f32, f32)> {
        let p = self.page(page)?;
        Ok((p.width, p.height))
    }

    fn page_blocks(&self, page: u32) -> Result<Vec<RawBlock>> {
        Ok(self.page(page)?.blocks.clone())
    }

    fn page_text(&self, page: u32) -> Result<String> {
        let p = self.page(page)?;
        match &p.text {
            Some(text) => Ok(text.clone()),
            None => Ok(p
                .blocks
                .iter()
                .flat_map(|b| b.lines.iter())
                .map(|l| l.text())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn page_images(&self, page: u32) -> Result<Vec<ImageRef>> {
        Ok(self.page(page)?.images.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "metadata": { "title": "Field Guide", "creation_date": "D:20230401120000Z" },
        "toc": [ { "level": 1, "title": "Birds", "page": 2 } ],
        "pages": [
            { "number": 2, "width": 612, "height": 792,
              "blocks": [ { "bbox": [72, 72, 300, 90], "lines": [
                  { "bbox": [72, 72, 300, 90], "spans": [
                      { "text": "Birds", "bbox": [72, 72, 300, 90], "size": 18, "font": "Arial-Bold" } ] } ] } ] },
            { "number": 1, "width": 612, "height": 792, "text": "Field Guide\nEdition 2",
              "images": [ { "index": 0, "bbox": [0, 0, 10, 10] } ] }
        ]
    }"#;

    #[test]
    fn test_pages_are_sorted() {
        let source = DumpSource::from_json("guide", SAMPLE).unwrap();
        assert_eq!(source.page_count().unwrap(), 2);
        assert_eq!(source.page_text(1).unwrap(), "Field Guide\nEdition 2");
        assert_eq!(source.page_text(2).unwrap(), "Birds");
        assert_eq!(source.page_images(1).unwrap().len(), 1);
    }

    #[test]
    fn test_metadata_dates_parsed() {
        let source = DumpSource::from_json("guide", SAMPLE).unwrap();
        let metadata = source.metadata().unwrap();
        assert_eq!(metadata.title.as_deref(), Some("Field Guide"));
        assert!(metadata.created.is_some());
        assert!(metadata.modified.is_none());
        assert_eq!(metadata.page_count, 2);
    }

    #[test]
    fn test_page_out_of_range() {
        let source = DumpSource::from_json("guide", SAMPLE).unwrap();
        assert!(matches!(
            source.page_blocks(3),
            Err(Error::PageOutOfRange(3, 2))
        ));
        assert!(source.page_size(0).is_err());
    }

    #[test]
    fn test_gap_in_page_numbers_rejected() {
        let json = r#"{ "pages": [ { "number": 1 }, { "number": 3 } ] }"#;
        assert!(matches!(
            DumpSource::from_json("gap", json),
            Err(Error::InvalidDump(_))
        ));
    }

    #[test]
    fn test_empty_dump_is_valid() {
        let source = DumpSource::from_json("empty", "{}").unwrap();
        assert_eq!(source.page_count().unwrap(), 0);
        assert!(source.table_of_contents().unwrap().is_empty());
    }

    #[test]
    fn test_open_uses_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report-2024.json");
        fs::write(&path, SAMPLE).unwrap();
        let source = DumpSource::open(&path).unwrap();
        assert_eq!(source.document_id(), "report-2024");
    }
}
