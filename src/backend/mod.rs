//! Collaborator abstraction layer.
//!
//! The outline pipeline never touches a document container or a neural model
//! directly. It talks to two narrow traits:
//!
//! - [`PageSource`] for page/text extraction: spans with bounding boxes and font
//!   attributes, page dimensions, metadata, the embedded table of contents and
//!   page raster export.
//! - [`LayoutEngine`] for layout analysis: typed regions for a page raster.
//!
//! Concrete implementations shipped here replay recorded collaborator output
//! ([`DumpSource`], [`RecordedLayoutEngine`]); real extraction backends plug
//! in by implementing the traits.

mod dump;
mod layout;

pub use dump::{DumpMetadata, DumpPage, DumpSource, PageDump};
pub use layout::{NoLayoutEngine, RecordedLayoutEngine};

use crate::error::Result;
use crate::model::{ImageRef, LayoutRegion, Metadata, RawBlock, TocEntry};

/// A rasterized page handed to the layout engine.
#[derive(Debug, Clone)]
pub struct PageRaster {
    /// Identifier of the source document
    pub document_id: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Raster width in pixels
    pub width: u32,
    /// Raster height in pixels
    pub height: u32,
    /// Pixels per page unit
    pub scale: f32,
    /// RGB8 pixel data; empty when the backend exports dimensions only
    pub pixels: Vec<u8>,
}

impl PageRaster {
    /// Describe a raster of a page without pixel data.
    pub fn blank(document_id: impl Into<String>, page: u32, size: (f32, f32), scale: f32) -> Self {
        let (width, height) = size;
        Self {
            document_id: document_id.into(),
            page,
            width: (width.max(0.0) * scale).round() as u32,
            height: (height.max(0.0) * scale).round() as u32,
            scale,
            pixels: Vec::new(),
        }
    }

    /// Whether pixel data is present.
    pub fn has_pixels(&self) -> bool {
        !self.pixels.is_empty()
    }
}

/// Abstract interface to the page/text extraction collaborator.
///
/// Pages are 1-indexed. All methods are synchronous; a slow backend stalls the
/// document being processed.
pub trait PageSource {
    /// Stable identifier of the document (typically the file stem).
    fn document_id(&self) -> String;

    /// Number of pages.
    fn page_count(&self) -> Result<u32>;

    /// Document-level metadata.
    fn metadata(&self) -> Result<Metadata>;

    /// Embedded table of contents, empty when the document has none.
    fn table_of_contents(&self) -> Result<Vec<TocEntry>> {
        Ok(Vec::new())
    }

    /// Page dimensions `(width, height)` in page units.
    fn page_size(&self, page: u32) -> Result<(f32, f32)>;

    /// Text blocks of a page, each holding lines of styled spans.
    fn page_blocks(&self, page: u32) -> Result<Vec<RawBlock>>;

    /// Raw text of a page, one line per text line.
    fn page_text(&self, page: u32) -> Result<String> {
        let blocks = self.page_blocks(page)?;
        Ok(blocks
            .iter()
            .flat_map(|b| b.lines.iter())
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Images placed on a page.
    fn page_images(&self, _page: u32) -> Result<Vec<ImageRef>> {
        Ok(Vec::new())
    }

    /// Export a page raster at the given zoom factor.
    fn render_page(&self, page: u32, scale: f32) -> Result<PageRaster> {
        let size = self.page_size(page)?;
        Ok(PageRaster::blank(self.document_id(), page, size, scale))
    }
}

/// Abstract interface to the layout-analysis collaborator.
///
/// An engine is constructed once by the caller, shared read-only across pages
/// and documents, and dropped by the caller when the run ends.
pub trait LayoutEngine: Send + Sync {
    /// Short engine name for diagnostics.
    fn name(&self) -> &str;

    /// Segment a page raster into typed regions, in raster pixel coordinates.
    fn analyze(&self, raster: &PageRaster) -> Result<Vec<LayoutRegion>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, RawLine, TextSpan};

    struct TwoLinePage;

    impl PageSource for TwoLinePage {
        fn document_id(&self) -> String {
            "two-lines".to_string()
        }

        fn page_count(&self) -> Result<u32> {
            Ok(1)
        }

        fn metadata(&self) -> Result<Metadata> {
            Ok(Metadata::default())
        }

        fn page_size(&self, _page: u32) -> Result<(f32, f32)> {
            Ok((612.0, 792.0))
        }

        fn page_blocks(&self, _page: u32) -> Result<Vec<RawBlock>> {
            let line = |text: &str, y: f32| {
                RawLine::from_spans(vec![TextSpan::new(
                    text,
                    BBox::new(72.0, y, 300.0, y + 12.0),
                    12.0,
                    "Times-Roman",
                )])
            };
            Ok(vec![RawBlock::from_lines(vec![
                line("First line", 100.0),
                line("Second line", 114.0),
            ])])
        }
    }

    #[test]
    fn test_default_page_text_joins_lines() {
        let text = TwoLinePage.page_text(1).unwrap();
        assert_eq!(text, "First line\nSecond line");
    }

    #[test]
    fn test_default_render_is_blank_raster() {
        let raster = TwoLinePage.render_page(1, 2.0).unwrap();
        assert_eq!(raster.width, 1224);
        assert_eq!(raster.height, 1584);
        assert_eq!(raster.document_id, "two-lines");
        assert!(!raster.has_pixels());
    }

    #[test]
    fn test_defaults_are_empty() {
        assert!(TwoLinePage.table_of_contents().unwrap().is_empty());
        assert!(TwoLinePage.page_images(1).unwrap().is_empty());
    }
}
