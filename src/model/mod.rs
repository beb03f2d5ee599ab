//! Document model types shared by the collaborators and the outline pipeline.
//!
//! Raw extraction output (`RawBlock` → `RawLine` → `TextSpan`) and layout
//! regions come in; `TextBlock`s are what the analysis stages score; `Heading`s
//! and the final `DocumentResult` / `UniversalResult` records go out.

mod block;
mod document;
mod heading;

pub use block::{
    is_bold_font, BBox, ImageRef, LayoutRegion, RawBlock, RawLine, RegionKind, TextBlock, TextSpan,
};
pub use document::{
    parse_pdf_date, ContentBlock, DocumentResult, Metadata, PageContent, Structure, TocEntry,
    UniversalResult, UNKNOWN_TITLE,
};
pub use heading::{Heading, HeadingLevel, Outline};
