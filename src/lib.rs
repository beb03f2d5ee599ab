//! # docoutline
//!
//! Multilingual heading and outline inference for paginated documents.
//!
//! The pipeline takes what a page-extraction backend and a layout-analysis
//! engine report about a document (styled text spans, page geometry, typed
//! layout regions) and infers a three-level outline plus a title.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docoutline::{outline_from_dump_file, render};
//!
//! fn main() -> docoutline::Result<()> {
//!     // Run the pipeline over a recorded page dump
//!     let result = outline_from_dump_file("report.json")?;
//!
//!     // Serialize the outline record
//!     let json = render::to_json(&result, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Tiered escalation**: embedded TOC, layout classification, forced full
//!   scan and sparse rescan, each tried only when the previous one falls short
//! - **Multilingual**: script table plus `whatlang` for language detection,
//!   per-language heading lexicons
//! - **Never fails**: every document yields a valid record, degrading to a
//!   placeholder outline when it cannot be read
//! - **Batch processing**: directories of dumps, fanned out with Rayon

pub mod analysis;
pub mod backend;
pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod outline;
pub mod render;
pub mod universal;

// Re-export commonly used types
pub use backend::{DumpSource, LayoutEngine, NoLayoutEngine, PageSource, RecordedLayoutEngine};
pub use batch::{run_batch, BatchOptions, BatchReport};
pub use detect::{detect_language, LanguageDetector};
pub use error::{Error, Result};
pub use model::{
    DocumentResult, Heading, HeadingLevel, Metadata, Outline, TocEntry, UniversalResult,
};
pub use outline::{BuildReport, OutlineBuilder, OutlineOptions, OutlineProcessor, Tier};
pub use render::JsonFormat;

use std::path::Path;
use std::sync::Arc;

/// Infer the outline of a recorded page dump.
///
/// Recorded layout regions in the dump are replayed; pages without them use
/// the raw-line path.
///
/// # Example
///
/// ```no_run
/// use docoutline::outline_from_dump_file;
///
/// let result = outline_from_dump_file("report.json").unwrap();
/// for heading in &result.outline {
///     println!("{} {} (p. {})", heading.level, heading.text, heading.page);
/// }
/// ```
pub fn outline_from_dump_file<P: AsRef<Path>>(path: P) -> Result<DocumentResult> {
    outline_from_dump_file_with_options(path, OutlineOptions::default())
}

/// Infer the outline of a recorded page dump with custom options.
///
/// # Example
///
/// ```no_run
/// use docoutline::{outline_from_dump_file_with_options, OutlineOptions};
///
/// let options = OutlineOptions::new().with_language("ja").without_toc();
/// let result = outline_from_dump_file_with_options("report.json", options).unwrap();
/// ```
pub fn outline_from_dump_file_with_options<P: AsRef<Path>>(
    path: P,
    options: OutlineOptions,
) -> Result<DocumentResult> {
    Ok(outline_with_report(path, options)?.0)
}

/// Infer the outline of a recorded page dump along with build diagnostics.
pub fn outline_with_report<P: AsRef<Path>>(
    path: P,
    options: OutlineOptions,
) -> Result<(DocumentResult, BuildReport)> {
    let source = DumpSource::open(path)?;
    let engine = Arc::new(RecordedLayoutEngine::new().with_source(&source));
    Ok(OutlineBuilder::new(engine)
        .with_options(options)
        .build_with_report(&source))
}

/// Build the universal content record of a recorded page dump.
///
/// # Example
///
/// ```no_run
/// use docoutline::universal_from_dump_file;
///
/// let record = universal_from_dump_file("report.json").unwrap();
/// println!("{} pages, language {}", record.structure.pages, record.language);
/// ```
pub fn universal_from_dump_file<P: AsRef<Path>>(path: P) -> Result<UniversalResult> {
    let source = DumpSource::open(path)?;
    Ok(universal::analyze(&source))
}
