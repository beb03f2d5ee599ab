//! Outline inference with tiered escalation.
//!
//! [`OutlineBuilder`] tries, in order of decreasing trust:
//!
//! 1. the document's embedded table of contents,
//! 2. the primary per-page pipeline (layout regions classified by features,
//!    with a raw-line fallback per page),
//! 3. a forced full scan of every page's raw lines when the primary tier
//!    found fewer headings than pages,
//! 4. a sparse rescan when the outline is still nearly empty.
//!
//! A later tier replaces the working outline only when it finds strictly
//! more headings. Whatever tier wins goes through [`OutlineProcessor`].

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::analysis::{
    full_scan_headings, sample_region_font, raw_line_headings, sparse_scan_headings,
    FeatureExtractor, FontStatistics, HeadingClassifier, HeadingPatternMatcher, TitleContext,
    TitleExtractor,
};
use crate::backend::{LayoutEngine, PageSource};
use crate::detect::{LanguageDetector, DEFAULT_LANGUAGE};
use crate::error::{Error, Result};
use crate::model::{
    DocumentResult, Heading, HeadingLevel, Metadata, RawBlock, RegionKind, TextBlock,
};

use super::{OutlineOptions, OutlineProcessor};

/// Escalation tier whose headings ended up in the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Embedded table of contents
    EmbeddedToc,
    /// Layout classification with raw-line fallback
    #[default]
    Primary,
    /// Forced full scan of raw lines
    FullScan,
    /// Rescan for nearly empty outlines
    SparseScan,
    /// The document could not be read
    Placeholder,
}

impl Tier {
    /// Short label for diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::EmbeddedToc => "embedded-toc",
            Tier::Primary => "primary",
            Tier::FullScan => "full-scan",
            Tier::SparseScan => "sparse-scan",
            Tier::Placeholder => "placeholder",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostics collected while building one outline.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildReport {
    /// Tier that produced the outline
    pub tier: Tier,
    /// Language used for pattern matching
    pub language: String,
    /// Page count reported by the source
    pub pages: u32,
    /// Pages the primary tier processed
    pub pages_processed: u32,
    /// Pages the primary tier had to skip
    pub pages_failed: u32,
    /// Pages whose headings came from layout regions
    pub layout_pages: u32,
    /// Headings found by the primary tier, after finalization
    pub primary_count: usize,
    /// Headings found by the forced full scan, if it ran
    pub full_scan_count: Option<usize>,
    /// Headings found by the sparse rescan, if it ran
    pub sparse_count: Option<usize>,
}

/// One page as the extraction backend reports it.
struct RawPage {
    blocks: Vec<RawBlock>,
    text: String,
    size: (f32, f32),
}

impl RawPage {
    fn line_blocks(&self, page: u32) -> Vec<TextBlock> {
        self.blocks
            .iter()
            .flat_map(|b| b.lines.iter())
            .map(|line| TextBlock::from_line(line, page))
            .filter(|b| !b.text.is_empty())
            .collect()
    }
}

/// State threaded through the primary tier's page loop.
struct DocumentState<'a> {
    metadata: &'a Metadata,
    file_stem: &'a str,
    language: Option<String>,
    title: Option<String>,
}

/// Builds a document outline from a [`PageSource`] and a shared
/// [`LayoutEngine`].
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use docoutline::backend::{DumpSource, RecordedLayoutEngine};
/// use docoutline::outline::OutlineBuilder;
///
/// let source = DumpSource::open("report.json")?;
/// let engine = Arc::new(RecordedLayoutEngine::new().with_source(&source));
/// let result = OutlineBuilder::new(engine).build(&source);
/// println!("{}: {} headings", result.title, result.outline.len());
/// # Ok::<(), docoutline::Error>(())
/// ```
pub struct OutlineBuilder {
    engine: Arc<dyn LayoutEngine>,
    options: OutlineOptions,
    detector: LanguageDetector,
    matcher: HeadingPatternMatcher,
    extractor: FeatureExtractor,
    classifier: HeadingClassifier,
    titles: TitleExtractor,
    processor: OutlineProcessor,
}

impl OutlineBuilder {
    /// Create a builder around a layout engine.
    pub fn new(engine: Arc<dyn LayoutEngine>) -> Self {
        Self {
            engine,
            options: OutlineOptions::default(),
            detector: LanguageDetector::new(),
            matcher: HeadingPatternMatcher::new(),
            extractor: FeatureExtractor::new(),
            classifier: HeadingClassifier::new(),
            titles: TitleExtractor::new(),
            processor: OutlineProcessor::new(),
        }
    }

    /// Set options.
    pub fn with_options(mut self, options: OutlineOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the language detector.
    pub fn with_detector(mut self, detector: LanguageDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Current options.
    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// Build the outline record. Never fails.
    pub fn build(&self, source: &dyn PageSource) -> DocumentResult {
        self.build_with_report(source).0
    }

    /// Build the outline record along with diagnostics.
    pub fn build_with_report(&self, source: &dyn PageSource) -> (DocumentResult, BuildReport) {
        let document_id = source.document_id();
        let mut report = BuildReport::default();
        let mut best_title = document_id.clone();

        match self.run(source, &document_id, &mut best_title, &mut report) {
            Ok(result) => {
                log::info!(
                    "{}: {} headings from {} tier",
                    document_id,
                    result.outline.len(),
                    report.tier
                );
                (result, report)
            }
            Err(e) => {
                log::warn!("Failed to process document {}: {}", document_id, e);
                report.tier = Tier::Placeholder;
                if report.language.is_empty() {
                    report.language = DEFAULT_LANGUAGE.to_string();
                }
                (DocumentResult::placeholder(best_title), report)
            }
        }
    }

    fn run(
        &self,
        source: &dyn PageSource,
        document_id: &str,
        best_title: &mut String,
        report: &mut BuildReport,
    ) -> Result<DocumentResult> {
        let page_count = source.page_count()?;
        report.pages = page_count;
        let metadata = source.metadata()?;
        if let Some(title) = metadata.usable_title() {
            *best_title = title;
        }

        let mut state = DocumentState {
            metadata: &metadata,
            file_stem: document_id,
            language: self.initial_language(source, page_count),
            title: None,
        };

        if self.options.use_embedded_toc {
            if let Some(toc) = self.embedded_outline(source) {
                let title = self.toc_title(source, page_count, &state);
                report.tier = Tier::EmbeddedToc;
                report.language = state.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
                return Ok(DocumentResult::new(title, self.processor.finalize(toc)));
            }
        }

        let mut raw = Vec::new();
        for page in 1..=page_count {
            match self.primary_page(source, page, &mut state, report) {
                Ok(headings) => {
                    report.pages_processed += 1;
                    raw.extend(headings);
                }
                Err(e) => {
                    report.pages_failed += 1;
                    log::warn!("Skipping page {} of {}: {}", page, document_id, e);
                }
            }
        }

        let mut outline = self.processor.finalize(raw);
        report.primary_count = outline.len();
        report.tier = Tier::Primary;

        if self.options.full_scan {
            if outline.len() < page_count as usize || is_sparse(outline.len(), page_count) {
                log::info!(
                    "{}: {} headings for {} pages, forcing a full scan",
                    document_id,
                    outline.len(),
                    page_count
                );
                let forced = self
                    .processor
                    .finalize(self.scan_document(source, page_count, full_scan_headings));
                report.full_scan_count = Some(forced.len());
                if forced.len() > outline.len() {
                    outline = forced;
                    report.tier = Tier::FullScan;
                }
            }

            if outline.is_empty() || is_sparse(outline.len(), page_count) {
                let sparse = self
                    .processor
                    .finalize(self.scan_document(source, page_count, sparse_scan_headings));
                report.sparse_count = Some(sparse.len());
                if sparse.len() > outline.len() {
                    outline = sparse;
                    report.tier = Tier::SparseScan;
                }
            }
        }

        let title = match state.title.take() {
            Some(title) => title,
            None => self.titles.extract(&TitleContext {
                blocks: &[],
                page_width: 0.0,
                metadata: &metadata,
                page_text: "",
                file_stem: document_id,
            }),
        };
        report.language = state
            .language
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        Ok(DocumentResult::new(title, outline))
    }

    /// Configured language, or one detected from page 1's raw text.
    fn initial_language(&self, source: &dyn PageSource, page_count: u32) -> Option<String> {
        if let Some(language) = &self.options.language {
            return Some(language.clone());
        }
        if page_count == 0 {
            return None;
        }
        match source.page_text(1) {
            Ok(text) if !text.trim().is_empty() => Some(self.detector.detect(&text)),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Could not read page 1 text for language detection: {}", e);
                None
            }
        }
    }

    /// Embedded TOC entries down to H3, if there are any.
    fn embedded_outline(&self, source: &dyn PageSource) -> Option<Vec<Heading>> {
        let toc = match source.table_of_contents() {
            Ok(toc) => toc,
            Err(e) => {
                log::warn!("Failed to read embedded table of contents: {}", e);
                return None;
            }
        };
        let headings: Vec<Heading> = toc
            .into_iter()
            .filter_map(|entry| {
                HeadingLevel::from_depth(entry.level)
                    .map(|level| Heading::new(level, entry.title.trim(), entry.page))
            })
            .collect();
        if headings.is_empty() {
            None
        } else {
            log::info!("Using {} embedded table of contents entries", headings.len());
            Some(headings)
        }
    }

    /// Title for the embedded-TOC tier, from page 1's raw lines only.
    fn toc_title(
        &self,
        source: &dyn PageSource,
        page_count: u32,
        state: &DocumentState<'_>,
    ) -> String {
        let page = if page_count > 0 {
            match load_page(source, 1) {
                Ok(page) => Some(page),
                Err(e) => {
                    log::warn!("Could not read page 1 for the title: {}", e);
                    None
                }
            }
        } else {
            None
        };
        let blocks = page.as_ref().map(|p| p.line_blocks(1)).unwrap_or_default();
        self.titles.extract(&TitleContext {
            blocks: &blocks,
            page_width: page.as_ref().map_or(0.0, |p| p.size.0),
            metadata: state.metadata,
            page_text: page.as_ref().map_or("", |p| p.text.as_str()),
            file_stem: state.file_stem,
        })
    }

    /// Headings of one page in the primary tier.
    fn primary_page(
        &self,
        source: &dyn PageSource,
        page: u32,
        state: &mut DocumentState<'_>,
        report: &mut BuildReport,
    ) -> Result<Vec<Heading>> {
        let raw = load_page(source, page)?;
        let layout = self.layout_blocks(source, page, &raw);

        if page == 1 {
            if state.language.is_none() {
                let region_text = layout
                    .as_ref()
                    .map(|blocks| {
                        blocks
                            .iter()
                            .map(|b| b.text.as_str())
                            .collect::<Vec<_>>()
                            .join(" ")
                    })
                    .unwrap_or_default();
                state.language = Some(self.detector.detect(&region_text));
            }

            let line_blocks;
            let title_blocks = match &layout {
                Ok(blocks) if !blocks.is_empty() => blocks.as_slice(),
                _ => {
                    line_blocks = raw.line_blocks(page);
                    line_blocks.as_slice()
                }
            };
            state.title = Some(self.titles.extract(&TitleContext {
                blocks: title_blocks,
                page_width: raw.size.0,
                metadata: state.metadata,
                page_text: &raw.text,
                file_stem: state.file_stem,
            }));
        }

        let language = state.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);
        let fallback = raw_line_headings(&raw.blocks, page, language, &self.matcher);

        match layout {
            Ok(blocks) => {
                let found = self.classify_blocks(blocks, raw.size.1, language);
                if found.is_empty() {
                    Ok(fallback)
                } else {
                    report.layout_pages += 1;
                    Ok(found)
                }
            }
            Err(Error::LayoutUnavailable) => Ok(fallback),
            Err(e) => {
                log::warn!("Layout analysis failed on page {}, using raw lines: {}", page, e);
                Ok(fallback)
            }
        }
    }

    /// Text and title regions of a page, in page coordinates, with fonts
    /// sampled from the raw spans underneath.
    fn layout_blocks(
        &self,
        source: &dyn PageSource,
        page: u32,
        raw: &RawPage,
    ) -> Result<Vec<TextBlock>> {
        let raster = source.render_page(page, self.options.raster_scale)?;
        let regions = self.engine.analyze(&raster)?;

        Ok(regions
            .iter()
            .filter(|r| r.is_textual())
            .map(|region| {
                let bbox = region.bbox.scaled_down(raster.scale);
                let font = sample_region_font(&bbox, raw.blocks.iter().flat_map(|b| b.spans()));
                TextBlock {
                    text: region.text.trim().to_string(),
                    bbox,
                    page,
                    font_size: font.size,
                    is_bold: font.is_bold,
                    font_name: font.font_name,
                    color: font.color,
                    is_title_tagged: region.kind == RegionKind::Title,
                }
            })
            .collect())
    }

    /// Classify a page's blocks top to bottom.
    ///
    /// The previous level carries over between blocks of the same page only.
    fn classify_blocks(
        &self,
        mut blocks: Vec<TextBlock>,
        page_height: f32,
        language: &str,
    ) -> Vec<Heading> {
        let stats = FontStatistics::from_blocks(&blocks);
        if stats.is_empty() {
            return Vec::new();
        }
        let (mean, std) = (stats.mean(), stats.std_dev());

        blocks.sort_by(|a, b| a.bbox.y0.total_cmp(&b.bbox.y0));

        let mut previous = None;
        let mut headings = Vec::new();
        for block in &blocks {
            let text = block.text.trim();
            if text.is_empty() {
                continue;
            }
            let features = self.extractor.extract(block, mean, std, page_height, &blocks);
            let level = self.classifier.classify(&features, previous).or_else(|| {
                self.matcher
                    .is_heading(text, language)
                    .then(|| self.indent_level(block.bbox.x0))
            });
            if let Some(level) = level {
                log::debug!("Page {} {}: {}", block.page, level, text);
                headings.push(Heading::new(level, text, block.page));
                previous = Some(level);
            }
        }
        headings
    }

    /// Level of a pattern-only heading from its left edge.
    fn indent_level(&self, x0: f32) -> HeadingLevel {
        let (h1, h2) = self.options.indent_bands;
        if x0 < h1 {
            HeadingLevel::H1
        } else if x0 < h2 {
            HeadingLevel::H2
        } else {
            HeadingLevel::H3
        }
    }

    /// Run a raw-line scan over every page, skipping unreadable pages.
    fn scan_document(
        &self,
        source: &dyn PageSource,
        page_count: u32,
        scan: fn(&[RawBlock], u32) -> Vec<Heading>,
    ) -> Vec<Heading> {
        let mut found = Vec::new();
        for page in 1..=page_count {
            match source.page_blocks(page) {
                Ok(blocks) => found.extend(scan(&blocks, page)),
                Err(e) => log::warn!("Scan skipped page {}: {}", page, e),
            }
        }
        found
    }
}

impl fmt::Debug for OutlineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutlineBuilder")
            .field("engine", &self.engine.name())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

fn load_page(source: &dyn PageSource, page: u32) -> Result<RawPage> {
    Ok(RawPage {
        blocks: source.page_blocks(page)?,
        text: source.page_text(page)?,
        size: source.page_size(page)?,
    })
}

/// More than three pages but fewer than three headings.
fn is_sparse(headings: usize, pages: u32) -> bool {
    pages > 3 && headings < 3
}
