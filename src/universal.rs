//! Universal content record: per-page text, blocks and images plus coarse
//! structure flags, without heading inference.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::backend::PageSource;
use crate::detect::LanguageDetector;
use crate::error::Result;
use crate::model::{ContentBlock, PageContent, UniversalResult, UNKNOWN_TITLE};

static TABLE_CELL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\|\s*[^|]+\s*\|").unwrap());

/// Build the universal record of a document. Never fails.
///
/// Unreadable pages are left out of `content`; a document that cannot be
/// opened at all yields [`UniversalResult::minimal`].
pub fn analyze(source: &dyn PageSource) -> UniversalResult {
    analyze_with(source, &LanguageDetector::new())
}

/// [`analyze`] with a caller-supplied language detector.
pub fn analyze_with(source: &dyn PageSource, detector: &LanguageDetector) -> UniversalResult {
    match try_analyze(source, detector) {
        Ok(result) => result,
        Err(e) => {
            log::warn!(
                "Failed to extract content from {}: {}",
                source.document_id(),
                e
            );
            UniversalResult::minimal(UNKNOWN_TITLE)
        }
    }
}

fn try_analyze(source: &dyn PageSource, detector: &LanguageDetector) -> Result<UniversalResult> {
    let page_count = source.page_count()?;
    let mut metadata = source.metadata()?;
    metadata.page_count = page_count;

    let mut result = UniversalResult::minimal(
        metadata
            .usable_title()
            .unwrap_or_else(|| source.document_id()),
    );
    result.structure.pages = page_count;

    let mut all_text = String::new();
    for page in 1..=page_count {
        match page_content(source, page) {
            Ok(content) => {
                if !content.raw_text.is_empty() {
                    result.structure.has_text = true;
                    all_text.push_str(&content.raw_text);
                    all_text.push('\n');
                }
                if !content.images.is_empty() {
                    result.structure.has_images = true;
                }
                if has_table_cells(&content.raw_text) {
                    result.structure.has_tables = true;
                }
                result.content.push(content);
            }
            Err(e) => log::warn!("Skipping page {}: {}", page, e),
        }
    }

    if !all_text.trim().is_empty() {
        result.language = detector.detect(&all_text);
    }
    result.metadata = metadata;

    log::info!(
        "{}: {} pages, language {}, text={} images={} tables={}",
        result.title,
        page_count,
        result.language,
        result.structure.has_text,
        result.structure.has_images,
        result.structure.has_tables
    );
    Ok(result)
}

fn page_content(source: &dyn PageSource, page: u32) -> Result<PageContent> {
    let raw_text = source.page_text(page)?.trim().to_string();
    let blocks = source
        .page_blocks(page)?
        .into_iter()
        .filter_map(|block| {
            let text = block.text();
            if text.is_empty() {
                None
            } else {
                Some(ContentBlock {
                    text,
                    bbox: block.bbox,
                })
            }
        })
        .collect();
    let images = source.page_images(page)?;

    Ok(PageContent {
        page_number: page,
        raw_text,
        blocks,
        images,
        tables: Vec::new(),
    })
}

/// Whether the text contains a pipe-delimited cell.
pub fn has_table_cells(text: &str) -> bool {
    TABLE_CELL.is_match(text)
}
