//! Document title selection.

use crate::model::{Metadata, TextBlock, UNKNOWN_TITLE};

/// Plausible title lengths in characters, exclusive on both ends.
const MIN_TITLE_LEN: usize = 3;
const MAX_TITLE_LEN: usize = 100;

/// Fraction of the page width within which a block counts as centered.
const CENTER_TOLERANCE: f32 = 0.1;

/// What the title extractor gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct TitleContext<'a> {
    /// Page-1 text blocks, in any order
    pub blocks: &'a [TextBlock],
    /// Page-1 width; centering is skipped when not positive
    pub page_width: f32,
    /// Document metadata
    pub metadata: &'a Metadata,
    /// Raw page-1 text
    pub page_text: &'a str,
    /// Input file stem
    pub file_stem: &'a str,
}

/// Picks the single best title candidate.
///
/// Sources in order: metadata title, a block tagged as title by the layout
/// engine, the best-ranked plausible page-1 block, the first plausible raw
/// line, the file stem, and finally [`UNKNOWN_TITLE`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TitleExtractor;

impl TitleExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// Select the title. Never empty.
    pub fn extract(&self, ctx: &TitleContext<'_>) -> String {
        if let Some(title) = ctx.metadata.usable_title() {
            return title;
        }

        if let Some(tagged) = ctx
            .blocks
            .iter()
            .filter(|b| b.is_title_tagged)
            .map(|b| b.text.trim())
            .find(|t| !t.is_empty())
        {
            return tagged.to_string();
        }

        if let Some(ranked) = best_block(ctx.blocks, ctx.page_width) {
            return ranked;
        }

        if let Some(line) = ctx
            .page_text
            .lines()
            .map(str::trim)
            .find(|l| is_plausible(l))
        {
            return line.to_string();
        }

        let stem = ctx.file_stem.trim();
        if !stem.is_empty() {
            return stem.to_string();
        }

        log::warn!("No title candidate found");
        UNKNOWN_TITLE.to_string()
    }
}

fn is_plausible(text: &str) -> bool {
    let len = text.chars().count();
    len > MIN_TITLE_LEN && len < MAX_TITLE_LEN
}

fn is_centered(block: &TextBlock, page_width: f32) -> bool {
    page_width > 0.0
        && (block.bbox.center_x() - page_width / 2.0).abs() < page_width * CENTER_TOLERANCE
}

/// Rank untagged blocks by centered, then larger font, then higher on the page.
fn best_block(blocks: &[TextBlock], page_width: f32) -> Option<String> {
    let mut ranked: Vec<(bool, &TextBlock)> = blocks
        .iter()
        .filter(|b| !b.is_title_tagged && !b.text.trim().is_empty())
        .map(|b| (is_centered(b, page_width), b))
        .collect();

    ranked.sort_by(|(ca, a), (cb, b)| {
        cb.cmp(ca)
            .then_with(|| b.font_size.total_cmp(&a.font_size))
            .then_with(|| a.bbox.y0.total_cmp(&b.bbox.y0))
    });

    ranked
        .into_iter()
        .map(|(_, b)| b.text.trim())
        .find(|t| is_plausible(t))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn block(text: &str, x0: f32, y0: f32, x1: f32, size: f32) -> TextBlock {
        TextBlock::new(text, BBox::new(x0, y0, x1, y0 + size), 1).with_font(size, "Arial")
    }

    fn extract(
        blocks: &[TextBlock],
        metadata: &Metadata,
        page_text: &str,
        file_stem: &str,
    ) -> String {
        TitleExtractor.extract(&TitleContext {
            blocks,
            page_width: 600.0,
            metadata,
            page_text,
            file_stem,
        })
    }

    #[test]
    fn test_metadata_title_wins() {
        let metadata = Metadata {
            title: Some("  Annual Report  ".to_string()),
            ..Default::default()
        };
        let blocks = vec![
            block("Something Else Entirely", 200.0, 50.0, 400.0, 30.0).title_tagged(true),
        ];
        assert_eq!(extract(&blocks, &metadata, "", "file"), "Annual Report");
    }

    #[test]
    fn test_title_tagged_block() {
        let blocks = vec![
            block("Big Body Heading", 200.0, 50.0, 400.0, 30.0),
            block("  Layout Title ", 10.0, 500.0, 100.0, 8.0).title_tagged(true),
        ];
        assert_eq!(
            extract(&blocks, &Metadata::default(), "", "file"),
            "Layout Title"
        );
    }

    #[test]
    fn test_centered_beats_larger() {
        let blocks = vec![
            block("Left Aligned Giant", 10.0, 40.0, 200.0, 40.0),
            block("Centered Title", 200.0, 80.0, 400.0, 20.0),
        ];
        assert_eq!(
            extract(&blocks, &Metadata::default(), "", "file"),
            "Centered Title"
        );
    }

    #[test]
    fn test_font_then_position() {
        let blocks = vec![
            block("Lower Heading", 10.0, 300.0, 200.0, 20.0),
            block("Upper Heading", 10.0, 100.0, 200.0, 20.0),
            block("Smaller Text", 10.0, 10.0, 200.0, 10.0),
        ];
        assert_eq!(
            extract(&blocks, &Metadata::default(), "", "file"),
            "Upper Heading"
        );
    }

    #[test]
    fn test_implausible_blocks_skipped() {
        let blocks = vec![
            block("Abc", 200.0, 10.0, 400.0, 40.0),
            block(&"x".repeat(120), 200.0, 60.0, 400.0, 30.0),
            block("Reasonable", 10.0, 400.0, 100.0, 9.0),
        ];
        assert_eq!(
            extract(&blocks, &Metadata::default(), "", "file"),
            "Reasonable"
        );
    }

    #[test]
    fn test_raw_text_then_stem() {
        let metadata = Metadata {
            title: Some("abc".to_string()),
            ..Default::default()
        };
        assert_eq!(
            extract(&[], &metadata, "\n  ok \n  Quarterly Summary \n", "q3"),
            "Quarterly Summary"
        );
        assert_eq!(extract(&[], &metadata, "", "q3-report"), "q3-report");
        assert_eq!(extract(&[], &metadata, "", "  "), UNKNOWN_TITLE);
    }
}
