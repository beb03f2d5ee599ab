//! Heading tests over raw extraction lines.
//!
//! These work directly on the extraction collaborator's lines and need no
//! layout engine or page statistics. Three flavours exist:
//!
//! - [`raw_line_headings`]: per-page fallback used when layout analysis fails
//!   or finds nothing.
//! - [`full_scan_headings`]: the looser document-wide scan run when the
//!   primary pipeline found too few headings.
//! - [`sparse_scan_headings`]: a last rescan for documents that are still
//!   nearly empty after that.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Heading, HeadingLevel, RawBlock, RawLine};

use super::patterns::{is_all_caps, HeadingPatternMatcher};

static NUMBER_DOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.").unwrap());
static CAPITALIZED_WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z\s]+$").unwrap());
static ROMAN_DOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[IVXLCDM]+\.\s").unwrap());

const MAX_LINE_LEN: usize = 100;
const MIN_SCAN_LEN: usize = 3;

/// One line with its position inside its block.
struct ScanLine<'a> {
    line: &'a RawLine,
    index: usize,
    text: String,
    len: usize,
}

fn scan_lines(blocks: &[RawBlock]) -> impl Iterator<Item = ScanLine<'_>> {
    blocks.iter().flat_map(|block| {
        block.lines.iter().enumerate().map(|(index, line)| {
            let text = line.text();
            let len = text.chars().count();
            ScanLine {
                line,
                index,
                text,
                len,
            }
        })
    })
}

/// Size and bold flag of a line's first span.
fn main_span_style(line: &RawLine) -> (f32, bool) {
    line.main_span()
        .map(|s| (s.size, s.is_bold()))
        .unwrap_or((0.0, false))
}

/// Headings of one page judged from raw line typography.
pub fn raw_line_headings(
    blocks: &[RawBlock],
    page: u32,
    language: &str,
    matcher: &HeadingPatternMatcher,
) -> Vec<Heading> {
    scan_lines(blocks)
        .filter(|l| !l.text.is_empty() && l.len <= MAX_LINE_LEN)
        .filter_map(|l| {
            let (size, bold) = main_span_style(l.line);
            let level = if size > 14.0 || (bold && size > 12.0) {
                HeadingLevel::H1
            } else if size > 12.0 || (bold && size > 10.0) {
                HeadingLevel::H2
            } else if size > 10.0 || bold || matcher.is_heading(&l.text, language) {
                HeadingLevel::H3
            } else {
                return None;
            };
            Some(Heading::new(level, l.text, page))
        })
        .collect()
}

/// Headings of one page under the looser full-scan test.
pub fn full_scan_headings(blocks: &[RawBlock], page: u32) -> Vec<Heading> {
    scan_lines(blocks)
        .filter(|l| (MIN_SCAN_LEN..=MAX_LINE_LEN).contains(&l.len))
        .filter_map(|l| {
            let size = l.line.max_font_size();
            let bold = l.line.any_bold();
            let candidate = size > 11.0
                || bold
                || (l.index == 0 && l.len < 50)
                || NUMBER_DOT.is_match(&l.text)
                || (CAPITALIZED_WORDS.is_match(&l.text) && l.len < 40)
                || (is_all_caps(&l.text) && l.len < 30);
            if !candidate {
                return None;
            }
            let level = if size > 14.0 || (bold && size > 12.0) {
                HeadingLevel::H1
            } else if size > 12.0 || bold {
                HeadingLevel::H2
            } else {
                HeadingLevel::H3
            };
            Some(Heading::new(level, l.text, page))
        })
        .collect()
}

/// Headings of one page under the rescan used for nearly empty outlines.
pub fn sparse_scan_headings(blocks: &[RawBlock], page: u32) -> Vec<Heading> {
    scan_lines(blocks)
        .filter(|l| (MIN_SCAN_LEN..=MAX_LINE_LEN).contains(&l.len))
        .filter_map(|l| {
            let (size, bold) = main_span_style(l.line);
            let styled = size > 10.0 || bold || (l.index == 0 && l.len < 40);
            let unterminated = l
                .text
                .chars()
                .last()
                .is_some_and(|c| !".,:;?!".contains(c));
            let shaped = unterminated
                || NUMBER_DOT.is_match(&l.text)
                || CAPITALIZED_WORDS.is_match(&l.text)
                || ROMAN_DOT.is_match(&l.text);
            if !(l.len < 80 && styled && shaped) {
                return None;
            }
            let level = if size > 14.0 || (bold && size > 12.0) || (page == 1 && l.index == 0) {
                HeadingLevel::H1
            } else if size > 12.0 || bold {
                HeadingLevel::H2
            } else {
                HeadingLevel::H3
            };
            Some(Heading::new(level, l.text, page))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, TextSpan};

    fn line(text: &str, size: f32, font: &str) -> RawLine {
        RawLine::from_spans(vec![TextSpan::new(
            text,
            BBox::new(72.0, 0.0, 400.0, size),
            size,
            font,
        )])
    }

    fn block(lines: Vec<RawLine>) -> RawBlock {
        RawBlock::from_lines(lines)
    }

    fn levels(headings: &[Heading]) -> Vec<(HeadingLevel, &str)> {
        headings.iter().map(|h| (h.level, h.text.as_str())).collect()
    }

    #[test]
    fn test_raw_line_levels() {
        let blocks = vec![block(vec![
            line("Big Title", 18.0, "Arial"),
            line("Bold Section", 12.5, "Arial-Bold"),
            line("Medium", 13.0, "Arial"),
            line("Small bold", 9.0, "Arial-Bold"),
            line("body text that goes on and on, as body text tends to do.", 9.0, "Arial"),
            line("Appendix", 9.0, "Arial"),
        ])];
        let headings = raw_line_headings(&blocks, 2, "en", &HeadingPatternMatcher);
        assert_eq!(
            levels(&headings),
            vec![
                (HeadingLevel::H1, "Big Title"),
                (HeadingLevel::H1, "Bold Section"),
                (HeadingLevel::H2, "Medium"),
                (HeadingLevel::H3, "Small bold"),
                (HeadingLevel::H3, "Appendix"),
            ]
        );
        assert!(headings.iter().all(|h| h.page == 2));
    }

    #[test]
    fn test_raw_line_skips_long_and_empty() {
        let blocks = vec![block(vec![
            line(&"Long ".repeat(30), 20.0, "Arial"),
            line("   ", 20.0, "Arial"),
        ])];
        assert!(raw_line_headings(&blocks, 1, "en", &HeadingPatternMatcher).is_empty());
    }

    #[test]
    fn test_full_scan_rules() {
        let blocks = vec![block(vec![
            line("first line of the block", 9.0, "Arial"),
            line("12. numbered item in the middle", 9.0, "Arial"),
            line("Capitalized Words Only", 9.0, "Arial"),
            line("an ordinary body line that continues for quite a while here", 9.0, "Arial"),
            line("ok", 20.0, "Arial"),
            line("Large Header", 16.0, "Arial"),
        ])];
        let headings = full_scan_headings(&blocks, 1);
        assert_eq!(
            levels(&headings),
            vec![
                (HeadingLevel::H3, "first line of the block"),
                (HeadingLevel::H3, "12. numbered item in the middle"),
                (HeadingLevel::H3, "Capitalized Words Only"),
                (HeadingLevel::H1, "Large Header"),
            ]
        );
    }

    #[test]
    fn test_full_scan_uses_max_span_size() {
        let mixed = RawLine::from_spans(vec![
            TextSpan::new("small", BBox::new(0.0, 0.0, 10.0, 9.0), 9.0, "Arial"),
            TextSpan::new("LARGE", BBox::new(12.0, 0.0, 40.0, 13.0), 13.0, "Arial"),
        ]);
        let blocks = vec![block(vec![line("lead line", 9.0, "Arial"), mixed])];
        let headings = full_scan_headings(&blocks, 4);
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[1].level, HeadingLevel::H2);
        assert_eq!(headings[1].text, "small LARGE");
    }

    #[test]
    fn test_sparse_scan_rules() {
        let blocks = vec![
            block(vec![
                line("Cover Line", 9.0, "Arial"),
                line("Ends with period.", 11.0, "Arial"),
                line("IV. Findings.", 11.0, "Arial"),
                line("Bold words", 9.0, "Arial-Bold"),
            ]),
            block(vec![line("Another Block", 11.0, "Arial")]),
        ];
        let headings = sparse_scan_headings(&blocks, 1);
        assert_eq!(
            levels(&headings),
            vec![
                (HeadingLevel::H1, "Cover Line"),
                (HeadingLevel::H3, "IV. Findings."),
                (HeadingLevel::H2, "Bold words"),
                (HeadingLevel::H1, "Another Block"),
            ]
        );

        let later = sparse_scan_headings(&blocks, 3);
        assert_eq!(later[0].level, HeadingLevel::H3);
    }
}
