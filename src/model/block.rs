//! Page-level text primitives: bounding boxes, spans, lines and blocks.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle `(x0, y0, x1, y1)` in page coordinates.
///
/// The y axis grows downwards, so `y0` is the top edge.
/// Serialized as a four-element array.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box (never negative).
    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).max(0.0)
    }

    /// Height of the box (never negative).
    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).max(0.0)
    }

    /// Horizontal midpoint.
    pub fn center_x(&self) -> f32 {
        self.x0 + self.width() / 2.0
    }

    /// Length of the horizontal overlap with another box (0 if disjoint).
    pub fn horizontal_overlap(&self, other: &BBox) -> f32 {
        (self.x1.min(other.x1) - self.x0.max(other.x0)).max(0.0)
    }

    /// Check whether two boxes share any area or edge.
    pub fn intersects(&self, other: &BBox) -> bool {
        self.x0 <= other.x1 && other.x0 <= self.x1 && self.y0 <= other.y1 && other.y0 <= self.y1
    }

    /// Divide every coordinate by `factor`.
    pub fn scaled_down(&self, factor: f32) -> BBox {
        if factor <= 0.0 || !factor.is_finite() {
            return *self;
        }
        BBox::new(
            self.x0 / factor,
            self.y0 / factor,
            self.x1 / factor,
            self.y1 / factor,
        )
    }

    /// Multiply every coordinate by `factor`.
    pub fn scaled_up(&self, factor: f32) -> BBox {
        BBox::new(
            self.x0 * factor,
            self.y0 * factor,
            self.x1 * factor,
            self.y1 * factor,
        )
    }
}

impl From<[f32; 4]> for BBox {
    fn from(a: [f32; 4]) -> Self {
        BBox::new(a[0], a[1], a[2], a[3])
    }
}

impl From<BBox> for [f32; 4] {
    fn from(b: BBox) -> Self {
        [b.x0, b.y0, b.x1, b.y1]
    }
}

/// A run of text sharing one font, as reported by the extraction backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// Span bounds
    pub bbox: BBox,
    /// Font size in points
    pub size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font: String,
    /// sRGB color packed as 0xRRGGBB
    pub color: u32,
}

impl TextSpan {
    /// Create a new text span.
    pub fn new(text: impl Into<String>, bbox: BBox, size: f32, font: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bbox,
            size,
            font: font.into(),
            color: 0,
        }
    }

    /// Whether the font appears to be bold.
    pub fn is_bold(&self) -> bool {
        is_bold_font(&self.font)
    }
}

/// Infer bold weight from a font name.
pub fn is_bold_font(font_name: &str) -> bool {
    let lower = font_name.to_lowercase();
    lower.contains("bold") || lower.contains("black") || lower.contains("heavy")
}

/// A line of spans on one baseline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLine {
    /// Line bounds
    pub bbox: BBox,
    /// Spans in reading order
    pub spans: Vec<TextSpan>,
}

impl RawLine {
    /// Create a line from spans, deriving the bounds from them.
    pub fn from_spans(spans: Vec<TextSpan>) -> Self {
        let bbox = union_bbox(spans.iter().map(|s| s.bbox));
        Self { bbox, spans }
    }

    /// Trimmed span texts joined with single spaces.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Largest span size on the line.
    pub fn max_font_size(&self) -> f32 {
        self.spans.iter().map(|s| s.size).fold(0.0, f32::max)
    }

    /// Whether any span on the line is bold.
    pub fn any_bold(&self) -> bool {
        self.spans.iter().any(TextSpan::is_bold)
    }

    /// The first span, whose attributes stand for the whole line.
    pub fn main_span(&self) -> Option<&TextSpan> {
        self.spans.first()
    }
}

/// A block of lines as grouped by the extraction backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawBlock {
    /// Block bounds
    pub bbox: BBox,
    /// Lines in reading order
    pub lines: Vec<RawLine>,
}

impl RawBlock {
    /// Create a block from lines, deriving the bounds from them.
    pub fn from_lines(lines: Vec<RawLine>) -> Self {
        let bbox = union_bbox(lines.iter().map(|l| l.bbox));
        Self { bbox, lines }
    }

    /// Combined text of all lines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(RawLine::text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Iterate over every span in the block.
    pub fn spans(&self) -> impl Iterator<Item = &TextSpan> {
        self.lines.iter().flat_map(|l| l.spans.iter())
    }
}

fn union_bbox(boxes: impl Iterator<Item = BBox>) -> BBox {
    boxes
        .reduce(|a, b| {
            BBox::new(
                a.x0.min(b.x0),
                a.y0.min(b.y0),
                a.x1.max(b.x1),
                a.y1.max(b.y1),
            )
        })
        .unwrap_or_default()
}

/// A unit of text considered for heading classification.
///
/// Produced once per page by the pipeline from either a layout region or a raw
/// line; never shared across documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBlock {
    /// The text content
    pub text: String,
    /// Bounds in page coordinates
    pub bbox: BBox,
    /// Page number (1-indexed)
    pub page: u32,
    /// Font size in points (0 when unknown)
    pub font_size: f32,
    /// Whether the block's font is bold
    pub is_bold: bool,
    /// Dominant font name
    pub font_name: String,
    /// Dominant color
    pub color: u32,
    /// Set when a layout engine tagged the block as a title region
    pub is_title_tagged: bool,
}

impl TextBlock {
    /// Create a block with text and position only; font attributes default.
    pub fn new(text: impl Into<String>, bbox: BBox, page: u32) -> Self {
        Self {
            text: text.into(),
            bbox,
            page,
            ..Default::default()
        }
    }

    /// Set font attributes.
    pub fn with_font(mut self, font_size: f32, font_name: impl Into<String>) -> Self {
        let font_name = font_name.into();
        self.is_bold = is_bold_font(&font_name);
        self.font_size = font_size;
        self.font_name = font_name;
        self
    }

    /// Mark the block as title-tagged.
    pub fn title_tagged(mut self, tagged: bool) -> Self {
        self.is_title_tagged = tagged;
        self
    }

    /// Build a block from a raw line using its first span's attributes.
    pub fn from_line(line: &RawLine, page: u32) -> Self {
        let mut block = TextBlock::new(line.text(), line.bbox, page);
        if let Some(span) = line.main_span() {
            block = block.with_font(span.size, span.font.clone());
            block.color = span.color;
        }
        block
    }
}

/// Semantic type of a layout region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    /// Body text
    Text,
    /// A title or heading region
    Title,
    /// A table
    Table,
    /// A picture or chart
    Figure,
    /// A list
    List,
    /// Running header
    Header,
    /// Running footer
    Footer,
    /// A formula
    Equation,
    /// Anything the engine labels otherwise
    #[serde(other)]
    Other,
}

/// A typed region returned by the layout-analysis engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutRegion {
    /// Region type
    #[serde(rename = "type")]
    pub kind: RegionKind,
    /// Region bounds
    pub bbox: BBox,
    /// Text recognized inside the region
    #[serde(default)]
    pub text: String,
}

impl LayoutRegion {
    /// Create a new layout region.
    pub fn new(kind: RegionKind, bbox: BBox, text: impl Into<String>) -> Self {
        Self {
            kind,
            bbox,
            text: text.into(),
        }
    }

    /// Whether the region carries text worth classifying.
    pub fn is_textual(&self) -> bool {
        matches!(self.kind, RegionKind::Text | RegionKind::Title) && !self.text.trim().is_empty()
    }
}

/// Reference to an image placed on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    /// Index of the image on its page
    pub index: usize,
    /// Placement bounds
    #[serde(default)]
    pub bbox: BBox,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, size: f32, font: &str) -> TextSpan {
        TextSpan::new(text, BBox::new(0.0, 0.0, 10.0, size), size, font)
    }

    #[test]
    fn test_bbox_overlap() {
        let a = BBox::new(0.0, 0.0, 100.0, 10.0);
        let b = BBox::new(50.0, 20.0, 150.0, 30.0);
        let c = BBox::new(200.0, 0.0, 300.0, 10.0);

        assert_eq!(a.horizontal_overlap(&b), 50.0);
        assert_eq!(a.horizontal_overlap(&c), 0.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&BBox::new(90.0, 5.0, 120.0, 15.0)));
    }

    #[test]
    fn test_bbox_serde_as_array() {
        let bbox = BBox::new(1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&bbox).unwrap();
        assert_eq!(json, "[1.0,2.0,3.0,4.0]");

        let back: BBox = serde_json::from_str("[5,6,7,8]").unwrap();
        assert_eq!(back, BBox::new(5.0, 6.0, 7.0, 8.0));
    }

    #[test]
    fn test_bold_detection() {
        assert!(span("x", 12.0, "Helvetica-Bold").is_bold());
        assert!(span("x", 12.0, "Arial Black").is_bold());
        assert!(span("x", 12.0, "Roboto-HEAVY").is_bold());
        assert!(!span("x", 12.0, "Times-Roman").is_bold());
    }

    #[test]
    fn test_line_text_skips_blank_spans() {
        let line = RawLine::from_spans(vec![
            span(" 1. ", 14.0, "Arial"),
            span("  ", 14.0, "Arial"),
            span("Overview", 14.0, "Arial-Bold"),
        ]);
        assert_eq!(line.text(), "1. Overview");
        assert_eq!(line.max_font_size(), 14.0);
        assert!(line.any_bold());
    }

    #[test]
    fn test_text_block_from_line_uses_first_span() {
        let line = RawLine::from_spans(vec![
            span("Intro", 18.0, "Arial-Bold"),
            span("duction", 10.0, "Arial"),
        ]);
        let block = TextBlock::from_line(&line, 3);
        assert_eq!(block.page, 3);
        assert_eq!(block.font_size, 18.0);
        assert!(block.is_bold);
        assert_eq!(block.font_name, "Arial-Bold");
    }

    #[test]
    fn test_region_kind_unknown_label() {
        let region: LayoutRegion =
            serde_json::from_str(r#"{"type":"reference","bbox":[0,0,1,1],"text":"x"}"#).unwrap();
        assert_eq!(region.kind, RegionKind::Other);
        assert!(!region.is_textual());
    }
}
