//! Feature extraction for heading classification.

use crate::model::{BBox, TextBlock, TextSpan};

use super::patterns::{has_numbering_prefix, is_all_caps, is_title_case};

/// Page height used when the real one is unknown.
pub const DEFAULT_PAGE_HEIGHT: f32 = 1000.0;

/// Normalized features of one text block.
///
/// Every field is finite; flags are `0.0` or `1.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeatureVector {
    /// Font-size z-score against the page statistics
    pub font_z: f32,
    pub is_bold: f32,
    pub is_title: f32,
    /// Left edge / 1000
    pub x: f32,
    /// Top edge / page height
    pub y: f32,
    /// Width / 1000
    pub width: f32,
    /// Height / 100
    pub height: f32,
    /// Character count / 100
    pub text_length: f32,
    /// Word count / 10
    pub word_count: f32,
    /// Mean word length / 10
    pub avg_word_length: f32,
    pub has_numbering: f32,
    pub all_caps: f32,
    pub title_case: f32,
    /// Gap to the nearest overlapping block above / 100
    pub space_above: f32,
}

impl FeatureVector {
    /// Number of features.
    pub const LEN: usize = 14;

    /// Features in their canonical order.
    pub fn to_array(&self) -> [f32; Self::LEN] {
        [
            self.font_z,
            self.is_bold,
            self.is_title,
            self.x,
            self.y,
            self.width,
            self.height,
            self.text_length,
            self.word_count,
            self.avg_word_length,
            self.has_numbering,
            self.all_caps,
            self.title_case,
            self.space_above,
        ]
    }

    pub fn bold(&self) -> bool {
        self.is_bold > 0.5
    }

    pub fn title(&self) -> bool {
        self.is_title > 0.5
    }

    pub fn numbered(&self) -> bool {
        self.has_numbering > 0.5
    }

    pub fn caps(&self) -> bool {
        self.all_caps > 0.5
    }

    fn sanitized(mut self) -> Self {
        for value in [
            &mut self.font_z,
            &mut self.is_bold,
            &mut self.is_title,
            &mut self.x,
            &mut self.y,
            &mut self.width,
            &mut self.height,
            &mut self.text_length,
            &mut self.word_count,
            &mut self.avg_word_length,
            &mut self.has_numbering,
            &mut self.all_caps,
            &mut self.title_case,
            &mut self.space_above,
        ] {
            if !value.is_finite() {
                *value = 0.0;
            }
        }
        self
    }
}

fn flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Mean and population standard deviation of the font sizes on a page.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    sizes: Vec<f32>,
}

impl FontStatistics {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the sized blocks of a page.
    pub fn from_blocks<'a>(blocks: impl IntoIterator<Item = &'a TextBlock>) -> Self {
        let mut stats = Self::new();
        for block in blocks {
            stats.add_size(block.font_size);
        }
        stats
    }

    /// Add a font size observation; sizes that are not positive are ignored.
    pub fn add_size(&mut self, size: f32) {
        if size > 0.0 && size.is_finite() {
            self.sizes.push(size);
        }
    }

    /// Whether any size has been observed.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Mean size (0 when empty).
    pub fn mean(&self) -> f32 {
        if self.sizes.is_empty() {
            return 0.0;
        }
        self.sizes.iter().sum::<f32>() / self.sizes.len() as f32
    }

    /// Population standard deviation (0 when empty).
    pub fn std_dev(&self) -> f32 {
        if self.sizes.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self
            .sizes
            .iter()
            .map(|s| (s - mean) * (s - mean))
            .sum::<f32>()
            / self.sizes.len() as f32;
        variance.sqrt()
    }
}

/// Builds [`FeatureVector`]s from text blocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract the features of `block`.
    ///
    /// `siblings` are the blocks of the same page; the block itself may be
    /// among them. Never fails: odd inputs produce zeros.
    pub fn extract(
        &self,
        block: &TextBlock,
        mean_font_size: f32,
        std_font_size: f32,
        page_height: f32,
        siblings: &[TextBlock],
    ) -> FeatureVector {
        let text = block.text.trim();
        let bbox = block.bbox;

        let words: Vec<&str> = text.split_whitespace().collect();
        let avg_word_length = if words.is_empty() {
            0.0
        } else {
            words.iter().map(|w| w.chars().count()).sum::<usize>() as f32 / words.len() as f32
        };

        let font_z = if std_font_size > 0.0 {
            (block.font_size - mean_font_size) / std_font_size
        } else {
            0.0
        };

        let page_height = if page_height > 0.0 && page_height.is_finite() {
            page_height
        } else {
            DEFAULT_PAGE_HEIGHT
        };

        FeatureVector {
            font_z,
            is_bold: flag(block.is_bold),
            is_title: flag(block.is_title_tagged),
            x: bbox.x0 / 1000.0,
            y: bbox.y0 / page_height,
            width: (bbox.x1 - bbox.x0) / 1000.0,
            height: (bbox.y1 - bbox.y0) / 100.0,
            text_length: text.chars().count() as f32 / 100.0,
            word_count: words.len() as f32 / 10.0,
            avg_word_length: avg_word_length / 10.0,
            has_numbering: flag(has_numbering_prefix(text)),
            all_caps: flag(is_all_caps(text)),
            title_case: flag(is_title_case(text)),
            space_above: space_above(&bbox, siblings) / 100.0,
        }
        .sanitized()
    }
}

/// Vertical gap to the closest block that ends above `bbox` and overlaps it
/// horizontally; the distance to the page top when there is none.
fn space_above(bbox: &BBox, siblings: &[TextBlock]) -> f32 {
    let top = bbox.y0;
    siblings
        .iter()
        .map(|s| s.bbox)
        .filter(|other| other.y1 <= top && bbox.horizontal_overlap(other) > 0.0)
        .map(|other| top - other.y1)
        .fold(top, f32::min)
}

/// Font attributes of the spans under a layout region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionFont {
    /// Mean span size
    pub size: f32,
    /// Set when any span is bold
    pub is_bold: bool,
    /// Most frequent font name
    pub font_name: String,
    /// Most frequent color
    pub color: u32,
}

/// Sample the spans intersecting `region`. No span gives the defaults.
pub fn sample_region_font<'a>(
    region: &BBox,
    spans: impl IntoIterator<Item = &'a TextSpan>,
) -> RegionFont {
    let hits: Vec<&TextSpan> = spans
        .into_iter()
        .filter(|s| region.intersects(&s.bbox))
        .collect();
    if hits.is_empty() {
        return RegionFont::default();
    }

    let size = hits.iter().map(|s| s.size).sum::<f32>() / hits.len() as f32;
    RegionFont {
        size: if size.is_finite() { size } else { 0.0 },
        is_bold: hits.iter().any(|s| s.is_bold()),
        font_name: most_frequent(hits.iter().map(|s| s.font.clone())).unwrap_or_default(),
        color: most_frequent(hits.iter().map(|s| s.color)).unwrap_or_default(),
    }
}

/// Most frequent item; ties go to the one seen first.
fn most_frequent<T: PartialEq>(items: impl Iterator<Item = T>) -> Option<T> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(seen, _)| *seen == item) {
            Some((_, count)) => *count += 1,
            None => counts.push((item, 1)),
        }
    }
    let mut best: Option<(T, usize)> = None;
    for (item, count) in counts {
        if best.as_ref().map_or(true, |(_, c)| count > *c) {
            best = Some((item, count));
        }
    }
    best.map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(text: &str, bbox: BBox, size: f32, font: &str) -> TextBlock {
        TextBlock::new(text, bbox, 1).with_font(size, font)
    }

    #[test]
    fn test_font_statistics() {
        let mut stats = FontStatistics::new();
        for size in [10.0, 10.0, 12.0, 16.0, 0.0, -1.0] {
            stats.add_size(size);
        }
        assert!((stats.mean() - 12.0).abs() < 1e-5);
        assert!((stats.std_dev() - 6.0f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_empty_statistics() {
        let blocks: Vec<TextBlock> = Vec::new();
        let stats = FontStatistics::from_blocks(&blocks);
        assert!(stats.is_empty());
        assert_eq!(stats.mean(), 0.0);
        assert_eq!(stats.std_dev(), 0.0);
    }

    #[test]
    fn test_extract_normalizes() {
        let b = block(
            "2.1. Data Sources",
            BBox::new(100.0, 200.0, 400.0, 220.0),
            16.0,
            "Arial-Bold",
        );
        let f = FeatureExtractor.extract(&b, 12.0, 2.0, 800.0, &[]);
        assert_eq!(f.font_z, 2.0);
        assert!(f.bold());
        assert!(!f.title());
        assert!((f.x - 0.1).abs() < 1e-6);
        assert!((f.y - 0.25).abs() < 1e-6);
        assert!((f.width - 0.3).abs() < 1e-6);
        assert!((f.height - 0.2).abs() < 1e-6);
        assert!((f.text_length - 0.17).abs() < 1e-6);
        assert!((f.word_count - 0.3).abs() < 1e-6);
        assert!(f.numbered());
        assert_eq!(f.title_case, 1.0);
        assert!((f.space_above - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_std_gives_zero_z() {
        let b = block("Body", BBox::new(0.0, 0.0, 10.0, 10.0), 30.0, "Arial");
        let f = FeatureExtractor.extract(&b, 12.0, 0.0, 800.0, &[]);
        assert_eq!(f.font_z, 0.0);
    }

    #[test]
    fn test_space_above_uses_nearest_overlapping_sibling() {
        let target = BBox::new(100.0, 300.0, 300.0, 320.0);
        let siblings = vec![
            block("far", BBox::new(100.0, 100.0, 300.0, 120.0), 10.0, "A"),
            block("near", BBox::new(150.0, 250.0, 250.0, 280.0), 10.0, "A"),
            block("aside", BBox::new(400.0, 290.0, 500.0, 298.0), 10.0, "A"),
            block("below", BBox::new(100.0, 400.0, 300.0, 420.0), 10.0, "A"),
        ];
        assert_eq!(space_above(&target, &siblings), 20.0);
    }

    #[test]
    fn test_malformed_block_is_all_finite() {
        let b = TextBlock {
            text: String::new(),
            bbox: BBox::new(f32::NAN, f32::INFINITY, 0.0, 0.0),
            font_size: f32::NAN,
            ..Default::default()
        };
        let f = FeatureExtractor.extract(&b, 12.0, 2.0, 0.0, &[]);
        assert!(f.to_array().iter().all(|v| v.is_finite()));
        assert_eq!(f.to_array().len(), FeatureVector::LEN);
        assert_eq!(f.word_count, 0.0);
    }

    #[test]
    fn test_sample_region_font() {
        let mut spans = vec![
            TextSpan::new("A", BBox::new(0.0, 0.0, 50.0, 10.0), 12.0, "Times"),
            TextSpan::new("B", BBox::new(0.0, 12.0, 50.0, 22.0), 18.0, "Times-Bold"),
            TextSpan::new("C", BBox::new(0.0, 24.0, 50.0, 34.0), 12.0, "Times"),
            TextSpan::new("D", BBox::new(500.0, 0.0, 550.0, 10.0), 40.0, "Impact"),
        ];
        spans[1].color = 0xFF0000;
        let region = BBox::new(0.0, 0.0, 100.0, 40.0);
        let font = sample_region_font(&region, &spans);
        assert_eq!(font.size, 14.0);
        assert!(font.is_bold);
        assert_eq!(font.font_name, "Times");
        assert_eq!(font.color, 0);
    }

    #[test]
    fn test_sample_without_spans() {
        let spans: Vec<TextSpan> = Vec::new();
        let font = sample_region_font(&BBox::new(0.0, 0.0, 1.0, 1.0), &spans);
        assert_eq!(font, RegionFont::default());
    }

    #[test]
    fn test_most_frequent_tie_is_first_seen() {
        assert_eq!(most_frequent(["b", "a", "a", "b"].into_iter()), Some("b"));
        assert_eq!(most_frequent(std::iter::empty::<u32>()), None);
    }
}
