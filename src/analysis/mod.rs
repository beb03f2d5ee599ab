//! Heading analysis: pattern matching, features, classification, titles.
//!
//! Every component here is stateless and safe to share across threads.

mod classifier;
mod features;
mod patterns;
mod scan;
mod title;

pub use classifier::HeadingClassifier;
pub use features::{
    sample_region_font, FeatureExtractor, FeatureVector, FontStatistics, RegionFont,
    DEFAULT_PAGE_HEIGHT,
};
pub use patterns::{
    has_lexicon, has_numbering_prefix, is_all_caps, is_heading, is_title_case, to_title_case,
    HeadingPatternMatcher,
};
pub use scan::{full_scan_headings, raw_line_headings, sparse_scan_headings};
pub use title::{TitleContext, TitleExtractor};
