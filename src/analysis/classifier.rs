//! Rule-based heading level classification.

use crate::model::HeadingLevel;

use super::features::FeatureVector;

/// Decision table mapping a feature vector to a heading level.
///
/// Pure: the only state is the `previous_level` the caller threads through a
/// page's blocks in reading order.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadingClassifier;

impl HeadingClassifier {
    /// Create a new classifier.
    pub fn new() -> Self {
        Self
    }

    /// Classify one block. Rules are tried top-down; the first match wins.
    pub fn classify(
        &self,
        features: &FeatureVector,
        previous_level: Option<HeadingLevel>,
    ) -> Option<HeadingLevel> {
        let z = features.font_z;
        let bold = features.bold();

        if features.title() || z > 1.5 || (features.caps() && z > 0.5) {
            return Some(HeadingLevel::H1);
        }
        if z > 0.75 || (bold && z > 0.25) || features.numbered() {
            return Some(HeadingLevel::H2);
        }
        if z > 0.25 || (bold && z > 0.0) {
            return Some(HeadingLevel::H3);
        }

        // Weaker signal is accepted one level below the last heading.
        match previous_level {
            Some(HeadingLevel::H1) if z > 0.0 || bold => Some(HeadingLevel::H2),
            Some(HeadingLevel::H2) if z > -0.5 || bold => Some(HeadingLevel::H3),
            _ => None,
        }
    }
}
