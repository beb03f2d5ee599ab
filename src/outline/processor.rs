//! Final outline clean-up.

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

use crate::model::{Heading, HeadingLevel, Outline};

/// Deduplicates, orders and walks the hierarchy of a raw heading list.
#[derive(Debug, Default, Clone, Copy)]
pub struct OutlineProcessor;

impl OutlineProcessor {
    /// Create a new processor.
    pub fn new() -> Self {
        Self
    }

    /// Produce the final outline.
    ///
    /// Heading text is NFC-normalized first. Keeps the first of any
    /// `(level, text, page)` duplicates and stable sorts by page, so same-page
    /// headings stay in discovery order.
    pub fn finalize(&self, headings: impl IntoIterator<Item = Heading>) -> Outline {
        let mut seen = HashSet::new();
        let mut unique: Vec<Heading> = headings
            .into_iter()
            .map(|mut h| {
                h.text = h.text.nfc().collect();
                h
            })
            .filter(|h| seen.insert((h.level, h.text.clone(), h.page)))
            .collect();
        unique.sort_by_key(|h| h.page);

        let outline = Outline::from(unique);
        let trail = HierarchyTrail::walk(&outline);
        log::debug!(
            "Finalized outline: {} headings, {} top-level sections",
            outline.len(),
            trail.sections
        );
        outline
    }
}

/// Current H1/H2/H3 while walking an outline in order.
///
/// Entering a level forgets the deeper ones; nothing is removed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HierarchyTrail<'a> {
    current: [Option<&'a Heading>; 3],
    sections: usize,
}

impl<'a> HierarchyTrail<'a> {
    /// Record one heading.
    pub fn enter(&mut self, heading: &'a Heading) {
        let depth = heading.level.depth() as usize;
        self.current[depth - 1] = Some(heading);
        for slot in self.current.iter_mut().skip(depth) {
            *slot = None;
        }
        if heading.level == HeadingLevel::H1 {
            self.sections += 1;
        }
    }

    /// Walk a whole outline and return the final state.
    pub fn walk(outline: &'a Outline) -> Self {
        let mut trail = Self::default();
        for heading in outline {
            trail.enter(heading);
        }
        trail
    }

    /// Heading currently open at `level`.
    pub fn current(&self, level: HeadingLevel) -> Option<&'a Heading> {
        self.current[level.depth() as usize - 1]
    }

    /// Number of H1 headings seen.
    pub fn sections(&self) -> usize {
        self.sections
    }
}
