//! Layout engines that need no model at run time.

use std::collections::HashMap;

use super::{DumpSource, LayoutEngine, PageRaster, PageSource};
use crate::error::{Error, Result};
use crate::model::LayoutRegion;

/// Replays layout regions recorded in page dumps.
///
/// Holds one or more documents keyed by id and is shared read-only. Regions are
/// stored in page coordinates and scaled to raster pixels on replay, so the
/// pipeline sees the same coordinate space a live engine would produce.
#[derive(Debug, Default)]
pub struct RecordedLayoutEngine {
    documents: HashMap<String, HashMap<u32, Vec<LayoutRegion>>>,
}

impl RecordedLayoutEngine {
    /// Create an engine with no recordings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine from a set of loaded dumps.
    pub fn from_sources<'a>(sources: impl IntoIterator<Item = &'a DumpSource>) -> Self {
        sources
            .into_iter()
            .fold(Self::new(), |engine, source| engine.with_source(source))
    }

    /// Add the recorded layout of one document.
    pub fn with_source(mut self, source: &DumpSource) -> Self {
        let pages: HashMap<u32, Vec<LayoutRegion>> = source
            .dump()
            .pages
            .iter()
            .filter_map(|p| p.layout.as_ref().map(|layout| (p.number, layout.clone())))
            .collect();
        if !pages.is_empty() {
            self.documents.insert(source.document_id(), pages);
        }
        self
    }

    /// Number of documents with at least one recorded page.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }
}

impl LayoutEngine for RecordedLayoutEngine {
    fn name(&self) -> &str {
        "recorded"
    }

    fn analyze(&self, raster: &PageRaster) -> Result<Vec<LayoutRegion>> {
        let regions = self
            .documents
            .get(&raster.document_id)
            .and_then(|pages| pages.get(&raster.page))
            .ok_or_else(|| {
                Error::Layout(format!(
                    "no recorded layout for {} page {}",
                    raster.document_id, raster.page
                ))
            })?;

        Ok(regions
            .iter()
            .map(|r| LayoutRegion {
                kind: r.kind,
                bbox: r.bbox.scaled_up(raster.scale),
                text: r.text.clone(),
            })
            .collect())
    }
}

/// Stand-in used when no layout engine is available.
///
/// Every call fails with [`Error::LayoutUnavailable`], which sends each page
/// down the raw-line path.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLayoutEngine;

impl LayoutEngine for NoLayoutEngine {
    fn name(&self) -> &str {
        "none"
    }

    fn analyze(&self, _raster: &PageRaster) -> Result<Vec<LayoutRegion>> {
        Err(Error::LayoutUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, RegionKind};

    fn source() -> DumpSource {
        let json = r#"{ "pages": [
            { "number": 1, "width": 600, "height": 800,
              "layout": [ { "type": "title", "bbox": [100, 50, 500, 80], "text": "Atlas" } ] },
            { "number": 2, "width": 600, "height": 800 }
        ] }"#;
        DumpSource::from_json("atlas", json).unwrap()
    }

    #[test]
    fn test_replay_scales_to_raster() {
        let source = source();
        let engine = RecordedLayoutEngine::from_sources([&source]);
        let raster = source.render_page(1, 2.0).unwrap();

        let regions = engine.analyze(&raster).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].kind, RegionKind::Title);
        assert_eq!(regions[0].bbox, BBox::new(200.0, 100.0, 1000.0, 160.0));
    }

    #[test]
    fn test_unrecorded_page_fails() {
        let source = source();
        let engine = RecordedLayoutEngine::from_sources([&source]);
        let raster = source.render_page(2, 2.0).unwrap();
        assert!(matches!(engine.analyze(&raster), Err(Error::Layout(_))));
    }

    #[test]
    fn test_unknown_document_fails() {
        let engine = RecordedLayoutEngine::new();
        let raster = PageRaster::blank("missing", 1, (100.0, 100.0), 1.0);
        assert!(engine.analyze(&raster).is_err());
        assert_eq!(engine.document_count(), 0);
    }

    #[test]
    fn test_no_engine_is_unavailable() {
        let raster = PageRaster::blank("doc", 1, (100.0, 100.0), 2.0);
        assert!(matches!(
            NoLayoutEngine.analyze(&raster),
            Err(Error::LayoutUnavailable)
        ));
    }
}
