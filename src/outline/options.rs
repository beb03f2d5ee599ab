//! Outline building options.

/// Options for [`crate::outline::OutlineBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineOptions {
    /// Document language; detected from page 1 when unset
    pub language: Option<String>,

    /// Whether an embedded table of contents short-circuits inference
    pub use_embedded_toc: bool,

    /// Whether the forced full-scan and sparse rescan tiers may run
    pub full_scan: bool,

    /// Zoom used when exporting page rasters for the layout engine
    pub raster_scale: f32,

    /// X-position cutoffs `(h1, h2)` used to level pattern-only headings
    pub indent_bands: (f32, f32),
}

impl OutlineOptions {
    /// Create new outline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the document language instead of detecting it.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Enable or disable the embedded table of contents.
    pub fn with_embedded_toc(mut self, enabled: bool) -> Self {
        self.use_embedded_toc = enabled;
        self
    }

    /// Ignore any embedded table of contents.
    pub fn without_toc(mut self) -> Self {
        self.use_embedded_toc = false;
        self
    }

    /// Enable or disable the escalation scans.
    pub fn with_full_scan(mut self, enabled: bool) -> Self {
        self.full_scan = enabled;
        self
    }

    /// Set the raster zoom. Non-positive values are ignored.
    pub fn with_raster_scale(mut self, scale: f32) -> Self {
        if scale > 0.0 && scale.is_finite() {
            self.raster_scale = scale;
        }
        self
    }

    /// Set the indentation cutoffs for pattern-only headings.
    pub fn with_indent_bands(mut self, h1_below: f32, h2_below: f32) -> Self {
        self.indent_bands = (h1_below, h2_below);
        self
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            language: None,
            use_embedded_toc: true,
            full_scan: true,
            raster_scale: 2.0,
            indent_bands: (100.0, 150.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_options_builder() {
        let options = OutlineOptions::new()
            .with_language("ko")
            .without_toc()
            .with_full_scan(false)
            .with_raster_scale(3.0)
            .with_indent_bands(80.0, 120.0);

        assert_eq!(options.language.as_deref(), Some("ko"));
        assert!(!options.use_embedded_toc);
        assert!(!options.full_scan);
        assert_eq!(options.raster_scale, 3.0);
        assert_eq!(options.indent_bands, (80.0, 120.0));
    }

    #[test]
    fn test_outline_options_defaults() {
        let options = OutlineOptions::default();
        assert!(options.language.is_none());
        assert!(options.use_embedded_toc);
        assert!(options.full_scan);
        assert_eq!(options.raster_scale, 2.0);
    }

    #[test]
    fn test_invalid_raster_scale_ignored() {
        let options = OutlineOptions::new().with_raster_scale(0.0);
        assert_eq!(options.raster_scale, 2.0);
        let options = OutlineOptions::new().with_raster_scale(f32::NAN);
        assert_eq!(options.raster_scale, 2.0);
    }
}
