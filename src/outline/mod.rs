//! Outline building: the escalation tiers and final clean-up.

mod builder;
mod options;
mod processor;

pub use builder::{BuildReport, OutlineBuilder, Tier};
pub use options::OutlineOptions;
pub use processor::{HierarchyTrail, OutlineProcessor};
