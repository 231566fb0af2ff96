//! Hierarchical auto-layout for diagram graphs.
//!
//! Layout runs in two passes over the same engine: an estimate pass using
//! heuristic node sizes (so the first paint has sane geometry), then a
//! remeasure pass once the renderer reports real pixel sizes. Both passes go
//! through [`engine::LayeredEngine`]; the passes differ only in the size map
//! they feed it.

use indexmap::IndexMap;

use ontoview_core::{geometry::Point, identifier::NodeId};

pub mod engine;
pub mod estimate;
pub mod routing;

/// The outcome of one layout run.
#[derive(Debug, Clone, Default)]
pub struct LayoutResult {
    /// Center position per node id.
    pub positions: IndexMap<NodeId, Point>,

    /// True when the engine failed and positions were carried over from the
    /// pre-layout graph instead.
    pub used_fallback: bool,
}
