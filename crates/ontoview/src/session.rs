//! Layout session state machine.
//!
//! A session coordinates the two-pass layout of one diagram across edits.
//! Each AST version goes through at most one estimate pass and one
//! remeasure pass; a new version resets the cycle. Requests arriving while
//! a pass is running are dropped (the caller re-submits with the latest
//! graph), and results for a superseded version are discarded rather than
//! applied.

use indexmap::IndexMap;
use log::{debug, info, warn};

use ontoview_core::{geometry::Size, identifier::NodeId};

use crate::{
    config::ViewOptions,
    graph::DiagramGraph,
    layout::{engine::LayeredEngine, estimate},
};

/// Caller-supplied identity token for one AST state.
pub type AstVersion = u64;

/// Where the session is in the estimate/remeasure cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutPhase {
    /// No layout has run for the current version.
    Idle,
    EstimateRunning,
    /// Estimate positions applied, waiting for real measurements.
    EstimatePositioned,
    RemeasureRunning,
    /// Remeasured positions applied; the cycle is complete for this version.
    RemeasurePositioned,
}

/// Result of submitting a graph for the estimate pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Estimate layout ran and positions were applied.
    Positioned,
    /// The engine failed; previous positions were kept.
    Fallback,
    /// Another pass was in flight; nothing happened.
    Dropped,
}

/// Result of feeding renderer measurements back into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureOutcome {
    /// Remeasure layout ran and positions were applied.
    Repositioned,
    /// The engine failed; estimate positions were kept.
    Fallback,
    /// Not every node has a measurement yet; try again when they arrive.
    Incomplete,
    /// This version already had its remeasure pass.
    AlreadyMeasured,
    /// The measurements belong to an older AST version.
    Superseded,
    /// No estimate pass has run for this version yet.
    NotReady,
    /// Another pass was in flight; nothing happened.
    Dropped,
}

/// Drives the estimate and remeasure passes for one diagram.
pub struct LayoutSession {
    options: ViewOptions,
    engine: LayeredEngine,
    version: Option<AstVersion>,
    phase: LayoutPhase,
    in_flight: bool,
    layout_runs: u32,
}

impl LayoutSession {
    pub fn new(options: ViewOptions) -> Self {
        let engine = LayeredEngine::new(options.layout().clone());
        Self {
            options,
            engine,
            version: None,
            phase: LayoutPhase::Idle,
            in_flight: false,
            layout_runs: 0,
        }
    }

    pub fn phase(&self) -> LayoutPhase {
        self.phase
    }

    pub fn version(&self) -> Option<AstVersion> {
        self.version
    }

    /// Total layout passes applied, estimate and remeasure combined.
    pub fn layout_runs(&self) -> u32 {
        self.layout_runs
    }

    /// Runs the estimate pass for the given AST version and writes the
    /// resulting positions onto the graph.
    ///
    /// A version the session has not seen before resets the cycle, so a
    /// re-edit after remeasure starts over. Re-submitting the current
    /// version re-runs the estimate but does not re-enable a consumed
    /// remeasure pass.
    pub fn submit(&mut self, version: AstVersion, graph: &mut DiagramGraph) -> SubmitOutcome {
        if self.in_flight {
            debug!(version; "Dropping layout request, another pass is in flight");
            return SubmitOutcome::Dropped;
        }

        if self.version != Some(version) {
            info!(version; "New AST version, resetting layout cycle");
            self.version = Some(version);
            self.phase = LayoutPhase::Idle;
        }

        self.in_flight = true;
        self.phase = LayoutPhase::EstimateRunning;
        let sizes = estimate::estimate_sizes(graph, &self.options);
        let result = self.engine.compute(graph, &sizes);
        self.in_flight = false;

        if self.version != Some(version) {
            debug!(version; "Discarding estimate result for superseded version");
            return SubmitOutcome::Dropped;
        }

        graph.apply_positions(&result.positions);
        self.layout_runs += 1;
        self.phase = LayoutPhase::EstimatePositioned;

        if result.used_fallback {
            SubmitOutcome::Fallback
        } else {
            SubmitOutcome::Positioned
        }
    }

    /// Runs the one-shot remeasure pass with the renderer's real node sizes.
    ///
    /// The pass only runs when every node in the graph has a measurement;
    /// partial measurement batches return [`MeasureOutcome::Incomplete`]
    /// without touching positions. Each version gets exactly one remeasure,
    /// so measurement events arriving after the pass are no-ops rather than
    /// errors.
    pub fn apply_measurements(
        &mut self,
        version: AstVersion,
        graph: &mut DiagramGraph,
        measured: &IndexMap<NodeId, Size>,
    ) -> MeasureOutcome {
        if self.in_flight {
            debug!(version; "Dropping measurements, another pass is in flight");
            return MeasureOutcome::Dropped;
        }
        if self.version != Some(version) {
            debug!(version; "Ignoring measurements for superseded version");
            return MeasureOutcome::Superseded;
        }
        match self.phase {
            LayoutPhase::RemeasurePositioned => return MeasureOutcome::AlreadyMeasured,
            LayoutPhase::EstimatePositioned => {}
            _ => return MeasureOutcome::NotReady,
        }

        let missing = graph
            .nodes
            .iter()
            .filter(|node| !measured.contains_key(&node.id))
            .count();
        if missing > 0 {
            debug!(version, missing; "Deferring remeasure until all nodes are measured");
            return MeasureOutcome::Incomplete;
        }

        self.in_flight = true;
        self.phase = LayoutPhase::RemeasureRunning;
        let result = self.engine.compute(graph, measured);
        self.in_flight = false;

        if self.version != Some(version) {
            debug!(version; "Discarding remeasure result for superseded version");
            return MeasureOutcome::Superseded;
        }

        graph.apply_positions(&result.positions);
        self.layout_runs += 1;
        self.phase = LayoutPhase::RemeasurePositioned;

        if result.used_fallback {
            warn!(version; "Remeasure layout fell back to estimate positions");
            MeasureOutcome::Fallback
        } else {
            MeasureOutcome::Repositioned
        }
    }
}

#[cfg(test)]
mod tests {
    use ontoview_core::{geometry::Point, identifier::Namespace};

    use crate::graph::{DiagramEdge, DiagramNode, EdgeData, EdgeKind, NodeData, NodeKind};

    use super::*;

    fn two_node_graph() -> DiagramGraph {
        let a = NodeId::new(Namespace::Class, "A");
        let b = NodeId::new(Namespace::Class, "B");
        DiagramGraph {
            nodes: vec![
                DiagramNode {
                    id: a,
                    kind: NodeKind::Class,
                    data: NodeData::labeled("A"),
                    position: Point::default(),
                },
                DiagramNode {
                    id: b,
                    kind: NodeKind::Class,
                    data: NodeData::labeled("B"),
                    position: Point::default(),
                },
            ],
            edges: vec![DiagramEdge {
                id: "rel-class-A-class-B-0".to_owned(),
                source: a,
                target: b,
                kind: EdgeKind::Association,
                data: EdgeData::default(),
            }],
        }
    }

    fn measurements(graph: &DiagramGraph, size: Size) -> IndexMap<NodeId, Size> {
        graph.nodes.iter().map(|n| (n.id, size)).collect()
    }

    #[test]
    fn test_full_cycle() {
        let mut session = LayoutSession::new(ViewOptions::default());
        let mut graph = two_node_graph();
        assert_eq!(session.phase(), LayoutPhase::Idle);

        assert_eq!(session.submit(1, &mut graph), SubmitOutcome::Positioned);
        assert_eq!(session.phase(), LayoutPhase::EstimatePositioned);

        let measured = measurements(&graph, Size::new(200.0, 120.0));
        assert_eq!(
            session.apply_measurements(1, &mut graph, &measured),
            MeasureOutcome::Repositioned
        );
        assert_eq!(session.phase(), LayoutPhase::RemeasurePositioned);
        assert_eq!(session.layout_runs(), 2);
    }

    #[test]
    fn test_remeasure_is_one_shot_per_version() {
        let mut session = LayoutSession::new(ViewOptions::default());
        let mut graph = two_node_graph();
        session.submit(1, &mut graph);

        let measured = measurements(&graph, Size::new(200.0, 120.0));
        assert_eq!(
            session.apply_measurements(1, &mut graph, &measured),
            MeasureOutcome::Repositioned
        );
        assert_eq!(
            session.apply_measurements(1, &mut graph, &measured),
            MeasureOutcome::AlreadyMeasured
        );
        assert_eq!(session.layout_runs(), 2);
    }

    #[test]
    fn test_new_version_resets_the_cycle() {
        let mut session = LayoutSession::new(ViewOptions::default());
        let mut graph = two_node_graph();
        session.submit(1, &mut graph);
        let measured = measurements(&graph, Size::new(200.0, 120.0));
        session.apply_measurements(1, &mut graph, &measured);

        // An edit produces version 2 and re-arms the remeasure pass
        assert_eq!(session.submit(2, &mut graph), SubmitOutcome::Positioned);
        assert_eq!(session.phase(), LayoutPhase::EstimatePositioned);
        assert_eq!(
            session.apply_measurements(2, &mut graph, &measured),
            MeasureOutcome::Repositioned
        );
    }

    #[test]
    fn test_stale_measurements_are_discarded() {
        let mut session = LayoutSession::new(ViewOptions::default());
        let mut graph = two_node_graph();
        session.submit(1, &mut graph);
        session.submit(2, &mut graph);

        let measured = measurements(&graph, Size::new(200.0, 120.0));
        assert_eq!(
            session.apply_measurements(1, &mut graph, &measured),
            MeasureOutcome::Superseded
        );
    }

    #[test]
    fn test_partial_measurements_defer() {
        let mut session = LayoutSession::new(ViewOptions::default());
        let mut graph = two_node_graph();
        session.submit(1, &mut graph);
        let estimate_position = graph.nodes[0].position;

        let mut partial = IndexMap::new();
        partial.insert(graph.nodes[0].id, Size::new(200.0, 120.0));
        assert_eq!(
            session.apply_measurements(1, &mut graph, &partial),
            MeasureOutcome::Incomplete
        );
        // Positions untouched, phase unchanged
        assert_eq!(graph.nodes[0].position, estimate_position);
        assert_eq!(session.phase(), LayoutPhase::EstimatePositioned);
    }

    #[test]
    fn test_measurements_for_unknown_version_are_superseded() {
        let mut graph = two_node_graph();

        // A fresh session has no version, so any measurement batch is stale
        let mut fresh = LayoutSession::new(ViewOptions::default());
        let measured = measurements(&graph, Size::new(200.0, 120.0));
        assert_eq!(
            fresh.apply_measurements(1, &mut graph, &measured),
            MeasureOutcome::Superseded
        );
        assert_eq!(fresh.phase(), LayoutPhase::Idle);
    }

    #[test]
    fn test_remeasure_moves_nodes_when_sizes_grow() {
        let mut session = LayoutSession::new(ViewOptions::default());
        let mut graph = two_node_graph();
        session.submit(1, &mut graph);
        let before: Vec<Point> = graph.nodes.iter().map(|n| n.position).collect();

        // Real sizes much larger than the estimates
        let measured = measurements(&graph, Size::new(400.0, 300.0));
        session.apply_measurements(1, &mut graph, &measured);
        let after: Vec<Point> = graph.nodes.iter().map(|n| n.position).collect();

        let spread_before = (before[1].y - before[0].y).abs();
        let spread_after = (after[1].y - after[0].y).abs();
        assert!(spread_after > spread_before);
    }
}
