//! Layered layout over the rust-sugiyama crate.
//!
//! The engine feeds the rank edges to the Sugiyama algorithm for rank and
//! order assignment, then re-stacks the ranks using the supplied node sizes
//! so that tall nodes get the room they need. rust-sugiyama is called inside
//! `catch_unwind`; on failure the previous node positions are kept and the
//! result is flagged as a fallback rather than an error.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, warn};
use rust_sugiyama::configure::Config;

use ontoview_core::{
    geometry::{Point, Size},
    identifier::NodeId,
};

use crate::{
    config::{LayoutDirection, LayoutOptions},
    graph::{DiagramGraph, EdgeKind},
    layout::LayoutResult,
};

/// Default extent for a node missing from the size map.
const FALLBACK_EXTENT: f32 = 60.0;

/// Position of one node in (main, cross) axes, before direction mapping.
#[derive(Debug, Clone, Copy)]
struct AxisPosition {
    main: f32,
    cross: f32,
}

/// Size-aware layered layout engine.
pub struct LayeredEngine {
    options: LayoutOptions,
}

impl LayeredEngine {
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    /// Computes center positions for every node in the graph.
    ///
    /// `sizes` supplies the node extents used for rank stacking; during the
    /// estimate pass these are heuristic, during the remeasure pass they are
    /// the renderer's real pixel sizes.
    pub fn compute(&self, graph: &DiagramGraph, sizes: &IndexMap<NodeId, Size>) -> LayoutResult {
        if graph.nodes.is_empty() {
            return LayoutResult::default();
        }

        let node_ids: IndexMap<NodeId, u32> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id, i as u32))
            .collect();
        let edges = self.rank_edges(graph, &node_ids);

        let mut axis_positions: IndexMap<NodeId, AxisPosition> = IndexMap::new();

        if edges.is_empty() {
            debug!("Graph has no rank edges, arranging nodes in a single row");
            self.fill_row(graph.nodes.iter().map(|n| n.id), 0.0, sizes, &mut axis_positions);
            return self.finish(graph, axis_positions, false);
        }

        debug!(
            nodes = node_ids.len(),
            edges = edges.len();
            "Applying layered layout"
        );

        // One slot of cross-axis spacing has to fit the widest node.
        let vertex_spacing =
            max_extent(sizes.values().map(|s| self.cross_extent(*s))) + self.options.node_separation();

        let layouts = std::panic::catch_unwind(move || {
            let config = Config {
                minimum_length: 1,
                vertex_spacing: vertex_spacing as f64,
                ..Default::default()
            };
            rust_sugiyama::from_edges(&edges, &config)
        });

        let results = match layouts {
            Ok(results) if !results.is_empty() => results,
            Ok(_) => {
                warn!("Layered layout returned no components, keeping previous positions");
                return self.fallback(graph);
            }
            Err(err) => {
                let message = err
                    .downcast_ref::<String>()
                    .map(String::as_str)
                    .unwrap_or("unknown panic");
                warn!(message; "Layered layout panicked, keeping previous positions");
                return self.fallback(graph);
            }
        };

        let id_to_node: HashMap<u32, NodeId> =
            node_ids.iter().map(|(&node, &id)| (id, node)).collect();

        // Components are laid out side by side along the cross axis.
        let mut cross_offset = 0.0f32;
        for (coords, _, _) in &results {
            let mut component: Vec<(NodeId, f32, f32)> = Vec::new();
            for &(id, (x, y)) in coords {
                let Ok(sequential) = u32::try_from(id) else {
                    debug!(id; "Layout node id out of range");
                    continue;
                };
                let Some(&node_id) = id_to_node.get(&sequential) else {
                    debug!(id; "Layout node id has no graph counterpart");
                    continue;
                };
                component.push((node_id, x as f32, y as f32));
            }
            if component.is_empty() {
                continue;
            }

            cross_offset = self.stack_component(&component, cross_offset, sizes, &mut axis_positions)
                + self.options.node_separation();
        }

        if axis_positions.is_empty() {
            warn!("Layered layout positioned no nodes, keeping previous positions");
            return self.fallback(graph);
        }

        // Nodes untouched by any rank edge go in a row below the layout.
        let isolated: Vec<NodeId> = graph
            .nodes
            .iter()
            .map(|n| n.id)
            .filter(|id| !axis_positions.contains_key(id))
            .collect();
        if !isolated.is_empty() {
            let main_offset = max_extent(axis_positions.values().map(|p| p.main))
                + self.options.rank_separation();
            self.fill_row(isolated.into_iter(), main_offset, sizes, &mut axis_positions);
        }

        self.finish(graph, axis_positions, false)
    }

    /// Edges that participate in rank assignment.
    ///
    /// Generalization edges are excluded unless configured in; when included
    /// they are reversed so the general ranks above its specifics. Self-loops
    /// and dangling endpoints never rank.
    fn rank_edges(&self, graph: &DiagramGraph, node_ids: &IndexMap<NodeId, u32>) -> Vec<(u32, u32)> {
        let mut edges = Vec::new();
        for edge in &graph.edges {
            let reversed = match edge.kind {
                EdgeKind::Generalization if self.options.rank_generalizations() => true,
                EdgeKind::Generalization => continue,
                _ => false,
            };
            let (Some(&source), Some(&target)) =
                (node_ids.get(&edge.source), node_ids.get(&edge.target))
            else {
                continue;
            };
            if source == target {
                continue;
            }
            if reversed {
                edges.push((target, source));
            } else {
                edges.push((source, target));
            }
        }
        edges
    }

    /// Stacks one connected component: ranks derived from the raw main-axis
    /// coordinates, then re-spaced so each rank is as tall as its tallest
    /// node. Returns the cross-axis extent reached.
    fn stack_component(
        &self,
        component: &[(NodeId, f32, f32)],
        cross_offset: f32,
        sizes: &IndexMap<NodeId, Size>,
        axis_positions: &mut IndexMap<NodeId, AxisPosition>,
    ) -> f32 {
        let mut rank_keys: Vec<i64> = component.iter().map(|&(_, _, y)| y.round() as i64).collect();
        rank_keys.sort_unstable();
        rank_keys.dedup();

        // Per-rank main-axis extent drives the stacking.
        let mut rank_extents = vec![0.0f32; rank_keys.len()];
        for &(id, _, y) in component {
            let rank = rank_index(&rank_keys, y);
            let extent = self.main_extent(node_size(sizes, id));
            rank_extents[rank] = rank_extents[rank].max(extent);
        }

        let mut rank_mains = Vec::with_capacity(rank_extents.len());
        let mut running = 0.0f32;
        for extent in &rank_extents {
            rank_mains.push(running + extent / 2.0);
            running += extent + self.options.rank_separation();
        }

        let min_cross = component
            .iter()
            .map(|&(_, x, _)| x)
            .fold(f32::INFINITY, f32::min);

        let mut reached = cross_offset;
        for &(id, x, y) in component {
            let rank = rank_index(&rank_keys, y);
            let cross = cross_offset + (x - min_cross);
            reached = reached.max(cross + self.cross_extent(node_size(sizes, id)) / 2.0);
            axis_positions.insert(
                id,
                AxisPosition {
                    main: rank_mains[rank],
                    cross,
                },
            );
        }
        reached
    }

    /// Places nodes in a single row at the given main-axis offset.
    fn fill_row(
        &self,
        nodes: impl Iterator<Item = NodeId>,
        main_offset: f32,
        sizes: &IndexMap<NodeId, Size>,
        axis_positions: &mut IndexMap<NodeId, AxisPosition>,
    ) {
        let mut cross = 0.0f32;
        let mut row_extent = 0.0f32;
        for id in nodes {
            let size = node_size(sizes, id);
            let extent = self.cross_extent(size);
            row_extent = row_extent.max(self.main_extent(size));
            axis_positions.insert(
                id,
                AxisPosition {
                    main: main_offset + self.main_extent(size) / 2.0,
                    cross: cross + extent / 2.0,
                },
            );
            cross += extent + self.options.node_separation();
        }
    }

    fn finish(
        &self,
        graph: &DiagramGraph,
        axis_positions: IndexMap<NodeId, AxisPosition>,
        used_fallback: bool,
    ) -> LayoutResult {
        // Emit in graph node order regardless of component order.
        let positions = graph
            .nodes
            .iter()
            .filter_map(|node| {
                axis_positions.get(&node.id).map(|p| {
                    let point = match self.options.direction() {
                        LayoutDirection::TopDown => Point::new(p.cross, p.main),
                        LayoutDirection::LeftRight => Point::new(p.main, p.cross),
                    };
                    (node.id, point)
                })
            })
            .collect();
        LayoutResult {
            positions,
            used_fallback,
        }
    }

    /// Keeps whatever positions the graph already has.
    fn fallback(&self, graph: &DiagramGraph) -> LayoutResult {
        LayoutResult {
            positions: graph.nodes.iter().map(|n| (n.id, n.position)).collect(),
            used_fallback: true,
        }
    }

    /// Node extent along the rank-stacking axis.
    fn main_extent(&self, size: Size) -> f32 {
        match self.options.direction() {
            LayoutDirection::TopDown => size.height,
            LayoutDirection::LeftRight => size.width,
        }
    }

    /// Node extent across ranks.
    fn cross_extent(&self, size: Size) -> f32 {
        match self.options.direction() {
            LayoutDirection::TopDown => size.width,
            LayoutDirection::LeftRight => size.height,
        }
    }
}

fn node_size(sizes: &IndexMap<NodeId, Size>, id: NodeId) -> Size {
    sizes
        .get(&id)
        .copied()
        .unwrap_or(Size::new(FALLBACK_EXTENT, FALLBACK_EXTENT))
}

fn rank_index(rank_keys: &[i64], y: f32) -> usize {
    rank_keys
        .binary_search(&(y.round() as i64))
        .unwrap_or_else(|insertion| insertion.min(rank_keys.len() - 1))
}

fn max_extent(values: impl Iterator<Item = f32>) -> f32 {
    values.fold(0.0f32, f32::max)
}
