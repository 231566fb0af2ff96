//! The typed diagram graph: nodes, edges, and their wire payloads.
//!
//! This is the output shape of the transform. It serializes to the camelCase
//! JSON consumed by the rendering collaborator; positions are filled in by
//! the layout engine after the fact.

use indexmap::IndexMap;
use serde::Serialize;

use ontoview_core::{geometry::Point, identifier::NodeId};

pub mod builder;

/// Presentation category of a diagram node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Package,
    Class,
    /// A class with the `relator` stereotype, rendered distinctly.
    Relator,
    Datatype,
    Enum,
    Genset,
    /// Placeholder for a name referenced but not defined in this file.
    GhostClass,
}

/// Presentation category of a diagram edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Containment,
    Generalization,
    Association,
    Mediation,
    Composition,
    Aggregation,
    Dependency,
}

/// One attribute row on a class or datatype node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeData {
    pub name: String,

    #[serde(rename = "type")]
    pub attribute_type: Option<String>,

    /// Formatted per the cardinality table, `None` when undeclared.
    pub cardinality: Option<String>,
}

/// Kind-specific node payload.
///
/// A single struct rather than an enum per kind: the wire consumer dispatches
/// on the node's `kind` and reads only the fields that kind populates, and
/// `skip_serializing_if` keeps the unused ones off the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub label: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stereotype: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeData>,

    /// Enum values, in declaration order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disjoint: bool,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub complete: bool,

    /// Set on ghost nodes: the symbol is not defined in this file.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub external: bool,
}

impl NodeData {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }
}

/// Edge payload shared by all edge kinds.
///
/// Absent fields serialize as `null` rather than being omitted, matching what
/// the rendering collaborator expects for label slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    pub name: Option<String>,

    pub stereotype: Option<String>,

    pub source_cardinality: Option<String>,

    pub target_cardinality: Option<String>,

    /// Genset constraint label, on at most one generalization edge per
    /// generalization set.
    pub genset_label: Option<String>,

    /// 0-based ordinal among relation edges sharing a source node, used to
    /// offset overlapping labels. Not part of edge identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_index: Option<u32>,
}

/// A positioned diagram node.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub data: NodeData,
    pub position: Point,
}

/// A diagram edge between two node ids.
///
/// Endpoints may reference ids no emitted node carries (dangling references
/// from unresolved names); the renderer tolerates those.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramEdge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
    pub data: EdgeData,
}

/// The transform output: nodes and edges in emission order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiagramGraph {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

impl DiagramGraph {
    pub fn node(&self, id: NodeId) -> Option<&DiagramNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|node| node.id == id)
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &DiagramEdge> {
        self.edges.iter().filter(move |edge| edge.kind == kind)
    }

    /// Writes layout positions onto the matching nodes. Ids absent from the
    /// map keep their previous position.
    pub fn apply_positions(&mut self, positions: &IndexMap<NodeId, Point>) {
        for node in &mut self.nodes {
            if let Some(position) = positions.get(&node.id) {
                node.position = *position;
            }
        }
    }
}
