//! Heuristic node-size estimation for the first layout pass.
//!
//! Before the renderer has measured anything, sizes are derived from text
//! length and item counts with fixed per-character and per-row constants.
//! The estimates only need to be proportionate: the remeasure pass replaces
//! them with real pixel sizes.

use indexmap::IndexMap;

use ontoview_core::{geometry::Size, identifier::NodeId};

use crate::{
    config::{AttributeDisplay, ViewOptions},
    graph::{DiagramGraph, DiagramNode, NodeKind},
};

const MIN_WIDTH: f32 = 120.0;
const CHAR_WIDTH: f32 = 7.5;
const HORIZONTAL_PADDING: f32 = 24.0;
/// Header band holding the stereotype line and the name line.
const HEADER_HEIGHT: f32 = 46.0;
/// One attribute or enum-value row.
const ROW_HEIGHT: f32 = 18.0;
/// Gensets render as a small constraint diamond, not a class box.
const GENSET_SIZE: Size = Size {
    width: 90.0,
    height: 40.0,
};

/// Estimates the size of a single node.
pub fn node_size(node: &DiagramNode, options: &ViewOptions) -> Size {
    if node.kind == NodeKind::Genset {
        return GENSET_SIZE;
    }

    // The widest line is either the name or the guillemeted stereotype.
    let mut widest = node.data.label.chars().count();
    if let Some(stereotype) = &node.data.stereotype {
        widest = widest.max(stereotype.chars().count() + 2);
    }
    for attribute in &node.data.attributes {
        let mut row = attribute.name.chars().count();
        if let Some(attribute_type) = &attribute.attribute_type {
            row += attribute_type.chars().count() + 2;
        }
        widest = widest.max(row);
    }
    let width = MIN_WIDTH.max(widest as f32 * CHAR_WIDTH + HORIZONTAL_PADDING);

    let rows = match node.kind {
        NodeKind::Enum => node.data.values.len(),
        NodeKind::Class | NodeKind::Relator | NodeKind::Datatype
            if options.attribute_display() == AttributeDisplay::Shown =>
        {
            node.data.attributes.len()
        }
        _ => 0,
    };
    let height = HEADER_HEIGHT + rows as f32 * ROW_HEIGHT;

    Size::new(width, height)
}

/// Estimates sizes for every node in the graph, in node order.
pub fn estimate_sizes(graph: &DiagramGraph, options: &ViewOptions) -> IndexMap<NodeId, Size> {
    graph
        .nodes
        .iter()
        .map(|node| (node.id, node_size(node, options)))
        .collect()
}

#[cfg(test)]
mod tests {
    use ontoview_core::{geometry::Point, identifier::Namespace};

    use crate::graph::{AttributeData, NodeData};

    use super::*;

    fn class_node(label: &str, attributes: usize) -> DiagramNode {
        DiagramNode {
            id: NodeId::new(Namespace::Class, label),
            kind: NodeKind::Class,
            data: NodeData {
                label: label.to_owned(),
                attributes: (0..attributes)
                    .map(|i| AttributeData {
                        name: format!("attr{i}"),
                        attribute_type: None,
                        cardinality: None,
                    })
                    .collect(),
                ..NodeData::default()
            },
            position: Point::default(),
        }
    }

    #[test]
    fn test_height_grows_with_attribute_count() {
        let options = ViewOptions::default();
        let bare = node_size(&class_node("A", 0), &options);
        let three = node_size(&class_node("A", 3), &options);
        assert_eq!(bare.height, HEADER_HEIGHT);
        assert_eq!(three.height, HEADER_HEIGHT + 3.0 * ROW_HEIGHT);
    }

    #[test]
    fn test_hidden_attributes_do_not_reserve_space() {
        let options: ViewOptions =
            serde_json::from_str(r#"{ "attribute_display": "hover" }"#).unwrap();
        let size = node_size(&class_node("A", 5), &options);
        assert_eq!(size.height, HEADER_HEIGHT);
    }

    #[test]
    fn test_width_scales_with_name_length_above_minimum() {
        let options = ViewOptions::default();
        let short = node_size(&class_node("A", 0), &options);
        assert_eq!(short.width, MIN_WIDTH);

        let long = node_size(&class_node("AVeryLongClassNameIndeedTruly", 0), &options);
        assert!(long.width > MIN_WIDTH);
    }

    #[test]
    fn test_genset_uses_diamond_size() {
        let node = DiagramNode {
            id: NodeId::new(Namespace::Genset, "Gender"),
            kind: NodeKind::Genset,
            data: NodeData::labeled("Gender"),
            position: Point::default(),
        };
        let size = node_size(&node, &ViewOptions::default());
        assert_eq!(size.width, GENSET_SIZE.width);
        assert_eq!(size.height, GENSET_SIZE.height);
    }
}
