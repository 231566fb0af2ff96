//! Edge attachment-side selection and routing waypoints.
//!
//! Routing is purely geometric: given the positioned endpoints of an edge,
//! pick which node sides the edge should attach to, and for material
//! associations between same-rank nodes, arc over the top so the edge does
//! not cut through siblings.

use ontoview_core::geometry::{Point, Size};

use crate::graph::DiagramEdge;

/// How much one displacement axis must dominate the other before it decides
/// the attachment sides.
const DOMINANCE_RATIO: f32 = 1.2;

/// Endpoints within this vertical distance count as same-rank for the
/// material-association arc.
const LEVEL_TOLERANCE: f32 = 24.0;

/// Clearance above the taller endpoint for the arc.
const ARC_CLEARANCE: f32 = 40.0;

/// A side of a node's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// The routing decision for one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRoute {
    pub source_side: Side,
    pub target_side: Side,
    /// Intermediate points, empty for straight connections.
    pub waypoints: Vec<Point>,
}

impl EdgeRoute {
    fn straight(source_side: Side, target_side: Side) -> Self {
        Self {
            source_side,
            target_side,
            waypoints: Vec::new(),
        }
    }
}

/// Picks attachment sides for an edge between two positioned nodes.
///
/// When the horizontal displacement dominates the vertical one by more than
/// [`DOMINANCE_RATIO`] the edge leaves sideways; the symmetric rule applies
/// vertically. In the ambiguous zone in between the declared defaults win.
/// Material associations between near-level endpoints instead arc over the
/// top of both nodes.
pub fn route_edge(
    edge: &DiagramEdge,
    source_position: Point,
    source_size: Size,
    target_position: Point,
    target_size: Size,
    defaults: (Side, Side),
) -> EdgeRoute {
    let (dx, dy) = source_position.displacement(target_position);

    if edge.data.stereotype.as_deref() == Some("material") && dy <= LEVEL_TOLERANCE {
        let source_top = source_position.y - source_size.height / 2.0;
        let target_top = target_position.y - target_size.height / 2.0;
        let arc_y = source_top.min(target_top) - ARC_CLEARANCE;
        return EdgeRoute {
            source_side: Side::Top,
            target_side: Side::Top,
            waypoints: vec![
                Point::new(source_position.x, arc_y),
                Point::new(target_position.x, arc_y),
            ],
        };
    }

    if dx > dy * DOMINANCE_RATIO {
        if target_position.x >= source_position.x {
            EdgeRoute::straight(Side::Right, Side::Left)
        } else {
            EdgeRoute::straight(Side::Left, Side::Right)
        }
    } else if dy > dx * DOMINANCE_RATIO {
        if target_position.y >= source_position.y {
            EdgeRoute::straight(Side::Bottom, Side::Top)
        } else {
            EdgeRoute::straight(Side::Top, Side::Bottom)
        }
    } else {
        EdgeRoute::straight(defaults.0, defaults.1)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use ontoview_core::identifier::{Namespace, NodeId};

    use crate::graph::{EdgeData, EdgeKind};

    use super::*;

    fn association(stereotype: Option<&str>) -> DiagramEdge {
        DiagramEdge {
            id: "test-edge".to_owned(),
            source: NodeId::new(Namespace::Class, "A"),
            target: NodeId::new(Namespace::Class, "B"),
            kind: EdgeKind::Association,
            data: EdgeData {
                stereotype: stereotype.map(str::to_owned),
                ..EdgeData::default()
            },
        }
    }

    const SIZE: Size = Size {
        width: 120.0,
        height: 60.0,
    };

    const DEFAULTS: (Side, Side) = (Side::Bottom, Side::Top);

    #[test]
    fn test_horizontal_dominance_picks_side_attachment() {
        let route = route_edge(
            &association(None),
            Point::new(0.0, 0.0),
            SIZE,
            Point::new(300.0, 50.0),
            SIZE,
            DEFAULTS,
        );
        assert_eq!(route.source_side, Side::Right);
        assert_eq!(route.target_side, Side::Left);
        assert!(route.waypoints.is_empty());
    }

    #[test]
    fn test_vertical_dominance_picks_top_bottom() {
        let route = route_edge(
            &association(None),
            Point::new(0.0, 0.0),
            SIZE,
            Point::new(50.0, 300.0),
            SIZE,
            DEFAULTS,
        );
        assert_eq!(route.source_side, Side::Bottom);
        assert_eq!(route.target_side, Side::Top);
    }

    #[test]
    fn test_leftward_target_flips_sides() {
        let route = route_edge(
            &association(None),
            Point::new(300.0, 0.0),
            SIZE,
            Point::new(0.0, 50.0),
            SIZE,
            DEFAULTS,
        );
        assert_eq!(route.source_side, Side::Left);
        assert_eq!(route.target_side, Side::Right);
    }

    #[test]
    fn test_ambiguous_displacement_uses_defaults() {
        // 100 vs 90: neither axis dominates by 1.2x
        let route = route_edge(
            &association(None),
            Point::new(0.0, 0.0),
            SIZE,
            Point::new(100.0, 90.0),
            SIZE,
            (Side::Right, Side::Left),
        );
        assert_eq!(route.source_side, Side::Right);
        assert_eq!(route.target_side, Side::Left);
    }

    #[test]
    fn test_material_same_rank_arcs_over_the_top() {
        let route = route_edge(
            &association(Some("material")),
            Point::new(0.0, 100.0),
            SIZE,
            Point::new(400.0, 110.0),
            SIZE,
            DEFAULTS,
        );
        assert_eq!(route.source_side, Side::Top);
        assert_eq!(route.target_side, Side::Top);
        assert_eq!(route.waypoints.len(), 2);
        // The arc clears the top of the taller endpoint by the fixed margin
        let expected_y = (100.0 - SIZE.height / 2.0) - ARC_CLEARANCE;
        assert_approx_eq!(f32, route.waypoints[0].y, expected_y);
        assert_approx_eq!(f32, route.waypoints[1].y, expected_y);
        assert_approx_eq!(f32, route.waypoints[0].x, 0.0);
        assert_approx_eq!(f32, route.waypoints[1].x, 400.0);
    }

    #[test]
    fn test_material_across_ranks_routes_normally() {
        let route = route_edge(
            &association(Some("material")),
            Point::new(0.0, 0.0),
            SIZE,
            Point::new(50.0, 300.0),
            SIZE,
            DEFAULTS,
        );
        assert_eq!(route.source_side, Side::Bottom);
        assert!(route.waypoints.is_empty());
    }
}
