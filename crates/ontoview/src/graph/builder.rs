//! Builds a [`DiagramGraph`] from a symbol table.
//!
//! The builder is total: malformed symbols degrade to skipped edges or
//! dangling endpoints, never to an error. Output order is fully determined
//! by symbol-table order, so identical input always produces an identical
//! graph.

use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};

use ontoview_core::{
    ast::Cardinality,
    geometry::Point,
    identifier::{Namespace, NodeId},
    symbol::{ClassSymbol, DatatypeSymbol, GensetSymbol, RelationSymbol, SymbolTable},
};

use crate::{
    config::ViewOptions,
    graph::{AttributeData, DiagramEdge, DiagramGraph, DiagramNode, EdgeData, EdgeKind, NodeData, NodeKind},
    resolve::ReferenceResolution,
};

/// Stereotypes rendered as UML composition (filled diamond).
const COMPOSITION_STEREOTYPES: [&str; 3] = ["componentOf", "subCollectionOf", "subQuantityOf"];

/// One-shot transformer from a symbol table to a diagram graph.
pub struct GraphBuilder<'a> {
    table: &'a SymbolTable,
    options: &'a ViewOptions,
    package_name: Option<&'a str>,
    resolution: ReferenceResolution,
    nodes: Vec<DiagramNode>,
    edges: Vec<DiagramEdge>,
    emitted_ids: IndexSet<NodeId>,
    /// Gensets whose constraint label has already been attached to an edge.
    labeled_gensets: IndexSet<String>,
    /// Relation-edge counter per source node, for label offsetting.
    relation_counts: IndexMap<NodeId, u32>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(
        table: &'a SymbolTable,
        options: &'a ViewOptions,
        package_name: Option<&'a str>,
    ) -> Self {
        Self {
            table,
            options,
            package_name,
            resolution: ReferenceResolution::resolve(table),
            nodes: Vec::new(),
            edges: Vec::new(),
            emitted_ids: IndexSet::new(),
            labeled_gensets: IndexSet::new(),
            relation_counts: IndexMap::new(),
        }
    }

    /// Runs the full transform.
    pub fn build(mut self) -> DiagramGraph {
        self.emit_package_node();
        self.emit_type_nodes();
        self.emit_ghost_nodes();
        self.emit_containment_edges();
        self.emit_generalization_edges();
        self.emit_relation_edges();
        self.emit_dependency_edges();

        debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len();
            "Diagram graph built"
        );

        DiagramGraph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }

    fn push_node(&mut self, id: NodeId, kind: NodeKind, data: NodeData) {
        if self.emitted_ids.insert(id) {
            self.nodes.push(DiagramNode {
                id,
                kind,
                data,
                position: Point::default(),
            });
        }
    }

    fn emit_package_node(&mut self) {
        if let Some(name) = self.package_name {
            let id = NodeId::new(Namespace::Package, name);
            self.push_node(id, NodeKind::Package, NodeData::labeled(name));
        }
    }

    fn emit_type_nodes(&mut self) {
        for class in self.table.classes() {
            let id = NodeId::new(Namespace::Class, &class.name);
            let kind = if class.stereotype.as_deref() == Some("relator") {
                NodeKind::Relator
            } else {
                NodeKind::Class
            };
            self.push_node(id, kind, class_data(class));
        }

        for datatype in self.table.datatypes() {
            let id = NodeId::new(Namespace::Datatype, &datatype.name);
            self.push_node(id, NodeKind::Datatype, datatype_data(datatype));
        }

        for enum_def in self.table.enums() {
            let id = NodeId::new(Namespace::Enum, &enum_def.name);
            let data = NodeData {
                label: enum_def.name.clone(),
                values: enum_def.values.clone(),
                ..NodeData::default()
            };
            self.push_node(id, NodeKind::Enum, data);
        }

        for genset in self.table.gensets() {
            let id = NodeId::new(Namespace::Genset, &genset.name);
            let data = NodeData {
                label: genset.name.clone(),
                disjoint: genset.disjoint,
                complete: genset.complete,
                ..NodeData::default()
            };
            self.push_node(id, NodeKind::Genset, data);
        }
    }

    /// Placeholder nodes for referenced-but-undefined names.
    ///
    /// Ghosts live in the class namespace, so an edge endpoint resolved to
    /// `class-<name>` lands on the ghost without a second lookup. Emission is
    /// idempotent per name.
    fn emit_ghost_nodes(&mut self) {
        if !self.options.show_external_classes() {
            return;
        }

        let external: Vec<String> = self.resolution.external_names().iter().cloned().collect();
        for name in external {
            let id = NodeId::new(Namespace::Class, &name);
            let data = NodeData {
                label: name,
                external: true,
                ..NodeData::default()
            };
            self.push_node(id, NodeKind::GhostClass, data);
        }
    }

    fn emit_containment_edges(&mut self) {
        let Some(name) = self.package_name else {
            return;
        };
        let package_id = NodeId::new(Namespace::Package, name);

        // Package contains every locally defined node, ghosts excluded.
        let members: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|node| !matches!(node.kind, NodeKind::Package | NodeKind::GhostClass))
            .map(|node| node.id)
            .collect();
        for member in members {
            self.push_containment(package_id, member);
        }

        // A genset also contains its specifics, nesting them visually.
        let mut memberships = Vec::new();
        for genset in self.table.gensets() {
            let genset_id = NodeId::new(Namespace::Genset, &genset.name);
            for specific in &genset.specifics {
                memberships.push((genset_id, self.resolve_type(specific)));
            }
        }
        for (genset_id, specific_id) in memberships {
            self.push_containment(genset_id, specific_id);
        }
    }

    fn push_containment(&mut self, source: NodeId, target: NodeId) {
        self.edges.push(DiagramEdge {
            id: format!("contain-{source}-{target}"),
            source,
            target,
            kind: EdgeKind::Containment,
            data: EdgeData::default(),
        });
    }

    fn emit_generalization_edges(&mut self) {
        let gensets_by_general: IndexMap<&str, &GensetSymbol> = self
            .table
            .gensets()
            .filter_map(|genset| genset.general.as_deref().map(|general| (general, genset)))
            .collect();

        let mut pending = Vec::new();
        for class in self.table.classes() {
            for parent in &class.parents {
                pending.push((class.name.clone(), Namespace::Class, parent.clone()));
            }
        }
        for datatype in self.table.datatypes() {
            for parent in &datatype.parents {
                pending.push((datatype.name.clone(), Namespace::Datatype, parent.clone()));
            }
        }

        for (child_name, child_namespace, parent_name) in pending {
            let source = NodeId::new(child_namespace, &child_name);
            let target = self.resolve_type(&parent_name);

            let genset_label = gensets_by_general
                .get(parent_name.as_str())
                .copied()
                .filter(|genset| genset.specifics.iter().any(|s| s == &child_name))
                .and_then(|genset| {
                    if self.labeled_gensets.insert(genset.name.clone()) {
                        Some(genset_constraint_label(genset))
                    } else {
                        None
                    }
                });

            self.edges.push(DiagramEdge {
                id: format!("gen-{source}-{target}"),
                source,
                target,
                kind: EdgeKind::Generalization,
                data: EdgeData {
                    genset_label,
                    ..EdgeData::default()
                },
            });
        }
    }

    fn emit_relation_edges(&mut self) {
        let relations: Vec<RelationSymbol> = self.table.relations().cloned().collect();
        for relation in &relations {
            let Some(source_name) = relation.source.as_deref() else {
                warn!(
                    name = relation.name.as_deref().unwrap_or("<unnamed>");
                    "Skipping relation without a source endpoint"
                );
                continue;
            };
            let Some(target_name) = relation.target.as_deref() else {
                warn!(source = source_name; "Skipping relation without a target endpoint");
                continue;
            };

            let source = self.resolve_type(source_name);
            let target = self.resolve_type(target_name);
            let kind = classify_relation(relation.stereotype.as_deref());

            let label_index = *self
                .relation_counts
                .entry(source)
                .and_modify(|count| *count += 1)
                .or_insert(0);

            self.edges.push(DiagramEdge {
                id: format!("rel-{source}-{target}-{label_index}"),
                source,
                target,
                kind,
                data: EdgeData {
                    name: relation.name.clone(),
                    stereotype: relation.stereotype.clone(),
                    source_cardinality: Cardinality::format_opt(
                        relation.source_cardinality.as_ref(),
                    ),
                    target_cardinality: Cardinality::format_opt(
                        relation.target_cardinality.as_ref(),
                    ),
                    label_index: Some(label_index),
                    ..EdgeData::default()
                },
            });
        }
    }

    /// A class whose attribute is typed by a local enum depends on it.
    fn emit_dependency_edges(&mut self) {
        let mut pending = Vec::new();
        for class in self.table.classes() {
            for attribute in &class.attributes {
                if let Some(type_name) = attribute.attribute_type.as_deref() {
                    if self.table.has_enum(type_name) {
                        pending.push((
                            NodeId::new(Namespace::Class, &class.name),
                            NodeId::new(Namespace::Enum, type_name),
                        ));
                    }
                }
            }
        }

        for (source, target) in pending {
            self.edges.push(DiagramEdge {
                id: format!("dep-{source}-{target}"),
                source,
                target,
                kind: EdgeKind::Dependency,
                data: EdgeData::default(),
            });
        }
    }

    /// Resolves a type name to a node id: local class first, then local
    /// datatype, then the class namespace (where ghosts live, and where a
    /// dangling reference harmlessly points when ghosts are disabled).
    fn resolve_type(&self, name: &str) -> NodeId {
        if self.table.has_class(name) {
            NodeId::new(Namespace::Class, name)
        } else if self.table.has_datatype(name) {
            NodeId::new(Namespace::Datatype, name)
        } else {
            NodeId::new(Namespace::Class, name)
        }
    }
}

fn class_data(class: &ClassSymbol) -> NodeData {
    NodeData {
        label: class.name.clone(),
        stereotype: class.stereotype.clone(),
        attributes: class.attributes.iter().map(attribute_data).collect(),
        ..NodeData::default()
    }
}

fn datatype_data(datatype: &DatatypeSymbol) -> NodeData {
    NodeData {
        label: datatype.name.clone(),
        stereotype: datatype.stereotype.clone(),
        attributes: datatype.attributes.iter().map(attribute_data).collect(),
        ..NodeData::default()
    }
}

fn attribute_data(attribute: &ontoview_core::ast::Attribute) -> AttributeData {
    AttributeData {
        name: attribute.name.clone(),
        attribute_type: attribute.attribute_type.clone(),
        cardinality: Cardinality::format_opt(attribute.cardinality.as_ref()),
    }
}

/// Maps a relation stereotype to its presentation edge kind. Unrecognized and
/// absent stereotypes fall back to a plain association.
fn classify_relation(stereotype: Option<&str>) -> EdgeKind {
    match stereotype {
        Some(s) if COMPOSITION_STEREOTYPES.contains(&s) => EdgeKind::Composition,
        Some("memberOf") => EdgeKind::Aggregation,
        Some("mediation") => EdgeKind::Mediation,
        _ => EdgeKind::Association,
    }
}

/// The constraint label for a genset, e.g. `{disjoint, complete}`. When a
/// genset declares neither constraint, its name labels the edge instead.
fn genset_constraint_label(genset: &GensetSymbol) -> String {
    let mut parts = Vec::new();
    if genset.disjoint {
        parts.push("disjoint");
    }
    if genset.complete {
        parts.push("complete");
    }
    if parts.is_empty() {
        genset.name.clone()
    } else {
        format!("{{{}}}", parts.join(", "))
    }
}
