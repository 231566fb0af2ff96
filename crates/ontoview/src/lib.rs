//! Ontoview transforms Tonto ontology sources into positioned diagram
//! graphs.
//!
//! The pipeline has three stages: symbol extraction (in `ontoview-core`),
//! the graph transform turning symbols into typed nodes and edges, and the
//! two-pass hierarchical layout assigning positions. [`DiagramTransformer`]
//! is the entry point for the transform; [`session::LayoutSession`] drives
//! layout across edits.
//!
//! # Examples
//!
//! ```
//! use ontoview::DiagramTransformer;
//! use ontoview::ast::SourceFile;
//!
//! let file: SourceFile = serde_json::from_str(
//!     r#"{
//!         "package": { "node_type": "package_declaration", "package_name": "Hospital" },
//!         "content": [
//!             { "node_type": "class_definition", "class_name": "Person", "class_stereotype": "kind" }
//!         ]
//!     }"#,
//! )
//! .unwrap();
//!
//! let transformer = DiagramTransformer::default();
//! let graph = transformer.transform_source(&file);
//! assert_eq!(graph.nodes.len(), 2); // package + class
//! ```

pub mod config;
mod error;
pub mod graph;
pub mod layout;
mod resolve;
pub mod session;

pub use error::OntoviewError;
pub use resolve::ReferenceResolution;

// Re-export the core data model so callers need only one crate.
pub use ontoview_core::{ast, geometry, identifier, symbol};

use ast::SourceFile;
use config::ViewOptions;
use graph::{DiagramGraph, builder::GraphBuilder};
use session::LayoutSession;
use symbol::SymbolTable;

/// Transforms symbol tables into diagram graphs under a fixed set of view
/// options.
///
/// The transform is pure and deterministic: the same input and options
/// always yield a byte-identical graph.
#[derive(Debug, Clone, Default)]
pub struct DiagramTransformer {
    options: ViewOptions,
}

impl DiagramTransformer {
    pub fn new(options: ViewOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    /// Extracts symbols from a parsed source file and transforms them.
    pub fn transform_source(&self, file: &SourceFile) -> DiagramGraph {
        let table = SymbolTable::from_source(file);
        let package = file.package.as_ref().map(|p| p.package_name.as_str());
        self.transform(&table, package)
    }

    /// Transforms a symbol table into a diagram graph.
    ///
    /// `package` names the enclosing package node; `None` omits it, as for
    /// a file without a package declaration.
    pub fn transform(&self, table: &SymbolTable, package: Option<&str>) -> DiagramGraph {
        GraphBuilder::new(table, &self.options, package).build()
    }

    /// Starts a layout session sharing this transformer's options.
    pub fn session(&self) -> LayoutSession {
        LayoutSession::new(self.options.clone())
    }
}
