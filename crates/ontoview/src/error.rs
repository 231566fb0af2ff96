//! Error types for Ontoview operations.
//!
//! Most of the pipeline is deliberately infallible: the transform tolerates
//! malformed symbols and the layout engine falls back to previous positions
//! on failure. [`OntoviewError`] covers the remaining hard failures at the
//! boundaries (I/O and AST deserialization) plus diagnostics that callers
//! may want to surface.

use std::io;

use thiserror::Error;

/// The main error type for Ontoview operations.
#[derive(Debug, Error)]
pub enum OntoviewError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("AST error: {0}")]
    Ast(#[from] serde_json::Error),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Layout error: {0}")]
    Layout(String),
}
