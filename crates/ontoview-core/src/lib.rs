//! Ontoview Core Types and Definitions
//!
//! This crate provides the foundational types for the Ontoview diagram
//! pipeline. It includes:
//!
//! - **Identifiers**: String-interned, category-qualified diagram node ids
//!   ([`identifier::NodeId`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **AST**: The JSON AST model produced by the external Tonto parser
//!   ([`ast`] module)
//! - **Symbols**: The symbol table and the symbol extractor ([`symbol`]
//!   module)

pub mod ast;
pub mod geometry;
pub mod identifier;
pub mod symbol;
