//! Category-qualified diagram node identifiers backed by string interning.
//!
//! Every node in a diagram graph is addressed by a [`NodeId`] of the form
//! `"<kind>-<name>"`, e.g. `class-Person` or `enum-Color`. Ids are interned
//! so they are cheap to copy, hash, and compare, and re-running a transform
//! on the same input always yields the same ids.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use serde::{Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for diagram node ids.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> &'static Mutex<DefaultStringInterner> {
    INTERNER.get_or_init(|| Mutex::new(DefaultStringInterner::new()))
}

/// The namespace a symbol name belongs to.
///
/// Names are unique within a namespace per file; cross-namespace collisions
/// are permitted (a class and a datatype may share a name), so resolution is
/// always by namespace-qualified id. Ghost placeholders live in the class
/// namespace so that edges referencing an external name resolve to them
/// without a second lookup pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Package,
    Class,
    Datatype,
    Enum,
    Genset,
}

impl Namespace {
    /// The id prefix for this namespace.
    pub fn prefix(self) -> &'static str {
        match self {
            Namespace::Package => "package",
            Namespace::Class => "class",
            Namespace::Datatype => "datatype",
            Namespace::Enum => "enum",
            Namespace::Genset => "genset",
        }
    }
}

/// An interned, namespace-qualified diagram node identifier.
///
/// `NodeId` is injective over (namespace, name) pairs: two ids are equal
/// exactly when both the namespace and the name match.
///
/// # Examples
///
/// ```
/// use ontoview_core::identifier::{Namespace, NodeId};
///
/// let person = NodeId::new(Namespace::Class, "Person");
/// assert_eq!(person, "class-Person");
///
/// let color = NodeId::new(Namespace::Enum, "Color");
/// assert_ne!(person, color);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(DefaultSymbol);

impl NodeId {
    /// Creates a namespace-qualified id for the given symbol name.
    pub fn new(namespace: Namespace, name: &str) -> Self {
        let qualified = format!("{}-{name}", namespace.prefix());
        Self::from_qualified(&qualified)
    }

    /// Interns an already-qualified id string such as `"class-Person"`.
    ///
    /// This is how unresolved edge endpoints are represented: the id is
    /// synthesized even when no node with that id was emitted, and the
    /// rendering collaborator tolerates the dangling reference.
    pub fn from_qualified(qualified: &str) -> Self {
        let mut interner = interner().lock().expect("interner lock poisoned");
        Self(interner.get_or_intern(qualified))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner().lock().expect("interner lock poisoned");
        let value = interner
            .resolve(self.0)
            .expect("symbol missing from interner");
        write!(f, "{value}")
    }
}

impl Serialize for NodeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        let interner = interner().lock().expect("interner lock poisoned");
        let value = interner
            .resolve(self.0)
            .expect("symbol missing from interner");
        value == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_format() {
        assert_eq!(NodeId::new(Namespace::Class, "Person"), "class-Person");
        assert_eq!(NodeId::new(Namespace::Enum, "Color"), "enum-Color");
        assert_eq!(NodeId::new(Namespace::Package, "Core"), "package-Core");
        assert_eq!(NodeId::new(Namespace::Genset, "G1"), "genset-G1");
        assert_eq!(NodeId::new(Namespace::Datatype, "Money"), "datatype-Money");
    }

    #[test]
    fn test_injective_over_namespace_and_name() {
        let class = NodeId::new(Namespace::Class, "Money");
        let datatype = NodeId::new(Namespace::Datatype, "Money");
        assert_ne!(class, datatype);

        // Same pair always interns to the same id.
        assert_eq!(class, NodeId::new(Namespace::Class, "Money"));
    }

    #[test]
    fn test_from_qualified_matches_new() {
        let a = NodeId::new(Namespace::Class, "Person");
        let b = NodeId::from_qualified("class-Person");
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_map_key() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(NodeId::new(Namespace::Class, "A"), 1);
        map.insert(NodeId::new(Namespace::Class, "B"), 2);

        assert_eq!(map.get(&NodeId::new(Namespace::Class, "A")), Some(&1));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_serialize_as_string() {
        let id = NodeId::new(Namespace::Class, "Person");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"class-Person\"");
    }
}
