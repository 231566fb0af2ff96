//! The JSON AST model handed over by the external Tonto parser.
//!
//! The parser serializes a `node_type`-discriminated tree:
//! `tonto_file → package_declaration, import_statement[], content[]` where
//! content items are class, datatype, enum, and genset definitions plus
//! file-scope external relations. This module deserializes that tree into a
//! closed tagged union. Node kinds this crate does not know about land in
//! [`ContentItem::Unknown`] with their raw payload kept for diagnostics;
//! deserialization never fails because of an unknown kind.
//!
//! All optional fields tolerate both absence and explicit `null`, and
//! collection fields default to empty. A malformed optional field is never
//! a transform-stopping error.

use serde::{Deserialize, Deserializer, de};
use std::fmt;

/// Deserializes `null` as `T::default()` so collection fields tolerate
/// explicit nulls from the parser.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A parsed Tonto source file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceFile {
    #[serde(default)]
    pub package: Option<PackageDeclaration>,

    #[serde(default, deserialize_with = "null_default")]
    pub imports: Vec<ImportStatement>,

    #[serde(default, deserialize_with = "null_default")]
    pub content: Vec<ContentItem>,
}

/// The single package declaration of a file.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageDeclaration {
    pub package_name: String,
}

/// An `import <module>` statement.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportStatement {
    pub module_name: String,
}

/// A top-level content item, discriminated by `node_type`.
///
/// The `Unknown` variant carries the raw payload so the symbol extractor can
/// report what it skipped without aborting.
#[derive(Debug, Clone)]
pub enum ContentItem {
    Class(ClassDefinition),
    Datatype(DatatypeDefinition),
    Enum(EnumDefinition),
    Genset(GensetDefinition),
    ExternalRelation(RelationDecl),
    Unknown {
        node_type: String,
        payload: serde_json::Value,
    },
}

impl<'de> Deserialize<'de> for ContentItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let node_type = value
            .get("node_type")
            .and_then(|tag| tag.as_str())
            .unwrap_or_default()
            .to_owned();

        let item = match node_type.as_str() {
            "class_definition" => serde_json::from_value(value).map(ContentItem::Class),
            "datatype_definition" => serde_json::from_value(value).map(ContentItem::Datatype),
            "enum_definition" => serde_json::from_value(value).map(ContentItem::Enum),
            "genset_definition" => serde_json::from_value(value).map(ContentItem::Genset),
            "external_relation" => serde_json::from_value(value).map(ContentItem::ExternalRelation),
            _ => {
                return Ok(ContentItem::Unknown {
                    node_type,
                    payload: value,
                });
            }
        };

        item.map_err(de::Error::custom)
    }
}

/// A class definition with stereotype, parents, and body.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassDefinition {
    pub class_name: String,

    #[serde(default)]
    pub class_stereotype: Option<String>,

    #[serde(default)]
    pub specialization: Option<Specialization>,

    #[serde(default, deserialize_with = "null_default")]
    pub body: Vec<BodyItem>,
}

impl ClassDefinition {
    /// Parent names from the specialization clause, empty when absent.
    pub fn parents(&self) -> &[String] {
        self.specialization
            .as_ref()
            .map(|spec| spec.parents.as_slice())
            .unwrap_or_default()
    }

    /// Attributes declared in the class body.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.body.iter().filter_map(|item| match item {
            BodyItem::Attribute(attribute) => Some(attribute),
            _ => None,
        })
    }

    /// Relations declared inside the class body.
    pub fn internal_relations(&self) -> impl Iterator<Item = &RelationDecl> {
        self.body.iter().filter_map(|item| match item {
            BodyItem::Relation(relation) => Some(relation),
            _ => None,
        })
    }
}

/// A datatype definition; shaped like a class without internal relations.
#[derive(Debug, Clone, Deserialize)]
pub struct DatatypeDefinition {
    pub datatype_name: String,

    #[serde(default)]
    pub datatype_stereotype: Option<String>,

    #[serde(default)]
    pub specialization: Option<Specialization>,

    #[serde(default, deserialize_with = "null_default")]
    pub body: Vec<BodyItem>,
}

impl DatatypeDefinition {
    pub fn parents(&self) -> &[String] {
        self.specialization
            .as_ref()
            .map(|spec| spec.parents.as_slice())
            .unwrap_or_default()
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.body.iter().filter_map(|item| match item {
            BodyItem::Attribute(attribute) => Some(attribute),
            _ => None,
        })
    }
}

/// An enum definition with its value list.
#[derive(Debug, Clone, Deserialize)]
pub struct EnumDefinition {
    pub enum_name: String,

    #[serde(default, deserialize_with = "null_default")]
    pub values: Vec<String>,
}

/// A generalization set grouping specializations under one general class.
#[derive(Debug, Clone, Deserialize)]
pub struct GensetDefinition {
    pub genset_name: String,

    #[serde(default)]
    pub disjoint: bool,

    #[serde(default)]
    pub complete: bool,

    #[serde(default)]
    pub general: Option<String>,

    #[serde(default, deserialize_with = "null_default")]
    pub specifics: Vec<String>,
}

/// An item inside a class or datatype body, discriminated by `node_type`.
#[derive(Debug, Clone)]
pub enum BodyItem {
    Attribute(Attribute),
    Relation(RelationDecl),
    Unknown {
        node_type: String,
        payload: serde_json::Value,
    },
}

impl<'de> Deserialize<'de> for BodyItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let node_type = value
            .get("node_type")
            .and_then(|tag| tag.as_str())
            .unwrap_or_default()
            .to_owned();

        let item = match node_type.as_str() {
            "attribute" => serde_json::from_value(value).map(BodyItem::Attribute),
            "internal_relation" => serde_json::from_value(value).map(BodyItem::Relation),
            _ => {
                return Ok(BodyItem::Unknown {
                    node_type,
                    payload: value,
                });
            }
        };

        item.map_err(de::Error::custom)
    }
}

/// An attribute declaration `name: Type`.
#[derive(Debug, Clone, Deserialize)]
pub struct Attribute {
    pub name: String,

    #[serde(default, rename = "type")]
    pub attribute_type: Option<String>,

    #[serde(default)]
    pub cardinality: Option<Cardinality>,
}

/// A specialization clause listing parent names in declaration order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Specialization {
    #[serde(default, deserialize_with = "null_default")]
    pub parents: Vec<String>,
}

/// A relation declaration.
///
/// This one shape covers all three sources of relations: internal relations
/// (declared in a class body, qualified by the extractor with their owning
/// class), file-scope external relations (explicit two-ended), and relations
/// from a pre-extracted semantic symbol table (already carrying
/// `source_class`). Fields that a given source does not produce stay `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelationDecl {
    #[serde(default)]
    pub relation_name: Option<String>,

    #[serde(default)]
    pub relation_stereotype: Option<String>,

    #[serde(default)]
    pub source_class: Option<String>,

    #[serde(default)]
    pub first_end: Option<String>,

    #[serde(default)]
    pub second_end: Option<String>,

    #[serde(default)]
    pub target: Option<String>,

    #[serde(default)]
    pub first_cardinality: Option<Cardinality>,

    #[serde(default)]
    pub second_cardinality: Option<Cardinality>,

    #[serde(default)]
    pub cardinality: Option<Cardinality>,
}

impl RelationDecl {
    /// The source endpoint name: the owning class for internal relations,
    /// the first end for external ones.
    pub fn source_name(&self) -> Option<&str> {
        self.source_class.as_deref().or(self.first_end.as_deref())
    }

    /// The target endpoint name: `target` for internal relations, the
    /// second end for external ones.
    pub fn target_name(&self) -> Option<&str> {
        self.target.as_deref().or(self.second_end.as_deref())
    }

    pub fn source_cardinality(&self) -> Option<&Cardinality> {
        self.first_cardinality.as_ref()
    }

    pub fn target_cardinality(&self) -> Option<&Cardinality> {
        self.second_cardinality
            .as_ref()
            .or(self.cardinality.as_ref())
    }
}

/// One bound of a cardinality: a number or a symbol such as `"*"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CardinalityBound {
    Number(u64),
    Symbol(String),
}

impl fmt::Display for CardinalityBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardinalityBound::Number(n) => write!(f, "{n}"),
            CardinalityBound::Symbol(s) => write!(f, "{s}"),
        }
    }
}

/// A `(min, max)` cardinality pair; either bound may be absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Cardinality {
    #[serde(default)]
    pub min: Option<CardinalityBound>,

    #[serde(default)]
    pub max: Option<CardinalityBound>,
}

impl Cardinality {
    /// Formats the pair for display: `"{min}"` when min == max, otherwise
    /// `"{min}..{max}"`. Unset bounds fall back to `"0"` / `"*"`.
    pub fn format(&self) -> String {
        let min = self
            .min
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "0".to_owned());
        let max = self
            .max
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "*".to_owned());

        if min == max { min } else { format!("{min}..{max}") }
    }

    /// Formats an optional cardinality; a missing cardinality formats as
    /// `None` and is rendered as `null` on the wire.
    pub fn format_opt(cardinality: Option<&Cardinality>) -> Option<String> {
        cardinality.map(Cardinality::format)
    }
}
