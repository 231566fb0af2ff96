//! Symbol table for a single Tonto source file.
//!
//! The symbol extractor groups a file's definitions into classes, datatypes,
//! enums, gensets, and relations. It is used as a fallback when the richer
//! semantic-analysis symbol table is unavailable; when that table is
//! available, [`SymbolTable::from_semantic`] ingests it directly.
//!
//! Extraction is pure and total: any AST, including an empty one, produces a
//! valid (possibly empty) table. Unknown node kinds are skipped and recorded
//! as non-fatal diagnostics.

use indexmap::IndexMap;
use log::warn;
use serde::Deserialize;

use crate::ast::{
    Attribute, BodyItem, Cardinality, ClassDefinition, ContentItem, DatatypeDefinition,
    EnumDefinition, GensetDefinition, RelationDecl, SourceFile,
};

/// A class definition as seen by the rest of the pipeline.
#[derive(Debug, Clone)]
pub struct ClassSymbol {
    pub name: String,
    pub stereotype: Option<String>,
    /// Parent names from the specialization clause, in declaration order.
    pub parents: Vec<String>,
    pub attributes: Vec<Attribute>,
}

/// A datatype definition; structurally a class without internal relations.
#[derive(Debug, Clone)]
pub struct DatatypeSymbol {
    pub name: String,
    pub stereotype: Option<String>,
    pub parents: Vec<String>,
    pub attributes: Vec<Attribute>,
}

/// An enum definition with its declared values.
#[derive(Debug, Clone)]
pub struct EnumSymbol {
    pub name: String,
    pub values: Vec<String>,
}

/// A generalization set with its constraints.
#[derive(Debug, Clone)]
pub struct GensetSymbol {
    pub name: String,
    pub disjoint: bool,
    pub complete: bool,
    pub general: Option<String>,
    pub specifics: Vec<String>,
}

/// A relation with resolved endpoints.
///
/// Internal relations carry their owning class as `source`; external
/// relations carry their declared first end. Either endpoint may be absent
/// on malformed input and is then simply not resolvable.
#[derive(Debug, Clone)]
pub struct RelationSymbol {
    pub name: Option<String>,
    pub stereotype: Option<String>,
    pub source: Option<String>,
    pub target: Option<String>,
    pub source_cardinality: Option<Cardinality>,
    pub target_cardinality: Option<Cardinality>,
}

impl RelationSymbol {
    fn from_decl(decl: &RelationDecl, owning_class: Option<&str>) -> Self {
        Self {
            name: decl.relation_name.clone(),
            stereotype: decl.relation_stereotype.clone(),
            source: owning_class
                .map(str::to_owned)
                .or_else(|| decl.source_name().map(str::to_owned)),
            target: decl.target_name().map(str::to_owned),
            source_cardinality: decl.source_cardinality().cloned(),
            target_cardinality: decl.target_cardinality().cloned(),
        }
    }
}

/// A non-fatal note about an AST node the extractor skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionDiagnostic {
    /// The unrecognized `node_type` tag.
    pub node_type: String,
    /// Where the node appeared: file scope or a class body.
    pub context: String,
}

/// The richer symbol table shape produced by the semantic analyzer, with
/// categories pre-extracted and internal relations pre-qualified with
/// `source_class`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SemanticSymbols {
    #[serde(default)]
    pub classes: Vec<ClassDefinition>,

    #[serde(default)]
    pub datatypes: Vec<DatatypeDefinition>,

    #[serde(default)]
    pub enums: Vec<EnumDefinition>,

    #[serde(default)]
    pub gensets: Vec<GensetDefinition>,

    #[serde(default)]
    pub relations: Vec<RelationDecl>,
}

/// Symbol table grouping a file's definitions by category.
///
/// Names are unique within a category; a later definition with the same name
/// replaces the earlier one. Cross-category collisions are allowed and
/// resolved downstream by namespace-qualified ids.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    classes: IndexMap<String, ClassSymbol>,
    datatypes: IndexMap<String, DatatypeSymbol>,
    enums: IndexMap<String, EnumSymbol>,
    gensets: IndexMap<String, GensetSymbol>,
    relations: Vec<RelationSymbol>,
    diagnostics: Vec<ExtractionDiagnostic>,
}

impl SymbolTable {
    /// Extracts a symbol table from a parsed file.
    ///
    /// Internal relations declared inside a class body are appended to the
    /// relation list tagged with the owning class as their source. Unknown
    /// node kinds are skipped, logged, and recorded in
    /// [`SymbolTable::diagnostics`].
    pub fn from_source(file: &SourceFile) -> Self {
        let mut table = SymbolTable::default();

        for item in &file.content {
            match item {
                ContentItem::Class(class) => table.add_class(class),
                ContentItem::Datatype(datatype) => table.add_datatype(datatype),
                ContentItem::Enum(enum_def) => table.add_enum(enum_def),
                ContentItem::Genset(genset) => table.add_genset(genset),
                ContentItem::ExternalRelation(relation) => table
                    .relations
                    .push(RelationSymbol::from_decl(relation, None)),
                ContentItem::Unknown { node_type, .. } => {
                    table.skip_unknown(node_type, "file scope");
                }
            }
        }

        table
    }

    /// Builds a table from the semantic analyzer's pre-extracted symbols.
    ///
    /// The analyzer's relation list already contains internal relations
    /// qualified with `source_class`, so class bodies are not re-walked for
    /// relations here.
    pub fn from_semantic(symbols: &SemanticSymbols) -> Self {
        let mut table = SymbolTable::default();

        for class in &symbols.classes {
            table.insert_class_symbol(class);
        }
        for datatype in &symbols.datatypes {
            table.add_datatype(datatype);
        }
        for enum_def in &symbols.enums {
            table.add_enum(enum_def);
        }
        for genset in &symbols.gensets {
            table.add_genset(genset);
        }
        for relation in &symbols.relations {
            table
                .relations
                .push(RelationSymbol::from_decl(relation, None));
        }

        table
    }

    fn add_class(&mut self, class: &ClassDefinition) {
        self.insert_class_symbol(class);

        for item in &class.body {
            match item {
                BodyItem::Relation(relation) => self
                    .relations
                    .push(RelationSymbol::from_decl(relation, Some(&class.class_name))),
                BodyItem::Attribute(_) => {}
                BodyItem::Unknown { node_type, .. } => {
                    let context = format!("body of class {}", class.class_name);
                    self.skip_unknown(node_type, &context);
                }
            }
        }
    }

    fn insert_class_symbol(&mut self, class: &ClassDefinition) {
        self.classes.insert(
            class.class_name.clone(),
            ClassSymbol {
                name: class.class_name.clone(),
                stereotype: class.class_stereotype.clone(),
                parents: class.parents().to_vec(),
                attributes: class.attributes().cloned().collect(),
            },
        );
    }

    fn add_datatype(&mut self, datatype: &DatatypeDefinition) {
        self.datatypes.insert(
            datatype.datatype_name.clone(),
            DatatypeSymbol {
                name: datatype.datatype_name.clone(),
                stereotype: datatype.datatype_stereotype.clone(),
                parents: datatype.parents().to_vec(),
                attributes: datatype.attributes().cloned().collect(),
            },
        );
    }

    fn add_enum(&mut self, enum_def: &EnumDefinition) {
        self.enums.insert(
            enum_def.enum_name.clone(),
            EnumSymbol {
                name: enum_def.enum_name.clone(),
                values: enum_def.values.clone(),
            },
        );
    }

    fn add_genset(&mut self, genset: &GensetDefinition) {
        self.gensets.insert(
            genset.genset_name.clone(),
            GensetSymbol {
                name: genset.genset_name.clone(),
                disjoint: genset.disjoint,
                complete: genset.complete,
                general: genset.general.clone(),
                specifics: genset.specifics.clone(),
            },
        );
    }

    fn skip_unknown(&mut self, node_type: &str, context: &str) {
        warn!(node_type, context; "Skipping unknown AST node kind");
        self.diagnostics.push(ExtractionDiagnostic {
            node_type: node_type.to_owned(),
            context: context.to_owned(),
        });
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassSymbol> {
        self.classes.values()
    }

    pub fn datatypes(&self) -> impl Iterator<Item = &DatatypeSymbol> {
        self.datatypes.values()
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumSymbol> {
        self.enums.values()
    }

    pub fn gensets(&self) -> impl Iterator<Item = &GensetSymbol> {
        self.gensets.values()
    }

    pub fn relations(&self) -> impl Iterator<Item = &RelationSymbol> {
        self.relations.iter()
    }

    /// Diagnostics recorded while skipping unknown AST nodes.
    pub fn diagnostics(&self) -> &[ExtractionDiagnostic] {
        &self.diagnostics
    }

    pub fn class(&self, name: &str) -> Option<&ClassSymbol> {
        self.classes.get(name)
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn has_datatype(&self, name: &str) -> bool {
        self.datatypes.contains_key(name)
    }

    pub fn has_enum(&self, name: &str) -> bool {
        self.enums.contains_key(name)
    }

    /// All classes carrying the given stereotype.
    pub fn classes_by_stereotype<'a>(
        &'a self,
        stereotype: &'a str,
    ) -> impl Iterator<Item = &'a ClassSymbol> {
        self.classes
            .values()
            .filter(move |class| class.stereotype.as_deref() == Some(stereotype))
    }

    /// All classes that list the given class among their parents.
    pub fn children_of<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a ClassSymbol> {
        self.classes
            .values()
            .filter(move |class| class.parents.iter().any(|candidate| candidate == parent))
    }

    /// All gensets whose general is the given class.
    pub fn gensets_for_general<'a>(
        &'a self,
        general: &'a str,
    ) -> impl Iterator<Item = &'a GensetSymbol> {
        self.gensets
            .values()
            .filter(move |genset| genset.general.as_deref() == Some(general))
    }
}
