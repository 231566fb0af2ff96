//! Reference resolution: which names are defined locally and which are
//! imported-but-undefined.
//!
//! External names are the ones that need placeholder (ghost) nodes. The
//! symbol categories are walked in a fixed order (specialization parents,
//! then relation endpoints, then genset generals/specifics) so the
//! encounter order of external names is reproducible across runs on
//! identical input.

use indexmap::IndexSet;

use ontoview_core::symbol::SymbolTable;

/// The local and external name sets for one symbol table.
#[derive(Debug, Clone, Default)]
pub struct ReferenceResolution {
    local_names: IndexSet<String>,
    external_names: IndexSet<String>,
}

impl ReferenceResolution {
    /// Computes both name sets for the given table.
    pub fn resolve(table: &SymbolTable) -> Self {
        let mut local_names = IndexSet::new();
        for class in table.classes() {
            local_names.insert(class.name.clone());
        }
        for datatype in table.datatypes() {
            local_names.insert(datatype.name.clone());
        }
        for enum_def in table.enums() {
            local_names.insert(enum_def.name.clone());
        }

        let mut resolution = Self {
            local_names,
            external_names: IndexSet::new(),
        };

        // Fixed category order keeps ghost emission order stable.
        for class in table.classes() {
            for parent in &class.parents {
                resolution.note_reference(parent);
            }
        }
        for datatype in table.datatypes() {
            for parent in &datatype.parents {
                resolution.note_reference(parent);
            }
        }
        for relation in table.relations() {
            if let Some(source) = relation.source.as_deref() {
                resolution.note_reference(source);
            }
            if let Some(target) = relation.target.as_deref() {
                resolution.note_reference(target);
            }
        }
        for genset in table.gensets() {
            if let Some(general) = genset.general.as_deref() {
                resolution.note_reference(general);
            }
            for specific in &genset.specifics {
                resolution.note_reference(specific);
            }
        }

        resolution
    }

    fn note_reference(&mut self, name: &str) {
        if !self.local_names.contains(name) {
            self.external_names.insert(name.to_owned());
        }
    }

    /// Names defined in this file (classes, datatypes, enums).
    pub fn local_names(&self) -> &IndexSet<String> {
        &self.local_names
    }

    /// Names referenced but not defined in this file, in encounter order.
    pub fn external_names(&self) -> &IndexSet<String> {
        &self.external_names
    }

    pub fn is_local(&self, name: &str) -> bool {
        self.local_names.contains(name)
    }

    pub fn is_external(&self, name: &str) -> bool {
        self.external_names.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use ontoview_core::ast::SourceFile;

    use super::*;

    fn table_from(json: &str) -> SymbolTable {
        let file: SourceFile = serde_json::from_str(json).unwrap();
        SymbolTable::from_source(&file)
    }

    #[test]
    fn test_local_names_span_three_categories() {
        let table = table_from(
            r#"{
                "content": [
                    { "node_type": "class_definition", "class_name": "Person" },
                    { "node_type": "datatype_definition", "datatype_name": "Money" },
                    { "node_type": "enum_definition", "enum_name": "Color" },
                    { "node_type": "genset_definition", "genset_name": "G", "general": "Person" }
                ]
            }"#,
        );

        let resolution = ReferenceResolution::resolve(&table);
        assert!(resolution.is_local("Person"));
        assert!(resolution.is_local("Money"));
        assert!(resolution.is_local("Color"));
        // Genset names are not type names
        assert!(!resolution.is_local("G"));
        assert!(resolution.external_names().is_empty());
    }

    #[test]
    fn test_external_names_from_all_reference_positions() {
        let table = table_from(
            r#"{
                "content": [
                    { "node_type": "class_definition", "class_name": "CarAgency",
                      "class_stereotype": "subkind",
                      "specialization": { "parents": ["Organization"] } },
                    { "node_type": "external_relation", "relation_stereotype": "material",
                      "first_end": "Paciente", "second_end": "Medico" },
                    { "node_type": "genset_definition", "genset_name": "G",
                      "general": "Agent", "specifics": ["CarAgency", "Broker"] }
                ]
            }"#,
        );

        let resolution = ReferenceResolution::resolve(&table);
        let external: Vec<_> = resolution.external_names().iter().cloned().collect();
        // Encounter order: parents, relation endpoints, genset general/specifics.
        assert_eq!(
            external,
            ["Organization", "Paciente", "Medico", "Agent", "Broker"]
        );
    }

    #[test]
    fn test_external_names_deduplicated() {
        let table = table_from(
            r#"{
                "content": [
                    { "node_type": "class_definition", "class_name": "Consulta",
                      "body": [
                        { "node_type": "internal_relation", "relation_stereotype": "mediation", "target": "Paciente" }
                      ] },
                    { "node_type": "external_relation", "first_end": "Paciente", "second_end": "Medico" }
                ]
            }"#,
        );

        let resolution = ReferenceResolution::resolve(&table);
        assert_eq!(
            resolution
                .external_names()
                .iter()
                .filter(|name| name.as_str() == "Paciente")
                .count(),
            1
        );
    }

    #[test]
    fn test_deterministic_across_runs() {
        let json = r#"{
            "content": [
                { "node_type": "class_definition", "class_name": "A",
                  "specialization": { "parents": ["X", "Y"] } },
                { "node_type": "external_relation", "first_end": "A", "second_end": "Z" }
            ]
        }"#;

        let first = ReferenceResolution::resolve(&table_from(json));
        let second = ReferenceResolution::resolve(&table_from(json));
        assert_eq!(
            first.external_names().iter().collect::<Vec<_>>(),
            second.external_names().iter().collect::<Vec<_>>()
        );
    }
}
