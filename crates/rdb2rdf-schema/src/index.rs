//! The immutable, IRI-keyed schema snapshot built once at `open` time

use std::collections::{BTreeSet, HashMap};

use rdb2rdf_codec::{IriCodec, SqlType, ValueCodec};

use crate::error::SchemaError;
use crate::pseudo_pk::PseudoPrimaryKeyInference;
use crate::raw::RawSchema;

/// A column's static metadata: its SQL type and the canonical RDF datatype
/// `ValueCodec` encodes it as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub sql_type: SqlType,
    pub rdf_datatype: &'static str,
}

/// A many-to-one relationship, keyed within its table by the unordered set
/// of its local columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForeignKey {
    /// Schema-declared order — this is the order `format_reference_property`
    /// renders the columns in.
    pub local_columns: Vec<String>,
    pub target_table: String,
}

impl ForeignKey {
    fn column_set(&self) -> BTreeSet<String> {
        self.local_columns.iter().cloned().collect()
    }
}

/// A single table's indexed metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub iri: String,
    pub columns: Vec<Column>,
    pub primary_key: Vec<String>,
    pub foreign_keys: Vec<ForeignKey>,
    pub is_blank_node_table: bool,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn foreign_key_by_columns(&self, columns: &BTreeSet<String>) -> Option<&ForeignKey> {
        self.foreign_keys.iter().find(|fk| &fk.column_set() == columns)
    }
}

/// The snapshot of every table in the database, keyed by table-IRI.
///
/// Built once from a [`RawSchema`] at `open` time and never mutated again —
/// pattern dispatch and query planning both assume `O(1)` lookup by IRI and
/// a stable declared table order.
#[derive(Debug)]
pub struct SchemaIndex {
    base_iri: String,
    tables: Vec<Table>,
    by_iri: HashMap<String, usize>,
}

impl SchemaIndex {
    /// Build the index from a reflected schema, running pseudo-primary-key
    /// inference on every table that needs it.
    pub fn build(base_iri: &str, raw: &RawSchema) -> Result<Self, SchemaError> {
        let mut tables = Vec::with_capacity(raw.tables.len());
        let known_names: BTreeSet<&str> = raw.tables.iter().map(|t| t.name.as_str()).collect();

        for raw_table in &raw.tables {
            let pk = PseudoPrimaryKeyInference::infer(raw_table)?;
            let iri = IriCodec::table_iri(base_iri, &raw_table.name);
            let columns = raw_table
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    sql_type: c.sql_type,
                    rdf_datatype: ValueCodec::canonical_rdf_datatype(c.sql_type),
                })
                .collect();
            let foreign_keys = raw_table
                .foreign_keys
                .iter()
                .map(|fk| {
                    if !known_names.contains(fk.target_table.as_str()) {
                        return Err(SchemaError::DanglingForeignKey {
                            table: raw_table.name.clone(),
                            target: fk.target_table.clone(),
                        });
                    }
                    Ok(ForeignKey {
                        local_columns: fk.local_columns.clone(),
                        target_table: fk.target_table.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            tables.push(Table {
                name: raw_table.name.clone(),
                iri,
                columns,
                primary_key: pk.columns,
                foreign_keys,
                is_blank_node_table: pk.is_blank_node_table,
            });
        }

        let by_iri = tables
            .iter()
            .enumerate()
            .map(|(i, t)| (t.iri.clone(), i))
            .collect();

        tracing::debug!(base_iri, table_count = tables.len(), "built schema index");
        Ok(SchemaIndex { base_iri: base_iri.to_string(), tables, by_iri })
    }

    pub fn base_iri(&self) -> &str {
        &self.base_iri
    }

    /// Every table, in declared order — the order wildcard-all queries
    /// iterate tables in.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table_by_iri(&self, iri: &str) -> Option<&Table> {
        self.by_iri.get(iri).map(|&i| &self.tables[i])
    }

    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{RawColumn, RawForeignKey, RawTable};

    fn schema() -> RawSchema {
        RawSchema {
            tables: vec![RawTable {
                name: "Employee".into(),
                columns: vec![
                    RawColumn { name: "id".into(), sql_type: SqlType::Integer },
                    RawColumn { name: "name".into(), sql_type: SqlType::Text },
                    RawColumn { name: "manager_id".into(), sql_type: SqlType::Integer },
                ],
                primary_key: Some(vec!["id".into()]),
                unique_indices: vec![],
                foreign_keys: vec![RawForeignKey {
                    local_columns: vec!["manager_id".into()],
                    target_table: "Employee".into(),
                }],
            }],
        }
    }

    #[test]
    fn builds_table_iri_from_base() {
        let index = SchemaIndex::build("http://ex/", &schema()).unwrap();
        let table = index.table_by_name("Employee").unwrap();
        assert_eq!(table.iri, "http://ex/Employee");
        assert_eq!(index.table_by_iri("http://ex/Employee").unwrap().name, "Employee");
    }

    #[test]
    fn column_datatypes_follow_canonical_lattice() {
        let index = SchemaIndex::build("http://ex/", &schema()).unwrap();
        let table = index.table_by_name("Employee").unwrap();
        assert_eq!(
            table.column("id").unwrap().rdf_datatype,
            "http://www.w3.org/2001/XMLSchema#integer"
        );
    }

    #[test]
    fn dangling_foreign_key_is_rejected() {
        let mut raw = schema();
        raw.tables[0].foreign_keys[0].target_table = "Nonexistent".into();
        assert!(matches!(
            SchemaIndex::build("http://ex/", &raw),
            Err(SchemaError::DanglingForeignKey { .. })
        ));
    }

    #[test]
    fn foreign_key_lookup_by_column_set() {
        let index = SchemaIndex::build("http://ex/", &schema()).unwrap();
        let table = index.table_by_name("Employee").unwrap();
        let cols: BTreeSet<String> = ["manager_id".to_string()].into_iter().collect();
        assert!(table.foreign_key_by_columns(&cols).is_some());
    }
}
