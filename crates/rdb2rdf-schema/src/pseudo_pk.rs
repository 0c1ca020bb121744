//! Pseudo-primary-key inference for tables lacking a declared primary key

use crate::error::SchemaError;
use crate::raw::RawTable;

/// The result of inferring a table's effective primary key.
pub struct PseudoPrimaryKey {
    pub columns: Vec<String>,
    pub is_blank_node_table: bool,
}

/// Synthesizes a primary key for tables that did not declare one.
pub struct PseudoPrimaryKeyInference;

impl PseudoPrimaryKeyInference {
    /// If `table` declares a primary key, use it unchanged. Otherwise choose
    /// the unique index with the fewest columns (ties broken by
    /// first-encountered order in `unique_indices`), or — absent any unique
    /// index — every column in the table. A table synthesized this way is a
    /// blank-node table.
    pub fn infer(table: &RawTable) -> Result<PseudoPrimaryKey, SchemaError> {
        if let Some(declared) = &table.primary_key {
            return Ok(PseudoPrimaryKey {
                columns: declared.clone(),
                is_blank_node_table: false,
            });
        }

        if let Some(smallest) = table
            .unique_indices
            .iter()
            .min_by_key(|index| index.len())
        {
            return Ok(PseudoPrimaryKey {
                columns: smallest.clone(),
                is_blank_node_table: true,
            });
        }

        if table.columns.is_empty() {
            return Err(SchemaError::EmptyTable(table.name.clone()));
        }
        Ok(PseudoPrimaryKey {
            columns: table.columns.iter().map(|c| c.name.clone()).collect(),
            is_blank_node_table: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawColumn;
    use rdb2rdf_codec::SqlType;

    fn column(name: &str) -> RawColumn {
        RawColumn { name: name.to_string(), sql_type: SqlType::Integer }
    }

    #[test]
    fn declared_primary_key_wins() {
        let table = RawTable {
            name: "Employee".into(),
            columns: vec![column("id"), column("name")],
            primary_key: Some(vec!["id".into()]),
            unique_indices: vec![vec!["name".into()]],
            foreign_keys: vec![],
        };
        let pk = PseudoPrimaryKeyInference::infer(&table).unwrap();
        assert_eq!(pk.columns, vec!["id"]);
        assert!(!pk.is_blank_node_table);
    }

    #[test]
    fn smallest_unique_index_is_chosen() {
        let table = RawTable {
            name: "Audit".into(),
            columns: vec![column("a"), column("b"), column("c")],
            primary_key: None,
            unique_indices: vec![vec!["a".into(), "b".into()], vec!["c".into()]],
            foreign_keys: vec![],
        };
        let pk = PseudoPrimaryKeyInference::infer(&table).unwrap();
        assert_eq!(pk.columns, vec!["c"]);
        assert!(pk.is_blank_node_table);
    }

    #[test]
    fn ties_keep_first_encountered() {
        let table = RawTable {
            name: "Audit".into(),
            columns: vec![column("a"), column("b")],
            primary_key: None,
            unique_indices: vec![vec!["a".into()], vec!["b".into()]],
            foreign_keys: vec![],
        };
        let pk = PseudoPrimaryKeyInference::infer(&table).unwrap();
        assert_eq!(pk.columns, vec!["a"]);
    }

    #[test]
    fn no_unique_index_uses_all_columns() {
        let table = RawTable {
            name: "Audit".into(),
            columns: vec![column("col1"), column("col2")],
            primary_key: None,
            unique_indices: vec![],
            foreign_keys: vec![],
        };
        let pk = PseudoPrimaryKeyInference::infer(&table).unwrap();
        assert_eq!(pk.columns, vec!["col1", "col2"]);
        assert!(pk.is_blank_node_table);
    }

    #[test]
    fn table_with_no_columns_is_an_error() {
        let table = RawTable {
            name: "Empty".into(),
            columns: vec![],
            primary_key: None,
            unique_indices: vec![],
            foreign_keys: vec![],
        };
        assert!(PseudoPrimaryKeyInference::infer(&table).is_err());
    }
}
