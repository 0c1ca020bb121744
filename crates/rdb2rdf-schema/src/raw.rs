//! The shape a schema-reflection collaborator hands back
//!
//! This is intentionally dumb data — no IRIs, no pseudo-primary-key
//! inference, nothing derived. [`crate::SchemaIndex::build`] is what turns
//! this into the immutable, IRI-keyed structure the rest of the store reads.

use rdb2rdf_codec::SqlType;

/// A column as reported by schema reflection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawColumn {
    pub name: String,
    pub sql_type: SqlType,
}

/// A many-to-one reference as reported by schema reflection: a set of local
/// columns in the source table that together reference another table's
/// primary key. One-to-many and many-to-many relationships are not
/// reflected here — the direct mapping only ever asserts the "one" side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawForeignKey {
    pub local_columns: Vec<String>,
    pub target_table: String,
}

/// A table as reported by schema reflection, before pseudo-primary-key
/// inference runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawTable {
    pub name: String,
    pub columns: Vec<RawColumn>,
    /// `None` if the table has no declared primary key.
    pub primary_key: Option<Vec<String>>,
    /// Every unique index on the table, including the primary key's own
    /// index if the driver reports one. Column-name sets, not ordered.
    pub unique_indices: Vec<Vec<String>>,
    pub foreign_keys: Vec<RawForeignKey>,
}

/// The full set of tables a backend reflects, in a stable declared order
/// (the order [`crate::SchemaIndex`] iterates tables in for wildcard-all
/// queries).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawSchema {
    pub tables: Vec<RawTable>,
}
