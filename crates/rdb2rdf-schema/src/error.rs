//! Errors surfaced while reflecting, indexing, or querying a schema

use thiserror::Error;

/// A predicate IRI was well-formed but named something the schema does not
/// have: an unknown table, column, or relationship.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown property: {0}")]
pub struct UnknownProperty(pub String);

/// Errors raised while building a [`crate::SchemaIndex`] from a reflected
/// schema.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("table {0:?} has neither a declared primary key nor any columns to use as one")]
    EmptyTable(String),
    #[error("foreign key in table {table:?} references unknown target table {target:?}")]
    DanglingForeignKey { table: String, target: String },
    #[error(transparent)]
    UnknownProperty(#[from] UnknownProperty),
}

/// A failure reported by the relational driver underlying an
/// [`crate::RdbConnection`]. Carries enough context to be actionable without
/// requiring the caller to understand the driver's own error type.
#[derive(Debug, Error)]
#[error("backend error during {operation}: {source}")]
pub struct BackendError {
    pub operation: &'static str,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl BackendError {
    pub fn new(operation: &'static str, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        BackendError {
            operation,
            source: Box::new(source),
        }
    }
}
