//! The `RdbConnection` collaborator interface
//!
//! Connection management, transaction commit/rollback, and schema
//! reflection are explicitly out of scope for this store to redesign — it
//! consumes them through this trait. A production implementation adapts a
//! real driver; [`crate::testing::InMemoryConnection`] (behind the
//! `testing` feature) adapts an in-process table for tests.

use rdb2rdf_codec::SqlValue;

use crate::error::BackendError;
use crate::query_ir::SqlQuery;
use crate::raw::RawSchema;

/// A single row's values, positionally matching `SqlQuery::layout()`. `None`
/// at a position means that column was `NULL` in this row, or — for a
/// joined column under an outer join — that no target row matched.
pub type Row = Vec<Option<SqlValue>>;

/// A lazily-consumed sequence of query result rows.
///
/// Dropping a `RowStream` before exhausting it must release whatever cursor
/// or connection resource it holds; it must never buffer more than one row
/// ahead of what the consumer has asked for.
pub trait RowStream<'a>: Iterator<Item = Result<Row, BackendError>> + 'a {}

impl<'a, T> RowStream<'a> for T where T: Iterator<Item = Result<Row, BackendError>> + 'a {}

/// An aggregate query for `StoreFacade::len` — computed per table as
/// `count(pk_column) + sum(literal columns is-not-null) + sum(relationships
/// whose local columns are all non-null)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountQuery {
    pub table: String,
    pub pk_column: String,
    pub literal_columns: Vec<String>,
    pub relationships: Vec<Vec<String>>,
}

/// The relational backend collaborator: executes planned queries and owns
/// the single transaction the store's session runs inside.
pub trait RdbConnection {
    /// The schema as reflected when the connection was opened.
    fn schema(&self) -> &RawSchema;

    /// Execute a planned query, returning its rows lazily.
    fn execute<'a>(&'a self, query: &SqlQuery) -> Result<Box<dyn RowStream<'a> + 'a>, BackendError>;

    /// Execute a `StoreFacade::len` aggregate query for one table.
    fn count(&self, query: &CountQuery) -> Result<u64, BackendError>;

    /// Commit the open transaction and immediately begin a fresh one.
    fn commit(&mut self) -> Result<(), BackendError>;

    /// Roll back the open transaction without beginning a new one.
    fn rollback(&mut self) -> Result<(), BackendError>;
}
