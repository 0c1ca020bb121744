use std::collections::HashMap;

use rdb2rdf_codec::SqlValue;
use thiserror::Error;

use crate::connection::{CountQuery, RdbConnection, Row, RowStream};
use crate::error::BackendError;
use crate::query_ir::{JoinKind, SqlQuery};
use crate::raw::RawSchema;

/// A query named a table the connection has no data for.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown table: {0}")]
pub struct UnknownTable(pub String);

type TableRow = HashMap<String, SqlValue>;

/// An in-process stand-in for a relational backend: a fixed schema plus a
/// flat `Vec` of rows per table, each row a column-name-to-value map with
/// absent keys standing in for `NULL`.
#[derive(Debug, Default)]
pub struct InMemoryConnection {
    schema: RawSchema,
    tables: HashMap<String, Vec<TableRow>>,
}

impl InMemoryConnection {
    pub fn new(schema: RawSchema) -> Self {
        InMemoryConnection { schema, tables: HashMap::new() }
    }

    /// Insert a row into `table`. `columns` pairs are `(column name, value)`
    /// for non-null columns only — omit a column to leave it `NULL`.
    pub fn insert_row(&mut self, table: &str, columns: impl IntoIterator<Item = (String, SqlValue)>) {
        self.tables
            .entry(table.to_string())
            .or_default()
            .push(columns.into_iter().collect());
    }

    fn rows(&self, table: &str) -> Result<&[TableRow], BackendError> {
        self.tables
            .get(table)
            .map(Vec::as_slice)
            .ok_or_else(|| BackendError::new("execute", UnknownTable(table.to_string())))
    }

    fn matches_filters(row: &TableRow, query: &SqlQuery) -> bool {
        query.filters.iter().all(|f| match f {
            crate::query_ir::Filter::IsNotNull(col) => row.contains_key(col),
            crate::query_ir::Filter::Eq(col, value) => row.get(col) == Some(value),
        })
    }

    fn find_target_row<'a>(&'a self, target_table: &str, target_columns: &[String], local: &TableRow, local_columns: &[String]) -> Option<&'a TableRow> {
        let key: Vec<&SqlValue> = local_columns.iter().map(|c| local.get(c)).collect::<Option<Vec<_>>>()?;
        self.tables.get(target_table)?.iter().find(|candidate| {
            target_columns
                .iter()
                .zip(key.iter())
                .all(|(col, val)| candidate.get(col) == Some(*val))
        })
    }
}

impl RdbConnection for InMemoryConnection {
    fn schema(&self) -> &RawSchema {
        &self.schema
    }

    fn execute<'a>(&'a self, query: &SqlQuery) -> Result<Box<dyn RowStream<'a> + 'a>, BackendError> {
        let base_rows = self.rows(&query.from)?;
        let mut results: Vec<Result<Row, BackendError>> = Vec::new();

        'rows: for row in base_rows {
            if !Self::matches_filters(row, query) {
                continue;
            }
            let mut projected: Row = query.select.iter().map(|c| row.get(c).cloned()).collect();
            for join in &query.joins {
                let target = self.find_target_row(&join.target_table, &join.target_columns, row, &join.local_columns);
                match (target, join.kind) {
                    (Some(target), _) => {
                        projected.extend(join.target_columns.iter().map(|c| target.get(c).cloned()));
                    }
                    (None, JoinKind::Inner) => continue 'rows,
                    (None, JoinKind::Outer) => {
                        projected.extend(join.target_columns.iter().map(|_| None));
                    }
                }
            }
            results.push(Ok(projected));
        }

        Ok(Box::new(results.into_iter()))
    }

    fn count(&self, query: &CountQuery) -> Result<u64, BackendError> {
        let rows = self.rows(&query.table)?;
        let mut total = 0u64;
        for row in rows {
            if row.contains_key(&query.pk_column) {
                total += 1;
            }
            total += query.literal_columns.iter().filter(|c| row.contains_key(c.as_str())).count() as u64;
            total += query
                .relationships
                .iter()
                .filter(|cols| cols.iter().all(|c| row.contains_key(c.as_str())))
                .count() as u64;
        }
        Ok(total)
    }

    fn commit(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), BackendError> {
        Ok(())
    }
}
