//! The SQL query intermediate representation `RdbConnection` executes
//!
//! `QueryPlanner` (in `rdb2rdf-query`) builds these; this crate only owns
//! the shape of the IR, since it is also what the `RdbConnection` trait's
//! `execute` method is keyed on. There is no textual SQL anywhere in this
//! store — a real backend's `RdbConnection` impl is responsible for
//! lowering this IR into whatever its driver actually speaks.

use rdb2rdf_codec::SqlValue;

/// How a joined table's rows combine with the base table's.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinKind {
    /// Drop base rows with no matching joined row (used when the triple
    /// pattern's object is a concrete reference — a non-match means the
    /// pattern cannot produce a triple from this row at all).
    Inner,
    /// Keep base rows with no matching joined row, with the joined columns
    /// coming back as `None` (used for wildcard-object enumeration, where a
    /// row with an unset foreign key still needs to be visited for its
    /// other triples).
    Outer,
}

/// A many-to-one join against a relationship's target table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Join {
    pub local_columns: Vec<String>,
    pub target_table: String,
    /// Target-side columns to project — typically the target table's
    /// primary key, enough to rebuild its row node.
    pub target_columns: Vec<String>,
    pub kind: JoinKind,
}

/// A row-level predicate applied before projection.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    IsNotNull(String),
    Eq(String, SqlValue),
}

/// A planned query: one base table, zero or more joins, a column
/// projection, and a set of filters.
#[derive(Clone, Debug, PartialEq)]
pub struct SqlQuery {
    pub from: String,
    pub select: Vec<String>,
    pub joins: Vec<Join>,
    pub filters: Vec<Filter>,
}

/// A single projected column's origin: the base table or one of the joins,
/// by index into `SqlQuery::joins`. `RowStream` rows are a flat
/// `Vec<Option<SqlValue>>` positionally matching `SqlQuery::layout()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColumnRef {
    Base(String),
    Joined { join_index: usize, column: String },
}

impl SqlQuery {
    pub fn new(from: impl Into<String>) -> Self {
        SqlQuery {
            from: from.into(),
            select: Vec::new(),
            joins: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// The positional layout a `RowStream` row's values correspond to: base
    /// `select` columns first, then each join's `target_columns` in join
    /// order.
    pub fn layout(&self) -> Vec<ColumnRef> {
        let mut layout: Vec<ColumnRef> = self.select.iter().cloned().map(ColumnRef::Base).collect();
        for (i, join) in self.joins.iter().enumerate() {
            layout.extend(
                join.target_columns
                    .iter()
                    .map(|c| ColumnRef::Joined { join_index: i, column: c.clone() }),
            );
        }
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_orders_base_then_joins() {
        let mut q = SqlQuery::new("Employee");
        q.select = vec!["id".into()];
        q.joins.push(Join {
            local_columns: vec!["manager_id".into()],
            target_table: "Employee".into(),
            target_columns: vec!["id".into()],
            kind: JoinKind::Outer,
        });
        let layout = q.layout();
        assert_eq!(layout, vec![
            ColumnRef::Base("id".into()),
            ColumnRef::Joined { join_index: 0, column: "id".into() },
        ]);
    }
}
