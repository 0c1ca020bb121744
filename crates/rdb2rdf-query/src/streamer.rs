//! Turns planned query result rows into triples, one row of buffering at a
//! time
//!
//! A single row can emit several triples (a type triple plus one per
//! non-null column and relationship), so [`TripleStreamer`] keeps a small
//! pending queue that never holds more than one row's worth of triples —
//! the streamer pulls a fresh row from the backend only once that queue is
//! drained.

use std::collections::VecDeque;

use rdb2rdf_codec::{IriCodec, SqlValue};
use rdb2rdf_model::{Node, Triple, Vocabulary};
use rdb2rdf_schema::{ColumnRef, RdbConnection, Row, RowStream};

use crate::error::QueryError;
use crate::planner::{EmitComponent, EmitPlan, PlannedQuery, SubjectSource};

/// Lazily streams the triples a list of [`PlannedQuery`] produces, running
/// each query against `connection` only once the previous one is exhausted.
pub struct TripleStreamer<'a> {
    connection: &'a dyn RdbConnection,
    plans: VecDeque<PlannedQuery>,
    current: Option<CurrentPlan<'a>>,
}

struct CurrentPlan<'a> {
    layout: Vec<ColumnRef>,
    emit: EmitPlan,
    rows: Box<dyn RowStream<'a> + 'a>,
    pending: VecDeque<Triple>,
}

impl<'a> TripleStreamer<'a> {
    pub fn new(connection: &'a dyn RdbConnection, plans: Vec<PlannedQuery>) -> Self {
        TripleStreamer { connection, plans: plans.into(), current: None }
    }
}

impl<'a> Iterator for TripleStreamer<'a> {
    type Item = Result<Triple, QueryError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(plan) = &mut self.current {
                if let Some(triple) = plan.pending.pop_front() {
                    return Some(Ok(triple));
                }
                match plan.rows.next() {
                    Some(Ok(row)) => {
                        plan.pending = emit_triples(&plan.layout, &plan.emit, &row).into();
                        continue;
                    }
                    Some(Err(err)) => return Some(Err(err.into())),
                    None => {
                        self.current = None;
                        continue;
                    }
                }
            }

            let next_plan = self.plans.pop_front()?;
            let layout = next_plan.query.layout();
            tracing::trace!(table = next_plan.query.from.as_str(), joins = next_plan.query.joins.len(), "executing planned query");
            match self.connection.execute(&next_plan.query) {
                Ok(rows) => {
                    self.current = Some(CurrentPlan { layout, emit: next_plan.emit, rows, pending: VecDeque::new() });
                }
                Err(err) => return Some(Err(err.into())),
            }
        }
    }
}

/// Find a projected column's value by its origin, or `None` if it was
/// `NULL` (or absent from a joined side that didn't match).
fn find_value<'r>(layout: &[ColumnRef], row: &'r Row, want: &ColumnRef) -> Option<&'r SqlValue> {
    layout.iter().position(|c| c == want).and_then(|i| row[i].as_ref())
}

fn subject_node(emit: &EmitPlan, layout: &[ColumnRef], row: &Row) -> Option<Node> {
    let pk_values = match &emit.subject_source {
        SubjectSource::Known(values) => values.clone(),
        SubjectSource::FromRow { pk_columns } => {
            let mut values = Vec::with_capacity(pk_columns.len());
            for col in pk_columns {
                let value = find_value(layout, row, &ColumnRef::Base(col.clone()))?;
                values.push((col.clone(), value.clone()));
            }
            values
        }
    };
    Some(IriCodec::format_row_node(&emit.subject_table_iri, &pk_values, emit.subject_is_blank))
}

/// Every triple a single result row produces under `emit`, in component
/// order. Rows whose subject cannot be rebuilt (only possible for a
/// wildcard-object join that matched nothing and therefore left a
/// primary-key column `NULL`) contribute no triples at all.
fn emit_triples(layout: &[ColumnRef], emit: &EmitPlan, row: &Row) -> Vec<Triple> {
    let Some(subject) = subject_node(emit, layout, row) else { return Vec::new() };
    let mut triples = Vec::with_capacity(emit.components.len());
    for component in &emit.components {
        match component {
            EmitComponent::Type => {
                triples.push(Triple::new(
                    subject.clone(),
                    Node::iri(Vocabulary::RDF_TYPE),
                    Node::iri(emit.subject_table_iri.clone()),
                ));
            }
            EmitComponent::Literal { column, predicate } => {
                if let Some(value) = find_value(layout, row, &ColumnRef::Base(column.clone())) {
                    let literal = rdb2rdf_codec::ValueCodec::rdf_literal_from_sql(value);
                    triples.push(Triple::new(subject.clone(), predicate.clone(), Node::Literal(literal)));
                }
            }
            EmitComponent::Reference { join_index, target_pk_columns, predicate, target_table_iri, target_is_blank } => {
                let mut values = Vec::with_capacity(target_pk_columns.len());
                let mut complete = true;
                for col in target_pk_columns {
                    match find_value(layout, row, &ColumnRef::Joined { join_index: *join_index, column: col.clone() }) {
                        Some(v) => values.push((col.clone(), v.clone())),
                        None => {
                            complete = false;
                            break;
                        }
                    }
                }
                if complete {
                    let object = IriCodec::format_row_node(target_table_iri, &values, *target_is_blank);
                    triples.push(Triple::new(subject.clone(), predicate.clone(), object));
                }
            }
            EmitComponent::ReferenceKnown { predicate, object } => {
                triples.push(Triple::new(subject.clone(), predicate.clone(), object.clone()));
            }
        }
    }
    triples
}

#[cfg(test)]
mod tests {
    use rdb2rdf_codec::SqlType;
    use rdb2rdf_schema::testing::InMemoryConnection;
    use rdb2rdf_schema::{RawColumn, RawForeignKey, RawSchema, RawTable, SchemaIndex};

    use crate::dispatcher::dispatch;
    use crate::pattern::TriplePattern;
    use crate::planner::QueryPlanner;

    use super::*;

    fn employee_schema() -> RawSchema {
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
                foreign_keys: vec![RawForeignKey { local_columns: vec!["manager_id".into()], target_table: "Employee".into() }],
            }],
        }
    }

    fn seeded_connection() -> InMemoryConnection {
        let schema = employee_schema();
        let mut conn = InMemoryConnection::new(schema);
        conn.insert_row(
            "Employee",
            vec![
                ("id".into(), SqlValue::Integer(1)),
                ("name".into(), SqlValue::Text("Ada".into())),
                ("manager_id".into(), SqlValue::Null),
            ],
        );
        conn.insert_row(
            "Employee",
            vec![
                ("id".into(), SqlValue::Integer(2)),
                ("name".into(), SqlValue::Text("Grace".into())),
                ("manager_id".into(), SqlValue::Integer(1)),
            ],
        );
        conn
    }

    #[test]
    fn wildcard_pattern_yields_every_triple() {
        let conn = seeded_connection();
        let index = SchemaIndex::build("http://ex/", conn.schema()).unwrap();
        let plans = QueryPlanner::plan(&index, &TriplePattern::any()).unwrap();
        let triples: Vec<_> = TripleStreamer::new(&conn, plans).collect::<Result<_, _>>().unwrap();
        // row 1 (manager_id null): type + id + name = 3
        // row 2: type + id + name + manager_id + reference = 5
        assert_eq!(triples.len(), 8);
    }

    #[test]
    fn subject_predicate_plan_rebuilds_subject_from_known_values() {
        let conn = seeded_connection();
        let index = SchemaIndex::build("http://ex/", conn.schema()).unwrap();
        let subject = Node::iri("http://ex/Employee/id=2");
        let predicate = IriCodec::format_literal_property("http://ex/Employee", "name");
        let pattern = TriplePattern::new(Some(subject.clone()), Some(predicate.clone()), None);
        assert!(matches!(dispatch(&pattern), crate::dispatcher::Handler::SubjectPredicate { .. }));
        let plans = QueryPlanner::plan(&index, &pattern).unwrap();
        let triples: Vec<_> = TripleStreamer::new(&conn, plans).collect::<Result<_, _>>().unwrap();
        assert_eq!(triples, vec![Triple::new(subject, predicate, Node::literal("Grace"))]);
    }

    #[test]
    fn subject_any_predicate_ref_confirms_reference_without_join() {
        let conn = seeded_connection();
        let index = SchemaIndex::build("http://ex/", conn.schema()).unwrap();
        let subject = Node::iri("http://ex/Employee/id=2");
        let object = Node::iri("http://ex/Employee/id=1");
        let pattern = TriplePattern::new(Some(subject.clone()), None, Some(object.clone()));
        let plans = QueryPlanner::plan(&index, &pattern).unwrap();
        let triples: Vec<_> = TripleStreamer::new(&conn, plans).collect::<Result<_, _>>().unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].subject, subject);
        assert_eq!(triples[0].object, object);
    }

    #[test]
    fn type_predicate_wildcard_object_enumerates_tables() {
        let conn = seeded_connection();
        let index = SchemaIndex::build("http://ex/", conn.schema()).unwrap();
        let pattern = TriplePattern::new(None, Some(Node::iri(Vocabulary::RDF_TYPE)), None);
        let plans = QueryPlanner::plan(&index, &pattern).unwrap();
        let triples: Vec<_> = TripleStreamer::new(&conn, plans).collect::<Result<_, _>>().unwrap();
        assert_eq!(triples.len(), 2);
        assert!(triples.iter().all(|t| t.predicate == Node::iri(Vocabulary::RDF_TYPE)));
    }
}
