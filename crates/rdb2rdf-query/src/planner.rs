//! Translates a dispatched pattern into one or more SQL query plans
//!
//! Every handler bottoms out in a list of [`PlannedQuery`]: a `SqlQuery` to
//! execute, paired with an [`EmitPlan`] telling [`crate::streamer`] how to
//! turn each result row into triples. Reference predicates whose object is
//! concrete never need a join at all — the target's primary-key tuple is
//! already known, so it is pushed down as equality filters on the local
//! foreign-key columns instead (this assumes a foreign key's local columns
//! are declared in the same order as the target table's primary key, which
//! every schema reflected for this mapping satisfies).

use std::collections::BTreeSet;

use rdb2rdf_codec::{IriCodec, PredicateKind, SqlValue, ValueCodec};
use rdb2rdf_model::{Literal, Node};
use rdb2rdf_schema::{Filter, Join, JoinKind, SchemaIndex, SqlQuery, Table, UnknownProperty};

use crate::dispatcher::{dispatch, Handler};
use crate::error::QueryError;
use crate::pattern::TriplePattern;

/// What to do with a result row once it comes back: rebuild the subject
/// node and emit zero or more triples from it.
#[derive(Clone, Debug)]
pub struct EmitPlan {
    pub subject_source: SubjectSource,
    pub subject_table_iri: String,
    pub subject_is_blank: bool,
    pub components: Vec<EmitComponent>,
}

/// Where a row's subject primary-key values come from: read positionally
/// out of the result row (subject slot was a wildcard), or already known
/// statically because the pattern's subject was concrete (so the planner
/// never bothered selecting the primary key back out of the database).
#[derive(Clone, Debug)]
pub enum SubjectSource {
    FromRow { pk_columns: Vec<String> },
    Known(Vec<(String, SqlValue)>),
}

/// One triple (or absence of one) to derive from a result row.
#[derive(Clone, Debug)]
pub enum EmitComponent {
    /// `(subject, rdf:type, subject_table_iri)` — always emitted, once per
    /// row.
    Type,
    /// A literal-property triple, skipped if the column's value is `NULL`.
    Literal { column: String, predicate: Node },
    /// A reference-property triple whose target row node is rebuilt from a
    /// joined column set, skipped if any target primary-key column is
    /// `NULL` (no match under the outer join).
    Reference { join_index: usize, target_pk_columns: Vec<String>, predicate: Node, target_table_iri: String, target_is_blank: bool },
    /// A reference-property triple whose object was already concrete in
    /// the pattern — no row data needed, only existence.
    ReferenceKnown { predicate: Node, object: Node },
}

/// A single query to run plus how to turn its rows into triples.
#[derive(Clone, Debug)]
pub struct PlannedQuery {
    pub query: SqlQuery,
    pub emit: EmitPlan,
}

/// Builds [`PlannedQuery`] lists from dispatched triple patterns.
pub struct QueryPlanner;

impl QueryPlanner {
    pub fn plan(schema: &SchemaIndex, pattern: &TriplePattern) -> Result<Vec<PlannedQuery>, QueryError> {
        let handler = dispatch(pattern);
        tracing::trace!(handler = ?handler, "dispatched triple pattern");
        match handler {
            Handler::Empty => Ok(vec![]),
            Handler::AllTablesAllPredicates => {
                Ok(schema.tables().iter().map(|t| wildcard_all_plan(t, schema)).collect())
            }
            Handler::TypePredicate { object } => Ok(type_predicate_plan(schema, object)),
            Handler::PredicateTable { predicate, object } => predicate_table_plan(schema, &predicate, object),
            Handler::SubjectAllPredicates { subject } => Ok(subject_all_predicates_plan(schema, &subject)),
            Handler::SubjectAnyPredicateLiteral { subject, object } => {
                Ok(subject_any_predicate_literal_plan(schema, &subject, &object))
            }
            Handler::SubjectAnyPredicateRef { subject, object } => {
                Ok(subject_any_predicate_ref_plan(schema, &subject, &object))
            }
            Handler::SubjectType { subject, object } => Ok(subject_type_plan(schema, &subject, object)),
            Handler::SubjectPredicate { subject, predicate, object } => {
                subject_predicate_plan(schema, &subject, &predicate, object)
            }
        }
    }
}

/// Resolve a row node to its owning table and decoded, pk-ordered values.
/// `None` means the node cannot possibly be a valid row of any table —
/// callers fold that into an empty plan rather than an error.
fn resolve_row<'s>(schema: &'s SchemaIndex, node: &Node) -> Option<(&'s Table, Vec<(String, SqlValue)>)> {
    let label = match node {
        Node::Iri(s) | Node::Blank(s) => s.as_str(),
        Node::Literal(_) => return None,
    };
    let slash = label.rfind('/')?;
    let table = schema.table_by_iri(&label[..slash])?;
    let (_, pairs) = IriCodec::parse_row_node(node, table.is_blank_node_table).ok()?;

    let pk_set: BTreeSet<&str> = table.primary_key.iter().map(String::as_str).collect();
    let parsed_set: BTreeSet<&str> = pairs.iter().map(|(n, _)| n.as_str()).collect();
    if pk_set != parsed_set {
        return None;
    }

    let mut decoded: Vec<(String, SqlValue)> = Vec::with_capacity(pairs.len());
    for (name, lexical) in pairs {
        let column = table.column(&name)?;
        let literal = Literal { lexical_form: lexical, language: None, datatype: None };
        let value = ValueCodec::sql_literal_from_rdf(&literal, column.sql_type).ok()?;
        decoded.push((name, value));
    }

    let mut ordered = Vec::with_capacity(decoded.len());
    for pk_col in &table.primary_key {
        let idx = decoded.iter().position(|(n, _)| n == pk_col)?;
        ordered.push(decoded.remove(idx));
    }
    Some((table, ordered))
}

fn pk_eq_filters(table: &Table, pk_values: &[(String, SqlValue)]) -> Vec<Filter> {
    pk_values.iter().map(|(name, value)| Filter::Eq(name.clone(), value.clone())).collect()
}

fn literal_candidate_columns<'t>(table: &'t Table, literal: &Literal) -> Vec<&'t rdb2rdf_schema::Column> {
    let types = ValueCodec::sql_literal_types(literal.datatype.as_deref());
    table.columns.iter().filter(|c| types.contains(&c.sql_type)).collect()
}

fn base_emit_plan(table: &Table) -> EmitPlan {
    EmitPlan {
        subject_source: SubjectSource::FromRow { pk_columns: table.primary_key.clone() },
        subject_table_iri: table.iri.clone(),
        subject_is_blank: table.is_blank_node_table,
        components: Vec::new(),
    }
}

/// Like [`base_emit_plan`], but for a pattern whose subject was already
/// concrete — the primary key never needs to be read back from the row.
fn known_emit_plan(table: &Table, pk_values: &[(String, SqlValue)]) -> EmitPlan {
    EmitPlan {
        subject_source: SubjectSource::Known(pk_values.to_vec()),
        subject_table_iri: table.iri.clone(),
        subject_is_blank: table.is_blank_node_table,
        components: Vec::new(),
    }
}

/// The "subject Any, predicate Any, object Any" plan: select every column,
/// outer-join every relationship, emit a type triple, one literal triple
/// per non-null column, and one reference triple per relationship whose
/// target primary key is fully non-null.
fn wildcard_all_plan(table: &Table, schema: &SchemaIndex) -> PlannedQuery {
    let mut query = SqlQuery::new(table.name.clone());
    query.select = table.columns.iter().map(|c| c.name.clone()).collect();
    query.filters = table.primary_key.iter().map(|c| Filter::IsNotNull(c.clone())).collect();

    let mut emit = base_emit_plan(table);
    emit.components.push(EmitComponent::Type);
    for column in &table.columns {
        emit.components.push(EmitComponent::Literal {
            column: column.name.clone(),
            predicate: IriCodec::format_literal_property(&table.iri, &column.name),
        });
    }
    for (i, fk) in table.foreign_keys.iter().enumerate() {
        let target = schema.table_by_name(&fk.target_table).expect("foreign keys are validated at schema build time");
        query.joins.push(Join {
            local_columns: fk.local_columns.clone(),
            target_table: fk.target_table.clone(),
            target_columns: target.primary_key.clone(),
            kind: JoinKind::Outer,
        });
        emit.components.push(EmitComponent::Reference {
            join_index: i,
            target_pk_columns: target.primary_key.clone(),
            predicate: IriCodec::format_reference_property(&table.iri, fk.local_columns.iter().map(String::as_str)),
            target_table_iri: target.iri.clone(),
            target_is_blank: target.is_blank_node_table,
        });
    }
    PlannedQuery { query, emit }
}

fn type_only_plan(table: &Table) -> PlannedQuery {
    let mut query = SqlQuery::new(table.name.clone());
    query.select = table.primary_key.clone();
    query.filters = table.primary_key.iter().map(|c| Filter::IsNotNull(c.clone())).collect();
    let mut emit = base_emit_plan(table);
    emit.components.push(EmitComponent::Type);
    PlannedQuery { query, emit }
}

fn type_predicate_plan(schema: &SchemaIndex, object: Option<Node>) -> Vec<PlannedQuery> {
    match object {
        None => schema.tables().iter().map(type_only_plan).collect(),
        Some(node) => match node.as_iri().and_then(|iri| schema.table_by_iri(iri)) {
            Some(table) => vec![type_only_plan(table)],
            None => vec![],
        },
    }
}

fn predicate_table_plan(
    schema: &SchemaIndex,
    predicate: &Node,
    object: Option<Node>,
) -> Result<Vec<PlannedQuery>, QueryError> {
    let predicate_iri = predicate.as_iri().expect("dispatcher only routes IRI predicates here");
    let (table_iri, kind) = match IriCodec::parse_predicate_iri(predicate_iri) {
        Ok(parsed) => parsed,
        Err(_) => return Ok(vec![]),
    };
    let table = match schema.table_by_iri(&table_iri) {
        Some(t) => t,
        None => return Err(UnknownProperty(predicate_iri.to_string()).into()),
    };

    match kind {
        PredicateKind::Literal(col) => {
            let column = table
                .column(&col)
                .ok_or_else(|| UnknownProperty(predicate_iri.to_string()))?;
            Ok(literal_column_plan(table, column, object))
        }
        PredicateKind::Reference(cols) => {
            let fk = table
                .foreign_key_by_columns(&cols)
                .ok_or_else(|| UnknownProperty(predicate_iri.to_string()))?
                .clone();
            Ok(reference_plan(schema, table, &fk, None, object))
        }
    }
}

fn literal_column_plan(table: &Table, column: &rdb2rdf_schema::Column, object: Option<Node>) -> Vec<PlannedQuery> {
    let mut query = SqlQuery::new(table.name.clone());
    query.select = table.primary_key.iter().cloned().chain(std::iter::once(column.name.clone())).collect();
    query.filters = table.primary_key.iter().map(|c| Filter::IsNotNull(c.clone())).collect();
    query.filters.push(Filter::IsNotNull(column.name.clone()));

    if let Some(node) = &object {
        let Some(literal) = node.as_literal() else { return vec![] };
        let Ok(value) = ValueCodec::sql_literal_from_rdf(literal, column.sql_type) else { return vec![] };
        query.filters.push(Filter::Eq(column.name.clone(), value));
    }

    let mut emit = base_emit_plan(table);
    emit.components.push(EmitComponent::Literal {
        column: column.name.clone(),
        predicate: IriCodec::format_literal_property(&table.iri, &column.name),
    });
    vec![PlannedQuery { query, emit }]
}

/// Build the reference-predicate plan shared by `predicate_table` (subject
/// wildcard) and `subject_predicate` (subject concrete).
fn reference_plan(
    schema: &SchemaIndex,
    table: &Table,
    fk: &rdb2rdf_schema::ForeignKey,
    subject: Option<(&Table, &[(String, SqlValue)])>,
    object: Option<Node>,
) -> Vec<PlannedQuery> {
    let target = schema.table_by_name(&fk.target_table).expect("validated at schema build time");
    let predicate = IriCodec::format_reference_property(&table.iri, fk.local_columns.iter().map(String::as_str));

    let mut query = SqlQuery::new(table.name.clone());
    query.select = table.primary_key.clone();
    query.filters = table.primary_key.iter().map(|c| Filter::IsNotNull(c.clone())).collect();
    if let Some((subj_table, subj_values)) = subject {
        if subj_table.iri != table.iri {
            return vec![];
        }
        query.select = Vec::new();
        query.filters = pk_eq_filters(table, subj_values);
    }
    let make_emit = || match subject {
        Some((subj_table, subj_values)) => known_emit_plan(subj_table, subj_values),
        None => base_emit_plan(table),
    };

    match object {
        None => {
            for c in &fk.local_columns {
                query.filters.push(Filter::IsNotNull(c.clone()));
            }
            query.joins.push(Join {
                local_columns: fk.local_columns.clone(),
                target_table: fk.target_table.clone(),
                target_columns: target.primary_key.clone(),
                kind: JoinKind::Outer,
            });
            let mut emit = make_emit();
            emit.components.push(EmitComponent::Reference {
                join_index: 0,
                target_pk_columns: target.primary_key.clone(),
                predicate,
                target_table_iri: target.iri.clone(),
                target_is_blank: target.is_blank_node_table,
            });
            vec![PlannedQuery { query, emit }]
        }
        Some(object_node) => {
            let Some((target_table, target_values)) = resolve_row(schema, &object_node) else { return vec![] };
            if target_table.iri != target.iri || target_values.len() != fk.local_columns.len() {
                return vec![];
            }
            for (local_col, (_, value)) in fk.local_columns.iter().zip(target_values.iter()) {
                query.filters.push(Filter::Eq(local_col.clone(), value.clone()));
            }
            let mut emit = make_emit();
            emit.components.push(EmitComponent::ReferenceKnown { predicate, object: object_node });
            vec![PlannedQuery { query, emit }]
        }
    }
}

fn subject_all_predicates_plan(schema: &SchemaIndex, subject: &Node) -> Vec<PlannedQuery> {
    let Some((table, pk_values)) = resolve_row(schema, subject) else { return vec![] };
    let mut plan = wildcard_all_plan(table, schema);
    plan.query.filters = pk_eq_filters(table, &pk_values);
    plan.emit.subject_source = SubjectSource::Known(pk_values);
    vec![plan]
}

fn subject_any_predicate_literal_plan(schema: &SchemaIndex, subject: &Node, object: &Node) -> Vec<PlannedQuery> {
    let Some((table, pk_values)) = resolve_row(schema, subject) else { return vec![] };
    let Some(literal) = object.as_literal() else { return vec![] };
    literal_candidate_columns(table, literal)
        .into_iter()
        .filter_map(|column| {
            let value = ValueCodec::sql_literal_from_rdf(literal, column.sql_type).ok()?;
            let mut query = SqlQuery::new(table.name.clone());
            query.select = vec![column.name.clone()];
            query.filters = pk_eq_filters(table, &pk_values);
            query.filters.push(Filter::Eq(column.name.clone(), value));
            let mut emit = known_emit_plan(table, &pk_values);
            emit.components.push(EmitComponent::Literal {
                column: column.name.clone(),
                predicate: IriCodec::format_literal_property(&table.iri, &column.name),
            });
            Some(PlannedQuery { query, emit })
        })
        .collect()
}

fn subject_any_predicate_ref_plan(schema: &SchemaIndex, subject: &Node, object: &Node) -> Vec<PlannedQuery> {
    let Some((table, pk_values)) = resolve_row(schema, subject) else { return vec![] };
    let Some((target_table, target_values)) = resolve_row(schema, object) else { return vec![] };
    table
        .foreign_keys
        .iter()
        .filter(|fk| fk.target_table == target_table.name && fk.local_columns.len() == target_values.len())
        .filter_map(|fk| {
            let mut query = SqlQuery::new(table.name.clone());
            query.filters = pk_eq_filters(table, &pk_values);
            for (local_col, (_, value)) in fk.local_columns.iter().zip(target_values.iter()) {
                query.filters.push(Filter::Eq(local_col.clone(), value.clone()));
            }
            let predicate = IriCodec::format_reference_property(&table.iri, fk.local_columns.iter().map(String::as_str));
            let mut emit = known_emit_plan(table, &pk_values);
            emit.components.push(EmitComponent::ReferenceKnown { predicate, object: object.clone() });
            Some(PlannedQuery { query, emit })
        })
        .collect()
}

fn subject_type_plan(schema: &SchemaIndex, subject: &Node, object: Option<Node>) -> Vec<PlannedQuery> {
    let Some((table, pk_values)) = resolve_row(schema, subject) else { return vec![] };
    if let Some(node) = &object {
        if node.as_iri() != Some(table.iri.as_str()) {
            return vec![];
        }
    }
    let mut plan = type_only_plan(table);
    plan.query.filters = pk_eq_filters(table, &pk_values);
    plan.emit.subject_source = SubjectSource::Known(pk_values);
    vec![plan]
}

fn subject_predicate_plan(
    schema: &SchemaIndex,
    subject: &Node,
    predicate: &Node,
    object: Option<Node>,
) -> Result<Vec<PlannedQuery>, QueryError> {
    let Some((table, pk_values)) = resolve_row(schema, subject) else { return Ok(vec![]) };
    let predicate_iri = predicate.as_iri().expect("dispatcher only routes IRI predicates here");
    let (table_iri, kind) = match IriCodec::parse_predicate_iri(predicate_iri) {
        Ok(parsed) => parsed,
        Err(_) => return Ok(vec![]),
    };
    if table_iri != table.iri {
        return Ok(vec![]);
    }

    match kind {
        PredicateKind::Literal(col) => {
            let column = table
                .column(&col)
                .ok_or_else(|| UnknownProperty(predicate_iri.to_string()))?;
            let mut query = SqlQuery::new(table.name.clone());
            query.select = vec![column.name.clone()];
            query.filters = pk_eq_filters(table, &pk_values);
            query.filters.push(Filter::IsNotNull(column.name.clone()));
            if let Some(node) = &object {
                let Some(literal) = node.as_literal() else { return Ok(vec![]) };
                let Ok(value) = ValueCodec::sql_literal_from_rdf(literal, column.sql_type) else { return Ok(vec![]) };
                query.filters.push(Filter::Eq(column.name.clone(), value));
            }
            let mut emit = known_emit_plan(table, &pk_values);
            emit.components.push(EmitComponent::Literal {
                column: column.name.clone(),
                predicate: IriCodec::format_literal_property(&table.iri, &column.name),
            });
            Ok(vec![PlannedQuery { query, emit }])
        }
        PredicateKind::Reference(cols) => {
            let fk = table
                .foreign_key_by_columns(&cols)
                .ok_or_else(|| UnknownProperty(predicate_iri.to_string()))?
                .clone();
            Ok(reference_plan(schema, table, &fk, Some((table, &pk_values)), object))
        }
    }
}

#[cfg(test)]
mod tests {
    use rdb2rdf_codec::SqlType;
    use rdb2rdf_schema::{RawColumn, RawForeignKey, RawSchema, RawTable};

    use super::*;

    fn schema() -> SchemaIndex {
        let raw = RawSchema {
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
        };
        SchemaIndex::build("http://ex/", &raw).unwrap()
    }

    #[test]
    fn resolve_row_decodes_pk_in_declared_order() {
        let index = schema();
        let node = Node::iri("http://ex/Employee/id=7");
        let (table, values) = resolve_row(&index, &node).unwrap();
        assert_eq!(table.name, "Employee");
        assert_eq!(values, vec![("id".to_string(), SqlValue::Integer(7))]);
    }

    #[test]
    fn resolve_row_rejects_node_with_wrong_column_set() {
        let index = schema();
        let node = Node::iri("http://ex/Employee/name=Ada");
        assert!(resolve_row(&index, &node).is_none());
    }

    #[test]
    fn resolve_row_rejects_unknown_table() {
        let index = schema();
        let node = Node::iri("http://ex/Nonexistent/id=1");
        assert!(resolve_row(&index, &node).is_none());
    }

    #[test]
    fn type_only_plan_selects_and_filters_primary_key() {
        let index = schema();
        let table = index.table_by_name("Employee").unwrap();
        let plan = type_only_plan(table);
        assert_eq!(plan.query.select, vec!["id".to_string()]);
        assert_eq!(plan.query.filters, vec![Filter::IsNotNull("id".into())]);
        assert!(matches!(plan.emit.components.as_slice(), [EmitComponent::Type]));
    }

    #[test]
    fn wildcard_all_plan_outer_joins_every_relationship() {
        let index = schema();
        let table = index.table_by_name("Employee").unwrap();
        let plan = wildcard_all_plan(table, &index);
        assert_eq!(plan.query.joins.len(), 1);
        assert_eq!(plan.query.joins[0].kind, JoinKind::Outer);
        assert!(plan
            .emit
            .components
            .iter()
            .any(|c| matches!(c, EmitComponent::Reference { .. })));
    }

    #[test]
    fn subject_predicate_plan_pushes_target_pk_into_filters_for_concrete_object() {
        let index = schema();
        let subject = Node::iri("http://ex/Employee/id=2");
        let predicate = IriCodec::format_reference_property("http://ex/Employee", ["manager_id"]);
        let object = Node::iri("http://ex/Employee/id=1");
        let plans = subject_predicate_plan(&index, &subject, &predicate, Some(object)).unwrap();
        assert_eq!(plans.len(), 1);
        assert!(plans[0].query.joins.is_empty());
        assert!(plans[0].query.filters.contains(&Filter::Eq("manager_id".into(), SqlValue::Integer(1))));
    }
}
