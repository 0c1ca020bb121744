//! `StoreFacade`: the public entry point over a reflected schema and a
//! live relational connection

use rdb2rdf_model::{Node, Triple};
use rdb2rdf_query::{QueryPlanner, TriplePattern, TripleStreamer};
use rdb2rdf_schema::{CountQuery, RdbConnection, SchemaIndex};

use crate::config::{ConnectionArgs, StoreConfiguration};
use crate::error::StoreError;
use crate::namespaces::NamespaceTable;

/// The public triple-store surface: `open`/`close`/`commit`/`rollback`,
/// `triples`/`len`, and namespace binding, built over a `SchemaIndex` and
/// an `RdbConnection` instead of a local storage engine.
pub struct StoreFacade {
    id: Option<Node>,
    connection: Option<Box<dyn RdbConnection>>,
    schema: Option<SchemaIndex>,
    namespaces: NamespaceTable,
}

impl StoreFacade {
    /// The store asserts no named graphs beyond the implicit default one.
    pub const CONTEXT_AWARE: bool = false;
    /// No N3-style formula/quoted-graph support.
    pub const FORMULA_AWARE: bool = false;
    /// No distinct graph objects beyond the store itself.
    pub const GRAPH_AWARE: bool = false;
    /// `open` begins a transaction; `commit`/`rollback` are meaningful.
    pub const TRANSACTION_AWARE: bool = true;

    /// Resolve `configuration` to a connection, reflect its schema if
    /// `reflect` is set, and begin a transaction.
    ///
    /// `factory` is only consulted for the `Args`/`Json` configuration
    /// shapes — a `Direct` configuration already carries its connection.
    /// `create` requests that the backing schema be created before
    /// reflection; `RdbConnection` in this crate exposes no schema-creation
    /// hook (connection management and schema definition are both
    /// out-of-scope collaborators here), so a `create` request is honored
    /// as a no-op with a logged warning rather than silently ignored.
    pub fn open(
        id: Option<Node>,
        base_iri: &str,
        configuration: StoreConfiguration,
        factory: impl FnOnce(&ConnectionArgs) -> Result<Box<dyn RdbConnection>, rdb2rdf_schema::BackendError>,
        create: bool,
        reflect: bool,
    ) -> Result<StoreFacade, StoreError> {
        let connection = match configuration {
            StoreConfiguration::Direct(connection) => connection,
            StoreConfiguration::Args(args) => factory(&args)?,
        };
        if create {
            tracing::warn!("StoreFacade::open(create=true) requested but RdbConnection exposes no schema-creation hook; proceeding as if create=false");
        }

        let schema = if reflect {
            tracing::debug!(base_iri, "reflecting schema");
            Some(SchemaIndex::build(base_iri, connection.schema())?)
        } else {
            None
        };

        Ok(StoreFacade { id, connection: Some(connection), schema, namespaces: NamespaceTable::default() })
    }

    /// `open(..., create: true, reflect: true)`, exposed as a direct
    /// synonym for API parity with the original's `create()` method.
    pub fn create(
        id: Option<Node>,
        base_iri: &str,
        configuration: StoreConfiguration,
        factory: impl FnOnce(&ConnectionArgs) -> Result<Box<dyn RdbConnection>, rdb2rdf_schema::BackendError>,
    ) -> Result<StoreFacade, StoreError> {
        Self::open(id, base_iri, configuration, factory, true, true)
    }

    /// The store's own identifying node, distinct from its base IRI.
    pub fn id(&self) -> Option<&Node> {
        self.id.as_ref()
    }

    pub fn base_iri(&self) -> Option<&str> {
        self.schema.as_ref().map(SchemaIndex::base_iri)
    }

    /// Reflect (or re-reflect) the schema against the open connection.
    pub fn reflect(&mut self, base_iri: &str) -> Result<(), StoreError> {
        let connection = self.connection.as_deref().ok_or_else(|| StoreError::Configuration("store is closed".into()))?;
        self.schema = Some(SchemaIndex::build(base_iri, connection.schema())?);
        Ok(())
    }

    fn schema(&self) -> Result<&SchemaIndex, StoreError> {
        self.schema.as_ref().ok_or_else(|| StoreError::Configuration("schema has not been reflected".into()))
    }

    fn connection(&self) -> Result<&dyn RdbConnection, StoreError> {
        self.connection.as_deref().ok_or_else(|| StoreError::Configuration("store is closed".into()))
    }

    /// Commit the open transaction and immediately begin a fresh one.
    pub fn commit(&mut self) -> Result<(), StoreError> {
        tracing::debug!("commit");
        self.connection.as_deref_mut().ok_or_else(|| StoreError::Configuration("store is closed".into()))?.commit()?;
        Ok(())
    }

    /// Roll back the open transaction without beginning a new one.
    pub fn rollback(&mut self) -> Result<(), StoreError> {
        tracing::debug!("rollback");
        self.connection.as_deref_mut().ok_or_else(|| StoreError::Configuration("store is closed".into()))?.rollback()?;
        Ok(())
    }

    /// Commit or roll back the open transaction per `commit_pending`, then
    /// drop the connection.
    pub fn close(&mut self, commit_pending: bool) -> Result<(), StoreError> {
        if let Some(connection) = self.connection.as_deref_mut() {
            if commit_pending {
                connection.commit()?;
            } else {
                connection.rollback()?;
            }
        }
        self.connection = None;
        self.schema = None;
        Ok(())
    }

    /// A pattern match over the virtual graph, streamed lazily. A non-null
    /// `context` that is not a blank-node-identified graph yields an empty
    /// stream — the store has no other notion of a named graph.
    pub fn triples<'a>(&'a self, pattern: &TriplePattern, context: Option<&Node>) -> Result<TripleStreamer<'a>, StoreError> {
        let schema = self.schema()?;
        let connection = self.connection()?;
        if !context_is_default_graph(context) {
            return Ok(TripleStreamer::new(connection, Vec::new()));
        }
        let handler_name = std::any::type_name::<TriplePattern>();
        let plans = QueryPlanner::plan(schema, pattern)?;
        tracing::debug!(handler = handler_name, plan_count = plans.len(), "planned triples() call");
        Ok(TripleStreamer::new(connection, plans))
    }

    /// The store's total triple count. Per `spec.md` §6, any non-null
    /// `context` returns `0` unconditionally (not gated on the
    /// blank-node-graph check `triples` applies).
    pub fn len(&self, context: Option<&Node>) -> Result<u64, StoreError> {
        if context.is_some() {
            return Ok(0);
        }
        let schema = self.schema()?;
        let connection = self.connection()?;
        let mut total = 0u64;
        for table in schema.tables() {
            let query = CountQuery {
                table: table.name.clone(),
                pk_column: table.primary_key.first().cloned().expect("pseudo-primary-key inference never yields an empty key"),
                literal_columns: table.columns.iter().map(|c| c.name.clone()).collect(),
                relationships: table.foreign_keys.iter().map(|fk| fk.local_columns.clone()).collect(),
            };
            total += connection.count(&query)?;
        }
        Ok(total)
    }

    pub fn bind(&mut self, prefix: &str, namespace: &str) {
        self.namespaces.bind(prefix, namespace);
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.namespaces.namespace(prefix)
    }

    pub fn prefix(&self, namespace: &str) -> Option<&str> {
        self.namespaces.prefix(namespace)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = (&str, &str)> {
        self.namespaces.iter()
    }

    /// The store exposes no named contexts.
    pub fn contexts(&self, _triple: Option<&Triple>) -> std::iter::Empty<Node> {
        std::iter::empty()
    }
}

/// `context` is either absent, or a blank node (the original's "a graph
/// whose identifier is a blank node" check for the implicit default
/// graph).
fn context_is_default_graph(context: Option<&Node>) -> bool {
    matches!(context, None | Some(Node::Blank(_)))
}

#[cfg(test)]
mod tests {
    use rdb2rdf_codec::SqlType;
    use rdb2rdf_codec::SqlValue;
    use rdb2rdf_schema::testing::InMemoryConnection;
    use rdb2rdf_schema::{RawColumn, RawForeignKey, RawSchema, RawTable};

    use super::*;

    fn seeded_connection() -> InMemoryConnection {
        let schema = RawSchema {
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
        let mut conn = InMemoryConnection::new(schema);
        conn.insert_row("Employee", [("id".to_string(), SqlValue::Integer(1)), ("name".to_string(), SqlValue::Text("Ada".into()))]);
        conn.insert_row(
            "Employee",
            [
                ("id".to_string(), SqlValue::Integer(2)),
                ("name".to_string(), SqlValue::Text("Bo".into())),
                ("manager_id".to_string(), SqlValue::Integer(1)),
            ],
        );
        conn
    }

    fn open_store(conn: InMemoryConnection) -> StoreFacade {
        StoreFacade::open(None, "http://ex/", StoreConfiguration::Direct(Box::new(conn)), |_| unreachable!(), false, true).unwrap()
    }

    #[test]
    fn len_matches_the_worked_example() {
        let store = open_store(seeded_connection());
        assert_eq!(store.len(None).unwrap(), 8);
    }

    #[test]
    fn len_with_any_context_is_zero() {
        let store = open_store(seeded_connection());
        assert_eq!(store.len(Some(&Node::iri("http://ex/g"))).unwrap(), 0);
    }

    #[test]
    fn triples_wildcard_matches_len() {
        let store = open_store(seeded_connection());
        let count = store.triples(&TriplePattern::any(), None).unwrap().count();
        assert_eq!(count as u64, store.len(None).unwrap());
    }

    #[test]
    fn triples_with_non_blank_context_is_empty() {
        let store = open_store(seeded_connection());
        let count = store.triples(&TriplePattern::any(), Some(&Node::iri("http://ex/g"))).unwrap().count();
        assert_eq!(count, 0);
    }

    #[test]
    fn triples_with_blank_context_behaves_as_default_graph() {
        let store = open_store(seeded_connection());
        let count = store.triples(&TriplePattern::any(), Some(&Node::blank("g"))).unwrap().count();
        assert_eq!(count as u64, store.len(None).unwrap());
    }

    #[test]
    fn close_then_triples_is_a_configuration_error() {
        let mut store = open_store(seeded_connection());
        store.close(false).unwrap();
        assert!(store.triples(&TriplePattern::any(), None).is_err());
    }

    #[test]
    fn bind_round_trips_through_the_facade() {
        let mut store = open_store(seeded_connection());
        store.bind("ex", "http://ex/");
        assert_eq!(store.namespace("ex"), Some("http://ex/"));
        assert_eq!(store.prefix("http://ex/"), Some("ex"));
        assert_eq!(store.namespaces().count(), 1);
    }

    #[test]
    fn contexts_is_always_empty() {
        let store = open_store(seeded_connection());
        assert_eq!(store.contexts(None).count(), 0);
    }
}
