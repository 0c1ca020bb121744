//! The public error type `StoreFacade` surfaces
//!
//! Aggregates the lower crates' failures the way `sdk::Error` wraps
//! `storage::StorageError` — one `#[from]` arm per layer, plus a
//! `Configuration` variant of the facade's own for malformed `open`
//! arguments. `IriError` and `ValueDecodeError` never reach this far:
//! every seam that could produce one (`QueryPlanner::plan`,
//! `TripleStreamer`) already folds a parse failure on a concrete
//! subject/object into an empty result per the propagation policy, so the
//! only failures that escape a pattern match are schema/backend ones.
use rdb2rdf_query::QueryError;
use rdb2rdf_schema::{BackendError, SchemaError};
use thiserror::Error;

/// Errors a `StoreFacade` operation can fail with.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `open`'s `configuration` argument was not a connection, an
    /// `[args, kwargs]` pair, or JSON encoding the same.
    #[error("invalid store configuration: {0}")]
    Configuration(String),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Query(#[from] QueryError),
}
