//! Errors a query plan can fail with

use rdb2rdf_schema::{BackendError, UnknownProperty};
use thiserror::Error;

/// Errors surfaced while planning or streaming a triple pattern.
///
/// Per the propagation policy: a pattern that parses but plainly cannot
/// match anything (unknown table, malformed row node) is not an error at
/// all — the dispatcher and planner just produce an empty plan for it. This
/// type only covers failures that *are* surfaced to the caller.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    UnknownProperty(#[from] UnknownProperty),
    #[error(transparent)]
    Backend(#[from] BackendError),
}
