//! Reflected schema, pseudo-primary-key inference, and the relational
//! collaborator interfaces the rest of the store is built on
//!
//! Connection management and schema reflection themselves are out of
//! scope — [`RdbConnection`] is the seam a real driver plugs into.
//! [`SchemaIndex`] is what this crate actually owns: the immutable,
//! IRI-keyed view of the database that pattern dispatch and query planning
//! read from.

mod connection;
mod error;
mod index;
mod pseudo_pk;
mod query_ir;
mod raw;

#[cfg(feature = "testing")]
pub mod testing;

pub use connection::{CountQuery, RdbConnection, Row, RowStream};
pub use error::{BackendError, SchemaError, UnknownProperty};
pub use index::{Column, ForeignKey, SchemaIndex, Table};
pub use pseudo_pk::{PseudoPrimaryKey, PseudoPrimaryKeyInference};
pub use query_ir::{ColumnRef, Join, JoinKind, SqlQuery, Filter};
pub use raw::{RawColumn, RawForeignKey, RawSchema, RawTable};
