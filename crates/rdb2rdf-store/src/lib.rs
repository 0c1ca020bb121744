//! `StoreFacade`: the public entry point for the rdb2rdf virtual triple
//! store
//!
//! Wires a reflected [`rdb2rdf_schema::SchemaIndex`], an
//! [`rdb2rdf_schema::RdbConnection`], and [`rdb2rdf_query`]'s planner and
//! streamer behind one façade, plus the configuration and namespace-binding
//! surface a caller needs around it.

mod config;
mod error;
mod facade;
mod namespaces;

pub use config::{ConnectionArgs, StoreConfiguration};
pub use error::StoreError;
pub use facade::StoreFacade;
pub use namespaces::NamespaceTable;
