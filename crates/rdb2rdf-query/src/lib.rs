//! Triple-pattern dispatch, SQL query planning, and lazy triple streaming
//!
//! Given a triple pattern and a reflected [`rdb2rdf_schema::SchemaIndex`],
//! this crate decides which relational queries (if any) could produce
//! matching triples, and turns each query's result rows into triples one
//! row at a time. Nothing here touches an `RdbConnection` except through
//! the trait — this crate never assumes a particular backend.

mod dispatcher;
mod error;
mod pattern;
mod planner;
mod streamer;

pub use dispatcher::{dispatch, Handler};
pub use error::QueryError;
pub use pattern::TriplePattern;
pub use planner::{EmitComponent, EmitPlan, PlannedQuery, QueryPlanner, SubjectSource};
pub use streamer::TripleStreamer;
