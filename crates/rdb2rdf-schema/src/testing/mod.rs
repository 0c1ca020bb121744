//! An in-process `RdbConnection` fixture, for tests and doctests only
//!
//! Mirrors the role the teacher codebase's `InMemoryBackend` plays for
//! `StorageBackend`: a tiny, fully in-memory stand-in that lets the rest of
//! the crate be exercised without a real relational driver. It is not a
//! storage engine — rows are plain `HashMap`s and every query is answered by
//! a full table scan.

mod memory;

pub use memory::{InMemoryConnection, UnknownTable};
