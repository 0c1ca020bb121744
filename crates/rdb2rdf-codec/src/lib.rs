//! SQL-value/RDF-literal and IRI codecs for the rdb2rdf direct mapping
//!
//! These two codecs are the invertible core the rest of the store is built
//! around: `value` converts a tagged SQL value to and from an RDF literal
//! with a canonical datatype, and `iri` formats and parses the row-node and
//! predicate IRIs that the value codec's lexical forms get embedded in.

mod error;
mod iri;
mod value;

pub use error::{IriError, ValueDecodeError};
pub use iri::{percent_decode, percent_encode, IriCodec, PredicateKind};
pub use value::{SqlType, SqlValue, ValueCodec};
