//! Error types for the value and IRI codecs

use thiserror::Error;

/// An RDF literal could not be converted into its target SQL type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueDecodeError {
    /// The literal's lexical form does not parse as the target SQL type.
    #[error("lexical form {lexical_form:?} is not a valid {sql_type:?}")]
    MalformedLexicalForm {
        lexical_form: String,
        sql_type: crate::value::SqlType,
    },
    /// The literal carries a datatype that the target SQL type never accepts.
    #[error("datatype {datatype:?} is not accepted for {sql_type:?}")]
    UnacceptedDatatype {
        datatype: String,
        sql_type: crate::value::SqlType,
    },
}

/// A row-node or predicate IRI does not conform to the wire format.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IriError {
    /// The IRI does not parse as a row node, table IRI, or predicate IRI.
    #[error("{0:?} is not a well-formed direct-mapping IRI")]
    InvalidNodeSyntax(String),
    /// The IRI parses, but names a node of a kind the caller did not expect
    /// (e.g. a table IRI where a row node was required).
    #[error("{0:?} does not name the expected kind of node")]
    NodeKindMismatch(String),
}
