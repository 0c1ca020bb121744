//! Table-IRI, row-node, and predicate-IRI encoding
//!
//! Every identifier this store mints is built out of percent-encoded
//! fragments joined by `/`, `#`, `=`, and `;` — see the wire-format grammar
//! below. Parsing is the exact inverse of formatting; round-tripping a
//! formatted node back through the parser is a load-bearing property tested
//! in `tests/`.

use std::collections::BTreeSet;

use rdb2rdf_model::Node;

use crate::error::IriError;
use crate::value::{SqlValue, ValueCodec};

/// What a predicate IRI names once parsed: a single literal-property column,
/// or the unordered set of local columns behind a reference property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PredicateKind {
    Literal(String),
    Reference(BTreeSet<String>),
}

/// Percent-encode every byte of `s` not in the URI unreserved set
/// (`A-Za-z0-9-._~`). Operates on the UTF-8 bytes of `s`, so multi-byte
/// characters encode as a run of `%XX` triples.
pub fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

/// Inverse of [`percent_encode`]. Returns `None` if a `%` is not followed by
/// two hex digits, or if the decoded bytes are not valid UTF-8.
pub fn percent_decode(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = s.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

/// Encoding and parsing of table-IRIs, row nodes, and predicate IRIs.
pub struct IriCodec;

impl IriCodec {
    /// Build a table-IRI by percent-encoding `name` and prefixing `base`.
    pub fn table_iri(base: &str, name: &str) -> String {
        format!("{}{}", base, percent_encode(name))
    }

    /// Strip `base` from `iri`, returning the remainder iff `iri` actually
    /// starts with it.
    ///
    /// The original implementation this mapping is drawn from tried to build
    /// a regex from a single argument here, which can never succeed; a
    /// plain prefix strip is both correct and what was clearly intended.
    pub fn unprefix<'a>(base: &str, iri: &'a str) -> Option<&'a str> {
        iri.strip_prefix(base)
    }

    /// Render a row node: percent-encode each `(column, value)` pair's name
    /// and RDF lexical form, join as `col=value` segments with `;`, and
    /// append to `<table_iri>/`. The node is a blank node iff `is_blank`.
    ///
    /// `columns` must already be filtered to non-null primary-key values in
    /// the table's declared column order — this function does not inspect
    /// the schema and has no way to tell a missing column from one that was
    /// simply never passed in.
    pub fn format_row_node(table_iri: &str, columns: &[(String, SqlValue)], is_blank: bool) -> Node {
        let segment = columns
            .iter()
            .map(|(name, value)| {
                let lexical = ValueCodec::rdf_literal_from_sql(value).lexical_form;
                format!("{}={}", percent_encode(name), percent_encode(&lexical))
            })
            .collect::<Vec<_>>()
            .join(";");
        let label = format!("{}/{}", table_iri, segment);
        if is_blank {
            Node::blank(label)
        } else {
            Node::iri(label)
        }
    }

    /// Parse a row node back into its table-IRI and `(column, lexical-form)`
    /// pairs.
    ///
    /// `expected_blank` is the target table's `is_blank_node_table` flag —
    /// the node's kind (blank vs. IRI) must agree with it, or parsing fails
    /// with [`IriError::NodeKindMismatch`] rather than silently accepting a
    /// node of the wrong kind.
    pub fn parse_row_node(
        node: &Node,
        expected_blank: bool,
    ) -> Result<(String, Vec<(String, String)>), IriError> {
        let label = match node {
            Node::Iri(s) if !expected_blank => s.as_str(),
            Node::Blank(s) if expected_blank => s.as_str(),
            Node::Iri(s) | Node::Blank(s) => return Err(IriError::NodeKindMismatch(s.clone())),
            Node::Literal(_) => {
                return Err(IriError::InvalidNodeSyntax("a literal is not a row node".into()))
            }
        };
        let slash = label
            .rfind('/')
            .ok_or_else(|| IriError::InvalidNodeSyntax(label.to_string()))?;
        let table_iri = &label[..slash];
        let tail = &label[slash + 1..];
        let mut pairs = Vec::new();
        for segment in tail.split(';') {
            let eq = segment
                .find('=')
                .ok_or_else(|| IriError::InvalidNodeSyntax(label.to_string()))?;
            let name = percent_decode(&segment[..eq])
                .ok_or_else(|| IriError::InvalidNodeSyntax(label.to_string()))?;
            let value = percent_decode(&segment[eq + 1..])
                .ok_or_else(|| IriError::InvalidNodeSyntax(label.to_string()))?;
            pairs.push((name, value));
        }
        Ok((table_iri.to_string(), pairs))
    }

    /// Build a literal-property IRI: `<table_iri>#<encoded-colname>`.
    pub fn format_literal_property(table_iri: &str, colname: &str) -> Node {
        Node::iri(format!("{}#{}", table_iri, percent_encode(colname)))
    }

    /// Build a reference-property IRI: `<table_iri>#ref-<col1>;<col2>;…`,
    /// with column names rendered in the order given (schema-declared
    /// order for the relationship's local columns).
    pub fn format_reference_property<'a>(
        table_iri: &str,
        colnames: impl IntoIterator<Item = &'a str>,
    ) -> Node {
        let encoded = colnames
            .into_iter()
            .map(percent_encode)
            .collect::<Vec<_>>()
            .join(";");
        Node::iri(format!("{}#ref-{}", table_iri, encoded))
    }

    /// Parse a predicate IRI into its table-IRI and kind.
    pub fn parse_predicate_iri(iri: &str) -> Result<(String, PredicateKind), IriError> {
        let hash = iri
            .rfind('#')
            .ok_or_else(|| IriError::InvalidNodeSyntax(iri.to_string()))?;
        let table_iri = &iri[..hash];
        let fragment = &iri[hash + 1..];
        if let Some(rest) = fragment.strip_prefix("ref-") {
            let cols = rest
                .split(';')
                .map(|c| percent_decode(c).ok_or_else(|| IriError::InvalidNodeSyntax(iri.to_string())))
                .collect::<Result<BTreeSet<_>, _>>()?;
            Ok((table_iri.to_string(), PredicateKind::Reference(cols)))
        } else {
            let col =
                percent_decode(fragment).ok_or_else(|| IriError::InvalidNodeSyntax(iri.to_string()))?;
            Ok((table_iri.to_string(), PredicateKind::Literal(col)))
        }
    }
}
