//! RDF node and literal types
//!
//! Mirrors the shape of a direct-mapping triple's three slots: an IRI or
//! blank-node subject, an IRI predicate, and an IRI or literal object.

use std::fmt;

/// An RDF node: an IRI, a literal, or a blank node.
///
/// There is no quoted-triple or variable variant — this store never nests
/// triples (RDF-star) and patterns are expressed as `Option<Node>` wildcards
/// rather than bound SPARQL variables.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Node {
    /// An IRI reference, e.g. `http://example.org/Employee/id=1`.
    Iri(String),
    /// A literal value, e.g. `"Ada"` or `"1"^^xsd:integer`.
    Literal(Literal),
    /// A blank node, identified by the same string a row node would use if
    /// the table carried a declared primary key.
    Blank(String),
}

/// An RDF literal: a lexical form with an optional language tag or datatype.
///
/// At most one of `language` and `datatype` is ever set — the two are
/// mutually exclusive in RDF 1.1.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    /// The lexical form (string representation) of the value.
    pub lexical_form: String,
    /// An `xml:lang` language tag, e.g. `"en"`.
    pub language: Option<String>,
    /// A datatype IRI, e.g. `"http://www.w3.org/2001/XMLSchema#integer"`.
    pub datatype: Option<String>,
}

impl Node {
    /// Create an IRI node.
    pub fn iri<S: Into<String>>(iri: S) -> Self {
        Node::Iri(iri.into())
    }

    /// Create a plain (untyped, unlocalized) literal node.
    pub fn literal<S: Into<String>>(value: S) -> Self {
        Node::Literal(Literal {
            lexical_form: value.into(),
            language: None,
            datatype: None,
        })
    }

    /// Create a typed literal node.
    pub fn typed_literal<S: Into<String>, D: Into<String>>(value: S, datatype: D) -> Self {
        Node::Literal(Literal {
            lexical_form: value.into(),
            language: None,
            datatype: Some(datatype.into()),
        })
    }

    /// Create a language-tagged literal node.
    pub fn lang_literal<S: Into<String>, L: Into<String>>(value: S, lang: L) -> Self {
        Node::Literal(Literal {
            lexical_form: value.into(),
            language: Some(lang.into()),
            datatype: None,
        })
    }

    /// Create a blank node with the given label.
    pub fn blank<S: Into<String>>(label: S) -> Self {
        Node::Blank(label.into())
    }

    /// True if this is an IRI node.
    pub fn is_iri(&self) -> bool {
        matches!(self, Node::Iri(_))
    }

    /// True if this is a literal node.
    pub fn is_literal(&self) -> bool {
        matches!(self, Node::Literal(_))
    }

    /// True if this is a blank node.
    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Blank(_))
    }

    /// Get the IRI string, if this is an IRI node.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Node::Iri(s) => Some(s),
            _ => None,
        }
    }

    /// Get the literal, if this is a literal node.
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Get the blank-node label, if this is a blank node.
    pub fn as_blank(&self) -> Option<&str> {
        match self {
            Node::Blank(s) => Some(s),
            _ => None,
        }
    }
}

impl Literal {
    /// True if this literal has neither a language tag nor a datatype.
    pub fn is_plain(&self) -> bool {
        self.language.is_none() && self.datatype.is_none()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) => write!(f, "<{}>", iri),
            Node::Literal(lit) => write!(f, "{}", lit),
            Node::Blank(label) => write!(f, "_:{}", label),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.lexical_form)?;
        if let Some(lang) = &self.language {
            write!(f, "@{}", lang)?;
        } else if let Some(dt) = &self.datatype {
            write!(f, "^^<{}>", dt)?;
        }
        Ok(())
    }
}
