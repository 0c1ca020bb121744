//! The triple pattern the dispatcher and planner operate on

use rdb2rdf_model::Node;

/// A triple pattern: each slot is either a wildcard (`None`) or bound to a
/// concrete node.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TriplePattern {
    pub subject: Option<Node>,
    pub predicate: Option<Node>,
    pub object: Option<Node>,
}

impl TriplePattern {
    pub fn new(subject: Option<Node>, predicate: Option<Node>, object: Option<Node>) -> Self {
        TriplePattern { subject, predicate, object }
    }

    pub fn any() -> Self {
        TriplePattern::default()
    }

    /// True if the predicate slot is bound to `rdf:type`.
    pub fn predicate_is_rdf_type(&self) -> bool {
        self.predicate
            .as_ref()
            .and_then(Node::as_iri)
            .is_some_and(|iri| iri == rdb2rdf_model::Vocabulary::RDF_TYPE)
    }
}
