//! Pattern-to-handler dispatch matrix

use rdb2rdf_model::Node;

use crate::pattern::TriplePattern;

/// The handler a triple pattern routes to, carrying whatever of the
/// pattern's bound slots that handler needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Handler {
    AllTablesAllPredicates,
    /// `object` is the bound table-IRI, if the pattern's object was
    /// concrete; `None` means every table.
    TypePredicate { object: Option<Node> },
    /// Predicate is a concrete, non-`rdf:type` IRI; which table and column
    /// or relationship it names is resolved during planning.
    PredicateTable { predicate: Node, object: Option<Node> },
    SubjectAllPredicates { subject: Node },
    SubjectAnyPredicateLiteral { subject: Node, object: Node },
    SubjectAnyPredicateRef { subject: Node, object: Node },
    SubjectType { subject: Node, object: Option<Node> },
    SubjectPredicate { subject: Node, predicate: Node, object: Option<Node> },
    /// The pattern cannot possibly match anything (e.g. a literal in the
    /// predicate slot).
    Empty,
}

/// Classify a pattern by the concreteness of its three slots, per the
/// dispatch matrix.
pub fn dispatch(pattern: &TriplePattern) -> Handler {
    if let Some(predicate) = &pattern.predicate {
        if !predicate.is_iri() {
            return Handler::Empty;
        }
    }

    match (&pattern.subject, &pattern.predicate) {
        (None, None) => Handler::AllTablesAllPredicates,
        (None, Some(p)) if pattern.predicate_is_rdf_type() => {
            let _ = p;
            Handler::TypePredicate { object: pattern.object.clone() }
        }
        (None, Some(p)) => Handler::PredicateTable { predicate: p.clone(), object: pattern.object.clone() },
        (Some(s), None) => match &pattern.object {
            None => Handler::SubjectAllPredicates { subject: s.clone() },
            Some(o) if o.is_literal() => {
                Handler::SubjectAnyPredicateLiteral { subject: s.clone(), object: o.clone() }
            }
            Some(o) => Handler::SubjectAnyPredicateRef { subject: s.clone(), object: o.clone() },
        },
        (Some(s), Some(_)) if pattern.predicate_is_rdf_type() => {
            Handler::SubjectType { subject: s.clone(), object: pattern.object.clone() }
        }
        (Some(s), Some(p)) => {
            Handler::SubjectPredicate { subject: s.clone(), predicate: p.clone(), object: pattern.object.clone() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdb2rdf_model::Vocabulary;

    #[test]
    fn fully_wildcard_pattern_is_all_tables_all_predicates() {
        assert_eq!(dispatch(&TriplePattern::any()), Handler::AllTablesAllPredicates);
    }

    #[test]
    fn type_predicate_with_wildcard_subject() {
        let pattern = TriplePattern::new(None, Some(Node::iri(Vocabulary::RDF_TYPE)), None);
        assert_eq!(dispatch(&pattern), Handler::TypePredicate { object: None });
    }

    #[test]
    fn literal_predicate_is_always_empty() {
        let pattern = TriplePattern::new(None, Some(Node::literal("nope")), None);
        assert_eq!(dispatch(&pattern), Handler::Empty);
    }

    #[test]
    fn bound_subject_and_literal_object_with_any_predicate() {
        let pattern = TriplePattern::new(Some(Node::iri("http://ex/Employee/id=1")), None, Some(Node::literal("Ada")));
        assert!(matches!(dispatch(&pattern), Handler::SubjectAnyPredicateLiteral { .. }));
    }

    #[test]
    fn bound_subject_and_type_predicate() {
        let pattern = TriplePattern::new(
            Some(Node::iri("http://ex/Employee/id=1")),
            Some(Node::iri(Vocabulary::RDF_TYPE)),
            None,
        );
        assert!(matches!(dispatch(&pattern), Handler::SubjectType { .. }));
    }
}
