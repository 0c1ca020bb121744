//! Owned RDF node, literal and triple types for the direct-mapping store
//!
//! Unlike a parsed-document RDF toolkit, this store never owns a corpus of
//! interned strings to borrow from: every node is synthesized on demand from
//! a row streamed out of a relational backend. Nodes here are therefore
//! owned (`String`-backed) rather than lifetime-bound, trading a little
//! allocation for a representation that can be built, returned, and dropped
//! per row without pinning a borrow to the query that produced it.

mod node;
mod triple;
mod vocab;

pub use node::{Literal, Node};
pub use triple::Triple;
pub use vocab::Vocabulary;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_compiles() {
        let n = Node::iri("http://example.org/x");
        assert!(n.is_iri());
    }
}
