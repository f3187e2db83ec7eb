//! Disjoint, non-deduplicating union of several graphs (§4.D).
//!
//! Used to present "header + body" as a single graph cheaply
//! (`fullModelToSingleGraph`, §6): no component is copied, and a triple
//! present in two members is reported twice. Read-only: mutation would be
//! ambiguous about which member should receive it.

use crate::delta::SharedGraph;
use crate::graph::{PrefixMap, TriplePattern};
use crate::term::Triple;

/// Read-only concatenation of `find`/`size` over an ordered list of graphs.
#[derive(Debug)]
pub struct DisjointUnionGraph {
    members: Vec<SharedGraph>,
    prefixes: PrefixMap,
}

impl DisjointUnionGraph {
    pub fn new(members: Vec<SharedGraph>) -> Self {
        Self {
            members,
            prefixes: PrefixMap::new(),
        }
    }

    /// Supply the prefix map to present (typically the header's, per
    /// `fullModelToSingleGraph`'s "header's prefixes" requirement, §6).
    pub fn with_prefixes(mut self, prefixes: PrefixMap) -> Self {
        self.prefixes = prefixes;
        self
    }

    pub fn find(&self, pattern: &TriplePattern) -> Vec<Triple> {
        self.members
            .iter()
            .flat_map(|g| g.read().expect("member graph lock poisoned").find(pattern))
            .collect()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.members
            .iter()
            .any(|g| g.read().expect("member graph lock poisoned").contains(triple))
    }

    pub fn size(&self) -> usize {
        self.members
            .iter()
            .map(|g| g.read().expect("member graph lock poisoned").size())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::shared;
    use crate::graph::{IndexStrategy, IndexedGraph};
    use crate::term::{Iri, Literal, Term};
    use crate::graph::Graph;

    fn triple(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(
            Term::iri(s),
            Iri::new(p),
            Term::Literal(Literal::plain(o.to_string())),
        )
    }

    #[test]
    fn duplicate_triples_across_members_are_not_deduplicated() {
        let shared_triple = triple("urn:a", "urn:p", "1");
        let mut g1 = IndexedGraph::new(IndexStrategy::Minimal);
        g1.add(shared_triple.clone());
        let mut g2 = IndexedGraph::new(IndexStrategy::Minimal);
        g2.add(shared_triple.clone());

        let union = DisjointUnionGraph::new(vec![shared(g1), shared(g2)]);
        assert_eq!(union.size(), 2);
        assert_eq!(union.find(&TriplePattern::any()).len(), 2);
    }

    #[test]
    fn size_sums_member_sizes() {
        let mut g1 = IndexedGraph::new(IndexStrategy::Minimal);
        g1.add(triple("urn:a", "urn:p", "1"));
        let mut g2 = IndexedGraph::new(IndexStrategy::Minimal);
        g2.add(triple("urn:b", "urn:p", "2"));
        g2.add(triple("urn:c", "urn:p", "3"));

        let union = DisjointUnionGraph::new(vec![shared(g1), shared(g2)]);
        assert_eq!(union.size(), 3);
    }
}
