//! Delta graph: an overlay of additions/deletions on a base graph (§4.C).
//!
//! The base is held as a [`SharedGraph`] (`Arc<RwLock<dyn Graph>>`) rather
//! than a borrowed reference: Rust has no lifetime that would let a
//! `DeltaGraph` outlive a stack-borrowed base while living inside a
//! [`crate::dataset::Dataset`], so ownership is made explicit through
//! reference counting instead (§9 "Cyclic references in delta + dataset").
//! A delta constructed from the sole `Arc` to its base is the "owning"
//! variant the design notes describe; one constructed from a clone held
//! elsewhere is the "borrowing" variant — either way, dropping (or
//! explicitly [`DeltaGraph::close`]-ing) the delta only frees the base once
//! every other owner has done the same.

use std::sync::{Arc, RwLock};

use crate::graph::{Graph, IndexStrategy, IndexedGraph, PrefixMap, TriplePattern};
use crate::term::Triple;

/// A graph shared by reference count, used as a delta's base or as one
/// member of a [`crate::union_graph::DisjointUnionGraph`].
pub type SharedGraph = Arc<RwLock<dyn Graph>>;

pub fn shared(graph: impl Graph + 'static) -> SharedGraph {
    Arc::new(RwLock::new(graph))
}

/// Overlay of `additions`/`deletions` on `base`. Invariants maintained on
/// every mutation (§3, §4.C): `deletions ⊆ base`, `additions ∩ base = ∅`.
#[derive(Debug)]
pub struct DeltaGraph {
    base: SharedGraph,
    additions: IndexedGraph,
    deletions: IndexedGraph,
    prefixes: PrefixMap,
}

impl DeltaGraph {
    pub fn new(base: SharedGraph) -> Self {
        Self {
            base,
            additions: IndexedGraph::new(IndexStrategy::LazyParallel),
            deletions: IndexedGraph::new(IndexStrategy::Minimal),
            prefixes: PrefixMap::new(),
        }
    }

    /// Construct directly from pre-computed addition/deletion sets, e.g.
    /// forward/reverse differences applied to a predecessor
    /// (`differenceModelToFullModel`, §6). `deletions` must already be a
    /// subset of `base` and `additions` disjoint from it; this is not
    /// re-validated (callers vouch for it, per [`Self::rebase`]).
    pub fn from_parts(base: SharedGraph, additions: IndexedGraph, deletions: IndexedGraph) -> Self {
        Self {
            base,
            additions,
            deletions,
            prefixes: PrefixMap::new(),
        }
    }

    fn base_contains(&self, triple: &Triple) -> bool {
        self.base.read().expect("base graph lock poisoned").contains(triple)
    }

    fn base_find(&self, pattern: &TriplePattern) -> Vec<Triple> {
        self.base.read().expect("base graph lock poisoned").find(pattern)
    }

    fn base_size(&self) -> usize {
        self.base.read().expect("base graph lock poisoned").size()
    }

    /// Reuse the same addition/deletion sets against a different base. The
    /// caller vouches that the sets remain valid for the new base (§4.C).
    pub fn rebase(&mut self, new_base: SharedGraph) {
        self.base = new_base;
    }

    /// Drop this delta's ownership stake in its base, additions, and
    /// deletions. The base's underlying storage is only freed once every
    /// other [`SharedGraph`] clone has also been dropped.
    pub fn close(self) {
        drop(self);
    }
}

impl Graph for DeltaGraph {
    fn add(&mut self, triple: Triple) -> bool {
        self.deletions.delete(&triple);
        if self.base_contains(&triple) {
            false
        } else {
            self.additions.add(triple)
        }
    }

    fn delete(&mut self, triple: &Triple) -> bool {
        let removed_from_additions = self.additions.delete(triple);
        if self.base_contains(triple) {
            self.deletions.add(triple.clone());
            true
        } else {
            removed_from_additions
        }
    }

    fn contains(&self, triple: &Triple) -> bool {
        if self.base_contains(triple) {
            !self.deletions.contains(triple)
        } else {
            self.additions.contains(triple)
        }
    }

    fn find(&self, pattern: &TriplePattern) -> Vec<Triple> {
        let mut result: Vec<Triple> = self
            .base_find(pattern)
            .into_iter()
            .filter(|t| !self.deletions.contains(t))
            .collect();
        result.extend(self.additions.find(pattern));
        result
    }

    fn size(&self) -> usize {
        self.base_size() + self.additions.size() - self.deletions.size()
    }

    fn clear(&mut self) {
        // Clearing a delta means "delete everything visible", not
        // destroying the base it borrows.
        let everything = self.find(&TriplePattern::any());
        for t in everything {
            self.delete(&t);
        }
    }

    fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    fn prefixes_mut(&mut self) -> &mut PrefixMap {
        &mut self.prefixes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{Iri, Literal, Term};

    fn triple(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(
            Term::iri(s),
            Iri::new(p),
            Term::Literal(Literal::plain(o.to_string())),
        )
    }

    fn base_with(triples: &[Triple]) -> SharedGraph {
        let mut g = IndexedGraph::new(IndexStrategy::LazyParallel);
        for t in triples {
            g.add(t.clone());
        }
        shared(g)
    }

    #[test]
    fn size_is_base_plus_additions_minus_deletions() {
        let a = triple("urn:a", "urn:p", "1");
        let b = triple("urn:b", "urn:p", "2");
        let base = base_with(&[a.clone(), b.clone()]);
        let mut delta = DeltaGraph::new(base);
        let c = triple("urn:c", "urn:p", "3");
        delta.add(c.clone());
        delta.delete(&b);
        assert_eq!(delta.size(), 2); // a, c
        assert!(delta.contains(&a));
        assert!(delta.contains(&c));
        assert!(!delta.contains(&b));
    }

    #[test]
    fn adding_existing_base_triple_is_noop() {
        let a = triple("urn:a", "urn:p", "1");
        let base = base_with(&[a.clone()]);
        let mut delta = DeltaGraph::new(base);
        assert!(!delta.add(a.clone()));
        assert_eq!(delta.size(), 1);
    }

    #[test]
    fn deleting_absent_triple_is_noop() {
        let base = base_with(&[]);
        let mut delta = DeltaGraph::new(base);
        let ghost = triple("urn:x", "urn:p", "0");
        assert!(!delta.delete(&ghost));
        assert_eq!(delta.size(), 0);
    }

    #[test]
    fn readding_a_deleted_base_triple_clears_the_deletion() {
        let a = triple("urn:a", "urn:p", "1");
        let base = base_with(&[a.clone()]);
        let mut delta = DeltaGraph::new(base);
        delta.delete(&a);
        assert!(!delta.contains(&a));
        delta.add(a.clone());
        assert!(delta.contains(&a));
        assert_eq!(delta.size(), 1);
    }

    #[test]
    fn find_reports_net_view() {
        let a = triple("urn:a", "urn:p", "1");
        let b = triple("urn:b", "urn:p", "2");
        let base = base_with(&[a.clone(), b.clone()]);
        let mut delta = DeltaGraph::new(base);
        delta.delete(&b);
        let c = triple("urn:c", "urn:p", "3");
        delta.add(c.clone());
        let mut found = delta.find(&TriplePattern::any());
        found.sort_by_key(|t| t.subject.to_string());
        assert_eq!(found, vec![a, c]);
    }

    #[test]
    fn rebase_keeps_addition_and_deletion_sets() {
        let a = triple("urn:a", "urn:p", "1");
        let base1 = base_with(&[a.clone()]);
        let mut delta = DeltaGraph::new(base1);
        let c = triple("urn:c", "urn:p", "3");
        delta.add(c.clone());
        let base2 = base_with(&[]);
        delta.rebase(base2);
        assert!(delta.contains(&c));
        assert!(!delta.contains(&a)); // no longer in the new base
    }
}
