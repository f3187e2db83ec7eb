//! In-memory triple store with indexed pattern lookup (§4.B).
//!
//! Two indexing strategies are offered, matching the two graph roles the
//! parser creates (§4.H): `Minimal` for small header graphs where a linear
//! scan is cheap enough, and `LazyParallel` for body/difference graphs where
//! an index pays for itself, built across three threads on first use or on
//! an explicit [`IndexedGraph::finalize`] call (§5: the finalize step must
//! complete before the first concurrent reader observes the graph).

use std::collections::HashMap;
use std::sync::RwLock;

use crate::term::{Iri, Term, Triple};

/// A triple pattern: any component may be a wildcard.
#[derive(Debug, Clone, Default)]
pub struct TriplePattern {
    pub subject: Option<Term>,
    pub predicate: Option<Iri>,
    pub object: Option<Term>,
}

impl TriplePattern {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn matches(&self, triple: &Triple) -> bool {
        self.subject.as_ref().map(|s| *s == triple.subject).unwrap_or(true)
            && self.predicate.as_ref().map(|p| *p == triple.predicate).unwrap_or(true)
            && self.object.as_ref().map(|o| *o == triple.object).unwrap_or(true)
    }
}

/// Prefix mapping attached to a graph; not part of triple identity (§4.B).
#[derive(Debug, Clone, Default)]
pub struct PrefixMap {
    entries: HashMap<String, String>,
}

impl PrefixMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.entries.insert(prefix.into(), namespace.into());
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.entries.get(prefix).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Capability set shared by every graph implementation: plain indexed
/// graphs, the delta overlay, the disjoint union, and dataset-backed
/// wrappers (§9: "prefer a trait with sum-type dispatch at the dataset
/// boundary").
pub trait Graph: Send + Sync + std::fmt::Debug {
    fn add(&mut self, triple: Triple) -> bool;
    fn delete(&mut self, triple: &Triple) -> bool;
    fn contains(&self, triple: &Triple) -> bool;
    fn find(&self, pattern: &TriplePattern) -> Vec<Triple>;
    fn size(&self) -> usize;
    fn clear(&mut self);
    fn is_empty(&self) -> bool {
        self.size() == 0
    }
    fn prefixes(&self) -> &PrefixMap;
    fn prefixes_mut(&mut self) -> &mut PrefixMap;

    /// Build (or rebuild) any secondary index this graph maintains. A no-op
    /// for implementations without one. Called by the sink's `finish()`
    /// across every graph in a dataset (§4.H, §5).
    fn finalize(&mut self) {}

    /// Best-effort transaction hooks (§4.E, §5). Every in-memory graph here
    /// is trivially transactional; a backing store with real transactional
    /// semantics would override these instead of accepting the default.
    fn tx_begin(&mut self, _kind: TransactionKind) -> Result<(), String> {
        Ok(())
    }
    fn tx_commit(&mut self) -> Result<(), String> {
        Ok(())
    }
    fn tx_abort(&mut self) -> Result<(), String> {
        Ok(())
    }
    fn tx_end(&mut self) -> Result<(), String> {
        Ok(())
    }
}

/// Transaction kind a dataset-level transaction was opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Read,
    Write,
}

/// The indexing strategy a graph was built with (§4.B, §4.H).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStrategy {
    /// No secondary index; `find` does a linear scan. For small graphs
    /// (model headers) where building an index costs more than it saves.
    Minimal,
    /// Secondary index built across threads on first use. For body and
    /// difference graphs, which may hold many thousands of triples.
    LazyParallel,
}

#[derive(Debug, Default)]
struct Indices {
    by_subject: HashMap<Term, Vec<usize>>,
    by_predicate: HashMap<Iri, Vec<usize>>,
    by_object: HashMap<Term, Vec<usize>>,
}

fn build_indices(triples: &[Triple]) -> Indices {
    std::thread::scope(|scope| {
        let by_s = scope.spawn(|| {
            let mut m: HashMap<Term, Vec<usize>> = HashMap::new();
            for (i, t) in triples.iter().enumerate() {
                m.entry(t.subject.clone()).or_default().push(i);
            }
            m
        });
        let by_p = scope.spawn(|| {
            let mut m: HashMap<Iri, Vec<usize>> = HashMap::new();
            for (i, t) in triples.iter().enumerate() {
                m.entry(t.predicate.clone()).or_default().push(i);
            }
            m
        });
        let by_o = scope.spawn(|| {
            let mut m: HashMap<Term, Vec<usize>> = HashMap::new();
            for (i, t) in triples.iter().enumerate() {
                m.entry(t.object.clone()).or_default().push(i);
            }
            m
        });
        Indices {
            by_subject: by_s.join().expect("subject index build panicked"),
            by_predicate: by_p.join().expect("predicate index build panicked"),
            by_object: by_o.join().expect("object index build panicked"),
        }
    })
}

/// The default, general-purpose [`Graph`] implementation.
#[derive(Debug)]
pub struct IndexedGraph {
    triples: Vec<Triple>,
    strategy: IndexStrategy,
    index: RwLock<Option<Indices>>,
    prefixes: PrefixMap,
}

impl IndexedGraph {
    pub fn new(strategy: IndexStrategy) -> Self {
        Self {
            triples: Vec::new(),
            strategy,
            index: RwLock::new(None),
            prefixes: PrefixMap::new(),
        }
    }

    fn ensure_index(&self) {
        if self.strategy == IndexStrategy::Minimal {
            return;
        }
        {
            let guard = self.index.read().expect("index lock poisoned");
            if guard.is_some() {
                return;
            }
        }
        let indices = build_indices(&self.triples);
        *self.index.write().expect("index lock poisoned") = Some(indices);
    }

    fn candidate_positions(&self, pattern: &TriplePattern) -> Option<Vec<usize>> {
        let guard = self.index.read().expect("index lock poisoned");
        let indices = guard.as_ref()?;
        let by_subject = pattern.subject.as_ref().map(|s| {
            indices
                .by_subject
                .get(s)
                .cloned()
                .unwrap_or_default()
        });
        let by_predicate = pattern.predicate.as_ref().map(|p| {
            indices
                .by_predicate
                .get(p)
                .cloned()
                .unwrap_or_default()
        });
        let by_object = pattern.object.as_ref().map(|o| {
            indices.by_object.get(o).cloned().unwrap_or_default()
        });
        let mut candidates: Option<Vec<usize>> = None;
        for set in [by_subject, by_predicate, by_object].into_iter().flatten() {
            candidates = Some(match candidates {
                None => set,
                Some(prev) => {
                    let set: std::collections::HashSet<usize> = set.into_iter().collect();
                    prev.into_iter().filter(|i| set.contains(i)).collect()
                }
            });
        }
        candidates
    }
}

impl Graph for IndexedGraph {
    fn add(&mut self, triple: Triple) -> bool {
        if self.triples.contains(&triple) {
            return false;
        }
        self.triples.push(triple);
        *self.index.write().expect("index lock poisoned") = None;
        true
    }

    fn delete(&mut self, triple: &Triple) -> bool {
        if let Some(pos) = self.triples.iter().position(|t| t == triple) {
            self.triples.remove(pos);
            *self.index.write().expect("index lock poisoned") = None;
            true
        } else {
            false
        }
    }

    fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    fn find(&self, pattern: &TriplePattern) -> Vec<Triple> {
        self.ensure_index();
        match self.candidate_positions(pattern) {
            Some(positions) => positions
                .into_iter()
                .filter_map(|i| self.triples.get(i))
                .filter(|t| pattern.matches(t))
                .cloned()
                .collect(),
            None => self
                .triples
                .iter()
                .filter(|t| pattern.matches(t))
                .cloned()
                .collect(),
        }
    }

    fn size(&self) -> usize {
        self.triples.len()
    }

    fn clear(&mut self) {
        self.triples.clear();
        *self.index.write().expect("index lock poisoned") = None;
    }

    fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    fn prefixes_mut(&mut self) -> &mut PrefixMap {
        &mut self.prefixes
    }

    /// Build (or rebuild) the secondary index. Idempotent; cheap to call
    /// repeatedly. No-op for [`IndexStrategy::Minimal`] graphs.
    fn finalize(&mut self) {
        if self.strategy == IndexStrategy::Minimal {
            return;
        }
        let indices = build_indices(&self.triples);
        *self.index.write().expect("index lock poisoned") = Some(indices);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Literal;

    fn triple(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(
            Term::iri(s),
            Iri::new(p),
            Term::Literal(Literal::plain(o.to_string())),
        )
    }

    #[test]
    fn no_duplicate_triples() {
        let mut g = IndexedGraph::new(IndexStrategy::Minimal);
        assert!(g.add(triple("urn:a", "urn:p", "v")));
        assert!(!g.add(triple("urn:a", "urn:p", "v")));
        assert_eq!(g.size(), 1);
    }

    #[test]
    fn find_with_wildcards() {
        let mut g = IndexedGraph::new(IndexStrategy::LazyParallel);
        g.add(triple("urn:a", "urn:p", "1"));
        g.add(triple("urn:a", "urn:q", "2"));
        g.add(triple("urn:b", "urn:p", "3"));

        let by_subject = TriplePattern {
            subject: Some(Term::iri("urn:a")),
            ..TriplePattern::any()
        };
        assert_eq!(g.find(&by_subject).len(), 2);

        let by_predicate = TriplePattern {
            predicate: Some(Iri::new("urn:p")),
            ..TriplePattern::any()
        };
        assert_eq!(g.find(&by_predicate).len(), 2);

        assert_eq!(g.find(&TriplePattern::any()).len(), 3);
    }

    #[test]
    fn prefix_map_independent_of_triple_identity() {
        let mut g = IndexedGraph::new(IndexStrategy::Minimal);
        g.prefixes_mut().bind("cim", "http://iec.ch/TC57/CIM100#");
        g.add(triple("urn:a", "urn:p", "1"));
        assert_eq!(g.prefixes().namespace("cim"), Some("http://iec.ch/TC57/CIM100#"));
        assert_eq!(g.size(), 1);
    }

    #[test]
    fn clear_empties_graph() {
        let mut g = IndexedGraph::new(IndexStrategy::Minimal);
        g.add(triple("urn:a", "urn:p", "1"));
        g.clear();
        assert!(g.is_empty());
    }

    #[test]
    fn minimal_strategy_never_builds_index() {
        let mut g = IndexedGraph::new(IndexStrategy::Minimal);
        g.add(triple("urn:a", "urn:p", "1"));
        g.finalize();
        assert!(g.index.read().unwrap().is_none());
    }

    #[test]
    fn lazy_parallel_index_builds_on_first_find() {
        let mut g = IndexedGraph::new(IndexStrategy::LazyParallel);
        g.add(triple("urn:a", "urn:p", "1"));
        assert!(g.index.read().unwrap().is_none());
        let _ = g.find(&TriplePattern::any());
        assert!(g.index.read().unwrap().is_some());
    }
}
