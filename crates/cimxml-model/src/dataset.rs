//! Keyed collection of named graphs plus a default graph (§4.E).
//!
//! Graphs are added lazily as document contexts appear while parsing;
//! removing a graph removes its participation in future transactions.
//! The dataset itself uses multi-reader/single-writer semantics (§5): an
//! `RwLock` around the graph map lets readers look up graphs concurrently
//! while a single writer adds/removes one.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::delta::{shared, SharedGraph};
use crate::error::CimxmlError;
use crate::graph::{Graph, IndexStrategy, IndexedGraph, PrefixMap, TransactionKind};
use crate::term::Iri;

/// A graph name: either the reserved default-graph sentinel or a named
/// graph IRI (§3: "the default graph, whose 'name' is a reserved
/// sentinel").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GraphName {
    Default,
    Named(Iri),
}

impl From<Iri> for GraphName {
    fn from(iri: Iri) -> Self {
        GraphName::Named(iri)
    }
}

/// Keyed map from graph name to graph, plus the default graph, with
/// best-effort multi-graph transactions.
#[derive(Debug)]
pub struct Dataset {
    graphs: RwLock<HashMap<GraphName, SharedGraph>>,
    /// Prefixes known document-wide, independent of any one graph's own map
    /// (§4.H: "every `prefix(p, ns)` is recorded on the dataset's global
    /// prefix map and on the current graph's map").
    prefixes: RwLock<PrefixMap>,
}

impl Dataset {
    pub fn new() -> Self {
        let mut graphs = HashMap::new();
        graphs.insert(
            GraphName::Default,
            shared(IndexedGraph::new(IndexStrategy::LazyParallel)),
        );
        Self {
            graphs: RwLock::new(graphs),
            prefixes: RwLock::new(PrefixMap::new()),
        }
    }

    /// Bind a prefix on the dataset-wide map (§4.H).
    pub fn bind_prefix(&self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.write().expect("dataset lock poisoned").bind(prefix, namespace);
    }

    pub fn prefixes(&self) -> PrefixMap {
        self.prefixes.read().expect("dataset lock poisoned").clone()
    }

    /// Insert a graph under `name`, creating it if absent. O(1).
    pub fn add_graph(&self, name: GraphName, graph: SharedGraph) {
        self.graphs.write().expect("dataset lock poisoned").insert(name, graph);
    }

    /// Look up a graph by name, creating it with `strategy` if it does not
    /// yet exist (§4.H: `setCurrentContext` creates the graph on first
    /// reference).
    pub fn get_or_create(&self, name: GraphName, strategy: IndexStrategy) -> SharedGraph {
        let mut graphs = self.graphs.write().expect("dataset lock poisoned");
        graphs
            .entry(name)
            .or_insert_with(|| shared(IndexedGraph::new(strategy)))
            .clone()
    }

    pub fn get_graph(&self, name: &GraphName) -> Option<SharedGraph> {
        self.graphs.read().expect("dataset lock poisoned").get(name).cloned()
    }

    /// Remove a graph from the dataset. O(1). The removed graph no longer
    /// participates in future transactions.
    pub fn remove_graph(&self, name: &GraphName) -> Option<SharedGraph> {
        self.graphs.write().expect("dataset lock poisoned").remove(name)
    }

    pub fn default_graph(&self) -> SharedGraph {
        self.get_graph(&GraphName::Default)
            .expect("default graph always present")
    }

    pub fn graph_names(&self) -> Vec<GraphName> {
        self.graphs.read().expect("dataset lock poisoned").keys().cloned().collect()
    }

    /// Build every graph's secondary index in parallel, one thread per graph
    /// (§4.H `finish()`, §5: "the finalize step initializes lazy indices in
    /// parallel and must complete before the first concurrent reader
    /// observes the graph").
    pub fn finalize_all(&self) {
        let graphs = self.graphs.read().expect("dataset lock poisoned");
        std::thread::scope(|scope| {
            for graph in graphs.values() {
                scope.spawn(move || {
                    graph.write().expect("member graph lock poisoned").finalize();
                });
            }
        });
    }

    fn for_each_graph<F>(&self, mut op: F) -> Result<(), CimxmlError>
    where
        F: FnMut(&mut dyn Graph) -> Result<(), String>,
    {
        let graphs = self.graphs.read().expect("dataset lock poisoned");
        let mut failures = Vec::new();
        for graph in graphs.values() {
            let mut g = graph.write().expect("member graph lock poisoned");
            if let Err(e) = op(&mut *g) {
                failures.push(e);
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(CimxmlError::Transaction { failures })
        }
    }

    pub fn begin(&self, kind: TransactionKind) -> Result<(), CimxmlError> {
        self.for_each_graph(|g| g.tx_begin(kind))
    }

    pub fn commit(&self) -> Result<(), CimxmlError> {
        self.for_each_graph(|g| g.tx_commit())
    }

    pub fn abort(&self) -> Result<(), CimxmlError> {
        self.for_each_graph(|g| g.tx_abort())
    }

    pub fn end(&self) -> Result<(), CimxmlError> {
        self.for_each_graph(|g| g.tx_end())
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TriplePattern;
    use crate::term::{Literal, Term, Triple};

    #[test]
    fn default_graph_exists_on_construction() {
        let ds = Dataset::new();
        assert!(ds.get_graph(&GraphName::Default).is_some());
    }

    #[test]
    fn add_remove_graph_round_trips() {
        let ds = Dataset::new();
        let name = GraphName::Named(Iri::new("urn:ctx"));
        let g = shared(IndexedGraph::new(IndexStrategy::Minimal));
        ds.add_graph(name.clone(), g);
        assert!(ds.get_graph(&name).is_some());
        assert!(ds.remove_graph(&name).is_some());
        assert!(ds.get_graph(&name).is_none());
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let ds = Dataset::new();
        let name = GraphName::Named(Iri::new("urn:ctx"));
        let a = ds.get_or_create(name.clone(), IndexStrategy::Minimal);
        {
            let mut g = a.write().unwrap();
            g.add(Triple::new(
                Term::iri("urn:s"),
                Iri::new("urn:p"),
                Term::Literal(Literal::plain("v")),
            ));
        }
        let b = ds.get_or_create(name, IndexStrategy::Minimal);
        assert_eq!(b.read().unwrap().find(&TriplePattern::any()).len(), 1);
    }

    #[test]
    fn bind_prefix_is_visible_on_the_dataset_map() {
        let ds = Dataset::new();
        ds.bind_prefix("cim", "http://iec.ch/TC57/CIM100#");
        assert_eq!(ds.prefixes().namespace("cim"), Some("http://iec.ch/TC57/CIM100#"));
    }

    #[test]
    fn finalize_all_builds_every_graph_index() {
        let ds = Dataset::new();
        ds.add_graph(
            GraphName::Named(Iri::new("urn:ctx")),
            shared(IndexedGraph::new(IndexStrategy::LazyParallel)),
        );
        ds.finalize_all();
    }

    #[test]
    fn transactions_succeed_across_all_graphs() {
        let ds = Dataset::new();
        ds.add_graph(
            GraphName::Named(Iri::new("urn:ctx")),
            shared(IndexedGraph::new(IndexStrategy::Minimal)),
        );
        ds.begin(TransactionKind::Write).unwrap();
        ds.commit().unwrap();
        ds.end().unwrap();
    }
}
