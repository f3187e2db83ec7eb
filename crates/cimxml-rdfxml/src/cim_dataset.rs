//! CIM-aware operations layered on [`cimxml_model::Dataset`] (§6).
//!
//! The base dataset has no notion of "model header" or "Supersedes"; those
//! are CIM semantics, so they live here rather than in `cimxml-model`, which
//! stays a generic named-graph store.

use std::collections::HashSet;

use cimxml_model::dataset::GraphName;
use cimxml_model::delta::{shared, DeltaGraph, SharedGraph};
use cimxml_model::error::{CimxmlError, CimxmlResult};
use cimxml_model::graph::{Graph, IndexStrategy, IndexedGraph, PrefixMap, TriplePattern};
use cimxml_model::namespaces;
use cimxml_model::term::{Iri, Term};
use cimxml_model::union_graph::DisjointUnionGraph;
use cimxml_model::Dataset;

fn full_model_name() -> GraphName {
    GraphName::Named(Iri::new(namespaces::FULL_MODEL_GRAPH))
}

fn difference_model_name() -> GraphName {
    GraphName::Named(Iri::new(namespaces::DIFFERENCE_MODEL_GRAPH))
}

fn forward_differences_name() -> GraphName {
    GraphName::Named(Iri::new(namespaces::FORWARD_DIFFERENCES_GRAPH))
}

fn reverse_differences_name() -> GraphName {
    GraphName::Named(Iri::new(namespaces::REVERSE_DIFFERENCES_GRAPH))
}

fn preconditions_name() -> GraphName {
    GraphName::Named(Iri::new(namespaces::PRECONDITIONS_GRAPH))
}

/// A [`Dataset`] plus the CIM-specific accessors from §6: `isFullModel`,
/// `getModelHeader`, the difference-model graphs, `fullModelToSingleGraph`,
/// and `differenceModelToFullModel`.
#[derive(Debug)]
pub struct CimDataset {
    inner: Dataset,
}

impl CimDataset {
    pub fn new() -> Self {
        Self { inner: Dataset::new() }
    }

    pub fn from_dataset(inner: Dataset) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> Dataset {
        self.inner
    }

    pub fn bind_prefix(&self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.inner.bind_prefix(prefix, namespace);
    }

    pub fn prefixes(&self) -> PrefixMap {
        self.inner.prefixes()
    }

    pub fn get_graph(&self, name: &GraphName) -> Option<SharedGraph> {
        self.inner.get_graph(name)
    }

    pub fn get_or_create(&self, name: GraphName, strategy: IndexStrategy) -> SharedGraph {
        self.inner.get_or_create(name, strategy)
    }

    pub fn finalize_all(&self) {
        self.inner.finalize_all()
    }

    pub fn default_graph(&self) -> SharedGraph {
        self.inner.default_graph()
    }

    pub fn get_full_model(&self) -> Option<SharedGraph> {
        self.inner.get_graph(&full_model_name())
    }

    pub fn get_difference_model(&self) -> Option<SharedGraph> {
        self.inner.get_graph(&difference_model_name())
    }

    pub fn get_forward_differences(&self) -> Option<SharedGraph> {
        self.inner.get_graph(&forward_differences_name())
    }

    pub fn get_reverse_differences(&self) -> Option<SharedGraph> {
        self.inner.get_graph(&reverse_differences_name())
    }

    pub fn get_preconditions(&self) -> Option<SharedGraph> {
        self.inner.get_graph(&preconditions_name())
    }

    pub fn is_full_model(&self) -> bool {
        self.get_full_model().is_some()
    }

    pub fn is_difference_model(&self) -> bool {
        self.get_difference_model().is_some()
    }

    /// The header graph for whichever model type is present (§3 "CIM Model
    /// Header"). A semantic violation if neither marker was seen (§7).
    pub fn get_model_header(&self) -> CimxmlResult<SharedGraph> {
        self.get_full_model()
            .or_else(|| self.get_difference_model())
            .ok_or_else(|| {
                CimxmlError::SemanticViolation(
                    "model-header accessor called before a FullModel or DifferenceModel marker was seen".into(),
                )
            })
    }

    pub fn get_body(&self) -> SharedGraph {
        self.default_graph()
    }

    /// Non-deduplicating union of header + body, carrying the header's
    /// prefixes (§6).
    pub fn full_model_to_single_graph(&self) -> CimxmlResult<DisjointUnionGraph> {
        let header = self.get_model_header()?;
        let header_prefixes = header.read().expect("header graph lock poisoned").prefixes().clone();
        Ok(DisjointUnionGraph::new(vec![header, self.get_body()]).with_prefixes(header_prefixes))
    }

    fn header_subject_and_type(graph: &SharedGraph, expected_type: &str) -> Option<Term> {
        let g = graph.read().expect("header graph lock poisoned");
        g.find(&TriplePattern {
            subject: None,
            predicate: Some(Iri::new(namespaces::rdf("type"))),
            object: Some(Term::Iri(Iri::new(expected_type))),
        })
        .into_iter()
        .next()
        .map(|t| t.subject)
    }

    fn model_iri(graph: &SharedGraph, expected_type: &str) -> Option<Iri> {
        match Self::header_subject_and_type(graph, expected_type)? {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    fn supersedes_set(&self) -> HashSet<Iri> {
        let Some(header) = self.get_difference_model() else {
            return HashSet::new();
        };
        let g = header.read().expect("header graph lock poisoned");
        g.find(&TriplePattern {
            subject: None,
            predicate: Some(Iri::new(namespaces::md("Model.Supersedes"))),
            object: None,
        })
        .into_iter()
        .filter_map(|t| match t.object {
            Term::Iri(iri) => Some(iri),
            _ => None,
        })
        .collect()
    }

    fn copy_graph_triples(graph: &SharedGraph, strategy: IndexStrategy) -> IndexedGraph {
        let mut copy = IndexedGraph::new(strategy);
        let g = graph.read().expect("graph lock poisoned");
        for t in g.find(&TriplePattern::any()) {
            copy.add(t);
        }
        copy
    }

    /// Materialize this difference model against `predecessor` (§6).
    /// Preconditions: `predecessor.is_full_model()`; `self.is_difference_model()`;
    /// every precondition triple holds in `predecessor.get_body()`; the
    /// predecessor's model IRI appears in this model's `Supersedes` set.
    pub fn difference_model_to_full_model(&self, predecessor: &CimDataset) -> CimxmlResult<DeltaGraph> {
        if !predecessor.is_full_model() {
            return Err(CimxmlError::DifferenceApplication {
                reason: "predecessor is not a FullModel".into(),
                missing: Vec::new(),
            });
        }
        if !self.is_difference_model() {
            return Err(CimxmlError::DifferenceApplication {
                reason: "this dataset is not a DifferenceModel".into(),
                missing: Vec::new(),
            });
        }

        let predecessor_body = predecessor.get_body();
        let preconditions = self.get_preconditions();
        let mut missing = Vec::new();
        if let Some(preconditions) = &preconditions {
            let pre = preconditions.read().expect("preconditions graph lock poisoned");
            let body = predecessor_body.read().expect("predecessor body lock poisoned");
            for t in pre.find(&TriplePattern::any()) {
                if !body.contains(&t) {
                    missing.push(format!("{} {} {}", t.subject, t.predicate, t.object));
                }
            }
        }

        let predecessor_full_model = predecessor
            .get_full_model()
            .ok_or_else(|| CimxmlError::DifferenceApplication {
                reason: "predecessor has no FullModel header".into(),
                missing: Vec::new(),
            })?;
        let predecessor_model_iri = Self::model_iri(&predecessor_full_model, &namespaces::md("FullModel"))
            .ok_or_else(|| CimxmlError::DifferenceApplication {
                reason: "predecessor FullModel header has no typed subject".into(),
                missing: Vec::new(),
            })?;
        if !self.supersedes_set().contains(&predecessor_model_iri) {
            missing.push(format!("predecessor model '{predecessor_model_iri}' not present in Supersedes"));
        }

        if !missing.is_empty() {
            return Err(CimxmlError::DifferenceApplication {
                reason: "difference application preconditions failed".into(),
                missing,
            });
        }

        let forward = self
            .get_forward_differences()
            .map(|g| Self::copy_graph_triples(&g, IndexStrategy::LazyParallel))
            .unwrap_or_else(|| IndexedGraph::new(IndexStrategy::LazyParallel));
        let reverse = self
            .get_reverse_differences()
            .map(|g| Self::copy_graph_triples(&g, IndexStrategy::Minimal))
            .unwrap_or_else(|| IndexedGraph::new(IndexStrategy::Minimal));

        let mut delta = DeltaGraph::from_parts(predecessor_body, forward, reverse);
        let header = self.get_model_header()?;
        let header_prefixes = header.read().expect("header graph lock poisoned").prefixes().clone();
        for (p, ns) in header_prefixes.iter() {
            delta.prefixes_mut().bind(p, ns);
        }
        Ok(delta)
    }
}

impl Default for CimDataset {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cimxml_model::term::{Literal, Triple};

    fn triple(s: &str, p: &str, o: Term) -> Triple {
        Triple::new(Term::iri(s), Iri::new(p), o)
    }

    fn literal(v: &str) -> Term {
        Term::Literal(Literal::plain(v.to_string()))
    }

    fn predecessor_dataset(model_iri: &str) -> CimDataset {
        let ds = CimDataset::new();
        let header = shared(IndexedGraph::new(IndexStrategy::Minimal));
        header.write().unwrap().add(triple(
            model_iri,
            &namespaces::rdf("type"),
            Term::Iri(Iri::new(namespaces::md("FullModel"))),
        ));
        ds.inner.add_graph(full_model_name(), header);
        ds.default_graph()
            .write()
            .unwrap()
            .add(triple("urn:a", "urn:value", literal("old")));
        ds.default_graph().write().unwrap().add(triple("urn:c", "urn:exists", literal("yes")));
        ds
    }

    fn difference_dataset(model_iri: &str, predecessor_iri: &str) -> CimDataset {
        let ds = CimDataset::new();
        let header = shared(IndexedGraph::new(IndexStrategy::Minimal));
        {
            let mut h = header.write().unwrap();
            h.add(triple(
                model_iri,
                &namespaces::rdf("type"),
                Term::Iri(Iri::new(namespaces::dm("DifferenceModel"))),
            ));
            h.add(triple(
                model_iri,
                &namespaces::md("Model.Supersedes"),
                Term::Iri(Iri::new(predecessor_iri)),
            ));
        }
        ds.inner.add_graph(difference_model_name(), header);

        let preconditions = shared(IndexedGraph::new(IndexStrategy::Minimal));
        preconditions
            .write()
            .unwrap()
            .add(triple("urn:a", "urn:value", literal("old")));
        ds.inner.add_graph(preconditions_name(), preconditions);

        let forward = shared(IndexedGraph::new(IndexStrategy::LazyParallel));
        {
            let mut f = forward.write().unwrap();
            f.add(triple("urn:a", "urn:value", literal("B")));
            f.add(triple("urn:d", "urn:new", literal("yes")));
        }
        ds.inner.add_graph(forward_differences_name(), forward);

        let reverse = shared(IndexedGraph::new(IndexStrategy::Minimal));
        {
            let mut r = reverse.write().unwrap();
            r.add(triple("urn:a", "urn:value", literal("old")));
            r.add(triple("urn:c", "urn:exists", literal("yes")));
        }
        ds.inner.add_graph(reverse_differences_name(), reverse);

        ds
    }

    #[test]
    fn difference_model_applies_cleanly_against_a_satisfied_predecessor() {
        let predecessor = predecessor_dataset("urn:uuid:predecessor");
        let diff = difference_dataset("urn:uuid:diff", "urn:uuid:predecessor");
        let delta = diff.difference_model_to_full_model(&predecessor).unwrap();
        assert_eq!(delta.size(), 2); // a.value=B, d.new=yes
        assert!(delta.contains(&triple("urn:a", "urn:value", literal("B"))));
        assert!(delta.contains(&triple("urn:d", "urn:new", literal("yes"))));
        assert!(!delta.contains(&triple("urn:c", "urn:exists", literal("yes"))));
    }

    #[test]
    fn missing_precondition_triple_is_rejected() {
        let predecessor = predecessor_dataset("urn:uuid:predecessor");
        predecessor
            .default_graph()
            .write()
            .unwrap()
            .delete(&triple("urn:a", "urn:value", literal("old")));
        let diff = difference_dataset("urn:uuid:diff", "urn:uuid:predecessor");
        let err = diff.difference_model_to_full_model(&predecessor).unwrap_err();
        assert!(matches!(err, CimxmlError::DifferenceApplication { .. }));
    }

    #[test]
    fn predecessor_not_in_supersedes_is_rejected() {
        let predecessor = predecessor_dataset("urn:uuid:other-predecessor");
        let diff = difference_dataset("urn:uuid:diff", "urn:uuid:predecessor");
        assert!(diff.difference_model_to_full_model(&predecessor).is_err());
    }
}
