//! CIMXML sink (§4.H): routes triples into the right named graph based on
//! the parser's current document context, and propagates prefixes to both
//! the dataset's global map and the current graph's map.

use cimxml_model::delta::SharedGraph;
use cimxml_model::graph::{Graph, IndexStrategy, IndexedGraph};
use cimxml_model::namespaces;
use cimxml_model::term::{Iri, Triple};

use crate::cim_dataset::CimDataset;

/// Which difference-model container (§3, §4.I) a `parseType="Statements"`
/// block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifferenceContainer {
    Forward,
    Reverse,
    Preconditions,
}

/// Event surface the grammar core (`parser.rs`) emits to. One implementation
/// (`CimxmlSink`) routes into a [`CimDataset`] with full context switching;
/// the other (`GraphSink`) drops everything into one plain graph for
/// `parseAndRegisterCimProfile`, where CIM model-header elements never
/// appear (§6).
pub trait TripleSink {
    fn start(&mut self) {}
    fn triple(&mut self, t: Triple);
    fn prefix(&mut self, _p: &str, _ns: &str) {}
    fn base(&mut self, _uri: &Iri) {}
    fn set_version_of_iec61970_552(&mut self, _version: &str) {}
    fn finish(&mut self) {}
    fn enter_full_model(&mut self) {}
    fn enter_difference_model(&mut self) {}
    fn exit_model_header(&mut self) {}
    fn enter_difference_container(&mut self, _which: DifferenceContainer) {}
    fn exit_difference_container(&mut self) {}
}

/// Plain single-graph sink for documents with no CIM context routing
/// (profile ontologies).
#[derive(Debug, Default)]
pub struct GraphSink {
    pub graph: IndexedGraph,
}

impl GraphSink {
    pub fn new() -> Self {
        Self {
            graph: IndexedGraph::new(IndexStrategy::LazyParallel),
        }
    }
}

impl TripleSink for GraphSink {
    fn triple(&mut self, t: Triple) {
        self.graph.add(t);
    }

    fn prefix(&mut self, p: &str, ns: &str) {
        self.graph.prefixes_mut().bind(p, ns);
    }

    fn finish(&mut self) {
        self.graph.finalize();
    }
}

/// The document context the parser is currently routing triples under
/// (§3 "Document context (state)").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentContext {
    Body,
    FullModel,
    DifferenceModel,
    ForwardDifferences,
    ReverseDifferences,
    Preconditions,
}

impl DocumentContext {
    fn graph_name(self) -> cimxml_model::dataset::GraphName {
        use cimxml_model::dataset::GraphName;
        match self {
            DocumentContext::Body => GraphName::Default,
            DocumentContext::FullModel => GraphName::Named(Iri::new(namespaces::FULL_MODEL_GRAPH)),
            DocumentContext::DifferenceModel => {
                GraphName::Named(Iri::new(namespaces::DIFFERENCE_MODEL_GRAPH))
            }
            DocumentContext::ForwardDifferences => {
                GraphName::Named(Iri::new(namespaces::FORWARD_DIFFERENCES_GRAPH))
            }
            DocumentContext::ReverseDifferences => {
                GraphName::Named(Iri::new(namespaces::REVERSE_DIFFERENCES_GRAPH))
            }
            DocumentContext::Preconditions => {
                GraphName::Named(Iri::new(namespaces::PRECONDITIONS_GRAPH))
            }
        }
    }

    /// MINIMAL for the small header graphs, LAZY_PARALLEL for everything
    /// that may grow to the size of a full network model (§4.H).
    fn index_strategy(self) -> IndexStrategy {
        match self {
            DocumentContext::FullModel | DocumentContext::DifferenceModel => IndexStrategy::Minimal,
            _ => IndexStrategy::LazyParallel,
        }
    }
}

/// Sink the parser emits events to. Owns the [`CimDataset`] being built.
#[derive(Debug)]
pub struct CimxmlSink {
    dataset: CimDataset,
    current_context: DocumentContext,
    version_of_cimxml: Option<String>,
    version_of_iec61970_552: Option<String>,
    document_base: Option<Iri>,
}

impl CimxmlSink {
    pub fn new() -> Self {
        Self {
            dataset: CimDataset::new(),
            current_context: DocumentContext::Body,
            version_of_cimxml: None,
            version_of_iec61970_552: None,
            document_base: None,
        }
    }

    pub fn start(&mut self) {
        tracing::debug!("sink started");
    }

    fn current_graph(&self) -> SharedGraph {
        let name = self.current_context.graph_name();
        self.dataset
            .get_graph(&name)
            .unwrap_or_else(|| self.dataset.get_or_create(name, self.current_context.index_strategy()))
    }

    pub fn triple(&mut self, t: Triple) {
        tracing::trace!(subject = %t.subject, predicate = %t.predicate, "sink received triple");
        self.current_graph().write().expect("current graph lock poisoned").add(t);
    }

    pub fn prefix(&mut self, prefix: &str, namespace: &str) {
        self.dataset.bind_prefix(prefix, namespace);
        self.current_graph()
            .write()
            .expect("current graph lock poisoned")
            .prefixes_mut()
            .bind(prefix, namespace);
    }

    pub fn base(&mut self, uri: Iri) {
        self.document_base = Some(uri);
    }

    pub fn document_base(&self) -> Option<&Iri> {
        self.document_base.as_ref()
    }

    /// Triggers parallel index initialization on all graphs that opted
    /// into lazy indexing (§4.H, §5).
    pub fn finish(&mut self) {
        self.dataset.finalize_all();
    }

    pub fn set_version_of_cimxml(&mut self, version: impl Into<String>) {
        self.version_of_cimxml = Some(version.into());
    }

    pub fn version_of_cimxml(&self) -> Option<&str> {
        self.version_of_cimxml.as_deref()
    }

    pub fn set_version_of_iec61970_552(&mut self, version: impl Into<String>) {
        self.version_of_iec61970_552 = Some(version.into());
    }

    pub fn version_of_iec61970_552(&self) -> Option<&str> {
        self.version_of_iec61970_552.as_deref()
    }

    /// Switch the graph triples are routed to. Creates the target graph
    /// with the context-appropriate strategy and seeds its prefix map with
    /// the currently known prefixes if this is the first reference (§4.H).
    pub fn set_current_context(&mut self, context: DocumentContext) {
        let name = context.graph_name();
        let is_new = self.dataset.get_graph(&name).is_none();
        let graph = self.dataset.get_or_create(name, context.index_strategy());
        if is_new {
            let known_prefixes = self.dataset.prefixes();
            let mut g = graph.write().expect("current graph lock poisoned");
            for (p, ns) in known_prefixes.iter() {
                g.prefixes_mut().bind(p, ns);
            }
        }
        self.current_context = context;
    }

    pub fn current_context(&self) -> DocumentContext {
        self.current_context
    }

    pub fn dataset(&self) -> &CimDataset {
        &self.dataset
    }

    pub fn into_dataset(self) -> CimDataset {
        self.dataset
    }
}

impl Default for CimxmlSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TripleSink for CimxmlSink {
    fn start(&mut self) {
        CimxmlSink::start(self)
    }

    fn triple(&mut self, t: Triple) {
        CimxmlSink::triple(self, t)
    }

    fn prefix(&mut self, p: &str, ns: &str) {
        CimxmlSink::prefix(self, p, ns)
    }

    fn base(&mut self, uri: &Iri) {
        CimxmlSink::base(self, uri.clone())
    }

    fn set_version_of_iec61970_552(&mut self, version: &str) {
        CimxmlSink::set_version_of_iec61970_552(self, version.to_string())
    }

    fn finish(&mut self) {
        CimxmlSink::finish(self)
    }

    fn enter_full_model(&mut self) {
        self.set_current_context(DocumentContext::FullModel);
    }

    fn enter_difference_model(&mut self) {
        self.set_current_context(DocumentContext::DifferenceModel);
    }

    fn exit_model_header(&mut self) {
        self.set_current_context(DocumentContext::Body);
    }

    fn enter_difference_container(&mut self, which: DifferenceContainer) {
        let context = match which {
            DifferenceContainer::Forward => DocumentContext::ForwardDifferences,
            DifferenceContainer::Reverse => DocumentContext::ReverseDifferences,
            DifferenceContainer::Preconditions => DocumentContext::Preconditions,
        };
        self.set_current_context(context);
    }

    fn exit_difference_container(&mut self) {
        self.set_current_context(DocumentContext::DifferenceModel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cimxml_model::graph::TriplePattern;
    use cimxml_model::term::{Literal, Term};

    fn triple(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(Term::iri(s), Iri::new(p), Term::Literal(Literal::plain(o.to_string())))
    }

    #[test]
    fn body_triples_land_in_default_graph() {
        let mut sink = CimxmlSink::new();
        sink.triple(triple("urn:a", "urn:p", "1"));
        assert_eq!(
            sink.dataset().default_graph().read().unwrap().find(&TriplePattern::any()).len(),
            1
        );
    }

    #[test]
    fn context_switch_routes_subsequent_triples_to_the_named_graph() {
        let mut sink = CimxmlSink::new();
        sink.set_current_context(DocumentContext::ForwardDifferences);
        sink.triple(triple("urn:a", "urn:p", "1"));
        assert_eq!(sink.dataset().default_graph().read().unwrap().size(), 0);
        assert_eq!(sink.dataset().get_forward_differences().unwrap().read().unwrap().size(), 1);
    }

    #[test]
    fn prefix_propagates_to_dataset_and_current_graph() {
        let mut sink = CimxmlSink::new();
        sink.prefix("cim", "http://iec.ch/TC57/CIM100#");
        assert_eq!(
            sink.dataset().prefixes().namespace("cim"),
            Some("http://iec.ch/TC57/CIM100#")
        );
        assert_eq!(
            sink.dataset()
                .default_graph()
                .read()
                .unwrap()
                .prefixes()
                .namespace("cim"),
            Some("http://iec.ch/TC57/CIM100#")
        );
    }

    #[test]
    fn new_graph_is_seeded_with_previously_known_prefixes() {
        let mut sink = CimxmlSink::new();
        sink.prefix("md", "http://iec.ch/TC57/61970-552/ModelDescription/1#");
        sink.set_current_context(DocumentContext::FullModel);
        let header = sink.dataset().get_full_model().unwrap();
        assert_eq!(
            header.read().unwrap().prefixes().namespace("md"),
            Some("http://iec.ch/TC57/61970-552/ModelDescription/1#")
        );
    }
}
