//! # cimxml-model: terms, triples, graphs, deltas, and datasets
//!
//! The in-memory data model underneath the CIMXML parsing core: RDF terms
//! and triples (§3), an indexed graph store (§4.B), a delta overlay for
//! CIMXML difference models (§4.C), a read-only disjoint union for
//! presenting header+body as one graph (§4.D), and a named-graph dataset
//! with best-effort multi-graph transactions (§4.E).
//!
//! This crate carries no XML or CIM-profile knowledge; see `cimxml-profiles`
//! and `cimxml-rdfxml` for those layers.

pub mod cim_version;
pub mod delta;
pub mod diagnostics;
pub mod error;
pub mod graph;
pub mod namespaces;
pub mod resolver;
pub mod term;
pub mod union_graph;

pub mod dataset;

pub use cim_version::CimVersion;
pub use delta::{shared, DeltaGraph, SharedGraph};
pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{CimxmlError, CimxmlResult};
pub use graph::{Graph, IndexStrategy, IndexedGraph, PrefixMap, TransactionKind, TriplePattern};
pub use resolver::{BaseFrame, TermFactory};
pub use term::{BlankNode, Iri, Literal, LiteralKind, Term, Triple};
pub use union_graph::DisjointUnionGraph;

pub use dataset::{Dataset, GraphName};
