//! # cimxml-rdfxml: streaming RDF/XML + CIMXML parser
//!
//! Implements the RDF/XML 2004 grammar plus the CIMXML extensions in
//! IEC 61970-552 (§3, §4.I): model-header detection, difference containers,
//! UUID normalization, and profile-aware literal typing. The grammar core
//! (`parser`) is generic over the [`sink::TripleSink`] trait so the same
//! recursive-descent machinery backs both [`parse_cim_model`] (routes into a
//! [`cim_dataset::CimDataset`] with full context switching) and
//! [`parse_and_register_cim_profile`] (drops everything into one plain
//! graph for profile-ontology documents, which never carry model headers).

pub mod cim_dataset;
pub mod config;
pub mod error_handler;
pub mod parser;
pub mod sink;

pub use cim_dataset::CimDataset;
pub use config::{ParseContext, ParserConfig};
pub use error_handler::{DiagnosticsErrorHandler, ErrorHandler, StrictErrorHandler};
pub use parser::{parse_and_register_cim_profile, parse_cim_model};
pub use sink::{CimxmlSink, DifferenceContainer, DocumentContext, GraphSink, TripleSink};
