//! CIM profile wrapper: recognizes a graph as a CIM-16/17/18 profile or a
//! header profile, and exposes its keyword, version IRIs, and version info
//! (§3 "CIM Profile", §4.F).

use std::collections::BTreeSet;

use cimxml_model::error::{CimxmlError, CimxmlResult};
use cimxml_model::graph::{Graph, TriplePattern};
use cimxml_model::namespaces::{self, DOCUMENT_HEADER_VERSION_PREFIX};
use cimxml_model::term::{Iri, Term};
use cimxml_model::CimVersion;

/// Which structural fingerprint produced this profile. Kept distinct from
/// the accessors below so detection stays a factory decision rather than a
/// runtime branch inside every getter (§9 "Profile variant detection").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    /// `cims:isFixed` / `Version.shortName` / `Version.*URI*` fingerprint.
    Cim16Style,
    /// `owl:Ontology` + `dcat:keyword` + `owl:versionIRI` fingerprint,
    /// shared by CIM-17 and CIM-18 (they differ only in how a header
    /// profile is additionally recognized).
    OntologyStyle,
}

/// Common capability set for all three profile styles.
pub trait Profile {
    fn cim_version(&self) -> CimVersion;
    fn is_header_profile(&self) -> bool;
    fn dcat_keyword(&self) -> Option<&str>;
    fn owl_version_iris(&self) -> &BTreeSet<Iri>;
    fn owl_version_info(&self) -> Option<&str>;
}

/// Backward-compatible synthetic keyword for CIM-16/17 header profiles
/// (§4.F).
pub const HEADER_PROFILE_SYNTHETIC_KEYWORD: &str = "DH";

#[derive(Debug, Clone)]
pub struct CimProfile {
    kind: ProfileKind,
    cim_version: CimVersion,
    is_header: bool,
    keyword: Option<String>,
    version_iris: BTreeSet<Iri>,
    version_info: Option<String>,
}

impl Profile for CimProfile {
    fn cim_version(&self) -> CimVersion {
        self.cim_version
    }

    fn is_header_profile(&self) -> bool {
        self.is_header
    }

    fn dcat_keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    fn owl_version_iris(&self) -> &BTreeSet<Iri> {
        &self.version_iris
    }

    fn owl_version_info(&self) -> Option<&str> {
        self.version_info.as_deref()
    }
}

impl CimProfile {
    pub fn kind(&self) -> ProfileKind {
        self.kind
    }
}

/// Equality per §4.F: same CIM version and either both header profiles, or
/// the same set of version IRIs.
impl PartialEq for CimProfile {
    fn eq(&self, other: &Self) -> bool {
        self.cim_version == other.cim_version
            && ((self.is_header && other.is_header) || self.version_iris == other.version_iris)
    }
}

fn local_name(iri: &str) -> &str {
    iri.rsplit(['#', '/']).next().unwrap_or(iri)
}

fn literal_text(term: &Term) -> Option<&str> {
    match term {
        Term::Literal(lit) => Some(&lit.lexical),
        _ => None,
    }
}

fn has_version_domain(graph: &dyn Graph, property: &Iri) -> bool {
    let domains = graph.find(&TriplePattern {
        subject: Some(Term::Iri(property.clone())),
        predicate: Some(Iri::new(namespaces::rdfs("domain"))),
        object: None,
    });
    domains.iter().any(|t| match &t.object {
        Term::Iri(class) => local_name(class.as_str()).ends_with("Version"),
        _ => false,
    })
}

fn detect_header_class_fingerprint(graph: &dyn Graph) -> bool {
    let typed = graph.find(&TriplePattern {
        subject: None,
        predicate: Some(Iri::new(namespaces::rdf("type"))),
        object: Some(Term::Iri(Iri::new(namespaces::cims("ClassCategory")))),
    });
    typed.iter().any(|t| match &t.subject {
        Term::Iri(iri) => iri.as_str().ends_with("#Package_FileHeaderProfile"),
        _ => false,
    })
}

fn detect_cim16_style(graph: &dyn Graph) -> Option<(Option<String>, BTreeSet<Iri>)> {
    let fixed = graph.find(&TriplePattern {
        subject: None,
        predicate: Some(Iri::new(namespaces::cims("isFixed"))),
        object: None,
    });
    let mut keyword = None;
    let mut version_iris = BTreeSet::new();
    for t in &fixed {
        let Term::Iri(subject) = &t.subject else {
            continue;
        };
        if !has_version_domain(graph, subject) {
            continue;
        }
        let local = local_name(subject.as_str());
        let Some(text) = literal_text(&t.object) else {
            continue;
        };
        if local.ends_with(".shortName") {
            keyword = Some(text.to_string());
        } else if local.contains(".entsoeURI") || local.contains(".baseURI") {
            version_iris.insert(Iri::new(text.to_string()));
        }
    }
    if keyword.is_some() || !version_iris.is_empty() {
        Some((keyword, version_iris))
    } else {
        None
    }
}

fn detect_ontology_style(graph: &dyn Graph) -> Option<(String, BTreeSet<Iri>, Option<String>)> {
    let ontology_subjects: Vec<Term> = graph
        .find(&TriplePattern {
            subject: None,
            predicate: Some(Iri::new(namespaces::rdf("type"))),
            object: Some(Term::Iri(Iri::new(namespaces::owl("Ontology")))),
        })
        .into_iter()
        .map(|t| t.subject)
        .collect();
    if ontology_subjects.len() != 1 {
        return None;
    }
    let subject = ontology_subjects.into_iter().next()?;

    let keyword = graph
        .find(&TriplePattern {
            subject: Some(subject.clone()),
            predicate: Some(Iri::new(namespaces::dcat("keyword"))),
            object: None,
        })
        .into_iter()
        .find_map(|t| literal_text(&t.object).map(str::to_string))?;

    let version_iris: BTreeSet<Iri> = graph
        .find(&TriplePattern {
            subject: Some(subject.clone()),
            predicate: Some(Iri::new(namespaces::owl("versionIRI"))),
            object: None,
        })
        .into_iter()
        .filter_map(|t| match t.object {
            Term::Iri(iri) => Some(iri),
            _ => None,
        })
        .collect();
    if version_iris.is_empty() {
        return None;
    }

    let version_info = graph
        .find(&TriplePattern {
            subject: Some(subject),
            predicate: Some(Iri::new(namespaces::owl("versionInfo"))),
            object: None,
        })
        .into_iter()
        .find_map(|t| literal_text(&t.object).map(str::to_string));

    Some((keyword, version_iris, version_info))
}

/// Detect a graph's profile style and build its [`CimProfile`] wrapper.
/// Rejects (returns an error) if neither the ontology-style fingerprint nor
/// the header-class fingerprint is present (§4.F).
pub fn detect(graph: &dyn Graph) -> CimxmlResult<CimProfile> {
    let cim_version = graph
        .prefixes()
        .namespace("cim")
        .map(CimVersion::from_namespace)
        .unwrap_or(CimVersion::NoCim);

    if let Some((keyword, version_iris)) = detect_cim16_style(graph) {
        let is_header = detect_header_class_fingerprint(graph);
        let keyword = if is_header {
            Some(HEADER_PROFILE_SYNTHETIC_KEYWORD.to_string())
        } else {
            keyword
        };
        return Ok(CimProfile {
            kind: ProfileKind::Cim16Style,
            cim_version,
            is_header,
            keyword,
            version_iris,
            version_info: None,
        });
    }

    if let Some((keyword, version_iris, version_info)) = detect_ontology_style(graph) {
        let is_header = match cim_version {
            CimVersion::Cim18 => version_iris
                .iter()
                .any(|iri| iri.as_str().starts_with(DOCUMENT_HEADER_VERSION_PREFIX)),
            _ => detect_header_class_fingerprint(graph),
        };
        let keyword = if is_header && matches!(cim_version, CimVersion::Cim16 | CimVersion::Cim17) {
            HEADER_PROFILE_SYNTHETIC_KEYWORD.to_string()
        } else {
            keyword
        };
        return Ok(CimProfile {
            kind: ProfileKind::OntologyStyle,
            cim_version,
            is_header,
            keyword: Some(keyword),
            version_iris,
            version_info,
        });
    }

    Err(CimxmlError::ProfileRegistry(
        "graph has neither an ontology-style nor a header-class profile fingerprint".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cimxml_model::graph::{IndexStrategy, IndexedGraph};
    use cimxml_model::term::{Literal, Triple};

    fn ontology_graph(cim_ns: &str, version_iris: &[&str]) -> IndexedGraph {
        let mut g = IndexedGraph::new(IndexStrategy::Minimal);
        g.prefixes_mut().bind("cim", cim_ns);
        g.add(Triple::new(
            Term::iri("urn:profile:1"),
            Iri::new(namespaces::rdf("type")),
            Term::Iri(Iri::new(namespaces::owl("Ontology"))),
        ));
        g.add(Triple::new(
            Term::iri("urn:profile:1"),
            Iri::new(namespaces::dcat("keyword")),
            Term::Literal(Literal::plain("MyCIMProfile")),
        ));
        for v in version_iris {
            g.add(Triple::new(
                Term::iri("urn:profile:1"),
                Iri::new(namespaces::owl("versionIRI")),
                Term::Iri(Iri::new(*v)),
            ));
        }
        g
    }

    #[test]
    fn cim17_ontology_style_profile_detected() {
        let g = ontology_graph(
            namespaces::CIM_17_NS,
            &["http://iec.ch/TC57/ns/CIM/MyCIMProfile/3.0"],
        );
        let profile = detect(&g).unwrap();
        assert_eq!(profile.cim_version(), CimVersion::Cim17);
        assert_eq!(profile.dcat_keyword(), Some("MyCIMProfile"));
        assert!(!profile.is_header_profile());
        assert_eq!(profile.owl_version_iris().len(), 1);
    }

    #[test]
    fn cim18_document_header_profile_detected_by_version_iri_prefix() {
        let g = ontology_graph(
            namespaces::CIM_18_NS,
            &["https://ap-voc.cim4.eu/DocumentHeader/1.0"],
        );
        let profile = detect(&g).unwrap();
        assert_eq!(profile.cim_version(), CimVersion::Cim18);
        assert!(profile.is_header_profile());
    }

    #[test]
    fn non_profile_graph_is_rejected() {
        let mut g = IndexedGraph::new(IndexStrategy::Minimal);
        g.add(Triple::new(
            Term::iri("urn:a"),
            Iri::new("urn:p"),
            Term::Literal(Literal::plain("v")),
        ));
        assert!(detect(&g).is_err());
    }

    #[test]
    fn equality_by_version_and_iris() {
        let g1 = ontology_graph(namespaces::CIM_17_NS, &["urn:profile:v1"]);
        let g2 = ontology_graph(namespaces::CIM_17_NS, &["urn:profile:v1"]);
        assert_eq!(detect(&g1).unwrap(), detect(&g2).unwrap());
    }
}
