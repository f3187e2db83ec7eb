//! Profile registry: registration, compilation of property→datatype maps,
//! and profile-set lookup with merge caching (§4.G).

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use cimxml_model::error::{CimxmlError, CimxmlResult};
use cimxml_model::graph::{Graph, TriplePattern};
use cimxml_model::namespaces;
use cimxml_model::term::{Iri, Term};
use cimxml_model::CimVersion;

use crate::primitive_types;
use crate::profile::{CimProfile, Profile};

/// One compiled property, as yielded by the registration query (§4.G).
/// Exactly one of `primitive_datatype`/`reference_type` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInfo {
    pub rdf_type: Iri,
    pub property: Iri,
    pub cim_datatype: Option<Iri>,
    pub primitive_datatype: Option<Iri>,
    pub reference_type: Option<Iri>,
}

/// `property IRI → PropertyInfo`, the unit the parser consults for literal
/// typing (§4.I step 2).
pub type PropertyMap = HashMap<Iri, PropertyInfo>;

fn local_name(iri: &str) -> &str {
    iri.rsplit(['#', '/']).next().unwrap_or(iri)
}

fn literal_text(term: &Term) -> Option<&str> {
    match term {
        Term::Literal(lit) => Some(&lit.lexical),
        _ => None,
    }
}

fn single_object(graph: &dyn Graph, subject: &Term, predicate: &str) -> Option<Term> {
    graph
        .find(&TriplePattern {
            subject: Some(subject.clone()),
            predicate: Some(Iri::new(predicate.to_string())),
            object: None,
        })
        .into_iter()
        .next()
        .map(|t| t.object)
}

fn has_stereotype(graph: &dyn Graph, subject: &Term, stereotype: &str) -> bool {
    graph
        .find(&TriplePattern {
            subject: Some(subject.clone()),
            predicate: Some(Iri::new(namespaces::cims("stereotype"))),
            object: None,
        })
        .into_iter()
        .any(|t| literal_text(&t.object) == Some(stereotype))
}

fn label_of(graph: &dyn Graph, subject: &Term) -> Option<String> {
    single_object(graph, subject, &namespaces::rdfs("label")).and_then(|t| literal_text(&t).map(str::to_string))
}

/// Resolve `cimDatatype`'s primitive-type label per §4.G: either the
/// datatype itself is stereotyped `Primitive` with a label, or it is
/// stereotyped `CIMDatatype` and has an inner `*.value` property whose
/// `cims:dataType` is a labeled `Primitive`.
fn primitive_type_label(graph: &dyn Graph, cim_datatype: &Term) -> Option<String> {
    if has_stereotype(graph, cim_datatype, "Primitive") {
        return label_of(graph, cim_datatype);
    }
    if has_stereotype(graph, cim_datatype, "CIMDatatype") {
        let inner_properties = graph.find(&TriplePattern {
            subject: None,
            predicate: Some(Iri::new(namespaces::rdfs("domain"))),
            object: Some(cim_datatype.clone()),
        });
        for t in inner_properties {
            let Term::Iri(prop_iri) = &t.subject else {
                continue;
            };
            if !local_name(prop_iri.as_str()).ends_with(".value") {
                continue;
            }
            if let Some(inner_dt) = single_object(graph, &t.subject, &namespaces::cims("dataType")) {
                if has_stereotype(graph, &inner_dt, "Primitive") {
                    return label_of(graph, &inner_dt);
                }
            }
        }
    }
    None
}

/// Run the registration query (§4.G) against a profile graph, producing its
/// compiled property map. Unknown primitive-type names fall back to
/// `xsd:string` with a warning.
pub fn compile_property_map(graph: &dyn Graph) -> PropertyMap {
    let mut map = PropertyMap::new();
    let domains = graph.find(&TriplePattern {
        subject: None,
        predicate: Some(Iri::new(namespaces::rdfs("domain"))),
        object: None,
    });

    for t in domains {
        let Term::Iri(property) = t.subject.clone() else {
            continue;
        };
        let Term::Iri(rdf_type) = t.object.clone() else {
            continue;
        };

        let ranges = graph.find(&TriplePattern {
            subject: Some(t.subject.clone()),
            predicate: Some(Iri::new(namespaces::rdfs("range"))),
            object: None,
        });

        if let Some(range_triple) = ranges.into_iter().next() {
            let Term::Iri(reference_type) = range_triple.object else {
                continue;
            };
            let association_used = graph
                .find(&TriplePattern {
                    subject: Some(t.subject.clone()),
                    predicate: Some(Iri::new(namespaces::cims("AssociationUsed"))),
                    object: None,
                })
                .into_iter()
                .find_map(|at| literal_text(&at.object).map(str::to_string));

            let qualifies = match association_used.as_deref() {
                None => true,
                Some("Yes") => true,
                Some(_) => false,
            };
            if qualifies {
                map.insert(
                    property.clone(),
                    PropertyInfo {
                        rdf_type,
                        property,
                        cim_datatype: None,
                        primitive_datatype: None,
                        reference_type: Some(reference_type),
                    },
                );
            }
            continue;
        }

        if let Some(cim_datatype_term) = single_object(graph, &t.subject, &namespaces::cims("dataType")) {
            let Term::Iri(cim_datatype) = cim_datatype_term.clone() else {
                continue;
            };
            let primitive_datatype = match primitive_type_label(graph, &cim_datatype_term) {
                Some(label) => primitive_types::primitive_datatype(&label).unwrap_or_else(|| {
                    tracing::warn!(primitive_type = %label, "unknown primitive type, falling back to xsd:string");
                    primitive_types::fallback_datatype()
                }),
                None => primitive_types::fallback_datatype(),
            };
            map.insert(
                property.clone(),
                PropertyInfo {
                    rdf_type,
                    property,
                    cim_datatype: Some(cim_datatype),
                    primitive_datatype: Some(primitive_datatype),
                    reference_type: None,
                },
            );
        }
    }

    map
}

struct RegisteredProfile {
    profile: CimProfile,
    properties: Arc<PropertyMap>,
}

/// Registry state (§4.G): singleton and multi-IRI profile maps, per-CIM-
/// version header profiles, and a merge cache keyed by profile set.
#[derive(Default)]
pub struct ProfileRegistry {
    by_singleton_iri: RwLock<HashMap<Iri, Arc<RegisteredProfile>>>,
    by_iri_set: RwLock<HashMap<BTreeSet<Iri>, Arc<RegisteredProfile>>>,
    header_by_version: RwLock<HashMap<CimVersion, Arc<RegisteredProfile>>>,
    merge_cache: RwLock<HashMap<BTreeSet<Iri>, Arc<PropertyMap>>>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a profile graph: detect its style, compile its property
    /// map, and store it under the appropriate key (§4.G "Registration
    /// contract").
    pub fn register(&self, graph: &dyn Graph) -> CimxmlResult<CimProfile> {
        let profile = crate::profile::detect(graph)?;
        let properties = Arc::new(compile_property_map(graph));
        let entry = Arc::new(RegisteredProfile {
            profile: profile.clone(),
            properties,
        });

        if profile.is_header_profile() {
            let mut header = self.header_by_version.write().expect("registry lock poisoned");
            if header.contains_key(&profile.cim_version()) {
                return Err(CimxmlError::ProfileRegistry(format!(
                    "a header profile for CIM version {:?} is already registered",
                    profile.cim_version()
                )));
            }
            header.insert(profile.cim_version(), entry);
            return Ok(profile);
        }

        let iris = profile.owl_version_iris().clone();
        if iris.len() == 1 {
            let iri = iris.iter().next().unwrap().clone();
            let mut singleton = self.by_singleton_iri.write().expect("registry lock poisoned");
            if singleton.contains_key(&iri) {
                return Err(CimxmlError::ProfileRegistry(format!(
                    "version IRI '{iri}' is already registered"
                )));
            }
            singleton.insert(iri, entry);
        } else {
            let mut sets = self.by_iri_set.write().expect("registry lock poisoned");
            if sets.contains_key(&iris) {
                return Err(CimxmlError::ProfileRegistry(
                    "this set of version IRIs is already registered".into(),
                ));
            }
            sets.insert(iris, entry);
        }
        tracing::info!(cim_version = ?profile.cim_version(), keyword = ?profile.dcat_keyword(), "registered CIM profile");
        Ok(profile)
    }

    fn find_by_iri(&self, iri: &Iri) -> Option<Arc<RegisteredProfile>> {
        if let Some(p) = self.by_singleton_iri.read().expect("registry lock poisoned").get(iri) {
            return Some(p.clone());
        }
        self.by_iri_set
            .read()
            .expect("registry lock poisoned")
            .values()
            .find(|p| p.profile.owl_version_iris().contains(iri))
            .cloned()
    }

    /// Resolve the property map for a set of version IRIs (§4.G "Lookup").
    pub fn properties_for(&self, version_iris: &BTreeSet<Iri>) -> Option<Arc<PropertyMap>> {
        if version_iris.len() == 1 {
            let iri = version_iris.iter().next().unwrap();
            if let Some(p) = self.by_singleton_iri.read().expect("registry lock poisoned").get(iri) {
                return Some(p.properties.clone());
            }
        }
        if let Some(p) = self.by_iri_set.read().expect("registry lock poisoned").get(version_iris) {
            return Some(p.properties.clone());
        }

        if let Some(cached) = self.merge_cache.read().expect("registry lock poisoned").get(version_iris) {
            return Some(cached.clone());
        }

        let mut merged = PropertyMap::new();
        for iri in version_iris {
            let found = self.find_by_iri(iri)?;
            merged.extend(found.properties.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        let merged = Arc::new(merged);
        self.merge_cache
            .write()
            .expect("registry lock poisoned")
            .insert(version_iris.clone(), merged.clone());
        Some(merged)
    }

    /// Resolve the header profile's property map for a CIM version (§4.G).
    pub fn header_properties_for(&self, version: CimVersion) -> Option<Arc<PropertyMap>> {
        self.header_by_version
            .read()
            .expect("registry lock poisoned")
            .get(&version)
            .map(|p| p.properties.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cimxml_model::graph::{IndexStrategy, IndexedGraph};
    use cimxml_model::term::{Literal, Triple};

    fn profile_graph(version_iri: &str, prop_local: &str, primitive_label: &str) -> IndexedGraph {
        let mut g = IndexedGraph::new(IndexStrategy::Minimal);
        g.prefixes_mut().bind("cim", namespaces::CIM_17_NS);
        g.add(Triple::new(
            Term::iri("urn:profile"),
            Iri::new(namespaces::rdf("type")),
            Term::Iri(Iri::new(namespaces::owl("Ontology"))),
        ));
        g.add(Triple::new(
            Term::iri("urn:profile"),
            Iri::new(namespaces::dcat("keyword")),
            Term::Literal(Literal::plain("MyProfile")),
        ));
        g.add(Triple::new(
            Term::iri("urn:profile"),
            Iri::new(namespaces::owl("versionIRI")),
            Term::Iri(Iri::new(version_iri)),
        ));

        let prop = format!("urn:cim:ClassA.{prop_local}");
        g.add(Triple::new(
            Term::iri(&prop),
            Iri::new(namespaces::rdfs("domain")),
            Term::Iri(Iri::new("urn:cim:ClassA")),
        ));
        g.add(Triple::new(
            Term::iri(&prop),
            Iri::new(namespaces::cims("dataType")),
            Term::Iri(Iri::new("urn:cim:PrimType")),
        ));
        g.add(Triple::new(
            Term::iri("urn:cim:PrimType"),
            Iri::new(namespaces::cims("stereotype")),
            Term::Literal(Literal::plain("Primitive")),
        ));
        g.add(Triple::new(
            Term::iri("urn:cim:PrimType"),
            Iri::new(namespaces::rdfs("label")),
            Term::Literal(Literal::plain(primitive_label)),
        ));
        g
    }

    #[test]
    fn compiles_primitive_property_info() {
        let g = profile_graph("urn:v1", "floatProperty", "Float");
        let map = compile_property_map(&g);
        let info = map.get(&Iri::new("urn:cim:ClassA.floatProperty")).unwrap();
        assert_eq!(info.rdf_type.as_str(), "urn:cim:ClassA");
        assert_eq!(
            info.primitive_datatype.as_ref().unwrap().as_str(),
            "http://www.w3.org/2001/XMLSchema#float"
        );
        assert!(info.reference_type.is_none());
    }

    #[test]
    fn register_rejects_duplicate_version_iri() {
        let registry = ProfileRegistry::new();
        let g1 = profile_graph("urn:dup", "p1", "Float");
        let g2 = profile_graph("urn:dup", "p2", "String");
        registry.register(&g1).unwrap();
        assert!(registry.register(&g2).is_err());
    }

    #[test]
    fn properties_for_merges_across_profiles_and_caches() {
        let registry = ProfileRegistry::new();
        let g1 = profile_graph("urn:v1", "a", "Float");
        let g2 = profile_graph("urn:v2", "b", "String");
        registry.register(&g1).unwrap();
        registry.register(&g2).unwrap();

        let set: BTreeSet<Iri> = [Iri::new("urn:v1"), Iri::new("urn:v2")].into_iter().collect();
        let merged1 = registry.properties_for(&set).unwrap();
        assert_eq!(merged1.len(), 2);
        let merged2 = registry.properties_for(&set).unwrap();
        assert!(Arc::ptr_eq(&merged1, &merged2));
    }

    #[test]
    fn unresolvable_iri_in_set_yields_none() {
        let registry = ProfileRegistry::new();
        let g1 = profile_graph("urn:v1", "a", "Float");
        registry.register(&g1).unwrap();
        let set: BTreeSet<Iri> = [Iri::new("urn:v1"), Iri::new("urn:unknown")].into_iter().collect();
        assert!(registry.properties_for(&set).is_none());
    }
}
