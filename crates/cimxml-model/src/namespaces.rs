//! Well-known namespace IRIs used throughout the CIMXML core (§6, §3).

/// `md = http://iec.ch/TC57/61970-552/ModelDescription/1#`
pub const MD: &str = "http://iec.ch/TC57/61970-552/ModelDescription/1#";
/// `dm = http://iec.ch/TC57/61970-552/DifferenceModel/1#`
pub const DM: &str = "http://iec.ch/TC57/61970-552/DifferenceModel/1#";
/// `cims = http://iec.ch/TC57/1999/rdf-schema-extensions-19990926#`
pub const CIMS: &str = "http://iec.ch/TC57/1999/rdf-schema-extensions-19990926#";

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
pub const DCAT: &str = "http://www.w3.org/ns/dcat#";

/// The three `cim` namespace bindings recognized for CIM version detection
/// (§3 `CimVersion`).
pub const CIM_16_NS: &str = "http://iec.ch/TC57/2013/CIM-schema-cim16#";
pub const CIM_17_NS: &str = "http://iec.ch/TC57/CIM100#";
pub const CIM_18_NS: &str = "https://cim.ucaiug.io/ns#";

/// Prefix for a CIM-18 document-header profile's version IRI (§3).
pub const DOCUMENT_HEADER_VERSION_PREFIX: &str = "https://ap-voc.cim4.eu/DocumentHeader";

/// Document-context reserved graph names (§3).
pub const FULL_MODEL_GRAPH: &str = "http://iec.ch/TC57/61970-552/ModelDescription/1#FullModel";
pub const DIFFERENCE_MODEL_GRAPH: &str =
    "http://iec.ch/TC57/61970-552/DifferenceModel/1#DifferenceModel";
pub const FORWARD_DIFFERENCES_GRAPH: &str =
    "http://iec.ch/TC57/61970-552/DifferenceModel/1#forwardDifferences";
pub const REVERSE_DIFFERENCES_GRAPH: &str =
    "http://iec.ch/TC57/61970-552/DifferenceModel/1#reverseDifferences";
pub const PRECONDITIONS_GRAPH: &str =
    "http://iec.ch/TC57/61970-552/DifferenceModel/1#preconditions";

/// Implicit base applied to CIMXML documents lacking `xml:base` (§4.I).
pub const IMPLICIT_CIMXML_BASE: &str = "urn:uuid:";

pub fn md(local: &str) -> String {
    format!("{MD}{local}")
}

pub fn dm(local: &str) -> String {
    format!("{DM}{local}")
}

pub fn cims(local: &str) -> String {
    format!("{CIMS}{local}")
}

pub fn rdf(local: &str) -> String {
    format!("{RDF}{local}")
}

pub fn rdfs(local: &str) -> String {
    format!("{RDFS}{local}")
}

pub fn xsd(local: &str) -> String {
    format!("{XSD}{local}")
}

pub fn owl(local: &str) -> String {
    format!("{OWL}{local}")
}

pub fn dcat(local: &str) -> String {
    format!("{DCAT}{local}")
}
