//! Process-wide CIM primitive-type name → XSD datatype table (§4.G).
//!
//! Shared across registry instances the way the teacher's solver backends
//! are shared across a process: a `Lazy<RwLock<_>>` behind a small,
//! data-driven registration API (`register_primitive_type`) rather than a
//! hard-coded match.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use cimxml_model::namespaces::xsd;
use cimxml_model::namespaces::rdf;
use cimxml_model::term::Iri;

fn default_table() -> HashMap<String, Iri> {
    let mut m = HashMap::new();
    let mut put = |name: &str, dt: String| {
        m.insert(name.to_string(), Iri::new(dt));
    };
    put("Boolean", xsd("boolean"));
    put("Integer", xsd("integer"));
    put("Int", xsd("int"));
    put("Long", xsd("long"));
    put("Short", xsd("short"));
    put("Byte", xsd("byte"));
    put("UnsignedByte", xsd("unsignedByte"));
    put("UnsignedShort", xsd("unsignedShort"));
    put("UnsignedInt", xsd("unsignedInt"));
    put("UnsignedLong", xsd("unsignedLong"));
    put("PositiveInteger", xsd("positiveInteger"));
    put("NonNegativeInteger", xsd("nonNegativeInteger"));
    put("NonPositiveInteger", xsd("nonPositiveInteger"));
    put("NegativeInteger", xsd("negativeInteger"));
    put("Float", xsd("float"));
    put("Double", xsd("double"));
    put("Decimal", xsd("decimal"));
    put("String", xsd("string"));
    put("StringFixedLanguage", xsd("string"));
    put("StringIRI", xsd("string"));
    put("UUID", xsd("string"));
    put("Version", xsd("string"));
    put("LangString", rdf("langString"));
    put("URI", xsd("anyURI"));
    put("IRI", xsd("string"));
    put("Date", xsd("date"));
    put("Time", xsd("time"));
    put("DateTime", xsd("dateTime"));
    put("DateTimeStamp", xsd("dateTimeStamp"));
    put("Duration", xsd("duration"));
    put("DayTimeDuration", xsd("dayTimeDuration"));
    put("YearMonthDuration", xsd("yearMonthDuration"));
    put("gDay", xsd("gDay"));
    put("gMonth", xsd("gMonth"));
    put("gMonthDay", xsd("gMonthDay"));
    put("gYear", xsd("gYear"));
    put("gYearMonth", xsd("gYearMonth"));
    put("Base64Binary", xsd("base64Binary"));
    put("HexBinary", xsd("hexBinary"));
    m
}

static PRIMITIVE_TYPES: Lazy<RwLock<HashMap<String, Iri>>> = Lazy::new(|| RwLock::new(default_table()));

/// Resolve a CIM primitive type name to its XSD (or `rdf:langString`)
/// datatype IRI.
pub fn primitive_datatype(name: &str) -> Option<Iri> {
    PRIMITIVE_TYPES
        .read()
        .expect("primitive type table lock poisoned")
        .get(name)
        .cloned()
}

/// Insert or overwrite a primitive-type mapping (§4.G
/// `registerPrimitiveType`).
pub fn register_primitive_type(name: &str, datatype: Iri) {
    PRIMITIVE_TYPES
        .write()
        .expect("primitive type table lock poisoned")
        .insert(name.to_string(), datatype);
}

/// Fallback datatype used when a primitive-type name has no registered
/// mapping (§4.G: "misses emit a warning and fall back to `xsd:string`").
pub fn fallback_datatype() -> Iri {
    Iri::new(xsd("string"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_primitive() {
        assert_eq!(
            primitive_datatype("Float").unwrap().as_str(),
            "http://www.w3.org/2001/XMLSchema#float"
        );
    }

    #[test]
    fn uri_maps_to_any_uri_not_string() {
        assert_eq!(
            primitive_datatype("URI").unwrap().as_str(),
            "http://www.w3.org/2001/XMLSchema#anyURI"
        );
    }

    #[test]
    fn unknown_primitive_is_none() {
        assert!(primitive_datatype("NotARealType").is_none());
    }

    #[test]
    fn register_overwrites_existing_entry() {
        register_primitive_type("Boolean", Iri::new("urn:test:overridden"));
        assert_eq!(primitive_datatype("Boolean").unwrap().as_str(), "urn:test:overridden");
        // restore so other tests in this process are unaffected
        register_primitive_type("Boolean", Iri::new("http://www.w3.org/2001/XMLSchema#boolean"));
    }
}
