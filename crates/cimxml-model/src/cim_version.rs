//! `CimVersion` enumeration, derived from the namespace bound to the `cim`
//! prefix (§3).

use crate::namespaces::{CIM_16_NS, CIM_17_NS, CIM_18_NS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CimVersion {
    NoCim,
    Cim16,
    Cim17,
    Cim18,
}

impl CimVersion {
    /// Classify the namespace IRI bound to the `cim` prefix.
    pub fn from_namespace(namespace: &str) -> CimVersion {
        match namespace {
            CIM_16_NS => CimVersion::Cim16,
            CIM_17_NS => CimVersion::Cim17,
            CIM_18_NS => CimVersion::Cim18,
            _ => CimVersion::NoCim,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_namespaces() {
        assert_eq!(
            CimVersion::from_namespace("http://iec.ch/TC57/2013/CIM-schema-cim16#"),
            CimVersion::Cim16
        );
        assert_eq!(
            CimVersion::from_namespace("http://iec.ch/TC57/CIM100#"),
            CimVersion::Cim17
        );
        assert_eq!(
            CimVersion::from_namespace("https://cim.ucaiug.io/ns#"),
            CimVersion::Cim18
        );
        assert_eq!(
            CimVersion::from_namespace("http://example.org/other#"),
            CimVersion::NoCim
        );
    }
}
