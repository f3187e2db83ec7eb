//! Unified error type for the CIMXML ecosystem.
//!
//! Mirrors the §7 error taxonomy: malformed input and semantic violations are
//! fatal and abort the current parse; profile-registry and difference-model
//! rejections are reported at the operation that triggered them. Warnings are
//! never represented here — see [`crate::diagnostics`] for recoverable issues.

use thiserror::Error;

/// Unified error type for all CIMXML operations.
#[derive(Error, Debug)]
pub enum CimxmlError {
    /// XML well-formedness violations, unexpected events, forbidden old
    /// RDF/XML terms, conflicting attribute combinations.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Relative IRI with no base, `rdf:ID` reused in the same base scope,
    /// unknown `rdf:parseType`, or model-header accessors called before a
    /// FullModel/DifferenceModel marker was seen.
    #[error("semantic violation: {0}")]
    SemanticViolation(String),

    /// Profile registration rejected: duplicate version IRI, duplicate
    /// version-IRI set, duplicate header profile for a CIM version, or a
    /// graph lacking the required ontology/header fingerprint.
    #[error("profile registry error: {0}")]
    ProfileRegistry(String),

    /// `differenceModelToFullModel` preconditions failed: wrong type on
    /// predecessor, missing precondition triples, predecessor absent from
    /// `Supersedes`.
    #[error("difference application failed: {0}")]
    DifferenceApplication {
        reason: String,
        missing: Vec<String>,
    },

    /// A best-effort multi-graph transaction had one or more participants
    /// fail; carries every underlying failure message.
    #[error("transaction failed on {} graph(s): {}", .failures.len(), .failures.join("; "))]
    Transaction { failures: Vec<String> },

    /// I/O errors reading the byte source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML well-formedness failures raised directly by the underlying
    /// `quick_xml` reader (unclosed tags, bad entities, mismatched end
    /// tags) — distinct from [`CimxmlError::MalformedInput`], which covers
    /// CIMXML/RDF grammar violations detected above the XML layer.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Convenience alias for results using [`CimxmlError`].
pub type CimxmlResult<T> = Result<T, CimxmlError>;

impl From<String> for CimxmlError {
    fn from(s: String) -> Self {
        CimxmlError::MalformedInput(s)
    }
}

impl From<&str> for CimxmlError {
    fn from(s: &str) -> Self {
        CimxmlError::MalformedInput(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category() {
        let err = CimxmlError::SemanticViolation("relative IRI with no base".into());
        assert!(err.to_string().contains("semantic violation"));
    }

    #[test]
    fn transaction_error_lists_failures() {
        let err = CimxmlError::Transaction {
            failures: vec!["graph A".into(), "graph B".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("graph A"));
        assert!(msg.contains("graph B"));
    }
}
