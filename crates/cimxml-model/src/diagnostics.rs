//! Warning/error collection for recoverable issues (§7: "Warnings").
//!
//! Fatal conditions abort a parse via [`crate::error::CimxmlError`]; anything
//! recoverable (UUID case/dash fixups, unrecognized RDF terms, unknown
//! primitive-type fallbacks, lenient `parseType` handling) is appended here
//! instead so the caller sees the full picture after a successful parse.
//!
//! ```
//! use cimxml_model::diagnostics::{Diagnostics, Severity};
//!
//! let mut diag = Diagnostics::new();
//! diag.add_warning("uuid", "upper-case UUID normalized to lower-case");
//! assert_eq!(diag.warning_count(), 1);
//! assert!(!diag.has_errors());
//! ```

use serde::Serialize;

/// Severity of a single diagnostic issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Recoverable: parsing continues with a best-effort substitution.
    Warning,
    /// Unrecoverable for the element being processed.
    Error,
}

/// A single diagnostic raised while parsing or registering a profile.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticIssue {
    pub severity: Severity,
    /// e.g. "uuid", "parse-type", "primitive-type", "reification".
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl DiagnosticIssue {
    pub fn new(severity: Severity, category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            category: category.into(),
            message: message.into(),
            entity: None,
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }
}

impl std::fmt::Display for DiagnosticIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "[{}:{}] {}", severity, self.category, self.message)?;
        if let Some(entity) = &self.entity {
            write!(f, " ({entity})")?;
        }
        Ok(())
    }
}

/// Collector of diagnostic issues for one parse or profile registration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DiagnosticIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, issue: DiagnosticIssue) {
        if issue.severity == Severity::Warning {
            tracing::warn!(category = %issue.category, entity = ?issue.entity, "{}", issue.message);
        }
        self.issues.push(issue);
    }

    pub fn add_warning(&mut self, category: &str, message: impl Into<String>) {
        self.add(DiagnosticIssue::new(Severity::Warning, category, message));
    }

    pub fn add_warning_with_entity(&mut self, category: &str, message: impl Into<String>, entity: impl Into<String>) {
        self.add(DiagnosticIssue::new(Severity::Warning, category, message).with_entity(entity));
    }

    pub fn add_error(&mut self, category: &str, message: impl Into<String>) {
        self.add(DiagnosticIssue::new(Severity::Error, category, message));
    }

    pub fn warning_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity == Severity::Warning).count()
    }

    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity == Severity::Error).count()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.issues.extend(other.issues);
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DiagnosticIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_severity() {
        let mut diag = Diagnostics::new();
        diag.add_warning("uuid", "upper-case UUID lower-cased");
        diag.add_error("parse", "bad NCName");
        assert_eq!(diag.warning_count(), 1);
        assert_eq!(diag.error_count(), 1);
        assert!(diag.has_errors());
    }

    #[test]
    fn display_includes_entity() {
        let issue = DiagnosticIssue::new(Severity::Warning, "uuid", "dashes inserted")
            .with_entity("urn:uuid:abc");
        let rendered = issue.to_string();
        assert!(rendered.contains("urn:uuid:abc"));
        assert!(rendered.contains("warning:uuid"));
    }

    #[test]
    fn merge_combines_issue_lists() {
        let mut a = Diagnostics::new();
        a.add_warning("x", "one");
        let mut b = Diagnostics::new();
        b.add_warning("y", "two");
        a.merge(b);
        assert_eq!(a.issues.len(), 2);
    }
}
