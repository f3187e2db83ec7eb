//! The parser's error-handler seam (§4.I: "consults an error-handler
//! interface with `warning`, `error`, `fatal`; `error` must throw").

use cimxml_model::diagnostics::Diagnostics;
use cimxml_model::error::CimxmlError;

/// Callback surface the parser drives as it encounters recoverable and
/// unrecoverable conditions. `warning` never aborts; `error`/`fatal` always
/// do — they return `Err` instead of failing silently, since Rust has no
/// throw-from-callback equivalent.
pub trait ErrorHandler {
    fn warning(&mut self, category: &str, message: String);
    fn error(&mut self, category: &str, message: String) -> CimxmlError;
    fn fatal(&mut self, category: &str, message: String) -> CimxmlError {
        self.error(category, message)
    }
    /// Like `fatal`, but for failures raised directly by the `quick_xml`
    /// reader — these keep their structured `CimxmlError::Xml` shape
    /// instead of collapsing to a `MalformedInput` string.
    fn fatal_xml(&mut self, err: quick_xml::Error) -> CimxmlError;
    fn diagnostics(&self) -> &Diagnostics;
}

/// Collects warnings into a [`Diagnostics`] and builds ordinary
/// [`CimxmlError`]s for fatal conditions. The default handler for lenient
/// parses.
#[derive(Debug, Default)]
pub struct DiagnosticsErrorHandler {
    pub diagnostics: Diagnostics,
}

impl DiagnosticsErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}

impl ErrorHandler for DiagnosticsErrorHandler {
    fn warning(&mut self, category: &str, message: String) {
        self.diagnostics.add_warning(category, message);
    }

    fn error(&mut self, category: &str, message: String) -> CimxmlError {
        self.diagnostics.add_error(category, message.clone());
        CimxmlError::MalformedInput(message)
    }

    fn fatal_xml(&mut self, err: quick_xml::Error) -> CimxmlError {
        self.diagnostics.add_error("xml", err.to_string());
        CimxmlError::Xml(err)
    }

    fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

/// Promotes every warning to a fatal error, for callers who want fail-fast
/// behavior instead of best-effort recovery (§4.I ErrorHandler; driven by
/// [`crate::config::ParserConfig::strict`]).
#[derive(Debug, Default)]
pub struct StrictErrorHandler {
    pub diagnostics: Diagnostics,
}

impl ErrorHandler for StrictErrorHandler {
    fn warning(&mut self, category: &str, message: String) {
        self.diagnostics.add_error(category, message.clone());
    }

    fn error(&mut self, category: &str, message: String) -> CimxmlError {
        self.diagnostics.add_error(category, message.clone());
        CimxmlError::MalformedInput(message)
    }

    fn fatal_xml(&mut self, err: quick_xml::Error) -> CimxmlError {
        self.diagnostics.add_error("xml", err.to_string());
        CimxmlError::Xml(err)
    }

    fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_handler_collects_warnings_without_erroring() {
        let mut handler = DiagnosticsErrorHandler::new();
        handler.warning("uuid", "upper-case UUID normalized".into());
        assert_eq!(handler.diagnostics.warning_count(), 1);
        assert!(!handler.diagnostics.has_errors());
    }

    #[test]
    fn strict_handler_turns_warnings_into_errors() {
        let mut handler = StrictErrorHandler::default();
        handler.warning("uuid", "upper-case UUID normalized".into());
        assert!(handler.diagnostics.has_errors());
    }
}
