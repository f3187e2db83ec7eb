//! Per-parse configuration, mirroring the teacher's per-call `Options`
//! structs in its format importers.

use cimxml_profiles::ProfileRegistry;

/// Toggles for one `parse_cim_model`/`parse_and_register_cim_profile` call.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Promote every warning to a fatal error via the [`crate::error_handler::ErrorHandler`]
    /// in use. Off by default: most CIMXML content wants the lenient path
    /// (§4.A "relative-URI use without a base is a warning").
    pub strict: bool,
    /// Accept the lower-case `rdf:parseType="literal"` spelling with a
    /// warning instead of rejecting it outright (§4.I). CIMXML producers in
    /// the wild emit this; true strict-mode callers can disable it.
    pub lenient_lowercase_parse_type: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strict: false,
            lenient_lowercase_parse_type: true,
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            strict: true,
            lenient_lowercase_parse_type: false,
        }
    }
}

/// Bundles the config with the profile registry a parse consults for
/// literal typing (§4.G/§4.I); kept distinct from `ParserConfig` so the
/// registry — typically process-wide and shared — is never cloned per call.
pub struct ParseContext<'a> {
    pub config: ParserConfig,
    pub registry: &'a ProfileRegistry,
}

impl<'a> ParseContext<'a> {
    pub fn new(registry: &'a ProfileRegistry) -> Self {
        Self {
            config: ParserConfig::default(),
            registry,
        }
    }

    pub fn with_config(registry: &'a ProfileRegistry, config: ParserConfig) -> Self {
        Self { config, registry }
    }
}
