//! Streaming RDF/XML + CIMXML parser (§4.I): a pull-driven recursive-descent
//! state machine over `quick_xml` events. The grammar core is generic over
//! [`TripleSink`] so the same node/property-element machinery serves both
//! `parse_cim_model` (routes into a [`CimDataset`] with context switching)
//! and `parse_and_register_cim_profile` (drops everything into one plain
//! graph, since profile ontologies never carry CIM model-header elements).

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use quick_xml::events::{BytesPI, BytesStart, Event};
use quick_xml::Reader;

use cimxml_model::error::{CimxmlError, CimxmlResult};
use cimxml_model::namespaces::{self, IMPLICIT_CIMXML_BASE};
use cimxml_model::resolver::TermFactory;
use cimxml_model::term::{Iri, Literal, Term, Triple};
use cimxml_model::{CimVersion, Diagnostics};

use cimxml_profiles::profile::CimProfile;
use cimxml_profiles::registry::PropertyMap;
use cimxml_profiles::ProfileRegistry;

use crate::cim_dataset::CimDataset;
use crate::config::{ParseContext, ParserConfig};
use crate::error_handler::{DiagnosticsErrorHandler, ErrorHandler, StrictErrorHandler};
use crate::sink::{CimxmlSink, DifferenceContainer, GraphSink, TripleSink};

/// Thin wrapper over `quick_xml::Reader` that always hands back owned
/// events, so recursive descent functions never have to thread a buffer
/// lifetime through themselves (§9 "avoid any per-element object churn" is
/// about the base/lang stack, not this — the extra clone here buys a much
/// simpler recursive grammar).
struct Cursor<'a> {
    reader: Reader<&'a [u8]>,
    buf: Vec<u8>,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            reader: Reader::from_str(source),
            buf: Vec::new(),
        }
    }

    fn next(&mut self) -> quick_xml::Result<Event<'static>> {
        self.buf.clear();
        let event = self.reader.read_event_into(&mut self.buf)?;
        Ok(event.into_owned())
    }
}

fn split_qname(raw: &str) -> (&str, &str) {
    match raw.find(':') {
        Some(i) => (&raw[..i], &raw[i + 1..]),
        None => ("", raw),
    }
}

/// Element-scoped prefix→namespace bindings, one full snapshot per depth
/// (xmlns declarations are scoped to the element and its descendants).
#[derive(Debug, Default)]
struct NamespaceScope {
    stack: Vec<HashMap<String, String>>,
}

impl NamespaceScope {
    fn new() -> Self {
        Self {
            stack: vec![HashMap::new()],
        }
    }

    fn push(&mut self, overrides: &[(String, String)]) {
        let mut top = self.stack.last().cloned().unwrap_or_default();
        for (prefix, ns) in overrides {
            top.insert(prefix.clone(), ns.clone());
        }
        self.stack.push(top);
    }

    fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    fn top(&self) -> &HashMap<String, String> {
        self.stack.last().expect("namespace stack never empty")
    }
}

fn qualify_with_map(map: &HashMap<String, String>, raw: &str, allow_default: bool) -> CimxmlResult<String> {
    let (prefix, local) = split_qname(raw);
    if prefix.is_empty() {
        if !allow_default {
            return Err(CimxmlError::MalformedInput(format!(
                "unqualified non-RDF attribute '{raw}'"
            )));
        }
        return match map.get("") {
            Some(ns) => Ok(format!("{ns}{local}")),
            None => Err(CimxmlError::MalformedInput(format!("no default namespace bound for '{raw}'"))),
        };
    }
    if prefix == "xml" {
        return Ok(format!("http://www.w3.org/XML/1998/namespace{local}"));
    }
    match map.get(prefix) {
        Some(ns) => Ok(format!("{ns}{local}")),
        None => Err(CimxmlError::MalformedInput(format!("unbound namespace prefix in '{raw}'"))),
    }
}

fn qualify(scope: &NamespaceScope, raw: &str, allow_default: bool) -> CimxmlResult<String> {
    qualify_with_map(scope.top(), raw, allow_default)
}

fn raw_name_of(start: &BytesStart<'_>) -> CimxmlResult<String> {
    std::str::from_utf8(start.name().as_ref())
        .map(str::to_string)
        .map_err(|e| CimxmlError::MalformedInput(format!("non-UTF8 element name: {e}")))
}

struct ElementAttrs {
    xmlns_overrides: Vec<(String, String)>,
    others: Vec<(String, String)>,
}

fn collect_attrs(start: &BytesStart<'_>) -> CimxmlResult<ElementAttrs> {
    let mut xmlns_overrides = Vec::new();
    let mut others = Vec::new();
    for attr_result in start.attributes() {
        let attr = attr_result.map_err(|e| CimxmlError::MalformedInput(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| CimxmlError::MalformedInput(format!("non-UTF8 attribute name: {e}")))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| CimxmlError::MalformedInput(format!("bad entity in '{key}': {e}")))?
            .into_owned();
        if key == "xmlns" {
            xmlns_overrides.push((String::new(), value));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            xmlns_overrides.push((prefix.to_string(), value));
        } else {
            others.push((key, value));
        }
    }
    Ok(ElementAttrs { xmlns_overrides, others })
}

fn is_valid_ncname(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
}

fn as_dashed_uuid(s: &str) -> Option<(String, bool)> {
    if s.len() != 36 {
        return None;
    }
    let b = s.as_bytes();
    for &i in &[8usize, 13, 18, 23] {
        if b[i] != b'-' {
            return None;
        }
    }
    let mut had_upper = false;
    for (i, &c) in b.iter().enumerate() {
        if [8usize, 13, 18, 23].contains(&i) {
            continue;
        }
        if !c.is_ascii_hexdigit() {
            return None;
        }
        if c.is_ascii_uppercase() {
            had_upper = true;
        }
    }
    Some((s.to_ascii_lowercase(), had_upper))
}

fn as_undashed_uuid(s: &str) -> Option<String> {
    if s.len() != 32 || !s.bytes().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(s.to_ascii_lowercase())
}

fn insert_dashes(hex32: &str) -> String {
    format!(
        "{}-{}-{}-{}-{}",
        &hex32[0..8],
        &hex32[8..12],
        &hex32[12..16],
        &hex32[16..20],
        &hex32[20..32]
    )
}

fn escape_xml_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_xml_attr(s: &str) -> String {
    escape_xml_text(s).replace('"', "&quot;")
}

fn extract_pi_attr(s: &str, name: &str) -> Option<String> {
    let needle = format!("{name}=\"");
    let start = s.find(&needle)? + needle.len();
    let end = s[start..].find('"')? + start;
    Some(s[start..end].to_string())
}

/// Parser state for one document. The XML cursor is threaded explicitly
/// through every method instead of being a field, so recursive node/property
/// calls never fight the borrow checker over `&mut self`.
struct Parser<'r> {
    config: ParserConfig,
    registry: &'r ProfileRegistry,
    handler: Box<dyn ErrorHandler>,
    terms: TermFactory,
    ns: NamespaceScope,
    is_cimxml: bool,
    cim_version: CimVersion,
    seen_ids: HashSet<String>,
    active_properties: Option<Arc<PropertyMap>>,
}

impl<'r> Parser<'r> {
    fn new(ctx: &ParseContext<'r>) -> Self {
        let handler: Box<dyn ErrorHandler> = if ctx.config.strict {
            Box::new(StrictErrorHandler::default())
        } else {
            Box::new(DiagnosticsErrorHandler::default())
        };
        Self {
            config: ctx.config.clone(),
            registry: ctx.registry,
            handler,
            terms: TermFactory::new(),
            ns: NamespaceScope::new(),
            is_cimxml: false,
            cim_version: CimVersion::NoCim,
            seen_ids: HashSet::new(),
            active_properties: None,
        }
    }

    fn enter_element_scope(&mut self, attrs: &ElementAttrs, sink: &mut dyn TripleSink) -> CimxmlResult<usize> {
        self.ns.push(&attrs.xmlns_overrides);
        for (prefix, ns) in &attrs.xmlns_overrides {
            sink.prefix(prefix, ns);
            if prefix == "cim" {
                self.is_cimxml = true;
                self.cim_version = CimVersion::from_namespace(ns);
            }
        }
        let mut base_override = None;
        let mut lang_override = None;
        for (key, value) in &attrs.others {
            if key == "xml:base" {
                base_override = Some(Iri::new(value.clone()));
            } else if key == "xml:lang" {
                lang_override = Some(Arc::<str>::from(value.as_str()));
            }
        }
        if base_override.is_none() && self.terms.current_base().is_none() && self.is_cimxml {
            base_override = Some(Iri::new(IMPLICIT_CIMXML_BASE));
        }
        if let Some(b) = &base_override {
            sink.base(b);
        }
        Ok(self.terms.push_frame(base_override, lang_override))
    }

    fn exit_element_scope(&mut self, depth: usize) {
        self.terms.pop_to(depth);
        self.ns.pop();
    }

    fn resolve_plain(&mut self, raw: &str) -> CimxmlResult<Iri> {
        let base = self.terms.current_base().cloned();
        let mut diag = Diagnostics::new();
        let result = self.terms.resolve_lenient(raw, base.as_ref(), &mut diag);
        for issue in diag.issues {
            self.handler.warning(&issue.category, issue.message);
        }
        result.map_err(|e| self.handler.fatal("base", e.to_string()))
    }

    /// Try to read `candidate` (already stripped of its CIMXML `_`/`#_`
    /// prefix) as a 36- or 32-char UUID shape (§4.I).
    fn try_uuid(&mut self, candidate: &str, original: &str) -> CimxmlResult<Option<Iri>> {
        if let Some((lower, had_upper)) = as_dashed_uuid(candidate) {
            if had_upper {
                self.handler
                    .warning("uuid", format!("upper-case UUID '{original}' normalized to lower-case"));
            }
            return Ok(Some(Iri::new(format!("urn:uuid:{lower}"))));
        }
        if let Some(hex) = as_undashed_uuid(candidate) {
            let dashed = insert_dashes(&hex);
            self.handler
                .warning("uuid", format!("32-char UUID '{original}' rewritten with dashes"));
            return Ok(Some(Iri::new(format!("urn:uuid:{dashed}"))));
        }
        Ok(None)
    }

    fn resolve_reference_iri(&mut self, raw: &str) -> CimxmlResult<Iri> {
        if self.is_cimxml {
            if let Some(stripped) = raw.strip_prefix("#_") {
                if let Some(iri) = self.try_uuid(stripped, raw)? {
                    return Ok(iri);
                }
            }
        }
        self.resolve_plain(raw)
    }

    fn resolve_about_or_resource(&mut self, raw: &str) -> CimxmlResult<Term> {
        Ok(Term::Iri(self.resolve_reference_iri(raw)?))
    }

    fn resolve_id(&mut self, raw: &str) -> CimxmlResult<Term> {
        if !is_valid_ncname(raw) {
            return Err(self.handler.fatal("xml", format!("'{raw}' is not a valid NCName for rdf:ID")));
        }
        self.track_duplicate_id(raw);
        if self.is_cimxml {
            let stripped = raw.strip_prefix('_').unwrap_or(raw);
            if let Some(iri) = self.try_uuid(stripped, raw)? {
                return Ok(Term::Iri(iri));
            }
        }
        let fragment = format!("#{raw}");
        Ok(Term::Iri(self.resolve_plain(&fragment)?))
    }

    fn track_duplicate_id(&mut self, raw: &str) {
        let base_key = self.terms.current_base().map(|b| b.as_str().to_string()).unwrap_or_default();
        let key = format!("{base_key}#{raw}");
        if !self.seen_ids.insert(key) {
            self.handler.warning("id", format!("rdf:ID '{raw}' reused within the same base scope"));
        }
    }

    /// Literal typing priority (§4.I): explicit datatype (handled by the
    /// caller before reaching here) → active profile property map → current
    /// `xml:lang` → plain string.
    fn literal_term(&mut self, predicate: &str, text: &str, explicit_datatype: Option<&str>) -> CimxmlResult<Term> {
        if let Some(dt) = explicit_datatype {
            let dt_iri = self.resolve_plain(dt)?;
            return Ok(Term::Literal(Literal::with_datatype(text.to_string(), dt_iri)));
        }
        if self.is_cimxml {
            if let Some(map) = self.active_properties.clone() {
                if let Some(info) = map.get(&Iri::new(predicate.to_string())) {
                    if let Some(primitive) = &info.primitive_datatype {
                        if primitive.as_str() == namespaces::xsd("anyURI") {
                            let iri = self.resolve_plain(text)?;
                            return Ok(Term::Iri(iri));
                        }
                        return Ok(Term::Literal(Literal::with_datatype(text.to_string(), primitive.clone())));
                    }
                }
            }
        }
        if let Some(lang) = self.terms.current_lang() {
            if !lang.is_empty() {
                return Ok(Term::Literal(Literal::with_lang(text.to_string(), lang.to_string())));
            }
        }
        Ok(Term::Literal(Literal::plain(text.to_string())))
    }

    fn handle_pi(&mut self, pi: &BytesPI<'_>, sink: &mut dyn TripleSink) -> CimxmlResult<()> {
        let target = std::str::from_utf8(pi.target()).map_err(|e| self.handler.fatal("xml", e.to_string()))?;
        if target == "iec61970-552" {
            let content = std::str::from_utf8(pi.content()).map_err(|e| self.handler.fatal("xml", e.to_string()))?;
            if let Some(version) = extract_pi_attr(content.trim(), "version") {
                sink.set_version_of_iec61970_552(&version);
            }
        }
        Ok(())
    }

    fn parse_document(&mut self, cursor: &mut Cursor, sink: &mut dyn TripleSink) -> CimxmlResult<()> {
        sink.start();
        loop {
            let event = cursor.next().map_err(|e| self.handler.fatal_xml(e))?;
            match event {
                Event::Decl(_) | Event::Comment(_) | Event::DocType(_) => continue,
                Event::PI(pi) => self.handle_pi(&pi, sink)?,
                Event::Text(t) => {
                    let text = t.unescape().map_err(|e| self.handler.fatal_xml(e))?;
                    if !text.trim().is_empty() {
                        return Err(self.handler.fatal("xml", "character data before root element".into()));
                    }
                }
                Event::Start(start) => {
                    self.parse_rdf_root(cursor, &start, sink, false)?;
                    break;
                }
                Event::Empty(start) => {
                    self.parse_rdf_root(cursor, &start, sink, true)?;
                    break;
                }
                Event::Eof => return Err(self.handler.fatal("xml", "document contains no root element".into())),
                other => {
                    return Err(self.handler.fatal("xml", format!("unexpected event before root element: {other:?}")))
                }
            }
        }
        sink.finish();
        Ok(())
    }

    fn parse_rdf_root(
        &mut self,
        cursor: &mut Cursor,
        start: &BytesStart<'_>,
        sink: &mut dyn TripleSink,
        is_empty: bool,
    ) -> CimxmlResult<()> {
        let raw_name = raw_name_of(start)?;
        let attrs = collect_attrs(start)?;
        let mut probe = self.ns.top().clone();
        for (p, ns) in &attrs.xmlns_overrides {
            probe.insert(p.clone(), ns.clone());
        }
        let qualified = qualify_with_map(&probe, &raw_name, true).map_err(|e| self.handler.fatal("xml", e.to_string()))?;

        if qualified == namespaces::rdf("RDF") {
            let depth = self.enter_element_scope(&attrs, sink)?;
            if !is_empty {
                loop {
                    match cursor.next().map_err(|e| self.handler.fatal_xml(e))? {
                        Event::Start(child) => {
                            self.parse_node_element(cursor, &child, sink, false)?;
                        }
                        Event::Empty(child) => {
                            self.parse_node_element(cursor, &child, sink, true)?;
                        }
                        Event::Text(t) => {
                            let text = t.unescape().map_err(|e| self.handler.fatal_xml(e))?;
                            if !text.trim().is_empty() {
                                return Err(self.handler.fatal("xml", "unexpected character data in rdf:RDF".into()));
                            }
                        }
                        Event::Comment(_) => continue,
                        Event::End(_) => break,
                        Event::Eof => return Err(self.handler.fatal("xml", "unexpected end of document".into())),
                        other => {
                            return Err(self.handler.fatal("xml", format!("unexpected event in rdf:RDF: {other:?}")))
                        }
                    }
                }
            }
            self.exit_element_scope(depth);
        } else {
            self.parse_node_element(cursor, start, sink, is_empty)?;
        }
        Ok(())
    }

    /// Node-element procedure (§4.I). Returns the subject term so callers
    /// building collections/inner resources can use it as an object.
    fn parse_node_element(
        &mut self,
        cursor: &mut Cursor,
        start: &BytesStart<'_>,
        sink: &mut dyn TripleSink,
        is_empty: bool,
    ) -> CimxmlResult<Term> {
        let raw_name = raw_name_of(start)?;
        let attrs = collect_attrs(start)?;
        let depth = self.enter_element_scope(&attrs, sink)?;
        let type_iri = qualify(&self.ns, &raw_name, true).map_err(|e| self.handler.fatal("xml", e.to_string()))?;

        let mut about = None;
        let mut id = None;
        let mut node_id = None;
        let mut property_attrs: Vec<(String, String)> = Vec::new();
        for (key, value) in &attrs.others {
            if key.starts_with("xml:") {
                continue;
            }
            let resolved = qualify(&self.ns, key, false).map_err(|e| self.handler.fatal("xml", e.to_string()))?;
            if resolved == namespaces::rdf("about") {
                about = Some(value.clone());
            } else if resolved == namespaces::rdf("ID") {
                id = Some(value.clone());
            } else if resolved == namespaces::rdf("nodeID") {
                node_id = Some(value.clone());
            } else if resolved == namespaces::rdf("aboutEach")
                || resolved == namespaces::rdf("aboutEachPrefix")
                || resolved == namespaces::rdf("bagID")
            {
                return Err(self.handler.fatal("xml", format!("obsolete RDF term '{key}' is not supported")));
            } else {
                property_attrs.push((resolved, value.clone()));
            }
        }

        let present = [about.is_some(), id.is_some(), node_id.is_some()]
            .iter()
            .filter(|b| **b)
            .count();
        if present > 1 {
            return Err(self
                .handler
                .fatal("xml", "at most one of rdf:about/rdf:ID/rdf:nodeID may be present".into()));
        }

        let subject = if let Some(about) = &about {
            self.resolve_about_or_resource(about)?
        } else if let Some(id) = &id {
            self.resolve_id(id)?
        } else if let Some(node_id) = &node_id {
            self.terms.blank_labeled(node_id)
        } else {
            self.terms.blank()
        };

        if type_iri != namespaces::rdf("Description") {
            sink.triple(Triple::new(
                subject.clone(),
                Iri::new(namespaces::rdf("type")),
                Term::Iri(Iri::new(type_iri.clone())),
            ));
        }

        let is_full_model = type_iri == namespaces::md("FullModel");
        let is_difference_model = type_iri == namespaces::dm("DifferenceModel");
        if is_full_model {
            sink.enter_full_model();
        } else if is_difference_model {
            sink.enter_difference_model();
        }
        if is_full_model || is_difference_model {
            // Seed the header profile's own property/datatype map (§4.G) so
            // literal typing inside this element (Model.scenarioTime,
            // Model.version, ...) uses it instead of falling through to
            // xml:lang/plain string.
            if let Some(header_props) = self.registry.header_properties_for(self.cim_version) {
                self.active_properties = Some(header_props);
            }
        }

        for (predicate, value) in &property_attrs {
            let object = if *predicate == namespaces::rdf("type") {
                Term::Iri(self.resolve_reference_iri(value)?)
            } else {
                self.literal_term(predicate, value, None)?
            };
            sink.triple(Triple::new(subject.clone(), Iri::new(predicate.clone()), object));
        }

        let collect_profiles = is_full_model || is_difference_model;
        let mut profile_values: Vec<Term> = Vec::new();

        if !is_empty {
            loop {
                match cursor.next().map_err(|e| self.handler.fatal_xml(e))? {
                    Event::Start(child) => {
                        let collector = if collect_profiles { Some(&mut profile_values) } else { None };
                        self.parse_property_element(cursor, &child, sink, &subject, false, collector)?;
                    }
                    Event::Empty(child) => {
                        let collector = if collect_profiles { Some(&mut profile_values) } else { None };
                        self.parse_property_element(cursor, &child, sink, &subject, true, collector)?;
                    }
                    Event::Text(t) => {
                        let text = t.unescape().map_err(|e| self.handler.fatal_xml(e))?;
                        if !text.trim().is_empty() {
                            return Err(self.handler.fatal("xml", "unexpected character data in node element".into()));
                        }
                    }
                    Event::Comment(_) => continue,
                    Event::End(_) => break,
                    Event::Eof => return Err(self.handler.fatal("xml", "unexpected end of document".into())),
                    other => {
                        return Err(self.handler.fatal("xml", format!("unexpected event in node element: {other:?}")))
                    }
                }
            }
        }

        if collect_profiles {
            if !profile_values.is_empty() {
                // Model.profile is typed as an IRI by most producers, but
                // some emit it as a plain literal (§4.I): accept either,
                // converting literals to IRI terms with a warning before
                // the registry lookup.
                let mut version_iris: BTreeSet<Iri> = BTreeSet::new();
                for value in &profile_values {
                    match value {
                        Term::Iri(iri) => {
                            version_iris.insert(iri.clone());
                        }
                        Term::Literal(lit) => {
                            self.handler.warning(
                                "profile",
                                format!("Model.profile '{}' given as a literal; converted to an IRI term for lookup", lit.lexical),
                            );
                            version_iris.insert(Iri::new(lit.lexical.to_string()));
                        }
                        Term::Blank(_) => {
                            self.handler
                                .warning("profile", "Model.profile given as a blank node; ignored".into());
                        }
                    }
                }
                if let Some(map) = self.registry.properties_for(&version_iris) {
                    self.active_properties = Some(map);
                } else {
                    self.handler
                        .warning("profile", "one or more Model.profile IRIs are not registered".into());
                    self.active_properties = None;
                }
            } else {
                self.active_properties = None;
            }
        }

        if is_full_model {
            sink.exit_model_header();
        }

        self.exit_element_scope(depth);
        Ok(subject)
    }

    fn emit_property_triple(
        &mut self,
        sink: &mut dyn TripleSink,
        subject: &Term,
        predicate: &str,
        object: Term,
        reify_id: Option<&str>,
        profile_collector: &mut Option<&mut Vec<Term>>,
    ) -> CimxmlResult<()> {
        if predicate == namespaces::md("Model.profile") {
            if let Some(collector) = profile_collector.as_mut() {
                collector.push(object.clone());
            }
        }
        let triple = Triple::new(subject.clone(), Iri::new(predicate.to_string()), object);
        if let Some(id) = reify_id {
            if !is_valid_ncname(id) {
                return Err(self.handler.fatal("xml", format!("'{id}' is not a valid NCName for rdf:ID")));
            }
            self.track_duplicate_id(id);
            let fragment = format!("#{id}");
            let stmt = Term::Iri(self.resolve_plain(&fragment)?);
            sink.triple(Triple::new(
                stmt.clone(),
                Iri::new(namespaces::rdf("type")),
                Term::Iri(Iri::new(namespaces::rdf("Statement"))),
            ));
            sink.triple(Triple::new(
                stmt.clone(),
                Iri::new(namespaces::rdf("subject")),
                triple.subject.clone(),
            ));
            sink.triple(Triple::new(
                stmt.clone(),
                Iri::new(namespaces::rdf("predicate")),
                Term::Iri(triple.predicate.clone()),
            ));
            sink.triple(Triple::new(stmt, Iri::new(namespaces::rdf("object")), triple.object.clone()));
        }
        sink.triple(triple);
        Ok(())
    }

    /// Property-element procedure (§4.I): enforces the mutual-exclusion
    /// rules between `rdf:resource`/`rdf:nodeID`/`rdf:datatype`/`rdf:parseType`,
    /// then dispatches on whichever is present.
    #[allow(clippy::too_many_arguments)]
    fn parse_property_element(
        &mut self,
        cursor: &mut Cursor,
        start: &BytesStart<'_>,
        sink: &mut dyn TripleSink,
        subject: &Term,
        is_empty: bool,
        mut profile_collector: Option<&mut Vec<Term>>,
    ) -> CimxmlResult<()> {
        let raw_name = raw_name_of(start)?;
        let attrs = collect_attrs(start)?;
        let depth = self.enter_element_scope(&attrs, sink)?;
        let predicate = qualify(&self.ns, &raw_name, true).map_err(|e| self.handler.fatal("xml", e.to_string()))?;

        let mut resource = None;
        let mut node_id = None;
        let mut datatype = None;
        let mut parse_type = None;
        let mut reify_id = None;
        let mut leftover_attrs: Vec<(String, String)> = Vec::new();

        for (key, value) in &attrs.others {
            if key.starts_with("xml:") {
                continue;
            }
            let resolved = qualify(&self.ns, key, false).map_err(|e| self.handler.fatal("xml", e.to_string()))?;
            if resolved == namespaces::rdf("resource") {
                resource = Some(value.clone());
            } else if resolved == namespaces::rdf("nodeID") {
                node_id = Some(value.clone());
            } else if resolved == namespaces::rdf("datatype") {
                datatype = Some(value.clone());
            } else if resolved == namespaces::rdf("parseType") {
                parse_type = Some(value.clone());
            } else if resolved == namespaces::rdf("ID") {
                reify_id = Some(value.clone());
            } else if resolved == namespaces::rdf("aboutEach")
                || resolved == namespaces::rdf("aboutEachPrefix")
                || resolved == namespaces::rdf("bagID")
            {
                return Err(self.handler.fatal("xml", format!("obsolete RDF term '{key}' is not supported")));
            } else {
                leftover_attrs.push((resolved, value.clone()));
            }
        }

        if datatype.is_some() && (parse_type.is_some() || resource.is_some() || node_id.is_some()) {
            return Err(self
                .handler
                .fatal("xml", "rdf:datatype conflicts with rdf:parseType/rdf:resource/rdf:nodeID".into()));
        }
        if resource.is_some() && node_id.is_some() {
            return Err(self.handler.fatal("xml", "rdf:resource conflicts with rdf:nodeID".into()));
        }
        if resource.is_some() && parse_type.is_some() {
            return Err(self.handler.fatal("xml", "rdf:resource conflicts with rdf:parseType".into()));
        }
        if node_id.is_some() && parse_type.is_some() {
            return Err(self.handler.fatal("xml", "rdf:nodeID conflicts with rdf:parseType".into()));
        }

        let container_kind = if predicate == namespaces::dm("forwardDifferences") {
            Some(DifferenceContainer::Forward)
        } else if predicate == namespaces::dm("reverseDifferences") {
            Some(DifferenceContainer::Reverse)
        } else if predicate == namespaces::dm("preconditions") {
            Some(DifferenceContainer::Preconditions)
        } else {
            None
        };

        if let Some(pt) = parse_type.as_deref() {
            let normalized = if pt == "Resource" || pt == "Literal" || pt == "Collection" || pt == "Statements" {
                pt
            } else if pt == "literal" {
                if !self.config.lenient_lowercase_parse_type {
                    return Err(self
                        .handler
                        .fatal("parse-type", "lower-case rdf:parseType=\"literal\" rejected in strict mode".into()));
                }
                self.handler
                    .warning("parse-type", "rdf:parseType=\"literal\" accepted as \"Literal\"".into());
                "Literal"
            } else {
                return Err(self.handler.fatal("parse-type", format!("unknown rdf:parseType '{pt}'")));
            };

            match normalized {
                "Statements" => {
                    if let Some(container) = container_kind {
                        sink.enter_difference_container(container);
                        self.parse_statements_container(cursor, sink, is_empty)?;
                        sink.exit_difference_container();
                    } else {
                        self.handler.warning(
                            "parse-type",
                            "rdf:parseType=\"Statements\" used outside a CIMXML difference container; treated as Literal"
                                .into(),
                        );
                        let xml_literal = self.parse_literal_content(cursor, is_empty)?;
                        let object = Term::Literal(Literal::with_datatype(xml_literal, Iri::new(namespaces::rdf("XMLLiteral"))));
                        self.emit_property_triple(sink, subject, &predicate, object, reify_id.as_deref(), &mut profile_collector)?;
                    }
                    self.exit_element_scope(depth);
                    return Ok(());
                }
                "Resource" => {
                    let inner = self.terms.blank();
                    if !is_empty {
                        self.parse_property_children_into(cursor, sink, &inner)?;
                    }
                    self.emit_property_triple(sink, subject, &predicate, inner, reify_id.as_deref(), &mut profile_collector)?;
                    self.exit_element_scope(depth);
                    return Ok(());
                }
                "Literal" => {
                    let xml_literal = self.parse_literal_content(cursor, is_empty)?;
                    let object = Term::Literal(Literal::with_datatype(xml_literal, Iri::new(namespaces::rdf("XMLLiteral"))));
                    self.emit_property_triple(sink, subject, &predicate, object, reify_id.as_deref(), &mut profile_collector)?;
                    self.exit_element_scope(depth);
                    return Ok(());
                }
                "Collection" => {
                    let head = if is_empty {
                        Term::Iri(Iri::new(namespaces::rdf("nil")))
                    } else {
                        self.parse_collection(cursor, sink)?
                    };
                    self.emit_property_triple(sink, subject, &predicate, head, reify_id.as_deref(), &mut profile_collector)?;
                    self.exit_element_scope(depth);
                    return Ok(());
                }
                _ => unreachable!("normalized parseType is one of the four handled above"),
            }
        }

        if resource.is_some() || node_id.is_some() {
            let object = if let Some(res) = &resource {
                self.resolve_about_or_resource(res)?
            } else {
                self.terms.blank_labeled(node_id.as_deref().unwrap())
            };
            for (pred, val) in &leftover_attrs {
                let attr_object = self.literal_term(pred, val, None)?;
                sink.triple(Triple::new(object.clone(), Iri::new(pred.clone()), attr_object));
            }
            self.emit_property_triple(sink, subject, &predicate, object, reify_id.as_deref(), &mut profile_collector)?;
            self.exit_element_scope(depth);
            if !is_empty {
                self.consume_to_end(cursor)?;
            }
            return Ok(());
        }

        let mut child_subject: Option<Term> = None;
        let mut text_content = String::new();
        let mut saw_child = false;
        let mut saw_significant_text = false;

        if !is_empty {
            loop {
                match cursor.next().map_err(|e| self.handler.fatal_xml(e))? {
                    Event::Start(child) => {
                        if saw_child {
                            return Err(self
                                .handler
                                .fatal("xml", "a property element may have at most one child node element".into()));
                        }
                        saw_child = true;
                        child_subject = Some(self.parse_node_element(cursor, &child, sink, false)?);
                    }
                    Event::Empty(child) => {
                        if saw_child {
                            return Err(self
                                .handler
                                .fatal("xml", "a property element may have at most one child node element".into()));
                        }
                        saw_child = true;
                        child_subject = Some(self.parse_node_element(cursor, &child, sink, true)?);
                    }
                    Event::Text(t) => {
                        let text = t.unescape().map_err(|e| self.handler.fatal_xml(e))?;
                        if !text.trim().is_empty() {
                            saw_significant_text = true;
                        }
                        text_content.push_str(&text);
                    }
                    Event::CData(t) => {
                        let text = std::str::from_utf8(t.as_ref()).map_err(|e| self.handler.fatal("xml", e.to_string()))?;
                        saw_significant_text = true;
                        text_content.push_str(text);
                    }
                    Event::Comment(_) => continue,
                    Event::End(_) => break,
                    Event::Eof => return Err(self.handler.fatal("xml", "unexpected end of document".into())),
                    other => {
                        return Err(self.handler.fatal("xml", format!("unexpected event in property element: {other:?}")))
                    }
                }
            }
        }

        if saw_child && saw_significant_text {
            return Err(self
                .handler
                .fatal("xml", "a property element cannot mix a child node element with text content".into()));
        }

        let object = if let Some(child_subject) = child_subject {
            if !leftover_attrs.is_empty() {
                return Err(self
                    .handler
                    .fatal("xml", "a property element with a child node element cannot also carry property attributes".into()));
            }
            child_subject
        } else if !leftover_attrs.is_empty() {
            let inner = self.terms.blank();
            for (pred, val) in &leftover_attrs {
                let attr_object = self.literal_term(pred, val, None)?;
                sink.triple(Triple::new(inner.clone(), Iri::new(pred.clone()), attr_object));
            }
            inner
        } else if let Some(dt) = datatype.as_deref() {
            let dt_iri = self.resolve_plain(dt)?;
            Term::Literal(Literal::with_datatype(text_content, dt_iri))
        } else {
            self.literal_term(&predicate, &text_content, None)?
        };

        self.emit_property_triple(sink, subject, &predicate, object, reify_id.as_deref(), &mut profile_collector)?;
        self.exit_element_scope(depth);
        Ok(())
    }

    fn consume_to_end(&mut self, cursor: &mut Cursor) -> CimxmlResult<()> {
        loop {
            match cursor.next().map_err(|e| self.handler.fatal_xml(e))? {
                Event::End(_) => return Ok(()),
                Event::Text(t) => {
                    let text = t.unescape().map_err(|e| self.handler.fatal_xml(e))?;
                    if !text.trim().is_empty() {
                        return Err(self
                            .handler
                            .fatal("xml", "unexpected text content alongside rdf:resource/rdf:nodeID".into()));
                    }
                }
                Event::Comment(_) => continue,
                Event::Eof => return Err(self.handler.fatal("xml", "unexpected end of document".into())),
                _ => {
                    return Err(self
                        .handler
                        .fatal("xml", "unexpected child content alongside rdf:resource/rdf:nodeID".into()))
                }
            }
        }
    }

    fn parse_property_children_into(&mut self, cursor: &mut Cursor, sink: &mut dyn TripleSink, inner: &Term) -> CimxmlResult<()> {
        loop {
            match cursor.next().map_err(|e| self.handler.fatal_xml(e))? {
                Event::Start(child) => {
                    self.parse_property_element(cursor, &child, sink, inner, false, None)?;
                }
                Event::Empty(child) => {
                    self.parse_property_element(cursor, &child, sink, inner, true, None)?;
                }
                Event::Text(t) => {
                    let text = t.unescape().map_err(|e| self.handler.fatal_xml(e))?;
                    if !text.trim().is_empty() {
                        return Err(self.handler.fatal("xml", "unexpected character data in parseType=\"Resource\"".into()));
                    }
                }
                Event::Comment(_) => continue,
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(self.handler.fatal("xml", "unexpected end of document".into())),
                other => {
                    return Err(self
                        .handler
                        .fatal("xml", format!("unexpected event in parseType=\"Resource\": {other:?}")))
                }
            }
        }
    }

    fn parse_collection(&mut self, cursor: &mut Cursor, sink: &mut dyn TripleSink) -> CimxmlResult<Term> {
        let mut items = Vec::new();
        loop {
            match cursor.next().map_err(|e| self.handler.fatal_xml(e))? {
                Event::Start(child) => {
                    items.push(self.parse_node_element(cursor, &child, sink, false)?);
                }
                Event::Empty(child) => {
                    items.push(self.parse_node_element(cursor, &child, sink, true)?);
                }
                Event::Text(t) => {
                    let text = t.unescape().map_err(|e| self.handler.fatal_xml(e))?;
                    if !text.trim().is_empty() {
                        return Err(self.handler.fatal("xml", "unexpected character data in parseType=\"Collection\"".into()));
                    }
                }
                Event::Comment(_) => continue,
                Event::End(_) => break,
                Event::Eof => return Err(self.handler.fatal("xml", "unexpected end of document".into())),
                other => {
                    return Err(self
                        .handler
                        .fatal("xml", format!("unexpected event in parseType=\"Collection\": {other:?}")))
                }
            }
        }
        if items.is_empty() {
            return Ok(Term::Iri(Iri::new(namespaces::rdf("nil"))));
        }
        let cells: Vec<Term> = (0..items.len()).map(|_| self.terms.blank()).collect();
        for (i, item) in items.into_iter().enumerate() {
            sink.triple(Triple::new(cells[i].clone(), Iri::new(namespaces::rdf("first")), item));
            let rest = if i + 1 < cells.len() {
                cells[i + 1].clone()
            } else {
                Term::Iri(Iri::new(namespaces::rdf("nil")))
            };
            sink.triple(Triple::new(cells[i].clone(), Iri::new(namespaces::rdf("rest")), rest));
        }
        Ok(cells[0].clone())
    }

    fn parse_statements_container(&mut self, cursor: &mut Cursor, sink: &mut dyn TripleSink, is_empty: bool) -> CimxmlResult<()> {
        if is_empty {
            return Ok(());
        }
        loop {
            match cursor.next().map_err(|e| self.handler.fatal_xml(e))? {
                Event::Start(child) => {
                    self.parse_node_element(cursor, &child, sink, false)?;
                }
                Event::Empty(child) => {
                    self.parse_node_element(cursor, &child, sink, true)?;
                }
                Event::Text(t) => {
                    let text = t.unescape().map_err(|e| self.handler.fatal_xml(e))?;
                    if !text.trim().is_empty() {
                        return Err(self.handler.fatal("xml", "unexpected character data in parseType=\"Statements\"".into()));
                    }
                }
                Event::Comment(_) => continue,
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(self.handler.fatal("xml", "unexpected end of document".into())),
                other => {
                    return Err(self
                        .handler
                        .fatal("xml", format!("unexpected event in parseType=\"Statements\": {other:?}")))
                }
            }
        }
    }

    /// `parseType="Literal"` accumulator: re-serializes the enclosed XML with
    /// attributes sorted alphabetically. A simplified canonical form — it
    /// emits the full currently in-scope prefix set rather than placing
    /// namespace declarations at first use, and drops comments.
    fn parse_literal_content(&mut self, cursor: &mut Cursor, is_empty: bool) -> CimxmlResult<String> {
        if is_empty {
            return Ok(String::new());
        }
        let mut depth = 1usize;
        let mut out = String::new();
        loop {
            match cursor.next().map_err(|e| self.handler.fatal_xml(e))? {
                Event::Start(el) => {
                    depth += 1;
                    out.push_str(&render_open_tag(&el, false)?);
                }
                Event::Empty(el) => {
                    out.push_str(&render_open_tag(&el, true)?);
                }
                Event::End(el) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(out);
                    }
                    out.push_str("</");
                    out.push_str(std::str::from_utf8(el.name().as_ref()).unwrap_or(""));
                    out.push('>');
                }
                Event::Text(t) => {
                    let text = t.unescape().map_err(|e| self.handler.fatal_xml(e))?;
                    out.push_str(&escape_xml_text(&text));
                }
                Event::CData(t) => {
                    out.push_str(std::str::from_utf8(t.as_ref()).unwrap_or(""));
                }
                Event::Comment(_) => continue,
                Event::Eof => return Err(self.handler.fatal("xml", "unexpected end of document in parseType=\"Literal\"".into())),
                _ => continue,
            }
        }
    }
}

fn render_open_tag(el: &BytesStart<'_>, self_closing: bool) -> CimxmlResult<String> {
    let name = std::str::from_utf8(el.name().as_ref())
        .map_err(|e| CimxmlError::MalformedInput(format!("non-UTF8 element name: {e}")))?;
    let mut attr_strs: Vec<String> = Vec::new();
    for attr in el.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref()).unwrap_or("").to_string();
        let value = attr.unescape_value().map(|v| v.into_owned()).unwrap_or_default();
        attr_strs.push(format!("{key}=\"{}\"", escape_xml_attr(&value)));
    }
    attr_strs.sort();
    let mut out = String::new();
    out.push('<');
    out.push_str(name);
    for a in &attr_strs {
        out.push(' ');
        out.push_str(a);
    }
    if self_closing {
        out.push_str("></");
        out.push_str(name);
        out.push('>');
    } else {
        out.push('>');
    }
    Ok(out)
}

/// Parse a CIM model document into a freshly populated [`CimDataset`] (§6).
pub fn parse_cim_model(source: &str, ctx: &ParseContext) -> CimxmlResult<(CimDataset, Diagnostics)> {
    let mut parser = Parser::new(ctx);
    let mut sink = CimxmlSink::new();
    let mut cursor = Cursor::new(source);
    parser.parse_document(&mut cursor, &mut sink)?;
    let diagnostics = parser.handler.diagnostics().clone();
    Ok((sink.into_dataset(), diagnostics))
}

/// Parse a profile ontology document and register it (§6).
pub fn parse_and_register_cim_profile(source: &str, registry: &ProfileRegistry) -> CimxmlResult<(CimProfile, Diagnostics)> {
    let ctx = ParseContext::new(registry);
    let mut parser = Parser::new(&ctx);
    let mut sink = GraphSink::new();
    let mut cursor = Cursor::new(source);
    parser.parse_document(&mut cursor, &mut sink)?;
    let profile = registry.register(&sink.graph)?;
    let diagnostics = parser.handler.diagnostics().clone();
    Ok((profile, diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cimxml_model::graph::{Graph, TriplePattern};

    fn registry() -> ProfileRegistry {
        ProfileRegistry::new()
    }

    #[test]
    fn full_model_header_is_captured_with_supersedes_and_profiles() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:md="http://iec.ch/TC57/61970-552/ModelDescription/1#"
         xmlns:cim="http://iec.ch/TC57/CIM100#">
  <md:FullModel rdf:about="urn:uuid:08984e27-811f-4042-9125-1531ae0de0f6">
    <md:Model.Supersedes rdf:resource="urn:uuid:f086bea4-3428-4e49-8214-752fdeb1e2e4"/>
    <md:Model.DependentOn rdf:resource="urn:uuid:fa274c8c-a346-4080-ba5a-8a4eaa9083f9"/>
    <md:Model.profile>http://iec.ch/TC57/ns/CIM/CoreEquipment-EU/3.0</md:Model.profile>
    <md:Model.profile>http://iec.ch/TC57/ns/CIM/MyCIMProfile/3.0</md:Model.profile>
  </md:FullModel>
</rdf:RDF>"#;
        let registry = registry();
        let ctx = ParseContext::new(&registry);
        let (dataset, _diag) = parse_cim_model(xml, &ctx).unwrap();

        assert!(dataset.is_full_model());
        let header = dataset.get_full_model().unwrap();
        let header = header.read().unwrap();

        let typed = header.find(&TriplePattern {
            subject: None,
            predicate: Some(Iri::new(namespaces::rdf("type"))),
            object: Some(Term::Iri(Iri::new(namespaces::md("FullModel")))),
        });
        assert_eq!(typed.len(), 1);
        assert_eq!(typed[0].subject, Term::iri("urn:uuid:08984e27-811f-4042-9125-1531ae0de0f6"));

        let supersedes = header.find(&TriplePattern {
            subject: None,
            predicate: Some(Iri::new(namespaces::md("Model.Supersedes"))),
            object: None,
        });
        assert_eq!(supersedes.len(), 1);

        let dependent_on = header.find(&TriplePattern {
            subject: None,
            predicate: Some(Iri::new(namespaces::md("Model.DependentOn"))),
            object: None,
        });
        assert_eq!(dependent_on.len(), 1);

        let profiles = header.find(&TriplePattern {
            subject: None,
            predicate: Some(Iri::new(namespaces::md("Model.profile"))),
            object: None,
        });
        assert_eq!(profiles.len(), 2);
    }

    #[test]
    fn uuid_attributes_are_normalized_to_urn_uuid() {
        let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:cim="http://iec.ch/TC57/CIM100#">
  <cim:MyEquipment rdf:ID="_f67fc354-9e39-4191-a456-67537399bc48">
    <cim:MyEquipment.ref rdf:resource="#_d597b77b-c8c4-4d88-883e-f516eedb913b"/>
  </cim:MyEquipment>
</rdf:RDF>"#;
        let registry = registry();
        let ctx = ParseContext::new(&registry);
        let (dataset, _diag) = parse_cim_model(xml, &ctx).unwrap();
        let body = dataset.get_body();
        let body = body.read().unwrap();

        let subject = Term::iri("urn:uuid:f67fc354-9e39-4191-a456-67537399bc48");
        assert!(body.contains(&Triple::new(
            subject.clone(),
            Iri::new(namespaces::rdf("type")),
            Term::Iri(Iri::new(namespaces::CIM_17_NS.to_string() + "MyEquipment")),
        )));
        let refs = body.find(&TriplePattern {
            subject: Some(subject),
            predicate: Some(Iri::new(format!("{}MyEquipment.ref", namespaces::CIM_17_NS))),
            object: None,
        });
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].object, Term::iri("urn:uuid:d597b77b-c8c4-4d88-883e-f516eedb913b"));
    }

    #[test]
    fn profile_aware_literal_typing_produces_a_float_literal() {
        let profile_xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:owl="http://www.w3.org/2002/07/owl#"
         xmlns:dcat="http://www.w3.org/ns/dcat#"
         xmlns:cims="http://iec.ch/TC57/1999/rdf-schema-extensions-19990926#"
         xmlns:cim="urn:cim:">
  <rdf:Description rdf:about="urn:profile">
    <rdf:type rdf:resource="http://www.w3.org/2002/07/owl#Ontology"/>
    <dcat:keyword>MyCIMProfile</dcat:keyword>
    <owl:versionIRI rdf:resource="urn:v1"/>
  </rdf:Description>
  <rdf:Description rdf:about="urn:cim:ClassA.floatProperty">
    <rdfs:domain rdf:resource="urn:cim:ClassA"/>
    <cims:dataType rdf:resource="urn:cim:PrimType"/>
  </rdf:Description>
  <rdf:Description rdf:about="urn:cim:PrimType">
    <cims:stereotype>Primitive</cims:stereotype>
    <rdfs:label>Float</rdfs:label>
  </rdf:Description>
</rdf:RDF>"#;
        let registry = registry();
        let (_profile, _diag) = parse_and_register_cim_profile(profile_xml, &registry).unwrap();

        let model_xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:md="http://iec.ch/TC57/61970-552/ModelDescription/1#"
         xmlns:cim="urn:cim:">
  <md:FullModel rdf:about="urn:uuid:0e3d0e2a-0000-0000-0000-000000000000">
    <md:Model.profile>urn:v1</md:Model.profile>
  </md:FullModel>
  <rdf:Description rdf:about="urn:inst">
    <cim:ClassA.floatProperty>47.11</cim:ClassA.floatProperty>
  </rdf:Description>
</rdf:RDF>"#;
        let ctx = ParseContext::new(&registry);
        let (dataset, _diag) = parse_cim_model(model_xml, &ctx).unwrap();
        let body = dataset.get_body();
        let body = body.read().unwrap();

        let found = body.find(&TriplePattern {
            subject: Some(Term::iri("urn:inst")),
            predicate: Some(Iri::new("urn:cim:ClassA.floatProperty")),
            object: None,
        });
        let typed_literal = found
            .iter()
            .find(|t| matches!(&t.object, Term::Literal(lit) if lit.datatype().is_some()))
            .expect("a typed float literal");
        if let Term::Literal(lit) = &typed_literal.object {
            assert_eq!(lit.lexical.as_ref(), "47.11");
            assert_eq!(lit.datatype().unwrap().as_str(), namespaces::xsd("float"));
        }
    }

    #[test]
    fn difference_containers_inherit_the_headers_prefixes() {
        let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:md="http://iec.ch/TC57/61970-552/ModelDescription/1#"
         xmlns:dm="http://iec.ch/TC57/61970-552/DifferenceModel/1#"
         xmlns:cim="http://iec.ch/TC57/CIM100#">
  <dm:DifferenceModel rdf:about="urn:uuid:1e3d0e2a-0000-0000-0000-000000000000">
    <dm:forwardDifferences rdf:parseType="Statements"/>
    <dm:reverseDifferences rdf:parseType="Statements"/>
    <dm:preconditions rdf:parseType="Statements"/>
  </dm:DifferenceModel>
</rdf:RDF>"#;
        let registry = registry();
        let ctx = ParseContext::new(&registry);
        let (dataset, _diag) = parse_cim_model(xml, &ctx).unwrap();

        assert!(dataset.is_difference_model());
        let header = dataset.get_difference_model().unwrap();
        let forward = dataset.get_forward_differences().unwrap();
        let reverse = dataset.get_reverse_differences().unwrap();
        let preconditions = dataset.get_preconditions().unwrap();

        for graph in [&header, &forward, &reverse, &preconditions] {
            let g = graph.read().unwrap();
            assert_eq!(g.prefixes().namespace("cim"), Some(namespaces::CIM_17_NS));
            assert_eq!(g.prefixes().namespace("dm"), Some(namespaces::DM));
        }
    }
}
