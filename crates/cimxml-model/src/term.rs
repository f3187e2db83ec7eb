//! RDF terms: IRIs, blank nodes, and literals (§3 Data Model, §4.A).

use std::fmt;
use std::sync::Arc;

/// An absolute IRI. Equal for equal normalized input; cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Iri(Arc<str>);

impl Iri {
    pub fn new(value: impl Into<Arc<str>>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Iri::new(s)
    }
}

impl From<String> for Iri {
    fn from(s: String) -> Self {
        Iri::new(s)
    }
}

/// A blank node, stable within one document by its dense interned id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlankNode(pub u64);

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:b{}", self.0)
    }
}

/// The lexical content of a literal plus its language/datatype annotation.
///
/// `xsd:string` literals are represented as [`LiteralKind::Typed`] with that
/// datatype so they stay distinguishable from untyped plain literals, per
/// §3: "Literals of datatype `xsd:string` are distinguished from
/// language-tagged literals."
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LiteralKind {
    Plain,
    Lang(Arc<str>),
    Typed(Iri),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    pub lexical: Arc<str>,
    pub kind: LiteralKind,
}

impl Literal {
    pub fn plain(lexical: impl Into<Arc<str>>) -> Self {
        Self {
            lexical: lexical.into(),
            kind: LiteralKind::Plain,
        }
    }

    pub fn with_lang(lexical: impl Into<Arc<str>>, lang: impl Into<Arc<str>>) -> Self {
        Self {
            lexical: lexical.into(),
            kind: LiteralKind::Lang(lang.into()),
        }
    }

    pub fn with_datatype(lexical: impl Into<Arc<str>>, datatype: Iri) -> Self {
        Self {
            lexical: lexical.into(),
            kind: LiteralKind::Typed(datatype),
        }
    }

    pub fn datatype(&self) -> Option<&Iri> {
        match &self.kind {
            LiteralKind::Typed(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn language(&self) -> Option<&str> {
        match &self.kind {
            LiteralKind::Lang(tag) => Some(tag),
            _ => None,
        }
    }
}

/// A term is anything that may occupy a triple position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    Iri(Iri),
    Blank(BlankNode),
    Literal(Literal),
}

impl Term {
    pub fn iri(value: impl Into<Arc<str>>) -> Self {
        Term::Iri(Iri::new(value))
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(i) => Some(i),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(i) => write!(f, "<{i}>"),
            Term::Blank(b) => write!(f, "{b}"),
            Term::Literal(l) => match &l.kind {
                LiteralKind::Plain => write!(f, "\"{}\"", l.lexical),
                LiteralKind::Lang(tag) => write!(f, "\"{}\"@{}", l.lexical, tag),
                LiteralKind::Typed(dt) => write!(f, "\"{}\"^^<{}>", l.lexical, dt),
            },
        }
    }
}

/// A (subject, predicate, object) triple. Subject is IRI or blank;
/// predicate is always an IRI; object is any term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Iri,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: Iri, object: Term) -> Self {
        debug_assert!(
            subject.is_iri() || subject.is_blank(),
            "triple subject must be an IRI or blank node"
        );
        Self {
            subject,
            predicate,
            object,
        }
    }
}
