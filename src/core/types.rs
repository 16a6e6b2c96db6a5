//! VF-001: Core types: placeholder kinds, resolution modes, paths, diagnostics.
//!
//! Documents are plain `serde_json::Value` trees (built with `preserve_order`
//! so object members keep insertion order). Everything here is a small value
//! type; the logic lives in matcher, resolver, path, and engine.

use std::fmt;

/// Number of generative+reference sweeps applied to a document.
pub const PASS_COUNT: usize = 5;

/// Upper bound on a generated length or byte count.
pub const MAX_GENERATED_LEN: usize = 1 << 20;

// ============================================================================
// Character sets
// ============================================================================

pub const ALPHA: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGIT: &[u8] = b"0123456789";
pub const ALNUM: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

// ============================================================================
// Kinds and modes
// ============================================================================

/// Placeholder kind, the identifier before the colon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Alnum,
    Alpha,
    Digit,
    B64,
    Env,
    Ref,
}

impl Kind {
    /// Every kind, in the order they are listed to users.
    pub const ALL: [Kind; 6] = [
        Kind::Alnum,
        Kind::Alpha,
        Kind::Digit,
        Kind::B64,
        Kind::Env,
        Kind::Ref,
    ];

    /// Parse a kind name. `digits` is accepted as an alias of `digit`.
    pub fn parse(name: &str) -> Option<Kind> {
        match name {
            "alnum" => Some(Kind::Alnum),
            "alpha" => Some(Kind::Alpha),
            "digit" | "digits" => Some(Kind::Digit),
            "b64" => Some(Kind::B64),
            "env" => Some(Kind::Env),
            "ref" => Some(Kind::Ref),
            _ => None,
        }
    }

    /// The sub-pass in which this kind is resolved.
    pub fn mode(self) -> Mode {
        match self {
            Kind::Ref => Mode::Reference,
            _ => Mode::Generative,
        }
    }

    /// Comma-separated list of valid kind names, for diagnostics.
    pub fn valid_names() -> String {
        Kind::ALL
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Alnum => write!(f, "alnum"),
            Kind::Alpha => write!(f, "alpha"),
            Kind::Digit => write!(f, "digit"),
            Kind::B64 => write!(f, "b64"),
            Kind::Env => write!(f, "env"),
            Kind::Ref => write!(f, "ref"),
        }
    }
}

/// Which family of placeholders a sweep resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Generative,
    Reference,
}

// ============================================================================
// Placeholders and resolutions
// ============================================================================

/// One `{{kind:argument}}` occurrence inside a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub kind: &'a str,
    pub argument: &'a str,
    /// Original matched text, braces included.
    pub raw: &'a str,
}

/// Outcome of resolving a single placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Value(String),
    Unmodified,
}

// ============================================================================
// JSON paths
// ============================================================================

/// One step of a reference path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathComponent {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathComponent::Key(k) => write!(f, "'{}'", k),
            PathComponent::Index(i) => write!(f, "{}", i),
        }
    }
}

/// Ordered key/index components, e.g. `'servers',0,'password'`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JsonPath(pub Vec<PathComponent>);

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Why a placeholder was left unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Kind name is not recognized.
    UnknownKind(String),
    /// Looks like `{{...}}` but does not match `{{kind:argument}}`.
    Malformed,
    /// Length/byte-count argument is not a usable non-negative integer.
    InvalidLength(String),
    /// `ref` argument is not a valid path.
    InvalidPath(String),
    /// Path does not lead anywhere in the document.
    Traversal(String),
    /// Path leads to a node that is not a string.
    NotAString(&'static str),
}

/// A warning attached to the raw placeholder text that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub raw: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::UnknownKind(kind) => write!(
                f,
                "unknown template type '{}' in {}, supported types are {}; leaving it unmodified",
                kind,
                self.raw,
                Kind::valid_names()
            ),
            DiagnosticKind::Malformed => write!(
                f,
                "found template string {} but it does not match {{{{kind:argument}}}}; leaving it unmodified",
                self.raw
            ),
            DiagnosticKind::InvalidLength(reason) => {
                write!(f, "invalid length in {}: {}; leaving it unmodified", self.raw, reason)
            }
            DiagnosticKind::InvalidPath(reason) => {
                write!(f, "invalid path in {}: {}; leaving it unmodified", self.raw, reason)
            }
            DiagnosticKind::Traversal(reason) => {
                write!(f, "cannot resolve {}: {}; leaving it unmodified", self.raw, reason)
            }
            DiagnosticKind::NotAString(found) => write!(
                f,
                "cannot resolve {}: target is {}, expected a string; leaving it unmodified",
                self.raw, found
            ),
        }
    }
}

/// Human-readable name of a JSON node type.
pub fn node_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
