//! VF-006: Pass controller: fixed-point approximation over the whole document.
//!
//! Each pass is a generative sweep followed by a reference sweep. The
//! reference sweep looks values up in the output of the generative sweep,
//! so `{{ref:...}}` sees freshly generated secrets from the same pass.
//! A resolved reference copies its target's text, which may itself be a
//! reference, so each pass doubles how far along a chain a link points.
//! Chains longer than `2^PASS_COUNT` links stay partially unresolved.

use super::matcher::resolve_placeholders;
use super::resolver::{EnvSource, ProcessEnv, Resolver};
use super::types::*;
use indexmap::IndexSet;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde_json::{Map, Value};

/// Output of a full run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub document: Value,
    /// Warnings raised by the final pass, de-duplicated, in document order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Drives resolution over whole documents.
pub struct Engine<E, R> {
    resolver: Resolver<E, R>,
}

impl Engine<ProcessEnv, OsRng> {
    /// Engine backed by the process environment and the OS RNG.
    pub fn from_process() -> Self {
        Self::new(ProcessEnv, OsRng)
    }
}

impl<E: EnvSource, R: RngCore + CryptoRng> Engine<E, R> {
    pub fn new(env: E, rng: R) -> Self {
        Self {
            resolver: Resolver::new(env, rng),
        }
    }

    /// Run `PASS_COUNT` passes over `document`.
    pub fn run(&mut self, document: Value) -> Report {
        let mut current = document;
        let mut diagnostics = IndexSet::new();

        for pass in 1..=PASS_COUNT {
            diagnostics.clear();
            let generated = self.sweep(&current, Mode::Generative, &current, &mut diagnostics);
            current = self.sweep(&generated, Mode::Reference, &generated, &mut diagnostics);
            tracing::debug!(pass, warnings = diagnostics.len(), "pass complete");
        }

        Report {
            document: current,
            diagnostics: diagnostics.into_iter().collect(),
        }
    }

    /// Rebuild `node` with every string key and value run through the matcher.
    fn sweep(
        &mut self,
        node: &Value,
        mode: Mode,
        root: &Value,
        diagnostics: &mut IndexSet<Diagnostic>,
    ) -> Value {
        match node {
            Value::String(s) => Value::String(self.substitute(s, mode, root, diagnostics)),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.sweep(item, mode, root, diagnostics))
                    .collect(),
            ),
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (key, value) in map {
                    let key = self.substitute(key, mode, root, diagnostics);
                    let value = self.sweep(value, mode, root, diagnostics);
                    out.insert(key, value);
                }
                Value::Object(out)
            }
            scalar => scalar.clone(),
        }
    }

    fn substitute(
        &mut self,
        s: &str,
        mode: Mode,
        root: &Value,
        diagnostics: &mut IndexSet<Diagnostic>,
    ) -> String {
        let substitution = resolve_placeholders(s, mode, &mut self.resolver, root);
        diagnostics.extend(substitution.diagnostics);
        substitution.text
    }
}

/// Resolve all placeholders in `document` using the process environment and
/// the OS RNG. Warnings are logged.
pub fn process(document: Value) -> Value {
    let report = Engine::from_process().run(document);
    emit_diagnostics(&report.diagnostics);
    report.document
}

/// Log each diagnostic as a warning.
pub fn emit_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        tracing::warn!("{}", diagnostic);
    }
}
