//! VF-002: Placeholder resolution.
//!
//! Resolves `{{alnum:N}}`, `{{alpha:N}}`, `{{digit:N}}`, `{{b64:N}}`,
//! `{{env:NAME}}` (generative mode) and `{{ref:PATH}}` (reference mode).
//! Every failure is soft: the placeholder stays as written and a
//! diagnostic is returned alongside.

use super::generate;
use super::path;
use super::types::*;
use rand::{CryptoRng, RngCore};
use serde_json::Value;
use std::collections::HashMap;

/// Source of environment variables for `{{env:NAME}}`.
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|v| v.to_string_lossy().into_owned())
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Resolves single placeholders against an environment and an RNG.
pub struct Resolver<E, R> {
    env: E,
    rng: R,
}

impl<E: EnvSource, R: RngCore + CryptoRng> Resolver<E, R> {
    pub fn new(env: E, rng: R) -> Self {
        Self { env, rng }
    }

    /// Resolve one placeholder. Kinds that belong to the other mode are left
    /// unmodified without a diagnostic.
    pub fn resolve(
        &mut self,
        placeholder: &Placeholder<'_>,
        mode: Mode,
        root: &Value,
    ) -> (Resolution, Option<Diagnostic>) {
        let Some(kind) = Kind::parse(placeholder.kind) else {
            // Classified once, by the generative sweep.
            let diagnostic = (mode == Mode::Generative).then(|| {
                Diagnostic::new(
                    DiagnosticKind::UnknownKind(placeholder.kind.to_string()),
                    placeholder.raw,
                )
            });
            return (Resolution::Unmodified, diagnostic);
        };

        if kind.mode() != mode {
            return (Resolution::Unmodified, None);
        }

        let result = match kind {
            Kind::Alnum => self.random_string(ALNUM, placeholder.argument),
            Kind::Alpha => self.random_string(ALPHA, placeholder.argument),
            Kind::Digit => self.random_string(DIGIT, placeholder.argument),
            Kind::B64 => generate::parse_length(placeholder.argument)
                .map(|n| generate::random_base64(&mut self.rng, n))
                .map_err(DiagnosticKind::InvalidLength),
            Kind::Env => Ok(self.env.var(placeholder.argument).unwrap_or_default()),
            Kind::Ref => resolve_reference(placeholder.argument, root),
        };

        match result {
            Ok(value) => (Resolution::Value(value), None),
            Err(kind) => (
                Resolution::Unmodified,
                Some(Diagnostic::new(kind, placeholder.raw)),
            ),
        }
    }

    fn random_string(
        &mut self,
        charset: &[u8],
        argument: &str,
    ) -> Result<String, DiagnosticKind> {
        generate::parse_length(argument)
            .map(|n| generate::random_string(&mut self.rng, charset, n))
            .map_err(DiagnosticKind::InvalidLength)
    }
}

/// Look up a string value in `root` by a `ref` argument.
pub fn resolve_reference(argument: &str, root: &Value) -> Result<String, DiagnosticKind> {
    let path =
        path::parse_path(argument).map_err(|e| DiagnosticKind::InvalidPath(e.to_string()))?;
    match path::lookup(root, &path).map_err(|e| DiagnosticKind::Traversal(e.to_string()))? {
        Value::String(s) => Ok(s.clone()),
        other => Err(DiagnosticKind::NotAString(node_type(other))),
    }
}
