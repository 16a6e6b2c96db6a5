//! VF-005: Placeholder matching and in-place substitution within one string.

use super::resolver::Resolver;
use super::types::*;
use rand::{CryptoRng, RngCore};
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

/// Strict placeholder grammar: `{{kind:argument}}`.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+):([^}]+)\}\}").expect("valid placeholder regex"));

/// Anything that looks like a template, used only to warn about typos.
static LOOSE_TEMPLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{.*\}\}").expect("valid template regex"));

/// Result of substituting placeholders in one string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Replace every placeholder of `mode` in `input`. Unresolvable placeholders
/// keep their original text.
pub fn resolve_placeholders<E, R>(
    input: &str,
    mode: Mode,
    resolver: &mut Resolver<E, R>,
    root: &Value,
) -> Substitution
where
    E: super::resolver::EnvSource,
    R: RngCore + CryptoRng,
{
    let mut diagnostics = Vec::new();

    if !PLACEHOLDER.is_match(input) {
        if mode == Mode::Generative && LOOSE_TEMPLATE.is_match(input) {
            diagnostics.push(Diagnostic::new(DiagnosticKind::Malformed, input));
        }
        return Substitution {
            text: input.to_string(),
            diagnostics,
        };
    }

    let text = PLACEHOLDER.replace_all(input, |caps: &Captures<'_>| {
        let placeholder = Placeholder {
            kind: caps.get(1).map_or("", |m| m.as_str()),
            argument: caps.get(2).map_or("", |m| m.as_str()),
            raw: caps.get(0).map_or("", |m| m.as_str()),
        };
        let (resolution, diagnostic) = resolver.resolve(&placeholder, mode, root);
        diagnostics.extend(diagnostic);
        match resolution {
            Resolution::Value(value) => value,
            Resolution::Unmodified => placeholder.raw.to_string(),
        }
    });

    Substitution {
        text: text.into_owned(),
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;
    use std::collections::HashMap;

    fn resolver() -> Resolver<HashMap<String, String>, StdRng> {
        let env = HashMap::from([("HOME".to_string(), "/home/vault".to_string())]);
        Resolver::new(env, StdRng::seed_from_u64(11))
    }

    fn generative(input: &str) -> Substitution {
        resolve_placeholders(input, Mode::Generative, &mut resolver(), &json!({}))
    }

    #[test]
    fn test_vf005_plain_text_passes_through() {
        let out = generative("hello world");
        assert_eq!(out.text, "hello world");
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_vf005_embedded_placeholders() {
        let out = generative("home={{env:HOME}} pin={{digit:4}}!");
        assert!(out.text.starts_with("home=/home/vault pin="));
        assert!(out.text.ends_with('!'));
        let pin = &out.text["home=/home/vault pin=".len()..out.text.len() - 1];
        assert_eq!(pin.len(), 4);
        assert!(pin.bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn test_vf005_unknown_kind_kept_verbatim() {
        let out = generative("a {{foo:5}} b");
        assert_eq!(out.text, "a {{foo:5}} b");
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].raw, "{{foo:5}}");
    }

    #[test]
    fn test_vf005_failure_is_isolated() {
        let out = generative("{{foo:1}}-{{env:HOME}}-{{alnum:nope}}");
        assert_eq!(out.text, "{{foo:1}}-/home/vault-{{alnum:nope}}");
        assert_eq!(out.diagnostics.len(), 2);
    }

    #[test]
    fn test_vf005_malformed_template_warns() {
        let out = generative("{{foo}}");
        assert_eq!(out.text, "{{foo}}");
        assert_eq!(
            out.diagnostics,
            vec![Diagnostic::new(DiagnosticKind::Malformed, "{{foo}}")]
        );
        let out = resolve_placeholders("{{foo}}", Mode::Reference, &mut resolver(), &json!({}));
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_vf005_argument_stops_at_brace() {
        let out = generative("{{env:A}B}}");
        assert_eq!(out.text, "{{env:A}B}}");
    }

    #[test]
    fn test_vf005_reference_mode() {
        let root = json!({"user": "admin", "list": ["zero", "one"]});
        let out = resolve_placeholders(
            "{{ref:'user'}}@{{ref:'list',1}} {{alnum:3}}",
            Mode::Reference,
            &mut resolver(),
            &root,
        );
        assert_eq!(out.text, "admin@one {{alnum:3}}");
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_vf005_malformed_path_kept() {
        let root = json!({"a": {"b": "X"}});
        let out = resolve_placeholders("{{ref:a,b}}", Mode::Reference, &mut resolver(), &root);
        assert_eq!(out.text, "{{ref:a,b}}");
        assert!(matches!(
            out.diagnostics[0].kind,
            DiagnosticKind::InvalidPath(_)
        ));
    }
}
