//! VF-007: Command-line driver. Reads a JSON document, fills its templates, prints it back.

use crate::core::engine;
use clap::Args;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Args, Debug)]
pub struct FillArgs {
    /// JSON document to fill (default: read standard input)
    pub file: Option<PathBuf>,

    /// Write the result here instead of standard output
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Suppress template warnings
    #[arg(short, long)]
    pub quiet: bool,
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the default level.
pub fn init_tracing(quiet: bool) {
    let default_level = if quiet { "error" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}

/// Run the fill command.
pub fn dispatch(args: FillArgs) -> Result<(), String> {
    let input = read_input(args.file.as_deref())?;
    let document = parse_document(&input)?;

    let filled = engine::process(document);

    let rendered = render(&filled)?;
    write_output(args.output.as_deref(), &rendered)
}

fn read_input(file: Option<&Path>) -> Result<String, String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("cannot open \"{}\": {}", path.display(), e)),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("cannot read standard input: {}", e))?;
            Ok(buf)
        }
    }
}

/// Parse input text, rejecting falsy documents: `null`, `false`, zero, and
/// empty strings, arrays, or objects.
fn parse_document(text: &str) -> Result<Value, String> {
    let document: Value =
        serde_json::from_str(text).map_err(|e| format!("JSON parse error: {}", e))?;
    if is_empty_document(&document) {
        return Err("JSON document is empty".to_string());
    }
    Ok(document)
}

fn is_empty_document(document: &Value) -> bool {
    match document {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
    }
}

/// Pretty-print with four-space indentation and a trailing newline.
/// Non-ASCII characters are written as-is.
fn render(document: &Value) -> Result<String, String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document
        .serialize(&mut ser)
        .map_err(|e| format!("cannot serialize output: {}", e))?;
    buf.push(b'\n');
    String::from_utf8(buf).map_err(|e| format!("output is not UTF-8: {}", e))
}

fn write_output(output: Option<&Path>, rendered: &str) -> Result<(), String> {
    match output {
        Some(path) => std::fs::write(path, rendered)
            .map_err(|e| format!("cannot write {}: {}", path.display(), e)),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|e| format!("cannot write standard output: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fill_file(contents: &str) -> Result<Value, String> {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("secrets.json");
        let output = dir.path().join("out.json");
        std::fs::write(&input, contents).unwrap();
        dispatch(FillArgs {
            file: Some(input),
            output: Some(output.clone()),
            quiet: true,
        })?;
        let written = std::fs::read_to_string(&output).unwrap();
        Ok(serde_json::from_str(&written).unwrap())
    }

    #[test]
    fn test_vf007_fill_file_end_to_end() {
        let out = fill_file(
            r#"{"db": {"password": "{{alnum:16}}"}, "dsn": "pg://{{ref:'db','password'}}@host"}"#,
        )
        .unwrap();
        let password = out["db"]["password"].as_str().unwrap();
        assert_eq!(password.len(), 16);
        assert_eq!(out["dsn"], format!("pg://{}@host", password));
    }

    #[test]
    fn test_vf007_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = dispatch(FillArgs {
            file: Some(missing.clone()),
            output: None,
            quiet: true,
        })
        .unwrap_err();
        assert!(err.starts_with(&format!("cannot open \"{}\"", missing.display())));
    }

    #[test]
    fn test_vf007_invalid_json() {
        let err = fill_file("{not json").unwrap_err();
        assert!(err.starts_with("JSON parse error"));
    }

    #[test]
    fn test_vf007_empty_documents_rejected() {
        for text in ["{}", "[]", "null", "\"\"", "false", "0", "0.0", "-0"] {
            assert_eq!(
                parse_document(text).unwrap_err(),
                "JSON document is empty",
                "input {}",
                text
            );
        }
        for text in ["1", "-2.5", "true", "\" \"", "[1]", "[null]", "{\"a\": 0}"] {
            assert!(parse_document(text).is_ok(), "input {}", text);
        }
    }

    #[test]
    fn test_vf007_render_four_space_indent() {
        let out = render(&json!({"a": {"b": 1}})).unwrap();
        assert_eq!(out, "{\n    \"a\": {\n        \"b\": 1\n    }\n}\n");
    }

    #[test]
    fn test_vf007_render_keeps_non_ascii_and_order() {
        let doc: Value = serde_json::from_str(r#"{"zürich": "naïve ✓", "a": 1}"#).unwrap();
        let out = render(&doc).unwrap();
        assert!(out.contains("\"zürich\": \"naïve ✓\""));
        assert!(out.find("zürich").unwrap() < out.find("\"a\"").unwrap());
    }

    #[test]
    fn test_vf007_unresolved_templates_survive() {
        let out = fill_file(r#"{"x": "{{foo:5}}", "y": "{{ref:'missing'}}"}"#).unwrap();
        assert_eq!(out, json!({"x": "{{foo:5}}", "y": "{{ref:'missing'}}"}));
    }

    #[test]
    fn test_vf007_init_tracing_twice_is_harmless() {
        init_tracing(true);
        init_tracing(false);
    }
}
