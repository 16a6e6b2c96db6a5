//! VF-004: Reference paths: parsing `'key',0,'other'` and walking a document.
//!
//! Grammar:
//!
//! ```text
//! path  := token (',' token)*
//! token := '\'' [^']* '\'' | [0-9]+
//! ```
//!
//! Whitespace around tokens is ignored. Commas inside quotes belong to the key.

use super::types::{node_type, JsonPath, PathComponent};
use serde_json::Value;
use std::fmt;

/// Failure to parse or follow a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    Empty,
    EmptyToken(usize),
    UnterminatedQuote(usize),
    TrailingAfterQuote(usize),
    InvalidToken(String),
    IndexOverflow(String),
    MissingKey { key: String, at: String },
    IndexOutOfRange { index: usize, len: usize, at: String },
    ExpectedObject { key: String, found: &'static str, at: String },
    ExpectedArray { index: usize, found: &'static str, at: String },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::Empty => write!(f, "path is empty"),
            PathError::EmptyToken(n) => write!(f, "path component {} is empty", n + 1),
            PathError::UnterminatedQuote(n) => {
                write!(f, "unterminated quote in path component {}", n + 1)
            }
            PathError::TrailingAfterQuote(n) => write!(
                f,
                "unexpected characters after closing quote in path component {}",
                n + 1
            ),
            PathError::InvalidToken(t) => write!(
                f,
                "'{}' is neither a single-quoted key nor a decimal index",
                t
            ),
            PathError::IndexOverflow(t) => write!(f, "index {} is too large", t),
            PathError::MissingKey { key, at } => {
                write!(f, "key '{}' not found at {}", key, at)
            }
            PathError::IndexOutOfRange { index, len, at } => write!(
                f,
                "index {} out of range at {} (length {})",
                index, at, len
            ),
            PathError::ExpectedObject { key, found, at } => write!(
                f,
                "cannot look up key '{}' at {}: found {}, expected an object",
                key, at, found
            ),
            PathError::ExpectedArray { index, found, at } => write!(
                f,
                "cannot look up index {} at {}: found {}, expected an array",
                index, at, found
            ),
        }
    }
}

/// Parse a `ref` argument into a path.
pub fn parse_path(input: &str) -> Result<JsonPath, PathError> {
    if input.trim().is_empty() {
        return Err(PathError::Empty);
    }

    let mut components = Vec::new();
    let mut rest = input;
    loop {
        let n = components.len();
        rest = rest.trim_start();
        let (component, after) = parse_token(rest, n)?;
        components.push(component);

        let after = after.trim_start();
        if after.is_empty() {
            break;
        }
        match after.strip_prefix(',') {
            Some(next) => rest = next,
            None if rest.starts_with('\'') => return Err(PathError::TrailingAfterQuote(n)),
            None => return Err(PathError::InvalidToken(token_text(rest).to_string())),
        }
    }

    Ok(JsonPath(components))
}

/// Parse one token at the start of `s`, returning it and the unconsumed tail.
fn parse_token(s: &str, n: usize) -> Result<(PathComponent, &str), PathError> {
    if let Some(quoted) = s.strip_prefix('\'') {
        let close = quoted.find('\'').ok_or(PathError::UnterminatedQuote(n))?;
        let key = &quoted[..close];
        return Ok((PathComponent::Key(key.to_string()), &quoted[close + 1..]));
    }

    let digits_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if digits_end == 0 {
        let text = token_text(s);
        if text.is_empty() {
            return Err(PathError::EmptyToken(n));
        }
        return Err(PathError::InvalidToken(text.to_string()));
    }

    let (digits, tail) = s.split_at(digits_end);
    let tail_trimmed = tail.trim_start();
    if !tail_trimmed.is_empty() && !tail_trimmed.starts_with(',') {
        return Err(PathError::InvalidToken(token_text(s).to_string()));
    }
    let index = digits
        .parse::<usize>()
        .map_err(|_| PathError::IndexOverflow(digits.to_string()))?;
    Ok((PathComponent::Index(index), tail))
}

/// Text of the token at the start of `s`, up to the next comma.
fn token_text(s: &str) -> &str {
    s.split(',').next().unwrap_or("").trim()
}

/// Follow `path` from `root`, returning the node it names.
pub fn lookup<'a>(root: &'a Value, path: &JsonPath) -> Result<&'a Value, PathError> {
    let mut current = root;
    let mut walked = JsonPath::default();

    for component in &path.0 {
        let at = location(&walked);
        current = match component {
            PathComponent::Key(key) => match current {
                Value::Object(map) => map.get(key).ok_or_else(|| PathError::MissingKey {
                    key: key.clone(),
                    at,
                })?,
                other => {
                    return Err(PathError::ExpectedObject {
                        key: key.clone(),
                        found: node_type(other),
                        at,
                    })
                }
            },
            PathComponent::Index(index) => match current {
                Value::Array(items) => {
                    items
                        .get(*index)
                        .ok_or_else(|| PathError::IndexOutOfRange {
                            index: *index,
                            len: items.len(),
                            at,
                        })?
                }
                other => {
                    return Err(PathError::ExpectedArray {
                        index: *index,
                        found: node_type(other),
                        at,
                    })
                }
            },
        };
        walked.0.push(component.clone());
    }

    Ok(current)
}

fn location(walked: &JsonPath) -> String {
    if walked.0.is_empty() {
        "document root".to_string()
    } else {
        format!("[{}]", walked)
    }
}
