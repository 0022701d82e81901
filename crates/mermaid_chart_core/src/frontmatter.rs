//! Frontmatter parsing and manipulation utilities.
//!
//! This module provides low-level functions for working with the YAML
//! frontmatter block at the top of a Mermaid diagram (or any text file).
//! Diagram files are attacker-controlled input, so YAML is only ever parsed
//! into plain values; no custom tags are resolved into anything executable.
//!
//! Only the keys Mermaid Chart knows about (`title`, `displayMode`, `config`,
//! `id`) are surfaced through [`Metadata`], but the mutating operations
//! ([`inject`], [`remove_keys`]) re-parse the full mapping so that
//! unrecognized keys survive a round-trip in their original order.

use indexmap::IndexMap;
use serde_yaml::Value;

use crate::error::Result;

/// Frontmatter keys recognized by Mermaid Chart.
const KEY_TITLE: &str = "title";
const KEY_DISPLAY_MODE: &str = "displayMode";
const KEY_CONFIG: &str = "config";
const KEY_ID: &str = "id";

/// The recognized subset of a diagram's frontmatter.
///
/// All fields are optional; a field that is `None` is left untouched by
/// [`inject`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    /// Diagram title.
    pub title: Option<String>,
    /// Custom display mode (e.g. compact mode for gantt charts).
    pub display_mode: Option<String>,
    /// Opaque mermaid config mapping, passed through untouched.
    pub config: Option<Value>,
    /// Unique ID for the diagram, e.g. `https://www.mermaidchart.com/d/xxxx`.
    pub id: Option<String>,
}

impl Metadata {
    /// Returns `true` if no recognized key is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.display_mode.is_none()
            && self.config.is_none()
            && self.id.is_none()
    }
}

/// Result of extracting frontmatter from a diagram.
#[derive(Debug, Clone)]
pub struct FrontMatter {
    /// The diagram body with the frontmatter block stripped off.
    pub body: String,
    /// The recognized metadata keys.
    pub metadata: Metadata,
}

/// Split text into the raw frontmatter YAML and the remaining body.
///
/// The opening delimiter is a `---` line at offset 0, the closing delimiter
/// is the next `---` line; both accept LF and CRLF endings. A block needs at
/// least one character of content between the delimiters, so `---\n---\n` is
/// not frontmatter.
fn split(text: &str) -> (&str, &str) {
    let rest = if let Some(rest) = text.strip_prefix("---\n") {
        rest
    } else if let Some(rest) = text.strip_prefix("---\r\n") {
        rest
    } else {
        return ("", text);
    };

    // Earliest closing delimiter, LF or CRLF terminated.
    let lf = rest.find("\n---\n");
    let crlf = rest.find("\n---\r\n");
    let end = match (lf, crlf) {
        (Some(a), Some(b)) => Some(if a <= b { (a, 5) } else { (b, 6) }),
        (Some(a), None) => Some((a, 5)),
        (None, Some(b)) => Some((b, 6)),
        (None, None) => None,
    };

    match end {
        Some((idx, delim_len)) => {
            // A stray \r before the closing \n belongs to the delimiter, not
            // the YAML content.
            let yaml = rest[..idx].strip_suffix('\r').unwrap_or(&rest[..idx]);
            (yaml, &rest[idx + delim_len..])
        }
        // Malformed (no closing delimiter): treat as no frontmatter.
        None => ("", text),
    }
}

/// Parse a YAML frontmatter string into an ordered map.
///
/// A document that is not a mapping (scalar, sequence, empty) yields an empty
/// map, mirroring how the platform treats degenerate frontmatter.
fn parse_yaml_map(yaml: &str) -> Result<IndexMap<String, Value>> {
    if yaml.trim().is_empty() {
        return Ok(IndexMap::new());
    }

    let value: Value = serde_yaml::from_str(yaml)?;
    match value {
        Value::Mapping(_) => Ok(serde_yaml::from_value(value)?),
        _ => Ok(IndexMap::new()),
    }
}

/// Render a scalar frontmatter value as a string.
///
/// Frontmatter written by hand often has unquoted titles that YAML parses as
/// numbers or booleans; those are still usable as strings.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Serialize a frontmatter map and body back into diagram text.
fn serialize(frontmatter: &IndexMap<String, Value>, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(frontmatter)?;
    Ok(format!("---\n{yaml}---\n{body}"))
}

/// Extract frontmatter from diagram text.
///
/// If no valid frontmatter block is present, `metadata` is empty and `body`
/// equals the input unchanged. Unrecognized keys are not part of the result
/// but are preserved by [`inject`] and [`remove_keys`], which re-parse the
/// original text.
pub fn extract(text: &str) -> Result<FrontMatter> {
    let (yaml, body) = split(text);
    let parsed = parse_yaml_map(yaml)?;

    let metadata = Metadata {
        title: parsed.get(KEY_TITLE).and_then(scalar_to_string),
        display_mode: parsed.get(KEY_DISPLAY_MODE).and_then(scalar_to_string),
        config: parsed.get(KEY_CONFIG).cloned(),
        id: parsed.get(KEY_ID).and_then(|v| v.as_str().map(String::from)),
    };

    Ok(FrontMatter {
        body: body.to_string(),
        metadata,
    })
}

/// Update the frontmatter of the given diagram.
///
/// Sets exactly the keys present in `update`, leaving every other existing
/// key untouched. If the text has no frontmatter yet, a new block is created.
pub fn inject(text: &str, update: &Metadata) -> Result<String> {
    let (yaml, body) = split(text);
    let mut frontmatter = parse_yaml_map(yaml)?;

    if let Some(title) = &update.title {
        frontmatter.insert(KEY_TITLE.to_string(), Value::String(title.clone()));
    }
    if let Some(display_mode) = &update.display_mode {
        frontmatter.insert(
            KEY_DISPLAY_MODE.to_string(),
            Value::String(display_mode.clone()),
        );
    }
    if let Some(config) = &update.config {
        frontmatter.insert(KEY_CONFIG.to_string(), config.clone());
    }
    if let Some(id) = &update.id {
        frontmatter.insert(KEY_ID.to_string(), Value::String(id.clone()));
    }

    serialize(&frontmatter, body)
}

/// Remove the given frontmatter keys.
///
/// If the mapping becomes empty, the bare body is returned with no
/// frontmatter block at all; an empty `---\n---\n` shell is never emitted.
pub fn remove_keys(text: &str, keys_to_remove: &[&str]) -> Result<String> {
    let (yaml, body) = split(text);
    let mut frontmatter = parse_yaml_map(yaml)?;

    for key in keys_to_remove {
        frontmatter.shift_remove(*key);
    }

    if frontmatter.is_empty() {
        Ok(body.to_string())
    } else {
        serialize(&frontmatter, body)
    }
}
