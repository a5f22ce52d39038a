// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use crate::error::ConfigError;

use super::value::{Mapping, Value};

/// A parsed restricted-YAML document: either a flat mapping or a
/// sequence of flat mappings, auto-detected from the text shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Mapping(Mapping),
    Sequence(Vec<Mapping>),
}

/// Parse restricted-YAML text, auto-detecting the document shape
///
/// A document is a sequence if any non-comment, non-blank line starts
/// (after trimming) with `- `; otherwise it is a single mapping.
pub fn parse(text: &str) -> Document {
    let is_sequence = text
        .lines()
        .map(strip_comment)
        .any(|line| line.trim().starts_with("- "));

    if is_sequence {
        Document::Sequence(parse_sequence(text))
    } else {
        Document::Mapping(parse_mapping(text))
    }
}

/// Parse text as a single top-level mapping
///
/// Only unindented `key: value` lines contribute; indented lines would be
/// nested structure, which the dialect does not support, and are ignored.
pub fn parse_mapping(text: &str) -> Mapping {
    let mut mapping = Mapping::new();

    for raw in text.lines() {
        let line = strip_comment(raw);
        if line.starts_with(' ') || line.starts_with('\t') {
            continue;
        }
        if let Some((key, value)) = parse_pair(line) {
            mapping.insert(key, value);
        }
    }

    mapping
}

/// Parse text as a sequence of flat mappings
///
/// Runs a two-state machine: outside a record until the first `- ` line,
/// inside a record afterwards. Each `- ` line flushes the record in
/// progress and starts a new one, optionally with an inline first pair;
/// every later line containing `:` (any indentation) joins the current
/// record. The final record is flushed at end of input.
pub fn parse_sequence(text: &str) -> Vec<Mapping> {
    let mut records = Vec::new();
    let mut current: Option<Mapping> = None;

    for raw in text.lines() {
        let line = strip_comment(raw);
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(inline) = trimmed.strip_prefix("- ") {
            if let Some(done) = current.take() {
                records.push(done);
            }
            let mut record = Mapping::new();
            if let Some((key, value)) = parse_pair(inline) {
                record.insert(key, value);
            }
            current = Some(record);
        } else if let Some(record) = current.as_mut()
            && let Some((key, value)) = parse_pair(trimmed)
        {
            record.insert(key, value);
        }
    }

    if let Some(done) = current {
        records.push(done);
    }

    records
}

/// Load a mapping from a file, treating a missing file as an empty config
///
/// Goes through shape auto-detection: a file that turns out to be
/// sequence-shaped has no top-level pairs to offer and yields an empty
/// mapping rather than garbage keys built from `- ` lines.
pub fn load_mapping(path: &Path) -> Result<Mapping, ConfigError> {
    let document = match read_optional(path)? {
        Some(text) => parse(&text),
        None => return Ok(Mapping::new()),
    };
    match document {
        Document::Mapping(mapping) => Ok(mapping),
        Document::Sequence(_) => Ok(Mapping::new()),
    }
}

/// Load a sequence from a file, treating a missing file as empty
///
/// A mapping-shaped file has no records and yields an empty sequence.
pub fn load_sequence(path: &Path) -> Result<Vec<Mapping>, ConfigError> {
    let document = match read_optional(path)? {
        Some(text) => parse(&text),
        None => return Ok(Vec::new()),
    };
    match document {
        Document::Sequence(records) => Ok(records),
        Document::Mapping(_) => Ok(Vec::new()),
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Strip everything from the first `#` onward
///
/// Known limitation of the dialect: `#` cannot appear inside a value,
/// URLs included. There is no escape mechanism.
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => line[..idx].trim_end(),
        None => line.trim_end(),
    }
}

/// Split a line at its first `:` into a key and a scalar value
///
/// Returns `None` for lines without `:` and for values that are empty
/// after trimming and quote stripping - such keys are absent, not empty.
fn parse_pair(line: &str) -> Option<(String, Value)> {
    let (key, rest) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    let value = strip_quotes(rest.trim());
    if value.is_empty() {
        return None;
    }

    if value.eq_ignore_ascii_case("true") {
        Some((key.to_string(), Value::Bool(true)))
    } else if value.eq_ignore_ascii_case("false") {
        Some((key.to_string(), Value::Bool(false)))
    } else {
        Some((key.to_string(), Value::Str(value.to_string())))
    }
}

/// Remove a single layer of surrounding matching quotes (`"` or `'`)
fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return &value[1..value.len() - 1];
        }
    }
    value
}
