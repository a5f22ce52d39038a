// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::value::{Mapping, Value};

/// Serialize a mapping as top-level `key: value` lines
///
/// String values are double-quoted so that re-parsing strips exactly the
/// layer we add; booleans are emitted bare so they coerce back.
pub fn emit_mapping(mapping: &Mapping) -> String {
    let mut out = String::new();
    for (key, value) in mapping.iter() {
        out.push_str(key);
        out.push_str(": ");
        push_scalar(&mut out, value);
        out.push('\n');
    }
    out
}

/// Serialize a sequence of mappings as `- ` records
///
/// The first pair of each record goes inline after the dash; the rest
/// follow on two-space-indented continuation lines.
pub fn emit_sequence(records: &[Mapping]) -> String {
    let mut out = String::new();
    for record in records {
        for (i, (key, value)) in record.iter().enumerate() {
            out.push_str(if i == 0 { "- " } else { "  " });
            out.push_str(key);
            out.push_str(": ");
            push_scalar(&mut out, value);
            out.push('\n');
        }
    }
    out
}

fn push_scalar(out: &mut String, value: &Value) {
    match value {
        Value::Str(s) => {
            out.push('"');
            out.push_str(s);
            out.push('"');
        }
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::{parse_mapping, parse_sequence};

    #[test]
    fn mapping_roundtrips_through_emit_and_parse() {
        let mut original = Mapping::new();
        original.insert("title", "My: Show");
        original.insert("explicit", true);
        original.insert("cover_art_url", "https://example.com/art.jpg?x=1&y=2");

        let reparsed = parse_mapping(&emit_mapping(&original));
        assert_eq!(reparsed, original);
    }

    #[test]
    fn sequence_roundtrips_through_emit_and_parse() {
        let mut first = Mapping::new();
        first.insert("folder", "01-intro");
        first.insert("title", "Intro");
        let mut second = Mapping::new();
        second.insert("folder", "02-next");

        let original = vec![first, second];
        let reparsed = parse_sequence(&emit_sequence(&original));
        assert_eq!(reparsed, original);
    }

    #[test]
    fn sequence_puts_first_pair_inline() {
        let mut record = Mapping::new();
        record.insert("folder", "01-intro");
        record.insert("title", "Intro");

        let text = emit_sequence(&[record]);
        assert_eq!(text, "- folder: \"01-intro\"\n  title: \"Intro\"\n");
    }

    #[test]
    fn booleans_emit_bare() {
        let mut m = Mapping::new();
        m.insert("explicit", false);
        assert_eq!(emit_mapping(&m), "explicit: false\n");
    }
}
