//! Section extraction and residual reconciliation.
//!
//! Given a narrative and its label matches, every match owns the text from
//! its value start up to the next label (or end of text). Everything outside
//! the consumed `[label_start, value_end)` intervals is the residual. No
//! character ends up both in a section and in the residual.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::config::{NARRATIVE_FIELD, RESIDUAL_FIELD};
use crate::matcher::{find_labels, LabelMatch};
use crate::placeholder::is_placeholder;
use crate::text::collapse_whitespace;
use crate::vocabulary::LabelVocabulary;

/// Result of splitting a narrative into labelled sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedSections {
    /// Canonical field to value; `None` when the value was empty or a placeholder.
    pub sections: BTreeMap<String, Option<String>>,
    /// Text outside every labelled section; `None` when nothing meaningful is left.
    pub residual: Option<String>,
}

impl ExtractedSections {
    /// Value stored for a field, flattening "absent" and "null".
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.sections.get(field).and_then(|v| v.as_deref())
    }
}

/// Normalize a raw span into a section value (or `None`).
fn classify(span: &str) -> Option<String> {
    let value = collapse_whitespace(span);
    if value.is_empty() || is_placeholder(&value) {
        None
    } else {
        Some(value)
    }
}

/// Split `text` using precomputed `matches` (as produced by [`find_labels`]).
///
/// When several matches resolve to the same field, the later one wins.
pub fn extract_sections(text: &str, matches: &[LabelMatch<'_>]) -> ExtractedSections {
    let mut sections = BTreeMap::new();
    let mut leftovers: Vec<&str> = Vec::new();
    let mut cursor = 0;

    for (i, m) in matches.iter().enumerate() {
        let value_end = matches
            .get(i + 1)
            .map_or(text.len(), |next| next.label_start)
            .max(m.value_start);

        leftovers.push(text.get(cursor..m.label_start.max(cursor)).unwrap_or(""));
        cursor = value_end;

        let value = classify(text.get(m.value_start..value_end).unwrap_or(""));
        if sections.insert(m.field.to_string(), value).is_some() {
            debug!(field = m.field, "duplicate label, later value wins");
        }
    }
    leftovers.push(text.get(cursor..).unwrap_or(""));

    let residual = classify(&leftovers.join(" ")).filter(|residual| {
        !sections
            .values()
            .any(|value| value.as_deref() == Some(residual.as_str()))
    });

    ExtractedSections { sections, residual }
}

/// Find labels in `text` and split it in one step.
pub fn extract(text: &str, vocabulary: &LabelVocabulary) -> ExtractedSections {
    let matches = find_labels(text, vocabulary);
    extract_sections(text, &matches)
}

fn optional_string(value: Option<&String>) -> Value {
    value.map_or(Value::Null, |s| Value::String(s.clone()))
}

/// Promote labelled sections of a record's narrative into top-level fields.
///
/// Writes each extracted field plus the residual field. A field that
/// already holds a non-null value is left as is. Records that are not
/// objects, or whose narrative is missing or not a string, are untouched
/// and `None` is returned.
pub fn promote_sections(
    record: &mut Value,
    vocabulary: &LabelVocabulary,
) -> Option<ExtractedSections> {
    let Value::Object(map) = record else {
        return None;
    };
    let Some(Value::String(narrative)) = map.get(NARRATIVE_FIELD) else {
        return None;
    };
    let extracted = extract(narrative, vocabulary);

    let promoted = extracted
        .sections
        .iter()
        .map(|(field, value)| (field.as_str(), optional_string(value.as_ref())))
        .chain(std::iter::once((
            RESIDUAL_FIELD,
            optional_string(extracted.residual.as_ref()),
        )));

    for (field, value) in promoted {
        match map.get(field) {
            Some(existing) if !existing.is_null() => {
                debug!(field, "field already set, keeping existing value");
            }
            _ => {
                map.insert(field.to_string(), value);
            }
        }
    }

    Some(extracted)
}
