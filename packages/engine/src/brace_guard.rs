//! Brace guard: keep literal braces in narrative strings away from repair.
//!
//! The repair step balances `{`/`}` heuristically and can mistake a brace
//! quoted in prose for structure. Before repair, braces inside the string
//! values of guarded fields are swapped for markers that contain no braces.
//! After parsing, markers in every string leaf are swapped back.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{CLOSE_BRACE_MARKER, MARKER_START, NARRATIVE_FIELD, OPEN_BRACE_MARKER};
use crate::error::{EngineError, Result};
use crate::vocabulary::LabelVocabulary;

/// Guard over the narrative field and every promotable section field.
#[allow(clippy::expect_used)] // Built from static field names that are guaranteed to be valid
static STANDARD: LazyLock<BraceGuard> = LazyLock::new(|| {
    let fields = std::iter::once(NARRATIVE_FIELD).chain(LabelVocabulary::standard().fields());
    BraceGuard::new(fields).expect("valid guarded fields")
});

/// Masks braces inside the quoted values of a fixed set of fields.
#[derive(Debug, Clone)]
pub struct BraceGuard {
    fields: Vec<String>,
    pattern: Regex,
}

impl BraceGuard {
    /// Build a guard for the given field names.
    ///
    /// A field is located as `"name"` + colon + a double-quoted string;
    /// backslash escapes inside the string (including `\"`) are skipped over.
    pub fn new(fields: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if let Some(blank) = fields.iter().find(|f| f.is_empty()) {
            return Err(EngineError::InvalidField {
                field: blank.clone(),
                reason: "field name is empty".to_string(),
            });
        }
        let names: Vec<String> = fields.iter().map(|f| regex::escape(f)).collect();
        let source = format!(r#""(?:{})"\s*:\s*"((?:[^"\\]|\\.)*)""#, names.join("|"));
        let pattern = Regex::new(&source).map_err(|e| EngineError::InvalidField {
            field: fields.join(", "),
            reason: e.to_string(),
        })?;
        Ok(Self { fields, pattern })
    }

    /// The process-wide standard guard.
    #[must_use]
    pub fn standard() -> &'static BraceGuard {
        &STANDARD
    }

    /// Guarded field names.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Replace braces inside guarded string values with markers.
    ///
    /// Text without guarded fields (or without braces in them) is returned
    /// borrowed and unchanged. Text that already contains marker characters
    /// is never masked.
    pub fn mask<'t>(&self, raw: &'t str) -> Masked<'t> {
        if raw.contains(MARKER_START) {
            warn!("input already contains brace marker characters, brace guard skipped");
            return Masked::untouched(raw);
        }

        let mut out = String::with_capacity(raw.len());
        let mut cursor = 0;
        let mut masked = 0usize;

        for caps in self.pattern.captures_iter(raw) {
            let Some(value) = caps.get(1) else {
                continue;
            };
            out.push_str(&raw[cursor..value.start()]);
            for ch in value.as_str().chars() {
                match ch {
                    '{' => {
                        out.push_str(OPEN_BRACE_MARKER);
                        masked += 1;
                    }
                    '}' => {
                        out.push_str(CLOSE_BRACE_MARKER);
                        masked += 1;
                    }
                    other => out.push(other),
                }
            }
            cursor = value.end();
        }

        if masked == 0 {
            return Masked::untouched(raw);
        }
        out.push_str(&raw[cursor..]);
        debug!(braces = masked, "masked literal braces in guarded fields");

        Masked {
            text: Cow::Owned(out),
            applied: true,
        }
    }
}

/// Output of [`BraceGuard::mask`]; knows whether anything must be restored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Masked<'t> {
    text: Cow<'t, str>,
    applied: bool,
}

impl<'t> Masked<'t> {
    fn untouched(raw: &'t str) -> Self {
        Self {
            text: Cow::Borrowed(raw),
            applied: false,
        }
    }

    /// Text to hand to the repair step.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether any brace was replaced.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// Undo the masking on the text form.
    #[must_use]
    pub fn restore_text(&self) -> String {
        if self.applied {
            unmask_text(&self.text)
        } else {
            self.text.to_string()
        }
    }

    /// Undo the masking on a parsed value (no-op when nothing was masked).
    pub fn restore(&self, value: &mut Value) {
        if self.applied {
            unmask_value(value);
        }
    }
}

/// Replace brace markers in a string with literal braces.
#[must_use]
pub fn unmask_text(text: &str) -> String {
    text.replace(OPEN_BRACE_MARKER, "{")
        .replace(CLOSE_BRACE_MARKER, "}")
}

/// Replace brace markers in every string leaf of a value, recursively.
pub fn unmask_value(value: &mut Value) {
    match value {
        Value::String(s) => {
            if s.contains(MARKER_START) {
                *s = unmask_text(s);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(unmask_value),
        Value::Object(map) => map.values_mut().for_each(unmask_value),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_masks_only_guarded_values() {
        let guard = BraceGuard::new(["explanation"]).expect("guard");
        let raw = r#"{"explanation": "set {x} here", "other": "{y}"}"#;
        let masked = guard.mask(raw);
        assert!(masked.is_applied());
        assert!(!masked.text().contains("{x}"));
        assert!(masked.text().contains(r#""other": "{y}""#));
        assert!(masked.text().starts_with('{'));
        assert!(masked.text().ends_with('}'));
        assert_eq!(masked.restore_text(), raw);
    }

    #[test]
    fn test_escaped_quotes_inside_value() {
        let guard = BraceGuard::new(["explanation"]).expect("guard");
        let raw = r#"{"explanation": "he said \"{hi}\" and left {", "n": 1}"#;
        let masked = guard.mask(raw);
        assert!(masked.is_applied());
        assert_eq!(masked.text().matches('{').count(), 1);
        assert_eq!(masked.text().matches('}').count(), 1);
        assert_eq!(masked.restore_text(), raw);
    }

    #[test]
    fn test_no_guarded_fields_is_noop() {
        let guard = BraceGuard::standard();
        let raw = r#"{"answer": "{a}"}"#;
        let masked = guard.mask(raw);
        assert!(!masked.is_applied());
        assert!(matches!(masked.text, Cow::Borrowed(_)));
        assert_eq!(masked.text(), raw);
    }

    #[test]
    fn test_existing_markers_skip_masking() {
        let guard = BraceGuard::standard();
        let raw = format!(r#"{{"explanation": "{OPEN_BRACE_MARKER} and {{"}}"#);
        let masked = guard.mask(&raw);
        assert!(!masked.is_applied());
        assert_eq!(masked.restore_text(), raw);

        let mut value = json!({"explanation": OPEN_BRACE_MARKER});
        masked.restore(&mut value);
        assert_eq!(value["explanation"], json!(OPEN_BRACE_MARKER));
    }

    #[test]
    fn test_restore_walks_nested_values() {
        let mut value = json!({
            "a": [format!("x{OPEN_BRACE_MARKER}1{CLOSE_BRACE_MARKER}"), 2, null],
            "b": {"c": format!("{CLOSE_BRACE_MARKER}")},
            "d": true
        });
        unmask_value(&mut value);
        assert_eq!(
            value,
            json!({"a": ["x{1}", 2, null], "b": {"c": "}"}, "d": true})
        );
    }

    #[test]
    fn test_mask_then_parse_then_restore() {
        let guard = BraceGuard::standard();
        let raw = r#"{"explanation": "Notes: use {E = mc^2}", "reviewer": "R3"}"#;
        let masked = guard.mask(raw);
        let mut value: Value = serde_json::from_str(masked.text()).expect("valid json");
        masked.restore(&mut value);
        assert_eq!(value["explanation"], json!("Notes: use {E = mc^2}"));
    }

    #[test]
    fn test_standard_guard_fields() {
        let fields = BraceGuard::standard().fields();
        assert_eq!(fields.first().map(String::as_str), Some("explanation"));
        assert!(fields.iter().any(|f| f == "citation_rationale"));
    }

    #[test]
    fn test_empty_field_name_rejected() {
        assert!(matches!(
            BraceGuard::new([""]),
            Err(EngineError::InvalidField { .. })
        ));
    }
}
