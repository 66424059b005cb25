//! Sentinel normalization of answer fields.
//!
//! Upstream generators encode "no answer" in band: `["NONE"]`, `"n/a"`,
//! `-1`, `[-1]`. These are rewritten to real absence, with the shape chosen
//! by the reviewer mode. Anything that does not look like a sentinel is left
//! alone.

use serde_json::Value;
use tracing::debug;

use crate::config::{ANSWER_FIELD, ANSWER_INDEX_FIELD, DISCRIMINANT_FIELD, NO_ANSWER_TOKENS};

/// Answer shape selected by the discriminant field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewerMode {
    /// `R1/R2`: answers are ordered sequences.
    MultiSelect,
    /// `R3`: answers are scalars.
    SingleSelect,
}

impl ReviewerMode {
    /// Every mode, in discriminant order.
    pub const ALL: [Self; 2] = [Self::MultiSelect, Self::SingleSelect];

    /// Derive the mode from a discriminant value.
    ///
    /// Only the exact canonical texts (`"R1/R2"`, `"R3"`) are recognized,
    /// the same values the record schema's `reviewer` enum accepts.
    #[must_use]
    pub fn from_discriminant(value: &Value) -> Option<Self> {
        let raw = value.as_str()?;
        Self::ALL.into_iter().find(|mode| mode.as_str() == raw)
    }

    /// Canonical discriminant text for this mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultiSelect => "R1/R2",
            Self::SingleSelect => "R3",
        }
    }
}

fn is_no_answer_token(text: &str) -> bool {
    let folded = text.trim().to_uppercase();
    NO_ANSWER_TOKENS.contains(&folded.as_str())
}

fn is_negative_integer(value: &Value) -> bool {
    value.as_i64().is_some_and(|n| n < 0)
}

/// Rewrite sentinel answer encodings in place.
///
/// Returns the mode that was applied, or `None` when the record is not an
/// object or its discriminant is not recognized (nothing is changed then).
pub fn normalize_sentinels(record: &mut Value) -> Option<ReviewerMode> {
    let Value::Object(map) = record else {
        return None;
    };
    let mode = map
        .get(DISCRIMINANT_FIELD)
        .and_then(ReviewerMode::from_discriminant)?;

    match mode {
        ReviewerMode::MultiSelect => {
            if let Some(Value::Array(items)) = map.get_mut(ANSWER_FIELD) {
                if matches!(items.as_slice(), [Value::String(only)] if is_no_answer_token(only)) {
                    debug!(field = ANSWER_FIELD, "sentinel answer cleared");
                    items.clear();
                }
            }
            if let Some(Value::Array(items)) = map.get_mut(ANSWER_INDEX_FIELD) {
                if matches!(items.as_slice(), [only] if is_negative_integer(only)) {
                    debug!(field = ANSWER_INDEX_FIELD, "sentinel index cleared");
                    items.clear();
                }
            }
        }
        ReviewerMode::SingleSelect => {
            if let Some(answer) = map.get_mut(ANSWER_FIELD) {
                if answer
                    .as_str()
                    .is_some_and(|s| s.trim().is_empty() || is_no_answer_token(s))
                {
                    debug!(field = ANSWER_FIELD, "sentinel answer nulled");
                    *answer = Value::Null;
                }
            }
            if let Some(index) = map.get_mut(ANSWER_INDEX_FIELD) {
                if is_negative_integer(index) {
                    debug!(field = ANSWER_INDEX_FIELD, "sentinel index nulled");
                    *index = Value::Null;
                }
            }
        }
    }

    Some(mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_mode_from_discriminant() {
        assert_eq!(
            ReviewerMode::from_discriminant(&json!("R1/R2")),
            Some(ReviewerMode::MultiSelect)
        );
        assert_eq!(
            ReviewerMode::from_discriminant(&json!("R3")),
            Some(ReviewerMode::SingleSelect)
        );
        for loose in [" r1 / r2 ", "R1", "R2", "r3"] {
            assert_eq!(ReviewerMode::from_discriminant(&json!(loose)), None, "{loose:?}");
        }
        assert_eq!(ReviewerMode::from_discriminant(&json!("R4")), None);
        assert_eq!(ReviewerMode::from_discriminant(&json!(3)), None);
    }

    #[test]
    fn test_multi_select_sentinels() {
        let mut record = json!({
            "reviewer": "R1/R2",
            "answer": ["NONE"],
            "answer_index": [-1]
        });
        assert_eq!(normalize_sentinels(&mut record), Some(ReviewerMode::MultiSelect));
        assert_eq!(record["answer"], json!([]));
        assert_eq!(record["answer_index"], json!([]));
    }

    #[test]
    fn test_multi_select_token_variants() {
        for token in ["none", " n/a ", "Na"] {
            let mut record = json!({"reviewer": "R1/R2", "answer": [token]});
            normalize_sentinels(&mut record);
            assert_eq!(record["answer"], json!([]), "token {token:?}");
        }
    }

    #[test]
    fn test_multi_select_real_answers_untouched() {
        let mut record = json!({
            "reviewer": "R1/R2",
            "answer": ["NONE", "B"],
            "answer_index": [0, -1]
        });
        let before = record.clone();
        normalize_sentinels(&mut record);
        assert_eq!(record, before);

        // A scalar in multi-select mode is not a sentinel shape.
        let mut record = json!({"reviewer": "R1/R2", "answer": "NONE", "answer_index": -1});
        let before = record.clone();
        normalize_sentinels(&mut record);
        assert_eq!(record, before);
    }

    #[test]
    fn test_single_select_sentinels() {
        let mut record = json!({
            "reviewer": "R3",
            "answer": "none",
            "answer_index": -1
        });
        assert_eq!(normalize_sentinels(&mut record), Some(ReviewerMode::SingleSelect));
        assert_eq!(record["answer"], Value::Null);
        assert_eq!(record["answer_index"], Value::Null);
    }

    #[test]
    fn test_single_select_empty_string() {
        let mut record = json!({"reviewer": "R3", "answer": "  ", "answer_index": 2});
        normalize_sentinels(&mut record);
        assert_eq!(record["answer"], Value::Null);
        assert_eq!(record["answer_index"], json!(2));
    }

    #[test]
    fn test_single_select_list_untouched() {
        let mut record = json!({"reviewer": "R3", "answer": ["NONE"], "answer_index": [-1]});
        let before = record.clone();
        normalize_sentinels(&mut record);
        assert_eq!(record, before);
    }

    #[test]
    fn test_unknown_discriminant_untouched() {
        let mut record = json!({"reviewer": "other", "answer": "NONE", "answer_index": -1});
        let before = record.clone();
        assert_eq!(normalize_sentinels(&mut record), None);
        assert_eq!(record, before);
    }

    #[test]
    fn test_non_object_untouched() {
        let mut record = json!(["R3"]);
        assert_eq!(normalize_sentinels(&mut record), None);
        assert_eq!(record, json!(["R3"]));
    }

    #[test]
    fn test_missing_fields_are_fine() {
        let mut record = json!({"reviewer": "R3"});
        assert_eq!(normalize_sentinels(&mut record), Some(ReviewerMode::SingleSelect));
        assert_eq!(record, json!({"reviewer": "R3"}));
    }

    #[test]
    fn test_unrecognized_discriminant_leaves_sentinels() {
        let mut record = json!({"reviewer": "R1", "answer": ["NONE"], "answer_index": [-1]});
        let before = record.clone();
        assert_eq!(normalize_sentinels(&mut record), None);
        assert_eq!(record, before);
    }
}
