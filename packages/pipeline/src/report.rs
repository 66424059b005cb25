//! Rendering of pipeline results: pretty and word-wrapped JSON, violation
//! lines, and a machine-readable batch report.

use serde_json::{json, Value};

use crate::error::Result;
use crate::record::{BatchReport, ProcessedRecord, RecordOutcome};
use crate::schema::Violation;

/// Re-flow text to `words_per_line` words per line.
///
/// # Examples
/// ```
/// use reviewrepair_pipeline::report::wrap_words;
///
/// assert_eq!(wrap_words("a b c d e", 2), "a b\nc d\ne");
/// ```
pub fn wrap_words(text: &str, words_per_line: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(words_per_line.max(1))
        .map(|line| line.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Copy of `value` with every string leaf re-flowed by [`wrap_words`].
pub fn wrap_strings(value: &Value, words_per_line: usize) -> Value {
    match value {
        Value::String(s) => Value::String(wrap_words(s, words_per_line)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| wrap_strings(item, words_per_line))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), wrap_strings(v, words_per_line)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Pretty JSON of the word-wrapped record.
pub fn wrapped_pretty(value: &Value, words_per_line: usize) -> Result<String> {
    Ok(serde_json::to_string_pretty(&wrap_strings(
        value,
        words_per_line,
    ))?)
}

/// One `- path: message` line per violation.
pub fn violation_lines(violations: &[Violation]) -> Vec<String> {
    violations.iter().map(|v| format!("- {v}")).collect()
}

fn status(record: &ProcessedRecord) -> &'static str {
    match &record.outcome {
        RecordOutcome::Repaired(r) if r.is_valid() => "valid",
        RecordOutcome::Repaired(_) => "invalid",
        RecordOutcome::Failed(_) => "repair_failed",
    }
}

/// Machine-readable form of a batch.
pub fn json_report(report: &BatchReport) -> Value {
    let records: Vec<Value> = report
        .records
        .iter()
        .map(|record| match &record.outcome {
            RecordOutcome::Repaired(repaired) => json!({
                "label": record.label,
                "status": status(record),
                "mode": repaired.mode.map(|mode| mode.as_str()),
                "record": repaired.record,
                "violations": repaired.violations,
            }),
            RecordOutcome::Failed(error) => json!({
                "label": record.label,
                "status": status(record),
                "error": error.to_string(),
                "raw": error.raw_text(),
            }),
        })
        .collect();

    json!({
        "warnings": report.warnings,
        "records": records,
    })
}
