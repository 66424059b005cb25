//! Configuration constants for the reviewrepair engine
//!
//! Field names of the reviewer record, the placeholder phrases that mean
//! "nothing to report", the sentinel answer tokens and the default label
//! table. All of it is static; nothing here is derived from input.

/// Field holding the reviewer category (`R1/R2` or `R3`).
pub const DISCRIMINANT_FIELD: &str = "reviewer";

/// Field holding the selected answer(s).
pub const ANSWER_FIELD: &str = "answer";

/// Field holding the index (or indices) of the selected answer(s).
pub const ANSWER_INDEX_FIELD: &str = "answer_index";

/// Free-text narrative field that labelled sections are promoted out of.
pub const NARRATIVE_FIELD: &str = "explanation";

/// Field receiving the narrative text left over after promotion.
pub const RESIDUAL_FIELD: &str = "explanation_residual";

/// Phrases that stand in for an empty value.
///
/// Compared case-insensitively against the whole (whitespace-collapsed)
/// value, with one optional trailing period.
pub const PLACEHOLDER_PHRASES: &[&str] = &[
    "no comment",
    "none",
    "no initial answer rationale provided",
    "no citation accuracy provided",
    "no citation rationale provided",
];

/// Answer tokens meaning "no answer" in both reviewer modes.
pub const NO_ANSWER_TOKENS: &[&str] = &["NONE", "N/A", "NA"];

/// Default label table, in declaration order.
///
/// Order is the tie-break when two phrases match at the same position, so
/// longer phrases sharing a prefix or suffix with a shorter one come first.
pub const DEFAULT_LABELS: &[(&str, &str)] = &[
    ("overall notes", "overall_notes"),
    ("relevancy explanation", "relevancy_explanation"),
    ("initial answer rationale", "initial_answer_rationale"),
    ("citation accuracy", "citation_accuracy"),
    ("citation rationale", "citation_rationale"),
    ("distinct answers explanation", "distinct_answers_explanation"),
    ("notes", "overall_notes"),
];

/// First character of every brace guard marker (Unicode private use area).
///
/// Input that already contains it is never masked, so a restore cannot turn
/// pre-existing text into braces.
pub const MARKER_START: char = '\u{E000}';

/// Stand-in for a literal `{` inside a guarded string value.
pub const OPEN_BRACE_MARKER: &str = "\u{E000}LB\u{E001}";

/// Stand-in for a literal `}` inside a guarded string value.
pub const CLOSE_BRACE_MARKER: &str = "\u{E000}RB\u{E001}";
