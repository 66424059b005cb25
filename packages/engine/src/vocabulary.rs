//! Label vocabulary: the ordered table of recognized section labels.
//!
//! Each entry pairs a phrase (e.g. "distinct answers explanation") with the
//! canonical field its value is promoted into. Phrases match
//! case-insensitively and tolerate any run of whitespace, underscores or
//! hyphens between words, so "Distinct_answers-explanation" is the same label.
//!
//! The table is an ordered `Vec`, never a map: declaration order is the
//! tie-break when two phrases match at the same position.

use regex::Regex;
use std::sync::LazyLock;

use crate::config::DEFAULT_LABELS;
use crate::error::{EngineError, Result};

/// Separator tolerated between the words of a label.
const WORD_SEPARATOR: &str = r"[\s_-]+";

/// Standard vocabulary, built once from [`DEFAULT_LABELS`].
#[allow(clippy::expect_used)] // Built from static phrases that are guaranteed to be valid
static STANDARD: LazyLock<LabelVocabulary> = LazyLock::new(|| {
    LabelVocabulary::new(DEFAULT_LABELS.iter().copied()).expect("valid default labels")
});

/// Build the (unanchored) pattern body for a phrase.
fn phrase_pattern(phrase: &str) -> Result<String> {
    let words: Vec<String> = phrase.split_whitespace().map(regex::escape).collect();
    if words.is_empty() {
        return Err(EngineError::InvalidLabel {
            phrase: phrase.to_string(),
            reason: "phrase has no words".to_string(),
        });
    }
    Ok(words.join(WORD_SEPARATOR))
}

/// A single label: phrase and the canonical field it promotes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEntry {
    phrase: String,
    field: String,
}

impl LabelEntry {
    /// Create a label entry.
    pub fn new(phrase: impl Into<String>, field: impl Into<String>) -> Result<Self> {
        let phrase = phrase.into();
        let field = field.into();
        if field.trim().is_empty() {
            return Err(EngineError::InvalidLabel {
                phrase,
                reason: "canonical field is empty".to_string(),
            });
        }
        phrase_pattern(&phrase)?;
        Ok(Self { phrase, field })
    }

    /// The phrase as declared.
    #[must_use]
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// The canonical field this label promotes into.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }
}

/// Ordered, immutable label table plus the scanner compiled from it.
#[derive(Debug, Clone)]
pub struct LabelVocabulary {
    entries: Vec<LabelEntry>,
    scanner: Regex,
}

impl LabelVocabulary {
    /// Build a vocabulary from `(phrase, canonical field)` pairs, in order.
    ///
    /// The scanner is one alternation with a capture group per entry, in
    /// declaration order. Alternation is leftmost-first, so at a given
    /// position the earliest-declared phrase that matches wins.
    pub fn new<P, F>(labels: impl IntoIterator<Item = (P, F)>) -> Result<Self>
    where
        P: Into<String>,
        F: Into<String>,
    {
        let entries = labels
            .into_iter()
            .map(|(phrase, field)| LabelEntry::new(phrase, field))
            .collect::<Result<Vec<_>>>()?;
        if entries.is_empty() {
            return Err(EngineError::EmptyVocabulary);
        }

        let groups = entries
            .iter()
            .map(|entry| phrase_pattern(entry.phrase()).map(|body| format!("({body})")))
            .collect::<Result<Vec<_>>>()?;
        // `\b` before a word character is "start of text or non-word character".
        let source = format!(r"(?i)\b(?:{})\s*:\s*", groups.join("|"));
        let scanner = Regex::new(&source).map_err(|e| EngineError::InvalidLabel {
            phrase: entries
                .iter()
                .map(LabelEntry::phrase)
                .collect::<Vec<_>>()
                .join(", "),
            reason: e.to_string(),
        })?;

        Ok(Self { entries, scanner })
    }

    /// The process-wide standard vocabulary.
    #[must_use]
    pub fn standard() -> &'static LabelVocabulary {
        &STANDARD
    }

    /// All entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[LabelEntry] {
        &self.entries
    }

    /// Distinct canonical fields, in first-declared order.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !fields.contains(&entry.field()) {
                fields.push(entry.field());
            }
        }
        fields
    }

    pub(crate) fn scanner(&self) -> &Regex {
        &self.scanner
    }
}
