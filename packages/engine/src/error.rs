//! Error types for the reviewrepair engine
//!
//! Matching, extraction and normalization never fail on input text. Errors
//! only arise when a caller builds a custom vocabulary or guard whose
//! patterns cannot be compiled.

use thiserror::Error;

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// A label phrase could not be turned into a pattern
    #[error("Invalid label phrase '{phrase}': {reason}")]
    InvalidLabel { phrase: String, reason: String },

    /// A brace guard target field could not be turned into a pattern
    #[error("Invalid guarded field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// A vocabulary needs at least one entry
    #[error("Label vocabulary is empty")]
    EmptyVocabulary,
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_label_display() {
        let err = EngineError::InvalidLabel {
            phrase: "notes".to_string(),
            reason: "too big".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid label phrase 'notes': too big");
    }

    #[test]
    fn test_empty_vocabulary_display() {
        assert_eq!(
            EngineError::EmptyVocabulary.to_string(),
            "Label vocabulary is empty"
        );
    }
}
