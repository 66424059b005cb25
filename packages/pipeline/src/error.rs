//! Error types for the pipeline.
//!
//! A repair failure belongs to one record and is reported inline; it does
//! not stop a batch. Schema text that cannot be used is not an error at all:
//! loading falls back to the built-in schema and returns a warning.

use thiserror::Error;

use reviewrepair_engine::EngineError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("repair/parse failed: {reason}")]
    Repair { reason: String, raw: String },

    #[error("schema load error: {0}")]
    SchemaLoad(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{failed} of {total} record(s) failed repair or validation")]
    RecordsFailed { failed: usize, total: usize },
}

impl PipelineError {
    /// Build a repair failure, keeping the offending text verbatim.
    pub fn repair(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::Repair {
            reason: reason.into(),
            raw: raw.into(),
        }
    }

    /// The unmodified input of a repair failure.
    #[must_use]
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::Repair { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repair_keeps_raw_text() {
        let err = PipelineError::repair("no JSON object found", "{oops");
        assert_eq!(err.to_string(), "repair/parse failed: no JSON object found");
        assert_eq!(err.raw_text(), Some("{oops"));
    }

    #[test]
    fn test_records_failed_display() {
        let err = PipelineError::RecordsFailed {
            failed: 1,
            total: 3,
        };
        assert_eq!(
            err.to_string(),
            "1 of 3 record(s) failed repair or validation"
        );
        assert_eq!(err.raw_text(), None);
    }
}
