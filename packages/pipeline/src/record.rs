//! Record pipeline: guard, repair, parse, normalize, promote, validate.
//!
//! Each record is processed on its own; nothing is shared between records
//! except read-only configuration, so one record's failure never affects
//! another.

use serde_json::Value;
use tracing::{debug, info, warn};

use reviewrepair_engine::{
    normalize_sentinels, promote_sections, BraceGuard, ExtractedSections, LabelVocabulary,
    ReviewerMode,
};

use crate::batch::split_segments;
use crate::error::{PipelineError, Result};
use crate::repair::Repairer;
use crate::schema::{SchemaValidator, Violation};

/// A record that was repaired and parsed (it may still have violations).
#[derive(Debug, Clone)]
pub struct RepairedRecord {
    /// The promoted, sentinel-normalized record.
    pub record: Value,
    /// Pretty-printed JSON of `record`.
    pub pretty: String,
    /// Schema violations, sorted by path; empty when valid.
    pub violations: Vec<Violation>,
    /// Reviewer mode used for sentinel normalization, if recognized.
    pub mode: Option<ReviewerMode>,
    /// Sections promoted out of the narrative, if it was a string.
    pub sections: Option<ExtractedSections>,
}

impl RepairedRecord {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Outcome of one record in a batch.
#[derive(Debug)]
pub enum RecordOutcome {
    Repaired(RepairedRecord),
    Failed(PipelineError),
}

/// A labelled batch entry.
#[derive(Debug)]
pub struct ProcessedRecord {
    pub label: String,
    pub outcome: RecordOutcome,
}

impl ProcessedRecord {
    /// Repaired and free of violations.
    #[must_use]
    pub fn passed(&self) -> bool {
        matches!(&self.outcome, RecordOutcome::Repaired(r) if r.is_valid())
    }
}

/// Results for every kept segment, plus segmentation warnings.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub records: Vec<ProcessedRecord>,
    pub warnings: Vec<String>,
}

impl BatchReport {
    /// Records that failed repair or have violations.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.records.iter().filter(|r| !r.passed()).count()
    }
}

/// Runs one record (or a batch) through the full pipeline.
pub struct RecordPipeline<'a, R: Repairer> {
    repairer: &'a R,
    validator: &'a SchemaValidator,
    vocabulary: &'a LabelVocabulary,
    guard: &'a BraceGuard,
}

impl<'a, R: Repairer> RecordPipeline<'a, R> {
    /// Pipeline with the standard label vocabulary and brace guard.
    pub fn new(repairer: &'a R, validator: &'a SchemaValidator) -> Self {
        Self {
            repairer,
            validator,
            vocabulary: LabelVocabulary::standard(),
            guard: BraceGuard::standard(),
        }
    }

    /// Use a different label vocabulary.
    #[must_use]
    pub fn with_vocabulary(mut self, vocabulary: &'a LabelVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Use a different brace guard.
    #[must_use]
    pub fn with_guard(mut self, guard: &'a BraceGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Process one record's raw text.
    ///
    /// Fails only with [`PipelineError::Repair`] (raw text preserved) or a
    /// serialization error; violations are part of the success value.
    pub fn process(&self, raw: &str) -> Result<RepairedRecord> {
        let masked = self.guard.mask(raw);

        let repaired = self
            .repairer
            .repair(masked.text())
            .map_err(|e| match e {
                PipelineError::Repair { reason, .. } => PipelineError::repair(reason, raw),
                other => PipelineError::repair(other.to_string(), raw),
            })?;

        let mut record: Value = serde_json::from_str(&repaired)
            .map_err(|e| PipelineError::repair(format!("invalid JSON after repair: {e}"), raw))?;
        masked.restore(&mut record);

        let mode = normalize_sentinels(&mut record);
        if mode.is_none() {
            debug!("no recognized reviewer mode, sentinels left as is");
        }
        let sections = promote_sections(&mut record, self.vocabulary);

        let violations = self.validator.validate(&record);
        let pretty = serde_json::to_string_pretty(&record)?;

        Ok(RepairedRecord {
            record,
            pretty,
            violations,
            mode,
            sections,
        })
    }

    /// Split a paste buffer and process every kept segment independently.
    pub fn process_batch(&self, text: &str, max_segments: usize) -> BatchReport {
        let split = split_segments(text, max_segments);
        let mut report = BatchReport {
            records: Vec::with_capacity(split.segments.len()),
            warnings: split.warnings,
        };

        for segment in split.segments {
            let label = segment.label();
            let outcome = match self.process(&segment.text) {
                Ok(repaired) => {
                    info!(
                        record = %label,
                        violations = repaired.violations.len(),
                        "record processed"
                    );
                    RecordOutcome::Repaired(repaired)
                }
                Err(e) => {
                    warn!(record = %label, error = %e, "record failed");
                    RecordOutcome::Failed(e)
                }
            };
            report.records.push(ProcessedRecord { label, outcome });
        }

        report
    }
}
