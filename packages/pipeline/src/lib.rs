//! Reviewrepair Pipeline - Repair, normalize and validate reviewer records.
//!
//! Takes near-JSON text produced for a review form, repairs it into JSON,
//! normalizes sentinels, promotes labelled narrative sections into fields
//! and validates the result against a Draft-07 schema.
//!
//! # Example
//!
//! ```
//! use reviewrepair_pipeline::{HeuristicRepairer, RecordPipeline, SchemaValidator};
//!
//! let validator = SchemaValidator::default_schema().unwrap();
//! let repairer = HeuristicRepairer;
//! let pipeline = RecordPipeline::new(&repairer, &validator);
//!
//! let record = pipeline
//!     .process(r#"{'reviewer': 'R3', 'answer': 'NONE', 'answer_index': -1,
//!                  'explanation': 'Because. Notes: fine',}"#)
//!     .unwrap();
//! assert!(record.is_valid());
//! assert_eq!(record.record["overall_notes"], "fine");
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants and environment-driven settings
//! - [`error`]: Error types and Result alias
//! - [`repair`]: Repair collaborator and the heuristic repairer
//! - [`schema`]: Schema loading and violation reporting
//! - [`batch`]: Splitting a paste buffer into reviewer segments
//! - [`record`]: The per-record pipeline
//! - [`report`]: Pretty, wrapped and JSON rendering
//! - [`cli`]: Command-line interface

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod record;
pub mod repair;
pub mod report;
pub mod schema;

// Re-export commonly used items
pub use config::ReviewConfig;
pub use error::{PipelineError, Result};
pub use record::{BatchReport, ProcessedRecord, RecordOutcome, RecordPipeline, RepairedRecord};
pub use repair::{HeuristicRepairer, Repairer};
pub use schema::{LoadedSchema, PathSegment, SchemaValidator, Violation};
