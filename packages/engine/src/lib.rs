//! Reviewrepair Engine
//!
//! Label extraction and residual reconciliation for reviewer records.
//! This library provides functionality for:
//! - Finding labelled sections ("Citation rationale: ...") in a narrative
//! - Promoting them into top-level fields, with placeholders nulled
//! - Rebuilding the leftover narrative without losing or duplicating text
//! - Normalizing in-band "no answer" sentinels
//! - Guarding literal braces in narrative strings through a repair step
//!
//! # Example
//!
//! ```
//! use reviewrepair_engine::{extract, LabelVocabulary};
//!
//! let sections = extract(
//!     "Overall notes: All good. relevancy explanation: No comment.",
//!     LabelVocabulary::standard(),
//! );
//! assert_eq!(sections.get("overall_notes"), Some("All good."));
//! assert_eq!(sections.sections.get("relevancy_explanation"), Some(&None));
//! assert_eq!(sections.residual, None);
//! ```

pub mod brace_guard;
pub mod config;
pub mod error;
pub mod extractor;
pub mod matcher;
pub mod placeholder;
pub mod sentinel;
pub mod text;
pub mod vocabulary;

// Re-export commonly used items
pub use brace_guard::{unmask_text, unmask_value, BraceGuard, Masked};
pub use error::{EngineError, Result};
pub use extractor::{extract, extract_sections, promote_sections, ExtractedSections};
pub use matcher::{find_labels, LabelMatch};
pub use placeholder::is_placeholder;
pub use sentinel::{normalize_sentinels, ReviewerMode};
pub use vocabulary::{LabelEntry, LabelVocabulary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
