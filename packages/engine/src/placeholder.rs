//! Placeholder classification for extracted values.

use regex::Regex;
use std::sync::LazyLock;

use crate::config::PLACEHOLDER_PHRASES;
use crate::text::collapse_whitespace;

/// Whole-string match against any placeholder phrase, optional trailing period.
#[allow(clippy::expect_used)] // Built from static phrases that are guaranteed to be valid
static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = PLACEHOLDER_PHRASES
        .iter()
        .map(|phrase| regex::escape(phrase))
        .collect();
    Regex::new(&format!(r"(?i)^(?:{})\.?$", alternatives.join("|"))).expect("valid regex")
});

/// Check whether a value is a "nothing to report" placeholder.
///
/// The value is whitespace-collapsed before comparison, so callers may pass
/// raw spans. Total: every input yields an answer.
///
/// # Examples
/// ```
/// use reviewrepair_engine::placeholder::is_placeholder;
///
/// assert!(is_placeholder("No Comment."));
/// assert!(is_placeholder("none"));
/// assert!(!is_placeholder("Plug into the vis-viva equation."));
/// ```
pub fn is_placeholder(value: &str) -> bool {
    PLACEHOLDER_PATTERN.is_match(&collapse_whitespace(value))
}
