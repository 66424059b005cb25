//! Whitespace normalization shared by extraction and classification.

/// Collapse every run of whitespace to a single space and trim both ends.
///
/// # Examples
/// ```
/// use reviewrepair_engine::text::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  All\n\tgood.  "), "All good.");
/// assert_eq!(collapse_whitespace(" \n "), "");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}
