//! Label matching: locate recognized labels in a narrative string.

use crate::vocabulary::LabelVocabulary;

/// A located label occurrence.
///
/// Offsets are byte offsets into the scanned text and always fall on
/// character boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelMatch<'v> {
    /// Start of the label token (inclusive).
    pub label_start: usize,
    /// End of the label token (exclusive), before the colon.
    pub label_end: usize,
    /// First byte of the value region, after the colon and any whitespace.
    pub value_start: usize,
    /// Canonical field the label promotes into.
    pub field: &'v str,
}

/// Find every label occurrence in `text`, left to right.
///
/// Matching is case-insensitive and never starts inside a word, so
/// "footnotes:" does not contain the "notes" label. At a shared start
/// position the first-declared vocabulary entry wins. An empty result means
/// the whole text is residual.
pub fn find_labels<'v>(text: &str, vocabulary: &'v LabelVocabulary) -> Vec<LabelMatch<'v>> {
    let entries = vocabulary.entries();
    let mut matches = Vec::new();

    for caps in vocabulary.scanner().captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let Some((index, label)) = (1..caps.len())
            .find_map(|group| caps.get(group).map(|m| (group - 1, m)))
        else {
            continue;
        };
        let Some(entry) = entries.get(index) else {
            continue;
        };

        tracing::trace!(
            field = entry.field(),
            start = label.start(),
            "label matched"
        );
        matches.push(LabelMatch {
            label_start: label.start(),
            label_end: label.end(),
            value_start: whole.end(),
            field: entry.field(),
        });
    }

    matches
}
