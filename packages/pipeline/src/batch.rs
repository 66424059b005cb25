//! Batch segmentation of a multi-record paste buffer.
//!
//! Records are introduced by a line holding only the token `reviewer`
//! (any case). At most a fixed number of segments are kept.

use tracing::warn;

use crate::config::SEGMENT_MARKER;

/// One record's worth of raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// 1-based position of the segment's marker line in the input.
    pub index: usize,
    pub text: String,
}

impl Segment {
    /// Display label, e.g. "Reviewer 2".
    #[must_use]
    pub fn label(&self) -> String {
        format!("Reviewer {}", self.index)
    }
}

/// Kept segments plus anything the caller should be told about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentSplit {
    pub segments: Vec<Segment>,
    pub warnings: Vec<String>,
}

fn is_marker(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(SEGMENT_MARKER)
}

/// Split a paste buffer into at most `max_segments` segments.
///
/// Without any marker line the whole (non-blank) text is one segment.
/// Segments past the maximum are cut by position before blank ones are
/// skipped, so labels always point back at the marker they came from.
/// Text before the first marker, blank segments and cut segments are
/// dropped with a warning.
pub fn split_segments(text: &str, max_segments: usize) -> SegmentSplit {
    let mut split = SegmentSplit::default();

    if !text.lines().any(is_marker) {
        if !text.trim().is_empty() {
            split.segments.push(Segment {
                index: 1,
                text: text.trim().to_string(),
            });
        }
        return split;
    }

    let mut preamble: Vec<&str> = Vec::new();
    let mut chunks: Vec<Vec<&str>> = Vec::new();
    for line in text.lines() {
        if is_marker(line) {
            chunks.push(Vec::new());
        } else if let Some(current) = chunks.last_mut() {
            current.push(line);
        } else {
            preamble.push(line);
        }
    }

    if preamble.iter().any(|line| !line.trim().is_empty()) {
        split
            .warnings
            .push("text before the first 'reviewer' line was ignored".to_string());
    }

    let dropped = chunks.len().saturating_sub(max_segments);
    chunks.truncate(max_segments);

    for (position, chunk) in chunks.iter().enumerate() {
        let body = chunk.join("\n").trim().to_string();
        if body.is_empty() {
            split
                .warnings
                .push(format!("segment {} is empty and was skipped", position + 1));
        } else {
            split.segments.push(Segment {
                index: position + 1,
                text: body,
            });
        }
    }

    if dropped > 0 {
        split.warnings.push(format!(
            "{dropped} segment(s) beyond the first {max_segments} were ignored"
        ));
    }

    for message in &split.warnings {
        warn!(%message, "batch segmentation");
    }

    split
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_marker_single_segment() {
        let split = split_segments("  {\"a\": 1}\n", 4);
        assert_eq!(
            split.segments,
            vec![Segment {
                index: 1,
                text: "{\"a\": 1}".to_string()
            }]
        );
        assert!(split.warnings.is_empty());
    }

    #[test]
    fn test_blank_input() {
        let split = split_segments(" \n ", 4);
        assert!(split.segments.is_empty());
        assert!(split.warnings.is_empty());
    }

    #[test]
    fn test_markers_case_insensitive() {
        let text = "Reviewer\n{\"a\": 1}\n  REVIEWER  \n{\"b\": 2}\n";
        let split = split_segments(text, 4);
        let texts: Vec<&str> = split.segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["{\"a\": 1}", "{\"b\": 2}"]);
        assert_eq!(split.segments[1].label(), "Reviewer 2");
    }

    #[test]
    fn test_marker_must_be_alone_on_line() {
        let text = "reviewer\n{\"explanation\": \"the reviewer said\"}\nreviewer: R3\n";
        let split = split_segments(text, 4);
        assert_eq!(split.segments.len(), 1);
        assert!(split.segments[0].text.contains("reviewer: R3"));
    }

    #[test]
    fn test_excess_segments_dropped_with_warning() {
        let text = (1..=6)
            .map(|i| format!("reviewer\n{{\"n\": {i}}}"))
            .collect::<Vec<_>>()
            .join("\n");
        let split = split_segments(&text, 4);
        assert_eq!(split.segments.len(), 4);
        assert_eq!(split.segments[3].text, "{\"n\": 4}");
        assert_eq!(
            split.warnings,
            vec!["2 segment(s) beyond the first 4 were ignored".to_string()]
        );
    }

    #[test]
    fn test_preamble_and_blank_segments_warned() {
        let text = "pasted header\nreviewer\n\nreviewer\n{\"a\": 1}";
        let split = split_segments(text, 4);
        assert_eq!(split.segments.len(), 1);
        assert_eq!(split.segments[0].index, 2);
        assert_eq!(split.segments[0].label(), "Reviewer 2");
        assert_eq!(split.warnings.len(), 2);
        assert!(split.warnings[0].contains("before the first"));
        assert!(split.warnings[1].contains("segment 1 is empty"));
    }

    #[test]
    fn test_cap_applies_by_position_before_blank_skip() {
        let text = "reviewer\n{n:1}\nreviewer\n{n:2}\nreviewer\n{n:3}\nreviewer\n\nreviewer\n{n:5}";
        let split = split_segments(text, 4);

        let labels: Vec<String> = split.segments.iter().map(Segment::label).collect();
        assert_eq!(labels, vec!["Reviewer 1", "Reviewer 2", "Reviewer 3"]);
        assert!(split.segments.iter().all(|s| s.text != "{n:5}"));
        assert_eq!(
            split.warnings,
            vec![
                "segment 4 is empty and was skipped".to_string(),
                "1 segment(s) beyond the first 4 were ignored".to_string(),
            ]
        );
    }
}
