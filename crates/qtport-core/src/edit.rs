//! Text edits and step outcomes.
//!
//! Every rewrite step works the same way: tokenize the current text, collect
//! a list of [`TextEdit`]s against it, and splice them in one pass with
//! [`apply_edits`]. The step then reports a [`StepOutcome`] carrying the new
//! text and whether anything was applied.

use std::fmt;

use serde::Serialize;

use crate::error::{PortError, PortResult};

/// Byte offsets into source text.
///
/// Spans are half-open intervals: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    ///
    /// # Panics
    /// Panics if `start > end`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(
            start <= end,
            "Span start ({}) must be <= end ({})",
            start,
            end
        );
        Span { start, end }
    }

    /// Empty span at `offset` (an insertion point).
    pub fn point(offset: usize) -> Self {
        Span::new(offset, offset)
    }

    /// Smallest span covering both `self` and `other`.
    pub fn join(&self, other: &Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Check if span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Two spans overlap if they share any byte positions.
    ///
    /// Adjacent spans do not overlap. Two insertions at the same point do.
    pub fn overlaps(&self, other: &Span) -> bool {
        if self.is_empty() && other.is_empty() {
            return self.start == other.start;
        }
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Replace the bytes in `span` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub span: Span,
    pub replacement: String,
}

impl TextEdit {
    pub fn replace(span: Span, replacement: impl Into<String>) -> Self {
        TextEdit {
            span,
            replacement: replacement.into(),
        }
    }

    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        TextEdit::replace(Span::point(offset), text)
    }

    pub fn delete(span: Span) -> Self {
        TextEdit::replace(span, String::new())
    }
}

/// Apply non-overlapping edits to `source` in a single pass.
///
/// Edits may be given in any order. Overlapping edits mean a step produced
/// conflicting matches, which is a bug, so they are rejected.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> PortResult<String> {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|edit| (edit.span.start, edit.span.end));

    for pair in sorted.windows(2) {
        if pair[0].span.overlaps(&pair[1].span) {
            return Err(PortError::internal(format!(
                "overlapping edits at {} and {}",
                pair[0].span, pair[1].span
            )));
        }
    }

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in sorted {
        if edit.span.end > source.len() {
            return Err(PortError::internal(format!(
                "edit {} is past end of text ({} bytes)",
                edit.span,
                source.len()
            )));
        }
        out.push_str(&source[cursor..edit.span.start]);
        out.push_str(&edit.replacement);
        cursor = edit.span.end;
    }
    out.push_str(&source[cursor..]);
    Ok(out)
}

/// Offset just past the line terminator of the line containing `offset`,
/// or the end of text on the last line.
pub fn end_of_line(source: &str, offset: usize) -> usize {
    source[offset..]
        .find('\n')
        .map(|pos| offset + pos + 1)
        .unwrap_or(source.len())
}

/// Offset of the first byte of the line containing `offset`.
pub fn start_of_line(source: &str, offset: usize) -> usize {
    source[..offset].rfind('\n').map(|pos| pos + 1).unwrap_or(0)
}

/// If only blanks follow `offset` up to the end of its line, return the
/// offset just past that line terminator; otherwise return `offset`.
pub fn swallow_blank_rest(source: &str, offset: usize) -> usize {
    let eol = end_of_line(source, offset);
    if source[offset..eol].trim().is_empty() {
        eol
    } else {
        offset
    }
}

/// Line terminator used by `source`: `\r\n` if its first line ends that
/// way, `\n` otherwise.
pub fn line_ending(source: &str) -> &'static str {
    match source.find('\n') {
        Some(pos) if source[..pos].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

/// Rewrite the `\n` terminators of generated `text` to `eol`.
pub fn with_line_ending(text: &str, eol: &str) -> String {
    if eol == "\n" {
        text.to_string()
    } else {
        text.replace('\n', eol)
    }
}

// ============================================================================
// Step outcomes
// ============================================================================

/// Whether a rewrite step changed anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    /// The step matched and produced this many edits.
    Applied { edits: usize },
    /// The step found nothing to do.
    Skipped { reason: String },
}

impl StepStatus {
    pub fn is_applied(&self) -> bool {
        matches!(self, StepStatus::Applied { .. })
    }
}

/// New text plus the status of the step that produced it.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub text: String,
    pub status: StepStatus,
}

impl StepOutcome {
    /// Apply `edits` to `source`; an empty edit list leaves the text untouched
    /// and reports `Skipped` with `reason`.
    pub fn from_edits(
        source: &str,
        edits: Vec<TextEdit>,
        reason: impl Into<String>,
    ) -> PortResult<Self> {
        if edits.is_empty() {
            return Ok(StepOutcome::skipped(source, reason));
        }
        Ok(StepOutcome {
            text: apply_edits(source, &edits)?,
            status: StepStatus::Applied { edits: edits.len() },
        })
    }

    pub fn skipped(source: &str, reason: impl Into<String>) -> Self {
        StepOutcome {
            text: source.to_string(),
            status: StepStatus::Skipped {
                reason: reason.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_overlap_rules() {
        assert!(Span::new(0, 5).overlaps(&Span::new(4, 6)));
        assert!(!Span::new(0, 5).overlaps(&Span::new(5, 6)));
        assert!(Span::point(3).overlaps(&Span::point(3)));
        assert!(!Span::point(5).overlaps(&Span::new(0, 5)));
    }

    #[test]
    #[should_panic(expected = "must be <=")]
    fn span_rejects_inverted_range() {
        let _ = Span::new(4, 2);
    }

    #[test]
    fn edits_apply_in_any_order() {
        let source = "alpha beta gamma";
        let edits = vec![
            TextEdit::replace(Span::new(11, 16), "GAMMA"),
            TextEdit::insert(0, ">> "),
            TextEdit::delete(Span::new(5, 10)),
        ];
        assert_eq!(apply_edits(source, &edits).unwrap(), ">> alpha GAMMA");
    }

    #[test]
    fn overlapping_edits_are_internal_errors() {
        let edits = vec![
            TextEdit::replace(Span::new(0, 4), "x"),
            TextEdit::replace(Span::new(2, 6), "y"),
        ];
        let err = apply_edits("abcdefgh", &edits).unwrap_err();
        assert!(matches!(err, PortError::Internal { .. }));
    }

    #[test]
    fn line_helpers() {
        let source = "one\ntwo  \nthree";
        assert_eq!(end_of_line(source, 1), 4);
        assert_eq!(start_of_line(source, 6), 4);
        assert_eq!(end_of_line(source, 12), source.len());
        assert_eq!(swallow_blank_rest(source, 7), 10);
        assert_eq!(swallow_blank_rest(source, 5), 5);
    }

    #[test]
    fn line_ending_follows_first_line() {
        assert_eq!(line_ending("a\r\nb\n"), "\r\n");
        assert_eq!(line_ending("a\nb\r\n"), "\n");
        assert_eq!(line_ending("no newline"), "\n");
        assert_eq!(with_line_ending("x\ny\n", "\r\n"), "x\r\ny\r\n");
        assert_eq!(with_line_ending("x\ny\n", "\n"), "x\ny\n");
    }

    #[test]
    fn empty_edit_list_is_skipped() {
        let outcome = StepOutcome::from_edits("text", Vec::new(), "nothing matched").unwrap();
        assert_eq!(outcome.text, "text");
        assert_eq!(
            outcome.status,
            StepStatus::Skipped {
                reason: "nothing matched".to_string()
            }
        );
    }
}
