//! Truncation engine for variable-length, multi-line text blocks
//!
//! Decides how much of a text is shown collapsed and whether an expand
//! affordance is needed. The char-limit cut is a hard cut on a character
//! boundary: it does not look for word or line boundaries, and existing
//! rendered output depends on that.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::expansion::ExpansionState;

pub const DEFAULT_LINE_LIMIT: usize = 3;
pub const DEFAULT_CHAR_LIMIT: usize = 300;

/// Appended to a collapsed preview that hides part of the content
pub const ELLIPSIS: &str = "...";

/// Limits applied to the collapsed view of a text block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayLimits {
    /// Max lines shown collapsed
    pub line_limit: usize,
    /// Max characters shown collapsed
    pub char_limit: usize,
}

impl Default for DisplayLimits {
    fn default() -> Self {
        Self {
            line_limit: DEFAULT_LINE_LIMIT,
            char_limit: DEFAULT_CHAR_LIMIT,
        }
    }
}

impl DisplayLimits {
    /// Create limits; zero is clamped to one
    pub fn new(line_limit: usize, char_limit: usize) -> Self {
        Self {
            line_limit: line_limit.max(1),
            char_limit: char_limit.max(1),
        }
    }

    pub fn with_line_limit(mut self, line_limit: usize) -> Self {
        self.line_limit = line_limit.max(1);
        self
    }

    pub fn with_char_limit(mut self, char_limit: usize) -> Self {
        self.char_limit = char_limit.max(1);
        self
    }
}

/// Outcome of applying [`DisplayLimits`] to a text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TruncationResult {
    /// Prefix of the normalized content shown while collapsed
    pub preview: String,
    /// True iff the normalized content is longer than `preview`
    pub is_truncated: bool,
}

/// Normalize CRLF line endings to LF
pub fn normalize(content: &str) -> Cow<'_, str> {
    if content.contains("\r\n") {
        Cow::Owned(content.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(content)
    }
}

/// Compute the collapsed preview of `content`.
///
/// Absent content is treated as empty. Never fails.
pub fn compute_preview(content: Option<&str>, limits: DisplayLimits) -> TruncationResult {
    let normalized = normalize(content.unwrap_or_default());
    preview_normalized(&normalized, limits)
}

fn preview_normalized(normalized: &str, limits: DisplayLimits) -> TruncationResult {
    let line_limit = limits.line_limit.max(1);
    let char_limit = limits.char_limit.max(1);
    let line_count = normalized.matches('\n').count() + 1;

    if line_count > line_limit {
        // The line_limit-th break exists because there are more lines than the limit
        let cut = normalized
            .match_indices('\n')
            .nth(line_limit - 1)
            .map(|(index, _)| index)
            .unwrap_or(normalized.len());
        TruncationResult {
            preview: take_chars(&normalized[..cut], char_limit).to_string(),
            is_truncated: true,
        }
    } else if normalized.chars().count() > char_limit {
        TruncationResult {
            preview: take_chars(normalized, char_limit).to_string(),
            is_truncated: true,
        }
    } else {
        TruncationResult {
            preview: normalized.to_string(),
            is_truncated: false,
        }
    }
}

/// First `n` characters of `s`
fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((index, _)) => &s[..index],
        None => s,
    }
}

/// A titled text block with its precomputed preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TruncatableText {
    pub title: String,
    /// Full content, line endings normalized
    pub content: String,
    pub preview: String,
    pub is_truncated: bool,
}

impl TruncatableText {
    pub fn new(title: impl Into<String>, content: Option<&str>, limits: DisplayLimits) -> Self {
        let content = normalize(content.unwrap_or_default()).into_owned();
        let TruncationResult {
            preview,
            is_truncated,
        } = preview_normalized(&content, limits);
        Self {
            title: title.into(),
            content,
            preview,
            is_truncated,
        }
    }

    /// Text shown for the given expansion state
    pub fn displayed(&self, state: ExpansionState) -> Cow<'_, str> {
        if state.is_expanded() {
            Cow::Borrowed(&self.content)
        } else if self.is_truncated {
            Cow::Owned(format!("{}{}", self.preview, ELLIPSIS))
        } else {
            Cow::Borrowed(&self.preview)
        }
    }

    /// The expand/collapse affordance is only offered for truncated text
    pub fn shows_toggle(&self) -> bool {
        self.is_truncated
    }

    pub fn toggle_label(&self, state: ExpansionState) -> Option<&'static str> {
        if !self.is_truncated {
            return None;
        }
        Some(if state.is_expanded() {
            "Show Less"
        } else {
            "Show More"
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(line_limit: usize, char_limit: usize) -> DisplayLimits {
        DisplayLimits::new(line_limit, char_limit)
    }

    #[test]
    fn test_default_limits() {
        let limits = DisplayLimits::default();
        assert_eq!(limits.line_limit, 3);
        assert_eq!(limits.char_limit, 300);
    }

    #[test]
    fn test_empty_content_not_truncated() {
        let result = compute_preview(Some(""), DisplayLimits::default());
        assert!(!result.is_truncated);
        assert_eq!(result.preview, "");

        let missing = compute_preview(None, limits(1, 1));
        assert!(!missing.is_truncated);
        assert_eq!(missing.preview, "");
    }

    #[test]
    fn test_short_content_shown_whole() {
        let result = compute_preview(Some("hi"), DisplayLimits::default());
        assert!(!result.is_truncated);
        assert_eq!(result.preview, "hi");
    }

    #[test]
    fn test_more_lines_than_limit() {
        let content = "line one\nline two\nline three\nline four";
        let result = compute_preview(Some(content), DisplayLimits::default());
        assert!(result.is_truncated);
        assert_eq!(result.preview, "line one\nline two\nline three");
    }

    #[test]
    fn test_exactly_line_limit_within_chars() {
        let content = "a\nb\nc";
        let result = compute_preview(Some(content), DisplayLimits::default());
        assert!(!result.is_truncated);
        assert_eq!(result.preview, content);
    }

    #[test]
    fn test_single_long_line_hard_cut() {
        let content = "x".repeat(400);
        let result = compute_preview(Some(&content), DisplayLimits::default());
        assert!(result.is_truncated);
        assert_eq!(result.preview, "x".repeat(300));
    }

    #[test]
    fn test_line_cut_then_char_cut() {
        let content = format!("{}\n{}\nshort\nhidden", "a".repeat(8), "b".repeat(8));
        let result = compute_preview(Some(&content), limits(3, 10));
        assert!(result.is_truncated);
        assert_eq!(result.preview, format!("{}\nb", "a".repeat(8)));
    }

    #[test]
    fn test_char_cut_may_split_words() {
        let result = compute_preview(Some("hello world"), limits(3, 7));
        assert_eq!(result.preview, "hello w");
        assert!(result.is_truncated);
    }

    #[test]
    fn test_crlf_normalized_before_split() {
        let result = compute_preview(Some("a\r\nb\r\nc\r\nd"), DisplayLimits::default());
        assert!(result.is_truncated);
        assert_eq!(result.preview, "a\nb\nc");
    }

    #[test]
    fn test_multibyte_cut_on_char_boundary() {
        let content = "é".repeat(5);
        let result = compute_preview(Some(&content), limits(3, 3));
        assert_eq!(result.preview, "ééé");
        assert!(result.is_truncated);
    }

    #[test]
    fn test_zero_limits_clamped() {
        let limits = DisplayLimits::new(0, 0);
        assert_eq!(limits, DisplayLimits::new(1, 1));
        let result = compute_preview(Some("ab"), limits);
        assert_eq!(result.preview, "a");
    }

    #[test]
    fn test_preview_is_prefix_and_idempotent() {
        let samples = [
            "",
            "one",
            "a\nb\nc\nd\ne",
            "trailing newline\n\n\n\n",
            "\n\n\n",
            "word ".repeat(100).as_str(),
        ]
        .map(str::to_string);

        for sample in &samples {
            for (line_limit, char_limit) in [(1, 1), (2, 5), (3, 300), (5, 40)] {
                let limits = limits(line_limit, char_limit);
                let first = compute_preview(Some(sample), limits);
                assert!(sample.starts_with(&first.preview));
                assert!(first.preview.lines().count() <= line_limit);
                assert!(first.preview.chars().count() <= char_limit);

                let second = compute_preview(Some(&first.preview), limits);
                assert_eq!(second.preview, first.preview);
                assert!(!second.is_truncated);
            }
        }
    }

    #[test]
    fn test_truncatable_text_display() {
        let block = TruncatableText::new("Summary", Some("1\n2\n3\n4"), DisplayLimits::default());
        assert!(block.shows_toggle());
        assert_eq!(block.displayed(ExpansionState::Collapsed), "1\n2\n3...");
        assert_eq!(block.displayed(ExpansionState::Expanded), "1\n2\n3\n4");
        assert_eq!(block.toggle_label(ExpansionState::Collapsed), Some("Show More"));
        assert_eq!(block.toggle_label(ExpansionState::Expanded), Some("Show Less"));
    }

    #[test]
    fn test_untruncated_text_has_no_toggle_or_ellipsis() {
        let block = TruncatableText::new("Summary", Some("hi"), DisplayLimits::default());
        assert!(!block.shows_toggle());
        assert_eq!(block.displayed(ExpansionState::Collapsed), "hi");
        assert_eq!(block.toggle_label(ExpansionState::Collapsed), None);
    }

    #[test]
    fn test_toggle_twice_restores_rendering() {
        let block = TruncatableText::new("Raw", Some(&"z".repeat(500)), DisplayLimits::default());
        let state = ExpansionState::default();
        let before = block.displayed(state).into_owned();
        let after = block.displayed(state.toggled().toggled()).into_owned();
        assert_eq!(before, after);
    }
}
