//! Line context around a match: the enclosing line plus a fixed window of
//! whole lines before and after it.
//!
//! All offsets are byte offsets. Line boundaries are found by searching for
//! `\n`, which is always a character boundary in UTF-8, so slicing at the
//! returned indices never splits a multi-byte sequence.

use serde::Serialize;
use std::ops::Range;

/// Number of whole lines shown before and after a matched line.
pub const CONTEXT_LINES: usize = 3;

/// Start of the line containing `idx`: the index after the nearest `\n`
/// strictly before `idx`, or 0.
pub fn line_start(content: &str, idx: usize) -> usize {
    content[..idx].rfind('\n').map_or(0, |pos| pos + 1)
}

/// End of the line containing `idx`: the index just past the nearest `\n` at
/// or after `idx`, or the end of content.
pub fn line_end(content: &str, idx: usize) -> usize {
    content[idx..]
        .find('\n')
        .map_or(content.len(), |pos| idx + pos + 1)
}

/// Start of a window holding up to `n` whole lines before the line that
/// contains `idx`. Clamps at the start of content.
pub fn lines_before_start(content: &str, idx: usize, n: usize) -> usize {
    let mut cursor = line_start(content, idx);
    for _ in 0..n {
        if cursor == 0 {
            break;
        }
        cursor = line_start(content, cursor - 1);
    }
    cursor
}

/// End of a window holding up to `n` whole lines after a line that ends at
/// `end`. Clamps at the end of content.
pub fn lines_after_end(content: &str, end: usize, n: usize) -> usize {
    let mut cursor = end;
    for _ in 0..n {
        if cursor >= content.len() {
            break;
        }
        cursor = line_end(content, cursor);
    }
    cursor
}

/// End of the line(s) covered by `range`. A match that already consumed its
/// line feed ends its line there.
fn match_line_end(content: &str, range: &Range<usize>) -> usize {
    if range.end > range.start && content.as_bytes()[range.end - 1] == b'\n' {
        range.end
    } else {
        line_end(content, range.end)
    }
}

/// Everything a reviewer needs to judge one occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchContext {
    /// Up to `CONTEXT_LINES` whole lines before the matched line.
    pub lines_before: String,
    /// The full line containing the match (several lines for a multi-line match).
    pub matched_line: String,
    /// Byte range of the match within `matched_line`.
    pub match_range: Range<usize>,
    /// `matched_line` as it reads after substitution.
    pub replacement_line: String,
    /// Byte range of the inserted text within `replacement_line`.
    pub replacement_range: Range<usize>,
    pub match_text: String,
    pub replacement_text: String,
    /// Up to `CONTEXT_LINES` whole lines after the matched line.
    pub lines_after: String,
}

impl MatchContext {
    /// Build the context for the match at `range` in `content`, assuming it
    /// would be replaced by `replacement`.
    pub fn locate(content: &str, range: Range<usize>, replacement: &str) -> Self {
        let start = line_start(content, range.start);
        let end = match_line_end(content, &range);
        let before = lines_before_start(content, range.start, CONTEXT_LINES);
        let after = lines_after_end(content, end, CONTEXT_LINES);

        let matched_line = &content[start..end];
        let local_start = range.start - start;
        let local_end = range.end - start;

        let mut replacement_line = String::with_capacity(
            matched_line.len() - (local_end - local_start) + replacement.len(),
        );
        replacement_line.push_str(&matched_line[..local_start]);
        replacement_line.push_str(replacement);
        replacement_line.push_str(&matched_line[local_end..]);

        MatchContext {
            lines_before: content[before..start].to_string(),
            matched_line: matched_line.to_string(),
            match_range: local_start..local_end,
            replacement_line,
            replacement_range: local_start..local_start + replacement.len(),
            match_text: content[range].to_string(),
            replacement_text: replacement.to_string(),
            lines_after: content[end..after].to_string(),
        }
    }

    /// Build the context for a match that sits between `head` (everything
    /// before the match) and `tail` (the match and everything after it).
    ///
    /// Only the bounded window around the match is copied, so callers that keep
    /// the text in two pieces do not have to join them first.
    pub fn around(head: &str, tail: &str, match_len: usize, replacement: &str) -> Self {
        let from = lines_before_start(head, head.len(), CONTEXT_LINES);
        let to = lines_after_end(tail, match_line_end(tail, &(0..match_len)), CONTEXT_LINES);

        let mut window = String::with_capacity(head.len() - from + to);
        window.push_str(&head[from..]);
        window.push_str(&tail[..to]);

        let offset = head.len() - from;
        Self::locate(&window, offset..offset + match_len, replacement)
    }

    /// Text of the matched line before the match.
    pub fn matched_prefix(&self) -> &str {
        &self.matched_line[..self.match_range.start]
    }

    /// Text of the matched line after the match.
    pub fn matched_suffix(&self) -> &str {
        &self.matched_line[self.match_range.end..]
    }

    pub fn replacement_prefix(&self) -> &str {
        &self.replacement_line[..self.replacement_range.start]
    }

    pub fn replacement_suffix(&self) -> &str {
        &self.replacement_line[self.replacement_range.end..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NINE_LINES: &str =
        "line1\nline2\nline3\nline4\nline5 foo\nline6\nline7\nline8\nline9\n";

    fn locate_first(content: &str, needle: &str, replacement: &str) -> MatchContext {
        let start = content.find(needle).unwrap();
        MatchContext::locate(content, start..start + needle.len(), replacement)
    }

    #[test]
    fn line_bounds_without_line_feeds() {
        assert_eq!(line_start("foo", 1), 0);
        assert_eq!(line_end("foo", 1), 3);
    }

    #[test]
    fn line_bounds_include_trailing_line_feed() {
        let content = "ab\ncd\nef";
        assert_eq!(line_start(content, 4), 3);
        assert_eq!(line_end(content, 4), 6);
        assert_eq!(line_end(content, 7), 8);
    }

    #[test]
    fn single_line_has_no_context() {
        let ctx = locate_first("foo", "foo", "bar");
        assert_eq!(ctx.lines_before, "");
        assert_eq!(ctx.lines_after, "");
        assert_eq!(ctx.matched_line, "foo");
        assert_eq!(ctx.replacement_line, "bar");
    }

    #[test]
    fn window_is_three_lines_each_side() {
        let ctx = locate_first(NINE_LINES, "foo", "bar");
        assert_eq!(ctx.lines_before, "line2\nline3\nline4\n");
        assert_eq!(ctx.matched_line, "line5 foo\n");
        assert_eq!(ctx.lines_after, "line6\nline7\nline8\n");
    }

    #[test]
    fn short_content_returns_what_exists() {
        let ctx = locate_first("line1\nline2 foo\nline3\n", "foo", "bar");
        assert_eq!(ctx.lines_before, "line1\n");
        assert_eq!(ctx.lines_after, "line3\n");
    }

    #[test]
    fn unterminated_last_line_counts_as_a_line_after() {
        let ctx = locate_first("foo\nend", "foo", "bar");
        assert_eq!(ctx.lines_after, "end");
    }

    #[test]
    fn match_on_last_line_has_empty_lines_after() {
        let ctx = locate_first("a\nb\nfoo", "foo", "bar");
        assert_eq!(ctx.lines_before, "a\nb\n");
        assert_eq!(ctx.matched_line, "foo");
        assert_eq!(ctx.lines_after, "");
    }

    #[test]
    fn ranges_point_at_match_and_replacement() {
        let ctx = locate_first("let foo = 1;\n", "foo", "longer");
        assert_eq!(ctx.match_range, 4..7);
        assert_eq!(ctx.replacement_range, 4..10);
        assert_eq!(&ctx.matched_line[ctx.match_range.clone()], "foo");
        assert_eq!(&ctx.replacement_line[ctx.replacement_range.clone()], "longer");
        assert_eq!(ctx.matched_prefix(), ctx.replacement_prefix());
        assert_eq!(ctx.matched_suffix(), ctx.replacement_suffix());
    }

    #[test]
    fn match_ending_in_line_feed_ends_its_line() {
        let content = "a\nfoo\nb\nc\n";
        let ctx = MatchContext::locate(content, 2..6, "bar\n");
        assert_eq!(ctx.matched_line, "foo\n");
        assert_eq!(ctx.lines_after, "b\nc\n");
    }

    #[test]
    fn around_agrees_with_locate_on_joined_text() {
        let head = "l1\nl2\nl3\nl4\nl5 pre ";
        let tail = "foo post\nl6\nl7\nl8\nl9\n";
        let joined = format!("{}{}", head, tail);

        let split = MatchContext::around(head, tail, 3, "bar");
        let whole = MatchContext::locate(&joined, head.len()..head.len() + 3, "bar");
        assert_eq!(split, whole);
        assert_eq!(split.lines_before, "l2\nl3\nl4\n");
        assert_eq!(split.matched_line, "l5 pre foo post\n");
    }

    #[test]
    fn multi_byte_text_is_not_split() {
        let ctx = locate_first("größe\nüber foo ä\nende\n", "foo", "bär");
        assert_eq!(ctx.lines_before, "größe\n");
        assert_eq!(ctx.matched_line, "über foo ä\n");
        assert_eq!(ctx.replacement_line, "über bär ä\n");
        assert_eq!(ctx.lines_after, "ende\n");
    }
}
