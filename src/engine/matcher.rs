//! Pairing of start and end matches for multi-line rules

use super::rules::PairedRule;
use super::{scanner, scope};
use crate::document::Document;
use crate::position::{TextPosition, TextRange};

/// Find the first start/end pair for `rule` inside `range`.
///
/// The end pattern is searched in a window starting right after the start
/// match, bounded by `max_lines_between` and, with `same_scope`, by the
/// point where the scope enclosing the start match closes. An occurrence
/// whose end pattern falls outside its window contributes nothing and is
/// not retried with the scope restriction relaxed; the search resumes
/// right after that start match.
pub fn find_paired_match(doc: &Document, range: TextRange, rule: &PairedRule) -> Option<TextRange> {
    let mut search = range;
    loop {
        let start = scanner::find_first_match(doc, search, &rule.start, false)?;
        if let Some(window) = end_search_window(doc, search, &start, rule.max_lines_between) {
            let window = if rule.same_scope {
                restrict_to_scope(doc, window)
            } else {
                window
            };
            if let Some(end) = scanner::find_first_match(doc, window, &rule.end, false) {
                return Some(TextRange::new(start.start, end.end));
            }
        }
        if start.end >= range.end {
            return None;
        }
        search = TextRange::new(start.end, range.end);
    }
}

/// The window for the end search: from just after the start match, at most
/// `max_lines` further lines, never past `range.end`
fn end_search_window(
    doc: &Document,
    range: TextRange,
    start_match: &TextRange,
    max_lines: u32,
) -> Option<TextRange> {
    if max_lines == 0 {
        return None;
    }
    let from = start_match.end;
    let limit_line = start_match.end.line + max_lines as usize;
    let end = if limit_line < range.end.line {
        TextPosition::new(limit_line, doc.line_utf16_len(limit_line).unwrap_or(0))
    } else {
        range.end
    };
    if from >= end {
        return None;
    }
    Some(TextRange::new(from, end))
}

/// Truncate `window` at the first point where bracket depth drops below the
/// level right after the start match. When the scope never exits inside the
/// window, the window is returned unchanged.
fn restrict_to_scope(doc: &Document, window: TextRange) -> TextRange {
    let mut depth = 0;
    for line_idx in window.start.line..=window.end.line {
        let line = match doc.line(line_idx) {
            Some(line) => line,
            None => continue,
        };
        let start_byte = if line_idx == window.start.line {
            line.utf16_to_byte(window.start.column)
        } else {
            0
        };
        let end_byte = if line_idx == window.end.line {
            line.utf16_to_byte(window.end.column)
        } else {
            line.len()
        };
        if start_byte > end_byte {
            continue;
        }
        let (exit, carry) = scope::find_scope_exit(&line.text()[start_byte..end_byte], depth);
        if let Some(col) = exit {
            let offset = line.byte_to_utf16(start_byte);
            return TextRange::new(window.start, TextPosition::new(line_idx, offset + col));
        }
        depth = carry;
    }
    window
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rules::Tier;

    fn paired(start: &str, end: &str, max_lines: u32, same_scope: bool) -> PairedRule {
        PairedRule::new(start, end, Tier::Mid, max_lines, same_scope).unwrap()
    }

    #[test]
    fn test_pair_on_adjacent_lines() {
        let doc = Document::from_text("test", "begin\nbody\nend");
        let rule = paired("begin", "end", 5, false);
        let found = find_paired_match(&doc, doc.full_range(), &rule).unwrap();
        assert_eq!(found.start, TextPosition::new(0, 0));
        assert_eq!(found.end, TextPosition::new(2, 3));
    }

    #[test]
    fn test_pair_within_one_line() {
        let doc = Document::from_text("test", "begin middle end");
        let rule = paired("begin", "end", 1, false);
        let found = find_paired_match(&doc, doc.full_range(), &rule).unwrap();
        assert_eq!(found, TextRange::single_line(0, 0, 16));
    }

    #[test]
    fn test_window_bound_respected() {
        let doc = Document::from_text("test", "begin\na\nb\nc\nend");
        // End sits 4 lines after the start match
        let reachable = paired("begin", "end", 4, false);
        assert!(find_paired_match(&doc, doc.full_range(), &reachable).is_some());
        let short = paired("begin", "end", 3, false);
        assert_eq!(find_paired_match(&doc, doc.full_range(), &short), None);
    }

    #[test]
    fn test_zero_window_never_matches() {
        let doc = Document::from_text("test", "begin end");
        let rule = paired("begin", "end", 0, false);
        assert_eq!(find_paired_match(&doc, doc.full_range(), &rule), None);
    }

    #[test]
    fn test_no_end_match_fails() {
        let doc = Document::from_text("test", "begin\nbody\nmore");
        let rule = paired("begin", "end", 5, false);
        assert_eq!(find_paired_match(&doc, doc.full_range(), &rule), None);
    }

    #[test]
    fn test_scope_exit_truncates_end_search() {
        // The paren opened on the start line never rebalances before the
        // `)` at line 3, so the end pattern past it must not be found
        let doc = Document::from_text("test", "foo( bar\n\n\n)\nend");
        let rule = paired(r"foo\(", "end", 10, true);
        assert_eq!(find_paired_match(&doc, doc.full_range(), &rule), None);
        // Relaxing the scope restriction finds it
        let relaxed = paired(r"foo\(", "end", 10, false);
        assert!(find_paired_match(&doc, doc.full_range(), &relaxed).is_some());
    }

    #[test]
    fn test_end_before_scope_exit_matches() {
        let doc = Document::from_text("test", "foo( bar\nend\n)");
        let rule = paired(r"foo\(", "end", 10, true);
        let found = find_paired_match(&doc, doc.full_range(), &rule).unwrap();
        assert_eq!(found.end, TextPosition::new(1, 3));
    }

    #[test]
    fn test_scope_never_exits_degrades_to_line_window() {
        // Balanced brackets all the way down: the line-count window stands
        let doc = Document::from_text("test", "begin (a)\n[b]\nend");
        let rule = paired("begin", "end", 5, true);
        assert!(find_paired_match(&doc, doc.full_range(), &rule).is_some());
    }

    #[test]
    fn test_scope_exit_on_start_line() {
        // The `)` right after the start match closes the enclosing scope
        let doc = Document::from_text("test", "wrap(begin) end");
        let rule = paired("begin", "end", 2, true);
        assert_eq!(find_paired_match(&doc, doc.full_range(), &rule), None);
    }

    #[test]
    fn test_failed_occurrence_resumes_after_start() {
        // The first `begin` finds no `end` inside its one-line window; the
        // later occurrence still matches
        let doc = Document::from_text("test", "begin\nx\ny\nbegin\nend");
        let rule = paired("begin", "end", 1, false);
        let found = find_paired_match(&doc, doc.full_range(), &rule).unwrap();
        assert_eq!(found.start, TextPosition::new(3, 0));
        assert_eq!(found.end, TextPosition::new(4, 3));
    }

    #[test]
    fn test_start_at_range_end_fails() {
        let doc = Document::from_text("test", "begin");
        let rule = paired("begin", "end", 5, false);
        assert_eq!(find_paired_match(&doc, doc.full_range(), &rule), None);
    }
}
