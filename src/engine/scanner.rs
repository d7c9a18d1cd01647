//! Line-by-line regex scanning over a bounded document range

use regex::Regex;

use super::scope;
use crate::document::Document;
use crate::position::TextRange;

/// Find the first match of `regex` inside `range`.
///
/// Lines are visited in ascending order and the first match wins, so ties
/// break to the earliest line, then the leftmost column. The first line is
/// clipped at `range.start.column` and the last at `range.end.column`;
/// lines past the end of the document are skipped. With `balanced_only`
/// set, matches whose own span leaves brackets unbalanced are rejected.
pub fn find_first_match(
    doc: &Document,
    range: TextRange,
    regex: &Regex,
    balanced_only: bool,
) -> Option<TextRange> {
    if range.is_empty() {
        return None;
    }
    for line_idx in range.start.line..=range.end.line {
        let line = match doc.line(line_idx) {
            Some(line) => line,
            None => continue,
        };
        let start_byte = if line_idx == range.start.line {
            line.utf16_to_byte(range.start.column)
        } else {
            0
        };
        let end_byte = if line_idx == range.end.line {
            line.utf16_to_byte(range.end.column)
        } else {
            line.len()
        };
        if start_byte > end_byte {
            continue;
        }
        let segment = &line.text()[start_byte..end_byte];
        if let Some((col, len)) = find_in_segment(segment, regex, balanced_only) {
            let offset = line.byte_to_utf16(start_byte);
            return Some(TextRange::single_line(
                line_idx,
                offset + col,
                offset + col + len,
            ));
        }
    }
    None
}

/// Find the first match in a single line of text.
///
/// Returns the match's UTF-16 column and length.
pub fn find_first_match_in_line(text: &str, regex: &Regex) -> Option<(usize, usize)> {
    find_in_segment(text, regex, false)
}

fn find_in_segment(text: &str, regex: &Regex, balanced_only: bool) -> Option<(usize, usize)> {
    let mut at = 0;
    while at <= text.len() {
        let m = regex.find(&text[at..])?;
        let (start, end) = (at + m.start(), at + m.end());
        if start == end {
            // Zero-width match: nothing to emit, step past it
            match text[end..].chars().next() {
                Some(ch) => {
                    at = end + ch.len_utf8();
                    continue;
                }
                None => return None,
            }
        }
        if balanced_only && scope::net_balance(&text[start..end]) != 0 {
            at = end;
            continue;
        }
        return Some((utf16_len(&text[..start]), utf16_len(&text[start..end])));
    }
    None
}

fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::TextPosition;

    fn regex(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    #[test]
    fn test_match_in_line() {
        assert_eq!(find_first_match_in_line("abc 123 def", &regex(r"\d+")), Some((4, 3)));
        assert_eq!(find_first_match_in_line("no numbers", &regex(r"\d+")), None);
    }

    #[test]
    fn test_match_in_line_utf16_columns() {
        // "😀" is two UTF-16 units, so "123" starts at column 3
        assert_eq!(find_first_match_in_line("a😀123", &regex(r"\d+")), Some((3, 3)));
    }

    #[test]
    fn test_first_match_earliest_line_wins() {
        let doc = Document::from_text("test", "none\nfoo 1\nfoo 2");
        let found = find_first_match(&doc, doc.full_range(), &regex(r"foo \d"), false).unwrap();
        assert_eq!(found, TextRange::single_line(1, 0, 5));
    }

    #[test]
    fn test_first_line_clipped_and_columns_absolute() {
        let doc = Document::from_text("test", "xx yy xx");
        let range = TextRange::new(TextPosition::new(0, 3), TextPosition::new(0, 8));
        let found = find_first_match(&doc, range, &regex("xx"), false).unwrap();
        // The match before the clip point is not seen; the one after keeps
        // its absolute column
        assert_eq!(found, TextRange::single_line(0, 6, 8));
    }

    #[test]
    fn test_last_line_clipped() {
        let doc = Document::from_text("test", "aa\nbb cc");
        let range = TextRange::new(TextPosition::ZERO, TextPosition::new(1, 2));
        assert_eq!(find_first_match(&doc, range, &regex("cc"), false), None);
        assert_eq!(
            find_first_match(&doc, range, &regex("bb"), false),
            Some(TextRange::single_line(1, 0, 2))
        );
    }

    #[test]
    fn test_lines_past_document_end_skipped() {
        let doc = Document::from_text("test", "only");
        let range = TextRange::new(TextPosition::ZERO, TextPosition::new(10, 0));
        assert_eq!(
            find_first_match(&doc, range, &regex("only"), false),
            Some(TextRange::single_line(0, 0, 4))
        );
    }

    #[test]
    fn test_empty_range() {
        let doc = Document::from_text("test", "text");
        let range = TextRange::single_line(0, 2, 2);
        assert_eq!(find_first_match(&doc, range, &regex("t"), false), None);
    }

    #[test]
    fn test_zero_width_matches_skipped() {
        // `a*` matches empty at every position; only the real run is reported
        assert_eq!(find_first_match_in_line("xxaax", &regex("a*")), Some((2, 2)));
        assert_eq!(find_first_match_in_line("xxx", &regex("a*")), None);
    }

    #[test]
    fn test_balanced_filter_rejects_partial_braces() {
        let doc = Document::from_text("test", "call(arg) open( done");
        // Without the filter the earlier, unbalanced candidate wins
        let found = find_first_match(&doc, doc.full_range(), &regex(r"\w+\("), false).unwrap();
        assert_eq!(found, TextRange::single_line(0, 0, 5));
        // With it, scanning resumes past the rejected candidates
        assert_eq!(
            find_first_match(&doc, doc.full_range(), &regex(r"\w+\(\w+\)"), true),
            Some(TextRange::single_line(0, 0, 9))
        );
        assert_eq!(
            find_first_match(&doc, doc.full_range(), &regex(r"open\("), true),
            None
        );
    }
}
