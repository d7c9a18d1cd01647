//! Coalescing of overlapping ranges
//!
//! Repeated occurrences of one rule and matches from different rules can
//! produce overlapping spans; the renderer must receive disjoint ranges.

use crate::position::TextRange;

/// Sort `ranges` ascending and merge every pair that overlaps or touches.
///
/// The output is disjoint, sorted by start, covers exactly the union of the
/// input, and is a fixed point: merging it again changes nothing.
pub fn merge_overlapping(mut ranges: Vec<TextRange>) -> Vec<TextRange> {
    ranges.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));
    let mut merged: Vec<TextRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => {
                if range.end > last.end {
                    last.end = range.end;
                }
            }
            _ => merged.push(range),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::TextPosition;

    #[test]
    fn test_disjoint_ranges_sorted() {
        let merged = merge_overlapping(vec![
            TextRange::single_line(2, 0, 3),
            TextRange::single_line(0, 1, 4),
        ]);
        assert_eq!(
            merged,
            vec![
                TextRange::single_line(0, 1, 4),
                TextRange::single_line(2, 0, 3),
            ]
        );
    }

    #[test]
    fn test_overlapping_ranges_merge() {
        let merged = merge_overlapping(vec![
            TextRange::single_line(0, 0, 5),
            TextRange::single_line(0, 3, 9),
        ]);
        assert_eq!(merged, vec![TextRange::single_line(0, 0, 9)]);
    }

    #[test]
    fn test_touching_ranges_merge() {
        let merged = merge_overlapping(vec![
            TextRange::single_line(0, 0, 4),
            TextRange::single_line(0, 4, 8),
        ]);
        assert_eq!(merged, vec![TextRange::single_line(0, 0, 8)]);
    }

    #[test]
    fn test_contained_range_absorbed() {
        let merged = merge_overlapping(vec![
            TextRange::new(TextPosition::new(0, 0), TextPosition::new(3, 0)),
            TextRange::single_line(1, 2, 5),
        ]);
        assert_eq!(
            merged,
            vec![TextRange::new(TextPosition::new(0, 0), TextPosition::new(3, 0))]
        );
    }

    #[test]
    fn test_idempotent() {
        let input = vec![
            TextRange::single_line(0, 0, 2),
            TextRange::single_line(0, 1, 5),
            TextRange::single_line(2, 0, 1),
            TextRange::new(TextPosition::new(0, 4), TextPosition::new(1, 0)),
        ];
        let once = merge_overlapping(input);
        let twice = merge_overlapping(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_output_disjoint() {
        let merged = merge_overlapping(vec![
            TextRange::single_line(0, 0, 3),
            TextRange::single_line(0, 5, 8),
            TextRange::single_line(0, 2, 4),
        ]);
        for pair in merged.windows(2) {
            assert!(pair[0].end < pair[1].start);
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(merge_overlapping(Vec::new()), Vec::new());
    }
}
