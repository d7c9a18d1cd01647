//! Scan orchestration: rule iteration, exclusion filtering, tier bucketing

use super::merge::merge_overlapping;
use super::rules::{Rule, Tier};
use super::{matcher, scanner};
use crate::document::Document;
use crate::position::{TextPosition, TextRange};

/// Per-tier disjoint range lists produced by one scan cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierBuckets {
    pub max: Vec<TextRange>,
    pub mid: Vec<TextRange>,
    pub min: Vec<TextRange>,
}

impl TierBuckets {
    /// Get a tier's ranges
    pub fn bucket(&self, tier: Tier) -> &[TextRange] {
        match tier {
            Tier::Max => &self.max,
            Tier::Mid => &self.mid,
            Tier::Min => &self.min,
        }
    }

    /// Get mutable access to a tier's ranges
    pub fn bucket_mut(&mut self, tier: Tier) -> &mut Vec<TextRange> {
        match tier {
            Tier::Max => &mut self.max,
            Tier::Mid => &mut self.mid,
            Tier::Min => &mut self.min,
        }
    }

    /// Total number of ranges across all tiers
    pub fn len(&self) -> usize {
        self.max.len() + self.mid.len() + self.min.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// All matches of one rule inside `range`, left to right.
///
/// After each match the search resumes at the match's end, so occurrences
/// never overlap and an accepted match is never reconsidered.
pub fn scan_range_for_rule(doc: &Document, range: TextRange, rule: &Rule) -> Vec<TextRange> {
    let mut matches = Vec::new();
    let mut search = range;
    loop {
        let found = match rule {
            Rule::OneLine(rule) => {
                scanner::find_first_match(doc, search, &rule.pattern, rule.balanced)
            }
            Rule::Paired(rule) => matcher::find_paired_match(doc, search, rule),
        };
        let m = match found {
            Some(m) => m,
            None => break,
        };
        matches.push(m);
        if m.end >= range.end {
            break;
        }
        search = TextRange::new(m.end, range.end);
    }
    matches
}

/// Run every rule over `window` and bucket the matches by tier.
///
/// Rules are processed in the order given; a match touching any range in
/// `exclusions` is dropped whole, not clipped. Each tier's ranges are then
/// merged into a disjoint sorted list. Tiers are independent: a span two
/// rules match lands in both their tiers' buckets.
pub fn scan(
    doc: &Document,
    rules: &[Rule],
    window: TextRange,
    exclusions: &[TextRange],
) -> TierBuckets {
    let mut buckets = TierBuckets::default();
    if window.is_empty() {
        return buckets;
    }
    for rule in rules {
        for m in scan_range_for_rule(doc, window, rule) {
            if exclusions.iter().any(|excluded| excluded.touches(&m)) {
                continue;
            }
            buckets.bucket_mut(rule.tier()).push(m);
        }
    }
    for tier in Tier::ALL {
        let bucket = buckets.bucket_mut(tier);
        *bucket = merge_overlapping(std::mem::take(bucket));
    }
    buckets
}

/// The range one scan cycle actually searches: the document extent capped
/// at `scan_line_limit` lines
pub fn scan_window(doc: &Document, scan_line_limit: usize) -> TextRange {
    let full = doc.full_range();
    let limit = TextRange::new(TextPosition::ZERO, TextPosition::new(scan_line_limit, 0));
    full.intersection(&limit).unwrap_or(full)
}
