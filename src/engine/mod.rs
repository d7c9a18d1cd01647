//! The rule-matching and range-computation engine
//!
//! Turns a set of declarative rules into a minimal, non-overlapping,
//! tier-bucketed set of text ranges over a document snapshot:
//! - Single-line rules match a regex within one line
//! - Paired rules span from a start match to an end match, bounded by a
//!   line-count window and optional bracket-scope restriction
//! - Matched ranges are merged per tier into disjoint sorted lists

mod matcher;
mod merge;
mod rules;
mod scan;
mod scanner;
mod scope;

pub use matcher::find_paired_match;
pub use merge::merge_overlapping;
pub use rules::{OneLineRule, PairedRule, Rule, Tier};
pub use scan::{scan, scan_range_for_rule, scan_window, TierBuckets};
pub use scanner::{find_first_match, find_first_match_in_line};
pub use scope::find_scope_exit;
