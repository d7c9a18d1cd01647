//! Dimming rules
//!
//! A rule either matches within a single line, or pairs a start pattern
//! with a later end pattern under a bounded search window. Every rule
//! carries the tier its matches are bucketed into.

use regex::Regex;

use crate::error::{DimlyError, Result};

/// Visual-intensity tier, ordered from most to least emphasized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Max,
    Mid,
    Min,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Max, Tier::Mid, Tier::Min];

    /// Get the config name for this tier
    pub fn name(self) -> &'static str {
        match self {
            Tier::Max => "max",
            Tier::Mid => "mid",
            Tier::Min => "min",
        }
    }

    /// Parse a tier from its config name
    pub fn from_name(name: &str) -> Option<Tier> {
        match name {
            "max" => Some(Tier::Max),
            "mid" => Some(Tier::Mid),
            "min" => Some(Tier::Min),
            _ => None,
        }
    }
}

/// A rule matched independently within a single line
#[derive(Debug, Clone)]
pub struct OneLineRule {
    /// Compiled regex pattern
    pub pattern: Regex,
    /// Tier to bucket matches into
    pub tier: Tier,
    /// Reject matches whose own span leaves brackets unbalanced
    pub balanced: bool,
}

impl OneLineRule {
    /// Create a new single-line rule
    pub fn new(pattern: &str, tier: Tier) -> Result<Self> {
        Ok(Self {
            pattern: compile(pattern)?,
            tier,
            balanced: false,
        })
    }
}

/// A rule spanning from a start match to a later end match
#[derive(Debug, Clone)]
pub struct PairedRule {
    /// Pattern that opens the span
    pub start: Regex,
    /// Pattern that closes the span
    pub end: Regex,
    /// Tier to bucket matches into
    pub tier: Tier,
    /// How many lines past the start match the end pattern may appear.
    /// Zero leaves no window, so the rule never matches.
    pub max_lines_between: u32,
    /// Stop the end search where the scope around the start match closes
    pub same_scope: bool,
}

impl PairedRule {
    /// Create a new paired rule
    pub fn new(
        start: &str,
        end: &str,
        tier: Tier,
        max_lines_between: u32,
        same_scope: bool,
    ) -> Result<Self> {
        Ok(Self {
            start: compile(start)?,
            end: compile(end)?,
            tier,
            max_lines_between,
            same_scope,
        })
    }
}

/// A dimming rule of either shape
#[derive(Debug, Clone)]
pub enum Rule {
    OneLine(OneLineRule),
    Paired(PairedRule),
}

impl Rule {
    /// The tier this rule's matches are bucketed into
    pub fn tier(&self) -> Tier {
        match self {
            Rule::OneLine(rule) => rule.tier,
            Rule::Paired(rule) => rule.tier,
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| DimlyError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
