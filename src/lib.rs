//! dimly - rule-driven source de-emphasis
//!
//! Scans a document against declarative rules (single-line regexes, or
//! start/end pairs bounded by a line-count window and bracket scope) and
//! buckets the matched regions into three intensity tiers for a renderer
//! to dim. Scans are cheap synchronous passes over a bounded window,
//! recomputed from scratch; a cooldown scheduler coalesces bursts of edit
//! events into single rescans.

pub mod config;
pub mod display;
pub mod document;
pub mod engine;
pub mod error;
pub mod line;
pub mod position;
pub mod schedule;
pub mod session;

pub use config::{Config, TierValues};
pub use document::Document;
pub use engine::{OneLineRule, PairedRule, Rule, Tier, TierBuckets};
pub use error::{DimlyError, Result};
pub use position::{TextPosition, TextRange};
pub use session::{RenderSink, SessionManager};
