//! Per-document dimming sessions
//!
//! A session owns the cached scan output and scheduling state for one open
//! document, keyed by a stable document id with an explicit create/replace/
//! remove lifecycle. The manager carries the enable/disable/toggle surface
//! the host exposes as commands.

use std::collections::HashMap;
use std::time::Duration;

use crate::config::Config;
use crate::document::Document;
use crate::engine::{scan, scan_window, TierBuckets};
use crate::position::TextRange;
use crate::schedule::{Clock, RescanScheduler, ScanDecision, SystemClock};

/// Receiver for scan output.
///
/// Each `apply` replaces the document's previous output wholesale; `clear`
/// removes it. Output is never additive across scans.
pub trait RenderSink {
    fn apply(&mut self, doc_id: &str, buckets: &TierBuckets);
    fn clear(&mut self, doc_id: &str);
}

/// Dimming state for one open document
pub struct Session {
    enabled: bool,
    cache: Option<TierBuckets>,
    scheduler: RescanScheduler,
}

impl Session {
    fn new(cooldown: Duration) -> Self {
        Self {
            enabled: true,
            cache: None,
            scheduler: RescanScheduler::new(cooldown),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Output of the last scan, if no content change invalidated it
    pub fn cached(&self) -> Option<&TierBuckets> {
        self.cache.as_ref()
    }
}

/// Owner of all per-document sessions
pub struct SessionManager {
    sessions: HashMap<String, Session>,
    cooldown: Duration,
    clock: Box<dyn Clock>,
}

impl SessionManager {
    pub fn new(cooldown: Duration) -> Self {
        Self::with_clock(cooldown, Box::new(SystemClock))
    }

    /// Create a manager driven by the given clock
    pub fn with_clock(cooldown: Duration, clock: Box<dyn Clock>) -> Self {
        Self {
            sessions: HashMap::new(),
            cooldown,
            clock,
        }
    }

    fn session_mut(&mut self, doc_id: &str) -> &mut Session {
        let cooldown = self.cooldown;
        self.sessions
            .entry(doc_id.to_string())
            .or_insert_with(|| Session::new(cooldown))
    }

    /// Get a session if one exists for the document
    pub fn session(&self, doc_id: &str) -> Option<&Session> {
        self.sessions.get(doc_id)
    }

    /// Drop a session (when its document is closed)
    pub fn remove(&mut self, doc_id: &str) {
        self.sessions.remove(doc_id);
    }

    pub fn is_enabled(&self, doc_id: &str) -> bool {
        self.sessions.get(doc_id).is_some_and(|s| s.enabled)
    }

    /// Enable dimming, creating the session on first use
    pub fn enable(&mut self, doc_id: &str) {
        self.session_mut(doc_id).enabled = true;
    }

    /// Disable dimming and immediately clear the rendered output.
    /// Any pending deferred scan is superseded.
    pub fn disable(&mut self, doc_id: &str, sink: &mut dyn RenderSink) {
        let session = self.session_mut(doc_id);
        session.enabled = false;
        session.cache = None;
        session.scheduler.reset();
        sink.clear(doc_id);
    }

    /// Flip the enabled state, returning the new state
    pub fn toggle(&mut self, doc_id: &str, sink: &mut dyn RenderSink) -> bool {
        if self.is_enabled(doc_id) {
            self.disable(doc_id, sink);
            false
        } else {
            self.enable(doc_id);
            true
        }
    }

    pub fn focus(&mut self, doc_id: &str) {
        log::debug!("{doc_id}: focus");
    }

    pub fn blur(&mut self, doc_id: &str) {
        log::debug!("{doc_id}: blur");
    }

    /// The document text changed: the cached output is stale.
    ///
    /// Returns the scheduling decision, or None when the session is
    /// disabled and no scan should run.
    pub fn content_changed(&mut self, doc_id: &str) -> Option<ScanDecision> {
        let now = self.clock.now();
        let session = self.session_mut(doc_id);
        session.cache = None;
        if !session.enabled {
            return None;
        }
        Some(session.scheduler.request(now))
    }

    /// The configuration changed: adopt the new cooldown and request a scan
    pub fn config_changed(&mut self, doc_id: &str, config: &Config) -> Option<ScanDecision> {
        self.cooldown = Duration::from_millis(config.rescan_period_ms);
        let now = self.clock.now();
        let cooldown = self.cooldown;
        let session = self.session_mut(doc_id);
        session.scheduler.set_cooldown(cooldown);
        session.cache = None;
        if !session.enabled {
            return None;
        }
        Some(session.scheduler.request(now))
    }

    /// Claim a deferred scan that has come due
    pub fn poll(&mut self, doc_id: &str) -> bool {
        let now = self.clock.now();
        self.session_mut(doc_id).scheduler.take_due(now)
    }

    /// Run one scan cycle for the document and hand the result to the sink,
    /// replacing whatever was rendered before. Returns false when disabled.
    pub fn rescan(
        &mut self,
        doc_id: &str,
        doc: &Document,
        config: &Config,
        exclusions: &[TextRange],
        sink: &mut dyn RenderSink,
    ) -> bool {
        let now = self.clock.now();
        let session = self.session_mut(doc_id);
        if !session.enabled {
            return false;
        }
        log::debug!("{doc_id}: scanning");
        let rules = config.rules_for(doc.extension());
        let window = scan_window(doc, config.scan_line_limit);
        let buckets = scan(doc, &rules, window, exclusions);
        sink.apply(doc_id, &buckets);
        session.cache = Some(buckets);
        session.scheduler.completed(now);
        log::debug!("{doc_id}: done");
        true
    }
}
