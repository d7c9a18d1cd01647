//! Configuration file support
//!
//! Loads rules and tier values from ~/.dimly.toml (or
//! %USERPROFILE%\.dimly.toml on Windows). Parsing is lenient: missing
//! fields fall back to documented defaults and a rule that fails
//! validation is skipped with a warning, leaving the rest of the file
//! intact.
//!
//! Example:
//! ```toml
//! value-for-min-tier = 0.25
//! scan-line-limit = 1000
//! rescan-period-ms = 500
//!
//! [[rules]]
//! pattern = 'log::(trace|debug)!.*$'
//! tier = "min"
//!
//! [[rules]]
//! start = '#\[derive\('
//! end = '\)\]'
//! tier = "mid"
//! max-lines-between = 3
//!
//! [language.rs]
//! rules = [ { pattern = "unsafe", tier = "max" } ]
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use toml::Value;

use crate::engine::{OneLineRule, PairedRule, Rule, Tier};
use crate::error::{DimlyError, Result};

/// Opacity assigned to each tier, in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierValues {
    pub max: f64,
    pub mid: f64,
    pub min: f64,
}

impl Default for TierValues {
    fn default() -> Self {
        Self {
            max: 0.75,
            mid: 0.5,
            min: 0.25,
        }
    }
}

impl TierValues {
    /// Get the opacity for a tier
    pub fn value(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Max => self.max,
            Tier::Mid => self.mid,
            Tier::Min => self.min,
        }
    }
}

/// Fallbacks applied to rules that omit optional fields
#[derive(Debug, Clone, Copy)]
struct RuleDefaults {
    tier: Tier,
    max_lines_between: u32,
    same_scope: bool,
}

impl Default for RuleDefaults {
    fn default() -> Self {
        Self {
            tier: Tier::Mid,
            max_lines_between: 5,
            same_scope: true,
        }
    }
}

/// Engine configuration, consumed read-only once per scan cycle
#[derive(Debug, Clone)]
pub struct Config {
    /// Rules applied to every document, in file order
    pub rules: Vec<Rule>,
    /// Extra rules keyed by file extension, appended after the global ones
    pub language_rules: HashMap<String, Vec<Rule>>,
    /// Opacity per tier
    pub tier_values: TierValues,
    /// Upper bound on the number of lines scanned per cycle
    pub scan_line_limit: usize,
    /// Minimum period between scans, in milliseconds
    pub rescan_period_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            language_rules: HashMap::new(),
            tier_values: TierValues::default(),
            scan_line_limit: 1000,
            rescan_period_ms: 500,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".dimly.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".dimly.toml"))
        }
    }

    /// Load configuration from the default location.
    ///
    /// A missing or malformed file yields the defaults; the malformed case
    /// is logged.
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if let Ok(contents) = fs::read_to_string(&path) {
                match Self::parse(&contents) {
                    Ok(config) => return config,
                    Err(e) => log::warn!("ignoring config at {}: {}", path.display(), e),
                }
            }
        }
        Config::default()
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from TOML contents
    pub fn parse(contents: &str) -> Result<Self> {
        let value: Value = contents.parse()?;
        let mut config = Config::default();
        let table = match value.as_table() {
            Some(table) => table,
            None => return Ok(config),
        };

        let defaults = RuleDefaults {
            tier: table
                .get("default-tier")
                .and_then(Value::as_str)
                .and_then(Tier::from_name)
                .unwrap_or(Tier::Mid),
            max_lines_between: read_u32(table.get("default-max-lines-between")).unwrap_or(5),
            same_scope: table
                .get("default-same-scope")
                .and_then(Value::as_bool)
                .unwrap_or(true),
        };

        if let Some(v) = read_f64(table.get("value-for-max-tier")) {
            config.tier_values.max = v.clamp(0.0, 1.0);
        }
        if let Some(v) = read_f64(table.get("value-for-mid-tier")) {
            config.tier_values.mid = v.clamp(0.0, 1.0);
        }
        if let Some(v) = read_f64(table.get("value-for-min-tier")) {
            config.tier_values.min = v.clamp(0.0, 1.0);
        }
        if let Some(n) = read_u32(table.get("scan-line-limit")) {
            config.scan_line_limit = (n as usize).max(1);
        }
        if let Some(n) = read_u32(table.get("rescan-period-ms")) {
            config.rescan_period_ms = n as u64;
        }

        if let Some(rules) = table.get("rules").and_then(Value::as_array) {
            config.rules = parse_rules(rules, &defaults);
        }

        if let Some(languages) = table.get("language").and_then(Value::as_table) {
            for (ext, entry) in languages {
                if let Some(rules) = entry.get("rules").and_then(Value::as_array) {
                    let parsed = parse_rules(rules, &defaults);
                    if !parsed.is_empty() {
                        config.language_rules.insert(ext.to_lowercase(), parsed);
                    }
                }
            }
        }

        Ok(config)
    }

    /// The effective rule sequence for a document: global rules first, then
    /// any registered for its file extension, order preserved
    pub fn rules_for(&self, extension: Option<&str>) -> Vec<Rule> {
        let mut rules = self.rules.clone();
        if let Some(ext) = extension {
            if let Some(extra) = self.language_rules.get(&ext.to_lowercase()) {
                rules.extend(extra.iter().cloned());
            }
        }
        rules
    }
}

/// Parse a rule array, skipping entries that fail validation
fn parse_rules(entries: &[Value], defaults: &RuleDefaults) -> Vec<Rule> {
    let mut rules = Vec::new();
    for entry in entries {
        match parse_rule(entry, defaults) {
            Ok(rule) => rules.push(rule),
            Err(e) => log::warn!("skipping rule: {}", e),
        }
    }
    rules
}

fn parse_rule(entry: &Value, defaults: &RuleDefaults) -> Result<Rule> {
    let table = entry
        .as_table()
        .ok_or_else(|| DimlyError::Message("rule is not a table".into()))?;

    let tier = match table.get("tier") {
        None => defaults.tier,
        Some(value) => match value.as_str().and_then(Tier::from_name) {
            Some(tier) => tier,
            None => {
                log::warn!("unknown tier {value}, using {}", defaults.tier.name());
                defaults.tier
            }
        },
    };

    if let Some(pattern) = table.get("pattern").and_then(Value::as_str) {
        let mut rule = OneLineRule::new(pattern, tier)?;
        rule.balanced = table
            .get("balanced")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        return Ok(Rule::OneLine(rule));
    }

    let start = table.get("start").and_then(Value::as_str);
    let end = table.get("end").and_then(Value::as_str);
    if let (Some(start), Some(end)) = (start, end) {
        let max_lines_between =
            read_u32(table.get("max-lines-between")).unwrap_or(defaults.max_lines_between);
        let same_scope = table
            .get("same-scope")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.same_scope);
        let rule = PairedRule::new(start, end, tier, max_lines_between, same_scope)?;
        return Ok(Rule::Paired(rule));
    }

    Err(DimlyError::Message(
        "rule needs either 'pattern' or both 'start' and 'end'".into(),
    ))
}

fn read_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Float(f) => Some(*f),
        Value::Integer(i) => Some(*i as f64),
        _ => None,
    }
}

fn read_u32(value: Option<&Value>) -> Option<u32> {
    value?.as_integer().and_then(|i| u32::try_from(i).ok())
}
