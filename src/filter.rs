//! Probe selection for --probes expressions
//!
//! Supports:
//! - Individual probes: --probes io__entry,io__return
//! - Regex patterns: --probes '/^gc__.*/'
//! - Mixed: --probes 'monitor__wait,/^io__/'

use anyhow::{bail, Context, Result};
use regex::Regex;
use std::collections::HashSet;

use crate::event::RawEvent;

/// Filter that determines which probes take part in bucketing
#[derive(Debug, Clone)]
pub struct ProbeFilter {
    /// Exact probe names (None = all probes)
    names: Option<HashSet<String>>,
    patterns: Vec<Regex>,
}

impl ProbeFilter {
    /// Create a filter that keeps every probe
    pub fn all() -> Self {
        Self {
            names: None,
            patterns: Vec::new(),
        }
    }

    /// Parse a comma-separated probe list; `/.../` entries are regexes
    pub fn from_spec(spec: &str) -> Result<Self> {
        let mut names = HashSet::new();
        let mut patterns = Vec::new();

        for part in spec.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            if let Some(pattern) = part.strip_prefix('/') {
                let Some(pattern) = pattern.strip_suffix('/') else {
                    bail!("Unterminated regex in probe list: {}", part);
                };
                let regex = Regex::new(pattern)
                    .with_context(|| format!("Invalid probe regex: {}", pattern))?;
                patterns.push(regex);
            } else {
                names.insert(part.to_string());
            }
        }

        Ok(Self {
            names: Some(names),
            patterns,
        })
    }

    /// Check if events of `probe` should be kept
    pub fn should_keep(&self, probe: &str) -> bool {
        match &self.names {
            None => true,
            Some(set) => set.contains(probe) || self.patterns.iter().any(|re| re.is_match(probe)),
        }
    }

    /// Keep only the events whose probe passes the filter
    pub fn apply<'a>(&self, events: &'a [RawEvent]) -> Vec<&'a RawEvent> {
        events
            .iter()
            .filter(|event| self.should_keep(&event.probe_name))
            .collect()
    }
}

impl Default for ProbeFilter {
    fn default() -> Self {
        Self::all()
    }
}
