//! Raw probe events and the recorded probe log format
//!
//! A probe log is the JSON document written by the probe recorder: an object
//! keyed by probe name, each mapping to the list of firings observed for it.
//!
//! ```json
//! {
//!   "io__entry":  [{"pid": 42, "event_time": 1000000000}],
//!   "io__return": [{"pid": 42, "event_time": 1500000000}]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A single probe firing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawEvent {
    pub process_id: u32,
    /// Monotonic timestamp in nanoseconds
    pub timestamp_ns: u64,
    pub probe_name: String,
}

impl RawEvent {
    pub fn new(process_id: u32, timestamp_ns: u64, probe_name: impl Into<String>) -> Self {
        Self {
            process_id,
            timestamp_ns,
            probe_name: probe_name.into(),
        }
    }
}

/// One recorded firing as stored in a probe log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRecord {
    pub pid: u32,
    pub event_time: u64,
}

/// Recorded probe firings keyed by probe name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProbeLog {
    probes: BTreeMap<String, Vec<ProbeRecord>>,
}

impl ProbeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a probe log from its JSON representation
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse probe log JSON")
    }

    /// Load a probe log from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read probe log: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid probe log: {}", path.display()))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize probe log")
    }

    /// Append a firing for `probe`
    pub fn record(&mut self, probe: &str, pid: u32, event_time: u64) {
        self.probes
            .entry(probe.to_string())
            .or_default()
            .push(ProbeRecord { pid, event_time });
    }

    pub fn probe_names(&self) -> impl Iterator<Item = &str> {
        self.probes.keys().map(String::as_str)
    }

    /// Total number of recorded firings across all probes
    pub fn event_count(&self) -> usize {
        self.probes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.event_count() == 0
    }

    /// Flatten the log into raw events
    pub fn events(&self) -> Vec<RawEvent> {
        self.probes
            .iter()
            .flat_map(|(probe, records)| {
                records
                    .iter()
                    .map(move |r| RawEvent::new(r.pid, r.event_time, probe.as_str()))
            })
            .collect()
    }
}

impl FromIterator<RawEvent> for ProbeLog {
    fn from_iter<I: IntoIterator<Item = RawEvent>>(iter: I) -> Self {
        let mut log = ProbeLog::new();
        for event in iter {
            log.record(&event.probe_name, event.process_id, event.timestamp_ns);
        }
        log
    }
}
