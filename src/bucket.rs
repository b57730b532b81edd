//! Time-window bucketing of raw probe events
//!
//! Timestamps are reduced to windows in two truncating steps:
//! nanoseconds → milliseconds, then milliseconds → bucket index.
//!
//! ```text
//! window = bucket_size_ms * ((timestamp_ns / 1_000_000) / bucket_size_ms)
//! ```
//!
//! This ordering is kept exactly as is so that outputs stay comparable with
//! existing consumers. With large monotonic timestamps and bucket sizes that
//! don't divide them evenly, windows can land somewhere other than where a
//! reader working in seconds might expect. That is an accepted property of
//! the format and never an error.

use crate::error::{Result, SynthError};
use crate::event::RawEvent;
use std::collections::{BTreeMap, BTreeSet};

const NANOS_PER_MILLI: u64 = 1_000_000;

/// Map a nanosecond timestamp onto its window start in milliseconds
///
/// # Panics
/// Divides by `bucket_size_ms`, so panics when it is zero. [`Bucketer::new`]
/// rejects that value; prefer [`Bucketer::window_of`].
pub fn normalize_timestamp(timestamp_ns: u64, bucket_size_ms: u64) -> u64 {
    bucket_size_ms * (timestamp_ns / NANOS_PER_MILLI / bucket_size_ms)
}

/// Number of events for one probe in one window
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct BucketedCount {
    pub window: u64,
    pub probe_name: String,
    pub count: u64,
}

/// Sparse `(window, probe) → count` table
///
/// Indexed by name first, so lookups for one name don't scan the
/// windows of any other. Combinations that never occurred are implicitly zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketedCounts {
    bucket_size_ms: u64,
    by_name: BTreeMap<String, BTreeMap<u64, u64>>,
}

impl BucketedCounts {
    pub fn bucket_size_ms(&self) -> u64 {
        self.bucket_size_ms
    }

    /// Number of non-zero `(window, probe)` cells
    pub fn len(&self) -> usize {
        self.by_name.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Count for `(window, probe)`, zero when absent
    pub fn get(&self, window: u64, probe: &str) -> u64 {
        self.by_name
            .get(probe)
            .and_then(|windows| windows.get(&window))
            .copied()
            .unwrap_or(0)
    }

    /// Iterate `(window, probe, count)` ordered by window then probe name
    pub fn iter(&self) -> impl Iterator<Item = (u64, &str, u64)> {
        let mut cells: Vec<(u64, &str, u64)> = self
            .by_name
            .iter()
            .flat_map(|(probe, windows)| {
                windows
                    .iter()
                    .map(move |(window, count)| (*window, probe.as_str(), *count))
            })
            .collect();
        cells.sort_unstable();
        cells.into_iter()
    }

    /// Distinct probe names, sorted
    pub fn probe_names(&self) -> BTreeSet<&str> {
        self.by_name.keys().map(String::as_str).collect()
    }

    /// Windows in which `probe` fired at least once, ascending
    pub fn windows_for(&self, probe: &str) -> BTreeSet<u64> {
        self.by_name
            .get(probe)
            .map(|windows| windows.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Total events recorded for `probe` across all windows
    pub fn total_for(&self, probe: &str) -> u64 {
        self.by_name
            .get(probe)
            .map(|windows| windows.values().sum())
            .unwrap_or(0)
    }

    /// Long-format rows
    pub fn to_rows(&self) -> Vec<BucketedCount> {
        self.iter()
            .map(|(window, probe, count)| BucketedCount {
                window,
                probe_name: probe.to_string(),
                count,
            })
            .collect()
    }
}

/// Reduces raw events into per-window occurrence counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucketer {
    bucket_size_ms: u64,
}

impl Bucketer {
    /// Create a bucketer with the given window width in milliseconds
    ///
    /// # Errors
    /// `SynthError::InvalidConfiguration` when `bucket_size_ms <= 0`.
    pub fn new(bucket_size_ms: i64) -> Result<Self> {
        if bucket_size_ms <= 0 {
            return Err(SynthError::InvalidConfiguration(format!(
                "bucket_size_ms must be > 0, got {}",
                bucket_size_ms
            )));
        }
        Ok(Self {
            bucket_size_ms: bucket_size_ms as u64,
        })
    }

    pub fn bucket_size_ms(&self) -> u64 {
        self.bucket_size_ms
    }

    pub fn window_of(&self, timestamp_ns: u64) -> u64 {
        normalize_timestamp(timestamp_ns, self.bucket_size_ms)
    }

    /// Count events per `(window, probe_name)`
    pub fn bucket<'a, I>(&self, events: I) -> BucketedCounts
    where
        I: IntoIterator<Item = &'a RawEvent>,
    {
        let mut by_name: BTreeMap<String, BTreeMap<u64, u64>> = BTreeMap::new();
        let mut seen = 0usize;
        for event in events {
            let window = self.window_of(event.timestamp_ns);
            *by_name
                .entry(event.probe_name.clone())
                .or_default()
                .entry(window)
                .or_insert(0) += 1;
            seen += 1;
        }

        let counts = BucketedCounts {
            bucket_size_ms: self.bucket_size_ms,
            by_name,
        };

        tracing::debug!(
            events = seen,
            cells = counts.len(),
            bucket_size_ms = self.bucket_size_ms,
            "bucketed probe events"
        );

        counts
    }
}
