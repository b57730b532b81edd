//! In-flight count synthesis from bucketed begin/end counts
//!
//! Bucketing throws away which end event closed which start event, so the
//! number of operations in flight can't be recovered exactly. Each kind's two
//! probes are densified over the union of windows either of them fired in,
//! and a [`SynthesisStrategy`] turns the aligned start/end count vectors into
//! one value per window.
//!
//! The default [`CumulativeDelta`] strategy computes, per window `i`:
//!
//! ```text
//! D[i]     = B[i] - A[i]            (ends minus starts)
//! C[i]     = D[0] + ... + D[i]
//! value[i] = min(A[i], B[i]) - C[i]
//! ```
//!
//! It is a heuristic. When starts and ends are heavily skewed across windows
//! the result can go negative. Treat its output as an approximation and
//! check it against a workload with known concurrency before relying on it.

use crate::bucket::BucketedCounts;
use crate::error::{Result, SynthError};
use crate::kind::{self, ProbeKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Estimated in-flight value for one kind in one window
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SynthesizedPoint {
    pub kind_name: String,
    pub window: u64,
    pub value: i64,
}

/// Start and end counts of one kind aligned over its sorted windows
///
/// `windows`, `starts` and `ends` always have the same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseSeries {
    kind: String,
    windows: Vec<u64>,
    /// `A`: start-role counts
    starts: Vec<u64>,
    /// `B`: end-role counts
    ends: Vec<u64>,
}

impl DenseSeries {
    /// Build a series from already aligned vectors
    ///
    /// # Errors
    /// `SynthError::InvalidConfiguration` when the vectors differ in length.
    pub fn new(
        kind: impl Into<String>,
        windows: Vec<u64>,
        starts: Vec<u64>,
        ends: Vec<u64>,
    ) -> Result<Self> {
        let kind = kind.into();
        if starts.len() != windows.len() || ends.len() != windows.len() {
            return Err(SynthError::InvalidConfiguration(format!(
                "series for kind '{}' is misaligned: {} windows, {} starts, {} ends",
                kind,
                windows.len(),
                starts.len(),
                ends.len()
            )));
        }
        Ok(Self {
            kind,
            windows,
            starts,
            ends,
        })
    }

    /// Materialize the dense series for `kind`, filling gaps with zero
    pub fn from_counts(counts: &BucketedCounts, kind: &ProbeKind) -> Self {
        let windows: BTreeSet<u64> = counts
            .windows_for(kind.start())
            .into_iter()
            .chain(counts.windows_for(kind.end()))
            .collect();
        let windows: Vec<u64> = windows.into_iter().collect();

        let starts = windows.iter().map(|w| counts.get(*w, kind.start())).collect();
        let ends = windows.iter().map(|w| counts.get(*w, kind.end())).collect();

        Self {
            kind: kind.name.clone(),
            windows,
            starts,
            ends,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn windows(&self) -> &[u64] {
        &self.windows
    }

    pub fn starts(&self) -> &[u64] {
        &self.starts
    }

    pub fn ends(&self) -> &[u64] {
        &self.ends
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    fn overflow(&self, index: usize) -> SynthError {
        SynthError::Overflow {
            kind: self.kind.clone(),
            window: self.windows.get(index).copied().unwrap_or_default(),
        }
    }

    /// Counts at `index` as signed values
    fn signed_at(&self, index: usize) -> Result<(i64, i64)> {
        let a = i64::try_from(self.starts[index]).map_err(|_| self.overflow(index))?;
        let b = i64::try_from(self.ends[index]).map_err(|_| self.overflow(index))?;
        Ok((a, b))
    }
}

/// Turns a kind's dense start/end counts into one value per window
pub trait SynthesisStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// One value per entry of `series.windows()`
    ///
    /// # Errors
    /// `SynthError::Overflow` when an intermediate value leaves `i64`.
    fn synthesize(&self, series: &DenseSeries) -> Result<Vec<i64>>;
}

/// `min(A, B)` corrected by the running imbalance of ends over starts
#[derive(Debug, Clone, Copy, Default)]
pub struct CumulativeDelta;

impl SynthesisStrategy for CumulativeDelta {
    fn name(&self) -> &'static str {
        "cumulative-delta"
    }

    fn synthesize(&self, series: &DenseSeries) -> Result<Vec<i64>> {
        let mut cumulative: i64 = 0;
        let mut values = Vec::with_capacity(series.len());

        for i in 0..series.len() {
            let (a, b) = series.signed_at(i)?;
            let delta = b.checked_sub(a).ok_or_else(|| series.overflow(i))?;
            cumulative = cumulative
                .checked_add(delta)
                .ok_or_else(|| series.overflow(i))?;
            let value = a
                .min(b)
                .checked_sub(cumulative)
                .ok_or_else(|| series.overflow(i))?;
            values.push(value);
        }

        Ok(values)
    }
}

/// Running count of starts not yet matched by ends: `Σ (A - B)`
#[derive(Debug, Clone, Copy, Default)]
pub struct NetOutstanding;

impl SynthesisStrategy for NetOutstanding {
    fn name(&self) -> &'static str {
        "net-outstanding"
    }

    fn synthesize(&self, series: &DenseSeries) -> Result<Vec<i64>> {
        let mut outstanding: i64 = 0;
        let mut values = Vec::with_capacity(series.len());

        for i in 0..series.len() {
            let (a, b) = series.signed_at(i)?;
            outstanding = a
                .checked_sub(b)
                .and_then(|net| outstanding.checked_add(net))
                .ok_or_else(|| series.overflow(i))?;
            values.push(outstanding);
        }

        Ok(values)
    }
}

/// Selectable synthesis strategies
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// min(starts, ends) minus the cumulative end/start imbalance (default)
    #[default]
    CumulativeDelta,
    /// Running sum of starts minus ends
    NetOutstanding,
}

impl StrategyKind {
    pub fn build(self) -> Box<dyn SynthesisStrategy> {
        match self {
            StrategyKind::CumulativeDelta => Box::new(CumulativeDelta),
            StrategyKind::NetOutstanding => Box::new(NetOutstanding),
        }
    }
}

/// Derives per-kind series from bucketed counts
pub struct Synthesizer {
    strategy: Box<dyn SynthesisStrategy>,
}

impl std::fmt::Debug for Synthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synthesizer")
            .field("strategy", &self.strategy.name())
            .finish()
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new(Box::new(CumulativeDelta))
    }
}

impl From<StrategyKind> for Synthesizer {
    fn from(kind: StrategyKind) -> Self {
        Self::new(kind.build())
    }
}

impl Synthesizer {
    pub fn new(strategy: Box<dyn SynthesisStrategy>) -> Self {
        Self { strategy }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Synthesize every given kind, ordered by kind name then window
    ///
    /// An empty `kinds` slice yields an empty result.
    pub fn synthesize(
        &self,
        counts: &BucketedCounts,
        kinds: &[ProbeKind],
    ) -> Result<Vec<SynthesizedPoint>> {
        let mut points = Vec::new();

        for kind in kinds {
            let series = DenseSeries::from_counts(counts, kind);
            let values = self.strategy.synthesize(&series)?;

            tracing::debug!(
                kind = %kind.name,
                windows = series.len(),
                strategy = self.strategy.name(),
                "synthesized probe kind"
            );

            points.extend(series.windows().iter().zip(values).map(|(window, value)| {
                SynthesizedPoint {
                    kind_name: kind.name.clone(),
                    window: *window,
                    value,
                }
            }));
        }

        points.sort();
        Ok(points)
    }

    /// Classify the probes present in `counts` and synthesize the valid kinds
    pub fn synthesize_counts(&self, counts: &BucketedCounts) -> Result<Vec<SynthesizedPoint>> {
        let kinds = kind::classify(counts.probe_names());
        if kinds.is_empty() {
            tracing::debug!("no synthesizable probe kinds");
        }
        self.synthesize(counts, &kinds)
    }
}
