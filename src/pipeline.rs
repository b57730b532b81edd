//! End-to-end analysis: filter → bucket → classify → synthesize

use crate::bucket::{BucketedCounts, Bucketer};
use crate::config::SynthConfig;
use crate::error::Result;
use crate::event::RawEvent;
use crate::filter::ProbeFilter;
use crate::kind::{self, Classification};
use crate::synth::{SynthesizedPoint, Synthesizer};

/// Everything derived from one batch of events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub counts: BucketedCounts,
    pub classification: Classification,
    pub points: Vec<SynthesizedPoint>,
}

/// Run the full analysis over a closed batch of events
///
/// # Errors
/// `SynthError::InvalidConfiguration` for a non-positive bucket size and
/// `SynthError::Overflow` if synthesis leaves the `i64` range.
pub fn analyze(
    events: &[RawEvent],
    config: &SynthConfig,
    filter: &ProbeFilter,
) -> Result<Analysis> {
    config.validate()?;
    let bucketer = Bucketer::new(config.bucket_size_ms)?;

    let kept = filter.apply(events);
    if kept.len() != events.len() {
        tracing::debug!(
            kept = kept.len(),
            dropped = events.len() - kept.len(),
            "applied probe filter"
        );
    }

    let counts = bucketer.bucket(kept);
    let classification = kind::classify_detailed(counts.probe_names());
    let points =
        Synthesizer::from(config.strategy).synthesize(&counts, &classification.kinds)?;

    tracing::info!(
        events = events.len(),
        kinds = classification.kinds.len(),
        points = points.len(),
        "analysis complete"
    );

    Ok(Analysis {
        counts,
        classification,
        points,
    })
}
