//! probesynth - in-flight operation counts from probe events
//!
//! This library buckets timestamped probe firings into fixed-width windows,
//! pairs begin/end probes into kinds, and synthesizes an approximate count of
//! operations in flight per kind and window.

pub mod bucket;
pub mod cli;
pub mod config;
pub mod csv_output;
pub mod error;
pub mod event;
pub mod filter;
pub mod json_output;
pub mod kind;
pub mod pipeline;
pub mod synth;

pub use bucket::{normalize_timestamp, BucketedCount, BucketedCounts, Bucketer};
pub use error::SynthError;
pub use event::{ProbeLog, RawEvent};
pub use kind::{classify, ProbeKind, Role};
pub use synth::{SynthesisStrategy, SynthesizedPoint, Synthesizer};
