//! JSON output format for synthesized series

use serde::{Deserialize, Serialize};

use crate::pipeline::Analysis;

/// A single synthesized value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonPoint {
    /// Window start in milliseconds
    pub ts: u64,
    /// Kind name
    pub event: String,
    pub value: i64,
}

/// A probe kind left out of synthesis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonSkippedKind {
    pub kind: String,
    pub members: Vec<String>,
    pub reason: String,
}

/// Complete report for one probe log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonReport {
    pub bucket_size_ms: u64,
    pub strategy: String,
    pub points: Vec<JsonPoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<JsonSkippedKind>,
}

impl JsonReport {
    pub fn from_analysis(analysis: &Analysis, strategy: &str) -> Self {
        let mut points: Vec<JsonPoint> = analysis
            .points
            .iter()
            .map(|p| JsonPoint {
                ts: p.window,
                event: p.kind_name.clone(),
                value: p.value,
            })
            .collect();
        points.sort_by(|a, b| (a.ts, &a.event).cmp(&(b.ts, &b.event)));

        let skipped = analysis
            .classification
            .rejected
            .iter()
            .filter(|(kind, _, _)| !kind.is_empty())
            .map(|(kind, members, reason)| JsonSkippedKind {
                kind: kind.clone(),
                members: members.clone(),
                reason: reason.to_string(),
            })
            .collect();

        Self {
            bucket_size_ms: analysis.counts.bucket_size_ms(),
            strategy: strategy.to_string(),
            points,
            skipped,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
