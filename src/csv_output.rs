//! CSV output for synthesized series and bucketed counts
//!
//! Long format, one row per `(window, name)` pair:
//!
//! ```text
//! ts,event,value
//! 1000,io,2
//! 2000,io,0
//! ```

use crate::bucket::BucketedCounts;
use crate::synth::SynthesizedPoint;

/// Escape CSV field (handle commas, quotes, newlines)
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// CSV formatter for synthesized points
#[derive(Debug, Default)]
pub struct CsvOutput {
    points: Vec<SynthesizedPoint>,
}

impl CsvOutput {
    pub fn new() -> Self {
        Self::default()
    }

    fn header() -> &'static str {
        "ts,event,value"
    }

    fn format_point(point: &SynthesizedPoint) -> String {
        format!(
            "{},{},{}",
            point.window,
            escape_field(&point.kind_name),
            point.value
        )
    }

    /// Rows ordered by window, then kind name
    pub fn to_csv(&self) -> String {
        let mut rows: Vec<&SynthesizedPoint> = self.points.iter().collect();
        rows.sort_by(|a, b| (a.window, &a.kind_name).cmp(&(b.window, &b.kind_name)));

        let mut output = String::new();
        output.push_str(Self::header());
        output.push('\n');

        for point in rows {
            output.push_str(&Self::format_point(point));
            output.push('\n');
        }

        output
    }
}

impl FromIterator<SynthesizedPoint> for CsvOutput {
    fn from_iter<I: IntoIterator<Item = SynthesizedPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// CSV formatter for raw bucketed counts (--counts)
pub fn counts_to_csv(counts: &BucketedCounts) -> String {
    let mut output = String::from("ts,probe,events\n");
    for (window, probe, count) in counts.iter() {
        output.push_str(&window.to_string());
        output.push(',');
        output.push_str(&escape_field(probe));
        output.push(',');
        output.push_str(&count.to_string());
        output.push('\n');
    }
    output
}
