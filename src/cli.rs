//! CLI argument parsing for probesynth

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::synth::StrategyKind;

/// Output format for synthesized series
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// CSV with `ts,event,value` columns (default)
    Csv,
    /// JSON report for machine parsing
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "probesynth")]
#[command(version)]
#[command(about = "Synthesize in-flight operation counts from recorded probe events", long_about = None)]
pub struct Cli {
    /// Window width in milliseconds (default: 1000, or the config file value)
    #[arg(
        short = 'b',
        long = "bucket-size",
        value_name = "MS",
        allow_negative_numbers = true
    )]
    pub bucket_size: Option<i64>,

    /// Synthesis strategy
    #[arg(long = "strategy", value_enum)]
    pub strategy: Option<StrategyKind>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "csv")]
    pub format: OutputFormat,

    /// Only use these probes (comma-separated names or /regex/ patterns)
    #[arg(long = "probes", value_name = "SPEC")]
    pub probes: Option<String>,

    /// TOML configuration file
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for output files (default: next to each input)
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print results to stdout instead of writing files
    #[arg(long = "stdout")]
    pub stdout: bool,

    /// Also write the bucketed per-probe counts as CSV
    #[arg(long = "counts")]
    pub counts: bool,

    /// Enable debug tracing output on stderr
    #[arg(long = "debug")]
    pub debug: bool,

    /// Probe log files (JSON)
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_files() {
        let cli = Cli::parse_from(["probesynth", "a.json", "b.json"]);
        assert_eq!(cli.files, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
    }

    #[test]
    fn test_cli_requires_files() {
        assert!(Cli::try_parse_from(["probesynth"]).is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["probesynth", "a.json"]);
        assert!(cli.bucket_size.is_none());
        assert!(cli.strategy.is_none());
        assert_eq!(cli.format, OutputFormat::Csv);
        assert!(!cli.stdout);
        assert!(!cli.counts);
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_bucket_size_short_flag() {
        let cli = Cli::parse_from(["probesynth", "-b", "250", "a.json"]);
        assert_eq!(cli.bucket_size, Some(250));
    }

    #[test]
    fn test_cli_negative_bucket_size_parses() {
        // Rejected later with InvalidConfiguration, not by the parser
        let cli = Cli::parse_from(["probesynth", "-b", "-5", "a.json"]);
        assert_eq!(cli.bucket_size, Some(-5));
    }

    #[test]
    fn test_cli_strategy() {
        let cli = Cli::parse_from(["probesynth", "--strategy", "net-outstanding", "a.json"]);
        assert_eq!(cli.strategy, Some(StrategyKind::NetOutstanding));
    }

    #[test]
    fn test_cli_json_format() {
        let cli = Cli::parse_from(["probesynth", "--format", "json", "a.json"]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.format.extension(), "json");
    }

    #[test]
    fn test_cli_probes() {
        let cli = Cli::parse_from(["probesynth", "--probes", "io__entry,/^gc__/", "a.json"]);
        assert_eq!(cli.probes.as_deref(), Some("io__entry,/^gc__/"));
    }
}
