use anyhow::{Context, Result};
use clap::Parser;
use probesynth::cli::{Cli, OutputFormat};
use probesynth::config::SynthConfig;
use probesynth::csv_output::{counts_to_csv, CsvOutput};
use probesynth::filter::ProbeFilter;
use probesynth::json_output::JsonReport;
use probesynth::pipeline::{self, Analysis};
use probesynth::ProbeLog;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; warnings always, everything with --debug
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Merge config file values with command-line overrides
fn resolve_config(args: &Cli) -> Result<SynthConfig> {
    let mut config = match &args.config {
        Some(path) => SynthConfig::from_toml(path)?,
        None => SynthConfig::default(),
    };
    if let Some(bucket_size) = args.bucket_size {
        config.bucket_size_ms = bucket_size;
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    config.validate()?;
    Ok(config)
}

/// `<dir>/<stem><suffix>.<ext>`, with `dir` defaulting to the input's directory
fn output_path(input: &Path, output_dir: Option<&Path>, suffix: &str, ext: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "probes".to_string());
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{}{}.{}", stem, suffix, ext))
}

fn render(analysis: &Analysis, config: &SynthConfig, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Csv => Ok(analysis.points.iter().cloned().collect::<CsvOutput>().to_csv()),
        OutputFormat::Json => {
            let strategy = config.strategy.build();
            JsonReport::from_analysis(analysis, strategy.name())
                .to_json()
                .context("Failed to serialize JSON report")
        }
    }
}

fn process_file(
    path: &Path,
    args: &Cli,
    config: &SynthConfig,
    filter: &ProbeFilter,
) -> Result<()> {
    let log = ProbeLog::from_file(path)?;
    tracing::debug!(file = %path.display(), events = log.event_count(), "loaded probe log");

    let analysis = pipeline::analyze(&log.events(), config, filter)
        .with_context(|| format!("Failed to synthesize probes from {}", path.display()))?;

    let rendered = render(&analysis, config, args.format)?;
    let counts = args.counts.then(|| counts_to_csv(&analysis.counts));

    if args.stdout {
        print!("{}", rendered);
        if let Some(counts) = counts {
            println!();
            print!("{}", counts);
        }
        return Ok(());
    }

    let out = output_path(path, args.output_dir.as_deref(), "-lre", args.format.extension());
    fs::write(&out, rendered)
        .with_context(|| format!("Failed to write output: {}", out.display()))?;
    eprintln!("wrote {}", out.display());

    if let Some(counts) = counts {
        let out = output_path(path, args.output_dir.as_deref(), "-counts", "csv");
        fs::write(&out, counts)
            .with_context(|| format!("Failed to write counts: {}", out.display()))?;
        eprintln!("wrote {}", out.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = resolve_config(&args)?;

    // Parse probe selection if provided
    let filter = if let Some(spec) = &args.probes {
        ProbeFilter::from_spec(spec)?
    } else {
        ProbeFilter::all()
    };

    for file in &args.files {
        process_file(file, &args, &config, &filter)?;
    }

    Ok(())
}
