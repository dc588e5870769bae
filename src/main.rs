//! Prognos: Clinical risk inference and model comparison
//!
//! Command-line entry point. Results are printed to stdout as JSON; logs go
//! to stderr or a file.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use prognos::adapters::sanitize::SanitizingMakeWriter;
use prognos::adapters::{sample_patients, ChaChaSource, MetricsConfig, RngConfig};
use prognos::application::{MetricsAggregator, PredictionService, ResultsView, TaskComparison};
use prognos::domain::RawPatientRecord;
use prognos::{Assessment, ModelName, Task};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "prognos")]
#[command(about = "Clinical risk inference and multi-model comparison")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a patient record and simulate every model's predictions
    Predict {
        /// Patient record (JSON object)
        #[arg(conflicts_with = "sample")]
        file: Option<PathBuf>,

        /// Use a bundled sample patient (1-based)
        #[arg(long)]
        sample: Option<usize>,

        /// Classification model shown in the results view
        #[arg(short, long, default_value = "random_forest")]
        model: ModelName,

        /// Seed for reproducible output (overrides PROGNOS_RNG_SEED)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Compare models on the reference metrics table
    Compare {
        /// Task to compare; all tasks when omitted
        #[arg(short, long)]
        task: Option<Task>,

        /// Metrics table (JSON); overrides PROGNOS_METRICS_FILE
        #[arg(long)]
        metrics: Option<PathBuf>,
    },
}

fn init_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    // Stdout carries the JSON results, so logs never go there.
    // - file: append to PROGNOS_LOG_FILE (default ./prognos.log)
    // - stderr: log to stderr
    // - auto: file when PROGNOS_LOG_FILE is set, stderr otherwise
    let log_mode = std::env::var("PROGNOS_LOG_MODE").unwrap_or_else(|_| "auto".to_string());
    let log_file = std::env::var("PROGNOS_LOG_FILE").ok();

    let use_file = match log_mode.as_str() {
        "file" => true,
        "stderr" => false,
        _ => log_file.is_some(),
    };

    let (writer, guard) = if use_file {
        let path = log_file.unwrap_or_else(|| "prognos.log".to_string());

        if let Some(parent) = std::path::Path::new(&path).parent() {
            // Best-effort: a missing directory surfaces in the open below.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {path}"))?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stderr())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(SanitizingMakeWriter::new(writer)),
        )
        .init();

    Ok(guard)
}

fn load_record(file: Option<PathBuf>, sample: Option<usize>) -> Result<RawPatientRecord> {
    match (file, sample) {
        (Some(path), _) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("{} is not a JSON object", path.display()))
        }
        (None, index) => {
            let index = index.unwrap_or(1);
            let mut patients = sample_patients().context("Bundled sample patients are corrupt")?;
            if index == 0 || index > patients.len() {
                anyhow::bail!("Sample patient {index} does not exist (1..={})", patients.len());
            }
            Ok(patients.swap_remove(index - 1))
        }
    }
}

/// Output of `predict`.
#[derive(Debug, Serialize)]
struct PredictOutput {
    assessment: Assessment,
    results: ResultsView,
}

fn predict(
    file: Option<PathBuf>,
    sample: Option<usize>,
    model: ModelName,
    seed: Option<u64>,
) -> Result<PredictOutput> {
    let rng_config = RngConfig::from_env_or_default().with_seed(seed);

    let raw = load_record(file, sample)?;
    let service = PredictionService::new(ChaChaSource::with_config(&rng_config));
    let assessment = service.predict(&raw)?;
    let results = ResultsView::new(&assessment.predictions, model)?;

    Ok(PredictOutput {
        assessment,
        results,
    })
}

fn compare(task: Option<Task>, metrics: Option<PathBuf>) -> Result<Vec<TaskComparison>> {
    let source = MetricsConfig::from_env_or_default()
        .with_path(metrics)
        .into_source();
    let table = source
        .load()
        .with_context(|| format!("Failed to load metrics from {}", source.describe()))?;
    tracing::info!(source = %source.describe(), "Loaded metrics table");

    let aggregator = MetricsAggregator::new(&table);
    Ok(match task {
        Some(task) => vec![aggregator.aggregate(task)],
        None => Task::ALL.into_iter().map(|t| aggregator.aggregate(t)).collect(),
    })
}

/// Write typed output as pretty JSON. Map order is kept as serialized.
fn write_json<W: Write, T: Serialize>(mut writer: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = init_logging()?;

    tracing::info!("Starting Prognos...");

    let stdout = std::io::stdout().lock();
    match args.command {
        Command::Predict {
            file,
            sample,
            model,
            seed,
        } => write_json(stdout, &predict(file, sample, model, seed)?),
        Command::Compare { task, metrics } => write_json(stdout, &compare(task, metrics)?),
    }
}
