//! CLI entry point for mean/median imputation.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use lex_impute::io::{load_csv, split_dataframe, write_csv};
use lex_impute::{
    ImputationConfig, ImputationPipeline, ImputationStrategy, PipelineResult, ReportGenerator,
    Table,
};
use polars::prelude::DataFrame;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// CLI-compatible imputation strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliStrategy {
    /// Use the mean of the non-missing training values
    Mean,
    /// Use the median of the non-missing training values
    Median,
}

impl From<CliStrategy> for ImputationStrategy {
    fn from(cli: CliStrategy) -> Self {
        match cli {
            CliStrategy::Mean => ImputationStrategy::Mean,
            CliStrategy::Median => ImputationStrategy::Median,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Mean/median imputation of missing numeric values",
    long_about = "Fills missing numeric values with the mean or median learned from a \
                  seeded training partition, then applies the same value to the test partition.\n\n\
                  EXAMPLES:\n  \
                  # Median-impute every numeric column with gaps\n  \
                  lex-impute -i titanic.csv\n\n  \
                  # Mean-impute selected variables and write a report\n  \
                  lex-impute -i houseprice.csv -v LotFrontage,MasVnrArea --strategy mean -r\n\n  \
                  # Print the JSON report only\n  \
                  lex-impute -i titanic.csv --json --no-save"
)]
struct Args {
    /// Path to the CSV file to process
    #[arg(short, long)]
    input: String,

    /// Output directory for imputed partitions and reports
    #[arg(short, long, default_value = "output")]
    output: String,

    /// Numeric columns to load (comma-separated). Defaults to every numeric column
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Variables to impute (comma-separated)
    ///
    /// Defaults to every loaded column with missing values in the training partition
    #[arg(short, long, value_delimiter = ',')]
    variables: Vec<String>,

    /// Statistic used to fill missing values
    #[arg(long, value_enum, default_value = "median")]
    strategy: CliStrategy,

    /// Fraction of rows held out as the test partition
    #[arg(long, default_value = "0.3")]
    test_size: f64,

    /// Seed for the train/test shuffle
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Round learned fill values to this many decimals before filling
    #[arg(long)]
    fill_decimals: Option<u32>,

    /// Decimals shown in the summary
    #[arg(long, default_value = "1")]
    display_decimals: u32,

    /// IQR multiplier for the outlier fences
    #[arg(long, default_value = "1.5")]
    iqr_multiplier: f64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a detailed JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Do not write the imputed train/test CSV files
    #[arg(long)]
    no_save: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    info!("Loading dataset from: {}", args.input);
    let data = load_csv(&args.input)?;
    let table = Table::from_dataframe(&data, args.columns.as_deref())?;
    info!(
        "Using {} numeric column(s): {:?}",
        table.width(),
        table.column_names()
    );

    let config = build_config(&args)?;
    let pipeline = ImputationPipeline::builder()
        .config(config)
        .on_progress(|update| {
            debug!("[{:.0}%] {}", update.progress * 100.0, update.message);
        })
        .build()?;

    let result = pipeline
        .run_with_source(&table, Some(&args.input))
        .map_err(|e| anyhow!("Imputation failed: {}", e))?;

    let written = if pipeline.config().save_to_disk {
        save_partitions(&data, &result, &pipeline.config().output_dir, &args.input)?
    } else {
        Vec::new()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.report)?);
        return Ok(());
    }

    if args.emit_report {
        let generator = ReportGenerator::new(&args.output);
        let report_path =
            generator.write_report_to_file(&result.report, &file_stem(&args.input))?;
        info!("Report written to: {}", report_path.display());
    }

    print!("{}", ReportGenerator::render_summary(&result.report));
    for path in &written {
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn build_config(args: &Args) -> Result<ImputationConfig> {
    let mut builder = ImputationConfig::builder()
        .strategy(args.strategy.into())
        .variables(args.variables.iter().cloned())
        .test_size(args.test_size)
        .seed(args.seed)
        .display_decimals(args.display_decimals)
        .iqr_multiplier(args.iqr_multiplier)
        .output_dir(&args.output)
        .save_to_disk(!args.no_save);

    if let Some(decimals) = args.fill_decimals {
        builder = builder.fill_value_decimals(decimals);
    }

    Ok(builder.build()?)
}

/// Write both imputed partitions with every original column.
fn save_partitions(
    data: &DataFrame,
    result: &PipelineResult,
    output_dir: &Path,
    input: &str,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Creating output directory {}", output_dir.display()))?;

    let (train, test) = split_dataframe(data, &result.split)?;
    let stem = file_stem(input);

    let mut written = Vec::with_capacity(2);
    for (name, partition) in [("train", train), ("test", test)] {
        let mut imputed = result.imputer.transform_dataframe(&partition)?;
        let path = output_dir.join(format!("{}_{}_imputed.csv", stem, name));
        write_csv(&mut imputed, &path)?;
        info!("Saved {} partition: {}", name, path.display());
        written.push(path);
    }
    Ok(written)
}

/// Extract the file stem (name without extension) from a path.
fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}
