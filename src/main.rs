//! CLI entry point for the waste KPI tool.
//!
//! Provides subcommands for running the full four-city analysis and for
//! inspecting how a single source file is parsed.

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use waste_kpi::{
    config::SourcePaths,
    output::{print_json, print_pretty, record_rows, render_table, summary_rows, write_summary},
    pipeline::run,
    records::City,
    sources::{parse_file, rule_for},
    summary::{SummaryIndex, summarize, write_json},
};

#[derive(Parser)]
#[command(name = "waste_kpi")]
#[command(about = "Compare municipal waste KPIs across Kanazawa, Sakai, Toyama and Chiba", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse all four sources, compute KPIs and write the summary CSV
    Analyze {
        /// Directory holding the source CSVs (defaults to $WASTE_DATA_DIR or ".")
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// JSON file overriding individual source paths
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Summary CSV to write
        #[arg(short, long, default_value = "waste_analysis_summary.csv")]
        output: PathBuf,

        /// Optional: write per-city summary statistics as JSON
        #[arg(long)]
        summary_json: Option<PathBuf>,

        /// How to print results to stdout
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Parse one source and log its normalized records and KPIs as JSON
    Inspect {
        /// City whose rule to apply (kanazawa, sakai, toyama, chiba)
        city: City,

        /// Source file (defaults to the city's file in $WASTE_DATA_DIR or ".")
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/waste_kpi.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("waste_kpi.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            data_dir,
            config,
            output,
            summary_json,
            format,
        } => {
            let data_dir = data_dir.unwrap_or_else(default_data_dir);
            let paths = match config {
                Some(config) => SourcePaths::load(&data_dir, &config)?,
                None => SourcePaths::in_dir(&data_dir),
            };
            for (city, path) in paths.iter() {
                info!(city = %city, path = %path.display(), "Source configured");
            }

            let (table, kpis) = run(&paths)?;
            let rows = summary_rows(&table, &kpis);
            print_pretty(&rows);

            match format {
                Format::Table => print!("{}", render_table(&rows)),
                Format::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
            }

            write_summary(&output, &rows)?;
            info!(path = %output.display(), rows = rows.len(), "Summary saved");

            if let Some(summary_path) = summary_json {
                let index = SummaryIndex {
                    generated_at: Utc::now(),
                    cities: summarize(&kpis),
                };
                write_json(&summary_path, &index)?;
                info!(path = %summary_path.display(), "City summary saved");
            }
        }
        Commands::Inspect { city, file } => {
            let rule = rule_for(city);
            let path = file.unwrap_or_else(|| default_data_dir().join(rule.file_name));
            let records = parse_file(rule, &path)?;
            print_json(&record_rows(&records))?;
        }
    }

    Ok(())
}

/// `$WASTE_DATA_DIR`, or the working directory.
fn default_data_dir() -> PathBuf {
    std::env::var("WASTE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}
