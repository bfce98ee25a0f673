use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use rider_pdf_export::{
    ConversionReport, ConvertOptions, DEFAULT_CURRENCY_SYMBOL, DEFAULT_FOOTER_ROWS,
    DEFAULT_HEADER_ROWS, DEFAULT_JSON_ROOT_KEY, PageSelection, SchemaMode, TableOrder,
    convert_pdf,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "pdf2json",
    version,
    about = "Convert ride booking tables in a PDF report into XLSX and JSON"
)]
struct Cli {
    /// Input PDF path. Outputs are written next to it as <stem>.xlsx and <stem>.json.
    input: PathBuf,

    /// Page selection like 1-3,5.
    #[arg(long)]
    pages: Option<String>,

    /// Report header lines to skip at the top of every table.
    #[arg(long, default_value_t = DEFAULT_HEADER_ROWS)]
    header_rows: usize,

    /// Report footer lines to skip at the bottom of every table.
    #[arg(long, default_value_t = DEFAULT_FOOTER_ROWS)]
    footer_rows: usize,

    /// Order of tables in the output: document or reversed.
    #[arg(long, default_value = "document")]
    table_order: String,

    /// Skip tables that do not have 17 columns instead of failing.
    #[arg(long)]
    skip_mismatched: bool,

    /// Currency symbol removed from amount columns.
    #[arg(long, default_value = DEFAULT_CURRENCY_SYMBOL)]
    currency_symbol: String,

    /// Top-level key wrapping the record array in the JSON output.
    #[arg(long, default_value = DEFAULT_JSON_ROOT_KEY)]
    json_key: String,

    /// Directory for the output files.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Enable verbose warning output.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_options(cli: &Cli) -> Result<ConvertOptions> {
    let pages = cli
        .pages
        .as_deref()
        .map(PageSelection::from_str)
        .transpose()
        .map_err(|error| anyhow!("invalid page selection: {error}"))
        .context("failed to parse --pages")?;

    let table_order = TableOrder::from_str(&cli.table_order)
        .map_err(|error| anyhow!(error))
        .context("failed to parse --table-order")?;

    let schema_mode = if cli.skip_mismatched {
        SchemaMode::SkipMismatched
    } else {
        SchemaMode::Strict
    };

    Ok(ConvertOptions {
        pages,
        header_rows: cli.header_rows,
        footer_rows: cli.footer_rows,
        table_order,
        schema_mode,
        currency_symbol: cli.currency_symbol.clone(),
        json_root_key: cli.json_key.clone(),
        output_dir: cli.output_dir.clone(),
    })
}

fn log_report(report: &ConversionReport, verbose: bool) {
    match &report.xlsx_path {
        Some(path) => println!("Generated Excel file:\t{}", path.display()),
        None => println!("Excel file generation failed, see warnings"),
    }
    println!("Generated JSON file:\t{}", report.json_path.display());

    if report.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", report.warnings.len());
    if verbose {
        for warning in &report.warnings {
            eprintln!(
                "  - {:?} page={:?}: {}",
                warning.code, warning.page, warning.message
            );
        }
    }
}

fn run(cli: &Cli) -> Result<ConversionReport> {
    let options = parse_options(cli)?;
    convert_pdf(&cli.input, &options)
        .with_context(|| format!("failed to convert '{}'", cli.input.display()))
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rider_pdf_export=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let started = Instant::now();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(report) => {
            log_report(&report, cli.verbose);
            println!(
                "Program completed.\tTime taken:\t{:.2} seconds",
                started.elapsed().as_secs_f64()
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}
