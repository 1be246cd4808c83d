use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dacnet_convert::{ConversionReport, ConvertError, ConverterBuilder, ErrorPolicy};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "dacnet-convert")]
#[command(about = "Convert DACNET market-price workbooks into per-sheet CSV files", long_about = None)]
struct Cli {
    /// Project root containing data/raw (default: current directory)
    #[arg(long)]
    project_root: Option<PathBuf>,

    /// Override the workbook directory (default: <project-root>/data/raw)
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Override the CSV output directory (default: <project-root>/data/raw/temp)
    #[arg(long)]
    target_dir: Option<PathBuf>,

    /// Record per-file failures and keep going instead of halting on the first one
    #[arg(long)]
    continue_on_error: bool,

    /// Write a JSON summary of the run to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<ExitCode, ConvertError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(report) if report.is_success() => Ok(ExitCode::SUCCESS),
        Ok(_) => Ok(ExitCode::FAILURE),
        Err(e) => {
            error!("Conversion aborted: {}", e);
            Err(e)
        }
    }
}

fn run(cli: Cli) -> Result<ConversionReport, ConvertError> {
    let project_root = match cli.project_root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    let mut builder = ConverterBuilder::new().with_project_root(&project_root);
    if let Some(dir) = cli.source_dir {
        builder = builder.with_source_dir(dir);
    }
    if let Some(dir) = cli.target_dir {
        builder = builder.with_target_dir(dir);
    }
    if cli.continue_on_error {
        builder = builder.with_error_policy(ErrorPolicy::CollectAndContinue);
    }

    let converter = builder.build()?;
    info!(
        "Converting {} -> {}",
        converter.source_dir().display(),
        converter.target_dir().display()
    );

    let report = converter.run()?;
    info!(
        "Done: {} file(s) written, {} failure(s)",
        report.written.len(),
        report.failures.len()
    );

    if let Some(path) = cli.report {
        report.write_json(BufWriter::new(File::create(&path)?))?;
        info!("Report written to {}", path.display());
    }

    Ok(report)
}
