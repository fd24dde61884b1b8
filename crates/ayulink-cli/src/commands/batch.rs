//! Batch processing command for multiple documents.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use ayulink_core::models::config::StorageConfig;
use ayulink_core::{DocumentProcessor, ResultStore};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory for `<name>_ocr.json` results (default from config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Use the mock OCR engine instead of tesseract
    #[arg(long)]
    mock: bool,
}

/// Outcome of processing a single file.
struct ProcessResult {
    path: PathBuf,
    result_file: Option<String>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    super::process::apply_mock(&mut config, args.mock);

    let storage = StorageConfig {
        results_dir: args
            .output_dir
            .clone()
            .unwrap_or_else(|| config.storage.results_dir.clone()),
        ..config.storage.clone()
    };
    let store = ResultStore::open(&storage)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| store.is_allowed(n))
                .unwrap_or(false)
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let processor = DocumentProcessor::from_config(&config);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let outcome = processor
            .process_file(&path)
            .map_err(anyhow::Error::from)
            .and_then(|report| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let result_file = store.save_result(&name, &report)?;
                debug!("Wrote {}", store.results_dir().join(&result_file).display());

                if report.success {
                    Ok(result_file)
                } else {
                    Err(anyhow::anyhow!("{}", report.ocr_text))
                }
            });

        match outcome {
            Ok(result_file) => {
                results.push(ProcessResult {
                    path,
                    result_file: Some(result_file),
                    error: None,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        result_file: None,
                        error: Some(error_msg),
                    });
                } else {
                    overall_pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    let successful: Vec<_> = results.iter().filter(|r| r.result_file.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    for result in &successful {
        if let Some(result_file) = &result.result_file {
            println!("  {} -> {}", result.path.display(), result_file);
        }
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );
    println!("   Results in {}", store.results_dir().display());

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}
