//! Process command - run OCR and field extraction on a single document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use ayulink_core::models::config::{AyulinkConfig, OcrBackend};
use ayulink_core::{DocumentProcessor, OcrReport};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Use the mock OCR engine instead of tesseract
    #[arg(long)]
    mock: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV of extracted fields
    Csv,
    /// Plain text summary
    Text,
}

/// Apply `--mock` on top of the loaded configuration.
pub fn apply_mock(config: &mut AyulinkConfig, mock: bool) {
    if mock {
        config.ocr.backend = OcrBackend::Mock;
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    apply_mock(&mut config, args.mock);

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Processing {}...", args.input.display()));

    let processor = DocumentProcessor::from_config(&config);
    let report = processor.process_file(&args.input)?;

    pb.finish_and_clear();

    if !report.success {
        eprintln!("{} {}", style("⚠").yellow(), report.ocr_text);
    }

    let output = format_report(&report, args.format)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_report(report: &OcrReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => format_csv(report),
        OutputFormat::Text => Ok(format_text(report)),
    }
}

fn format_csv(report: &OcrReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["key", "value"])?;
    for pair in &report.key_value_pairs {
        wtr.write_record([&pair.key, &pair.value])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(report: &OcrReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("File: {}\n", report.file_name));
    output.push_str(&format!(
        "Status: {}\n",
        if report.success { "success" } else { "failed" }
    ));
    output.push('\n');

    output.push_str("OCR text:\n");
    for line in report.ocr_text.lines() {
        output.push_str(&format!("  {}\n", line));
    }
    output.push('\n');

    if report.key_value_pairs.is_empty() {
        output.push_str("No fields extracted\n");
    } else {
        output.push_str("Fields:\n");
        for pair in &report.key_value_pairs {
            output.push_str(&format!("  {}: {}\n", pair.key, pair.value));
        }
    }

    output
}
