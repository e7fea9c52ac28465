use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use chalan_ocr::{DocumentPipeline, OcrEngine, DEFAULT_LINE_THRESHOLD};
use chalan_validate::{refine, validate, FieldMap};

#[derive(Parser)]
#[command(name = "chalan", about = "Invoice OCR and field validation", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the OCR pipeline over an image and print the consolidated text
    Ocr {
        /// Path to the document image
        image: PathBuf,
        /// Vertical distance (px) within which detections share a line
        #[arg(long, default_value_t = DEFAULT_LINE_THRESHOLD)]
        line_threshold: f32,
    },
    /// Validate extracted invoice fields and print the outcome as JSON
    Validate {
        /// Path to a JSON object of extracted fields
        fields: PathBuf,
        /// Optional raw document text, used for payment-method inference
        #[arg(long)]
        ocr_text: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Ocr {
            image,
            line_threshold,
        } => run_ocr(&image, line_threshold),
        Command::Validate { fields, ocr_text } => run_validate(&fields, ocr_text.as_deref()),
    }
}

fn run_ocr(image: &std::path::Path, line_threshold: f32) -> Result<()> {
    let pipeline = DocumentPipeline::new(configured_engines()?)
        .context("failed to build OCR pipeline")?
        .with_line_threshold(line_threshold);
    let text = pipeline
        .process_file(image)
        .with_context(|| format!("failed to process {}", image.display()))?;
    println!("{text}");
    Ok(())
}

fn run_validate(fields_path: &std::path::Path, ocr_text: Option<&std::path::Path>) -> Result<()> {
    let raw = fs::read_to_string(fields_path)
        .with_context(|| format!("failed to read {}", fields_path.display()))?;
    let mut fields: FieldMap = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON object", fields_path.display()))?;

    let text = match ocr_text {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => String::new(),
    };

    refine(&mut fields, &text);
    let outcome = validate(&mut fields);
    tracing::info!(
        errors = outcome.errors.len(),
        warnings = outcome.warnings.len(),
        usable = outcome.is_usable(),
        "validation complete"
    );

    let report = serde_json::json!({
        "fields": fields,
        "errors": outcome.errors,
        "warnings": outcome.warnings,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(feature = "tesseract")]
fn configured_engines() -> Result<Vec<Box<dyn OcrEngine>>> {
    use chalan_ocr::engine::tesseract::TesseractEngine;

    let data_path = std::env::var("TESSDATA_PREFIX").ok();
    Ok(vec![Box::new(TesseractEngine::new(data_path, "eng"))])
}

#[cfg(not(feature = "tesseract"))]
fn configured_engines() -> Result<Vec<Box<dyn OcrEngine>>> {
    anyhow::bail!("no OCR engines built in; rebuild with --features tesseract")
}
