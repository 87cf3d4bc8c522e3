use crate::output::{json, text};
use crate::{OutputFormat, Verbosity};
use anyhow::{Context, Result};
use pricing_diff::{DeltaResult, PricingDocument, ScanConfig, parse_document, scan_with_config};
use std::fs;
use std::io;
use std::process::ExitCode;

pub fn run(
    old_path: &str,
    new_path: &str,
    format: OutputFormat,
    normalize_labels: bool,
    no_reconcile: bool,
    verbosity: Verbosity,
) -> Result<ExitCode> {
    let old = load_document(old_path)?;
    let new = load_document(new_path)?;

    let config = ScanConfig::builder()
        .normalize_labels(normalize_labels)
        .reconcile_master(!no_reconcile)
        .build()
        .context("Invalid scan configuration")?;

    let result = scan_with_config(&old, &new, &config);

    for warning in &result.warnings {
        eprintln!("Warning: {}", warning);
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match format {
        OutputFormat::Text => {
            text::write_delta_report(&mut handle, old.currency, &result, verbosity)?;
        }
        OutputFormat::Json => {
            json::write_delta_report(&mut handle, &result)?;
        }
    }

    Ok(exit_code_from_result(&result))
}

fn load_document(path: &str) -> Result<PricingDocument> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read document: {}", path))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("Document is not valid JSON: {}", path))?;
    parse_document(&value).with_context(|| format!("Failed to parse document: {}", path))
}

fn exit_code_from_result(result: &DeltaResult) -> ExitCode {
    let unchanged = result.changed_sections == 0
        && result.added_sections == 0
        && result.removed_sections == 0
        && result.total_row_changes == 0;
    if unchanged {
        ExitCode::from(0)
    } else {
        ExitCode::from(1)
    }
}
