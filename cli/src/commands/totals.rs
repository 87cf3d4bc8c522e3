use crate::output::{json, text};
use crate::{OutputFormat, Verbosity};
use anyhow::{Context, Result};
use pricing_diff::{
    OverrideSet, PricingDocument, TableScope, compute_all_table_totals, compute_document_total,
    parse_document, parse_document_lenient,
};
use std::fs;
use std::io;
use std::process::ExitCode;

pub fn run(
    doc_path: &str,
    overrides_path: Option<&str>,
    format: OutputFormat,
    detail_only: bool,
    lenient: bool,
    verbosity: Verbosity,
) -> Result<ExitCode> {
    let doc = load_document(doc_path, lenient)?;
    let overrides = match overrides_path {
        Some(path) => load_overrides(path)?,
        None => OverrideSet::empty(),
    };

    for key in overrides.stale_keys(&doc) {
        eprintln!("Warning: override key '{}' does not address any row", key);
    }

    let scope = if detail_only {
        TableScope::DetailOnly
    } else {
        TableScope::AllTables
    };
    let totals = compute_all_table_totals(&doc, &overrides);
    let document_total = compute_document_total(&doc, &overrides, scope);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match format {
        OutputFormat::Text => {
            text::write_totals(&mut handle, &doc, &totals, document_total, verbosity)?;
        }
        OutputFormat::Json => {
            json::write_totals(&mut handle, &totals, document_total)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_document(path: &str, lenient: bool) -> Result<PricingDocument> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read document: {}", path))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("Document is not valid JSON: {}", path))?;

    if lenient {
        let (doc, report) = parse_document_lenient(&value)
            .with_context(|| format!("Failed to parse document: {}", path))?;
        for message in report.messages() {
            eprintln!("Warning: {}", message);
        }
        Ok(doc)
    } else {
        parse_document(&value).with_context(|| format!("Failed to parse document: {}", path))
    }
}

fn load_overrides(path: &str) -> Result<OverrideSet> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read overrides: {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse overrides: {}", path))
}
