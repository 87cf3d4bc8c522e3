//! Pricing Diff: a deterministic totals engine and revision delta scanner
//! for canonical pricing documents.
//!
//! This crate provides functionality for:
//! - Ingesting a JSON-shaped pricing document with typed per-field errors
//! - Computing per-table and per-document totals, honoring positional
//!   price/description overrides (`PricingDocument` -> `TableTotals`)
//! - Comparing two document revisions section-by-section and row-by-row
//!   with dollar and percentage deltas (`scan` -> `DeltaResult`)
//!
//! Every consumer of a document's numbers (renderer, API, preview,
//! export) goes through [`compute_table_totals`] /
//! [`compute_document_total`]; there is deliberately no second code path
//! that could drift.
//!
//! # Quick Start
//!
//! ```
//! use pricing_diff::{OverrideSet, parse_document, compute_table_totals, scan};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let raw = serde_json::json!({
//!     "currency": "USD",
//!     "tables": [{
//!         "id": "led", "name": "LED Display",
//!         "items": [{ "description": "Cabinet", "sellingPrice": 100000.0 }],
//!         "tax": 8000.0
//!     }]
//! });
//! let doc = parse_document(&raw)?;
//! let totals = compute_table_totals(&doc.tables[0], &OverrideSet::empty());
//! assert_eq!(totals.grand_total, 108000.0);
//!
//! let report = scan(&doc, &doc);
//! assert_eq!(report.changed_sections, 0);
//! # Ok(())
//! # }
//! ```

mod config;
mod delta;
mod document;
pub(crate) mod error_codes;
mod matching;
mod output;
mod overrides;
mod parse;
mod totals;

pub use config::{ConfigError, ScanConfig, ScanConfigBuilder};
pub use delta::{ChangeType, DeltaResult, DeltaRow, DeltaSection, scan, scan_with_config};
pub use document::{
    AlternateItem, Currency, LineItem, PricingDocument, PricingTable, TaxSpec,
};
pub use matching::{Pairing, pair_rows, pair_sections};
pub use output::json::{
    RowChange, delta_result_to_row_changes, serialize_delta_result, serialize_table_totals,
};
pub use overrides::{OverrideKey, OverrideKeyParseError, OverrideSet};
pub use parse::{
    DocumentError, FieldIssue, ValidationReport, parse_document, parse_document_lenient,
};
pub use totals::{
    ResolvedLineItem, TableScope, TableTotals, compute_all_table_totals, compute_document_total,
    compute_table_totals,
};
