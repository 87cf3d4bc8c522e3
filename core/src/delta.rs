//! The revision delta scanner.
//!
//! Compares two independently-authored pricing documents and reports,
//! section-by-section and row-by-row, what changed and its dollar and
//! percentage impact. A single pure synchronous pass: the totals engine is
//! run over every table of both sides (with empty override maps, since the
//! scanner compares the documents' own as-authored numbers), sections are
//! paired by name, rows by description, and the deltas aggregated.

use crate::config::ScanConfig;
use crate::document::PricingDocument;
use crate::matching::{Pairing, pair_rows, pair_sections};
use crate::overrides::OverrideSet;
use crate::totals::{TableScope, TableTotals, compute_document_total, compute_table_totals};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Removed,
    Changed,
    Unchanged,
}

/// One row of a section diff. `delta == new_value - old_value` always
/// holds; the missing side of an added/removed row contributes 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaRow {
    pub label: String,
    pub old_value: f64,
    pub new_value: f64,
    pub delta: f64,
    pub change_type: ChangeType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaSection {
    pub section_name: String,
    pub change_type: ChangeType,
    pub old_total: f64,
    pub new_total: f64,
    pub delta: f64,
    pub rows: Vec<DeltaRow>,
}

/// The full structured diff between two documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaResult {
    pub old_grand_total: f64,
    pub new_grand_total: f64,
    pub grand_total_delta: f64,
    /// Percentage change of the grand total. `None` when the old grand
    /// total is 0: "not applicable" is distinct from 0%.
    pub grand_total_pct_change: Option<f64>,
    pub total_sections: usize,
    pub changed_sections: usize,
    pub added_sections: usize,
    pub removed_sections: usize,
    pub total_row_changes: usize,
    pub sections: Vec<DeltaSection>,
    /// Non-fatal consistency warnings (master/rollup divergence). Empty on
    /// clean scans and omitted from the wire in that case.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Diff `old` against `new` with default configuration.
pub fn scan(old: &PricingDocument, new: &PricingDocument) -> DeltaResult {
    scan_with_config(old, new, &ScanConfig::default())
}

/// Diff `old` against `new`.
///
/// Grand totals on each side come from [`compute_document_total`]; when a
/// master/rollup table exists its grand total restates the details, so the
/// detail-only scope is used to avoid double counting. The master still
/// appears in `sections` like any other table.
pub fn scan_with_config(
    old: &PricingDocument,
    new: &PricingDocument,
    config: &ScanConfig,
) -> DeltaResult {
    let no_overrides = OverrideSet::empty();

    let old_totals: Vec<TableTotals> = old
        .tables
        .iter()
        .map(|t| compute_table_totals(t, &no_overrides))
        .collect();
    let new_totals: Vec<TableTotals> = new
        .tables
        .iter()
        .map(|t| compute_table_totals(t, &no_overrides))
        .collect();

    let mut sections = Vec::new();
    for pairing in pair_sections(&old_totals, &new_totals, config) {
        let section = match pairing {
            Pairing::Matched { old_idx, new_idx } => {
                diff_matched_section(&old_totals[old_idx], &new_totals[new_idx], config)
            }
            Pairing::RemovedFromOld { old_idx } => {
                one_sided_section(&old_totals[old_idx], ChangeType::Removed)
            }
            Pairing::AddedInNew { new_idx } => {
                one_sided_section(&new_totals[new_idx], ChangeType::Added)
            }
        };
        sections.push(section);
    }

    let old_grand_total = grand_total_for_scan(old, &no_overrides);
    let new_grand_total = grand_total_for_scan(new, &no_overrides);
    let grand_total_delta = new_grand_total - old_grand_total;
    let grand_total_pct_change = if old_grand_total != 0.0 {
        Some(grand_total_delta / old_grand_total * 100.0)
    } else {
        None
    };

    let changed_sections = sections
        .iter()
        .filter(|s| s.change_type == ChangeType::Changed)
        .count();
    let added_sections = sections
        .iter()
        .filter(|s| s.change_type == ChangeType::Added)
        .count();
    let removed_sections = sections
        .iter()
        .filter(|s| s.change_type == ChangeType::Removed)
        .count();
    let total_row_changes = sections
        .iter()
        .flat_map(|s| &s.rows)
        .filter(|r| r.change_type != ChangeType::Unchanged)
        .count();

    let mut warnings = Vec::new();
    if config.reconcile_master {
        reconcile_master(old, &old_totals, "old", config, &mut warnings);
        reconcile_master(new, &new_totals, "new", config, &mut warnings);
    }

    DeltaResult {
        old_grand_total,
        new_grand_total,
        grand_total_delta,
        grand_total_pct_change,
        total_sections: sections.len(),
        changed_sections,
        added_sections,
        removed_sections,
        total_row_changes,
        sections,
        warnings,
    }
}

fn grand_total_for_scan(doc: &PricingDocument, overrides: &OverrideSet) -> f64 {
    let scope = if doc.master_index().is_some() {
        TableScope::DetailOnly
    } else {
        TableScope::AllTables
    };
    compute_document_total(doc, overrides, scope)
}

fn diff_matched_section(
    old: &TableTotals,
    new: &TableTotals,
    config: &ScanConfig,
) -> DeltaSection {
    let mut rows = Vec::new();
    let mut any_row_changed = false;

    for pairing in pair_rows(old, new, config) {
        let row = match pairing {
            Pairing::Matched { old_idx, new_idx } => {
                let old_item = &old.items[old_idx];
                let new_item = &new.items[new_idx];
                let delta = new_item.price - old_item.price;
                let change_type = if delta.abs() < config.price_epsilon {
                    ChangeType::Unchanged
                } else {
                    ChangeType::Changed
                };
                DeltaRow {
                    label: old_item.description.clone(),
                    old_value: old_item.price,
                    new_value: new_item.price,
                    delta,
                    change_type,
                }
            }
            Pairing::RemovedFromOld { old_idx } => {
                let item = &old.items[old_idx];
                DeltaRow {
                    label: item.description.clone(),
                    old_value: item.price,
                    new_value: 0.0,
                    delta: -item.price,
                    change_type: ChangeType::Removed,
                }
            }
            Pairing::AddedInNew { new_idx } => {
                let item = &new.items[new_idx];
                DeltaRow {
                    label: item.description.clone(),
                    old_value: 0.0,
                    new_value: item.price,
                    delta: item.price,
                    change_type: ChangeType::Added,
                }
            }
        };
        if row.change_type != ChangeType::Unchanged {
            any_row_changed = true;
        }
        rows.push(row);
    }

    let delta = new.grand_total - old.grand_total;
    let change_type = if any_row_changed || delta.abs() >= config.price_epsilon {
        ChangeType::Changed
    } else {
        ChangeType::Unchanged
    };

    DeltaSection {
        section_name: old.name.clone(),
        change_type,
        old_total: old.grand_total,
        new_total: new.grand_total,
        delta,
        rows,
    }
}

/// A section present on only one side. Totals default to 0 on the missing
/// side and every row mirrors the section's change type.
fn one_sided_section(totals: &TableTotals, change_type: ChangeType) -> DeltaSection {
    let removed = change_type == ChangeType::Removed;
    let rows = totals
        .items
        .iter()
        .map(|item| DeltaRow {
            label: item.description.clone(),
            old_value: if removed { item.price } else { 0.0 },
            new_value: if removed { 0.0 } else { item.price },
            delta: if removed { -item.price } else { item.price },
            change_type,
        })
        .collect();

    let (old_total, new_total) = if removed {
        (totals.grand_total, 0.0)
    } else {
        (0.0, totals.grand_total)
    };

    DeltaSection {
        section_name: totals.name.clone(),
        change_type,
        old_total,
        new_total,
        delta: new_total - old_total,
        rows,
    }
}

fn reconcile_master(
    doc: &PricingDocument,
    totals: &[TableTotals],
    side: &str,
    config: &ScanConfig,
    warnings: &mut Vec<String>,
) {
    let Some(master_idx) = doc.master_index() else {
        return;
    };
    let master = &totals[master_idx];
    let detail_sum: f64 = totals
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != master_idx)
        .map(|(_, t)| t.grand_total)
        .sum();

    let divergence = (master.grand_total - detail_sum).abs();
    if divergence > config.reconcile_epsilon {
        // Neither number is assumed correct; the caller decides what to do.
        warnings.push(format!(
            "{} document: master table '{}' grand total {:.2} differs from sum of detail tables {:.2} by {:.2}",
            side, master.name, master.grand_total, detail_sum, divergence
        ));
    }
}
