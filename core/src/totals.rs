//! The totals engine: the single source of truth for all money math.
//!
//! Every consumer of a pricing document (document renderer, API response,
//! UI preview, spreadsheet export, delta scanner) must obtain its numbers
//! through [`compute_table_totals`] and [`compute_document_total`]. No
//! other code path may re-derive a subtotal or grand total; that contract
//! is what keeps independent surfaces byte-consistent.
//!
//! All functions here are pure: full input in, fresh value out, no shared
//! state, safe to call concurrently across requests.

use crate::document::{AlternateItem, PricingDocument, PricingTable, TaxSpec};
use crate::overrides::OverrideSet;
use serde::{Deserialize, Serialize};

/// Which tables participate in a document-level total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableScope {
    /// One flat total across every table, master included.
    AllTables,
    /// Sum of detail tables only, excluding the master/rollup. Callers
    /// that render a master summary alongside detail tables use this to
    /// avoid double counting.
    DetailOnly,
}

/// A line item after override resolution.
///
/// `original_index` is the item's position at parse time, retained so
/// renderers can keep stable row identity (zebra striping, anchors)
/// regardless of what happens downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLineItem {
    pub original_index: usize,
    pub description: String,
    /// Resolved price. Always 0 for included items, regardless of overrides.
    pub price: f64,
    pub is_included: bool,
}

/// The computed totals for one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableTotals {
    pub table_id: String,
    pub name: String,
    pub items: Vec<ResolvedLineItem>,
    pub subtotal: f64,
    pub tax_label: String,
    pub tax_amount: f64,
    pub bond: f64,
    pub grand_total: f64,
    /// Alternates that pass the reality filter. Never part of any total.
    pub alternates: Vec<AlternateItem>,
}

/// Compute per-table totals from raw items plus overrides.
///
/// Resolution per item at index `i` of table `T`:
/// - description: `descriptions["T:i"]` if present, else the parsed one
/// - price: `prices["T:i"]` if present, else the parsed selling price;
///   items flagged included always resolve to price 0
///
/// The subtotal sums resolved prices over all non-included items. Items
/// below any zero-dollar display threshold are still summed: suppression
/// is a rendering concern, and keeping it out of the arithmetic is what
/// guarantees the displayed subtotal equals the sum of what is shown plus
/// the hidden $0 noise.
///
/// Tax is re-derived proportionally so the original *rate* survives
/// overrides: `rate = original_tax / original_subtotal` (0 when the
/// original subtotal is not positive). The original subtotal comes from
/// the raw items, not the table's parse-time snapshot, which is not
/// authoritative.
///
/// Bond passes through unchanged: it is a flat absolute surcharge.
pub fn compute_table_totals(table: &PricingTable, overrides: &OverrideSet) -> TableTotals {
    let mut items = Vec::with_capacity(table.items.len());
    let mut subtotal = 0.0;

    for (index, item) in table.items.iter().enumerate() {
        let description = overrides
            .description(&table.id, index)
            .unwrap_or(&item.description)
            .to_string();
        let price = if item.is_included {
            0.0
        } else {
            overrides
                .price(&table.id, index)
                .unwrap_or(item.selling_price)
        };

        if !item.is_included {
            subtotal += price;
        }

        items.push(ResolvedLineItem {
            original_index: index,
            description,
            price,
            is_included: item.is_included,
        });
    }

    let original_subtotal: f64 = table
        .items
        .iter()
        .filter(|item| !item.is_included)
        .map(|item| item.selling_price)
        .sum();

    let tax_rate = match &table.tax {
        Some(tax) if original_subtotal > 0.0 => tax.amount() / original_subtotal,
        _ => 0.0,
    };
    let tax_amount = subtotal * tax_rate;

    let tax_label = table
        .tax
        .as_ref()
        .map(|t| t.label().to_string())
        .unwrap_or_else(|| TaxSpec::DEFAULT_LABEL.to_string());

    let bond = table.bond;
    let grand_total = subtotal + tax_amount + bond;

    TableTotals {
        table_id: table.id.clone(),
        name: table.name.clone(),
        items,
        subtotal,
        tax_label,
        tax_amount,
        bond,
        grand_total,
        alternates: table.real_alternates(),
    }
}

/// Compute the document total by summing table grand totals.
///
/// This is the one call path every consumer must use for a document-level
/// figure. `scope` expresses caller intent: a flat total across all
/// tables, or the sum of detail tables when a master summary is rendered
/// separately.
pub fn compute_document_total(
    doc: &PricingDocument,
    overrides: &OverrideSet,
    scope: TableScope,
) -> f64 {
    let master = doc.master_index();
    doc.tables
        .iter()
        .enumerate()
        .filter(|(idx, _)| match scope {
            TableScope::AllTables => true,
            TableScope::DetailOnly => Some(*idx) != master,
        })
        .map(|(_, table)| compute_table_totals(table, overrides).grand_total)
        .sum()
}

/// Totals for every table of the document, in document order.
///
/// Convenience for renderers that show all sections; each entry is exactly
/// what [`compute_table_totals`] returns for that table.
pub fn compute_all_table_totals(doc: &PricingDocument, overrides: &OverrideSet) -> Vec<TableTotals> {
    doc.tables
        .iter()
        .map(|table| compute_table_totals(table, overrides))
        .collect()
}
