//! Pricing document data structures.
//!
//! This module defines the shared schema every consumer of the totals
//! engine works against:
//! - [`PricingDocument`]: a parsed pricing document (one per uploaded file)
//! - [`PricingTable`]: a named section of priced line items
//! - [`LineItem`] / [`AlternateItem`]: individual rows
//! - [`TaxSpec`]: flat or labeled tax amount
//!
//! These are pure value objects. All money math lives in [`crate::totals`];
//! the only behavior here is master/rollup table designation, which is a
//! property of the document's shape rather than of any computation.

use serde::{Deserialize, Serialize};

/// Keywords that mark the first table of a multi-table document as the
/// project-level rollup when no explicit master index is set.
///
/// Matching is case-insensitive substring containment.
const MASTER_NAME_KEYWORDS: &[&str] = &[
    "grand total",
    "project total",
    "cost summary",
    "pricing summary",
    "roll-up",
    "total",
    "summary",
];

/// Document currency. Formatting only; no conversion is ever performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    CAD,
}

impl Currency {
    /// Symbol prefix used by text renderers.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::CAD => "C$",
        }
    }
}

/// Tax on a table: either a bare amount or an amount with a display label.
///
/// The wire shape is untagged (a JSON number, or `{"amount": ..., "label": ...}`)
/// for compatibility with upstream parsers; in Rust the two shapes are
/// exhaustive variants rather than a runtime-sniffed union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaxSpec {
    Flat(f64),
    Labeled { amount: f64, label: String },
}

impl TaxSpec {
    pub const DEFAULT_LABEL: &'static str = "TAX";

    pub fn amount(&self) -> f64 {
        match self {
            TaxSpec::Flat(amount) => *amount,
            TaxSpec::Labeled { amount, .. } => *amount,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TaxSpec::Flat(_) => Self::DEFAULT_LABEL,
            TaxSpec::Labeled { label, .. } => label,
        }
    }
}

/// A single priced row within a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,
    /// Parse-time price. May be superseded by a positional price override.
    #[serde(default)]
    pub selling_price: f64,
    /// An included item contributes $0 to the subtotal and renders as the
    /// literal "INCLUDED" regardless of overrides.
    #[serde(default)]
    pub is_included: bool,
}

/// An optional priced add/remove line. Never contributes to any total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternateItem {
    pub description: String,
    #[serde(default)]
    pub price_difference: f64,
}

impl AlternateItem {
    /// Threshold below which an alternate's price difference is noise.
    pub const MIN_PRICE_DIFFERENCE: f64 = 0.01;

    /// Whether this alternate should be surfaced at all.
    ///
    /// Empty or effectively-zero alternates are dropped entirely, not
    /// rendered as $0 rows.
    pub fn is_real(&self) -> bool {
        !self.description.trim().is_empty()
            && self.price_difference.abs() >= Self::MIN_PRICE_DIFFERENCE
    }
}

/// A named section of line items with its own tax, bond, and totals.
///
/// `subtotal` and `grand_total` are parse-time snapshots. They are not
/// authoritative once overrides exist; the totals engine re-derives the
/// current truth from `items` on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTable {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub alternates: Vec<AlternateItem>,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<TaxSpec>,
    /// Flat absolute dollar surcharge applied after tax. Never rescaled.
    #[serde(default)]
    pub bond: f64,
    #[serde(default)]
    pub grand_total: f64,
}

impl PricingTable {
    /// Alternates that survive the [`AlternateItem::is_real`] filter,
    /// in document order.
    pub fn real_alternates(&self) -> Vec<AlternateItem> {
        self.alternates
            .iter()
            .filter(|a| a.is_real())
            .cloned()
            .collect()
    }
}

/// A complete pricing document as produced by the upstream parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingDocument {
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub tables: Vec<PricingTable>,
    /// Explicit designation of the project-level rollup table, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_table_index: Option<usize>,
    /// Opaque responsibility-matrix payload. Carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resp_matrix: Option<serde_json::Value>,
    /// Snapshot computed at parse time. Not authoritative once overrides
    /// exist; re-run the totals engine for the current truth.
    #[serde(default)]
    pub document_total: f64,
    #[serde(default)]
    pub source_hash: String,
    #[serde(default)]
    pub strict_parser_version: String,
}

impl PricingDocument {
    /// The index of the master/rollup table, explicit or inferred.
    ///
    /// Inference applies only when no explicit index is set and more than
    /// one table exists: if the first table's name contains a rollup
    /// keyword (case-insensitive), index 0 is the master.
    pub fn master_index(&self) -> Option<usize> {
        if let Some(idx) = self.master_table_index {
            return (idx < self.tables.len()).then_some(idx);
        }
        if self.tables.len() > 1 {
            let first = self.tables[0].name.to_lowercase();
            if MASTER_NAME_KEYWORDS.iter().any(|kw| first.contains(kw)) {
                return Some(0);
            }
        }
        None
    }

    /// Detail tables: every table except the master, in document order.
    ///
    /// The master is excluded so that renderers which show it as a summary
    /// never enumerate it a second time. Its grand total is *not* reconciled
    /// against the sum of the details here; the delta scanner emits a
    /// non-fatal warning when the two diverge.
    pub fn detail_tables(&self) -> impl Iterator<Item = (usize, &PricingTable)> {
        let master = self.master_index();
        self.tables
            .iter()
            .enumerate()
            .filter(move |(idx, _)| Some(*idx) != master)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str) -> PricingTable {
        PricingTable {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            items: Vec::new(),
            alternates: Vec::new(),
            subtotal: 0.0,
            tax: None,
            bond: 0.0,
            grand_total: 0.0,
        }
    }

    fn doc(tables: Vec<PricingTable>) -> PricingDocument {
        PricingDocument {
            currency: Currency::USD,
            tables,
            master_table_index: None,
            resp_matrix: None,
            document_total: 0.0,
            source_hash: String::new(),
            strict_parser_version: String::new(),
        }
    }

    #[test]
    fn tax_spec_label_defaults_to_tax() {
        assert_eq!(TaxSpec::Flat(100.0).label(), "TAX");
        let labeled = TaxSpec::Labeled {
            amount: 50.0,
            label: "GST".into(),
        };
        assert_eq!(labeled.label(), "GST");
        assert_eq!(labeled.amount(), 50.0);
    }

    #[test]
    fn tax_spec_deserializes_both_wire_shapes() {
        let flat: TaxSpec = serde_json::from_str("1234.5").expect("flat tax should parse");
        assert_eq!(flat, TaxSpec::Flat(1234.5));

        let labeled: TaxSpec = serde_json::from_str(r#"{"amount": 50.0, "label": "HST"}"#)
            .expect("labeled tax should parse");
        assert_eq!(labeled.amount(), 50.0);
        assert_eq!(labeled.label(), "HST");
    }

    #[test]
    fn alternate_reality_requires_description_and_magnitude() {
        let real = AlternateItem {
            description: "Upgrade to 10mm pitch".into(),
            price_difference: 2500.0,
        };
        assert!(real.is_real());

        let negative = AlternateItem {
            description: "Deduct spare modules".into(),
            price_difference: -0.02,
        };
        assert!(negative.is_real());

        let empty_desc = AlternateItem {
            description: "   ".into(),
            price_difference: 500.0,
        };
        assert!(!empty_desc.is_real());

        let too_small = AlternateItem {
            description: "Rounding artifact".into(),
            price_difference: 0.005,
        };
        assert!(!too_small.is_real());
    }

    #[test]
    fn explicit_master_index_wins_over_inference() {
        let mut d = doc(vec![table("Scoreboard"), table("Project Cost Summary")]);
        d.master_table_index = Some(1);
        assert_eq!(d.master_index(), Some(1));
    }

    #[test]
    fn out_of_range_explicit_master_is_ignored() {
        let mut d = doc(vec![table("Scoreboard")]);
        d.master_table_index = Some(5);
        assert_eq!(d.master_index(), None);
    }

    #[test]
    fn master_inferred_from_first_table_keyword() {
        let d = doc(vec![
            table("Project Cost Summary"),
            table("Scoreboard"),
            table("Ribbon Board"),
        ]);
        assert_eq!(d.master_index(), Some(0));
    }

    #[test]
    fn no_inference_for_single_table_document() {
        let d = doc(vec![table("Grand Total")]);
        assert_eq!(d.master_index(), None);
    }

    #[test]
    fn no_inference_when_first_table_is_ordinary() {
        let d = doc(vec![table("Scoreboard"), table("Ribbon Board")]);
        assert_eq!(d.master_index(), None);
    }

    #[test]
    fn detail_tables_skip_the_master() {
        let d = doc(vec![
            table("Roll-Up"),
            table("Scoreboard"),
            table("Ribbon Board"),
        ]);
        let names: Vec<&str> = d.detail_tables().map(|(_, t)| t.name.as_str()).collect();
        assert_eq!(names, vec!["Scoreboard", "Ribbon Board"]);
    }

    #[test]
    fn document_roundtrips_through_camel_case_wire_names() {
        let mut d = doc(vec![table("Scoreboard")]);
        d.master_table_index = Some(0);
        d.document_total = 99.5;
        d.source_hash = "abc123".into();

        let json = serde_json::to_value(&d).expect("serialize document");
        assert!(json.get("masterTableIndex").is_some());
        assert!(json.get("documentTotal").is_some());
        assert!(json.get("sourceHash").is_some());

        let back: PricingDocument = serde_json::from_value(json).expect("deserialize document");
        assert_eq!(back, d);
    }
}
