//! Position-keyed price and description overrides.
//!
//! Overrides are advisory edits layered on top of the parsed document:
//! an override either fully replaces a price or a description, or it is
//! absent. Keys are positional (`"<tableId>:<itemIndex>"`), so a key whose
//! index no longer corresponds to a row is simply never consulted. That
//! fragility under upstream row reordering is a documented property of the
//! wire contract, not something this module papers over; callers that want
//! visibility can log [`OverrideSet::stale_keys`].

use crate::document::PricingDocument;
use crate::error_codes;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Failure to parse an override key from its `"tableId:index"` string form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "[PRICING_OVR_001] invalid override key '{input}': expected '<tableId>:<itemIndex>'. Suggestion: check the override map keys against the document's table ids."
)]
pub struct OverrideKeyParseError {
    pub input: String,
}

impl OverrideKeyParseError {
    pub fn code(&self) -> &'static str {
        error_codes::OVERRIDE_KEY_PARSE
    }
}

/// Positional identity of one line item at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverrideKey {
    pub table_id: String,
    pub item_index: usize,
}

impl OverrideKey {
    pub fn new(table_id: impl Into<String>, item_index: usize) -> OverrideKey {
        OverrideKey {
            table_id: table_id.into(),
            item_index,
        }
    }
}

impl fmt::Display for OverrideKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.table_id, self.item_index)
    }
}

impl FromStr for OverrideKey {
    type Err = OverrideKeyParseError;

    /// Table ids may themselves contain ':'; the index is everything after
    /// the final colon.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (table_id, index_str) = s.rsplit_once(':').ok_or_else(|| OverrideKeyParseError {
            input: s.to_string(),
        })?;
        if table_id.is_empty() {
            return Err(OverrideKeyParseError {
                input: s.to_string(),
            });
        }
        let item_index = index_str.parse().map_err(|_| OverrideKeyParseError {
            input: s.to_string(),
        })?;
        Ok(OverrideKey {
            table_id: table_id.to_string(),
            item_index,
        })
    }
}

impl Serialize for OverrideKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for OverrideKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        OverrideKey::from_str(&s).map_err(|e| DeError::custom(e.to_string()))
    }
}

/// An immutable set of per-cell user overrides, passed by reference into
/// the totals engine.
///
/// The JSON form is two flat string-keyed maps, matching the upstream
/// contract:
///
/// ```json
/// { "priceOverrides": { "led-display:0": 110000.0 },
///   "descriptionOverrides": { "led-display:1": "Installation (revised)" } }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OverrideSet {
    #[serde(default, rename = "priceOverrides")]
    pub prices: HashMap<OverrideKey, f64>,
    #[serde(default, rename = "descriptionOverrides")]
    pub descriptions: HashMap<OverrideKey, String>,
}

impl OverrideSet {
    pub fn empty() -> OverrideSet {
        OverrideSet::default()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty() && self.descriptions.is_empty()
    }

    pub fn price(&self, table_id: &str, item_index: usize) -> Option<f64> {
        self.prices
            .get(&OverrideKey::new(table_id, item_index))
            .copied()
    }

    pub fn description(&self, table_id: &str, item_index: usize) -> Option<&str> {
        self.descriptions
            .get(&OverrideKey::new(table_id, item_index))
            .map(String::as_str)
    }

    /// Keys that no longer address a valid row of `doc`.
    ///
    /// Stale keys are silent no-ops during computation; this report exists
    /// so callers can log them. Order is deterministic (sorted by string
    /// form).
    pub fn stale_keys(&self, doc: &PricingDocument) -> Vec<OverrideKey> {
        let mut stale: Vec<OverrideKey> = self
            .prices
            .keys()
            .chain(self.descriptions.keys())
            .filter(|key| {
                !doc.tables
                    .iter()
                    .any(|t| t.id == key.table_id && key.item_index < t.items.len())
            })
            .cloned()
            .collect();
        stale.sort_by_key(|k| k.to_string());
        stale.dedup();
        stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Currency, LineItem, PricingDocument, PricingTable};

    fn doc_with_table(id: &str, item_count: usize) -> PricingDocument {
        let items = (0..item_count)
            .map(|i| LineItem {
                description: format!("Item {i}"),
                selling_price: 1.0,
                is_included: false,
            })
            .collect();
        PricingDocument {
            currency: Currency::USD,
            tables: vec![PricingTable {
                id: id.to_string(),
                name: id.to_string(),
                items,
                alternates: Vec::new(),
                subtotal: 0.0,
                tax: None,
                bond: 0.0,
                grand_total: 0.0,
            }],
            master_table_index: None,
            resp_matrix: None,
            document_total: 0.0,
            source_hash: String::new(),
            strict_parser_version: String::new(),
        }
    }

    #[test]
    fn key_roundtrips_through_string_form() {
        let key = OverrideKey::new("led-display", 3);
        assert_eq!(key.to_string(), "led-display:3");
        assert_eq!("led-display:3".parse::<OverrideKey>().unwrap(), key);
    }

    #[test]
    fn key_with_colon_in_table_id_splits_on_last_colon() {
        let key: OverrideKey = "sheet:led:7".parse().unwrap();
        assert_eq!(key.table_id, "sheet:led");
        assert_eq!(key.item_index, 7);
    }

    #[test]
    fn malformed_keys_are_rejected() {
        assert!("no-colon".parse::<OverrideKey>().is_err());
        assert!(":3".parse::<OverrideKey>().is_err());
        assert!("t:notanumber".parse::<OverrideKey>().is_err());
    }

    #[test]
    fn override_set_deserializes_flat_string_maps() {
        let json = r#"{
            "priceOverrides": { "led-display:0": 110000.0 },
            "descriptionOverrides": { "led-display:1": "Installation (revised)" }
        }"#;
        let set: OverrideSet = serde_json::from_str(json).expect("override set should parse");
        assert_eq!(set.price("led-display", 0), Some(110000.0));
        assert_eq!(
            set.description("led-display", 1),
            Some("Installation (revised)")
        );
        assert_eq!(set.price("led-display", 9), None);
    }

    #[test]
    fn stale_keys_reports_out_of_range_and_unknown_tables() {
        let doc = doc_with_table("led-display", 2);
        let mut set = OverrideSet::empty();
        set.prices.insert(OverrideKey::new("led-display", 0), 1.0);
        set.prices.insert(OverrideKey::new("led-display", 5), 2.0);
        set.descriptions
            .insert(OverrideKey::new("gone-table", 0), "x".into());

        let stale = set.stale_keys(&doc);
        assert_eq!(
            stale,
            vec![
                OverrideKey::new("gone-table", 0),
                OverrideKey::new("led-display", 5),
            ]
        );
    }
}
