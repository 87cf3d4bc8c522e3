//! Fallible ingestion of pricing documents from untrusted JSON.
//!
//! The upstream spreadsheet parser guarantees field presence but not that
//! money fields are well-typed: prices arrive as numbers, as `"$1,234.56"`
//! strings, or as garbage. Silently coercing garbage to `0` is a latent
//! financial bug, so ingestion here is explicit about every field it could
//! not read:
//!
//! - [`parse_document`] fails the whole document with a typed error that
//!   carries one [`FieldIssue`] per offending field.
//! - [`parse_document_lenient`] substitutes `0.0` per offending field and
//!   returns the same issues in a [`ValidationReport`] so the caller can
//!   surface a visible warning instead of failing.

use crate::document::{
    AlternateItem, Currency, LineItem, PricingDocument, PricingTable, TaxSpec,
};
use crate::error_codes;
use serde_json::Value;
use thiserror::Error;

/// One field that could not be read as intended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// JSON-pointer-ish path of the offending field, e.g.
    /// `tables[2].items[0].sellingPrice`.
    pub path: String,
    /// The raw value as rendered JSON.
    pub raw: String,
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: cannot read {} as a number", self.path, self.raw)
    }
}

/// Issues collected while ingesting one document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub issues: Vec<FieldIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Error strings with remediation hints, one per issue.
    pub fn messages(&self) -> Vec<String> {
        self.issues
            .iter()
            .map(|issue| {
                format!(
                    "{}. Suggestion: fix the source spreadsheet cell or re-export the document.",
                    issue
                )
            })
            .collect()
    }
}

/// Errors produced by strict document ingestion.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DocumentError {
    #[error(
        "[PRICING_DOC_001] document root is not a JSON object. Suggestion: pass the pricing document value, not a wrapper or array."
    )]
    NotAnObject,

    #[error(
        "[PRICING_DOC_002] required field '{field}' is missing at {path}. Suggestion: re-run the upstream parser; this document is not schema-valid."
    )]
    MissingField { field: &'static str, path: String },

    #[error(
        "[PRICING_DOC_004] unknown currency '{raw}'. Suggestion: currency must be USD or CAD."
    )]
    InvalidCurrency { raw: String },

    #[error(
        "[PRICING_DOC_003] {} malformed numeric field(s), first at {}. Suggestion: fix the fields or use lenient parsing to substitute 0 with visible warnings.",
        report.issues.len(),
        report.issues.first().map(|i| i.path.as_str()).unwrap_or("<none>")
    )]
    MalformedFields { report: ValidationReport },
}

impl DocumentError {
    pub fn code(&self) -> &'static str {
        match self {
            DocumentError::NotAnObject => error_codes::DOC_NOT_OBJECT,
            DocumentError::MissingField { .. } => error_codes::DOC_MISSING_FIELD,
            DocumentError::InvalidCurrency { .. } => error_codes::DOC_INVALID_CURRENCY,
            DocumentError::MalformedFields { .. } => error_codes::DOC_INVALID_NUMERIC,
        }
    }
}

/// Strict ingestion: any malformed money field fails the whole document.
pub fn parse_document(value: &Value) -> Result<PricingDocument, DocumentError> {
    let (doc, report) = parse_document_inner(value)?;
    if report.is_valid() {
        Ok(doc)
    } else {
        Err(DocumentError::MalformedFields { report })
    }
}

/// Lenient ingestion: malformed money fields become `0.0`, each recorded
/// in the returned report. Structural problems (non-object root, missing
/// table ids, unknown currency) still fail: those mean the upstream
/// parser's schema guarantee was broken, not that a cell was dirty.
pub fn parse_document_lenient(
    value: &Value,
) -> Result<(PricingDocument, ValidationReport), DocumentError> {
    parse_document_inner(value)
}

fn parse_document_inner(
    value: &Value,
) -> Result<(PricingDocument, ValidationReport), DocumentError> {
    let root = value.as_object().ok_or(DocumentError::NotAnObject)?;
    let mut report = ValidationReport::default();

    let currency = match root.get("currency") {
        None | Some(Value::Null) => Currency::USD,
        Some(Value::String(s)) => match s.to_uppercase().as_str() {
            "USD" => Currency::USD,
            "CAD" => Currency::CAD,
            _ => return Err(DocumentError::InvalidCurrency { raw: s.clone() }),
        },
        Some(other) => {
            return Err(DocumentError::InvalidCurrency {
                raw: other.to_string(),
            });
        }
    };

    let mut tables = Vec::new();
    if let Some(raw_tables) = root.get("tables").and_then(Value::as_array) {
        for (idx, raw_table) in raw_tables.iter().enumerate() {
            tables.push(parse_table(raw_table, idx, &mut report)?);
        }
    }

    let master_table_index = root
        .get("masterTableIndex")
        .and_then(Value::as_u64)
        .map(|idx| idx as usize);

    let document_total = money_field(root.get("documentTotal"), "documentTotal", &mut report);

    let doc = PricingDocument {
        currency,
        tables,
        master_table_index,
        resp_matrix: root.get("respMatrix").filter(|v| !v.is_null()).cloned(),
        document_total,
        source_hash: string_field(root.get("sourceHash")),
        strict_parser_version: string_field(root.get("strictParserVersion")),
    };

    Ok((doc, report))
}

fn parse_table(
    value: &Value,
    table_idx: usize,
    report: &mut ValidationReport,
) -> Result<PricingTable, DocumentError> {
    let path = format!("tables[{table_idx}]");
    let obj = value
        .as_object()
        .ok_or_else(|| DocumentError::MissingField {
            field: "id",
            path: path.clone(),
        })?;

    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| DocumentError::MissingField {
            field: "id",
            path: path.clone(),
        })?
        .to_string();
    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| DocumentError::MissingField {
            field: "name",
            path: path.clone(),
        })?
        .to_string();

    let mut items = Vec::new();
    if let Some(raw_items) = obj.get("items").and_then(Value::as_array) {
        for (idx, raw_item) in raw_items.iter().enumerate() {
            let item_path = format!("{path}.items[{idx}]");
            let item_obj = raw_item.as_object();
            let description = item_obj
                .and_then(|o| o.get("description"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let selling_price = money_field(
                item_obj.and_then(|o| o.get("sellingPrice")),
                &format!("{item_path}.sellingPrice"),
                report,
            );
            let is_included = item_obj
                .and_then(|o| o.get("isIncluded"))
                .and_then(Value::as_bool)
                .unwrap_or(false);
            items.push(LineItem {
                description,
                selling_price,
                is_included,
            });
        }
    }

    let mut alternates = Vec::new();
    if let Some(raw_alts) = obj.get("alternates").and_then(Value::as_array) {
        for (idx, raw_alt) in raw_alts.iter().enumerate() {
            let alt_obj = raw_alt.as_object();
            let description = alt_obj
                .and_then(|o| o.get("description"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let price_difference = money_field(
                alt_obj.and_then(|o| o.get("priceDifference")),
                &format!("{path}.alternates[{idx}].priceDifference"),
                report,
            );
            alternates.push(AlternateItem {
                description,
                price_difference,
            });
        }
    }

    let tax = parse_tax(obj.get("tax"), &format!("{path}.tax"), report);
    let subtotal = money_field(obj.get("subtotal"), &format!("{path}.subtotal"), report);
    let bond = money_field(obj.get("bond"), &format!("{path}.bond"), report);
    let grand_total = money_field(obj.get("grandTotal"), &format!("{path}.grandTotal"), report);

    Ok(PricingTable {
        id,
        name,
        items,
        alternates,
        subtotal,
        tax,
        bond,
        grand_total,
    })
}

fn parse_tax(value: Option<&Value>, path: &str, report: &mut ValidationReport) -> Option<TaxSpec> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Object(obj)) => {
            let amount = money_field(obj.get("amount"), &format!("{path}.amount"), report);
            let label = obj
                .get("label")
                .and_then(Value::as_str)
                .unwrap_or(TaxSpec::DEFAULT_LABEL)
                .to_string();
            Some(TaxSpec::Labeled { amount, label })
        }
        Some(other) => Some(TaxSpec::Flat(money_field(Some(other), path, report))),
    }
}

fn string_field(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Read a money value, recording an issue (and yielding 0.0) when it is
/// not readable. Absent and null fields are legitimately zero: the
/// upstream parser omits fields that have no value.
fn money_field(value: Option<&Value>, path: &str, report: &mut ValidationReport) -> f64 {
    match value {
        None | Some(Value::Null) => 0.0,
        Some(v) => match coerce_money(v) {
            Some(amount) => amount,
            None => {
                report.issues.push(FieldIssue {
                    path: path.to_string(),
                    raw: v.to_string(),
                });
                0.0
            }
        },
    }
}

/// Accept JSON numbers and currency-formatted strings like `"$1,234.56"`
/// or `"(500.00)"` (accounting negative).
fn coerce_money(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Some(0.0);
            }
            let (body, negated) =
                if let Some(inner) = trimmed.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
                    (inner, true)
                } else {
                    (trimmed, false)
                };
            let cleaned: String = body
                .chars()
                .filter(|c| !matches!(c, '$' | ',' | ' '))
                .collect();
            let parsed: f64 = cleaned.parse().ok()?;
            Some(if negated { -parsed } else { parsed })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerce_money_accepts_currency_strings() {
        assert_eq!(coerce_money(&json!("$1,234.56")), Some(1234.56));
        assert_eq!(coerce_money(&json!("1234.56")), Some(1234.56));
        assert_eq!(coerce_money(&json!("(500.00)")), Some(-500.0));
        assert_eq!(coerce_money(&json!("")), Some(0.0));
        assert_eq!(coerce_money(&json!(42)), Some(42.0));
    }

    #[test]
    fn coerce_money_rejects_non_numeric_shapes() {
        assert_eq!(coerce_money(&json!("TBD")), None);
        assert_eq!(coerce_money(&json!(true)), None);
        assert_eq!(coerce_money(&json!([1, 2])), None);
    }

    #[test]
    fn issue_path_names_the_offending_field() {
        let doc = json!({
            "currency": "USD",
            "tables": [{
                "id": "t1",
                "name": "Scoreboard",
                "items": [{ "description": "Cabinet", "sellingPrice": "call for pricing" }]
            }]
        });
        let (_, report) = parse_document_lenient(&doc).expect("structurally valid");
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].path, "tables[0].items[0].sellingPrice");
        assert!(report.messages()[0].contains("Suggestion:"));
    }
}
