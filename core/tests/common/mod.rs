#![allow(dead_code)]

use pricing_diff::{
    AlternateItem, Currency, LineItem, PricingDocument, PricingTable, TaxSpec,
};

pub fn li(description: &str, price: f64) -> LineItem {
    LineItem {
        description: description.to_string(),
        selling_price: price,
        is_included: false,
    }
}

pub fn included(description: &str) -> LineItem {
    LineItem {
        description: description.to_string(),
        selling_price: 0.0,
        is_included: true,
    }
}

pub fn alt(description: &str, price_difference: f64) -> AlternateItem {
    AlternateItem {
        description: description.to_string(),
        price_difference,
    }
}

pub fn table(id: &str, name: &str, items: Vec<LineItem>) -> PricingTable {
    PricingTable {
        id: id.to_string(),
        name: name.to_string(),
        items,
        alternates: Vec::new(),
        subtotal: 0.0,
        tax: None,
        bond: 0.0,
        grand_total: 0.0,
    }
}

pub fn table_with_tax(
    id: &str,
    name: &str,
    items: Vec<LineItem>,
    tax_amount: f64,
) -> PricingTable {
    let mut t = table(id, name, items);
    t.tax = Some(TaxSpec::Flat(tax_amount));
    t
}

pub fn doc(tables: Vec<PricingTable>) -> PricingDocument {
    PricingDocument {
        currency: Currency::USD,
        tables,
        master_table_index: None,
        resp_matrix: None,
        document_total: 0.0,
        source_hash: "test".to_string(),
        strict_parser_version: "1.0".to_string(),
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
