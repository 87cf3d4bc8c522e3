mod common;

use common::{doc, included, li, table, table_with_tax};
use pricing_diff::{
    OverrideSet, compute_all_table_totals, delta_result_to_row_changes, scan,
    serialize_delta_result, serialize_table_totals,
};
use serde_json::Value;

#[test]
fn delta_result_wire_shape_is_camel_case() {
    let old = doc(vec![table_with_tax(
        "led",
        "LED Display",
        vec![li("Cabinet", 100000.0), li("Install", 20000.0)],
        9600.0,
    )]);
    let new = doc(vec![table_with_tax(
        "led",
        "LED Display",
        vec![li("Cabinet", 110000.0), li("Install", 20000.0)],
        10400.0,
    )]);
    let result = scan(&old, &new);

    let json = serialize_delta_result(&result).expect("serialization should succeed");
    let value: Value = serde_json::from_str(&json).expect("json should parse");

    assert_eq!(value["oldGrandTotal"], 129600.0);
    assert_eq!(value["newGrandTotal"], 140400.0);
    assert_eq!(value["grandTotalDelta"], 10800.0);
    assert!(value["grandTotalPctChange"].is_number());
    assert_eq!(value["totalSections"], 1);
    assert_eq!(value["changedSections"], 1);
    assert_eq!(value["addedSections"], 0);
    assert_eq!(value["removedSections"], 0);
    assert_eq!(value["totalRowChanges"], 1);

    let section = &value["sections"][0];
    assert_eq!(section["sectionName"], "LED Display");
    assert_eq!(section["changeType"], "changed");

    let row = &section["rows"][0];
    assert_eq!(row["label"], "Cabinet");
    assert_eq!(row["oldValue"], 100000.0);
    assert_eq!(row["newValue"], 110000.0);
    assert_eq!(row["delta"], 10000.0);
    assert_eq!(row["changeType"], "changed");

    // No warnings on a clean scan, and the field is omitted entirely.
    assert!(value.get("warnings").is_none());
}

#[test]
fn null_pct_change_serializes_as_json_null() {
    let old = doc(vec![table("a", "Scoreboard", Vec::new())]);
    let new = doc(vec![table("a", "Scoreboard", vec![li("Cabinet", 5000.0)])]);
    let result = scan(&old, &new);

    let json = serialize_delta_result(&result).expect("serialization should succeed");
    let value: Value = serde_json::from_str(&json).expect("json should parse");
    assert!(value["grandTotalPctChange"].is_null());
}

#[test]
fn table_totals_wire_shape() {
    let mut t = table_with_tax(
        "led",
        "LED Display",
        vec![li("Cabinet", 100.0), included("Shipping")],
        8.0,
    );
    t.bond = 50.0;
    let d = doc(vec![t]);
    let totals = compute_all_table_totals(&d, &OverrideSet::empty());

    let json = serialize_table_totals(&totals).expect("serialization should succeed");
    let value: Value = serde_json::from_str(&json).expect("json should parse");

    let first = &value[0];
    assert_eq!(first["tableId"], "led");
    assert_eq!(first["subtotal"], 100.0);
    assert_eq!(first["taxLabel"], "TAX");
    assert_eq!(first["taxAmount"], 8.0);
    assert_eq!(first["bond"], 50.0);
    assert_eq!(first["grandTotal"], 158.0);
    assert_eq!(first["items"][0]["originalIndex"], 0);
    assert_eq!(first["items"][1]["isIncluded"], true);
    assert_eq!(first["items"][1]["price"], 0.0);
}

#[test]
fn row_changes_flatten_only_changed_rows() {
    let old = doc(vec![table(
        "a",
        "Scoreboard",
        vec![li("Cabinet", 100.0), li("Rails", 20.0)],
    )]);
    let new = doc(vec![table(
        "a",
        "Scoreboard",
        vec![li("Cabinet", 150.0), li("Rails", 20.0), li("Spares", 5.0)],
    )]);
    let result = scan(&old, &new);
    let changes = delta_result_to_row_changes(&result);

    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].label, "Cabinet");
    assert_eq!(changes[0].section, "Scoreboard");
    assert_eq!(changes[0].delta, 50.0);
    assert_eq!(changes[1].label, "Spares");
    assert_eq!(changes[1].delta, 5.0);
}
