use crate::delta::{ChangeType, DeltaResult};
use crate::totals::TableTotals;
use serde::Serialize;

/// One row-level change flattened out of a [`DeltaResult`], for exports
/// and spreadsheet-shaped consumers that don't want the nested report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowChange {
    pub section: String,
    pub label: String,
    pub old_value: f64,
    pub new_value: f64,
    pub delta: f64,
    pub change_type: ChangeType,
}

pub fn serialize_delta_result(result: &DeltaResult) -> serde_json::Result<String> {
    serde_json::to_string(result)
}

pub fn serialize_table_totals(totals: &[TableTotals]) -> serde_json::Result<String> {
    serde_json::to_string(totals)
}

/// Flatten a delta report to its non-unchanged rows, in report order.
pub fn delta_result_to_row_changes(result: &DeltaResult) -> Vec<RowChange> {
    result
        .sections
        .iter()
        .flat_map(|section| {
            section
                .rows
                .iter()
                .filter(|row| row.change_type != ChangeType::Unchanged)
                .map(|row| RowChange {
                    section: section.section_name.clone(),
                    label: row.label.clone(),
                    old_value: row.old_value,
                    new_value: row.new_value,
                    delta: row.delta,
                    change_type: row.change_type,
                })
        })
        .collect()
}
