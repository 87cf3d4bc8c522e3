use anyhow::Result;
use pricing_diff::{DeltaResult, TableTotals};
use serde_json::json;
use std::io::Write;

pub fn write_totals<W: Write>(
    w: &mut W,
    totals: &[TableTotals],
    document_total: f64,
) -> Result<()> {
    let value = json!({
        "tables": totals,
        "documentTotal": document_total,
    });
    serde_json::to_writer(&mut *w, &value)?;
    writeln!(w)?;
    Ok(())
}

pub fn write_delta_report<W: Write>(w: &mut W, result: &DeltaResult) -> Result<()> {
    serde_json::to_writer(&mut *w, result)?;
    writeln!(w)?;
    Ok(())
}
