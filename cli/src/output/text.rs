use crate::Verbosity;
use anyhow::Result;
use pricing_diff::{
    ChangeType, Currency, DeltaResult, DeltaSection, PricingDocument, TableTotals,
};
use std::io::Write;

/// Format a dollar amount with thousands separators, e.g. `$1,234.56`.
/// Negative amounts render with a leading minus: `-$500.00`.
pub fn format_money(amount: f64, currency: Currency) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!(
        "{}{}{}.{:02}",
        if negative { "-" } else { "" },
        currency.symbol(),
        grouped,
        frac
    )
}

fn format_signed_money(amount: f64, currency: Currency) -> String {
    if amount >= 0.0 {
        format!("+{}", format_money(amount, currency))
    } else {
        format_money(amount, currency)
    }
}

pub fn write_totals<W: Write>(
    w: &mut W,
    doc: &PricingDocument,
    totals: &[TableTotals],
    document_total: f64,
    verbosity: Verbosity,
) -> Result<()> {
    let currency = doc.currency;
    let master = doc.master_index();

    if verbosity != Verbosity::Quiet {
        for (idx, table) in totals.iter().enumerate() {
            let marker = if Some(idx) == master { " (master)" } else { "" };
            writeln!(w, "{}{}:", table.name, marker)?;

            if verbosity == Verbosity::Verbose {
                for item in &table.items {
                    let price = if item.is_included {
                        "INCLUDED".to_string()
                    } else {
                        format_money(item.price, currency)
                    };
                    writeln!(w, "  {}  {}", item.description, price)?;
                }
                for alternate in &table.alternates {
                    writeln!(
                        w,
                        "  ALT: {}  {}",
                        alternate.description,
                        format_signed_money(alternate.price_difference, currency)
                    )?;
                }
            }

            writeln!(w, "  Subtotal: {}", format_money(table.subtotal, currency))?;
            writeln!(
                w,
                "  {}: {}",
                table.tax_label,
                format_money(table.tax_amount, currency)
            )?;
            if table.bond != 0.0 {
                writeln!(w, "  Bond: {}", format_money(table.bond, currency))?;
            }
            writeln!(
                w,
                "  Grand total: {}",
                format_money(table.grand_total, currency)
            )?;
            writeln!(w)?;
        }
    }

    writeln!(
        w,
        "Document total: {}",
        format_money(document_total, currency)
    )?;
    Ok(())
}

pub fn write_delta_report<W: Write>(
    w: &mut W,
    currency: Currency,
    result: &DeltaResult,
    verbosity: Verbosity,
) -> Result<()> {
    let has_changes = result.changed_sections > 0
        || result.added_sections > 0
        || result.removed_sections > 0
        || result.total_row_changes > 0;

    if !has_changes && verbosity != Verbosity::Verbose {
        writeln!(w, "No differences found.")?;
        write_summary(w, currency, result)?;
        return Ok(());
    }

    if verbosity != Verbosity::Quiet {
        for section in &result.sections {
            if section.change_type == ChangeType::Unchanged && verbosity != Verbosity::Verbose {
                continue;
            }
            write_section(w, currency, section, verbosity)?;
        }
    }

    write_summary(w, currency, result)?;
    Ok(())
}

fn write_section<W: Write>(
    w: &mut W,
    currency: Currency,
    section: &DeltaSection,
    verbosity: Verbosity,
) -> Result<()> {
    writeln!(
        w,
        "Section \"{}\": {} ({} -> {}, {})",
        section.section_name,
        change_word(section.change_type),
        format_money(section.old_total, currency),
        format_money(section.new_total, currency),
        format_signed_money(section.delta, currency)
    )?;

    for row in &section.rows {
        if row.change_type == ChangeType::Unchanged && verbosity != Verbosity::Verbose {
            continue;
        }
        writeln!(
            w,
            "  {} \"{}\": {} -> {} ({})",
            change_word(row.change_type),
            row.label,
            format_money(row.old_value, currency),
            format_money(row.new_value, currency),
            format_signed_money(row.delta, currency)
        )?;
    }
    writeln!(w)?;
    Ok(())
}

fn write_summary<W: Write>(w: &mut W, currency: Currency, result: &DeltaResult) -> Result<()> {
    writeln!(
        w,
        "Grand total: {} -> {} ({})",
        format_money(result.old_grand_total, currency),
        format_money(result.new_grand_total, currency),
        format_signed_money(result.grand_total_delta, currency)
    )?;
    match result.grand_total_pct_change {
        Some(pct) => writeln!(w, "Change: {:+.2}%", pct)?,
        None => writeln!(w, "Change: n/a")?,
    }
    writeln!(
        w,
        "Sections: {} total, {} changed, {} added, {} removed; {} row change(s)",
        result.total_sections,
        result.changed_sections,
        result.added_sections,
        result.removed_sections,
        result.total_row_changes
    )?;
    Ok(())
}

fn change_word(change_type: ChangeType) -> &'static str {
    match change_type {
        ChangeType::Added => "ADDED",
        ChangeType::Removed => "REMOVED",
        ChangeType::Changed => "CHANGED",
        ChangeType::Unchanged => "UNCHANGED",
    }
}
