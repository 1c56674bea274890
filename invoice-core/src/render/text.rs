use comfy_table::{presets::ASCII_MARKDOWN, Table};
use std::fmt::Write;

use crate::render::layout::{ItemRow, PartyBlock, PrintLayout, TABLE_HEADERS};

/// Writes the layout as plain text with a markdown-style items table.
///
/// The logo cannot be shown in text and is reduced to a marker line.
pub fn write_document(layout: &PrintLayout) -> String {
    let mut out = String::with_capacity(1024);
    let _ = write_into(&mut out, layout);
    out
}

fn write_into(out: &mut String, layout: &PrintLayout) -> std::fmt::Result {
    if layout.logo.is_some() {
        writeln!(out, "[logo]")?;
    }
    writeln!(out, "{}", layout.title)?;
    writeln!(out, "Invoice #: {}", layout.invoice_number)?;
    writeln!(out, "Date: {}", layout.date)?;
    writeln!(out)?;

    write_party(out, &layout.issuer)?;
    writeln!(out)?;
    write_party(out, &layout.billed_to)?;
    writeln!(out)?;

    writeln!(out, "{}", items_table(&layout.rows))?;
    writeln!(out)?;

    writeln!(out, "Total: {}", layout.total)?;
    writeln!(out)?;
    writeln!(out, "{}", layout.greeting)?;
    writeln!(out)?;
    for line in layout.payment_terms {
        writeln!(out, "{}", line)?;
    }
    writeln!(out)?;
    writeln!(out, "{}", layout.footer)
}

fn write_party(out: &mut String, block: &PartyBlock) -> std::fmt::Result {
    writeln!(out, "{}", block.heading)?;
    writeln!(out, "{}", block.name)?;
    for line in &block.address_lines {
        writeln!(out, "{}", line)?;
    }
    writeln!(out, "{}", block.phone)?;
    writeln!(out, "{}", block.email)
}

fn items_table(rows: &[ItemRow]) -> Table {
    let mut table = Table::new();
    table.load_preset(ASCII_MARKDOWN).set_header(TABLE_HEADERS);
    for row in rows {
        table.add_row([
            row.description.as_str(),
            row.quantity.as_str(),
            row.unit_price.as_str(),
            row.line_total.as_str(),
        ]);
    }
    table
}
