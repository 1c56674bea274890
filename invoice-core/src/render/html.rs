use std::fmt::Write;

use crate::render::layout::{PartyBlock, PrintLayout, TABLE_HEADERS};

const STYLE: &str = "\
body{font-family:Helvetica,Arial,sans-serif;color:#1f2937;margin:0}\
.invoice{background:#fff;padding:2rem;max-width:56rem;margin:0 auto}\
.header,.parties{display:flex;justify-content:space-between;align-items:flex-start;margin-bottom:2rem}\
.right{text-align:right}\
.logo{max-width:20rem;max-height:6rem;object-fit:contain;margin-bottom:1rem}\
h1{font-size:1.875rem;margin:0}\
h2{font-size:1.25rem;color:#374151;margin:0 0 .5rem}\
table{width:100%;border-collapse:collapse;margin-bottom:2rem}\
th{text-align:left;border-bottom:2px solid #d1d5db;padding:.5rem;color:#4b5563}\
td{border-bottom:1px solid #e5e7eb;padding:.5rem}\
.total{text-align:right;font-size:1.125rem;font-weight:600;margin-bottom:2rem}\
.greeting{text-align:center;font-style:italic;color:#4b5563;margin-bottom:2rem}\
.terms{font-size:.875rem;color:#6b7280}\
footer{margin-top:2rem;padding-top:1rem;border-top:1px solid #d1d5db;text-align:center;font-size:.875rem;color:#6b7280}\
@media print{.invoice{padding:0}}";

/// Escapes text for use in HTML element content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Writes the layout as a standalone, print-ready HTML document.
pub fn write_document(layout: &PrintLayout) -> String {
    let mut out = String::with_capacity(4096);
    // Writing into a String cannot fail.
    let _ = write_into(&mut out, layout);
    out
}

fn write_into(out: &mut String, layout: &PrintLayout) -> std::fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\">")?;
    writeln!(
        out,
        "<title>{} {}</title>",
        layout.title,
        escape_html(&layout.invoice_number)
    )?;
    writeln!(out, "<style>{}</style>", STYLE)?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<div class=\"invoice\">")?;

    writeln!(out, "<div class=\"header\">")?;
    writeln!(out, "<div>")?;
    if let Some(logo) = &layout.logo {
        writeln!(
            out,
            "<img class=\"logo\" src=\"{}\" alt=\"Company Logo\">",
            escape_html(logo)
        )?;
    }
    writeln!(out, "<h1>{}</h1>", layout.title)?;
    writeln!(out, "</div>")?;
    writeln!(out, "<div class=\"right\">")?;
    writeln!(
        out,
        "<p><strong>Invoice #: {}</strong></p>",
        escape_html(&layout.invoice_number)
    )?;
    writeln!(out, "<p>Date: {}</p>", escape_html(&layout.date))?;
    writeln!(out, "</div>")?;
    writeln!(out, "</div>")?;

    writeln!(out, "<div class=\"parties\">")?;
    write_party(out, &layout.issuer, None)?;
    write_party(out, &layout.billed_to, Some("right"))?;
    writeln!(out, "</div>")?;

    writeln!(out, "<table>")?;
    writeln!(out, "<thead>")?;
    write!(out, "<tr>")?;
    for header in TABLE_HEADERS {
        write!(out, "<th>{}</th>", header)?;
    }
    writeln!(out, "</tr>")?;
    writeln!(out, "</thead>")?;
    writeln!(out, "<tbody>")?;
    for row in &layout.rows {
        writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&row.description),
            escape_html(&row.quantity),
            escape_html(&row.unit_price),
            escape_html(&row.line_total)
        )?;
    }
    writeln!(out, "</tbody>")?;
    writeln!(out, "</table>")?;

    writeln!(
        out,
        "<div class=\"total\">Total: {}</div>",
        escape_html(&layout.total)
    )?;
    writeln!(
        out,
        "<div class=\"greeting\">{}</div>",
        escape_html(&layout.greeting)
    )?;

    writeln!(out, "<div class=\"terms\">")?;
    for line in layout.payment_terms {
        writeln!(out, "<p>{}</p>", line)?;
    }
    writeln!(out, "</div>")?;

    writeln!(out, "<footer>{}</footer>", escape_html(&layout.footer))?;
    writeln!(out, "</div>")?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

fn write_party(out: &mut String, block: &PartyBlock, class: Option<&str>) -> std::fmt::Result {
    match class {
        Some(class) => writeln!(out, "<div class=\"{}\">", class)?,
        None => writeln!(out, "<div>")?,
    }
    writeln!(out, "<h2>{}</h2>", block.heading)?;
    writeln!(out, "<p><strong>{}</strong></p>", escape_html(&block.name))?;
    let address = block
        .address_lines
        .iter()
        .map(|line| escape_html(line))
        .collect::<Vec<_>>()
        .join("<br>");
    writeln!(out, "<p>{}</p>", address)?;
    writeln!(out, "<p>{}</p>", escape_html(&block.phone))?;
    writeln!(out, "<p>{}</p>", escape_html(&block.email))?;
    writeln!(out, "</div>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>Tom & Jerry's \"shop\"</b>"),
            "&lt;b&gt;Tom &amp; Jerry&#39;s &quot;shop&quot;&lt;/b&gt;"
        );
    }
}
