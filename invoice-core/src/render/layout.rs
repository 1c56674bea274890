use serde::Serialize;

use crate::models::money::{format_money, format_quantity};
use crate::models::{compute_total, Invoice, Party};
use crate::render::date::format_invoice_date;
use crate::render::RenderOptions;

/// Heading printed at the top of every invoice.
pub const TITLE: &str = "INVOICE";

/// Fixed lines printed after the greeting.
pub const PAYMENT_TERMS: [&str; 2] = [
    "Please make payment within 30 days of the invoice date.",
    "Thank you for your business!",
];

/// Column headings of the items table, in print order.
pub const TABLE_HEADERS: [&str; 4] = ["Description", "Quantity", "Unit Price", "Total"];

/// Contact block as it appears on paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartyBlock {
    pub heading: &'static str,
    pub name: String,
    pub address_lines: Vec<String>,
    pub phone: String,
    pub email: String,
}

impl PartyBlock {
    fn new(heading: &'static str, party: &Party) -> Self {
        Self {
            heading,
            name: party.name.clone(),
            address_lines: party.address_lines().map(str::to_string).collect(),
            phone: party.phone.clone(),
            email: party.email.clone(),
        }
    }
}

/// One table row with every cell already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRow {
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub line_total: String,
}

/// Backend-independent model of the printed document.
///
/// Sections are kept in print order: header, parties, items, total,
/// greeting, payment terms, footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintLayout {
    pub logo: Option<String>,
    pub title: &'static str,
    pub invoice_number: String,
    pub date: String,
    pub issuer: PartyBlock,
    pub billed_to: PartyBlock,
    pub rows: Vec<ItemRow>,
    pub total: String,
    pub greeting: String,
    pub payment_terms: [&'static str; 2],
    pub footer: String,
}

impl PrintLayout {
    /// Lays out an invoice snapshot.
    ///
    /// The total is recomputed from `invoice.items` here rather than taken
    /// from the caller, so the printout always agrees with its own rows.
    pub fn build(invoice: &Invoice, options: &RenderOptions) -> Self {
        let label = options.currency_label.as_str();

        let rows = invoice
            .items
            .iter()
            .map(|item| ItemRow {
                description: item.description.clone(),
                quantity: format_quantity(item.quantity),
                unit_price: format_money(label, item.unit_price),
                line_total: format_money(label, item.line_total()),
            })
            .collect();

        Self {
            logo: invoice.logo.clone().filter(|uri| is_image_data_uri(uri)),
            title: TITLE,
            invoice_number: invoice.invoice_number.clone(),
            date: format_invoice_date(&invoice.invoice_date, &options.date_placeholder),
            issuer: PartyBlock::new("From:", &invoice.issuer),
            billed_to: PartyBlock::new("Bill To:", &invoice.billed_to),
            rows,
            total: format_money(label, compute_total(&invoice.items)),
            greeting: invoice.greeting.clone(),
            payment_terms: PAYMENT_TERMS,
            footer: format!("\u{a9} {} All Rights Reserved", options.footer_year),
        }
    }
}

/// Only inline `data:image/` URIs are embedded, never remote URLs.
fn is_image_data_uri(uri: &str) -> bool {
    uri.get(..11)
        .map(|prefix| prefix.eq_ignore_ascii_case("data:image/"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineItem;
    use rust_decimal::Decimal;

    fn options() -> RenderOptions {
        RenderOptions {
            footer_year: 2024,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_rows_follow_item_order() {
        let mut invoice = Invoice::new();
        invoice.items = vec![
            LineItem::priced("Widget", Decimal::from(3), Decimal::new(1000, 2)),
            LineItem::priced("Gadget", Decimal::from(1), Decimal::new(2550, 2)),
        ];

        let layout = PrintLayout::build(&invoice, &options());

        assert_eq!(layout.rows.len(), 2);
        assert_eq!(layout.rows[0].description, "Widget");
        assert_eq!(layout.rows[0].quantity, "3");
        assert_eq!(layout.rows[0].unit_price, "RM 10.00");
        assert_eq!(layout.rows[0].line_total, "RM 30.00");
        assert_eq!(layout.rows[1].line_total, "RM 25.50");
        assert_eq!(layout.total, "RM 55.50");
    }

    #[test]
    fn test_empty_invoice_layout() {
        let mut invoice = Invoice::new();
        invoice.items.clear();

        let layout = PrintLayout::build(&invoice, &options());

        assert!(layout.rows.is_empty());
        assert_eq!(layout.total, "RM 0.00");
        assert_eq!(layout.date, "N/A");
        assert_eq!(layout.footer, "\u{a9} 2024 All Rights Reserved");
    }

    #[test]
    fn test_non_data_logo_is_dropped() {
        let mut invoice = Invoice::new();
        invoice.logo = Some("https://example.test/logo.png".into());
        assert!(PrintLayout::build(&invoice, &options()).logo.is_none());

        invoice.logo = Some("data:image/png;base64,AA==".into());
        assert!(PrintLayout::build(&invoice, &options()).logo.is_some());
    }

    #[test]
    fn test_currency_label_is_configurable() {
        let mut invoice = Invoice::new();
        invoice.items = vec![LineItem::priced("Hour", Decimal::from(2), Decimal::from(50))];
        let opts = RenderOptions {
            currency_label: "USD".into(),
            ..options()
        };

        let layout = PrintLayout::build(&invoice, &opts);

        assert_eq!(layout.total, "USD 100.00");
    }
}
