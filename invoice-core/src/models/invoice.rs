use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::line_item::LineItem;
use crate::models::party::Party;

/// Closing message used for a fresh invoice.
pub const DEFAULT_GREETING: &str = "Thank you for your business!";

/// Invoice aggregate shared by the editor and the renderer.
///
/// The struct holds inputs only. Line totals and the invoice total are
/// derived on every read via [`compute_total`], so there is no cached
/// value that could drift out of sync with the items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Issuing company
    #[serde(default)]
    pub issuer: Party,

    /// Client being billed
    #[serde(default)]
    pub billed_to: Party,

    /// Line items in display order
    #[serde(default)]
    pub items: Vec<LineItem>,

    /// Free-text closing message
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Invoice number, free text
    #[serde(default)]
    pub invoice_number: String,

    /// Invoice date as entered (ISO `YYYY-MM-DD` expected, not enforced)
    #[serde(default)]
    pub invoice_date: String,

    /// Logo as a `data:` URI
    #[serde(default)]
    pub logo: Option<String>,
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

impl Default for Invoice {
    fn default() -> Self {
        Self::new()
    }
}

impl Invoice {
    /// Creates the invoice shown on first load: one empty item and the
    /// default greeting.
    pub fn new() -> Self {
        Self {
            issuer: Party::default(),
            billed_to: Party::default(),
            items: vec![LineItem::new()],
            greeting: default_greeting(),
            invoice_number: String::new(),
            invoice_date: String::new(),
            logo: None,
        }
    }

    /// Sum of all line totals.
    pub fn total(&self) -> Decimal {
        compute_total(&self.items)
    }
}

/// Sums `quantity * unit_price` over `items`. Empty input yields zero.
///
/// This is the single formula used by both the editor and the renderer.
pub fn compute_total(items: &[LineItem]) -> Decimal {
    items
        .iter()
        .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.line_total()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::money::{format_amount, MAX_AMOUNT};
    use serde_json::json;

    fn widget_and_gadget() -> Vec<LineItem> {
        vec![
            LineItem::priced("Widget", Decimal::from(3), Decimal::new(1000, 2)),
            LineItem::priced("Gadget", Decimal::from(1), Decimal::new(2550, 2)),
        ]
    }

    #[test]
    fn test_fresh_invoice() {
        let invoice = Invoice::new();
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.greeting, DEFAULT_GREETING);
        assert!(invoice.logo.is_none());
        assert_eq!(format_amount(invoice.total()), "0.00");
    }

    #[test]
    fn test_total_of_empty_list_is_zero() {
        assert_eq!(compute_total(&[]), Decimal::ZERO);
        assert_eq!(format_amount(compute_total(&[])), "0.00");
    }

    #[test]
    fn test_total_sums_line_totals() {
        let items = widget_and_gadget();
        assert_eq!(compute_total(&items), Decimal::new(5550, 2));
        assert_eq!(format_amount(compute_total(&items)), "55.50");
    }

    #[test]
    fn test_total_matches_manual_sum() {
        let items: Vec<LineItem> = (1..=12)
            .map(|i| LineItem::priced(format!("Item {}", i), Decimal::from(i), Decimal::new(i * 33, 2)))
            .collect();

        let expected: Decimal = items.iter().map(|i| i.quantity * i.unit_price).sum();
        assert_eq!(compute_total(&items), expected);
    }

    #[test]
    fn test_total_saturates_instead_of_overflowing() {
        // Fields are public, so the coercion bound can be sidestepped.
        let huge = |quantity: Decimal, unit_price: Decimal| LineItem {
            quantity,
            unit_price,
            ..LineItem::new()
        };
        let items = vec![huge(Decimal::MAX, Decimal::from(2)), huge(Decimal::MAX, Decimal::ONE)];
        assert_eq!(compute_total(&items), Decimal::MAX);
    }

    #[test]
    fn test_many_items_at_the_bound_keep_cents() {
        let items: Vec<LineItem> = (0..1000)
            .map(|_| LineItem::priced("Max", MAX_AMOUNT, MAX_AMOUNT))
            .collect();

        let total = compute_total(&items);

        assert_eq!(format_amount(total), "1000000000000000000000.00");
    }

    #[test]
    fn test_out_of_range_draft_amounts_fail_closed() {
        let invoice: Invoice = serde_json::from_value(json!({
            "items": [
                { "description": "Typo", "quantity": "1e20", "unit_price": 1e10 },
                { "description": "Fine", "quantity": 2, "unit_price": "12.5" }
            ]
        }))
        .expect("draft should deserialize");

        assert_eq!(invoice.items[0].line_total(), Decimal::ZERO);
        assert_eq!(format_amount(compute_total(&invoice.items)), "25.00");
    }

    #[test]
    fn test_deserialize_partial_draft() {
        let invoice: Invoice = serde_json::from_value(json!({
            "invoice_number": "INV-001",
            "items": [{ "description": "Widget", "quantity": 3, "unit_price": 10 }]
        }))
        .expect("draft should deserialize");

        assert_eq!(invoice.invoice_number, "INV-001");
        assert_eq!(invoice.greeting, DEFAULT_GREETING);
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.total(), Decimal::from(30));
    }
}
