use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::money::format_money;
use crate::models::Invoice;
use crate::render::RenderFormat;

/// Replaces one field of a party.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyUpdate {
    /// One of name, address, phone, email
    pub field: String,

    pub value: String,
}

/// Replaces one field of a line item.
///
/// `value` may be a JSON string or number; numeric fields coerce
/// anything unparseable to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemUpdate {
    /// One of description, quantity, unit_price
    pub field: String,

    #[serde(default)]
    pub value: Value,
}

impl ItemUpdate {
    /// The value as the raw text a form field would have produced.
    pub fn raw_value(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        }
    }
}

/// Invoice-level text fields. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailsUpdate {
    pub greeting: Option<String>,
    pub invoice_number: Option<String>,
    pub invoice_date: Option<String>,
}

/// Current state plus its derived total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceResponse {
    pub invoice: Invoice,
    pub total: Decimal,
    pub total_display: String,
}

impl InvoiceResponse {
    pub fn new(invoice: Invoice, currency_label: &str) -> Self {
        let total = invoice.total();
        Self {
            total_display: format_money(currency_label, total),
            total,
            invoice,
        }
    }
}

/// Derived total on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalResponse {
    pub total: Decimal,
    pub display: String,
    pub item_count: usize,
}

/// Query string for preview and print endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatQuery {
    pub format: Option<RenderFormat>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_update_raw_value() {
        let update: ItemUpdate =
            serde_json::from_value(json!({ "field": "quantity", "value": 3 })).unwrap();
        assert_eq!(update.raw_value(), "3");

        let update: ItemUpdate =
            serde_json::from_value(json!({ "field": "quantity", "value": "abc" })).unwrap();
        assert_eq!(update.raw_value(), "abc");

        let update: ItemUpdate = serde_json::from_value(json!({ "field": "quantity" })).unwrap();
        assert_eq!(update.raw_value(), "");
    }

    #[test]
    fn test_invoice_response_total_display() {
        let response = InvoiceResponse::new(Invoice::new(), "RM");
        assert_eq!(response.total_display, "RM 0.00");
    }
}
