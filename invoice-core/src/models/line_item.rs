use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::InvoiceError;
use crate::models::money::{bound_amount, coerce_amount, coerce_float};

/// A single billable line on the invoice.
///
/// Items are addressed by their position in the invoice; `id` is only a
/// stable handle for clients that need to tell rows apart after a
/// removal shifts positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Stable identifier assigned at creation
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Free-text description of the work or goods
    #[serde(default)]
    pub description: String,

    /// Quantity, never negative
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub quantity: Decimal,

    /// Price per unit, never negative
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub unit_price: Decimal,
}

impl Default for LineItem {
    fn default() -> Self {
        Self::new()
    }
}

impl LineItem {
    /// Creates an empty item: no description, zero quantity and price.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            description: String::new(),
            quantity: Decimal::ZERO,
            unit_price: Decimal::ZERO,
        }
    }

    /// Creates an item from already-numeric values.
    ///
    /// Quantity and price follow the coercion rules: negative or
    /// out-of-range values become zero.
    pub fn priced(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            quantity: bound_amount(quantity),
            unit_price: bound_amount(unit_price),
        }
    }

    /// `quantity * unit_price`. Always derived, never stored.
    pub fn line_total(&self) -> Decimal {
        self.quantity.saturating_mul(self.unit_price)
    }

    /// Returns a copy of the item with one field replaced from raw input.
    ///
    /// Descriptions are stored verbatim; numeric fields go through
    /// [`coerce_amount`], so "abc" becomes zero.
    pub fn with_raw(&self, field: ItemField, raw_value: &str) -> Self {
        let mut next = self.clone();
        match field {
            ItemField::Description => next.description = raw_value.to_string(),
            ItemField::Quantity => next.quantity = coerce_amount(raw_value),
            ItemField::UnitPrice => next.unit_price = coerce_amount(raw_value),
        }
        next
    }
}

/// Editable fields of a [`LineItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemField {
    Description,
    Quantity,
    #[serde(alias = "unitPrice")]
    UnitPrice,
}

impl fmt::Display for ItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemField::Description => write!(f, "description"),
            ItemField::Quantity => write!(f, "quantity"),
            ItemField::UnitPrice => write!(f, "unit_price"),
        }
    }
}

impl FromStr for ItemField {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "description" => Ok(ItemField::Description),
            "quantity" => Ok(ItemField::Quantity),
            "unit_price" | "unitPrice" => Ok(ItemField::UnitPrice),
            other => Err(InvoiceError::UnknownItemField(other.to_string())),
        }
    }
}

/// Accepts either a JSON number or a string and applies the usual
/// coercion rules, so drafts can never smuggle in a negative amount.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(f64),
        Text(String),
        Null(()),
    }

    Ok(match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(n) => coerce_float(n),
        RawAmount::Text(s) => coerce_amount(&s),
        RawAmount::Null(()) => Decimal::ZERO,
    })
}
