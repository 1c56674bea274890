use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{InvoiceError, Result};
use crate::models::{compute_total, Invoice, ItemField, LineItem, PartyField};

/// A single state change, applied atomically by [`InvoiceEditor::apply`].
///
/// Every variant replaces a whole field or record; there are no partial
/// writes visible between commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetIssuer { field: PartyField, value: String },
    SetBilledTo { field: PartyField, value: String },
    SetGreeting(String),
    SetInvoiceNumber(String),
    SetInvoiceDate(String),
    SetLogo(String),
    ClearLogo,
    UpdateItem { index: usize, field: ItemField, value: String },
    AddItem,
    RemoveItem { index: usize },
    Reset,
}

impl Command {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetIssuer { .. } => "set_issuer",
            Command::SetBilledTo { .. } => "set_billed_to",
            Command::SetGreeting(_) => "set_greeting",
            Command::SetInvoiceNumber(_) => "set_invoice_number",
            Command::SetInvoiceDate(_) => "set_invoice_date",
            Command::SetLogo(_) => "set_logo",
            Command::ClearLogo => "clear_logo",
            Command::UpdateItem { .. } => "update_item",
            Command::AddItem => "add_item",
            Command::RemoveItem { .. } => "remove_item",
            Command::Reset => "reset",
        }
    }
}

/// Owns the authoritative invoice state for one editing session.
#[derive(Debug, Clone, Default)]
pub struct InvoiceEditor {
    invoice: Invoice,
}

impl InvoiceEditor {
    /// Starts a session with a fresh invoice.
    pub fn new() -> Self {
        Self {
            invoice: Invoice::new(),
        }
    }

    /// Starts a session from an existing draft.
    pub fn from_invoice(invoice: Invoice) -> Self {
        Self { invoice }
    }

    /// Read-only view of the current state.
    pub fn invoice(&self) -> &Invoice {
        &self.invoice
    }

    /// Owned copy of the current state, for handing to a renderer.
    pub fn snapshot(&self) -> Invoice {
        self.invoice.clone()
    }

    /// Applies one command.
    ///
    /// # Errors
    ///
    /// Returns `ItemIndexOutOfBounds` for item commands addressing a
    /// position past the end of the list. State is left untouched.
    pub fn apply(&mut self, command: Command) -> Result<()> {
        debug!("Applying editor command: {}", command.name());
        match command {
            Command::SetIssuer { field, value } => self.set_issuer(field, value),
            Command::SetBilledTo { field, value } => self.set_billed_to(field, value),
            Command::SetGreeting(text) => self.set_greeting(text),
            Command::SetInvoiceNumber(text) => self.set_invoice_number(text),
            Command::SetInvoiceDate(text) => self.set_invoice_date(text),
            Command::SetLogo(data_uri) => self.set_logo(data_uri),
            Command::ClearLogo => self.clear_logo(),
            Command::UpdateItem { index, field, value } => {
                self.update_item(index, field, &value)?
            }
            Command::AddItem => {
                self.add_item();
            }
            Command::RemoveItem { index } => {
                self.remove_item(index)?;
            }
            Command::Reset => self.reset(),
        }
        Ok(())
    }

    /// Replaces one field of the issuing party.
    pub fn set_issuer(&mut self, field: PartyField, value: impl Into<String>) {
        self.invoice.issuer = self.invoice.issuer.with(field, value);
    }

    /// Replaces one field of the billed party.
    pub fn set_billed_to(&mut self, field: PartyField, value: impl Into<String>) {
        self.invoice.billed_to = self.invoice.billed_to.with(field, value);
    }

    /// Replaces the closing greeting.
    pub fn set_greeting(&mut self, text: impl Into<String>) {
        self.invoice.greeting = text.into();
    }

    /// Replaces the invoice number.
    pub fn set_invoice_number(&mut self, text: impl Into<String>) {
        self.invoice.invoice_number = text.into();
    }

    /// Replaces the raw invoice date; it is only parsed when rendered.
    pub fn set_invoice_date(&mut self, text: impl Into<String>) {
        self.invoice.invoice_date = text.into();
    }

    /// Replaces the logo with an already-encoded `data:` URI.
    pub fn set_logo(&mut self, data_uri: impl Into<String>) {
        self.invoice.logo = Some(data_uri.into());
    }

    /// Removes the logo.
    pub fn clear_logo(&mut self) {
        self.invoice.logo = None;
    }

    /// Replaces one field of the item at `index` from raw user input.
    ///
    /// Numeric fields are coerced; anything that is not a non-negative
    /// number becomes zero.
    pub fn update_item(&mut self, index: usize, field: ItemField, raw_value: &str) -> Result<()> {
        let len = self.invoice.items.len();
        let current = self
            .invoice
            .items
            .get(index)
            .ok_or(InvoiceError::ItemIndexOutOfBounds { index, len })?;
        let next = current.with_raw(field, raw_value);
        self.invoice.items[index] = next;
        Ok(())
    }

    /// Appends an empty item and returns its index.
    pub fn add_item(&mut self) -> usize {
        self.invoice.items.push(LineItem::new());
        self.invoice.items.len() - 1
    }

    /// Removes and returns the item at `index`.
    ///
    /// Removing the last item leaves an empty list; nothing is re-inserted.
    pub fn remove_item(&mut self, index: usize) -> Result<LineItem> {
        let len = self.invoice.items.len();
        if index >= len {
            return Err(InvoiceError::ItemIndexOutOfBounds { index, len });
        }
        Ok(self.invoice.items.remove(index))
    }

    /// Discards the current invoice and starts over.
    pub fn reset(&mut self) {
        self.invoice = Invoice::new();
    }

    /// Current total, recomputed from the items on every call.
    pub fn compute_total(&self) -> Decimal {
        compute_total(&self.invoice.items)
    }
}
