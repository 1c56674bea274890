//! Print rendering.
//!
//! Rendering is a pure function of an invoice snapshot and a set of
//! options: it never mutates the invoice, keeps no state between calls,
//! and produces byte-identical output for identical input.

pub mod date;
pub mod html;
pub mod layout;
pub mod text;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::AppConfig;
use crate::models::Invoice;

pub use date::DATE_PLACEHOLDER;
pub use layout::PrintLayout;

/// Presentation settings that are not part of the invoice itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Label prefixed to monetary values
    pub currency_label: String,

    /// Year printed in the footer
    pub footer_year: i32,

    /// Text shown when the invoice date is missing or invalid
    pub date_placeholder: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for RenderOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            currency_label: config.currency_label.clone(),
            footer_year: config.footer_year,
            date_placeholder: DATE_PLACEHOLDER.to_string(),
        }
    }
}

/// Output format of a rendered invoice.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum RenderFormat {
    #[default]
    Html,
    Text,
}

impl RenderFormat {
    /// MIME type of documents in this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            RenderFormat::Html => "text/html; charset=utf-8",
            RenderFormat::Text => "text/plain; charset=utf-8",
        }
    }

    /// File extension for documents in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            RenderFormat::Html => "html",
            RenderFormat::Text => "txt",
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderFormat::Html => write!(f, "html"),
            RenderFormat::Text => write!(f, "text"),
        }
    }
}

/// Renders an invoice snapshot in the requested format.
pub fn render(invoice: &Invoice, options: &RenderOptions, format: RenderFormat) -> String {
    let layout = PrintLayout::build(invoice, options);
    match format {
        RenderFormat::Html => html::write_document(&layout),
        RenderFormat::Text => text::write_document(&layout),
    }
}

/// Renders the print-ready HTML document.
pub fn render_html(invoice: &Invoice, options: &RenderOptions) -> String {
    render(invoice, options, RenderFormat::Html)
}

/// Renders a plain-text preview.
pub fn render_text(invoice: &Invoice, options: &RenderOptions) -> String {
    render(invoice, options, RenderFormat::Text)
}
