//! Invoice builder core.
//!
//! An editing session owns one [`models::Invoice`]; every change goes
//! through a single serialized [`editor::EditorHandle`]. The
//! [`render`] module turns a snapshot into a printable document and
//! [`print`] hands that document to a print destination.

pub mod api;
pub mod config;
pub mod editor;
pub mod error;
pub mod models;
pub mod print;
pub mod render;

pub use config::AppConfig;
pub use error::{InvoiceError, Result};
pub use models::{Invoice, LineItem, Party};
