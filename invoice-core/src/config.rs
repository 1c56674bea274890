use chrono::{Datelike, Utc};
use std::path::PathBuf;

use crate::error::{InvoiceError, Result};

/// Default label printed in front of every monetary value.
pub const DEFAULT_CURRENCY_LABEL: &str = "RM";

/// Runtime configuration for the invoice builder.
///
/// Values are read from the process environment (after `.env` has been
/// loaded by the binary). Every field has a default so an empty
/// environment yields a working configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface the HTTP server binds to
    pub host: String,

    /// Port the HTTP server binds to
    pub port: u16,

    /// Label prefixed to monetary values ("RM 55.50")
    pub currency_label: String,

    /// Directory the file print sink writes documents into
    pub print_output_dir: PathBuf,

    /// Upper bound on logo payload size in bytes (None = unlimited)
    pub logo_max_bytes: Option<usize>,

    /// Capacity of the editor command channel
    pub editor_queue_depth: usize,

    /// Year shown in the printed footer
    pub footer_year: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            currency_label: DEFAULT_CURRENCY_LABEL.to_string(),
            print_output_dir: PathBuf::from("./printed"),
            logo_max_bytes: None,
            editor_queue_depth: 64,
            footer_year: Utc::now().year(),
        }
    }
}

impl AppConfig {
    /// Builds the configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::Config` if a numeric variable is set but
    /// cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("SERVER_HOST").unwrap_or(defaults.host);
        let port = parse_var(&lookup, "SERVER_PORT")?.unwrap_or(defaults.port);
        let currency_label = lookup("CURRENCY_LABEL")
            .map(|s| s.trim().to_string())
            .unwrap_or(defaults.currency_label);
        let print_output_dir = lookup("PRINT_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.print_output_dir);
        let logo_max_bytes = parse_var(&lookup, "LOGO_MAX_BYTES")?;
        let editor_queue_depth = parse_var::<usize, _>(&lookup, "EDITOR_QUEUE_DEPTH")?
            .unwrap_or(defaults.editor_queue_depth);
        let footer_year = parse_var(&lookup, "FOOTER_YEAR")?.unwrap_or(defaults.footer_year);

        if currency_label.is_empty() {
            return Err(InvoiceError::Config(
                "CURRENCY_LABEL must not be empty".to_string(),
            ));
        }

        if editor_queue_depth == 0 {
            return Err(InvoiceError::Config(
                "EDITOR_QUEUE_DEPTH must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            currency_label,
            print_output_dir,
            logo_max_bytes,
            editor_queue_depth,
            footer_year,
        })
    }

    /// Address string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| InvoiceError::Config(format!("Invalid {}: {}", key, raw))),
        _ => Ok(None),
    }
}
