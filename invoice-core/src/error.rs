use axum::http::StatusCode;
use thiserror::Error;

/// Result type alias for invoice operations
pub type Result<T> = std::result::Result<T, InvoiceError>;

/// Errors that can occur while editing, rendering or printing an invoice.
///
/// Input coercion never produces an error: non-numeric quantities and
/// prices fall back to zero. Only structural misuse of the editor and
/// infrastructure failures end up here.
#[derive(Error, Debug)]
pub enum InvoiceError {
    /// Party field name outside {name, address, phone, email}
    #[error("Unknown party field: {0}")]
    UnknownPartyField(String),

    /// Line item field name outside {description, quantity, unit_price}
    #[error("Unknown line item field: {0}")]
    UnknownItemField(String),

    /// Item index past the end of the current item list
    #[error("Line item index {index} out of bounds (len {len})")]
    ItemIndexOutOfBounds { index: usize, len: usize },

    /// Logo could not be read or encoded
    #[error("Failed to load logo: {0}")]
    LogoRead(String),

    /// The editor task has shut down
    #[error("Invoice editor is no longer running")]
    EditorUnavailable,

    /// Print sink failed to accept the document
    #[error("Print failed: {0}")]
    Print(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl InvoiceError {
    /// HTTP status used when this error reaches the API layer.
    pub fn status_code(&self) -> StatusCode {
        match self {
            InvoiceError::UnknownPartyField(_) | InvoiceError::UnknownItemField(_) => {
                StatusCode::BAD_REQUEST
            }
            InvoiceError::ItemIndexOutOfBounds { .. } => StatusCode::NOT_FOUND,
            InvoiceError::LogoRead(_) => StatusCode::UNPROCESSABLE_ENTITY,
            InvoiceError::EditorUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            InvoiceError::Print(_) | InvoiceError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            InvoiceError::UnknownPartyField("fax".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            InvoiceError::ItemIndexOutOfBounds { index: 3, len: 1 }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            InvoiceError::EditorUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_display_includes_context() {
        let err = InvoiceError::ItemIndexOutOfBounds { index: 3, len: 1 };
        assert_eq!(err.to_string(), "Line item index 3 out of bounds (len 1)");
    }
}
