use base64::Engine as _;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{InvoiceError, Result};

/// Where a logo comes from.
#[derive(Debug, Clone)]
pub enum LogoSource {
    /// Raw image bytes with their declared MIME type (e.g. an upload body)
    Bytes { mime: String, bytes: Vec<u8> },

    /// An image file on disk; the MIME type is taken from the extension
    File(PathBuf),
}

/// True for `image/*` MIME types, ignoring parameters and case.
pub fn is_image_mime(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|essence| essence.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false)
}

/// Guesses an image MIME type from a file extension.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        _ => return None,
    };
    Some(mime)
}

/// Encodes bytes as `data:<mime>;base64,<payload>`.
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime.trim(), payload)
}

/// Reads and encodes a logo.
///
/// With `max_bytes` unset there is no size limit: a very large upload is
/// held in memory twice (raw and encoded). Callers exposing this to
/// untrusted input should configure a limit.
///
/// # Errors
///
/// Returns `InvoiceError::LogoRead` if the source is not an image, is
/// larger than `max_bytes`, or cannot be read.
pub async fn load(source: LogoSource, max_bytes: Option<usize>) -> Result<String> {
    match source {
        LogoSource::Bytes { mime, bytes } => {
            if !is_image_mime(&mime) {
                return Err(InvoiceError::LogoRead(format!("not an image type: {}", mime)));
            }
            check_size(bytes.len(), max_bytes)?;
            Ok(encode_data_uri(&mime, &bytes))
        }
        LogoSource::File(path) => {
            let mime = mime_for_path(&path).ok_or_else(|| {
                InvoiceError::LogoRead(format!("unsupported image file: {}", path.display()))
            })?;

            let metadata = tokio::fs::metadata(&path)
                .await
                .map_err(|e| InvoiceError::LogoRead(format!("{}: {}", path.display(), e)))?;
            check_size(metadata.len() as usize, max_bytes)?;

            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| InvoiceError::LogoRead(format!("{}: {}", path.display(), e)))?;
            check_size(bytes.len(), max_bytes)?;

            debug!("Read {} logo bytes from {}", bytes.len(), path.display());
            Ok(encode_data_uri(mime, &bytes))
        }
    }
}

fn check_size(len: usize, max_bytes: Option<usize>) -> Result<()> {
    match max_bytes {
        Some(max) if len > max => Err(InvoiceError::LogoRead(format!(
            "logo is {} bytes, limit is {}",
            len, max
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_image_mime() {
        assert!(is_image_mime("image/png"));
        assert!(is_image_mime("Image/SVG+XML; charset=utf-8"));
        assert!(!is_image_mime("application/pdf"));
        assert!(!is_image_mime(""));
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("logo.PNG")), Some("image/png"));
        assert_eq!(mime_for_path(Path::new("logo.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("notes.txt")), None);
        assert_eq!(mime_for_path(Path::new("logo")), None);
    }

    #[test]
    fn test_encode_data_uri() {
        assert_eq!(encode_data_uri("image/png", b"hi"), "data:image/png;base64,aGk=");
    }

    #[tokio::test]
    async fn test_load_bytes() {
        let uri = load(
            LogoSource::Bytes {
                mime: "image/gif".into(),
                bytes: b"GIF89a".to_vec(),
            },
            None,
        )
        .await
        .expect("gif bytes should load");
        assert!(uri.starts_with("data:image/gif;base64,"));
    }

    #[tokio::test]
    async fn test_load_rejects_non_image_bytes() {
        let result = load(
            LogoSource::Bytes {
                mime: "text/plain".into(),
                bytes: b"hello".to_vec(),
            },
            None,
        )
        .await;
        assert!(matches!(result, Err(InvoiceError::LogoRead(_))));
    }

    #[tokio::test]
    async fn test_load_enforces_size_limit() {
        let result = load(
            LogoSource::Bytes {
                mime: "image/png".into(),
                bytes: vec![0u8; 16],
            },
            Some(8),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("logo.png");
        let mut file = std::fs::File::create(&path).expect("create logo");
        file.write_all(&[0x89, b'P', b'N', b'G']).expect("write logo");

        let uri = load(LogoSource::File(path), None).await.expect("file should load");
        assert_eq!(uri, "data:image/png;base64,iVBORw==");
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let result = load(LogoSource::File(PathBuf::from("/nonexistent/logo.png")), None).await;
        assert!(matches!(result, Err(InvoiceError::LogoRead(_))));
    }
}
