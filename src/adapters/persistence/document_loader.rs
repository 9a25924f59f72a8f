//! Reads a local file into an encoded document payload (`data:<mime>;base64,<data>`).
//!
//! Accepts the portal's upload types. Media type comes from magic bytes first,
//! then from the extension.

use crate::domain::DomainError;
use base64::Engine;
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Extensions the portal accepts for upload.
pub const ACCEPTED_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "txt", "jpg", "jpeg", "png", "heic", "heif",
];

/// A file ready to be sent to the document analysis flow.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// File name as shown to the user.
    pub name: String,
    pub media_type: &'static str,
    pub size_bytes: usize,
    /// `data:` URI payload.
    pub data_uri: String,
}

pub async fn load_document(path: &Path) -> Result<LoadedDocument, DomainError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(DomainError::Document(format!(
            "unsupported file type '{}'; accepted: {}",
            name,
            ACCEPTED_EXTENSIONS.join(", ")
        )));
    }

    let bytes = fs::read(path)
        .await
        .map_err(|e| DomainError::Document(format!("{}: {}", path.display(), e)))?;
    if bytes.is_empty() {
        return Err(DomainError::Document(format!("{} is empty", name)));
    }

    let media_type = detect_media_type(&bytes).unwrap_or_else(|| media_type_for_extension(&extension));
    let data_uri = encode_data_uri(media_type, &bytes);
    info!(file = %name, media_type, size = bytes.len(), "document loaded");

    Ok(LoadedDocument {
        name,
        media_type,
        size_bytes: bytes.len(),
        data_uri,
    })
}

pub fn encode_data_uri(media_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        media_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Detect media type from magic bytes.
fn detect_media_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if bytes.starts_with(b"%PDF-") {
        Some("application/pdf")
    } else if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" {
        match &bytes[8..12] {
            b"heic" | b"heix" | b"hevc" | b"hevx" => Some("image/heic"),
            b"mif1" | b"msf1" => Some("image/heif"),
            _ => None,
        }
    } else {
        None
    }
}

fn media_type_for_extension(extension: &str) -> &'static str {
    match extension {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "heic" => "image/heic",
        "heif" => "image/heif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EncodedDocument;

    #[test]
    fn test_encode_data_uri() {
        let uri = encode_data_uri("text/plain", b"hello");
        assert_eq!(uri, "data:text/plain;base64,aGVsbG8=");
        assert_eq!(
            EncodedDocument::new(uri).split(),
            Some(("text/plain", "aGVsbG8="))
        );
    }

    #[test]
    fn test_detect_media_type() {
        assert_eq!(detect_media_type(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(detect_media_type(b"%PDF-1.7\n"), Some("application/pdf"));
        assert_eq!(detect_media_type(b"\0\0\0\x18ftypheic"), Some("image/heic"));
        assert_eq!(detect_media_type(b"plain text"), None);
    }

    #[tokio::test]
    async fn test_load_document_magic_wins_over_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.jpg");
        std::fs::write(&path, b"%PDF-1.4 fake").unwrap();

        let doc = load_document(&path).await.unwrap();
        assert_eq!(doc.name, "scan.jpg");
        assert_eq!(doc.media_type, "application/pdf");
        assert_eq!(doc.size_bytes, 13);
        assert!(doc.data_uri.starts_with("data:application/pdf;base64,"));
    }

    #[tokio::test]
    async fn test_load_document_extension_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.TXT");
        std::fs::write(&path, b"blood pressure 120/80").unwrap();

        let doc = load_document(&path).await.unwrap();
        assert_eq!(doc.media_type, "text/plain");
    }

    #[tokio::test]
    async fn test_load_document_rejects() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("tool.exe");
        std::fs::write(&exe, b"MZ").unwrap();
        assert!(matches!(load_document(&exe).await, Err(DomainError::Document(_))));

        let empty = dir.path().join("empty.pdf");
        std::fs::write(&empty, b"").unwrap();
        assert!(matches!(load_document(&empty).await, Err(DomainError::Document(_))));

        let missing = dir.path().join("missing.pdf");
        assert!(load_document(&missing).await.is_err());
    }
}
