//! Error types for the editor
//!
//! Malformed page data and stale edit gestures never produce errors; they are
//! absorbed by normalization. Only user input violations and backend failures
//! surface here, and their `Display` text is what the user sees.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("{0}")]
    Upload(#[from] UploadError),

    #[error("{0}")]
    Pdf(#[from] PdfError),

    #[error("{0}")]
    Login(#[from] LoginError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown page: {0}")]
    UnknownPage(String),
}

/// Rejected image uploads
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Please upload only image files (JPEG or PNG)")]
    UnsupportedType { mime: String },

    #[error("File size must be less than {}", format_size(.limit))]
    TooLarge { size: u64, limit: u64 },
}

/// Failures of the network layer itself
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PdfError {
    /// The backend answered with an error status
    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("Received empty PDF file")]
    EmptyPdf,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// Credentials refused; carries the backend message or a generic one
    #[error("{0}")]
    Rejected(String),

    #[error("Login is not configured")]
    NotConfigured,

    #[error("Network error")]
    Transport(#[from] TransportError),
}

/// `2MB`, `512KB`, `100B`
fn format_size(bytes: &u64) -> String {
    let bytes = *bytes;
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{}B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_messages() {
        let err = UploadError::TooLarge {
            size: 3 * 1024 * 1024,
            limit: 2 * 1024 * 1024,
        };
        assert_eq!(err.to_string(), "File size must be less than 2MB");
        let err = UploadError::UnsupportedType {
            mime: "image/gif".into(),
        };
        assert_eq!(err.to_string(), "Please upload only image files (JPEG or PNG)");
    }

    #[test]
    fn test_errors_convert_upward() {
        let err: EditorError = PdfError::EmptyPdf.into();
        assert_eq!(err.to_string(), "Received empty PDF file");
        let err: PdfError = TransportError::Timeout { seconds: 100 }.into();
        assert_eq!(err.to_string(), "Request timed out after 100 seconds");
    }
}
