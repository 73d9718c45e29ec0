//! Editor configuration supplied by the host

use crate::error::EditorError;
use crate::undo::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PDF_API_URL: &str = "http://localhost:5000/api/generate-pdf";
pub const DEFAULT_PDF_TIMEOUT_MS: u64 = 100_000;
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 2 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub history: HistoryConfig,
    pub pdf: PdfConfig,
    pub login: LoginConfig,
    pub upload: UploadConfig,
}

impl EditorConfig {
    /// Parse host JSON. Missing keys take their defaults; unknown keys are ignored.
    pub fn from_json_str(json: &str) -> Result<Self, EditorError> {
        let mut config: EditorConfig = serde_json::from_str(json)?;
        config.history.capacity = config.history.capacity.max(1);
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Snapshots kept before the oldest is evicted
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PdfConfig {
    pub api_url: String,
    pub timeout_ms: u64,
    /// Paper format forwarded to the renderer
    pub format: String,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_PDF_API_URL.to_string(),
            timeout_ms: DEFAULT_PDF_TIMEOUT_MS,
            format: "A4".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginConfig {
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UploadConfig {
    pub max_bytes: u64,
    /// Accepted MIME types
    pub allowed_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_types: vec!["image/jpeg".to_string(), "image/png".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.history.capacity, 50);
        assert_eq!(config.pdf.timeout_ms, 100_000);
        assert_eq!(config.pdf.format, "A4");
        assert_eq!(config.upload.max_bytes, 2 * 1024 * 1024);
        assert!(config.login.api_url.is_none());
    }

    #[test]
    fn test_partial_json() {
        let config = EditorConfig::from_json_str(
            r#"{"history": {"capacity": 0}, "pdf": {"apiUrl": "https://pdf.example/api"}, "theme": "dark"}"#,
        )
        .unwrap();
        assert_eq!(config.history.capacity, 1);
        assert_eq!(config.pdf.api_url, "https://pdf.example/api");
        assert_eq!(config.pdf.timeout_ms, DEFAULT_PDF_TIMEOUT_MS);
        assert_eq!(config.upload, UploadConfig::default());
    }

    #[test]
    fn test_invalid_json() {
        assert!(EditorConfig::from_json_str("{").is_err());
    }
}
