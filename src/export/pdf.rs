//! PDF generation request/response contract

use super::{HttpResponse, Transport};
use crate::config::PdfConfig;
use crate::error::PdfError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PdfMargin {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfOptions {
    pub format: String,
    pub print_background: bool,
    pub margin: PdfMargin,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            format: "A4".to_string(),
            print_background: true,
            margin: PdfMargin::default(),
        }
    }
}

/// Body posted to the rendering service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfRequest {
    pub html: String,
    pub options: PdfOptions,
}

impl PdfRequest {
    pub fn to_value(&self) -> Value {
        // Only strings, bools and integers: cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// A rendered PDF ready to download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
}

#[derive(Debug, Clone, Default)]
pub struct PdfExporter {
    config: PdfConfig,
}

impl PdfExporter {
    pub fn new(config: PdfConfig) -> Self {
        Self { config }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.config.timeout_ms)
    }

    pub fn build_request(&self, html: impl Into<String>) -> PdfRequest {
        PdfRequest {
            html: html.into(),
            options: PdfOptions {
                format: self.config.format.clone(),
                ..PdfOptions::default()
            },
        }
    }

    /// Turn the service's answer into PDF bytes or a user-facing error.
    pub fn interpret_response(&self, response: HttpResponse) -> Result<Vec<u8>, PdfError> {
        if !response.is_ok() {
            let message = response
                .json()
                .as_ref()
                .and_then(|body| body.get("message"))
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}: Failed to generate PDF", response.status));
            warn!(status = response.status, %message, "pdf generation failed");
            return Err(PdfError::Backend {
                status: response.status,
                message,
            });
        }
        if response.body.is_empty() {
            return Err(PdfError::EmptyPdf);
        }
        Ok(response.body)
    }

    /// Post `html` to the rendering service and collect the PDF.
    pub fn generate<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        html: impl Into<String>,
    ) -> Result<PdfDocument, PdfError> {
        let request = self.build_request(html);
        debug!(url = %self.config.api_url, bytes = request.html.len(), "requesting pdf");
        let response = transport.post_json(&self.config.api_url, &request.to_value(), self.timeout())?;
        let bytes = self.interpret_response(response)?;
        debug!(bytes = bytes.len(), "received pdf");
        Ok(PdfDocument {
            bytes,
            filename: download_filename(Utc::now()),
        })
    }
}

/// `itinerary-pages-2024-05-01T09-30-00.pdf`
pub fn download_filename(at: DateTime<Utc>) -> String {
    format!("itinerary-pages-{}.pdf", at.format("%Y-%m-%dT%H-%M-%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use chrono::TimeZone;
    use serde_json::json;

    struct Canned {
        response: Result<HttpResponse, TransportError>,
        seen: Option<(String, Value, Duration)>,
    }

    impl Transport for Canned {
        fn post_json(
            &mut self,
            url: &str,
            body: &Value,
            timeout: Duration,
        ) -> Result<HttpResponse, TransportError> {
            self.seen = Some((url.to_string(), body.clone(), timeout));
            self.response.clone()
        }
    }

    #[test]
    fn test_request_body_shape() {
        let request = PdfExporter::default().build_request("<html></html>");
        assert_eq!(
            request.to_value(),
            json!({
                "html": "<html></html>",
                "options": {
                    "format": "A4",
                    "printBackground": true,
                    "margin": {"top": 0, "right": 0, "bottom": 0, "left": 0}
                }
            })
        );
    }

    #[test]
    fn test_backend_message_is_surfaced() {
        let exporter = PdfExporter::default();
        let err = exporter
            .interpret_response(HttpResponse::new(500, br#"{"message":"Chromium crashed"}"#.to_vec()))
            .unwrap_err();
        assert_eq!(err.to_string(), "Chromium crashed");

        let err = exporter
            .interpret_response(HttpResponse::new(502, b"<html>bad gateway</html>".to_vec()))
            .unwrap_err();
        assert_eq!(err.to_string(), "HTTP 502: Failed to generate PDF");
    }

    #[test]
    fn test_empty_pdf_is_an_error() {
        let err = PdfExporter::default()
            .interpret_response(HttpResponse::new(200, Vec::new()))
            .unwrap_err();
        assert_eq!(err, PdfError::EmptyPdf);
    }

    #[test]
    fn test_generate_uses_configured_endpoint() {
        let mut transport = Canned {
            response: Ok(HttpResponse::new(200, b"%PDF-1.7".to_vec())),
            seen: None,
        };
        let doc = PdfExporter::default().generate(&mut transport, "<p>x</p>").unwrap();
        assert_eq!(doc.bytes, b"%PDF-1.7");
        assert!(doc.filename.starts_with("itinerary-pages-"));

        let (url, body, timeout) = transport.seen.unwrap();
        assert_eq!(url, "http://localhost:5000/api/generate-pdf");
        assert_eq!(body["html"], "<p>x</p>");
        assert_eq!(timeout, Duration::from_secs(100));
    }

    #[test]
    fn test_timeout_propagates() {
        let mut transport = Canned {
            response: Err(TransportError::Timeout { seconds: 100 }),
            seen: None,
        };
        let err = PdfExporter::default().generate(&mut transport, "").unwrap_err();
        assert!(matches!(err, PdfError::Transport(TransportError::Timeout { .. })));
    }

    #[test]
    fn test_download_filename() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(download_filename(at), "itinerary-pages-2024-05-01T09-30-00.pdf");
    }
}
