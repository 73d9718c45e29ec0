//! Contracts with the outside world: PDF rendering, login and uploads
//!
//! The crate never opens sockets itself. Hosts plug their HTTP client in
//! through [`Transport`]; everything else here is request building and
//! response interpretation.

mod login;
mod pdf;
mod upload;

pub use login::{LoginRequest, LoginResponse, Session};
pub use pdf::{download_filename, PdfDocument, PdfExporter, PdfMargin, PdfOptions, PdfRequest};
pub use upload::validate_image;

use crate::error::TransportError;
use serde_json::Value;
use std::time::Duration;

/// A response as seen by the editor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body parsed as JSON, if it is JSON
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

/// Single-attempt JSON POST supplied by the host
pub trait Transport {
    fn post_json(
        &mut self,
        url: &str,
        body: &Value,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError>;
}
