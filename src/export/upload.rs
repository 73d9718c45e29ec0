//! Client-side checks on picture uploads

use crate::config::UploadConfig;
use crate::error::UploadError;
use tracing::debug;

/// Check an image before it is read into a data-URI.
///
/// The MIME type must be one of the allowed types and the size must not
/// exceed the configured limit.
pub fn validate_image(limits: &UploadConfig, mime: &str, size: u64) -> Result<(), UploadError> {
    let mime = mime.trim();
    let allowed = limits
        .allowed_types
        .iter()
        .any(|t| t.eq_ignore_ascii_case(mime));
    if !allowed {
        debug!(mime, "rejecting upload of unsupported type");
        return Err(UploadError::UnsupportedType {
            mime: mime.to_string(),
        });
    }
    if size > limits.max_bytes {
        debug!(size, limit = limits.max_bytes, "rejecting oversized upload");
        return Err(UploadError::TooLarge {
            size,
            limit: limits.max_bytes,
        });
    }
    Ok(())
}
