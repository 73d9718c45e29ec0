//! Identifier generation for dynamic sections

use crate::document::SectionId;
use rustc_hash::FxHashSet;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide sequence appended to every generated id.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate a section id not present in `taken`.
///
/// Ids have the form `dynamic_<unix-ms>_<sequence>`. The sequence is monotonic,
/// so two ids minted in the same millisecond never collide; the `taken` check
/// covers ids that arrived from persisted documents.
pub fn fresh_section_id<'a>(taken: impl IntoIterator<Item = &'a SectionId>) -> SectionId {
    let taken: FxHashSet<&str> = taken.into_iter().map(SectionId::as_str).collect();
    loop {
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let candidate = format!("dynamic_{}_{}", current_timestamp(), seq);
        if !taken.contains(candidate.as_str()) {
            return SectionId(candidate);
        }
    }
}

/// Get current timestamp in milliseconds
pub fn current_timestamp() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let mut seen = Vec::new();
        for _ in 0..1000 {
            let id = fresh_section_id(&seen);
            assert!(!seen.contains(&id));
            seen.push(id);
        }
    }

    #[test]
    fn test_id_format() {
        let id = fresh_section_id(std::iter::empty());
        assert!(id.as_str().starts_with("dynamic_"));
        assert_eq!(id.as_str().split('_').count(), 3);
    }
}
