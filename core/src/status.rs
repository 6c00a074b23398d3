//! Status code to reason phrase lookup.

use ureq::http::StatusCode;

/// Canonical reason phrase for a registered status code.
pub fn reason_phrase(code: u16) -> Option<&'static str> {
    StatusCode::from_u16(code)
        .ok()
        .and_then(|status| status.canonical_reason())
}

/// Like [`reason_phrase`], with unknown codes mapped to an empty string.
pub fn reason_phrase_or_empty(code: u16) -> &'static str {
    reason_phrase(code).unwrap_or("")
}
