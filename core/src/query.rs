//! Query strings and path segments.
//!
//! Filters are plain `Serialize` structs rendered with `serde_urlencoded`;
//! unset filters are skipped with `skip_serializing_if`. String IDs placed in
//! a route are percent-encoded so they can never alter it.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::error::ApiError;

/// Everything but the RFC 3986 unreserved set.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode `input` for use as one path segment.
pub fn encode_segment(input: &str) -> String {
    utf8_percent_encode(input, SEGMENT).to_string()
}

/// Render `query` as `?k=v&...`, or as an empty string when every field is
/// skipped.
pub fn query_suffix<Q: Serialize + ?Sized>(query: &Q) -> Result<String, ApiError> {
    let encoded =
        serde_urlencoded::to_string(query).map_err(|e| ApiError::SerializationError(e.to_string()))?;
    Ok(if encoded.is_empty() {
        encoded
    } else {
        format!("?{encoded}")
    })
}

/// Zero-based paging for routes without other filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i32>,
}
