//! RFC 7807 problem details.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error body returned by the API for rejected requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Members beyond the standard five, e.g. validation `errors`.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl ProblemDetails {
    /// Decode a problem body. Returns `None` unless the JSON is an object
    /// carrying at least a `title` or `type`.
    pub fn from_body(body: &str) -> Option<Self> {
        let details: ProblemDetails = serde_json::from_str(body).ok()?;
        (details.title.is_some() || details.problem_type.is_some()).then_some(details)
    }
}
