//! Tags and tag references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::TagRefId;

/// Represents a single tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicTag {
    pub tag: String,
    /// Persists between renames of the tag.
    #[serde(rename = "ref")]
    pub ref_id: TagRefId,
    pub colour: Option<String>,
    pub last_referenced: Option<DateTime<Utc>>,
    /// Number of systems that reference this tag.
    pub systems: i32,
    /// Number of enrolment keys that reference this tag.
    pub keys: i32,
    pub policies: i32,
    pub dns_records: i32,
}

/// A tag as it appears attached to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagReference {
    pub tag: String,
    #[serde(rename = "ref")]
    pub ref_id: TagRefId,
    #[serde(default)]
    pub colour: Option<String>,
}

wire_enum! {
    /// Sort order for the tag list.
    pub enum TagQuerySortOrder {
        Alphabetical,
        RecentlyUsed,
        ReferencedCount,
    }
}

/// Filters for listing tags. Unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<TagQuerySortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i32>,
}
