//! DNS zones hosted by an organisation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::DnsZoneId;
use crate::patch_model;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsZoneSummary {
    pub id: DnsZoneId,
    pub name: String,
    pub record_count: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsZone {
    pub id: DnsZoneId,
    pub name: String,
    pub created: DateTime<Utc>,
    pub notes: Option<String>,
    pub record_count: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsZoneCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

patch_model! {
    /// Mutable properties of a DNS zone.
    pub struct DnsZonePatch {
        NAME: String => "name",
        NOTES: Option<String> => "notes",
    }
}
