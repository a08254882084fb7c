//! Systems waiting for approval after enrolling with a manual-approval key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{EnrolmentKeyId, SystemId};
use super::system::SystemType;
use super::tag::TagReference;
use crate::patch_model;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnapprovedSystem {
    pub system_id: SystemId,
    #[serde(rename = "type")]
    pub system_type: SystemType,
    pub machine_name: Option<String>,
    pub enrolled_at: DateTime<Utc>,
    pub enrolment_key_id: EnrolmentKeyId,
    pub enrolment_key_description: Option<String>,
    pub os_type: Option<String>,
    pub os_version: Option<String>,
    pub enclave_version: Option<String>,
    #[serde(default)]
    pub tags: Vec<TagReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnapprovedSystemDetail {
    #[serde(flatten)]
    pub system: UnapprovedSystem,
    pub description: Option<String>,
    pub notes: Option<String>,
    /// Public address the system enrolled from.
    pub connected_from: Option<String>,
}

wire_enum! {
    /// Sort order for the unapproved system list.
    pub enum UnapprovedSystemQuerySortMode {
        RecentlyEnrolled,
        Hostname,
        Description,
        EnrolmentKey,
    }
}

patch_model! {
    /// Mutable properties of an unapproved system, carried over on approval.
    pub struct UnapprovedSystemPatch {
        DESCRIPTION: Option<String> => "description",
        TAGS: Vec<String> => "tags",
        NOTES: Option<String> => "notes",
    }
}

/// Filters for listing unapproved systems. Unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnapprovedSystemQuery {
    /// Only systems enrolled with this key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrolment_key: Option<EnrolmentKeyId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<UnapprovedSystemQuerySortMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i32>,
}

/// Body of the bulk approve/decline endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BulkSystemAction<'a> {
    pub system_ids: &'a [SystemId],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BulkSystemDeclineResult {
    pub systems_declined: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BulkSystemApproveResult {
    pub systems_approved: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::query_suffix;

    #[test]
    fn detail_flattens_system() {
        let detail: UnapprovedSystemDetail = serde_json::from_str(
            r#"{
                "systemId": "Ab3xZ",
                "type": "GeneralPurpose",
                "machineName": "build-01",
                "enrolledAt": "2024-03-02T08:30:00Z",
                "enrolmentKeyId": 3,
                "enrolmentKeyDescription": "CI runners",
                "osType": "Linux",
                "osVersion": "6.1",
                "enclaveVersion": "2024.3.0",
                "tags": [],
                "description": null,
                "notes": "rack 4",
                "connectedFrom": "198.51.100.4"
            }"#,
        )
        .unwrap();
        assert_eq!(detail.system.system_id, SystemId::new("Ab3xZ"));
        assert_eq!(detail.system.enrolment_key_id, EnrolmentKeyId(3));
        assert_eq!(detail.notes.as_deref(), Some("rack 4"));
    }

    #[test]
    fn query_orders_parameters() {
        let query = UnapprovedSystemQuery {
            enrolment_key: Some(EnrolmentKeyId(3)),
            search: Some("build box".to_string()),
            sort: Some(UnapprovedSystemQuerySortMode::Hostname),
            page: Some(0),
            per_page: Some(25),
        };
        assert_eq!(
            query_suffix(&query).unwrap(),
            "?enrolment_key=3&search=build+box&sort=Hostname&page=0&per_page=25"
        );
    }
}
