//! Wire models served by the mock API.
//!
//! Defined independently of `enclave-core`; the core integration tests catch
//! drift. Enum-valued fields are kept as strings and validated on input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::problem::Problem;

pub const KEY_TYPES: &[&str] = &["GeneralPurpose", "Ephemeral"];
pub const APPROVAL_MODES: &[&str] = &["Automatic", "Manual"];

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOrganisation {
    pub org_id: String,
    pub org_name: String,
    pub role: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccountOrganisations {
    pub orgs: Vec<AccountOrganisation>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organisation {
    pub id: String,
    pub created: DateTime<Utc>,
    pub name: String,
    pub plan: String,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub max_systems: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TagReference {
    pub tag: String,
    #[serde(rename = "ref")]
    pub ref_id: String,
    pub colour: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IpConstraint {
    pub range: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySummary {
    pub id: i32,
    pub created: DateTime<Utc>,
    pub last_used: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub key_type: String,
    pub approval_mode: String,
    pub status: String,
    pub is_enabled: bool,
    pub description: String,
    pub uses_remaining: i32,
    pub enrolled_count: i32,
    pub unapproved_count: i32,
    pub disconnected_retention_minutes: Option<i32>,
    pub tags: Vec<TagReference>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolmentKey {
    #[serde(flatten)]
    pub summary: KeySummary,
    pub key: String,
    pub ip_constraints: Vec<IpConstraint>,
    pub notes: Option<String>,
}

impl EnrolmentKey {
    /// Recompute `status` from the enabled flag and remaining uses.
    pub fn refresh_status(&mut self) {
        let summary = &mut self.summary;
        summary.status = if !summary.is_enabled {
            "Disabled"
        } else if summary.uses_remaining == 0 {
            "Exhausted"
        } else {
            "Active"
        }
        .to_string();
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolmentKeyCreate {
    #[serde(rename = "type", default = "default_key_type")]
    pub key_type: String,
    #[serde(default = "default_approval_mode")]
    pub approval_mode: String,
    pub description: String,
    #[serde(default = "unlimited_uses")]
    pub uses_remaining: i32,
    #[serde(default)]
    pub ip_constraints: Vec<IpConstraint>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub disconnected_retention_minutes: Option<i32>,
}

fn default_key_type() -> String {
    KEY_TYPES[0].to_string()
}

fn default_approval_mode() -> String {
    APPROVAL_MODES[0].to_string()
}

fn unlimited_uses() -> i32 {
    -1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSummary {
    pub system_id: String,
    #[serde(rename = "type")]
    pub system_type: String,
    pub machine_name: Option<String>,
    pub enrolled_at: DateTime<Utc>,
    pub enrolment_key_id: i32,
    pub enrolment_key_description: Option<String>,
    pub os_type: Option<String>,
    pub os_version: Option<String>,
    pub enclave_version: Option<String>,
    pub tags: Vec<TagReference>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnapprovedSystem {
    #[serde(flatten)]
    pub summary: SystemSummary,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub connected_from: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicTag {
    pub tag: String,
    #[serde(rename = "ref")]
    pub ref_id: String,
    pub colour: Option<String>,
    pub last_referenced: Option<DateTime<Utc>>,
    pub systems: i32,
    pub keys: i32,
    pub policies: i32,
    pub dns_records: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsZone {
    pub id: i32,
    pub name: String,
    pub created: DateTime<Utc>,
    pub notes: Option<String>,
    pub record_count: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsZoneSummary {
    pub id: i32,
    pub name: String,
    pub record_count: i32,
}

impl From<&DnsZone> for DnsZoneSummary {
    fn from(zone: &DnsZone) -> Self {
        Self {
            id: zone.id,
            name: zone.name.clone(),
            record_count: zone.record_count,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct DnsZoneCreate {
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Deserialize a field that is present, keeping an explicit `null` as
/// `Some(None)`. Combined with `#[serde(default)]`, an absent field stays
/// `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrganisationPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub website: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnrolmentKeyPatch {
    pub description: Option<String>,
    pub is_enabled: Option<bool>,
    pub approval_mode: Option<String>,
    pub uses_remaining: Option<i32>,
    pub ip_constraints: Option<Vec<IpConstraint>>,
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub disconnected_retention_minutes: Option<Option<i32>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UnapprovedSystemPatch {
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DnsZonePatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyIds {
    pub key_ids: Vec<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemIds {
    pub system_ids: Vec<String>,
}

/// Reject `value` unless it is one of `allowed`.
pub fn ensure_choice(field: &str, value: &str, allowed: &[&str]) -> Result<(), Problem> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(Problem::bad_request(
            "One or more validation errors occurred.",
            format!("{field} must be one of {}", allowed.join(", ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_null_are_distinct() {
        let patch: EnrolmentKeyPatch = serde_json::from_str(r#"{"notes":null}"#).unwrap();
        assert_eq!(patch.notes, Some(None));
        assert_eq!(patch.disconnected_retention_minutes, None);

        let patch: EnrolmentKeyPatch = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(patch.notes, None);
    }

    #[test]
    fn unknown_patch_fields_are_rejected() {
        let result: Result<UnapprovedSystemPatch, _> =
            serde_json::from_str(r#"{"colour":"red"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn key_create_defaults() {
        let input: EnrolmentKeyCreate =
            serde_json::from_str(r#"{"description":"Laptops"}"#).unwrap();
        assert_eq!(input.key_type, "GeneralPurpose");
        assert_eq!(input.approval_mode, "Automatic");
        assert_eq!(input.uses_remaining, -1);
        assert!(input.tags.is_empty());
    }

    #[test]
    fn status_follows_enabled_flag_and_uses() {
        let mut key: EnrolmentKey = serde_json::from_value(serde_json::json!({
            "id": 1, "created": "2024-01-01T00:00:00Z", "lastUsed": null,
            "type": "GeneralPurpose", "approvalMode": "Automatic", "status": "Active",
            "isEnabled": true, "description": "k", "usesRemaining": 0,
            "enrolledCount": 0, "unapprovedCount": 0, "disconnectedRetentionMinutes": null,
            "tags": [], "key": "K", "ipConstraints": [], "notes": null
        }))
        .unwrap();
        key.refresh_status();
        assert_eq!(key.summary.status, "Exhausted");
        key.summary.is_enabled = false;
        key.refresh_status();
        assert_eq!(key.summary.status, "Disabled");
    }

    #[test]
    fn ensure_choice_lists_allowed_values() {
        assert!(ensure_choice("approvalMode", "Manual", APPROVAL_MODES).is_ok());
        let problem = ensure_choice("approvalMode", "Sometimes", APPROVAL_MODES).unwrap_err();
        assert_eq!(
            problem.detail.as_deref(),
            Some("approvalMode must be one of Automatic, Manual")
        );
    }
}
