//! Enrolment keys: the credentials systems use to join an organisation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::ids::EnrolmentKeyId;
use super::tag::TagReference;
use crate::patch_model;

wire_enum! {
    /// Lifetime class of the systems a key enrols.
    pub enum EnrolmentKeyType {
        GeneralPurpose,
        Ephemeral,
    }
}

wire_enum! {
    /// Whether systems enrolled with a key join immediately or wait for
    /// approval.
    pub enum ApprovalMode {
        Automatic,
        Manual,
    }
}

wire_enum! {
    pub enum EnrolmentKeyStatus {
        Disabled,
        Active,
        Exhausted,
    }
}

wire_enum! {
    /// Sort order for the enrolment key list.
    pub enum EnrolmentKeySortOrder {
        Description,
        LastUsed,
        ApprovalMode,
        UsesRemaining,
    }
}

/// Restricts the source addresses a key can be used from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrolmentKeyIpConstraint {
    /// A single address or CIDR range.
    pub range: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl EnrolmentKeyIpConstraint {
    pub fn new(range: impl Into<String>) -> Self {
        Self {
            range: range.into(),
            description: None,
        }
    }
}

/// An enrolment key as it appears in list results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleEnrolmentKey {
    pub id: EnrolmentKeyId,
    pub created: DateTime<Utc>,
    pub last_used: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub key_type: EnrolmentKeyType,
    pub approval_mode: ApprovalMode,
    pub status: EnrolmentKeyStatus,
    pub is_enabled: bool,
    pub description: String,
    /// `-1` means unlimited.
    pub uses_remaining: i32,
    pub enrolled_count: i32,
    pub unapproved_count: i32,
    /// Only meaningful for ephemeral keys.
    pub disconnected_retention_minutes: Option<i32>,
    #[serde(default)]
    pub tags: Vec<TagReference>,
}

/// An enrolment key including its secret value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullEnrolmentKey {
    #[serde(flatten)]
    pub summary: SimpleEnrolmentKey,
    pub key: String,
    #[serde(default)]
    pub ip_constraints: Vec<EnrolmentKeyIpConstraint>,
    pub notes: Option<String>,
}

/// Payload for creating an enrolment key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolmentKeyCreate {
    #[serde(rename = "type")]
    pub key_type: EnrolmentKeyType,
    pub approval_mode: ApprovalMode,
    pub description: String,
    pub uses_remaining: i32,
    pub ip_constraints: Vec<EnrolmentKeyIpConstraint>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disconnected_retention_minutes: Option<i32>,
}

impl Default for EnrolmentKeyCreate {
    fn default() -> Self {
        Self {
            key_type: EnrolmentKeyType::GeneralPurpose,
            approval_mode: ApprovalMode::Automatic,
            description: String::new(),
            uses_remaining: -1,
            ip_constraints: Vec::new(),
            tags: Vec::new(),
            notes: None,
            disconnected_retention_minutes: None,
        }
    }
}

patch_model! {
    /// Mutable properties of an enrolment key.
    pub struct EnrolmentKeyPatch {
        DESCRIPTION: String => "description",
        IS_ENABLED: bool => "isEnabled",
        APPROVAL_MODE: ApprovalMode => "approvalMode",
        USES_REMAINING: i32 => "usesRemaining",
        IP_CONSTRAINTS: Vec<EnrolmentKeyIpConstraint> => "ipConstraints",
        /// Tag names; the full set replaces the key's current tags.
        TAGS: Vec<String> => "tags",
        NOTES: Option<String> => "notes",
        DISCONNECTED_RETENTION_MINUTES: Option<i32> => "disconnectedRetentionMinutes",
    }
}

/// Filters for listing enrolment keys. Unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrolmentKeyQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<EnrolmentKeySortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i32>,
}

/// Body of the bulk enable/disable endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BulkKeyAction<'a> {
    pub key_ids: &'a [EnrolmentKeyId],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BulkKeyActionResult {
    pub keys_modified: i32,
}
