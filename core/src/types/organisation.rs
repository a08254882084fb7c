//! Organisations visible to the calling account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::OrgId;
use crate::patch_model;

wire_enum! {
    /// The caller's role within an organisation.
    pub enum OrganisationRole {
        Owner,
        Admin,
    }
}

wire_enum! {
    pub enum OrganisationPlan {
        Starter,
        Pro,
        Business,
    }
}

/// An organisation the account belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOrganisation {
    pub org_id: OrgId,
    pub org_name: String,
    pub role: OrganisationRole,
}

/// Top-level shape of the `/account/orgs` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AccountOrganisations {
    pub orgs: Vec<AccountOrganisation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organisation {
    pub id: OrgId,
    pub created: DateTime<Utc>,
    pub name: String,
    pub plan: OrganisationPlan,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub max_systems: i32,
}

patch_model! {
    /// Mutable properties of an organisation.
    pub struct OrganisationPatch {
        NAME: String => "name",
        WEBSITE: Option<String> => "website",
        EMAIL: Option<String> => "email",
        PHONE: Option<String> => "phone",
    }
}
