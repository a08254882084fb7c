//! Domain DTOs for the Enclave management API.
//!
//! # Design
//! These types mirror the API's JSON schema (camelCase fields, enums by
//! variant name) and are defined independently of the mock server; the
//! integration tests catch schema drift between the two crates.

/// An enum serialized by variant name, usable in query strings and as a
/// patch value.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$variant_meta:meta])* $variant:ident ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        pub enum $name {
            $( $(#[$variant_meta])* $variant ),*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => stringify!($variant) ),*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod dns;
pub mod enrolment_key;
pub mod ids;
pub mod organisation;
pub mod pagination;
pub mod problem;
pub mod system;
pub mod tag;
pub mod unapproved_system;

pub use dns::{DnsZone, DnsZoneCreate, DnsZonePatch, DnsZoneSummary};
pub use enrolment_key::{
    ApprovalMode, EnrolmentKeyCreate, EnrolmentKeyIpConstraint, EnrolmentKeyPatch,
    EnrolmentKeyQuery, EnrolmentKeySortOrder, EnrolmentKeyStatus, EnrolmentKeyType,
    FullEnrolmentKey, SimpleEnrolmentKey,
};
pub use ids::{DnsZoneId, EnrolmentKeyId, OrgId, SystemId, TagRefId};
pub use organisation::{AccountOrganisation, Organisation, OrganisationPatch, OrganisationPlan, OrganisationRole};
pub use pagination::{PaginatedResponse, PaginationLinks, PaginationMetadata};
pub use problem::ProblemDetails;
pub use system::{PlaceholderSystemReference, SystemReference, SystemReferenceModel, SystemState, SystemType};
pub use tag::{BasicTag, TagQuery, TagQuerySortOrder, TagReference};
pub use unapproved_system::{
    UnapprovedSystem, UnapprovedSystemDetail, UnapprovedSystemPatch, UnapprovedSystemQuery,
    UnapprovedSystemQuerySortMode,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_enums_serialize_as_their_names() {
        for mode in ApprovalMode::ALL {
            let json = serde_json::to_value(mode).unwrap();
            assert_eq!(json, serde_json::Value::String(mode.as_str().to_string()));
        }
        for order in EnrolmentKeySortOrder::ALL {
            assert_eq!(serde_json::to_value(order).unwrap(), order.to_string().as_str());
        }
    }
}
