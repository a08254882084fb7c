//! Typed client core for the Enclave management API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). A [`Transport`] executes the
//! round trip; [`UreqTransport`] is provided behind the default `ureq`
//! feature.
//!
//! # Design
//! - Clients are stateless; they hold only routes.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Partial updates go through [`PatchBuilder`], which sends exactly the
//!   fields that were assigned, `null` and `false` included.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//!
//! ```no_run
//! use enclave_core::types::{EnrolmentKeyId, EnrolmentKeyPatch, OrgId};
//! use enclave_core::{ClientConfig, EnclaveClient, PatchBuilder, Transport, UreqTransport};
//!
//! # fn main() -> Result<(), enclave_core::ApiError> {
//! let config = ClientConfig::from_env()?;
//! let transport = UreqTransport::new(&config);
//! let keys = EnclaveClient::from_config(&config)
//!     .organisation(&OrgId::new("OrgA1b2C3"))
//!     .enrolment_keys();
//!
//! let patch = PatchBuilder::new().set(EnrolmentKeyPatch::IS_ENABLED, false);
//! let req = keys.build_update(EnrolmentKeyId(3), &patch)?;
//! let key = keys.parse_update(transport.execute(req)?)?;
//! assert!(!key.summary.is_enabled);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod patch;
pub mod query;
pub mod transport;
pub mod types;

pub use client::{
    DnsClient, EnclaveClient, EnrolmentKeysClient, OrganisationClient, TagsClient,
    UnapprovedSystemsClient,
};
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use patch::{Field, PatchBuilder, PatchModel};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
