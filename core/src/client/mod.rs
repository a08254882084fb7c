//! Stateless HTTP request builders and response parsers for the management
//! API.
//!
//! # Design
//! Clients hold only routes and carry no mutable state between calls. Each
//! operation is split into a `build_*` method that produces an `HttpRequest`
//! and a `parse_*` method that consumes an `HttpResponse`. The caller, or a
//! [`Transport`](crate::transport::Transport), executes the round trip in
//! between.
//!
//! [`EnclaveClient`] is the entry point; [`EnclaveClient::organisation`]
//! scopes to one organisation, whose client hands out the per-resource
//! clients.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, PROBLEM_CONTENT_TYPE};
use crate::query::query_suffix;
use crate::types::organisation::AccountOrganisations;
use crate::types::{AccountOrganisation, OrgId, ProblemDetails};

pub mod dns;
pub mod enrolment_keys;
pub mod organisation;
pub mod tags;
pub mod unapproved_systems;

pub use dns::DnsClient;
pub use enrolment_keys::EnrolmentKeysClient;
pub use organisation::OrganisationClient;
pub use tags::TagsClient;
pub use unapproved_systems::UnapprovedSystemsClient;

/// Root client for the management API.
#[derive(Debug, Clone)]
pub struct EnclaveClient {
    base_url: String,
    default_org: Option<OrgId>,
}

impl EnclaveClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            default_org: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            default_org: config.org_id.clone(),
            ..Self::new(&config.base_url)
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_get_organisations(&self) -> HttpRequest {
        request(HttpMethod::Get, format!("{}/account/orgs", self.base_url))
    }

    pub fn parse_get_organisations(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<AccountOrganisation>, ApiError> {
        let top: AccountOrganisations = parse_model(response)?;
        Ok(top.orgs)
    }

    /// Client scoped to `org_id`.
    pub fn organisation(&self, org_id: &OrgId) -> OrganisationClient {
        OrganisationClient::new(&self.base_url, org_id)
    }

    /// Client scoped to the configured organisation, if any.
    pub fn default_organisation(&self) -> Option<OrganisationClient> {
        self.default_org.as_ref().map(|org_id| self.organisation(org_id))
    }
}

/// A request without a body.
pub(crate) fn request(method: HttpMethod, path: String) -> HttpRequest {
    debug!(%method, %path, "built request");
    HttpRequest::new(method, path)
}

/// A GET request for `route` with `query` rendered as its query string.
pub(crate) fn query_request<Q: Serialize + ?Sized>(
    route: &str,
    query: &Q,
) -> Result<HttpRequest, ApiError> {
    Ok(request(HttpMethod::Get, format!("{route}{}", query_suffix(query)?)))
}

/// A request carrying `body` as JSON.
pub(crate) fn json_request<B: Serialize + ?Sized>(
    method: HttpMethod,
    path: String,
    body: &B,
) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(body).map_err(|e| ApiError::SerializationError(e.to_string()))?;
    debug!(%method, %path, bytes = body.len(), "built request with body");
    Ok(HttpRequest::with_json(method, path, body))
}

/// Check the status and decode a model from the body.
pub(crate) fn parse_model<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    let body = response.body.trim();
    if body.is_empty() || body == "null" {
        return Err(ApiError::EmptyResponse);
    }
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Check the status and ignore the body.
pub(crate) fn parse_empty(response: HttpResponse) -> Result<(), ApiError> {
    check_status(&response)
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    debug!(status = response.status, "parsing response");
    if response.is_success() {
        return Ok(());
    }
    warn!(status = response.status, "request failed");
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    let problem_typed = response
        .header("content-type")
        .is_some_and(|value| value.starts_with(PROBLEM_CONTENT_TYPE));
    let details = if problem_typed {
        serde_json::from_str(&response.body).ok()
    } else {
        ProblemDetails::from_body(&response.body)
    };
    match details {
        Some(details) => Err(ApiError::Problem {
            status: response.status,
            details,
        }),
        None => Err(ApiError::HttpError {
            status: response.status,
            body: response.body.clone(),
        }),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::http::HttpResponse;

    pub const BASE_URL: &str = "http://localhost:3000";
    pub const ORG: &str = "OrgA1b2C3";

    pub fn respond(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    pub fn body_json(req: &crate::http::HttpRequest) -> serde_json::Value {
        serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
    }
}
