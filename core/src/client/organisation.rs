//! Organisation-scoped client.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::patch::PatchBuilder;
use crate::query::encode_segment;
use crate::types::{OrgId, Organisation, OrganisationPatch};

use super::{json_request, parse_model, request};
use super::{DnsClient, EnrolmentKeysClient, TagsClient, UnapprovedSystemsClient};

/// Operations on one organisation, and the entry point to its resources.
#[derive(Debug, Clone)]
pub struct OrganisationClient {
    org_id: OrgId,
    org_route: String,
}

impl OrganisationClient {
    pub(crate) fn new(base_url: &str, org_id: &OrgId) -> Self {
        Self {
            org_id: org_id.clone(),
            org_route: format!("{base_url}/org/{}", encode_segment(org_id.as_str())),
        }
    }

    pub fn org_id(&self) -> &OrgId {
        &self.org_id
    }

    pub fn enrolment_keys(&self) -> EnrolmentKeysClient {
        EnrolmentKeysClient::new(&self.org_route)
    }

    pub fn unapproved_systems(&self) -> UnapprovedSystemsClient {
        UnapprovedSystemsClient::new(&self.org_route)
    }

    pub fn tags(&self) -> TagsClient {
        TagsClient::new(&self.org_route)
    }

    pub fn dns(&self) -> DnsClient {
        DnsClient::new(&self.org_route)
    }

    pub fn build_get(&self) -> HttpRequest {
        request(HttpMethod::Get, self.org_route.clone())
    }

    pub fn build_update(&self, patch: &PatchBuilder<OrganisationPatch>) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Patch, self.org_route.clone(), patch)
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<Organisation, ApiError> {
        parse_model(response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<Organisation, ApiError> {
        parse_model(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::*;
    use crate::client::EnclaveClient;
    use crate::types::OrganisationPlan;

    fn client() -> OrganisationClient {
        EnclaveClient::new(BASE_URL).organisation(&OrgId::new(ORG))
    }

    #[test]
    fn org_id_is_path_encoded() {
        let client = EnclaveClient::new(BASE_URL).organisation(&OrgId::new("a/b"));
        assert_eq!(client.build_get().path, format!("{BASE_URL}/org/a%2Fb"));
        assert_eq!(client.org_id().as_str(), "a/b");
    }

    #[test]
    fn build_update_sends_only_assigned_fields() {
        let patch = PatchBuilder::new()
            .set(OrganisationPatch::WEBSITE, None)
            .set(OrganisationPatch::NAME, "Acme Ltd".to_string());
        let req = client().build_update(&patch).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.path, format!("{BASE_URL}/org/{ORG}"));
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        assert_eq!(
            body_json(&req),
            serde_json::json!({ "name": "Acme Ltd", "website": null })
        );
    }

    #[test]
    fn build_update_with_empty_patch_sends_empty_object() {
        let req = client().build_update(&PatchBuilder::new()).unwrap();
        assert_eq!(req.body.as_deref(), Some("{}"));
    }

    #[test]
    fn parse_get_success() {
        let org = client()
            .parse_get(respond(
                200,
                r#"{"id":"OrgA1b2C3","created":"2023-11-05T12:00:00Z","name":"Acme",
                    "plan":"Pro","website":null,"email":"ops@acme.test","phone":null,"maxSystems":100}"#,
            ))
            .unwrap();
        assert_eq!(org.name, "Acme");
        assert_eq!(org.plan, OrganisationPlan::Pro);
        assert_eq!(org.email.as_deref(), Some("ops@acme.test"));
    }

    #[test]
    fn parse_update_not_found() {
        let err = client().parse_update(respond(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }
}
