//! Unapproved system operations.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::patch::PatchBuilder;
use crate::query::encode_segment;
use crate::types::unapproved_system::{BulkSystemAction, BulkSystemApproveResult, BulkSystemDeclineResult};
use crate::types::{
    PaginatedResponse, SystemId, UnapprovedSystem, UnapprovedSystemDetail, UnapprovedSystemPatch,
    UnapprovedSystemQuery,
};

use super::{json_request, parse_empty, parse_model, query_request, request};

/// Builds and parses requests under `/org/{orgId}/unapproved-systems`.
#[derive(Debug, Clone)]
pub struct UnapprovedSystemsClient {
    route: String,
}

impl UnapprovedSystemsClient {
    pub(crate) fn new(org_route: &str) -> Self {
        Self {
            route: format!("{org_route}/unapproved-systems"),
        }
    }

    fn system_route(&self, id: &SystemId) -> String {
        format!("{}/{}", self.route, encode_segment(id.as_str()))
    }

    pub fn build_list(&self, query: &UnapprovedSystemQuery) -> Result<HttpRequest, ApiError> {
        query_request(&self.route, query)
    }

    /// Decline several systems at once. The IDs travel in a DELETE body.
    pub fn build_decline_systems(&self, ids: &[SystemId]) -> Result<HttpRequest, ApiError> {
        json_request(
            HttpMethod::Delete,
            self.route.clone(),
            &BulkSystemAction { system_ids: ids },
        )
    }

    pub fn build_get(&self, id: &SystemId) -> HttpRequest {
        request(HttpMethod::Get, self.system_route(id))
    }

    pub fn build_update(
        &self,
        id: &SystemId,
        patch: &PatchBuilder<UnapprovedSystemPatch>,
    ) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Patch, self.system_route(id), patch)
    }

    pub fn build_decline(&self, id: &SystemId) -> HttpRequest {
        request(HttpMethod::Delete, self.system_route(id))
    }

    pub fn build_approve(&self, id: &SystemId) -> HttpRequest {
        request(HttpMethod::Put, format!("{}/approve", self.system_route(id)))
    }

    pub fn build_approve_systems(&self, ids: &[SystemId]) -> Result<HttpRequest, ApiError> {
        json_request(
            HttpMethod::Put,
            format!("{}/approve", self.route),
            &BulkSystemAction { system_ids: ids },
        )
    }

    pub fn parse_list(
        &self,
        response: HttpResponse,
    ) -> Result<PaginatedResponse<UnapprovedSystem>, ApiError> {
        parse_model(response)
    }

    /// Returns the number of systems declined.
    pub fn parse_decline_systems(&self, response: HttpResponse) -> Result<i32, ApiError> {
        let result: BulkSystemDeclineResult = parse_model(response)?;
        Ok(result.systems_declined)
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<UnapprovedSystemDetail, ApiError> {
        parse_model(response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<UnapprovedSystemDetail, ApiError> {
        parse_model(response)
    }

    /// Returns the declined system as it was before removal.
    pub fn parse_decline(&self, response: HttpResponse) -> Result<UnapprovedSystemDetail, ApiError> {
        parse_model(response)
    }

    pub fn parse_approve(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_empty(response)
    }

    /// Returns the number of systems approved.
    pub fn parse_approve_systems(&self, response: HttpResponse) -> Result<i32, ApiError> {
        let result: BulkSystemApproveResult = parse_model(response)?;
        Ok(result.systems_approved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::*;
    use crate::client::EnclaveClient;
    use crate::types::{EnrolmentKeyId, OrgId, UnapprovedSystemQuerySortMode};
    use serde_json::json;

    fn client() -> UnapprovedSystemsClient {
        EnclaveClient::new(BASE_URL)
            .organisation(&OrgId::new(ORG))
            .unapproved_systems()
    }

    fn route(suffix: &str) -> String {
        format!("{BASE_URL}/org/{ORG}/unapproved-systems{suffix}")
    }

    #[test]
    fn build_list_with_key_filter() {
        let req = client().build_list(&UnapprovedSystemQuery {
            enrolment_key: Some(EnrolmentKeyId(9)),
            sort: Some(UnapprovedSystemQuerySortMode::RecentlyEnrolled),
            ..UnapprovedSystemQuery::default()
        })
        .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, route("?enrolment_key=9&sort=RecentlyEnrolled"));
    }

    #[test]
    fn build_decline_systems_sends_delete_with_body() {
        let ids = [SystemId::new("Ab3xZ"), SystemId::new("Qq7Rt")];
        let req = client().build_decline_systems(&ids).unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, route(""));
        assert_eq!(body_json(&req), json!({ "systemIds": ["Ab3xZ", "Qq7Rt"] }));
    }

    #[test]
    fn single_system_routes() {
        let id = SystemId::new("Ab3xZ");
        assert_eq!(client().build_get(&id).path, route("/Ab3xZ"));

        let decline = client().build_decline(&id);
        assert_eq!(decline.method, HttpMethod::Delete);
        assert!(decline.body.is_none());

        let approve = client().build_approve(&id);
        assert_eq!(approve.method, HttpMethod::Put);
        assert_eq!(approve.path, route("/Ab3xZ/approve"));
        assert!(approve.body.is_none());
    }

    #[test]
    fn build_approve_systems_targets_collection() {
        let req = client()
            .build_approve_systems(&[SystemId::new("Ab3xZ")])
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, route("/approve"));
        assert_eq!(body_json(&req), json!({ "systemIds": ["Ab3xZ"] }));
    }

    #[test]
    fn build_update_clears_description() {
        let patch = PatchBuilder::new().set(UnapprovedSystemPatch::DESCRIPTION, None);
        let req = client().build_update(&SystemId::new("Ab3xZ"), &patch).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(body_json(&req), json!({ "description": null }));
    }

    #[test]
    fn parse_approve_accepts_no_content() {
        assert!(client().parse_approve(respond(204, "")).is_ok());
        assert!(client().parse_approve(respond(200, "")).is_ok());
    }

    #[test]
    fn parse_bulk_counts() {
        let declined = client()
            .parse_decline_systems(respond(200, r#"{"systemsDeclined":2}"#))
            .unwrap();
        assert_eq!(declined, 2);
        let approved = client()
            .parse_approve_systems(respond(200, r#"{"systemsApproved":1}"#))
            .unwrap();
        assert_eq!(approved, 1);
    }

    #[test]
    fn parse_decline_not_found() {
        let err = client().parse_decline(respond(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }
}
