//! DNS zone operations.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::patch::PatchBuilder;
use crate::query::PageQuery;
use crate::types::{DnsZone, DnsZoneCreate, DnsZoneId, DnsZonePatch, DnsZoneSummary, PaginatedResponse};

use super::{json_request, parse_model, query_request, request};

/// Builds and parses requests under `/org/{orgId}/dns/zones`.
#[derive(Debug, Clone)]
pub struct DnsClient {
    zones_route: String,
}

impl DnsClient {
    pub(crate) fn new(org_route: &str) -> Self {
        Self {
            zones_route: format!("{org_route}/dns/zones"),
        }
    }

    fn zone_route(&self, id: DnsZoneId) -> String {
        format!("{}/{id}", self.zones_route)
    }

    pub fn build_list_zones(
        &self,
        page: Option<i32>,
        per_page: Option<i32>,
    ) -> Result<HttpRequest, ApiError> {
        query_request(&self.zones_route, &PageQuery { page, per_page })
    }

    pub fn build_create_zone(&self, input: &DnsZoneCreate) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Post, self.zones_route.clone(), input)
    }

    pub fn build_get_zone(&self, id: DnsZoneId) -> HttpRequest {
        request(HttpMethod::Get, self.zone_route(id))
    }

    pub fn build_update_zone(
        &self,
        id: DnsZoneId,
        patch: &PatchBuilder<DnsZonePatch>,
    ) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Patch, self.zone_route(id), patch)
    }

    pub fn build_delete_zone(&self, id: DnsZoneId) -> HttpRequest {
        request(HttpMethod::Delete, self.zone_route(id))
    }

    pub fn parse_list_zones(
        &self,
        response: HttpResponse,
    ) -> Result<PaginatedResponse<DnsZoneSummary>, ApiError> {
        parse_model(response)
    }

    pub fn parse_create_zone(&self, response: HttpResponse) -> Result<DnsZone, ApiError> {
        parse_model(response)
    }

    pub fn parse_get_zone(&self, response: HttpResponse) -> Result<DnsZone, ApiError> {
        parse_model(response)
    }

    pub fn parse_update_zone(&self, response: HttpResponse) -> Result<DnsZone, ApiError> {
        parse_model(response)
    }

    /// Returns the zone as it was before deletion.
    pub fn parse_delete_zone(&self, response: HttpResponse) -> Result<DnsZone, ApiError> {
        parse_model(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::*;
    use crate::client::EnclaveClient;
    use crate::types::OrgId;
    use serde_json::json;

    fn client() -> DnsClient {
        EnclaveClient::new(BASE_URL).organisation(&OrgId::new(ORG)).dns()
    }

    fn route(suffix: &str) -> String {
        format!("{BASE_URL}/org/{ORG}/dns/zones{suffix}")
    }

    #[test]
    fn build_list_zones_paging() {
        assert_eq!(client().build_list_zones(None, None).unwrap().path, route(""));
        assert_eq!(
            client().build_list_zones(Some(1), Some(20)).unwrap().path,
            route("?page=1&per_page=20")
        );
    }

    #[test]
    fn build_create_zone_omits_missing_notes() {
        let req = client()
            .build_create_zone(&DnsZoneCreate {
                name: "internal.test".to_string(),
                notes: None,
            })
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(body_json(&req), json!({ "name": "internal.test" }));
    }

    #[test]
    fn zone_routes() {
        let id = DnsZoneId(4);
        assert_eq!(client().build_get_zone(id).path, route("/4"));
        let delete = client().build_delete_zone(id);
        assert_eq!(delete.method, HttpMethod::Delete);
        assert_eq!(delete.path, route("/4"));

        let patch = PatchBuilder::new().set(DnsZonePatch::NOTES, Some("lab".to_string()));
        let update = client().build_update_zone(id, &patch).unwrap();
        assert_eq!(update.method, HttpMethod::Patch);
        assert_eq!(body_json(&update), json!({ "notes": "lab" }));
    }

    #[test]
    fn parse_get_zone_success() {
        let zone = client()
            .parse_get_zone(respond(
                200,
                r#"{"id":4,"name":"internal.test","created":"2024-01-01T00:00:00Z","notes":null,"recordCount":3}"#,
            ))
            .unwrap();
        assert_eq!(zone.id, DnsZoneId(4));
        assert_eq!(zone.record_count, 3);
    }

    #[test]
    fn parse_delete_zone_not_found() {
        let err = client().parse_delete_zone(respond(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }
}
