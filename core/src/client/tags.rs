//! Tag listing.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{BasicTag, PaginatedResponse, TagQuery};

use super::{parse_model, query_request};

/// Builds and parses requests under `/org/{orgId}/tags`.
#[derive(Debug, Clone)]
pub struct TagsClient {
    route: String,
}

impl TagsClient {
    pub(crate) fn new(org_route: &str) -> Self {
        Self {
            route: format!("{org_route}/tags"),
        }
    }

    pub fn build_list(&self, query: &TagQuery) -> Result<HttpRequest, ApiError> {
        query_request(&self.route, query)
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<PaginatedResponse<BasicTag>, ApiError> {
        parse_model(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::*;
    use crate::client::EnclaveClient;
    use crate::types::{OrgId, TagQuerySortOrder, TagRefId};

    fn client() -> TagsClient {
        EnclaveClient::new(BASE_URL).organisation(&OrgId::new(ORG)).tags()
    }

    #[test]
    fn build_list_produces_correct_request() {
        let req = client().build_list(&TagQuery {
            search: Some("ci".to_string()),
            sort: Some(TagQuerySortOrder::ReferencedCount),
            ..TagQuery::default()
        })
        .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.path,
            format!("{BASE_URL}/org/{ORG}/tags?search=ci&sort=ReferencedCount")
        );
    }

    #[test]
    fn parse_list_success() {
        let page = client()
            .parse_list(respond(
                200,
                r##"{"metadata":{"total":1,"firstPage":0,"prevPage":null,"nextPage":null,"lastPage":0},
                    "links":{"first":null,"prev":null,"next":null,"last":null},
                    "items":[{"tag":"ci","ref":"t-1","colour":"#00ff00","lastReferenced":"2024-03-01T10:00:00Z",
                              "systems":2,"keys":1,"policies":0,"dnsRecords":0}]}"##,
            ))
            .unwrap();
        let tag = &page.items[0];
        assert_eq!(tag.ref_id, TagRefId::new("t-1"));
        assert_eq!(tag.colour.as_deref(), Some("#00ff00"));
        assert_eq!(tag.systems, 2);
    }
}
