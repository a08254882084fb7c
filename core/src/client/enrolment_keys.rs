//! Enrolment key operations.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::patch::PatchBuilder;
use crate::types::enrolment_key::{BulkKeyAction, BulkKeyActionResult};
use crate::types::{
    EnrolmentKeyCreate, EnrolmentKeyId, EnrolmentKeyPatch, EnrolmentKeyQuery, FullEnrolmentKey,
    PaginatedResponse, SimpleEnrolmentKey,
};

use super::{json_request, parse_model, query_request, request};

/// Builds and parses requests under `/org/{orgId}/enrolment-keys`.
#[derive(Debug, Clone)]
pub struct EnrolmentKeysClient {
    route: String,
}

impl EnrolmentKeysClient {
    pub(crate) fn new(org_route: &str) -> Self {
        Self {
            route: format!("{org_route}/enrolment-keys"),
        }
    }

    fn key_route(&self, id: EnrolmentKeyId) -> String {
        format!("{}/{id}", self.route)
    }

    pub fn build_list(&self, query: &EnrolmentKeyQuery) -> Result<HttpRequest, ApiError> {
        query_request(&self.route, query)
    }

    pub fn build_create(&self, input: &EnrolmentKeyCreate) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Post, self.route.clone(), input)
    }

    pub fn build_get(&self, id: EnrolmentKeyId) -> HttpRequest {
        request(HttpMethod::Get, self.key_route(id))
    }

    pub fn build_update(
        &self,
        id: EnrolmentKeyId,
        patch: &PatchBuilder<EnrolmentKeyPatch>,
    ) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Patch, self.key_route(id), patch)
    }

    pub fn build_enable(&self, id: EnrolmentKeyId) -> HttpRequest {
        request(HttpMethod::Put, format!("{}/enable", self.key_route(id)))
    }

    pub fn build_disable(&self, id: EnrolmentKeyId) -> HttpRequest {
        request(HttpMethod::Put, format!("{}/disable", self.key_route(id)))
    }

    pub fn build_bulk_enable(&self, ids: &[EnrolmentKeyId]) -> Result<HttpRequest, ApiError> {
        json_request(
            HttpMethod::Put,
            format!("{}/enable", self.route),
            &BulkKeyAction { key_ids: ids },
        )
    }

    pub fn build_bulk_disable(&self, ids: &[EnrolmentKeyId]) -> Result<HttpRequest, ApiError> {
        json_request(
            HttpMethod::Put,
            format!("{}/disable", self.route),
            &BulkKeyAction { key_ids: ids },
        )
    }

    pub fn parse_list(
        &self,
        response: HttpResponse,
    ) -> Result<PaginatedResponse<SimpleEnrolmentKey>, ApiError> {
        parse_model(response)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<FullEnrolmentKey, ApiError> {
        parse_model(response)
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<FullEnrolmentKey, ApiError> {
        parse_model(response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<FullEnrolmentKey, ApiError> {
        parse_model(response)
    }

    pub fn parse_enable(&self, response: HttpResponse) -> Result<FullEnrolmentKey, ApiError> {
        parse_model(response)
    }

    pub fn parse_disable(&self, response: HttpResponse) -> Result<FullEnrolmentKey, ApiError> {
        parse_model(response)
    }

    /// Returns the number of keys modified.
    pub fn parse_bulk_enable(&self, response: HttpResponse) -> Result<i32, ApiError> {
        let result: BulkKeyActionResult = parse_model(response)?;
        Ok(result.keys_modified)
    }

    /// Returns the number of keys modified.
    pub fn parse_bulk_disable(&self, response: HttpResponse) -> Result<i32, ApiError> {
        let result: BulkKeyActionResult = parse_model(response)?;
        Ok(result.keys_modified)
    }
}
