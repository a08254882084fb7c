//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use enclave_core::types::{
    EnrolmentKeyId, EnrolmentKeyPatch, EnrolmentKeyQuery, EnrolmentKeySortOrder, OrgId, TagQuery,
    TagQuerySortOrder, UnapprovedSystemQuery, UnapprovedSystemQuerySortMode,
};
use enclave_core::{ApiError, EnclaveClient, HttpMethod, HttpResponse, OrganisationClient, PatchBuilder};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";
const ORG: &str = "OrgA1b2C3";

fn client() -> OrganisationClient {
    EnclaveClient::new(BASE_URL).organisation(&OrgId::new(ORG))
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn opt_str(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn opt_i32(value: &Value) -> Option<i32> {
    value.as_i64().map(|n| n as i32)
}

fn wire<T: Copy + std::fmt::Display>(all: &[T], value: &Value) -> Option<T> {
    let name = value.as_str()?;
    Some(*all.iter().find(|v| v.to_string() == name).unwrap())
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    let raw = include_str!("../../test-vectors/update.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let keys = client().enrolment_keys();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = EnrolmentKeyId(case["input_id"].as_i64().unwrap() as i32);

        let patch = case["fields"]
            .as_array()
            .unwrap()
            .iter()
            .try_fold(PatchBuilder::<EnrolmentKeyPatch>::new(), |patch, pair| {
                patch.try_set(pair[0].as_str().unwrap(), pair[1].clone())
            });

        if let Some(expected_error) = case.get("expected_error") {
            let err = patch.unwrap_err();
            match expected_error.as_str().unwrap() {
                "InvalidField" => assert!(
                    matches!(err, ApiError::InvalidField { model: "EnrolmentKeyPatch", .. }),
                    "{name}: expected InvalidField, got {err:?}"
                ),
                other => panic!("{name}: unknown expected_error: {other}"),
            }
            continue;
        }
        let patch = patch.unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = keys.build_update(id, &patch).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");
        assert_eq!(req.headers, pairs(&expected_req["headers"]), "{name}: headers");

        let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(req_body, expected_req["body"], "{name}: body");

        // Verify parse
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].to_string(),
        };
        let key = keys.parse_update(response).unwrap();
        let actual = serde_json::to_value(&key).unwrap();
        for (field, expected) in case["expected_result"].as_object().unwrap() {
            assert_eq!(&actual[field], expected, "{name}: parsed {field}");
        }
    }
}

// ---------------------------------------------------------------------------
// List query strings
// ---------------------------------------------------------------------------

#[test]
fn enrolment_key_list_vectors() {
    let raw = include_str!("../../test-vectors/list.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let keys = client().enrolment_keys();
    for case in vectors["enrolment_keys"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let q = &case["query"];
        let query = EnrolmentKeyQuery {
            search: opt_str(&q["search"]),
            include_disabled: q["include_disabled"].as_bool(),
            sort: wire(EnrolmentKeySortOrder::ALL, &q["sort"]),
            page: opt_i32(&q["page"]),
            per_page: opt_i32(&q["per_page"]),
        };

        let req = keys.build_list(&query).unwrap();
        assert_eq!(req.method, HttpMethod::Get, "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", case["expected_path"].as_str().unwrap()), "{name}: path");
        assert!(req.body.is_none(), "{name}: body should be None");
    }
}

#[test]
fn unapproved_system_list_vectors() {
    let raw = include_str!("../../test-vectors/list.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let systems = client().unapproved_systems();
    for case in vectors["unapproved_systems"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let q = &case["query"];
        let query = UnapprovedSystemQuery {
            enrolment_key: opt_i32(&q["enrolment_key"]).map(EnrolmentKeyId),
            search: opt_str(&q["search"]),
            sort: wire(UnapprovedSystemQuerySortMode::ALL, &q["sort"]),
            page: opt_i32(&q["page"]),
            per_page: opt_i32(&q["per_page"]),
        };

        let req = systems.build_list(&query).unwrap();
        assert_eq!(req.path, format!("{BASE_URL}{}", case["expected_path"].as_str().unwrap()), "{name}: path");
    }
}

#[test]
fn tag_list_vectors() {
    let raw = include_str!("../../test-vectors/list.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let tags = client().tags();
    for case in vectors["tags"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let q = &case["query"];
        let query = TagQuery {
            search: opt_str(&q["search"]),
            sort: wire(TagQuerySortOrder::ALL, &q["sort"]),
            page: opt_i32(&q["page"]),
            per_page: opt_i32(&q["per_page"]),
        };

        let req = tags.build_list(&query).unwrap();
        assert_eq!(req.path, format!("{BASE_URL}{}", case["expected_path"].as_str().unwrap()), "{name}: path");
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn error_test_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: pairs(&sim["headers"]),
            body: sim["body"].as_str().unwrap().to_string(),
        };

        let err = c.parse_get(response).unwrap_err();
        let kind = case["expected_error"].as_str().unwrap();
        let matched = match kind {
            "EmptyResponse" => matches!(err, ApiError::EmptyResponse),
            "NotFound" => matches!(err, ApiError::NotFound),
            "Problem" => matches!(err, ApiError::Problem { .. }),
            "HttpError" => matches!(err, ApiError::HttpError { .. }),
            "DeserializationError" => matches!(err, ApiError::DeserializationError(_)),
            other => panic!("{name}: unknown expected_error: {other}"),
        };
        assert!(matched, "{name}: expected {kind}, got {err:?}");

        if let Some(status) = case.get("expected_status") {
            assert_eq!(err.status(), Some(status.as_u64().unwrap() as u16), "{name}: status");
        }
        if let Some(title) = case.get("expected_title") {
            let details = err.problem_details().unwrap();
            assert_eq!(details.title.as_deref(), title.as_str(), "{name}: title");
        }
    }
}
