//! In-memory mock of the Enclave management API.
//!
//! Serves every route the core client knows about from a [`Store`] behind a
//! `tokio::sync::RwLock`. PATCH handlers apply only the fields present in the
//! body; unknown fields are rejected. Missing resources answer 404 with a
//! problem-details body.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing::info;

pub mod model;
pub mod problem;
pub mod store;

use model::{
    ensure_choice, AccountOrganisations, DnsZone, DnsZoneCreate, DnsZonePatch, DnsZoneSummary,
    EnrolmentKey, EnrolmentKeyCreate, EnrolmentKeyPatch, KeyIds, KeySummary, Organisation,
    OrganisationPatch, SystemIds, SystemSummary, UnapprovedSystem, UnapprovedSystemPatch,
    APPROVAL_MODES, KEY_TYPES,
};
use problem::Problem;
use store::{new_key_secret, paginate, Paginated};

pub use store::{Store, SEED_KEY_ID, SEED_ORG_ID, SEED_ORG_NAME, SEED_SYSTEM_IDS, SEED_ZONE_ID};

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<T, Problem>;

/// Router over a freshly seeded store.
pub fn app() -> Router {
    app_with_store(Store::seeded())
}

pub fn app_with_store(store: Store) -> Router {
    router(Arc::new(RwLock::new(store)))
}

/// Router over a shared store handle.
pub fn router(db: Db) -> Router {
    Router::new()
        .route("/account/orgs", get(list_orgs))
        .route("/org/{org}", get(get_org).patch(update_org))
        .route("/org/{org}/enrolment-keys", get(list_keys).post(create_key))
        .route("/org/{org}/enrolment-keys/enable", put(bulk_enable_keys))
        .route("/org/{org}/enrolment-keys/disable", put(bulk_disable_keys))
        .route("/org/{org}/enrolment-keys/{id}", get(get_key).patch(update_key))
        .route("/org/{org}/enrolment-keys/{id}/enable", put(enable_key))
        .route("/org/{org}/enrolment-keys/{id}/disable", put(disable_key))
        .route(
            "/org/{org}/unapproved-systems",
            get(list_unapproved).delete(decline_systems),
        )
        .route("/org/{org}/unapproved-systems/approve", put(approve_systems))
        .route(
            "/org/{org}/unapproved-systems/{id}",
            get(get_unapproved)
                .patch(update_unapproved)
                .delete(decline_system),
        )
        .route("/org/{org}/unapproved-systems/{id}/approve", put(approve_system))
        .route("/org/{org}/tags", get(list_tags))
        .route("/org/{org}/dns/zones", get(list_zones).post(create_zone))
        .route(
            "/org/{org}/dns/zones/{id}",
            get(get_zone).patch(update_zone).delete(delete_zone),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// ---------------------------------------------------------------------------
// Organisations
// ---------------------------------------------------------------------------

async fn list_orgs(State(db): State<Db>) -> Json<AccountOrganisations> {
    let store = db.read().await;
    Json(AccountOrganisations {
        orgs: store.account_orgs(),
    })
}

async fn get_org(State(db): State<Db>, Path(org): Path<String>) -> ApiResult<Json<Organisation>> {
    let store = db.read().await;
    Ok(Json(store.org(&org)?.org.clone()))
}

async fn update_org(
    State(db): State<Db>,
    Path(org): Path<String>,
    Json(patch): Json<OrganisationPatch>,
) -> ApiResult<Json<Organisation>> {
    let mut store = db.write().await;
    let data = store.org_mut(&org)?;
    if let Some(name) = patch.name {
        data.org.name = name;
    }
    if let Some(website) = patch.website {
        data.org.website = website;
    }
    if let Some(email) = patch.email {
        data.org.email = email;
    }
    if let Some(phone) = patch.phone {
        data.org.phone = phone;
    }
    info!(%org, "organisation updated");
    Ok(Json(data.org.clone()))
}

// ---------------------------------------------------------------------------
// Enrolment keys
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct KeyListParams {
    search: Option<String>,
    include_disabled: Option<bool>,
    sort: Option<String>,
    page: Option<i32>,
    per_page: Option<i32>,
}

async fn list_keys(
    State(db): State<Db>,
    Path(org): Path<String>,
    Query(params): Query<KeyListParams>,
    uri: Uri,
) -> ApiResult<Json<Paginated<KeySummary>>> {
    let store = db.read().await;
    let data = store.org(&org)?;
    let search = params.search.as_deref().map(str::to_lowercase);
    let include_disabled = params.include_disabled.unwrap_or(false);

    let mut keys: Vec<KeySummary> = data
        .keys
        .values()
        .map(|k| k.summary.clone())
        .filter(|k| include_disabled || k.is_enabled)
        .filter(|k| match &search {
            Some(term) => {
                k.description.to_lowercase().contains(term)
                    || k.tags.iter().any(|t| t.tag.to_lowercase().contains(term))
            }
            None => true,
        })
        .collect();

    match params.sort.as_deref() {
        None => {}
        Some("Description") => keys.sort_by(|a, b| a.description.cmp(&b.description)),
        Some("LastUsed") => keys.sort_by(|a, b| b.last_used.cmp(&a.last_used)),
        Some("ApprovalMode") => keys.sort_by(|a, b| a.approval_mode.cmp(&b.approval_mode)),
        Some("UsesRemaining") => keys.sort_by_key(|k| k.uses_remaining),
        Some(other) => return Err(unknown_sort(other)),
    }

    Ok(Json(paginate(keys, params.page, params.per_page, uri.path())))
}

async fn create_key(
    State(db): State<Db>,
    Path(org): Path<String>,
    Json(input): Json<EnrolmentKeyCreate>,
) -> ApiResult<(StatusCode, Json<EnrolmentKey>)> {
    ensure_choice("type", &input.key_type, KEY_TYPES)?;
    ensure_choice("approvalMode", &input.approval_mode, APPROVAL_MODES)?;
    if input.description.trim().is_empty() {
        return Err(Problem::bad_request(
            "One or more validation errors occurred.",
            "description is required",
        ));
    }

    let mut store = db.write().await;
    let data = store.org_mut(&org)?;
    let now = Utc::now();
    let id = data.allocate_key_id();
    let tags = data.tag_refs(&input.tags, now);
    let mut key = EnrolmentKey {
        summary: KeySummary {
            id,
            created: now,
            last_used: None,
            key_type: input.key_type,
            approval_mode: input.approval_mode,
            status: String::new(),
            is_enabled: true,
            description: input.description,
            uses_remaining: input.uses_remaining,
            enrolled_count: 0,
            unapproved_count: 0,
            disconnected_retention_minutes: input.disconnected_retention_minutes,
            tags,
        },
        key: new_key_secret(),
        ip_constraints: input.ip_constraints,
        notes: input.notes,
    };
    key.refresh_status();
    data.keys.insert(id, key.clone());
    info!(%org, key = id, "enrolment key created");
    Ok((StatusCode::CREATED, Json(key)))
}

async fn get_key(
    State(db): State<Db>,
    Path((org, id)): Path<(String, i32)>,
) -> ApiResult<Json<EnrolmentKey>> {
    let store = db.read().await;
    Ok(Json(store.org(&org)?.key(id)?.clone()))
}

async fn update_key(
    State(db): State<Db>,
    Path((org, id)): Path<(String, i32)>,
    Json(patch): Json<EnrolmentKeyPatch>,
) -> ApiResult<Json<EnrolmentKey>> {
    if let Some(mode) = &patch.approval_mode {
        ensure_choice("approvalMode", mode, APPROVAL_MODES)?;
    }
    let mut store = db.write().await;
    let data = store.org_mut(&org)?;
    data.key_mut(id)?;
    let tags = patch.tags.as_deref().map(|names| data.tag_refs(names, Utc::now()));
    let key = data.key_mut(id)?;
    let summary = &mut key.summary;
    if let Some(description) = patch.description {
        summary.description = description;
    }
    if let Some(enabled) = patch.is_enabled {
        summary.is_enabled = enabled;
    }
    if let Some(mode) = patch.approval_mode {
        summary.approval_mode = mode;
    }
    if let Some(uses) = patch.uses_remaining {
        summary.uses_remaining = uses;
    }
    if let Some(minutes) = patch.disconnected_retention_minutes {
        summary.disconnected_retention_minutes = minutes;
    }
    if let Some(tags) = tags {
        summary.tags = tags;
    }
    if let Some(constraints) = patch.ip_constraints {
        key.ip_constraints = constraints;
    }
    if let Some(notes) = patch.notes {
        key.notes = notes;
    }
    key.refresh_status();
    info!(%org, key = id, "enrolment key updated");
    Ok(Json(key.clone()))
}

async fn set_key_enabled(db: &Db, org: &str, id: i32, enabled: bool) -> ApiResult<EnrolmentKey> {
    let mut store = db.write().await;
    let key = store.org_mut(org)?.key_mut(id)?;
    key.summary.is_enabled = enabled;
    key.refresh_status();
    info!(%org, key = id, enabled, "enrolment key toggled");
    Ok(key.clone())
}

async fn enable_key(
    State(db): State<Db>,
    Path((org, id)): Path<(String, i32)>,
) -> ApiResult<Json<EnrolmentKey>> {
    set_key_enabled(&db, &org, id, true).await.map(Json)
}

async fn disable_key(
    State(db): State<Db>,
    Path((org, id)): Path<(String, i32)>,
) -> ApiResult<Json<EnrolmentKey>> {
    set_key_enabled(&db, &org, id, false).await.map(Json)
}

async fn set_keys_enabled(db: &Db, org: &str, ids: &[i32], enabled: bool) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let data = store.org_mut(org)?;
    let mut modified = 0;
    for id in ids {
        if let Some(key) = data.keys.get_mut(id) {
            key.summary.is_enabled = enabled;
            key.refresh_status();
            modified += 1;
        }
    }
    info!(%org, modified, enabled, "enrolment keys toggled");
    Ok(Json(json!({ "keysModified": modified })))
}

async fn bulk_enable_keys(
    State(db): State<Db>,
    Path(org): Path<String>,
    Json(input): Json<KeyIds>,
) -> ApiResult<Json<Value>> {
    set_keys_enabled(&db, &org, &input.key_ids, true).await
}

async fn bulk_disable_keys(
    State(db): State<Db>,
    Path(org): Path<String>,
    Json(input): Json<KeyIds>,
) -> ApiResult<Json<Value>> {
    set_keys_enabled(&db, &org, &input.key_ids, false).await
}

// ---------------------------------------------------------------------------
// Unapproved systems
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SystemListParams {
    enrolment_key: Option<i32>,
    search: Option<String>,
    sort: Option<String>,
    page: Option<i32>,
    per_page: Option<i32>,
}

async fn list_unapproved(
    State(db): State<Db>,
    Path(org): Path<String>,
    Query(params): Query<SystemListParams>,
    uri: Uri,
) -> ApiResult<Json<Paginated<SystemSummary>>> {
    let store = db.read().await;
    let data = store.org(&org)?;
    let search = params.search.as_deref().map(str::to_lowercase);

    let mut systems: Vec<&UnapprovedSystem> = data
        .unapproved
        .values()
        .filter(|s| params.enrolment_key.map_or(true, |k| s.summary.enrolment_key_id == k))
        .filter(|s| match &search {
            Some(term) => [
                Some(&s.summary.system_id),
                s.summary.machine_name.as_ref(),
                s.description.as_ref(),
            ]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(term)),
            None => true,
        })
        .collect();

    match params.sort.as_deref() {
        None | Some("RecentlyEnrolled") => {
            systems.sort_by(|a, b| b.summary.enrolled_at.cmp(&a.summary.enrolled_at))
        }
        Some("Hostname") => systems.sort_by(|a, b| a.summary.machine_name.cmp(&b.summary.machine_name)),
        Some("Description") => systems.sort_by(|a, b| a.description.cmp(&b.description)),
        Some("EnrolmentKey") => systems.sort_by_key(|s| s.summary.enrolment_key_id),
        Some(other) => return Err(unknown_sort(other)),
    }

    let summaries = systems.into_iter().map(|s| s.summary.clone()).collect();
    Ok(Json(paginate(summaries, params.page, params.per_page, uri.path())))
}

async fn get_unapproved(
    State(db): State<Db>,
    Path((org, id)): Path<(String, String)>,
) -> ApiResult<Json<UnapprovedSystem>> {
    let store = db.read().await;
    Ok(Json(store.org(&org)?.unapproved(&id)?.clone()))
}

async fn update_unapproved(
    State(db): State<Db>,
    Path((org, id)): Path<(String, String)>,
    Json(patch): Json<UnapprovedSystemPatch>,
) -> ApiResult<Json<UnapprovedSystem>> {
    let mut store = db.write().await;
    let data = store.org_mut(&org)?;
    data.unapproved_mut(&id)?;
    let tags = patch.tags.as_deref().map(|names| data.tag_refs(names, Utc::now()));
    let system = data.unapproved_mut(&id)?;
    if let Some(description) = patch.description {
        system.description = description;
    }
    if let Some(notes) = patch.notes {
        system.notes = notes;
    }
    if let Some(tags) = tags {
        system.summary.tags = tags;
    }
    info!(%org, system = %id, "unapproved system updated");
    Ok(Json(system.clone()))
}

async fn decline_system(
    State(db): State<Db>,
    Path((org, id)): Path<(String, String)>,
) -> ApiResult<Json<UnapprovedSystem>> {
    let mut store = db.write().await;
    let system = store.org_mut(&org)?.decline(&id)?;
    info!(%org, system = %id, "unapproved system declined");
    Ok(Json(system))
}

async fn decline_systems(
    State(db): State<Db>,
    Path(org): Path<String>,
    Json(input): Json<SystemIds>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let data = store.org_mut(&org)?;
    let declined = input
        .system_ids
        .iter()
        .filter(|id| data.decline(id).is_ok())
        .count();
    info!(%org, declined, "unapproved systems declined");
    Ok(Json(json!({ "systemsDeclined": declined })))
}

async fn approve_system(
    State(db): State<Db>,
    Path((org, id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store.org_mut(&org)?.approve(&id)?;
    info!(%org, system = %id, "unapproved system approved");
    Ok(StatusCode::NO_CONTENT)
}

async fn approve_systems(
    State(db): State<Db>,
    Path(org): Path<String>,
    Json(input): Json<SystemIds>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let data = store.org_mut(&org)?;
    let approved = input
        .system_ids
        .iter()
        .filter(|id| data.approve(id).is_ok())
        .count();
    info!(%org, approved, "unapproved systems approved");
    Ok(Json(json!({ "systemsApproved": approved })))
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TagListParams {
    search: Option<String>,
    sort: Option<String>,
    page: Option<i32>,
    per_page: Option<i32>,
}

async fn list_tags(
    State(db): State<Db>,
    Path(org): Path<String>,
    Query(params): Query<TagListParams>,
    uri: Uri,
) -> ApiResult<Json<Paginated<model::BasicTag>>> {
    let store = db.read().await;
    let mut tags = store.org(&org)?.basic_tags();
    if let Some(term) = params.search.as_deref().map(str::to_lowercase) {
        tags.retain(|t| t.tag.to_lowercase().contains(&term));
    }
    match params.sort.as_deref() {
        None | Some("Alphabetical") => tags.sort_by(|a, b| a.tag.cmp(&b.tag)),
        Some("RecentlyUsed") => tags.sort_by(|a, b| b.last_referenced.cmp(&a.last_referenced)),
        Some("ReferencedCount") => tags.sort_by_key(|t| std::cmp::Reverse(t.keys + t.systems)),
        Some(other) => return Err(unknown_sort(other)),
    }
    Ok(Json(paginate(tags, params.page, params.per_page, uri.path())))
}

// ---------------------------------------------------------------------------
// DNS zones
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PageParams {
    page: Option<i32>,
    per_page: Option<i32>,
}

async fn list_zones(
    State(db): State<Db>,
    Path(org): Path<String>,
    Query(params): Query<PageParams>,
    uri: Uri,
) -> ApiResult<Json<Paginated<DnsZoneSummary>>> {
    let store = db.read().await;
    let zones = store.org(&org)?.zones.values().map(DnsZoneSummary::from).collect();
    Ok(Json(paginate(zones, params.page, params.per_page, uri.path())))
}

async fn create_zone(
    State(db): State<Db>,
    Path(org): Path<String>,
    Json(input): Json<DnsZoneCreate>,
) -> ApiResult<(StatusCode, Json<DnsZone>)> {
    if input.name.trim().is_empty() {
        return Err(Problem::bad_request(
            "One or more validation errors occurred.",
            "name is required",
        ));
    }
    let mut store = db.write().await;
    let data = store.org_mut(&org)?;
    let id = data.allocate_zone_id();
    let zone = DnsZone {
        id,
        name: input.name,
        created: Utc::now(),
        notes: input.notes,
        record_count: 0,
    };
    data.zones.insert(id, zone.clone());
    info!(%org, zone = id, "DNS zone created");
    Ok((StatusCode::CREATED, Json(zone)))
}

async fn get_zone(
    State(db): State<Db>,
    Path((org, id)): Path<(String, i32)>,
) -> ApiResult<Json<DnsZone>> {
    let store = db.read().await;
    Ok(Json(store.org(&org)?.zone(id)?.clone()))
}

async fn update_zone(
    State(db): State<Db>,
    Path((org, id)): Path<(String, i32)>,
    Json(patch): Json<DnsZonePatch>,
) -> ApiResult<Json<DnsZone>> {
    let mut store = db.write().await;
    let zone = store.org_mut(&org)?.zone_mut(id)?;
    if let Some(name) = patch.name {
        zone.name = name;
    }
    if let Some(notes) = patch.notes {
        zone.notes = notes;
    }
    info!(%org, zone = id, "DNS zone updated");
    Ok(Json(zone.clone()))
}

async fn delete_zone(
    State(db): State<Db>,
    Path((org, id)): Path<(String, i32)>,
) -> ApiResult<Json<DnsZone>> {
    let mut store = db.write().await;
    let zone = store
        .org_mut(&org)?
        .zones
        .remove(&id)
        .ok_or_else(|| Problem::not_found(format!("DNS zone {id} does not exist")))?;
    info!(%org, zone = id, "DNS zone deleted");
    Ok(Json(zone))
}

fn unknown_sort(value: &str) -> Problem {
    Problem::bad_request("Invalid sort order", format!("unknown sort order {value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_list_params_accept_lowercase_bools() {
        let params: KeyListParams =
            serde_json::from_value(json!({ "include_disabled": true, "page": 1 })).unwrap();
        assert_eq!(params.include_disabled, Some(true));
        assert_eq!(params.page, Some(1));
        assert!(params.sort.is_none());
    }

    #[test]
    fn unknown_sort_is_bad_request() {
        let problem = unknown_sort("Sideways");
        assert_eq!(problem.status, StatusCode::BAD_REQUEST);
        assert_eq!(problem.detail.as_deref(), Some(r#"unknown sort order "Sideways""#));
    }
}
