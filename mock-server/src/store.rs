//! In-memory state behind the mock API.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::model::{
    AccountOrganisation, BasicTag, DnsZone, EnrolmentKey, KeySummary, Organisation, SystemSummary,
    TagReference, UnapprovedSystem,
};
use crate::problem::Problem;

pub const SEED_ORG_ID: &str = "OrgA1b2C3";
pub const SEED_ORG_NAME: &str = "Acme Networks";
/// Manual-approval key the seeded unapproved systems enrolled with.
pub const SEED_KEY_ID: i32 = 1;
pub const SEED_SYSTEM_IDS: [&str; 3] = ["Ab3xZ", "Qq7Rt", "Zz9Kp"];
pub const SEED_ZONE_ID: i32 = 1;

pub const DEFAULT_PER_PAGE: i32 = 50;
pub const MAX_PER_PAGE: i32 = 1000;

#[derive(Debug, Clone)]
struct TagEntry {
    ref_id: String,
    colour: Option<String>,
    last_referenced: Option<DateTime<Utc>>,
}

/// Everything stored for one organisation.
#[derive(Debug, Clone)]
pub struct OrgData {
    pub org: Organisation,
    pub role: String,
    pub keys: BTreeMap<i32, EnrolmentKey>,
    pub unapproved: BTreeMap<String, UnapprovedSystem>,
    /// Approved systems and the tag names they carry.
    pub enrolled: BTreeMap<String, Vec<String>>,
    pub zones: BTreeMap<i32, DnsZone>,
    tags: BTreeMap<String, TagEntry>,
    next_key_id: i32,
    next_zone_id: i32,
}

impl OrgData {
    pub fn new(org: Organisation, role: &str) -> Self {
        Self {
            org,
            role: role.to_string(),
            keys: BTreeMap::new(),
            unapproved: BTreeMap::new(),
            enrolled: BTreeMap::new(),
            zones: BTreeMap::new(),
            tags: BTreeMap::new(),
            next_key_id: 1,
            next_zone_id: 1,
        }
    }

    pub fn allocate_key_id(&mut self) -> i32 {
        let id = self.next_key_id;
        self.next_key_id += 1;
        id
    }

    pub fn allocate_zone_id(&mut self) -> i32 {
        let id = self.next_zone_id;
        self.next_zone_id += 1;
        id
    }

    pub fn key(&self, id: i32) -> Result<&EnrolmentKey, Problem> {
        self.keys
            .get(&id)
            .ok_or_else(|| Problem::not_found(format!("enrolment key {id} does not exist")))
    }

    pub fn key_mut(&mut self, id: i32) -> Result<&mut EnrolmentKey, Problem> {
        self.keys
            .get_mut(&id)
            .ok_or_else(|| Problem::not_found(format!("enrolment key {id} does not exist")))
    }

    pub fn unapproved(&self, id: &str) -> Result<&UnapprovedSystem, Problem> {
        self.unapproved
            .get(id)
            .ok_or_else(|| Problem::not_found(format!("unapproved system {id} does not exist")))
    }

    pub fn unapproved_mut(&mut self, id: &str) -> Result<&mut UnapprovedSystem, Problem> {
        self.unapproved
            .get_mut(id)
            .ok_or_else(|| Problem::not_found(format!("unapproved system {id} does not exist")))
    }

    pub fn zone(&self, id: i32) -> Result<&DnsZone, Problem> {
        self.zones
            .get(&id)
            .ok_or_else(|| Problem::not_found(format!("DNS zone {id} does not exist")))
    }

    pub fn zone_mut(&mut self, id: i32) -> Result<&mut DnsZone, Problem> {
        self.zones
            .get_mut(&id)
            .ok_or_else(|| Problem::not_found(format!("DNS zone {id} does not exist")))
    }

    /// Resolve tag names to references, registering unknown tags.
    pub fn tag_refs(&mut self, names: &[String], now: DateTime<Utc>) -> Vec<TagReference> {
        names
            .iter()
            .map(|name| {
                let entry = self.tags.entry(name.clone()).or_insert_with(|| TagEntry {
                    ref_id: Uuid::new_v4().simple().to_string(),
                    colour: None,
                    last_referenced: None,
                });
                entry.last_referenced = Some(now);
                TagReference {
                    tag: name.clone(),
                    ref_id: entry.ref_id.clone(),
                    colour: entry.colour.clone(),
                }
            })
            .collect()
    }

    /// Tags with usage counts derived from keys and systems.
    pub fn basic_tags(&self) -> Vec<BasicTag> {
        let uses = |tags: &[TagReference], name: &str| tags.iter().any(|t| t.tag == name);
        self.tags
            .iter()
            .map(|(name, entry)| {
                let keys = self
                    .keys
                    .values()
                    .filter(|k| uses(&k.summary.tags, name))
                    .count();
                let systems = self
                    .unapproved
                    .values()
                    .filter(|s| uses(&s.summary.tags, name))
                    .count()
                    + self
                        .enrolled
                        .values()
                        .filter(|tags| tags.iter().any(|t| t == name))
                        .count();
                BasicTag {
                    tag: name.clone(),
                    ref_id: entry.ref_id.clone(),
                    colour: entry.colour.clone(),
                    last_referenced: entry.last_referenced,
                    systems: systems as i32,
                    keys: keys as i32,
                    policies: 0,
                    dns_records: 0,
                }
            })
            .collect()
    }

    /// Approve one system: it leaves the unapproved list and counts as
    /// enrolled on its key.
    pub fn approve(&mut self, id: &str) -> Result<(), Problem> {
        let system = self
            .unapproved
            .remove(id)
            .ok_or_else(|| Problem::not_found(format!("unapproved system {id} does not exist")))?;
        if let Some(key) = self.keys.get_mut(&system.summary.enrolment_key_id) {
            key.summary.unapproved_count -= 1;
            key.summary.enrolled_count += 1;
        }
        let tags = system.summary.tags.into_iter().map(|t| t.tag).collect();
        self.enrolled.insert(system.summary.system_id, tags);
        Ok(())
    }

    /// Decline one system, returning it as it was.
    pub fn decline(&mut self, id: &str) -> Result<UnapprovedSystem, Problem> {
        let system = self
            .unapproved
            .remove(id)
            .ok_or_else(|| Problem::not_found(format!("unapproved system {id} does not exist")))?;
        if let Some(key) = self.keys.get_mut(&system.summary.enrolment_key_id) {
            key.summary.unapproved_count -= 1;
        }
        Ok(system)
    }
}

/// All organisations known to the mock, keyed by ID.
#[derive(Debug, Clone, Default)]
pub struct Store {
    orgs: BTreeMap<String, OrgData>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// One organisation with a manual-approval key, three systems waiting
    /// for approval through it, and one DNS zone.
    pub fn seeded() -> Self {
        let now = Utc::now();
        let mut data = OrgData::new(
            Organisation {
                id: SEED_ORG_ID.to_string(),
                created: now - Duration::days(90),
                name: SEED_ORG_NAME.to_string(),
                plan: "Pro".to_string(),
                website: Some("https://acme.test".to_string()),
                email: Some("ops@acme.test".to_string()),
                phone: None,
                max_systems: 100,
            },
            "Owner",
        );

        let key_id = data.allocate_key_id();
        let key_tags = data.tag_refs(&["ci".to_string()], now);
        let mut key = EnrolmentKey {
            summary: KeySummary {
                id: key_id,
                created: now - Duration::days(30),
                last_used: Some(now - Duration::minutes(5)),
                key_type: "GeneralPurpose".to_string(),
                approval_mode: "Manual".to_string(),
                status: String::new(),
                is_enabled: true,
                description: "Build agents".to_string(),
                uses_remaining: -1,
                enrolled_count: 0,
                unapproved_count: SEED_SYSTEM_IDS.len() as i32,
                disconnected_retention_minutes: None,
                tags: key_tags.clone(),
            },
            key: new_key_secret(),
            ip_constraints: Vec::new(),
            notes: None,
        };
        key.refresh_status();

        for (i, system_id) in SEED_SYSTEM_IDS.iter().enumerate() {
            let system = UnapprovedSystem {
                summary: SystemSummary {
                    system_id: system_id.to_string(),
                    system_type: "GeneralPurpose".to_string(),
                    machine_name: Some(format!("build-{:02}", i + 1)),
                    enrolled_at: now - Duration::minutes(10 * (i as i64 + 1)),
                    enrolment_key_id: key_id,
                    enrolment_key_description: Some(key.summary.description.clone()),
                    os_type: Some("Linux".to_string()),
                    os_version: Some("6.1".to_string()),
                    enclave_version: Some("2024.3.0".to_string()),
                    tags: key_tags.clone(),
                },
                description: None,
                notes: None,
                connected_from: Some(format!("198.51.100.{}", i + 10)),
            };
            data.unapproved.insert(system_id.to_string(), system);
        }
        data.keys.insert(key_id, key);

        let zone_id = data.allocate_zone_id();
        data.zones.insert(
            zone_id,
            DnsZone {
                id: zone_id,
                name: "acme.internal".to_string(),
                created: now - Duration::days(60),
                notes: None,
                record_count: 0,
            },
        );

        let mut store = Self::new();
        store.orgs.insert(SEED_ORG_ID.to_string(), data);
        store
    }

    pub fn insert_org(&mut self, data: OrgData) {
        self.orgs.insert(data.org.id.clone(), data);
    }

    pub fn account_orgs(&self) -> Vec<AccountOrganisation> {
        self.orgs
            .values()
            .map(|data| AccountOrganisation {
                org_id: data.org.id.clone(),
                org_name: data.org.name.clone(),
                role: data.role.clone(),
            })
            .collect()
    }

    pub fn org(&self, id: &str) -> Result<&OrgData, Problem> {
        self.orgs
            .get(id)
            .ok_or_else(|| Problem::not_found(format!("organisation {id} does not exist")))
    }

    pub fn org_mut(&mut self, id: &str) -> Result<&mut OrgData, Problem> {
        self.orgs
            .get_mut(id)
            .ok_or_else(|| Problem::not_found(format!("organisation {id} does not exist")))
    }
}

/// Random secret handed out for new enrolment keys.
pub fn new_key_secret() -> String {
    Uuid::new_v4().simple().to_string().to_uppercase()
}

/// Zero-based page envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub metadata: Metadata,
    pub links: Links,
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub total: i32,
    pub first_page: i32,
    pub prev_page: Option<i32>,
    pub next_page: Option<i32>,
    pub last_page: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Links {
    pub first: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub last: Option<String>,
}

/// Slice `items` into the requested page. `path` is used to build links.
///
/// `per_page` is clamped to `1..=MAX_PER_PAGE`. A page past the end yields no
/// items.
pub fn paginate<T>(items: Vec<T>, page: Option<i32>, per_page: Option<i32>, path: &str) -> Paginated<T> {
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    let page = page.unwrap_or(0).max(0);
    let total = i32::try_from(items.len()).unwrap_or(i32::MAX);
    let last_page = (total - 1).max(0) / per_page;

    let link = |n: i32| format!("{path}?page={n}&per_page={per_page}");
    let prev_page = (page > 0).then(|| (page - 1).min(last_page));
    let next_page = (page < last_page).then_some(page + 1);

    let offset = (page as usize).saturating_mul(per_page as usize);
    let items = items
        .into_iter()
        .skip(offset)
        .take(per_page as usize)
        .collect();

    Paginated {
        metadata: Metadata {
            total,
            first_page: 0,
            prev_page,
            next_page,
            last_page,
        },
        links: Links {
            first: Some(link(0)),
            prev: prev_page.map(link),
            next: next_page.map(link),
            last: Some(link(last_page)),
        },
        items,
    }
}
