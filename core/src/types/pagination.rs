//! Paging envelope shared by every list endpoint.

use serde::{Deserialize, Serialize};

/// One page of `T` plus navigation metadata. Pages are zero-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub metadata: PaginationMetadata,
    pub links: PaginationLinks,
    pub items: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    pub fn has_next(&self) -> bool {
        self.metadata.next_page.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub total: i32,
    pub first_page: i32,
    pub prev_page: Option<i32>,
    pub next_page: Option<i32>,
    pub last_page: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationLinks {
    pub first: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub last: Option<String>,
}
