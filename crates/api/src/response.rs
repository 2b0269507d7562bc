//! Shared response envelope types for API handlers.
//!
//! Single values use `{ "data": ... }`; lists add a `meta` object with the
//! pagination figures.

use bedwatch_core::query::PageRequest;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: status }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": [...], "meta": M }` envelope for paginated lists.
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize, M: Serialize = PageMeta> {
    pub data: Vec<T>,
    pub meta: M,
}

/// Pagination figures of a list response.
///
/// `total` is the number of matching items before pagination.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl PageMeta {
    pub fn new(total: i64, page: PageRequest) -> Self {
        Self {
            total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}
