//! Shared response envelope types for API handlers.
//!
//! Single items use `{ "data": ... }`; paginated lists add `total`, `limit`
//! and `offset` next to `data`.

use serde::Serialize;
use soundstage_db::Paged;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// `{ "data": [T], "total", "limit", "offset" }` envelope for list endpoints.
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub data: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T: Serialize> From<Paged<T>> for ListResponse<T> {
    fn from(paged: Paged<T>) -> Self {
        Self {
            data: paged.items,
            total: paged.total,
            limit: paged.limit,
            offset: paged.offset,
        }
    }
}
