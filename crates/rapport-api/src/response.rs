//! The success envelope and pagination metadata.

use serde::Serialize;
use serde_json::{json, Value};

use rapport_store::{Page, Paged};

/// `{"success": true, "data": ..}`
pub fn success<T: Serialize>(data: &T) -> Value {
    json!({ "success": true, "data": data })
}

/// `{"success": true, "message": .., "data": ..}`
pub fn success_message<T: Serialize>(message: &str, data: &T) -> Value {
    json!({ "success": true, "message": message, "data": data })
}

/// `{"success": true, "message": ..}`
pub fn message_only(message: &str) -> Value {
    json!({ "success": true, "message": message })
}

/// Pagination block rendered alongside paged listings.
#[derive(Debug, Serialize)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,
    /// Records per page.
    pub limit: u32,
    /// Total matching records.
    pub total: usize,
    /// Total pages.
    pub pages: u32,
}

impl Pagination {
    /// Builds the block for one page of results.
    pub fn for_page<T>(page: Page, paged: &Paged<T>) -> Self {
        Self {
            page: page.page,
            limit: page.limit,
            total: paged.total,
            pages: page.pages_for(paged.total),
        }
    }
}

/// A paged listing under a named key:
/// `{"success": true, "data": {"<key>": [..], "pagination": {..}}}`
pub fn paged_success<T: Serialize>(key: &str, items: &[T], pagination: &Pagination) -> Value {
    json!({
        "success": true,
        "data": {
            key: items,
            "pagination": pagination,
        }
    })
}
