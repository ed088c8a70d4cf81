//! Pagination, owner scoping, and list filters.

use rapport_core::UserId;

/// A page request. Pages are 1-based; limits are clamped by the API
/// layer before they reach the store.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    /// 1-based page number.
    pub page: u32,
    /// Records per page.
    pub limit: u32,
}

impl Page {
    /// First page with the given limit.
    pub fn first(limit: u32) -> Self {
        Self { page: 1, limit }
    }

    /// The number of records to skip.
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.limit as usize
    }

    /// Total page count for `total` records.
    pub fn pages_for(&self, total: usize) -> u32 {
        if self.limit == 0 {
            return 0;
        }
        total.div_ceil(self.limit as usize) as u32
    }
}

/// One page of results plus the total match count.
#[derive(Debug, Clone)]
pub struct Paged<T> {
    /// The records on this page.
    pub items: Vec<T>,
    /// Total records matching the query, across all pages.
    pub total: usize,
}

/// Which records a list query may see.
///
/// Non-admin actors see only records they own; admins see everything.
#[derive(Debug, Clone, Copy)]
pub enum OwnerScope {
    /// No owner restriction (Admin).
    All,
    /// Only records owned by this user.
    Owned(UserId),
}

impl OwnerScope {
    /// Whether a record owned by `owner` is visible in this scope.
    pub fn allows(&self, owner: UserId) -> bool {
        match self {
            OwnerScope::All => true,
            OwnerScope::Owned(user) => *user == owner,
        }
    }
}

/// Filters for contact listings.
#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
    /// Case-insensitive substring over name, email, and company.
    pub search: Option<String>,
    /// Exact status match.
    pub status: Option<String>,
}

/// Filters for deal listings.
#[derive(Debug, Clone, Default)]
pub struct DealFilter {
    /// Exact stage match.
    pub stage: Option<String>,
    /// Exact priority match.
    pub priority: Option<String>,
}

/// Filters for task listings.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Exact status match.
    pub status: Option<String>,
    /// Exact priority match.
    pub priority: Option<String>,
}

/// Filters for activity listings.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    /// Exact activity-kind match.
    pub kind: Option<String>,
    /// Only activities by this user.
    pub user_id: Option<UserId>,
}

/// Filters for audit log listings.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Only entries by this user.
    pub user_id: Option<UserId>,
    /// Exact action match.
    pub action: Option<String>,
    /// Exact resource-type match.
    pub resource_type: Option<String>,
}
