//! Pagination types for user listing

use serde::{Deserialize, Serialize};

use super::{User, UserResponse};

/// Maximum rows per page
pub const MAX_PAGE_SIZE: i64 = 100;

/// Page size used when the client doesn't ask for one
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// One page of users plus the total row count, as read from storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPage {
    /// Rows for the requested page, ascending by id
    pub users: Vec<User>,
    /// Count of all rows, taken in the same transaction as `users`
    pub total: i64,
}

/// Query parameters for `GET /users`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PaginationParams {
    /// Requested page, 1 when absent. Out-of-range values pass through.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    /// Requested page size, [`DEFAULT_PAGE_SIZE`] when absent.
    pub fn page_size(&self) -> i64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

/// Paginated listing as sent to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedUsers {
    pub users: Vec<UserResponse>,
    pub total_count: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl PaginatedUsers {
    pub fn new(result: UserPage, page: i64, page_size: i64) -> Self {
        Self {
            users: result.users.into_iter().map(UserResponse::from).collect(),
            total_count: result.total,
            page,
            page_size,
            total_pages: total_pages(result.total, page_size),
        }
    }
}

/// Number of pages needed for `total` rows, never less than 1.
///
/// A trailing partial page counts as a page.
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        return 1;
    }
    ((total + page_size - 1) / page_size).max(1)
}

/// SQL OFFSET for a validated 1-indexed page.
///
/// Saturates at `i64::MAX`, which lies past any real table and reads as an
/// empty page.
pub fn offset(page: i64, page_size: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(page_size)
}
