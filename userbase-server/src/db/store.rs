//! Storage contract shared by every backend

use async_trait::async_trait;

use super::error::StoreError;
use crate::models::{User, UserCreate, UserPage, UserUpdate, MAX_PAGE_SIZE};

/// Operations any user storage backend must support.
///
/// Futures are cancel-safe: dropping one aborts the in-flight backend call.
/// Callers bound each call with their own deadline; backends never retry.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a validated user and return its new id.
    async fn create_user(&self, user: &UserCreate) -> Result<i64, StoreError>;

    async fn get_user_by_id(&self, id: i64) -> Result<User, StoreError>;

    /// Apply the supplied fields and refresh `updated_at`, even when no field is supplied.
    async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<(), StoreError>;

    async fn delete_user(&self, id: i64) -> Result<(), StoreError>;

    /// One page of users ordered by ascending id, with the total row count.
    async fn list_users(&self, page: i64, page_size: i64) -> Result<UserPage, StoreError>;

    /// Release backend resources.
    async fn close(&self);
}

/// Reject non-positive ids before touching the backend.
pub fn check_id(id: i64) -> Result<(), StoreError> {
    if id <= 0 {
        return Err(StoreError::InvalidId);
    }
    Ok(())
}

/// Reject out-of-range pagination before touching the backend.
pub fn check_page(page: i64, page_size: i64) -> Result<(), StoreError> {
    if page < 1 {
        return Err(StoreError::InvalidPage);
    }
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(StoreError::InvalidPageSize);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive() {
        assert!(check_id(1).is_ok());
        assert!(matches!(check_id(0), Err(StoreError::InvalidId)));
        assert!(matches!(check_id(-7), Err(StoreError::InvalidId)));
    }

    #[test]
    fn page_bounds() {
        assert!(check_page(1, 1).is_ok());
        assert!(check_page(3, 100).is_ok());
        assert!(matches!(check_page(0, 10), Err(StoreError::InvalidPage)));
        assert!(matches!(check_page(-1, 10), Err(StoreError::InvalidPage)));
        assert!(matches!(check_page(1, 0), Err(StoreError::InvalidPageSize)));
        assert!(matches!(check_page(1, 101), Err(StoreError::InvalidPageSize)));
    }

    #[test]
    fn page_checked_before_page_size() {
        assert!(matches!(check_page(0, 0), Err(StoreError::InvalidPage)));
    }
}
