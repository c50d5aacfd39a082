//! In-process [`UserStore`] for tests
//!
//! Mirrors the Postgres engine's observable behaviour: positive, never
//! reused ids; unique emails; the same input guards; `updated_at` refreshed
//! on every successful update.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::db::error::StoreError;
use crate::db::store::{check_id, check_page, UserStore};
use crate::models::pagination::offset;
use crate::models::{User, UserCreate, UserPage, UserUpdate};

#[derive(Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, User>,
}

impl Table {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    table: Mutex<Table>,
    calls: AtomicUsize,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of operations that got past input validation and touched the table.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Insert users directly, returning their ids.
    pub async fn seed(&self, users: &[UserCreate]) -> Vec<i64> {
        let mut ids = Vec::with_capacity(users.len());
        for user in users {
            if let Ok(id) = self.create_user(user).await {
                ids.push(id);
            }
        }
        ids
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, user: &UserCreate) -> Result<i64, StoreError> {
        self.touch();
        let mut table = self.table.lock().await;
        if table.email_taken(&user.email, None) {
            return Err(StoreError::DuplicateEmail);
        }

        table.last_id += 1;
        let id = table.last_id;
        let now = Utc::now();
        table.rows.insert(
            id,
            User {
                id,
                email: user.email.clone(),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn get_user_by_id(&self, id: i64) -> Result<User, StoreError> {
        check_id(id)?;
        self.touch();
        let table = self.table.lock().await;
        table.rows.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<(), StoreError> {
        check_id(id)?;
        self.touch();
        let mut table = self.table.lock().await;
        if !table.rows.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if let Some(email) = &update.email {
            if table.email_taken(email, Some(id)) {
                return Err(StoreError::DuplicateEmail);
            }
        }

        let row = table.rows.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(email) = &update.email {
            row.email = email.clone();
        }
        if let Some(first_name) = &update.first_name {
            row.first_name = first_name.clone();
        }
        if let Some(last_name) = &update.last_name {
            row.last_name = last_name.clone();
        }
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_user(&self, id: i64) -> Result<(), StoreError> {
        check_id(id)?;
        self.touch();
        let mut table = self.table.lock().await;
        table.rows.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn list_users(&self, page: i64, page_size: i64) -> Result<UserPage, StoreError> {
        check_page(page, page_size)?;
        self.touch();
        let table = self.table.lock().await;

        let skip = usize::try_from(offset(page, page_size)).unwrap_or(usize::MAX);
        let take = usize::try_from(page_size).unwrap_or(0);
        let users = table.rows.values().skip(skip).take(take).cloned().collect();
        let total = i64::try_from(table.rows.len()).unwrap_or(i64::MAX);

        Ok(UserPage { users, total })
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(n: usize) -> UserCreate {
        UserCreate {
            email: format!("user{n}@example.com"),
            first_name: "Test".into(),
            last_name: format!("User{n}"),
        }
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryUserStore::new();
        let first = store.create_user(&user(1)).await.unwrap();
        store.delete_user(first).await.unwrap();
        let second = store.create_user(&user(1)).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn guards_run_before_touching_the_table() {
        let store = MemoryUserStore::new();
        assert!(matches!(store.get_user_by_id(0).await, Err(StoreError::InvalidId)));
        assert!(matches!(store.list_users(1, 101).await, Err(StoreError::InvalidPageSize)));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn huge_page_is_empty_slice() {
        let store = MemoryUserStore::new();
        store.seed(&[user(1), user(2), user(3)]).await;

        let page = store.list_users(i64::MAX, 100).await.unwrap();
        assert!(page.users.is_empty());
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn update_to_own_email_is_allowed() {
        let store = MemoryUserStore::new();
        let id = store.create_user(&user(1)).await.unwrap();
        let update = UserUpdate {
            email: Some("user1@example.com".into()),
            ..Default::default()
        };
        store.update_user(id, &update).await.unwrap();
    }
}
