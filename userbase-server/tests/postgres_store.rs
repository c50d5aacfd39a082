//! Storage engine against a live PostgreSQL
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p userbase-server -- --ignored

use once_cell::sync::Lazy;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::{Mutex, MutexGuard};

use userbase_server::db::migrations;
use userbase_server::models::{UserCreate, UserUpdate};
use userbase_server::{PgUserStore, StoreError, UserStore};

// Tests share one table; run them one at a time.
static DB_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

async fn fresh_store() -> (PgUserStore, MutexGuard<'static, ()>) {
    let guard = DB_LOCK.lock().await;
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&url)
        .await
        .expect("failed to connect");

    migrations::run_up(&pool).await.expect("migrations failed");
    sqlx::query("TRUNCATE users RESTART IDENTITY")
        .execute(&pool)
        .await
        .expect("truncate failed");

    (PgUserStore::new(pool), guard)
}

fn user(n: usize) -> UserCreate {
    UserCreate {
        email: format!("user{n}@example.com"),
        first_name: "Test".into(),
        last_name: format!("User{n}"),
    }
}

async fn row_count(store: &PgUserStore) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(store.pool())
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "requires database"]
async fn create_and_get() {
    let (store, _guard) = fresh_store().await;

    let id = store.create_user(&user(1)).await.unwrap();
    assert!(id > 0);

    let fetched = store.get_user_by_id(id).await.unwrap();
    assert_eq!(fetched.id, id);
    assert_eq!(fetched.email, "user1@example.com");
    assert_eq!(fetched.created_at, fetched.updated_at);
}

#[tokio::test]
#[ignore = "requires database"]
async fn duplicate_email_leaves_no_partial_row() {
    let (store, _guard) = fresh_store().await;

    store.create_user(&user(1)).await.unwrap();
    let err = store.create_user(&user(1)).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateEmail));
    assert_eq!(row_count(&store).await, 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn get_missing_is_not_found() {
    let (store, _guard) = fresh_store().await;
    let err = store.get_user_by_id(999).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
#[ignore = "requires database"]
async fn empty_update_refreshes_updated_at() {
    let (store, _guard) = fresh_store().await;
    let id = store.create_user(&user(1)).await.unwrap();
    let before = store.get_user_by_id(id).await.unwrap();

    // NOW() is the transaction start time; make sure it moves.
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    store.update_user(id, &UserUpdate::default()).await.unwrap();

    let after = store.get_user_by_id(id).await.unwrap();
    assert_eq!(after.email, before.email);
    assert_eq!(after.first_name, before.first_name);
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);

    let err = store
        .update_user(999, &UserUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_into_taken_email_conflicts() {
    let (store, _guard) = fresh_store().await;
    let first = store.create_user(&user(1)).await.unwrap();
    store.create_user(&user(2)).await.unwrap();

    let update = UserUpdate {
        email: Some("user2@example.com".into()),
        ..Default::default()
    };
    let err = store.update_user(first, &update).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateEmail));

    let unchanged = store.get_user_by_id(first).await.unwrap();
    assert_eq!(unchanged.email, "user1@example.com");
}

#[tokio::test]
#[ignore = "requires database"]
async fn delete_twice() {
    let (store, _guard) = fresh_store().await;
    let id = store.create_user(&user(1)).await.unwrap();

    store.delete_user(id).await.unwrap();
    assert!(matches!(
        store.get_user_by_id(id).await,
        Err(StoreError::NotFound)
    ));
    assert!(matches!(
        store.delete_user(id).await,
        Err(StoreError::NotFound)
    ));
}

#[tokio::test]
#[ignore = "requires database"]
async fn list_orders_by_id() {
    let (store, _guard) = fresh_store().await;
    let a = store.create_user(&user(1)).await.unwrap();
    let b = store.create_user(&user(2)).await.unwrap();

    let page = store.list_users(1, 10).await.unwrap();
    assert_eq!(page.total, 2);
    let ids: Vec<i64> = page.users.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![a, b]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn list_second_page() {
    let (store, _guard) = fresh_store().await;
    let mut ids = Vec::new();
    for n in 1..=20 {
        ids.push(store.create_user(&user(n)).await.unwrap());
    }

    let page = store.list_users(2, 5).await.unwrap();
    assert_eq!(page.total, 20);
    let listed: Vec<i64> = page.users.iter().map(|u| u.id).collect();
    assert_eq!(listed, ids[5..10].to_vec());

    let past_end = store.list_users(9, 5).await.unwrap();
    assert!(past_end.users.is_empty());
    assert_eq!(past_end.total, 20);

    let far_end = store.list_users(i64::MAX, 100).await.unwrap();
    assert!(far_end.users.is_empty());
    assert_eq!(far_end.total, 20);
}

#[tokio::test]
#[ignore = "requires database"]
async fn migrations_roll_back_to_zero() {
    let (store, _guard) = fresh_store().await;

    migrations::run_down(store.pool(), 0).await.unwrap();
    let exists: bool = sqlx::query_scalar("SELECT to_regclass('public.users') IS NOT NULL")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert!(!exists);

    migrations::run_up(store.pool()).await.unwrap();
}
