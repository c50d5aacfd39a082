//! User repository backed by PostgreSQL
//!
//! - create: INSERT ... RETURNING id (one round trip, no "last insert id" query)
//! - update: statement built from the supplied columns only
//! - list: COUNT + page slice inside one read-only transaction
//! - every backend error goes through `handle_error`

use async_trait::async_trait;
use futures::future::BoxFuture;
use sqlx::{PgConnection, PgPool};

use crate::db::error::{map_sqlx_error, StoreError};
use crate::db::pool::{create_pool, PostgresConfig};
use crate::db::store::{check_id, check_page, UserStore};
use crate::models::pagination::offset;
use crate::models::{User, UserCreate, UserPage, UserUpdate};

const SQL_CREATE_USER: &str = "INSERT INTO users (email, first_name, last_name, created_at, updated_at) VALUES ($1, $2, $3, NOW(), NOW()) RETURNING id";
const SQL_GET_USER_BY_ID: &str = "SELECT id, email, first_name, last_name, created_at, updated_at FROM users WHERE id = $1";
const SQL_DELETE_USER: &str = "DELETE FROM users WHERE id = $1";
const SQL_COUNT_USERS: &str = "SELECT COUNT(*) FROM users";
const SQL_LIST_USERS: &str = "SELECT id, email, first_name, last_name, created_at, updated_at FROM users ORDER BY id LIMIT $1 OFFSET $2";
const SQL_READ_ONLY: &str = "SET TRANSACTION READ ONLY";

/// A parameterized UPDATE and its text bind values, in placeholder order.
/// The user id is always the final placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatement<'a> {
    pub sql: String,
    pub values: Vec<&'a str>,
}

/// Build the UPDATE for the supplied columns.
///
/// Column order is fixed (email, first_name, last_name) so the statement
/// shape depends only on which fields are present. `updated_at` is always
/// refreshed, so an empty update still touches the row.
pub fn update_statement(update: &UserUpdate) -> UpdateStatement<'_> {
    let columns = [
        ("email", update.email.as_deref()),
        ("first_name", update.first_name.as_deref()),
        ("last_name", update.last_name.as_deref()),
    ];

    let mut sets = Vec::with_capacity(columns.len() + 1);
    let mut values = Vec::with_capacity(columns.len());
    for (column, value) in columns {
        if let Some(value) = value {
            values.push(value);
            sets.push(format!("{column} = ${}", values.len()));
        }
    }
    sets.push("updated_at = NOW()".to_string());

    let sql = format!(
        "UPDATE users SET {} WHERE id = ${}",
        sets.join(", "),
        values.len() + 1
    );
    UpdateStatement { sql, values }
}

/// PostgreSQL implementation of [`UserStore`].
///
/// Holds nothing but the pool; cloning shares it.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool from `config` and probe it.
    pub async fn connect(config: &PostgresConfig) -> crate::Result<Self> {
        Ok(Self::new(create_pool(config).await?))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Map a backend error, logging it once if it is internal.
    fn handle_error(&self, operation: &'static str, id: Option<i64>, err: sqlx::Error) -> StoreError {
        let mapped = map_sqlx_error(operation, err);
        if let StoreError::Internal { source, .. } = &mapped {
            tracing::error!(operation, id, error = %source, "database operation failed");
        }
        mapped
    }

    /// Like [`handle_error`](Self::handle_error) for transaction control
    /// statements; `phase` names the statement that failed.
    fn handle_tx_error(&self, operation: &'static str, phase: &'static str, err: sqlx::Error) -> StoreError {
        let mapped = map_sqlx_error(operation, err);
        if let StoreError::Internal { source, .. } = &mapped {
            tracing::error!(operation, phase, error = %source, "database transaction failed");
        }
        mapped
    }

    /// Run `f` inside a read-only transaction.
    ///
    /// Commits only when `f` succeeds. On failure the transaction is rolled
    /// back here and a failed rollback is logged; if the future is dropped
    /// instead, the sqlx transaction guard rolls back on drop.
    async fn with_read_only_transaction<T, F>(&self, operation: &'static str, f: F) -> Result<T, StoreError>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, sqlx::Error>> + Send,
    {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| self.handle_tx_error(operation, "begin", e))?;

        let result = match sqlx::query(SQL_READ_ONLY).execute(&mut *tx).await {
            Ok(_) => f(&mut *tx).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(value) => {
                tx.commit()
                    .await
                    .map_err(|e| self.handle_tx_error(operation, "commit", e))?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(
                        operation,
                        phase = "rollback",
                        error = %rollback_err,
                        "failed to roll back transaction"
                    );
                }
                Err(self.handle_error(operation, None, err))
            }
        }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create_user(&self, user: &UserCreate) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>(SQL_CREATE_USER)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| self.handle_error("create user", None, e))
    }

    async fn get_user_by_id(&self, id: i64) -> Result<User, StoreError> {
        check_id(id)?;

        sqlx::query_as::<_, User>(SQL_GET_USER_BY_ID)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| self.handle_error("get user by id", Some(id), e))
    }

    async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<(), StoreError> {
        check_id(id)?;

        let statement = update_statement(update);
        let mut query = sqlx::query(&statement.sql);
        for value in &statement.values {
            query = query.bind(*value);
        }

        let result = query
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| self.handle_error("update user", Some(id), e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_user(&self, id: i64) -> Result<(), StoreError> {
        check_id(id)?;

        let result = sqlx::query(SQL_DELETE_USER)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| self.handle_error("delete user", Some(id), e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_users(&self, page: i64, page_size: i64) -> Result<UserPage, StoreError> {
        check_page(page, page_size)?;
        let skip = offset(page, page_size);

        self.with_read_only_transaction("list users", move |conn| {
            Box::pin(async move {
                let total: i64 = sqlx::query_scalar(SQL_COUNT_USERS)
                    .fetch_one(&mut *conn)
                    .await?;

                let users = sqlx::query_as::<_, User>(SQL_LIST_USERS)
                    .bind(page_size)
                    .bind(skip)
                    .fetch_all(&mut *conn)
                    .await?;

                Ok(UserPage { users, total })
            })
        })
        .await
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
