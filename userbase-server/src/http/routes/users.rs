//! User endpoints
//!
//! Handlers validate input, call the store under a per-operation deadline,
//! and convert results into wire types.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::db::StoreError;
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, UserId};
use crate::http::server::AppState;
use crate::models::{
    PaginatedUsers, PaginationParams, UserCreate, UserIdResponse, UserResponse, UserUpdate,
};

const CREATE_TIMEOUT: Duration = Duration::from_millis(500);
const GET_TIMEOUT: Duration = Duration::from_millis(300);
const UPDATE_TIMEOUT: Duration = Duration::from_millis(500);
const DELETE_TIMEOUT: Duration = Duration::from_millis(300);
const LIST_TIMEOUT: Duration = Duration::from_secs(1);

/// Await a store call, dropping it (and its query) once `limit` passes.
async fn within<T>(
    operation: &'static str,
    limit: Duration,
    call: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, ApiError> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(_) => Err(ApiError::Timeout { operation }),
    }
}

/// POST /users - create a user
async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<UserCreate>,
) -> Result<(StatusCode, Json<UserIdResponse>), ApiError> {
    req.validate()?;

    let id = within("create user", CREATE_TIMEOUT, state.store.create_user(&req)).await?;
    tracing::debug!(id, "user created");

    Ok((StatusCode::CREATED, Json(UserIdResponse { id })))
}

/// GET /users/{id} - fetch a single user
async fn get_user(
    State(state): State<Arc<AppState>>,
    UserId(id): UserId,
) -> Result<Json<UserResponse>, ApiError> {
    let user = within("get user", GET_TIMEOUT, state.store.get_user_by_id(id)).await?;
    Ok(Json(UserResponse::from(user)))
}

/// PUT /users/{id} - partial update
async fn update_user(
    State(state): State<Arc<AppState>>,
    UserId(id): UserId,
    ApiJson(req): ApiJson<UserUpdate>,
) -> Result<Json<UserIdResponse>, ApiError> {
    req.validate()?;

    within("update user", UPDATE_TIMEOUT, state.store.update_user(id, &req)).await?;
    Ok(Json(UserIdResponse { id }))
}

/// DELETE /users/{id}
async fn delete_user(
    State(state): State<Arc<AppState>>,
    UserId(id): UserId,
) -> Result<StatusCode, ApiError> {
    within("delete user", DELETE_TIMEOUT, state.store.delete_user(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users?page=&page_size= - paginated listing
async fn list_users(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<PaginatedUsers>, ApiError> {
    let Query(params) = params?;
    let (page, page_size) = (params.page(), params.page_size());

    let result = within("list users", LIST_TIMEOUT, state.store.list_users(page, page_size)).await?;
    Ok(Json(PaginatedUsers::new(result, page, page_size)))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
