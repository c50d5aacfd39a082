//! User entity, input payloads and wire projections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{check_email, check_min_len, check_required};
use super::ValidationError;

/// Minimum length of a name supplied in an update
const MIN_UPDATE_NAME_LEN: usize = 2;

/// User record as stored in the `users` table.
///
/// Deliberately not `Serialize`: handlers go through [`UserResponse`].
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a user. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl UserCreate {
    /// Validate before the payload is allowed to reach storage.
    ///
    /// # Example
    /// ```
    /// use userbase_server::models::UserCreate;
    ///
    /// let ok = UserCreate {
    ///     email: "jane@example.com".into(),
    ///     first_name: "Jane".into(),
    ///     last_name: "Doe".into(),
    /// };
    /// assert!(ok.validate().is_ok());
    ///
    /// let bad = UserCreate { email: "jane".into(), ..ok };
    /// assert!(bad.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_required("email", &self.email)?;
        check_email(&self.email)?;
        check_required("first_name", &self.first_name)?;
        check_required("last_name", &self.last_name)?;
        Ok(())
    }
}

/// Partial update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl UserUpdate {
    /// Validate only the fields that were supplied. An empty update is valid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(email) = &self.email {
            check_email(email)?;
        }
        if let Some(first_name) = &self.first_name {
            check_min_len("first_name", first_name, MIN_UPDATE_NAME_LEN)?;
        }
        if let Some(last_name) = &self.last_name {
            check_min_len("last_name", last_name, MIN_UPDATE_NAME_LEN)?;
        }
        Ok(())
    }
}

/// Wire representation of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Body returned after a create or update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdResponse {
    pub id: i64,
}
