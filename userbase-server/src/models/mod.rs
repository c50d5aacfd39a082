//! Domain models with validation before storage
//!
//! Input payloads are checked with `validate()` in the handler.
//! Invalid input returns ValidationError, not panic.

pub mod pagination;
pub mod user;
pub mod validation;

pub use pagination::{PaginatedUsers, PaginationParams, UserPage, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use user::{User, UserCreate, UserIdResponse, UserResponse, UserUpdate};
pub use validation::ValidationError;
