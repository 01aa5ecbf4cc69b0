//! Driving port for reading active users.

use async_trait::async_trait;

use crate::domain::{Email, Error, User, UserId};

/// Domain use-case port for user lookups.
///
/// Only ACTIVE users are visible. Pending and missing users both surface as
/// `not_found`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserQuery: Send + Sync {
    /// Active user with identifier `id`.
    async fn get_by_id(&self, id: UserId) -> Result<User, Error>;

    /// Active user registered under `email`.
    async fn get_by_email(&self, email: &Email) -> Result<User, Error>;
}
