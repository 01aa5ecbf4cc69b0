//! Driven port for user persistence.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Email, NewUser, User, UserId, UserStatus, UserUpdate};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection {
            /// Adapter-supplied detail.
            message: String,
        } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query {
            /// Adapter-supplied detail.
            message: String,
        } => "user repository query failed: {message}",
        /// Another account already holds the email address.
        DuplicateEmail {
            /// Address that collided.
            email: String,
        } => "email already registered: {email}",
    }
}

/// Storage for user accounts.
///
/// Lookups return `Ok(None)` for absent rows; only infrastructure failures
/// surface as errors.
///
/// Writes are column-scoped: each one updates only the columns its
/// operation owns, so concurrent requests on the same account cannot
/// overwrite each other's changes with stale values.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a pending registration and return the stored user.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier regardless of status.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by identifier only when it is in `status`.
    async fn find_by_id_and_status(
        &self,
        id: UserId,
        status: UserStatus,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by email regardless of status.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by email only when it is in `status`.
    async fn find_by_email_and_status(
        &self,
        email: &Email,
        status: UserStatus,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Set `last_login_at` to `at` and return the stored user.
    async fn record_login(
        &self,
        id: UserId,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Overwrite the supplied profile fields and return the stored user.
    ///
    /// An update with no fields set leaves the row as it is.
    async fn update_profile(
        &self,
        id: UserId,
        update: &UserUpdate,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Move a pending user to active and return the stored user.
    ///
    /// Users that are already active come back unchanged.
    async fn activate(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;
}
