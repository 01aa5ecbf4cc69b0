//! Driving port for user account mutations.
//!
//! Inbound adapters call this port to register users, edit profiles, record
//! logins and verify email ownership without touching persistence.

use async_trait::async_trait;

use crate::domain::{CertificationCode, Error, User, UserCreate, UserId, UserUpdate};

/// Domain use-case port for changing user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCommand: Send + Sync {
    /// Register a pending user and dispatch its certification message.
    async fn create(&self, request: UserCreate) -> Result<User, Error>;

    /// Overwrite the supplied profile fields of any user.
    async fn update(&self, id: UserId, update: UserUpdate) -> Result<User, Error>;

    /// Stamp the user's last login with the current time.
    async fn login(&self, id: UserId) -> Result<User, Error>;

    /// Activate the user when `code` matches the issued certification code.
    async fn verify_email(&self, id: UserId, code: CertificationCode) -> Result<User, Error>;
}
