//! User account service.
//!
//! Implements [`UserCommand`] and [`UserQuery`] over a [`UserRepository`]
//! and a [`CertificationNotifier`]. Every call re-reads the store; nothing is
//! cached between requests.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::ports::{
    CertificationMessage, CertificationNotifier, UserCommand, UserPersistenceError, UserQuery,
    UserRepository, verification_link,
};
use crate::domain::{
    CertificationCode, Email, Error, NewUser, User, UserCreate, UserId, UserStatus, UserUpdate,
    Verification,
};

/// Domain service owning the user lifecycle.
#[derive(Clone)]
pub struct UserService<R, N: ?Sized> {
    repository: Arc<R>,
    notifier: Arc<N>,
    clock: Arc<dyn Clock>,
    public_base_url: Url,
}

impl<R, N: ?Sized> UserService<R, N> {
    /// Create a service. `public_base_url` prefixes verification links.
    pub fn new(
        repository: Arc<R>,
        notifier: Arc<N>,
        clock: Arc<dyn Clock>,
        public_base_url: Url,
    ) -> Self {
        Self {
            repository,
            notifier,
            clock,
            public_base_url,
        }
    }
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => email_taken(&email),
    }
}

fn email_taken(email: &str) -> Error {
    Error::conflict("email already registered").with_details(json!({
        "field": "email",
        "value": email,
        "code": "duplicate_email",
    }))
}

fn user_not_found(key: impl std::fmt::Display) -> Error {
    Error::not_found(format!("user {key} not found")).with_details(json!({
        "resource": "users",
        "key": key.to_string(),
    }))
}

impl<R, N> UserService<R, N>
where
    R: UserRepository,
    N: CertificationNotifier + ?Sized,
{
    async fn fetch_any(&self, id: UserId) -> Result<User, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| user_not_found(id))
    }

    async fn send_certification(&self, user: &User) {
        let link = verification_link(&self.public_base_url, user.id(), user.certification_code());
        let message = CertificationMessage::new(user.email(), user.id(), link);
        if let Err(error) = self.notifier.send(&message).await {
            warn!(
                %error,
                user_id = %user.id(),
                "certification message could not be delivered"
            );
        }
    }
}

#[async_trait]
impl<R, N> UserCommand for UserService<R, N>
where
    R: UserRepository,
    N: CertificationNotifier + ?Sized,
{
    async fn create(&self, request: UserCreate) -> Result<User, Error> {
        let existing = self
            .repository
            .find_by_email(&request.email)
            .await
            .map_err(map_persistence_error)?;
        if existing.is_some() {
            return Err(email_taken(request.email.as_ref()));
        }

        let registration = NewUser::register(request, CertificationCode::random());
        let user = self
            .repository
            .create(&registration)
            .await
            .map_err(map_persistence_error)?;
        info!(user_id = %user.id(), "user registered");

        // Sent in-request; the notifier's own timeout bounds the delay.
        self.send_certification(&user).await;
        Ok(user)
    }

    async fn update(&self, id: UserId, update: UserUpdate) -> Result<User, Error> {
        self.repository
            .update_profile(id, &update)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| user_not_found(id))
    }

    async fn login(&self, id: UserId) -> Result<User, Error> {
        self.repository
            .record_login(id, self.clock.utc())
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| user_not_found(id))
    }

    async fn verify_email(&self, id: UserId, code: CertificationCode) -> Result<User, Error> {
        let mut user = self.fetch_any(id).await?;
        match user.verify(&code) {
            Ok(Verification::Activated) => {
                let user = self
                    .repository
                    .activate(id)
                    .await
                    .map_err(map_persistence_error)?
                    .ok_or_else(|| user_not_found(id))?;
                info!(user_id = %id, "user email verified");
                Ok(user)
            }
            Ok(Verification::AlreadyActive) => {
                debug!(user_id = %id, "user already verified");
                Ok(user)
            }
            Err(mismatch) => Err(Error::certification_code_not_matched(mismatch.to_string())
                .with_details(json!({ "userId": id.get() }))),
        }
    }
}

#[async_trait]
impl<R, N> UserQuery for UserService<R, N>
where
    R: UserRepository,
    N: CertificationNotifier + ?Sized,
{
    async fn get_by_id(&self, id: UserId) -> Result<User, Error> {
        self.repository
            .find_by_id_and_status(id, UserStatus::Active)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| user_not_found(id))
    }

    async fn get_by_email(&self, email: &Email) -> Result<User, Error> {
        self.repository
            .find_by_email_and_status(email, UserStatus::Active)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| user_not_found(email))
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
