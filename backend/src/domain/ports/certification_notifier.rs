//! Driven port delivering email verification links.
//!
//! Delivery is best effort: the user service logs failures and keeps the
//! registration.

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;
use url::Url;

use crate::domain::{CertificationCode, Email, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures raised while handing a message to the delivery channel.
    pub enum NotificationError {
        /// The delivery channel could not be reached.
        Unavailable {
            /// Channel-supplied detail.
            message: String,
        } => "notification channel unavailable: {message}",
        /// The delivery channel refused the message.
        Rejected {
            /// Channel-supplied detail.
            message: String,
        } => "notification rejected: {message}",
    }
}

/// Verification message addressed to a newly registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationMessage {
    /// Email address of the new user.
    pub recipient: String,
    /// Always [`CertificationMessage::SUBJECT`].
    pub subject: String,
    /// Plain-text body containing the link.
    pub body: String,
    /// Identifier of the user being verified.
    pub user_id: i64,
    /// Link that activates the account when followed.
    pub verification_link: Url,
}

impl CertificationMessage {
    /// Subject line used for every verification message.
    pub const SUBJECT: &'static str = "Please certify your email address";

    /// Build the message for `recipient` pointing at `verification_link`.
    #[must_use]
    pub fn new(recipient: &Email, user_id: UserId, verification_link: Url) -> Self {
        let body = format!("Please click the following link to certify your email address: {verification_link}");
        Self {
            recipient: recipient.to_string(),
            subject: Self::SUBJECT.to_owned(),
            body,
            user_id: user_id.get(),
            verification_link,
        }
    }
}

/// Build `{base}/api/users/{id}/verify?certificationCode={code}`.
///
/// # Examples
/// ```
/// use postboard::domain::ports::verification_link;
/// use postboard::domain::{CertificationCode, UserId};
/// use url::Url;
///
/// let base = Url::parse("http://localhost:8080").expect("base url");
/// let code = CertificationCode::new("abc").expect("code");
/// let link = verification_link(&base, UserId::new(3), &code);
/// assert_eq!(
///     link.as_str(),
///     "http://localhost:8080/api/users/3/verify?certificationCode=abc"
/// );
/// ```
#[must_use]
pub fn verification_link(base: &Url, user_id: UserId, code: &CertificationCode) -> Url {
    let mut link = base.clone();
    {
        let prefix = base.path().trim_end_matches('/');
        link.set_path(&format!("{prefix}/api/users/{user_id}/verify"));
    }
    link.query_pairs_mut()
        .clear()
        .append_pair("certificationCode", code.as_ref());
    link
}

/// Delivers certification messages to new users.
///
/// Delivery failures are reported, never retried here; registration logs
/// them and carries on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CertificationNotifier: Send + Sync {
    /// Hand `message` to the delivery channel.
    async fn send(&self, message: &CertificationMessage) -> Result<(), NotificationError>;
}

/// Notifier that only logs the message. Used when no webhook is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCertificationNotifier;

#[async_trait]
impl CertificationNotifier for FixtureCertificationNotifier {
    async fn send(&self, message: &CertificationMessage) -> Result<(), NotificationError> {
        info!(
            user_id = message.user_id,
            link = %message.verification_link,
            "certification message not delivered; no notifier configured"
        );
        Ok(())
    }
}
