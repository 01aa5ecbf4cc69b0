//! Reqwest-backed certification notifier.
//!
//! Posts each [`CertificationMessage`] as JSON to a mail relay webhook. The
//! relay owns actual SMTP delivery.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::TraceId;
use crate::domain::TRACE_ID_HEADER;
use crate::domain::ports::{CertificationMessage, CertificationNotifier, NotificationError};

const USER_AGENT: &str = concat!("postboard/", env!("CARGO_PKG_VERSION"));

/// Notifier that forwards messages to an HTTP webhook.
pub struct WebhookCertificationNotifier {
    client: Client,
    endpoint: Url,
}

impl WebhookCertificationNotifier {
    /// Build a notifier posting to `endpoint` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl CertificationNotifier for WebhookCertificationNotifier {
    async fn send(&self, message: &CertificationMessage) -> Result<(), NotificationError> {
        let mut request = self.client.post(self.endpoint.clone()).json(message);
        if let Some(trace_id) = TraceId::current() {
            request = request.header(TRACE_ID_HEADER, trace_id.to_string());
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(map_status_error(status, &body))
    }
}

fn map_transport_error(error: reqwest::Error) -> NotificationError {
    if error.is_timeout() {
        NotificationError::unavailable(format!("webhook timed out: {error}"))
    } else {
        NotificationError::unavailable(format!("webhook transport failed: {error}"))
    }
}

fn map_status_error(status: StatusCode, body: &str) -> NotificationError {
    const PREVIEW_CHAR_LIMIT: usize = 120;

    let preview: String = body
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(PREVIEW_CHAR_LIMIT)
        .collect();
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    };

    if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
        NotificationError::rejected(message)
    } else {
        NotificationError::unavailable(message)
    }
}
