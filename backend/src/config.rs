//! Application settings loaded via OrthoConfig.
//!
//! Values are merged from CLI flags, `POSTBOARD_*` environment variables and
//! configuration files. Raw values stay optional strings so that parsing
//! errors surface through [`SettingsError`] with the offending key.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::outbound::persistence::DEFAULT_MAX_SIZE;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_VERIFIED_REDIRECT_URL: &str = "http://localhost:3000";
const DEFAULT_NOTIFICATION_TIMEOUT_SECS: u64 = 5;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No database URL was supplied, or it was blank.
    #[error("database_url must be configured")]
    MissingDatabaseUrl,
    /// The listener address did not parse.
    #[error("bind_addr `{value}` is not a socket address: {source}")]
    InvalidBindAddr {
        /// Raw configured value.
        value: String,
        /// Parser failure.
        #[source]
        source: std::net::AddrParseError,
    },
    /// One of the URL settings did not parse.
    #[error("{key} `{value}` is not a valid URL: {source}")]
    InvalidUrl {
        /// Setting name.
        key: &'static str,
        /// Raw configured value.
        value: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
}

/// Runtime configuration for the HTTP service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "POSTBOARD")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// Externally reachable base URL used to build verification links.
    pub public_base_url: Option<String>,
    /// Where browsers are redirected after a successful verification.
    pub verified_redirect_url: Option<String>,
    /// Mail relay webhook. Certification messages are only logged when unset.
    pub notification_webhook_url: Option<String>,
    /// Timeout for webhook calls, in seconds.
    pub notification_timeout_secs: Option<u64>,
    /// Apply embedded migrations at startup. Defaults to true.
    pub run_migrations: Option<bool>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

fn parse_url(key: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|source| SettingsError::InvalidUrl {
        key,
        value: value.to_owned(),
        source,
    })
}

impl AppSettings {
    /// Database URL, required and non-blank.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Listener address, `0.0.0.0:8080` unless configured.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    /// Base for verification links.
    pub fn public_base_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "public_base_url",
            self.public_base_url
                .as_deref()
                .unwrap_or(DEFAULT_PUBLIC_BASE_URL),
        )
    }

    /// Redirect target after a successful verification.
    pub fn verified_redirect_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "verified_redirect_url",
            self.verified_redirect_url
                .as_deref()
                .unwrap_or(DEFAULT_VERIFIED_REDIRECT_URL),
        )
    }

    /// Webhook endpoint, if one is configured.
    pub fn notification_webhook_url(&self) -> Result<Option<Url>, SettingsError> {
        self.notification_webhook_url
            .as_deref()
            .map(|value| parse_url("notification_webhook_url", value))
            .transpose()
    }

    /// Webhook call timeout, five seconds by default.
    #[must_use]
    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(
            self.notification_timeout_secs
                .unwrap_or(DEFAULT_NOTIFICATION_TIMEOUT_SECS),
        )
    }

    /// Whether to apply pending migrations at startup.
    #[must_use]
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Pool size cap.
    #[must_use]
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_MAX_SIZE)
    }
}
