//! Correlation identifier shared by logs, error payloads and outbound calls.
//!
//! The identifier of the request being served sits in a Tokio task-local.
//! Work moved onto another task must be wrapped in [`TraceId::scope`] again,
//! because task-locals are not inherited by `tokio::spawn`.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use uuid::Uuid;

tokio::task_local! {
    static CURRENT: TraceId;
}

/// UUID identifying one request end to end.
///
/// ```
/// use postboard::TraceId;
///
/// assert!(TraceId::current().is_none());
/// assert!(TraceId::from_inbound("not-a-uuid").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Adopt an identifier sent by an upstream caller.
    ///
    /// Surrounding whitespace is ignored. Anything other than a non-nil UUID
    /// yields `None` so the caller can fall back to [`TraceId::generate`].
    #[must_use]
    pub fn from_inbound(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }

    /// Identifier of the request currently in scope, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current identifier.
    pub async fn scope<Fut: Future>(trace_id: Self, fut: Fut) -> Fut::Output {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

/// Raised when text is not usable as a [`TraceId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraceIdParseError {
    /// Not a UUID at all; carries the parser's explanation.
    #[error("trace id is not a UUID: {0}")]
    Malformed(String),
    /// All-zero UUID, reserved as "no trace".
    #[error("trace id must not be the nil UUID")]
    Nil,
}

impl FromStr for TraceId {
    type Err = TraceIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::parse_str(s).map_err(|err| TraceIdParseError::Malformed(err.to_string()))?;
        if uuid.is_nil() {
            return Err(TraceIdParseError::Nil);
        }
        Ok(Self(uuid))
    }
}
