//! Runtime knobs for the HTTP listener.

use std::net::SocketAddr;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Listener settings handed to [`super::create_server`].
///
/// Worker count and keep-alive stay at Actix defaults; only the socket and
/// the optional Prometheus middleware vary between deployments.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Listen on `bind_addr` with no request metrics.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Record request counts and latencies through `prometheus`.
    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn with_metrics(self, prometheus: PrometheusMetrics) -> Self {
        Self {
            prometheus: Some(prometheus),
            ..self
        }
    }
}
