//! Backend entry-point: loads settings, prepares the database and serves the
//! REST API with OpenAPI docs.

mod server;

use std::io;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use postboard::config::AppSettings;
use postboard::inbound::http::health::HealthState;
use postboard::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{PublicUrls, ServerConfig, build_http_state, build_notifier, create_server};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::other(format!("{context}: {err}"))
}

async fn apply_migrations(database_url: &str) -> io::Result<()> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .map_err(|err| startup_error("migration task panicked", err))?
        .map_err(|err| startup_error("failed to apply migrations", err))?;
    info!(applied, "database migrations applied");
    Ok(())
}

#[cfg(feature = "metrics")]
fn make_metrics() -> io::Result<actix_web_prom::PrometheusMetrics> {
    PrometheusMetricsBuilder::new("postboard")
        .endpoint("/metrics")
        .build()
        .map_err(|err| startup_error("failed to configure Prometheus metrics", err))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    init_tracing();

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| startup_error("failed to load settings", err))?;
    let database_url = settings
        .database_url()
        .map_err(|err| startup_error("invalid settings", err))?
        .to_owned();
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| startup_error("invalid settings", err))?;
    let urls = PublicUrls {
        public_base_url: settings
            .public_base_url()
            .map_err(|err| startup_error("invalid settings", err))?,
        verified_redirect_url: settings
            .verified_redirect_url()
            .map_err(|err| startup_error("invalid settings", err))?,
    };
    let webhook = settings
        .notification_webhook_url()
        .map_err(|err| startup_error("invalid settings", err))?;

    if settings.run_migrations() {
        apply_migrations(&database_url).await?;
    }

    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .map_err(|err| startup_error("failed to build database pool", err))?;

    let notifier = build_notifier(webhook, settings.notification_timeout())?;
    let http_state = build_http_state(&pool, notifier, urls);

    let config = ServerConfig::new(bind_addr);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(make_metrics()?);

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting HTTP server");
    create_server(health_state, http_state, config)?.await
}
