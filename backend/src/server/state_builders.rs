//! Builders wiring adapters and domain services into the HTTP state.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;
use url::Url;

use postboard::domain::ports::{CertificationNotifier, FixtureCertificationNotifier};
use postboard::domain::{PostService, UserService};
use postboard::inbound::http::state::{HttpState, HttpStatePorts};
use postboard::outbound::notification::WebhookCertificationNotifier;
use postboard::outbound::persistence::{DbPool, DieselPostRepository, DieselUserRepository};

/// URLs the user service and handlers need at runtime.
pub(crate) struct PublicUrls {
    pub(crate) public_base_url: Url,
    pub(crate) verified_redirect_url: Url,
}

/// Choose the certification notifier: the webhook when an endpoint is
/// configured, otherwise the log-only fixture.
pub(crate) fn build_notifier(
    webhook: Option<Url>,
    timeout: Duration,
) -> std::io::Result<Arc<dyn CertificationNotifier>> {
    match webhook {
        Some(endpoint) => {
            info!(%endpoint, "delivering certification messages via webhook");
            let notifier = WebhookCertificationNotifier::new(endpoint, timeout)
                .map_err(|err| std::io::Error::other(format!("webhook client: {err}")))?;
            Ok(Arc::new(notifier))
        }
        None => {
            info!("no notification webhook configured; certification messages are logged");
            Ok(Arc::new(FixtureCertificationNotifier))
        }
    }
}

fn build_ports(
    pool: &DbPool,
    notifier: Arc<dyn CertificationNotifier>,
    clock: Arc<dyn Clock>,
    public_base_url: Url,
) -> HttpStatePorts {
    let user_repository = Arc::new(DieselUserRepository::new(pool.clone()));
    let post_repository = Arc::new(DieselPostRepository::new(pool.clone()));

    let users = Arc::new(UserService::new(
        user_repository.clone(),
        notifier,
        clock.clone(),
        public_base_url,
    ));
    let posts = Arc::new(PostService::new(post_repository, user_repository, clock));

    HttpStatePorts {
        users: users.clone(),
        users_query: users,
        posts: posts.clone(),
        posts_query: posts,
    }
}

/// Build the shared HTTP state on top of the database pool.
pub(crate) fn build_http_state(
    pool: &DbPool,
    notifier: Arc<dyn CertificationNotifier>,
    urls: PublicUrls,
) -> web::Data<HttpState> {
    let PublicUrls {
        public_base_url,
        verified_redirect_url,
    } = urls;
    let ports = build_ports(pool, notifier, Arc::new(DefaultClock), public_base_url);
    web::Data::new(HttpState::new(ports, verified_redirect_url))
}
