//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use url::Url;

use crate::domain::ports::{PostCommand, PostQuery, UserCommand, UserQuery};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// User registration, update, login and verification.
    pub users: Arc<dyn UserCommand>,
    /// Active-user lookups.
    pub users_query: Arc<dyn UserQuery>,
    /// Post creation and edits.
    pub posts: Arc<dyn PostCommand>,
    /// Post reads.
    pub posts_query: Arc<dyn PostQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// See [`HttpStatePorts::users`].
    pub users: Arc<dyn UserCommand>,
    /// See [`HttpStatePorts::users_query`].
    pub users_query: Arc<dyn UserQuery>,
    /// See [`HttpStatePorts::posts`].
    pub posts: Arc<dyn PostCommand>,
    /// See [`HttpStatePorts::posts_query`].
    pub posts_query: Arc<dyn PostQuery>,
    /// Where browsers land after following a verification link.
    pub verified_redirect_url: Url,
}

impl HttpState {
    /// Construct state from the port bundle and the post-verification
    /// redirect target.
    pub fn new(ports: HttpStatePorts, verified_redirect_url: Url) -> Self {
        let HttpStatePorts {
            users,
            users_query,
            posts,
            posts_query,
        } = ports;
        Self {
            users,
            users_query,
            posts,
            posts_query,
            verified_redirect_url,
        }
    }
}
