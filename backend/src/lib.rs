//! Postboard backend: user registration with email verification, profiles
//! and posts, exposed over HTTP and persisted in PostgreSQL.
//!
//! The crate follows a hexagonal layout. [`domain`] owns the model, the
//! services and the ports; [`inbound`] adapts HTTP requests onto the driving
//! ports; [`outbound`] implements the driven ports with Diesel and a webhook
//! notifier.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
