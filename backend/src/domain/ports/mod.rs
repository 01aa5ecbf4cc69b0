//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`) are implemented by the domain services
//! and called by inbound adapters. Driven ports (`*Repository`,
//! [`CertificationNotifier`]) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod certification_notifier;
mod post_command;
mod post_query;
mod post_repository;
mod user_command;
mod user_query;
mod user_repository;

#[cfg(test)]
pub use certification_notifier::MockCertificationNotifier;
pub use certification_notifier::{
    CertificationMessage, CertificationNotifier, FixtureCertificationNotifier, NotificationError,
    verification_link,
};
#[cfg(test)]
pub use post_command::MockPostCommand;
pub use post_command::PostCommand;
#[cfg(test)]
pub use post_query::MockPostQuery;
pub use post_query::PostQuery;
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostPersistenceError, PostRepository};
#[cfg(test)]
pub use user_command::MockUserCommand;
pub use user_command::UserCommand;
#[cfg(test)]
pub use user_query::MockUserQuery;
pub use user_query::UserQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
