//! Certification message delivery adapters.

mod http_notifier;

pub use http_notifier::WebhookCertificationNotifier;
