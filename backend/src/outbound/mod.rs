//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **notification**: webhook delivery of certification messages.
//!
//! Adapters translate between domain values and infrastructure types and hold
//! no business rules.

pub mod notification;
pub mod persistence;
