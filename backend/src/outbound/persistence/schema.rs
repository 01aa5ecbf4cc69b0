//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        id -> Int8,
        /// Unique login address (`users_email_key`).
        email -> Varchar,
        nickname -> Varchar,
        address -> Varchar,
        /// `PENDING` or `ACTIVE`, enforced by a check constraint.
        status -> Varchar,
        certification_code -> Varchar,
        last_login_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Posts written by users.
    posts (id) {
        id -> Int8,
        content -> Text,
        writer_id -> Int8,
        created_at -> Timestamptz,
        modified_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(posts -> users (writer_id));

diesel::allow_tables_to_appear_in_same_query!(posts, users);
