//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts keyed by username.
    users (username) {
        username -> Text,
        /// bcrypt hash in modular crypt format.
        hashed_pass -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Server-side session records addressed by the opaque cookie key.
    sessions (id) {
        id -> Varchar,
        /// JSON object of string values written by the session middleware.
        state -> Jsonb,
        expires_at -> Timestamptz,
    }
}

diesel::table! {
    /// Read-only city reference data.
    city (id) {
        id -> Int4,
        name -> Varchar,
        country_code -> Varchar,
        district -> Varchar,
        population -> Int4,
    }
}
