//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **password**: bcrypt-backed password hashing
//! - **session**: `actix-session` store persisting state through the session
//!   repository port
//! - **session_reaper**: background purge of expired sessions
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod password;
pub mod persistence;
pub mod session;
pub mod session_reaper;
