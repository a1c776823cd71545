//! Database repositories
//!
//! Provides data access layer for database operations. Every operation
//! is a single atomic statement; no multi-step transaction spans stores.

pub mod reset_token;
pub mod user;

pub use reset_token::{ResetTokenRecord, ResetTokenRepository};
pub use user::{UserRecord, UserRepository};
