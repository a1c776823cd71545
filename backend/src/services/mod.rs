//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories, the session manager, and the mailer.

pub mod admin;
pub mod auth;
pub mod reset;

pub use admin::AdminService;
pub use auth::AuthService;
pub use reset::ResetService;
