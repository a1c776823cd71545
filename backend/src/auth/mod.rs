//! Authentication module
//!
//! Provides signed-session management with argon2 password hashing,
//! the session extractor, the role gate, and delegated (Google)
//! identity verification.

mod gate;
mod jwt;
mod middleware;
mod oauth;
mod password;

pub use gate::require_role;
pub use jwt::{Claims, JwtService};
pub use middleware::AuthUser;
pub use oauth::{DelegatedIdentity, GoogleVerifier};
pub use password::PasswordService;
