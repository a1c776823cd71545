//! Password reset lifecycle
//!
//! Token issuance and redemption. The request side always reports
//! success so responses never reveal whether an email is registered;
//! the consume side fails uniformly for absent, expired, and
//! already-used tokens.

use crate::auth::PasswordService;
use crate::config::ResetConfig;
use crate::error::ApiError;
use crate::mailer::Mailer;
use crate::repositories::{ResetTokenRepository, UserRepository};
use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use stock_dashboard_shared::validation;
use tracing::{debug, warn};

/// Password reset operations
pub struct ResetService;

impl ResetService {
    /// Generate a fresh reset token: 32 bytes from the OS CSPRNG,
    /// hex-encoded
    pub fn generate_token() -> String {
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Digest under which a token is stored and looked up
    pub fn token_digest(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    /// Handle a forgot-password request
    ///
    /// Always returns success. Unknown emails create no token and send
    /// no mail; delivery failures are logged without changing the
    /// outcome. Outstanding tokens for the same user stay valid until
    /// their own expiry or use.
    pub async fn request_reset(
        pool: &PgPool,
        mailer: &Mailer,
        config: &ResetConfig,
        email: &str,
    ) -> Result<(), ApiError> {
        let user = match UserRepository::find_by_email(pool, email)
            .await
            .map_err(ApiError::Internal)?
        {
            Some(user) => user,
            None => {
                debug!("reset requested for unknown email");
                return Ok(());
            }
        };

        let token = Self::generate_token();
        let expires_at = Utc::now() + Duration::seconds(config.token_expiry_secs);

        ResetTokenRepository::insert(pool, user.id, &Self::token_digest(&token), expires_at)
            .await
            .map_err(ApiError::Internal)?;

        let reset_url = format!("{}/{}", config.url_base.trim_end_matches('/'), token);
        let body = format!(
            "<p>Click <a href=\"{}\">here</a> to reset your password. \
             This link will expire in 1 hour.</p>",
            reset_url
        );

        if let Err(e) = mailer.send(&user.email, "Password Reset", &body).await {
            warn!("failed to send password reset email: {:#}", e);
        }

        Ok(())
    }

    /// Redeem a reset token and set a new password
    ///
    /// Token validity is checked before the new password, so an expired
    /// or replayed token always fails with the same error. The delete
    /// claims the token; a concurrent consume of the same token loses
    /// there and observes it as already used.
    pub async fn consume_reset(
        pool: &PgPool,
        token: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let record = ResetTokenRepository::find_by_token_hash(pool, &Self::token_digest(token))
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(ApiError::invalid_or_expired_token)?;

        if record.expires_at <= Utc::now() {
            return Err(ApiError::invalid_or_expired_token());
        }

        validation::validate_password(new_password).map_err(ApiError::Validation)?;

        let password_hash = PasswordService::hash_async(new_password.to_string())
            .await
            .map_err(ApiError::Internal)?;

        let claimed = ResetTokenRepository::delete_by_id(pool, record.id)
            .await
            .map_err(ApiError::Internal)?;
        if !claimed {
            return Err(ApiError::invalid_or_expired_token());
        }

        UserRepository::update_password_hash(pool, record.user_id, &password_hash)
            .await
            .map_err(ApiError::Internal)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_is_64_hex_chars() {
        let token = ResetService::generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let tokens: HashSet<String> = (0..100).map(|_| ResetService::generate_token()).collect();
        assert_eq!(tokens.len(), 100);
    }

    #[test]
    fn test_digest_is_deterministic_and_distinct_from_token() {
        let token = ResetService::generate_token();
        let digest = ResetService::token_digest(&token);

        assert_eq!(digest, ResetService::token_digest(&token));
        assert_eq!(digest.len(), 64);
        assert_ne!(digest, token);
    }
}
