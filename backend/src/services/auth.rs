//! Authentication service
//!
//! Credential and delegated entry points both end in the same place: a
//! signed session token embedding the user's id, email, name, and role.
//! A login failure never distinguishes a missing account from a wrong
//! password.

use crate::auth::{DelegatedIdentity, JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{UserRecord, UserRepository};
use sqlx::PgPool;
use stock_dashboard_shared::{validation, SessionIdentity, SessionTokenResponse};
use validator::ValidateEmail;

/// User authentication operations
pub struct AuthService;

impl AuthService {
    /// Register a new user with the default role
    ///
    /// Password hashing is offloaded to the blocking thread pool.
    pub async fn register(
        pool: &PgPool,
        jwt_service: &JwtService,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<SessionTokenResponse, ApiError> {
        if !email.validate_email() {
            return Err(ApiError::Validation("Invalid email format".to_string()));
        }
        validation::validate_password(password).map_err(ApiError::Validation)?;
        validation::validate_name(name).map_err(ApiError::Validation)?;

        if UserRepository::email_exists(pool, email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_hash = PasswordService::hash_async(password.to_string())
            .await
            .map_err(ApiError::Internal)?;

        let user = UserRepository::create(pool, email, &password_hash, name)
            .await
            .map_err(ApiError::Internal)?;

        Self::issue_session(jwt_service, &user)
    }

    /// Login with email and password
    ///
    /// Missing users, delegated-only accounts, and wrong passwords all
    /// produce the same credential failure.
    pub async fn login(
        pool: &PgPool,
        jwt_service: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<SessionTokenResponse, ApiError> {
        let user = UserRepository::find_by_email(pool, email)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(ApiError::invalid_credentials)?;

        let hash = user
            .password_hash
            .clone()
            .ok_or_else(ApiError::invalid_credentials)?;

        let valid = PasswordService::verify_async(password.to_string(), hash)
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            return Err(ApiError::invalid_credentials());
        }

        Self::issue_session(jwt_service, &user)
    }

    /// Login with a verified delegated-identity assertion
    ///
    /// Provisions the user implicitly on first sight; the account has
    /// no password hash until a reset sets one.
    pub async fn login_delegated(
        pool: &PgPool,
        jwt_service: &JwtService,
        identity: &DelegatedIdentity,
    ) -> Result<SessionTokenResponse, ApiError> {
        let user = match UserRepository::find_by_email(pool, &identity.email)
            .await
            .map_err(ApiError::Internal)?
        {
            Some(user) => user,
            None => UserRepository::create_delegated(pool, &identity.email, &identity.name)
                .await
                .map_err(ApiError::Internal)?,
        };

        Self::issue_session(jwt_service, &user)
    }

    /// Build the typed identity for a stored user
    pub fn identity_from_record(user: &UserRecord) -> Result<SessionIdentity, ApiError> {
        let role = user
            .role
            .parse()
            .map_err(|_| ApiError::Internal(anyhow::anyhow!("stored role is invalid")))?;
        Ok(SessionIdentity {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role,
        })
    }

    /// Issue a session token for a stored user
    pub fn issue_session(
        jwt_service: &JwtService,
        user: &UserRecord,
    ) -> Result<SessionTokenResponse, ApiError> {
        let identity = Self::identity_from_record(user)?;
        let token = jwt_service
            .generate_session_token(&identity)
            .map_err(ApiError::Internal)?;

        Ok(SessionTokenResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_service.session_expiry_secs(),
        })
    }
}
