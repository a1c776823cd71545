//! Session token generation and validation
//!
//! Sessions are stateless signed tokens carrying the full identity
//! (id, email, name, role), so request handling never needs a session
//! store or a secondary role lookup. Keys are pre-computed once at
//! startup and shared via AppState.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stock_dashboard_shared::{Role, SessionIdentity};
use uuid::Uuid;

/// Session claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Account email
    pub email: String,
    /// Display name
    pub name: String,
    /// Authorization tier, lowercase
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Parse the claims into a typed identity
    ///
    /// Fails on a malformed subject or an unknown role; callers treat
    /// either as an invalid token.
    pub fn identity(&self) -> Result<SessionIdentity> {
        let id = Uuid::parse_str(&self.sub)
            .map_err(|_| anyhow::anyhow!("invalid user ID in token"))?;
        let role: Role = self
            .role
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid role in token"))?;
        Ok(SessionIdentity {
            id,
            email: self.email.clone(),
            name: self.name.clone(),
            role,
        })
    }
}

/// Pre-computed JWT keys for efficient token operations
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from secret; call once at startup
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// Session token service
///
/// Uses pre-computed keys wrapped in Arc for cheap cloning; create once
/// at startup and store in AppState, never per-request.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    session_expiry_secs: i64,
}

impl JwtService {
    pub fn new(secret: &str, session_expiry_secs: i64) -> Self {
        Self {
            keys: JwtKeys::new(secret),
            session_expiry_secs,
        }
    }

    /// Issue a session token embedding the full identity
    pub fn generate_session_token(&self, identity: &SessionIdentity) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.session_expiry_secs);

        let claims = Claims {
            sub: identity.id.to_string(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            role: identity.role.as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, self.keys.encoding())
            .map_err(|e| anyhow::anyhow!("Failed to generate session token: {}", e))
    }

    /// Validate a session token and return its claims
    #[inline]
    pub fn validate_session_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, self.keys.decoding(), &Validation::default())
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        Ok(token_data.claims)
    }

    /// Get session expiry in seconds
    #[inline]
    pub fn session_expiry_secs(&self) -> i64 {
        self.session_expiry_secs
    }
}
