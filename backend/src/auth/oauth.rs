//! Delegated identity verification
//!
//! Verifies Google ID tokens against the tokeninfo endpoint and reduces
//! them to the (email, display name) assertion the auth service consumes.
//! The endpoint URL is configurable so tests can point it at a local double.

use crate::error::ApiError;
use serde::Deserialize;
use tracing::debug;

/// Verified external-identity assertion
#[derive(Debug, Clone)]
pub struct DelegatedIdentity {
    pub email: String,
    pub name: String,
}

/// Google ID token verifier
#[derive(Clone)]
pub struct GoogleVerifier {
    http: reqwest::Client,
    client_id: String,
    tokeninfo_url: String,
}

/// Relevant subset of the tokeninfo response; Google returns booleans
/// as strings here
#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    email: String,
    #[serde(default)]
    email_verified: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl GoogleVerifier {
    pub fn new(http: reqwest::Client, client_id: &str, tokeninfo_url: &str) -> Self {
        Self {
            http,
            client_id: client_id.to_string(),
            tokeninfo_url: tokeninfo_url.to_string(),
        }
    }

    /// Whether delegated login is configured at all
    pub fn is_enabled(&self) -> bool {
        !self.client_id.is_empty()
    }

    /// Verify an ID token and extract the identity assertion
    ///
    /// Rejections (bad token, audience mismatch, unverified email) all
    /// surface as a uniform unauthorized error.
    pub async fn verify(&self, id_token: &str) -> Result<DelegatedIdentity, ApiError> {
        if !self.is_enabled() {
            return Err(ApiError::BadRequest(
                "delegated login is not configured".to_string(),
            ));
        }

        let response = self
            .http
            .get(&self.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("tokeninfo request failed: {}", e)))?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "tokeninfo rejected ID token");
            return Err(ApiError::Unauthorized(
                "invalid identity assertion".to_string(),
            ));
        }

        let info: TokenInfo = response.json().await.map_err(|e| {
            ApiError::Internal(anyhow::anyhow!("malformed tokeninfo response: {}", e))
        })?;

        if info.aud != self.client_id {
            debug!("tokeninfo audience mismatch");
            return Err(ApiError::Unauthorized(
                "invalid identity assertion".to_string(),
            ));
        }

        if info.email_verified.as_deref() != Some("true") {
            return Err(ApiError::Unauthorized(
                "invalid identity assertion".to_string(),
            ));
        }

        let name = info.name.unwrap_or_else(|| "User".to_string());

        Ok(DelegatedIdentity {
            email: info.email,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn verifier(server: &MockServer, client_id: &str) -> GoogleVerifier {
        GoogleVerifier::new(
            reqwest::Client::new(),
            client_id,
            &format!("{}/tokeninfo", server.uri()),
        )
    }

    #[tokio::test]
    async fn test_valid_token_yields_identity() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tokeninfo"))
            .and(query_param("id_token", "good-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "aud": "client-123",
                "email": "alice@example.com",
                "email_verified": "true",
                "name": "Alice",
            })))
            .mount(&server)
            .await;

        let identity = verifier(&server, "client-123")
            .verify("good-token")
            .await
            .unwrap();

        assert_eq!(identity.email, "alice@example.com");
        assert_eq!(identity.name, "Alice");
    }

    #[tokio::test]
    async fn test_missing_name_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tokeninfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "aud": "client-123",
                "email": "bob@example.com",
                "email_verified": "true",
            })))
            .mount(&server)
            .await;

        let identity = verifier(&server, "client-123").verify("t").await.unwrap();
        assert_eq!(identity.name, "User");
    }

    #[tokio::test]
    async fn test_audience_mismatch_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tokeninfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "aud": "someone-else",
                "email": "alice@example.com",
                "email_verified": "true",
            })))
            .mount(&server)
            .await;

        let err = verifier(&server, "client-123").verify("t").await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_rejected_token_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tokeninfo"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let err = verifier(&server, "client-123")
            .verify("bad-token")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_disabled_verifier_rejects() {
        let server = MockServer::start().await;
        let err = verifier(&server, "").verify("t").await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
