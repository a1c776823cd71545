//! API request and response types

use crate::role::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Generic acknowledgement body for endpoints that never reveal more
/// than "it worked" (forgot-password, reset)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Delegated (OAuth) login request carrying the provider's ID token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OauthLoginRequest {
    pub id_token: String,
}

/// Signed session token response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Identity carried by a validated session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Forgot-password request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Reset submission; the token travels in the URL path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// User entry in the admin listing; the password hash is never serialized
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Admin user listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<UserSummary>,
}

/// Role change request
///
/// `new_role` stays a plain string so an out-of-range value surfaces as
/// an invalid-role error instead of a body deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRoleRequest {
    pub user_id: Uuid,
    pub new_role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_role_request_uses_camel_case_keys() {
        let body = r#"{"userId":"1f8e6f0c-6c4e-4a4e-9f9e-0c9d4f9b2a11","newRole":"admin"}"#;
        let req: ChangeRoleRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.new_role, "admin");
    }

    #[test]
    fn test_ack_response_shape() {
        let body = serde_json::to_value(AckResponse::ok()).unwrap();
        assert_eq!(body, serde_json::json!({"success": true}));
    }

    #[test]
    fn test_user_summary_serializes_role_lowercase() {
        let summary = UserSummary {
            id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
            role: Role::Admin,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["role"], "admin");
        assert!(value.get("password_hash").is_none());
    }
}
