//! Authentication routes
//!
//! Registration, credential and delegated login, current-session
//! identity, and the password-reset pair. The forgot-password endpoint
//! returns the same success body whether or not the email is known.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::{AuthService, ResetService};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use stock_dashboard_shared::{
    AckResponse, ForgotPasswordRequest, LoginRequest, OauthLoginRequest, RegisterRequest,
    ResetPasswordRequest, SessionIdentity, SessionTokenResponse,
};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/oauth", post(oauth_login))
        .route("/me", get(me))
        .route("/forgot-password", post(forgot_password))
        .route("/reset/:token", post(reset_password))
}

/// Register a new user
///
/// POST /auth/register
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<SessionTokenResponse>)> {
    let session =
        AuthService::register(&state.db, state.jwt(), &req.email, &req.password, &req.name).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Login with email and password
///
/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<SessionTokenResponse>> {
    let session = AuthService::login(&state.db, state.jwt(), &req.email, &req.password).await?;
    Ok(Json(session))
}

/// Login with a Google ID token
///
/// POST /auth/oauth
async fn oauth_login(
    State(state): State<AppState>,
    Json(req): Json<OauthLoginRequest>,
) -> ApiResult<Json<SessionTokenResponse>> {
    let identity = state.oauth().verify(&req.id_token).await?;
    let session = AuthService::login_delegated(&state.db, state.jwt(), &identity).await?;
    Ok(Json(session))
}

/// Get the current session identity (requires authentication)
///
/// GET /auth/me
async fn me(auth_user: AuthUser) -> ApiResult<Json<SessionIdentity>> {
    Ok(Json(auth_user.identity))
}

/// Request a password reset link
///
/// POST /auth/forgot-password
///
/// Always returns 200 with `{"success":true}` regardless of whether
/// the email is registered.
async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<AckResponse>> {
    ResetService::request_reset(
        &state.db,
        state.mailer(),
        &state.config().reset,
        &req.email,
    )
    .await?;
    Ok(Json(AckResponse::ok()))
}

/// Redeem a reset token
///
/// POST /auth/reset/:token
async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Json<AckResponse>> {
    ResetService::consume_reset(&state.db, &token, &req.password).await?;
    Ok(Json(AckResponse::ok()))
}

#[cfg(test)]
mod tests {
    // Route tests live in auth_tests.rs and the integration suite
}
