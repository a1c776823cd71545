//! Admin routes
//!
//! User listing and role management. The gate runs before anything
//! else; the self-role-change rejection is a policy of this surface,
//! not of the gate (see AdminService).

use crate::auth::{require_role, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::services::AdminService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use stock_dashboard_shared::{ChangeRoleRequest, Role, UserSummary, UsersResponse};

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users).patch(change_role))
}

/// List all users
///
/// GET /admin/users; 403 unless the session role is admin.
async fn list_users(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Json<UsersResponse>> {
    let users = AdminService::list_users(&state.db, &auth_user.identity).await?;
    Ok(Json(UsersResponse { users }))
}

/// Change a user's role
///
/// PATCH /admin/users; 400 invalid role or self-target, 403 non-admin,
/// 404 unknown target.
async fn change_role(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<ChangeRoleRequest>,
) -> ApiResult<Json<UserSummary>> {
    require_role(&auth_user.identity, &[Role::Admin])?;

    if req.user_id == auth_user.identity.id {
        return Err(ApiError::BadRequest(
            "You cannot change your own role".to_string(),
        ));
    }

    let updated = AdminService::change_role(
        &state.db,
        state.mailer(),
        &auth_user.identity,
        req.user_id,
        &req.new_role,
    )
    .await?;

    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    // Route tests live in admin_tests.rs and the integration suite
}
