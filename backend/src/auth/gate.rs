//! Role-based authorization gate
//!
//! Applied by services before every privileged operation. The gate only
//! checks the role carried by the session; surface-level policies such
//! as "cannot change your own role" belong to the consuming handler.

use crate::error::ApiError;
use stock_dashboard_shared::{Role, SessionIdentity};

/// Accept the session iff its role is in the allowed set
pub fn require_role(identity: &SessionIdentity, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&identity.role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden("insufficient role".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn identity(role: Role) -> SessionIdentity {
        SessionIdentity {
            id: Uuid::new_v4(),
            email: "x@example.com".to_string(),
            name: "X".to_string(),
            role,
        }
    }

    #[test]
    fn test_admin_passes_admin_gate() {
        assert!(require_role(&identity(Role::Admin), &[Role::Admin]).is_ok());
    }

    #[test]
    fn test_user_fails_admin_gate() {
        let err = require_role(&identity(Role::User), &[Role::Admin]).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn test_user_passes_when_listed() {
        assert!(require_role(&identity(Role::User), &[Role::User, Role::Admin]).is_ok());
    }
}
